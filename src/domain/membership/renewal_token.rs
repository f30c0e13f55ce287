//! Secret token embedded in membership renewal links.

use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

use crate::domain::foundation::{Timestamp, ValidationError};

/// Length of generated token values.
pub const RENEWAL_TOKEN_LENGTH: usize = 32;

/// Renewal secret and its expiry.
///
/// A link is honored only while the token is unexpired and the presented
/// value matches the stored one.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenewalToken {
    value: String,
    expires_at: Timestamp,
}

impl RenewalToken {
    /// Generates a fresh random token valid for `ttl_days` from `now`.
    pub fn generate(ttl_days: u32, now: Timestamp) -> Self {
        let value: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(RENEWAL_TOKEN_LENGTH)
            .map(char::from)
            .collect();
        Self {
            value,
            expires_at: now.add_days(ttl_days as i64),
        }
    }

    /// Rebuilds a stored token.
    pub fn from_parts(value: impl Into<String>, expires_at: Timestamp) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::empty_field("urltoken"));
        }
        Ok(Self { value, expires_at })
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn expires_at(&self) -> Timestamp {
        self.expires_at
    }

    pub fn is_expired(&self, now: Timestamp) -> bool {
        !self.expires_at.is_after(&now)
    }

    /// Constant-time comparison against a presented value.
    pub fn matches(&self, candidate: &str) -> bool {
        !candidate.is_empty() && bool::from(self.value.as_bytes().ct_eq(candidate.as_bytes()))
    }

    /// True when `candidate` matches and the token has not expired.
    pub fn is_valid_for(&self, candidate: &str, now: Timestamp) -> bool {
        let matches = self.matches(candidate);
        matches && !self.is_expired(now)
    }
}

impl std::fmt::Debug for RenewalToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenewalToken")
            .field("value", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_tokens_are_alphanumeric_and_distinct() {
        let now = Timestamp::now();
        let a = RenewalToken::generate(30, now);
        let b = RenewalToken::generate(30, now);

        assert_eq!(a.value().len(), RENEWAL_TOKEN_LENGTH);
        assert!(a.value().chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a.value(), b.value());
    }

    #[test]
    fn generated_token_expires_after_ttl() {
        let now = Timestamp::now();
        let token = RenewalToken::generate(30, now);
        assert_eq!(token.expires_at(), now.add_days(30));
        assert!(!token.is_expired(now.add_days(29)));
        assert!(token.is_expired(now.add_days(30)));
    }

    #[test]
    fn valid_only_when_matching_and_unexpired() {
        let now = Timestamp::now();
        let token = RenewalToken::from_parts("abc123", now.add_days(1)).unwrap();

        assert!(token.is_valid_for("abc123", now));
        assert!(!token.is_valid_for("abc124", now));
        assert!(!token.is_valid_for("", now));
        assert!(!token.is_valid_for("abc123", now.add_days(2)));
    }

    #[test]
    fn from_parts_rejects_blank_values() {
        assert!(RenewalToken::from_parts("  ", Timestamp::now()).is_err());
    }

    #[test]
    fn debug_output_redacts_value() {
        let token = RenewalToken::from_parts("secret-value", Timestamp::now()).unwrap();
        assert!(!format!("{:?}", token).contains("secret-value"));
    }
}
