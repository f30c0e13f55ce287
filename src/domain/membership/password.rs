//! Salted password digests for member logins.

use rand::distributions::Alphanumeric;
use rand::Rng;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::domain::foundation::ValidationError;

const SCHEME: &str = "sha256";
const SALT_LENGTH: usize = 16;

/// Stored form `sha256$<salt>$<hex digest>`.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Hashes a clear-text password with a fresh random salt.
    pub fn from_plain(plain: &str) -> Self {
        let salt: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(SALT_LENGTH)
            .map(char::from)
            .collect();
        Self(format!("{}${}${}", SCHEME, salt, digest(&salt, plain)))
    }

    /// Wraps a digest read back from storage.
    pub fn from_stored(stored: impl Into<String>) -> Result<Self, ValidationError> {
        let stored = stored.into();
        let mut parts = stored.split('$');
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(SCHEME), Some(salt), Some(hash), None) if !salt.is_empty() && !hash.is_empty() => {
                Ok(Self(stored))
            }
            _ => Err(ValidationError::invalid_format(
                "password_hash",
                "expected sha256$salt$digest",
            )),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn verify(&self, plain: &str) -> bool {
        let mut parts = self.0.splitn(3, '$');
        let (_, salt, expected) = match (parts.next(), parts.next(), parts.next()) {
            (Some(scheme), Some(salt), Some(expected)) => (scheme, salt, expected),
            _ => return false,
        };
        let actual = digest(salt, plain);
        bool::from(actual.as_bytes().ct_eq(expected.as_bytes()))
    }
}

impl std::fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PasswordHash([REDACTED])")
    }
}

fn digest(salt: &str, plain: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(plain.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verifies_the_original_password() {
        let hash = PasswordHash::from_plain("s3cret");
        assert!(hash.verify("s3cret"));
        assert!(!hash.verify("S3cret"));
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let a = PasswordHash::from_plain("s3cret");
        let b = PasswordHash::from_plain("s3cret");
        assert_ne!(a.as_str(), b.as_str());
    }

    #[test]
    fn stored_form_round_trips() {
        let hash = PasswordHash::from_plain("pw");
        let restored = PasswordHash::from_stored(hash.as_str()).unwrap();
        assert!(restored.verify("pw"));
    }

    #[test]
    fn rejects_foreign_formats() {
        assert!(PasswordHash::from_stored("plaintext").is_err());
        assert!(PasswordHash::from_stored("md5$a$b").is_err());
        assert!(PasswordHash::from_stored("sha256$$b").is_err());
    }

    #[test]
    fn debug_output_is_redacted() {
        let hash = PasswordHash::from_plain("pw");
        assert_eq!(format!("{:?}", hash), "PasswordHash([REDACTED])");
    }
}
