//! Online payment page links for membership fees.
//!
//! Links carry `source=member`, the member reference and the amount. When a
//! signing secret is configured, a `securekey` lets the payment page check
//! the link was issued by us:
//!
//! ```text
//! securekey = hex(HMAC-SHA256(secret, "member" + ref))
//! ```

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, Secret};
use sha2::Sha256;
use url::Url;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::signup::PaymentRequest;
use crate::ports::PaymentLinkBuilder;

type HmacSha256 = Hmac<Sha256>;

const SOURCE: &str = "member";

pub struct OnlinePaymentLinks {
    page_url: Url,
    secret: Option<Secret<String>>,
}

impl OnlinePaymentLinks {
    pub fn new(page_url: Url) -> Self {
        Self {
            page_url,
            secret: None,
        }
    }

    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        let secret = secret.into();
        self.secret = (!secret.is_empty()).then(|| Secret::new(secret));
        self
    }

    fn secure_key(&self, reference: &str) -> Result<Option<String>, DomainError> {
        let Some(secret) = &self.secret else {
            return Ok(None);
        };

        let mut mac = HmacSha256::new_from_slice(secret.expose_secret().as_bytes()).map_err(|e| {
            DomainError::new(
                ErrorCode::InternalError,
                format!("Failed to initialise payment key: {}", e),
            )
        })?;
        mac.update(SOURCE.as_bytes());
        mac.update(reference.as_bytes());

        Ok(Some(hex::encode(mac.finalize().into_bytes())))
    }
}

impl PaymentLinkBuilder for OnlinePaymentLinks {
    fn payment_url(&self, request: &PaymentRequest) -> Result<String, DomainError> {
        let amount = request.amount.to_string();
        let secure_key = self.secure_key(&request.reference)?;

        let mut url = self.page_url.clone();
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("source", SOURCE)
                .append_pair("ref", &request.reference)
                .append_pair("amount", &amount);
            if let Some(email) = request.email.as_deref().filter(|e| !e.is_empty()) {
                query.append_pair("email", email);
            }
            if let Some(method) = request.method.as_deref() {
                query.append_pair("paymentmethod", method);
            }
            if let Some(key) = &secure_key {
                query.append_pair("securekey", key);
            }
        }

        Ok(url.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Money;

    fn request() -> PaymentRequest {
        PaymentRequest {
            reference: "42".to_string(),
            amount: Money::from_cents(2500).unwrap(),
            email: Some("ann@x.org".to_string()),
            method: None,
        }
    }

    fn links() -> OnlinePaymentLinks {
        OnlinePaymentLinks::new(Url::parse("https://pay.example/start").unwrap())
    }

    #[test]
    fn builds_member_payment_url() {
        let url = links().payment_url(&request()).unwrap();

        assert_eq!(
            url,
            "https://pay.example/start?source=member&ref=42&amount=25.00&email=ann%40x.org"
        );
    }

    #[test]
    fn includes_preselected_method() {
        let mut req = request();
        req.method = Some("stripe".to_string());

        let url = links().payment_url(&req).unwrap();

        assert!(url.ends_with("&paymentmethod=stripe"));
    }

    #[test]
    fn omits_missing_email() {
        let mut req = request();
        req.email = None;

        let url = links().payment_url(&req).unwrap();

        assert!(!url.contains("email="));
    }

    #[test]
    fn signs_reference_when_secret_is_set() {
        let url = links().with_secret("s3cret").payment_url(&request()).unwrap();

        let mut mac = HmacSha256::new_from_slice(b"s3cret").unwrap();
        mac.update(b"member42");
        let expected = hex::encode(mac.finalize().into_bytes());

        assert!(url.ends_with(&format!("&securekey={}", expected)));
    }

    #[test]
    fn secure_key_depends_on_reference() {
        let links = links().with_secret("s3cret");

        let a = links.secure_key("1").unwrap();
        let b = links.secure_key("2").unwrap();

        assert_ne!(a, b);
        assert_eq!(a.map(|k| k.len()), Some(64));
    }

    #[test]
    fn empty_secret_disables_signing() {
        let url = links().with_secret("").payment_url(&request()).unwrap();

        assert!(!url.contains("securekey"));
    }
}
