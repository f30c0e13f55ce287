//! Payment link port.
//!
//! The form never takes payments itself; it sends the visitor to the online
//! payment page with enough context to attach the payment to the member.

use crate::domain::foundation::DomainError;
use crate::domain::signup::PaymentRequest;

/// Builds the URL of the online payment page for a member.
pub trait PaymentLinkBuilder: Send + Sync {
    /// # Errors
    ///
    /// - `InternalError` if the payment page URL is not usable
    fn payment_url(&self, request: &PaymentRequest) -> Result<String, DomainError>;
}
