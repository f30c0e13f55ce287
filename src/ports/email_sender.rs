//! Email Sender Port - Outbound mail interface.
//!
//! Notifications produced by the signup flow are handed to this port after
//! the submission has been committed. Delivery failures never undo a
//! membership; callers log them and move on.

use async_trait::async_trait;
use thiserror::Error;

/// A fully rendered email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    /// Sender as `Name <address>` or a bare address.
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl EmailMessage {
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }
}

/// Port for delivering email.
///
/// # Usage
///
/// ```rust,ignore
/// let sender: &dyn EmailSender = get_sender();
/// sender.send(&EmailMessage::new("club@example.org", "ann@example.org", "Hi", "Welcome")).await?;
/// ```
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<(), EmailError>;
}

/// Errors raised while delivering email.
#[derive(Debug, Error)]
pub enum EmailError {
    #[error("Invalid recipient: {0}")]
    InvalidRecipient(String),

    #[error("Email provider rejected message: {0}")]
    Rejected(String),

    #[error("Email transport failed: {0}")]
    Transport(String),
}
