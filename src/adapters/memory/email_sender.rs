//! Recording Email Sender
//!
//! Logs each message instead of delivering it and keeps a copy for
//! inspection. Used for local runs with email disabled and in tests.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::ports::{EmailError, EmailMessage, EmailSender};

#[derive(Debug, Clone, Default)]
pub struct RecordingEmailSender {
    sent: Arc<RwLock<Vec<EmailMessage>>>,
}

impl RecordingEmailSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn sent(&self) -> Vec<EmailMessage> {
        self.sent.read().await.clone()
    }
}

#[async_trait]
impl EmailSender for RecordingEmailSender {
    async fn send(&self, message: &EmailMessage) -> Result<(), EmailError> {
        if message.to.trim().is_empty() {
            return Err(EmailError::InvalidRecipient(message.to.clone()));
        }
        tracing::info!(
            to = %message.to,
            subject = %message.subject,
            "Email recorded (delivery disabled)"
        );
        self.sent.write().await.push(message.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_sent_messages() {
        let sender = RecordingEmailSender::new();
        let message = EmailMessage::new("club@example.org", "ann@example.org", "Hi", "Body");

        sender.send(&message).await.unwrap();

        assert_eq!(sender.sent().await, vec![message]);
    }

    #[tokio::test]
    async fn rejects_blank_recipient() {
        let sender = RecordingEmailSender::new();
        let message = EmailMessage::new("club@example.org", " ", "Hi", "Body");

        let result = sender.send(&message).await;

        assert!(matches!(result, Err(EmailError::InvalidRecipient(_))));
        assert!(sender.sent().await.is_empty());
    }
}
