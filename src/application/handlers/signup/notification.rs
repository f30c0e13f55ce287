//! Notification emails of the signup flow.
//!
//! Composition is pure and runs right after a commit; delivery happens on a
//! spawned task so the visitor's response never waits on the mail provider.

use std::sync::Arc;

use futures::future::join_all;
use tokio::task::JoinHandle;

use crate::domain::membership::{Member, MembershipType};
use crate::domain::signup::{EmailTemplate, Substitutions};
use crate::ports::{EmailMessage, EmailSender};

use super::SignupSettings;

/// Renders notification emails from the configured templates.
pub struct NotificationComposer<'a> {
    settings: &'a SignupSettings,
}

impl<'a> NotificationComposer<'a> {
    pub fn new(settings: &'a SignupSettings) -> Self {
        Self { settings }
    }

    /// Tokens for a member of the given type.
    pub fn member_substitutions(
        &self,
        member: &Member,
        membership_type: Option<&MembershipType>,
    ) -> Substitutions {
        Substitutions::for_member(
            member,
            membership_type.map(|t| t.label.as_str()),
            &self.settings.organization,
        )
    }

    /// Confirmation sent to the member after a subscription, renewal or
    /// update. The type's validation text is appended to the body.
    pub fn member_confirmation(
        &self,
        member: &Member,
        membership_type: Option<&MembershipType>,
    ) -> Option<EmailMessage> {
        let to = member.profile.email.as_deref().filter(|e| !e.trim().is_empty())?;
        let template = &self.settings.templates.autoregister;
        if !template.is_usable() {
            return None;
        }

        let mut body = template.body.clone();
        if let Some(extra) = membership_type
            .and_then(|t| t.mail_on_valid.as_deref())
            .filter(|text| !text.trim().is_empty())
        {
            body.push_str("\n\n");
            body.push_str(extra);
        }

        let substitutions = self.member_substitutions(member, membership_type);
        Some(self.render(
            to,
            &EmailTemplate::new(template.subject.clone(), body),
            &substitutions,
        ))
    }

    /// Notice sent to the organization for a new subscription.
    pub fn admin_notice(
        &self,
        member: &Member,
        membership_type: Option<&MembershipType>,
    ) -> Option<EmailMessage> {
        let organization = &self.settings.organization;
        let recipient = organization
            .email
            .as_deref()
            .filter(|e| !e.trim().is_empty())?;
        let template = &self.settings.templates.admin_notice;
        if !template.is_usable() {
            return None;
        }

        let substitutions = self.member_substitutions(member, membership_type);
        let subject = format!(
            "[{}] {}",
            organization.app_title,
            substitutions.apply(&template.subject)
        );
        Some(EmailMessage::new(
            organization.mail_from.clone(),
            substitutions.apply(recipient),
            subject,
            substitutions.apply(&template.body),
        ))
    }

    /// Renders a template for one recipient; `None` when the template is
    /// missing its subject or body.
    pub fn from_template(
        &self,
        to: &str,
        template: &EmailTemplate,
        substitutions: &Substitutions,
    ) -> Option<EmailMessage> {
        if !template.is_usable() {
            return None;
        }
        Some(self.render(to, template, substitutions))
    }

    fn render(
        &self,
        to: &str,
        template: &EmailTemplate,
        substitutions: &Substitutions,
    ) -> EmailMessage {
        EmailMessage::new(
            self.settings.organization.mail_from.clone(),
            to,
            substitutions.apply(&template.subject),
            substitutions.apply(&template.body),
        )
    }
}

/// Delivers notifications in the background, best effort.
#[derive(Clone)]
pub struct NotificationDispatcher {
    sender: Arc<dyn EmailSender>,
}

impl NotificationDispatcher {
    pub fn new(sender: Arc<dyn EmailSender>) -> Self {
        Self { sender }
    }

    /// Sends every message on a spawned task. Failures are logged and
    /// otherwise ignored; the handle is only awaited by tests.
    pub fn dispatch(&self, messages: Vec<EmailMessage>) -> JoinHandle<()> {
        let sender = Arc::clone(&self.sender);
        tokio::spawn(async move {
            let deliveries = messages.iter().map(|message| {
                let sender = Arc::clone(&sender);
                async move { (message, sender.send(message).await) }
            });

            for (message, result) in join_all(deliveries).await {
                match result {
                    Ok(()) => tracing::debug!(to = %message.to, "Notification sent"),
                    Err(e) => tracing::error!(
                        to = %message.to,
                        subject = %message.subject,
                        error = %e,
                        "Failed to send notification"
                    ),
                }
            }
        })
    }
}
