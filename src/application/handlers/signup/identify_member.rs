//! IdentifyMemberHandler - Sends a renewal or new-membership link by email.
//!
//! The visitor gives an email address. When a member uses it, they receive
//! a renewal link; otherwise they receive a link to the new membership form.
//! The page shown afterwards is the same in both cases.

use std::sync::Arc;

use crate::domain::foundation::Timestamp;
use crate::domain::membership::MembershipError;
use crate::domain::signup::{validate_identification, FieldError, SignupForm, Substitutions};
use crate::ports::{EmailMessage, MemberStore, MembershipTypeReader};

use super::{NotificationComposer, NotificationDispatcher, SignupSettings};

/// Command carrying the identification form.
#[derive(Debug, Clone)]
pub struct IdentifyMemberCommand {
    pub form: SignupForm,
    pub entity: i32,
}

#[derive(Debug, Clone)]
pub enum IdentifyOutcome {
    /// The email is missing or malformed.
    Rejected { errors: Vec<FieldError> },
    /// An email was queued when a template was configured.
    Sent {
        email: String,
        member_found: bool,
        notification: Option<EmailMessage>,
    },
}

pub struct IdentifyMemberHandler {
    members: Arc<dyn MemberStore>,
    types: Arc<dyn MembershipTypeReader>,
    dispatcher: NotificationDispatcher,
    settings: Arc<SignupSettings>,
}

impl IdentifyMemberHandler {
    pub fn new(
        members: Arc<dyn MemberStore>,
        types: Arc<dyn MembershipTypeReader>,
        dispatcher: NotificationDispatcher,
        settings: Arc<SignupSettings>,
    ) -> Self {
        Self {
            members,
            types,
            dispatcher,
            settings,
        }
    }

    pub async fn handle(&self, cmd: IdentifyMemberCommand) -> Result<IdentifyOutcome, MembershipError> {
        let email = match validate_identification(&cmd.form) {
            Ok(email) => email,
            Err(errors) => return Ok(IdentifyOutcome::Rejected { errors }),
        };

        let settings = &self.settings;
        let composer = NotificationComposer::new(settings);
        let found = self.members.find_latest_by_email(&email, cmd.entity).await?;
        let member_found = found.is_some();

        let notification = match found {
            Some(mut member) => {
                let now = Timestamp::now();
                let (token, issued) =
                    member.ensure_renewal_token(settings.policy.renewal_token_ttl_days, now);
                if issued {
                    self.members.store_renewal_token(member.id, &token).await?;
                }

                let membership_type = self.types.find_by_id(member.type_id, member.entity).await?;
                let substitutions = composer
                    .member_substitutions(&member, membership_type.as_ref())
                    .with(
                        "__MEMBERSHIP_RENEWAL_URL__",
                        settings.links.renewal_url(&member.reference(), token.value()),
                    );

                tracing::info!(member_id = %member.id, token_issued = issued, "Renewal link requested");
                composer.from_template(&email, &settings.templates.searched_and_found, &substitutions)
            }
            None => {
                let substitutions = Substitutions::for_organization(&settings.organization)
                    .with("__MEMBER_EMAIL__", email.clone())
                    .with(
                        "__NEW_MEMBERSHIP_URL__",
                        settings
                            .links
                            .new_membership_url(&email, cmd.form.effective_type(&settings.policy)),
                    );

                tracing::info!("Identification matched no member");
                composer.from_template(
                    &email,
                    &settings.templates.searched_and_not_found,
                    &substitutions,
                )
            }
        };

        match &notification {
            Some(message) => {
                self.dispatcher.dispatch(vec![message.clone()]);
            }
            None => tracing::warn!(member_found, "Identification template is not configured"),
        }

        Ok(IdentifyOutcome::Sent {
            email,
            member_found,
            notification,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::settings::fixtures::settings;
    use super::*;
    use crate::adapters::memory::{
        InMemoryMemberStore, InMemoryMembershipTypeReader, RecordingEmailSender,
    };
    use crate::domain::foundation::MemberId;
    use crate::domain::membership::fixtures::{member, membership_type};
    use crate::domain::membership::{Member, RenewalToken};
    use crate::domain::signup::messages;

    struct Harness {
        store: InMemoryMemberStore,
        handler: IdentifyMemberHandler,
    }

    fn harness_with(members: Vec<Member>, settings: SignupSettings) -> Harness {
        let store = InMemoryMemberStore::with_members(members);
        let handler = IdentifyMemberHandler::new(
            Arc::new(store.clone()),
            Arc::new(InMemoryMembershipTypeReader::new(vec![membership_type(3)])),
            NotificationDispatcher::new(Arc::new(RecordingEmailSender::new())),
            Arc::new(settings),
        );
        Harness { store, handler }
    }

    fn identify(email: Option<&str>) -> IdentifyMemberCommand {
        IdentifyMemberCommand {
            form: SignupForm {
                email: email.map(str::to_string),
                ..SignupForm::default()
            },
            entity: 1,
        }
    }

    #[tokio::test]
    async fn missing_email_is_rejected() {
        let h = harness_with(vec![], settings());

        let outcome = h.handler.handle(identify(None)).await.unwrap();

        match outcome {
            IdentifyOutcome::Rejected { errors } => {
                assert_eq!(errors[0].field, "email");
                assert_eq!(errors[0].message, messages::EMAIL_REQUIRED);
            }
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn known_email_gets_renewal_link_with_new_token() {
        let h = harness_with(vec![member(12, 3, "ann@example.org")], settings());

        let outcome = h.handler.handle(identify(Some("ann@example.org"))).await.unwrap();

        let stored = h
            .store
            .find_by_id(MemberId::new(12).unwrap())
            .await
            .unwrap()
            .unwrap();
        let token = stored.renewal_token.expect("token stored");
        match outcome {
            IdentifyOutcome::Sent {
                member_found,
                notification,
                ..
            } => {
                assert!(member_found);
                let message = notification.unwrap();
                assert_eq!(message.to, "ann@example.org");
                assert!(message.body.contains("ref=12"));
                assert!(message.body.contains(&format!("urltoken={}", token.value())));
            }
            other => panic!("expected sent, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn valid_stored_token_is_reused() {
        let mut m = member(12, 3, "ann@example.org");
        let token = RenewalToken::generate(30, Timestamp::now());
        m.renewal_token = Some(token.clone());
        let h = harness_with(vec![m.clone()], settings());

        let outcome = h.handler.handle(identify(Some("ann@example.org"))).await.unwrap();

        assert_eq!(h.store.members().await, vec![m]);
        match outcome {
            IdentifyOutcome::Sent { notification, .. } => {
                assert!(notification.unwrap().body.contains(token.value()));
            }
            other => panic!("expected sent, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn unknown_email_gets_new_membership_link() {
        let h = harness_with(vec![], settings());
        let mut cmd = identify(Some("new@example.org"));
        cmd.form.typeid = Some("3".to_string());

        let outcome = h.handler.handle(cmd).await.unwrap();

        match outcome {
            IdentifyOutcome::Sent {
                member_found,
                notification,
                ..
            } => {
                assert!(!member_found);
                let message = notification.unwrap();
                assert_eq!(message.to, "new@example.org");
                assert!(message.body.contains("action=create"));
                assert!(message.body.contains("email=new%40example.org"));
                assert!(message.body.contains("typeid=3"));
            }
            other => panic!("expected sent, got {:?}", other),
        }
        assert_eq!(h.store.member_count().await, 0);
    }

    #[tokio::test]
    async fn unusable_template_sends_nothing() {
        let mut settings = settings();
        settings.templates.searched_and_not_found.subject = String::new();
        let h = harness_with(vec![], settings);

        let outcome = h.handler.handle(identify(Some("new@example.org"))).await.unwrap();

        assert!(matches!(
            outcome,
            IdentifyOutcome::Sent {
                notification: None,
                ..
            }
        ));
    }
}
