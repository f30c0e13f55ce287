//! SubmitMembershipHandler - Command handler for form submissions.
//!
//! Validates and persists `add`, `renew_add` and `update_confirm` inside one
//! unit of work, then queues notifications and picks the redirect.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::foundation::{DomainError, ErrorCode, Money, Timestamp};
use crate::domain::membership::{Member, MembershipError, MembershipType, NewMember};
use crate::domain::signup::{
    messages, select_redirect, validate_submission, FieldError, FormAction, RedirectInput,
    RedirectTarget, SignupForm, SubmissionContext,
};
use crate::ports::{
    EmailMessage, MemberStore, MemberUnitOfWork, MembershipTypeReader, PaymentLinkBuilder,
};

use super::{NotificationComposer, NotificationDispatcher, SignupSettings};

/// Command carrying one form submission.
#[derive(Debug, Clone)]
pub struct SubmitMembershipCommand {
    pub action: FormAction,
    /// Values as posted, not completed from the stored member.
    pub form: SignupForm,
    /// Member reached through a renewal link; required for renewals and
    /// updates.
    pub member: Option<Member>,
    pub entity: i32,
    /// Page to return to after success.
    pub backtopage: Option<String>,
}

/// How a submission ended.
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    /// Nothing written; show the form again with these errors.
    Rejected {
        action: FormAction,
        errors: Vec<FieldError>,
    },
    /// Nothing differed from the stored member; show the form with a notice.
    Unchanged { action: FormAction, notice: String },
    /// Committed.
    Completed {
        member: Member,
        completed: FormAction,
        redirect_url: String,
        /// Messages handed to the dispatcher.
        notifications: Vec<EmailMessage>,
    },
}

enum Persisted {
    Written(Member),
    Unchanged,
}

pub struct SubmitMembershipHandler {
    members: Arc<dyn MemberStore>,
    types: Arc<dyn MembershipTypeReader>,
    payment_links: Option<Arc<dyn PaymentLinkBuilder>>,
    dispatcher: NotificationDispatcher,
    settings: Arc<SignupSettings>,
}

impl SubmitMembershipHandler {
    pub fn new(
        members: Arc<dyn MemberStore>,
        types: Arc<dyn MembershipTypeReader>,
        payment_links: Option<Arc<dyn PaymentLinkBuilder>>,
        dispatcher: NotificationDispatcher,
        settings: Arc<SignupSettings>,
    ) -> Self {
        Self {
            members,
            types,
            payment_links,
            dispatcher,
            settings,
        }
    }

    pub async fn handle(&self, cmd: SubmitMembershipCommand) -> Result<SubmitOutcome, MembershipError> {
        let action = cmd.action;
        let fallback = action
            .pre_submit()
            .ok_or_else(|| MembershipError::invalid_state(action.as_str(), "submit"))?;
        if action.requires_member() && cmd.member.is_none() {
            return Err(MembershipError::invalid_state(
                action.as_str(),
                "change a membership without a renewal link",
            ));
        }

        let policy = &self.settings.policy;

        // 1. Resolve the type: the selected one for new members, the
        //    member's own one otherwise
        let type_id = match (&cmd.member, action) {
            (_, FormAction::Add) => cmd.form.effective_type(policy),
            (Some(member), _) => Some(member.type_id),
            (None, _) => None,
        };
        let membership_type = match type_id {
            Some(id) => self.types.find_by_id(id, cmd.entity).await?,
            None => None,
        };

        // 2. Validate and persist in one unit of work
        let mut uow = self.members.begin().await?;

        let ctx = SubmissionContext {
            action,
            policy,
            member: cmd.member.as_ref(),
            membership_type: membership_type.as_ref(),
        };
        let mut errors = Vec::new();
        let details = match validate_submission(&cmd.form, &ctx) {
            Ok(details) => Some(details),
            Err(field_errors) => {
                errors.extend(field_errors);
                None
            }
        };

        if policy.login_required() {
            if let Some(login) = cmd.form.login.as_deref() {
                let except = cmd.member.as_ref().map(|m| m.id);
                match uow.login_exists(login, except).await {
                    Ok(true) => errors.push(FieldError::new("login", messages::login_taken(login))),
                    Ok(false) => {}
                    Err(e) => errors.push(store_error(e)),
                }
            }
        }

        let details = match details {
            Some(details) if errors.is_empty() => details,
            _ => {
                tracing::info!(
                    action = %action,
                    error_count = errors.len(),
                    "Submission rejected"
                );
                rollback(&mut *uow).await;
                return Ok(SubmitOutcome::Rejected {
                    action: fallback,
                    errors,
                });
            }
        };

        let now = Timestamp::now();
        let persisted = match (action, cmd.member.clone(), membership_type.as_ref()) {
            (FormAction::Add, _, Some(membership_type)) => {
                let new_member = NewMember::register(cmd.entity, membership_type, details, now);
                uow.insert(&new_member)
                    .await
                    .map(|id| Persisted::Written(new_member.into_member(id)))
            }
            (FormAction::Add, _, None) => Err(DomainError::new(
                ErrorCode::MembershipTypeNotFound,
                messages::TYPE_NOT_AVAILABLE,
            )),
            (_, Some(mut member), _) => {
                member.revise(details, now);
                uow.update(&member).await.map(|rows| match rows {
                    0 => Persisted::Unchanged,
                    _ => Persisted::Written(member),
                })
            }
            (_, None, _) => Err(DomainError::new(
                ErrorCode::MemberNotFound,
                "No member attached to the submission",
            )),
        };

        let member = match persisted {
            Ok(Persisted::Written(member)) => member,
            Ok(Persisted::Unchanged) => {
                rollback(&mut *uow).await;
                return Ok(SubmitOutcome::Unchanged {
                    action: fallback,
                    notice: messages::NOTHING_TO_DO.to_string(),
                });
            }
            Err(e) => {
                rollback(&mut *uow).await;
                return Ok(SubmitOutcome::Rejected {
                    action: fallback,
                    errors: vec![store_error(e)],
                });
            }
        };

        if let Err(e) = uow.commit().await {
            return Ok(SubmitOutcome::Rejected {
                action: fallback,
                errors: vec![store_error(e)],
            });
        }

        tracing::info!(
            member_id = %member.id,
            action = %action,
            status = member.status.code(),
            "Membership saved"
        );

        // 3. Notify, after commit
        let notifications = self.compose_notifications(action, &member, membership_type.as_ref());
        if !notifications.is_empty() {
            self.dispatcher.dispatch(notifications.clone());
        }

        // 4. Redirect
        let completed = action.completed().unwrap_or(FormAction::Identify);
        let posted_amount = cmd.form.posted_amount().ok().flatten();
        let redirect_url = self.redirect_url(&cmd, &member, posted_amount);

        Ok(SubmitOutcome::Completed {
            member,
            completed,
            redirect_url,
            notifications,
        })
    }

    fn compose_notifications(
        &self,
        action: FormAction,
        member: &Member,
        membership_type: Option<&MembershipType>,
    ) -> Vec<EmailMessage> {
        let composer = NotificationComposer::new(&self.settings);
        let mut messages = Vec::new();
        messages.extend(composer.member_confirmation(member, membership_type));
        if action == FormAction::Add {
            messages.extend(composer.admin_notice(member, membership_type));
        }
        messages
    }

    fn redirect_url(
        &self,
        cmd: &SubmitMembershipCommand,
        member: &Member,
        amount: Option<Money>,
    ) -> String {
        let reference = member.reference();
        let input = RedirectInput {
            action: cmd.action,
            backtopage: cmd.backtopage.as_deref(),
            reference: &reference,
            amount,
            email: member.profile.email.as_deref(),
        };
        let completion = |action: FormAction| {
            let marker = Uuid::new_v4().simple().to_string();
            self.settings
                .links
                .completion_url(action, &marker, cmd.entity)
        };

        match select_redirect(&self.settings.policy, &input) {
            RedirectTarget::ReturnUrl(url) | RedirectTarget::Configured(url) => url,
            RedirectTarget::Payment(request) => match &self.payment_links {
                Some(builder) => builder.payment_url(&request).unwrap_or_else(|e| {
                    tracing::error!(
                        member_id = %member.id,
                        error = %e,
                        "Failed to build payment link"
                    );
                    completion(cmd.action.completed().unwrap_or(FormAction::Identify))
                }),
                None => {
                    tracing::warn!(member_id = %member.id, "Online payment enabled without payment page");
                    completion(cmd.action.completed().unwrap_or(FormAction::Identify))
                }
            },
            RedirectTarget::Completion(action) => completion(action),
        }
    }
}

fn store_error(err: DomainError) -> FieldError {
    match err.code {
        ErrorCode::LoginAlreadyExists => {
            let login = err.details.get("login").cloned().unwrap_or_default();
            FieldError::new("login", messages::login_taken(&login))
        }
        _ => {
            tracing::error!(error = %err, "Store error during submission");
            FieldError::new("form", err.message)
        }
    }
}

async fn rollback(uow: &mut dyn MemberUnitOfWork) {
    if let Err(e) = uow.rollback().await {
        tracing::error!(error = %e, "Failed to roll back submission");
    }
}
