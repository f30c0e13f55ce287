//! ResolvePageHandler - Works out which page a request is for.
//!
//! Turns the raw `action`, the renewal link parameters and the posted
//! values into the action to run, the member it applies to and the form
//! values to show.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, MemberId, StateMachine, Timestamp};
use crate::domain::membership::{Member, MembershipError};
use crate::domain::signup::{messages, FieldError, FormAction, SignupForm};
use crate::ports::MemberStore;

use super::SignupSettings;

/// Query describing an incoming form request.
#[derive(Debug, Clone, Default)]
pub struct ResolvePageQuery {
    /// Raw `action` parameter; unknown values count as absent.
    pub action: Option<String>,
    /// Member reference from a renewal link.
    pub reference: Option<String>,
    /// Secret token from a renewal link.
    pub url_token: Option<String>,
    /// The update button was used instead of the renew button.
    pub submit_update: bool,
    pub form: SignupForm,
    pub entity: i32,
}

/// The page to run, with the member and values it applies to.
#[derive(Debug, Clone)]
pub struct ResolvePageResult {
    pub action: FormAction,
    /// Member reached through a valid renewal link.
    pub member: Option<Member>,
    /// Values to display: posted ones, completed from the attached member.
    pub form: SignupForm,
    /// Values exactly as posted; submissions are validated against these.
    pub posted: SignupForm,
    pub errors: Vec<FieldError>,
}

pub struct ResolvePageHandler {
    members: Arc<dyn MemberStore>,
    settings: Arc<SignupSettings>,
}

impl ResolvePageHandler {
    pub fn new(members: Arc<dyn MemberStore>, settings: Arc<SignupSettings>) -> Self {
        Self { members, settings }
    }

    pub async fn handle(&self, query: ResolvePageQuery) -> Result<ResolvePageResult, MembershipError> {
        let policy = &self.settings.policy;

        let mut action = match query.action.as_deref().and_then(FormAction::parse) {
            Some(action) => action,
            None if !query.form.filling_started()
                && !policy.skip_table
                && policy.force_type.is_none() =>
            {
                FormAction::Table
            }
            None => FormAction::Create,
        };

        let reference = query
            .reference
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty());

        let mut member = None;
        let mut errors = Vec::new();

        if reference.is_some() || action.requires_member() {
            let now = Timestamp::now();
            let token = query.url_token.as_deref().unwrap_or_default();

            match self.load_member(reference, query.entity).await? {
                Some(found) if found.accepts_renewal_token(token, now) => {
                    if matches!(action, FormAction::Create | FormAction::Table) {
                        action = FormAction::Renew;
                    }
                    member = Some(found);
                }
                _ => {
                    tracing::info!(
                        reference = reference.unwrap_or_default(),
                        action = %action,
                        "Renewal link rejected"
                    );
                    action = FormAction::Identify;
                    errors.push(FieldError::new(
                        "urltoken",
                        messages::invalid_renewal_link(
                            &self.settings.links.identify_url(),
                            self.settings.organization.contact_email(),
                        ),
                    ));
                }
            }
        }

        if action == FormAction::RenewAdd && query.submit_update {
            action = action
                .transition_to(FormAction::UpdateConfirm)
                .map_err(DomainError::from)?;
        }

        let form = match &member {
            Some(member) => query.form.prefilled_from(member),
            None => query.form.clone(),
        };

        Ok(ResolvePageResult {
            action,
            member,
            form,
            posted: query.form,
            errors,
        })
    }

    async fn load_member(
        &self,
        reference: Option<&str>,
        entity: i32,
    ) -> Result<Option<Member>, MembershipError> {
        let id = match reference.and_then(|r| r.parse::<MemberId>().ok()) {
            Some(id) => id,
            None => return Ok(None),
        };
        let member = self.members.find_by_id(id).await?;
        Ok(member.filter(|m| m.entity == entity))
    }
}

#[cfg(test)]
mod tests {
    use super::super::settings::fixtures::settings;
    use super::*;
    use crate::adapters::memory::InMemoryMemberStore;
    use crate::domain::foundation::{ErrorCode, MembershipTypeId};
    use crate::domain::membership::fixtures::member;
    use crate::domain::membership::RenewalToken;
    use async_trait::async_trait;

    fn member_with_token(ttl_days: u32) -> (Member, String) {
        let mut m = member(12, 3, "ann@example.org");
        let token = RenewalToken::generate(ttl_days, Timestamp::now());
        let value = token.value().to_string();
        m.renewal_token = Some(token);
        (m, value)
    }

    fn handler_with(members: Vec<Member>, settings: SignupSettings) -> ResolvePageHandler {
        ResolvePageHandler::new(
            Arc::new(InMemoryMemberStore::with_members(members)),
            Arc::new(settings),
        )
    }

    fn query(action: Option<&str>) -> ResolvePageQuery {
        ResolvePageQuery {
            action: action.map(str::to_string),
            entity: 1,
            ..ResolvePageQuery::default()
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Action Defaulting
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn no_action_and_nothing_filled_shows_table() {
        let result = handler_with(vec![], settings()).handle(query(None)).await.unwrap();
        assert_eq!(result.action, FormAction::Table);
    }

    #[tokio::test]
    async fn no_action_with_skip_table_shows_create() {
        let mut settings = settings();
        settings.policy.skip_table = true;

        let result = handler_with(vec![], settings).handle(query(None)).await.unwrap();

        assert_eq!(result.action, FormAction::Create);
    }

    #[tokio::test]
    async fn no_action_with_forced_type_shows_create() {
        let mut settings = settings();
        settings.policy.force_type = Some(MembershipTypeId::new(2).unwrap());

        let result = handler_with(vec![], settings).handle(query(None)).await.unwrap();

        assert_eq!(result.action, FormAction::Create);
    }

    #[tokio::test]
    async fn no_action_once_filling_started_shows_create() {
        let mut q = query(None);
        q.form.lastname = Some("Lee".to_string());

        let result = handler_with(vec![], settings()).handle(q).await.unwrap();

        assert_eq!(result.action, FormAction::Create);
    }

    #[tokio::test]
    async fn unknown_action_counts_as_absent() {
        let result = handler_with(vec![], settings())
            .handle(query(Some("delete")))
            .await
            .unwrap();
        assert_eq!(result.action, FormAction::Table);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Renewal Links
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn valid_renewal_link_attaches_member_and_renews() {
        let (m, token) = member_with_token(10);
        let mut q = query(None);
        q.reference = Some("12".to_string());
        q.url_token = Some(token);

        let result = handler_with(vec![m.clone()], settings()).handle(q).await.unwrap();

        assert_eq!(result.action, FormAction::Renew);
        assert_eq!(result.member.map(|found| found.id), Some(m.id));
        assert!(result.errors.is_empty());
        assert_eq!(result.form.lastname.as_deref(), Some("Lee"));
        assert_eq!(result.form.typeid.as_deref(), Some("3"));
    }

    #[tokio::test]
    async fn wrong_token_falls_back_to_identify() {
        let (m, _) = member_with_token(10);
        let mut q = query(Some("renew"));
        q.reference = Some("12".to_string());
        q.url_token = Some("not-the-token".to_string());

        let result = handler_with(vec![m], settings()).handle(q).await.unwrap();

        assert_eq!(result.action, FormAction::Identify);
        assert!(result.member.is_none());
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].field, "urltoken");
        assert!(result.errors[0].message.contains("action=identify"));
        assert!(result.errors[0].message.contains("board@river.example"));
    }

    #[tokio::test]
    async fn expired_token_falls_back_to_identify() {
        let mut m = member(12, 3, "ann@example.org");
        let token = RenewalToken::generate(1, Timestamp::now().add_days(-5));
        let value = token.value().to_string();
        m.renewal_token = Some(token);
        let mut q = query(Some("renew"));
        q.reference = Some("12".to_string());
        q.url_token = Some(value);

        let result = handler_with(vec![m], settings()).handle(q).await.unwrap();

        assert_eq!(result.action, FormAction::Identify);
        assert!(result.member.is_none());
    }

    #[tokio::test]
    async fn unknown_reference_falls_back_to_identify() {
        let mut q = query(Some("renew"));
        q.reference = Some("99".to_string());
        q.url_token = Some("whatever".to_string());

        let result = handler_with(vec![], settings()).handle(q).await.unwrap();

        assert_eq!(result.action, FormAction::Identify);
    }

    #[tokio::test]
    async fn member_action_without_reference_falls_back_to_identify() {
        let result = handler_with(vec![], settings())
            .handle(query(Some("update_confirm")))
            .await
            .unwrap();

        assert_eq!(result.action, FormAction::Identify);
        assert_eq!(result.errors.len(), 1);
    }

    #[tokio::test]
    async fn member_of_another_entity_is_not_attached() {
        let (mut m, token) = member_with_token(10);
        m.entity = 2;
        let mut q = query(Some("renew"));
        q.reference = Some("12".to_string());
        q.url_token = Some(token);

        let result = handler_with(vec![m], settings()).handle(q).await.unwrap();

        assert_eq!(result.action, FormAction::Identify);
    }

    #[tokio::test]
    async fn update_button_turns_renewal_into_update() {
        let (m, token) = member_with_token(10);
        let mut q = query(Some("renew_add"));
        q.reference = Some("12".to_string());
        q.url_token = Some(token);
        q.submit_update = true;

        let result = handler_with(vec![m], settings()).handle(q).await.unwrap();

        assert_eq!(result.action, FormAction::UpdateConfirm);
    }

    #[tokio::test]
    async fn posted_values_win_over_stored_ones() {
        let (m, token) = member_with_token(10);
        let mut q = query(Some("renew"));
        q.reference = Some("12".to_string());
        q.url_token = Some(token);
        q.form.town = Some("Lyon".to_string());

        let result = handler_with(vec![m], settings()).handle(q).await.unwrap();

        assert_eq!(result.form.town.as_deref(), Some("Lyon"));
        assert_eq!(result.form.email.as_deref(), Some("ann@example.org"));
    }

    #[tokio::test]
    async fn posted_values_are_kept_apart_from_stored_ones() {
        let (m, token) = member_with_token(10);
        let mut q = query(Some("renew_add"));
        q.reference = Some("12".to_string());
        q.url_token = Some(token);
        q.form.town = Some("Lyon".to_string());

        let result = handler_with(vec![m], settings()).handle(q).await.unwrap();

        assert_eq!(result.form.lastname.as_deref(), Some("Lee"));
        assert_eq!(result.posted.lastname, None);
        assert_eq!(result.posted.typeid, None);
        assert_eq!(result.posted.town.as_deref(), Some("Lyon"));
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Store Failures
    // ════════════════════════════════════════════════════════════════════════════

    struct FailingStore;

    #[async_trait]
    impl MemberStore for FailingStore {
        async fn begin(&self) -> Result<Box<dyn crate::ports::MemberUnitOfWork>, DomainError> {
            Err(DomainError::database("unavailable"))
        }

        async fn find_by_id(&self, _id: MemberId) -> Result<Option<Member>, DomainError> {
            Err(DomainError::new(ErrorCode::DatabaseError, "connection reset"))
        }

        async fn find_latest_by_email(
            &self,
            _email: &str,
            _entity: i32,
        ) -> Result<Option<Member>, DomainError> {
            Ok(None)
        }

        async fn store_renewal_token(
            &self,
            _id: MemberId,
            _token: &RenewalToken,
        ) -> Result<(), DomainError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn store_failure_while_loading_member_is_an_error() {
        let handler = ResolvePageHandler::new(Arc::new(FailingStore), Arc::new(settings()));
        let mut q = query(Some("renew"));
        q.reference = Some("12".to_string());

        let result = handler.handle(q).await;

        assert!(matches!(result, Err(MembershipError::Infrastructure(_))));
    }
}
