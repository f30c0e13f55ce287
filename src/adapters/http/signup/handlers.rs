//! HTTP handlers for the public membership form.
//!
//! One controller serves every page: the resolved action decides whether to
//! list types, show a form, process a submission or show a completion page.

use std::sync::Arc;

use axum::extract::{Form, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Json;
use serde::Serialize;

use crate::application::handlers::signup::{
    IdentifyMemberCommand, IdentifyMemberHandler, IdentifyOutcome, ListMembershipTypesHandler,
    ListMembershipTypesQuery, NotificationDispatcher, ResolvePageHandler, ResolvePageResult,
    SignupSettings, SubmitMembershipCommand, SubmitMembershipHandler, SubmitOutcome,
};
use crate::domain::membership::{Member, MembershipType};
use crate::domain::signup::{messages, FieldError, FormAction, SignupForm};
use crate::ports::{EmailSender, MemberStore, MembershipTypeReader, PaymentLinkBuilder};

use super::dto::SignupParams;
use super::error::SignupApiError;
use super::views::{render_completion, render_form, render_table, FormPage};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state of the form routes.
#[derive(Clone)]
pub struct SignupAppState {
    pub members: Arc<dyn MemberStore>,
    pub membership_types: Arc<dyn MembershipTypeReader>,
    pub email_sender: Arc<dyn EmailSender>,
    /// Absent when online payment is not configured.
    pub payment_links: Option<Arc<dyn PaymentLinkBuilder>>,
    pub settings: Arc<SignupSettings>,
}

impl SignupAppState {
    pub fn resolve_page_handler(&self) -> ResolvePageHandler {
        ResolvePageHandler::new(self.members.clone(), self.settings.clone())
    }

    pub fn list_types_handler(&self) -> ListMembershipTypesHandler {
        ListMembershipTypesHandler::new(self.membership_types.clone())
    }

    pub fn submit_handler(&self) -> SubmitMembershipHandler {
        SubmitMembershipHandler::new(
            self.members.clone(),
            self.membership_types.clone(),
            self.payment_links.clone(),
            self.dispatcher(),
            self.settings.clone(),
        )
    }

    pub fn identify_handler(&self) -> IdentifyMemberHandler {
        IdentifyMemberHandler::new(
            self.members.clone(),
            self.membership_types.clone(),
            self.dispatcher(),
            self.settings.clone(),
        )
    }

    fn dispatcher(&self) -> NotificationDispatcher {
        NotificationDispatcher::new(self.email_sender.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Route Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// GET /public/members/new
pub async fn show_signup_page(
    State(state): State<SignupAppState>,
    Query(params): Query<SignupParams>,
) -> Result<Response, SignupApiError> {
    respond(&state, params).await
}

/// POST /public/members/new
pub async fn submit_signup_page(
    State(state): State<SignupAppState>,
    Query(query): Query<SignupParams>,
    Form(body): Form<SignupParams>,
) -> Result<Response, SignupApiError> {
    respond(&state, body.or(query)).await
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// GET /health
pub async fn health() -> (StatusCode, Json<HealthResponse>) {
    (StatusCode::OK, Json(HealthResponse { status: "ok" }))
}

// ════════════════════════════════════════════════════════════════════════════════
// Controller
// ════════════════════════════════════════════════════════════════════════════════

async fn respond(state: &SignupAppState, params: SignupParams) -> Result<Response, SignupApiError> {
    if !state.settings.policy.enable_public {
        return Err(SignupApiError::FormDisabled);
    }

    let entity = params.entity();
    let ResolvePageResult {
        action,
        member,
        form,
        posted,
        errors,
    } = state.resolve_page_handler().handle(params.to_query()).await?;

    tracing::debug!(action = %action, entity, "Serving membership form");

    match action {
        FormAction::Table => {
            let types = list_types(state, entity).await?;
            Ok(Html(render_table(&state.settings, &types, entity)).into_response())
        }

        FormAction::Identified => {
            let cmd = IdentifyMemberCommand {
                form: form.clone(),
                entity,
            };
            match state.identify_handler().handle(cmd).await? {
                IdentifyOutcome::Rejected { errors } => {
                    let page = PageRequest::new(&params, FormAction::Identify, &form)
                        .with_errors(errors);
                    form_page(state, page).await
                }
                IdentifyOutcome::Sent { email, .. } => Ok(Html(render_completion(
                    &messages::identification_sent(&email),
                ))
                .into_response()),
            }
        }

        action if action.is_submission() => {
            let cmd = SubmitMembershipCommand {
                action,
                form: posted,
                member: member.clone(),
                entity,
                backtopage: params.backtopage(),
            };
            match state.submit_handler().handle(cmd).await? {
                SubmitOutcome::Rejected { action, errors } => {
                    let page = PageRequest::new(&params, action, &form)
                        .with_member(member.as_ref())
                        .with_errors(errors);
                    form_page(state, page).await
                }
                SubmitOutcome::Unchanged { action, notice } => {
                    let page = PageRequest::new(&params, action, &form)
                        .with_member(member.as_ref())
                        .with_notice(notice);
                    form_page(state, page).await
                }
                SubmitOutcome::Completed { redirect_url, .. } => {
                    Ok(Redirect::to(&redirect_url).into_response())
                }
            }
        }

        action if action.is_completion_page() => {
            let message = completion_message(&state.settings, action, &form);
            Ok(Html(render_completion(&message)).into_response())
        }

        action => {
            let page = PageRequest::new(&params, action, &form)
                .with_member(member.as_ref())
                .with_errors(errors);
            form_page(state, page).await
        }
    }
}

fn completion_message(settings: &SignupSettings, action: FormAction, form: &SignupForm) -> String {
    match action {
        FormAction::Added => messages::subscription_saved(settings.organization.contact_email()),
        FormAction::RenewAdded => messages::RENEWAL_SAVED.to_string(),
        FormAction::Updated => messages::UPDATE_SAVED.to_string(),
        _ => messages::identification_sent(form.email.as_deref().unwrap_or_default()),
    }
}

async fn list_types(state: &SignupAppState, entity: i32) -> Result<Vec<MembershipType>, SignupApiError> {
    let result = state
        .list_types_handler()
        .handle(ListMembershipTypesQuery { entity })
        .await?;
    Ok(result.types)
}

/// A form page to render, before types are loaded.
struct PageRequest<'a> {
    params: &'a SignupParams,
    action: FormAction,
    form: &'a SignupForm,
    member: Option<&'a Member>,
    errors: Vec<FieldError>,
    notice: Option<String>,
}

impl<'a> PageRequest<'a> {
    fn new(params: &'a SignupParams, action: FormAction, form: &'a SignupForm) -> Self {
        Self {
            params,
            action,
            form,
            member: None,
            errors: Vec::new(),
            notice: None,
        }
    }

    fn with_member(mut self, member: Option<&'a Member>) -> Self {
        self.member = member;
        self
    }

    fn with_errors(mut self, errors: Vec<FieldError>) -> Self {
        self.errors = errors;
        self
    }

    fn with_notice(mut self, notice: String) -> Self {
        self.notice = Some(notice);
        self
    }
}

async fn form_page(state: &SignupAppState, request: PageRequest<'_>) -> Result<Response, SignupApiError> {
    let settings = &state.settings;
    let entity = request.params.entity();
    let types = list_types(state, entity).await?;

    let selected_id = request
        .form
        .effective_type(&settings.policy)
        .or_else(|| request.member.map(|m| m.type_id));
    let selected_type = match selected_id {
        Some(id) => match types.iter().find(|t| t.id == id) {
            Some(found) => Some(found.clone()),
            None => state.membership_types.find_by_id(id, entity).await?,
        },
        None => None,
    };

    let url_token = request.params.urltoken.as_deref();
    let backtopage = request.params.backtopage();
    let page = FormPage {
        action: request.action,
        form: request.form,
        member: request.member,
        url_token,
        types: &types,
        selected_type: selected_type.as_ref(),
        errors: &request.errors,
        notice: request.notice.as_deref(),
        hide_type: request.params.hide_type(),
        backtopage: backtopage.as_deref(),
        entity,
    };

    Ok(Html(render_form(settings, &page)).into_response())
}
