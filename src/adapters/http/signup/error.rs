//! Error pages of the public membership form.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use crate::domain::foundation::DomainError;
use crate::domain::membership::MembershipError;
use crate::domain::signup::messages;

use super::views::render_error;

/// Errors that end a form request with an error page.
#[derive(Debug)]
pub enum SignupApiError {
    /// The public form is switched off.
    FormDisabled,
    Membership(MembershipError),
}

impl From<MembershipError> for SignupApiError {
    fn from(err: MembershipError) -> Self {
        Self::Membership(err)
    }
}

impl From<DomainError> for SignupApiError {
    fn from(err: DomainError) -> Self {
        Self::Membership(MembershipError::from(err))
    }
}

impl SignupApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            SignupApiError::FormDisabled => StatusCode::FORBIDDEN,
            SignupApiError::Membership(err) => match err {
                MembershipError::NotFound(_) | MembershipError::TypeNotFound(_) => {
                    StatusCode::NOT_FOUND
                }
                MembershipError::LoginTaken(_) | MembershipError::InvalidState { .. } => {
                    StatusCode::CONFLICT
                }
                MembershipError::ValidationFailed { .. } => StatusCode::BAD_REQUEST,
                MembershipError::Infrastructure(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for SignupApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            SignupApiError::FormDisabled => messages::PUBLIC_FORM_DISABLED.to_string(),
            SignupApiError::Membership(err) if err.code().is_infrastructure() => {
                tracing::error!(error = %err, code = %err.code(), "Membership form request failed");
                "An internal error occurred. Please try again later.".to_string()
            }
            SignupApiError::Membership(err) => err.to_string(),
        };

        let title = status.canonical_reason().unwrap_or("Error");
        (status, Html(render_error(title, &message))).into_response()
    }
}
