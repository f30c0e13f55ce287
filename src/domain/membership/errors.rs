//! Errors raised while serving the public membership form.
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | NotFound, TypeNotFound | 404 |
//! | LoginTaken, InvalidState | 409 |
//! | ValidationFailed | 400 |
//! | Infrastructure | 500 |
//!
//! Problems the visitor can fix are reported as field errors on the page
//! instead; these errors end the request.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, MemberId, MembershipTypeId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MembershipError {
    #[error("Member not found: {0}")]
    NotFound(MemberId),

    /// Unknown, closed or belonging to another entity.
    #[error("Membership type {0} is not available")]
    TypeNotFound(MembershipTypeId),

    #[error("Login {0} is already used by another member")]
    LoginTaken(String),

    /// The resolved page does not allow the requested step.
    #[error("Cannot {attempted} from the {current} page")]
    InvalidState { current: String, attempted: String },

    #[error("Validation failed for '{field}': {message}")]
    ValidationFailed { field: String, message: String },

    #[error("Error: {0}")]
    Infrastructure(String),
}

impl MembershipError {
    pub fn invalid_state(current: impl Into<String>, attempted: impl Into<String>) -> Self {
        MembershipError::InvalidState {
            current: current.into(),
            attempted: attempted.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            MembershipError::NotFound(_) => ErrorCode::MemberNotFound,
            MembershipError::TypeNotFound(_) => ErrorCode::MembershipTypeNotFound,
            MembershipError::LoginTaken(_) => ErrorCode::LoginAlreadyExists,
            MembershipError::InvalidState { .. } => ErrorCode::InvalidStateTransition,
            MembershipError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            MembershipError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }
}

fn detail(err: &DomainError, key: &str) -> String {
    err.details
        .get(key)
        .cloned()
        .unwrap_or_else(|| "unknown".to_string())
}

impl From<DomainError> for MembershipError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::MemberNotFound => match detail(&err, "id").parse() {
                Ok(id) => MembershipError::NotFound(id),
                Err(_) => MembershipError::Infrastructure(err.to_string()),
            },
            ErrorCode::MembershipTypeNotFound => match detail(&err, "id").parse() {
                Ok(id) => MembershipError::TypeNotFound(id),
                Err(_) => MembershipError::Infrastructure(err.to_string()),
            },
            ErrorCode::LoginAlreadyExists => MembershipError::LoginTaken(detail(&err, "login")),
            ErrorCode::InvalidStateTransition => MembershipError::InvalidState {
                current: detail(&err, "current"),
                attempted: err.message,
            },
            ErrorCode::ValidationFailed
            | ErrorCode::EmptyField
            | ErrorCode::OutOfRange
            | ErrorCode::InvalidFormat => MembershipError::ValidationFailed {
                field: detail(&err, "field"),
                message: err.message,
            },
            _ => MembershipError::Infrastructure(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{StateMachine, ValidationError};
    use crate::domain::signup::FormAction;

    #[test]
    fn codes_per_variant() {
        let member = MemberId::new(42).unwrap();
        let ty = MembershipTypeId::new(9).unwrap();

        assert_eq!(MembershipError::NotFound(member).code(), ErrorCode::MemberNotFound);
        assert_eq!(
            MembershipError::TypeNotFound(ty).code(),
            ErrorCode::MembershipTypeNotFound
        );
        assert_eq!(
            MembershipError::LoginTaken("jdoe".into()).code(),
            ErrorCode::LoginAlreadyExists
        );
        assert_eq!(
            MembershipError::Infrastructure("down".into()).code(),
            ErrorCode::DatabaseError
        );
    }

    #[test]
    fn messages_read_naturally() {
        assert_eq!(
            MembershipError::invalid_state("table", "update").to_string(),
            "Cannot update from the table page"
        );
        assert!(MembershipError::TypeNotFound(MembershipTypeId::new(9).unwrap())
            .to_string()
            .contains('9'));
    }

    #[test]
    fn login_conflict_keeps_login() {
        let domain_err = DomainError::new(ErrorCode::LoginAlreadyExists, "duplicate login")
            .with_detail("login", "jdoe");
        let err: MembershipError = domain_err.into();
        assert_eq!(err, MembershipError::LoginTaken("jdoe".to_string()));
    }

    #[test]
    fn validation_keeps_field() {
        let err: MembershipError = DomainError::validation("zipcode", "too long").into();
        assert_eq!(
            err,
            MembershipError::ValidationFailed {
                field: "zipcode".to_string(),
                message: "too long".to_string(),
            }
        );
    }

    #[test]
    fn refused_page_transition_is_invalid_state() {
        let refused: ValidationError = FormAction::Table
            .transition_to(FormAction::UpdateConfirm)
            .unwrap_err();
        let err: MembershipError = DomainError::from(refused).into();
        assert!(matches!(err, MembershipError::InvalidState { .. }));
    }

    #[test]
    fn not_found_reads_id_detail() {
        let err: MembershipError = DomainError::new(ErrorCode::MemberNotFound, "gone")
            .with_detail("id", "42")
            .into();
        assert_eq!(err, MembershipError::NotFound(MemberId::new(42).unwrap()));
    }

    #[test]
    fn database_errors_become_infrastructure() {
        let err: MembershipError = DomainError::database("pool timed out").into();
        assert!(matches!(err, MembershipError::Infrastructure(_)));
    }
}
