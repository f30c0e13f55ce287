//! Member status state machine.
//!
//! The integer codes are the persisted form and match the values staff
//! tooling expects: -1 awaiting review, 1 active, 0 ended.

use crate::domain::foundation::{StateMachine, ValidationError};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a membership record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberStatus {
    /// Submitted through the public form, awaiting staff validation.
    Pending,

    /// Validated by staff.
    Active,

    /// Resiliated or ended.
    Expired,
}

impl MemberStatus {
    /// Returns the persisted integer code.
    pub fn code(&self) -> i16 {
        match self {
            MemberStatus::Pending => -1,
            MemberStatus::Active => 1,
            MemberStatus::Expired => 0,
        }
    }

    /// Decodes a persisted integer code.
    pub fn from_code(code: i16) -> Result<Self, ValidationError> {
        match code {
            -1 => Ok(MemberStatus::Pending),
            1 => Ok(MemberStatus::Active),
            0 => Ok(MemberStatus::Expired),
            other => Err(ValidationError::out_of_range("status", -1, 1, other as i64)),
        }
    }
}

impl StateMachine for MemberStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use MemberStatus::*;
        matches!(
            (self, target),
            (Pending, Active) | (Pending, Expired) | (Active, Expired) | (Expired, Active)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use MemberStatus::*;
        match self {
            Pending => vec![Active, Expired],
            Active => vec![Expired],
            Expired => vec![Active],
        }
    }
}
