//! Checked transitions for status-like enums.
//!
//! Member statuses and the public form's page flow both implement
//! [`StateMachine`], so a move between two states is always validated the
//! same way and reported as a [`ValidationError`].

use super::ValidationError;

/// An enum whose values may only follow declared transitions.
///
/// ```ignore
/// let status = MemberStatus::Pending.transition_to(MemberStatus::Active)?;
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    fn can_transition_to(&self, target: &Self) -> bool;

    /// States reachable from this one.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Moves to `target`, or fails with a `state_transition` error.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if !self.can_transition_to(&target) {
            return Err(ValidationError::invalid_format(
                super::errors::STATE_TRANSITION_FIELD,
                format!("{:?} cannot move to {:?}", self, target),
            ));
        }
        Ok(target)
    }

    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}
