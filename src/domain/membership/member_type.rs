//! Membership types offered by the organization.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{MembershipTypeId, Money, Timestamp};

use super::duration::end_of_first_period;
use super::{LegalNature, MembershipDuration};

/// A kind of membership (e.g. "Student", "Sponsor"). Read-only for the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipType {
    pub id: MembershipTypeId,
    pub entity: i32,
    pub label: String,
    /// Suggested subscription amount.
    pub amount: Option<Money>,
    /// Whether the visitor may change the suggested amount.
    pub can_edit_amount: bool,
    pub subscription_required: bool,
    pub vote_allowed: bool,
    /// `None` means both natures are accepted.
    pub nature: Option<LegalNature>,
    pub duration: Option<MembershipDuration>,
    /// Offered on the public form.
    pub open: bool,
    /// Extra text appended to the member confirmation email.
    pub mail_on_valid: Option<String>,
    /// Number of active members of this type.
    pub member_count: i64,
}

impl MembershipType {
    /// End of the first period for a membership starting at `start`.
    pub fn end_of_period(&self, start: Timestamp) -> Timestamp {
        end_of_first_period(self.duration, start)
    }

    /// Amount shown on the type table: the larger of the type's amount and
    /// the configured minimum.
    pub fn displayed_amount(&self, min_amount: Option<Money>) -> Money {
        let own = self.amount.unwrap_or(Money::ZERO);
        match min_amount {
            Some(min) if min > own => min,
            _ => own,
        }
    }

    /// Label of the accepted natures, for display.
    pub fn nature_label(&self) -> &'static str {
        match self.nature {
            Some(nature) => nature.label(),
            None => "Individual and organization",
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn membership_type(id: i64) -> MembershipType {
        MembershipType {
            id: MembershipTypeId::new(id).unwrap(),
            entity: 1,
            label: format!("Type {}", id),
            amount: Some(Money::from_cents(2000).unwrap()),
            can_edit_amount: false,
            subscription_required: true,
            vote_allowed: true,
            nature: None,
            duration: Some(MembershipDuration::one_year()),
            open: true,
            mail_on_valid: None,
            member_count: 0,
        }
    }
}
