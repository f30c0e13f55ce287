//! Member aggregate entity.
//!
//! A member is created by the public form in `Pending` status and may later
//! be revised through a renewal link. This component never deletes members.
//!
//! # Design Decisions
//!
//! - **Money in cents**: amounts are `Money`, never floats
//! - **Type is fixed**: revisions keep the membership type; changing it is a
//!   staff operation
//! - **No de-duplication**: two identical submissions create two records

use chrono::NaiveDateTime;

use crate::domain::foundation::{MemberId, MembershipTypeId, Money, Timestamp};

use super::{LegalNature, MemberStatus, MembershipType, PasswordHash, RenewalToken};

/// Contact and profile fields a visitor may edit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberProfile {
    pub civility: Option<String>,
    pub firstname: String,
    pub lastname: String,
    pub gender: Option<String>,
    pub company: Option<String>,
    pub address: Option<String>,
    pub zip: Option<String>,
    pub town: Option<String>,
    pub country_code: Option<String>,
    pub state_id: Option<i32>,
    pub email: Option<String>,
    pub birth: Option<NaiveDateTime>,
    pub photo: Option<String>,
    pub public: bool,
    pub note_private: Option<String>,
    /// Declared yearly turnover of an organization.
    pub budget: Option<i64>,
}

/// Login credentials, present when the form requires a login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberCredentials {
    pub login: String,
    pub password_hash: Option<PasswordHash>,
}

/// Everything a submission sets on a member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberDetails {
    pub nature: LegalNature,
    pub profile: MemberProfile,
    pub credentials: Option<MemberCredentials>,
    pub amount: Option<Money>,
}

/// A member about to be inserted; the database assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMember {
    pub entity: i32,
    pub status: MemberStatus,
    pub type_id: MembershipTypeId,
    pub nature: LegalNature,
    pub profile: MemberProfile,
    pub credentials: Option<MemberCredentials>,
    pub amount: Option<Money>,
    pub end_date: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl NewMember {
    /// Registers a new membership request of the given type.
    ///
    /// The record starts `Pending` and its first period ends according to
    /// the type's duration.
    pub fn register(entity: i32, membership_type: &MembershipType, details: MemberDetails, now: Timestamp) -> Self {
        Self {
            entity,
            status: MemberStatus::Pending,
            type_id: membership_type.id,
            nature: details.nature,
            profile: details.profile,
            credentials: details.credentials,
            amount: details.amount,
            end_date: Some(membership_type.end_of_period(now)),
            created_at: now,
        }
    }

    /// Materializes the stored member once the id is known.
    pub fn into_member(self, id: MemberId) -> Member {
        Member {
            id,
            entity: self.entity,
            status: self.status,
            type_id: self.type_id,
            nature: self.nature,
            profile: self.profile,
            credentials: self.credentials,
            amount: self.amount,
            end_date: self.end_date,
            renewal_token: None,
            created_at: self.created_at,
            updated_at: self.created_at,
        }
    }
}

/// A stored membership record.
///
/// # Invariants
///
/// - `id` is assigned by the store and never changes
/// - `type_id`, `status` and `created_at` are not changed by visitor revisions
/// - a renewal token is honored only while unexpired
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub id: MemberId,
    pub entity: i32,
    pub status: MemberStatus,
    pub type_id: MembershipTypeId,
    pub nature: LegalNature,
    pub profile: MemberProfile,
    pub credentials: Option<MemberCredentials>,
    pub amount: Option<Money>,
    /// End of the current membership period.
    pub end_date: Option<Timestamp>,
    pub renewal_token: Option<RenewalToken>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Member {
    /// Public reference of the record, used in links and payment requests.
    pub fn reference(&self) -> String {
        self.id.to_string()
    }

    pub fn login(&self) -> Option<&str> {
        self.credentials.as_ref().map(|c| c.login.as_str())
    }

    /// First and last name joined by a space, skipping blanks.
    pub fn full_name(&self) -> String {
        [self.profile.firstname.trim(), self.profile.lastname.trim()]
            .iter()
            .filter(|part| !part.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// True when the membership period has ended.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.end_date.map_or(false, |end| end.is_before(&now))
    }

    /// Checks a renewal link's token against the stored one.
    pub fn accepts_renewal_token(&self, candidate: &str, now: Timestamp) -> bool {
        self.renewal_token
            .as_ref()
            .map_or(false, |token| token.is_valid_for(candidate, now))
    }

    /// Returns the current renewal token, issuing a new one when none is
    /// valid. The flag tells whether a new token was issued.
    pub fn ensure_renewal_token(&mut self, ttl_days: u32, now: Timestamp) -> (RenewalToken, bool) {
        if let Some(token) = self.renewal_token.as_ref().filter(|t| !t.is_expired(now)) {
            return (token.clone(), false);
        }
        let token = RenewalToken::generate(ttl_days, now);
        self.renewal_token = Some(token.clone());
        (token, true)
    }

    /// Overwrites the visitor-editable fields.
    ///
    /// Credentials and amount are kept when the submission carries none.
    pub fn revise(&mut self, details: MemberDetails, now: Timestamp) {
        self.nature = details.nature;
        self.profile = details.profile;
        if details.credentials.is_some() {
            self.credentials = details.credentials;
        }
        if details.amount.is_some() {
            self.amount = details.amount;
        }
        self.updated_at = now;
    }

    /// True when both records carry the same editable content.
    pub fn same_content_as(&self, other: &Member) -> bool {
        self.nature == other.nature
            && self.profile == other.profile
            && self.credentials == other.credentials
            && self.amount == other.amount
    }
}
