//! Membership domain module.
//!
//! Members, membership types and the values attached to them.
//!
//! # Module Structure
//!
//! - `aggregate` - Member aggregate and the data a submission carries
//! - `status` - MemberStatus state machine
//! - `member_type` - MembershipType read model
//! - `duration` - membership period lengths
//! - `renewal_token` - secrets for renewal links

mod aggregate;
mod duration;
mod errors;
mod member_type;
mod nature;
mod password;
mod renewal_token;
mod status;

pub use aggregate::{Member, MemberCredentials, MemberDetails, MemberProfile, NewMember};
pub use duration::{end_of_first_period, DurationUnit, MembershipDuration};
pub use errors::MembershipError;
pub use member_type::MembershipType;
pub use nature::LegalNature;
pub use password::PasswordHash;
pub use renewal_token::{RenewalToken, RENEWAL_TOKEN_LENGTH};
pub use status::MemberStatus;
