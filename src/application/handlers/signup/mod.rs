//! Signup handlers.
//!
//! Command and query handlers behind the public membership form:
//!
//! ## Commands
//! - Submitting a new membership, a renewal or an information update
//! - Requesting a renewal link by email
//!
//! ## Queries
//! - Resolving the page a request is for
//! - Listing the membership types offered publicly

mod identify_member;
mod list_membership_types;
mod notification;
mod resolve_page;
mod settings;
mod submit_membership;

// Commands
pub use identify_member::{IdentifyMemberCommand, IdentifyMemberHandler, IdentifyOutcome};
pub use submit_membership::{SubmitMembershipCommand, SubmitMembershipHandler, SubmitOutcome};

// Queries
pub use list_membership_types::{
    ListMembershipTypesHandler, ListMembershipTypesQuery, ListMembershipTypesResult,
};
pub use resolve_page::{ResolvePageHandler, ResolvePageQuery, ResolvePageResult};

// Shared
pub use notification::{NotificationComposer, NotificationDispatcher};
pub use settings::SignupSettings;
