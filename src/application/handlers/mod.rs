//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod signup;

pub use signup::{
    IdentifyMemberCommand, IdentifyMemberHandler, IdentifyOutcome, ListMembershipTypesHandler,
    ListMembershipTypesQuery, ListMembershipTypesResult, NotificationComposer,
    NotificationDispatcher, ResolvePageHandler, ResolvePageQuery, ResolvePageResult,
    SignupSettings, SubmitMembershipCommand, SubmitMembershipHandler, SubmitOutcome,
};
