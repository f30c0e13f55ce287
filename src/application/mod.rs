//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Following CQRS, it separates command handlers (write) from query handlers (read).

pub mod handlers;

pub use handlers::{
    // Commands
    IdentifyMemberCommand, IdentifyMemberHandler, IdentifyOutcome,
    SubmitMembershipCommand, SubmitMembershipHandler, SubmitOutcome,
    // Queries
    ListMembershipTypesHandler, ListMembershipTypesQuery, ListMembershipTypesResult,
    ResolvePageHandler, ResolvePageQuery, ResolvePageResult,
    // Shared
    NotificationComposer, NotificationDispatcher, SignupSettings,
};
