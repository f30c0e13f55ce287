//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `membership` - Members, membership types and their lifecycle
//! - `signup` - Public subscription form flow, validation and redirects

pub mod foundation;
pub mod membership;
pub mod signup;
