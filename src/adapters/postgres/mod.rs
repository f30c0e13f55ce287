//! PostgreSQL adapters - Database implementations for store ports.
//!
//! This module provides adapters for PostgreSQL-backed persistence:
//! - `PostgresMemberStore` - Members, with transactional submissions
//! - `PostgresMembershipTypeReader` - Read-only membership type queries

mod member_store;
mod membership_type_reader;

pub use member_store::{PostgresMemberStore, PostgresUnitOfWork};
pub use membership_type_reader::PostgresMembershipTypeReader;
