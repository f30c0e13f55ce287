//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the application to external systems:
//! - `postgres` - Member and membership type storage
//! - `memory` - In-memory storage and email capture for tests and local runs
//! - `email` - Email delivery through the Resend API
//! - `payment` - Online payment page links
//! - `http` - The public form pages

pub mod email;
pub mod http;
pub mod memory;
pub mod payment;
pub mod postgres;

pub use email::{ResendConfig, ResendEmailSender};
pub use memory::{InMemoryMemberStore, InMemoryMembershipTypeReader, RecordingEmailSender};
pub use payment::OnlinePaymentLinks;
pub use postgres::{PostgresMemberStore, PostgresMembershipTypeReader};
