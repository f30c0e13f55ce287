//! In-memory adapters for tests and database-less local runs.

mod email_sender;
mod member_store;
mod membership_type_reader;

pub use email_sender::RecordingEmailSender;
pub use member_store::{InMemoryMemberStore, InMemoryUnitOfWork};
pub use membership_type_reader::InMemoryMembershipTypeReader;
