//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Persistence Ports
//!
//! - `MemberStore` - Member lookups and transactional writes
//! - `MembershipTypeReader` - Read access to membership types
//!
//! ## Outbound Ports
//!
//! - `EmailSender` - Delivery of notification emails
//! - `PaymentLinkBuilder` - Links to the online payment page

mod email_sender;
mod member_store;
mod membership_type_reader;
mod payment_link_builder;

pub use email_sender::{EmailError, EmailMessage, EmailSender};
pub use member_store::{MemberStore, MemberUnitOfWork};
pub use membership_type_reader::MembershipTypeReader;
pub use payment_link_builder::PaymentLinkBuilder;
