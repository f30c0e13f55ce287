//! Member Signup - Public membership subscription and renewal form
//!
//! This crate serves the public page through which visitors join an
//! association, renew their membership from an emailed link, or ask for
//! such a link by email.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
