//! Email adapters.

mod resend_sender;

pub use resend_sender::{ResendConfig, ResendEmailSender};
