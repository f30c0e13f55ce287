//! HTTP adapters - Server-rendered pages.

pub mod signup;

// Re-export key types for convenience
pub use signup::signup_router;
pub use signup::SignupAppState;
