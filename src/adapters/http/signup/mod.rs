//! HTTP adapter for the public membership form.
//!
//! Exposes the signup handlers as server-rendered pages:
//! - `GET /public/members/new` - Type table, forms and completion pages
//! - `POST /public/members/new` - Subscriptions, renewals, updates and
//!   identification requests
//! - `GET /health` - Liveness check

pub mod dto;
mod error;
mod handlers;
mod routes;
pub mod views;

pub use dto::SignupParams;
pub use error::SignupApiError;
pub use handlers::{HealthResponse, SignupAppState};
pub use routes::{signup_router, signup_routes, SIGNUP_PATH};
