//! Axum router configuration for the public membership form.

use axum::{routing::get, Router};

use super::handlers::{health, show_signup_page, submit_signup_page, SignupAppState};

/// Path of the form controller.
pub const SIGNUP_PATH: &str = "/public/members/new";

/// Create the public form router.
///
/// # Routes
/// - `GET /public/members/new` - Show the page named by `action`
/// - `POST /public/members/new` - Process a submission
pub fn signup_routes() -> Router<SignupAppState> {
    Router::new().route(SIGNUP_PATH, get(show_signup_page).post(submit_signup_page))
}

/// Create the complete application router, health check included.
///
/// # Example
///
/// ```ignore
/// let app = signup_router().with_state(app_state);
/// ```
pub fn signup_router() -> Router<SignupAppState> {
    signup_routes().route("/health", get(health))
}
