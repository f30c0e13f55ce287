//! Public subscription form domain.
//!
//! # Module Structure
//!
//! - `action` - FormAction page flow
//! - `form` - posted values and how they merge with a stored member
//! - `validation` - accumulating submission checks
//! - `redirect` - post-submission redirect selection
//! - `template` - email templates and token substitution
//! - `links` - absolute links back to the form

mod action;
mod form;
mod links;
pub mod messages;
mod organization;
mod policy;
mod redirect;
mod template;
mod validation;

pub use action::FormAction;
pub use form::{BirthFields, SignupForm};
pub use links::{SignupLinks, DEFAULT_ENTITY};
pub use organization::OrganizationProfile;
pub use policy::{AmountField, OnlinePayment, SignupPolicy};
pub use redirect::{select_redirect, PaymentRequest, RedirectInput, RedirectTarget};
pub use template::{EmailTemplate, Substitutions, TemplateSet};
pub use validation::{
    is_valid_email, validate_identification, validate_submission, FieldError, SubmissionContext,
};
