//! Where the visitor goes after a successful submission.

use crate::domain::foundation::Money;

use super::{FormAction, SignupPolicy};

/// Request for the online payment page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRequest {
    /// Member reference the payment is for.
    pub reference: String,
    pub amount: Money,
    pub email: Option<String>,
    /// Preselected payment method; `None` offers every method.
    pub method: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectTarget {
    /// The page the visitor came from.
    ReturnUrl(String),
    /// Organization-wide landing page.
    Configured(String),
    /// Online payment for the posted amount.
    Payment(PaymentRequest),
    /// Completion page of the form itself.
    Completion(FormAction),
}

/// Facts about a committed submission that steer the redirect.
#[derive(Debug, Clone, Copy)]
pub struct RedirectInput<'a> {
    pub action: FormAction,
    pub backtopage: Option<&'a str>,
    pub reference: &'a str,
    pub amount: Option<Money>,
    pub email: Option<&'a str>,
}

/// Picks the redirect; the first applicable option wins:
/// return URL, configured URL, payment page, completion page.
pub fn select_redirect(policy: &SignupPolicy, input: &RedirectInput<'_>) -> RedirectTarget {
    if let Some(url) = input.backtopage.filter(|u| !u.trim().is_empty()) {
        return RedirectTarget::ReturnUrl(url.to_string());
    }
    if let Some(url) = policy.redirect_url.as_deref().filter(|u| !u.trim().is_empty()) {
        return RedirectTarget::Configured(url.to_string());
    }

    let payable = input.amount.filter(Money::is_positive);
    if let Some(amount) = payable {
        if policy.online_payment.is_enabled() && input.action != FormAction::UpdateConfirm {
            return RedirectTarget::Payment(PaymentRequest {
                reference: input.reference.to_string(),
                amount,
                email: input.email.map(str::to_string),
                method: policy.online_payment.method().map(str::to_string),
            });
        }
    }

    RedirectTarget::Completion(input.action.completed().unwrap_or(FormAction::Identify))
}
