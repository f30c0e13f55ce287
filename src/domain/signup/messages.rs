//! Visitor-facing texts of the public form.

pub const EMAIL_REQUIRED: &str = "Email is required.";
pub const EMAIL_INVALID: &str = "Email address is not valid.";
pub const LOGIN_REQUIRED: &str = "Login is required.";
pub const PASSWORD_REQUIRED: &str = "Password is required.";
pub const PASSWORD_MISMATCH: &str = "The two passwords do not match.";
pub const TYPE_REQUIRED: &str = "Membership type is required.";
pub const TYPE_NOT_AVAILABLE: &str = "This membership type is no longer available.";
pub const CANNOT_EDIT_MEMBER_INFO: &str =
    "Member information cannot be edited while changing the membership type.";
pub const NATURE_REQUIRED: &str = "Member nature is required.";
pub const LASTNAME_REQUIRED: &str = "Last name is required.";
pub const FIRSTNAME_REQUIRED: &str = "First name is required.";
pub const BIRTH_INVALID: &str = "Date of birth is not valid.";
pub const TURNOVER_REQUIRED: &str = "Turnover or budget is required.";
pub const AMOUNT_INVALID: &str = "Amount is not valid.";
pub const NOTHING_TO_DO: &str = "Nothing to do: the information was already up to date.";

pub const NEW_SUBSCRIPTION_TITLE: &str = "New membership";
pub const RENEWAL_TITLE: &str = "Membership renewal";
pub const SUBMIT_NEW_LABEL: &str = "Get membership";
pub const SUBMIT_RENEW_LABEL: &str = "Renew membership";
pub const SUBMIT_UPDATE_LABEL: &str = "Update membership information";
pub const SUBMIT_IDENTIFY_LABEL: &str = "Send me a link";
pub const CANCEL_LABEL: &str = "Cancel";
pub const MEMBERSHIP_TYPES_TITLE: &str = "Membership types";
pub const CHOOSE_TYPE_LABEL: &str = "Choose";
pub const THANK_YOU_TITLE: &str = "Thank you";
pub const PUBLIC_FORM_DISABLED: &str = "The public membership form is not enabled.";

pub fn login_taken(login: &str) -> String {
    format!("Login {} is already used. Please choose another one.", login)
}

pub fn amount_below_minimum(minimum: &str) -> String {
    format!("The amount must be at least {}.", minimum)
}

pub fn invalid_renewal_link(identify_url: &str, organization_email: &str) -> String {
    let contact = if organization_email.is_empty() {
        String::new()
    } else {
        format!(" or contact {}", organization_email)
    };
    format!(
        "This renewal link is invalid or has expired. Request a new one at {}{}.",
        identify_url, contact
    )
}

pub fn new_subscription_intro(organization: &str, identify_url: &str, organization_email: &str) -> String {
    format!(
        "Use this form to become a member of {}. If you are already a member, request a renewal link at {}. For any question, contact {}.",
        organization, identify_url, organization_email
    )
}

pub fn renewal_intro(organization: &str, organization_email: &str) -> String {
    format!(
        "Use this form to renew your membership of {} or update your information. For any question, contact {}.",
        organization, organization_email
    )
}

pub fn membership_paid_until(end: &str) -> String {
    format!("Membership paid until {}.", end)
}

pub const PAYMENT_RECORDED_FOR_NEXT_PERIOD: &str =
    "A new payment will be recorded for the next period. Use the update button to change your information only.";

pub fn membership_expired_since(end: &str) -> String {
    format!("Membership expired since {}.", end)
}

pub const NO_END_DATE: &str = "no end date";

pub fn subscription_saved(organization_email: &str) -> String {
    format!(
        "Your membership request has been saved and will be reviewed. For any question, contact {}.",
        organization_email
    )
}

pub const RENEWAL_SAVED: &str = "Your membership renewal has been saved.";
pub const UPDATE_SAVED: &str = "Your membership information has been updated.";

pub fn identification_sent(email: &str) -> String {
    format!(
        "If a membership matches {}, an email has been sent to this address with further instructions.",
        email
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_renewal_link_mentions_both_ways_out() {
        let msg = invalid_renewal_link("https://x.org/new?action=identify", "board@x.org");
        assert!(msg.contains("https://x.org/new?action=identify"));
        assert!(msg.contains("board@x.org"));
    }

    #[test]
    fn invalid_renewal_link_without_contact() {
        let msg = invalid_renewal_link("https://x.org/new", "");
        assert!(!msg.contains("contact"));
    }

    #[test]
    fn login_taken_names_the_login() {
        assert!(login_taken("jdoe").contains("jdoe"));
    }
}
