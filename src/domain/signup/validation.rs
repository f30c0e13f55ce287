//! Validation of form submissions.
//!
//! Every rule runs; the visitor sees all problems at once.

use crate::domain::membership::{
    LegalNature, Member, MemberCredentials, MemberDetails, MemberProfile, MembershipType,
    PasswordHash,
};

use super::{messages, FormAction, SignupForm, SignupPolicy};

/// One problem with the submitted form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// What a submission is checked against.
#[derive(Debug, Clone, Copy)]
pub struct SubmissionContext<'a> {
    pub action: FormAction,
    pub policy: &'a SignupPolicy,
    /// Member reached through a renewal link.
    pub member: Option<&'a Member>,
    /// The selected membership type, when it exists.
    pub membership_type: Option<&'a MembershipType>,
}

/// Loose syntactic check: one `@`, a local part, a dotted domain, no spaces.
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

fn check_email(form: &SignupForm, required: bool, errors: &mut Vec<FieldError>) {
    match form.email.as_deref() {
        None if required => errors.push(FieldError::new("email", messages::EMAIL_REQUIRED)),
        Some(email) if !is_valid_email(email) => {
            errors.push(FieldError::new("email", messages::EMAIL_INVALID))
        }
        _ => {}
    }
}

/// Validates an `add`, `renew_add` or `update_confirm` submission and
/// returns the member data to store.
///
/// Login uniqueness needs the store and is checked by the caller.
pub fn validate_submission(
    form: &SignupForm,
    ctx: &SubmissionContext<'_>,
) -> Result<MemberDetails, Vec<FieldError>> {
    let policy = ctx.policy;
    let mut errors = Vec::new();

    check_email(form, policy.mail_required, &mut errors);

    if policy.login_required() {
        if form.login.is_none() {
            errors.push(FieldError::new("login", messages::LOGIN_REQUIRED));
        }
        match (form.pass1.as_deref(), form.pass2.as_deref()) {
            (Some(p1), Some(p2)) if !p1.is_empty() && !p2.is_empty() => {
                if p1 != p2 {
                    errors.push(FieldError::new("pass2", messages::PASSWORD_MISMATCH));
                }
            }
            _ => errors.push(FieldError::new("pass1", messages::PASSWORD_REQUIRED)),
        }
        if form.email.is_none() && !policy.mail_required {
            errors.push(FieldError::new("email", messages::EMAIL_REQUIRED));
        }
    }

    let type_id = form.effective_type(policy);
    match type_id {
        None => errors.push(FieldError::new("typeid", messages::TYPE_REQUIRED)),
        Some(type_id) => {
            if ctx.action == FormAction::UpdateConfirm
                && ctx.member.map_or(false, |m| m.type_id != type_id)
            {
                errors.push(FieldError::new("typeid", messages::CANNOT_EDIT_MEMBER_INFO));
            }
            if ctx.action == FormAction::Add
                && !ctx
                    .membership_type
                    .map_or(false, |t| t.id == type_id && t.open)
            {
                errors.push(FieldError::new("typeid", messages::TYPE_NOT_AVAILABLE));
            }
        }
    }

    let nature = form.effective_nature(policy);
    if nature.is_none() {
        errors.push(FieldError::new("morphy", messages::NATURE_REQUIRED));
    }

    if form.lastname.is_none() {
        errors.push(FieldError::new("lastname", messages::LASTNAME_REQUIRED));
    }
    if form.firstname.is_none() {
        errors.push(FieldError::new("firstname", messages::FIRSTNAME_REQUIRED));
    }

    let birth = if form.birth.month_supplied() {
        match form.birth.to_datetime() {
            Ok(birth) => birth,
            Err(_) => {
                errors.push(FieldError::new("birth", messages::BIRTH_INVALID));
                None
            }
        }
    } else {
        None
    };

    if policy.show_turnover
        && nature == Some(LegalNature::Organization)
        && form.budget_value().is_none()
    {
        errors.push(FieldError::new("budget", messages::TURNOVER_REQUIRED));
    }

    let amount = match form.posted_amount() {
        Ok(Some(amount)) => {
            if let Some(min) = policy.min_amount.filter(|min| amount < *min) {
                errors.push(FieldError::new(
                    "amount",
                    messages::amount_below_minimum(&min.to_string()),
                ));
            }
            Some(amount)
        }
        Ok(None) => None,
        Err(_) => {
            errors.push(FieldError::new("amount", messages::AMOUNT_INVALID));
            None
        }
    };

    let nature = match nature {
        Some(nature) if errors.is_empty() => nature,
        _ => return Err(errors),
    };

    let credentials = if policy.login_required() {
        form.login.as_ref().map(|login| MemberCredentials {
            login: login.clone(),
            password_hash: form.pass1.as_deref().map(PasswordHash::from_plain),
        })
    } else {
        None
    };

    let profile = MemberProfile {
        civility: form.civility.clone(),
        firstname: form.firstname.clone().unwrap_or_default(),
        lastname: form.lastname.clone().unwrap_or_default(),
        gender: form.gender.clone(),
        company: form.company.clone(),
        address: form.address.clone(),
        zip: form.zipcode.clone(),
        town: form.town.clone(),
        country_code: form.effective_country(policy),
        state_id: form.state_value(),
        email: form.email.clone(),
        birth,
        photo: form.photo.clone(),
        public: form.public,
        note_private: form.note_private.clone(),
        budget: form.budget_value(),
    };

    Ok(MemberDetails {
        nature,
        profile,
        credentials,
        amount,
    })
}

/// Validates the identification form and returns the email to look up.
///
/// An address is needed to send anything, so it is required here even when
/// subscriptions accept members without email.
pub fn validate_identification(form: &SignupForm) -> Result<String, Vec<FieldError>> {
    let mut errors = Vec::new();
    check_email(form, true, &mut errors);
    match form.email.as_deref() {
        Some(email) if errors.is_empty() => Ok(email.trim().to_string()),
        _ => Err(errors),
    }
}
