//! Email templates and `__TOKEN__` substitution.

use serde::{Deserialize, Serialize};

use crate::domain::membership::Member;

use super::OrganizationProfile;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailTemplate {
    pub subject: String,
    pub body: String,
}

impl EmailTemplate {
    pub fn new(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
        }
    }

    /// A template is only sent when both subject and body are set.
    pub fn is_usable(&self) -> bool {
        !self.subject.trim().is_empty() && !self.body.trim().is_empty()
    }
}

/// Templates used by the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateSet {
    /// Confirmation sent to a member after subscribing or renewing.
    pub autoregister: EmailTemplate,
    /// Renewal link sent when an identification matches a member.
    pub searched_and_found: EmailTemplate,
    /// New membership link sent when an identification matches nobody.
    pub searched_and_not_found: EmailTemplate,
    /// Notice sent to the organization for each new subscription.
    pub admin_notice: EmailTemplate,
}

/// Ordered token → value pairs applied to template text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Substitutions(Vec<(String, String)>);

impl Substitutions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tokens describing a member, its type and the organization.
    pub fn for_member(member: &Member, type_label: Option<&str>, organization: &OrganizationProfile) -> Self {
        let profile = &member.profile;
        let text = |value: &Option<String>| value.clone().unwrap_or_default();

        Self::for_organization(organization)
            .with("__MEMBER_ID__", member.id.to_string())
            .with("__MEMBER_REF__", member.reference())
            .with("__MEMBER_CIVILITY__", text(&profile.civility))
            .with("__MEMBER_FIRSTNAME__", profile.firstname.clone())
            .with("__MEMBER_LASTNAME__", profile.lastname.clone())
            .with("__MEMBER_FULLNAME__", member.full_name())
            .with("__MEMBER_COMPANY__", text(&profile.company))
            .with("__MEMBER_ADDRESS__", text(&profile.address))
            .with("__MEMBER_ZIP__", text(&profile.zip))
            .with("__MEMBER_TOWN__", text(&profile.town))
            .with("__MEMBER_COUNTRY__", text(&profile.country_code))
            .with("__MEMBER_EMAIL__", text(&profile.email))
            .with("__MEMBER_LOGIN__", member.login().unwrap_or_default().to_string())
            .with("__MEMBER_TYPE__", type_label.unwrap_or_default().to_string())
            .with(
                "__MEMBER_BIRTH__",
                profile
                    .birth
                    .map(|b| b.format("%Y-%m-%d").to_string())
                    .unwrap_or_default(),
            )
            .with("__MEMBER_NOTE_PRIVATE__", text(&profile.note_private))
    }

    pub fn for_organization(organization: &OrganizationProfile) -> Self {
        Self::new()
            .with("__MYCOMPANY_NAME__", organization.name.clone())
            .with("__MYCOMPANY_EMAIL__", organization.contact_email().to_string())
    }

    /// Adds or replaces a token.
    pub fn with(mut self, token: impl Into<String>, value: impl Into<String>) -> Self {
        let token = token.into();
        let value = value.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == token) {
            Some(entry) => entry.1 = value,
            None => self.0.push((token, value)),
        }
        self
    }

    pub fn get(&self, token: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(existing, _)| existing == token)
            .map(|(_, value)| value.as_str())
    }

    /// Replaces every known token; unknown tokens stay as they are.
    pub fn apply(&self, text: &str) -> String {
        self.0
            .iter()
            .fold(text.to_string(), |acc, (token, value)| acc.replace(token.as_str(), value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::membership::fixtures::member;

    fn organization() -> OrganizationProfile {
        OrganizationProfile {
            name: "Green Club".to_string(),
            email: Some("board@green.example".to_string()),
            app_title: "Members".to_string(),
            mail_from: "no-reply@green.example".to_string(),
        }
    }

    #[test]
    fn usable_needs_subject_and_body() {
        assert!(EmailTemplate::new("Hi", "Body").is_usable());
        assert!(!EmailTemplate::new("", "Body").is_usable());
        assert!(!EmailTemplate::new("Hi", "  ").is_usable());
    }

    #[test]
    fn member_tokens_are_replaced() {
        let m = member(12, 3, "ann@example.org");
        let subs = Substitutions::for_member(&m, Some("Student"), &organization());

        let out = subs.apply("Dear __MEMBER_FULLNAME__ (__MEMBER_REF__, __MEMBER_TYPE__), welcome to __MYCOMPANY_NAME__.");

        assert_eq!(out, "Dear Ann Lee (12, Student), welcome to Green Club.");
    }

    #[test]
    fn unknown_tokens_are_left_untouched() {
        let subs = Substitutions::new().with("__A__", "1");
        assert_eq!(subs.apply("__A__ __B__"), "1 __B__");
    }

    #[test]
    fn with_replaces_existing_token() {
        let subs = Substitutions::new().with("__A__", "1").with("__A__", "2");
        assert_eq!(subs.get("__A__"), Some("2"));
        assert_eq!(subs.apply("__A__"), "2");
    }

    #[test]
    fn empty_fields_substitute_to_empty_text() {
        let m = member(1, 1, "ann@example.org");
        let subs = Substitutions::for_member(&m, None, &organization());
        assert_eq!(subs.apply("[__MEMBER_COMPANY__][__MEMBER_TYPE__]"), "[][]");
    }
}
