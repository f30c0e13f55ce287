//! Organization configuration

use serde::Deserialize;

use crate::domain::signup::OrganizationProfile;

use super::error::ValidationError;

/// The organization running the form
#[derive(Debug, Clone, Deserialize)]
pub struct OrganizationConfig {
    /// Display name
    pub name: String,

    /// Contact address, also receives new member notices
    #[serde(default)]
    pub email: Option<String>,

    /// Application title, prefixed to admin notice subjects
    #[serde(default = "default_app_title")]
    pub app_title: String,
}

impl OrganizationConfig {
    /// Builds the profile; every email is sent from `mail_from`.
    pub fn profile(&self, mail_from: String) -> OrganizationProfile {
        OrganizationProfile {
            name: self.name.clone(),
            email: self.email.clone().filter(|e| !e.trim().is_empty()),
            app_title: self.app_title.clone(),
            mail_from,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingRequired("ORGANIZATION__NAME"));
        }
        Ok(())
    }
}

fn default_app_title() -> String {
    "Membership".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> OrganizationConfig {
        OrganizationConfig {
            name: "River Club".to_string(),
            email: Some("board@river.example".to_string()),
            app_title: default_app_title(),
        }
    }

    #[test]
    fn test_profile() {
        let profile = config().profile("River Club <no-reply@river.example>".to_string());
        assert_eq!(profile.name, "River Club");
        assert_eq!(profile.contact_email(), "board@river.example");
        assert_eq!(profile.mail_from, "River Club <no-reply@river.example>");
    }

    #[test]
    fn test_blank_email_is_unset() {
        let mut config = config();
        config.email = Some(String::new());
        assert_eq!(config.profile(String::new()).email, None);
    }

    #[test]
    fn test_name_is_required() {
        let mut config = config();
        config.name = " ".to_string();
        assert!(config.validate().is_err());
    }
}
