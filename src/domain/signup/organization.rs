//! The organization running the membership form.

/// Identity used in intro texts, email substitutions and admin notices.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OrganizationProfile {
    pub name: String,
    /// Contact and admin-notice address.
    pub email: Option<String>,
    /// Application title, used as the admin notice subject prefix.
    pub app_title: String,
    /// Sender of every email.
    pub mail_from: String,
}

impl OrganizationProfile {
    pub fn contact_email(&self) -> &str {
        self.email.as_deref().unwrap_or_default()
    }
}
