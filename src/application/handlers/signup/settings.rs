//! Settings shared by the signup handlers.

use crate::domain::signup::{OrganizationProfile, SignupLinks, SignupPolicy, TemplateSet};

/// Everything the signup flow reads from configuration, built once at
/// startup and shared behind an `Arc`.
#[derive(Debug, Clone)]
pub struct SignupSettings {
    pub policy: SignupPolicy,
    pub organization: OrganizationProfile,
    pub templates: TemplateSet,
    pub links: SignupLinks,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::domain::signup::EmailTemplate;
    use url::Url;

    pub fn settings() -> SignupSettings {
        SignupSettings {
            policy: SignupPolicy::default(),
            organization: OrganizationProfile {
                name: "River Club".to_string(),
                email: Some("board@river.example".to_string()),
                app_title: "RiverClub".to_string(),
                mail_from: "no-reply@river.example".to_string(),
            },
            templates: TemplateSet {
                autoregister: EmailTemplate::new(
                    "Welcome __MEMBER_FIRSTNAME__",
                    "Hello __MEMBER_FULLNAME__, your __MEMBER_TYPE__ request is recorded.",
                ),
                searched_and_found: EmailTemplate::new(
                    "Your membership",
                    "Renew at __MEMBERSHIP_RENEWAL_URL__",
                ),
                searched_and_not_found: EmailTemplate::new(
                    "No membership found",
                    "Join at __NEW_MEMBERSHIP_URL__",
                ),
                admin_notice: EmailTemplate::new(
                    "New member __MEMBER_FULLNAME__",
                    "Reference __MEMBER_REF__",
                ),
            },
            links: SignupLinks::new(
                Url::parse("https://river.example/public/members/new").unwrap(),
            ),
        }
    }
}
