//! Absolute links back to the public form.

use url::Url;

use crate::domain::foundation::MembershipTypeId;

use super::FormAction;

/// Tenant used when a request names none.
pub const DEFAULT_ENTITY: i32 = 1;

/// Builds links to the form page at its public address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupLinks {
    base: Url,
}

impl SignupLinks {
    pub fn new(base: Url) -> Self {
        Self { base }
    }

    /// The form page itself.
    pub fn form_url(&self) -> String {
        self.base.to_string()
    }

    /// Identification page, without the type select.
    pub fn identify_url(&self) -> String {
        self.with_query(&[("action", "identify"), ("notype", "1")])
    }

    /// Renewal link carrying the member reference and its secret token.
    pub fn renewal_url(&self, reference: &str, token: &str) -> String {
        self.with_query(&[("ref", reference), ("urltoken", token)])
    }

    /// New membership form prefilled with the email and type.
    pub fn new_membership_url(&self, email: &str, type_id: Option<MembershipTypeId>) -> String {
        let type_id = type_id.map(|id| id.to_string()).unwrap_or_default();
        self.with_query(&[("action", "create"), ("email", email), ("typeid", &type_id)])
    }

    /// Completion page shown after a successful submission.
    pub fn completion_url(&self, action: FormAction, marker: &str, entity: i32) -> String {
        let entity_value = entity.to_string();
        let mut pairs = vec![("action", action.as_str()), ("token", marker)];
        if entity != DEFAULT_ENTITY {
            pairs.push(("entity", entity_value.as_str()));
        }
        self.with_query(&pairs)
    }

    fn with_query(&self, pairs: &[(&str, &str)]) -> String {
        let mut url = self.base.clone();
        {
            let mut query = url.query_pairs_mut();
            for (key, value) in pairs {
                query.append_pair(key, value);
            }
        }
        url.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn links() -> SignupLinks {
        SignupLinks::new(Url::parse("https://club.example/public/members/new").unwrap())
    }

    #[test]
    fn identify_url() {
        assert_eq!(
            links().identify_url(),
            "https://club.example/public/members/new?action=identify&notype=1"
        );
    }

    #[test]
    fn renewal_url_carries_ref_and_token() {
        assert_eq!(
            links().renewal_url("12", "AbC123"),
            "https://club.example/public/members/new?ref=12&urltoken=AbC123"
        );
    }

    #[test]
    fn new_membership_url_encodes_email() {
        assert_eq!(
            links().new_membership_url("a+b@x.org", MembershipTypeId::new(3).ok()),
            "https://club.example/public/members/new?action=create&email=a%2Bb%40x.org&typeid=3"
        );
    }

    #[test]
    fn completion_url_adds_entity_only_when_not_default() {
        assert_eq!(
            links().completion_url(FormAction::Added, "m1", 1),
            "https://club.example/public/members/new?action=added&token=m1"
        );
        assert_eq!(
            links().completion_url(FormAction::Updated, "m1", 2),
            "https://club.example/public/members/new?action=updated&token=m1&entity=2"
        );
    }
}
