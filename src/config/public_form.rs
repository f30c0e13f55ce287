//! Public form configuration

use serde::Deserialize;
use url::Url;

use crate::domain::foundation::{MembershipTypeId, Money};
use crate::domain::membership::LegalNature;
use crate::domain::signup::{OnlinePayment, SignupLinks, SignupPolicy};

use super::error::ValidationError;

/// Toggles of the public membership form
#[derive(Debug, Clone, Deserialize)]
pub struct PublicFormConfig {
    /// Absolute address of `/public/members/new`, used in emailed links
    pub public_url: String,

    #[serde(default)]
    pub enable_public: bool,

    /// Amount proposed when the type has none, e.g. `25.00`
    #[serde(default)]
    pub default_amount: Option<String>,

    #[serde(default)]
    pub edit_amount: bool,

    #[serde(default)]
    pub min_amount: Option<String>,

    /// Empty or `-1` disables payment, `all` offers every method
    #[serde(default)]
    pub pay_online: String,

    #[serde(default)]
    pub show_turnover: bool,

    #[serde(default)]
    pub redirect_url: Option<String>,

    #[serde(default)]
    pub force_type: Option<i64>,

    /// `phy` or `mor`
    #[serde(default)]
    pub force_morphy: Option<String>,

    #[serde(default)]
    pub force_country_code: Option<String>,

    #[serde(default)]
    pub skip_table: bool,

    #[serde(default = "default_true")]
    pub mail_required: bool,

    #[serde(default = "default_true")]
    pub login_not_required: bool,

    #[serde(default)]
    pub counters_public: bool,

    #[serde(default)]
    pub intro_text: Option<String>,

    #[serde(default)]
    pub renew_intro_text: Option<String>,

    #[serde(default = "default_token_ttl")]
    pub renewal_token_ttl_days: u32,
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn amount(value: &Option<String>, name: &'static str) -> Result<Option<Money>, ValidationError> {
    non_blank(value)
        .map(|raw| Money::parse(&raw).map_err(|_| ValidationError::InvalidAmount(name)))
        .transpose()
}

impl PublicFormConfig {
    pub fn links(&self) -> Result<SignupLinks, ValidationError> {
        Url::parse(self.public_url.trim())
            .map(SignupLinks::new)
            .map_err(|_| ValidationError::InvalidUrl("PUBLIC_FORM__PUBLIC_URL"))
    }

    /// Converts the toggles into the form policy.
    pub fn to_policy(&self) -> Result<SignupPolicy, ValidationError> {
        let force_type = self
            .force_type
            .filter(|id| *id > 0)
            .map(|id| MembershipTypeId::new(id).map_err(|_| ValidationError::InvalidMembershipType))
            .transpose()?;
        let force_nature = non_blank(&self.force_morphy)
            .map(|raw| raw.parse::<LegalNature>().map_err(|_| ValidationError::InvalidNature))
            .transpose()?;
        if self.renewal_token_ttl_days == 0 || self.renewal_token_ttl_days > 365 {
            return Err(ValidationError::InvalidTokenTtl);
        }

        Ok(SignupPolicy {
            enable_public: self.enable_public,
            default_amount: amount(&self.default_amount, "PUBLIC_FORM__DEFAULT_AMOUNT")?,
            edit_amount: self.edit_amount,
            min_amount: amount(&self.min_amount, "PUBLIC_FORM__MIN_AMOUNT")?,
            online_payment: OnlinePayment::from_setting(&self.pay_online),
            show_turnover: self.show_turnover,
            redirect_url: non_blank(&self.redirect_url),
            force_type,
            force_nature,
            force_country_code: non_blank(&self.force_country_code),
            skip_table: self.skip_table,
            mail_required: self.mail_required,
            login_not_required: self.login_not_required,
            counters_public: self.counters_public,
            intro_text: non_blank(&self.intro_text),
            renew_intro_text: non_blank(&self.renew_intro_text),
            renewal_token_ttl_days: self.renewal_token_ttl_days,
        })
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.public_url.trim().is_empty() {
            return Err(ValidationError::MissingRequired("PUBLIC_FORM__PUBLIC_URL"));
        }
        self.links()?;
        self.to_policy()?;
        Ok(())
    }
}

fn default_true() -> bool {
    true
}

fn default_token_ttl() -> u32 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PublicFormConfig {
        PublicFormConfig {
            public_url: "https://river.example/public/members/new".to_string(),
            enable_public: true,
            default_amount: None,
            edit_amount: false,
            min_amount: None,
            pay_online: String::new(),
            show_turnover: false,
            redirect_url: None,
            force_type: None,
            force_morphy: None,
            force_country_code: None,
            skip_table: false,
            mail_required: default_true(),
            login_not_required: default_true(),
            counters_public: false,
            intro_text: None,
            renew_intro_text: None,
            renewal_token_ttl_days: default_token_ttl(),
        }
    }

    #[test]
    fn test_minimal_policy() {
        let policy = config().to_policy().unwrap();
        assert!(policy.enable_public);
        assert!(policy.mail_required);
        assert!(policy.login_not_required);
        assert_eq!(policy.online_payment, OnlinePayment::Disabled);
        assert_eq!(policy.renewal_token_ttl_days, 30);
    }

    #[test]
    fn test_forced_values() {
        let mut c = config();
        c.force_type = Some(3);
        c.force_morphy = Some("mor".to_string());
        c.force_country_code = Some("FR".to_string());
        c.pay_online = "stripe".to_string();

        let policy = c.to_policy().unwrap();

        assert_eq!(policy.force_type.map(|t| t.as_i64()), Some(3));
        assert_eq!(policy.force_nature, Some(LegalNature::Organization));
        assert_eq!(policy.force_country_code.as_deref(), Some("FR"));
        assert_eq!(policy.online_payment.method(), Some("stripe"));
    }

    #[test]
    fn test_amounts_are_parsed() {
        let mut c = config();
        c.default_amount = Some("25".to_string());
        c.min_amount = Some("10.50".to_string());

        let policy = c.to_policy().unwrap();

        assert_eq!(policy.default_amount.map(|m| m.cents()), Some(2500));
        assert_eq!(policy.min_amount.map(|m| m.cents()), Some(1050));
    }

    #[test]
    fn test_invalid_amount() {
        let mut c = config();
        c.min_amount = Some("ten".to_string());
        assert!(matches!(
            c.to_policy(),
            Err(ValidationError::InvalidAmount("PUBLIC_FORM__MIN_AMOUNT"))
        ));
    }

    #[test]
    fn test_invalid_nature() {
        let mut c = config();
        c.force_morphy = Some("robot".to_string());
        assert!(matches!(c.to_policy(), Err(ValidationError::InvalidNature)));
    }

    #[test]
    fn test_token_ttl_bounds() {
        let mut c = config();
        c.renewal_token_ttl_days = 0;
        assert!(matches!(c.to_policy(), Err(ValidationError::InvalidTokenTtl)));
    }

    #[test]
    fn test_public_url_is_required() {
        let mut c = config();
        c.public_url = String::new();
        assert!(matches!(
            c.validate(),
            Err(ValidationError::MissingRequired(_))
        ));

        c.public_url = "relative/path".to_string();
        assert!(matches!(c.validate(), Err(ValidationError::InvalidUrl(_))));
    }
}
