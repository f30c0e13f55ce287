//! Organization-wide settings of the public form, in domain terms.

use crate::domain::foundation::{MembershipTypeId, Money};
use crate::domain::membership::{LegalNature, MembershipType};

/// Online payment setting: disabled, any method, or one named method.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OnlinePayment {
    #[default]
    Disabled,
    AnyMethod,
    Method(String),
}

impl OnlinePayment {
    /// Reads the configured value; empty and `-1` disable payment, `all`
    /// offers every method.
    pub fn from_setting(value: &str) -> Self {
        match value.trim() {
            "" | "-1" => OnlinePayment::Disabled,
            "all" => OnlinePayment::AnyMethod,
            method => OnlinePayment::Method(method.to_string()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self, OnlinePayment::Disabled)
    }

    /// Payment method to preselect on the payment page, if restricted.
    pub fn method(&self) -> Option<&str> {
        match self {
            OnlinePayment::Method(method) => Some(method),
            _ => None,
        }
    }
}

/// Settings that shape the public subscription form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupPolicy {
    pub enable_public: bool,
    pub default_amount: Option<Money>,
    /// Lets visitors edit the amount whatever the type says.
    pub edit_amount: bool,
    pub min_amount: Option<Money>,
    pub online_payment: OnlinePayment,
    /// Ask organizations for their turnover.
    pub show_turnover: bool,
    pub redirect_url: Option<String>,
    pub force_type: Option<MembershipTypeId>,
    pub force_nature: Option<LegalNature>,
    pub force_country_code: Option<String>,
    pub skip_table: bool,
    pub mail_required: bool,
    pub login_not_required: bool,
    pub counters_public: bool,
    pub intro_text: Option<String>,
    pub renew_intro_text: Option<String>,
    pub renewal_token_ttl_days: u32,
}

impl Default for SignupPolicy {
    fn default() -> Self {
        Self {
            enable_public: true,
            default_amount: None,
            edit_amount: false,
            min_amount: None,
            online_payment: OnlinePayment::Disabled,
            show_turnover: false,
            redirect_url: None,
            force_type: None,
            force_nature: None,
            force_country_code: None,
            skip_table: false,
            mail_required: true,
            login_not_required: true,
            counters_public: false,
            intro_text: None,
            renew_intro_text: None,
            renewal_token_ttl_days: 30,
        }
    }
}

/// Subscription amount as shown on the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmountField {
    /// Value prefilled in the input.
    pub value: Money,
    /// Amount suggested next to an editable input.
    pub advised: Option<Money>,
    pub editable: bool,
}

impl SignupPolicy {
    pub fn login_required(&self) -> bool {
        !self.login_not_required
    }

    /// Works out the amount input for the selected type.
    ///
    /// The type's own amount wins; otherwise the default amount applies when
    /// the type allows editing, then whatever the visitor posted.
    pub fn amount_field(&self, membership_type: Option<&MembershipType>, posted: Option<Money>) -> AmountField {
        let can_edit = membership_type.map_or(false, |t| t.can_edit_amount);
        let type_amount = membership_type
            .and_then(|t| t.amount)
            .filter(Money::is_positive);

        let value = type_amount
            .or_else(|| self.default_amount.filter(|_| can_edit))
            .or(posted)
            .unwrap_or(Money::ZERO);

        let advised = Some(value)
            .filter(Money::is_positive)
            .or(self.default_amount)
            .filter(Money::is_positive);

        AmountField {
            value,
            advised,
            editable: self.edit_amount || can_edit,
        }
    }
}
