//! Payment configuration

use serde::Deserialize;
use url::Url;

use super::error::ValidationError;

/// Online payment page configuration
///
/// Whether visitors are sent to the page is decided by
/// `public_form.pay_online`; this section only says where the page is.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentConfig {
    /// Entry URL of the online payment page
    #[serde(default)]
    pub page_url: Option<String>,

    /// Secret signing the `securekey` of payment links
    #[serde(default)]
    pub security_secret: Option<String>,
}

impl PaymentConfig {
    /// The payment page URL, when one is configured.
    pub fn page_url(&self) -> Result<Option<Url>, ValidationError> {
        match self.page_url.as_deref().filter(|u| !u.trim().is_empty()) {
            Some(raw) => Url::parse(raw)
                .map(Some)
                .map_err(|_| ValidationError::InvalidUrl("PAYMENT__PAGE_URL")),
            None => Ok(None),
        }
    }

    /// Validate payment configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.page_url().map(|_| ())
    }
}
