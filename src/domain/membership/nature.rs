//! Legal nature of a member: a natural person or an organization.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LegalNature {
    #[serde(rename = "phy")]
    Individual,
    #[serde(rename = "mor")]
    Organization,
}

impl LegalNature {
    /// Returns the form/database code (`phy` or `mor`).
    pub fn code(&self) -> &'static str {
        match self {
            LegalNature::Individual => "phy",
            LegalNature::Organization => "mor",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LegalNature::Individual => "Individual",
            LegalNature::Organization => "Organization",
        }
    }
}

impl fmt::Display for LegalNature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for LegalNature {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "phy" => Ok(LegalNature::Individual),
            "mor" => Ok(LegalNature::Organization),
            other => Err(ValidationError::invalid_format(
                "morphy",
                format!("'{}' is neither 'phy' nor 'mor'", other),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_codes() {
        assert_eq!("phy".parse::<LegalNature>(), Ok(LegalNature::Individual));
        assert_eq!("mor".parse::<LegalNature>(), Ok(LegalNature::Organization));
    }

    #[test]
    fn rejects_other_values() {
        assert!("both".parse::<LegalNature>().is_err());
        assert!("".parse::<LegalNature>().is_err());
    }

    #[test]
    fn serializes_as_code() {
        assert_eq!(
            serde_json::to_string(&LegalNature::Organization).unwrap(),
            "\"mor\""
        );
    }
}
