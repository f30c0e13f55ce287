//! Email template configuration
//!
//! Built-in templates cover every message. A YAML catalog can replace any of
//! them:
//!
//! ```yaml
//! autoregister:
//!   subject: "Welcome __MEMBER_FIRSTNAME__"
//!   body: "Your __MEMBER_TYPE__ membership request is recorded."
//! admin_notice:
//!   subject: "New member __MEMBER_FULLNAME__"
//!   body: "Reference __MEMBER_REF__"
//! ```

use serde::Deserialize;
use std::path::Path;

use crate::domain::signup::{EmailTemplate, TemplateSet};

use super::error::ConfigError;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplatesConfig {
    /// Path of a YAML template catalog
    #[serde(default)]
    pub catalog_path: Option<String>,
}

/// Templates overridden by a catalog file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct TemplateCatalog {
    autoregister: Option<EmailTemplate>,
    searched_and_found: Option<EmailTemplate>,
    searched_and_not_found: Option<EmailTemplate>,
    admin_notice: Option<EmailTemplate>,
}

impl TemplatesConfig {
    /// Built-in templates, overridden by the catalog when one is set.
    pub fn load_templates(&self) -> Result<TemplateSet, ConfigError> {
        let mut templates = default_templates();
        let Some(path) = self.catalog_path.as_deref().filter(|p| !p.trim().is_empty()) else {
            return Ok(templates);
        };

        let catalog = read_catalog(Path::new(path))?;
        if let Some(t) = catalog.autoregister {
            templates.autoregister = t;
        }
        if let Some(t) = catalog.searched_and_found {
            templates.searched_and_found = t;
        }
        if let Some(t) = catalog.searched_and_not_found {
            templates.searched_and_not_found = t;
        }
        if let Some(t) = catalog.admin_notice {
            templates.admin_notice = t;
        }

        tracing::info!(path, "Loaded email template catalog");
        Ok(templates)
    }
}

fn read_catalog(path: &Path) -> Result<TemplateCatalog, ConfigError> {
    let catalog_error = |reason: String| ConfigError::TemplateCatalog {
        path: path.display().to_string(),
        reason,
    };
    let raw = std::fs::read_to_string(path).map_err(|e| catalog_error(e.to_string()))?;
    serde_yaml::from_str(&raw).map_err(|e| catalog_error(e.to_string()))
}

pub fn default_templates() -> TemplateSet {
    TemplateSet {
        autoregister: EmailTemplate::new(
            "Your membership request",
            "Hello __MEMBER_FIRSTNAME__,\n\n\
             Your request to join __MYCOMPANY_NAME__ as a __MEMBER_TYPE__ member has been \
             received. Your member reference is __MEMBER_REF__.\n\n\
             __MYCOMPANY_NAME__",
        ),
        searched_and_found: EmailTemplate::new(
            "Your membership renewal link",
            "Hello __MEMBER_FIRSTNAME__,\n\n\
             Use this link to renew your membership or update your information:\n\
             __MEMBERSHIP_RENEWAL_URL__\n\n\
             __MYCOMPANY_NAME__",
        ),
        searched_and_not_found: EmailTemplate::new(
            "Become a member",
            "Hello,\n\n\
             No membership was found for __MEMBER_EMAIL__. You can subscribe here:\n\
             __NEW_MEMBERSHIP_URL__\n\n\
             __MYCOMPANY_NAME__",
        ),
        admin_notice: EmailTemplate::new(
            "New membership request",
            "__MEMBER_FULLNAME__ (__MEMBER_EMAIL__) asked to join as __MEMBER_TYPE__.\n\
             Reference: __MEMBER_REF__",
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_without_catalog() {
        let templates = TemplatesConfig::default().load_templates().unwrap();
        assert_eq!(templates, default_templates());
        assert!(templates.autoregister.is_usable());
        assert!(templates.searched_and_found.body.contains("__MEMBERSHIP_RENEWAL_URL__"));
        assert!(templates.searched_and_not_found.body.contains("__NEW_MEMBERSHIP_URL__"));
    }

    #[test]
    fn test_catalog_overrides_listed_templates() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "admin_notice:\n  subject: \"New member __MEMBER_FULLNAME__\"\n  body: \"Reference __MEMBER_REF__\""
        )
        .unwrap();

        let config = TemplatesConfig {
            catalog_path: Some(file.path().display().to_string()),
        };
        let templates = config.load_templates().unwrap();

        assert_eq!(templates.admin_notice.subject, "New member __MEMBER_FULLNAME__");
        assert_eq!(templates.autoregister, default_templates().autoregister);
    }

    #[test]
    fn test_missing_catalog_fails() {
        let config = TemplatesConfig {
            catalog_path: Some("/nonexistent/templates.yaml".to_string()),
        };
        assert!(matches!(
            config.load_templates(),
            Err(ConfigError::TemplateCatalog { .. })
        ));
    }

    #[test]
    fn test_unknown_template_name_fails() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "welcome:\n  subject: a\n  body: b").unwrap();

        let config = TemplatesConfig {
            catalog_path: Some(file.path().display().to_string()),
        };
        assert!(config.load_templates().is_err());
    }
}
