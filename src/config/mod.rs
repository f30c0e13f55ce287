//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `MEMBER_SIGNUP_` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use member_signup::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {:?}", config.server.socket_addr());
//! ```

mod database;
mod email;
mod error;
mod organization;
mod payment;
mod public_form;
mod server;
mod templates;

pub use database::DatabaseConfig;
pub use email::EmailConfig;
pub use error::{ConfigError, ValidationError};
pub use organization::OrganizationConfig;
pub use payment::PaymentConfig;
pub use public_form::PublicFormConfig;
pub use server::{Environment, ServerConfig};
pub use templates::{default_templates, TemplatesConfig};

use serde::Deserialize;

use crate::application::handlers::signup::SignupSettings;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration (PostgreSQL connection)
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Email configuration (Resend)
    #[serde(default)]
    pub email: EmailConfig,

    /// Online payment page
    #[serde(default)]
    pub payment: PaymentConfig,

    /// The organization running the form
    pub organization: OrganizationConfig,

    /// Public form toggles
    pub public_form: PublicFormConfig,

    /// Email templates
    #[serde(default)]
    pub templates: TemplatesConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `MEMBER_SIGNUP` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `MEMBER_SIGNUP__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `MEMBER_SIGNUP__PUBLIC_FORM__SKIP_TABLE=true` -> `public_form.skip_table = true`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Required environment variables are missing
    /// - Values cannot be parsed into expected types
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("MEMBER_SIGNUP")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.email.validate()?;
        self.payment.validate()?;
        self.organization.validate()?;
        self.public_form.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }

    /// Everything the form handlers need, templates included.
    pub fn signup_settings(&self) -> Result<SignupSettings, ConfigError> {
        Ok(SignupSettings {
            policy: self.public_form.to_policy()?,
            organization: self.organization.profile(self.email.from_header()),
            templates: self.templates.load_templates()?,
            links: self.public_form.links()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn set_minimal_env() {
        env::set_var("MEMBER_SIGNUP__ORGANIZATION__NAME", "River Club");
        env::set_var(
            "MEMBER_SIGNUP__PUBLIC_FORM__PUBLIC_URL",
            "https://river.example/public/members/new",
        );
    }

    fn clear_env() {
        for key in [
            "MEMBER_SIGNUP__ORGANIZATION__NAME",
            "MEMBER_SIGNUP__PUBLIC_FORM__PUBLIC_URL",
            "MEMBER_SIGNUP__PUBLIC_FORM__ENABLE_PUBLIC",
            "MEMBER_SIGNUP__PUBLIC_FORM__FORCE_TYPE",
            "MEMBER_SIGNUP__SERVER__PORT",
            "MEMBER_SIGNUP__SERVER__ENVIRONMENT",
            "MEMBER_SIGNUP__DATABASE__URL",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.organization.name, "River Club");
        assert_eq!(config.database.url(), None);
        assert!(!config.public_form.enable_public);
    }

    #[test]
    fn test_validate_minimal_config() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_server_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.environment, Environment::Development);
    }

    #[test]
    fn test_is_production() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("MEMBER_SIGNUP__SERVER__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.is_production());
    }

    #[test]
    fn test_public_form_toggles_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("MEMBER_SIGNUP__PUBLIC_FORM__ENABLE_PUBLIC", "true");
        env::set_var("MEMBER_SIGNUP__PUBLIC_FORM__FORCE_TYPE", "3");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        let settings = config.signup_settings().unwrap();
        assert!(settings.policy.enable_public);
        assert_eq!(settings.policy.force_type.map(|t| t.as_i64()), Some(3));
        assert_eq!(settings.organization.mail_from, "Membership <noreply@example.org>");
    }

    #[test]
    fn test_missing_organization_fails() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var(
            "MEMBER_SIGNUP__PUBLIC_FORM__PUBLIC_URL",
            "https://river.example/public/members/new",
        );
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_err());
    }
}
