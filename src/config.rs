//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and validated before the server
//! starts. Missing provider credentials abort startup.
//!
//! ## Required Variables
//!
//! ```bash
//! export SUPABASE_URL="https://project.supabase.co"
//! export SUPABASE_ANON_KEY="<publishable key>"
//! ```
//!
//! ## Optional Variables
//!
//! - `SUPABASE_SERVICE_ROLE_KEY` - Privileged key for admin calls (falls back to the anon key)
//! - `APP_ENV` - `development` adds stack traces to error bodies (default: `production`)
//! - `LISTEN` - Bind address (default: `0.0.0.0:3000`)
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)
//! - `AUTH_PROVIDER_TIMEOUT_SECS` - Provider request timeout (default: 10, range 1-120)

use anyhow::{Context, Result};
use std::{env, fmt};
use url::Url;

/// Runtime environment. Only `Development` exposes error detail to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    Development,
    #[default]
    Production,
}

impl Environment {
    /// Parses `APP_ENV`. Anything other than `development`/`dev` is production.
    pub fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("development") || name.eq_ignore_ascii_case("dev") {
            Self::Development
        } else {
            Self::Production
        }
    }

    pub fn is_development(self) -> bool {
        self == Self::Development
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }
}

/// Service configuration loaded from environment variables.
///
/// Custom `Debug` implementation redacts the provider keys.
#[derive(Clone)]
pub struct Config {
    /// Base URL of the identity provider project.
    pub supabase_url: Url,
    /// Publishable key, used for token verification.
    pub anon_key: String,
    /// Privileged key for admin calls. `None` means the anon key is reused.
    pub service_role_key: Option<String>,
    pub environment: Environment,
    pub listen_addr: String,
    pub log_level: String,
    pub log_format: String,
    pub provider_timeout_secs: u64,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("supabase_url", &self.supabase_url.as_str())
            .field("anon_key", &"[REDACTED]")
            .field(
                "service_role_key",
                &self.service_role_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("environment", &self.environment)
            .field("listen_addr", &self.listen_addr)
            .field("log_level", &self.log_level)
            .field("log_format", &self.log_format)
            .field("provider_timeout_secs", &self.provider_timeout_secs)
            .finish()
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `SUPABASE_URL` or `SUPABASE_ANON_KEY` is missing
    /// or `SUPABASE_URL` is not a URL.
    pub fn from_env() -> Result<Self> {
        let supabase_url = env::var("SUPABASE_URL")
            .context("Missing identity provider configuration: SUPABASE_URL must be set")?;
        let supabase_url = Url::parse(&supabase_url)
            .with_context(|| format!("SUPABASE_URL is not a valid URL: '{supabase_url}'"))?;

        let anon_key = env::var("SUPABASE_ANON_KEY")
            .context("Missing identity provider configuration: SUPABASE_ANON_KEY must be set")?;

        let service_role_key = env::var("SUPABASE_SERVICE_ROLE_KEY")
            .ok()
            .filter(|key| !key.is_empty());

        let environment = env::var("APP_ENV")
            .map(|v| Environment::from_name(&v))
            .unwrap_or_default();

        let listen_addr = env::var("LISTEN").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

        let provider_timeout_secs = env::var("AUTH_PROVIDER_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10);

        Ok(Self {
            supabase_url,
            anon_key,
            service_role_key,
            environment,
            listen_addr,
            log_level,
            log_format,
            provider_timeout_secs,
        })
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `supabase_url` is not `http`/`https`
    /// - `anon_key` is empty
    /// - `log_format` is not `text` or `json`
    /// - `listen_addr` is invalid
    /// - `provider_timeout_secs` is outside 1..=120
    pub fn validate(&self) -> Result<()> {
        if !matches!(self.supabase_url.scheme(), "http" | "https") {
            anyhow::bail!(
                "SUPABASE_URL must start with 'http://' or 'https://', got '{}'",
                self.supabase_url
            );
        }

        if self.anon_key.trim().is_empty() {
            anyhow::bail!("SUPABASE_ANON_KEY must not be empty");
        }

        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        if !self.listen_addr.contains(':') {
            anyhow::bail!(
                "LISTEN must be in format 'host:port', got '{}'",
                self.listen_addr
            );
        }

        if !(1..=120).contains(&self.provider_timeout_secs) {
            anyhow::bail!(
                "AUTH_PROVIDER_TIMEOUT_SECS must be between 1 and 120, got {}",
                self.provider_timeout_secs
            );
        }

        Ok(())
    }

    /// Key used for privileged admin calls.
    pub fn admin_key(&self) -> &str {
        self.service_role_key.as_deref().unwrap_or(&self.anon_key)
    }

    /// Prints configuration summary (without sensitive data).
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}", self.listen_addr);
        tracing::info!("  Identity provider: {}", self.supabase_url);
        tracing::info!("  Anon key: {}", mask_secret(&self.anon_key));

        match &self.service_role_key {
            Some(key) => tracing::info!("  Service role key: {}", mask_secret(key)),
            None => tracing::warn!(
                "  Service role key: not set, admin calls will use the anon key"
            ),
        }

        tracing::info!("  Environment: {}", self.environment.as_str());
        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
        tracing::info!("  Provider timeout: {}s", self.provider_timeout_secs);
    }
}

/// Masks a secret for logging, keeping only the last four characters.
///
/// - `eyJhbGciOiJIUzI1NiJ9.abcd` → `***abcd`
/// - short secrets are fully masked
fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();

    if chars.len() <= 8 {
        return "***".to_string();
    }

    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("***{tail}")
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if required variables are missing or validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn test_config() -> Config {
        Config {
            supabase_url: Url::parse("https://project.supabase.co").unwrap(),
            anon_key: "anon-key".to_string(),
            service_role_key: None,
            environment: Environment::Production,
            listen_addr: "0.0.0.0:3000".to_string(),
            log_level: "info".to_string(),
            log_format: "text".to_string(),
            provider_timeout_secs: 10,
        }
    }

    fn clear_env() {
        // SAFETY: Tests touching the environment are run serially
        unsafe {
            env::remove_var("SUPABASE_URL");
            env::remove_var("SUPABASE_ANON_KEY");
            env::remove_var("SUPABASE_SERVICE_ROLE_KEY");
            env::remove_var("APP_ENV");
            env::remove_var("AUTH_PROVIDER_TIMEOUT_SECS");
        }
    }

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret("eyJhbGciOiJIUzI1NiJ9.abcd"), "***abcd");
        assert_eq!(mask_secret("short"), "***");
        assert_eq!(mask_secret(""), "***");
    }

    #[test]
    fn test_environment_from_name() {
        assert_eq!(Environment::from_name("development"), Environment::Development);
        assert_eq!(Environment::from_name("DEV"), Environment::Development);
        assert_eq!(Environment::from_name("production"), Environment::Production);
        assert_eq!(Environment::from_name("staging"), Environment::Production);
        assert!(!Environment::default().is_development());
    }

    #[test]
    fn test_config_validation() {
        let mut config = test_config();
        assert!(config.validate().is_ok());

        config.log_format = "xml".to_string();
        assert!(config.validate().is_err());
        config.log_format = "json".to_string();
        assert!(config.validate().is_ok());

        config.listen_addr = "3000".to_string();
        assert!(config.validate().is_err());
        config.listen_addr = "127.0.0.1:3000".to_string();

        config.provider_timeout_secs = 0;
        assert!(config.validate().is_err());
        config.provider_timeout_secs = 121;
        assert!(config.validate().is_err());
        config.provider_timeout_secs = 30;

        config.anon_key = "  ".to_string();
        assert!(config.validate().is_err());
        config.anon_key = "anon-key".to_string();

        config.supabase_url = Url::parse("ftp://project.supabase.co").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_admin_key_falls_back_to_anon_key() {
        let mut config = test_config();
        assert_eq!(config.admin_key(), "anon-key");

        config.service_role_key = Some("service-key".to_string());
        assert_eq!(config.admin_key(), "service-key");
    }

    #[test]
    fn test_debug_redacts_keys() {
        let mut config = test_config();
        config.service_role_key = Some("service-key".to_string());

        let rendered = format!("{config:?}");
        assert!(!rendered.contains("anon-key"));
        assert!(!rendered.contains("service-key"));
        assert!(rendered.contains("project.supabase.co"));
    }

    #[test]
    #[serial]
    fn test_from_env_requires_provider_url() {
        clear_env();
        unsafe {
            env::set_var("SUPABASE_ANON_KEY", "anon-key");
        }

        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains("SUPABASE_URL"));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_requires_anon_key() {
        clear_env();
        unsafe {
            env::set_var("SUPABASE_URL", "https://project.supabase.co");
        }

        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains("SUPABASE_ANON_KEY"));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_reads_all_values() {
        clear_env();
        unsafe {
            env::set_var("SUPABASE_URL", "https://project.supabase.co");
            env::set_var("SUPABASE_ANON_KEY", "anon-key");
            env::set_var("SUPABASE_SERVICE_ROLE_KEY", "service-key");
            env::set_var("APP_ENV", "development");
            env::set_var("AUTH_PROVIDER_TIMEOUT_SECS", "25");
        }

        let config = Config::from_env().unwrap();
        assert_eq!(config.supabase_url.host_str(), Some("project.supabase.co"));
        assert_eq!(config.admin_key(), "service-key");
        assert!(config.environment.is_development());
        assert_eq!(config.provider_timeout_secs, 25);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_treats_empty_service_key_as_unset() {
        clear_env();
        unsafe {
            env::set_var("SUPABASE_URL", "https://project.supabase.co");
            env::set_var("SUPABASE_ANON_KEY", "anon-key");
            env::set_var("SUPABASE_SERVICE_ROLE_KEY", "");
        }

        let config = Config::from_env().unwrap();
        assert!(config.service_role_key.is_none());
        assert_eq!(config.admin_key(), "anon-key");

        clear_env();
    }
}
