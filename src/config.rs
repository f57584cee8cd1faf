use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info};
use validator::{Validate, ValidationError};

/// Default values for configuration
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_ENV: &str = "development";
const CONFIG_DIR: &str = "config";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
const DEFAULT_ITEMS_PER_PAGE: usize = 6;
const DEFAULT_AUTH_COOKIE_NAME: &str = "access_tokennew";
const DEFAULT_MERCHANT_NAME: &str = "LearnHub";
const DEFAULT_MERCHANT_TAGLINE: &str = "Learn without limits";
const DEFAULT_CHECKOUT_THEME_COLOR: &str = "#5f63b8";

/// How payment verification failures are reported to the user.
///
/// The deployed behavior is a logged diagnostic only; `Notify` additionally
/// surfaces a transient notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeedbackPolicy {
    Silent,
    Notify,
}

/// Application configuration structure with validation
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Base URL of the course platform REST API
    #[validate(custom = "validate_base_url")]
    pub api_base_url: String,

    /// Base URL of the coupon service; the platform serves it from a
    /// separate deployment. Falls back to `api_base_url` when unset.
    #[serde(default)]
    pub coupon_api_base_url: Option<String>,

    /// Public key identifying the merchant to the payment gateway
    #[validate(length(min = 1))]
    pub gateway_key_id: String,

    /// Merchant name shown in the gateway checkout UI
    #[serde(default = "default_merchant_name")]
    pub merchant_name: String,

    /// Merchant tagline shown in the gateway checkout UI
    #[serde(default = "default_merchant_tagline")]
    pub merchant_tagline: String,

    /// Checkout UI accent color (hex)
    #[serde(default = "default_checkout_theme_color")]
    #[validate(custom = "validate_theme_color")]
    pub checkout_theme_color: String,

    /// Name of the browser cookie holding the signed-in user's credential
    #[serde(default = "default_auth_cookie_name")]
    pub auth_cookie_name: String,

    /// Per-request timeout for API calls (seconds)
    #[serde(default = "default_request_timeout_secs")]
    #[validate(custom = "validate_request_timeout")]
    pub request_timeout_secs: u64,

    /// Page size for the purchased courses listing
    #[serde(default = "default_items_per_page")]
    #[validate(custom = "validate_items_per_page")]
    pub items_per_page: usize,

    /// Verification failure reporting: "silent" or "notify"
    #[serde(default = "default_verification_feedback")]
    #[validate(custom = "validate_verification_feedback")]
    pub verification_feedback: String,

    /// Application environment
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Logging level
    #[serde(default = "default_log_level")]
    #[validate(custom = "validate_log_level")]
    pub log_level: String,

    /// Log in JSON format (structured logging)
    #[serde(default)]
    pub log_json: bool,
}

impl AppConfig {
    /// Creates a configuration with defaults for everything except the two
    /// values that have no sensible default.
    pub fn new(api_base_url: impl Into<String>, gateway_key_id: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            coupon_api_base_url: None,
            gateway_key_id: gateway_key_id.into(),
            merchant_name: default_merchant_name(),
            merchant_tagline: default_merchant_tagline(),
            checkout_theme_color: default_checkout_theme_color(),
            auth_cookie_name: default_auth_cookie_name(),
            request_timeout_secs: default_request_timeout_secs(),
            items_per_page: default_items_per_page(),
            verification_feedback: default_verification_feedback(),
            environment: default_environment(),
            log_level: default_log_level(),
            log_json: false,
        }
    }

    /// Gets the coupon service base URL, falling back to the main API
    pub fn coupon_api_base_url(&self) -> &str {
        self.coupon_api_base_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or(&self.api_base_url)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn verification_feedback(&self) -> FeedbackPolicy {
        if self.verification_feedback.eq_ignore_ascii_case("notify") {
            FeedbackPolicy::Notify
        } else {
            FeedbackPolicy::Silent
        }
    }

    /// Checks if running in production environment
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }

    /// Checks if running in development environment
    pub fn is_development(&self) -> bool {
        self.environment.eq_ignore_ascii_case("development")
    }

    /// Gets log level reference
    pub fn log_level(&self) -> &str {
        &self.log_level
    }
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("Configuration loading failed: {0}")]
    Load(#[from] ConfigError),

    #[error("Configuration validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Default value functions
fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_environment() -> String {
    DEFAULT_ENV.to_string()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_items_per_page() -> usize {
    DEFAULT_ITEMS_PER_PAGE
}

fn default_auth_cookie_name() -> String {
    DEFAULT_AUTH_COOKIE_NAME.to_string()
}

fn default_merchant_name() -> String {
    DEFAULT_MERCHANT_NAME.to_string()
}

fn default_merchant_tagline() -> String {
    DEFAULT_MERCHANT_TAGLINE.to_string()
}

fn default_checkout_theme_color() -> String {
    DEFAULT_CHECKOUT_THEME_COLOR.to_string()
}

fn default_verification_feedback() -> String {
    "silent".to_string()
}

fn validate_base_url(value: &str) -> Result<(), ValidationError> {
    match url::Url::parse(value) {
        Ok(parsed) if parsed.scheme() == "http" || parsed.scheme() == "https" => Ok(()),
        _ => {
            let mut err = ValidationError::new("api_base_url");
            err.message = Some("Must be an absolute http(s) URL".into());
            Err(err)
        }
    }
}

fn validate_theme_color(value: &str) -> Result<(), ValidationError> {
    let ok = value.starts_with('#')
        && (value.len() == 7 || value.len() == 4)
        && value[1..].chars().all(|c| c.is_ascii_hexdigit());
    if ok {
        Ok(())
    } else {
        let mut err = ValidationError::new("checkout_theme_color");
        err.message = Some("Must be a #rgb or #rrggbb hex color".into());
        Err(err)
    }
}

fn validate_request_timeout(value: u64) -> Result<(), ValidationError> {
    if (1..=300).contains(&value) {
        Ok(())
    } else {
        let mut err = ValidationError::new("request_timeout_secs");
        err.message = Some("Must be between 1 and 300 seconds".into());
        Err(err)
    }
}

fn validate_items_per_page(value: usize) -> Result<(), ValidationError> {
    if value == 0 {
        let mut err = ValidationError::new("items_per_page");
        err.message = Some("items_per_page must be greater than 0".into());
        return Err(err);
    }
    Ok(())
}

fn validate_verification_feedback(value: &str) -> Result<(), ValidationError> {
    match value.to_ascii_lowercase().as_str() {
        "silent" | "notify" => Ok(()),
        _ => {
            let mut err = ValidationError::new("verification_feedback");
            err.message = Some("Must be one of: silent, notify".into());
            Err(err)
        }
    }
}

/// Validates log level values
fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if valid_levels.contains(&level.to_lowercase().as_str()) {
        Ok(())
    } else {
        let mut err = ValidationError::new("log_level");
        err.message = Some("Must be one of: trace, debug, info, warn, error".into());
        Err(err)
    }
}

/// Initializes tracing using the provided log level as the default filter
pub fn init_tracing(level: &str, json: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_directive = format!("learnhub_client={}", level);
    let filter_directive = env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(default_directive);

    if json {
        let _ = fmt().with_env_filter(filter_directive).json().try_init();
    } else {
        let _ = fmt().with_env_filter(filter_directive).try_init();
    }
}

/// Loads application configuration
///
/// Layers configuration sources in this order:
/// 1. Default config (config/default.toml)
/// 2. Environment-specific config (config/{env}.toml)
/// 3. Environment variables (APP__*)
pub fn load_config() -> Result<AppConfig, AppConfigError> {
    // Support both RUN_ENV and APP_ENV for selecting config profile
    let run_env = env::var("RUN_ENV")
        .or_else(|_| env::var("APP_ENV"))
        .unwrap_or_else(|_| DEFAULT_ENV.to_string());
    info!("Loading configuration for environment: {}", run_env);

    if !Path::new(CONFIG_DIR).exists() {
        info!(
            "Config directory '{}' not found; relying on built-in defaults and environment variables",
            CONFIG_DIR
        );
    }

    // NOTE: api_base_url and gateway_key_id have no defaults - they MUST be
    // provided via environment variables or a config file.
    let config = Config::builder()
        .set_default("environment", DEFAULT_ENV)?
        .set_default("log_level", DEFAULT_LOG_LEVEL)?
        .set_default("log_json", false)?
        .add_source(File::with_name(&format!("{}/default", CONFIG_DIR)).required(false))
        .add_source(File::with_name(&format!("{}/{}", CONFIG_DIR, run_env)).required(false))
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?;

    if config.get_string("api_base_url").is_err() {
        error!("API base URL is not configured. Set APP__API_BASE_URL to the platform deployment URL.");
        return Err(AppConfigError::Load(ConfigError::NotFound(
            "api_base_url is required but not configured. Set APP__API_BASE_URL environment variable.".into(),
        )));
    }

    if config.get_string("gateway_key_id").is_err() {
        error!("Payment gateway key is not configured. Set APP__GATEWAY_KEY_ID to the merchant public key.");
        return Err(AppConfigError::Load(ConfigError::NotFound(
            "gateway_key_id is required but not configured. Set APP__GATEWAY_KEY_ID environment variable.".into(),
        )));
    }

    let app_config: AppConfig = config.try_deserialize()?;

    app_config.validate().map_err(|e| {
        error!("Configuration validation failed: {:?}", e);
        AppConfigError::Validation(e)
    })?;

    info!("Configuration loaded successfully");
    Ok(app_config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> AppConfig {
        AppConfig::new("https://api.learnhub.example", "rzp_test_key")
    }

    #[test]
    fn defaults_are_applied() {
        let cfg = base_config();
        assert_eq!(cfg.items_per_page, 6);
        assert_eq!(cfg.request_timeout_secs, 10);
        assert_eq!(cfg.auth_cookie_name, "access_tokennew");
        assert_eq!(cfg.checkout_theme_color, "#5f63b8");
        assert_eq!(cfg.verification_feedback(), FeedbackPolicy::Silent);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn coupon_base_url_falls_back_to_api_base_url() {
        let mut cfg = base_config();
        assert_eq!(cfg.coupon_api_base_url(), "https://api.learnhub.example");

        cfg.coupon_api_base_url = Some("https://coupons.learnhub.example".into());
        assert_eq!(cfg.coupon_api_base_url(), "https://coupons.learnhub.example");

        cfg.coupon_api_base_url = Some("  ".into());
        assert_eq!(cfg.coupon_api_base_url(), "https://api.learnhub.example");
    }

    #[test]
    fn rejects_non_http_base_url() {
        let mut cfg = base_config();
        cfg.api_base_url = "not a url".into();
        assert!(cfg.validate().is_err());

        cfg.api_base_url = "ftp://files.learnhub.example".into();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_zero_page_size_and_out_of_range_timeout() {
        let mut cfg = base_config();
        cfg.items_per_page = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = base_config();
        cfg.request_timeout_secs = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = base_config();
        cfg.request_timeout_secs = 301;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_unknown_feedback_policy() {
        let mut cfg = base_config();
        cfg.verification_feedback = "popup".into();
        assert!(cfg.validate().is_err());

        cfg.verification_feedback = "NOTIFY".into();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.verification_feedback(), FeedbackPolicy::Notify);
    }

    #[test]
    fn rejects_malformed_theme_color() {
        let mut cfg = base_config();
        cfg.checkout_theme_color = "5f63b8".into();
        assert!(cfg.validate().is_err());

        cfg.checkout_theme_color = "#zzzzzz".into();
        assert!(cfg.validate().is_err());

        cfg.checkout_theme_color = "#fff".into();
        assert!(cfg.validate().is_ok());
    }
}
