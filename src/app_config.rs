//! Application configuration from file and environment variables
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. Environment variables (prefixed with BLOGCRAFT_)
//! 2. Config file (config.toml)
//! 3. Default values
//!
//! Secrets (the LLM API key, payment keys, the webhook secret) belong in
//! environment variables, not in the config file.

use config::{Config, ConfigError, Environment, File};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::sync::RwLock;

/// Global application configuration
pub static APP_CONFIG: Lazy<RwLock<AppConfig>> = Lazy::new(|| {
    RwLock::new(AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config file, using defaults: {}", e);
        AppConfig::default()
    }))
});

/// Site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub name: String,
    pub description: String,
    pub base_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: "BlogCraft".to_string(),
            description: "AI-assisted place review drafting".to_string(),
            base_url: "http://localhost:8080".to_string(),
        }
    }
}

/// Security configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Minimum signup password length
    pub min_password_length: u32,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            min_password_length: 8,
        }
    }
}

/// Rate limiting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Login attempts per window
    pub login_max_attempts: u32,
    /// Login rate limit window in seconds
    pub login_window_seconds: u32,
    /// Registrations per hour per address
    pub registration_per_hour: u32,
    /// Generation runs per window per user
    pub generation_max_runs: u32,
    /// Generation rate limit window in seconds
    pub generation_window_seconds: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            login_max_attempts: 5,
            login_window_seconds: 300,
            registration_per_hour: 3,
            generation_max_runs: 10,
            generation_window_seconds: 3600,
        }
    }
}

/// Content limits configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum upload size in MB
    pub max_upload_size_mb: u32,
    /// Learning samples required before a style profile can be generated
    pub min_samples_for_profile: u32,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_upload_size_mb: 10,
            min_samples_for_profile: 5,
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Local storage path for uploaded photos
    pub local_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            local_path: "./uploads".to_string(),
        }
    }
}

/// Content generation provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// API key (should be in env var BLOGCRAFT_LLM_API_KEY)
    #[serde(default)]
    pub api_key: String,
    /// Chat-completions endpoint base URL
    pub base_url: String,
    /// Model identifier
    pub model: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
        }
    }
}

/// Payments provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentsConfig {
    /// Secret API key (should be in env var BLOGCRAFT_PAYMENTS_SECRET_KEY)
    #[serde(default)]
    pub secret_key: String,
    /// Webhook signing secret (env var BLOGCRAFT_PAYMENTS_WEBHOOK_SECRET)
    #[serde(default)]
    pub webhook_secret: String,
    /// Price id for the pro subscription
    pub pro_price_id: String,
    /// Stripe-compatible API base URL
    pub api_base: String,
}

impl Default for PaymentsConfig {
    fn default() -> Self {
        Self {
            secret_key: String::new(),
            webhook_secret: String::new(),
            pro_price_id: String::new(),
            api_base: "https://api.stripe.com/v1".to_string(),
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub site: SiteConfig,
    pub security: SecurityConfig,
    pub rate_limit: RateLimitConfig,
    pub limits: LimitsConfig,
    pub storage: StorageConfig,
    pub llm: LlmConfig,
    pub payments: PaymentsConfig,
}

impl AppConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_path("config.toml")
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &str) -> Result<Self, ConfigError> {
        use config::FileFormat;

        let config = Config::builder()
            // Start with defaults
            .add_source(config::Config::try_from(&AppConfig::default())?)
            // Add config file (optional)
            .add_source(File::new(path, FileFormat::Toml).required(false))
            // Override with environment variables (BLOGCRAFT_ prefix)
            // e.g., BLOGCRAFT_LLM_API_KEY, BLOGCRAFT_SITE_NAME
            .add_source(
                Environment::with_prefix("BLOGCRAFT")
                    .separator("_")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

/// Force the config to load at startup so failures surface early.
pub fn init() {
    Lazy::force(&APP_CONFIG);
}

pub fn site() -> SiteConfig {
    APP_CONFIG.read().unwrap().site.clone()
}

pub fn security() -> SecurityConfig {
    APP_CONFIG.read().unwrap().security.clone()
}

pub fn rate_limit() -> RateLimitConfig {
    APP_CONFIG.read().unwrap().rate_limit.clone()
}

pub fn limits() -> LimitsConfig {
    APP_CONFIG.read().unwrap().limits.clone()
}

pub fn storage() -> StorageConfig {
    APP_CONFIG.read().unwrap().storage.clone()
}

pub fn llm() -> LlmConfig {
    APP_CONFIG.read().unwrap().llm.clone()
}

pub fn payments() -> PaymentsConfig {
    APP_CONFIG.read().unwrap().payments.clone()
}
