//! API configuration

use serde::Deserialize;

use core_kernel::Timezone;
use domain_payment::{PaymentPolicy, DEFAULT_REMINDER_WINDOW_DAYS};

/// API configuration
///
/// Every field has a default, so a partial environment is enough.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// JWT secret for authentication
    pub jwt_secret: String,
    /// JWT expiration in seconds
    pub jwt_expiration_secs: u64,
    /// Log level
    pub log_level: String,
    /// Timezone that decides what "today" is for due dates
    pub timezone: Timezone,
    /// Days ahead an installment or subscription end is reported as due soon
    pub reminder_window_days: u32,
    /// Reject payments dated more than this many days before the due date
    pub early_payment_grace_days: Option<u32>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            jwt_secret: "change-me-in-production".to_string(),
            jwt_expiration_secs: 3600,
            log_level: "info".to_string(),
            timezone: Timezone::default(),
            reminder_window_days: DEFAULT_REMINDER_WINDOW_DAYS,
            early_payment_grace_days: None,
        }
    }
}

impl ApiConfig {
    /// Loads configuration from `API_*` environment variables
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("API").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn payment_policy(&self) -> PaymentPolicy {
        PaymentPolicy {
            early_payment_grace_days: self.early_payment_grace_days,
        }
    }
}
