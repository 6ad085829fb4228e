//! Application configuration loaded from environment variables.

use rust_decimal::Decimal;
use serde::Deserialize;
use url::Url;

use crate::betting::stake::parse_amount;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Backend ===
    /// Base URL of the betting backend.
    #[serde(default = "default_api_url")]
    pub betmaster_api_url: String,

    /// Per-request timeout in milliseconds.
    #[serde(default = "default_http_timeout_ms")]
    pub http_timeout_ms: u64,

    // === Bet Slip ===
    /// Stake given to every new slip entry.
    #[serde(default = "default_stake")]
    pub default_stake: String,

    /// Bookmaker sent when a selection carries none.
    #[serde(default = "default_bookmaker")]
    pub default_bookmaker: String,

    // === Sandbox Backend ===
    /// Port for the `sandbox` subcommand.
    #[serde(default = "default_sandbox_port")]
    pub sandbox_port: u16,

    /// Starting balance of the sandbox backend.
    #[serde(default = "default_sandbox_balance")]
    pub sandbox_balance: Decimal,

    // === Logging ===
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,

    /// Enable verbose logging.
    #[serde(default)]
    pub verbose: bool,
}

fn default_api_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_http_timeout_ms() -> u64 {
    10_000
}

fn default_stake() -> String {
    "10".to_string()
}

fn default_bookmaker() -> String {
    "betmgm".to_string()
}

fn default_sandbox_port() -> u16 {
    8000
}

fn default_sandbox_balance() -> Decimal {
    Decimal::new(100, 0) // R$100
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            betmaster_api_url: default_api_url(),
            http_timeout_ms: default_http_timeout_ms(),
            default_stake: default_stake(),
            default_bookmaker: default_bookmaker(),
            sandbox_port: default_sandbox_port(),
            sandbox_balance: default_sandbox_balance(),
            rust_log: default_log_level(),
            verbose: false,
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Config pointing at a specific backend, everything else default.
    pub fn for_backend(api_url: impl Into<String>) -> Self {
        Self {
            betmaster_api_url: api_url.into(),
            ..Self::default()
        }
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        let url = self.api_url()?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(format!(
                "BETMASTER_API_URL must be http or https, got {}",
                url.scheme()
            ));
        }

        if self.http_timeout_ms == 0 {
            return Err("HTTP_TIMEOUT_MS must be greater than 0".to_string());
        }

        match parse_amount(&self.default_stake) {
            Some(stake) if stake >= Decimal::ZERO => {}
            _ => {
                return Err(format!(
                    "DEFAULT_STAKE must be a non-negative number, got {:?}",
                    self.default_stake
                ))
            }
        }

        if self.default_bookmaker.trim().is_empty() {
            return Err("DEFAULT_BOOKMAKER must not be empty".to_string());
        }

        if self.sandbox_balance < Decimal::ZERO {
            return Err("SANDBOX_BALANCE must not be negative".to_string());
        }

        Ok(())
    }

    /// Parsed backend base URL.
    pub fn api_url(&self) -> Result<Url, String> {
        Url::parse(&self.betmaster_api_url)
            .map_err(|e| format!("BETMASTER_API_URL is not a valid URL: {}", e))
    }
}
