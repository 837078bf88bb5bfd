use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use validator::Validate;

use crate::error::{PricingError, PricingResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub provider: ProviderConfig,
    pub pricing: PricingConfig,
    pub distributors: Vec<DistributorConfig>,
    pub logging: LoggingConfig,
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_request_size: usize,
}

/// Remote part-info provider settings.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ProviderConfig {
    #[validate(length(min = 1, message = "Provider name is required"))]
    pub name: String,
    #[validate(url(message = "Provider URL must be a valid URL"))]
    pub url: String,
    pub timeout_seconds: u64,
    #[validate(range(min = 1, message = "At least one part per query is required"))]
    pub max_parts_per_query: usize,
    pub priority: u32,
    /// Internal distributor id -> provider vendor name.
    pub distributors: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct PricingConfig {
    #[validate(length(equal = 3, message = "Currency must be an ISO 4217 code"))]
    pub currency: String,
    #[validate(length(equal = 3, message = "Currency must be an ISO 4217 code"))]
    pub default_currency: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DistributorConfig {
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default = "default_true")]
    pub web: bool,
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Regex of stock codes never chosen as the canonical SKU.
    #[serde(default)]
    pub ignore_stock_code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub file_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    pub metrics_enabled: bool,
}

fn default_true() -> bool {
    true
}

impl AppConfig {
    pub fn load() -> PricingResult<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(
                File::with_name(&format!(
                    "config/{}",
                    env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into())
                ))
                .required(false),
            )
            // Add local config (gitignored)
            .add_source(File::with_name("config/local").required(false))
            .add_source(Environment::with_prefix("BOMPRICE").separator("__"));

        let config: Self = config.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> PricingResult<()> {
        self.provider
            .validate()
            .map_err(|e| PricingError::validation("provider", e.to_string()))?;
        self.pricing
            .validate()
            .map_err(|e| PricingError::validation("pricing", e.to_string()))?;
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            provider: ProviderConfig::default(),
            pricing: PricingConfig::default(),
            distributors: DistributorConfig::default_set(),
            logging: LoggingConfig::default(),
            monitoring: MonitoringConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8087,
            max_request_size: 4 * 1024 * 1024, // 4MB
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        let distributors = [
            ("arrow", "Arrow Electronics"),
            ("digikey", "Digikey"),
            ("farnell", "Farnell"),
            ("lcsc", "LCSC"),
            ("mouser", "Mouser"),
            ("newark", "Newark"),
            ("rs", "RS"),
            ("tme", "TME"),
        ]
        .into_iter()
        .map(|(id, vendor)| (id.to_string(), vendor.to_string()))
        .collect();

        Self {
            name: "kitspace".to_string(),
            url: "https://dev-partinfo.kitspace.org/graphql".to_string(),
            timeout_seconds: 60,
            max_parts_per_query: 20,
            priority: 50,
            distributors,
        }
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            currency: "USD".to_string(),
            default_currency: "USD".to_string(),
        }
    }
}

impl DistributorConfig {
    pub fn web(name: &str, label: &str) -> Self {
        Self {
            name: name.to_string(),
            label: Some(label.to_string()),
            web: true,
            enabled: true,
            ignore_stock_code: None,
        }
    }

    pub fn default_set() -> Vec<Self> {
        let mut digikey = Self::web("digikey", "Digi-Key");
        // Digi-Reel codes carry a reeling fee.
        digikey.ignore_stock_code = Some(r"-6-ND$".to_string());

        vec![
            Self::web("arrow", "Arrow Electronics"),
            digikey,
            Self::web("farnell", "Farnell"),
            Self::web("lcsc", "LCSC"),
            Self::web("mouser", "Mouser"),
            Self::web("newark", "Newark"),
            Self::web("rs", "RS Components"),
            Self::web("tme", "TME"),
        ]
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file_path: None,
        }
    }
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: true,
        }
    }
}
