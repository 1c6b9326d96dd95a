//! Configuration loading for the curve market
//!
//! Supports JSON configuration files for:
//! - Token metadata (name, symbol)
//! - Curve parameters
//! - Cache refresh cadence
//! - Seed buys run at startup

use bonding_core::{Amount, CurveParameters, HolderId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Root configuration for a bonding-curve market
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketConfig {
    /// Token name
    #[serde(default = "default_token_name")]
    pub name: String,

    /// Token ticker
    #[serde(default = "default_token_symbol")]
    pub symbol: String,

    #[serde(default)]
    pub curve: CurveConfig,

    #[serde(default)]
    pub sync: SyncConfig,

    /// Buys executed once at startup to give the curve some supply
    #[serde(default)]
    pub seed_holders: Vec<SeedBuyConfig>,
}

fn default_token_name() -> String {
    "HarmonyBondingCurveToken".to_string()
}

fn default_token_symbol() -> String {
    "HBCURVE".to_string()
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            name: default_token_name(),
            symbol: default_token_symbol(),
            curve: CurveConfig::default(),
            sync: SyncConfig::default(),
            seed_holders: Vec::new(),
        }
    }
}

impl MarketConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;

        Self::from_json(&content)
    }

    /// Parse configuration from JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn to_curve_parameters(&self) -> Result<CurveParameters, ConfigError> {
        self.curve.to_parameters()
    }

    /// Check every section without building anything
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.to_curve_parameters()?;
        self.sync.validate()?;
        for seed in &self.seed_holders {
            seed.to_seed_buy()?;
        }
        Ok(())
    }
}

/// Curve shape: `price(s) = initial_reserve_price + s / scaling_factor`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveConfig {
    #[serde(default = "default_initial_reserve_price")]
    pub initial_reserve_price: Decimal,
    #[serde(default = "default_scaling_factor")]
    pub scaling_factor: Decimal,
}

fn default_initial_reserve_price() -> Decimal {
    Decimal::new(1, 2)
}

fn default_scaling_factor() -> Decimal {
    Decimal::from(1000)
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self {
            initial_reserve_price: default_initial_reserve_price(),
            scaling_factor: default_scaling_factor(),
        }
    }
}

impl CurveConfig {
    pub fn to_parameters(&self) -> Result<CurveParameters, ConfigError> {
        CurveParameters::new(self.initial_reserve_price, self.scaling_factor)
            .map_err(|e| ConfigError::InvalidCurve(e.to_string()))
    }
}

/// Supply cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
    /// Upper bound on a single snapshot fetch
    #[serde(default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,
}

fn default_refresh_interval_secs() -> u64 {
    10
}

fn default_fetch_timeout_ms() -> u64 {
    5000
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: default_refresh_interval_secs(),
            fetch_timeout_ms: default_fetch_timeout_ms(),
        }
    }
}

impl SyncConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    /// Both the refresh interval and the fetch timeout must be non-zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.refresh_interval_secs == 0 {
            return Err(ConfigError::InvalidSync(
                "refresh_interval_secs must be positive".to_string(),
            ));
        }
        if self.fetch_timeout_ms == 0 {
            return Err(ConfigError::InvalidSync(
                "fetch_timeout_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// A holder funded by buying at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedBuyConfig {
    pub holder: String,
    pub base_amount: Decimal,
}

impl SeedBuyConfig {
    pub fn to_seed_buy(&self) -> Result<(HolderId, Amount), ConfigError> {
        if self.holder.trim().is_empty() {
            return Err(ConfigError::InvalidSeed("empty holder id".to_string()));
        }
        let amount = Amount::from_decimal(self.base_amount)
            .map_err(|e| ConfigError::InvalidSeed(format!("{}: {}", self.holder, e)))?;
        Ok((HolderId::new(self.holder.trim()), amount))
    }
}

/// Configuration errors
#[derive(Debug, Clone)]
pub enum ConfigError {
    Io { path: String, error: String },
    Parse(String),
    InvalidCurve(String),
    InvalidSeed(String),
    InvalidSync(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io { path, error } => {
                write!(f, "Failed to read config file '{}': {}", path, error)
            }
            ConfigError::Parse(e) => write!(f, "Failed to parse config: {}", e),
            ConfigError::InvalidCurve(e) => write!(f, "Invalid curve config: {}", e),
            ConfigError::InvalidSeed(e) => write!(f, "Invalid seed holder: {}", e),
            ConfigError::InvalidSync(e) => write!(f, "Invalid sync config: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_minimal_config() {
        let config = MarketConfig::from_json("{}").unwrap();
        assert_eq!(config.name, "HarmonyBondingCurveToken");
        assert_eq!(config.symbol, "HBCURVE");
        assert_eq!(config.curve.initial_reserve_price, dec!(0.01));
        assert_eq!(config.curve.scaling_factor, dec!(1000));
        assert_eq!(config.sync.refresh_interval(), Duration::from_secs(10));
        assert_eq!(config.sync.fetch_timeout(), Duration::from_secs(5));
        assert!(config.seed_holders.is_empty());
    }

    #[test]
    fn test_parse_full_config() {
        let json = r#"{
            "name": "Test Curve",
            "symbol": "TCRV",
            "curve": {
                "initial_reserve_price": "0.5",
                "scaling_factor": "250"
            },
            "sync": { "refresh_interval_secs": 3 },
            "seed_holders": [
                { "holder": "alice", "base_amount": "2.5" }
            ]
        }"#;

        let config = MarketConfig::from_json(json).unwrap();
        assert_eq!(config.symbol, "TCRV");
        assert_eq!(config.sync.refresh_interval_secs, 3);

        let params = config.to_curve_parameters().unwrap();
        assert_eq!(
            params.initial_reserve_price(),
            Amount::from_decimal(dec!(0.5)).unwrap()
        );

        let (holder, amount) = config.seed_holders[0].to_seed_buy().unwrap();
        assert_eq!(holder.as_str(), "alice");
        assert_eq!(amount, Amount::from_decimal(dec!(2.5)).unwrap());
    }

    #[test]
    fn test_zero_scaling_factor_rejected() {
        let json = r#"{ "curve": { "scaling_factor": "0" } }"#;
        let config = MarketConfig::from_json(json).unwrap();
        assert!(matches!(
            config.to_curve_parameters(),
            Err(ConfigError::InvalidCurve(_))
        ));
    }

    #[test]
    fn test_zero_refresh_interval_rejected() {
        let config =
            MarketConfig::from_json(r#"{ "sync": { "refresh_interval_secs": 0 } }"#).unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::InvalidSync(_))));

        let config = MarketConfig::from_json(r#"{ "sync": { "fetch_timeout_ms": 0 } }"#).unwrap();
        assert!(matches!(
            config.sync.validate(),
            Err(ConfigError::InvalidSync(_))
        ));

        assert!(MarketConfig::default().validate().is_ok());
    }

    #[test]
    fn test_negative_seed_rejected() {
        let seed = SeedBuyConfig {
            holder: "bob".to_string(),
            base_amount: dec!(-1),
        };
        assert!(matches!(seed.to_seed_buy(), Err(ConfigError::InvalidSeed(_))));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            MarketConfig::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = MarketConfig::from_file("/nonexistent/curve.json").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/curve.json"));
    }
}
