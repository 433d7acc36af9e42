//! Market settings read from configuration.
//!
//! ```ini
//! [market]
//! precision = 2
//! currency = £
//! vwap_window_minutes = 15
//!
//! [securities]
//! precision = 2
//! path = securities.csv
//! trades = trades.csv
//! ```

use crate::domain::error::MarketError;
use crate::domain::precision::DEFAULT_PRECISION;
use crate::domain::trade::{DEFAULT_CURRENCY, DEFAULT_WINDOW_MINUTES};
use crate::ports::config_port::ConfigPort;

#[derive(Debug, Clone, PartialEq)]
pub struct MarketSettings {
    pub index_precision: i64,
    pub security_precision: i64,
    pub currency: String,
    pub vwap_window_minutes: i64,
    pub securities_path: Option<String>,
    pub trades_path: Option<String>,
}

impl Default for MarketSettings {
    fn default() -> Self {
        MarketSettings {
            index_precision: DEFAULT_PRECISION as i64,
            security_precision: DEFAULT_PRECISION as i64,
            currency: DEFAULT_CURRENCY.to_string(),
            vwap_window_minutes: DEFAULT_WINDOW_MINUTES,
            securities_path: None,
            trades_path: None,
        }
    }
}

impl MarketSettings {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, MarketError> {
        let defaults = MarketSettings::default();

        let vwap_window_minutes =
            config.get_int("market", "vwap_window_minutes", defaults.vwap_window_minutes);
        if vwap_window_minutes <= 0 {
            return Err(MarketError::ConfigInvalid {
                section: "market".to_string(),
                key: "vwap_window_minutes".to_string(),
                reason: "vwap_window_minutes must be positive".to_string(),
            });
        }

        let currency = match config.get_string("market", "currency") {
            Some(c) if c.trim().is_empty() => {
                return Err(MarketError::ConfigInvalid {
                    section: "market".to_string(),
                    key: "currency".to_string(),
                    reason: "currency must not be empty".to_string(),
                });
            }
            Some(c) => c.trim().to_string(),
            None => defaults.currency,
        };

        Ok(MarketSettings {
            index_precision: config.get_int("market", "precision", defaults.index_precision),
            security_precision: config.get_int(
                "securities",
                "precision",
                defaults.security_precision,
            ),
            currency,
            vwap_window_minutes,
            securities_path: non_empty(config.get_string("securities", "path")),
            trades_path: non_empty(config.get_string("securities", "trades")),
        })
    }

    /// Path to the securities table, required for anything that builds a
    /// market.
    pub fn require_securities_path(&self) -> Result<&str, MarketError> {
        self.securities_path
            .as_deref()
            .ok_or_else(|| MarketError::ConfigMissing {
                section: "securities".to_string(),
                key: "path".to_string(),
            })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
