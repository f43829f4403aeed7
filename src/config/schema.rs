use serde::{Deserialize, Serialize};

/// Main configuration.
///
/// Example YAML:
/// ```yaml
/// inputs:
///   - "~/kite-data/analyzed/*.jsonl"
/// min_score: 0
/// deals:
///   min_score: 75
///   max_price: 6000
///   limit: 10
/// recent:
///   window: "48h"
///   min_score: 65
/// log_level: warn
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Files or glob patterns holding analyzed listings (JSON array or JSON lines)
    #[serde(default)]
    pub inputs: Vec<String>,

    /// Listings scoring below this are hidden from the ranked list
    #[serde(default)]
    pub min_score: Option<f64>,

    #[serde(default)]
    pub deals: DealsConfig,

    #[serde(default)]
    pub recent: RecentConfig,

    /// Tracing filter used when RUST_LOG is unset (e.g. "warn", "kite_resale=debug")
    #[serde(default)]
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            min_score: Some(0.0),
            deals: DealsConfig::default(),
            recent: RecentConfig::default(),
            log_level: Some("warn".to_string()),
        }
    }
}

/// Hot deal selection.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct DealsConfig {
    pub min_score: f64,
    /// Highest asking price (BRL) still considered a deal
    pub max_price: f64,
    pub limit: usize,
}

impl Default for DealsConfig {
    fn default() -> Self {
        Self {
            min_score: 75.0,
            max_price: 6000.0,
            limit: 10,
        }
    }
}

/// Recent opportunity selection.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct RecentConfig {
    /// How far back to look, as a duration string ("48h", "2days")
    pub window: String,
    pub min_score: f64,
    pub limit: usize,
}

impl Default for RecentConfig {
    fn default() -> Self {
        Self {
            window: "48h".to_string(),
            min_score: 65.0,
            limit: 10,
        }
    }
}
