//! Engine configuration.
//!
//! `AppConfig` is the unified configuration surface passed to
//! [`crate::app::SoleFitEngine::start`]. Defaults mirror the production
//! constants; an optional INI file overrides individual keys:
//!
//! ```ini
//! [assets]
//! base_url = https://cdn.example/shoes
//! preload = 1,2,3
//! max_asset_bytes = 5242880
//! timeout_secs = 30
//!
//! [tracking]
//! confidence_threshold = 0.5
//! interval_ms = 100
//!
//! [performance]
//! reassess_secs = 5
//! ```
//!
//! A missing file or missing key falls back to the default; only a value
//! that fails to parse is an error.

use std::path::Path;
use std::time::Duration;

use ini::Ini;
use thiserror::Error;

use crate::model::ModelId;
use crate::track::DEFAULT_CONFIDENCE_THRESHOLD;

/// Default asset host for local development.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Models warmed at startup.
pub const DEFAULT_PRELOAD: [&str; 3] = ["1", "2", "3"];

/// Errors raised while reading a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but cannot be read or parsed as INI.
    #[error("failed to read config file: {0}")]
    Ini(#[from] ini::Error),

    /// A present key holds an unparseable value.
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Unified engine configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Base URL asset paths resolve against.
    pub asset_base_url: String,
    /// Models to warm at startup.
    pub preload_models: Vec<ModelId>,
    /// Advisory asset size limit in bytes.
    pub max_asset_bytes: u64,
    /// Transport timeout for asset fetches.
    pub fetch_timeout: Duration,
    /// Tracking confidence threshold.
    pub confidence_threshold: f32,
    /// Interval between tracking updates at full quality.
    pub tracking_interval: Duration,
    /// Cadence of the periodic quality reassessment.
    pub reassess_interval: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            asset_base_url: DEFAULT_BASE_URL.to_string(),
            preload_models: DEFAULT_PRELOAD.iter().map(|id| ModelId::new(*id)).collect(),
            max_asset_bytes: crate::model::DEFAULT_MAX_ASSET_BYTES,
            fetch_timeout: crate::model::DEFAULT_FETCH_TIMEOUT,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            tracking_interval: Duration::from_millis(100),
            reassess_interval: Duration::from_secs(5),
        }
    }
}

impl AppConfig {
    /// Set the asset base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.asset_base_url = base_url.into();
        self
    }

    /// Set the preload list.
    pub fn with_preload(mut self, ids: Vec<ModelId>) -> Self {
        self.preload_models = ids;
        self
    }

    /// Set the tracking confidence threshold.
    pub fn with_confidence_threshold(mut self, threshold: f32) -> Self {
        self.confidence_threshold = threshold;
        self
    }

    /// Load configuration from an INI file, falling back to defaults for
    /// anything the file does not mention.
    pub fn from_ini_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_file(path.as_ref())?;
        Self::from_ini(&ini)
    }

    fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(assets) = ini.section(Some("assets")) {
            if let Some(base_url) = assets.get("base_url") {
                config.asset_base_url = base_url.trim().to_string();
            }
            if let Some(preload) = assets.get("preload") {
                config.preload_models = preload
                    .split(',')
                    .map(str::trim)
                    .filter(|id| !id.is_empty())
                    .map(ModelId::new)
                    .collect();
            }
            if let Some(value) = assets.get("max_asset_bytes") {
                config.max_asset_bytes = parse(value, "assets.max_asset_bytes")?;
            }
            if let Some(value) = assets.get("timeout_secs") {
                config.fetch_timeout = Duration::from_secs(parse(value, "assets.timeout_secs")?);
            }
        }

        if let Some(tracking) = ini.section(Some("tracking")) {
            if let Some(value) = tracking.get("confidence_threshold") {
                config.confidence_threshold = parse(value, "tracking.confidence_threshold")?;
            }
            if let Some(value) = tracking.get("interval_ms") {
                config.tracking_interval =
                    Duration::from_millis(parse(value, "tracking.interval_ms")?);
            }
        }

        if let Some(performance) = ini.section(Some("performance")) {
            if let Some(value) = performance.get("reassess_secs") {
                config.reassess_interval =
                    Duration::from_secs(parse(value, "performance.reassess_secs")?);
            }
        }

        Ok(config)
    }
}

fn parse<T: std::str::FromStr>(value: &str, key: &'static str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        key,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_str(content: &str) -> Result<AppConfig, ConfigError> {
        let ini = Ini::load_from_str(content).expect("test ini parses");
        AppConfig::from_ini(&ini)
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.asset_base_url, DEFAULT_BASE_URL);
        assert_eq!(config.preload_models.len(), 3);
        assert_eq!(config.confidence_threshold, 0.5);
        assert_eq!(config.max_asset_bytes, 5 * 1024 * 1024);
    }

    #[test]
    fn test_full_file_overrides_everything() {
        let config = from_str(
            "[assets]\n\
             base_url = https://cdn.example/shoes\n\
             preload = runner, trail\n\
             max_asset_bytes = 1048576\n\
             timeout_secs = 10\n\
             [tracking]\n\
             confidence_threshold = 0.7\n\
             interval_ms = 200\n\
             [performance]\n\
             reassess_secs = 2\n",
        )
        .unwrap();
        assert_eq!(config.asset_base_url, "https://cdn.example/shoes");
        assert_eq!(config.preload_models, vec![ModelId::new("runner"), ModelId::new("trail")]);
        assert_eq!(config.max_asset_bytes, 1_048_576);
        assert_eq!(config.fetch_timeout, Duration::from_secs(10));
        assert_eq!(config.confidence_threshold, 0.7);
        assert_eq!(config.tracking_interval, Duration::from_millis(200));
        assert_eq!(config.reassess_interval, Duration::from_secs(2));
    }

    #[test]
    fn test_missing_sections_fall_back_to_defaults() {
        let config = from_str("[assets]\nbase_url = http://other\n").unwrap();
        assert_eq!(config.asset_base_url, "http://other");
        assert_eq!(config.confidence_threshold, 0.5);
        assert_eq!(config.reassess_interval, Duration::from_secs(5));
    }

    #[test]
    fn test_invalid_value_is_an_error() {
        let err = from_str("[tracking]\nconfidence_threshold = very\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key, .. }
            if key == "tracking.confidence_threshold"));
    }

    #[test]
    fn test_builders() {
        let config = AppConfig::default()
            .with_base_url("http://a")
            .with_preload(vec![ModelId::new("x")])
            .with_confidence_threshold(0.6);
        assert_eq!(config.asset_base_url, "http://a");
        assert_eq!(config.preload_models, vec![ModelId::new("x")]);
        assert_eq!(config.confidence_threshold, 0.6);
    }
}
