use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::core::PipelineSettings;
use crate::models::ScoringWeights;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub oracle: OracleSettings,
    #[serde(default)]
    pub selection: SelectionSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

#[derive(Debug, Clone, Deserialize)]
pub struct OracleSettings {
    #[serde(default = "default_oracle_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_oracle_model")]
    pub model: String,
    #[serde(default = "default_oracle_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_candidates")]
    pub max_candidates: usize,
}

impl Default for OracleSettings {
    fn default() -> Self {
        Self {
            endpoint: default_oracle_endpoint(),
            api_key: String::new(),
            model: default_oracle_model(),
            timeout_secs: default_oracle_timeout(),
            max_candidates: default_max_candidates(),
        }
    }
}

fn default_oracle_endpoint() -> String { "https://api.openai.com".to_string() }
fn default_oracle_model() -> String { "gpt-4".to_string() }
fn default_oracle_timeout() -> u64 { 30 }
fn default_max_candidates() -> usize { 10 }

#[derive(Debug, Clone, Deserialize)]
pub struct SelectionSettings {
    #[serde(default = "default_service_radius")]
    pub service_radius_km: f64,
    #[serde(default = "default_availability_window")]
    pub availability_window_hours: i64,
    #[serde(default = "default_max_fallback_vendors")]
    pub max_fallback_vendors: usize,
}

impl Default for SelectionSettings {
    fn default() -> Self {
        Self {
            service_radius_km: default_service_radius(),
            availability_window_hours: default_availability_window(),
            max_fallback_vendors: default_max_fallback_vendors(),
        }
    }
}

fn default_service_radius() -> f64 { 25.0 }
fn default_availability_window() -> i64 { 24 }
fn default_max_fallback_vendors() -> usize { 2 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_completion_weight")]
    pub completion: f64,
    #[serde(default = "default_rating_weight")]
    pub rating: f64,
    #[serde(default = "default_response_weight")]
    pub response: f64,
    #[serde(default = "default_online_weight")]
    pub online: f64,
    #[serde(default = "default_workload_weight")]
    pub workload: f64,
    #[serde(default = "default_urgent_bonus")]
    pub urgent_bonus: f64,
    #[serde(default = "default_new_vendor_bonus")]
    pub new_vendor_bonus: f64,
    #[serde(default = "default_response_baseline")]
    pub response_baseline_minutes: f64,
    #[serde(default = "default_new_vendor_threshold")]
    pub new_vendor_order_threshold: u32,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            completion: default_completion_weight(),
            rating: default_rating_weight(),
            response: default_response_weight(),
            online: default_online_weight(),
            workload: default_workload_weight(),
            urgent_bonus: default_urgent_bonus(),
            new_vendor_bonus: default_new_vendor_bonus(),
            response_baseline_minutes: default_response_baseline(),
            new_vendor_order_threshold: default_new_vendor_threshold(),
        }
    }
}

fn default_completion_weight() -> f64 { 40.0 }
fn default_rating_weight() -> f64 { 25.0 }
fn default_response_weight() -> f64 { 15.0 }
fn default_online_weight() -> f64 { 10.0 }
fn default_workload_weight() -> f64 { 10.0 }
fn default_urgent_bonus() -> f64 { 20.0 }
fn default_new_vendor_bonus() -> f64 { 15.0 }
fn default_response_baseline() -> f64 { 120.0 }
fn default_new_vendor_threshold() -> u32 { 10 }

impl From<&WeightsConfig> for ScoringWeights {
    fn from(config: &WeightsConfig) -> Self {
        Self {
            completion: config.completion,
            rating: config.rating,
            response: config.response,
            online: config.online,
            workload: config.workload,
            urgent_bonus: config.urgent_bonus,
            new_vendor_bonus: config.new_vendor_bonus,
            response_baseline_minutes: config.response_baseline_minutes,
            new_vendor_order_threshold: config.new_vendor_order_threshold,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with VENDOR_SELECT)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., VENDOR_SELECT__ORACLE__MODEL -> oracle.model
            .add_source(
                Environment::with_prefix("VENDOR_SELECT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("VENDOR_SELECT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Pipeline tunables derived from the loaded settings
    pub fn pipeline_settings(&self) -> PipelineSettings {
        PipelineSettings {
            service_radius_km: self.selection.service_radius_km,
            availability_window: chrono::Duration::hours(self.selection.availability_window_hours),
            oracle_timeout: Duration::from_secs(self.oracle.timeout_secs),
            max_candidates: self.oracle.max_candidates,
            max_fallback_vendors: self.selection.max_fallback_vendors,
            weights: ScoringWeights::from(&self.scoring.weights),
        }
    }
}

/// Fill the oracle API key from the conventional OPENAI_API_KEY variable
/// unless it was configured explicitly
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let configured = settings
        .get_string("oracle.api_key")
        .map(|key| !key.is_empty())
        .unwrap_or(false);

    match env::var("OPENAI_API_KEY") {
        Ok(api_key) if !configured => Config::builder()
            .add_source(settings)
            .set_override("oracle.api_key", api_key)?
            .build(),
        _ => Ok(settings),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights() {
        let weights = ScoringWeights::from(&WeightsConfig::default());
        assert_eq!(weights, ScoringWeights::default());
    }

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "json");
    }

    #[test]
    fn test_shipped_config_parses() {
        let settings: Settings =
            toml::from_str(include_str!("../config/default.toml")).unwrap();

        assert_eq!(settings.selection.service_radius_km, 25.0);
        assert_eq!(settings.oracle.max_candidates, 10);
        assert_eq!(settings.scoring.weights.urgent_bonus, 20.0);
    }

    #[test]
    fn test_pipeline_settings_from_defaults() {
        let settings: Settings = toml::from_str("").unwrap();
        let pipeline = settings.pipeline_settings();

        assert_eq!(pipeline.service_radius_km, 25.0);
        assert_eq!(pipeline.availability_window, chrono::Duration::hours(24));
        assert_eq!(pipeline.oracle_timeout, Duration::from_secs(30));
        assert_eq!(pipeline.max_fallback_vendors, 2);
    }
}
