use std::{env, time::Duration};

use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use habita_plan::DuplicatePolicy;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub api: ApiConfig,
    #[serde(default)]
    pub plan: PlanConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone)]
pub struct PlanConfig {
    #[serde(default = "default_duration_days")]
    pub duration_days: u8,
    #[serde(default)]
    pub duplicate_policy: DuplicatePolicy,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            duration_days: default_duration_days(),
            duplicate_policy: DuplicatePolicy::default(),
        }
    }
}

fn default_duration_days() -> u8 {
    7
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file and environment variables
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (HABITA__API__BASE_URL, etc.)
    /// 2. Config file specified by path
    /// 3. Hardcoded defaults
    pub fn load(config_path: Option<String>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder()
            .set_default("api.base_url", "http://localhost:3000")?
            .set_default("api.timeout_secs", default_timeout_secs())?
            .set_default("plan.duration_days", default_duration_days())?
            .set_default("plan.duplicate_policy", "reject")?
            .set_default("logging.level", default_log_level())?;

        let config_file_path = config_path
            .or_else(|| env::var("CONFIG_PATH").ok())
            .unwrap_or_else(|| "config/default.toml".to_string());

        // The file is optional
        if std::path::Path::new(&config_file_path).exists() {
            builder = builder.add_source(File::with_name(&config_file_path));
        }

        builder = builder.add_source(
            Environment::with_prefix("HABITA")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        if let Ok(token) = env::var("HABITA_API_TOKEN") {
            builder = builder.set_override("api.token", token)?;
        }

        builder.build()?.try_deserialize()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.api.base_url.trim().is_empty() {
            return Err("API base_url must not be empty".to_string());
        }
        if self.api.timeout_secs == 0 {
            return Err("API timeout_secs must be greater than 0".to_string());
        }
        if !(1..=31).contains(&self.plan.duration_days) {
            return Err("Plan duration_days must be between 1 and 31".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            api: ApiConfig {
                base_url: "http://localhost:3000".to_string(),
                token: None,
                timeout_secs: 30,
            },
            plan: PlanConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    #[test]
    fn test_validation_valid_config() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn test_validation_empty_base_url() {
        let mut config = config();
        config.api.base_url = "  ".to_string();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_zero_timeout() {
        let mut config = config();
        config.api.timeout_secs = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_duration_out_of_range() {
        let mut config = config();
        config.plan.duration_days = 0;
        assert!(config.validate().is_err());

        config.plan.duration_days = 32;
        assert!(config.validate().is_err());

        config.plan.duration_days = 31;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_plan_defaults() {
        let plan = PlanConfig::default();

        assert_eq!(plan.duration_days, 7);
        assert_eq!(plan.duplicate_policy, DuplicatePolicy::Reject);
    }
}
