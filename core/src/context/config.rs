//! Application configuration
//!
//! Re-exports the shared `AppConfig` from cartera-types and adds
//! persistence plus validated setters for the REPL `config` command.

use std::path::PathBuf;

pub use cartera_types::{AppConfig, LabelPolicy};

use super::error::ConfigError;

pub const APP_NAME: &str = "cartera";
pub const CONFIG_NAME: &str = "config";

// ─────────────────────────────────────────────────────────────────────────────
// AppConfig Extensions
// ─────────────────────────────────────────────────────────────────────────────

/// Extension trait for AppConfig persistence
pub trait AppConfigExt: Sized {
    fn load() -> Self;
    fn try_load() -> Result<Self, ConfigError>;
    fn save(&self) -> Result<(), ConfigError>;
    fn config_path() -> Option<PathBuf>;
    fn set_field(&mut self, key: &str, value: &str) -> Result<(), ConfigError>;
}

impl AppConfigExt for AppConfig {
    /// Load the stored config, falling back to defaults on any error
    fn load() -> Self {
        Self::try_load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "using default configuration");
            AppConfig::default()
        })
    }

    fn try_load() -> Result<Self, ConfigError> {
        Ok(confy::load(APP_NAME, CONFIG_NAME)?)
    }

    fn save(&self) -> Result<(), ConfigError> {
        confy::store(APP_NAME, CONFIG_NAME, self).map_err(ConfigError::Save)
    }

    fn config_path() -> Option<PathBuf> {
        confy::get_configuration_file_path(APP_NAME, CONFIG_NAME).ok()
    }

    fn set_field(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "api_base_url" => {
                url::Url::parse(value).map_err(|e| invalid("api_base_url", e))?;
                self.api_base_url = value.to_string();
            }
            "request_timeout_secs" => {
                self.request_timeout_secs = parse("request_timeout_secs", value)?;
            }
            "debug" => {
                self.debug = Some(value.to_string()).filter(|v| !v.is_empty());
            }
            "label_policy" => {
                self.label_policy = match value {
                    "calendar" => LabelPolicy::Calendar,
                    "shape" => LabelPolicy::Shape,
                    other => return Err(invalid("label_policy", format!("unknown policy '{other}'"))),
                };
            }
            "label_padding" => self.label_padding = parse("label_padding", value)?,
            "label_max_nudges" => self.label_max_nudges = parse("label_max_nudges", value)?,
            "label_nudge_step" => self.label_nudge_step = parse("label_nudge_step", value)?,
            "chart_width" => self.chart_width = parse("chart_width", value)?,
            "chart_height" => self.chart_height = parse("chart_height", value)?,
            _ => return Err(invalid("key", format!("unknown setting '{key}'"))),
        }
        Ok(())
    }
}

fn parse<T>(field: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e| invalid(field, e))
}

fn invalid(field: &'static str, reason: impl std::fmt::Display) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_string(),
    }
}
