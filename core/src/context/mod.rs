//! Persistent client configuration

mod config;
mod error;

pub use config::{APP_NAME, AppConfigExt, CONFIG_NAME};
pub use error::ConfigError;
