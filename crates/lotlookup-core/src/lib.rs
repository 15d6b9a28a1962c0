pub mod app_config;
pub mod config;
pub mod identifier;
pub mod types;

pub use app_config::{AppConfig, CopartStrategy, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use identifier::{classify_and_extract, IdentifierError};
pub use types::{LotIdentifier, NormalizedRecord, Platform};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
