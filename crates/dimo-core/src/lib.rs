pub mod app_config;
pub mod config;
pub mod stores;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env, DEFAULT_STORE_LOGO_URL};
pub use stores::{BrandRecord, Coordinate, RatingAggregate, StoreRecord};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid latitude: {0}")]
    InvalidLatitude(f64),
    #[error("invalid longitude: {0}")]
    InvalidLongitude(f64),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required env var: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for env var {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
