pub mod app_config;
pub mod config;
pub mod filters;
pub mod geo;
pub mod keys;
pub mod types;

pub use app_config::{AppConfig, Environment, LockWaitPolicy};
pub use config::{load_app_config, load_app_config_from_env};
pub use filters::{load_filter_profile, FilterProfile};
pub use geo::{great_circle_distance_m, CoordinateNormalizer, NormalizedCoordinate};
pub use keys::{CacheKey, CacheKeyBuilder, KEY_VERSION};
pub use types::{
    Coordinate, DirectionQuery, DirectionResult, DistanceSource, DistanceUnit, GeoQuery,
    PlaceResult, QueryMode, ValidationError,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read filters file {path}: {source}")]
    FiltersFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse filters file: {0}")]
    FiltersFileParse(#[from] serde_yaml::Error),

    #[error("configuration validation failed: {0}")]
    Validation(String),
}
