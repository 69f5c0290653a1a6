//! Error types
//!
//! The effect itself has no failure modes once mounted; errors only come
//! from configuration and lifecycle misuse.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for effect operations
pub type Result<T> = std::result::Result<T, EffectError>;

/// Hover selector parse errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    /// Nothing but whitespace and commas
    #[error("Selector is empty")]
    Empty,

    /// A comma-separated component with no content
    #[error("Empty selector component in '{0}'")]
    EmptyComponent(String),

    /// Anything other than a class selector such as `.btn` or `.btn.ghost`
    #[error("Unsupported selector component: '{0}' (only class selectors are supported)")]
    Unsupported(String),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Lerp factor outside (0, 1]
    #[error("Invalid lerp factor: {0} (expected 0 < factor <= 1)")]
    InvalidLerpFactor(f64),

    /// Hover scale not finite or not positive
    #[error("Invalid hover scale: {0} (expected a finite value > 0)")]
    InvalidHoverScale(f64),

    /// Centre offset not finite or negative
    #[error("Invalid center offset: {0} (expected a finite value >= 0)")]
    InvalidCenterOffset(f64),

    /// Hover selector did not parse
    #[error("Invalid hover selector: {0}")]
    Selector(#[from] SelectorError),

    /// Config file could not be read
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Effective config could not be rendered back to TOML
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Cursor effect lifecycle errors
#[derive(Error, Debug)]
pub enum EffectError {
    /// `mount` called on an effect that is already running
    #[error("Cursor effect is already mounted")]
    AlreadyMounted,

    /// `mount` called after teardown; a cancelled effect cannot restart
    #[error("Cursor effect has been torn down")]
    TornDown,

    /// Configuration rejected at construction
    #[error(transparent)]
    Config(#[from] ConfigError),
}
