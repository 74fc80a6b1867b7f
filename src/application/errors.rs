//! Application layer errors

use thiserror::Error;

/// General bot errors
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Command error: {0}")]
    Command(#[from] CommandError),

    #[error("Feature error: {0}")]
    Feature(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Command execution errors
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Command not found: {0}")]
    NotFound(String),

    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("Execution failed: {0}")]
    ExecutionFailed(String),

    #[error("Permission denied")]
    PermissionDenied,
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Reasons a single feature can fail to load.
///
/// These never escalate: the loader records the reason and moves on to the
/// next enabled feature.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Unknown feature: no catalog entry for '{0}'")]
    Unknown(String),

    #[error("Descriptor slug is empty")]
    MissingSlug,

    #[error("Descriptor missing fields: {0}")]
    MissingFields(String),

    #[error("Slug mismatch: requested '{requested}', descriptor declares '{declared}'")]
    SlugMismatch { requested: String, declared: String },

    #[error("Missing required configuration")]
    MissingConfig,

    #[error("Command name conflict: {0}")]
    CommandConflict(String),

    #[error("Registration failed: {0}")]
    Registration(String),
}
