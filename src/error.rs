//! Unified error types for samba-share

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for samba-share operations
#[derive(Error, Debug)]
pub enum Error {
    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),

    // Config errors
    #[error("Failed to read config file '{path}': {source}")]
    ConfigRead { path: PathBuf, source: io::Error },

    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config validation failed: {0}")]
    ConfigValidation(String),

    // System errors
    #[error("Command '{command}' failed: {message}")]
    CommandFailed { command: String, message: String },

    // Network errors
    #[error("Unable to get CIDR for interface {0}")]
    SubnetNotFound(String),

    // Compose template errors
    #[error("Failed to read template '{path}': {source}")]
    TemplateRead { path: PathBuf, source: io::Error },

    // Hook document errors
    #[error("Failed to read hook config '{path}': {source}")]
    HookConfigRead { path: PathBuf, source: io::Error },

    #[error("Failed to parse hook config: {0}")]
    HookConfigParse(#[from] serde_json::Error),

    #[error("Invalid hook config: {0}")]
    HookConfigInvalid(String),
}

/// Result type alias for samba-share operations
pub type Result<T> = std::result::Result<T, Error>;
