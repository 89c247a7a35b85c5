//! Error types for Swarmline Core

use thiserror::Error;

/// Main error type for Swarmline operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Log bridge error: {0}")]
    Bridge(#[from] BridgeError),

    #[error("Process error: {0}")]
    Runner(#[from] RunnerError),

    #[error("Manifest error: {0}")]
    Manifest(#[from] ManifestError),

    #[error("Authorization error: {0}")]
    Authz(#[from] AuthzError),

    #[error("Container error: {0}")]
    Container(#[from] ContainerError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Log bridge errors
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Stream not captured: {0}")]
    StreamNotCaptured(String),

    #[error("Mirror file error for '{name}': {message}")]
    Mirror { name: String, message: String },
}

/// Process lifecycle errors
#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Process not found: {0}")]
    NotFound(String),

    #[error("Process already exists: {0}")]
    AlreadyExists(String),

    #[error("Process not running: {0}")]
    NotRunning(String),

    #[error("Process already running: {0}")]
    AlreadyRunning(String),

    #[error("Failed to spawn process '{name}': {message}")]
    SpawnFailed { name: String, message: String },

    #[error("Failed to stop process '{name}': {message}")]
    StopFailed { name: String, message: String },

    #[error("Invalid process configuration: {0}")]
    InvalidConfig(String),
}

/// Manifest errors
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("Manifest file not found: {0}")]
    NotFound(String),

    #[error("Manifest not configured: set AGENT_MANIFEST_FILE or pass a path")]
    NotConfigured,

    #[error("Failed to parse manifest '{path}': {message}")]
    Parse { path: String, message: String },
}

/// Authorization errors
#[derive(Error, Debug)]
pub enum AuthzError {
    #[error("Unknown authorizer implementation: {0}")]
    UnknownImplementation(String),

    #[error("Authorization server error: {0}")]
    Server(String),

    #[error("Store not found: {0}")]
    StoreNotFound(String),

    #[error("Invalid authorization model: {0}")]
    InvalidModel(String),
}

/// Container helper errors
#[derive(Error, Debug)]
pub enum ContainerError {
    #[error("Docker not available: {0}")]
    DockerUnavailable(String),

    #[error("Container command failed ({command}): {message}")]
    CommandFailed { command: String, message: String },
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;
