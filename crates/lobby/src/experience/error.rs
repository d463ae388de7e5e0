//! Error types for the experience lifecycle

use thiserror::Error;

/// Top-level error for a load attempt
#[derive(Debug, Error)]
pub enum ExperienceError {
    #[error("Invalid metadata: 'url' is missing")]
    InvalidMetadata,

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Script execution failed: {0}")]
    ScriptExecution(#[from] ScriptError),

    #[error("An experience is already {0}")]
    Busy(&'static str),

    #[error("Load completion does not match the pending load")]
    StaleLoad,
}

/// Fetch failed: network error or non-success status
#[derive(Debug, Clone, Error)]
#[error("Failed to load script {url}: {reason}")]
pub struct TransportError {
    pub url: String,
    /// HTTP status, if a response arrived at all
    pub status: Option<u16>,
    pub reason: String,
}

impl TransportError {
    pub fn status(url: impl Into<String>, status: u16, reason: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status: Some(status),
            reason: reason.into(),
        }
    }

    pub fn network(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status: None,
            reason: reason.into(),
        }
    }
}

/// Fault inside an experience (compile or run)
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScriptError {
    #[error("compile error: {0}")]
    Compile(String),

    #[error("unknown object '{0}'")]
    UnknownObject(String),

    #[error("aborted: {0}")]
    Aborted(String),

    #[error("panicked: {0}")]
    Panicked(String),
}

/// Non-fatal conditions met while loading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadWarning {
    /// No motion controller to hand to the experience
    MissingMotionController,
}
