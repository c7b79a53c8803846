//! Error types for the registry process

use thiserror::Error;

/// Failure inside a handler, reported to the caller in-band
///
/// These never tear down the process; the dispatch loop converts them
/// into an error reply and keeps serving.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HandlerError {
    #[error("Skill not found")]
    SkillNotFound,

    #[error("Name parameter required")]
    NameRequired,

    #[error("Invalid timeRange: {value}")]
    InvalidTimeRange { value: String },

    #[error("Unknown action: {action}")]
    UnknownAction { action: String },

    #[error("Invalid parameters for {action}: {message}")]
    InvalidParams { action: String, message: String },

    #[error("{0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Failure of the process mailbox itself
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("Registry process is no longer running")]
    Closed,
}

pub type Result<T> = std::result::Result<T, HandlerError>;
