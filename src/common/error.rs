//! Error types for the certification harness
//!
//! Lookup misses (a task or feature that is not there) are not errors and
//! are returned as `Option` by the APIs that perform them. Everything here is
//! either a usage error, malformed input, or an environment failure.

use std::io;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the harness
#[derive(Error, Debug)]
pub enum Error {
    // === Queue Errors ===
    #[error("Queue '{queue}' is empty")]
    EmptyQueue { queue: String },

    #[error("Timed out after {millis} ms waiting for a task on queue '{queue}'")]
    DequeueTimeout { queue: String, millis: u64 },

    #[error("Invalid task range: offset {offset}, length {length}")]
    Range { offset: i64, length: i64 },

    // === Program Model Errors ===
    #[error("Malformed FEATURE record at position {index}: expected exactly one name/value pair, found {pairs}")]
    MalformedRecord { index: usize, pairs: usize },

    #[error("Feature '{name}' is already defined for program '{program}'")]
    DuplicateFeature { program: String, name: String },

    #[error("Invalid test case: {0}")]
    InvalidTestCase(String),

    // === Script Errors ===
    #[error("Unknown script error kind '{0}'")]
    UnknownScriptErrorKind(String),

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    #[error("Invalid test plan '{path}': {reason}")]
    PlanParse { path: String, reason: String },

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Internal Errors ===
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an empty queue error
    pub fn empty_queue(queue: &str) -> Self {
        Self::EmptyQueue {
            queue: queue.to_string(),
        }
    }

    /// Create a dequeue timeout error
    pub fn dequeue_timeout(queue: &str, millis: u64) -> Self {
        Self::DequeueTimeout {
            queue: queue.to_string(),
            millis,
        }
    }

    /// Create a duplicate feature error
    pub fn duplicate_feature(program: &str, name: &str) -> Self {
        Self::DuplicateFeature {
            program: program.to_string(),
            name: name.to_string(),
        }
    }

    /// Create a plan parse error
    pub fn plan_parse(path: &str, reason: impl ToString) -> Self {
        Self::PlanParse {
            path: path.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Stable machine-readable code for JSON output
    pub fn code(&self) -> &'static str {
        match self {
            Error::EmptyQueue { .. } => "EMPTY_QUEUE",
            Error::DequeueTimeout { .. } => "TIMEOUT",
            Error::Range { .. } => "RANGE",
            Error::MalformedRecord { .. } => "MALFORMED_RECORD",
            Error::DuplicateFeature { .. } => "DUPLICATE_FEATURE",
            Error::InvalidTestCase(_) => "INVALID_TEST_CASE",
            Error::UnknownScriptErrorKind(_) => "UNKNOWN_SCRIPT_ERROR_KIND",
            Error::Config(_) | Error::ConfigParse(_) => "CONFIG",
            Error::PlanParse { .. } => "PLAN_PARSE",
            Error::Io(_) | Error::FileRead { .. } => "IO",
            Error::Json(_) => "JSON",
            Error::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

/// Serializable error for `--json` output
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ErrorReport {
    pub code: String,
    pub message: String,
}

impl From<&Error> for ErrorReport {
    fn from(e: &Error) -> Self {
        Self {
            code: e.code().to_string(),
            message: e.to_string(),
        }
    }
}
