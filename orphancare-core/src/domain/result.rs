//! Result and error types for the core library

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Core library error type
///
/// Every failed operation surfaces as one of these variants. The display
/// text is meant to be shown to the user as-is.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid email or password. Please check your credentials.")]
    InvalidCredentials,

    #[error("Login failed: {0}")]
    LoginFailed(String),

    #[error("No active session. Please log in.")]
    NoSession,

    #[error("Session expired. Please log in again.")]
    SessionExpired,

    #[error("{message}")]
    RequestFailed { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a request failure for a non-2xx status
    pub fn request_failed(status: u16, message: impl Into<String>) -> Self {
        Self::RequestFailed {
            status,
            message: message.into(),
        }
    }

    /// Whether the caller should send the user back through login
    pub fn requires_reauth(&self) -> bool {
        matches!(self, Self::NoSession | Self::SessionExpired)
    }

    /// HTTP status attached to this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RequestFailed { status, .. } => Some(*status),
            Self::SessionExpired | Self::InvalidCredentials => Some(401),
            _ => None,
        }
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;

/// Operation result with optional context (for JSON output)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationResult<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    pub context: Option<HashMap<String, serde_json::Value>>,
}

impl<T> OperationResult<T> {
    /// Create a successful result
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            context: None,
        }
    }

    /// Create a failed result
    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            context: None,
        }
    }
}

impl<T> From<Result<T>> for OperationResult<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => {
                let mut failed = Self::fail(e.to_string());
                if e.requires_reauth() {
                    let mut context = HashMap::new();
                    context.insert("reauth".to_string(), serde_json::Value::Bool(true));
                    failed.context = Some(context);
                }
                failed
            }
        }
    }
}
