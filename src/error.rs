//! Error types and handling for the `mcp-apps` server

use thiserror::Error;

/// Main error type for the `mcp-apps` server
#[derive(Error, Debug)]
pub enum AppsError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// The upstream answered, but had nothing matching the query
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// Transport failures talking to a third-party API
    #[error("{service} request failed: {message}")]
    Upstream {
        service: &'static str,
        status: Option<u16>,
        message: String,
    },

    /// Malformed MCP / JSON-RPC traffic
    #[error("Protocol error: {message}")]
    Protocol { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// JSON (de)serialization errors
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}

impl AppsError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new lookup failure
    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a new upstream transport failure
    pub fn upstream<S: Into<String>>(service: &'static str, status: Option<u16>, message: S) -> Self {
        Self::Upstream {
            service,
            status,
            message: message.into(),
        }
    }

    /// Create a new protocol error
    pub fn protocol<S: Into<String>>(message: S) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// HTTP status of a failed upstream call, when one was received
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            AppsError::Upstream { status, .. } => *status,
            _ => None,
        }
    }

    /// True for "no match" failures the user can fix by rephrasing
    #[must_use]
    pub fn is_lookup_failure(&self) -> bool {
        matches!(self, AppsError::NotFound { .. })
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            AppsError::Config { .. } => {
                "Server configuration error. Please check the config file.".to_string()
            }
            AppsError::Validation { message } | AppsError::NotFound { message } => message.clone(),
            AppsError::Upstream {
                service,
                status: Some(code),
                ..
            } => format!("{service} request failed with HTTP status {code}. Please try again later."),
            AppsError::Upstream {
                service, message, ..
            } => format!("{service} request failed: {message}"),
            AppsError::Protocol { message } => format!("Invalid request: {message}"),
            AppsError::Io { .. } => "Internal I/O failure.".to_string(),
            AppsError::Json { .. } => "Received malformed JSON.".to_string(),
        }
    }
}

impl From<AppsError> for rmcp::ErrorData {
    fn from(error: AppsError) -> Self {
        let message = error.user_message();
        match error {
            AppsError::Validation { .. } => rmcp::ErrorData::invalid_params(message, None),
            AppsError::NotFound { .. } => rmcp::ErrorData::resource_not_found(message, None),
            _ => rmcp::ErrorData::internal_error(message, None),
        }
    }
}
