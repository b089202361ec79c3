// Error types for the Rampart validation layer

use crate::{ErrorBody, HttpResponse};
use thiserror::Error;

/// Every way an intercepted call can be rejected.
///
/// `Validation` and `Auth` are caused by the caller and can be fixed by
/// retrying with better input or after logging in. `Reflection` and `Config`
/// are programming mistakes in the rule metadata. `SessionStore` means the
/// session backend could not be asked at all, which is not the same thing as
/// "not logged in".
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        /// `param` or `param.field` that produced the failure
        field: Option<String>,
    },

    #[error("Unauthorized: {0}")]
    Auth(String),

    #[error("Reflection error: {0}")]
    Reflection(String),

    #[error("Session store error: {0}")]
    SessionStore(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Message shown to clients in place of internal details.
pub const INTERNAL_ERROR_MESSAGE: &str = "internal server error";

/// Message shown to clients when the session backend is down.
pub const SERVICE_UNAVAILABLE_MESSAGE: &str = "service temporarily unavailable";

impl Error {
    /// Validation failure without a field path.
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation {
            message: message.into(),
            field: None,
        }
    }

    /// Attach the failing field path to a validation error. Other variants
    /// are returned unchanged.
    pub fn with_field(self, path: impl Into<String>) -> Self {
        match self {
            Error::Validation { message, .. } => Error::Validation {
                message,
                field: Some(path.into()),
            },
            other => other,
        }
    }

    /// HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Error::Validation { .. } => 400,
            Error::Auth(_) => 401,
            Error::SessionStore(_) => 503,
            Error::Reflection(_) | Error::Config(_) => 500,
        }
    }

    /// Business code carried in the JSON envelope.
    pub fn code(&self) -> u32 {
        match self {
            Error::Validation { .. } => 201,
            Error::Auth(_) => 208,
            Error::SessionStore(_) => 503,
            Error::Reflection(_) | Error::Config(_) => 500,
        }
    }

    /// Check if this is a client error (4xx)
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }

    /// Check if this is a server error (5xx)
    pub fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }

    /// Message that is safe to send to the client.
    pub fn public_message(&self) -> &str {
        match self {
            Error::Validation { message, .. } => message,
            Error::Auth(message) => message,
            Error::SessionStore(_) => SERVICE_UNAVAILABLE_MESSAGE,
            Error::Reflection(_) | Error::Config(_) => INTERNAL_ERROR_MESSAGE,
        }
    }

    /// Translate into the JSON error response sent to the client.
    pub fn to_response(&self) -> HttpResponse {
        let body = ErrorBody::new(self.code(), self.public_message());
        HttpResponse::json(self.status_code(), &body)
    }
}
