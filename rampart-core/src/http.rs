// HTTP response types produced by the error translator

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// HTTP response wrapper
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    pub fn ok() -> Self {
        Self::new(200)
    }

    /// JSON response with the given status.
    pub fn json<T: Serialize>(status: u16, value: &T) -> Self {
        // Serializing a plain struct of strings and numbers cannot fail.
        let body = serde_json::to_vec(value).unwrap_or_default();
        Self::new(status)
            .with_header("Content-Type", "application/json")
            .with_body(body)
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Parse the body as JSON
    pub fn body_json<T: for<'de> Deserialize<'de>>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// Envelope for error responses: `{"code": 201, "message": "...", "data": null}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: u32,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

impl ErrorBody {
    pub fn new(code: u32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_json_response() {
        let response = HttpResponse::json(200, &serde_json::json!({"ok": true}));
        assert_eq!(response.status, 200);
        assert_eq!(
            response.headers.get("Content-Type"),
            Some(&"application/json".to_string())
        );
    }

    #[test]
    fn test_validation_error_response() {
        let response = Error::validation("password must not be blank").to_response();
        assert_eq!(response.status, 400);

        let body: ErrorBody = response.body_json().unwrap();
        assert_eq!(body.code, 201);
        assert_eq!(body.message, "password must not be blank");
        assert!(body.data.is_none());
    }

    #[test]
    fn test_session_store_error_response_hides_detail() {
        let response = Error::SessionStore("connection refused".into()).to_response();
        assert_eq!(response.status, 503);

        let body: ErrorBody = response.body_json().unwrap();
        assert!(!body.message.contains("refused"));
    }
}
