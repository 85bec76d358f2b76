//! # Error Taxonomy
//!
//! `RemoteError` is what a [`RemoteClient`](super::RemoteClient) reports.
//! `ApiError` is the classified form the repository hands to its callers.
//!
//! | Remote failure                          | ApiError       | Message                          |
//! |-----------------------------------------|----------------|----------------------------------|
//! | non-2xx, body `{"error": "..."}`        | `Server`       | server text verbatim             |
//! | non-2xx, other or missing body          | `HttpStatus`   | `Server error ({status})`        |
//! | no response received                    | `Connectivity` | `Check your internet connection` |
//! | anything else                           | `Unknown`      | own message or `Unknown error`   |

use crate::gradebook::models::ErrorBody;
use thiserror::Error;

pub const CONNECTIVITY_MESSAGE: &str = "Check your internet connection";
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error";

/// Classified failure of a repository operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The server answered with a structured error body.
    #[error("{message}")]
    Server { message: String },

    /// The server answered with a non-success status and nothing readable.
    #[error("Server error ({status})")]
    HttpStatus { status: u16 },

    /// The request never reached the server or no response came back.
    #[error("Check your internet connection")]
    Connectivity,

    /// Any other failure.
    #[error("{message}")]
    Unknown { message: String },
}

impl ApiError {
    /// Build an `Unknown` error, substituting the generic text for a blank message.
    pub fn unknown(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            Self::Unknown {
                message: UNKNOWN_ERROR_MESSAGE.to_string(),
            }
        } else {
            Self::Unknown { message }
        }
    }

    /// Text posted to the UI error slot.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

/// Failure reported by a remote client before classification.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RemoteError {
    /// Non-success status, with the raw body if one could be read.
    #[error("HTTP status {status}")]
    Status { status: u16, body: Option<String> },

    /// Connection, timeout or I/O failure: no response was received.
    #[error("{0}")]
    Transport(String),

    /// A response arrived but could not be decoded.
    #[error("{0}")]
    Decode(String),

    #[error("{0}")]
    Other(String),

    /// Already classified; passes through translation untouched.
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl From<RemoteError> for ApiError {
    fn from(error: RemoteError) -> Self {
        match error {
            RemoteError::Api(api) => api,
            RemoteError::Status { status, body } => match body.as_deref().and_then(error_message) {
                Some(message) => ApiError::Server { message },
                None => ApiError::HttpStatus { status },
            },
            RemoteError::Transport(_) => ApiError::Connectivity,
            RemoteError::Decode(message) | RemoteError::Other(message) => {
                ApiError::unknown(message)
            }
        }
    }
}

/// Extract the `error` field of a structured error body.
fn error_message(body: &str) -> Option<String> {
    if body.trim().is_empty() {
        return None;
    }
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .map(|parsed| parsed.error)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(status: u16, body: Option<&str>) -> RemoteError {
        RemoteError::Status {
            status,
            body: body.map(str::to_string),
        }
    }

    #[test]
    fn structured_body_should_become_server_error() {
        let error = ApiError::from(status(409, Some(r#"{"error":"Student already exists"}"#)));
        assert_eq!(
            error,
            ApiError::Server {
                message: "Student already exists".to_string()
            }
        );
        assert_eq!(error.message(), "Student already exists");
    }

    #[test]
    fn opaque_body_should_become_status_error() {
        let error = ApiError::from(status(502, Some("<html>Bad gateway</html>")));
        assert_eq!(error, ApiError::HttpStatus { status: 502 });
        assert_eq!(error.message(), "Server error (502)");
    }

    #[test]
    fn missing_or_blank_body_should_become_status_error() {
        assert_eq!(
            ApiError::from(status(500, None)),
            ApiError::HttpStatus { status: 500 }
        );
        assert_eq!(
            ApiError::from(status(500, Some("  "))),
            ApiError::HttpStatus { status: 500 }
        );
    }

    #[test]
    fn json_body_without_error_field_should_be_opaque() {
        let error = ApiError::from(status(422, Some(r#"{"detail":"bad score"}"#)));
        assert_eq!(error, ApiError::HttpStatus { status: 422 });
    }

    #[test]
    fn transport_failure_should_become_connectivity() {
        let error = ApiError::from(RemoteError::Transport("connection refused".to_string()));
        assert_eq!(error, ApiError::Connectivity);
        assert_eq!(error.message(), CONNECTIVITY_MESSAGE);
    }

    #[test]
    fn decode_failure_should_keep_its_message() {
        let error = ApiError::from(RemoteError::Decode("missing field `id`".to_string()));
        assert_eq!(error.message(), "missing field `id`");
    }

    #[test]
    fn blank_message_should_fall_back_to_generic_text() {
        let error = ApiError::from(RemoteError::Other(String::new()));
        assert_eq!(error.message(), UNKNOWN_ERROR_MESSAGE);
    }

    #[test]
    fn translated_error_should_pass_through_unchanged() {
        let original = ApiError::HttpStatus { status: 404 };
        let again = ApiError::from(RemoteError::from(original.clone()));
        assert_eq!(again, original);

        let connectivity = ApiError::from(RemoteError::Api(ApiError::Connectivity));
        assert_eq!(connectivity, ApiError::Connectivity);
    }
}
