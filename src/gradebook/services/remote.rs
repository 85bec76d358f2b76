//! # Remote Client
//!
//! Capability the repository talks to. A client turns a [`RemoteRequest`]
//! into the decoded JSON body of a successful response, or a
//! [`RemoteError`] describing why there is none.

use super::error::RemoteError;
use async_trait::async_trait;
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

/// A request against a resource path relative to the service base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl RemoteRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    /// Add a query parameter; `None` leaves the query untouched.
    pub fn with_optional_query(mut self, key: &str, value: Option<i64>) -> Self {
        if let Some(value) = value {
            self.query.push((key.to_string(), value.to_string()));
        }
        self
    }

    /// Attach a JSON body.
    pub fn with_json(mut self, body: &impl Serialize) -> Result<Self, RemoteError> {
        let value = serde_json::to_value(body)
            .map_err(|e| RemoteError::Other(format!("Failed to encode request body: {e}")))?;
        self.body = Some(value);
        Ok(self)
    }

    /// `METHOD path` for log lines.
    pub fn describe(&self) -> String {
        format!("{} /{}", self.method, self.path.trim_start_matches('/'))
    }
}

/// Performs HTTP calls against the grade-book service.
#[async_trait]
pub trait RemoteClient: Send + Sync {
    async fn send(&self, request: RemoteRequest) -> Result<Value, RemoteError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn optional_query_should_skip_absent_values() {
        let request = RemoteRequest::get("grades")
            .with_optional_query("student_id", Some(5))
            .with_optional_query("subject_id", None);

        assert_eq!(
            request.query,
            vec![("student_id".to_string(), "5".to_string())]
        );
    }

    #[test]
    fn with_json_should_store_encoded_body() {
        #[derive(Serialize)]
        struct Body {
            name: &'static str,
        }

        let request = RemoteRequest::post("students")
            .with_json(&Body { name: "Zoe" })
            .unwrap();

        assert_eq!(request.body, Some(json!({ "name": "Zoe" })));
        assert_eq!(request.describe(), "POST /students");
    }
}
