//! # HTTP Remote Client
//!
//! `reqwest`-backed [`RemoteClient`]. Resource paths are joined beneath a
//! normalized base URL; failures are reported as [`RemoteError`] so the
//! repository can classify them.

use super::error::RemoteError;
use super::remote::{RemoteClient, RemoteRequest};
use crate::config::normalize_base_url;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Url;
use serde_json::Value;
use std::time::Duration;

/// Remote client talking JSON over HTTP.
#[derive(Debug, Clone)]
pub struct HttpRemoteClient {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpRemoteClient {
    /// Create a client for the service at `base_url`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let normalized = normalize_base_url(base_url);
        let base_url =
            Url::parse(&normalized).with_context(|| format!("Invalid base URL '{normalized}'"))?;

        tracing::debug!("Creating HTTP client for {base_url} (timeout {timeout:?})");
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn resolve(&self, path: &str) -> Result<Url, RemoteError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| RemoteError::Other(format!("Invalid resource path '{path}': {e}")))
    }
}

#[async_trait]
impl RemoteClient for HttpRemoteClient {
    async fn send(&self, request: RemoteRequest) -> Result<Value, RemoteError> {
        let url = self.resolve(&request.path)?;
        tracing::debug!("Sending {} {}", request.method, url);

        let mut builder = self.client.request(request.method, url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(classify)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.ok();
            tracing::debug!("Request failed with status {status}");
            return Err(RemoteError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response.json::<Value>().await.map_err(classify)
    }
}

/// Sort a `reqwest` failure into the remote error buckets.
fn classify(error: reqwest::Error) -> RemoteError {
    if error.is_decode() {
        RemoteError::Decode(error.to_string())
    } else if error.is_builder() {
        RemoteError::Other(error.to_string())
    } else if error.is_connect() || error.is_timeout() || error.is_request() || error.is_body() {
        RemoteError::Transport(error.to_string())
    } else {
        RemoteError::Other(error.to_string())
    }
}
