use kuma_common::{ErrorBody, MessageResponse, MonitorRecord, MonitorStateResponse, API_PREFIX};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::config::CliConfig;

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Error, Debug)]
pub enum ClientError {
    /// Non-2xx answer; `message` is the server's `error` string when present.
    #[error("{message}")]
    Api { status: StatusCode, message: String },
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected response body: {0}")]
    Decode(String),
}

/// Thin wrapper over the `/api/v2` endpoints. One method, one request.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    username: String,
    password: String,
}

impl ApiClient {
    pub fn new(config: &CliConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: format!("{}{}", config.url.trim_end_matches('/'), API_PREFIX),
            username: config.auth.username.clone(),
            password: config.auth.password.clone(),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, %url, "Sending request.");
        self.http
            .request(method, url)
            .basic_auth(&self.username, Some(&self.password))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        debug!(status = status.as_u16(), bytes = bytes.len(), "Received response.");

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&bytes)
                .map(|body| body.error)
                .unwrap_or_else(|_| format!("Request failed with status code {}", status.as_u16()));
            return Err(ClientError::Api { status, message });
        }
        serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
    }

    pub async fn list_monitors(&self) -> Result<Vec<MonitorRecord>, ClientError> {
        self.send(self.request(Method::GET, "/monitors")).await
    }

    pub async fn get_monitor(&self, id: i32) -> Result<MonitorRecord, ClientError> {
        self.send(self.request(Method::GET, &format!("/monitors/{id}")))
            .await
    }

    /// `body` is sent as-is so imported records keep every field they carry.
    pub async fn create_monitor(&self, body: &Value) -> Result<MonitorRecord, ClientError> {
        self.send(self.request(Method::POST, "/monitors").json(body))
            .await
    }

    pub async fn delete_monitor(&self, id: i32) -> Result<MessageResponse, ClientError> {
        self.send(self.request(Method::DELETE, &format!("/monitors/{id}")))
            .await
    }

    pub async fn pause_monitor(&self, id: i32) -> Result<MonitorStateResponse, ClientError> {
        self.send(self.request(Method::POST, &format!("/monitors/{id}/pause")))
            .await
    }

    pub async fn resume_monitor(&self, id: i32) -> Result<MonitorStateResponse, ClientError> {
        self.send(self.request(Method::POST, &format!("/monitors/{id}/resume")))
            .await
    }
}
