//! Typed HTTP client for the Lumen API.

use std::time::Duration;

use lumen_core::validate::{is_api_info_payload, is_echo_payload, is_health_payload, is_hello_payload};
use lumen_core::{
    decode_body, ApiInfo, EchoReply, EchoRequest, HealthReport, PayloadPredicate, RequestId,
    CLIENT_PREFIX, REQUEST_ID_HEADER,
};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::ClientError;

/// Default path prefix the server mounts its endpoints under.
pub const DEFAULT_PREFIX: &str = "/api";

/// HTTP client that validates every response envelope before returning its
/// payload.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    prefix: String,
}

impl ApiClient {
    /// Creates a client for the server at `base_url`, using the default
    /// `/api` prefix.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            prefix: DEFAULT_PREFIX.to_string(),
        })
    }

    /// Replaces the path prefix. An empty prefix targets the server root.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into().trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}{path}", self.base_url, self.prefix)
    }

    fn request(&self, method: Method, path: &str) -> (RequestId, RequestBuilder) {
        let request_id = RequestId::generate(CLIENT_PREFIX);
        let builder = self
            .http
            .request(method, self.url(path))
            .header(REQUEST_ID_HEADER, request_id.as_str())
            .header(CONTENT_TYPE, "application/json");
        (request_id, builder)
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request_id: &RequestId,
        builder: RequestBuilder,
        predicate: Option<PayloadPredicate>,
    ) -> Result<T, ClientError> {
        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;

        debug!(request_id = %request_id, status, bytes = body.len(), "response received");

        decode_body::<T>(&body, predicate)?
            .into_result()
            .map_err(|error| ClientError::Api { status, error })
    }

    /// Sends a `GET` to `path` under the prefix and decodes the payload.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failure, an invalid envelope, or
    /// an error envelope.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        predicate: Option<PayloadPredicate>,
    ) -> Result<T, ClientError> {
        let (request_id, builder) = self.request(Method::GET, path);
        self.execute(&request_id, builder, predicate).await
    }

    /// Sends a JSON `POST` to `path` under the prefix and decodes the payload.
    ///
    /// # Errors
    ///
    /// As [`ApiClient::get`].
    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        predicate: Option<PayloadPredicate>,
    ) -> Result<T, ClientError> {
        let (request_id, builder) = self.request(Method::POST, path);
        self.execute(&request_id, builder.json(body), predicate).await
    }

    /// # Errors
    ///
    /// As [`ApiClient::get`].
    pub async fn get_hello(&self) -> Result<String, ClientError> {
        self.get("/hello", Some(is_hello_payload)).await
    }

    /// # Errors
    ///
    /// As [`ApiClient::get`].
    pub async fn get_health(&self) -> Result<HealthReport, ClientError> {
        self.get("/health", Some(is_health_payload)).await
    }

    /// # Errors
    ///
    /// As [`ApiClient::get`].
    pub async fn get_api_info(&self) -> Result<ApiInfo, ClientError> {
        self.get("", Some(is_api_info_payload)).await
    }

    /// Posts `request` to the echo endpoint.
    ///
    /// # Errors
    ///
    /// As [`ApiClient::get`]. A request the server rejects comes back as
    /// [`ClientError::Api`] with a `VALIDATION_ERROR` code.
    pub async fn echo_message(&self, request: &EchoRequest) -> Result<EchoReply, ClientError> {
        self.post("/echo", request, Some(is_echo_payload)).await
    }
}
