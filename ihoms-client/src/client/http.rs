// ihoms-client/src/client/http.rs
// HTTP client - network transport

use crate::error::{ClientError, ClientResult, error_from_status};
use async_trait::async_trait;
use http::StatusCode;
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// HTTP client trait
///
/// Paths are relative to the API root (`"tickets/7/assign"`); a leading
/// slash is ignored.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get<T: DeserializeOwned + Send>(&self, path: &str) -> ClientResult<T>;
    async fn post<T: DeserializeOwned + Send, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T>;
    async fn post_empty<T: DeserializeOwned + Send>(&self, path: &str) -> ClientResult<T>;

    /// Bearer token attached to every request
    fn token(&self) -> Option<&str>;
    fn set_token(&mut self, token: Option<String>);
}

/// Turn a finished response into `T` or a [`ClientError`].
///
/// An empty 2xx body decodes as JSON `null`.
pub(crate) fn decode_response<T: DeserializeOwned>(
    status: StatusCode,
    body: &[u8],
) -> ClientResult<T> {
    if !status.is_success() {
        let err = error_from_status(status, body);
        tracing::debug!(status = %status, error = %err, "Request rejected");
        return Err(err);
    }
    let body = if body.iter().all(u8::is_ascii_whitespace) {
        b"null".as_slice()
    } else {
        body
    };
    serde_json::from_slice(body)
        .map_err(|e| ClientError::InvalidResponse(format!("JSON parse error: {}", e)))
}

/// Network HTTP client
#[derive(Debug, Clone)]
pub struct NetworkHttpClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl NetworkHttpClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Base URL of the API root
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn auth_header(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {}", t))
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> ClientResult<T> {
        let mut req = req.header(reqwest::header::ACCEPT, "application/json");
        if let Some(auth) = self.auth_header() {
            req = req.header(reqwest::header::AUTHORIZATION, auth);
        }
        let response = req.send().await.inspect_err(|e| {
            tracing::error!(error = %e, "Transport failure");
        })?;
        let status = response.status();
        let body = response.bytes().await?;
        decode_response(status, &body)
    }
}

#[async_trait]
impl HttpClient for NetworkHttpClient {
    async fn get<T: DeserializeOwned + Send>(&self, path: &str) -> ClientResult<T> {
        tracing::debug!(method = "GET", path, "Request");
        self.send(self.client.get(self.url(path))).await
    }

    async fn post<T: DeserializeOwned + Send, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        tracing::debug!(method = "POST", path, "Request");
        self.send(self.client.post(self.url(path)).json(body)).await
    }

    async fn post_empty<T: DeserializeOwned + Send>(&self, path: &str) -> ClientResult<T> {
        tracing::debug!(method = "POST", path, "Request");
        self.send(self.client.post(self.url(path))).await
    }

    fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        let client = NetworkHttpClient::new("http://localhost:8000/api/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000/api");
        assert_eq!(client.url("/tickets"), "http://localhost:8000/api/tickets");
        assert_eq!(client.url("tickets/7/assign"), "http://localhost:8000/api/tickets/7/assign");
    }

    #[test]
    fn test_empty_body_decodes_as_null() {
        let value: serde_json::Value = decode_response(StatusCode::NO_CONTENT, b"").unwrap();
        assert!(value.is_null());
    }

    #[test]
    fn test_token_round_trip() {
        let mut client = NetworkHttpClient::new("http://localhost", Duration::from_secs(5)).unwrap();
        assert!(client.token().is_none());
        client.set_token(Some("abc".into()));
        assert_eq!(client.token(), Some("abc"));
        assert_eq!(client.auth_header().as_deref(), Some("Bearer abc"));
    }
}
