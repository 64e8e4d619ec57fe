// ihoms-client/src/client/http_oneshot.rs
// Oneshot HTTP client - in-memory transport
//
// Requires the "in-process" feature

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use http::{Method, Request, header};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tower::ServiceExt;

use super::http::{HttpClient, decode_response};
use crate::error::{ClientError, ClientResult};

/// Oneshot HTTP client (in-memory calls)
///
/// Each request is dispatched straight into an axum `Router` with tower's
/// `oneshot`, so no socket is opened. Paths resolve against the router
/// root: `"tickets"` becomes `/tickets`.
///
/// # Example
///
/// ```ignore
/// use axum::{Router, routing::get};
/// use ihoms_client::OneshotHttpClient;
///
/// let router = Router::new().route("/tickets", get(list_tickets));
/// let client = OneshotHttpClient::new(router);
/// let tickets: serde_json::Value = client.get("tickets").await?;
/// ```
#[derive(Debug, Clone)]
pub struct OneshotHttpClient {
    router: Router,
    token: Option<String>,
}

impl OneshotHttpClient {
    /// `router` must already have its state attached (`with_state` called)
    pub fn new(router: Router) -> Self {
        Self {
            router,
            token: None,
        }
    }

    fn build_request(&self, method: Method, path: &str, body: Body) -> ClientResult<Request<Body>> {
        let uri = format!("/{}", path.trim_start_matches('/'));
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::ACCEPT, "application/json")
            .header(header::CONTENT_TYPE, "application/json");

        if let Some(token) = &self.token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        builder
            .body(body)
            .map_err(|e| ClientError::Internal(format!("Failed to build request: {}", e)))
    }

    fn build_request_with_body<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> ClientResult<Request<Body>> {
        let bytes = serde_json::to_vec(body)?;
        self.build_request(method, path, Body::from(bytes))
    }

    /// Execute the request and decode the response
    async fn execute<T: DeserializeOwned>(&self, request: Request<Body>) -> ClientResult<T> {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .map_err(|e| ClientError::Internal(format!("Oneshot call failed: {}", e)))?;

        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .map_err(|e| ClientError::Internal(format!("Failed to read body: {}", e)))?;

        decode_response(status, &body)
    }
}

#[async_trait]
impl HttpClient for OneshotHttpClient {
    async fn get<T: DeserializeOwned + Send>(&self, path: &str) -> ClientResult<T> {
        tracing::debug!(method = "GET", path, "Oneshot request");
        let request = self.build_request(Method::GET, path, Body::empty())?;
        self.execute(request).await
    }

    async fn post<T: DeserializeOwned + Send, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        tracing::debug!(method = "POST", path, "Oneshot request");
        let request = self.build_request_with_body(Method::POST, path, body)?;
        self.execute(request).await
    }

    async fn post_empty<T: DeserializeOwned + Send>(&self, path: &str) -> ClientResult<T> {
        tracing::debug!(method = "POST", path, "Oneshot request");
        let request = self.build_request(Method::POST, path, Body::empty())?;
        self.execute(request).await
    }

    fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }
}
