//! Authenticated JSON HTTP client for the platform REST API.
//!
//! # Responsibilities
//! - Build requests against the configured base URL
//! - Attach the session's bearer token when present
//! - Fold every failure (network, non-2xx, bad JSON) into [`ApiError`]

use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::error::{ApiError, ApiResponse};
use crate::session::Session;

/// Error body returned by the backend on non-2xx responses.
#[derive(Debug, Default, Deserialize)]
struct ServerErrorBody {
    message: Option<String>,
    error: Option<String>,
}

/// Client for the platform REST API.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<Session>,
}

impl ApiClient {
    /// Create a client for `base_url` (e.g. `http://localhost:3000/api`).
    pub fn new(base_url: impl Into<String>, session: Arc<Session>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, session)
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(
        http: reqwest::Client,
        base_url: impl Into<String>,
        session: Arc<Session>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http,
            base_url,
            session,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Perform a request and decode the JSON response body into `T`.
    ///
    /// Never fails with anything but [`ApiError`]: transport failures and
    /// undecodable bodies carry status 0, non-2xx responses carry their
    /// HTTP status and the server's `message` when it sent one.
    pub async fn request<T, B>(&self, endpoint: &str, method: Method, body: Option<&B>) -> ApiResponse<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, endpoint);
        let mut builder = self
            .http
            .request(method.clone(), &url)
            .header(CONTENT_TYPE, "application/json");

        if let Some(token) = self.session.token() {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        tracing::debug!(method = %method, endpoint = endpoint, "API request");

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(method = %method, endpoint = endpoint, error = %e, "API request failed before response");
                return Err(ApiError::transport(e.to_string()));
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body: ServerErrorBody = response.json().await.unwrap_or_default();
            let message = body
                .message
                .or(body.error)
                .unwrap_or_else(|| format!("API Error: {}", status.as_u16()));
            tracing::warn!(
                method = %method,
                endpoint = endpoint,
                status = status.as_u16(),
                error = %message,
                "API request rejected"
            );
            return Err(ApiError::http(status.as_u16(), message));
        }

        match response.json::<T>().await {
            Ok(data) => {
                tracing::debug!(method = %method, endpoint = endpoint, status = status.as_u16(), "API request succeeded");
                Ok(data)
            }
            Err(e) => {
                tracing::warn!(method = %method, endpoint = endpoint, error = %e, "API response body could not be decoded");
                Err(ApiError::transport(format!("Invalid response body: {}", e)))
            }
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> ApiResponse<T> {
        self.request::<T, ()>(endpoint, Method::GET, None).await
    }

    pub async fn post<T, B>(&self, endpoint: &str, body: &B) -> ApiResponse<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(endpoint, Method::POST, Some(body)).await
    }

    pub async fn put<T, B>(&self, endpoint: &str, body: &B) -> ApiResponse<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(endpoint, Method::PUT, Some(body)).await
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("session", &self.session)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash() {
        let client = ApiClient::new("http://localhost:3000/api/", Arc::new(Session::in_memory()));
        assert_eq!(client.base_url(), "http://localhost:3000/api");
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_failure() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = ApiClient::new(format!("http://{}", addr), Arc::new(Session::in_memory()));
        let err = client.get::<serde_json::Value>("/properties").await.unwrap_err();
        assert_eq!(err.status, 0);
        assert!(!err.message.is_empty());
    }
}
