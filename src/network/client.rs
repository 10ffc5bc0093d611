//! HTTP client wrapper - builds backend requests and decodes responses

use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;
use crate::models::HttpMethod;

/// Thin JSON client bound to one backend base URL.
///
/// No retries, no backoff and no timeout: every failure goes straight back
/// to the caller.
#[derive(Clone, Debug)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, create_client())
    }

    pub fn with_client(base_url: impl Into<String>, http: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        ApiClient { base_url, http }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Perform one round trip. Returns the raw body, or `None` for 204.
    async fn round_trip<B: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        path: &str,
        token: Option<&str>,
        body: Option<&B>,
    ) -> Result<Option<String>, ApiError> {
        let url = self.url(path);
        let mut req_builder = match method {
            HttpMethod::GET => self.http.get(&url),
            HttpMethod::POST => self.http.post(&url),
        };

        req_builder = req_builder.header(CONTENT_TYPE, "application/json");

        if let Some(token) = token {
            req_builder = req_builder.bearer_auth(token);
        }

        if let Some(body) = body {
            req_builder = req_builder.body(serde_json::to_vec(body)?);
        }

        let resp = req_builder.send().await.map_err(|e| {
            tracing::debug!(method = method.as_str(), path, error = %e, "Transport failure");
            ApiError::Transport(e)
        })?;

        let status = resp.status();
        tracing::debug!(method = method.as_str(), path, status = status.as_u16(), "Response received");

        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            let message = if text.trim().is_empty() {
                format!("Request failed with status {}", status.as_u16())
            } else {
                text
            };
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        Ok(Some(resp.text().await?))
    }

    /// Send a request and decode the JSON reply. `Ok(None)` means 204.
    pub async fn fetch<T, B>(
        &self,
        method: HttpMethod,
        path: &str,
        token: Option<&str>,
        body: Option<&B>,
    ) -> Result<Option<T>, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        match self.round_trip(method, path, token, body).await? {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    /// Like [`fetch`](Self::fetch) but a body is mandatory
    pub(crate) async fn fetch_required<T, B>(
        &self,
        method: HttpMethod,
        path: &str,
        token: Option<&str>,
        body: Option<&B>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.fetch(method, path, token, body)
            .await?
            .ok_or_else(|| ApiError::EmptyBody {
                path: path.to_string(),
            })
    }

    /// Send a request whose reply body is irrelevant
    pub(crate) async fn execute<B: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        path: &str,
        token: Option<&str>,
        body: Option<&B>,
    ) -> Result<(), ApiError> {
        self.round_trip(method, path, token, body).await.map(|_| ())
    }
}

/// Marker for requests without a body
pub(crate) const NO_BODY: Option<&()> = None;

/// Create an HTTP client with default configuration
pub fn create_client() -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(concat!("piggybank-client/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}
