//! HTTP client wrapper shared by every resource module.
//!
//! DESIGN
//! ======
//! One `reqwest::Client` per `ApiClient`, one attempt per call: no retry,
//! no backoff, no timeout beyond what `ClientConfig` sets. Two cross-cutting
//! behaviors live here and nowhere else:
//!
//! - before dispatch, the stored token (if any) becomes `Authorization: Bearer <token>`;
//! - after a 401/403, the stored token is removed and an [`AuthSignal`] is
//!   broadcast. The error still reaches the caller.
//!
//! Navigation in response to that signal belongs to `guard`, not here.

use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, HeaderMap};
use reqwest::{Method, Response, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::broadcast;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::storage::TokenStore;

const SIGNAL_CAPACITY: usize = 16;

/// Body variants the backend accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(serde_json::Value),
    /// `application/x-www-form-urlencoded`, used by the OAuth2-style login.
    Form(Vec<(String, String)>),
}

/// Authorization events published by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthSignal {
    /// A request was rejected with 401/403 and the stored token was cleared.
    Unauthorized { status: u16, path: String },
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenStore>,
    signals: broadcast::Sender<AuthSignal>,
}

impl ApiClient {
    /// Build a client for `config.base_url` that reads and clears tokens in `tokens`.
    pub fn new(config: &ClientConfig, tokens: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = config.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        let http = builder.build().map_err(|e| ApiError::Transport(e.to_string()))?;
        let (signals, _) = broadcast::channel(SIGNAL_CAPACITY);
        Ok(Self { http, base_url: config.base_url.clone(), tokens, signals })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    /// Receive [`AuthSignal`]s for requests issued after this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<AuthSignal> {
        self.signals.subscribe()
    }

    /// Absolute URL for an API path such as `/goals`.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }

    /// Send one request and return the response when its status is 2xx.
    ///
    /// Non-success statuses become [`ApiError`]s carrying the parsed `detail`.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<RequestBody>,
        headers: Option<HeaderMap>,
    ) -> Result<Response, ApiError> {
        self.dispatch(method, path, &[], body, headers).await
    }

    async fn dispatch(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<RequestBody>,
        headers: Option<HeaderMap>,
    ) -> Result<Response, ApiError> {
        let mut request = self.http.request(method.clone(), self.endpoint(path));
        if !query.is_empty() {
            request = request.query(query);
        }

        let token = self.tokens.get();
        if let Some(mut headers) = headers {
            if token.is_some() {
                headers.remove(AUTHORIZATION);
            }
            request = request.headers(headers);
        }
        if let Some(token) = &token {
            request = request.bearer_auth(token);
        }
        request = match body {
            Some(RequestBody::Json(value)) => request.json(&value),
            Some(RequestBody::Form(pairs)) => request.form(&pairs),
            None => request,
        };

        tracing::debug!(%method, path, authenticated = token.is_some(), "api request");
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let err = ApiError::from_status(status.as_u16(), &text);
        if err.is_unauthorized() {
            self.tokens.remove();
            tracing::warn!(%method, path, status = status.as_u16(), "authorization rejected; token cleared");
            // No receivers is fine: nobody is interested in redirects.
            let _ = self
                .signals
                .send(AuthSignal::Unauthorized { status: status.as_u16(), path: path.to_owned() });
        } else {
            tracing::debug!(%method, path, status = status.as_u16(), "api request rejected");
        }
        Err(err)
    }

    // =========================================================================
    // TYPED HELPERS
    // =========================================================================

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send(Method::GET, path, None, None).await?;
        decode(response).await
    }

    /// `GET` with `query` appended to `path`, encoded by reqwest.
    pub async fn get_json_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let response = self.dispatch(Method::GET, path, query, None, None).await?;
        decode(response).await
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .send(Method::POST, path, Some(json_body(body)?), None)
            .await?;
        decode(response).await
    }

    pub async fn patch_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .send(Method::PATCH, path, Some(json_body(body)?), None)
            .await?;
        decode(response).await
    }

    /// `POST` with no body, for action endpoints such as `/events/{id}/join`.
    pub async fn post_action<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send(Method::POST, path, None, None).await?;
        decode(response).await
    }

    pub async fn post_form<T: DeserializeOwned>(&self, path: &str, pairs: &[(&str, &str)]) -> Result<T, ApiError> {
        let pairs = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        let response = self
            .send(Method::POST, path, Some(RequestBody::Form(pairs)), None)
            .await?;
        decode(response).await
    }

    /// `DELETE`; any success body (usually 204 No Content) is discarded.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send(Method::DELETE, path, None, None).await?;
        Ok(())
    }
}

/// `prefix` followed by `segments`, each escaped so an id containing `/`,
/// `?` or `#` stays a single path segment.
#[must_use]
pub fn resource_path(prefix: &str, segments: &[&str]) -> String {
    // Fixed http base: parsing cannot fail and it always has path segments.
    let escaped = Url::parse("http://api.invalid/")
        .ok()
        .and_then(|mut url| {
            url.path_segments_mut().ok()?.clear().extend(segments);
            Some(url.path().to_owned())
        })
        .unwrap_or_default();
    format!("{prefix}{escaped}")
}

fn json_body<B: Serialize + ?Sized>(body: &B) -> Result<RequestBody, ApiError> {
    serde_json::to_value(body)
        .map(RequestBody::Json)
        .map_err(|e| ApiError::Encode(e.to_string()))
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let text = response
        .text()
        .await
        .map_err(|e| ApiError::Transport(e.to_string()))?;
    serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
}

#[cfg(test)]
#[path = "http_test.rs"]
mod tests;
