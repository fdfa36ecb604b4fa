// client/src/api/mod.rs
//
// Thin REST wrappers over the backend. One file per backend router; this
// module holds the shared plumbing: the hyper client, the bearer token
// cell, and JSON request/response handling with the backend's `{"detail"}`
// error shape.

mod assist;
mod auth;
mod buddies;
mod checkins;
mod presence;
mod settings;
mod sos;

use std::sync::{Arc, Mutex, PoisonError};

use bytes::Bytes;
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::{Method, Request};
use http_body_util::{BodyExt, Full};
use hyper_util::client::legacy::{Client, connect::HttpConnector};
use hyper_util::rt::TokioExecutor;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

use shared::types::ErrorBody;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum ApiError {
    /// The endpoint needs a session token and none is held.
    #[error("not authenticated")]
    NotAuthenticated,

    /// Non-2xx response; `detail` is the backend's error text.
    #[error("server rejected request ({status}): {detail}")]
    Rejected { status: u16, detail: String },

    #[error("transport error: {0}")]
    Transport(#[from] hyper_util::client::legacy::Error),

    #[error("request build error: {0}")]
    Http(#[from] http::Error),

    #[error("body read error: {0}")]
    Body(#[from] hyper::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ApiError {
    /// HTTP status for rejected requests, `None` for local/transport errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// TokenCell
// ---------------------------------------------------------------------------

/// Shared session credential. One cell is read by both the REST client
/// (Authorization header) and the realtime layer (WebSocket query param),
/// so a login is immediately visible to both.
#[derive(Clone, Default)]
pub struct TokenCell(Arc<Mutex<Option<String>>>);

impl TokenCell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, token: impl Into<String>) {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.into());
    }

    pub fn clear(&self) {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn get(&self) -> Option<String> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

// ---------------------------------------------------------------------------
// ApiClient
// ---------------------------------------------------------------------------

/// REST client. Cheap to clone; clones share the connection pool and token.
#[derive(Clone)]
pub struct ApiClient {
    http: Client<HttpConnector, Full<Bytes>>,
    base_url: String,
    token: TokenCell,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, token: TokenCell) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: Client::builder(TokioExecutor::new()).build_http(),
            base_url,
            token,
        }
    }

    pub fn token(&self) -> &TokenCell {
        &self.token
    }

    // -- request plumbing ---------------------------------------------------

    async fn send(
        &self,
        method: Method,
        path: &str,
        content_type: Option<&str>,
        body: Bytes,
        needs_auth: bool,
    ) -> Result<Bytes, ApiError> {
        let uri = format!("{}{}", self.base_url, path);
        let mut builder = Request::builder().method(method.clone()).uri(&uri);

        if let Some(ct) = content_type {
            builder = builder.header(CONTENT_TYPE, ct);
        }
        match self.token.get() {
            Some(token) => {
                builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
            }
            None if needs_auth => return Err(ApiError::NotAuthenticated),
            None => {}
        }

        debug!("{} {}", method, uri);
        let req = builder.body(Full::new(body))?;
        let resp = self.http.request(req).await?;
        let status = resp.status();
        let bytes = resp.into_body().collect().await?.to_bytes();

        if !status.is_success() {
            let detail = serde_json::from_slice::<ErrorBody>(&bytes)
                .map(|b| b.detail_text())
                .unwrap_or_else(|_| String::from_utf8_lossy(&bytes).into_owned());
            warn!("{} {} -> {}: {}", method, uri, status, detail);
            return Err(ApiError::Rejected {
                status: status.as_u16(),
                detail,
            });
        }

        Ok(bytes)
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let bytes = self.send(Method::GET, path, None, Bytes::new(), true).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub(crate) async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.json_with_body(Method::POST, path, body, true).await
    }

    /// POST without authentication — login and register only.
    pub(crate) async fn post_json_open<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.json_with_body(Method::POST, path, body, false).await
    }

    pub(crate) async fn put_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.json_with_body(Method::PUT, path, body, true).await
    }

    /// POST with an empty body (close/accept/escalate style endpoints).
    pub(crate) async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let bytes = self.send(Method::POST, path, None, Bytes::new(), true).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// POST where the response body is irrelevant (e.g. `/report`).
    pub(crate) async fn post_json_unit<B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), ApiError> {
        let payload = Bytes::from(serde_json::to_vec(body)?);
        self.send(Method::POST, path, Some("application/json"), payload, true)
            .await?;
        Ok(())
    }

    /// POST a pre-built body with an explicit content type (multipart).
    pub(crate) async fn post_raw<T: DeserializeOwned>(
        &self,
        path: &str,
        content_type: &str,
        body: Vec<u8>,
    ) -> Result<T, ApiError> {
        let bytes = self
            .send(
                Method::POST,
                path,
                Some(content_type),
                Bytes::from(body),
                true,
            )
            .await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn json_with_body<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        needs_auth: bool,
    ) -> Result<T, ApiError> {
        let payload = Bytes::from(serde_json::to_vec(body)?);
        let bytes = self
            .send(method, path, Some("application/json"), payload, needs_auth)
            .await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_cell_clones_share_state() {
        let cell = TokenCell::new();
        let other = cell.clone();
        assert!(cell.get().is_none());
        other.set("tok");
        assert_eq!(cell.get().as_deref(), Some("tok"));
        cell.clear();
        assert!(other.get().is_none());
    }

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let api = ApiClient::new("http://h:1/", TokenCell::new());
        assert_eq!(api.base_url, "http://h:1");
    }
}
