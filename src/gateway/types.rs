//! Gateway wire types: requests, responses, the transport seam, and errors.

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::session::{Identity, Session};

// =============================================================================
// ERROR
// =============================================================================

/// Failures produced by the gateway and everything above it.
///
/// A non-2xx status passes through with its original status and body; the
/// gateway recovers locally only from a 401 with a usable refresh token, and
/// surfaces [`ApiError::SessionExpired`] when that recovery itself fails.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    ClientBuild(String),

    /// Network, timeout, or connection failure. Never retried.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The server answered with a non-success status. Carried unchanged.
    #[error("request failed: status {status}")]
    Status { status: u16, body: String },

    /// Token refresh failed; the session has been cleared. The caller should
    /// route the user back to a login surface.
    #[error("session expired")]
    SessionExpired,

    /// The response body could not be decoded.
    #[error("response parse failed: {0}")]
    Parse(String),
}

// =============================================================================
// REQUEST
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

/// Request payload. Raw bytes exist for image upload only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    None,
    Json(serde_json::Value),
    Bytes { content_type: String, data: Vec<u8> },
}

/// One outbound call, before credentials are attached. Callers never set the
/// authorization header themselves; the gateway does, at send time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
}

impl ApiRequest {
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self { method, path: path.into(), query: Vec::new(), body: RequestBody::None }
    }

    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    #[must_use]
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    #[must_use]
    pub fn bytes(mut self, content_type: impl Into<String>, data: Vec<u8>) -> Self {
        self.body = RequestBody::Bytes { content_type: content_type.into(), data };
        self
    }
}

// =============================================================================
// RESPONSE
// =============================================================================

/// Raw response: status plus body bytes. Domain callers decode and interpret
/// status codes (200 vs 201) themselves; the gateway is transport-and-auth
/// only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl ApiResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Parse`] when the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_slice(&self.body).map_err(|e| ApiError::Parse(e.to_string()))
    }

    /// Body as text, lossily decoded.
    #[must_use]
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

// =============================================================================
// TRANSPORT
// =============================================================================

/// Seam between the gateway and the wire. `bearer` is the raw access token;
/// the transport is responsible for the `JWT` authorization scheme.
///
/// Implementations return `Ok` for every HTTP status (401s and 500s included)
/// and `Err` only for transport-level failures.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn dispatch(&self, request: &ApiRequest, bearer: Option<&str>) -> Result<ApiResponse, ApiError>;
}

// =============================================================================
// TOKEN GRANT
// =============================================================================

/// Identity fields as they appear on the wire.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantUser {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub profile_image: Option<String>,
}

/// Response of login and refresh: a fresh token pair plus the user they
/// belong to.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenGrant {
    pub access_token: String,
    pub refresh_token: String,
    pub user: GrantUser,
}

impl TokenGrant {
    #[must_use]
    pub fn into_session(self) -> Session {
        Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            identity: Identity {
                user_id: self.user.id,
                username: Some(self.user.username),
                profile_image: self.user.profile_image,
            },
        }
    }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
