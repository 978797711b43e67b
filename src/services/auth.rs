//! Registration, login, and logout.
//!
//! Login responses carry the `{accessToken, refreshToken, user}` triple; the
//! service stores the whole session and hands the caller only the display
//! identity, never the tokens.

use std::sync::Arc;

use serde::Serialize;
use serde_json::json;

use crate::gateway::Gateway;
use crate::gateway::types::{ApiError, ApiRequest, TokenGrant};
use crate::session::Identity;
use crate::services::expect_status;
use crate::services::users::User;

/// Registration payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
}

pub struct AuthService {
    gateway: Arc<Gateway>,
}

impl AuthService {
    #[must_use]
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }

    /// Create an account. Does not log in; callers follow up with
    /// [`Self::login`] (matches the server's contract).
    ///
    /// # Errors
    ///
    /// Surfaces gateway failures; any status other than 200 is a failure.
    pub async fn register(&self, new_user: &NewUser) -> Result<User, ApiError> {
        let body = serde_json::to_value(new_user).map_err(|e| ApiError::Parse(e.to_string()))?;
        let response = self.gateway.send(ApiRequest::post("/auth/register").json(body)).await?;
        expect_status(&response, 200)?;
        response.json()
    }

    /// Password login. On success the session (tokens + identity) replaces
    /// whatever the store held.
    ///
    /// # Errors
    ///
    /// Surfaces gateway failures; any status other than 200 is a failure.
    pub async fn login(&self, username: &str, password: &str) -> Result<Identity, ApiError> {
        let request =
            ApiRequest::post("/auth/login").json(json!({ "username": username, "password": password }));
        self.complete_login(request).await
    }

    /// Federated login with a provider-issued credential token.
    ///
    /// # Errors
    ///
    /// Surfaces gateway failures; any status other than 200 is a failure.
    pub async fn login_with_google(&self, credential: &str) -> Result<Identity, ApiError> {
        let request = ApiRequest::post("/auth/login").json(json!({ "credential": credential }));
        self.complete_login(request).await
    }

    async fn complete_login(&self, request: ApiRequest) -> Result<Identity, ApiError> {
        let response = self.gateway.send(request).await?;
        expect_status(&response, 200)?;
        let grant: TokenGrant = response.json()?;
        let session = grant.into_session();
        let identity = session.identity.clone();
        self.gateway.store().set(Some(session));
        tracing::info!(user_id = %identity.user_id, "logged in");
        Ok(identity)
    }

    /// Drop the session locally and remove its persisted mirror. Navigation
    /// back to a login surface is the caller's concern.
    pub fn logout(&self) {
        self.gateway.store().clear();
        tracing::info!("logged out");
    }

    /// For a restored session: fetch the full user record and backfill the
    /// display fields the durable mirror does not carry. `Ok(None)` when
    /// logged out.
    ///
    /// # Errors
    ///
    /// Surfaces gateway failures.
    pub async fn current_user(&self) -> Result<Option<User>, ApiError> {
        let Some(user_id) = self.gateway.store().user_id() else {
            return Ok(None);
        };
        let response = self.gateway.send(ApiRequest::get(format!("/users/{user_id}"))).await?;
        let user: User = response.json()?;
        self.gateway.store().set_username(&user.username);
        if let Some(image) = &user.profile_image {
            self.gateway.store().set_profile_image(image);
        }
        Ok(Some(user))
    }
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
