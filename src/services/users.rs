//! User profiles and image upload.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::gateway::Gateway;
use crate::gateway::types::{ApiError, ApiRequest};

/// A full user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
}

/// Embedded author reference as it appears on posts and comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRef {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UploadedFile {
    url: String,
}

pub struct UsersService {
    gateway: Arc<Gateway>,
}

impl UsersService {
    #[must_use]
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }

    /// Fetch a user by id.
    ///
    /// # Errors
    ///
    /// Surfaces gateway failures and [`ApiError::Parse`] on a bad body.
    pub async fn get(&self, user_id: &str) -> Result<User, ApiError> {
        let response = self.gateway.send(ApiRequest::get(format!("/users/{user_id}"))).await?;
        response.json()
    }

    /// Change a user's display name. When it is the current user, the cached
    /// session identity is updated too.
    ///
    /// # Errors
    ///
    /// Surfaces gateway failures.
    pub async fn update_username(&self, user_id: &str, username: &str) -> Result<User, ApiError> {
        let response = self
            .gateway
            .send(ApiRequest::put(format!("/users/{user_id}")).json(json!({ "username": username })))
            .await?;
        let user: User = response.json()?;
        if self.gateway.store().user_id().as_deref() == Some(user_id) {
            self.gateway.store().set_username(&user.username);
        }
        Ok(user)
    }

    /// Change a user's profile image URL, mirroring into the session cache
    /// when it is the current user.
    ///
    /// # Errors
    ///
    /// Surfaces gateway failures.
    pub async fn update_profile_image(&self, user_id: &str, profile_image: &str) -> Result<User, ApiError> {
        let response = self
            .gateway
            .send(ApiRequest::put(format!("/users/{user_id}")).json(json!({ "profileImage": profile_image })))
            .await?;
        let user: User = response.json()?;
        if self.gateway.store().user_id().as_deref() == Some(user_id) {
            if let Some(image) = &user.profile_image {
                self.gateway.store().set_profile_image(image);
            }
        }
        Ok(user)
    }

    /// Upload raw image bytes; returns the URL the server stored them under.
    ///
    /// # Errors
    ///
    /// Surfaces gateway failures.
    pub async fn upload_image(
        &self,
        filename: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<String, ApiError> {
        let response = self
            .gateway
            .send(ApiRequest::post("/file").query("file", filename).bytes(content_type, data))
            .await?;
        let uploaded: UploadedFile = response.json()?;
        Ok(uploaded.url)
    }
}

#[cfg(test)]
#[path = "users_test.rs"]
mod tests;
