//! Post likes. The server keeps the count; callers adjust their local copy
//! optimistically after a confirmed toggle.

use std::sync::Arc;

use serde_json::json;

use crate::gateway::Gateway;
use crate::gateway::types::{ApiError, ApiRequest};
use crate::services::expect_status;

pub struct LikesService {
    gateway: Arc<Gateway>,
}

impl LikesService {
    #[must_use]
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }

    /// Like a post; 201 confirms it.
    ///
    /// # Errors
    ///
    /// Surfaces gateway failures; any status other than 201 is a failure.
    pub async fn like(&self, post_id: &str) -> Result<(), ApiError> {
        let response = self.gateway.send(ApiRequest::post("/likes").json(json!({ "postId": post_id }))).await?;
        expect_status(&response, 201)
    }

    /// Remove a like; 200 confirms it.
    ///
    /// # Errors
    ///
    /// Surfaces gateway failures; any status other than 200 is a failure.
    pub async fn unlike(&self, post_id: &str) -> Result<(), ApiError> {
        let response = self.gateway.send(ApiRequest::delete(format!("/likes/{post_id}"))).await?;
        expect_status(&response, 200)
    }
}

#[cfg(test)]
#[path = "likes_test.rs"]
mod tests;
