//! Comments on posts: cursor-paginated listing and edit-in-place CRUD.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::gateway::Gateway;
use crate::gateway::types::{ApiError, ApiRequest};
use crate::services::expect_status;
use crate::services::users::UserRef;

/// A comment. The list endpoint returns a bare array, newest page first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(rename = "_id")]
    pub id: String,
    pub post_id: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserRef>,
}

pub struct CommentsService {
    gateway: Arc<Gateway>,
}

impl CommentsService {
    #[must_use]
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }

    /// One page of a post's comments; `last_comment_id` is the cursor from
    /// the previous page, an empty page means the thread is exhausted.
    ///
    /// # Errors
    ///
    /// Surfaces gateway failures and [`ApiError::Parse`] on a bad body.
    pub async fn list(
        &self,
        post_id: &str,
        last_comment_id: Option<&str>,
    ) -> Result<Vec<Comment>, ApiError> {
        let mut request = ApiRequest::get("/comments").query("postId", post_id);
        if let Some(cursor) = last_comment_id {
            request = request.query("lastCommentId", cursor);
        }
        let response = self.gateway.send(request).await?;
        response.json()
    }

    /// Add a comment; 201 with the stored record.
    ///
    /// # Errors
    ///
    /// Surfaces gateway failures; any status other than 201 is a failure.
    pub async fn create(&self, post_id: &str, content: &str) -> Result<Comment, ApiError> {
        let response = self
            .gateway
            .send(ApiRequest::post("/comments").json(json!({ "postId": post_id, "content": content })))
            .await?;
        expect_status(&response, 201)?;
        response.json()
    }

    /// Replace a comment's text; 200 with the updated record.
    ///
    /// # Errors
    ///
    /// Surfaces gateway failures; any status other than 200 is a failure.
    pub async fn update(&self, comment_id: &str, content: &str) -> Result<Comment, ApiError> {
        let response = self
            .gateway
            .send(ApiRequest::put(format!("/comments/{comment_id}")).json(json!({ "content": content })))
            .await?;
        expect_status(&response, 200)?;
        response.json()
    }

    /// Delete a comment.
    ///
    /// # Errors
    ///
    /// Surfaces gateway failures.
    pub async fn delete(&self, comment_id: &str) -> Result<(), ApiError> {
        let response = self.gateway.send(ApiRequest::delete(format!("/comments/{comment_id}"))).await?;
        expect_status(&response, 200)
    }
}

#[cfg(test)]
#[path = "comments_test.rs"]
mod tests;
