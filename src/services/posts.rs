//! The post feed and post CRUD.
//!
//! PAGINATION
//! ==========
//! The feed is cursor-paginated: pass the `_id` of the last post you have as
//! `lastPostId` and the server returns the page after it. An empty page means
//! the end of the feed; there is no explicit cursor token.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::gateway::Gateway;
use crate::gateway::types::{ApiError, ApiRequest};
use crate::services::expect_status;
use crate::services::users::UserRef;

/// A feed post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub image: String,
    pub rating: f64,
    #[serde(default)]
    pub likes_count: i64,
    #[serde(default)]
    pub comments_count: i64,
    #[serde(default)]
    pub liked_by_current_user: bool,
    /// Populated author, when the server denormalizes it.
    #[serde(rename = "user", default, skip_serializing_if = "Option::is_none")]
    pub author: Option<UserRef>,
}

/// Payload for creating or editing a post.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDraft {
    pub posted_by: String,
    pub title: String,
    pub content: String,
    pub image: String,
    pub rating: f64,
}

/// One page of the feed.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedPage {
    pub posts: Vec<Post>,
}

impl FeedPage {
    /// Cursor for the next page: the `_id` of the last post on this one.
    #[must_use]
    pub fn last_post_id(&self) -> Option<&str> {
        self.posts.last().map(|p| p.id.as_str())
    }

    /// An empty page means the feed is exhausted.
    #[must_use]
    pub fn has_more(&self) -> bool {
        !self.posts.is_empty()
    }
}

#[derive(Debug, Deserialize)]
struct FeedWire {
    posts: Vec<Post>,
}

pub struct PostsService {
    gateway: Arc<Gateway>,
}

impl PostsService {
    #[must_use]
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }

    /// Fetch one page of the feed. `user_id` narrows to one author's posts;
    /// `last_post_id` is the cursor from the previous page.
    ///
    /// # Errors
    ///
    /// Surfaces gateway failures and [`ApiError::Parse`] on a bad body.
    pub async fn feed(
        &self,
        user_id: Option<&str>,
        last_post_id: Option<&str>,
    ) -> Result<FeedPage, ApiError> {
        let mut request = ApiRequest::get("/posts");
        if let Some(user_id) = user_id {
            request = request.query("userId", user_id);
        }
        if let Some(cursor) = last_post_id {
            request = request.query("lastPostId", cursor);
        }
        let response = self.gateway.send(request).await?;
        let wire: FeedWire = response.json()?;
        Ok(FeedPage { posts: wire.posts })
    }

    /// Fetch one post by id.
    ///
    /// # Errors
    ///
    /// Surfaces gateway failures.
    pub async fn get(&self, post_id: &str) -> Result<Post, ApiError> {
        let response = self.gateway.send(ApiRequest::get(format!("/posts/{post_id}"))).await?;
        response.json()
    }

    /// Create a post. The server answers 201 with the stored record.
    ///
    /// # Errors
    ///
    /// Surfaces gateway failures; any status other than 201 is a failure.
    pub async fn create(&self, draft: &PostDraft) -> Result<Post, ApiError> {
        let body = serde_json::to_value(draft).map_err(|e| ApiError::Parse(e.to_string()))?;
        let response = self.gateway.send(ApiRequest::post("/posts").json(body)).await?;
        expect_status(&response, 201)?;
        response.json()
    }

    /// Edit a post in place. The server answers 200 with the updated record.
    ///
    /// # Errors
    ///
    /// Surfaces gateway failures; any status other than 200 is a failure.
    pub async fn update(&self, post_id: &str, draft: &PostDraft) -> Result<Post, ApiError> {
        let body = serde_json::to_value(draft).map_err(|e| ApiError::Parse(e.to_string()))?;
        let response = self.gateway.send(ApiRequest::put(format!("/posts/{post_id}")).json(body)).await?;
        expect_status(&response, 200)?;
        response.json()
    }

    /// Delete a post.
    ///
    /// # Errors
    ///
    /// Surfaces gateway failures.
    pub async fn delete(&self, post_id: &str) -> Result<(), ApiError> {
        let response = self.gateway.send(ApiRequest::delete(format!("/posts/{post_id}"))).await?;
        expect_status(&response, 200)
    }
}

#[cfg(test)]
#[path = "posts_test.rs"]
mod tests;
