//! Restaurant recommendations from a free-text craving description.

use std::sync::Arc;

use serde::Deserialize;

use crate::gateway::Gateway;
use crate::gateway::types::{ApiError, ApiRequest};

/// One recommended restaurant.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub name: String,
    pub description: String,
    pub url: String,
}

pub struct RecommendationsService {
    gateway: Arc<Gateway>,
}

impl RecommendationsService {
    #[must_use]
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }

    /// Ask for a restaurant matching a description of what the user wants.
    ///
    /// # Errors
    ///
    /// Surfaces gateway failures and [`ApiError::Parse`] on a bad body.
    pub async fn restaurant(&self, description: &str) -> Result<Recommendation, ApiError> {
        let response = self
            .gateway
            .send(ApiRequest::get("/recommendation").query("description", description))
            .await?;
        response.json()
    }
}

#[cfg(test)]
#[path = "recommendations_test.rs"]
mod tests;
