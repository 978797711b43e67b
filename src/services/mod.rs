//! Typed resource services over the gateway.
//!
//! Each service is a thin caller: it builds the request, lets the gateway
//! handle credentials and the refresh protocol, and interprets the
//! domain-specific status code (200 vs 201) itself.

pub mod auth;
pub mod comments;
pub mod likes;
pub mod posts;
pub mod recommendations;
pub mod users;

use crate::gateway::types::{ApiError, ApiResponse};

/// Enforce the one status code a domain operation defines as success. The
/// refresh protocol has already run by the time a response gets here.
pub(crate) fn expect_status(response: &ApiResponse, expected: u16) -> Result<(), ApiError> {
    if response.status == expected {
        Ok(())
    } else {
        Err(ApiError::Status { status: response.status, body: response.body_text() })
    }
}
