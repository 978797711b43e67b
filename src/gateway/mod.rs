//! Authenticated request gateway.
//!
//! ARCHITECTURE
//! ============
//! Single choke point for every outbound call. The gateway attaches the
//! current access token (read from the store at send time, never earlier),
//! dispatches through the [`Transport`] seam, and on a 401 performs at most
//! one refresh-and-retry cycle before surfacing the failure. Refresh calls
//! are single-flighted: N requests failing together share one refresh and
//! observe one outcome.
//!
//! ERROR HANDLING
//! ==============
//! Only the authorization-expired case is recovered locally. Every other
//! failure (other 4xx, 5xx, network, timeout) surfaces verbatim as
//! [`ApiError::Status`] / [`ApiError::Transport`]; the caller decides the
//! user-visible behavior. Cancelling a call means dropping its future: a
//! dropped call never retries and never aborts a refresh other waiters need.

pub mod http;
pub mod single_flight;
pub mod types;

use std::sync::Arc;

use serde_json::json;

use crate::session::SessionStore;
use single_flight::{RefreshCoordinator, RefreshOutcome};
use types::{ApiError, ApiRequest, ApiResponse, TokenGrant, Transport};

const REFRESH_PATH: &str = "/auth/refresh";

pub struct Gateway {
    transport: Arc<dyn Transport>,
    store: SessionStore,
    refresh: RefreshCoordinator,
}

impl Gateway {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, store: SessionStore) -> Self {
        Self { transport, store, refresh: RefreshCoordinator::new() }
    }

    #[must_use]
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Send one request. 2xx responses come back unchanged; a 401 with a
    /// usable refresh token triggers the refresh-retry protocol exactly once.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Status`] for any non-2xx the protocol does not recover
    /// - [`ApiError::SessionExpired`] when the refresh itself failed (the
    ///   session has already been cleared)
    /// - [`ApiError::Transport`] for network-level failures, never retried
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let mut retried = false;
        loop {
            let bearer = self.store.access_token();
            let response = self.transport.dispatch(&request, bearer.as_deref()).await?;

            if response.status == 401 && !retried && self.store.refresh_token().is_some() {
                tracing::debug!(path = %request.path, "unauthorized; joining token refresh");
                match self.refresh_session().await {
                    RefreshOutcome::Refreshed => {
                        retried = true;
                        continue;
                    }
                    RefreshOutcome::Expired => return Err(ApiError::SessionExpired),
                }
            }

            if response.is_success() {
                return Ok(response);
            }
            return Err(ApiError::Status { status: response.status, body: response.body_text() });
        }
    }

    async fn refresh_session(&self) -> RefreshOutcome {
        let transport = Arc::clone(&self.transport);
        let store = self.store.clone();
        self.refresh.join_or_start(move || run_refresh(transport, store)).await
    }
}

/// The refresh operation itself. Reads the refresh token from the store (the
/// one authoritative source), dispatches directly through the transport so
/// the refresh endpoint's own 401 can never re-enter the retry protocol, and
/// replaces or clears the session before any waiter is released.
async fn run_refresh(transport: Arc<dyn Transport>, store: SessionStore) -> RefreshOutcome {
    let Some(refresh_token) = store.refresh_token() else {
        // Logged out while queued behind the coordinator.
        return RefreshOutcome::Expired;
    };

    let request = ApiRequest::post(REFRESH_PATH).json(json!({ "refreshToken": refresh_token }));
    match transport.dispatch(&request, None).await {
        Ok(response) if response.status == 200 => match response.json::<TokenGrant>() {
            Ok(grant) => {
                store.set(Some(grant.into_session()));
                tracing::info!("session refreshed");
                RefreshOutcome::Refreshed
            }
            Err(e) => {
                tracing::warn!(error = %e, "token refresh returned an undecodable grant");
                store.clear();
                RefreshOutcome::Expired
            }
        },
        Ok(response) => {
            tracing::warn!(status = response.status, "token refresh rejected");
            store.clear();
            RefreshOutcome::Expired
        }
        Err(e) => {
            tracing::warn!(error = %e, "token refresh unreachable");
            store.clear();
            RefreshOutcome::Expired
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support;

#[cfg(test)]
#[path = "gateway_test.rs"]
mod tests;
