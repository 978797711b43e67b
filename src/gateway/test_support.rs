//! Scripted transport and fixtures shared by gateway and service tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use serde_json::json;
use tokio::sync::Notify;

use super::Gateway;
use super::types::{ApiError, ApiRequest, ApiResponse, RequestBody, Transport};
use crate::session::{Identity, MemorySessionPersist, Session, SessionStore, lock};

/// One recorded dispatch, bearer exactly as the gateway passed it.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub path: String,
    pub bearer: Option<String>,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
}

/// How the mock answers one dispatch for a path.
pub enum Planned {
    Respond(ApiResponse),
    Fail(ApiError),
    /// Never resolves; for cancellation tests.
    Hang,
    /// Resolves with the response once the notify fires.
    RespondAfter(Arc<Notify>, ApiResponse),
}

/// Scripted [`Transport`]: per-path FIFO of planned answers plus a log of
/// every dispatch. Responses are ready on first poll, so on the
/// current-thread test runtime interleavings are deterministic.
#[derive(Default)]
pub struct MockTransport {
    plan: Mutex<HashMap<String, VecDeque<Planned>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plan(&self, path: &str, planned: Planned) {
        lock(&self.plan).entry(path.to_owned()).or_default().push_back(planned);
    }

    pub fn plan_status(&self, path: &str, status: u16, body: serde_json::Value) {
        self.plan(path, Planned::Respond(response(status, body)));
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        lock(&self.calls).clone()
    }

    pub fn calls_to(&self, path: &str) -> Vec<RecordedCall> {
        lock(&self.calls).iter().filter(|c| c.path == path).cloned().collect()
    }
}

#[async_trait::async_trait]
impl Transport for MockTransport {
    async fn dispatch(&self, request: &ApiRequest, bearer: Option<&str>) -> Result<ApiResponse, ApiError> {
        lock(&self.calls).push(RecordedCall {
            path: request.path.clone(),
            bearer: bearer.map(str::to_owned),
            query: request.query.clone(),
            body: request.body.clone(),
        });

        let planned = lock(&self.plan)
            .get_mut(&request.path)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| panic!("no planned response for {}", request.path));

        match planned {
            Planned::Respond(response) => Ok(response),
            Planned::Fail(error) => Err(error),
            Planned::Hang => {
                futures::future::pending::<()>().await;
                unreachable!()
            }
            Planned::RespondAfter(notify, response) => {
                notify.notified().await;
                Ok(response)
            }
        }
    }
}

pub fn response(status: u16, body: serde_json::Value) -> ApiResponse {
    ApiResponse { status, body: body.to_string().into_bytes() }
}

pub fn grant_json(access: &str, refresh: &str) -> serde_json::Value {
    json!({
        "accessToken": access,
        "refreshToken": refresh,
        "user": { "_id": "u1", "username": "dana", "profileImage": "https://img.test/d.png" }
    })
}

pub fn logged_in_store() -> SessionStore {
    let store = SessionStore::restore(Arc::new(MemorySessionPersist::new()));
    store.set(Some(Session {
        access_token: "A1".into(),
        refresh_token: "R1".into(),
        identity: Identity {
            user_id: "u1".into(),
            username: Some("dana".into()),
            profile_image: None,
        },
    }));
    store
}

pub fn logged_out_store() -> SessionStore {
    SessionStore::restore(Arc::new(MemorySessionPersist::new()))
}

pub fn gateway_with(transport: Arc<MockTransport>, store: SessionStore) -> Gateway {
    Gateway::new(transport, store)
}
