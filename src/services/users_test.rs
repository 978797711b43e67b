use super::*;
use crate::gateway::test_support::*;
use crate::gateway::types::RequestBody;
use serde_json::json;
use std::sync::Arc;

fn service(transport: &Arc<MockTransport>, store: crate::session::SessionStore) -> UsersService {
    UsersService::new(Arc::new(gateway_with(Arc::clone(transport), store)))
}

fn user_json() -> serde_json::Value {
    json!({ "_id": "u1", "username": "dana", "profileImage": "https://img.test/d.png" })
}

// =============================================================================
// get / update
// =============================================================================

#[tokio::test]
async fn get_parses_user() {
    let transport = Arc::new(MockTransport::new());
    let users = service(&transport, logged_in_store());
    transport.plan_status("/users/u1", 200, user_json());

    let user = users.get("u1").await.unwrap();
    assert_eq!(user.id, "u1");
    assert_eq!(user.email, None);
}

#[tokio::test]
async fn update_username_puts_and_mirrors_into_session() {
    let transport = Arc::new(MockTransport::new());
    let store = logged_in_store();
    let users = service(&transport, store.clone());
    transport.plan_status("/users/u1", 200, json!({ "_id": "u1", "username": "margo" }));

    let user = users.update_username("u1", "margo").await.unwrap();
    assert_eq!(user.username, "margo");

    let calls = transport.calls_to("/users/u1");
    assert_eq!(calls[0].body, RequestBody::Json(json!({ "username": "margo" })));
    assert_eq!(store.snapshot().unwrap().identity.username.as_deref(), Some("margo"));
}

#[tokio::test]
async fn update_username_for_someone_else_leaves_session_alone() {
    let transport = Arc::new(MockTransport::new());
    let store = logged_in_store();
    let users = service(&transport, store.clone());
    transport.plan_status("/users/u2", 200, json!({ "_id": "u2", "username": "margo" }));

    users.update_username("u2", "margo").await.unwrap();
    assert_eq!(store.snapshot().unwrap().identity.username.as_deref(), Some("dana"));
}

#[tokio::test]
async fn update_profile_image_mirrors_into_session() {
    let transport = Arc::new(MockTransport::new());
    let store = logged_in_store();
    let users = service(&transport, store.clone());
    transport.plan_status(
        "/users/u1",
        200,
        json!({ "_id": "u1", "username": "dana", "profileImage": "https://img.test/new.png" }),
    );

    users.update_profile_image("u1", "https://img.test/new.png").await.unwrap();
    assert_eq!(
        store.snapshot().unwrap().identity.profile_image.as_deref(),
        Some("https://img.test/new.png")
    );
}

// =============================================================================
// upload
// =============================================================================

#[tokio::test]
async fn upload_image_sends_bytes_with_filename_param() {
    let transport = Arc::new(MockTransport::new());
    let users = service(&transport, logged_in_store());
    transport.plan_status("/file", 200, json!({ "url": "https://img.test/abc.jpg" }));

    let url = users.upload_image("ramen.jpg", "image/jpeg", vec![0xff, 0xd8]).await.unwrap();
    assert_eq!(url, "https://img.test/abc.jpg");

    let calls = transport.calls_to("/file");
    assert_eq!(calls[0].query, vec![("file".to_owned(), "ramen.jpg".to_owned())]);
    assert_eq!(
        calls[0].body,
        RequestBody::Bytes { content_type: "image/jpeg".into(), data: vec![0xff, 0xd8] }
    );
}

// =============================================================================
// models
// =============================================================================

#[test]
fn user_ref_id_is_optional() {
    let user_ref: UserRef = serde_json::from_value(json!({ "username": "dana" })).unwrap();
    assert_eq!(user_ref.id, None);
    assert_eq!(user_ref.profile_image, None);
}
