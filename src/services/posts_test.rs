use super::*;
use crate::gateway::test_support::*;
use crate::gateway::types::{ApiError, RequestBody};
use serde_json::json;
use std::sync::Arc;

fn service(transport: &Arc<MockTransport>) -> PostsService {
    PostsService::new(Arc::new(gateway_with(Arc::clone(transport), logged_in_store())))
}

fn post_json(id: &str) -> serde_json::Value {
    json!({
        "_id": id,
        "title": "Ramen at Kinton",
        "content": "Get the spicy garlic one.",
        "image": "https://img.test/ramen.jpg",
        "rating": 4.5,
        "likesCount": 12,
        "commentsCount": 3,
        "likedByCurrentUser": true,
        "user": { "username": "dana", "profileImage": "https://img.test/d.png" }
    })
}

// =============================================================================
// feed
// =============================================================================

#[tokio::test]
async fn feed_parses_posts_and_cursor() {
    let transport = Arc::new(MockTransport::new());
    let posts = service(&transport);
    transport.plan_status("/posts", 200, json!({ "posts": [post_json("p1"), post_json("p2")] }));

    let page = posts.feed(None, None).await.unwrap();

    assert_eq!(page.posts.len(), 2);
    assert_eq!(page.posts[0].id, "p1");
    assert_eq!(page.posts[0].rating, 4.5);
    assert!(page.posts[0].liked_by_current_user);
    assert_eq!(page.posts[0].author.as_ref().unwrap().username, "dana");
    assert_eq!(page.last_post_id(), Some("p2"));
    assert!(page.has_more());
}

#[tokio::test]
async fn feed_sends_cursor_and_author_filter() {
    let transport = Arc::new(MockTransport::new());
    let posts = service(&transport);
    transport.plan_status("/posts", 200, json!({ "posts": [] }));

    posts.feed(Some("u1"), Some("p9")).await.unwrap();

    let calls = transport.calls_to("/posts");
    assert_eq!(
        calls[0].query,
        vec![("userId".to_owned(), "u1".to_owned()), ("lastPostId".to_owned(), "p9".to_owned())]
    );
}

#[tokio::test]
async fn empty_feed_page_means_end_of_feed() {
    let transport = Arc::new(MockTransport::new());
    let posts = service(&transport);
    transport.plan_status("/posts", 200, json!({ "posts": [] }));

    let page = posts.feed(None, None).await.unwrap();
    assert!(!page.has_more());
    assert_eq!(page.last_post_id(), None);
}

#[tokio::test]
async fn feed_omits_absent_params() {
    let transport = Arc::new(MockTransport::new());
    let posts = service(&transport);
    transport.plan_status("/posts", 200, json!({ "posts": [] }));

    posts.feed(None, None).await.unwrap();
    assert!(transport.calls_to("/posts")[0].query.is_empty());
}

// =============================================================================
// CRUD
// =============================================================================

#[tokio::test]
async fn get_fetches_one_post() {
    let transport = Arc::new(MockTransport::new());
    let posts = service(&transport);
    transport.plan_status("/posts/p1", 200, post_json("p1"));

    let post = posts.get("p1").await.unwrap();
    assert_eq!(post.id, "p1");
    assert_eq!(post.likes_count, 12);
}

#[tokio::test]
async fn create_expects_201() {
    let transport = Arc::new(MockTransport::new());
    let posts = service(&transport);
    transport.plan_status("/posts", 201, post_json("p1"));

    let draft = PostDraft {
        posted_by: "u1".into(),
        title: "Ramen at Kinton".into(),
        content: "Get the spicy garlic one.".into(),
        image: "https://img.test/ramen.jpg".into(),
        rating: 4.5,
    };
    let post = posts.create(&draft).await.unwrap();
    assert_eq!(post.id, "p1");

    let calls = transport.calls_to("/posts");
    assert_eq!(
        calls[0].body,
        RequestBody::Json(json!({
            "postedBy": "u1",
            "title": "Ramen at Kinton",
            "content": "Get the spicy garlic one.",
            "image": "https://img.test/ramen.jpg",
            "rating": 4.5
        }))
    );
}

#[tokio::test]
async fn create_rejects_unexpected_success_status() {
    let transport = Arc::new(MockTransport::new());
    let posts = service(&transport);
    transport.plan_status("/posts", 200, post_json("p1"));

    let draft = PostDraft {
        posted_by: "u1".into(),
        title: "t".into(),
        content: String::new(),
        image: "i".into(),
        rating: 3.0,
    };
    let err = posts.create(&draft).await.unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 200, .. }));
}

#[tokio::test]
async fn update_expects_200() {
    let transport = Arc::new(MockTransport::new());
    let posts = service(&transport);
    transport.plan_status("/posts/p1", 200, post_json("p1"));

    let draft = PostDraft {
        posted_by: "u1".into(),
        title: "Ramen at Kinton".into(),
        content: "Edited.".into(),
        image: "https://img.test/ramen.jpg".into(),
        rating: 5.0,
    };
    let post = posts.update("p1", &draft).await.unwrap();
    assert_eq!(post.id, "p1");
}

#[tokio::test]
async fn delete_hits_the_post_path() {
    let transport = Arc::new(MockTransport::new());
    let posts = service(&transport);
    transport.plan_status("/posts/p1", 200, json!({}));

    posts.delete("p1").await.unwrap();
    assert_eq!(transport.calls_to("/posts/p1").len(), 1);
}

// =============================================================================
// model defaults
// =============================================================================

#[test]
fn post_decodes_without_optional_counters() {
    let post: Post = serde_json::from_value(json!({
        "_id": "p1",
        "title": "t",
        "image": "i",
        "rating": 3.0
    }))
    .unwrap();
    assert_eq!(post.likes_count, 0);
    assert_eq!(post.comments_count, 0);
    assert!(!post.liked_by_current_user);
    assert_eq!(post.author, None);
    assert_eq!(post.content, "");
}
