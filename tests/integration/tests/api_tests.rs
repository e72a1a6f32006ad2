//! API Integration Tests
//!
//! The real router is served over in-memory collaborators, so no database
//! or Redis instance is needed.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{assert_error, assert_json, TestHarness, TestServer};
use like_core::ResourceType;
use reqwest::StatusCode;
use serde_json::{json, Value};

const TOGGLE: &str = "/api/v1/likes/toggle";

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let h = TestHarness::new();
    let server = TestServer::start(&h).await.unwrap();

    let response = server.get("/health").await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_health_ready() {
    let h = TestHarness::new();
    let server = TestServer::start(&h).await.unwrap();

    let response = server.get("/health/ready").await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["status"], "ready");
    assert_eq!(body["checks"]["database"], "healthy");
    assert_eq!(body["checks"]["cache"], "healthy");
    assert_eq!(body["pending_jobs"], 0);
}

#[tokio::test]
async fn test_health_ready_reports_unreachable_store() {
    let h = TestHarness::new();
    let server = TestServer::start(&h).await.unwrap();
    h.db.fail_reads(true);

    let response = server.get("/health/ready").await.unwrap();
    let body: Value = assert_json(response, StatusCode::SERVICE_UNAVAILABLE)
        .await
        .unwrap();
    assert_eq!(body["checks"]["database"], "unhealthy");
    assert_eq!(body["checks"]["cache"], "healthy");
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let h = TestHarness::new();
    let server = TestServer::start(&h).await.unwrap();

    let response = server.get("/health").await.unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}

// ============================================================================
// Toggle Tests
// ============================================================================

#[tokio::test]
async fn test_toggle_like_roundtrip() {
    let h = TestHarness::new();
    let owner = h.db.add_member();
    let actor = h.db.add_member();
    let post = h.db.add_resource(ResourceType::Post, owner);
    let server = TestServer::start(&h).await.unwrap();

    let body = json!({"resourceType": "post", "resourceId": post.resource_id.to_string()});

    let response = server.post_as(TOGGLE, actor, &body).await.unwrap();
    let liked: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(liked["resourceId"], post.resource_id.to_string());
    assert_eq!(liked["actorId"], actor.to_string());
    assert_eq!(liked["resourceType"], "POST");
    assert_eq!(liked["active"], true);
    assert_eq!(liked["count"], 1);
    assert!(liked["timestamp"].is_string());

    let response = server.post_as(TOGGLE, actor, &body).await.unwrap();
    let unliked: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(unliked["active"], false);
    assert_eq!(unliked["count"], 0);

    assert_eq!(h.ctx.queue().len(), 1);
}

#[tokio::test]
async fn test_toggle_accepts_numeric_resource_id() {
    let h = TestHarness::new();
    let owner = h.db.add_member();
    let actor = h.db.add_member();
    let reply = h.db.add_resource(ResourceType::Reply, owner);
    let server = TestServer::start(&h).await.unwrap();

    let body = json!({"resourceType": "REPLY", "resourceId": reply.resource_id.into_inner()});
    let response = server.post_as(TOGGLE, actor, &body).await.unwrap();
    let liked: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(liked["resourceType"], "REPLY");
    assert_eq!(liked["active"], true);
}

#[tokio::test]
async fn test_get_like_count() {
    let h = TestHarness::new();
    let owner = h.db.add_member();
    let comment = h.db.add_resource(ResourceType::Comment, owner);
    let server = TestServer::start(&h).await.unwrap();

    for _ in 0..2 {
        let body = json!({"resourceType": "comment", "resourceId": comment.resource_id});
        let response = server
            .post_as(TOGGLE, h.db.add_member(), &body)
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let path = format!("/api/v1/likes/comment/{}", comment.resource_id);
    let response = server.get(&path).await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["resourceType"], "COMMENT");
    assert_eq!(body["count"], 2);
}

// ============================================================================
// Error Tests
// ============================================================================

#[tokio::test]
async fn test_toggle_without_actor_header() {
    let h = TestHarness::new();
    let server = TestServer::start(&h).await.unwrap();

    let body = json!({"resourceType": "post", "resourceId": "1"});
    let response = server.post(TOGGLE, &body).await.unwrap();
    let code = assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(code, "MISSING_ACTOR");
}

#[tokio::test]
async fn test_toggle_own_content_is_forbidden() {
    let h = TestHarness::new();
    let owner = h.db.add_member();
    let post = h.db.add_resource(ResourceType::Post, owner);
    let server = TestServer::start(&h).await.unwrap();

    let body = json!({"resourceType": "post", "resourceId": post.resource_id});
    let response = server.post_as(TOGGLE, owner, &body).await.unwrap();
    let code = assert_error(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(code, "CANNOT_REACT_TO_OWN_CONTENT");
    assert!(h.ctx.queue().is_empty());
}

#[tokio::test]
async fn test_toggle_unknown_resource_and_actor() {
    let h = TestHarness::new();
    let actor = h.db.add_member();
    let server = TestServer::start(&h).await.unwrap();

    let body = json!({"resourceType": "post", "resourceId": "999999999"});
    let response = server.post_as(TOGGLE, actor, &body).await.unwrap();
    let code = assert_error(response, StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(code, "UNKNOWN_RESOURCE");

    let stranger = integration_tests::unique_id();
    let response = server.post_as(TOGGLE, stranger, &body).await.unwrap();
    let code = assert_error(response, StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(code, "UNKNOWN_ACTOR");
}

#[tokio::test]
async fn test_toggle_rejects_bad_bodies() {
    let h = TestHarness::new();
    let actor = h.db.add_member();
    let server = TestServer::start(&h).await.unwrap();

    let response = server
        .post_as(TOGGLE, actor, &json!({"resourceType": "story", "resourceId": "1"}))
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "INVALID_RESOURCE_TYPE");

    let response = server
        .post_as(TOGGLE, actor, &json!({"resourceType": "post", "resourceId": "0"}))
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(body["error"]["details"]["resource_id"].is_array());

    let response = server
        .post_as(TOGGLE, actor, &json!({"resourceType": "post"}))
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "INVALID_BODY");
}

#[tokio::test]
async fn test_get_count_rejects_bad_path() {
    let h = TestHarness::new();
    let server = TestServer::start(&h).await.unwrap();

    let response = server.get("/api/v1/likes/post/abc").await.unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "INVALID_PATH_PARAMETER");

    let response = server.get("/api/v1/likes/story/1").await.unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "INVALID_RESOURCE_TYPE");
}
