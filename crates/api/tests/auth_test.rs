mod test_utils;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_utils::TestApp;

#[tokio::test]
async fn test_health_reports_storage_backend() {
    let app = TestApp::new();

    let (status, body) = app.get("/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok", "storage": "memory" }));
}

#[tokio::test]
async fn test_register_and_login() {
    let app = TestApp::new();

    let (status, body) = app
        .post(
            "/register",
            None,
            json!({ "username": "alice", "password": "pw", "email": "alice@example.com" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    let user_id = body["user_id"].as_i64().unwrap();

    let (status, body) = app
        .post("/login", None, json!({ "username": "alice", "password": "pw" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_id"], json!(user_id));
    assert_eq!(body["username"], json!("alice"));
    assert!(body["token"].as_str().is_some());
}

#[tokio::test]
async fn test_register_requires_username_and_password() {
    let app = TestApp::new();

    let (status, body) = app
        .post("/register", None, json!({ "username": "alice" }))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Username and password are required" }));
}

#[tokio::test]
async fn test_register_taken_username() {
    let app = TestApp::new();
    app.member("alice").await;

    let (status, body) = app
        .post(
            "/register",
            None,
            json!({ "username": "alice", "password": "other" }),
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body, json!({ "error": "Username already taken" }));
}

#[tokio::test]
async fn test_login_with_wrong_password() {
    let app = TestApp::new();
    app.member("alice").await;

    let (status, body) = app
        .post("/login", None, json!({ "username": "alice", "password": "nope" }))
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "error": "Invalid credentials" }));
}

#[tokio::test]
async fn test_logout_revokes_the_token() {
    let app = TestApp::new();
    let (_, token) = app.member("alice").await;

    let (status, _) = app.get("/my_bookings", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.post("/logout", Some(&token), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true }));

    let (status, body) = app.get("/my_bookings", Some(&token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "error": "Authentication required" }));
}

#[tokio::test]
async fn test_protected_routes_need_a_token() {
    let app = TestApp::new();

    for (status, _) in [
        app.get("/my_bookings", None).await,
        app.get("/my_classes", None).await,
        app.post("/book", None, json!({ "slot_id": 1 })).await,
        app.delete("/bookings/1", None).await,
        app.get("/my_bookings", Some("not-a-token")).await,
    ] {
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
