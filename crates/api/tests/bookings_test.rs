mod test_utils;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_utils::{TestApp, date};

#[tokio::test]
async fn test_list_slots_only_shows_upcoming() {
    let app = TestApp::new();
    app.slot(-1, 8, 10).await;
    let upcoming = app.slot(1, 16, 10).await;

    let (status, body) = app.get("/slots", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "slots": [{
                "id": upcoming,
                "date": date(1).format("%Y-%m-%d").to_string(),
                "start_time": "16:00",
                "end_time": "17:00",
                "available": 10,
                "capacity": 10,
            }]
        })
    );
}

#[tokio::test]
async fn test_book_slot() {
    let app = TestApp::new();
    let slot_id = app.slot(1, 8, 10).await;
    let (_, token) = app.member("alice").await;

    let (status, body) = app
        .post("/book", Some(&token), json!({ "slot_id": slot_id }))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["available"], json!(9));
    assert_eq!(
        body["slot_info"],
        json!(format!("{} 08:00-09:00", date(1).format("%Y-%m-%d")))
    );

    let (status, body) = app.get("/my_bookings", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    let bookings = body["bookings"].as_array().unwrap();
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0]["slot_id"], json!(slot_id));
    assert_eq!(bookings[0]["start_time"], json!("08:00"));
}

#[tokio::test]
async fn test_book_slot_rejections() {
    let app = TestApp::new();
    let roomy = app.slot(1, 9, 5).await;
    let tiny = app.slot(1, 10, 1).await;
    let (_, alice) = app.member("alice").await;
    let (_, bob) = app.member("bob").await;

    app.post("/book", Some(&alice), json!({ "slot_id": roomy }))
        .await;
    let (status, body) = app
        .post("/book", Some(&alice), json!({ "slot_id": roomy }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "You already have a booking for this slot" }));

    app.post("/book", Some(&alice), json!({ "slot_id": tiny })).await;
    let (status, body) = app.post("/book", Some(&bob), json!({ "slot_id": tiny })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "No available space in this slot" }));

    let (status, body) = app.post("/book", Some(&bob), json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Slot ID is required" }));

    let (status, body) = app
        .post("/book", Some(&bob), json!({ "slot_id": 9999 }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Slot not found" }));

    let slot = app.stores().slots.get_slot(roomy).await.unwrap();
    assert_eq!(slot.available, 4);
}

#[tokio::test]
async fn test_cancel_booking() {
    let app = TestApp::new();
    let slot_id = app.slot(2, 17, 3).await;
    let (_, token) = app.member("alice").await;

    app.post("/book", Some(&token), json!({ "slot_id": slot_id }))
        .await;
    let (status, body) = app
        .delete(&format!("/bookings/{}", slot_id), Some(&token))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "available": 3 }));

    let (status, body) = app
        .delete(&format!("/bookings/{}", slot_id), Some(&token))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Booking not found" }));
}

#[tokio::test]
async fn test_delete_slot_requires_staff() {
    let app = TestApp::new();
    let slot_id = app.slot(1, 18, 10).await;
    let (_, member) = app.member("alice").await;
    let staff = app.staff("coach").await;

    app.post("/book", Some(&member), json!({ "slot_id": slot_id }))
        .await;

    let (status, body) = app
        .delete(&format!("/slots/{}", slot_id), Some(&member))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, json!({ "error": "Staff access required" }));

    let (status, body) = app
        .delete(&format!("/slots/{}", slot_id), Some(&staff))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "removed_bookings": 1 }));

    let (_, body) = app.get("/my_bookings", Some(&member)).await;
    assert_eq!(body, json!({ "bookings": [] }));

    let (_, body) = app.get("/slots", None).await;
    assert_eq!(body, json!({ "slots": [] }));
}
