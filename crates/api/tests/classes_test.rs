mod test_utils;

use axum::http::StatusCode;
use gymbook_core::models::class::{NewClassSlot, NewClassType, NewTrainer};
use pretty_assertions::assert_eq;
use serde_json::json;
use test_utils::{TestApp, date, hour};

async fn yoga_class(app: &TestApp, capacity: i32) -> i64 {
    let classes = &app.stores().classes;
    let trainer = classes
        .create_trainer(NewTrainer {
            name: "Aditya Sharma".to_string(),
            specialization: "Yoga".to_string(),
            bio: None,
        })
        .await
        .unwrap();
    let yoga = classes
        .create_class_type(NewClassType {
            name: "Yoga".to_string(),
            description: "Flexibility and breathing".to_string(),
            duration_minutes: 60,
        })
        .await
        .unwrap();

    classes
        .create_class_slot(
            NewClassSlot::new(date(1), hour(7), hour(8), yoga.id, trainer.id)
                .with_capacity(capacity),
        )
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn test_list_classes() {
    let app = TestApp::new();
    let class_slot_id = yoga_class(&app, 12).await;

    let (status, body) = app.get("/classes", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "classes": [{
                "id": class_slot_id,
                "class_name": "Yoga",
                "trainer_name": "Aditya Sharma",
                "date": date(1).format("%Y-%m-%d").to_string(),
                "start_time": "07:00",
                "end_time": "08:00",
                "available": 12,
                "capacity": 12,
            }]
        })
    );
}

#[tokio::test]
async fn test_book_and_cancel_class() {
    let app = TestApp::new();
    let class_slot_id = yoga_class(&app, 1).await;
    let (_, alice) = app.member("alice").await;
    let (_, bob) = app.member("bob").await;

    let (status, body) = app
        .post(
            "/classes/book",
            Some(&alice),
            json!({ "class_slot_id": class_slot_id }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["available"], json!(0));

    let (status, body) = app
        .post(
            "/classes/book",
            Some(&bob),
            json!({ "class_slot_id": class_slot_id }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "No available space in this slot" }));

    let (status, body) = app.get("/my_classes", Some(&alice)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["bookings"][0]["class_name"], json!("Yoga"));
    assert_eq!(body["bookings"][0]["trainer_name"], json!("Aditya Sharma"));

    let (status, body) = app
        .delete(
            &format!("/classes/bookings/{}", class_slot_id),
            Some(&alice),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "available": 1 }));
}

#[tokio::test]
async fn test_book_class_requires_an_id() {
    let app = TestApp::new();
    let (_, token) = app.member("alice").await;

    let (status, body) = app.post("/classes/book", Some(&token), json!({})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Class slot ID is required" }));
}

#[tokio::test]
async fn test_staff_deletes_class_slot() {
    let app = TestApp::new();
    let class_slot_id = yoga_class(&app, 10).await;
    let staff = app.staff("coach").await;

    let (status, body) = app
        .delete(&format!("/classes/{}", class_slot_id), Some(&staff))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "removed_bookings": 0 }));
    let (_, body) = app.get("/classes", None).await;
    assert_eq!(body, json!({ "classes": [] }));
}
