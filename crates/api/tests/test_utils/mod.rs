#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use chrono::{Duration as ChronoDuration, NaiveDate, NaiveTime, Utc};
use gymbook_api::{ApiState, router};
use gymbook_core::models::{slot::NewSlot, user::NewUser};
use gymbook_db::Stores;
use serde_json::{Value, json};
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub state: Arc<ApiState>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_stores(Stores::in_memory(Duration::from_secs(2)))
    }

    pub fn with_stores(stores: Stores) -> Self {
        let state = Arc::new(ApiState::new(stores));
        Self {
            router: router(Arc::clone(&state)),
            state,
        }
    }

    pub fn stores(&self) -> &Stores {
        &self.state.stores
    }

    /// Sends one request through the router and decodes the JSON body.
    /// Non-JSON bodies come back as `Value::Null`.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        (status, value)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, token, None).await
    }

    /// Registers and logs in a member, returning `(user_id, token)`.
    pub async fn member(&self, username: &str) -> (i64, String) {
        let (status, _) = self
            .post(
                "/register",
                None,
                json!({ "username": username, "password": "password1" }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = self
            .post(
                "/login",
                None,
                json!({ "username": username, "password": "password1" }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);

        (
            body["user_id"].as_i64().unwrap(),
            body["token"].as_str().unwrap().to_string(),
        )
    }

    /// A logged-in staff user, created directly in the directory.
    pub async fn staff(&self, username: &str) -> String {
        let user = self
            .stores()
            .users
            .register(NewUser::new(username, "password1"))
            .await
            .unwrap();
        self.stores().users.set_staff(user.id, true).await.unwrap();

        let (status, body) = self
            .post(
                "/login",
                None,
                json!({ "username": username, "password": "password1" }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        body["token"].as_str().unwrap().to_string()
    }

    pub async fn slot(&self, days_from_today: i64, start: u32, capacity: i32) -> i64 {
        self.stores()
            .slots
            .create_slot(NewSlot::new(
                date(days_from_today),
                hour(start),
                hour(start + 1),
                capacity,
            ))
            .await
            .unwrap()
            .id
    }
}

pub fn hour(h: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, 0, 0).unwrap()
}

pub fn date(days_from_today: i64) -> NaiveDate {
    Utc::now().date_naive() + ChronoDuration::days(days_from_today)
}
