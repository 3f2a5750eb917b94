use std::sync::Arc;

use axum::{Json, extract::State};
use chrono::Utc;
use gymbook_core::{
    errors::GymError,
    models::{
        booking::CancelBookingResponse,
        class::{
            BookClassRequest, ClassBookingResponse, ClassSlotResponse, ListClassesResponse,
            MyClassBookingsResponse,
        },
        slot::{BookSlotResponse, DeleteSlotResponse},
    },
};
use tracing::info;

use crate::{
    ApiState,
    extract::{AppJson, AppPath},
    middleware::{
        auth::{AuthUser, StaffUser},
        error_handling::AppError,
    },
};

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn list_classes(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<ListClassesResponse>, AppError> {
    let today = Utc::now().date_naive();
    let classes = state.stores.classes.list_upcoming_classes(today).await?;

    Ok(Json(ListClassesResponse {
        classes: classes.iter().map(ClassSlotResponse::from).collect(),
    }))
}

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn book_class(
    State(state): State<Arc<ApiState>>,
    user: AuthUser,
    AppJson(payload): AppJson<BookClassRequest>,
) -> Result<Json<BookSlotResponse>, AppError> {
    let class_slot_id = payload
        .class_slot_id
        .ok_or_else(|| GymError::Validation("Class slot ID is required".to_string()))?;

    let receipt = state
        .stores
        .classes
        .book_class(user.user_id, class_slot_id)
        .await?;

    Ok(Json(BookSlotResponse {
        success: true,
        booking_id: receipt.booking.id,
        slot_info: receipt.slot.label(),
        available: receipt.slot.available,
    }))
}

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn my_classes(
    State(state): State<Arc<ApiState>>,
    user: AuthUser,
) -> Result<Json<MyClassBookingsResponse>, AppError> {
    let bookings = state
        .stores
        .classes
        .class_bookings_for_user(user.user_id)
        .await?;

    Ok(Json(MyClassBookingsResponse {
        bookings: bookings.iter().map(ClassBookingResponse::from).collect(),
    }))
}

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn cancel_class_booking(
    State(state): State<Arc<ApiState>>,
    user: AuthUser,
    AppPath(class_slot_id): AppPath<i64>,
) -> Result<Json<CancelBookingResponse>, AppError> {
    let slot = state
        .stores
        .classes
        .cancel_class_booking(user.user_id, class_slot_id)
        .await?;

    Ok(Json(CancelBookingResponse {
        success: true,
        available: slot.available,
    }))
}

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn delete_class_slot(
    State(state): State<Arc<ApiState>>,
    StaffUser(staff): StaffUser,
    AppPath(class_slot_id): AppPath<i64>,
) -> Result<Json<DeleteSlotResponse>, AppError> {
    let removed_bookings = state
        .stores
        .classes
        .delete_class_slot(class_slot_id)
        .await?;

    info!(
        "Staff user {} deleted class slot {} ({} bookings removed)",
        staff.username, class_slot_id, removed_bookings
    );
    Ok(Json(DeleteSlotResponse {
        success: true,
        removed_bookings,
    }))
}
