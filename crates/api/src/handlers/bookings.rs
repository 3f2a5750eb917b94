//! Booking handlers for general gym slots.
//!
//! All three require a logged-in caller. The capacity check, the duplicate
//! check and the ledger write all happen inside `SlotStore::book`; these
//! handlers only translate between JSON and the store.

use std::sync::Arc;

use axum::{Json, extract::State};
use gymbook_core::{
    errors::GymError,
    models::{
        booking::{BookingResponse, CancelBookingResponse, MyBookingsResponse},
        slot::{BookSlotRequest, BookSlotResponse},
    },
};

use crate::{
    ApiState,
    extract::{AppJson, AppPath},
    middleware::{auth::AuthUser, error_handling::AppError},
};

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn book_slot(
    State(state): State<Arc<ApiState>>,
    user: AuthUser,
    AppJson(payload): AppJson<BookSlotRequest>,
) -> Result<Json<BookSlotResponse>, AppError> {
    let slot_id = payload
        .slot_id
        .ok_or_else(|| GymError::Validation("Slot ID is required".to_string()))?;

    let receipt = state.stores.slots.book(user.user_id, slot_id).await?;

    Ok(Json(BookSlotResponse {
        success: true,
        booking_id: receipt.booking.id,
        slot_info: receipt.slot.label(),
        available: receipt.slot.available,
    }))
}

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn my_bookings(
    State(state): State<Arc<ApiState>>,
    user: AuthUser,
) -> Result<Json<MyBookingsResponse>, AppError> {
    let bookings = state.stores.slots.bookings_for_user(user.user_id).await?;

    Ok(Json(MyBookingsResponse {
        bookings: bookings.iter().map(BookingResponse::from).collect(),
    }))
}

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn cancel_booking(
    State(state): State<Arc<ApiState>>,
    user: AuthUser,
    AppPath(slot_id): AppPath<i64>,
) -> Result<Json<CancelBookingResponse>, AppError> {
    let slot = state
        .stores
        .slots
        .cancel_booking(user.user_id, slot_id)
        .await?;

    Ok(Json(CancelBookingResponse {
        success: true,
        available: slot.available,
    }))
}
