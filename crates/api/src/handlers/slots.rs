use std::sync::Arc;

use axum::{Json, extract::State};
use chrono::Utc;
use gymbook_core::models::slot::{DeleteSlotResponse, ListSlotsResponse, SlotResponse};
use tracing::info;

use crate::{
    ApiState,
    extract::AppPath,
    middleware::{auth::StaffUser, error_handling::AppError},
};

/// Lists every slot from today onwards.
#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn list_slots(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<ListSlotsResponse>, AppError> {
    let today = Utc::now().date_naive();
    let slots = state.stores.slots.list_upcoming(today).await?;

    Ok(Json(ListSlotsResponse {
        slots: slots.iter().map(SlotResponse::from).collect(),
    }))
}

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn delete_slot(
    State(state): State<Arc<ApiState>>,
    StaffUser(staff): StaffUser,
    AppPath(slot_id): AppPath<i64>,
) -> Result<Json<DeleteSlotResponse>, AppError> {
    let removed_bookings = state.stores.slots.delete_slot(slot_id).await?;

    info!(
        "Staff user {} deleted slot {} ({} bookings removed)",
        staff.username, slot_id, removed_bookings
    );
    Ok(Json(DeleteSlotResponse {
        success: true,
        removed_bookings,
    }))
}
