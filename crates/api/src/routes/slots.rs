use axum::{
    Router,
    routing::{delete, get, post},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/slots", get(handlers::slots::list_slots))
        .route("/slots/:slot_id", delete(handlers::slots::delete_slot))
        .route("/book", post(handlers::bookings::book_slot))
        .route("/my_bookings", get(handlers::bookings::my_bookings))
        .route(
            "/bookings/:slot_id",
            delete(handlers::bookings::cancel_booking),
        )
}
