use axum::{
    Router,
    routing::{delete, get, post},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/classes", get(handlers::classes::list_classes))
        .route(
            "/classes/:class_slot_id",
            delete(handlers::classes::delete_class_slot),
        )
        .route("/classes/book", post(handlers::classes::book_class))
        .route("/my_classes", get(handlers::classes::my_classes))
        .route(
            "/classes/bookings/:class_slot_id",
            delete(handlers::classes::cancel_class_booking),
        )
}
