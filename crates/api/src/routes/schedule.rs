use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

/// Every path under `/api/schedules/` beyond the collection itself starts
/// with a schedule id, so no stored id can be shadowed by a fixed segment.
pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/import", post(handlers::schedule::import_schedule))
        .route(
            "/api/schedules",
            get(handlers::schedule::list_schedules).post(handlers::schedule::save_schedule),
        )
        .route(
            "/api/schedules/:id",
            get(handlers::schedule::get_schedule).delete(handlers::schedule::delete_schedule),
        )
        .route(
            "/api/schedules/:id/export",
            get(handlers::schedule::export_schedule),
        )
        .route(
            "/api/schedules/:id/slots/:slot_id/duplicate",
            post(handlers::schedule::duplicate_slot),
        )
}
