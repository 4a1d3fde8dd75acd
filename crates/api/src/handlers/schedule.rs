use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use slotbook_core::{
    errors::ScheduleError,
    models::schedule::{
        DeleteScheduleResponse, DuplicateSlotRequest, SaveScheduleQuery, SaveScheduleResponse,
        Schedule, ScheduleSummary,
    },
    transfer,
};
use slotbook_store::WriteMode;

use crate::{middleware::error_handling::AppError, ApiState};

#[axum::debug_handler]
pub async fn list_schedules(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<ScheduleSummary>>, AppError> {
    let summaries = state.store.list().await?;
    Ok(Json(summaries))
}

#[axum::debug_handler]
pub async fn get_schedule(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> Result<Json<Schedule>, AppError> {
    let schedule = state.store.get(&id).await?;
    Ok(Json(schedule))
}

#[axum::debug_handler]
pub async fn save_schedule(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<SaveScheduleQuery>,
    payload: Result<Json<Schedule>, JsonRejection>,
) -> Result<Json<SaveScheduleResponse>, AppError> {
    let Json(schedule) = payload?;
    if schedule.schedule_name.trim().is_empty() {
        return Err(AppError(ScheduleError::Validation(
            "Invalid schedule data: scheduleName is required".to_string(),
        )));
    }

    let response = persist(&state, schedule, write_mode(&query)).await?;
    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn delete_schedule(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteScheduleResponse>, AppError> {
    state.store.delete(&id).await?;
    tracing::info!("Deleted schedule {}", id);

    Ok(Json(DeleteScheduleResponse {
        message: "Schedule deleted successfully".to_string(),
    }))
}

/// Accepts an exported document as-is and saves it like a regular save.
#[axum::debug_handler]
pub async fn import_schedule(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<SaveScheduleQuery>,
    body: String,
) -> Result<Json<SaveScheduleResponse>, AppError> {
    let schedule = transfer::import_schedule(&body)?;
    let response = persist(&state, schedule, write_mode(&query)).await?;
    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn export_schedule(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let schedule = state.store.get(&id).await?;
    let body = transfer::export_schedule(&schedule)?;
    let file_name = header_safe(&transfer::export_file_name(&schedule.schedule_name));

    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        body,
    )
        .into_response())
}

/// Copies one slot onto every requested date and stores the result.
#[axum::debug_handler]
pub async fn duplicate_slot(
    State(state): State<Arc<ApiState>>,
    Path((id, slot_id)): Path<(String, String)>,
    payload: Result<Json<DuplicateSlotRequest>, JsonRejection>,
) -> Result<Json<Schedule>, AppError> {
    let Json(request) = payload?;

    let mut schedule = state.store.get(&id).await?;
    let appended = schedule.duplicate_slot_across_dates(&slot_id, &request.dates)?;
    let schedule = state.store.replace(&id, schedule).await?;

    tracing::info!(
        "Slot {} of schedule {} now covers {} dates",
        slot_id,
        id,
        appended.len()
    );
    Ok(Json(schedule))
}

fn write_mode(query: &SaveScheduleQuery) -> WriteMode {
    if query.overwrite {
        WriteMode::Overwrite
    } else {
        WriteMode::CreateNew
    }
}

async fn persist(
    state: &ApiState,
    mut schedule: Schedule,
    mode: WriteMode,
) -> Result<SaveScheduleResponse, AppError> {
    if schedule.time_zone.as_deref().is_none_or(|tz| tz.trim().is_empty()) {
        schedule.time_zone = Some(state.default_time_zone.clone());
    }

    let saved = state.store.put(schedule, mode).await?;
    let id = saved.id.unwrap_or_default();
    tracing::info!("Saved schedule {} ({} slots)", id, saved.schedule_details.len());

    Ok(SaveScheduleResponse {
        id,
        message: "Schedule saved successfully".to_string(),
        name: saved.schedule_name,
    })
}

/// Header values must be visible ASCII; anything else becomes `_`.
fn header_safe(file_name: &str) -> String {
    file_name
        .chars()
        .map(|c| {
            if c.is_ascii_graphic() && c != '"' && c != '\\' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
