//! Import and export of schedule documents.
//!
//! The exchange format is the persisted document itself: the same camelCase
//! JSON a stored `<id>.json` file contains.

use chrono::{NaiveDate, Utc};
use eyre::WrapErr;
use serde_json::Value;

use crate::{
    errors::{ScheduleError, ScheduleResult},
    models::schedule::Schedule,
};

/// Parses an imported document.
///
/// `scheduleName` and `timeZone` must be present and non-empty. Slots
/// without an id receive one; a missing `scheduleDetails` array becomes empty.
/// Slots without dates are placed on today's date (UTC).
pub fn import_schedule(json: &str) -> ScheduleResult<Schedule> {
    import_schedule_on(json, Utc::now().date_naive())
}

/// [`import_schedule`] with `today` standing in for missing slot dates.
pub fn import_schedule_on(json: &str, today: NaiveDate) -> ScheduleResult<Schedule> {
    let mut document: Value = serde_json::from_str(json).map_err(invalid_json)?;
    fill_missing_dates(&mut document, today);
    let mut schedule: Schedule = serde_json::from_value(document).map_err(invalid_json)?;

    let has_time_zone = schedule
        .time_zone
        .as_deref()
        .is_some_and(|tz| !tz.trim().is_empty());
    if schedule.schedule_name.trim().is_empty() || !has_time_zone {
        return Err(ScheduleError::Validation(
            "Invalid schedule format: missing required fields".to_string(),
        ));
    }

    schedule.ensure_slot_ids();
    Ok(schedule)
}

fn invalid_json(e: serde_json::Error) -> ScheduleError {
    ScheduleError::Validation(format!("Invalid JSON format: {}", e))
}

fn fill_missing_dates(document: &mut Value, today: NaiveDate) {
    let Some(slots) = document
        .get_mut("scheduleDetails")
        .and_then(Value::as_array_mut)
    else {
        return;
    };

    let today = Value::String(today.format("%Y-%m-%d").to_string());
    for slot in slots.iter_mut().filter_map(Value::as_object_mut) {
        for field in ["startDate", "endDate"] {
            let missing = slot
                .get(field)
                .is_none_or(|v| v.is_null() || v.as_str() == Some(""));
            if missing {
                slot.insert(field.to_string(), today.clone());
            }
        }
    }
}

/// Renders a schedule as the pretty-printed document offered for download.
pub fn export_schedule(schedule: &Schedule) -> ScheduleResult<String> {
    let json = serde_json::to_string_pretty(schedule)
        .wrap_err_with(|| format!("Failed to serialize schedule {:?}", schedule.schedule_name))?;
    Ok(json)
}

/// Download file name for an exported schedule: whitespace runs become `_`.
pub fn export_file_name(schedule_name: &str) -> String {
    let mut stem = String::with_capacity(schedule_name.len());
    let mut in_whitespace = false;
    for c in schedule_name.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                stem.push('_');
            }
            in_whitespace = true;
        } else {
            stem.push(c);
            in_whitespace = false;
        }
    }
    format!("{}.json", stem)
}
