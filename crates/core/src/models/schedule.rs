use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::slot::{Slot, new_slot_id};
use crate::errors::{ScheduleError, ScheduleResult};

/// A named, time-zone scoped collection of slots, persisted as one JSON document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub schedule_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    #[serde(default)]
    pub schedule_details: Vec<Slot>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Schedule {
    pub fn new(name: impl Into<String>, time_zone: impl Into<String>) -> Self {
        Self {
            schedule_name: name.into(),
            time_zone: Some(time_zone.into()),
            ..Self::default()
        }
    }

    /// Identifier this schedule is stored under.
    pub fn derived_id(&self) -> ScheduleResult<String> {
        derive_schedule_id(&self.schedule_name)
    }

    /// Assigns an id to every slot that lacks one and returns how many were assigned.
    pub fn ensure_slot_ids(&mut self) -> usize {
        self.schedule_details
            .iter_mut()
            .map(Slot::ensure_id)
            .filter(|assigned| *assigned)
            .count()
    }

    pub fn summary(&self, id: impl Into<String>) -> ScheduleSummary {
        ScheduleSummary {
            id: id.into(),
            name: self.schedule_name.clone(),
            time_zone: self.time_zone.clone(),
            event_count: self.schedule_details.len(),
        }
    }

    /// Copies one slot onto several dates.
    ///
    /// The slot is taken out of its current position and re-appended once per
    /// distinct date, in the order given. The date matching the slot's own
    /// `start_date` keeps the original slot; every other date receives a copy
    /// with a fresh id whose start and end dates are both set to that date.
    /// Returns the ids of the appended slots.
    pub fn duplicate_slot_across_dates(
        &mut self,
        slot_id: &str,
        dates: &[NaiveDate],
    ) -> ScheduleResult<Vec<String>> {
        if dates.is_empty() {
            return Err(ScheduleError::Validation(
                "At least one date is required".to_string(),
            ));
        }

        let position = self
            .schedule_details
            .iter()
            .position(|slot| slot.id == slot_id)
            .ok_or_else(|| ScheduleError::NotFound(format!("Slot with ID {} not found", slot_id)))?;
        let original = self.schedule_details.remove(position);

        let mut seen = Vec::with_capacity(dates.len());
        let mut appended = Vec::with_capacity(dates.len());
        for date in dates {
            if seen.contains(date) {
                continue;
            }
            seen.push(*date);

            let slot = if *date == original.start_date {
                original.clone()
            } else {
                Slot {
                    id: new_slot_id(),
                    start_date: *date,
                    end_date: *date,
                    ..original.clone()
                }
            };
            appended.push(slot.id.clone());
            self.schedule_details.push(slot);
        }

        Ok(appended)
    }
}

/// Listing projection of a stored schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSummary {
    pub id: String,
    pub name: String,
    pub time_zone: Option<String>,
    pub event_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveScheduleResponse {
    pub id: String,
    pub message: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteScheduleResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveScheduleQuery {
    /// When false, saving over an existing schedule is rejected.
    #[serde(default = "default_overwrite")]
    pub overwrite: bool,
}

impl Default for SaveScheduleQuery {
    fn default() -> Self {
        Self { overwrite: true }
    }
}

fn default_overwrite() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateSlotRequest {
    pub dates: Vec<NaiveDate>,
}

/// Derives the storage identifier from a schedule name.
///
/// Lower-cases the name, replaces every character outside `[a-z0-9]` with an
/// underscore, collapses underscore runs and strips leading and trailing
/// underscores. `"Team Sync!! 2024"` becomes `"team_sync_2024"`.
pub fn derive_schedule_id(name: &str) -> ScheduleResult<String> {
    let mut id = String::with_capacity(name.len());
    for c in name.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            id.push(c);
        } else if !id.ends_with('_') {
            id.push('_');
        }
    }

    let id = id.trim_matches('_');
    if id.is_empty() {
        return Err(ScheduleError::Validation(format!(
            "Schedule name {:?} does not contain any letters or digits",
            name
        )));
    }

    Ok(id.to_string())
}

/// Whether `id` can name a stored schedule.
pub fn is_valid_schedule_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
