use std::{collections::BTreeMap, sync::RwLock};

use async_trait::async_trait;
use eyre::eyre;
use slotbook_core::{
    errors::ScheduleResult,
    models::schedule::{Schedule, ScheduleSummary},
};

use crate::{ScheduleStore, WriteMode, conflict, not_found, prepare_for_write};

/// In-process data source with the same contract as the file store.
///
/// Intended for demos and tests: nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    schedules: RwLock<BTreeMap<String, Schedule>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding the three demo schedules.
    pub fn with_fixture() -> Self {
        let fixture = [
            ("schedule-1", "Weekly Team Meeting", "America/New_York"),
            ("schedule-2", "Client Consultations", "America/Chicago"),
            ("schedule-3", "Product Demo", "America/Los_Angeles"),
        ];

        let schedules = fixture
            .into_iter()
            .map(|(id, name, tz)| {
                let mut schedule = Schedule::new(name, tz);
                schedule.id = Some(id.to_string());
                (id.to_string(), schedule)
            })
            .collect();

        Self {
            schedules: RwLock::new(schedules),
        }
    }

    fn read(&self) -> eyre::Result<std::sync::RwLockReadGuard<'_, BTreeMap<String, Schedule>>> {
        self.schedules
            .read()
            .map_err(|_| eyre!("Schedule map lock poisoned"))
    }

    fn write(&self) -> eyre::Result<std::sync::RwLockWriteGuard<'_, BTreeMap<String, Schedule>>> {
        self.schedules
            .write()
            .map_err(|_| eyre!("Schedule map lock poisoned"))
    }
}

#[async_trait]
impl ScheduleStore for MemoryStore {
    async fn list(&self) -> ScheduleResult<Vec<ScheduleSummary>> {
        let schedules = self.read()?;
        Ok(schedules
            .iter()
            .map(|(id, schedule)| schedule.summary(id.as_str()))
            .collect())
    }

    async fn get(&self, id: &str) -> ScheduleResult<Schedule> {
        tracing::debug!("Getting schedule by id: {}", id);
        self.read()?.get(id).cloned().ok_or_else(|| not_found(id))
    }

    async fn put(&self, mut schedule: Schedule, mode: WriteMode) -> ScheduleResult<Schedule> {
        let id = prepare_for_write(&mut schedule)?;

        let mut schedules = self.write()?;
        if mode == WriteMode::CreateNew && schedules.contains_key(&id) {
            return Err(conflict(&id));
        }
        schedules.insert(id.clone(), schedule.clone());
        tracing::debug!("Saved schedule: id={}, name={}", id, schedule.schedule_name);

        schedule.id = Some(id);
        Ok(schedule)
    }

    async fn replace(&self, id: &str, mut schedule: Schedule) -> ScheduleResult<Schedule> {
        schedule.ensure_slot_ids();

        let mut schedules = self.write()?;
        let stored = schedules.get_mut(id).ok_or_else(|| not_found(id))?;
        *stored = schedule.clone();
        tracing::debug!("Replaced schedule: id={}", id);

        schedule.id = Some(id.to_string());
        Ok(schedule)
    }

    async fn delete(&self, id: &str) -> ScheduleResult<()> {
        tracing::debug!("Deleting schedule: id={}", id);
        self.write()?
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| not_found(id))
    }
}
