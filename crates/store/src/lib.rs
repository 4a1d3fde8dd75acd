//! # Slotbook Store
//!
//! Persistence for schedules. A store maps a schedule id to one complete
//! document; writes replace the whole document and there is no history.
//!
//! Two data sources implement [`ScheduleStore`]:
//!
//! - [`file::FileStore`]: one pretty-printed `<id>.json` file per schedule
//! - [`memory::MemoryStore`]: an in-process map, optionally seeded with demo data
//!
//! The data source is chosen once at startup through [`open_store`].

pub mod file;
pub mod memory;
pub mod mock;

use std::{fmt, path::Path, str::FromStr, sync::Arc};

use async_trait::async_trait;
use slotbook_core::{
    errors::{ScheduleError, ScheduleResult},
    models::schedule::{Schedule, ScheduleSummary},
};

/// What `put` does when the derived id is already taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Replace the stored document. Last writer wins.
    Overwrite,
    /// Fail with [`ScheduleError::Conflict`].
    CreateNew,
}

#[async_trait]
pub trait ScheduleStore: Send + Sync {
    /// Summaries of every stored schedule, ordered by id.
    async fn list(&self) -> ScheduleResult<Vec<ScheduleSummary>>;

    async fn get(&self, id: &str) -> ScheduleResult<Schedule>;

    /// Stores `schedule` under the id derived from its name.
    ///
    /// Slots without an id receive one before writing. The returned schedule
    /// is the stored document with `id` set to the derived id.
    async fn put(&self, schedule: Schedule, mode: WriteMode) -> ScheduleResult<Schedule>;

    /// Overwrites the document already stored under `id`, whatever its name.
    ///
    /// Fails with [`ScheduleError::NotFound`] when nothing is stored there.
    async fn replace(&self, id: &str, schedule: Schedule) -> ScheduleResult<Schedule>;

    async fn delete(&self, id: &str) -> ScheduleResult<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    #[default]
    File,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(Self::File),
            "memory" => Ok(Self::Memory),
            other => Err(ScheduleError::Validation(format!(
                "Unknown store backend {:?}, expected \"file\" or \"memory\"",
                other
            ))),
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => f.write_str("file"),
            Self::Memory => f.write_str("memory"),
        }
    }
}

/// Opens the configured data source.
///
/// The memory backend is seeded with the demo fixture and ignores `data_dir`.
pub async fn open_store(
    backend: StoreBackend,
    data_dir: impl AsRef<Path>,
) -> ScheduleResult<Arc<dyn ScheduleStore>> {
    let store: Arc<dyn ScheduleStore> = match backend {
        StoreBackend::File => Arc::new(file::FileStore::open(data_dir).await?),
        StoreBackend::Memory => Arc::new(memory::MemoryStore::with_fixture()),
    };
    tracing::info!("Opened {} schedule store", backend);
    Ok(store)
}

/// Derives the id for `schedule` and fills in missing slot ids.
pub(crate) fn prepare_for_write(schedule: &mut Schedule) -> ScheduleResult<String> {
    let id = schedule.derived_id()?;
    let assigned = schedule.ensure_slot_ids();
    if assigned > 0 {
        tracing::debug!("Assigned ids to {} slots of schedule {}", assigned, id);
    }
    Ok(id)
}

pub(crate) fn not_found(id: &str) -> ScheduleError {
    ScheduleError::NotFound(format!("Schedule with ID {} not found", id))
}

pub(crate) fn conflict(id: &str) -> ScheduleError {
    ScheduleError::Conflict(format!("Schedule with ID {} already exists", id))
}
