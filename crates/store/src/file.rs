use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use eyre::{WrapErr, eyre};
use slotbook_core::{
    errors::ScheduleResult,
    models::schedule::{Schedule, ScheduleSummary, is_valid_schedule_id},
};
use tokio::fs;

use crate::{ScheduleStore, WriteMode, conflict, not_found, prepare_for_write};

const EXTENSION: &str = "json";

/// Stores each schedule as `<id>.json` inside one directory.
///
/// Every write replaces the whole file through a rename, so a concurrent
/// reader sees either the previous or the new document. Two writers of the
/// same id race and the last rename wins.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Opens the store, creating `dir` if it does not exist yet.
    pub async fn open(dir: impl AsRef<Path>) -> ScheduleResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)
            .await
            .wrap_err_with(|| format!("Failed to create data directory {}", dir.display()))?;
        tracing::debug!("Using schedule directory {}", dir.display());
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", id, EXTENSION))
    }

    fn temp_path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!(".{}.{}.tmp", id, EXTENSION))
    }

    async fn read_schedule(path: &Path) -> eyre::Result<Schedule> {
        let contents = fs::read_to_string(path)
            .await
            .wrap_err_with(|| format!("Failed to read {}", path.display()))?;
        let schedule = serde_json::from_str(&contents)
            .wrap_err_with(|| format!("Failed to parse {}", path.display()))?;
        Ok(schedule)
    }

    async fn write_document(&self, id: &str, schedule: &Schedule) -> eyre::Result<()> {
        let json = serde_json::to_string_pretty(schedule)
            .wrap_err_with(|| format!("Failed to serialize schedule {}", id))?;

        let path = self.path_for(id);
        let temp = self.temp_path_for(id);
        fs::write(&temp, json)
            .await
            .wrap_err_with(|| format!("Failed to write {}", temp.display()))?;
        fs::rename(&temp, &path)
            .await
            .wrap_err_with(|| format!("Failed to move {} into place", temp.display()))?;
        Ok(())
    }

    async fn exists(path: &Path) -> eyre::Result<bool> {
        fs::try_exists(path)
            .await
            .wrap_err_with(|| format!("Failed to stat {}", path.display()))
    }
}

#[async_trait]
impl ScheduleStore for FileStore {
    async fn list(&self) -> ScheduleResult<Vec<ScheduleSummary>> {
        let mut entries = fs::read_dir(&self.dir)
            .await
            .wrap_err_with(|| format!("Failed to read data directory {}", self.dir.display()))?;

        let mut summaries = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .wrap_err("Failed to read data directory entry")?
        {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(EXTENSION) {
                continue;
            }
            let Some(id) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            if !is_valid_schedule_id(id) {
                continue;
            }

            // One unreadable document must not hide the rest of the listing.
            match Self::read_schedule(&path).await {
                Ok(schedule) => summaries.push(schedule.summary(id)),
                Err(e) => tracing::warn!("Skipping schedule file {}: {:#}", path.display(), e),
            }
        }

        summaries.sort_by(|a, b| a.id.cmp(&b.id));
        tracing::debug!("Listed {} schedules", summaries.len());
        Ok(summaries)
    }

    async fn get(&self, id: &str) -> ScheduleResult<Schedule> {
        tracing::debug!("Getting schedule by id: {}", id);
        if !is_valid_schedule_id(id) {
            return Err(not_found(id));
        }

        let path = self.path_for(id);
        match fs::metadata(&path).await {
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("Schedule not found: id={}", id);
                return Err(not_found(id));
            }
            Err(e) => {
                return Err(eyre!(e)
                    .wrap_err(format!("Failed to stat {}", path.display()))
                    .into());
            }
        }

        Ok(Self::read_schedule(&path).await?)
    }

    async fn put(&self, mut schedule: Schedule, mode: WriteMode) -> ScheduleResult<Schedule> {
        let id = prepare_for_write(&mut schedule)?;
        let path = self.path_for(&id);

        if mode == WriteMode::CreateNew && Self::exists(&path).await? {
            return Err(conflict(&id));
        }

        self.write_document(&id, &schedule).await?;
        tracing::debug!(
            "Saved schedule: id={}, name={}, slots={}",
            id,
            schedule.schedule_name,
            schedule.schedule_details.len()
        );

        schedule.id = Some(id);
        Ok(schedule)
    }

    async fn replace(&self, id: &str, mut schedule: Schedule) -> ScheduleResult<Schedule> {
        if !is_valid_schedule_id(id) || !Self::exists(&self.path_for(id)).await? {
            return Err(not_found(id));
        }

        schedule.ensure_slot_ids();
        self.write_document(id, &schedule).await?;
        tracing::debug!("Replaced schedule: id={}", id);

        schedule.id = Some(id.to_string());
        Ok(schedule)
    }

    async fn delete(&self, id: &str) -> ScheduleResult<()> {
        tracing::debug!("Deleting schedule: id={}", id);
        if !is_valid_schedule_id(id) {
            return Err(not_found(id));
        }

        let path = self.path_for(id);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(not_found(id)),
            Err(e) => Err(eyre!(e)
                .wrap_err(format!("Failed to delete {}", path.display()))
                .into()),
        }
    }
}
