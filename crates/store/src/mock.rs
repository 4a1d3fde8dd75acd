use async_trait::async_trait;
use mockall::mock;
use slotbook_core::{
    errors::ScheduleResult,
    models::schedule::{Schedule, ScheduleSummary},
};

use crate::{ScheduleStore, WriteMode};

// Mock data source for handler tests
mock! {
    pub Store {}

    #[async_trait]
    impl ScheduleStore for Store {
        async fn list(&self) -> ScheduleResult<Vec<ScheduleSummary>>;
        async fn get(&self, id: &str) -> ScheduleResult<Schedule>;
        async fn put(&self, schedule: Schedule, mode: WriteMode) -> ScheduleResult<Schedule>;
        async fn replace(&self, id: &str, schedule: Schedule) -> ScheduleResult<Schedule>;
        async fn delete(&self, id: &str) -> ScheduleResult<()>;
    }
}
