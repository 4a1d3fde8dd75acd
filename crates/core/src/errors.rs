use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    Storage(#[from] eyre::Report),
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
