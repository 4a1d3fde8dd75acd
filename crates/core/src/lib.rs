//! # Slotbook Core
//!
//! Shared data model for slotbook: schedules, their time slots, identifier
//! derivation, the import/export document format and the error taxonomy
//! used by the store and the HTTP layer.

pub mod errors;
pub mod models;
pub mod transfer;
