//! Persistence capabilities the engine is built on.
//!
//! The engine never reaches a database directly; it is handed something that
//! implements these traits. [`crate::db::Database`] is the SQLite-backed
//! implementation, tests plug in their own.

use crate::error::Result;
use crate::models::{HealthLogEntry, NewHealthLog, NewSymptom, Profile, Reminder, Symptom};

/// Append-only, newest-first log of health observations.
pub trait LogStore {
    /// Persist a new entry, assigning its id and (if absent) its timestamp.
    fn append_log(&self, entry: &NewHealthLog) -> Result<HealthLogEntry>;

    /// Entries ordered newest-first, optionally truncated to `limit`.
    fn list_logs(&self, limit: Option<usize>) -> Result<Vec<HealthLogEntry>>;
}

/// Toggleable scheduled reminders.
pub trait ReminderStore {
    /// All reminders in id order. An empty store is seeded with defaults first.
    fn list_reminders(&self) -> Result<Vec<Reminder>>;

    /// Fails with [`crate::Error::NotFound`] when `id` does not exist.
    fn set_reminder_active(&self, id: i64, active: bool) -> Result<()>;
}

pub trait ProfileStore {
    fn get_profile(&self) -> Result<Option<Profile>>;
    fn set_profile(&self, profile: &Profile) -> Result<()>;
}

pub trait SymptomStore {
    fn log_symptom(&self, symptom: &NewSymptom) -> Result<Symptom>;

    /// Symptoms ordered newest-first, optionally truncated to `limit`.
    fn list_symptoms(&self, limit: Option<usize>) -> Result<Vec<Symptom>>;
}

/// Everything [`crate::engine::HealthEngine`] needs from its backing store.
pub trait HealthStore: LogStore + ReminderStore + ProfileStore + SymptomStore {}

impl<T: LogStore + ReminderStore + ProfileStore + SymptomStore> HealthStore for T {}
