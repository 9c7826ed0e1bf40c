use std::path::Path;
use std::str::FromStr;

use anyhow::Context;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, params};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{
    HealthLogEntry, NewHealthLog, NewSymptom, Profile, Reminder, Symptom, default_reminders,
};
use crate::store::{LogStore, ProfileStore, ReminderStore, SymptomStore};

const SETTING_HEIGHT: &str = "height_m";
const SETTING_ACTIVITY: &str = "activity_level";

pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        let db = Database { conn };
        db.migrate()?;
        Ok(db)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Database { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<()> {
        let version: i64 = self
            .conn
            .pragma_query_value(None, "user_version", |row| row.get(0))?;

        if version < 1 {
            self.conn.execute_batch(
                "CREATE TABLE IF NOT EXISTS health_logs (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    uuid TEXT NOT NULL UNIQUE,
                    recorded_at TEXT NOT NULL,
                    weight_kg REAL NOT NULL CHECK (weight_kg > 0),
                    emotional_state TEXT NOT NULL
                );

                CREATE INDEX IF NOT EXISTS idx_health_logs_recorded_at ON health_logs(recorded_at);

                CREATE TABLE IF NOT EXISTS reminders (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    reminder_type TEXT NOT NULL,
                    label TEXT NOT NULL,
                    scheduled_time TEXT NOT NULL,
                    is_active INTEGER NOT NULL DEFAULT 1,
                    updated_at TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS user_settings (
                    key TEXT PRIMARY KEY NOT NULL,
                    value TEXT NOT NULL,
                    updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
                );

                PRAGMA user_version = 1;",
            )?;
        }

        if version < 2 {
            self.conn.execute_batch(
                "CREATE TABLE IF NOT EXISTS symptoms (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    name TEXT NOT NULL,
                    kind TEXT NOT NULL,
                    logged_at TEXT NOT NULL
                );

                CREATE INDEX IF NOT EXISTS idx_symptoms_logged_at ON symptoms(logged_at);

                PRAGMA user_version = 2;",
            )?;
        }

        Ok(())
    }

    // --- Row mapping helpers ---

    fn health_log_from_row(row: &rusqlite::Row) -> rusqlite::Result<HealthLogEntry> {
        Ok(HealthLogEntry {
            id: row.get(0)?,
            uuid: row.get(1)?,
            recorded_at: timestamp_column(row, 2)?,
            weight_kg: row.get(3)?,
            emotional_state: parsed_column(row, 4)?,
        })
    }

    fn reminder_from_row(row: &rusqlite::Row) -> rusqlite::Result<Reminder> {
        Ok(Reminder {
            id: row.get(0)?,
            reminder_type: parsed_column(row, 1)?,
            label: row.get(2)?,
            scheduled_time: row.get(3)?,
            is_active: row.get(4)?,
        })
    }

    fn symptom_from_row(row: &rusqlite::Row) -> rusqlite::Result<Symptom> {
        Ok(Symptom {
            id: row.get(0)?,
            name: row.get(1)?,
            kind: parsed_column(row, 2)?,
            logged_at: timestamp_column(row, 3)?,
        })
    }

    // --- Health logs ---

    fn get_log(&self, id: i64) -> Result<HealthLogEntry> {
        let entry = self.conn.query_row(
            "SELECT id, uuid, recorded_at, weight_kg, emotional_state
             FROM health_logs WHERE id = ?1",
            params![id],
            Self::health_log_from_row,
        )?;
        Ok(entry)
    }

    // --- Reminders ---

    fn seed_default_reminders(&self) -> Result<()> {
        let now = format_timestamp(Utc::now());
        let tx = self.conn.unchecked_transaction()?;
        let seeds = default_reminders();
        for reminder in &seeds {
            tx.execute(
                "INSERT INTO reminders (reminder_type, label, scheduled_time, is_active, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    reminder.reminder_type.as_str(),
                    reminder.label,
                    reminder.scheduled_time,
                    reminder.is_active,
                    now
                ],
            )?;
        }
        tx.commit()?;
        tracing::info!(count = seeds.len(), "seeded default reminders");
        Ok(())
    }

    // --- User Settings ---

    pub fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        let now = format_timestamp(Utc::now());
        self.conn.execute(
            "INSERT INTO user_settings (key, value, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, now],
        )?;
        Ok(())
    }

    pub fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT value FROM user_settings WHERE key = ?1")?;
        let mut rows = stmt.query(params![key])?;
        if let Some(row) = rows.next()? {
            Ok(Some(row.get(0)?))
        } else {
            Ok(None)
        }
    }

    pub fn delete_setting(&self, key: &str) -> Result<bool> {
        let rows = self
            .conn
            .execute("DELETE FROM user_settings WHERE key = ?1", params![key])?;
        Ok(rows > 0)
    }
}

impl LogStore for Database {
    fn append_log(&self, entry: &NewHealthLog) -> Result<HealthLogEntry> {
        let uuid = Uuid::new_v4().to_string();
        let recorded_at = format_timestamp(entry.recorded_at.unwrap_or_else(Utc::now));
        self.conn.execute(
            "INSERT INTO health_logs (uuid, recorded_at, weight_kg, emotional_state)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                uuid,
                recorded_at,
                entry.weight_kg,
                entry.emotional_state.as_str()
            ],
        )?;
        self.get_log(self.conn.last_insert_rowid())
    }

    fn list_logs(&self, limit: Option<usize>) -> Result<Vec<HealthLogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, uuid, recorded_at, weight_kg, emotional_state
             FROM health_logs
             ORDER BY recorded_at DESC, id DESC
             LIMIT ?1",
        )?;
        let entries = stmt
            .query_map(params![sql_limit(limit)], Self::health_log_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(entries)
    }
}

impl ReminderStore for Database {
    fn list_reminders(&self) -> Result<Vec<Reminder>> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM reminders", [], |row| row.get(0))?;
        if count == 0 {
            self.seed_default_reminders()?;
        }

        let mut stmt = self.conn.prepare(
            "SELECT id, reminder_type, label, scheduled_time, is_active
             FROM reminders ORDER BY id",
        )?;
        let reminders = stmt
            .query_map([], Self::reminder_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(reminders)
    }

    fn set_reminder_active(&self, id: i64, active: bool) -> Result<()> {
        let now = format_timestamp(Utc::now());
        let rows = self.conn.execute(
            "UPDATE reminders SET is_active = ?1, updated_at = ?2 WHERE id = ?3",
            params![active, now, id],
        )?;
        if rows == 0 {
            return Err(Error::NotFound(format!("Reminder {id}")));
        }
        Ok(())
    }
}

impl ProfileStore for Database {
    fn get_profile(&self) -> Result<Option<Profile>> {
        let Some(height) = self.get_setting(SETTING_HEIGHT)? else {
            return Ok(None);
        };
        let height_m = height
            .parse::<f64>()
            .with_context(|| format!("Corrupt {SETTING_HEIGHT} setting '{height}'"))?;
        let activity_level = self
            .get_setting(SETTING_ACTIVITY)?
            .map(|v| v.parse())
            .transpose()?;
        Ok(Some(Profile {
            height_m,
            activity_level,
        }))
    }

    fn set_profile(&self, profile: &Profile) -> Result<()> {
        self.set_setting(SETTING_HEIGHT, &profile.height_m.to_string())?;
        match profile.activity_level {
            Some(level) => self.set_setting(SETTING_ACTIVITY, level.as_str())?,
            None => {
                self.delete_setting(SETTING_ACTIVITY)?;
            }
        }
        Ok(())
    }
}

impl SymptomStore for Database {
    fn log_symptom(&self, symptom: &NewSymptom) -> Result<Symptom> {
        let logged_at = format_timestamp(symptom.logged_at.unwrap_or_else(Utc::now));
        self.conn.execute(
            "INSERT INTO symptoms (name, kind, logged_at) VALUES (?1, ?2, ?3)",
            params![symptom.name, symptom.kind.as_str(), logged_at],
        )?;
        let id = self.conn.last_insert_rowid();
        let stored = self.conn.query_row(
            "SELECT id, name, kind, logged_at FROM symptoms WHERE id = ?1",
            params![id],
            Self::symptom_from_row,
        )?;
        Ok(stored)
    }

    fn list_symptoms(&self, limit: Option<usize>) -> Result<Vec<Symptom>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, kind, logged_at
             FROM symptoms
             ORDER BY logged_at DESC, id DESC
             LIMIT ?1",
        )?;
        let symptoms = stmt
            .query_map(params![sql_limit(limit)], Self::symptom_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(symptoms)
    }
}

/// Fixed-width UTC timestamps so lexical `ORDER BY` matches chronological order.
fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// SQLite treats a negative `LIMIT` as unbounded.
fn sql_limit(limit: Option<usize>) -> i64 {
    limit.map_or(-1, |n| i64::try_from(n).unwrap_or(i64::MAX))
}

fn timestamp_column(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn parsed_column<T>(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr<Err = Error>,
{
    let raw: String = row.get(idx)?;
    raw.parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
