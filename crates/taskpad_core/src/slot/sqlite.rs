//! SQLite-backed persistence slot.
//!
//! # Invariants
//! - One row per key in `kv_slots`; saves upsert the row.
//! - The connection must come from `db::open_db*` so migrations are applied.

use super::{PersistenceSlot, SlotResult};
use log::{debug, error};
use rusqlite::{params, Connection, OptionalExtension};
use std::time::{SystemTime, UNIX_EPOCH};

/// Slot stored in the `kv_slots` table of a migrated SQLite database.
pub struct SqliteSlot {
    conn: Connection,
}

impl SqliteSlot {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Gives back the underlying connection.
    pub fn into_inner(self) -> Connection {
        self.conn
    }
}

impl PersistenceSlot for SqliteSlot {
    fn load(&self, key: &str) -> SlotResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_slots WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        debug!(
            "event=slot_load module=slot status=ok backend=sqlite present={}",
            value.is_some()
        );
        Ok(value)
    }

    fn save(&mut self, key: &str, value: &str) -> SlotResult<()> {
        let result = self.conn.execute(
            "INSERT INTO kv_slots (key, value, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value, now_epoch_ms()],
        );
        match result {
            Ok(_) => {
                debug!(
                    "event=slot_save module=slot status=ok backend=sqlite bytes={}",
                    value.len()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=slot_save module=slot status=error backend=sqlite error={}",
                    err
                );
                Err(err.into())
            }
        }
    }
}

fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX)
        })
}
