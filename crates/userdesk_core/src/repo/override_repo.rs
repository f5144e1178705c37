//! Override set repository contract and SQLite slot implementation.
//!
//! # Responsibility
//! - Provide the injected persistence port for the override set.
//! - Keep slot/SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - A missing slot reads as the empty override set.
//! - Tombstoned entries persist exactly like live ones.
//! - Corrupt slot payloads surface as `RepoError::Corrupt`.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::user::OverrideEntry;
use log::info;
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

const OVERRIDES_SLOT: &str = "overrides";

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for override persistence operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    Corrupt(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Corrupt(message) => write!(f, "corrupt persisted override set: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; run migrations first"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table is missing: {table}")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Injected persistence port for the override set.
///
/// The collection is always exchanged as a whole: the single-threaded
/// service reads, modifies and rewrites it on every mutation.
pub trait OverrideRepository {
    /// Reads the full persisted override set, tombstones included.
    fn load_overrides(&self) -> RepoResult<Vec<OverrideEntry>>;

    /// Replaces the full persisted override set.
    fn save_overrides(&self, entries: &[OverrideEntry]) -> RepoResult<()>;
}

/// SQLite-backed override repository using one named `app_state` slot.
pub struct SqliteOverrideRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteOverrideRepository<'conn> {
    /// Wraps a migrated connection after verifying it is usable.
    ///
    /// # Errors
    /// - `UninitializedConnection` when `PRAGMA user_version` does not match
    ///   the latest migration known to this binary.
    /// - `MissingRequiredTable` when `app_state` is absent.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let expected_version = latest_version();
        let actual_version: u32 =
            conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
        if actual_version != expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        let has_table: bool = conn.query_row(
            "SELECT EXISTS (
                SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'app_state'
            );",
            [],
            |row| row.get(0),
        )?;
        if !has_table {
            return Err(RepoError::MissingRequiredTable("app_state"));
        }

        Ok(Self { conn })
    }
}

impl OverrideRepository for SqliteOverrideRepository<'_> {
    fn load_overrides(&self) -> RepoResult<Vec<OverrideEntry>> {
        let payload: Option<String> = self
            .conn
            .query_row(
                "SELECT payload FROM app_state WHERE slot = ?1;",
                [OVERRIDES_SLOT],
                |row| row.get(0),
            )
            .optional()?;

        let Some(payload) = payload else {
            return Ok(Vec::new());
        };

        serde_json::from_str(&payload).map_err(|err| {
            RepoError::Corrupt(format!("slot `{OVERRIDES_SLOT}` is not a valid entry array: {err}"))
        })
    }

    fn save_overrides(&self, entries: &[OverrideEntry]) -> RepoResult<()> {
        let payload = serde_json::to_string(entries)
            .map_err(|err| RepoError::Corrupt(format!("failed to serialize entries: {err}")))?;

        self.conn.execute(
            "INSERT INTO app_state (slot, payload, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now') * 1000)
             ON CONFLICT (slot) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at;",
            params![OVERRIDES_SLOT, payload],
        )?;

        info!(
            "event=override_save module=repo status=ok entries={}",
            entries.len()
        );
        Ok(())
    }
}
