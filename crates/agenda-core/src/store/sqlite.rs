//! SQLite-backed plan storage.

use std::path::{Path, PathBuf};

use jiff::Timestamp;
use log::{debug, warn};
use rusqlite::{params, Connection, OptionalExtension};

use super::{decode_plan, encode_plan, VisitStore, PLANNED_VISITS_KEY};
use crate::{
    error::{AgendaError, DatabaseResultExt, Result},
    models::Visit,
};

const SELECT_VALUE_SQL: &str = "SELECT value FROM kv WHERE key = ?1";
const UPSERT_VALUE_SQL: &str = "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3) \
     ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at";

/// Persists the plan as a single row of a key-value table.
pub struct SqliteVisitStore {
    connection: Connection,
}

impl SqliteVisitStore {
    /// Opens (creating if needed) the database at `path` and initializes the
    /// schema.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| AgendaError::FileSystem {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let connection = Connection::open(path).db_context("Failed to open database connection")?;
        let store = Self { connection };
        store.initialize_schema()?;
        debug!("Opened visit store at {}", path.display());
        Ok(store)
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let connection =
            Connection::open_in_memory().db_context("Failed to open in-memory database")?;
        let store = Self { connection };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Returns the default database path following the XDG Base Directory
    /// specification: `$XDG_DATA_HOME/visit-agenda/agenda.db`.
    pub fn default_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("visit-agenda")
            .place_data_file("agenda.db")
            .map_err(|e| AgendaError::XdgDirectory(e.to_string()))
    }

    fn initialize_schema(&self) -> Result<()> {
        let schema_sql = include_str!("../../assets/schema.sql");
        self.connection
            .execute_batch(schema_sql)
            .db_context("Failed to initialize database schema")
    }

    /// Reads the raw persisted blob.
    fn read_blob(&self) -> Result<Option<String>> {
        self.connection
            .query_row(SELECT_VALUE_SQL, params![PLANNED_VISITS_KEY], |row| {
                row.get::<_, String>(0)
            })
            .optional()
            .db_context("Failed to read persisted plan")
    }

    /// Overwrites the raw persisted blob.
    pub(crate) fn write_blob(&self, blob: &str) -> Result<()> {
        self.connection
            .execute(
                UPSERT_VALUE_SQL,
                params![PLANNED_VISITS_KEY, blob, Timestamp::now().to_string()],
            )
            .db_context("Failed to persist plan")?;
        Ok(())
    }
}

impl VisitStore for SqliteVisitStore {
    fn load(&self) -> Vec<Visit> {
        match self.read_blob() {
            Ok(Some(blob)) => decode_plan(&blob),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Could not read persisted plan, starting empty: {e}");
                Vec::new()
            }
        }
    }

    fn save(&self, visits: &[Visit]) -> Result<()> {
        let blob = encode_plan(visits)?;
        self.write_blob(&blob)?;
        debug!("Persisted {} visits", visits.len());
        Ok(())
    }
}
