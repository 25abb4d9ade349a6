use std::path::PathBuf;

use agenda_core::{Agenda, AgendaBuilder};
use jiff::tz::TimeZone;
use tempfile::TempDir;

/// Helper function to create a temporary directory and database path
pub fn create_test_environment() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test_agenda.db");
    (temp_dir, db_path)
}

/// Opens an agenda backed by the SQLite file at `db_path`
pub fn open_agenda(db_path: &PathBuf) -> Agenda {
    AgendaBuilder::new()
        .with_database_path(Some(db_path))
        .with_time_zone(TimeZone::UTC)
        .build()
        .expect("Failed to create agenda")
}
