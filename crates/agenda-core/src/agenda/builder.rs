//! Builder for creating and configuring Agenda instances.

use std::path::{Path, PathBuf};

use jiff::tz::TimeZone;
use log::debug;

use super::Agenda;
use crate::{
    error::Result,
    store::{SqliteVisitStore, VisitStore},
};

/// Builder for creating and configuring [`Agenda`] instances.
#[derive(Default)]
pub struct AgendaBuilder {
    database_path: Option<PathBuf>,
    store: Option<Box<dyn VisitStore>>,
    time_zone: Option<TimeZone>,
}

impl AgendaBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom database file path.
    ///
    /// If not specified, uses XDG Base Directory specification:
    /// `$XDG_DATA_HOME/visit-agenda/agenda.db`
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Uses the given store instead of opening a database. Takes precedence
    /// over [`AgendaBuilder::with_database_path`].
    pub fn with_store(mut self, store: impl VisitStore + 'static) -> Self {
        self.store = Some(Box::new(store));
        self
    }

    /// Sets the time zone planned times are expressed in. Defaults to the
    /// system time zone.
    pub fn with_time_zone(mut self, time_zone: TimeZone) -> Self {
        self.time_zone = Some(time_zone);
        self
    }

    /// Builds the agenda and restores the last persisted plan.
    ///
    /// # Errors
    ///
    /// Returns `AgendaError::FileSystem` if the database directory cannot be
    /// created, `AgendaError::XdgDirectory` if no default path can be
    /// determined and `AgendaError::Database` if the database cannot be
    /// opened.
    pub fn build(self) -> Result<Agenda> {
        let store = match self.store {
            Some(store) => store,
            None => {
                let path = match self.database_path {
                    Some(path) => path,
                    None => SqliteVisitStore::default_path()?,
                };
                Box::new(SqliteVisitStore::open(path)?)
            }
        };
        let time_zone = self.time_zone.unwrap_or_else(TimeZone::system);
        let agenda = Agenda::restore(store, time_zone);
        debug!("Restored agenda with {} visits", agenda.len());
        Ok(agenda)
    }
}
