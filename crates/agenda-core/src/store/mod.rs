//! Local persistence of the current visit plan.
//!
//! The whole plan is stored as one JSON-encoded array of [`Visit`] records
//! under the fixed key [`PLANNED_VISITS_KEY`]. There is no schema version:
//! missing or unreadable data is treated as an empty plan.
//!
//! Writes are synchronous and happen inline after every structural mutation.
//! Nothing is journaled, so a crash between a mutation and its save loses
//! that last change.

use log::warn;

use crate::{error::Result, models::Visit};

pub mod memory;
pub mod sqlite;

pub use memory::MemoryVisitStore;
pub use sqlite::SqliteVisitStore;

/// Key under which the plan is persisted.
pub const PLANNED_VISITS_KEY: &str = "visit_agenda.planned_visits";

/// Storage backend for the visit plan.
pub trait VisitStore: Send {
    /// Returns the last persisted plan, or an empty plan when nothing usable
    /// is stored.
    fn load(&self) -> Vec<Visit>;

    /// Replaces the persisted plan.
    fn save(&self, visits: &[Visit]) -> Result<()>;
}

impl<S: VisitStore + Sync + ?Sized> VisitStore for std::sync::Arc<S> {
    fn load(&self) -> Vec<Visit> {
        (**self).load()
    }

    fn save(&self, visits: &[Visit]) -> Result<()> {
        (**self).save(visits)
    }
}

/// Encodes a plan into its persisted representation.
pub(crate) fn encode_plan(visits: &[Visit]) -> Result<String> {
    Ok(serde_json::to_string(visits)?)
}

/// Decodes a persisted plan, falling back to an empty plan on corrupt data.
pub(crate) fn decode_plan(blob: &str) -> Vec<Visit> {
    match serde_json::from_str(blob) {
        Ok(visits) => visits,
        Err(e) => {
            warn!("Discarding unreadable persisted plan: {e}");
            Vec::new()
        }
    }
}
