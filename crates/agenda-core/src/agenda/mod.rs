//! Agenda planning: building, reordering and trimming the day's visits.
//!
//! The [`Agenda`] owns the ordered list of [`Visit`]s for one day. It is the
//! single writer of that list: every mutation goes through `&mut self`, keeps
//! the `sequence` numbers equal to `1..=N` in visible order and persists the
//! whole plan through the injected [`VisitStore`] before returning.
//!
//! ```text
//! replace_plan ──▶ move_visits / delete_visits / update_visit ──▶ submit
//!      │                         │
//!      └──────── save ◀──────────┘   (after every mutation)
//! ```
//!
//! # Destructive regeneration
//!
//! [`Agenda::replace_plan`] discards the current plan entirely, including any
//! completion, notes or attachments already recorded on it. There is no
//! incremental "add one visit".
//!
//! # Example
//!
//! ```rust
//! use agenda_core::{models::Client, store::MemoryVisitStore, AgendaBuilder};
//! use jiff::{civil::date, tz::TimeZone};
//!
//! # fn main() -> agenda_core::Result<()> {
//! let mut agenda = AgendaBuilder::new()
//!     .with_store(MemoryVisitStore::new())
//!     .with_time_zone(TimeZone::UTC)
//!     .build()?;
//!
//! let clients: Vec<Client> = (1..=3)
//!     .map(|id| Client {
//!         id,
//!         name: format!("Client {id}"),
//!         address: String::new(),
//!         latitude: 0.0,
//!         longitude: 0.0,
//!     })
//!     .collect();
//!
//! agenda.replace_plan(&clients, date(2025, 1, 2))?;
//! agenda.delete_visits(&[1])?;
//!
//! let ids: Vec<i64> = agenda.visits().iter().map(|v| v.client.id).collect();
//! assert_eq!(ids, vec![1, 3]);
//! assert_eq!(agenda.visits()[1].sequence, 2);
//! # Ok(())
//! # }
//! ```

use std::collections::{BTreeSet, HashSet};

use jiff::{
    civil::{Date, Time},
    tz::TimeZone,
    Zoned,
};
use log::{debug, error, warn};
use uuid::Uuid;

use crate::{
    error::{AgendaError, Result},
    lifecycle::VisitSession,
    models::{Client, Visit},
    store::VisitStore,
};

pub mod builder;


pub use builder::AgendaBuilder;

/// Hour of the first visit of a generated agenda.
pub const FIRST_VISIT_HOUR: usize = 9;

/// The ordered set of visits planned for one day.
pub struct Agenda {
    visits: Vec<Visit>,
    store: Box<dyn VisitStore>,
    time_zone: TimeZone,
}

impl Agenda {
    /// Creates an agenda from whatever the store currently holds.
    pub(crate) fn restore(store: Box<dyn VisitStore>, time_zone: TimeZone) -> Self {
        let mut visits = store.load();
        renumber(&mut visits);
        Self {
            visits,
            store,
            time_zone,
        }
    }

    /// Visits in agenda order.
    pub fn visits(&self) -> &[Visit] {
        &self.visits
    }

    pub fn len(&self) -> usize {
        self.visits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visits.is_empty()
    }

    /// Time zone planned times are generated in.
    /// Looks up a visit by id.
    pub fn get(&self, id: Uuid) -> Option<&Visit> {
        self.visits.iter().find(|v| v.id == id)
    }

    /// Looks up a visit by its 1-based sequence number.
    pub fn get_by_sequence(&self, sequence: u32) -> Option<&Visit> {
        self.visits.iter().find(|v| v.sequence == sequence)
    }

    /// Unique clients of the current plan, in plan order.
    pub fn selected_clients(&self) -> Vec<Client> {
        let mut seen = HashSet::new();
        self.visits
            .iter()
            .filter(|v| seen.insert(v.client.id))
            .map(|v| v.client.clone())
            .collect()
    }

    /// Replaces the whole plan with one visit per selected client.
    ///
    /// Client `i` (0-based, selection order) gets `sequence = i + 1` and a
    /// planned time of `(9 + i):00:00` on `date` in the agenda's time zone.
    /// Hours past 23 cannot be represented; those visits are planned at the
    /// start of the day instead.
    ///
    /// Everything recorded on the previous plan is discarded.
    ///
    /// # Errors
    ///
    /// `AgendaError::NoClientsSelected` for an empty selection and
    /// `AgendaError::InvalidInput` when a client appears twice. The current
    /// plan is left unchanged in both cases.
    pub fn replace_plan(&mut self, selected_clients: &[Client], date: Date) -> Result<&[Visit]> {
        if selected_clients.is_empty() {
            return Err(AgendaError::NoClientsSelected);
        }

        let mut seen = HashSet::new();
        if let Some(dup) = selected_clients.iter().find(|c| !seen.insert(c.id)) {
            return Err(AgendaError::invalid_input("selected_clients")
                .with_reason(format!("client {} is selected more than once", dup.id)));
        }

        let visits = selected_clients
            .iter()
            .enumerate()
            .map(|(index, client)| {
                let planned_time = self.planned_time(date, index)?;
                Ok(Visit::new(index as u32 + 1, client.clone(), date, planned_time))
            })
            .collect::<Result<Vec<_>>>()?;

        if !self.visits.is_empty() {
            warn!(
                "Replacing plan of {} visits; its completion state, notes and attachments are discarded",
                self.visits.len()
            );
        }
        self.visits = visits;
        debug!("Generated agenda of {} visits for {date}", self.visits.len());
        self.persist();
        Ok(&self.visits)
    }

    /// Moves the visits at `from_indices` so that they land before the visit
    /// currently at `to_index` (`to_index == len` moves them to the end).
    /// Moved visits keep their relative order; the rest shift to fill the gap.
    ///
    /// # Errors
    ///
    /// `AgendaError::InvalidInput` for an index out of range; the plan is left
    /// unchanged.
    pub fn move_visits(&mut self, from_indices: &[usize], to_index: usize) -> Result<()> {
        let sources = self.checked_offsets("from_indices", from_indices)?;
        if to_index > self.visits.len() {
            return Err(AgendaError::invalid_input("to_index").with_reason(format!(
                "position {to_index} is past the end of a {} visit agenda",
                self.visits.len()
            )));
        }
        if sources.is_empty() {
            return Ok(());
        }

        let insert_at = to_index - sources.iter().filter(|&&i| i < to_index).count();
        let mut moved = Vec::with_capacity(sources.len());
        for &index in sources.iter().rev() {
            moved.push(self.visits.remove(index));
        }
        moved.reverse();
        for (offset, visit) in moved.into_iter().enumerate() {
            self.visits.insert(insert_at + offset, visit);
        }

        renumber(&mut self.visits);
        debug!("Moved visits {sources:?} to position {to_index}");
        self.persist();
        Ok(())
    }

    /// Removes the visits at the given positions and renumbers the rest.
    ///
    /// # Errors
    ///
    /// `AgendaError::InvalidInput` for an offset out of range; the plan is left
    /// unchanged.
    pub fn delete_visits(&mut self, offsets: &[usize]) -> Result<()> {
        let offsets = self.checked_offsets("offsets", offsets)?;
        if offsets.is_empty() {
            return Ok(());
        }

        for &index in offsets.iter().rev() {
            self.visits.remove(index);
        }

        renumber(&mut self.visits);
        debug!(
            "Deleted {} visits, {} remaining",
            offsets.len(),
            self.visits.len()
        );
        self.persist();
        Ok(())
    }

    /// Writes back an edited copy of a visit, matched by id. Its sequence is
    /// reset to its position in the plan.
    ///
    /// # Errors
    ///
    /// `AgendaError::VisitNotFound` when the plan no longer contains the visit,
    /// for example after it was regenerated.
    pub fn update_visit(&mut self, mut visit: Visit) -> Result<()> {
        let index = self
            .visits
            .iter()
            .position(|v| v.id == visit.id)
            .ok_or(AgendaError::VisitNotFound { id: visit.id })?;

        visit.sequence = index as u32 + 1;
        self.visits[index] = visit;
        self.persist();
        Ok(())
    }

    /// Opens a lifecycle session on a copy of the visit.
    pub fn open_session(&self, id: Uuid) -> Result<VisitSession> {
        self.get(id)
            .cloned()
            .map(VisitSession::new)
            .ok_or(AgendaError::VisitNotFound { id })
    }

    /// Writes a session's visit back into the plan.
    pub fn commit_session(&mut self, session: VisitSession) -> Result<()> {
        self.update_visit(session.into_visit())
    }

    fn planned_time(&self, date: Date, index: usize) -> Result<Zoned> {
        let time = i8::try_from(FIRST_VISIT_HOUR + index)
            .ok()
            .and_then(|hour| Time::new(hour, 0, 0, 0).ok());

        let zoned = match time {
            Some(time) => date.to_datetime(time).to_zoned(self.time_zone.clone()),
            None => {
                debug!("Visit {} falls past midnight, planning it at start of day", index + 1);
                date.to_zoned(self.time_zone.clone())
            }
        };
        zoned.map_err(|e| AgendaError::invalid_input("date").with_reason(e.to_string()))
    }

    fn checked_offsets(&self, field: &str, offsets: &[usize]) -> Result<BTreeSet<usize>> {
        let len = self.visits.len();
        match offsets.iter().find(|&&i| i >= len) {
            Some(bad) => Err(AgendaError::invalid_input(field)
                .with_reason(format!("position {bad} is out of range for {len} visits"))),
            None => Ok(offsets.iter().copied().collect()),
        }
    }

    /// Best-effort save; the in-memory plan stays authoritative on failure.
    fn persist(&self) {
        if let Err(e) = self.store.save(&self.visits) {
            error!("Failed to persist plan of {} visits: {e}", self.visits.len());
        }
    }
}

fn renumber(visits: &mut [Visit]) {
    for (index, visit) in visits.iter_mut().enumerate() {
        visit.sequence = index as u32 + 1;
    }
}
