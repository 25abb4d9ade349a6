//! Data models for clients, visits and wire payloads.
//!
//! This module contains the domain models of the visit agenda. Display
//! implementations live in [`crate::display`] so that presentation stays
//! separate from the data structures.
//!
//! # Ownership
//!
//! - [`Client`] is immutable reference data owned by the caller's catalog.
//! - [`Visit`] is owned by the [`crate::Agenda`] until it is replaced or
//!   deleted; submitting a visit never mutates or removes it.
//! - [`VisitPayload`] is derived on demand for the remote service and is
//!   never persisted as domain state.
//!
//! # Examples
//!
//! ```rust
//! use agenda_core::models::{Client, Visit, VisitTag};
//! use jiff::{civil::date, tz::TimeZone};
//!
//! let client = Client {
//!     id: 10,
//!     name: "Clinica Andes".to_string(),
//!     address: "Av. Libertad 123".to_string(),
//!     latitude: -33.4569,
//!     longitude: -70.6483,
//! };
//! let day = date(2025, 1, 2);
//! let planned = day.at(9, 0, 0, 0).to_zoned(TimeZone::UTC).unwrap();
//! let mut visit = Visit::new(1, client, day, planned);
//! visit.selected_tags.insert(VisitTag::Sales);
//!
//! assert_eq!(visit.planned_hour_text(), "09:00");
//! assert!(!visit.is_completed);
//! ```

pub mod client;
pub mod coordinate;
pub mod payload;
pub mod tag;
pub mod visit;

#[cfg(test)]
mod tests;

pub use client::Client;
pub use coordinate::Coordinate;
pub use payload::VisitPayload;
pub use tag::{AttachmentKind, VisitTag};
pub use visit::{Visit, VisitAttachment};
