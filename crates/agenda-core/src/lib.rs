//! Core library for the visit agenda application.
//!
//! This crate holds the business logic a field representative needs to plan
//! a day of client visits, record what happened at each one and report the
//! day to a remote visit service:
//!
//! - [`Agenda`]: the ordered, persisted plan of visits for one day
//! - [`VisitSession`]: the editing and completion lifecycle of a single visit
//! - [`SubmissionCoordinator`]: sequential, fail-fast upload of the plan
//! - [`MessageCatalog`]: the status text shown to the user, per language
//!
//! # Display Architecture
//!
//! Domain models implement [`std::fmt::Display`] and collections are wrapped
//! in the newtypes of [`display`]. Everything is markdown, rendered by the
//! CLI's terminal renderer.
//!
//! # Quick Start
//!
//! ```rust
//! use agenda_core::{
//!     AgendaBuilder, ClientCatalog, CompletionOutcome, FixedLocationProvider,
//!     models::Coordinate, store::MemoryVisitStore,
//! };
//! use jiff::{civil::date, tz::TimeZone};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> agenda_core::Result<()> {
//! let mut agenda = AgendaBuilder::new()
//!     .with_store(MemoryVisitStore::new())
//!     .with_time_zone(TimeZone::UTC)
//!     .build()?;
//!
//! let clients = ClientCatalog::sample().select(&[20, 10])?;
//! agenda.replace_plan(&clients, date(2025, 1, 2))?;
//!
//! let first = agenda.visits()[0].id;
//! let mut session = agenda.open_session(first)?;
//! let gps = FixedLocationProvider::authorized(Coordinate::new(4.6486, -74.0995));
//! let outcome = session.mark_completed(&gps).await;
//! assert!(matches!(outcome, CompletionOutcome::Located(_)));
//!
//! agenda.commit_session(session)?;
//! assert!(agenda.visits()[0].is_completed);
//! # Ok(())
//! # }
//! ```

pub mod agenda;
pub mod catalog;
pub mod display;
pub mod error;
pub mod gateway;
pub mod lifecycle;
pub mod location;
pub mod messages;
pub mod models;
pub mod store;
pub mod submission;

// Re-export commonly used types
pub use agenda::{Agenda, AgendaBuilder, FIRST_VISIT_HOUR};
pub use catalog::ClientCatalog;
pub use display::{AgendaList, LocalDateTime, RecentVisits};
pub use error::{AgendaError, Result};
pub use gateway::{GatewayConfig, HttpVisitGateway, RemoteVisitGateway};
pub use lifecycle::{CaptureCancel, CompletionOutcome, CompletionState, LocationFailure, VisitSession};
pub use location::{AuthorizationStatus, FixedLocationProvider, LocationProvider};
pub use messages::{catalog_for_language, EnglishMessages, MessageCatalog, SpanishMessages};
pub use models::{AttachmentKind, Client, Coordinate, Visit, VisitAttachment, VisitPayload, VisitTag};
pub use store::{MemoryVisitStore, SqliteVisitStore, VisitStore};
pub use submission::{SubmissionCoordinator, SubmissionReport, SubmissionStatus, VisitSubmission};
