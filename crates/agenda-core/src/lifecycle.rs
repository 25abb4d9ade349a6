//! Per-visit mutations and the completion state machine.
//!
//! A [`VisitSession`] wraps one [`Visit`] while it is being worked on. Tags,
//! attachments and notes are plain edits. Completion goes through three
//! states:
//!
//! ```text
//! Planned ──mark_completed──▶ CapturingLocation ──▶ Completed
//!    ▲                               │
//!    └────────── cancelled ──────────┘
//! ```
//!
//! Denied permission, a failed fix or a fix without position still complete
//! the visit, only without coordinates. Those outcomes raise
//! [`VisitSession::show_location_error`] instead of returning an error.
//!
//! `mark_completed` borrows the session mutably, so two captures can never
//! be in flight on the same session. Calling it on a completed visit is a
//! no-op.

use std::{
    sync::{Arc, Weak},
    time::Duration,
};

use jiff::Timestamp;
use log::{debug, warn};
use tokio::sync::watch;
use uuid::Uuid;

use crate::{
    error::AgendaError,
    location::{AuthorizationStatus, LocationProvider},
    models::{AttachmentKind, Coordinate, Visit, VisitAttachment, VisitTag},
};

/// Where a visit is in its completion lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionState {
    Planned,
    CapturingLocation,
    Completed,
}

/// Why a visit completed without a location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationFailure {
    /// Permission denied, either already or at the prompt
    Denied,
    /// Permission restricted by policy
    Restricted,
    /// The fix failed or timed out
    Unavailable(String),
    /// The platform answered without any position
    NoFix,
}

impl LocationFailure {
    /// Whether the user should be told location could not be recorded.
    pub fn is_reportable(&self) -> bool {
        !matches!(self, LocationFailure::NoFix)
    }
}

/// Result of [`VisitSession::mark_completed`].
#[derive(Debug, Clone, PartialEq)]
pub enum CompletionOutcome {
    /// Completed with the captured coordinates
    Located(Coordinate),
    /// Completed without new coordinates
    WithoutLocation(LocationFailure),
    /// The visit was already completed; nothing changed
    AlreadyCompleted,
    /// The capture was cancelled; the visit is still planned
    Cancelled,
}

/// Handle that aborts the capture in flight on a session.
///
/// Holds only a weak reference, so cancelling after the session is gone does
/// nothing.
#[derive(Debug, Clone)]
pub struct CaptureCancel {
    signal: Weak<watch::Sender<bool>>,
}

impl CaptureCancel {
    pub fn cancel(&self) {
        if let Some(signal) = self.signal.upgrade() {
            signal.send_replace(true);
        }
    }
}

/// Editing session over a single visit.
#[derive(Debug)]
pub struct VisitSession {
    visit: Visit,
    state: CompletionState,
    show_location_error: bool,
    capture_timeout: Option<Duration>,
    cancel_signal: Arc<watch::Sender<bool>>,
}

impl VisitSession {
    pub fn new(visit: Visit) -> Self {
        let state = if visit.is_completed {
            CompletionState::Completed
        } else {
            CompletionState::Planned
        };
        let (cancel_signal, _) = watch::channel(false);
        Self {
            visit,
            state,
            show_location_error: false,
            capture_timeout: None,
            cancel_signal: Arc::new(cancel_signal),
        }
    }

    /// Bounds how long a location fix may take. Without it the provider's own
    /// behavior applies.
    pub fn with_capture_timeout(mut self, timeout: Duration) -> Self {
        self.capture_timeout = Some(timeout);
        self
    }

    pub fn visit(&self) -> &Visit {
        &self.visit
    }

    pub fn into_visit(self) -> Visit {
        self.visit
    }

    pub fn id(&self) -> Uuid {
        self.visit.id
    }

    pub fn state(&self) -> CompletionState {
        self.state
    }

    /// True while a location capture is in flight.
    pub fn is_saving(&self) -> bool {
        self.state == CompletionState::CapturingLocation
    }

    /// Raised when completion could not record a location.
    pub fn show_location_error(&self) -> bool {
        self.show_location_error
    }

    pub fn dismiss_location_error(&mut self) {
        self.show_location_error = false;
    }

    pub fn cancel_handle(&self) -> CaptureCancel {
        CaptureCancel {
            signal: Arc::downgrade(&self.cancel_signal),
        }
    }

    /// Adds the tag if absent, removes it if present. Returns whether the tag
    /// is selected afterwards.
    pub fn toggle_tag(&mut self, tag: VisitTag) -> bool {
        if self.visit.selected_tags.remove(&tag) {
            false
        } else {
            self.visit.selected_tags.insert(tag);
            true
        }
    }

    /// Appends a placeholder attachment of the given kind.
    pub fn add_attachment(&mut self, kind: AttachmentKind) -> &VisitAttachment {
        let index = self.visit.attachments.len();
        self.visit.attachments.push(VisitAttachment::new(kind));
        &self.visit.attachments[index]
    }

    /// Removes the attachment with the given id. Returns false when there was
    /// nothing to remove.
    pub fn remove_attachment(&mut self, id: Uuid) -> bool {
        let before = self.visit.attachments.len();
        self.visit.attachments.retain(|a| a.id != id);
        self.visit.attachments.len() != before
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.visit.notes = notes.into();
    }

    /// Completes the visit, capturing the device location when permitted.
    pub async fn mark_completed(&mut self, provider: &dyn LocationProvider) -> CompletionOutcome {
        if self.visit.is_completed {
            debug!("Visit {} already completed", self.visit.id);
            return CompletionOutcome::AlreadyCompleted;
        }

        self.cancel_signal.send_replace(false);
        let mut cancelled = self.cancel_signal.subscribe();

        let captured = {
            let _capturing = CaptureInFlight::enter(&mut self.state);
            tokio::select! {
                captured = capture_location(provider, self.capture_timeout) => captured,
                _ = cancelled.wait_for(|c| *c) => {
                    debug!("Location capture for visit {} cancelled", self.visit.id);
                    return CompletionOutcome::Cancelled;
                }
            }
        };

        match captured {
            Ok(coordinate) => {
                self.finalize(Some(coordinate));
                CompletionOutcome::Located(coordinate)
            }
            Err(failure) => {
                if failure.is_reportable() {
                    warn!(
                        "Completing visit {} without location: {failure:?}",
                        self.visit.id
                    );
                    self.show_location_error = true;
                }
                self.finalize(None);
                CompletionOutcome::WithoutLocation(failure)
            }
        }
    }

    fn finalize(&mut self, coordinate: Option<Coordinate>) {
        if let Some(coordinate) = coordinate {
            self.visit.current_latitude = Some(coordinate.latitude);
            self.visit.current_longitude = Some(coordinate.longitude);
        }
        self.visit.is_completed = true;
        self.visit.completion_timestamp = Some(Timestamp::now());
        self.state = CompletionState::Completed;
    }
}

/// Holds the session in `CapturingLocation` and puts it back to `Planned`
/// when dropped, including when the capture future itself is dropped.
struct CaptureInFlight<'a> {
    state: &'a mut CompletionState,
}

impl<'a> CaptureInFlight<'a> {
    fn enter(state: &'a mut CompletionState) -> Self {
        *state = CompletionState::CapturingLocation;
        Self { state }
    }
}

impl Drop for CaptureInFlight<'_> {
    fn drop(&mut self) {
        *self.state = CompletionState::Planned;
    }
}

async fn capture_location(
    provider: &dyn LocationProvider,
    timeout: Option<Duration>,
) -> Result<Coordinate, LocationFailure> {
    let status = match provider.authorization_status() {
        AuthorizationStatus::NotDetermined => {
            debug!("Location permission not determined, requesting it");
            provider.request_authorization().await
        }
        status => status,
    };

    if !status.is_authorized() {
        return Err(match status {
            AuthorizationStatus::Restricted => LocationFailure::Restricted,
            _ => LocationFailure::Denied,
        });
    }

    let fix = match timeout {
        Some(limit) => match tokio::time::timeout(limit, provider.request_location()).await {
            Ok(fix) => fix,
            Err(_) => Err(AgendaError::LocationUnavailable {
                reason: format!("no fix within {} ms", limit.as_millis()),
            }),
        },
        None => provider.request_location().await,
    };

    match fix {
        Ok(Some(coordinate)) => Ok(coordinate),
        Ok(None) => Err(LocationFailure::NoFix),
        Err(AgendaError::LocationDenied) => Err(LocationFailure::Denied),
        Err(e) => Err(LocationFailure::Unavailable(e.to_string())),
    }
}
