//! Sequential submission of the agenda to the remote visit service.
//!
//! Visits are sent strictly in sequence order, one request at a time, and
//! the loop stops at the first failure. Nothing local changes: visits that
//! were accepted stay in the plan and carry no acknowledgment flag. The
//! returned [`SubmissionReport`] says which visits went through so callers can
//! decide what to retry.
//!
//! The service has no idempotency key. Submitting the same plan again after a
//! partial failure re-sends the visits it already accepted.

use std::sync::Arc;

use log::{debug, error, info};
use tokio::sync::watch;
use uuid::Uuid;

use crate::{
    error::{AgendaError, Result},
    gateway::{GatewayConfig, HttpVisitGateway, RemoteVisitGateway},
    messages::{EnglishMessages, MessageCatalog},
    models::{Visit, VisitPayload},
};

/// Keeps derived ids within the integer range JSON consumers handle exactly.
const JSON_SAFE_MASK: u64 = (1 << 53) - 1;

/// Backend id for a visit: both halves of its UUID folded into 53 bits.
///
/// Stable for a given visit across submission runs and independent of its
/// position in the plan.
pub fn submission_id(visit_id: Uuid) -> i64 {
    let (high, low) = visit_id.as_u64_pair();
    ((high ^ low) & JSON_SAFE_MASK) as i64
}

/// Builds the wire payload for one visit.
pub fn build_payload(visit: &Visit, commercial_id: i64) -> VisitPayload {
    VisitPayload::new(
        submission_id(visit.id),
        commercial_id,
        visit.planned_time.timestamp(),
        vec![visit.client.id],
    )
}

/// What happened to one visit during a submission run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionStatus {
    Submitted,
    Failed(String),
    /// Not sent because an earlier visit failed
    NotAttempted,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VisitSubmission {
    pub visit_id: Uuid,
    pub sequence: u32,
    pub payload: VisitPayload,
    pub status: SubmissionStatus,
}

/// Per-visit outcome of [`SubmissionCoordinator::submit_agenda`], in the order
/// the visits were (or would have been) sent.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SubmissionReport {
    pub items: Vec<VisitSubmission>,
}

impl SubmissionReport {
    pub fn is_success(&self) -> bool {
        self.items
            .iter()
            .all(|item| item.status == SubmissionStatus::Submitted)
    }

    pub fn submitted_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| item.status == SubmissionStatus::Submitted)
            .count()
    }

    /// The visit that stopped the run, if any.
    pub fn failure(&self) -> Option<&VisitSubmission> {
        self.items
            .iter()
            .find(|item| matches!(item.status, SubmissionStatus::Failed(_)))
    }

    /// Visits the backend has not accepted: the failed one and everything
    /// after it.
    pub fn unsent(&self) -> impl Iterator<Item = &VisitSubmission> {
        self.items
            .iter()
            .filter(|item| item.status != SubmissionStatus::Submitted)
    }
}

/// Drives the remote gateway for a plan and tracks the submission status a
/// caller displays.
///
/// Status text comes from the coordinator's [`MessageCatalog`], English
/// unless another one is set with [`SubmissionCoordinator::with_messages`].
pub struct SubmissionCoordinator {
    gateway: Arc<dyn RemoteVisitGateway>,
    commercial_id: i64,
    messages: Arc<dyn MessageCatalog>,
    submitting: watch::Sender<bool>,
    error_message: Option<String>,
    success_message: Option<String>,
}

impl SubmissionCoordinator {
    pub fn new(gateway: Arc<dyn RemoteVisitGateway>, commercial_id: i64) -> Self {
        Self {
            gateway,
            commercial_id,
            messages: Arc::new(EnglishMessages),
            submitting: watch::channel(false).0,
            error_message: None,
            success_message: None,
        }
    }

    /// Coordinator talking HTTP to the configured service.
    pub fn from_config(config: &GatewayConfig) -> Result<Self> {
        let gateway = HttpVisitGateway::new(config)?;
        Ok(Self::new(Arc::new(gateway), config.commercial_id))
    }

    pub fn with_messages(mut self, messages: Arc<dyn MessageCatalog>) -> Self {
        self.messages = messages;
        self
    }

    /// True while a submission run is sending visits.
    pub fn is_submitting(&self) -> bool {
        *self.submitting.borrow()
    }

    /// Follows the submitting flag, including while `submit_agenda` holds
    /// the coordinator.
    pub fn subscribe_submitting(&self) -> watch::Receiver<bool> {
        self.submitting.subscribe()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn success_message(&self) -> Option<&str> {
        self.success_message.as_deref()
    }

    pub fn clear_messages(&mut self) {
        self.error_message = None;
        self.success_message = None;
    }

    /// Sends every visit of the plan, in sequence order, stopping at the first
    /// failure.
    ///
    /// A gateway failure is reported through the returned report and
    /// [`SubmissionCoordinator::error_message`], not as an `Err`.
    ///
    /// # Errors
    ///
    /// `AgendaError::NoVisits` for an empty plan; no request is made.
    pub async fn submit_agenda(&mut self, plan: &[Visit]) -> Result<SubmissionReport> {
        self.clear_messages();
        if plan.is_empty() {
            let err = AgendaError::NoVisits;
            self.error_message = Some(self.messages.describe(&err));
            return Err(err);
        }

        let mut ordered: Vec<&Visit> = plan.iter().collect();
        ordered.sort_by_key(|visit| visit.sequence);

        let mut report = SubmissionReport {
            items: ordered
                .into_iter()
                .map(|visit| VisitSubmission {
                    visit_id: visit.id,
                    sequence: visit.sequence,
                    payload: build_payload(visit, self.commercial_id),
                    status: SubmissionStatus::NotAttempted,
                })
                .collect(),
        };

        {
            let _submitting = SubmittingGuard::enter(&self.submitting);
            for item in &mut report.items {
                debug!(
                    "Submitting visit {} as visit_id {}",
                    item.sequence, item.payload.visit_id
                );
                match self.gateway.submit_visit(&item.payload).await {
                    Ok(()) => item.status = SubmissionStatus::Submitted,
                    Err(e) => {
                        error!("Submission stopped at visit {}: {e}", item.sequence);
                        let message = self.messages.describe(&e);
                        item.status = SubmissionStatus::Failed(message.clone());
                        self.error_message = Some(message);
                        break;
                    }
                }
            }
        }

        if report.is_success() {
            info!("Submitted {} visits", report.submitted_count());
            self.success_message = Some(self.messages.submission_succeeded());
        }
        Ok(report)
    }

    /// Fetches recently recorded visits. Never touches the local plan.
    pub async fn refresh_recent_visits(&mut self, limit: u32) -> Result<Vec<VisitPayload>> {
        match self.gateway.fetch_recent_visits(limit).await {
            Ok(visits) => {
                debug!("Fetched {} recent visits", visits.len());
                Ok(visits)
            }
            Err(e) => {
                error!("Could not refresh recent visits: {e}");
                self.error_message = Some(self.messages.describe(&e));
                Err(e)
            }
        }
    }
}

/// Publishes `true` on the submitting flag until dropped, so a cancelled
/// submission run does not leave it set.
struct SubmittingGuard<'a>(&'a watch::Sender<bool>);

impl<'a> SubmittingGuard<'a> {
    fn enter(flag: &'a watch::Sender<bool>) -> Self {
        flag.send_replace(true);
        Self(flag)
    }
}

impl Drop for SubmittingGuard<'_> {
    fn drop(&mut self) {
        self.0.send_replace(false);
    }
}
