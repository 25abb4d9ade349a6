//! Device location seam used when completing a visit.
//!
//! The platform's permission prompt and single-shot location request are
//! modeled as an async trait so that completion can await them instead of
//! registering callbacks on an owner that may already be gone.

use async_trait::async_trait;
use log::debug;

use crate::{error::Result, models::Coordinate};

/// Location permission as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationStatus {
    AuthorizedAlways,
    AuthorizedWhenInUse,
    NotDetermined,
    Denied,
    Restricted,
}

impl AuthorizationStatus {
    pub fn is_authorized(&self) -> bool {
        matches!(
            self,
            AuthorizationStatus::AuthorizedAlways | AuthorizationStatus::AuthorizedWhenInUse
        )
    }
}

/// Source of the device's current position.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Current permission status, without prompting.
    fn authorization_status(&self) -> AuthorizationStatus;

    /// Prompts for permission and resolves with the status the user chose.
    async fn request_authorization(&self) -> AuthorizationStatus;

    /// Requests a single fix. `Ok(None)` means the platform answered without
    /// any position.
    ///
    /// # Errors
    ///
    /// `AgendaError::LocationDenied` or `AgendaError::LocationUnavailable`.
    async fn request_location(&self) -> Result<Option<Coordinate>>;
}

/// Provider answering with a preconfigured permission and fix.
///
/// Used where no positioning hardware is available, such as the command
/// line, where the position is given as arguments.
#[derive(Debug, Clone)]
pub struct FixedLocationProvider {
    status: AuthorizationStatus,
    status_after_request: AuthorizationStatus,
    fix: Option<Coordinate>,
}

impl FixedLocationProvider {
    pub fn new(status: AuthorizationStatus, fix: Option<Coordinate>) -> Self {
        Self {
            status,
            status_after_request: status,
            fix,
        }
    }

    /// Authorized provider always reporting `fix`.
    pub fn authorized(fix: Coordinate) -> Self {
        Self::new(AuthorizationStatus::AuthorizedWhenInUse, Some(fix))
    }

    /// Provider whose permission has been denied.
    pub fn denied() -> Self {
        Self::new(AuthorizationStatus::Denied, None)
    }

    /// Status reported once permission has been requested.
    pub fn with_status_after_request(mut self, status: AuthorizationStatus) -> Self {
        self.status_after_request = status;
        self
    }
}

#[async_trait]
impl LocationProvider for FixedLocationProvider {
    fn authorization_status(&self) -> AuthorizationStatus {
        self.status
    }

    async fn request_authorization(&self) -> AuthorizationStatus {
        debug!("Permission requested, answering {:?}", self.status_after_request);
        self.status_after_request
    }

    async fn request_location(&self) -> Result<Option<Coordinate>> {
        Ok(self.fix)
    }
}
