//! Wire payload exchanged with the remote visit service.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Body of `POST {base_url}` and element of `GET {base_url}?limit=N`.
///
/// Field names are the backend's and must not be renamed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VisitPayload {
    pub visit_id: i64,
    pub commercial_id: i64,
    /// RFC 3339 timestamp in UTC, e.g. `2025-01-02T14:00:00Z`
    pub date: String,
    pub client_ids: Vec<i64>,
}

impl VisitPayload {
    pub fn new(visit_id: i64, commercial_id: i64, date: Timestamp, client_ids: Vec<i64>) -> Self {
        Self {
            visit_id,
            commercial_id,
            date: date.strftime("%Y-%m-%dT%H:%M:%SZ").to_string(),
            client_ids,
        }
    }
}
