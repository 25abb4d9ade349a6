//! Visit and attachment model definitions.

use std::collections::BTreeSet;

use jiff::{civil::Date, Timestamp, Zoned};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AttachmentKind, Client, Coordinate, VisitTag};

/// Evidence metadata attached to a visit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VisitAttachment {
    /// Identity used for removal
    pub id: Uuid,

    /// Photo or video
    pub kind: AttachmentKind,

    /// File name of the evidence
    pub file_name: String,

    /// When the attachment was added (UTC)
    pub created_at: Timestamp,
}

impl VisitAttachment {
    /// Creates a placeholder attachment of the given kind stamped with the
    /// current time.
    pub fn new(kind: AttachmentKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            file_name: kind.placeholder_file_name().to_string(),
            created_at: Timestamp::now(),
        }
    }
}

/// One planned interaction with a client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Visit {
    /// Opaque unique identifier
    pub id: Uuid,

    /// 1-based position of the visit within its agenda
    pub sequence: u32,

    /// Client being visited
    pub client: Client,

    /// Day the agenda was generated for
    pub scheduled_date: Date,

    /// Planned wall-clock time of the visit
    pub planned_time: Zoned,

    /// Whether the visit has been marked as completed
    #[serde(default)]
    pub is_completed: bool,

    /// Free-form notes
    #[serde(default)]
    pub notes: String,

    /// Tags describing the interaction
    #[serde(default)]
    pub selected_tags: BTreeSet<VisitTag>,

    /// Evidence attachments in insertion order
    #[serde(default)]
    pub attachments: Vec<VisitAttachment>,

    /// Latitude captured on completion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_latitude: Option<f64>,

    /// Longitude captured on completion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_longitude: Option<f64>,

    /// When the visit was completed (UTC)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_timestamp: Option<Timestamp>,
}

impl Visit {
    /// Creates a fresh, not yet completed visit.
    pub fn new(sequence: u32, client: Client, scheduled_date: Date, planned_time: Zoned) -> Self {
        Self {
            id: Uuid::new_v4(),
            sequence,
            client,
            scheduled_date,
            planned_time,
            is_completed: false,
            notes: String::new(),
            selected_tags: BTreeSet::new(),
            attachments: Vec::new(),
            current_latitude: None,
            current_longitude: None,
            completion_timestamp: None,
        }
    }

    /// Planned time formatted as `HH:MM`.
    pub fn planned_hour_text(&self) -> String {
        self.planned_time.strftime("%H:%M").to_string()
    }

    /// Coordinates captured on completion, when both are known.
    pub fn current_coordinate(&self) -> Option<Coordinate> {
        match (self.current_latitude, self.current_longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinate {
                latitude,
                longitude,
            }),
            _ => None,
        }
    }

    /// Looks up an attachment by id.
    pub fn attachment(&self, id: Uuid) -> Option<&VisitAttachment> {
        self.attachments.iter().find(|a| a.id == id)
    }
}
