//! Visit tag and attachment kind enumerations.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Closed set of tags describing the kind of interaction a visit was.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum VisitTag {
    Installation,
    Training,
    Support,
    Sales,
    Other,
}

impl VisitTag {
    /// Every tag, in display order.
    pub const ALL: [VisitTag; 5] = [
        VisitTag::Installation,
        VisitTag::Training,
        VisitTag::Support,
        VisitTag::Sales,
        VisitTag::Other,
    ];

    /// Stable lowercase name, as persisted.
    pub fn as_str(&self) -> &'static str {
        match self {
            VisitTag::Installation => "installation",
            VisitTag::Training => "training",
            VisitTag::Support => "support",
            VisitTag::Sales => "sales",
            VisitTag::Other => "other",
        }
    }

    /// Human readable label.
    pub fn label(&self) -> &'static str {
        match self {
            VisitTag::Installation => "Installation",
            VisitTag::Training => "Training",
            VisitTag::Support => "Support",
            VisitTag::Sales => "Sales",
            VisitTag::Other => "Other",
        }
    }
}

impl FromStr for VisitTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "installation" => Ok(VisitTag::Installation),
            "training" => Ok(VisitTag::Training),
            "support" => Ok(VisitTag::Support),
            "sales" => Ok(VisitTag::Sales),
            "other" => Ok(VisitTag::Other),
            _ => Err(format!("Invalid visit tag: {s}")),
        }
    }
}

/// Media type of a visit attachment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentKind {
    Photo,
    Video,
}

impl AttachmentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttachmentKind::Photo => "photo",
            AttachmentKind::Video => "video",
        }
    }

    /// File name given to newly captured evidence until real media handling
    /// replaces it.
    pub fn placeholder_file_name(&self) -> &'static str {
        match self {
            AttachmentKind::Photo => "evidence_photo.jpg",
            AttachmentKind::Video => "evidence_video.mov",
        }
    }
}

impl FromStr for AttachmentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "photo" => Ok(AttachmentKind::Photo),
            "video" => Ok(AttachmentKind::Video),
            _ => Err(format!("Invalid attachment type: {s}")),
        }
    }
}
