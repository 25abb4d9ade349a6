//! Client model definition.

use serde::{Deserialize, Serialize};

use super::Coordinate;

/// A commercial client that can be part of a visit plan.
///
/// Clients are reference data owned by the caller's catalog; the agenda only
/// ever copies them into the visits it generates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Client {
    /// Backend identifier of the client
    pub id: i64,

    /// Display name of the client
    pub name: String,

    /// Postal address of the client
    pub address: String,

    /// Latitude of the client's premises
    pub latitude: f64,

    /// Longitude of the client's premises
    pub longitude: f64,
}

impl Client {
    /// Location of the client's premises.
    pub fn coordinate(&self) -> Coordinate {
        Coordinate {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}
