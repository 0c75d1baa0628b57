// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Protocol layer for OpenSky state vectors.
//!
//! The OpenSky REST API reports each aircraft as a 17-element positional JSON
//! array. This module holds the wire response shape, the typed [`StateVector`]
//! record and the lenient decoder between the two.

mod decode;

pub use decode::{decode_response, decode_state_vector};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One positional state vector exactly as it appears on the wire.
pub type RawStateVector = Vec<serde_json::Value>;

/// Response body of `GET /states/all`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StateVectorResponse {
    /// Unix timestamp the state vectors are associated with.
    #[serde(default)]
    pub time: i64,
    /// State vectors, or `null` when the API has nothing to report.
    #[serde(default)]
    pub states: Option<Vec<RawStateVector>>,
}

/// Origin of an aircraft's reported position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum PositionSource {
    #[default]
    AdsB,
    Asterix,
    Mlat,
    Flarm,
    /// Any code the API adds later.
    Unknown(i64),
}

impl PositionSource {
    #[must_use]
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => Self::AdsB,
            1 => Self::Asterix,
            2 => Self::Mlat,
            3 => Self::Flarm,
            other => Self::Unknown(other),
        }
    }

    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::AdsB => "ADS-B",
            Self::Asterix => "ASTERIX",
            Self::Mlat => "MLAT",
            Self::Flarm => "FLARM",
            Self::Unknown(_) => "Unknown",
        }
    }
}

/// Decoded aircraft state vector.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StateVector {
    /// ICAO 24-bit transponder address (hex string).
    pub icao24: String,
    /// Callsign, padded with spaces on the wire.
    pub callsign: Option<String>,
    pub origin_country: String,
    /// Unix timestamp of the last position update.
    pub time_position: Option<i64>,
    /// Unix timestamp of the last message of any kind.
    pub last_contact: i64,
    /// Longitude in degrees.
    pub longitude: Option<f64>,
    /// Latitude in degrees.
    pub latitude: Option<f64>,
    /// Barometric altitude in meters.
    pub baro_altitude: Option<f64>,
    pub on_ground: bool,
    /// Ground speed in m/s.
    pub velocity: Option<f64>,
    /// Track in degrees clockwise from north.
    pub true_track: Option<f64>,
    /// Vertical rate in m/s, positive when climbing.
    pub vertical_rate: Option<f64>,
    /// Receiver ids that contributed to this state.
    pub sensors: Option<Vec<i64>>,
    /// Geometric altitude in meters.
    pub geo_altitude: Option<f64>,
    pub squawk: Option<String>,
    /// Special purpose indicator.
    pub spi: bool,
    pub position_source: PositionSource,
    /// Aircraft category. Not reported by the bounded query, always 0.
    pub category: u8,
}

impl StateVector {
    /// Last contact as a UTC timestamp.
    #[must_use]
    pub fn last_contact_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.last_contact, 0)
    }
}

/// Result of one poll. Replaced wholesale on every poll.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateVectorSet {
    /// Unix timestamp of the poll.
    pub time: i64,
    pub states: Vec<StateVector>,
}

impl StateVectorSet {
    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
