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

//! Display attributes derived from a state vector.
//!
//! Everything here is a pure function of a single [`StateVector`]: the
//! altitude fallback, the red-to-green altitude color, the takeoff/landing icon
//! choice, the icon rotation and the label strings drawn next to the symbol.

pub mod collection;

pub use collection::{build_feature_collection, Feature, FeatureCollection, Point};

use serde::{Deserialize, Serialize};

use crate::protocol::StateVector;

/// Altitude (meters) mapped to pure green; everything above is clamped.
const COLOR_CEILING_METERS: f64 = 13_000.0;
/// Below this altitude (meters) climbing and descending aircraft get the
/// takeoff and landing icons.
const LOW_ALTITUDE_METERS: f64 = 1_000.0;
/// Tracks at or above this angle use the mirrored takeoff/landing icons.
const FLIP_TRACK_DEGREES: f64 = 100.0;
pub const MPS_TO_KMH: f64 = 3.6;
/// Velocity reported when the vector has none.
const UNKNOWN_VELOCITY: f64 = -1.0;

/// Fill color for aircraft on the ground.
pub const ON_GROUND_COLOR: &str = "#e3f2fd";

/// Symbol icons registered with the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlightIcon {
    #[serde(rename = "flight-icon")]
    Flight,
    #[serde(rename = "flight-takeoff-icon")]
    Takeoff,
    #[serde(rename = "flight-takeoff-flipped-icon")]
    TakeoffFlipped,
    #[serde(rename = "flight-land-icon")]
    Land,
    #[serde(rename = "flight-land-flipped-icon")]
    LandFlipped,
}

/// Attributes attached to every rendered aircraft symbol.
///
/// Serialized with the property names the symbol layer expressions read
/// (`iconName`, `rotation`, `color`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureProperties {
    pub icon_name: FlightIcon,
    /// Icon rotation in degrees clockwise from north.
    pub rotation: f64,
    /// `#rrggbb` fill for icon and label.
    pub color: String,
    pub icao24: String,
    pub callsign: String,
    /// Altitude label, e.g. `"10972.8 m"`.
    pub altitude: String,
    /// Velocity label, e.g. `"833.4 km/h"`.
    pub velocity: String,
    /// Origin country.
    pub origin: String,
}

/// Altitude used for every altitude dependent attribute.
///
/// Geometric altitude wins, barometric altitude is the fallback, and a
/// missing or negative value at both tiers resolves to 0.
#[must_use]
pub fn resolve_altitude(state: &StateVector) -> f64 {
    [state.geo_altitude, state.baro_altitude]
        .into_iter()
        .flatten()
        .find(|alt| *alt >= 0.0)
        .unwrap_or(0.0)
}

/// Red (ground) to green (13 000 m) gradient as `#rrggbb`.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "channels are rounded and bounded to 0..=255"
)]
pub fn altitude_color(altitude: f64) -> String {
    let percent = (altitude / COLOR_CEILING_METERS * 100.0).clamp(0.0, 100.0);

    let (r, g, b) = if percent < 50.0 {
        (255.0, (5.1 * percent).round(), 0.0)
    } else {
        ((510.0 - 5.10 * percent).round(), 255.0, 0.0)
    };

    let rgb = (r as u32) << 16 | (g as u32) << 8 | b as u32;
    format!("#{rgb:06x}")
}

/// Icon color for a state vector; ground traffic is always light blue.
#[must_use]
pub fn color_for(state: &StateVector, altitude: f64) -> String {
    if state.on_ground {
        ON_GROUND_COLOR.to_string()
    } else {
        altitude_color(altitude)
    }
}

/// Takeoff and landing icons below 1000 m, the plain icon otherwise.
#[must_use]
pub fn icon_for(vertical_rate: f64, altitude: f64, true_track: f64) -> FlightIcon {
    let flipped = true_track >= FLIP_TRACK_DEGREES;
    if vertical_rate > 0.0 && altitude < LOW_ALTITUDE_METERS {
        if flipped {
            FlightIcon::TakeoffFlipped
        } else {
            FlightIcon::Takeoff
        }
    } else if vertical_rate < 0.0 && altitude < LOW_ALTITUDE_METERS {
        if flipped {
            FlightIcon::LandFlipped
        } else {
            FlightIcon::Land
        }
    } else {
        FlightIcon::Flight
    }
}

/// Icon rotation in degrees.
///
/// Climbing above 1000 m and descending below 1000 m both draw unrotated;
/// every other case follows the true track. The two thresholds point in
/// different directions on purpose, matching the established map behavior.
#[must_use]
pub fn rotation_for(vertical_rate: f64, altitude: f64, true_track: f64) -> f64 {
    if vertical_rate > 0.0 && altitude > LOW_ALTITUDE_METERS {
        0.0
    } else if vertical_rate < 0.0 && altitude < LOW_ALTITUDE_METERS {
        0.0
    } else {
        true_track
    }
}

/// Ground speed in km/h, or -1 when unknown.
#[must_use]
pub fn velocity_kmh(state: &StateVector) -> f64 {
    state.velocity.map_or(UNKNOWN_VELOCITY, |v| v * MPS_TO_KMH)
}

/// Label callsign: the trimmed callsign, or the ICAO address when blank.
#[must_use]
pub fn callsign_label(state: &StateVector) -> String {
    match state.callsign.as_deref().map(str::trim) {
        Some(callsign) if !callsign.is_empty() => callsign.to_string(),
        _ => state.icao24.clone(),
    }
}

/// Derive every display attribute of one state vector.
#[must_use]
pub fn derive_properties(state: &StateVector) -> FeatureProperties {
    let altitude = resolve_altitude(state);
    let vertical_rate = state.vertical_rate.unwrap_or(0.0);
    let true_track = state.true_track.unwrap_or(0.0);

    FeatureProperties {
        icon_name: icon_for(vertical_rate, altitude, true_track),
        rotation: rotation_for(vertical_rate, altitude, true_track),
        color: color_for(state, altitude),
        icao24: state.icao24.clone(),
        callsign: callsign_label(state),
        altitude: format!("{altitude} m"),
        velocity: format!("{} km/h", velocity_kmh(state)),
        origin: state.origin_country.clone(),
    }
}
