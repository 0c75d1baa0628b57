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

//! Positional state vector decoder.
//!
//! Wire layout:
//! ```text
//! [icao24, callsign, origin_country, time_position, last_contact, longitude,
//!  latitude, baro_altitude, on_ground, velocity, true_track, vertical_rate,
//!  sensors, geo_altitude, squawk, spi, position_source]
//! ```
//!
//! Decoding is lenient: nulls, wrongly typed values and positions past the end
//! of a short array all come out as absent fields. Nothing here fails.

use serde_json::Value;

use super::{PositionSource, StateVector, StateVectorResponse, StateVectorSet};

const ICAO24: usize = 0;
const CALLSIGN: usize = 1;
const ORIGIN_COUNTRY: usize = 2;
const TIME_POSITION: usize = 3;
const LAST_CONTACT: usize = 4;
const LONGITUDE: usize = 5;
const LATITUDE: usize = 6;
const BARO_ALTITUDE: usize = 7;
const ON_GROUND: usize = 8;
const VELOCITY: usize = 9;
const TRUE_TRACK: usize = 10;
const VERTICAL_RATE: usize = 11;
const SENSORS: usize = 12;
const GEO_ALTITUDE: usize = 13;
const SQUAWK: usize = 14;
const SPI: usize = 15;
const POSITION_SOURCE: usize = 16;

fn field(raw: &[Value], index: usize) -> Option<&Value> {
    raw.get(index).filter(|v| !v.is_null())
}

fn string_at(raw: &[Value], index: usize) -> Option<String> {
    field(raw, index).and_then(Value::as_str).map(str::to_string)
}

fn f64_at(raw: &[Value], index: usize) -> Option<f64> {
    field(raw, index).and_then(Value::as_f64)
}

#[allow(clippy::cast_possible_truncation, reason = "timestamps are whole seconds")]
fn i64_at(raw: &[Value], index: usize) -> Option<i64> {
    let value = field(raw, index)?;
    value.as_i64().or_else(|| value.as_f64().map(|f| f as i64))
}

fn bool_at(raw: &[Value], index: usize) -> Option<bool> {
    field(raw, index).and_then(Value::as_bool)
}

fn sensors_at(raw: &[Value], index: usize) -> Option<Vec<i64>> {
    field(raw, index)
        .and_then(Value::as_array)
        .map(|ids| ids.iter().filter_map(Value::as_i64).collect())
}

/// Decode one positional state vector into a typed record.
#[must_use]
pub fn decode_state_vector(raw: &[Value]) -> StateVector {
    StateVector {
        icao24: string_at(raw, ICAO24).unwrap_or_default(),
        callsign: string_at(raw, CALLSIGN),
        origin_country: string_at(raw, ORIGIN_COUNTRY).unwrap_or_default(),
        time_position: i64_at(raw, TIME_POSITION),
        last_contact: i64_at(raw, LAST_CONTACT).unwrap_or_default(),
        longitude: f64_at(raw, LONGITUDE),
        latitude: f64_at(raw, LATITUDE),
        baro_altitude: f64_at(raw, BARO_ALTITUDE),
        on_ground: bool_at(raw, ON_GROUND).unwrap_or(false),
        velocity: f64_at(raw, VELOCITY),
        true_track: f64_at(raw, TRUE_TRACK),
        vertical_rate: f64_at(raw, VERTICAL_RATE),
        sensors: sensors_at(raw, SENSORS),
        geo_altitude: f64_at(raw, GEO_ALTITUDE),
        squawk: string_at(raw, SQUAWK),
        spi: bool_at(raw, SPI).unwrap_or(false),
        position_source: i64_at(raw, POSITION_SOURCE)
            .map(PositionSource::from_code)
            .unwrap_or_default(),
        category: 0,
    }
}

/// Decode a whole poll response.
///
/// Returns `None` when the response carries no `states` list at all, and a set
/// with zero entries when the list is present but empty.
#[must_use]
pub fn decode_response(response: StateVectorResponse) -> Option<StateVectorSet> {
    let raw_states = response.states?;
    Some(StateVectorSet {
        time: response.time,
        states: raw_states.iter().map(|raw| decode_state_vector(raw)).collect(),
    })
}
