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

//! Detail panel for the selected aircraft.

use std::fmt;

use chrono::{DateTime, Utc};
use opensky_client::features::MPS_TO_KMH;
use opensky_client::StateVector;
use serde::Serialize;

const METERS_PER_FOOT: f64 = 0.3048;
const MISSING: &str = "-";

/// One labelled line of the detail panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailRow {
    pub label: &'static str,
    pub value: String,
}

/// Formatted detail panel for one aircraft.
///
/// Color and rotation come from the clicked symbol and stay fixed while the
/// rows refresh.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightDetailCard {
    pub icao24: String,
    pub color: String,
    pub rotation: f64,
    pub rows: Vec<DetailRow>,
}

impl FlightDetailCard {
    #[must_use]
    pub fn build(state: &StateVector, color: &str, rotation: f64, now: DateTime<Utc>) -> Self {
        let last_contact = state
            .last_contact_at()
            .map_or_else(|| MISSING.to_string(), |at| relative_time(at, now));

        let rows = vec![
            row("Last Contact", last_contact),
            row("Origin Country", non_empty(&state.origin_country)),
            row("Velocity", state.velocity.map_or_else(missing, velocity_text)),
            row("Geometric Altitude", state.geo_altitude.map_or_else(missing, altitude_text)),
            row("Barometric Altitude", state.baro_altitude.map_or_else(missing, altitude_text)),
            row("Vertical Rate", state.vertical_rate.map_or_else(missing, |v| v.to_string())),
            row("Squawk", state.squawk.as_deref().map_or_else(missing, non_empty)),
            row("ICAO24", non_empty(&state.icao24)),
            row("Position Source", state.position_source.display_name().to_string()),
        ];

        Self {
            icao24: state.icao24.clone(),
            color: color.to_string(),
            rotation,
            rows,
        }
    }

    /// Value of the row labelled `label`.
    #[must_use]
    pub fn value(&self, label: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|r| r.label == label)
            .map(|r| r.value.as_str())
    }
}

impl fmt::Display for FlightDetailCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} [{} @ {}\u{b0}]", self.icao24, self.color, self.rotation)?;
        let width = self.rows.iter().map(|r| r.label.len()).max().unwrap_or(0);
        for row in &self.rows {
            writeln!(f, "  {:<width$}  {}", row.label, row.value)?;
        }
        Ok(())
    }
}

fn row(label: &'static str, value: String) -> DetailRow {
    DetailRow { label, value }
}

fn missing() -> String {
    MISSING.to_string()
}

fn non_empty(s: &str) -> String {
    if s.trim().is_empty() {
        missing()
    } else {
        s.trim().to_string()
    }
}

/// `"{v} m/s {v * 3.6:.2} km/h"`
fn velocity_text(mps: f64) -> String {
    format!("{mps} m/s {:.2} km/h", mps * MPS_TO_KMH)
}

/// Feet rounded to two decimals without trailing zeros, then metres.
fn altitude_text(meters: f64) -> String {
    format!("{} ft ({meters} m)", trim_decimals(meters / METERS_PER_FOOT))
}

fn trim_decimals(value: f64) -> String {
    let fixed = format!("{value:.2}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Humanized distance between `then` and `now`, e.g. `"5 minutes ago"`.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    reason = "second counts are far below f64 precision limits"
)]
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = (now - then).num_seconds();
    let future = delta < 0;
    let seconds = delta.unsigned_abs() as f64;

    let minutes = (seconds / 60.0).round() as u64;
    let hours = (seconds / 3600.0).round() as u64;
    let days = (seconds / 86_400.0).round() as u64;

    let phrase = if seconds < 45.0 {
        "a few seconds".to_string()
    } else if seconds < 90.0 {
        "a minute".to_string()
    } else if minutes < 45 {
        format!("{minutes} minutes")
    } else if seconds < 90.0 * 60.0 {
        "an hour".to_string()
    } else if hours < 22 {
        format!("{hours} hours")
    } else if seconds < 36.0 * 3600.0 {
        "a day".to_string()
    } else if days < 26 {
        format!("{days} days")
    } else if days < 46 {
        "a month".to_string()
    } else if days < 320 {
        format!("{} months", (days as f64 / 30.4).round() as u64)
    } else if days < 548 {
        "a year".to_string()
    } else {
        format!("{} years", (days as f64 / 365.0).round() as u64)
    };

    if future {
        format!("in {phrase}")
    } else {
        format!("{phrase} ago")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use opensky_client::PositionSource;

    fn now() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    fn ago(seconds: i64) -> String {
        relative_time(now() - Duration::seconds(seconds), now())
    }

    #[test]
    fn test_relative_time_ladder() {
        assert_eq!(ago(3), "a few seconds ago");
        assert_eq!(ago(60), "a minute ago");
        assert_eq!(ago(5 * 60), "5 minutes ago");
        assert_eq!(ago(50 * 60), "an hour ago");
        assert_eq!(ago(3 * 3600), "3 hours ago");
        assert_eq!(ago(26 * 3600), "a day ago");
        assert_eq!(ago(4 * 86_400), "4 days ago");
        assert_eq!(ago(-10), "in a few seconds");
    }

    #[test]
    fn test_feet_trim_trailing_zeros() {
        assert_eq!(altitude_text(3048.0), "10000 ft (3048 m)");
        assert_eq!(altitude_text(11277.6), "37000 ft (11277.6 m)");
        assert_eq!(altitude_text(1000.0), "3280.84 ft (1000 m)");
        assert_eq!(altitude_text(0.0), "0 ft (0 m)");
    }

    #[test]
    fn test_velocity_text() {
        assert_eq!(velocity_text(100.0), "100 m/s 360.00 km/h");
        assert_eq!(velocity_text(231.5), "231.5 m/s 833.40 km/h");
    }

    #[test]
    fn test_full_card() {
        let state = StateVector {
            icao24: "3c6444".to_string(),
            callsign: Some("DLH9LF  ".to_string()),
            origin_country: "Germany".to_string(),
            last_contact: 1_700_000_000 - 120,
            velocity: Some(200.0),
            geo_altitude: Some(3048.0),
            baro_altitude: Some(3000.0),
            vertical_rate: Some(-4.5),
            squawk: Some("1000".to_string()),
            position_source: PositionSource::Mlat,
            ..Default::default()
        };
        let card = FlightDetailCard::build(&state, "#ff9c00", 270.0, now());

        assert_eq!(card.icao24, "3c6444");
        assert_eq!(card.color, "#ff9c00");
        assert_eq!(card.value("Last Contact"), Some("2 minutes ago"));
        assert_eq!(card.value("Origin Country"), Some("Germany"));
        assert_eq!(card.value("Velocity"), Some("200 m/s 720.00 km/h"));
        assert_eq!(card.value("Geometric Altitude"), Some("10000 ft (3048 m)"));
        assert_eq!(card.value("Vertical Rate"), Some("-4.5"));
        assert_eq!(card.value("Squawk"), Some("1000"));
        assert_eq!(card.value("Position Source"), Some("MLAT"));
    }

    #[test]
    fn test_missing_values_render_dash() {
        let state = StateVector {
            icao24: "abc123".to_string(),
            last_contact: 1_700_000_000,
            ..Default::default()
        };
        let card = FlightDetailCard::build(&state, "#e3f2fd", 0.0, now());

        assert_eq!(card.value("Origin Country"), Some("-"));
        assert_eq!(card.value("Velocity"), Some("-"));
        assert_eq!(card.value("Barometric Altitude"), Some("-"));
        assert_eq!(card.value("Squawk"), Some("-"));
        assert_eq!(card.value("Position Source"), Some("ADS-B"));
    }

    #[test]
    fn test_display_lists_rows() {
        let state = StateVector {
            icao24: "abc123".to_string(),
            ..Default::default()
        };
        let text = FlightDetailCard::build(&state, "#ffffff", 45.0, now()).to_string();
        assert!(text.starts_with("abc123 [#ffffff @ 45\u{b0}]"));
        assert!(text.contains("Position Source"));
        assert_eq!(text.lines().count(), 10);
    }
}
