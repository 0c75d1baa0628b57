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

//! End to end: wire response to published feature collection.

use opensky_client::features::ON_GROUND_COLOR;
use opensky_client::protocol::{decode_response, StateVectorResponse};
use opensky_client::{build_feature_collection, FlightIcon};

const RESPONSE: &str = r#"{
  "time": 1700000000,
  "states": [
    ["a0b1c2", "DAL402  ", "United States", 1699999990, 1699999999, -84.43, 33.64, 450.0,
     false, 80.0, 150.0, 5.0, null, 500.0, "2301", false, 0],
    ["a1b2c3", "", "United States", 1699999990, 1699999999, -84.40, 33.70, 600.0,
     false, 70.0, 50.0, -5.0, null, null, null, false, 0],
    ["a2b3c4", "SWA88   ", "United States", 1699999990, 1699999999, -84.20, null, 11000.0,
     false, 240.0, 270.0, 0.0, null, 11100.0, null, false, 0],
    ["a3b4c5", "N123AB  ", "United States", 1699999990, 1699999999, -84.42, 33.63, null,
     true, 0.0, 90.0, null, null, null, null, false, 0],
    ["a4b5c6", "UAL1    ", "United States", 1699999990, 1699999999, -84.10, 33.90, 13500.0,
     false, 250.0, 77.0, 10.0, [1, 2], 13600.0, "1200", false, 1]
  ]
}"#;

fn collection() -> opensky_client::FeatureCollection {
    let response: StateVectorResponse = serde_json::from_str(RESPONSE).unwrap();
    let states = decode_response(response);
    build_feature_collection(states.as_ref()).unwrap()
}

#[test]
fn test_unplaceable_vectors_are_dropped() {
    let collection = collection();
    let ids: Vec<_> = collection.features.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(ids, ["0.a0b1c2", "1.a1b2c3", "3.a3b4c5", "4.a4b5c6"]);
}

#[test]
fn test_derived_attributes() {
    let collection = collection();

    let takeoff = collection.get("0.a0b1c2").unwrap();
    assert_eq!(takeoff.properties.icon_name, FlightIcon::TakeoffFlipped);
    assert_eq!(takeoff.properties.rotation, 150.0);
    assert_eq!(takeoff.properties.callsign, "DAL402");
    assert_eq!(takeoff.properties.altitude, "500 m");

    let landing = collection.get("1.a1b2c3").unwrap();
    assert_eq!(landing.properties.icon_name, FlightIcon::Land);
    assert_eq!(landing.properties.rotation, 0.0);
    assert_eq!(landing.properties.callsign, "a1b2c3");
    // no geometric altitude, barometric fallback
    assert_eq!(landing.properties.altitude, "600 m");

    let ground = collection.get("3.a3b4c5").unwrap();
    assert_eq!(ground.properties.color, ON_GROUND_COLOR);
    assert_eq!(ground.properties.velocity, "0 km/h");

    let cruise = collection.get("4.a4b5c6").unwrap();
    assert_eq!(cruise.properties.color, "#00ff00");
    assert_eq!(cruise.properties.rotation, 0.0);
    assert_eq!(cruise.properties.icon_name, FlightIcon::Flight);
}

#[test]
fn test_pipeline_is_deterministic() {
    let first = serde_json::to_vec(&collection()).unwrap();
    let second = serde_json::to_vec(&collection()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_null_states_publishes_nothing() {
    let response: StateVectorResponse =
        serde_json::from_str(r#"{"time": 1700000000, "states": null}"#).unwrap();
    let states = decode_response(response);
    assert!(states.is_none());
    assert!(build_feature_collection(states.as_ref()).is_none());
}
