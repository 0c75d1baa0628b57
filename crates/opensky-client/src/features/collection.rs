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

//! GeoJSON feature collection handed to the renderer's data source.
//!
//! A collection is built fresh from every poll and replaces the previous one
//! wholesale; there is no diffing between polls.

use log::debug;
use serde::{Deserialize, Serialize};

use super::{derive_properties, FeatureProperties};
use crate::protocol::StateVectorSet;

/// GeoJSON point geometry, `[longitude, latitude]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub struct Point {
    pub coordinates: [f64; 2],
}

impl Point {
    #[must_use]
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            coordinates: [longitude, latitude],
        }
    }

    #[must_use]
    pub fn longitude(&self) -> f64 {
        self.coordinates[0]
    }

    #[must_use]
    pub fn latitude(&self) -> f64 {
        self.coordinates[1]
    }
}

/// One aircraft symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub struct Feature {
    /// `"{index}.{icao24}"`, where index is the position in this poll.
    pub id: String,
    pub geometry: Point,
    pub properties: FeatureProperties,
}

/// GeoJSON `FeatureCollection` of aircraft symbols.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Find a feature by its feature id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Feature> {
        self.features.iter().find(|f| f.id == id)
    }

    /// Find the feature of an aircraft by ICAO address.
    #[must_use]
    pub fn get_by_icao(&self, icao24: &str) -> Option<&Feature> {
        self.features
            .iter()
            .find(|f| f.properties.icao24.eq_ignore_ascii_case(icao24))
    }
}

/// Feature id for the vector at `index` of the current poll.
#[must_use]
pub fn feature_id(index: usize, icao24: &str) -> String {
    format!("{index}.{icao24}")
}

/// Build the renderable collection for one poll.
///
/// Returns `None` when there is no poll result, so the renderer keeps whatever
/// it shows. Vectors without a position are skipped; a result with no usable
/// vectors yields an empty collection, which clears the layer.
#[must_use]
pub fn build_feature_collection(states: Option<&StateVectorSet>) -> Option<FeatureCollection> {
    let states = states?;

    let features: Vec<Feature> = states
        .states
        .iter()
        .enumerate()
        .filter_map(|(index, state)| {
            let (Some(longitude), Some(latitude)) = (state.longitude, state.latitude) else {
                return None;
            };
            Some(Feature {
                id: feature_id(index, &state.icao24),
                geometry: Point::new(longitude, latitude),
                properties: derive_properties(state),
            })
        })
        .collect();

    debug!(
        "Built {} features from {} state vectors",
        features.len(),
        states.len()
    );

    Some(FeatureCollection { features })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::StateVector;

    fn vector(icao24: &str, position: Option<(f64, f64)>) -> StateVector {
        StateVector {
            icao24: icao24.to_string(),
            longitude: position.map(|p| p.0),
            latitude: position.map(|p| p.1),
            geo_altitude: Some(3_000.0),
            velocity: Some(200.0),
            true_track: Some(45.0),
            ..Default::default()
        }
    }

    fn sample_set() -> StateVectorSet {
        let mut no_latitude = vector("bbb222", Some((2.0, 48.0)));
        no_latitude.latitude = None;
        StateVectorSet {
            time: 1_700_000_000,
            states: vec![
                vector("aaa111", Some((-0.45, 51.47))),
                no_latitude,
                vector("ccc333", Some((13.29, 52.36))),
            ],
        }
    }

    #[test]
    fn test_missing_position_is_skipped() {
        let collection = build_feature_collection(Some(&sample_set())).unwrap();
        assert_eq!(collection.len(), 2);
    }

    #[test]
    fn test_feature_ids_use_poll_index() {
        let collection = build_feature_collection(Some(&sample_set())).unwrap();
        let ids: Vec<_> = collection.features.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, ["0.aaa111", "2.ccc333"]);
    }

    #[test]
    fn test_geometry_is_lon_lat() {
        let collection = build_feature_collection(Some(&sample_set())).unwrap();
        let first = &collection.features[0];
        assert_eq!(first.geometry.longitude(), -0.45);
        assert_eq!(first.geometry.latitude(), 51.47);
    }

    #[test]
    fn test_absent_set_is_no_collection() {
        assert!(build_feature_collection(None).is_none());
    }

    #[test]
    fn test_no_usable_vectors_is_empty_collection() {
        let set = StateVectorSet {
            time: 1,
            states: vec![vector("aaa111", None)],
        };
        let collection = build_feature_collection(Some(&set)).unwrap();
        assert!(collection.is_empty());

        let empty = build_feature_collection(Some(&StateVectorSet::default())).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_serializes_as_geojson() {
        let collection = build_feature_collection(Some(&sample_set())).unwrap();
        let value = serde_json::to_value(&collection).unwrap();
        assert_eq!(value["type"], "FeatureCollection");
        assert_eq!(value["features"][0]["type"], "Feature");
        assert_eq!(value["features"][0]["id"], "0.aaa111");
        assert_eq!(value["features"][0]["geometry"]["type"], "Point");
        assert_eq!(value["features"][0]["geometry"]["coordinates"][1], 51.47);
        assert_eq!(value["features"][0]["properties"]["callsign"], "aaa111");
    }

    #[test]
    fn test_rebuild_is_byte_identical() {
        let set = sample_set();
        let first = serde_json::to_string(&build_feature_collection(Some(&set))).unwrap();
        let second = serde_json::to_string(&build_feature_collection(Some(&set))).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_lookup_by_id_and_icao() {
        let collection = build_feature_collection(Some(&sample_set())).unwrap();
        assert!(collection.get("2.ccc333").is_some());
        assert!(collection.get("1.bbb222").is_none());
        assert_eq!(
            collection.get_by_icao("AAA111").map(|f| f.id.as_str()),
            Some("0.aaa111")
        );
    }
}
