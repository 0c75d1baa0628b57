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

//! OpenSky client library for live flight maps.
//!
//! This library polls the OpenSky Network state-vector API and turns the
//! result into symbol features a map renderer can draw. It is split into
//! layers that can be used independently:
//!
//! - **Protocol layer**: lenient decoding of the 17-element positional state
//!   vector arrays into typed records
//! - **Feature layer**: display attributes (icon, rotation, altitude color,
//!   labels) and the GeoJSON feature collection built from one poll
//! - **Style layer**: zoom dependent symbol layer layout and paint
//! - **API layer**: HTTP client with Basic authentication
//! - **Poller layer**: viewport and detail refresh timers with cancellation
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use opensky_client::{ApiConfig, MapGeoBounds, OpenSkyClient, PollEvent, ViewportPoller, ViewportPollerConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = OpenSkyClient::new(ApiConfig::default()).unwrap();
//!     let mut poller = ViewportPoller::spawn(
//!         Arc::new(client),
//!         ViewportPollerConfig {
//!             bounds: MapGeoBounds::new(45.8, 5.9, 47.8, 10.5),
//!             ..Default::default()
//!         },
//!     );
//!
//!     while let Some(event) = poller.recv().await {
//!         if let PollEvent::Finished(result) = event {
//!             println!("{:?} flights", result.flight_count);
//!         }
//!     }
//! }
//! ```
//!
//! # Using Individual Layers
//!
//! ```
//! use opensky_client::protocol::{decode_response, StateVectorResponse};
//! use opensky_client::features::build_feature_collection;
//! use opensky_client::style::resolve_symbol_layer;
//!
//! let response: StateVectorResponse = serde_json::from_str(
//!     r#"{"time": 1700000000, "states": [["4b1814", "SWR123  ", "Switzerland", 1700000000,
//!         1700000000, 8.55, 47.45, 1200.0, false, 95.0, 275.0, 6.5, null, 1250.0, "1000",
//!         false, 0]]}"#,
//! ).unwrap();
//!
//! let states = decode_response(response);
//! let collection = build_feature_collection(states.as_ref()).unwrap();
//! let layer = resolve_symbol_layer(9.0);
//!
//! assert_eq!(collection.len(), 1);
//! assert_eq!(collection.features[0].properties.callsign, "SWR123");
//! assert!(layer.layout.shows_labels());
//! ```

pub mod api;
pub mod features;
pub mod poller;
pub mod protocol;
pub mod style;

pub use api::{ApiConfig, ApiError, Credentials, MapGeoBounds, OpenSkyClient, StateSource};
pub use features::{
    build_feature_collection, derive_properties, Feature, FeatureCollection, FeatureProperties,
    FlightIcon,
};
pub use poller::{
    DetailPoller, DetailPollerConfig, PollEvent, PollResult, ViewportPoller, ViewportPollerConfig,
};
pub use protocol::{PositionSource, StateVector, StateVectorResponse, StateVectorSet};
pub use style::{resolve_symbol_layer, SymbolLayer};
