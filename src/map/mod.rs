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

//! Map rendering boundary and view lifecycle.
//!
//! The map view talks to its renderer only through [`MapRenderer`]; user
//! interaction comes back as [`MapEvent`]s. This module also provides the
//! headless GeoJSON file renderer and Web Mercator viewport utilities.

pub mod geojson_file;
pub mod projection;
pub mod view;

pub use geojson_file::GeoJsonFileRenderer;
pub use view::{MapView, MapViewConfig};

use opensky_client::{FeatureCollection, FeatureProperties, MapGeoBounds, SymbolLayer};

use crate::detail::FlightDetailCard;

/// Capabilities the map view needs from a renderer.
pub trait MapRenderer {
    /// Geographic rectangle currently visible.
    fn viewport_bounds(&self) -> MapGeoBounds;

    fn zoom(&self) -> f64;

    fn set_zoom(&mut self, zoom: f64);

    /// Move the viewport to show `bounds`.
    fn fit_bounds(&mut self, bounds: MapGeoBounds);

    /// Install or replace the point data source.
    fn set_source_data(&mut self, collection: &FeatureCollection);

    /// Install or replace the aircraft symbol layer.
    fn set_symbol_layer(&mut self, layer: &SymbolLayer);

    /// Toggle the loading indicator.
    fn set_loading(&mut self, loading: bool);

    /// Number of flights in the last poll, `None` when it returned no data.
    fn set_flight_count(&mut self, count: Option<usize>);

    fn show_flight_detail(&mut self, card: &FlightDetailCard);

    fn hide_flight_detail(&mut self);
}

/// User interaction reported by the renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    /// A symbol was clicked; carries the clicked feature's attributes.
    FeatureClicked(FeatureProperties),
    /// The map was clicked away from any symbol.
    MapClicked,
    ZoomChanged(f64),
    ViewportChanged(MapGeoBounds),
    /// The view is being closed.
    Closed,
}
