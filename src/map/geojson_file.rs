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

//! Headless renderer that publishes the map state as files.
//!
//! Each published collection replaces `flights.geojson` in one step (write to
//! a temporary sibling, then rename), so an external map client watching the
//! directory never sees a partially written source. The symbol layer goes to
//! `flight-layer.json` and the open detail card to `flight-detail.json`.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use log::{debug, error, info};
use opensky_client::{FeatureCollection, MapGeoBounds, SymbolLayer};
use serde::Serialize;

use super::projection::WebMercator;
use super::MapRenderer;
use crate::detail::FlightDetailCard;

pub const SOURCE_FILE: &str = "flights.geojson";
pub const LAYER_FILE: &str = "flight-layer.json";
pub const DETAIL_FILE: &str = "flight-detail.json";

/// Last published collection, readable from other tasks.
pub type PublishedCollection = Arc<RwLock<FeatureCollection>>;

/// [`MapRenderer`] writing GeoJSON and style JSON into a directory.
pub struct GeoJsonFileRenderer {
    output_dir: PathBuf,
    center: (f64, f64),
    zoom: f64,
    viewport_size: (u32, u32),
    bounds: MapGeoBounds,
    published: PublishedCollection,
    loading: bool,
    flight_count: Option<usize>,
    detail_open: bool,
}

impl std::fmt::Debug for GeoJsonFileRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeoJsonFileRenderer")
            .field("output_dir", &self.output_dir)
            .field("zoom", &self.zoom)
            .field("bounds", &self.bounds)
            .field("loading", &self.loading)
            .field("flight_count", &self.flight_count)
            .finish_non_exhaustive()
    }
}

impl GeoJsonFileRenderer {
    /// Create the renderer, creating `output_dir` if needed.
    pub fn new(
        output_dir: impl Into<PathBuf>,
        center_latitude: f64,
        center_longitude: f64,
        zoom: f64,
        viewport_size: (u32, u32),
    ) -> io::Result<Self> {
        let output_dir = output_dir.into();
        std::fs::create_dir_all(&output_dir)?;
        info!("Publishing map files to {}", output_dir.display());

        let bounds = WebMercator::viewport_bounds(
            center_latitude,
            center_longitude,
            zoom,
            viewport_size.0,
            viewport_size.1,
        );

        Ok(Self {
            output_dir,
            center: (center_latitude, center_longitude),
            zoom,
            viewport_size,
            bounds,
            published: Arc::new(RwLock::new(FeatureCollection::default())),
            loading: false,
            flight_count: None,
            detail_open: false,
        })
    }

    /// Shared handle to the last published collection.
    #[must_use]
    pub fn published(&self) -> PublishedCollection {
        Arc::clone(&self.published)
    }

    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    #[must_use]
    pub fn flight_count(&self) -> Option<usize> {
        self.flight_count
    }

    fn write_json<T: Serialize + ?Sized>(&self, file_name: &str, value: &T) {
        let path = self.output_dir.join(file_name);
        if let Err(e) = write_atomic(&path, value) {
            error!("Failed to write {}: {}", path.display(), e);
        }
    }

    fn recompute_bounds(&mut self) {
        self.bounds = WebMercator::viewport_bounds(
            self.center.0,
            self.center.1,
            self.zoom,
            self.viewport_size.0,
            self.viewport_size.1,
        );
    }
}

fn write_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> io::Result<()> {
    let json = serde_json::to_vec_pretty(value).map_err(io::Error::other)?;
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, json)?;
    std::fs::rename(&tmp, path)
}

impl MapRenderer for GeoJsonFileRenderer {
    fn viewport_bounds(&self) -> MapGeoBounds {
        self.bounds
    }

    fn zoom(&self) -> f64 {
        self.zoom
    }

    fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom;
        self.recompute_bounds();
    }

    fn fit_bounds(&mut self, bounds: MapGeoBounds) {
        self.center = WebMercator::center_of(&bounds);
        self.bounds = bounds;
    }

    fn set_source_data(&mut self, collection: &FeatureCollection) {
        self.write_json(SOURCE_FILE, collection);
        match self.published.write() {
            Ok(mut published) => published.clone_from(collection),
            Err(e) => error!("Published collection lock poisoned: {}", e),
        }
        debug!("Published {} features", collection.len());
    }

    fn set_symbol_layer(&mut self, layer: &SymbolLayer) {
        self.write_json(LAYER_FILE, layer);
    }

    fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    fn set_flight_count(&mut self, count: Option<usize>) {
        self.flight_count = count;
        match count {
            Some(count) => info!("{} flights in view", count),
            None => info!("No flight data for this refresh"),
        }
    }

    fn show_flight_detail(&mut self, card: &FlightDetailCard) {
        self.write_json(DETAIL_FILE, card);
        self.detail_open = true;
        info!("\n{}", card);
    }

    fn hide_flight_detail(&mut self) {
        if !self.detail_open {
            return;
        }
        self.detail_open = false;
        let path = self.output_dir.join(DETAIL_FILE);
        if let Err(e) = std::fs::remove_file(&path) {
            if e.kind() != io::ErrorKind::NotFound {
                error!("Failed to remove {}: {}", path.display(), e);
            }
        }
    }
}
