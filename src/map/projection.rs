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

use opensky_client::MapGeoBounds;

/// World width in pixels at zoom 0 (Mapbox GL uses 512 px tiles).
const TILE_SIZE: f64 = 512.0;
/// Latitude limit of the Web Mercator projection.
pub const MAX_LATITUDE: f64 = 85.051_128_78;

/// Web Mercator projection utilities
#[derive(Debug)]
pub struct WebMercator;

impl WebMercator {
    /// Convert latitude to Web Mercator Y coordinate in tiles
    pub fn lat_to_y(lat: f64, zoom: f64) -> f64 {
        let lat_rad = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
        let n = zoom.exp2();
        let y = (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / std::f64::consts::PI) / 2.0;
        y * n
    }

    /// Convert longitude to Web Mercator X coordinate in tiles
    pub fn lon_to_x(lon: f64, zoom: f64) -> f64 {
        let n = zoom.exp2();
        ((lon + 180.0) / 360.0) * n
    }

    /// Convert tile coordinates back to latitude
    pub fn tile_to_lat(y: f64, zoom: f64) -> f64 {
        let n = zoom.exp2();
        let lat_rad = ((std::f64::consts::PI * (1.0 - 2.0 * y / n)).sinh()).atan();
        lat_rad.to_degrees()
    }

    /// Convert tile coordinates back to longitude
    pub fn tile_to_lon(x: f64, zoom: f64) -> f64 {
        let n = zoom.exp2();
        x / n * 360.0 - 180.0
    }

    /// Bounds visible in a `width` x `height` pixel viewport centered on
    /// (`lat`, `lon`) at `zoom`, clamped to the projectable world.
    pub fn viewport_bounds(lat: f64, lon: f64, zoom: f64, width: u32, height: u32) -> MapGeoBounds {
        let half_w = f64::from(width) / TILE_SIZE / 2.0;
        let half_h = f64::from(height) / TILE_SIZE / 2.0;

        let cx = Self::lon_to_x(lon, zoom);
        let cy = Self::lat_to_y(lat, zoom);

        MapGeoBounds {
            northern_latitude: Self::tile_to_lat(cy - half_h, zoom).min(MAX_LATITUDE),
            southern_latitude: Self::tile_to_lat(cy + half_h, zoom).max(-MAX_LATITUDE),
            western_longitude: Self::tile_to_lon(cx - half_w, zoom).max(-180.0),
            eastern_longitude: Self::tile_to_lon(cx + half_w, zoom).min(180.0),
        }
    }

    /// Center (lat, lon) of a bounds rectangle in projected space
    pub fn center_of(bounds: &MapGeoBounds) -> (f64, f64) {
        let zoom = 0.0;
        let y = (Self::lat_to_y(bounds.northern_latitude, zoom)
            + Self::lat_to_y(bounds.southern_latitude, zoom))
            / 2.0;
        let lon = (bounds.western_longitude + bounds.eastern_longitude) / 2.0;
        (Self::tile_to_lat(y, zoom), lon)
    }
}
