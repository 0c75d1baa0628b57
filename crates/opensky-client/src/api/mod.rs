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

//! OpenSky REST API access.
//!
//! [`OpenSkyClient`] reports transport, status and body failures as
//! [`ApiError`]. The [`StateSource`] trait is the seam the pollers use; it
//! absorbs every failure into `None` so a failed poll simply means "no data".

mod client;

pub use client::OpenSkyClient;

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::protocol::{StateVector, StateVectorSet};

/// Public OpenSky API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://opensky-network.org/api";

/// Errors returned by [`OpenSkyClient`].
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API responded with status {0}")]
    Status(reqwest::StatusCode),
}

/// Geographic rectangle currently visible on the map, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MapGeoBounds {
    pub northern_latitude: f64,
    pub eastern_longitude: f64,
    pub southern_latitude: f64,
    pub western_longitude: f64,
}

impl MapGeoBounds {
    #[must_use]
    pub fn new(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self {
            northern_latitude: north,
            eastern_longitude: east,
            southern_latitude: south,
            western_longitude: west,
        }
    }

    /// Query parameters of the bounded `states/all` request.
    #[must_use]
    pub fn query(&self) -> [(&'static str, String); 4] {
        [
            ("lamin", self.southern_latitude.to_string()),
            ("lomin", self.western_longitude.to_string()),
            ("lamax", self.northern_latitude.to_string()),
            ("lomax", self.eastern_longitude.to_string()),
        ]
    }

    /// Whether a point lies inside the bounds.
    #[must_use]
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        (self.southern_latitude..=self.northern_latitude).contains(&latitude)
            && (self.western_longitude..=self.eastern_longitude).contains(&longitude)
    }
}

/// HTTP Basic credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Configuration for [`OpenSkyClient`].
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// API root, e.g. `https://opensky-network.org/api`.
    pub base_url: String,
    /// Basic authentication; anonymous access when `None`.
    pub credentials: Option<Credentials>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            credentials: None,
            timeout: Duration::from_secs(10),
        }
    }
}

/// Source of state vectors for the pollers.
///
/// Implementations never fail: transport errors, bad statuses and a missing
/// `states` list all come back as `None`.
#[async_trait]
pub trait StateSource: Send + Sync {
    /// All state vectors inside `bounds`.
    async fn fetch_states_in_bounds(&self, bounds: MapGeoBounds) -> Option<StateVectorSet>;

    /// Current state vector of a single aircraft.
    async fn fetch_state_of(&self, icao24: &str) -> Option<StateVector>;
}
