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

use async_trait::async_trait;
use log::{debug, warn};

use super::{ApiConfig, ApiError, Credentials, MapGeoBounds, StateSource};
use crate::protocol::{decode_response, StateVector, StateVectorResponse, StateVectorSet};

/// HTTP client for the OpenSky `states/all` endpoint.
#[derive(Debug, Clone)]
pub struct OpenSkyClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Option<Credentials>,
}

impl OpenSkyClient {
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("opensky-client/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            credentials: config.credentials,
        })
    }

    /// Endpoint every query goes to.
    #[must_use]
    pub fn states_url(&self) -> String {
        format!("{}/states/all", self.base_url)
    }

    async fn get_states(&self, query: &[(&str, String)]) -> Result<StateVectorResponse, ApiError> {
        let mut request = self.http.get(self.states_url()).query(query);
        if let Some(credentials) = &self.credentials {
            request = request.basic_auth(&credentials.username, Some(&credentials.password));
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status));
        }

        Ok(response.json::<StateVectorResponse>().await?)
    }

    /// State vectors inside `bounds`.
    ///
    /// `Ok(None)` means the API answered but had no `states` list.
    pub async fn states_in_bounds(
        &self,
        bounds: &MapGeoBounds,
    ) -> Result<Option<StateVectorSet>, ApiError> {
        let response = self.get_states(&bounds.query()).await?;
        let states = decode_response(response);
        debug!(
            "Fetched {} state vectors in bounds",
            states.as_ref().map_or(0, StateVectorSet::len)
        );
        Ok(states)
    }

    /// Current state of one aircraft, the first vector of the response.
    pub async fn state_of(&self, icao24: &str) -> Result<Option<StateVector>, ApiError> {
        let response = self
            .get_states(&[("icao24", icao24.to_ascii_lowercase())])
            .await?;
        Ok(decode_response(response).and_then(|set| set.states.into_iter().next()))
    }
}

#[async_trait]
impl StateSource for OpenSkyClient {
    async fn fetch_states_in_bounds(&self, bounds: MapGeoBounds) -> Option<StateVectorSet> {
        match self.states_in_bounds(&bounds).await {
            Ok(states) => states,
            Err(e) => {
                warn!("State vector poll failed: {}", e);
                None
            }
        }
    }

    async fn fetch_state_of(&self, icao24: &str) -> Option<StateVector> {
        match self.state_of(icao24).await {
            Ok(state) => state,
            Err(e) => {
                warn!("Flight detail request for {} failed: {}", icao24, e);
                None
            }
        }
    }
}
