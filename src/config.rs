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

//! Application configuration management.
//!
//! Configuration is stored as TOML through `confy`. Missing keys fall back to
//! serde defaults, so older files keep loading as new settings are added.
//! OpenSky credentials may also come from the environment, which takes
//! precedence over the file.

use std::path::PathBuf;
use std::time::Duration;

use opensky_client::api::DEFAULT_BASE_URL;
use opensky_client::{ApiConfig, Credentials};
use serde::{Deserialize, Serialize};

const APP_NAME: &str = "opensky-map";
const CONFIG_NAME: &str = "config";

pub const USERNAME_ENV: &str = "OPENSKY_USERNAME";
pub const PASSWORD_ENV: &str = "OPENSKY_PASSWORD";

/// Application configuration stored in TOML format
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    /// Configuration schema version
    #[serde(default = "default_config_version")]
    pub config_version: u32,

    /// OpenSky API root
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// OpenSky account name (env var takes precedence)
    #[serde(default)]
    pub username: Option<String>,

    /// OpenSky account password (env var takes precedence)
    #[serde(default)]
    pub password: Option<String>,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Initial map center latitude
    #[serde(default = "default_center_latitude")]
    pub center_latitude: f64,

    /// Initial map center longitude
    #[serde(default = "default_center_longitude")]
    pub center_longitude: f64,

    /// Initial map zoom level
    #[serde(default = "default_zoom")]
    pub default_zoom: f64,

    /// Viewport width in pixels, used to derive the polled bounds
    #[serde(default = "default_viewport_width")]
    pub viewport_width: u32,

    /// Viewport height in pixels
    #[serde(default = "default_viewport_height")]
    pub viewport_height: u32,

    /// Seconds between map refreshes
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,

    /// Seconds between refreshes of the selected flight's details
    #[serde(default = "default_detail_refresh_interval_secs")]
    pub detail_refresh_interval_secs: u64,

    /// Directory the map source and layer files are written to
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

// Default value functions for serde
fn default_config_version() -> u32 {
    1
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_center_latitude() -> f64 {
    49.724_997
}

fn default_center_longitude() -> f64 {
    4.077_882_8
}

fn default_zoom() -> f64 {
    4.0
}

fn default_viewport_width() -> u32 {
    1400
}

fn default_viewport_height() -> u32 {
    800
}

fn default_refresh_interval_secs() -> u64 {
    12
}

fn default_detail_refresh_interval_secs() -> u64 {
    6
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_version: default_config_version(),
            base_url: default_base_url(),
            username: None,
            password: None,
            request_timeout_secs: default_request_timeout_secs(),
            center_latitude: default_center_latitude(),
            center_longitude: default_center_longitude(),
            default_zoom: default_zoom(),
            viewport_width: default_viewport_width(),
            viewport_height: default_viewport_height(),
            refresh_interval_secs: default_refresh_interval_secs(),
            detail_refresh_interval_secs: default_detail_refresh_interval_secs(),
            output_dir: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from disk, creating it with defaults on first run
    pub fn load() -> Result<Self, confy::ConfyError> {
        confy::load(APP_NAME, CONFIG_NAME)
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<(), confy::ConfyError> {
        confy::store(APP_NAME, CONFIG_NAME, self)
    }

    /// Get the config file path for display to user
    pub fn get_config_path() -> Result<PathBuf, confy::ConfyError> {
        confy::get_configuration_file_path(APP_NAME, CONFIG_NAME)
    }

    /// Resolve credentials from environment variables or config
    pub fn resolve_credentials(&self) -> Option<Credentials> {
        let from_env = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());

        let username = from_env(USERNAME_ENV).or_else(|| self.username.clone().filter(|s| !s.is_empty()))?;
        let password = from_env(PASSWORD_ENV).or_else(|| self.password.clone()).unwrap_or_default();

        Some(Credentials { username, password })
    }

    /// API client configuration
    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            base_url: self.base_url.clone(),
            credentials: self.resolve_credentials(),
            timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.max(1))
    }

    pub fn detail_refresh_interval(&self) -> Duration {
        Duration::from_secs(self.detail_refresh_interval_secs.max(1))
    }

    /// Output directory, defaulting to the user's cache directory
    pub fn resolve_output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(|| PathBuf::from(".cache"))
                .join(APP_NAME)
        })
    }
}
