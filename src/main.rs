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

mod config;
mod console;
mod detail;
mod map;
mod status;

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use log::{info, warn};
use opensky_client::OpenSkyClient;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use config::AppConfig;
use map::{GeoJsonFileRenderer, MapView, MapViewConfig};

#[derive(Parser, Debug)]
#[command(author, version, about = "Live flight map fed by the OpenSky Network")]
#[allow(clippy::struct_excessive_bools, reason = "independent CLI switches")]
struct Args {
    /// OpenSky API root
    #[arg(long)]
    base_url: Option<String>,
    /// Directory the map files are written to
    #[arg(long)]
    output_dir: Option<PathBuf>,
    /// Initial map center latitude
    #[arg(long, allow_hyphen_values = true)]
    lat: Option<f64>,
    /// Initial map center longitude
    #[arg(long, allow_hyphen_values = true)]
    lon: Option<f64>,
    /// Initial zoom level
    #[arg(long)]
    zoom: Option<f64>,
    /// Seconds between map refreshes
    #[arg(long)]
    refresh_secs: Option<u64>,
    /// Seconds between detail panel refreshes
    #[arg(long)]
    detail_refresh_secs: Option<u64>,
    /// Publish one refresh and exit
    #[arg(long, default_value_t = false)]
    once: bool,
    /// Store the effective settings in the config file
    #[arg(long, default_value_t = false)]
    save_config: bool,
    /// Print the config file location and exit
    #[arg(long, default_value_t = false)]
    print_config_path: bool,
    /// Debug logging
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

impl Args {
    /// Command line values override the config file.
    fn apply(&self, config: &mut AppConfig) {
        if let Some(base_url) = &self.base_url {
            config.base_url.clone_from(base_url);
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = Some(dir.clone());
        }
        if let Some(lat) = self.lat {
            config.center_latitude = lat;
        }
        if let Some(lon) = self.lon {
            config.center_longitude = lon;
        }
        if let Some(zoom) = self.zoom {
            config.default_zoom = zoom;
        }
        if let Some(secs) = self.refresh_secs {
            config.refresh_interval_secs = secs;
        }
        if let Some(secs) = self.detail_refresh_secs {
            config.detail_refresh_interval_secs = secs;
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_logging(args.verbose);

    if args.print_config_path {
        println!("{}", AppConfig::get_config_path()?.display());
        return Ok(());
    }

    let mut config = AppConfig::load().unwrap_or_else(|e| {
        warn!("Failed to load config, using defaults: {}", e);
        AppConfig::default()
    });
    args.apply(&mut config);

    if args.save_config {
        config.save()?;
        info!("Saved config to {}", AppConfig::get_config_path()?.display());
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(run(&config, args.once));

    // stdin reads park a blocking thread that would hold shutdown open
    runtime.shutdown_timeout(Duration::from_millis(250));
    result
}

async fn run(config: &AppConfig, once: bool) -> Result<(), Box<dyn Error>> {
    let client = OpenSkyClient::new(config.api_config())?;
    let renderer = GeoJsonFileRenderer::new(
        config.resolve_output_dir(),
        config.center_latitude,
        config.center_longitude,
        config.default_zoom,
        (config.viewport_width, config.viewport_height),
    )?;
    let published = renderer.published();

    let view = MapView::mount(
        renderer,
        Arc::new(client),
        &MapViewConfig {
            refresh_interval: config.refresh_interval(),
            detail_refresh_interval: config.detail_refresh_interval(),
        },
    );

    if once {
        let renderer = view.refresh_once().await;
        info!(
            "Wrote {} flights to {}",
            renderer.flight_count().unwrap_or(0),
            renderer.output_dir().display()
        );
        return Ok(());
    }

    let cancel = CancellationToken::new();
    let (event_tx, event_rx) = mpsc::channel(16);
    let console = console::spawn(event_tx, published, cancel.clone());

    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupted, shutting down");
            interrupt.cancel();
        }
    });

    let _renderer = view.run(event_rx, cancel.clone()).await;
    cancel.cancel();
    let _ = console.await;
    Ok(())
}
