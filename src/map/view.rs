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

//! Map view lifecycle.
//!
//! A [`MapView`] owns everything that lives while the map is shown: the
//! renderer, the viewport poller and the detail poller of the selected
//! aircraft. Mounting starts the viewport poller; dropping the view (or
//! returning from [`MapView::run`]) cancels every poller it owns.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use log::{debug, info, warn};
use opensky_client::{
    resolve_symbol_layer, DetailPoller, DetailPollerConfig, FeatureCollection, FeatureProperties,
    PollEvent, PollResult, StateSource, StateVector, ViewportPoller, ViewportPollerConfig,
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::{MapEvent, MapRenderer};
use crate::detail::FlightDetailCard;
use crate::status::{SharedViewStatus, ViewStatus};

/// Timers of a [`MapView`].
#[derive(Debug, Clone)]
pub struct MapViewConfig {
    pub refresh_interval: Duration,
    pub detail_refresh_interval: Duration,
}

impl Default for MapViewConfig {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(12),
            detail_refresh_interval: Duration::from_secs(6),
        }
    }
}

/// Aircraft whose detail panel is open.
struct SelectedFlight {
    poller: DetailPoller,
    color: String,
    rotation: f64,
}

/// What woke the view loop up.
enum Wakeup {
    Poll(Option<PollEvent>),
    Detail(Option<StateVector>),
    Map(Option<MapEvent>),
    Cancelled,
}

/// A mounted map.
pub struct MapView<R: MapRenderer> {
    renderer: R,
    source: Arc<dyn StateSource>,
    poller: ViewportPoller,
    selected: Option<SelectedFlight>,
    detail_config: DetailPollerConfig,
    status: SharedViewStatus,
}

impl<R: MapRenderer> std::fmt::Debug for MapView<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapView")
            .field("poller", &self.poller)
            .field(
                "selected",
                &self.selected.as_ref().map(|s| s.poller.icao24().to_string()),
            )
            .finish_non_exhaustive()
    }
}

impl<R: MapRenderer> MapView<R> {
    /// Install the empty source and the symbol layer, then start polling the
    /// renderer's current viewport. Must be called from within a tokio runtime.
    pub fn mount(mut renderer: R, source: Arc<dyn StateSource>, config: &MapViewConfig) -> Self {
        let bounds = renderer.viewport_bounds();
        info!(
            "Mounting map at zoom {} over {:.3},{:.3} .. {:.3},{:.3}",
            renderer.zoom(),
            bounds.southern_latitude,
            bounds.western_longitude,
            bounds.northern_latitude,
            bounds.eastern_longitude
        );

        renderer.set_source_data(&FeatureCollection::default());
        renderer.set_symbol_layer(&resolve_symbol_layer(renderer.zoom()));
        renderer.set_loading(true);

        let poller = ViewportPoller::spawn(
            Arc::clone(&source),
            ViewportPollerConfig {
                bounds,
                interval: config.refresh_interval,
                ..Default::default()
            },
        );

        Self {
            renderer,
            source,
            poller,
            selected: None,
            detail_config: DetailPollerConfig {
                interval: config.detail_refresh_interval,
                ..Default::default()
            },
            status: ViewStatus::shared(),
        }
    }

    #[cfg(test)]
    fn status(&self) -> SharedViewStatus {
        Arc::clone(&self.status)
    }

    /// Drive the view until it is closed or `cancel` fires, then unmount and
    /// hand the renderer back.
    ///
    /// Dropping every event sender only ends user input; the map keeps
    /// refreshing until [`MapEvent::Closed`] or cancellation.
    pub async fn run(mut self, mut events: mpsc::Receiver<MapEvent>, cancel: CancellationToken) -> R {
        let mut input_open = true;
        loop {
            let wakeup = tokio::select! {
                event = self.poller.recv() => Wakeup::Poll(event),
                state = next_detail(&mut self.selected) => Wakeup::Detail(state),
                event = events.recv(), if input_open => Wakeup::Map(event),
                () = cancel.cancelled() => Wakeup::Cancelled,
            };

            match wakeup {
                Wakeup::Poll(Some(event)) => self.apply_poll_event(event),
                Wakeup::Detail(Some(state)) => self.show_detail(&state),
                Wakeup::Detail(None) => {
                    warn!("Detail poller stopped unexpectedly");
                    self.selected = None;
                }
                Wakeup::Map(None) => {
                    debug!("Map input closed");
                    input_open = false;
                }
                Wakeup::Map(Some(MapEvent::Closed)) | Wakeup::Poll(None) | Wakeup::Cancelled => break,
                Wakeup::Map(Some(event)) => self.apply_map_event(event),
            }
        }

        self.unmount()
    }

    /// Wait for the first finished poll, apply it and unmount.
    pub async fn refresh_once(mut self) -> R {
        while let Some(event) = self.poller.recv().await {
            let finished = matches!(event, PollEvent::Finished(_));
            self.apply_poll_event(event);
            if finished {
                break;
            }
        }
        self.unmount()
    }

    fn unmount(mut self) -> R {
        info!("Unmounting map");
        self.poller.shutdown();
        self.selected = None;
        if let Ok(status) = self.status.lock() {
            for diagnostic in &status.diagnostics {
                debug!(
                    "{} {:?}: {}",
                    diagnostic.timestamp.format("%H:%M:%S"),
                    diagnostic.level,
                    diagnostic.message
                );
            }
            info!("{}", status.summary());
        }
        self.renderer
    }

    fn apply_poll_event(&mut self, event: PollEvent) {
        match event {
            PollEvent::Started => {
                self.renderer.set_loading(true);
                self.update_status(ViewStatus::record_poll_started);
            }
            PollEvent::Finished(PollResult {
                flight_count,
                collection,
                ..
            }) => {
                self.renderer.set_flight_count(flight_count);
                if let Some(collection) = collection {
                    self.renderer.set_source_data(&collection);
                    self.renderer
                        .set_symbol_layer(&resolve_symbol_layer(self.renderer.zoom()));
                }
                self.renderer.set_loading(false);
                self.update_status(|status| status.record_poll(flight_count));
            }
        }
    }

    fn apply_map_event(&mut self, event: MapEvent) {
        match event {
            MapEvent::FeatureClicked(properties) => self.select(properties),
            MapEvent::MapClicked => {
                self.renderer.hide_flight_detail();
                if self.selected.take().is_some() {
                    debug!("Detail panel closed");
                }
                self.update_status(|status| status.select_flight(None));
            }
            MapEvent::ZoomChanged(zoom) => {
                self.renderer.set_zoom(zoom);
                self.renderer.set_symbol_layer(&resolve_symbol_layer(zoom));
                self.poller.set_bounds(self.renderer.viewport_bounds());
            }
            MapEvent::ViewportChanged(bounds) => {
                self.renderer.fit_bounds(bounds);
                self.poller.set_bounds(self.renderer.viewport_bounds());
            }
            MapEvent::Closed => {}
        }
    }

    fn select(&mut self, properties: FeatureProperties) {
        info!("Selected {} ({})", properties.callsign, properties.icao24);
        let icao24 = properties.icao24;

        // The new card only appears once its first state arrives.
        self.renderer.hide_flight_detail();

        // Replacing the selection drops, and so cancels, the previous poller.
        self.selected = Some(SelectedFlight {
            poller: DetailPoller::spawn(Arc::clone(&self.source), icao24.clone(), &self.detail_config),
            color: properties.color,
            rotation: properties.rotation,
        });
        self.update_status(|status| status.select_flight(Some(icao24)));
    }

    fn show_detail(&mut self, state: &StateVector) {
        let Some(selected) = &self.selected else {
            return;
        };
        let card = FlightDetailCard::build(state, &selected.color, selected.rotation, Utc::now());
        self.renderer.show_flight_detail(&card);
    }

    fn update_status(&self, update: impl FnOnce(&mut ViewStatus)) {
        if let Ok(mut status) = self.status.lock() {
            update(&mut status);
        }
    }
}

async fn next_detail(selected: &mut Option<SelectedFlight>) -> Option<StateVector> {
    match selected {
        Some(selected) => selected.poller.recv().await,
        None => std::future::pending().await,
    }
}
