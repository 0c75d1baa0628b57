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

//! Map wide refresh bounded to the current viewport.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info};
use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::api::{MapGeoBounds, StateSource};
use crate::features::{build_feature_collection, FeatureCollection};
use crate::protocol::StateVectorSet;

/// Configuration for [`ViewportPoller`].
#[derive(Debug, Clone)]
pub struct ViewportPollerConfig {
    /// Bounds of the first poll.
    pub bounds: MapGeoBounds,
    /// Time between polls. The first poll runs immediately.
    pub interval: Duration,
    /// Channel buffer size for poll events.
    pub buffer_size: usize,
}

impl Default for ViewportPollerConfig {
    fn default() -> Self {
        Self {
            bounds: MapGeoBounds::default(),
            interval: Duration::from_secs(12),
            buffer_size: 16,
        }
    }
}

/// Outcome of one poll cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct PollResult {
    /// Bounds the poll was made with.
    pub bounds: MapGeoBounds,
    /// Number of state vectors returned, `None` when there was no data.
    pub flight_count: Option<usize>,
    /// Complete collection to publish, `None` when there was no data.
    pub collection: Option<FeatureCollection>,
}

/// Events emitted by the poller.
#[derive(Debug, Clone, PartialEq)]
pub enum PollEvent {
    /// A poll is about to hit the network.
    Started,
    /// A poll finished, successfully or not.
    Finished(PollResult),
}

/// Handle to the background viewport poll task.
///
/// Every tick fetches the state vectors inside the latest bounds, builds the
/// feature collection and emits it as one [`PollEvent::Finished`]. A failed
/// poll emits a result without a collection; nothing is retried before the
/// next tick.
pub struct ViewportPoller {
    event_rx: mpsc::Receiver<PollEvent>,
    bounds_tx: watch::Sender<MapGeoBounds>,
    cancel_token: CancellationToken,
}

impl std::fmt::Debug for ViewportPoller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewportPoller")
            .field("bounds", &*self.bounds_tx.borrow())
            .field("cancel_token", &self.cancel_token)
            .finish_non_exhaustive()
    }
}

impl ViewportPoller {
    /// Spawn the poll task. Must be called from within a tokio runtime.
    #[must_use]
    pub fn spawn(source: Arc<dyn StateSource>, config: ViewportPollerConfig) -> Self {
        let (event_tx, event_rx) = mpsc::channel(config.buffer_size);
        let (bounds_tx, bounds_rx) = watch::channel(config.bounds);
        let cancel_token = CancellationToken::new();

        let task_cancel = cancel_token.clone();
        let interval = config.interval;

        tokio::spawn(async move {
            poll_loop(source, event_tx, bounds_rx, task_cancel, interval).await;
        });

        Self {
            event_rx,
            bounds_tx,
            cancel_token,
        }
    }

    /// Receive the next poll event.
    ///
    /// Returns `None` once the poller has been shut down.
    pub async fn recv(&mut self) -> Option<PollEvent> {
        self.event_rx.recv().await
    }

    /// Bounds used from the next poll on.
    pub fn set_bounds(&self, bounds: MapGeoBounds) {
        self.bounds_tx.send_replace(bounds);
    }

    #[must_use]
    pub fn current_bounds(&self) -> MapGeoBounds {
        *self.bounds_tx.borrow()
    }

    /// Stop polling.
    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }

    #[must_use]
    pub fn is_shut_down(&self) -> bool {
        self.cancel_token.is_cancelled()
    }
}

impl Drop for ViewportPoller {
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}

async fn poll_loop(
    source: Arc<dyn StateSource>,
    event_tx: mpsc::Sender<PollEvent>,
    bounds_rx: watch::Receiver<MapGeoBounds>,
    cancel_token: CancellationToken,
    interval: Duration,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            () = cancel_token.cancelled() => {
                info!("Viewport poller cancelled");
                return;
            }
        }

        if event_tx.send(PollEvent::Started).await.is_err() {
            return; // Receiver dropped
        }

        let bounds = *bounds_rx.borrow();
        let states = tokio::select! {
            states = source.fetch_states_in_bounds(bounds) => states,
            () = cancel_token.cancelled() => {
                info!("Viewport poller cancelled during fetch");
                return;
            }
        };

        let flight_count = states.as_ref().map(StateVectorSet::len);
        let collection = build_feature_collection(states.as_ref());
        match flight_count {
            Some(count) => debug!("Poll returned {} flights", count),
            None => debug!("Poll returned no data"),
        }

        let result = PollResult {
            bounds,
            flight_count,
            collection,
        };
        if event_tx.send(PollEvent::Finished(result)).await.is_err() {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poller::testing::FakeSource;
    use crate::protocol::StateVector;

    fn set_with(icao: &[&str]) -> StateVectorSet {
        StateVectorSet {
            time: 1_700_000_000,
            states: icao
                .iter()
                .map(|id| StateVector {
                    icao24: (*id).to_string(),
                    longitude: Some(4.76),
                    latitude: Some(52.31),
                    ..Default::default()
                })
                .collect(),
        }
    }

    async fn next_result(poller: &mut ViewportPoller) -> PollResult {
        assert_eq!(poller.recv().await, Some(PollEvent::Started));
        match poller.recv().await {
            Some(PollEvent::Finished(result)) => result,
            other => panic!("expected finished poll, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_poll_is_immediate() {
        let source = Arc::new(FakeSource::with_sets(vec![Some(set_with(&["aaa111", "bbb222"]))]));
        let mut poller = ViewportPoller::spawn(source.clone(), ViewportPollerConfig::default());

        let result = next_result(&mut poller).await;
        assert_eq!(result.flight_count, Some(2));
        assert_eq!(result.collection.map(|c| c.len()), Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_absent_and_empty_results() {
        let source = Arc::new(FakeSource::with_sets(vec![None, Some(StateVectorSet::default())]));
        let mut poller = ViewportPoller::spawn(source, ViewportPollerConfig::default());

        let absent = next_result(&mut poller).await;
        assert!(absent.flight_count.is_none());
        assert!(absent.collection.is_none());

        let empty = next_result(&mut poller).await;
        assert_eq!(empty.flight_count, Some(0));
        assert_eq!(empty.collection, Some(FeatureCollection::default()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_bounds_change_applies_to_next_poll() {
        let source = Arc::new(FakeSource::default());
        let initial = MapGeoBounds::new(50.0, 3.0, 54.0, 8.0);
        let moved = MapGeoBounds::new(40.0, -5.0, 44.0, 0.0);
        let mut poller = ViewportPoller::spawn(
            source.clone(),
            ViewportPollerConfig {
                bounds: initial,
                ..Default::default()
            },
        );

        assert_eq!(next_result(&mut poller).await.bounds, initial);
        poller.set_bounds(moved);
        assert_eq!(poller.current_bounds(), moved);
        assert_eq!(next_result(&mut poller).await.bounds, moved);
        assert_eq!(*source.bounds_seen.lock().unwrap(), vec![initial, moved]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_polling() {
        let source = Arc::new(FakeSource::default());
        let mut poller = ViewportPoller::spawn(source.clone(), ViewportPollerConfig::default());
        next_result(&mut poller).await;
        drop(poller);

        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(source.bounds_seen.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_closes_event_stream() {
        let source = Arc::new(FakeSource::default());
        let mut poller = ViewportPoller::spawn(source, ViewportPollerConfig::default());
        next_result(&mut poller).await;
        poller.shutdown();
        assert!(poller.is_shut_down());
        assert_eq!(poller.recv().await, None);
    }
}
