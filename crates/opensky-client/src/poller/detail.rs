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

//! Refresh of the selected aircraft's detail panel.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::api::StateSource;
use crate::protocol::StateVector;

/// Configuration for [`DetailPoller`].
#[derive(Debug, Clone)]
pub struct DetailPollerConfig {
    /// Time between refreshes. The first fetch runs immediately.
    pub interval: Duration,
    /// Channel buffer size for updates.
    pub buffer_size: usize,
}

impl Default for DetailPollerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(6),
            buffer_size: 4,
        }
    }
}

/// Handle to the background refresh of one aircraft.
///
/// Absent results are not reported, so the last good state stays on screen.
/// Selecting another aircraft means dropping this handle and spawning a new
/// one; the old timer stops with the handle.
pub struct DetailPoller {
    icao24: String,
    update_rx: mpsc::Receiver<StateVector>,
    cancel_token: CancellationToken,
}

impl std::fmt::Debug for DetailPoller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DetailPoller")
            .field("icao24", &self.icao24)
            .field("cancel_token", &self.cancel_token)
            .finish_non_exhaustive()
    }
}

impl DetailPoller {
    /// Spawn the refresh task for `icao24`. Must be called from within a tokio runtime.
    #[must_use]
    pub fn spawn(source: Arc<dyn StateSource>, icao24: String, config: &DetailPollerConfig) -> Self {
        let (update_tx, update_rx) = mpsc::channel(config.buffer_size);
        let cancel_token = CancellationToken::new();

        let task_cancel = cancel_token.clone();
        let task_icao = icao24.clone();
        let interval = config.interval;

        tokio::spawn(async move {
            refresh_loop(source, task_icao, update_tx, task_cancel, interval).await;
        });

        Self {
            icao24,
            update_rx,
            cancel_token,
        }
    }

    /// Aircraft this poller follows.
    #[must_use]
    pub fn icao24(&self) -> &str {
        &self.icao24
    }

    /// Receive the next state of the followed aircraft.
    ///
    /// Returns `None` once the poller has been shut down.
    pub async fn recv(&mut self) -> Option<StateVector> {
        self.update_rx.recv().await
    }

    /// Stop refreshing.
    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}

impl Drop for DetailPoller {
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}

async fn refresh_loop(
    source: Arc<dyn StateSource>,
    icao24: String,
    update_tx: mpsc::Sender<StateVector>,
    cancel_token: CancellationToken,
    interval: Duration,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            () = cancel_token.cancelled() => {
                info!("Detail poller for {} cancelled", icao24);
                return;
            }
        }

        let state = tokio::select! {
            state = source.fetch_state_of(&icao24) => state,
            () = cancel_token.cancelled() => return,
        };

        let Some(state) = state else {
            debug!("No detail data for {}", icao24);
            continue;
        };

        if update_tx.send(state).await.is_err() {
            return; // Receiver dropped
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poller::testing::FakeSource;

    fn state(icao24: &str, velocity: f64) -> StateVector {
        StateVector {
            icao24: icao24.to_string(),
            velocity: Some(velocity),
            ..Default::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetches_immediately_then_on_interval() {
        let source = Arc::new(FakeSource::with_details(vec![
            Some(state("abc123", 100.0)),
            Some(state("abc123", 110.0)),
        ]));
        let mut poller =
            DetailPoller::spawn(source.clone(), "abc123".to_string(), &DetailPollerConfig::default());

        assert_eq!(poller.icao24(), "abc123");
        assert_eq!(poller.recv().await.unwrap().velocity, Some(100.0));
        assert_eq!(poller.recv().await.unwrap().velocity, Some(110.0));
        assert_eq!(*source.icao_seen.lock().unwrap(), vec!["abc123", "abc123"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_absent_results_are_skipped() {
        let source = Arc::new(FakeSource::with_details(vec![
            None,
            None,
            Some(state("abc123", 120.0)),
        ]));
        let mut poller =
            DetailPoller::spawn(source.clone(), "abc123".to_string(), &DetailPollerConfig::default());

        assert_eq!(poller.recv().await.unwrap().velocity, Some(120.0));
        assert_eq!(source.icao_seen.lock().unwrap().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_stops_refresh() {
        let source = Arc::new(FakeSource::with_details(vec![Some(state("abc123", 1.0))]));
        let mut poller =
            DetailPoller::spawn(source.clone(), "abc123".to_string(), &DetailPollerConfig::default());
        poller.recv().await.unwrap();
        drop(poller);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(source.icao_seen.lock().unwrap().len(), 1);
    }
}
