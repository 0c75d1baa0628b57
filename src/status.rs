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

use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Diagnostic message with timestamp
#[derive(Debug, Clone)]
pub struct DiagnosticMessage {
    pub timestamp: DateTime<Utc>,
    pub level: DiagnosticLevel,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DiagnosticLevel {
    Info,
    Warning,
}

/// Running statistics of one map view
#[derive(Debug)]
pub struct ViewStatus {
    /// Polls that finished, with or without data
    pub polls_completed: u64,

    /// Polls that produced no data (failure or absent result)
    pub polls_without_data: u64,

    /// Flight count of the last poll, `None` when it had no data
    pub last_flight_count: Option<usize>,

    /// Last time a collection was published
    pub last_refresh: Option<DateTime<Utc>>,

    pub loading: bool,

    /// icao24 of the aircraft whose detail panel is open
    pub selected_flight: Option<String>,

    // Diagnostic messages (keep last 50)
    pub diagnostics: VecDeque<DiagnosticMessage>,
    max_diagnostics: usize,
}

pub type SharedViewStatus = Arc<Mutex<ViewStatus>>;

impl Default for ViewStatus {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewStatus {
    pub fn new() -> Self {
        Self {
            polls_completed: 0,
            polls_without_data: 0,
            last_flight_count: None,
            last_refresh: None,
            loading: false,
            selected_flight: None,
            diagnostics: VecDeque::with_capacity(50),
            max_diagnostics: 50,
        }
    }

    #[must_use]
    pub fn shared() -> SharedViewStatus {
        Arc::new(Mutex::new(Self::new()))
    }

    pub fn record_poll_started(&mut self) {
        self.loading = true;
    }

    /// Record a finished poll
    pub fn record_poll(&mut self, flight_count: Option<usize>) {
        self.polls_completed += 1;
        self.loading = false;
        self.last_flight_count = flight_count;

        match flight_count {
            Some(_) => self.last_refresh = Some(Utc::now()),
            None => {
                self.polls_without_data += 1;
                self.add_diagnostic(DiagnosticLevel::Warning, "Poll returned no data".to_string());
            }
        }
    }

    pub fn select_flight(&mut self, icao24: Option<String>) {
        if let Some(icao24) = &icao24 {
            self.add_diagnostic(DiagnosticLevel::Info, format!("Following {icao24}"));
        }
        self.selected_flight = icao24;
    }

    /// Add a diagnostic message
    pub fn add_diagnostic(&mut self, level: DiagnosticLevel, message: String) {
        let diagnostic = DiagnosticMessage {
            timestamp: Utc::now(),
            level,
            message,
        };

        self.diagnostics.push_back(diagnostic);

        // Keep only the last N messages
        while self.diagnostics.len() > self.max_diagnostics {
            self.diagnostics.pop_front();
        }
    }

    /// One line summary for the shutdown log
    pub fn summary(&self) -> String {
        let flights = self
            .last_flight_count
            .map_or_else(|| "no data".to_string(), |n| format!("{n} flights"));
        let refreshed = self
            .last_refresh
            .map_or_else(|| "never".to_string(), |at| at.format("%H:%M:%S UTC").to_string());
        let pending = if self.loading { ", refresh pending" } else { "" };
        let following = self
            .selected_flight
            .as_ref()
            .map_or_else(String::new, |icao24| format!(", following {icao24}"));
        format!(
            "{} polls ({} without data), last: {}, last published: {}{}{}",
            self.polls_completed, self.polls_without_data, flights, refreshed, pending, following
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poll_accounting() {
        let mut status = ViewStatus::new();
        status.record_poll_started();
        assert!(status.loading);

        status.record_poll(Some(12));
        assert!(!status.loading);
        assert!(status.last_refresh.is_some());

        status.record_poll(None);
        assert_eq!(status.polls_completed, 2);
        assert_eq!(status.polls_without_data, 1);
        assert_eq!(status.last_flight_count, None);
        assert!(status
            .summary()
            .starts_with("2 polls (1 without data), last: no data, last published: "));
        assert!(!status.summary().ends_with("refresh pending"));
    }

    #[test]
    fn test_diagnostics_are_bounded() {
        let mut status = ViewStatus::new();
        for i in 0..60 {
            status.add_diagnostic(DiagnosticLevel::Info, format!("message {i}"));
        }
        assert_eq!(status.diagnostics.len(), 50);
        assert_eq!(status.diagnostics.front().unwrap().message, "message 10");
    }

    #[test]
    fn test_selection() {
        let mut status = ViewStatus::new();
        status.select_flight(Some("abc123".to_string()));
        assert_eq!(status.selected_flight.as_deref(), Some("abc123"));
        assert_eq!(status.diagnostics.back().unwrap().level, DiagnosticLevel::Info);
        assert!(status.summary().ends_with(", following abc123"));
        status.select_flight(None);
        assert!(status.selected_flight.is_none());
    }
}
