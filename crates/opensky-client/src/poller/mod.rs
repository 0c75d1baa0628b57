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

//! Timer driven polling tasks.
//!
//! Each poller runs in its own background task and hands results back over a
//! channel, so the owner applies them on its own event loop. Pollers cancel
//! their task on [`Drop`], which ties a poll timer to the lifetime of whatever
//! view holds the handle.

mod detail;
mod viewport;

pub use detail::{DetailPoller, DetailPollerConfig};
pub use viewport::{PollEvent, PollResult, ViewportPoller, ViewportPollerConfig};
