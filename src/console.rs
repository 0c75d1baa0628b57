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

//! Line based stand-in for pointer interaction with the map.
//!
//! ```text
//! zoom <level>
//! pan <south> <west> <north> <east>
//! click <icao24 | feature-id>
//! clear
//! quit
//! ```

use log::{debug, info, warn};
use opensky_client::{FeatureCollection, MapGeoBounds};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::map::geojson_file::PublishedCollection;
use crate::map::MapEvent;

pub const USAGE: &str =
    "commands: zoom <level> | pan <south> <west> <north> <east> | click <icao24|id> | clear | quit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Zoom(f64),
    Pan(MapGeoBounds),
    /// Feature id or icao24 of the symbol to click.
    Click(String),
    Clear,
    Quit,
}

pub fn parse_command(line: &str) -> Result<Command, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Err(USAGE.to_string());
    };
    let args: Vec<&str> = words.collect();

    match (verb.to_ascii_lowercase().as_str(), args.as_slice()) {
        ("zoom", [level]) => level
            .parse()
            .map(Command::Zoom)
            .map_err(|e| format!("invalid zoom level {level:?}: {e}")),
        ("pan", [south, west, north, east]) => {
            let mut values = [0.0; 4];
            for (slot, text) in values.iter_mut().zip([south, west, north, east]) {
                *slot = text
                    .parse()
                    .map_err(|e| format!("invalid coordinate {text:?}: {e}"))?;
            }
            let [south, west, north, east] = values;
            if south > north || west > east {
                return Err("pan bounds must be south west north east".to_string());
            }
            Ok(Command::Pan(MapGeoBounds::new(south, west, north, east)))
        }
        ("click", [target]) => Ok(Command::Click((*target).to_string())),
        ("clear", []) => Ok(Command::Clear),
        ("quit" | "exit", []) => Ok(Command::Quit),
        _ => Err(USAGE.to_string()),
    }
}

/// Turn a command into a map event, resolving clicks against the collection
/// currently on the map.
pub fn to_event(command: Command, published: &FeatureCollection) -> Result<MapEvent, String> {
    Ok(match command {
        Command::Zoom(level) => MapEvent::ZoomChanged(level),
        Command::Pan(bounds) => MapEvent::ViewportChanged(bounds),
        Command::Click(target) => {
            let feature = published
                .get(&target)
                .or_else(|| published.get_by_icao(&target))
                .ok_or_else(|| format!("no flight {target} on the map"))?;
            MapEvent::FeatureClicked(feature.properties.clone())
        }
        Command::Clear => MapEvent::MapClicked,
        Command::Quit => MapEvent::Closed,
    })
}

/// Read commands from stdin until EOF, `quit` or cancellation.
pub fn spawn(
    events: mpsc::Sender<MapEvent>,
    published: PublishedCollection,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        info!("{}", USAGE);

        loop {
            let line = tokio::select! {
                line = lines.next_line() => line,
                () = cancel.cancelled() => return,
            };

            let line = match line {
                Ok(Some(line)) => line,
                Ok(None) => {
                    debug!("Console input closed");
                    return;
                }
                Err(e) => {
                    warn!("Console read error: {}", e);
                    return;
                }
            };

            if line.trim().is_empty() {
                continue;
            }

            let event = parse_command(&line).and_then(|command| match published.read() {
                Ok(collection) => to_event(command, &collection),
                Err(_) => Err("map data unavailable".to_string()),
            });

            match event {
                Ok(event) => {
                    let closing = event == MapEvent::Closed;
                    if events.send(event).await.is_err() || closing {
                        return;
                    }
                }
                Err(message) => warn!("{}", message),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use opensky_client::protocol::StateVectorSet;
    use opensky_client::{build_feature_collection, StateVector};

    fn published() -> FeatureCollection {
        let set = StateVectorSet {
            time: 1_700_000_000,
            states: vec![
                StateVector {
                    icao24: "aaa111".to_string(),
                    callsign: Some("KLM12".to_string()),
                    longitude: Some(4.7),
                    latitude: Some(52.3),
                    ..Default::default()
                },
                StateVector {
                    icao24: "bbb222".to_string(),
                    longitude: Some(2.5),
                    latitude: Some(49.0),
                    ..Default::default()
                },
            ],
        };
        build_feature_collection(Some(&set)).unwrap()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command("zoom 8.5"), Ok(Command::Zoom(8.5)));
        assert_eq!(
            parse_command("pan 40 -5 44 0"),
            Ok(Command::Pan(MapGeoBounds::new(40.0, -5.0, 44.0, 0.0)))
        );
        assert_eq!(parse_command("  click  aaa111 "), Ok(Command::Click("aaa111".to_string())));
        assert_eq!(parse_command("CLEAR"), Ok(Command::Clear));
        assert_eq!(parse_command("quit"), Ok(Command::Quit));
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(parse_command("").is_err());
        assert!(parse_command("zoom").is_err());
        assert!(parse_command("zoom high").is_err());
        assert!(parse_command("pan 44 0 40 -5").is_err());
        assert!(parse_command("fly aaa111").is_err());
    }

    #[test]
    fn test_click_resolves_by_id_or_icao() {
        let collection = published();

        let by_id = to_event(Command::Click("1.bbb222".to_string()), &collection).unwrap();
        let MapEvent::FeatureClicked(properties) = by_id else {
            panic!("expected a feature click");
        };
        assert_eq!(properties.icao24, "bbb222");

        let by_icao = to_event(Command::Click("AAA111".to_string()), &collection).unwrap();
        let MapEvent::FeatureClicked(properties) = by_icao else {
            panic!("expected a feature click");
        };
        assert_eq!(properties.callsign, "KLM12");

        assert!(to_event(Command::Click("ccc333".to_string()), &collection).is_err());
    }

    #[test]
    fn test_other_commands_map_to_events() {
        let collection = FeatureCollection::default();
        assert_eq!(to_event(Command::Zoom(3.0), &collection), Ok(MapEvent::ZoomChanged(3.0)));
        assert_eq!(to_event(Command::Clear, &collection), Ok(MapEvent::MapClicked));
        assert_eq!(to_event(Command::Quit, &collection), Ok(MapEvent::Closed));
    }
}
