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

//! Zoom dependent symbol layer configuration.
//!
//! The layer is reinstalled whenever the zoom changes or the data source is
//! refreshed. Layout and paint serialize to Mapbox GL style-spec JSON.

use serde::Serialize;
use serde_json::{json, Value};

/// Id of the aircraft symbol layer.
pub const FLIGHT_LAYER_ID: &str = "flight-layer";
/// Id of the point data source the layer draws from.
pub const FLIGHT_SOURCE_ID: &str = "flight-source";

const LABEL_MIN_ZOOM: f64 = 7.0;
const MEDIUM_ICON_MIN_ZOOM: f64 = 6.0;
const LARGE_ICON_MIN_ZOOM: f64 = 8.0;

const BASE_ICON_SIZE: f64 = 1.0;
const MEDIUM_ICON_SIZE: f64 = 1.2;
const LARGE_ICON_SIZE: f64 = 1.5;

/// `["get", property]` style expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Get(pub &'static str);

impl Serialize for Get {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ("get", self.0).serialize(serializer)
    }
}

/// Label anchor relative to the icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAnchor {
    Top,
    Center,
}

/// Symbol layout properties.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct SymbolLayout {
    pub icon_image: Get,
    pub icon_allow_overlap: bool,
    pub icon_rotate: Get,
    pub icon_size: f64,
    /// `format` expression when labels are shown, `""` otherwise.
    pub text_field: Value,
    pub text_optional: bool,
    pub text_allow_overlap: bool,
    pub text_anchor: TextAnchor,
    pub text_offset: [f64; 2],
}

impl SymbolLayout {
    #[must_use]
    pub fn shows_labels(&self) -> bool {
        self.text_field != Value::String(String::new())
    }
}

/// Symbol paint properties.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct SymbolPaint {
    pub icon_color: Get,
    pub text_color: Get,
    pub text_halo_width: f64,
    pub text_halo_color: &'static str,
    pub text_halo_blur: f64,
}

impl Default for SymbolPaint {
    fn default() -> Self {
        Self {
            icon_color: Get("color"),
            text_color: Get("color"),
            text_halo_width: 2.0,
            text_halo_color: "#000",
            text_halo_blur: 2.0,
        }
    }
}

/// Complete symbol layer definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SymbolLayer {
    pub id: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub source: &'static str,
    pub layout: SymbolLayout,
    pub paint: SymbolPaint,
}

/// Whether labels are drawn at this zoom.
#[must_use]
pub fn labels_visible(zoom: f64) -> bool {
    zoom > LABEL_MIN_ZOOM
}

/// Icon scale for a zoom level.
///
/// The large size is checked after the medium one and can never be picked;
/// in practice there are two sizes, 1.0 and 1.2.
#[must_use]
pub fn icon_size(zoom: f64) -> f64 {
    if zoom > MEDIUM_ICON_MIN_ZOOM {
        MEDIUM_ICON_SIZE
    } else if zoom > LARGE_ICON_MIN_ZOOM {
        LARGE_ICON_SIZE
    } else {
        BASE_ICON_SIZE
    }
}

/// Three line label: callsign, then altitude and velocity in smaller white text.
#[must_use]
pub fn label_text() -> Value {
    json!([
        "format",
        ["get", "callsign"], {"font-scale": 1.0},
        "\n", {},
        ["get", "altitude"], {"font-scale": 0.75, "text-color": "#fff"},
        "\n", {},
        ["get", "velocity"], {"font-scale": 0.75, "text-color": "#fff"}
    ])
}

/// Layout for the aircraft symbol layer at `zoom`.
#[must_use]
pub fn symbol_layout(zoom: f64) -> SymbolLayout {
    let show_text = labels_visible(zoom);

    SymbolLayout {
        icon_image: Get("iconName"),
        icon_allow_overlap: true,
        icon_rotate: Get("rotation"),
        icon_size: icon_size(zoom),
        text_field: if show_text {
            label_text()
        } else {
            Value::String(String::new())
        },
        text_optional: true,
        text_allow_overlap: true,
        text_anchor: if show_text {
            TextAnchor::Top
        } else {
            TextAnchor::Center
        },
        text_offset: if show_text { [0.0, 1.0] } else { [0.0, 0.0] },
    }
}

/// Resolve the full symbol layer for `zoom`.
#[must_use]
pub fn resolve_symbol_layer(zoom: f64) -> SymbolLayer {
    SymbolLayer {
        id: FLIGHT_LAYER_ID,
        kind: "symbol",
        source: FLIGHT_SOURCE_ID,
        layout: symbol_layout(zoom),
        paint: SymbolPaint::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_only_above_zoom_seven() {
        assert!(!labels_visible(7.0));
        assert!(labels_visible(7.01));

        let hidden = symbol_layout(5.0);
        assert!(!hidden.shows_labels());
        assert_eq!(hidden.text_anchor, TextAnchor::Center);
        assert_eq!(hidden.text_offset, [0.0, 0.0]);

        let shown = symbol_layout(9.0);
        assert!(shown.shows_labels());
        assert_eq!(shown.text_anchor, TextAnchor::Top);
        assert_eq!(shown.text_offset, [0.0, 1.0]);
    }

    #[test]
    fn test_icon_size_has_two_outcomes() {
        assert_eq!(icon_size(3.0), 1.0);
        assert_eq!(icon_size(6.0), 1.0);
        assert_eq!(icon_size(6.5), 1.2);
        assert_eq!(icon_size(9.0), 1.2);
        assert_eq!(icon_size(18.0), 1.2);
    }

    #[test]
    fn test_label_text_lines() {
        let text = label_text();
        assert_eq!(text[0], "format");
        assert_eq!(text[1], json!(["get", "callsign"]));
        assert_eq!(text[5], json!(["get", "altitude"]));
        assert_eq!(text[6]["text-color"], "#fff");
        assert_eq!(text[9], json!(["get", "velocity"]));
    }

    #[test]
    fn test_layer_serializes_to_style_spec() {
        let value = serde_json::to_value(resolve_symbol_layer(8.0)).unwrap();
        assert_eq!(value["id"], "flight-layer");
        assert_eq!(value["type"], "symbol");
        assert_eq!(value["source"], "flight-source");
        assert_eq!(value["layout"]["icon-image"], json!(["get", "iconName"]));
        assert_eq!(value["layout"]["icon-rotate"], json!(["get", "rotation"]));
        assert_eq!(value["layout"]["icon-size"], 1.2);
        assert_eq!(value["layout"]["text-anchor"], "top");
        assert_eq!(value["paint"]["icon-color"], json!(["get", "color"]));
        assert_eq!(value["paint"]["text-halo-color"], "#000");
        assert_eq!(value["paint"]["text-halo-width"], 2.0);
    }

    #[test]
    fn test_hidden_label_is_empty_string() {
        let value = serde_json::to_value(symbol_layout(4.0)).unwrap();
        assert_eq!(value["text-field"], "");
    }
}
