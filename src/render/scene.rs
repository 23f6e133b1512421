//! Styled, serializable output handed to whatever draws the chart.

use serde::Serialize;

use crate::core::{ChartMode, Color};
use crate::render::path::PathData;
use crate::stats::ErrorMarker;

/// One drawable layer: SVG path text plus the presentation attributes a
/// renderer needs.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StyledPath {
    pub class: String,
    pub d: PathData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f32>,
}

impl StyledPath {
    pub fn filled(class: String, d: PathData, fill: Color) -> Self {
        Self {
            class,
            d,
            fill: Some(fill.to_css()),
            stroke: None,
            stroke_width: None,
        }
    }

    pub fn stroked(class: String, d: PathData, stroke: Color, width: f32) -> Self {
        Self {
            class,
            d,
            fill: Some("transparent".to_owned()),
            stroke: Some(stroke.to_css()),
            stroke_width: Some(width),
        }
    }
}

/// Error layer of a scene, depending on the error mode.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ErrorOutput {
    /// Error wedges are disabled (radius 0).
    None,
    /// Invalid-fraction wedges in one path.
    Path { path: StyledPath },
    /// One marker per missing sample, plus the circles drawn for them.
    Markers {
        markers: Vec<ErrorMarker>,
        path: StyledPath,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SmokeScene {
    pub mode: ChartMode,
    pub buckets: usize,
    /// Outermost band first. Empty in flame mode.
    pub bands: Vec<StyledPath>,
    pub lines: Vec<StyledPath>,
    pub errors: ErrorOutput,
}

/// Element class for `base`, namespaced by the chart's instance id if any.
pub fn class_name(base: &str, instance_id: Option<&str>) -> String {
    match instance_id {
        Some(id) => format!("{base} {base}-{id}"),
        None => base.to_owned(),
    }
}
