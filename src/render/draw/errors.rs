//! Error wedges and stacked shortfall markers.
//!
//! Both live in screen space vertically: only X goes through a scale.

use std::f64::consts::{PI, TAU};

use glam::DVec2;

use crate::core::MarkerStack;
use crate::render::path::PathData;
use crate::render::scale::ScaleAdapter;
use crate::stats::ErrorMarker;

/// Closed circle of `radius` around `center`, drawn as two half arcs.
pub fn marker_circle(path: &mut PathData, center: DVec2, radius: f64) {
    let top = center - DVec2::new(0.0, radius);
    let bottom = center + DVec2::new(0.0, radius);
    path.move_to(top)
        .arc_to(radius, false, true, bottom)
        .arc_to(radius, false, true, top)
        .close();
}

/// Pie wedge for one bucket, clockwise from twelve o'clock, sweeping
/// `ratio` of a full turn. Empty for a ratio or radius of 0.
pub fn error_wedge(x: f64, baseline: f64, radius: f64, ratio: f64) -> PathData {
    let mut path = PathData::new();
    if !(ratio > 0.0 && radius > 0.0) {
        return path;
    }
    path.move_to(DVec2::new(x, baseline))
        .vertical_line_by(-radius);
    if ratio >= 1.0 {
        path.arc_to(radius, false, true, DVec2::new(x, baseline + radius))
            .arc_to(radius, false, true, DVec2::new(x, baseline - radius));
    } else {
        let sweep = TAU * ratio;
        let end = DVec2::new(x + radius * sweep.sin(), baseline - radius * sweep.cos());
        path.arc_to(radius, sweep > PI, true, end);
    }
    path.close();
    path
}

/// All wedges of a chart in one path; wedge `i` is centred on the scaled
/// left edge of bucket `i`.
pub fn error_path(ratios: &[f64], radius: f64, baseline: f64, scales: &ScaleAdapter) -> PathData {
    ratios
        .iter()
        .enumerate()
        .fold(PathData::new(), |mut path, (bucket, &ratio)| {
            let wedge = error_wedge(scales.map_x(bucket as f64), baseline, radius, ratio);
            path.append(&wedge);
            path
        })
}

/// One circle per shortfall marker, stacked downwards by `err_pos`.
pub fn shortfall_marker_path(markers: &[ErrorMarker], stack: &MarkerStack) -> PathData {
    let mut path = PathData::new();
    if stack.radius <= 0.0 {
        return path;
    }
    for marker in markers {
        let center = DVec2::new(marker.x, stack.center_y(marker.err_pos));
        marker_circle(&mut path, center, stack.radius);
    }
    path
}
