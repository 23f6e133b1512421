//! Stepped quantile lines.

use glam::DVec2;

use crate::render::draw::common::bucket_span;
use crate::render::path::PathData;
use crate::render::scale::ScaleAdapter;

/// Data-space vertices of a stepped line: `(i, v)` and `(i + 1, v)` for every
/// bucket with a value, a single `None` for every bucket without one.
pub fn line_points(values: &[Option<f64>]) -> Vec<Option<DVec2>> {
    values
        .iter()
        .enumerate()
        .flat_map(|(bucket, value)| {
            let (x0, x1) = bucket_span(bucket);
            match *value {
                Some(v) => vec![Some(DVec2::new(x0, v)), Some(DVec2::new(x1, v))],
                None => vec![None],
            }
        })
        .collect()
}

/// Scaled line through `line_points`. Each gap ends the current sub-path; the
/// next defined bucket starts a new one with `M`.
pub fn line_path(values: &[Option<f64>], scales: &ScaleAdapter) -> PathData {
    let mut path = PathData::new();
    let mut pen_down = false;
    for point in line_points(values) {
        match point {
            Some(p) if pen_down => {
                path.line_to(scales.map_point(p));
            }
            Some(p) => {
                path.move_to(scales.map_point(p));
                pen_down = true;
            }
            None => pen_down = false,
        }
    }
    path
}
