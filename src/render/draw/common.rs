//! Shared helpers for the path emitters.

use glam::DVec2;

use crate::render::scale::ScaleAdapter;

/// X extent of bucket `bucket` in data space. Buckets are left-aligned: bucket
/// `i` covers `[i, i + 1]`.
#[inline]
pub fn bucket_span(bucket: usize) -> (f64, f64) {
    let x0 = bucket as f64;
    (x0, x0 + 1.0)
}

/// Map a data-space point into plot coordinates.
#[inline]
pub fn data_to_plot(x: f64, y: f64, scales: &ScaleAdapter) -> DVec2 {
    scales.map_point(DVec2::new(x, y))
}
