//! Percentile band layers.

use crate::render::draw::common::{bucket_span, data_to_plot};
use crate::render::path::PathData;
use crate::render::scale::ScaleAdapter;
use crate::stats::BandBounds;

/// All buckets' rectangles for band `layer`, concatenated into one path.
/// Buckets without bounds (no samples) are skipped.
pub fn band_layer_path(
    bounds: &[Option<BandBounds>],
    layer: usize,
    scales: &ScaleAdapter,
) -> PathData {
    let mut path = PathData::new();
    for (bucket, per_band) in bounds.iter().enumerate() {
        let Some(&(lo, hi)) = per_band.as_ref().and_then(|b| b.get(layer)) else {
            continue;
        };
        let (x0, x1) = bucket_span(bucket);
        path.move_to(data_to_plot(x0, lo, scales))
            .line_to(data_to_plot(x0, hi, scales))
            .line_to(data_to_plot(x1, hi, scales))
            .line_to(data_to_plot(x1, lo, scales))
            .close();
    }
    path
}

/// One path per band layer, outermost first.
pub fn band_paths(
    bounds: &[Option<BandBounds>],
    layers: usize,
    scales: &ScaleAdapter,
) -> Vec<PathData> {
    (0..layers)
        .map(|layer| band_layer_path(bounds, layer, scales))
        .collect()
}
