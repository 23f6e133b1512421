//! Percentile band bounds and the stock band/flame layouts.

use error_stack::Report;

use crate::core::BandSpec;
use crate::stats::quantile::{check_fraction, quantile};
use crate::{Result, SmokeError};

/// Concrete (low, high) sample values for each band of one bucket, in band
/// order.
pub type BandBounds = Vec<(f64, f64)>;

/// Bounds of every band for one sorted bucket; `None` when the bucket has no
/// samples and must not be drawn.
pub fn band_bounds(sorted: &[f64], bands: &[BandSpec]) -> Result<Option<BandBounds>> {
    if sorted.is_empty() {
        return Ok(None);
    }
    bands
        .iter()
        .map(|band| {
            let low = quantile(sorted, band.low())?;
            let high = quantile(sorted, band.high())?;
            Ok(low.zip(high))
        })
        .collect::<Result<Option<BandBounds>>>()
}

/// Band bounds for every bucket of a cleaned matrix.
pub fn matrix_bounds(rows: &[Vec<f64>], bands: &[BandSpec]) -> Result<Vec<Option<BandBounds>>> {
    rows.iter().map(|row| band_bounds(row, bands)).collect()
}

// Nested symmetrically around the median, widest first.
const BAND_PRESETS: [&[(f64, f64)]; 6] = [
    &[],
    &[(0.0, 1.0)],
    &[(0.0, 1.0), (0.25, 0.75)],
    &[(0.0, 1.0), (0.15, 0.85), (0.3, 0.7)],
    &[(0.0, 1.0), (0.1, 0.9), (0.2, 0.8), (0.3, 0.7)],
    &[(0.0, 1.0), (0.1, 0.9), (0.2, 0.8), (0.3, 0.7), (0.4, 0.6)],
];

const FLAME_PRESETS: [&[f64]; 6] = [
    &[],
    &[0.5],
    &[0.5, 0.75],
    &[0.5, 0.7, 0.9],
    &[0.4, 0.55, 0.7, 0.85],
    &[0.5, 0.6, 0.7, 0.8, 0.9],
];

/// Stock layout with `count` bands (0..=5).
pub fn band_preset(count: usize) -> Result<Vec<BandSpec>> {
    let preset = BAND_PRESETS
        .get(count)
        .ok_or_else(|| Report::new(SmokeError::InvalidPreset(count)))?;
    Ok(preset
        .iter()
        .map(|&(low, high)| BandSpec::preset(low, high))
        .collect())
}

/// Quantile fractions drawn as separate lines in flame mode (0..=5 lines).
pub fn flame_preset(count: usize) -> Result<Vec<f64>> {
    FLAME_PRESETS
        .get(count)
        .map(|fractions| fractions.to_vec())
        .ok_or_else(|| Report::new(SmokeError::InvalidPreset(count)))
}

/// Validate user-supplied `[low, high]` pairs into band specs.
pub fn bands_from_pairs(pairs: &[[f64; 2]]) -> Result<Vec<BandSpec>> {
    pairs
        .iter()
        .enumerate()
        .map(|(idx, &[low, high])| {
            BandSpec::new(low, high).map_err(|r| r.attach(format!("percentile pair #{idx}")))
        })
        .collect()
}

/// Validate flame fractions.
pub fn check_fractions(fractions: &[f64]) -> Result<()> {
    fractions.iter().try_for_each(|&q| check_fraction(q))
}
