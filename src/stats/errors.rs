//! Error accounting per bucket, in either of the two chart modes.

use serde::{Deserialize, Serialize};

use crate::core::ErrorMode;
use crate::stats::clean::ErrorStat;

/// One missing sample, stacked `err_pos` deep above bucket position `x`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ErrorMarker {
    pub x: f64,
    #[serde(rename = "errPos")]
    pub err_pos: usize,
}

/// Share of invalid samples in each bucket; 0 for buckets with no samples.
pub fn invalid_fractions(stats: &[ErrorStat]) -> Vec<f64> {
    stats
        .iter()
        .map(|s| {
            if s.total == 0 {
                0.0
            } else {
                s.invalid as f64 / s.total as f64
            }
        })
        .collect()
}

/// Target sample count: the caller's, or the fullest bucket.
pub fn shortfall_target(row_lengths: &[usize], probe_count: Option<usize>) -> usize {
    probe_count.unwrap_or_else(|| row_lengths.iter().copied().max().unwrap_or(0))
}

/// How many samples each bucket is short of `target`.
pub fn shortfalls(row_lengths: &[usize], target: usize) -> Vec<usize> {
    row_lengths
        .iter()
        .map(|&len| target.saturating_sub(len))
        .collect()
}

/// Shortfall as a fraction of `target`.
pub fn shortfall_fractions(row_lengths: &[usize], target: usize) -> Vec<f64> {
    shortfalls(row_lengths, target)
        .into_iter()
        .map(|short| {
            if target == 0 {
                0.0
            } else {
                short as f64 / target as f64
            }
        })
        .collect()
}

/// One marker per missing sample. `x_of` maps a bucket index to its X position.
pub fn shortfall_markers(
    row_lengths: &[usize],
    target: usize,
    x_of: impl Fn(usize) -> f64,
) -> Vec<ErrorMarker> {
    shortfalls(row_lengths, target)
        .into_iter()
        .enumerate()
        .filter(|&(_, short)| short > 0)
        .flat_map(|(bucket, short)| {
            let x = x_of(bucket);
            (0..short).map(move |err_pos| ErrorMarker { x, err_pos })
        })
        .collect()
}

/// Per-bucket error ratio in [0, 1] for the given mode.
pub fn error_ratios(
    mode: ErrorMode,
    stats: &[ErrorStat],
    row_lengths: &[usize],
    probe_count: Option<usize>,
) -> Vec<f64> {
    match mode {
        ErrorMode::InvalidFraction => invalid_fractions(stats),
        ErrorMode::Shortfall => {
            let target = shortfall_target(row_lengths, probe_count);
            shortfall_fractions(row_lengths, target)
        }
    }
}
