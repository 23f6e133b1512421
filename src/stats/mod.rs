//! Statistics behind a smoke chart.
//!
//! - [`clean`]: drop invalid samples, sort buckets, count what was dropped
//! - [`quantile`]: value at a fractional rank of one sorted bucket
//! - [`bands`]: percentile band bounds, band and flame presets
//! - [`errors`]: invalid-fraction and shortfall accounting

pub mod bands;
pub mod clean;
pub mod errors;
pub mod quantile;

pub use bands::{
    BandBounds, band_bounds, band_preset, bands_from_pairs, check_fractions, flame_preset,
    matrix_bounds,
};
pub use clean::{CleanedMatrix, ErrorStat, clean_matrix, pad_leading};
pub use errors::{
    ErrorMarker, error_ratios, invalid_fractions, shortfall_fractions, shortfall_markers,
    shortfall_target, shortfalls,
};
pub use quantile::{EXACT_RANK_EPSILON, check_fraction, quantile, quantiles};
