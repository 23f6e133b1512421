//! Quantile extraction from one sorted bucket.
//!
//! Interpolating nearest-rank: the value sits at rank `(n - 1) * q`. When the
//! rank lands within [`EXACT_RANK_EPSILON`] of a sample that sample is returned
//! untouched, otherwise the two neighbours are blended linearly and rounded
//! half-up to an integer. The integer rounding matches round-trip-time style
//! samples measured in whole milliseconds.

use error_stack::Report;

use crate::{Result, SmokeError};

/// Fractional ranks below this snap to the lower sample.
pub const EXACT_RANK_EPSILON: f64 = 1e-3;

/// Rejects fractions outside [0, 1] and NaN.
pub fn check_fraction(q: f64) -> Result<()> {
    if q.is_nan() || !(0.0..=1.0).contains(&q) {
        return Err(Report::new(SmokeError::InvalidQuantile(q)));
    }
    Ok(())
}

/// Value at fraction `q` of an ascending sample list, or `None` for an empty
/// list.
///
/// ```
/// use smokechart::stats::quantile;
/// let samples = [1.0, 2.0, 4.0, 10.0];
/// assert_eq!(quantile(&samples, 0.0).unwrap(), Some(1.0));
/// assert_eq!(quantile(&samples, 0.75).unwrap(), Some(6.0));
/// assert_eq!(quantile(&[], 0.5).unwrap(), None);
/// assert!(quantile(&samples, 1.5).is_err());
/// ```
pub fn quantile(sorted: &[f64], q: f64) -> Result<Option<f64>> {
    check_fraction(q)?;
    let Some(last) = sorted.len().checked_sub(1) else {
        return Ok(None);
    };

    let rank = last as f64 * q;
    let idx = (rank.floor() as usize).min(last);
    let frac = rank - idx as f64;

    if frac < EXACT_RANK_EPSILON {
        return Ok(Some(sorted[idx]));
    }
    let lower = sorted[idx];
    let upper = sorted.get(idx + 1).copied().unwrap_or(lower);
    let blended = (lower * (1.0 - frac) + upper * frac + 0.5).floor();
    Ok(Some(blended.max(lower).min(upper)))
}

/// Quantile of every bucket, `None` where the bucket is empty.
pub fn quantiles(rows: &[Vec<f64>], q: f64) -> Result<Vec<Option<f64>>> {
    check_fraction(q)?;
    rows.iter().map(|row| quantile(row, q)).collect()
}
