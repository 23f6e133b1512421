//! Sample cleaning: drop invalid samples and sort each bucket.

use serde::{Deserialize, Serialize};

/// Per-bucket accounting of what cleaning threw away.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorStat {
    /// Non-finite samples dropped from the bucket.
    pub invalid: usize,
    /// Samples submitted for the bucket, valid or not.
    pub total: usize,
}

impl ErrorStat {
    pub fn valid(&self) -> usize {
        self.total - self.invalid
    }
}

/// Rows of finite samples, each sorted ascending. Row `i` is bucket `i` of the
/// matrix it was cleaned from; an empty row means no data for that bucket.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CleanedMatrix(Vec<Vec<f64>>);

impl CleanedMatrix {
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.0
    }

    pub fn row(&self, bucket: usize) -> Option<&[f64]> {
        self.0.get(bucket).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn row_lengths(&self) -> Vec<usize> {
        self.0.iter().map(Vec::len).collect()
    }

    /// Smallest and largest sample over all non-empty rows.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.0
            .iter()
            .filter_map(|row| Some((*row.first()?, *row.last()?)))
            .reduce(|(lo, hi), (first, last)| (lo.min(first), hi.max(last)))
    }

    pub fn into_inner(self) -> Vec<Vec<f64>> {
        self.0
    }
}

/// Drop non-finite samples from every row and sort what is left. Row count and
/// order are preserved; ragged rows are fine.
pub fn clean_matrix(raw: &[Vec<f64>]) -> (CleanedMatrix, Vec<ErrorStat>) {
    let (rows, stats) = raw
        .iter()
        .map(|row| {
            let mut kept: Vec<f64> = row.iter().copied().filter(|v| v.is_finite()).collect();
            kept.sort_by(f64::total_cmp);
            let stat = ErrorStat {
                invalid: row.len() - kept.len(),
                total: row.len(),
            };
            (kept, stat)
        })
        .unzip();
    (CleanedMatrix(rows), stats)
}

/// Prepend empty buckets until there are at least `min_rows` of them, so a
/// short history still fills the configured number of stripes.
pub fn pad_leading(cleaned: &mut CleanedMatrix, stats: &mut Vec<ErrorStat>, min_rows: usize) {
    let missing = min_rows.saturating_sub(cleaned.len());
    if missing == 0 {
        return;
    }
    cleaned.0.splice(0..0, std::iter::repeat_n(Vec::new(), missing));
    stats.splice(0..0, std::iter::repeat_n(ErrorStat::default(), missing));
}
