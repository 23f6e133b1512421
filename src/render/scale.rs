//! Axis scales: monotonic mappings from data space into plot coordinates.

use error_stack::Report;
use glam::DVec2;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::stats::CleanedMatrix;
use crate::{Result, SmokeError};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum ScaleKind {
    #[default]
    Linear,
    Log10,
    Symlog { lin_thresh: f64 },
    Power { exponent: f64 },
}

impl ScaleKind {
    fn forward(&self, v: f64) -> f64 {
        match *self {
            ScaleKind::Linear => v,
            ScaleKind::Log10 => v.log10(),
            ScaleKind::Symlog { lin_thresh } => v.signum() * (v.abs() / lin_thresh).ln_1p(),
            ScaleKind::Power { exponent } => v.signum() * v.abs().powf(exponent),
        }
    }

    fn inverse(&self, t: f64) -> f64 {
        match *self {
            ScaleKind::Linear => t,
            ScaleKind::Log10 => 10f64.powf(t),
            ScaleKind::Symlog { lin_thresh } => t.signum() * t.abs().exp_m1() * lin_thresh,
            ScaleKind::Power { exponent } => t.signum() * t.abs().powf(exponent.recip()),
        }
    }
}

/// Maps `domain` onto `range`. The default maps [0, 1] onto [0, 1].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scale {
    #[serde(default)]
    pub kind: ScaleKind,
    pub domain: [f64; 2],
    pub range: [f64; 2],
}

impl Default for Scale {
    fn default() -> Self {
        Self::linear()
    }
}

impl Scale {
    pub const fn linear() -> Self {
        Self {
            kind: ScaleKind::Linear,
            domain: [0.0, 1.0],
            range: [0.0, 1.0],
        }
    }

    pub const fn with_kind(mut self, kind: ScaleKind) -> Self {
        self.kind = kind;
        self
    }

    pub const fn with_domain(mut self, d0: f64, d1: f64) -> Self {
        self.domain = [d0, d1];
        self
    }

    pub const fn with_range(mut self, r0: f64, r1: f64) -> Self {
        self.range = [r0, r1];
        self
    }

    pub fn set_domain(&mut self, d0: f64, d1: f64) {
        self.domain = [d0, d1];
    }

    /// Position of `v` in the range. A zero-width domain maps everything to the
    /// middle of the range.
    pub fn apply(&self, v: f64) -> f64 {
        let t0 = self.kind.forward(self.domain[0]);
        let t1 = self.kind.forward(self.domain[1]);
        let span = t1 - t0;
        let t = if span == 0.0 {
            0.5
        } else {
            (self.kind.forward(v) - t0) / span
        };
        self.range[0] + t * (self.range[1] - self.range[0])
    }

    /// Data value at range position `p`.
    pub fn invert(&self, p: f64) -> f64 {
        let span = self.range[1] - self.range[0];
        let t = if span == 0.0 {
            0.5
        } else {
            (p - self.range[0]) / span
        };
        let t0 = self.kind.forward(self.domain[0]);
        let t1 = self.kind.forward(self.domain[1]);
        self.kind.inverse(t0 + t * (t1 - t0))
    }

    pub fn validate(&self) -> Result<()> {
        let finite = self
            .domain
            .iter()
            .chain(self.range.iter())
            .all(|v| v.is_finite());
        if !finite {
            return Err(invalid_scale(format!(
                "domain {:?} and range {:?} must be finite",
                self.domain, self.range
            )));
        }
        match self.kind {
            ScaleKind::Log10 if self.domain.iter().any(|&d| d <= 0.0) => Err(invalid_scale(
                format!("log scale domain {:?} must be positive", self.domain),
            )),
            ScaleKind::Symlog { lin_thresh } if !(lin_thresh.is_finite() && lin_thresh > 0.0) => {
                Err(invalid_scale(format!(
                    "symlog threshold {lin_thresh} must be positive"
                )))
            }
            ScaleKind::Power { exponent } if !(exponent.is_finite() && exponent > 0.0) => Err(
                invalid_scale(format!("power exponent {exponent} must be positive")),
            ),
            _ => Ok(()),
        }
    }
}

fn invalid_scale(msg: String) -> Report<SmokeError> {
    Report::new(SmokeError::InvalidConfig(msg)).attach("invalid scale")
}

/// Moves `scale` onto `[lo, hi]` unless that domain is invalid for its kind,
/// such as a log scale reaching 0.
fn refit(scale: &mut Scale, lo: f64, hi: f64, axis: &str) {
    let fitted = scale.with_domain(lo, hi);
    match fitted.validate() {
        Ok(()) => {
            *scale = fitted;
            debug!(axis, domain = ?scale.domain, "fitted domain");
        }
        Err(report) => warn!(
            axis,
            domain = ?scale.domain,
            rejected = ?fitted.domain,
            error = %report.current_context(),
            "fitted domain invalid for scale kind, keeping previous domain"
        ),
    }
}

/// The X (bucket index) and Y (sample value) scales of one chart. A missing
/// scale leaves that axis in raw data coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScaleAdapter {
    pub x: Option<Scale>,
    pub y: Option<Scale>,
}

impl ScaleAdapter {
    pub fn new(x: Option<Scale>, y: Option<Scale>) -> Self {
        Self { x, y }
    }

    /// Unscaled on both axes.
    pub fn raw() -> Self {
        Self { x: None, y: None }
    }

    /// X domain becomes `[0, bucket count]`, Y domain the smallest and largest
    /// sample of any bucket. When no bucket has samples the Y domain is kept,
    /// as is any domain the scale kind cannot take.
    pub fn fit_domains(&mut self, cleaned: &CleanedMatrix) {
        if let Some(x) = self.x.as_mut() {
            refit(x, 0.0, cleaned.len() as f64, "X");
        }
        let Some(y) = self.y.as_mut() else {
            return;
        };
        match cleaned.value_range() {
            Some((lo, hi)) => refit(y, lo, hi, "Y"),
            None => warn!(
                domain = ?y.domain,
                buckets = cleaned.len(),
                "no samples in any bucket, keeping Y domain"
            ),
        }
    }

    pub fn map_x(&self, v: f64) -> f64 {
        self.x.as_ref().map_or(v, |s| s.apply(v))
    }

    pub fn map_y(&self, v: f64) -> f64 {
        self.y.as_ref().map_or(v, |s| s.apply(v))
    }

    pub fn map_point(&self, p: DVec2) -> DVec2 {
        DVec2::new(self.map_x(p.x), self.map_y(p.y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::clean_matrix;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_linear_apply_and_invert() {
        let s = Scale::linear().with_domain(0.0, 10.0).with_range(100.0, 0.0);
        assert_eq!(s.apply(0.0), 100.0);
        assert_eq!(s.apply(10.0), 0.0);
        assert_eq!(s.apply(2.5), 75.0);
        assert_eq!(s.invert(75.0), 2.5);
    }

    #[test]
    fn test_degenerate_domain_maps_to_range_middle() {
        let s = Scale::linear().with_domain(4.0, 4.0).with_range(0.0, 200.0);
        assert_eq!(s.apply(4.0), 100.0);
        assert_eq!(s.apply(-3.0), 100.0);
    }

    #[test]
    fn test_nonlinear_kinds_are_monotonic_and_invertible() {
        let kinds = [
            ScaleKind::Log10,
            ScaleKind::Symlog { lin_thresh: 1.0 },
            ScaleKind::Power { exponent: 0.5 },
        ];
        for kind in kinds {
            let s = Scale::linear()
                .with_kind(kind)
                .with_domain(1.0, 1000.0)
                .with_range(0.0, 1.0);
            assert!(close(s.apply(1.0), 0.0));
            assert!(close(s.apply(1000.0), 1.0));
            assert!(s.apply(10.0) < s.apply(100.0));
            assert!(close(s.invert(s.apply(42.0)), 42.0), "{kind:?}");
        }
        let log = Scale::linear()
            .with_kind(ScaleKind::Log10)
            .with_domain(1.0, 100.0);
        assert!(close(log.apply(10.0), 0.5));
    }

    #[test]
    fn test_validate() {
        assert!(Scale::default().validate().is_ok());
        assert!(
            Scale::linear()
                .with_domain(0.0, f64::INFINITY)
                .validate()
                .is_err()
        );
        assert!(
            Scale::linear()
                .with_kind(ScaleKind::Log10)
                .with_domain(0.0, 10.0)
                .validate()
                .is_err()
        );
        assert!(
            Scale::linear()
                .with_kind(ScaleKind::Power { exponent: 0.0 })
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_fit_domains_ignores_empty_buckets() {
        let (cleaned, _) = clean_matrix(&[vec![5.0], vec![1.0, 9.0], vec![]]);
        let mut scales = ScaleAdapter::new(Some(Scale::default()), Some(Scale::default()));
        scales.fit_domains(&cleaned);
        assert_eq!(scales.x.unwrap().domain, [0.0, 3.0]);
        assert_eq!(scales.y.unwrap().domain, [1.0, 9.0]);
    }

    #[test]
    fn test_fit_domains_keeps_y_when_all_buckets_empty() {
        let (cleaned, _) = clean_matrix(&[vec![f64::NAN], vec![]]);
        let previous = Scale::linear().with_domain(-2.0, 2.0);
        let mut scales = ScaleAdapter::new(Some(Scale::default()), Some(previous));
        scales.fit_domains(&cleaned);
        assert_eq!(scales.x.unwrap().domain, [0.0, 2.0]);
        assert_eq!(scales.y.unwrap().domain, [-2.0, 2.0]);
    }

    #[test]
    fn test_missing_scale_passes_raw_values() {
        let scales = ScaleAdapter::new(None, Some(Scale::linear().with_range(0.0, 10.0)));
        let p = scales.map_point(DVec2::new(3.0, 0.5));
        assert_eq!(p, DVec2::new(3.0, 5.0));

        let mut raw = ScaleAdapter::raw();
        let (cleaned, _) = clean_matrix(&[vec![1.0]]);
        raw.fit_domains(&cleaned);
        assert_eq!(raw, ScaleAdapter::raw());
    }

    #[test]
    fn test_fit_domains_keeps_log_domain_when_data_reaches_zero() {
        let (cleaned, _) = clean_matrix(&[vec![0.0, 5.0], vec![2.0]]);
        let log = Scale::linear()
            .with_kind(ScaleKind::Log10)
            .with_domain(1.0, 10.0)
            .with_range(100.0, 0.0);
        let mut scales = ScaleAdapter::new(Some(log), Some(log));
        scales.fit_domains(&cleaned);
        assert_eq!(scales.x.unwrap().domain, [1.0, 10.0]);
        assert_eq!(scales.y.unwrap().domain, [1.0, 10.0]);
        assert!(scales.map_y(5.0).is_finite());

        let (positive, _) = clean_matrix(&[vec![2.0, 50.0]]);
        scales.fit_domains(&positive);
        assert_eq!(scales.y.unwrap().domain, [2.0, 50.0]);
        assert_eq!(scales.x.unwrap().domain, [1.0, 10.0]);
    }
}
