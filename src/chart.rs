//! The chart itself: cleaned data, its error accounting and the scales, with
//! every layer derived on demand.

use glam::DVec2;
use tracing::debug;

use crate::core::{ChartConfig, ChartMode, ErrorMode};
use crate::render::draw::{band_paths, error_path, line_path, line_points, shortfall_marker_path};
use crate::render::path::PathData;
use crate::render::scale::{Scale, ScaleAdapter};
use crate::render::scene::{ErrorOutput, SmokeScene, StyledPath, class_name};
use crate::Result;
use crate::stats::{
    BandBounds, CleanedMatrix, ErrorMarker, ErrorStat, clean_matrix, error_ratios, flame_preset,
    matrix_bounds, pad_leading, quantiles, shortfall_markers, shortfall_target,
};

const BAND_CLASS: &str = "smokechart-band";
const LINE_CLASS: &str = "smokechart-line";
const ERROR_CLASS: &str = "smokechart-errors";

#[derive(Clone, Debug)]
pub struct Smokechart {
    config: ChartConfig,
    cleaned: CleanedMatrix,
    errors: Vec<ErrorStat>,
    scales: ScaleAdapter,
}

impl Smokechart {
    /// Validate `config` and load `raw`.
    pub fn new(raw: &[Vec<f64>], config: ChartConfig) -> Result<Self> {
        let mut chart = Self::empty(config)?;
        chart.replace_data(raw);
        Ok(chart)
    }

    /// A chart with no buckets yet.
    pub fn empty(config: ChartConfig) -> Result<Self> {
        config.validate()?;
        let scales = ScaleAdapter::new(config.scale_x, config.scale_y);
        Ok(Self {
            config,
            cleaned: CleanedMatrix::default(),
            errors: Vec::new(),
            scales,
        })
    }

    /// Swap in a new sample matrix. Everything derived from the old one is
    /// gone; scale domains are refitted when `auto_fit` is on.
    pub fn replace_data(&mut self, raw: &[Vec<f64>]) -> &mut Self {
        let (mut cleaned, mut errors) = clean_matrix(raw);
        pad_leading(&mut cleaned, &mut errors, self.config.num_stripes);
        let dropped: usize = errors.iter().map(|e| e.invalid).sum();
        debug!(
            rows = raw.len(),
            buckets = cleaned.len(),
            dropped,
            "replaced chart data"
        );
        self.cleaned = cleaned;
        self.errors = errors;
        if self.config.auto_fit {
            self.fit_domains();
        }
        self
    }

    /// Fit X to the bucket count and Y to the sample range.
    pub fn fit_domains(&mut self) -> &mut Self {
        self.scales.fit_domains(&self.cleaned);
        self
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn cleaned(&self) -> &CleanedMatrix {
        &self.cleaned
    }

    pub fn error_stats(&self) -> &[ErrorStat] {
        &self.errors
    }

    pub fn bucket_count(&self) -> usize {
        self.cleaned.len()
    }

    pub fn scales(&self) -> &ScaleAdapter {
        &self.scales
    }

    pub fn scale_x(&self) -> Option<&Scale> {
        self.scales.x.as_ref()
    }

    pub fn scale_y(&self) -> Option<&Scale> {
        self.scales.y.as_ref()
    }

    /// Replace the X scale as is; its domain is not refitted.
    pub fn set_scale_x(&mut self, scale: Option<Scale>) -> Result<&mut Self> {
        if let Some(s) = &scale {
            s.validate()?;
        }
        self.scales.x = scale;
        Ok(self)
    }

    /// Replace the Y scale as is; its domain is not refitted.
    pub fn set_scale_y(&mut self, scale: Option<Scale>) -> Result<&mut Self> {
        if let Some(s) = &scale {
            s.validate()?;
        }
        self.scales.y = scale;
        Ok(self)
    }

    /// Quantile `q` of every bucket, `None` for empty buckets.
    pub fn quantiles(&self, q: f64) -> Result<Vec<Option<f64>>> {
        quantiles(self.cleaned.rows(), q)
    }

    /// Unscaled vertices of the `q` line, with `None` at gaps.
    pub fn line_points(&self, q: f64) -> Result<Vec<Option<DVec2>>> {
        Ok(line_points(&self.quantiles(q)?))
    }

    /// Scaled path of the `q` quantile line.
    pub fn line_path(&self, q: f64) -> Result<PathData> {
        Ok(line_path(&self.quantiles(q)?, &self.scales))
    }

    /// One quantile line per fraction of the flame preset with `count` lines.
    pub fn flame_paths(&self, count: usize) -> Result<Vec<PathData>> {
        flame_preset(count)?
            .into_iter()
            .map(|q| self.line_path(q))
            .collect()
    }

    /// Bounds of every configured band for every bucket.
    pub fn band_bounds(&self) -> Result<Vec<Option<BandBounds>>> {
        matrix_bounds(self.cleaned.rows(), &self.config.percentiles)
    }

    /// One path per configured band, outermost first.
    pub fn band_paths(&self) -> Result<Vec<PathData>> {
        let bounds = self.band_bounds()?;
        Ok(band_paths(
            &bounds,
            self.config.percentiles.len(),
            &self.scales,
        ))
    }

    /// Per-bucket error ratio for the configured error mode.
    pub fn error_ratios(&self) -> Vec<f64> {
        error_ratios(
            self.config.error_mode,
            &self.errors,
            &self.cleaned.row_lengths(),
            self.config.probe_count,
        )
    }

    /// Error wedges of all buckets; empty when `error_radius` is 0.
    pub fn error_path(&self) -> PathData {
        error_path(
            &self.error_ratios(),
            self.config.error_radius,
            self.config.error_baseline(),
            &self.scales,
        )
    }

    /// One marker per sample a bucket is short of the target count, with X
    /// already scaled.
    pub fn shortfall_markers(&self) -> Vec<ErrorMarker> {
        let lengths = self.cleaned.row_lengths();
        let target = shortfall_target(&lengths, self.config.probe_count);
        shortfall_markers(&lengths, target, |bucket| {
            self.scales.map_x(bucket as f64)
        })
    }

    pub fn shortfall_marker_path(&self) -> PathData {
        shortfall_marker_path(&self.shortfall_markers(), &self.config.markers)
    }

    fn class(&self, base: &str) -> String {
        class_name(base, self.config.instance_id.as_deref())
    }

    /// Every layer, styled. Smoke mode draws the bands and the `q` line; flame
    /// mode draws the configured flame lines and no bands.
    pub fn scene(&self, q: f64) -> Result<SmokeScene> {
        let cfg = &self.config;
        let line_color = cfg.line.effective_color();

        let (bands, lines) = match cfg.mode {
            ChartMode::Smoke => {
                let bands = self
                    .band_paths()?
                    .into_iter()
                    .enumerate()
                    .map(|(layer, d)| {
                        StyledPath::filled(self.class(BAND_CLASS), d, cfg.band_fill(layer))
                    })
                    .collect();
                let line = StyledPath::stroked(
                    self.class(LINE_CLASS),
                    self.line_path(q)?,
                    line_color,
                    cfg.line.size,
                );
                (bands, vec![line])
            }
            ChartMode::Flame => {
                let lines = self
                    .flame_paths(cfg.flame_lines)?
                    .into_iter()
                    .map(|d| {
                        StyledPath::stroked(self.class(LINE_CLASS), d, line_color, cfg.line.size)
                    })
                    .collect();
                (Vec::new(), lines)
            }
        };

        let error_fill = cfg.error.effective_color();
        let errors = match cfg.error_mode {
            ErrorMode::InvalidFraction if cfg.error_radius > 0.0 => ErrorOutput::Path {
                path: StyledPath::filled(self.class(ERROR_CLASS), self.error_path(), error_fill),
            },
            ErrorMode::InvalidFraction => ErrorOutput::None,
            ErrorMode::Shortfall => ErrorOutput::Markers {
                markers: self.shortfall_markers(),
                path: StyledPath::filled(
                    self.class(ERROR_CLASS),
                    self.shortfall_marker_path(),
                    error_fill,
                ),
            },
        };

        Ok(SmokeScene {
            mode: cfg.mode,
            buckets: self.bucket_count(),
            bands,
            lines,
            errors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SmokeError;
    use crate::core::BandSpec;
    use crate::stats::band_preset;

    fn raw_config() -> ChartConfig {
        ChartConfig {
            scale_x: None,
            scale_y: None,
            ..ChartConfig::default()
        }
    }

    #[test]
    fn test_new_cleans_and_counts_errors() {
        let chart = Smokechart::new(
            &[vec![3.0, f64::NAN, 1.0], vec![], vec![2.0]],
            raw_config(),
        )
        .unwrap();
        assert_eq!(chart.bucket_count(), 3);
        assert_eq!(chart.cleaned().row(0), Some(&[1.0, 3.0][..]));
        assert_eq!(
            chart.error_stats()[0],
            ErrorStat {
                invalid: 1,
                total: 3
            }
        );
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let cfg = ChartConfig {
            error_radius: -1.0,
            ..ChartConfig::default()
        };
        let err = Smokechart::new(&[], cfg).unwrap_err();
        assert!(matches!(
            err.current_context(),
            SmokeError::InvalidConfig(_)
        ));
    }

    #[test]
    fn test_auto_fit_on_replace() {
        let mut chart = Smokechart::new(&[vec![1.0, 5.0]], ChartConfig::default()).unwrap();
        assert_eq!(chart.scale_x().unwrap().domain, [0.0, 1.0]);
        assert_eq!(chart.scale_y().unwrap().domain, [1.0, 5.0]);

        chart.replace_data(&[vec![0.0], vec![], vec![10.0]]);
        assert_eq!(chart.scale_x().unwrap().domain, [0.0, 3.0]);
        assert_eq!(chart.scale_y().unwrap().domain, [0.0, 10.0]);
    }

    #[test]
    fn test_fixed_domains_survive_replace_until_fit() {
        let y = Scale::linear().with_domain(0.0, 100.0).with_range(50.0, 0.0);
        let cfg = ChartConfig {
            auto_fit: false,
            scale_y: Some(y),
            ..ChartConfig::default()
        };
        let mut chart = Smokechart::new(&[vec![1.0, 5.0]], cfg).unwrap();
        assert_eq!(chart.scale_y().unwrap().domain, [0.0, 100.0]);
        chart.fit_domains();
        assert_eq!(chart.scale_y().unwrap().domain, [1.0, 5.0]);
    }

    #[test]
    fn test_line_path_and_gap() {
        let chart = Smokechart::new(&[vec![1.0, 3.0], vec![], vec![4.0]], raw_config()).unwrap();
        assert_eq!(chart.line_path(0.5).unwrap().to_string(), "M0,2L1,2M2,4L3,4");
        assert_eq!(chart.line_points(0.5).unwrap()[2], None);
        let err = chart.line_path(1.5).unwrap_err();
        assert_eq!(err.current_context(), &SmokeError::InvalidQuantile(1.5));
    }

    #[test]
    fn test_band_paths_with_preset() {
        let cfg = ChartConfig {
            percentiles: band_preset(2).unwrap(),
            ..raw_config()
        };
        let chart = Smokechart::new(&[vec![10.0, 1.0, 4.0, 2.0]], cfg).unwrap();
        let paths: Vec<String> = chart
            .band_paths()
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            paths,
            vec!["M0,1L0,10L1,10L1,1Z", "M0,2L0,6L1,6L1,2Z"]
        );
    }

    #[test]
    fn test_flame_paths() {
        let chart = Smokechart::new(&[vec![1.0, 2.0, 3.0]], raw_config()).unwrap();
        let lines = chart.flame_paths(2).unwrap();
        assert_eq!(lines.len(), 2);
        assert!(chart.flame_paths(7).is_err());
    }

    #[test]
    fn test_error_path_invalid_fraction() {
        let cfg = ChartConfig {
            error_radius: 2.0,
            ..raw_config()
        };
        let chart = Smokechart::new(
            &[vec![1.0, 2.0, 3.0, f64::NAN], vec![1.0]],
            cfg,
        )
        .unwrap();
        assert_eq!(chart.error_ratios(), vec![0.25, 0.0]);
        assert_eq!(chart.error_path().to_string(), "M0,3v-2A2,2,0,0,1,2,3Z");
    }

    #[test]
    fn test_shortfall_markers_use_scaled_x() {
        let cfg = ChartConfig {
            error_mode: ErrorMode::Shortfall,
            probe_count: Some(3),
            scale_x: Some(Scale::linear().with_range(0.0, 20.0)),
            scale_y: None,
            ..ChartConfig::default()
        };
        let chart = Smokechart::new(&[vec![1.0, 2.0, 3.0], vec![1.0]], cfg).unwrap();
        let markers = chart.shortfall_markers();
        assert_eq!(
            markers,
            vec![
                ErrorMarker { x: 10.0, err_pos: 0 },
                ErrorMarker { x: 10.0, err_pos: 1 },
            ]
        );
        assert_eq!(chart.error_ratios(), vec![0.0, 2.0 / 3.0]);
        assert_eq!(chart.shortfall_marker_path().subpaths(), 2);
    }

    #[test]
    fn test_num_stripes_pads_leading_buckets() {
        let cfg = ChartConfig {
            num_stripes: 3,
            ..raw_config()
        };
        let chart = Smokechart::new(&[vec![5.0]], cfg).unwrap();
        assert_eq!(chart.bucket_count(), 3);
        assert_eq!(chart.line_path(0.5).unwrap().to_string(), "M2,5L3,5");
    }

    #[test]
    fn test_set_scale_validates() {
        let mut chart = Smokechart::new(&[vec![1.0]], raw_config()).unwrap();
        let bad = Scale::linear().with_domain(f64::NAN, 1.0);
        assert!(chart.set_scale_y(Some(bad)).is_err());
        assert!(chart.scale_y().is_none());
        chart
            .set_scale_x(Some(Scale::linear().with_range(0.0, 10.0)))
            .unwrap();
        assert_eq!(chart.line_path(0.5).unwrap().to_string(), "M0,1L10,1");
    }

    #[test]
    fn test_scene_smoke_mode() {
        let cfg = ChartConfig {
            percentiles: vec![BandSpec::new(0.0, 1.0).unwrap()],
            instance_id: Some("a".into()),
            ..raw_config()
        };
        let chart = Smokechart::new(&[vec![1.0, 3.0]], cfg).unwrap();
        let scene = chart.scene(0.5).unwrap();
        assert_eq!(scene.buckets, 1);
        assert_eq!(scene.bands.len(), 1);
        assert_eq!(scene.bands[0].class, "smokechart-band smokechart-band-a");
        assert_eq!(scene.bands[0].fill.as_deref(), Some("rgba(0,0,0,0.18)"));
        assert_eq!(scene.lines.len(), 1);
        assert_eq!(scene.lines[0].d.to_string(), "M0,2L1,2");
        assert_eq!(scene.lines[0].stroke.as_deref(), Some("#ff0000"));
        assert_eq!(scene.errors, ErrorOutput::None);
    }

    #[test]
    fn test_scene_flame_mode_has_no_bands() {
        let cfg = ChartConfig {
            mode: ChartMode::Flame,
            flame_lines: 4,
            ..raw_config()
        };
        let chart = Smokechart::new(&[vec![1.0, 3.0]], cfg).unwrap();
        let scene = chart.scene(0.5).unwrap();
        assert!(scene.bands.is_empty());
        assert_eq!(scene.lines.len(), 4);
    }

    #[test]
    fn test_scene_shortfall_mode() {
        let cfg = ChartConfig {
            error_mode: ErrorMode::Shortfall,
            ..raw_config()
        };
        let chart = Smokechart::new(&[vec![1.0, 3.0], vec![2.0]], cfg).unwrap();
        match chart.scene(0.5).unwrap().errors {
            ErrorOutput::Markers { markers, path } => {
                assert_eq!(markers, vec![ErrorMarker { x: 1.0, err_pos: 0 }]);
                assert_eq!(path.fill.as_deref(), Some("#ff3300"));
            }
            other => panic!("expected markers, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_chart() {
        let chart = Smokechart::empty(ChartConfig::default()).unwrap();
        assert_eq!(chart.bucket_count(), 0);
        assert!(chart.line_path(0.5).unwrap().is_empty());
        assert!(chart.band_paths().unwrap().iter().all(PathData::is_empty));
        assert!(chart.error_path().is_empty());
    }
}
