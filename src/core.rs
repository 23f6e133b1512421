use error_stack::Report;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::render::scale::Scale;
use crate::stats::bands::flame_preset;
use crate::stats::quantile::check_fraction;
use crate::{Result, SmokeError};

/// Samples measured during one bucket (e.g. one hour). Non-finite values mark
/// missing or failed measurements.
pub type SampleRow = Vec<f64>;

/// One row per bucket; row index is the X axis.
pub type RawMatrix = Vec<SampleRow>;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }
    pub const fn with_a(self, a: f32) -> Self {
        Self { a, ..self }
    }

    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);
    pub const ORANGE_RED: Self = Self::rgb(1.0, 0.2, 0.0);
    pub const BLUE: Self = Self::rgb(0.0, 0.0, 1.0);

    /// CSS color string: `#rrggbb` when opaque, `rgba(r,g,b,a)` otherwise.
    pub fn to_css(&self) -> String {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        let (r, g, b) = (channel(self.r), channel(self.g), channel(self.b));
        if self.a >= 1.0 {
            format!("#{r:02x}{g:02x}{b:02x}")
        } else {
            format!("rgba({r},{g},{b},{})", self.a.max(0.0))
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Style {
    pub color: Color,
    pub size: f32,    // stroke width / marker radius
    pub opacity: f32, // multiplied into alpha
}

impl Default for Style {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            size: 1.0,
            opacity: 1.0,
        }
    }
}

impl Style {
    #[inline]
    pub const fn color(mut self, c: Color) -> Self {
        self.color = c;
        self
    }

    #[inline]
    pub const fn size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    pub fn effective_color(&self) -> Color {
        self.color.with_a(self.color.a * self.opacity)
    }
}

/// A (low, high) pair of quantile fractions bounding one smoke band.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 2]", into = "[f64; 2]")]
pub struct BandSpec {
    low: f64,
    high: f64,
}

impl BandSpec {
    pub fn new(low: f64, high: f64) -> Result<Self> {
        check_fraction(low)?;
        check_fraction(high)?;
        if low > high {
            return Err(Report::new(SmokeError::InvalidBand { low, high })
                .attach("lower fraction must not exceed the upper one"));
        }
        Ok(Self { low, high })
    }

    /// Preset constructor for literals known to be valid.
    pub(crate) const fn preset(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    /// True if `other` lies inside this band.
    pub fn contains(&self, other: &BandSpec) -> bool {
        self.low <= other.low && other.high <= self.high
    }
}

impl TryFrom<[f64; 2]> for BandSpec {
    type Error = SmokeError;

    fn try_from([low, high]: [f64; 2]) -> std::result::Result<Self, Self::Error> {
        BandSpec::new(low, high).map_err(|report| report.current_context().clone())
    }
}

impl From<BandSpec> for [f64; 2] {
    fn from(band: BandSpec) -> Self {
        [band.low, band.high]
    }
}

/// Min & max, 10th & 90th (80% of samples), 25th & 75th (50% of samples).
pub fn default_percentiles() -> Vec<BandSpec> {
    vec![
        BandSpec::preset(0.0, 1.0),
        BandSpec::preset(0.1, 0.9),
        BandSpec::preset(0.25, 0.75),
    ]
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartMode {
    /// Percentile bands behind a single quantile line.
    #[default]
    Smoke,
    /// Several quantile lines, no bands.
    Flame,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorMode {
    /// invalid / submitted samples per bucket.
    #[default]
    InvalidFraction,
    /// Missing samples against a target count per bucket.
    Shortfall,
}

/// Where shortfall markers sit: circles of `radius`, the first centred at
/// `offset`, each further one `spacing` lower.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerStack {
    pub radius: f64,
    pub offset: f64,
    pub spacing: f64,
}

impl Default for MarkerStack {
    fn default() -> Self {
        Self {
            radius: 2.0,
            offset: 3.0,
            spacing: 4.5,
        }
    }
}

impl MarkerStack {
    pub fn center_y(&self, err_pos: usize) -> f64 {
        self.offset + err_pos as f64 * self.spacing
    }
}

/// Everything a chart needs besides its data. Missing JSON fields take the
/// defaults below.
/// Largest accepted `probe_count`; shortfall mode draws one marker per
/// missing sample.
pub const MAX_PROBE_COUNT: usize = 10_000;

/// Largest accepted `num_stripes`.
pub const MAX_STRIPES: usize = 100_000;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Band layers, outermost first.
    pub percentiles: Vec<BandSpec>,
    /// `None` means raw, unscaled coordinates on that axis.
    pub scale_x: Option<Scale>,
    pub scale_y: Option<Scale>,
    /// Refit scale domains whenever the data is replaced. Turn off to keep
    /// caller-supplied domains.
    pub auto_fit: bool,
    pub mode: ChartMode,
    /// Number of quantile lines in flame mode (0..=5).
    pub flame_lines: usize,
    pub error_mode: ErrorMode,
    /// Radius of the error wedges; 0 disables them.
    pub error_radius: f64,
    /// Screen-space Y of the wedge centres; defaults to `error_radius + 1`.
    pub error_baseline: Option<f64>,
    /// Expected samples per bucket for shortfall accounting; defaults to the
    /// fullest bucket.
    pub probe_count: Option<usize>,
    pub markers: MarkerStack,
    /// Pad leading empty buckets until there are at least this many; 0 keeps
    /// the data as is.
    pub num_stripes: usize,
    pub line: Style,
    pub band_color: Color,
    /// Opacity per band layer; layers past the end reuse the last entry.
    pub band_opacity: Vec<f32>,
    pub error: Style,
    /// Caller-chosen namespace for the rendering layer's element classes.
    pub instance_id: Option<String>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            percentiles: default_percentiles(),
            scale_x: Some(Scale::default()),
            scale_y: Some(Scale::default()),
            auto_fit: true,
            mode: ChartMode::Smoke,
            flame_lines: 3,
            error_mode: ErrorMode::InvalidFraction,
            error_radius: 0.0,
            error_baseline: None,
            probe_count: None,
            markers: MarkerStack::default(),
            num_stripes: 0,
            line: Style::default().color(Color::RED).size(1.1),
            band_color: Color::BLACK,
            band_opacity: vec![0.18],
            error: Style::default().color(Color::ORANGE_RED).size(2.0),
            instance_id: None,
        }
    }
}

impl ChartConfig {
    pub fn validate(&self) -> Result<()> {
        for band in &self.percentiles {
            BandSpec::new(band.low(), band.high())?;
        }
        if self.band_opacity.is_empty() {
            return Err(invalid_config("band_opacity needs at least one entry"));
        }
        if let Some(bad) = self
            .band_opacity
            .iter()
            .find(|o| !o.is_finite() || !(0.0..=1.0).contains(*o))
        {
            return Err(invalid_config(format!("band opacity {bad} outside [0, 1]")));
        }
        if !self.error_radius.is_finite() || self.error_radius < 0.0 {
            return Err(invalid_config(format!(
                "error_radius must be a finite, non-negative number (got {})",
                self.error_radius
            )));
        }
        if self.error_baseline.is_some_and(|b| !b.is_finite()) {
            return Err(invalid_config("error_baseline must be finite"));
        }
        let MarkerStack {
            radius,
            offset,
            spacing,
        } = self.markers;
        if ![radius, offset, spacing].iter().all(|v| v.is_finite()) || radius < 0.0 {
            return Err(invalid_config("marker layout must be finite with radius >= 0"));
        }
        if let Some(count) = self.probe_count.filter(|&c| c > MAX_PROBE_COUNT) {
            return Err(invalid_config(format!(
                "probe_count {count} exceeds {MAX_PROBE_COUNT}"
            )));
        }
        if self.num_stripes > MAX_STRIPES {
            return Err(invalid_config(format!(
                "num_stripes {} exceeds {MAX_STRIPES}",
                self.num_stripes
            )));
        }
        flame_preset(self.flame_lines)?;
        if !self.line.size.is_finite() || self.line.size < 0.0 {
            return Err(invalid_config("line width must be finite and >= 0"));
        }
        for scale in self.scale_x.iter().chain(self.scale_y.iter()) {
            scale.validate()?;
        }
        Ok(())
    }

    /// Fill opacity for band layer `layer`, clamped to the last configured entry.
    pub fn band_opacity_for(&self, layer: usize) -> f32 {
        let last = self.band_opacity.len().saturating_sub(1);
        self.band_opacity
            .get(layer.min(last))
            .copied()
            .unwrap_or(1.0)
    }

    pub fn band_fill(&self, layer: usize) -> Color {
        self.band_color.with_a(self.band_opacity_for(layer))
    }

    pub fn error_baseline(&self) -> f64 {
        self.error_baseline.unwrap_or(self.error_radius + 1.0)
    }
}

fn invalid_config(msg: impl Into<String>) -> Report<SmokeError> {
    Report::new(SmokeError::InvalidConfig(msg.into()))
}

/// Read a sample matrix from JSON. Every element that is not a JSON number
/// (null, strings, booleans...) becomes an invalid sample; anything that is
/// not an array of arrays is rejected.
pub fn samples_from_json(value: &Value) -> Result<RawMatrix> {
    let rows = value
        .as_array()
        .ok_or_else(|| malformed(format!("expected an array of rows, got {}", kind_of(value))))?;

    rows.iter()
        .enumerate()
        .map(|(idx, row)| {
            let samples = row.as_array().ok_or_else(|| {
                malformed(format!("row {idx} is {}, expected an array", kind_of(row)))
            })?;
            Ok(samples
                .iter()
                .map(|s| s.as_f64().unwrap_or(f64::NAN))
                .collect())
        })
        .collect()
}

pub fn parse_matrix(json: &str) -> Result<RawMatrix> {
    let value: Value = serde_json::from_str(json).map_err(|e| {
        Report::new(e)
            .change_context(SmokeError::MalformedMatrix("not valid JSON".into()))
            .attach("failed to parse sample matrix")
    })?;
    samples_from_json(&value)
}

fn malformed(msg: String) -> Report<SmokeError> {
    Report::new(SmokeError::MalformedMatrix(msg))
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
