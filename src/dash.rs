use crate::chart::Smokechart;
use crate::core::{ChartConfig, ChartMode, Color, ErrorMode, MarkerStack, Style};
use crate::render::scale::Scale;
use crate::stats::{band_preset, bands_from_pairs};
use crate::Result;

pub fn smoke() -> SmokeBuilder {
    SmokeBuilder {
        config: ChartConfig::default(),
        bands: None,
    }
}

enum Bands {
    Pairs(Vec<[f64; 2]>),
    Preset(usize),
}

/// Fluent construction of a [`Smokechart`]. Nothing is validated until
/// [`SmokeBuilder::build`].
pub struct SmokeBuilder {
    config: ChartConfig,
    bands: Option<Bands>,
}

impl SmokeBuilder {
    /// Start from an existing configuration instead of the defaults.
    pub fn config(mut self, config: ChartConfig) -> Self {
        self.config = config;
        self
    }

    /// Band layers as `[low, high]` quantile fractions, outermost first.
    pub fn percentiles(mut self, pairs: &[[f64; 2]]) -> Self {
        self.bands = Some(Bands::Pairs(pairs.to_vec()));
        self
    }

    /// One of the stock layouts with 0 to 5 bands.
    pub fn bands(mut self, count: usize) -> Self {
        self.bands = Some(Bands::Preset(count));
        self
    }

    pub fn scale_x(mut self, scale: Scale) -> Self {
        self.config.scale_x = Some(scale);
        self
    }

    pub fn scale_y(mut self, scale: Scale) -> Self {
        self.config.scale_y = Some(scale);
        self
    }

    /// Draw in raw data coordinates on both axes.
    pub fn unscaled(mut self) -> Self {
        self.config.scale_x = None;
        self.config.scale_y = None;
        self
    }

    /// Linear scales onto a `width` x `height` screen area, Y pointing down.
    pub fn size(mut self, width: f64, height: f64) -> Self {
        let x = self.config.scale_x.unwrap_or_default();
        let y = self.config.scale_y.unwrap_or_default();
        self.config.scale_x = Some(x.with_range(0.0, width));
        self.config.scale_y = Some(y.with_range(height, 0.0));
        self
    }

    /// Keep the supplied scale domains when data is replaced.
    pub fn fixed_domains(mut self) -> Self {
        self.config.auto_fit = false;
        self
    }

    /// Flame mode with `lines` quantile lines.
    pub fn flame(mut self, lines: usize) -> Self {
        self.config.mode = ChartMode::Flame;
        self.config.flame_lines = lines;
        self
    }

    pub fn error_mode(mut self, mode: ErrorMode) -> Self {
        self.config.error_mode = mode;
        self
    }

    pub fn error_radius(mut self, radius: f64) -> Self {
        self.config.error_radius = radius;
        self
    }

    pub fn error_baseline(mut self, baseline: f64) -> Self {
        self.config.error_baseline = Some(baseline);
        self
    }

    pub fn probe_count(mut self, count: usize) -> Self {
        self.config.probe_count = Some(count);
        self
    }

    pub fn markers(mut self, stack: MarkerStack) -> Self {
        self.config.markers = stack;
        self
    }

    pub fn num_stripes(mut self, stripes: usize) -> Self {
        self.config.num_stripes = stripes;
        self
    }

    pub fn line<F>(mut self, f: F) -> Self
    where
        F: FnOnce(Style) -> Style,
    {
        self.config.line = f(self.config.line);
        self
    }

    pub fn error_style<F>(mut self, f: F) -> Self
    where
        F: FnOnce(Style) -> Style,
    {
        self.config.error = f(self.config.error);
        self
    }

    pub fn band_color(mut self, c: Color) -> Self {
        self.config.band_color = c;
        self
    }

    /// Fill opacity per band layer; the last entry covers any further layers.
    pub fn band_opacity(mut self, opacity: Vec<f32>) -> Self {
        self.config.band_opacity = opacity;
        self
    }

    pub fn instance_id(mut self, id: impl Into<String>) -> Self {
        self.config.instance_id = Some(id.into());
        self
    }

    /// Resolve presets and validate, without loading data.
    pub fn build_config(self) -> Result<ChartConfig> {
        let mut config = self.config;
        match self.bands {
            Some(Bands::Pairs(pairs)) => config.percentiles = bands_from_pairs(&pairs)?,
            Some(Bands::Preset(count)) => config.percentiles = band_preset(count)?,
            None => {}
        }
        config.validate()?;
        Ok(config)
    }

    pub fn build(self, raw: &[Vec<f64>]) -> Result<Smokechart> {
        Smokechart::new(raw, self.build_config()?)
    }
}
