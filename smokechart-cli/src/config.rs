//! Command line configuration

use std::fs;
use std::io::Read;

use clap::{Parser, ValueEnum};
use smokechart::core::{ChartConfig, ChartMode, ErrorMode};
use smokechart::render::Scale;
use smokechart::stats::band_preset;

use crate::error::{CliError, Result};

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorModeArg {
    InvalidFraction,
    Shortfall,
}

impl From<ErrorModeArg> for ErrorMode {
    fn from(arg: ErrorModeArg) -> Self {
        match arg {
            ErrorModeArg::InvalidFraction => ErrorMode::InvalidFraction,
            ErrorModeArg::Shortfall => ErrorMode::Shortfall,
        }
    }
}

/// Smoke chart geometry from a JSON sample matrix
#[derive(Parser, Clone, Debug)]
#[command(name = "smokechart-cli")]
#[command(about = "Turn a JSON matrix of samples per bucket into smoke chart paths")]
pub struct Config {
    /// Sample matrix file, `-` for stdin
    #[arg(default_value = "-")]
    pub input: String,

    /// JSON chart configuration file
    #[arg(long)]
    pub config: Option<String>,

    /// Use the stock layout with this many bands (0-5)
    #[arg(long)]
    pub bands: Option<usize>,

    /// Quantile drawn as the line
    #[arg(short, long, default_value = "0.5")]
    pub quantile: f64,

    /// Draw this many quantile lines instead of bands
    #[arg(long)]
    pub flame: Option<usize>,

    /// Width of the plot area; X maps onto [0, width]
    #[arg(long)]
    pub width: Option<f64>,

    /// Height of the plot area; Y maps onto [height, 0]
    #[arg(long)]
    pub height: Option<f64>,

    #[arg(long, value_enum)]
    pub error_mode: Option<ErrorModeArg>,

    /// Error wedge radius, 0 disables wedges
    #[arg(long)]
    pub error_radius: Option<f64>,

    /// Expected samples per bucket in shortfall mode
    #[arg(long)]
    pub probe_count: Option<usize>,

    /// Pad with leading empty buckets up to this count
    #[arg(long)]
    pub num_stripes: Option<usize>,

    /// Pretty-print the output
    #[arg(long)]
    pub pretty: bool,
}

impl Config {
    /// The config file (or defaults) with command line overrides applied.
    pub fn chart_config(&self) -> Result<ChartConfig> {
        let mut chart = match &self.config {
            Some(path) => serde_json::from_str(&read_source(path)?)?,
            None => ChartConfig::default(),
        };
        if let Some(count) = self.bands {
            chart.percentiles = band_preset(count)?;
        }
        if let Some(lines) = self.flame {
            chart.mode = ChartMode::Flame;
            chart.flame_lines = lines;
        }
        if let Some(width) = self.width {
            let x = chart.scale_x.unwrap_or_default();
            chart.scale_x = Some(x.with_range(0.0, width));
        }
        if let Some(height) = self.height {
            let y = chart.scale_y.unwrap_or_else(Scale::linear);
            chart.scale_y = Some(y.with_range(height, 0.0));
        }
        if let Some(mode) = self.error_mode {
            chart.error_mode = mode.into();
        }
        if let Some(radius) = self.error_radius {
            chart.error_radius = radius;
        }
        if let Some(count) = self.probe_count {
            chart.probe_count = Some(count);
        }
        if let Some(stripes) = self.num_stripes {
            chart.num_stripes = stripes;
        }
        if !(0.0..=1.0).contains(&self.quantile) {
            return Err(CliError::BadArgument(format!(
                "quantile {} outside [0, 1]",
                self.quantile
            )));
        }
        Ok(chart)
    }

    pub fn read_input(&self) -> Result<String> {
        read_source(&self.input)
    }
}

/// Contents of `path`, or all of stdin for `-`.
pub fn read_source(path: &str) -> Result<String> {
    let read = if path == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf).map(|_| buf)
    } else {
        fs::read_to_string(path)
    };
    read.map_err(|source| CliError::Read {
        path: path.to_string(),
        source,
    })
}
