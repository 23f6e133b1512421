pub mod chart;
pub mod core;
pub mod dash;
pub mod render;
pub mod stats;
pub mod wasm_api;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SmokeError {
    /// Quantile fraction outside [0, 1] or NaN.
    #[error("unable to calculate {0} quantile")]
    InvalidQuantile(f64),

    #[error("invalid percentile band [{low}, {high}]")]
    InvalidBand { low: f64, high: f64 },

    #[error("no band preset with {0} bands (expected 0..=5)")]
    InvalidPreset(usize),

    #[error("malformed sample matrix: {0}")]
    MalformedMatrix(String),

    #[error("invalid chart configuration: {0}")]
    InvalidConfig(String),

    #[error("tessellation failed: {0}")]
    Tessellation(String),
}

pub type Result<T> = std::result::Result<T, error_stack::Report<SmokeError>>;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

pub mod prelude {
    pub use crate::chart::*;
    pub use crate::core::*;
    pub use crate::dash::*;
    pub use crate::render::*;
    pub use crate::stats::*;
    pub use crate::{Result, SmokeError};
}
