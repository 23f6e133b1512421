//! Path emitters for every smoke chart layer.
//!
//! - `common`: bucket spans and data-to-plot mapping
//! - `bands`: one filled path per percentile band layer
//! - `line`: stepped quantile lines with gaps for empty buckets
//! - `errors`: error wedges and stacked shortfall markers

mod bands;
mod common;
mod errors;
mod line;

pub use bands::{band_layer_path, band_paths};
pub use common::{bucket_span, data_to_plot};
pub use errors::{error_path, error_wedge, marker_circle, shortfall_marker_path};
pub use line::{line_path, line_points};
