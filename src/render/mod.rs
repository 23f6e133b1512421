//! Geometry side of a chart: scales, path text, per-layer emitters, styled
//! scenes and fill tessellation.

pub mod draw;
pub mod path;
pub mod scale;
pub mod scene;
pub mod tessellate;

pub use draw::*;
pub use path::{PathCommand, PathData};
pub use scale::{Scale, ScaleAdapter, ScaleKind};
pub use scene::{ErrorOutput, SmokeScene, StyledPath, class_name};
pub use tessellate::{DEFAULT_TOLERANCE, FillMesh, fill_mesh, to_lyon_path};
