//! Bridge from path data to triangle meshes for GPU renderers.

use error_stack::Report;
use glam::DVec2;
use lyon_tessellation::geom::ArcFlags;
use lyon_tessellation::math::{Angle, Point, point, vector};
use lyon_tessellation::path::Path;
use lyon_tessellation::path::builder::{Build, SvgPathBuilder};
use lyon_tessellation::{BuffersBuilder, FillOptions, FillTessellator, FillVertex, VertexBuffers};
use serde::Serialize;

use crate::render::path::{PathCommand, PathData};
use crate::{Result, SmokeError};

pub const DEFAULT_TOLERANCE: f32 = 0.1;

/// Indexed triangle list covering the filled area of a path.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct FillMesh {
    pub positions: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

impl FillMesh {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

fn to_point(p: DVec2) -> Point {
    point(p.x as f32, p.y as f32)
}

pub fn to_lyon_path(data: &PathData) -> Path {
    let mut builder = Path::builder().with_svg();
    for command in data.commands() {
        match *command {
            PathCommand::MoveTo(p) => {
                builder.move_to(to_point(p));
            }
            PathCommand::LineTo(p) => {
                builder.line_to(to_point(p));
            }
            PathCommand::VerticalLineBy(dy) => {
                builder.relative_vertical_line_to(dy as f32);
            }
            PathCommand::ArcTo {
                radius,
                large_arc,
                sweep,
                to,
            } => {
                let r = radius as f32;
                builder.arc_to(
                    vector(r, r),
                    Angle::radians(0.0),
                    ArcFlags { large_arc, sweep },
                    to_point(to),
                );
            }
            PathCommand::Close => {
                builder.close();
            }
        }
    }
    builder.build()
}

/// Fill-tessellate `data` with the given curve tolerance.
pub fn fill_mesh(data: &PathData, tolerance: f32) -> Result<FillMesh> {
    let path = to_lyon_path(data);
    let mut buffers: VertexBuffers<[f32; 2], u32> = VertexBuffers::new();
    FillTessellator::new()
        .tessellate_path(
            &path,
            &FillOptions::tolerance(tolerance),
            &mut BuffersBuilder::new(&mut buffers, |v: FillVertex| v.position().to_array()),
        )
        .map_err(|e| Report::new(SmokeError::Tessellation(format!("{e:?}"))))
        .map_err(|r| r.attach(format!("path with {} commands", data.len())))?;
    Ok(FillMesh {
        positions: buffers.vertices,
        indices: buffers.indices,
    })
}
