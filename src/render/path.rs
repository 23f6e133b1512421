//! A small SVG path vocabulary: just the commands smoke charts emit.

use std::fmt;

use glam::DVec2;
use serde::{Serialize, Serializer};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathCommand {
    MoveTo(DVec2),
    LineTo(DVec2),
    /// Relative vertical line (`v`).
    VerticalLineBy(f64),
    /// Circular arc with no x-axis rotation.
    ArcTo {
        radius: f64,
        large_arc: bool,
        sweep: bool,
        to: DVec2,
    },
    Close,
}

/// Shortest round-trip formatting, with `-0` written as `0`.
struct Num(f64);

impl fmt::Display for Num {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0 + 0.0)
    }
}

impl fmt::Display for PathCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            PathCommand::MoveTo(p) => write!(f, "M{},{}", Num(p.x), Num(p.y)),
            PathCommand::LineTo(p) => write!(f, "L{},{}", Num(p.x), Num(p.y)),
            PathCommand::VerticalLineBy(dy) => write!(f, "v{}", Num(dy)),
            PathCommand::ArcTo {
                radius,
                large_arc,
                sweep,
                to,
            } => write!(
                f,
                "A{r},{r},0,{},{},{},{}",
                u8::from(large_arc),
                u8::from(sweep),
                Num(to.x),
                Num(to.y),
                r = Num(radius),
            ),
            PathCommand::Close => f.write_str("Z"),
        }
    }
}

/// An ordered list of path commands. Displays (and serializes) as the SVG
/// `d` attribute text.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PathData {
    commands: Vec<PathCommand>,
}

impl PathData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(&mut self, p: DVec2) -> &mut Self {
        self.commands.push(PathCommand::MoveTo(p));
        self
    }

    pub fn line_to(&mut self, p: DVec2) -> &mut Self {
        self.commands.push(PathCommand::LineTo(p));
        self
    }

    pub fn vertical_line_by(&mut self, dy: f64) -> &mut Self {
        self.commands.push(PathCommand::VerticalLineBy(dy));
        self
    }

    pub fn arc_to(&mut self, radius: f64, large_arc: bool, sweep: bool, to: DVec2) -> &mut Self {
        self.commands.push(PathCommand::ArcTo {
            radius,
            large_arc,
            sweep,
            to,
        });
        self
    }

    pub fn close(&mut self) -> &mut Self {
        self.commands.push(PathCommand::Close);
        self
    }

    /// Append every command of `other`.
    pub fn append(&mut self, other: &PathData) -> &mut Self {
        self.commands.extend_from_slice(&other.commands);
        self
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Number of sub-paths, i.e. `M` commands.
    pub fn subpaths(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, PathCommand::MoveTo(_)))
            .count()
    }
}

impl fmt::Display for PathData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.commands.iter().try_for_each(|c| write!(f, "{c}"))
    }
}

impl Serialize for PathData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl FromIterator<PathCommand> for PathData {
    fn from_iter<I: IntoIterator<Item = PathCommand>>(iter: I) -> Self {
        Self {
            commands: iter.into_iter().collect(),
        }
    }
}
