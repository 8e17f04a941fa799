use std::fmt;

use serde::{Deserialize, Serialize};

/// Integer window position of a stroke sample, in pixels.
///
/// Window coordinates have their origin at the top-left corner with `y`
/// growing downwards; buffers read back from the renderer are addressed
/// bottom-up, see [`crate::lookup::TriangleLookupSurface::pixel_index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: i32,
    pub y: i32,
}

impl ScreenPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for ScreenPoint {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// Type-safe mesh vertex identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VertexId(pub u32);

impl VertexId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Type-safe mesh triangle identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TriangleId(pub u32);

impl TriangleId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TriangleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One continuous user gesture: screen samples in the order they were drawn.
///
/// No two consecutive points are equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stroke {
    points: Vec<ScreenPoint>,
}

impl Stroke {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a point unless it repeats the last one. Returns whether it was added.
    pub fn push(&mut self, point: ScreenPoint) -> bool {
        if self.points.last() == Some(&point) {
            return false;
        }
        self.points.push(point);
        true
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn points(&self) -> &[ScreenPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last(&self) -> Option<ScreenPoint> {
        self.points.last().copied()
    }
}

impl FromIterator<ScreenPoint> for Stroke {
    fn from_iter<I: IntoIterator<Item = ScreenPoint>>(iter: I) -> Self {
        let mut stroke = Stroke::new();
        for point in iter {
            stroke.push(point);
        }
        stroke
    }
}
