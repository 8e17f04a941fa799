//! Triangle sequence builder: the ordered trace of triangles a stroke crossed.

use tracing::{debug, trace};

use crate::lookup::TriangleLookupSurface;
use crate::mesh::TriangleMesh;
use crate::types::{Stroke, TriangleId};

/// Triangles under a stroke in traversal order, with consecutive repeats collapsed.
///
/// A triangle may still appear more than once when the stroke leaves and
/// later re-enters it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriangleSequence {
    triangles: Vec<TriangleId>,
}

impl TriangleSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a triangle unless it repeats the last entry. Returns whether it was added.
    pub fn push(&mut self, triangle: TriangleId) -> bool {
        if self.triangles.last() == Some(&triangle) {
            return false;
        }
        self.triangles.push(triangle);
        true
    }

    pub fn as_slice(&self) -> &[TriangleId] {
        &self.triangles
    }

    pub fn iter(&self) -> impl Iterator<Item = TriangleId> + '_ {
        self.triangles.iter().copied()
    }

    pub fn get(&self, index: usize) -> Option<TriangleId> {
        self.triangles.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }
}

impl FromIterator<TriangleId> for TriangleSequence {
    fn from_iter<I: IntoIterator<Item = TriangleId>>(iter: I) -> Self {
        let mut sequence = TriangleSequence::new();
        for triangle in iter {
            sequence.push(triangle);
        }
        sequence
    }
}

/// Resolve every stroke point to the triangle under it.
///
/// Points over background or carrying a triangle id the mesh does not have
/// are skipped. An empty result is a valid "nothing to seed" outcome.
pub fn build_triangle_sequence(
    stroke: &Stroke,
    surface: &TriangleLookupSurface,
    mesh: &TriangleMesh,
) -> TriangleSequence {
    let triangle_count = mesh.triangle_count();
    let mut sequence = TriangleSequence::new();

    for &point in stroke.points() {
        let sample = surface.sample(point);
        match sample.decode(triangle_count) {
            Some(triangle) => {
                sequence.push(triangle);
            }
            None => trace!(
                "no valid triangle at [{}, {}] (raw sample {})",
                point.x,
                point.y,
                sample.0
            ),
        }
    }

    debug!(
        "stroke of {} points crossed {} triangle(s)",
        stroke.len(),
        sequence.len()
    );
    sequence
}
