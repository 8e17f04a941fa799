//! Seed vertex selection: expresses a stroke's triangle trace as an ordered
//! walk over mesh vertices, ready to be used as geodesic sources.
//!
//! Selection runs in two passes:
//!
//! 1. **Walk.** The anchor is the vertex of the first triangle closest to the
//!    unprojected stroke. From the current seed the walk jumps to the furthest
//!    later triangle that still contains it and picks that triangle's closest
//!    unvisited vertex. When no later triangle shares the seed the walk
//!    resumes at the next triangle in the trace. Every jump moves strictly
//!    forward, so the walk ends after at most one pick per triangle.
//! 2. **Triple collapse.** A triangle with all three corners seeded has one
//!    spurious corner: the one sitting between the other two in seed order is
//!    removed.
//!
//! Consecutive seeds are not guaranteed to share a mesh edge; the geodesic
//! solver connects them.

use std::collections::HashSet;

use glam::Vec3;
use tracing::{debug, trace};

use crate::mesh::TriangleMesh;
use crate::triangle_sequence::TriangleSequence;
use crate::types::{TriangleId, VertexId};

/// Errors raised when the selector cannot place a valid seed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SelectorError {
    #[error("Triangle {triangle} at trace position {position} has no unvisited vertex")]
    NoUnvisitedVertex { triangle: TriangleId, position: usize },
    #[error("No projected stroke samples to measure vertex distances against")]
    NoStrokeSamples,
    #[error("Triangle {0} is not part of the mesh")]
    UnknownTriangle(TriangleId),
    #[error("Vertex {0} has no position in the mesh")]
    MissingVertex(VertexId),
}

/// Ordered mesh vertices standing in for a stroke. Entries are unique.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedVertexSequence {
    vertices: Vec<VertexId>,
    members: HashSet<VertexId>,
}

impl SeedVertexSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a vertex. Returns `false` (and leaves the sequence untouched)
    /// if the vertex is already present.
    pub fn push(&mut self, vertex: VertexId) -> bool {
        if !self.members.insert(vertex) {
            return false;
        }
        self.vertices.push(vertex);
        true
    }

    /// Remove a vertex, keeping the order of the others.
    pub fn remove(&mut self, vertex: VertexId) -> bool {
        if !self.members.remove(&vertex) {
            return false;
        }
        self.vertices.retain(|&v| v != vertex);
        true
    }

    pub fn contains(&self, vertex: VertexId) -> bool {
        self.members.contains(&vertex)
    }

    /// Position of a vertex in seed order
    pub fn position(&self, vertex: VertexId) -> Option<usize> {
        self.vertices.iter().position(|&v| v == vertex)
    }

    pub fn last(&self) -> Option<VertexId> {
        self.vertices.last().copied()
    }

    pub fn as_slice(&self) -> &[VertexId] {
        &self.vertices
    }

    pub fn iter(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.vertices.iter().copied()
    }

    /// Consecutive seed pairs, in order, for path reconstruction.
    pub fn pairs(&self) -> impl Iterator<Item = (VertexId, VertexId)> + '_ {
        self.vertices.windows(2).map(|w| (w[0], w[1]))
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

impl FromIterator<VertexId> for SeedVertexSequence {
    fn from_iter<I: IntoIterator<Item = VertexId>>(iter: I) -> Self {
        let mut seeds = SeedVertexSequence::new();
        for vertex in iter {
            seeds.push(vertex);
        }
        seeds
    }
}

/// Picks seed vertices for a triangle trace, scoring vertices by their
/// distance to the unprojected stroke.
pub struct SeedVertexSelector<'a> {
    mesh: &'a TriangleMesh,
    stroke_points: &'a [Vec3],
}

impl<'a> SeedVertexSelector<'a> {
    pub fn new(mesh: &'a TriangleMesh, stroke_points: &'a [Vec3]) -> Self {
        Self {
            mesh,
            stroke_points,
        }
    }

    /// Run the walk followed by the triple-collapse pass.
    pub fn select(&self, sequence: &TriangleSequence) -> Result<SeedVertexSequence, SelectorError> {
        let mut seeds = self.walk(sequence)?;
        let removed = collapse_full_triangles(&mut seeds, sequence, self.mesh);
        debug!(
            "selected {} seed vertex(es) from {} triangle(s), {} collapsed",
            seeds.len(),
            sequence.len(),
            removed
        );
        Ok(seeds)
    }

    /// Forward walk over the trace without the collapse pass.
    pub fn walk(&self, sequence: &TriangleSequence) -> Result<SeedVertexSequence, SelectorError> {
        let triangles = sequence.as_slice();
        let mut seeds = SeedVertexSequence::new();
        let Some(&first) = triangles.first() else {
            return Ok(seeds);
        };
        if self.stroke_points.is_empty() {
            return Err(SelectorError::NoStrokeSamples);
        }

        let mut cursor = 0;
        let mut current = self.nearest_unvisited(first, cursor, &seeds)?;
        seeds.push(current);
        trace!("anchor vertex {} in triangle {}", current.0, first.0);

        loop {
            let furthest = (cursor + 1..triangles.len())
                .rev()
                .find(|&i| self.mesh.triangle_has_vertex(triangles[i], current));
            cursor = match furthest {
                Some(i) => i,
                None => {
                    trace!("no later triangle shares vertex {}", current.0);
                    cursor + 1
                }
            };
            let Some(&triangle) = triangles.get(cursor) else {
                break;
            };
            current = self.nearest_unvisited(triangle, cursor, &seeds)?;
            seeds.push(current);
            trace!(
                "seed vertex {} from triangle {} (trace position {})",
                current.0,
                triangle.0,
                cursor
            );
        }

        Ok(seeds)
    }

    /// Squared distance from a vertex to the closest unprojected stroke sample.
    fn stroke_distance_sq(&self, vertex: VertexId) -> Result<f32, SelectorError> {
        let pos = self
            .mesh
            .position(vertex)
            .ok_or(SelectorError::MissingVertex(vertex))?;
        Ok(self
            .stroke_points
            .iter()
            .map(|p| p.distance_squared(pos))
            .fold(f32::INFINITY, f32::min))
    }

    /// Corner of `triangle` closest to the stroke that is not seeded yet.
    fn nearest_unvisited(
        &self,
        triangle: TriangleId,
        position: usize,
        seeds: &SeedVertexSequence,
    ) -> Result<VertexId, SelectorError> {
        let corners = self
            .mesh
            .triangle_vertices(triangle)
            .ok_or(SelectorError::UnknownTriangle(triangle))?;

        let mut best: Option<(VertexId, f32)> = None;
        for vertex in corners {
            if seeds.contains(vertex) {
                continue;
            }
            let dist = self.stroke_distance_sq(vertex)?;
            if best.is_none_or(|(_, best_dist)| dist.total_cmp(&best_dist).is_lt()) {
                best = Some((vertex, dist));
            }
        }

        best.map(|(vertex, _)| vertex)
            .ok_or(SelectorError::NoUnvisitedVertex { triangle, position })
    }
}

/// Remove the middle corner of every traced triangle whose three corners
/// are all seeded. Returns the number of vertices removed.
///
/// Each distinct triangle is visited once, in trace order, against the seed
/// sequence as updated by earlier removals.
pub fn collapse_full_triangles(
    seeds: &mut SeedVertexSequence,
    sequence: &TriangleSequence,
    mesh: &TriangleMesh,
) -> usize {
    let mut visited = HashSet::new();
    let mut removed = 0;

    for triangle in sequence.iter() {
        if !visited.insert(triangle) {
            continue;
        }
        let Some(corners) = mesh.triangle_vertices(triangle) else {
            continue;
        };
        if !corners.iter().all(|&v| seeds.contains(v)) {
            continue;
        }
        match middle_corner(seeds, corners) {
            Some(middle) => {
                seeds.remove(middle);
                removed += 1;
                debug!(
                    "triangle {} fully seeded, dropped middle vertex {}",
                    triangle.0, middle.0
                );
            }
            None => debug!(
                "triangle {} fully seeded but has no unambiguous middle vertex, left as is",
                triangle.0
            ),
        }
    }

    removed
}

/// The corner positioned between the other two in seed order.
///
/// `None` when the answer is ambiguous: degenerate triangles with a repeated
/// corner, or fewer than three seeds.
fn middle_corner(seeds: &SeedVertexSequence, corners: [VertexId; 3]) -> Option<VertexId> {
    if seeds.len() < 3 {
        return None;
    }
    let [a, b, c] = corners;
    if a == b || b == c || a == c {
        return None;
    }
    let mut placed = [
        (seeds.position(a)?, a),
        (seeds.position(b)?, b),
        (seeds.position(c)?, c),
    ];
    placed.sort_unstable_by_key(|&(pos, _)| pos);
    Some(placed[1].1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::test_meshes;

    fn seq(ids: &[u32]) -> TriangleSequence {
        ids.iter().map(|&i| TriangleId(i)).collect()
    }

    fn ids(seeds: &SeedVertexSequence) -> Vec<u32> {
        seeds.iter().map(|v| v.0).collect()
    }

    /// Stroke samples along the strip at height `y`, from `x0` to `x1`.
    fn line(x0: f32, x1: f32, y: f32, samples: usize) -> Vec<Vec3> {
        (0..=samples)
            .map(|i| {
                let t = i as f32 / samples as f32;
                Vec3::new(x0 + (x1 - x0) * t, y, 0.0)
            })
            .collect()
    }

    /// Mesh whose triangle 7 is (10, 11, 12); the other triangles are filler.
    fn mesh_with_triangle_seven() -> TriangleMesh {
        let mut positions = vec![Vec3::new(5.0, 5.0, 5.0); 13];
        positions[10] = Vec3::new(0.0, 0.0, 0.0);
        positions[11] = Vec3::new(1.0, 0.0, 0.0);
        positions[12] = Vec3::new(0.0, 1.0, 0.0);
        let mut triangles = vec![[0, 1, 2]; 7];
        triangles.push([10, 11, 12]);
        TriangleMesh::new(positions, triangles).unwrap()
    }

    #[test]
    fn test_single_triangle_picks_vertex_nearest_to_stroke() {
        let mesh = mesh_with_triangle_seven();
        let stroke = vec![
            Vec3::new(0.9, 0.1, 0.0),
            Vec3::new(0.8, 0.1, 0.0),
            Vec3::new(0.7, 0.15, 0.0),
            Vec3::new(0.75, 0.2, 0.0),
            Vec3::new(0.85, 0.05, 0.0),
        ];
        let seeds = SeedVertexSelector::new(&mesh, &stroke)
            .select(&seq(&[7]))
            .unwrap();
        assert_eq!(ids(&seeds), vec![11]);
    }

    #[test]
    fn test_equidistant_corners_resolve_to_first_corner() {
        let mesh = mesh_with_triangle_seven();
        // Every corner of (10, 11, 12) is at squared distance 0.5
        let stroke = [Vec3::new(0.5, 0.5, 0.0)];
        let seeds = SeedVertexSelector::new(&mesh, &stroke)
            .select(&seq(&[7]))
            .unwrap();
        assert_eq!(ids(&seeds), vec![10]);
    }

    #[test]
    fn test_anchor_uses_closest_sample_not_average() {
        let mesh = mesh_with_triangle_seven();
        // Most samples sit near vertex 11, but one lands right on vertex 12
        let stroke = vec![
            Vec3::new(0.6, 0.3, 0.0),
            Vec3::new(0.6, 0.35, 0.0),
            Vec3::new(0.0, 0.99, 0.0),
        ];
        let seeds = SeedVertexSelector::new(&mesh, &stroke)
            .select(&seq(&[7]))
            .unwrap();
        assert_eq!(ids(&seeds), vec![12]);
    }

    #[test]
    fn test_disjoint_triangles_bridge_from_first_to_last() {
        // Triangles 3 = (3, 4, 5), 5 = (5, 6, 7), 9 = (9, 10, 11)
        let mesh = test_meshes::strip(5);
        let stroke = line(1.2, 4.8, 0.6, 18);
        let sequence = seq(&[3, 5, 9]);
        let seeds = SeedVertexSelector::new(&mesh, &stroke)
            .select(&sequence)
            .unwrap();

        assert_eq!(ids(&seeds), vec![5, 7, 9]);
        let first = seeds.as_slice()[0];
        let last = seeds.last().unwrap();
        assert!(mesh.triangle_has_vertex(TriangleId(3), first));
        assert!(mesh.triangle_has_vertex(TriangleId(9), last));
        assert!(mesh.triangle_has_vertex(TriangleId(5), seeds.as_slice()[1]));
    }

    #[test]
    fn test_walk_jumps_to_furthest_triangle_sharing_the_seed() {
        let mesh = test_meshes::strip(3);
        // Stroke runs above the strip's midline, so the top row wins
        let stroke = line(0.1, 2.9, 0.6, 28);
        let sequence = seq(&[0, 1, 2, 3, 4, 5]);
        let seeds = SeedVertexSelector::new(&mesh, &stroke)
            .walk(&sequence)
            .unwrap();
        assert_eq!(ids(&seeds), vec![1, 3, 5, 7]);
    }

    #[test]
    fn test_empty_sequence_yields_no_seeds() {
        let mesh = test_meshes::strip(1);
        let seeds = SeedVertexSelector::new(&mesh, &[])
            .select(&TriangleSequence::new())
            .unwrap();
        assert!(seeds.is_empty());
    }

    #[test]
    fn test_missing_stroke_samples_is_an_error() {
        let mesh = test_meshes::strip(1);
        let result = SeedVertexSelector::new(&mesh, &[]).select(&seq(&[0]));
        assert_eq!(result, Err(SelectorError::NoStrokeSamples));
    }

    #[test]
    fn test_unknown_triangle_is_an_error() {
        let mesh = test_meshes::strip(1);
        let stroke = [Vec3::ZERO];
        let result = SeedVertexSelector::new(&mesh, &stroke).select(&seq(&[5]));
        assert_eq!(result, Err(SelectorError::UnknownTriangle(TriangleId(5))));
    }

    #[test]
    fn test_fully_seeded_triangle_has_no_candidate() {
        let mesh = test_meshes::strip(1);
        let stroke = [Vec3::ZERO];
        let selector = SeedVertexSelector::new(&mesh, &stroke);
        let seeds: SeedVertexSequence = [0, 2, 1].into_iter().map(VertexId).collect();
        assert_eq!(
            selector.nearest_unvisited(TriangleId(0), 4, &seeds),
            Err(SelectorError::NoUnvisitedVertex {
                triangle: TriangleId(0),
                position: 4
            })
        );
    }

    #[test]
    fn test_collapse_removes_middle_vertex() {
        let mesh = test_meshes::strip(1); // triangle 0 = (0, 2, 1)
        let mut seeds: SeedVertexSequence = [0, 2, 1, 3].into_iter().map(VertexId).collect();
        let removed = collapse_full_triangles(&mut seeds, &seq(&[0]), &mesh);
        assert_eq!(removed, 1);
        assert_eq!(ids(&seeds), vec![0, 1, 3]);
    }

    #[test]
    fn test_collapse_with_interleaved_seed() {
        let mesh = test_meshes::strip(3); // triangle 0 = (0, 2, 1)
        let mut seeds: SeedVertexSequence = [0, 5, 2, 1].into_iter().map(VertexId).collect();
        collapse_full_triangles(&mut seeds, &seq(&[0]), &mesh);
        assert_eq!(ids(&seeds), vec![0, 5, 1]);
    }

    #[test]
    fn test_collapse_skips_degenerate_triangle() {
        let positions = vec![Vec3::ZERO, Vec3::X, Vec3::Y];
        let mesh = TriangleMesh::new(positions, vec![[0, 0, 1]]).unwrap();
        let mut seeds: SeedVertexSequence = [0, 1, 2].into_iter().map(VertexId).collect();
        let removed = collapse_full_triangles(&mut seeds, &seq(&[0]), &mesh);
        assert_eq!(removed, 0);
        assert_eq!(seeds.len(), 3);
    }

    #[test]
    fn test_collapse_leaves_partial_triangles_alone() {
        let mesh = test_meshes::strip(2);
        let mut seeds: SeedVertexSequence = [1, 3, 5].into_iter().map(VertexId).collect();
        let removed = collapse_full_triangles(&mut seeds, &seq(&[0, 1, 2, 3]), &mesh);
        assert_eq!(removed, 0);
        assert_eq!(ids(&seeds), vec![1, 3, 5]);
    }

    #[test]
    fn test_selected_seeds_are_unique_and_no_triangle_is_fully_seeded() {
        let mesh = test_meshes::strip(6);
        let traces: [&[u32]; 4] = [
            &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11],
            &[1, 2, 1, 2, 3, 4, 3],
            &[11, 10, 9, 8, 7, 6],
            &[0, 3, 4, 7, 8, 11],
        ];
        for (i, y) in [0.1, 0.5, 0.9].into_iter().enumerate() {
            let stroke = line(0.2, 5.8, y, 40 + i);
            for trace in traces {
                let sequence = seq(trace);
                let seeds = SeedVertexSelector::new(&mesh, &stroke)
                    .select(&sequence)
                    .unwrap();

                let unique: HashSet<_> = seeds.iter().collect();
                assert_eq!(unique.len(), seeds.len(), "duplicate seed for {trace:?}");
                assert!(seeds.as_slice().windows(2).all(|w| w[0] != w[1]));

                for triangle in sequence.iter() {
                    let corners = mesh.triangle_vertices(triangle).unwrap();
                    let seeded = corners.iter().filter(|&&v| seeds.contains(v)).count();
                    assert!(seeded <= 2, "triangle {triangle:?} fully seeded for {trace:?}");
                }

                let first = seeds.as_slice()[0];
                assert!(mesh.triangle_has_vertex(sequence.get(0).unwrap(), first));
                let last = seeds.last().unwrap();
                assert!(mesh.triangle_has_vertex(sequence.get(sequence.len() - 1).unwrap(), last));
            }
        }
    }

    #[test]
    fn test_seed_sequence_refuses_duplicates() {
        let mut seeds = SeedVertexSequence::new();
        assert!(seeds.push(VertexId(4)));
        assert!(!seeds.push(VertexId(4)));
        assert!(seeds.push(VertexId(2)));
        assert_eq!(seeds.pairs().collect::<Vec<_>>(), vec![(VertexId(4), VertexId(2))]);
        assert!(seeds.remove(VertexId(4)));
        assert!(!seeds.contains(VertexId(4)));
        assert_eq!(seeds.position(VertexId(2)), Some(0));
    }
}
