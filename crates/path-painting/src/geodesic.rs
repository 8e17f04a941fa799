//! Geodesic seeding bridge.
//!
//! The distance solver itself is an external service behind
//! [`GeodesicSolver`]. The bridge resets it, registers the seed walk as
//! zero-distance sources, collects the per-vertex distance field and stitches
//! together the surface path between consecutive seeds.
//!
//! [`EdgeGraphSolver`] is a Dijkstra solver over mesh edges. It is exact only
//! along edges, which is enough for tests and as a fallback.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use tracing::{debug, warn};

use crate::constants::{TRIANGLE_MARKED, TRIANGLE_UNMARKED, UNREACHABLE_DISTANCE};
use crate::mesh::TriangleMesh;
use crate::selector::SeedVertexSequence;
use crate::triangle_sequence::TriangleSequence;
use crate::types::VertexId;

/// Errors reported by a geodesic solver or the bridge around it.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeodesicError {
    #[error("Vertex {vertex} is outside the solver mesh ({vertex_count} vertices)")]
    VertexOutOfRange { vertex: VertexId, vertex_count: usize },
    #[error("No surface path from vertex {from} to vertex {to}")]
    NoPath { from: VertexId, to: VertexId },
    #[error("Property buffer holds {actual} values, mesh has {expected} vertices")]
    BufferSizeMismatch { expected: usize, actual: usize },
}

/// Surface path between two vertices at two resolutions.
///
/// For [`EdgeGraphSolver`] the zero-order samples are vertex indices along
/// the path and the first-order samples are indices of the mesh edges it
/// runs along.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeodesicPath {
    pub zero_order: Vec<u32>,
    pub first_order: Vec<u32>,
}

impl GeodesicPath {
    /// Append another path segment.
    pub fn extend(&mut self, other: GeodesicPath) {
        self.zero_order.extend(other.zero_order);
        self.first_order.extend(other.first_order);
    }

    pub fn is_empty(&self) -> bool {
        self.zero_order.is_empty() && self.first_order.is_empty()
    }
}

/// Geodesic distance service consumed by the bridge.
pub trait GeodesicSolver {
    /// Number of vertices distances are reported for
    fn vertex_count(&self) -> usize;

    /// Forget all seeds and cached path state.
    fn reset(&mut self);

    /// Register zero-distance sources.
    fn add_seeds(&mut self, seeds: &[VertexId]) -> Result<(), GeodesicError>;

    /// Distance from the closest seed for every vertex.
    ///
    /// The returned vector has `vertex_count()` entries, all non-negative.
    /// With no seeds registered every entry is `0.0`.
    fn compute_distances(&mut self) -> Vec<f32>;

    /// Shortest surface path from `from` to `to`.
    fn compute_path(&mut self, from: VertexId, to: VertexId) -> Result<GeodesicPath, GeodesicError>;
}

/// Drives one seeding round on a solver.
pub struct GeodesicSeedingBridge<'a, S: GeodesicSolver + ?Sized> {
    solver: &'a mut S,
}

impl<'a, S: GeodesicSolver + ?Sized> GeodesicSeedingBridge<'a, S> {
    pub fn new(solver: &'a mut S) -> Self {
        Self { solver }
    }

    /// Clear seeds and path state left over from the previous stroke.
    pub fn reset_seeding(&mut self) {
        self.solver.reset();
    }

    /// Register the seed walk as distance sources. An empty walk seeds nothing.
    pub fn seed(&mut self, seeds: &SeedVertexSequence) -> Result<(), GeodesicError> {
        if seeds.is_empty() {
            debug!("no seed vertices, geodesic pass is a no-op");
            return Ok(());
        }
        self.solver.add_seeds(seeds.as_slice())
    }

    /// Per-vertex distance field, owned by the caller.
    pub fn compute_distances(&mut self) -> Vec<f32> {
        let distances = self.solver.compute_distances();
        if distances.len() != self.solver.vertex_count() {
            warn!(
                "solver returned {} distances for {} vertices",
                distances.len(),
                self.solver.vertex_count()
            );
        }
        distances
    }

    /// Path between one pair of seeds.
    pub fn path_between(
        &mut self,
        from: VertexId,
        to: VertexId,
    ) -> Result<GeodesicPath, GeodesicError> {
        self.solver.compute_path(from, to)
    }

    /// Concatenated paths between every consecutive pair of seeds, in seed order.
    pub fn stroke_path(
        &mut self,
        seeds: &SeedVertexSequence,
    ) -> Result<GeodesicPath, GeodesicError> {
        let mut path = GeodesicPath::default();
        for (from, to) in seeds.pairs() {
            path.extend(self.path_between(from, to)?);
        }
        Ok(path)
    }
}

/// Reset the auxiliary per-corner marking channel and mark every traced triangle.
///
/// The channel stores three scalars per triangle (one per corner of the
/// unshared "flat" mesh). Returns the number of triangles marked.
pub fn mark_triangles(marks: &mut [f32], sequence: &TriangleSequence) -> usize {
    marks.fill(TRIANGLE_UNMARKED);
    let mut marked = 0;
    for triangle in sequence.iter() {
        let base = triangle.index() * 3;
        match marks.get_mut(base..base + 3) {
            Some(corners) => {
                corners.fill(TRIANGLE_MARKED);
                marked += 1;
            }
            None => warn!(
                "triangle {} is outside the marking buffer ({} corners)",
                triangle,
                marks.len()
            ),
        }
    }
    marked
}

/// Dijkstra geodesic solver over the edge graph of a triangle mesh.
#[derive(Debug, Clone)]
pub struct EdgeGraphSolver {
    /// For each vertex: (neighbor, edge index, edge length)
    adjacency: Vec<Vec<(u32, u32, f32)>>,
    edge_count: usize,
    seeds: Vec<VertexId>,
}

/// Heap entry ordered so that `BinaryHeap` pops the smallest distance first.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Frontier {
    dist: f32,
    vertex: u32,
}

impl Eq for Frontier {}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .dist
            .total_cmp(&self.dist)
            .then_with(|| other.vertex.cmp(&self.vertex))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl EdgeGraphSolver {
    pub fn new(mesh: &TriangleMesh) -> Self {
        let positions = mesh.positions();
        let mut adjacency = vec![Vec::new(); positions.len()];
        let mut edge_ids: HashMap<(u32, u32), u32> = HashMap::new();

        for tri in mesh.triangles() {
            for k in 0..3 {
                let (a, b) = (tri[k], tri[(k + 1) % 3]);
                if a == b {
                    continue;
                }
                let key = (a.min(b), a.max(b));
                if edge_ids.contains_key(&key) {
                    continue;
                }
                let id = edge_ids.len() as u32;
                edge_ids.insert(key, id);
                let len = positions[a as usize].distance(positions[b as usize]);
                adjacency[a as usize].push((b, id, len));
                adjacency[b as usize].push((a, id, len));
            }
        }

        Self {
            adjacency,
            edge_count: edge_ids.len(),
            seeds: Vec::new(),
        }
    }

    /// Number of undirected edges (first-order path samples index these)
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    fn check_vertex(&self, vertex: VertexId) -> Result<(), GeodesicError> {
        if vertex.index() >= self.adjacency.len() {
            return Err(GeodesicError::VertexOutOfRange {
                vertex,
                vertex_count: self.adjacency.len(),
            });
        }
        Ok(())
    }

    /// Multi-source Dijkstra. Returns distances and, per vertex, the
    /// (predecessor, edge) it was reached through.
    fn dijkstra(&self, sources: &[VertexId]) -> (Vec<f32>, Vec<Option<(u32, u32)>>) {
        let n = self.adjacency.len();
        let mut dist = vec![UNREACHABLE_DISTANCE; n];
        let mut via = vec![None; n];
        let mut heap = BinaryHeap::new();

        for &s in sources {
            dist[s.index()] = 0.0;
            heap.push(Frontier {
                dist: 0.0,
                vertex: s.0,
            });
        }

        while let Some(Frontier { dist: d, vertex }) = heap.pop() {
            if d > dist[vertex as usize] {
                continue;
            }
            for &(next, edge, len) in &self.adjacency[vertex as usize] {
                let candidate = d + len;
                if candidate < dist[next as usize] {
                    dist[next as usize] = candidate;
                    via[next as usize] = Some((vertex, edge));
                    heap.push(Frontier {
                        dist: candidate,
                        vertex: next,
                    });
                }
            }
        }

        (dist, via)
    }
}

impl GeodesicSolver for EdgeGraphSolver {
    fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    fn reset(&mut self) {
        self.seeds.clear();
    }

    fn add_seeds(&mut self, seeds: &[VertexId]) -> Result<(), GeodesicError> {
        for &seed in seeds {
            self.check_vertex(seed)?;
        }
        self.seeds.extend_from_slice(seeds);
        Ok(())
    }

    fn compute_distances(&mut self) -> Vec<f32> {
        if self.seeds.is_empty() {
            return vec![0.0; self.adjacency.len()];
        }
        self.dijkstra(&self.seeds).0
    }

    fn compute_path(
        &mut self,
        from: VertexId,
        to: VertexId,
    ) -> Result<GeodesicPath, GeodesicError> {
        self.check_vertex(from)?;
        self.check_vertex(to)?;

        let (dist, via) = self.dijkstra(&[from]);
        if !dist[to.index()].is_finite() {
            return Err(GeodesicError::NoPath { from, to });
        }

        let mut path = GeodesicPath::default();
        let mut vertex = to.0;
        path.zero_order.push(vertex);
        while let Some((prev, edge)) = via[vertex as usize] {
            path.first_order.push(edge);
            path.zero_order.push(prev);
            vertex = prev;
        }
        path.zero_order.reverse();
        path.first_order.reverse();
        Ok(path)
    }
}
