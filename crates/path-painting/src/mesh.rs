//! Read-only triangle mesh shared by the stroke pipeline and the geodesic solver.

use glam::Vec3;

use crate::types::{TriangleId, VertexId};

/// Errors raised while assembling a [`TriangleMesh`].
#[derive(Debug, thiserror::Error)]
pub enum MeshError {
    #[error("Index buffer length {0} is not a multiple of 3")]
    RaggedIndices(usize),
    #[error("Triangle {triangle} references vertex {vertex}, mesh has {vertex_count} vertices")]
    VertexOutOfRange {
        triangle: u32,
        vertex: u32,
        vertex_count: usize,
    },
}

/// Vertex positions plus triangles as vertex-index triples.
///
/// Every triangle index is checked against the vertex count at construction,
/// so lookups through a valid [`TriangleId`] never go out of bounds.
#[derive(Debug, Clone)]
pub struct TriangleMesh {
    positions: Vec<Vec3>,
    triangles: Vec<[u32; 3]>,
}

impl TriangleMesh {
    /// Build a mesh from positions and per-triangle vertex triples.
    pub fn new(positions: Vec<Vec3>, triangles: Vec<[u32; 3]>) -> Result<Self, MeshError> {
        let vertex_count = positions.len();
        for (tri_idx, tri) in triangles.iter().enumerate() {
            if let Some(&vertex) = tri.iter().find(|&&v| v as usize >= vertex_count) {
                return Err(MeshError::VertexOutOfRange {
                    triangle: tri_idx as u32,
                    vertex,
                    vertex_count,
                });
            }
        }
        Ok(Self {
            positions,
            triangles,
        })
    }

    /// Build a mesh from a flat index buffer (3 indices per triangle).
    pub fn from_indices(positions: Vec<Vec3>, indices: &[u32]) -> Result<Self, MeshError> {
        if indices.len() % 3 != 0 {
            return Err(MeshError::RaggedIndices(indices.len()));
        }
        let triangles = indices
            .chunks_exact(3)
            .map(|c| [c[0], c[1], c[2]])
            .collect();
        Self::new(positions, triangles)
    }

    /// Get the number of vertices in the mesh
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Get the number of triangles in the mesh
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Whether `triangle` addresses a triangle of this mesh
    pub fn contains_triangle(&self, triangle: TriangleId) -> bool {
        triangle.index() < self.triangles.len()
    }

    /// Get the vertex ids of a triangle
    pub fn triangle_vertices(&self, triangle: TriangleId) -> Option<[VertexId; 3]> {
        self.triangles
            .get(triangle.index())
            .map(|t| [VertexId(t[0]), VertexId(t[1]), VertexId(t[2])])
    }

    /// Whether `vertex` is one of the corners of `triangle`
    pub fn triangle_has_vertex(&self, triangle: TriangleId, vertex: VertexId) -> bool {
        self.triangles
            .get(triangle.index())
            .is_some_and(|t| t.contains(&vertex.0))
    }

    /// Get the position of a vertex
    pub fn position(&self, vertex: VertexId) -> Option<Vec3> {
        self.positions.get(vertex.index()).copied()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }
}

#[cfg(test)]
pub(crate) mod test_meshes {
    use super::*;

    /// A flat strip of unit quads along +X in the z = 0 plane.
    ///
    /// Vertex `2 * i` sits at `(i, 0, 0)` and `2 * i + 1` at `(i, 1, 0)`.
    /// Quad `i` is split into triangles `2 * i` = (2i, 2i+2, 2i+1) and
    /// `2 * i + 1` = (2i+1, 2i+2, 2i+3).
    pub fn strip(quads: u32) -> TriangleMesh {
        let mut positions = Vec::new();
        for i in 0..=quads {
            positions.push(Vec3::new(i as f32, 0.0, 0.0));
            positions.push(Vec3::new(i as f32, 1.0, 0.0));
        }
        let mut triangles = Vec::new();
        for i in 0..quads {
            let a = 2 * i;
            triangles.push([a, a + 2, a + 1]);
            triangles.push([a + 1, a + 2, a + 3]);
        }
        TriangleMesh::new(positions, triangles).unwrap()
    }
}
