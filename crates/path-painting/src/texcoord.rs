//! Texcoord assignment extension point.
//!
//! Turning the geodesic distance field into local texture coordinates is not
//! implemented yet. The stages are named here so a real implementation can be
//! dropped into [`crate::pipeline::PathPainter::compute_3d_path`] without
//! touching the seeding code.

use tracing::debug;

use crate::selector::SeedVertexSequence;
use crate::types::VertexId;

/// Downstream consumer of one seeding round.
pub trait TexcoordStage {
    /// Vertices lying on curves of equal geodesic distance from the seeds.
    fn collect_equidistant_vertices(
        &mut self,
        distances: &[f32],
        seeds: &SeedVertexSequence,
    ) -> Vec<VertexId>;

    /// Cut equidistance curves where they run past the ends of the stroke.
    fn trim_equidistant_segments(
        &mut self,
        equidistant: Vec<VertexId>,
        seeds: &SeedVertexSequence,
    ) -> Vec<VertexId>;

    /// Write local texture coordinates for the trimmed vertices.
    /// Returns how many vertices received coordinates.
    fn assign_local_texcoords(&mut self, trimmed: &[VertexId], distances: &[f32]) -> usize;

    /// Run the three stages in order.
    fn run(&mut self, distances: &[f32], seeds: &SeedVertexSequence) -> usize {
        let equidistant = self.collect_equidistant_vertices(distances, seeds);
        let trimmed = self.trim_equidistant_segments(equidistant, seeds);
        self.assign_local_texcoords(&trimmed, distances)
    }
}

/// Stage used until texcoord assignment exists: assigns nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct PendingTexcoords;

impl TexcoordStage for PendingTexcoords {
    fn collect_equidistant_vertices(
        &mut self,
        distances: &[f32],
        seeds: &SeedVertexSequence,
    ) -> Vec<VertexId> {
        debug!(
            "equidistant vertex collection not implemented ({} distances, {} seeds)",
            distances.len(),
            seeds.len()
        );
        Vec::new()
    }

    fn trim_equidistant_segments(
        &mut self,
        equidistant: Vec<VertexId>,
        _seeds: &SeedVertexSequence,
    ) -> Vec<VertexId> {
        debug!("equidistant segment trimming not implemented");
        equidistant
    }

    fn assign_local_texcoords(&mut self, trimmed: &[VertexId], _distances: &[f32]) -> usize {
        debug!(
            "local texcoord assignment not implemented, {} vertices left unassigned",
            trimmed.len()
        );
        0
    }
}
