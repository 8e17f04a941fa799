//! Resolving recorded strokes onto the mesh surface

use tracing::{debug, info};

use crate::error::PipelineError;
use crate::geodesic::{
    GeodesicError, GeodesicPath, GeodesicSeedingBridge, GeodesicSolver, mark_triangles,
};
use crate::projection::StrokeProjector;
use crate::selector::{SeedVertexSelector, SeedVertexSequence};
use crate::texcoord::TexcoordStage;
use crate::triangle_sequence::{TriangleSequence, build_triangle_sequence};

use super::{PathOutcome, PathPainter, PropertyBuffers, SurfaceContext};

impl PathPainter {
    /// Resolve every queued stroke onto the mesh and run one geodesic round.
    ///
    /// 1. Each stroke is traced through the lookup surface and its seeds are
    ///    selected against the unprojected stroke samples
    /// 2. The solver is reset, seeded with the seeds of all strokes and asked
    ///    for its distance field
    /// 3. Paths are reconstructed between consecutive seeds of each stroke
    /// 4. The marking channel, the distance view and the stored path are
    ///    written, and the queued strokes are consumed
    /// 5. The texcoord stage consumes the distances and seeds
    ///
    /// Strokes that land on no triangle simply contribute no seeds; with no
    /// seeds at all the distance field is zero. On error nothing is written
    /// and the queued strokes stay in the history.
    pub fn compute_3d_path<S: GeodesicSolver + ?Sized>(
        &mut self,
        ctx: &SurfaceContext<'_>,
        solver: &mut S,
        buffers: PropertyBuffers<'_>,
        texcoords: &mut dyn TexcoordStage,
    ) -> Result<PathOutcome, PipelineError> {
        ctx.lookup.ensure_matches(self.display.width, self.display.height)?;
        let PropertyBuffers {
            distances: distance_view,
            triangle_marks,
        } = buffers;
        let vertex_count = ctx.mesh.vertex_count();
        if distance_view.len() != vertex_count {
            return Err(GeodesicError::BufferSizeMismatch {
                expected: vertex_count,
                actual: distance_view.len(),
            }
            .into());
        }

        let history = self.recorder.history();
        info!("Computing 3D path for {} stroke(s)", history.len());

        let projector = StrokeProjector::new(ctx.camera, ctx.depth, self.display.height);
        let mut sequences = Vec::with_capacity(history.len());
        let mut per_stroke_seeds = Vec::with_capacity(history.len());
        for stroke in history.iter() {
            let sequence = build_triangle_sequence(stroke, ctx.lookup, ctx.mesh);
            let seeds = if sequence.is_empty() {
                SeedVertexSequence::new()
            } else {
                let world_points = projector.project_stroke(stroke);
                SeedVertexSelector::new(ctx.mesh, &world_points).select(&sequence)?
            };
            sequences.push(sequence);
            per_stroke_seeds.push(seeds);
        }

        let seeds: SeedVertexSequence = per_stroke_seeds.iter().flat_map(|s| s.iter()).collect();

        let mut bridge = GeodesicSeedingBridge::new(solver);
        bridge.reset_seeding();
        bridge.seed(&seeds)?;

        let distances = bridge.compute_distances();
        if distances.len() != distance_view.len() {
            return Err(GeodesicError::BufferSizeMismatch {
                expected: distance_view.len(),
                actual: distances.len(),
            }
            .into());
        }

        let mut path = GeodesicPath::default();
        for stroke_seeds in &per_stroke_seeds {
            path.extend(bridge.stroke_path(stroke_seeds)?);
        }
        debug!(
            "path has {} vertex sample(s) and {} edge sample(s)",
            path.zero_order.len(),
            path.first_order.len()
        );

        let traced: TriangleSequence = sequences.iter().flat_map(|s| s.iter()).collect();
        let marked_triangles = mark_triangles(triangle_marks, &traced);
        distance_view.copy_from_slice(&distances);
        self.last_path = path;
        self.recorder.history_mut().clear();

        let texcoords_assigned = texcoords.run(&distances, &seeds);

        Ok(PathOutcome {
            sequences,
            seeds,
            marked_triangles,
            texcoords_assigned,
        })
    }
}
