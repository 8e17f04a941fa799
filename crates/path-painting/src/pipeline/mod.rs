//! Path painting controller
//!
//! This module ties the stages together:
//! - Input handling (`start_new_path`, `add_point`, `end_path`)
//! - Triangle tracing against the lookup surface
//! - Seed selection against the unprojected stroke
//! - Geodesic seeding, distance write-back and path reconstruction
//!
//! The controller is owned by the host and passed by reference to its input
//! and render callbacks. It does not depend on Bevy itself; with the `bevy`
//! feature it can be stored as a resource.

mod resolve;
mod stroke;

#[cfg(feature = "bevy")]
use bevy::prelude::Resource;
use texture_brush_config::{BrushConfig, DisplayConfig};

use crate::geodesic::GeodesicPath;
use crate::lookup::TriangleLookupSurface;
use crate::mesh::TriangleMesh;
use crate::projection::{CameraState, DepthSampler};
use crate::recorder::ScreenPathRecorder;
use crate::selector::SeedVertexSequence;
use crate::triangle_sequence::TriangleSequence;

/// Read-only scene state for one run.
pub struct SurfaceContext<'a> {
    pub mesh: &'a TriangleMesh,
    /// Triangle-index snapshot taken for the current viewport
    pub lookup: &'a TriangleLookupSurface,
    pub camera: &'a CameraState,
    pub depth: &'a dyn DepthSampler,
}

/// Mesh property buffers written by one run.
///
/// Borrowed for the duration of the run only.
pub struct PropertyBuffers<'a> {
    /// One distance per mesh vertex
    pub distances: &'a mut [f32],
    /// Marking channel of the flat debug mesh, three entries per triangle
    pub triangle_marks: &'a mut [f32],
}

/// What a run produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathOutcome {
    /// Triangle trace of every resolved stroke, oldest first
    pub sequences: Vec<TriangleSequence>,
    /// Seeds registered with the solver (union over strokes)
    pub seeds: SeedVertexSequence,
    pub marked_triangles: usize,
    pub texcoords_assigned: usize,
}

/// Records strokes and resolves them onto a mesh.
#[cfg_attr(feature = "bevy", derive(Resource))]
pub struct PathPainter {
    recorder: ScreenPathRecorder,
    display: DisplayConfig,
    /// Concatenated path of the last run
    last_path: GeodesicPath,
}

impl PathPainter {
    /// Create a controller. Window dimensions are read once, here.
    pub fn new(config: &BrushConfig) -> Self {
        Self {
            recorder: ScreenPathRecorder::new(config.history_capacity),
            display: config.display,
            last_path: GeodesicPath::default(),
        }
    }

    pub fn display(&self) -> &DisplayConfig {
        &self.display
    }

    pub fn recorder(&self) -> &ScreenPathRecorder {
        &self.recorder
    }

    /// Concatenated path of the last run
    pub fn last_path(&self) -> &GeodesicPath {
        &self.last_path
    }

    /// Vertex-level samples of the last path
    pub fn zero_order_path(&self) -> &[u32] {
        &self.last_path.zero_order
    }

    /// Edge-level samples of the last path
    pub fn first_order_path(&self) -> &[u32] {
        &self.last_path.first_order
    }
}

impl Default for PathPainter {
    fn default() -> Self {
        Self::new(&BrushConfig::default())
    }
}
