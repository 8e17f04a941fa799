//! Stroke input handling for the path controller

use glam::Vec3;
use tracing::trace;

use crate::projection::{CameraState, DepthSampler, StrokeProjector};
use crate::types::ScreenPoint;

use super::PathPainter;

impl PathPainter {
    /// Begin a new stroke, discarding any unfinished one.
    pub fn start_new_path(&mut self) {
        self.recorder.start_new_path();
    }

    /// Record a stroke sample. Returns whether it was added.
    pub fn add_point(&mut self, pos: ScreenPoint) -> bool {
        self.recorder.add_point(pos)
    }

    /// Record a stroke sample and unproject it for on-screen feedback.
    ///
    /// The world point is for display only and never changes what is
    /// recorded. `None` when the camera cannot be inverted.
    pub fn add_point_with_feedback(
        &mut self,
        pos: ScreenPoint,
        camera: &CameraState,
        depth: &dyn DepthSampler,
    ) -> Option<Vec3> {
        self.recorder.add_point(pos);
        let projector = StrokeProjector::new(camera, depth, self.display.height);
        match projector.unproject_point(pos) {
            Ok(world) => Some(world),
            Err(e) => {
                trace!("no feedback for [{}, {}]: {}", pos.x, pos.y, e);
                None
            }
        }
    }

    /// Finish the current stroke and queue it for resolution.
    pub fn end_path(&mut self) {
        self.recorder.end_path();
    }
}
