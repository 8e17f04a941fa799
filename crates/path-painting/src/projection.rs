//! Stroke projection: window pixels plus sampled depth back to world space.
//!
//! The math follows the fixed-function convention: window coordinates are
//! mapped through the viewport to normalized device coordinates, depth from
//! `[0, 1]` to `[-1, 1]`, and the result is pushed through the inverse of
//! `projection * model_view`.

use glam::{Mat4, Vec3, Vec4};
use tracing::trace;

use crate::types::{ScreenPoint, Stroke};

/// Errors that can occur while unprojecting a window position.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProjectionError {
    #[error("Camera transform is not invertible")]
    SingularTransform,
    #[error("Unprojected point has w = 0")]
    PointAtInfinity,
    #[error("Viewport {width}x{height} has no area")]
    EmptyViewport { width: i32, height: i32 },
}

/// Viewport rectangle in device pixels (origin bottom-left).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Viewport {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Viewport covering a whole window
    pub fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width as i32, height as i32)
    }
}

/// Camera state captured for one unprojection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub model_view: Mat4,
    pub projection: Mat4,
    pub viewport: Viewport,
}

/// Source of depth samples in device pixel coordinates (row 0 at the bottom).
pub trait DepthSampler {
    /// Depth in `[0, 1]` at the given device pixel. Background pixels
    /// typically read back as `1.0`.
    fn depth_at(&self, x: i32, row: i32) -> f32;
}

impl<F> DepthSampler for F
where
    F: Fn(i32, i32) -> f32,
{
    fn depth_at(&self, x: i32, row: i32) -> f32 {
        self(x, row)
    }
}

/// A depth buffer read back from the renderer, rows stored bottom-up.
#[derive(Debug, Clone)]
pub struct DepthBuffer {
    width: u32,
    height: u32,
    depths: Vec<f32>,
}

impl DepthBuffer {
    /// Wrap a readback. Returns `None` if the length does not match the size.
    pub fn new(width: u32, height: u32, depths: Vec<f32>) -> Option<Self> {
        (depths.len() == width as usize * height as usize).then_some(Self {
            width,
            height,
            depths,
        })
    }
}

impl DepthSampler for DepthBuffer {
    fn depth_at(&self, x: i32, row: i32) -> f32 {
        if x < 0 || row < 0 || x >= self.width as i32 || row >= self.height as i32 {
            return 1.0;
        }
        self.depths[row as usize * self.width as usize + x as usize]
    }
}

/// Map a window position (`x`, device row, depth) back to world space.
///
/// Depth is not validated: a background sample yields a point on the far
/// plane, which callers must tolerate.
pub fn unproject(window: Vec3, camera: &CameraState) -> Result<Vec3, ProjectionError> {
    let vp = camera.viewport;
    if vp.width <= 0 || vp.height <= 0 {
        return Err(ProjectionError::EmptyViewport {
            width: vp.width,
            height: vp.height,
        });
    }

    let combined = camera.projection * camera.model_view;
    let det = combined.determinant();
    if det == 0.0 || !det.is_finite() {
        return Err(ProjectionError::SingularTransform);
    }

    let ndc = Vec4::new(
        (window.x - vp.x as f32) / vp.width as f32 * 2.0 - 1.0,
        (window.y - vp.y as f32) / vp.height as f32 * 2.0 - 1.0,
        window.z * 2.0 - 1.0,
        1.0,
    );
    let world = combined.inverse() * ndc;
    if world.w == 0.0 {
        return Err(ProjectionError::PointAtInfinity);
    }
    Ok(world.truncate() / world.w)
}

/// Map a world position to window coordinates (`x`, device row, depth).
pub fn project(world: Vec3, camera: &CameraState) -> Result<Vec3, ProjectionError> {
    let clip = camera.projection * camera.model_view * world.extend(1.0);
    if clip.w == 0.0 {
        return Err(ProjectionError::PointAtInfinity);
    }
    let ndc = clip.truncate() / clip.w;
    let vp = camera.viewport;
    Ok(Vec3::new(
        vp.x as f32 + (ndc.x + 1.0) * 0.5 * vp.width as f32,
        vp.y as f32 + (ndc.y + 1.0) * 0.5 * vp.height as f32,
        (ndc.z + 1.0) * 0.5,
    ))
}

/// Device row for a window `y` (window rows grow downwards, device rows upwards).
pub fn device_row(y: i32, window_height: u32) -> i32 {
    window_height as i32 - y - 1
}

/// Unprojects stroke samples using the current camera and depth buffer.
pub struct StrokeProjector<'a> {
    camera: &'a CameraState,
    depth: &'a dyn DepthSampler,
    window_height: u32,
}

impl<'a> StrokeProjector<'a> {
    pub fn new(camera: &'a CameraState, depth: &'a dyn DepthSampler, window_height: u32) -> Self {
        Self {
            camera,
            depth,
            window_height,
        }
    }

    /// World position under a screen point.
    pub fn unproject_point(&self, point: ScreenPoint) -> Result<Vec3, ProjectionError> {
        let row = device_row(point.y, self.window_height);
        let depth = self.depth.depth_at(point.x, row);
        unproject(Vec3::new(point.x as f32, row as f32, depth), self.camera)
    }

    /// World positions of every stroke sample that unprojects cleanly,
    /// in stroke order.
    pub fn project_stroke(&self, stroke: &Stroke) -> Vec<Vec3> {
        stroke
            .points()
            .iter()
            .filter_map(|&p| match self.unproject_point(p) {
                Ok(world) => Some(world),
                Err(e) => {
                    trace!("skipping stroke point [{}, {}]: {}", p.x, p.y, e);
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity_camera(size: u32) -> CameraState {
        CameraState {
            model_view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            viewport: Viewport::full(size, size),
        }
    }

    fn perspective_camera() -> CameraState {
        CameraState {
            model_view: Mat4::look_at_rh(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y),
            projection: Mat4::perspective_rh_gl(60f32.to_radians(), 4.0 / 3.0, 0.1, 100.0),
            viewport: Viewport::full(800, 600),
        }
    }

    #[test]
    fn test_device_row_flips_y() {
        assert_eq!(device_row(0, 100), 99);
        assert_eq!(device_row(99, 100), 0);
    }

    #[test]
    fn test_unproject_identity_center() {
        let camera = identity_camera(100);
        let world = unproject(Vec3::new(50.0, 50.0, 0.5), &camera).unwrap();
        assert!(world.length() < 1e-6);

        let corner = unproject(Vec3::new(0.0, 0.0, 0.0), &camera).unwrap();
        assert!((corner - Vec3::new(-1.0, -1.0, -1.0)).length() < 1e-6);
    }

    #[test]
    fn test_project_unproject_round_trip() {
        let camera = perspective_camera();
        let world = Vec3::new(0.3, -0.2, 0.5);
        let window = project(world, &camera).unwrap();
        let back = unproject(window, &camera).unwrap();
        assert!((back - world).length() < 1e-3, "got {back:?}");
    }

    #[test]
    fn test_singular_camera_is_rejected() {
        let camera = CameraState {
            model_view: Mat4::ZERO,
            projection: Mat4::IDENTITY,
            viewport: Viewport::full(10, 10),
        };
        assert_eq!(
            unproject(Vec3::ZERO, &camera),
            Err(ProjectionError::SingularTransform)
        );
    }

    #[test]
    fn test_empty_viewport_is_rejected() {
        let mut camera = identity_camera(10);
        camera.viewport.width = 0;
        assert!(matches!(
            unproject(Vec3::ZERO, &camera),
            Err(ProjectionError::EmptyViewport { .. })
        ));
    }

    #[test]
    fn test_projector_samples_depth_at_flipped_row() {
        let camera = identity_camera(100);
        // Depth is 0.5 only on device row 50, which is window y = 49
        let depth = |_x: i32, row: i32| -> f32 { if row == 50 { 0.5 } else { 1.0 } };
        let projector = StrokeProjector::new(&camera, &depth, 100);

        let world = projector.unproject_point(ScreenPoint::new(50, 49)).unwrap();
        assert!(world.length() < 1e-6);

        let far = projector.unproject_point(ScreenPoint::new(50, 10)).unwrap();
        assert!((far.z - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_depth_buffer_bounds() {
        let buffer = DepthBuffer::new(2, 2, vec![0.1, 0.2, 0.3, 0.4]).unwrap();
        assert_eq!(buffer.depth_at(1, 1), 0.4);
        assert_eq!(buffer.depth_at(0, 1), 0.3);
        assert_eq!(buffer.depth_at(2, 0), 1.0);
        assert_eq!(buffer.depth_at(-1, 0), 1.0);
        assert!(DepthBuffer::new(2, 2, vec![0.0; 3]).is_none());
    }

    #[test]
    fn test_project_stroke_skips_failures() {
        let camera = CameraState {
            model_view: Mat4::ZERO,
            projection: Mat4::IDENTITY,
            viewport: Viewport::full(10, 10),
        };
        let depth = |_: i32, _: i32| -> f32 { 0.5 };
        let projector = StrokeProjector::new(&camera, &depth, 10);
        let stroke: Stroke = [ScreenPoint::new(1, 1), ScreenPoint::new(2, 2)]
            .into_iter()
            .collect();
        assert!(projector.project_stroke(&stroke).is_empty());
    }
}
