//! Triangle lookup surface: per-pixel triangle ids read back from the
//! triangle-index render target.

use tracing::trace;

use crate::constants::NO_TRIANGLE_SAMPLE;
use crate::projection::device_row;
use crate::types::{ScreenPoint, TriangleId};

/// Errors that can occur while wrapping a lookup readback.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("Lookup buffer holds {actual} samples, expected {width}x{height} = {expected}")]
    SizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
    #[error("Raw lookup buffer of {0} bytes is not a whole number of 4-byte samples")]
    UnalignedBytes(usize),
    #[error("Lookup surface is {width}x{height}, viewport is {viewport_width}x{viewport_height}")]
    ViewportMismatch {
        width: u32,
        height: u32,
        viewport_width: u32,
        viewport_height: u32,
    },
}

/// Raw value read from the lookup surface: triangle index + 1, or 0 when
/// no triangle covers the pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriangleIndexSample(pub i32);

impl TriangleIndexSample {
    /// Decode into a triangle id valid for a mesh with `triangle_count` triangles.
    ///
    /// Returns `None` for "no triangle" and for stale or corrupt values past
    /// the end of the mesh.
    pub fn decode(self, triangle_count: usize) -> Option<TriangleId> {
        if self.0 <= NO_TRIANGLE_SAMPLE {
            return None;
        }
        let index = (self.0 - 1) as usize;
        (index < triangle_count).then_some(TriangleId(index as u32))
    }
}

/// Snapshot of the triangle-index render target, rows stored bottom-up.
#[derive(Debug, Clone)]
pub struct TriangleLookupSurface {
    width: u32,
    height: u32,
    samples: Vec<i32>,
}

impl TriangleLookupSurface {
    /// Wrap one integer sample per pixel.
    pub fn new(width: u32, height: u32, samples: Vec<i32>) -> Result<Self, LookupError> {
        let expected = width as usize * height as usize;
        if samples.len() != expected {
            return Err(LookupError::SizeMismatch {
                width,
                height,
                expected,
                actual: samples.len(),
            });
        }
        Ok(Self {
            width,
            height,
            samples,
        })
    }

    /// Wrap a raw byte readback of native-endian `i32` samples.
    pub fn from_bytes(width: u32, height: u32, bytes: &[u8]) -> Result<Self, LookupError> {
        if bytes.len() % std::mem::size_of::<i32>() != 0 {
            return Err(LookupError::UnalignedBytes(bytes.len()));
        }
        // Readback buffers are not guaranteed to be 4-byte aligned
        let samples: Vec<i32> = bytemuck::pod_collect_to_vec(bytes);
        Self::new(width, height, samples)
    }

    /// Decode an RGBA float readback whose red channel holds triangle index + 1.
    pub fn from_rgba_f32(
        width: u32,
        height: u32,
        texels: &[[f32; 4]],
    ) -> Result<Self, LookupError> {
        let samples = texels
            .iter()
            .map(|texel| {
                let r = texel[0];
                if r.is_finite() {
                    r.round() as i32
                } else {
                    NO_TRIANGLE_SAMPLE
                }
            })
            .collect();
        Self::new(width, height, samples)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Check that the snapshot covers the viewport the stroke was drawn in.
    pub fn ensure_matches(&self, width: u32, height: u32) -> Result<(), LookupError> {
        if self.width != width || self.height != height {
            return Err(LookupError::ViewportMismatch {
                width: self.width,
                height: self.height,
                viewport_width: width,
                viewport_height: height,
            });
        }
        Ok(())
    }

    /// Buffer index of a window point, or `None` outside the surface.
    ///
    /// Rows are flipped: window row `y` lives at device row `height - y - 1`.
    pub fn pixel_index(&self, point: ScreenPoint) -> Option<usize> {
        let row = device_row(point.y, self.height);
        if point.x < 0 || row < 0 || point.x >= self.width as i32 || row >= self.height as i32 {
            return None;
        }
        Some(row as usize * self.width as usize + point.x as usize)
    }

    /// Raw sample under a window point; off-surface points read as "no triangle".
    pub fn sample(&self, point: ScreenPoint) -> TriangleIndexSample {
        match self.pixel_index(point) {
            Some(idx) => TriangleIndexSample(self.samples[idx]),
            None => {
                trace!("point [{}, {}] is outside the lookup surface", point.x, point.y);
                TriangleIndexSample(NO_TRIANGLE_SAMPLE)
            }
        }
    }
}
