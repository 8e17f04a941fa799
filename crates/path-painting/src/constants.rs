/// Raw lookup value meaning "no triangle visible at this pixel".
/// Every other value is the triangle index plus one.
pub const NO_TRIANGLE_SAMPLE: i32 = 0;

/// Scalar written to the marking channel for corners of triangles under the stroke.
pub const TRIANGLE_MARKED: f32 = 1.0;

/// Scalar written to the marking channel for every other corner.
pub const TRIANGLE_UNMARKED: f32 = 0.0;

/// Distance reported by the edge-graph solver for vertices no seed can reach.
pub const UNREACHABLE_DISTANCE: f32 = f32::INFINITY;
