//! Texture brush path painting - from screen strokes to geodesic seeds
//!
//! This crate turns a stroke drawn on screen into a walk over mesh vertices
//! that seeds a geodesic distance field on the mesh surface:
//! - [`recorder`] - Active stroke and completed-stroke history
//! - [`projection`] - Window pixels plus depth back to world space
//! - [`lookup`] - Per-pixel triangle ids read back from the renderer
//! - [`triangle_sequence`] - Ordered trace of triangles under a stroke
//! - [`selector`] - Seed vertex walk and triple-collapse pass
//! - [`geodesic`] - Solver seam, seeding bridge and edge-graph solver
//! - [`texcoord`] - Texcoord assignment extension point
//! - [`pipeline`] - The [`PathPainter`] controller driving all of the above
//!
//! Rendering, readback and the vertex-buffer upload stay with the host.

pub mod constants;
pub mod error;
pub mod geodesic;
pub mod lookup;
pub mod mesh;
pub mod pipeline;
pub mod projection;
pub mod recorder;
pub mod selector;
pub mod texcoord;
pub mod triangle_sequence;
pub mod types;

pub use constants::*;
pub use error::*;
pub use geodesic::*;
pub use lookup::*;
pub use mesh::*;
pub use pipeline::*;
pub use projection::*;
pub use recorder::*;
pub use selector::*;
pub use texcoord::*;
pub use triangle_sequence::*;
pub use types::*;

pub use texture_brush_config::{BrushConfig, DisplayConfig, HistoryCapacity};
