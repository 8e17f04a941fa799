use crate::geodesic::GeodesicError;
use crate::lookup::LookupError;
use crate::mesh::MeshError;
use crate::projection::ProjectionError;
use crate::selector::SelectorError;

/// Errors surfaced by a path-painting run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Mesh error: {0}")]
    Mesh(#[from] MeshError),
    #[error("Lookup surface error: {0}")]
    Lookup(#[from] LookupError),
    #[error("Projection error: {0}")]
    Projection(#[from] ProjectionError),
    #[error("Seed selection failed: {0}")]
    Selector(#[from] SelectorError),
    #[error("Geodesic solver error: {0}")]
    Geodesic(#[from] GeodesicError),
}
