use plate_kernel::KernelError;
use plate_model::ModelError;
use thiserror::Error;

/// Failures raised while resolving the contact graph.
#[derive(Debug, Error)]
pub enum TopologyError {
    /// The volumetric-intersection heuristic needs four edges parallel to
    /// the cross of the two plate normals to reconstruct a contact zone.
    #[error("plates {i} and {j} intersect but expose no four parallel edges to build a contact zone")]
    NoParallelEdges { i: usize, j: usize },

    #[error("contact zone between plates {i} and {j} is degenerate: {reason}")]
    DegenerateZone { i: usize, j: usize, reason: String },

    #[error(transparent)]
    Kernel(#[from] KernelError),

    #[error(transparent)]
    Model(#[from] ModelError),
}
