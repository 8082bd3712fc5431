use plate_kernel::KernelError;

/// Errors from plate derivation and model bookkeeping.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ModelError {
    #[error("plate {id}: solid does not expose two dominant parallel planar faces")]
    NotPlanarPair { id: usize },

    #[error("plate {id}: top contour has {top} vertices, bottom has {bottom}")]
    ContourMismatch { id: usize, top: usize, bottom: usize },

    #[error("plate {id}: degenerate contour")]
    DegenerateContour { id: usize },

    #[error("contour splice failed: {reason}")]
    SpliceFailed { reason: String },

    #[error("plate {id} not found")]
    PlateNotFound { id: usize },

    #[error("unknown attribute: {name}")]
    UnknownAttribute { name: String },

    #[error("attribute {name}: type mismatch with current value")]
    AttributeTypeMismatch { name: String },

    #[error("attribute {name}: length mismatch (expected {expected}, got {got})")]
    AttributeLengthMismatch {
        name: String,
        expected: usize,
        got: usize,
    },

    #[error(transparent)]
    Kernel(#[from] KernelError),
}
