use plate_kernel::KernelError;
use plate_model::ModelError;
use thiserror::Error;

/// Failures raised by joint generators and the fabrication pass.
///
/// Validation failures are raised before any plate is mutated: a failed
/// generator call leaves every contour, hole and joint list untouched.
#[derive(Debug, Error)]
pub enum JoineryError {
    #[error("invalid joint parameter `{name}`: {reason}")]
    BadParameter { name: &'static str, reason: String },

    /// The required linear footprint does not fit the contact zone.
    #[error(
        "joint between plates {i} and {j} exceeds the contact zone by {overage_pct:.1}%"
    )]
    JointTooLarge { i: usize, j: usize, overage_pct: f64 },

    #[error("chamfer does not fit the lap between plates {i} and {j}")]
    ChamferTooDeep { i: usize, j: usize },

    #[error("half-lap between plates {i} and {j} produced no cut volume")]
    EmptyLap { i: usize, j: usize },

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Kernel(#[from] KernelError),
}
