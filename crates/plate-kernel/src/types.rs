use serde::{Deserialize, Serialize};

use plate_types::{Plane, Polyline};

slotmap::new_key_type! {
    /// Opaque handle to a solid in the geometry kernel.
    /// Valid only for the current kernel session, never persisted.
    pub struct SolidHandle;
}

/// Errors from kernel operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum KernelError {
    #[error("boolean operation failed: {reason}")]
    BooleanFailed { reason: String },

    #[error("solid not found in kernel registry")]
    SolidNotFound,

    #[error("degenerate face: {reason}")]
    DegenerateFace { reason: String },

    #[error("contours have mismatched vertex counts: top {top}, bottom {bottom}")]
    ContourMismatch { top: usize, bottom: usize },

    #[error("empty intersection")]
    EmptyIntersection,

    #[error("kernel error: {message}")]
    Other { message: String },
}

/// A planar polygonal face with its outward-oriented carrier plane.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Face {
    pub polygon: Polyline,
    pub plane: Plane,
}

impl Face {
    pub fn new(polygon: Polyline, plane: Plane) -> Self {
        Self { polygon, plane }
    }

    pub fn area(&self) -> f64 {
        self.polygon.area()
    }

    pub fn flipped(&self) -> Face {
        Face {
            polygon: self.polygon.reversed(),
            plane: self.plane.flipped(),
        }
    }
}

/// A coplanar overlap region between faces of two solids.
#[derive(Debug, Clone)]
pub struct SurfacePatch {
    /// The overlap polygon in world coordinates.
    pub polygon: Polyline,
    /// Carrier plane oriented with the first solid's face normal.
    pub plane: Plane,
}
