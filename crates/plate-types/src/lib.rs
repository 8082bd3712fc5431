pub mod contact;
pub mod plane;
pub mod point;
pub mod polyline;
pub mod space;
pub mod transform;
pub mod vector;

pub use contact::*;
pub use plane::*;
pub use point::*;
pub use polyline::*;
pub use space::*;
pub use transform::*;
pub use vector::*;

/// Global tolerance configuration for geometric comparisons.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct Tolerance {
    /// Points closer than this are considered coincident (model units).
    pub coincidence: f64,
    /// Tolerance for insertion-space membership tests on the unit sphere.
    pub insertion: f64,
    /// Angles smaller than this (radians) are considered zero.
    pub angular: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            coincidence: 1e-6,
            insertion: 1e-3,
            angular: 1e-10,
        }
    }
}

impl Tolerance {
    pub fn points_coincident(&self, a: &point::Point3d, b: &point::Point3d) -> bool {
        a.distance_to(b) < self.coincidence
    }

    pub fn is_zero_length(&self, length: f64) -> bool {
        length.abs() < self.coincidence
    }

    pub fn vectors_parallel(&self, a: &vector::Vec3, b: &vector::Vec3) -> bool {
        a.cross(b).length() < self.coincidence * a.length().max(1.0) * b.length().max(1.0)
    }
}
