use serde::{Deserialize, Serialize};

use super::point::Point3d;
use super::vector::Vec3;

/// An oriented plane with a full local frame.
///
/// `x_axis` and `y_axis` span the plane; `normal = x_axis × y_axis`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Plane {
    pub origin: Point3d,
    pub normal: Vec3,
    pub x_axis: Vec3,
    pub y_axis: Vec3,
}

impl Plane {
    /// Build a plane from origin and normal, choosing arbitrary in-plane axes.
    pub fn new(origin: Point3d, normal: Vec3) -> Self {
        let normal = normal.normalized_or(Vec3::Z);
        let x_axis = if normal.x.abs() < 0.9 {
            Vec3::X.cross(&normal).normalized_or(Vec3::Y)
        } else {
            Vec3::Y.cross(&normal).normalized_or(Vec3::X)
        };
        let y_axis = normal.cross(&x_axis);
        Self {
            origin,
            normal,
            x_axis,
            y_axis,
        }
    }

    /// Build a plane from origin, normal and a preferred x-axis direction.
    /// The x-axis is projected into the plane and re-normalized.
    pub fn with_x_axis(origin: Point3d, normal: Vec3, x_hint: Vec3) -> Self {
        let normal = normal.normalized_or(Vec3::Z);
        let x_axis = x_hint
            .rejected_from(&normal)
            .normalized()
            .unwrap_or_else(|| Plane::new(origin, normal).x_axis);
        let y_axis = normal.cross(&x_axis);
        Self {
            origin,
            normal,
            x_axis,
            y_axis,
        }
    }

    pub fn xy() -> Self {
        Self {
            origin: Point3d::ORIGIN,
            normal: Vec3::Z,
            x_axis: Vec3::X,
            y_axis: Vec3::Y,
        }
    }

    pub fn point_at(&self, u: f64, v: f64) -> Point3d {
        self.origin + self.x_axis * u + self.y_axis * v
    }

    pub fn signed_distance(&self, p: &Point3d) -> f64 {
        (*p - self.origin).dot(&self.normal)
    }

    pub fn project_point(&self, p: &Point3d) -> Point3d {
        *p - self.normal * self.signed_distance(p)
    }

    /// In-plane (u, v) coordinates of a point projected onto the plane.
    pub fn parameters_of(&self, p: &Point3d) -> (f64, f64) {
        let v = *p - self.origin;
        (v.dot(&self.x_axis), v.dot(&self.y_axis))
    }

    /// The same plane moved to a new origin.
    pub fn translated_to(&self, origin: Point3d) -> Self {
        Self { origin, ..*self }
    }

    /// The plane with reversed normal (x-axis kept, y-axis flipped).
    pub fn flipped(&self) -> Self {
        Self {
            origin: self.origin,
            normal: -self.normal,
            x_axis: self.x_axis,
            y_axis: -self.y_axis,
        }
    }

    /// The plane with the x-axis reversed (normal kept, y-axis flipped).
    pub fn x_reversed(&self) -> Self {
        Self {
            origin: self.origin,
            normal: self.normal,
            x_axis: -self.x_axis,
            y_axis: -self.y_axis,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn frame_is_orthonormal() {
        let pl = Plane::new(Point3d::new(1.0, 2.0, 3.0), Vec3::new(0.3, -0.4, 0.9));
        assert_relative_eq!(pl.x_axis.dot(&pl.normal), 0.0, epsilon = 1e-12);
        assert_relative_eq!(pl.y_axis.dot(&pl.normal), 0.0, epsilon = 1e-12);
        assert_relative_eq!(pl.x_axis.cross(&pl.y_axis).dot(&pl.normal), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn projection_lands_on_plane() {
        let pl = Plane::new(Point3d::ORIGIN, Vec3::Z);
        let p = pl.project_point(&Point3d::new(1.0, 2.0, 5.0));
        assert_relative_eq!(p.z, 0.0);
        assert_relative_eq!(p.x, 1.0);
    }
}
