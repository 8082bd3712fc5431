use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Neg, Sub};

/// A vector in 3D Euclidean space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };
    pub const X: Self = Self {
        x: 1.0,
        y: 0.0,
        z: 0.0,
    };
    pub const Y: Self = Self {
        x: 0.0,
        y: 1.0,
        z: 0.0,
    };
    pub const Z: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 1.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(&self, other: &Self) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    pub fn length(&self) -> f64 {
        self.length_squared().sqrt()
    }

    pub fn length_squared(&self) -> f64 {
        self.dot(self)
    }

    pub fn normalized(&self) -> Option<Self> {
        let len = self.length();
        if len < 1e-15 {
            None
        } else {
            Some(*self / len)
        }
    }

    /// Normalize, falling back to the given vector if this one is near-zero.
    pub fn normalized_or(&self, fallback: Self) -> Self {
        self.normalized().unwrap_or(fallback)
    }

    /// True when the cross product with `other` is a null vector within `tol`.
    pub fn is_parallel_to(&self, other: &Self, tol: f64) -> bool {
        self.cross(other).length() < tol
    }

    /// Component of this vector lying in the plane perpendicular to `normal`.
    pub fn rejected_from(&self, normal: &Self) -> Self {
        let n = normal.normalized_or(Vec3::Z);
        *self - n * self.dot(&n)
    }

    /// Rotate about `axis` by `angle` radians (Rodrigues' formula).
    pub fn rotated_about(&self, axis: &Self, angle: f64) -> Self {
        let k = axis.normalized_or(Vec3::Z);
        let c = angle.cos();
        let s = angle.sin();
        *self * c + k.cross(self) * s + k * (k.dot(self) * (1.0 - c))
    }
}

impl Add for Vec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Div<f64> for Vec3 {
    type Output = Self;
    fn div(self, rhs: f64) -> Self {
        Self::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

impl Neg for Vec3 {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn cross_of_axes() {
        let c = Vec3::X.cross(&Vec3::Y);
        assert_relative_eq!(c.z, 1.0);
        assert_relative_eq!(c.x, 0.0);
    }

    #[test]
    fn normalized_zero_is_none() {
        assert!(Vec3::ZERO.normalized().is_none());
    }

    #[test]
    fn rotation_quarter_turn() {
        let r = Vec3::X.rotated_about(&Vec3::Z, std::f64::consts::FRAC_PI_2);
        assert_relative_eq!(r.y, 1.0, epsilon = 1e-12);
        assert_relative_eq!(r.x, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn rejection_removes_normal_component() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        let r = v.rejected_from(&Vec3::Z);
        assert_relative_eq!(r.z, 0.0, epsilon = 1e-12);
        assert_relative_eq!(r.x, 1.0);
    }
}
