use serde::{Deserialize, Serialize};

use super::plane::Plane;
use super::point::Point3d;
use super::vector::Vec3;

/// A 4x4 affine transformation matrix stored in column-major order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Column-major 4x4 matrix entries.
    pub m: [f64; 16],
}

impl Transform {
    pub fn translation(v: Vec3) -> Self {
        #[rustfmt::skip]
        let m = [
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            v.x, v.y, v.z, 1.0,
        ];
        Self { m }
    }

    /// Rigid transform carrying the frame of `from` onto the frame of `to`.
    /// Maps from.origin to to.origin and from's axes onto to's axes.
    pub fn plane_to_plane(from: &Plane, to: &Plane) -> Self {
        // Rotation columns express from-frame axes in the to frame.
        let fx = from.x_axis;
        let fy = from.y_axis;
        let fn_ = from.normal;
        let tx = to.x_axis;
        let ty = to.y_axis;
        let tn = to.normal;

        // R = B_to * B_from^T where columns of B are the frame axes.
        let r = |row: usize, col: usize| -> f64 {
            let b_to = [tx, ty, tn];
            let b_from = [fx, fy, fn_];
            let mut acc = 0.0;
            for k in 0..3 {
                let tcol = b_to[k];
                let fcol = b_from[k];
                let t_comp = match row {
                    0 => tcol.x,
                    1 => tcol.y,
                    _ => tcol.z,
                };
                let f_comp = match col {
                    0 => fcol.x,
                    1 => fcol.y,
                    _ => fcol.z,
                };
                acc += t_comp * f_comp;
            }
            acc
        };

        let mut m = [0.0; 16];
        for col in 0..3 {
            for row in 0..3 {
                m[col * 4 + row] = r(row, col);
            }
        }
        m[15] = 1.0;
        let mut t = Self { m };

        // Translation: to.origin - R * from.origin
        let rotated = t.apply_vec(&from.origin.to_vec());
        m = t.m;
        m[12] = to.origin.x - rotated.x;
        m[13] = to.origin.y - rotated.y;
        m[14] = to.origin.z - rotated.z;
        t.m = m;
        t
    }

    pub fn apply_point(&self, p: &Point3d) -> Point3d {
        let m = &self.m;
        Point3d::new(
            m[0] * p.x + m[4] * p.y + m[8] * p.z + m[12],
            m[1] * p.x + m[5] * p.y + m[9] * p.z + m[13],
            m[2] * p.x + m[6] * p.y + m[10] * p.z + m[14],
        )
    }

    /// Apply only the linear part (no translation) to a direction vector.
    pub fn apply_vec(&self, v: &Vec3) -> Vec3 {
        let m = &self.m;
        Vec3::new(
            m[0] * v.x + m[4] * v.y + m[8] * v.z,
            m[1] * v.x + m[5] * v.y + m[9] * v.z,
            m[2] * v.x + m[6] * v.y + m[10] * v.z,
        )
    }

}
