use serde::{Deserialize, Serialize};

use super::point::Point3d;
use super::vector::Vec3;

/// A permissible insertion-direction region on the unit sphere, anchored at
/// a contact center. All membership math treats directions as unit vectors
/// from `center`; `recentred()` moves the anchor to the origin so spaces
/// from different contacts can be intersected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InsertionSpace {
    /// A single admissible direction.
    Point { center: Point3d, dir: Vec3 },
    /// A circular arc of directions: `dir(t) = cos(t)*x_axis + sin(t)*y_axis`
    /// for `t in [0, sweep]`.
    Arc {
        center: Point3d,
        x_axis: Vec3,
        y_axis: Vec3,
        sweep: f64,
    },
    /// A hemispherical patch: all unit directions with `dir . pole >= 0`,
    /// further clipped by trim half-spaces `dir . trim >= 0`.
    Patch {
        center: Point3d,
        pole: Vec3,
        trims: Vec<Vec3>,
    },
}

impl InsertionSpace {
    pub fn center(&self) -> Point3d {
        match self {
            InsertionSpace::Point { center, .. }
            | InsertionSpace::Arc { center, .. }
            | InsertionSpace::Patch { center, .. } => *center,
        }
    }

    /// The same space anchored at the origin.
    pub fn recentred(&self) -> InsertionSpace {
        let mut out = self.clone();
        match &mut out {
            InsertionSpace::Point { center, .. }
            | InsertionSpace::Arc { center, .. }
            | InsertionSpace::Patch { center, .. } => *center = Point3d::ORIGIN,
        }
        out
    }

    /// Dimensionality rank used by the staged intersection: point < arc < patch.
    pub fn rank(&self) -> usize {
        match self {
            InsertionSpace::Point { .. } => 0,
            InsertionSpace::Arc { .. } => 1,
            InsertionSpace::Patch { .. } => 2,
        }
    }

    /// A single direction summarizing the space: the direction itself, the
    /// arc midpoint, or the patch pole.
    pub fn representative_dir(&self) -> Vec3 {
        match self {
            InsertionSpace::Point { dir, .. } => *dir,
            InsertionSpace::Arc {
                x_axis,
                y_axis,
                sweep,
                ..
            } => (*x_axis * (sweep * 0.5).cos() + *y_axis * (sweep * 0.5).sin())
                .normalized_or(*x_axis),
            InsertionSpace::Patch { pole, .. } => *pole,
        }
    }

    /// Membership test for a unit direction, within `tol`.
    pub fn contains_dir(&self, d: &Vec3, tol: f64) -> bool {
        match self {
            InsertionSpace::Point { dir, .. } => (*d - *dir).length() <= tol,
            InsertionSpace::Arc {
                x_axis,
                y_axis,
                sweep,
                ..
            } => {
                let normal = x_axis.cross(y_axis);
                if d.dot(&normal).abs() > tol {
                    return false;
                }
                let u = d.dot(x_axis);
                let v = d.dot(y_axis);
                let angle = v.atan2(u).rem_euclid(std::f64::consts::TAU);
                angle <= *sweep + tol || angle >= std::f64::consts::TAU - tol
            }
            InsertionSpace::Patch { pole, trims, .. } => {
                if d.dot(pole) < -tol {
                    return false;
                }
                trims.iter().all(|t| d.dot(t) >= -tol)
            }
        }
    }

    /// Deterministic sample directions covering the space. Arcs are sampled
    /// uniformly in parameter; patches combine the pole, the boundary circle
    /// and a fixed geodesic cloud of latitude rings.
    pub fn sample_dirs(&self) -> Vec<Vec3> {
        match self {
            InsertionSpace::Point { dir, .. } => vec![*dir],
            InsertionSpace::Arc {
                x_axis,
                y_axis,
                sweep,
                ..
            } => {
                let n = 64;
                (0..=n)
                    .map(|i| {
                        let t = sweep * i as f64 / n as f64;
                        (*x_axis * t.cos() + *y_axis * t.sin()).normalized_or(*x_axis)
                    })
                    .collect()
            }
            InsertionSpace::Patch { pole, trims, .. } => {
                let pole = pole.normalized_or(Vec3::Z);
                let ref_axis = if pole.x.abs() < 0.9 { Vec3::X } else { Vec3::Y };
                let u = ref_axis.cross(&pole).normalized_or(Vec3::X);
                let v = pole.cross(&u);
                let mut dirs = vec![pole];
                // Latitude rings from the pole to the boundary circle.
                for ring in 1..=6 {
                    let polar = std::f64::consts::FRAC_PI_2 * ring as f64 / 6.0;
                    let (sp, cp) = polar.sin_cos();
                    let steps = 8 * ring;
                    for k in 0..steps {
                        let az = std::f64::consts::TAU * k as f64 / steps as f64;
                        let d = u * (sp * az.cos()) + v * (sp * az.sin()) + pole * cp;
                        dirs.push(d.normalized_or(pole));
                    }
                }
                dirs.retain(|d| trims.iter().all(|t| d.dot(t) >= -1e-9));
                dirs
            }
        }
    }

    /// Structural near-equality within `tol`.
    pub fn approx_eq(&self, other: &InsertionSpace, tol: f64) -> bool {
        match (self, other) {
            (
                InsertionSpace::Point { dir: a, .. },
                InsertionSpace::Point { dir: b, .. },
            ) => (*a - *b).length() <= tol,
            (
                InsertionSpace::Arc {
                    x_axis: ax,
                    y_axis: ay,
                    sweep: asw,
                    ..
                },
                InsertionSpace::Arc {
                    x_axis: bx,
                    y_axis: by,
                    sweep: bsw,
                    ..
                },
            ) => {
                (*ax - *bx).length() <= tol
                    && (*ay - *by).length() <= tol
                    && (asw - bsw).abs() <= tol
            }
            (
                InsertionSpace::Patch {
                    pole: ap,
                    trims: at,
                    ..
                },
                InsertionSpace::Patch {
                    pole: bp,
                    trims: bt,
                    ..
                },
            ) => {
                (*ap - *bp).length() <= tol
                    && at.len() == bt.len()
                    && at
                        .iter()
                        .zip(bt.iter())
                        .all(|(a, b)| (*a - *b).length() <= tol)
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hemisphere_contains_pole_not_antipole() {
        let patch = InsertionSpace::Patch {
            center: Point3d::ORIGIN,
            pole: Vec3::Z,
            trims: vec![],
        };
        assert!(patch.contains_dir(&Vec3::Z, 1e-3));
        assert!(!patch.contains_dir(&(-Vec3::Z), 1e-3));
        // Equator is on the boundary.
        assert!(patch.contains_dir(&Vec3::X, 1e-3));
    }

    #[test]
    fn trim_clips_half_of_hemisphere() {
        let patch = InsertionSpace::Patch {
            center: Point3d::ORIGIN,
            pole: Vec3::Z,
            trims: vec![Vec3::X],
        };
        assert!(patch.contains_dir(&Vec3::X, 1e-3));
        assert!(!patch.contains_dir(&(-Vec3::X), 1e-3));
    }

    #[test]
    fn arc_membership_by_angle() {
        let arc = InsertionSpace::Arc {
            center: Point3d::ORIGIN,
            x_axis: Vec3::X,
            y_axis: Vec3::Y,
            sweep: std::f64::consts::PI,
        };
        assert!(arc.contains_dir(&Vec3::X, 1e-3));
        assert!(arc.contains_dir(&Vec3::Y, 1e-3));
        assert!(!arc.contains_dir(&(-Vec3::Y), 1e-3));
        assert!(!arc.contains_dir(&Vec3::Z, 1e-3));
    }

    #[test]
    fn patch_samples_stay_inside() {
        let patch = InsertionSpace::Patch {
            center: Point3d::ORIGIN,
            pole: Vec3::Z,
            trims: vec![Vec3::Y],
        };
        for d in patch.sample_dirs() {
            assert!(patch.contains_dir(&d, 1e-6));
        }
    }
}
