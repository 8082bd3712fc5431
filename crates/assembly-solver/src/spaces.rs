//! Canonical insertion spaces per contact type.
//!
//! Each resolved contact gets a region of admissible insertion directions
//! for the owning plate: a hemisphere for face contacts, a half-circle of
//! in-plane slide directions for face-side contacts, a vertical
//! half-circle for side-side butt contacts and a single direction for
//! volumetric crossings. User overrides replace the canonical shape per
//! type branch and are rigid-transformed from the world XY frame into the
//! contact frame.

use plate_model::PlateModel;
use plate_types::{ContactType, InsertionSpace, Plane, Transform, Vec3};

use std::f64::consts::PI;

/// Optional user-supplied replacement spaces, indexed by type branch:
/// 0 FF, 1 FS/SF, 2 ES/SE, 3 SS, 4 IN. Overrides are authored in the
/// world XY frame centered at the origin.
pub type SpaceOverrides = [Option<InsertionSpace>; 5];

pub fn no_overrides() -> SpaceOverrides {
    [None, None, None, None, None]
}

/// Attach an insertion space to every resolved contact entry of `model`.
pub fn attach_spaces(model: &mut PlateModel, overrides: &SpaceOverrides) {
    for i in 0..model.plate_count() {
        for k in 0..model.neighbors[i].len() {
            let j = model.neighbors[i][k];
            let ctype = model.contact_types[i][k];
            let plane = model.contact_planes[i][k];
            let normal = model.contact_normals[i][k];
            let space = match &overrides[ctype.space_branch()] {
                Some(user) => oriented_override(user, &plane),
                None => canonical_space(model, ctype, i, j, &plane, normal),
            };
            model.contact_spaces[i][k] = Some(space);
        }
    }
}

/// The canonical space for one contact entry, from the owning plate's
/// perspective: `normal` points away from the owner.
fn canonical_space(
    model: &PlateModel,
    ctype: ContactType,
    owner: usize,
    other: usize,
    plane: &Plane,
    normal: Vec3,
) -> InsertionSpace {
    match ctype {
        ContactType::FF => InsertionSpace::Patch {
            center: plane.origin,
            pole: normal,
            trims: vec![],
        },
        // Edge contacts keep the hemisphere but drop the half reaching
        // into the female plate's material: the contact y-axis already
        // points off the female mid-plane.
        ContactType::ES | ContactType::SE => InsertionSpace::Patch {
            center: plane.origin,
            pole: normal,
            trims: vec![plane.y_axis],
        },
        ContactType::FS | ContactType::SF => {
            // In-plane half circle through the contact normal, oriented by
            // the male plate's normal projected into the contact plane.
            let male = match ctype {
                ContactType::SF => owner,
                _ => other,
            };
            let mut m = model.plates[male]
                .top_plane
                .normal
                .rejected_from(&normal)
                .normalized()
                .unwrap_or(plane.x_axis);
            let toward_male = model.plates[male].volumetric_center() - plane.origin;
            if m.dot(&toward_male) < 0.0 {
                m = -m;
            }
            InsertionSpace::Arc {
                center: plane.origin,
                x_axis: m,
                y_axis: normal,
                sweep: PI,
            }
        }
        ContactType::SS => {
            // Vertical half circle: from the contact normal up over the
            // owner's face normal and back down.
            let up = model.plates[owner]
                .top_plane
                .normal
                .rejected_from(&normal)
                .normalized()
                .unwrap_or(plane.y_axis);
            InsertionSpace::Arc {
                center: plane.origin,
                x_axis: normal,
                y_axis: up,
                sweep: PI,
            }
        }
        ContactType::IN => InsertionSpace::Point {
            center: plane.origin,
            dir: normal,
        },
    }
}

/// Rigid-transform a user override from the world XY frame into the
/// contact frame.
fn oriented_override(space: &InsertionSpace, plane: &Plane) -> InsertionSpace {
    let t = Transform::plane_to_plane(&Plane::xy(), plane);
    match space {
        InsertionSpace::Point { dir, .. } => InsertionSpace::Point {
            center: plane.origin,
            dir: t.apply_vec(dir),
        },
        InsertionSpace::Arc {
            x_axis,
            y_axis,
            sweep,
            ..
        } => InsertionSpace::Arc {
            center: plane.origin,
            x_axis: t.apply_vec(x_axis),
            y_axis: t.apply_vec(y_axis),
            sweep: *sweep,
        },
        InsertionSpace::Patch { pole, trims, .. } => InsertionSpace::Patch {
            center: plane.origin,
            pole: t.apply_vec(pole),
            trims: trims.iter().map(|v| t.apply_vec(v)).collect(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plate_types::Point3d;

    #[test]
    fn override_is_rotated_into_the_contact_frame() {
        let user = InsertionSpace::Point {
            center: Point3d::ORIGIN,
            dir: Vec3::Z,
        };
        let plane = Plane::with_x_axis(Point3d::new(1.0, 2.0, 3.0), Vec3::X, Vec3::Y);
        let placed = oriented_override(&user, &plane);
        match placed {
            InsertionSpace::Point { center, dir } => {
                assert!((center.distance_to(&plane.origin)) < 1e-9);
                assert!((dir - Vec3::X).length() < 1e-9);
            }
            other => panic!("expected point space, got {other:?}"),
        }
    }
}
