//! Custom-profile joints: a user-drawn closed profile stamped along the
//! contact, extruded through both plates.
//!
//! The profile is authored in the world XY frame around the origin; it
//! is rigid-transformed into the contact plane at each anchor. The
//! resulting solid is unioned into the donor plate and cut from the
//! receiver, like a plug whose cross section the user controls.

use serde::{Deserialize, Serialize};

use plate_kernel::PlateKernel;
use plate_model::PlateModel;
use plate_types::{ContactType, Plane, Polyline, Transform};

use crate::common::{
    anchor_offsets, check_footprint, contour_onto_face, matching_pairs, positive_count,
    prism_between, JointBatch, SolidRole,
};
use crate::tenons::side_pair_roles;
use crate::types::JoineryError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomParams {
    pub count: usize,
    pub spacing: f64,
    pub shift: f64,
    /// Depth held back from the receiver's far face.
    pub retreat: f64,
}

/// Stamp `profile` along every qualifying face-face or face-side
/// contact.
pub fn add_custom(
    model: &mut PlateModel,
    kernel: &mut dyn PlateKernel,
    pairs: Option<&[(usize, usize)]>,
    profile: &Polyline,
    params: &CustomParams,
) -> Result<usize, JoineryError> {
    positive_count("count", params.count)?;
    if params.spacing < 0.0 || params.retreat < 0.0 {
        return Err(JoineryError::BadParameter {
            name: "spacing/retreat",
            reason: "must not be negative".into(),
        });
    }
    if profile.len() < 3 || profile.area() <= 0.0 {
        return Err(JoineryError::BadParameter {
            name: "profile",
            reason: "must be a closed polyline with positive area".into(),
        });
    }
    let (pw, _) = profile.extents_in(&Plane::xy());

    let targets = matching_pairs(
        model,
        |c| c == ContactType::FF || c.is_face_side(),
        pairs,
    );

    let mut batch = JointBatch::new();
    for target in targets {
        let (donor, receiver) = if target.ctype == ContactType::FF {
            (target.i, target.j)
        } else {
            side_pair_roles(&target)
        };
        let entry = model
            .neighbor_index(donor, receiver)
            .ok_or(JoineryError::BadParameter {
                name: "pairs",
                reason: "contact entry missing".into(),
            })?;
        let plane = model.contact_planes[donor][entry];
        let zone = &model.contact_zones[donor][entry];
        check_footprint(
            zone,
            &plane,
            pw,
            params.count,
            params.spacing,
            params.shift,
            target.i,
            target.j,
        )?;

        let depth = model.plates[receiver].thickness - params.retreat;
        if depth <= 0.0 {
            return Err(JoineryError::BadParameter {
                name: "retreat",
                reason: "exceeds the receiving plate's thickness".into(),
            });
        }
        // Root the plug inside the donor so the union always engages.
        let root = (model.plates[donor].thickness * 0.5).min(depth);

        for x0 in anchor_offsets(pw, params.count, params.spacing, params.shift) {
            let anchor_plane = plane.translated_to(plane.point_at(x0, 0.0));
            let t = Transform::plane_to_plane(&Plane::xy(), &anchor_plane);
            let stamped = profile.transformed(&t);
            let top = stamped.translated(plane.normal * depth);
            let bottom = stamped.translated(plane.normal * -root);
            batch.push_solid(SolidRole::Positive(donor), prism_between(top, bottom)?);

            let cut_top = stamped.translated(plane.normal * depth);
            let cut_bottom = stamped.translated(plane.normal * -model.tol.coincidence.max(1e-3));
            batch.push_solid(SolidRole::Negative(receiver), prism_between(cut_top, cut_bottom)?);

            let top_hole =
                contour_onto_face(&model.plates[receiver].top_plane, plane.normal, &stamped);
            let bottom_hole =
                contour_onto_face(&model.plates[receiver].bottom_plane, plane.normal, &stamped);
            batch.push_hole_pair(model, receiver, top_hole, bottom_hole);
            batch.note_joint();
        }
    }
    batch.commit(model, kernel)
}
