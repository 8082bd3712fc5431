//! Sunrise dovetails for flush corner (edge-side) contacts.
//!
//! Tails flare outward with depth like a fanned sunrise: the cross
//! section at the contact face is `width`, growing by `2 * depth *
//! tan(flare)` at the tip so the assembled corner locks against pull-out
//! everywhere except along the insertion direction.

use serde::{Deserialize, Serialize};

use plate_kernel::PlateKernel;
use plate_model::PlateModel;
use plate_types::{ContactType, Plane, Point3d};

use crate::common::{
    anchor_offsets, check_footprint, contour_onto_face, lifted, matching_pairs, onto_face,
    positive_count, positive_param, prism_between, rect_at, JointBatch, SolidRole,
};
use crate::tenons::side_pair_roles;
use crate::types::JoineryError;

/// Widest permitted flare, radians.
const MAX_FLARE: f64 = std::f64::consts::FRAC_PI_4;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SunriseParams {
    pub count: usize,
    pub width: f64,
    pub spacing: f64,
    pub shift: f64,
    /// Flare angle of the tail flanks off the insertion direction.
    pub flare: f64,
    /// Depth held back from the receiving plate's far face.
    pub retreat: f64,
    /// Clearance added to the sockets.
    pub fit: f64,
}

impl SunriseParams {
    fn validate(&self) -> Result<(), JoineryError> {
        positive_count("count", self.count)?;
        positive_param("width", self.width)?;
        positive_param("flare", self.flare)?;
        if self.flare > MAX_FLARE {
            return Err(JoineryError::BadParameter {
                name: "flare",
                reason: "must be at most 45 degrees".into(),
            });
        }
        if self.spacing < 0.0 || self.retreat < 0.0 || self.fit < 0.0 {
            return Err(JoineryError::BadParameter {
                name: "spacing/retreat/fit",
                reason: "must not be negative".into(),
            });
        }
        Ok(())
    }
}

/// Add sunrise dovetails to every qualifying edge-side contact. Tails
/// protrude from the side (male) plate into sockets in the edge plate.
pub fn add_sunrise(
    model: &mut PlateModel,
    kernel: &mut dyn PlateKernel,
    pairs: Option<&[(usize, usize)]>,
    params: &SunriseParams,
) -> Result<usize, JoineryError> {
    params.validate()?;
    let targets = matching_pairs(model, |c| c.is_edge_side(), pairs);

    let mut batch = JointBatch::new();
    for target in targets {
        let (male, receiver) = side_pair_roles(&target);
        let entry = model
            .neighbor_index(male, receiver)
            .ok_or(JoineryError::BadParameter {
                name: "pairs",
                reason: "contact entry missing".into(),
            })?;
        let plane = model.contact_planes[male][entry];
        let zone = &model.contact_zones[male][entry];

        let depth = model.plates[receiver].thickness - params.retreat;
        if depth <= 0.0 {
            return Err(JoineryError::BadParameter {
                name: "retreat",
                reason: "exceeds the receiving plate's thickness".into(),
            });
        }
        let flare_run = depth * params.flare.tan();
        // Tails flare with depth, so the footprint is taken at the tip.
        check_footprint(
            zone,
            &plane,
            params.width + 2.0 * flare_run,
            params.count,
            params.spacing,
            params.shift,
            target.i,
            target.j,
        )?;

        let (_, dv) = zone.extents_in(&plane);
        let half_v = dv * 0.5;
        let to_top = model.plates[male].top_plane.origin - plane.origin;
        let v_top = if plane.y_axis.dot(&to_top) >= 0.0 {
            half_v
        } else {
            -half_v
        };

        for x0 in anchor_offsets(
            params.width + 2.0 * flare_run,
            params.count,
            params.spacing,
            params.shift,
        ) {
            let (u0, u1) = (x0 - params.width * 0.5, x0 + params.width * 0.5);

            let base = rect_at(&plane, u0, u1, -half_v, half_v, 0.0);
            let tip = rect_at(
                &plane,
                u0 - flare_run,
                u1 + flare_run,
                -half_v,
                half_v,
                depth,
            );
            batch.push_solid(SolidRole::Positive(male), prism_between(tip, base)?);

            let f = params.fit;
            let socket_base = rect_at(&plane, u0 - f, u1 + f, -half_v - f, half_v + f, -f);
            let socket_tip = rect_at(
                &plane,
                u0 - flare_run - f,
                u1 + flare_run + f,
                -half_v - f,
                half_v + f,
                depth + f,
            );
            batch.push_solid(
                SolidRole::Negative(receiver),
                prism_between(socket_tip, socket_base)?,
            );

            // Trapezoid outline in both male face contours.
            let piece_on = |face: &Plane, v: f64| -> Vec<Point3d> {
                vec![
                    lifted(&plane, u0, v, 0.0),
                    lifted(&plane, u0 - flare_run, v, depth),
                    lifted(&plane, u1 + flare_run, v, depth),
                    lifted(&plane, u1, v, 0.0),
                ]
                .into_iter()
                .map(|p| onto_face(face, plane.y_axis, &p))
                .collect()
            };
            let top_piece = piece_on(&model.plates[male].top_plane, v_top);
            let bottom_piece = piece_on(&model.plates[male].bottom_plane, -v_top);
            batch.splice(model, male, top_piece, bottom_piece)?;

            // Socket outline on the edge plate's faces.
            let mouth = rect_at(&plane, u0 - f, u1 + f, -half_v - f, half_v + f, 0.0);
            let top_hole =
                contour_onto_face(&model.plates[receiver].top_plane, plane.normal, &mouth);
            let bottom_hole =
                contour_onto_face(&model.plates[receiver].bottom_plane, plane.normal, &mouth);
            batch.push_hole_pair(model, receiver, top_hole, bottom_hole);

            batch.push_fem(male, receiver, plane.point_at(x0, 0.0));
            batch.note_joint();
        }
    }
    batch.commit(model, kernel)
}
