//! Finger joints for coplanar side-side butt contacts.
//!
//! Fingers alternate along the joint line: `number_1` from the
//! lower-index plate reaching into its neighbor, `number_2` the reverse.
//! Every finger is one box spanning the full plate thickness, appended
//! as a positive to its donor and an inflated negative to its receiver,
//! and spliced into both plates' contours (a bump on the donor, a notch
//! on the receiver).

use serde::{Deserialize, Serialize};

use plate_kernel::PlateKernel;
use plate_model::PlateModel;
use plate_types::{ContactType, Plane, Point3d};

use crate::common::{
    anchor_offsets, check_footprint, lifted, matching_pairs, onto_face, positive_count,
    positive_param, prism_between, rect_at, JointBatch, SolidRole,
};
use crate::types::JoineryError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FingerParams {
    /// Fingers protruding from the lower-index plate.
    pub number_1: usize,
    /// Fingers protruding from the higher-index plate.
    pub number_2: usize,
    pub width: f64,
    /// Reach of each finger past the joint line.
    pub depth: f64,
    pub spacing: f64,
    pub shift: f64,
    /// Clearance added to the receiving notches.
    pub fit: f64,
}

impl FingerParams {
    fn validate(&self) -> Result<(), JoineryError> {
        positive_count("number_1", self.number_1)?;
        positive_count("number_2", self.number_2)?;
        positive_param("width", self.width)?;
        positive_param("depth", self.depth)?;
        if self.spacing < 0.0 || self.fit < 0.0 {
            return Err(JoineryError::BadParameter {
                name: "spacing/fit",
                reason: "must not be negative".into(),
            });
        }
        Ok(())
    }
}

/// Add alternating fingers to every qualifying side-side contact.
pub fn add_fingers(
    model: &mut PlateModel,
    kernel: &mut dyn PlateKernel,
    pairs: Option<&[(usize, usize)]>,
    params: &FingerParams,
) -> Result<usize, JoineryError> {
    params.validate()?;
    let targets = matching_pairs(model, |c| c == ContactType::SS, pairs);

    let mut batch = JointBatch::new();
    for target in targets {
        let (i, j) = (target.i, target.j);
        let plane = model.contact_planes[i][target.entry];
        let zone = &model.contact_zones[i][target.entry];
        let total = params.number_1 + params.number_2;
        check_footprint(
            zone,
            &plane,
            params.width,
            total,
            params.spacing,
            params.shift,
            i,
            j,
        )?;

        let (_, dv) = zone.extents_in(&plane);
        let half_v = dv * 0.5;
        let to_top = model.plates[i].top_plane.origin - plane.origin;
        let v_top = if plane.y_axis.dot(&to_top) >= 0.0 {
            half_v
        } else {
            -half_v
        };

        // Alternate donors along the line until each side has spent its
        // finger budget.
        let offsets = anchor_offsets(params.width, total, params.spacing, params.shift);
        let mut left_1 = params.number_1;
        let mut left_2 = params.number_2;
        for (k, x0) in offsets.into_iter().enumerate() {
            let from_first = if k % 2 == 0 {
                left_1 > 0
            } else {
                left_2 == 0
            };
            let (donor, receiver) = if from_first { (i, j) } else { (j, i) };
            if from_first {
                left_1 -= 1;
            } else {
                left_2 -= 1;
            }
            // The finger reaches past the joint line toward the receiver;
            // the entry normal points from plate i to plate j.
            let dir = if donor == i { 1.0 } else { -1.0 };
            let (u0, u1) = (x0 - params.width * 0.5, x0 + params.width * 0.5);

            let root = rect_at(&plane, u0, u1, -half_v, half_v, 0.0);
            let tip = rect_at(&plane, u0, u1, -half_v, half_v, dir * params.depth);
            batch.push_solid(SolidRole::Positive(donor), prism_between(tip, root)?);

            let f = params.fit;
            let notch_root = rect_at(&plane, u0 - f, u1 + f, -half_v - f, half_v + f, dir * -f);
            let notch_tip = rect_at(
                &plane,
                u0 - f,
                u1 + f,
                -half_v - f,
                half_v + f,
                dir * (params.depth + f),
            );
            batch.push_solid(SolidRole::Negative(receiver), prism_between(notch_tip, notch_root)?);

            // Bump on the donor contours, notch on the receiver contours.
            let splice_for = |plate: usize, inflate: f64| -> (Vec<Point3d>, Vec<Point3d>) {
                let g = inflate;
                let piece = |face: &Plane, v: f64| -> Vec<Point3d> {
                    vec![
                        lifted(&plane, u0 - g, v, 0.0),
                        lifted(&plane, u0 - g, v, dir * (params.depth + g)),
                        lifted(&plane, u1 + g, v, dir * (params.depth + g)),
                        lifted(&plane, u1 + g, v, 0.0),
                    ]
                    .into_iter()
                    .map(|p| onto_face(face, plane.y_axis, &p))
                    .collect()
                };
                (
                    piece(&model.plates[plate].top_plane, v_top),
                    piece(&model.plates[plate].bottom_plane, -v_top),
                )
            };
            let (d_top, d_bot) = splice_for(donor, 0.0);
            batch.splice(model, donor, d_top, d_bot)?;
            let (r_top, r_bot) = splice_for(receiver, params.fit);
            batch.splice(model, receiver, r_top, r_bot)?;

            batch.note_joint();
        }
    }
    batch.commit(model, kernel)
}
