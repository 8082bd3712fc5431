//! Dowel generator: cylindrical keys crossing a face or face-side
//! contact, drilled through both plates.
//!
//! Cylinders are carried as 16-sided prisms. The dowel itself is kept as
//! a loose key on the lower-index plate; both plates receive an inflated
//! negative and a seam-matched pair of hole outlines on their faces.

use serde::{Deserialize, Serialize};

use plate_kernel::PlateKernel;
use plate_model::PlateModel;
use plate_types::ContactType;

use crate::common::{
    anchor_offsets, check_footprint, contour_onto_face, matching_pairs, ngon_at, positive_count,
    positive_param, prism_between, JointBatch, SolidRole,
};
use crate::types::JoineryError;

/// Facet count of the prism standing in for a cylinder.
const DOWEL_SIDES: usize = 16;

/// Steepest allowed cross angle, radians.
const MAX_CROSS_ANGLE: f64 = std::f64::consts::FRAC_PI_4;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DowelParams {
    pub count: usize,
    pub radius: f64,
    pub spacing: f64,
    pub shift: f64,
    /// Tilt of the dowel axis off the contact normal, about the contact
    /// x-axis. Must stay within +-45 degrees.
    pub cross_angle: f64,
    /// Depth held back from each plate's far face.
    pub retreat: f64,
    /// Clearance added to the drilled negatives.
    pub fit: f64,
}

impl DowelParams {
    fn validate(&self) -> Result<(), JoineryError> {
        positive_count("count", self.count)?;
        positive_param("radius", self.radius)?;
        if self.spacing < 0.0 {
            return Err(JoineryError::BadParameter {
                name: "spacing",
                reason: "must not be negative".into(),
            });
        }
        if self.cross_angle.abs() > MAX_CROSS_ANGLE {
            return Err(JoineryError::BadParameter {
                name: "cross_angle",
                reason: format!(
                    "must be within +-45 degrees, got {:.1} degrees",
                    self.cross_angle.to_degrees()
                ),
            });
        }
        if self.retreat < 0.0 || self.fit < 0.0 {
            return Err(JoineryError::BadParameter {
                name: "retreat/fit",
                reason: "must not be negative".into(),
            });
        }
        Ok(())
    }
}

/// Add dowels to every qualifying face-face or face-side contact.
pub fn add_dowels(
    model: &mut PlateModel,
    kernel: &mut dyn PlateKernel,
    pairs: Option<&[(usize, usize)]>,
    params: &DowelParams,
) -> Result<usize, JoineryError> {
    params.validate()?;
    let targets = matching_pairs(
        model,
        |c| c == ContactType::FF || c.is_face_side(),
        pairs,
    );

    let mut batch = JointBatch::new();
    for target in targets {
        let (i, j) = (target.i, target.j);
        let plane = model.contact_planes[i][target.entry];
        let zone = &model.contact_zones[i][target.entry];
        check_footprint(
            zone,
            &plane,
            params.radius * 2.0,
            params.count,
            params.spacing,
            params.shift,
            i,
            j,
        )?;

        // Penetration on each side of the contact plane. The entry normal
        // points from plate i toward plate j.
        let reach_j = model.plates[j].thickness - params.retreat;
        let reach_i = model.plates[i].thickness - params.retreat;
        if reach_i <= 0.0 || reach_j <= 0.0 {
            return Err(JoineryError::BadParameter {
                name: "retreat",
                reason: "exceeds a plate's thickness".into(),
            });
        }
        let axis = plane
            .normal
            .rotated_about(&plane.x_axis, params.cross_angle);

        for x0 in anchor_offsets(
            params.radius * 2.0,
            params.count,
            params.spacing,
            params.shift,
        ) {
            let base = ngon_at(&plane, x0, 0.0, params.radius, DOWEL_SIDES, 0.0);
            let top = base.translated(axis * reach_j);
            let bottom = base.translated(axis * -reach_i);
            let dowel = prism_between(top, bottom)?;
            batch.push_solid(SolidRole::Key(i), dowel);

            let drill = ngon_at(&plane, x0, 0.0, params.radius + params.fit, DOWEL_SIDES, 0.0);
            let drill_top = drill.translated(axis * reach_j);
            let drill_bottom = drill.translated(axis * -reach_i);
            batch.push_solid(
                SolidRole::Negative(i),
                prism_between(drill_top.clone(), drill_bottom.clone())?,
            );
            batch.push_solid(
                SolidRole::Negative(j),
                prism_between(drill_top, drill_bottom)?,
            );

            // Hole outlines on the faces of both plates, paired for seam
            // parity.
            for plate in [i, j] {
                let p = &model.plates[plate];
                let top_hole = contour_onto_face(&p.top_plane, axis, &drill);
                let bottom_hole = contour_onto_face(&p.bottom_plane, axis, &drill);
                batch.push_hole_pair(model, plate, top_hole, bottom_hole);
            }
            batch.note_joint();
        }
    }
    batch.commit(model, kernel)
}
