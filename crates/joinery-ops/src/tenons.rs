//! Tenon and chamfered-tenon generators.
//!
//! A tenon protrudes from the male plate's side face into a mortise in
//! the receiving plate. Plain tenons target face-side contacts; the
//! chamfered variant narrows toward the tip for easier insertion and is
//! additionally allowed on face-face contacts, where it acts as a
//! drafted plug without contour changes.

use serde::{Deserialize, Serialize};

use plate_kernel::PlateKernel;
use plate_model::PlateModel;
use plate_types::{ContactType, Plane, Point3d};

use crate::common::{
    anchor_offsets, check_footprint, contour_onto_face, lifted, matching_pairs, positive_count,
    positive_param, prism_between, rect_at, JointBatch, PairTarget, SolidRole,
};
use crate::types::JoineryError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenonParams {
    pub count: usize,
    pub width: f64,
    pub spacing: f64,
    pub shift: f64,
    /// Depth held back from the receiver's far face; 0 cuts through.
    pub retreat: f64,
    /// Clearance added around the mortise.
    pub fit: f64,
}

impl TenonParams {
    fn validate(&self) -> Result<(), JoineryError> {
        positive_count("count", self.count)?;
        positive_param("width", self.width)?;
        if self.spacing < 0.0 {
            return Err(JoineryError::BadParameter {
                name: "spacing",
                reason: "must not be negative".into(),
            });
        }
        if self.retreat < 0.0 {
            return Err(JoineryError::BadParameter {
                name: "retreat",
                reason: "must not be negative".into(),
            });
        }
        if self.fit < 0.0 {
            return Err(JoineryError::BadParameter {
                name: "fit",
                reason: "must not be negative".into(),
            });
        }
        Ok(())
    }
}

/// Add `count` rectangular tenons per qualifying face-side contact.
pub fn add_tenons(
    model: &mut PlateModel,
    kernel: &mut dyn PlateKernel,
    pairs: Option<&[(usize, usize)]>,
    params: &TenonParams,
) -> Result<usize, JoineryError> {
    params.validate()?;
    let targets = matching_pairs(model, |c| c.is_face_side(), pairs);
    let mut batch = JointBatch::new();
    for target in targets {
        plan_tenons(model, &mut batch, target, params, 0.0)?;
    }
    batch.commit(model, kernel)
}

/// Chamfered tenons: tips narrowed by `chamfer` on both flanks. Also
/// applies to face-face contacts as drafted plugs.
pub fn add_chamfered_tenons(
    model: &mut PlateModel,
    kernel: &mut dyn PlateKernel,
    pairs: Option<&[(usize, usize)]>,
    params: &TenonParams,
    chamfer: f64,
) -> Result<usize, JoineryError> {
    params.validate()?;
    positive_param("chamfer", chamfer)?;
    if chamfer >= params.width * 0.5 {
        return Err(JoineryError::BadParameter {
            name: "chamfer",
            reason: "must be less than half the tenon width".into(),
        });
    }
    let targets = matching_pairs(
        model,
        |c| c.is_face_side() || c == ContactType::FF,
        pairs,
    );
    let mut batch = JointBatch::new();
    for target in targets {
        if target.ctype == ContactType::FF {
            plan_plugs(model, &mut batch, target, params, chamfer)?;
        } else {
            plan_tenons(model, &mut batch, target, params, chamfer)?;
        }
    }
    batch.commit(model, kernel)
}

/// The roles of a face-side pair: the male plate presses its side on the
/// receiver's face. Returns (male, receiver) plate ids.
pub(crate) fn side_pair_roles(target: &PairTarget) -> (usize, usize) {
    match target.ctype {
        ContactType::SF | ContactType::SE => (target.i, target.j),
        _ => (target.j, target.i),
    }
}

fn plan_tenons(
    model: &PlateModel,
    batch: &mut JointBatch,
    target: PairTarget,
    params: &TenonParams,
    chamfer: f64,
) -> Result<(), JoineryError> {
    let (male, receiver) = side_pair_roles(&target);
    let entry = model
        .neighbor_index(male, receiver)
        .ok_or(JoineryError::BadParameter {
            name: "pairs",
            reason: "contact entry missing".into(),
        })?;
    let plane = model.contact_planes[male][entry];
    let zone = &model.contact_zones[male][entry];
    check_footprint(
        zone,
        &plane,
        params.width,
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
    let (_, dv) = zone.extents_in(&plane);
    let half_v = dv * 0.5;
    // Contact-plane v sign of the male plate's top face.
    let to_top = model.plates[male].top_plane.origin - plane.origin;
    let v_top = if plane.y_axis.dot(&to_top) >= 0.0 {
        half_v
    } else {
        -half_v
    };

    for x0 in anchor_offsets(params.width, params.count, params.spacing, params.shift) {
        let (u0, u1) = (x0 - params.width * 0.5, x0 + params.width * 0.5);

        // Positive: straight or chamfered prism from the contact plane
        // into the receiver.
        let base = rect_at(&plane, u0, u1, -half_v, half_v, 0.0);
        let tip = rect_at(
            &plane,
            u0 + chamfer,
            u1 - chamfer,
            -half_v,
            half_v,
            depth,
        );
        batch.push_solid(SolidRole::Positive(male), prism_between(tip, base)?);

        // Negative: the mortise, inflated by the fit clearance, mouth
        // extended past the contact face.
        let f = params.fit;
        let neg_base = rect_at(&plane, u0 - f, u1 + f, -half_v - f, half_v + f, -f);
        let neg_tip = rect_at(
            &plane,
            u0 + chamfer - f,
            u1 - chamfer + f,
            -half_v - f,
            half_v + f,
            depth + f,
        );
        batch.push_solid(SolidRole::Negative(receiver), prism_between(neg_tip, neg_base)?);

        // Splice the tenon outline into both male contours.
        let piece_on = |face: &Plane, piece_v: f64| {
            tenon_piece(&plane, u0, u1, piece_v, depth, chamfer)
                .into_iter()
                .map(|p| crate::common::onto_face(face, plane.y_axis, &p))
                .collect::<Vec<_>>()
        };
        let top_piece = piece_on(&model.plates[male].top_plane, v_top);
        let bottom_piece = piece_on(&model.plates[male].bottom_plane, -v_top);
        batch.splice(model, male, top_piece, bottom_piece)?;

        // Mortise outline on both receiver faces, as a seam-matched pair.
        let hole = rect_at(&plane, u0 - f, u1 + f, -half_v - f, half_v + f, 0.0);
        let top_hole = contour_onto_face(
            &model.plates[receiver].top_plane,
            plane.normal,
            &hole,
        );
        let bottom_hole = contour_onto_face(
            &model.plates[receiver].bottom_plane,
            plane.normal,
            &hole,
        );
        batch.push_hole_pair(model, receiver, top_hole, bottom_hole);

        batch.push_fem(male, receiver, plane.point_at(x0, 0.0));
        batch.note_joint();
    }
    Ok(())
}

/// Outline of one tenon flank in a male face plane, as an open piece
/// whose endpoints lie on the existing contour edge.
fn tenon_piece(
    plane: &Plane,
    u0: f64,
    u1: f64,
    v: f64,
    depth: f64,
    chamfer: f64,
) -> Vec<Point3d> {
    vec![
        lifted(plane, u0, v, 0.0),
        lifted(plane, u0 + chamfer, v, depth),
        lifted(plane, u1 - chamfer, v, depth),
        lifted(plane, u1, v, 0.0),
    ]
}

/// Face-face drafted plug: unioned to the lower-index plate, cut from
/// the other. No contour changes, interior holes only.
fn plan_plugs(
    model: &PlateModel,
    batch: &mut JointBatch,
    target: PairTarget,
    params: &TenonParams,
    chamfer: f64,
) -> Result<(), JoineryError> {
    let (donor, receiver) = (target.i, target.j);
    let plane = model.contact_planes[donor][target.entry];
    let zone = &model.contact_zones[donor][target.entry];
    check_footprint(
        zone,
        &plane,
        params.width,
        params.count,
        params.spacing,
        params.shift,
        donor,
        receiver,
    )?;
    let depth = model.plates[receiver].thickness - params.retreat;
    if depth <= 0.0 {
        return Err(JoineryError::BadParameter {
            name: "retreat",
            reason: "exceeds the receiving plate's thickness".into(),
        });
    }
    let half = params.width * 0.5;
    for x0 in anchor_offsets(params.width, params.count, params.spacing, params.shift) {
        let base = rect_at(&plane, x0 - half, x0 + half, -half, half, 0.0);
        let tip = rect_at(
            &plane,
            x0 - half + chamfer,
            x0 + half - chamfer,
            -half + chamfer,
            half - chamfer,
            depth,
        );
        batch.push_solid(SolidRole::Positive(donor), prism_between(tip.clone(), base.clone())?);

        let f = params.fit;
        let neg_base = rect_at(&plane, x0 - half - f, x0 + half + f, -half - f, half + f, -f);
        let neg_tip = rect_at(
            &plane,
            x0 - half + chamfer - f,
            x0 + half - chamfer + f,
            -half + chamfer - f,
            half - chamfer + f,
            depth + f,
        );
        batch.push_solid(SolidRole::Negative(receiver), prism_between(neg_tip, neg_base)?);

        let top_hole = contour_onto_face(&model.plates[receiver].top_plane, plane.normal, &base);
        let bottom_hole =
            contour_onto_face(&model.plates[receiver].bottom_plane, plane.normal, &base);
        batch.push_hole_pair(model, receiver, top_hole, bottom_hole);
        batch.push_fem(donor, receiver, plane.point_at(x0, 0.0));
        batch.note_joint();
    }
    Ok(())
}
