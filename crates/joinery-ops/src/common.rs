//! Shared plumbing for the joint generators.
//!
//! Generators run in two phases: first every qualifying contact pair is
//! validated and its geometry built against scratch copies of the plate
//! contours, then the accumulated edits are committed in one pass. A
//! validation failure therefore mutates nothing.

use std::collections::BTreeMap;

use plate_kernel::{PlateKernel, PrismSolid};
use plate_model::{insert_curves, PlateModel};
use plate_types::{ContactType, Plane, Point3d, Polyline, Vec3};
use tracing::debug;

use crate::fem::record_fem_joint;
use crate::types::JoineryError;

/// One qualifying contact: plate pair (i, j) with `i < j` and the index
/// of the entry in plate i's adjacency arrays.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PairTarget {
    pub i: usize,
    pub j: usize,
    pub entry: usize,
    pub ctype: ContactType,
}

/// Unordered pairs whose contact type matches `family`, each visited
/// once, optionally filtered by an explicit allowlist (order-blind).
pub(crate) fn matching_pairs(
    model: &PlateModel,
    family: impl Fn(ContactType) -> bool,
    allow: Option<&[(usize, usize)]>,
) -> Vec<PairTarget> {
    let mut out = Vec::new();
    for i in 0..model.plate_count() {
        for (entry, &j) in model.neighbors[i].iter().enumerate() {
            if j <= i {
                continue;
            }
            let ctype = model.contact_types[i][entry];
            if !family(ctype) {
                continue;
            }
            if let Some(allow) = allow {
                if !allow.contains(&(i, j)) && !allow.contains(&(j, i)) {
                    continue;
                }
            }
            out.push(PairTarget { i, j, entry, ctype });
        }
    }
    out
}

/// Linear footprint of `count` features of `width` separated by
/// `spacing`, shifted off center by `shift`.
pub(crate) fn footprint(width: f64, count: usize, spacing: f64, shift: f64) -> f64 {
    width * count as f64 + spacing * count.saturating_sub(1) as f64 + 2.0 * shift.abs()
}

/// Fail when the footprint exceeds the zone extent along the contact
/// x-axis, reporting the overage as a percentage.
pub(crate) fn check_footprint(
    zone: &Polyline,
    plane: &Plane,
    width: f64,
    count: usize,
    spacing: f64,
    shift: f64,
    i: usize,
    j: usize,
) -> Result<(), JoineryError> {
    let (du, _) = zone.extents_in(plane);
    let need = footprint(width, count, spacing, shift);
    if need > du {
        return Err(JoineryError::JointTooLarge {
            i,
            j,
            overage_pct: (need / du - 1.0) * 100.0,
        });
    }
    Ok(())
}

/// Feature-center offsets along the contact x-axis, evenly spaced about
/// the origin and shifted by `shift`.
pub(crate) fn anchor_offsets(width: f64, count: usize, spacing: f64, shift: f64) -> Vec<f64> {
    let span = width * count as f64 + spacing * count.saturating_sub(1) as f64;
    let start = -span * 0.5 + width * 0.5 + shift;
    (0..count)
        .map(|k| start + k as f64 * (width + spacing))
        .collect()
}

pub(crate) fn positive_param(
    name: &'static str,
    value: f64,
) -> Result<(), JoineryError> {
    if !(value > 0.0) {
        return Err(JoineryError::BadParameter {
            name,
            reason: format!("must be positive, got {value}"),
        });
    }
    Ok(())
}

pub(crate) fn positive_count(name: &'static str, value: usize) -> Result<(), JoineryError> {
    if value == 0 {
        return Err(JoineryError::BadParameter {
            name,
            reason: "must be at least 1".into(),
        });
    }
    Ok(())
}

/// Point at contact-plane coordinates (u, v) lifted by `h` along the
/// plane normal.
pub(crate) fn lifted(plane: &Plane, u: f64, v: f64, h: f64) -> Point3d {
    plane.point_at(u, v) + plane.normal * h
}

/// Closed rectangle in the contact plane lifted by `h`.
pub(crate) fn rect_at(plane: &Plane, u0: f64, u1: f64, v0: f64, v1: f64, h: f64) -> Polyline {
    Polyline::new(vec![
        lifted(plane, u0, v0, h),
        lifted(plane, u1, v0, h),
        lifted(plane, u1, v1, h),
        lifted(plane, u0, v1, h),
    ])
}

/// Regular polygon in the contact plane around (u, v), lifted by `h`.
pub(crate) fn ngon_at(
    plane: &Plane,
    u: f64,
    v: f64,
    radius: f64,
    sides: usize,
    h: f64,
) -> Polyline {
    let points = (0..sides)
        .map(|k| {
            let t = std::f64::consts::TAU * k as f64 / sides as f64;
            lifted(plane, u + radius * t.cos(), v + radius * t.sin(), h)
        })
        .collect();
    Polyline::new(points)
}

/// Prism between two congruent contours at different heights.
pub(crate) fn prism_between(
    top: Polyline,
    bottom: Polyline,
) -> Result<PrismSolid, JoineryError> {
    Ok(PrismSolid::from_contours(&top, &bottom)?)
}

/// Where a committed joint solid goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SolidRole {
    Positive(usize),
    Negative(usize),
    Key(usize),
}

/// Scratch contour state for one plate while a generator validates.
#[derive(Debug, Clone)]
struct PlateDraft {
    top: Polyline,
    bottom: Polyline,
    top_holes: Vec<Polyline>,
    bottom_holes: Vec<Polyline>,
}

/// Accumulated, not-yet-applied output of one generator call.
pub(crate) struct JointBatch {
    drafts: BTreeMap<usize, PlateDraft>,
    solids: Vec<(SolidRole, PrismSolid)>,
    fem: Vec<(usize, usize, Point3d)>,
    count: usize,
}

impl JointBatch {
    pub(crate) fn new() -> Self {
        JointBatch {
            drafts: BTreeMap::new(),
            solids: Vec::new(),
            fem: Vec::new(),
            count: 0,
        }
    }

    pub(crate) fn joints(&self) -> usize {
        self.count
    }

    pub(crate) fn note_joint(&mut self) {
        self.count += 1;
    }

    pub(crate) fn push_solid(&mut self, role: SolidRole, solid: PrismSolid) {
        self.solids.push((role, solid));
    }

    pub(crate) fn push_fem(&mut self, i: usize, j: usize, anchor: Point3d) {
        self.fem.push((i, j, anchor));
    }

    fn draft(&mut self, model: &PlateModel, plate: usize) -> &mut PlateDraft {
        self.drafts.entry(plate).or_insert_with(|| {
            let p = &model.plates[plate];
            PlateDraft {
                top: p.top_contour.clone(),
                bottom: p.bottom_contour.clone(),
                top_holes: Vec::new(),
                bottom_holes: Vec::new(),
            }
        })
    }

    /// Splice open pieces into the plate's top and bottom contour drafts.
    /// Pieces are given per contour so indexed parity is preserved.
    pub(crate) fn splice(
        &mut self,
        model: &PlateModel,
        plate: usize,
        top_piece: Vec<Point3d>,
        bottom_piece: Vec<Point3d>,
    ) -> Result<(), JoineryError> {
        let tol = model.tol.coincidence;
        let draft = self.draft(model, plate);
        draft.top = insert_curves(&draft.top, &[top_piece], tol)?;
        draft.bottom = insert_curves(&draft.bottom, &[bottom_piece], tol)?;
        Ok(())
    }

    /// Queue a seam-matched hole pair on the plate's faces.
    pub(crate) fn push_hole_pair(
        &mut self,
        model: &PlateModel,
        plate: usize,
        top: Polyline,
        bottom: Polyline,
    ) {
        let draft = self.draft(model, plate);
        draft.top_holes.push(top);
        draft.bottom_holes.push(bottom);
    }

    /// Apply every accumulated edit. Only called after all validation
    /// succeeded.
    pub(crate) fn commit(
        self,
        model: &mut PlateModel,
        kernel: &mut dyn PlateKernel,
    ) -> Result<usize, JoineryError> {
        for (plate, draft) in self.drafts {
            let p = &mut model.plates[plate];
            p.top_contour = draft.top;
            p.bottom_contour = draft.bottom;
            p.top_holes.extend(draft.top_holes);
            p.bottom_holes.extend(draft.bottom_holes);
        }
        for (role, solid) in self.solids {
            let handle = kernel.add_solid(solid);
            match role {
                SolidRole::Positive(p) => model.plates[p].joints_positives.push(handle),
                SolidRole::Negative(p) => model.plates[p].joints_negatives.push(handle),
                SolidRole::Key(p) => model.plates[p].joints_keys.push(handle),
            }
        }
        for (i, j, anchor) in self.fem {
            record_fem_joint(model, i, j, &anchor);
        }
        debug!(joints = self.count, "joint batch committed");
        Ok(self.count)
    }
}

/// Translation taking a point in the contact plane onto `face`, along
/// `dir`. The face must not be parallel to `dir`.
pub(crate) fn onto_face(face: &Plane, dir: Vec3, p: &Point3d) -> Point3d {
    let denom = dir.dot(&face.normal);
    if denom.abs() < 1e-12 {
        return *p;
    }
    *p + dir * (-face.signed_distance(p) / denom)
}

/// Project a whole contour onto `face` along `dir`.
pub(crate) fn contour_onto_face(face: &Plane, dir: Vec3, contour: &Polyline) -> Polyline {
    Polyline::new(contour.points.iter().map(|p| onto_face(face, dir, p)).collect())
}
