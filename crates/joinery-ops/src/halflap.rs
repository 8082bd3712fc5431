//! Half-lap generator for volumetric (crossing) contacts.
//!
//! The shared volume of the two plates is split by one planar cutter
//! placed at a proportion of the volume's extent along the contact
//! normal. Each sub-volume becomes a negative on the plate whose contour
//! it meets least, so crossing webs slot into each other and a pierced
//! plate takes the whole cut. An optional drafted skirt widens the cut
//! mouth for tool access.

use serde::{Deserialize, Serialize};

use plate_kernel::{prism, PlateKernel, PrismSolid};
use plate_model::PlateModel;
use plate_types::{ContactType, Plane, Polyline, Vec3};
use tracing::debug;

use crate::common::{matching_pairs, positive_param, prism_between, JointBatch, SolidRole};
use crate::types::JoineryError;

/// Proportion is held strictly inside this band.
const PROPORTION_MIN: f64 = 0.01;
const PROPORTION_MAX: f64 = 0.99;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HalflapParams {
    /// Where the cutter sits along the lap, as a fraction of the shared
    /// volume's extent. Clamped strictly inside (0.01, 0.99).
    pub proportion: f64,
    /// Optional drafted-skirt chamfer at the cut mouth.
    pub chamfer: Option<ChamferParams>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChamferParams {
    /// Lateral widening at the cut mouth.
    pub amount: f64,
    /// Draft angle of the skirt flanks, radians.
    pub angle: f64,
}

/// Cut half-laps into every qualifying volumetric contact.
pub fn add_halflaps(
    model: &mut PlateModel,
    kernel: &mut dyn PlateKernel,
    pairs: Option<&[(usize, usize)]>,
    params: &HalflapParams,
) -> Result<usize, JoineryError> {
    if let Some(ch) = &params.chamfer {
        positive_param("chamfer.amount", ch.amount)?;
        positive_param("chamfer.angle", ch.angle)?;
        if ch.angle >= std::f64::consts::FRAC_PI_2 {
            return Err(JoineryError::BadParameter {
                name: "chamfer.angle",
                reason: "must be below 90 degrees".into(),
            });
        }
    }
    let proportion = params.proportion.clamp(PROPORTION_MIN, PROPORTION_MAX);
    let targets = matching_pairs(model, |c| c == ContactType::IN, pairs);

    let mut batch = JointBatch::new();
    for target in targets {
        let (i, j) = (target.i, target.j);
        let shared = kernel.convex_intersection(
            model.plates[i].solid,
            model.plates[j].solid,
        )?;
        let axis = model.contact_normals[i][target.entry];
        let zone = model.contact_zones[i][target.entry].clone();

        // Cutter position along the axis, across the shared volume.
        let (lo, hi) = axis_extent(&shared, &axis);
        if hi - lo <= model.tol.coincidence {
            return Err(JoineryError::EmptyLap { i, j });
        }
        let offset = lo + proportion * (hi - lo);
        let anchor = model.contact_centers[i][target.entry];
        let cut_origin = anchor + axis * (offset - axis.dot(&anchor.to_vec()));

        let faces = shared.planes();
        let upper = clip_half(&faces, &Plane::new(cut_origin, -axis), model.tol.coincidence)
            .ok_or(JoineryError::EmptyLap { i, j })?;
        let lower = clip_half(&faces, &Plane::new(cut_origin, axis), model.tol.coincidence)
            .ok_or(JoineryError::EmptyLap { i, j })?;

        // Assign each piece to whichever plate's face planes it touches
        // least; ties go to the lower index above the cut and the higher
        // index below, which slots symmetric crossings complementarily.
        let (ui, uj) = (
            face_contact_length(&upper, &model.plates[i].top_plane, &model.plates[i].bottom_plane),
            face_contact_length(&upper, &model.plates[j].top_plane, &model.plates[j].bottom_plane),
        );
        let upper_owner = if ui <= uj { i } else { j };
        let (li, lj) = (
            face_contact_length(&lower, &model.plates[i].top_plane, &model.plates[i].bottom_plane),
            face_contact_length(&lower, &model.plates[j].top_plane, &model.plates[j].bottom_plane),
        );
        let lower_owner = if li < lj { i } else { j };
        debug!(i, j, upper_owner, lower_owner, "half-lap assignment");

        if let Some(ch) = &params.chamfer {
            let run = ch.amount / ch.angle.tan();
            if run >= (hi - lo) * proportion.min(1.0 - proportion) {
                return Err(JoineryError::ChamferTooDeep { i, j });
            }
            let section = section_at(&zone, &axis, offset);
            batch.push_solid(
                SolidRole::Negative(upper_owner),
                skirt(&section, &axis, ch.amount, run, 1.0)?,
            );
            batch.push_solid(
                SolidRole::Negative(lower_owner),
                skirt(&section, &axis, ch.amount, run, -1.0)?,
            );
        }

        batch.push_solid(SolidRole::Negative(upper_owner), upper);
        batch.push_solid(SolidRole::Negative(lower_owner), lower);
        batch.push_fem(i, j, anchor);
        batch.note_joint();
    }
    batch.commit(model, kernel)
}

fn axis_extent(solid: &PrismSolid, axis: &Vec3) -> (f64, f64) {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for v in solid.vertices() {
        let d = axis.dot(&v.to_vec());
        lo = lo.min(d);
        hi = hi.max(d);
    }
    (lo, hi)
}

/// Clip the convex face set by one more half-space.
fn clip_half(faces: &[Plane], cutter: &Plane, tol: f64) -> Option<PrismSolid> {
    let mut planes = faces.to_vec();
    planes.push(*cutter);
    prism::convex_intersection(&planes, tol)
}

/// Total edge length of `solid` lying in either of the two face planes.
fn face_contact_length(solid: &PrismSolid, top: &Plane, bottom: &Plane) -> f64 {
    let tol = 1e-6;
    let mut total = 0.0;
    for face in &solid.faces {
        for (a, b) in face.polygon.segments() {
            let on = |plane: &Plane| {
                plane.signed_distance(&a).abs() < tol && plane.signed_distance(&b).abs() < tol
            };
            if on(top) || on(bottom) {
                total += a.distance_to(&b);
            }
        }
    }
    // Shared edges are counted twice across faces.
    total * 0.5
}

/// Cross-section polygon of the lap at the cutter offset, reusing the
/// resolved contact zone translated along the axis.
fn section_at(zone: &Polyline, axis: &Vec3, offset: f64) -> Polyline {
    let current = axis.dot(&zone.centroid().to_vec());
    zone.translated(*axis * (offset - current))
}

/// Drafted skirt: a frustum widening from the cut section by `amount`
/// over `run`, opening toward `side` along the axis.
fn skirt(
    section: &Polyline,
    axis: &Vec3,
    amount: f64,
    run: f64,
    side: f64,
) -> Result<PrismSolid, JoineryError> {
    let centroid = section.centroid();
    let flared = Polyline::new(
        section
            .points
            .iter()
            .map(|p| {
                let out = (*p - centroid).normalized_or(Vec3::X);
                *p + out * amount + *axis * (side * run)
            })
            .collect(),
    );
    prism_between(flared, section.clone())
}
