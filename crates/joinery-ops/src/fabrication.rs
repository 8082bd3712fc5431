//! Tool-path derivation for CNC milling.
//!
//! Contours and hole pairs are re-simplified in lockstep so top and
//! bottom keep matching vertex counts, then offset by the tool radius.
//! The outline is offset away from the plate interior and holes toward
//! their own interior, so the tool center always rides the waste side.
//! Concave material corners optionally get dogbone or T-bone relief.

use serde::{Deserialize, Serialize};

use plate_model::PlateModel;
use plate_types::{Plane, Point3d, Polyline, Vec3};
use tracing::debug;

use crate::common::positive_param;
use crate::types::JoineryError;

/// Relief geometry inserted at corners the round tool cannot reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotchStyle {
    /// Spike along the corner's inward bisector.
    Dogbone,
    /// Spike extending the longer adjacent edge, hiding the relief
    /// along one wall of the joint.
    TBone,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FabricationParams {
    pub tool_radius: f64,
    /// Insert corner relief at concave material corners.
    pub notch: bool,
    pub style: NotchStyle,
    /// Relief is skipped when the corner angle falls outside
    /// (limit, 180deg - limit).
    pub limit_angle: f64,
}

impl Default for FabricationParams {
    fn default() -> Self {
        FabricationParams {
            tool_radius: 0.0,
            notch: false,
            style: NotchStyle::Dogbone,
            limit_angle: 10.0_f64.to_radians(),
        }
    }
}

/// Fill every plate's milling contours and hole paths. Plates whose
/// contours are too degenerate to offset are skipped with a warning.
pub fn get_fabrication_lines(
    model: &mut PlateModel,
    params: &FabricationParams,
) -> Result<(), JoineryError> {
    if params.tool_radius < 0.0 {
        return Err(JoineryError::BadParameter {
            name: "tool_radius",
            reason: format!("must not be negative, got {}", params.tool_radius),
        });
    }
    if params.notch {
        positive_param("limit_angle", params.limit_angle)?;
        if params.limit_angle >= std::f64::consts::FRAC_PI_2 {
            return Err(JoineryError::BadParameter {
                name: "limit_angle",
                reason: "must be below 90 degrees".into(),
            });
        }
    }

    let tol = model.tol.coincidence;
    for id in 0..model.plate_count() {
        let plate = &model.plates[id];
        let (top, bottom) =
            simplify_pair(&plate.top_contour, &plate.bottom_contour, tol);
        let top_plane = plate.top_plane;
        let bottom_plane = plate.bottom_plane;
        let holes: Vec<(Polyline, Polyline)> = plate
            .top_holes
            .iter()
            .zip(plate.bottom_holes.iter())
            .map(|(t, b)| simplify_pair(t, b, tol))
            .collect();

        let top_mill = milling_path(&top, &top_plane, params.tool_radius, 1.0, params);
        let bottom_mill =
            milling_path(&bottom, &bottom_plane, params.tool_radius, 1.0, params);
        let (top_mill, bottom_mill) = match (top_mill, bottom_mill) {
            (Some(t), Some(b)) => (t, b),
            _ => {
                model.warn(format!("plate {id}: contour too degenerate to offset"));
                continue;
            }
        };

        let mut hole_paths = Vec::with_capacity(holes.len());
        let mut holes_ok = true;
        for (k, (ht, hb)) in holes.iter().enumerate() {
            let t = milling_path(ht, &top_plane, params.tool_radius, -1.0, params);
            let b = milling_path(hb, &bottom_plane, params.tool_radius, -1.0, params);
            match (t, b) {
                (Some(t), Some(b)) => hole_paths.push((t, b)),
                _ => {
                    model.warn(format!("plate {id}: hole {k} too small for the tool"));
                    holes_ok = false;
                    break;
                }
            }
        }
        if !holes_ok {
            continue;
        }

        let plate = &mut model.plates[id];
        plate.top_contour = top;
        plate.bottom_contour = bottom;
        for (slot, (t, b)) in plate
            .top_holes
            .iter_mut()
            .zip(plate.bottom_holes.iter_mut())
            .zip(holes)
        {
            *slot.0 = t;
            *slot.1 = b;
        }
        plate.top_milling_contour = Some(top_mill);
        plate.bottom_milling_contour = Some(bottom_mill);
        plate.milling_holes = hole_paths;
        debug!(plate = id, "fabrication lines derived");
    }
    Ok(())
}

/// Simplify two index-matched contours together: a vertex is dropped
/// only when it is collinear in both, so the pair stays matched.
pub(crate) fn simplify_pair(a: &Polyline, b: &Polyline, tol: f64) -> (Polyline, Polyline) {
    let n = a.len().min(b.len());
    if n < 4 {
        return (a.clone(), b.clone());
    }
    let mut keep_a = Vec::with_capacity(n);
    let mut keep_b = Vec::with_capacity(n);
    for k in 0..n {
        let prev = (k + n - 1) % n;
        let next = (k + 1) % n;
        let redundant = collinear_at(&a.points[prev], &a.points[k], &a.points[next], tol)
            && collinear_at(&b.points[prev], &b.points[k], &b.points[next], tol);
        if !redundant {
            keep_a.push(a.points[k]);
            keep_b.push(b.points[k]);
        }
    }
    if keep_a.len() < 3 {
        return (a.clone(), b.clone());
    }
    (Polyline::new(keep_a), Polyline::new(keep_b))
}

fn collinear_at(prev: &Point3d, here: &Point3d, next: &Point3d, tol: f64) -> bool {
    let chord = *next - *prev;
    let len = chord.length();
    if len < tol {
        return true;
    }
    let off = *here - *prev;
    off.cross(&chord).length() / len < tol
}

/// Offset a closed contour by `radius` on the waste side and insert
/// corner relief. `material_sign` is +1 when the material is inside the
/// polygon (plate outline) and -1 when it is outside (a hole).
fn milling_path(
    contour: &Polyline,
    face: &Plane,
    radius: f64,
    material_sign: f64,
    params: &FabricationParams,
) -> Option<Polyline> {
    let n = contour.len();
    if n < 3 {
        return None;
    }
    let normal = face.normal;
    // Winding sign: +1 when the contour runs counter-clockwise about
    // the face normal.
    let winding = contour.newell_normal()?.dot(&normal).signum();

    let mut dirs = Vec::with_capacity(n);
    for (a, b) in contour.segments() {
        dirs.push((b - a).normalized()?);
    }
    // Waste-side normal per segment.
    let offsets: Vec<Vec3> = dirs
        .iter()
        .map(|d| d.cross(&normal) * (winding * material_sign))
        .collect();

    let mut out = Vec::with_capacity(n);
    for k in 0..n {
        let prev = (k + n - 1) % n;
        let corner = miter(
            contour.points[prev] + offsets[prev] * radius,
            dirs[prev],
            contour.points[k] + offsets[k] * radius,
            dirs[k],
            &normal,
        );
        if params.notch && radius > 0.0 {
            if let Some(spike) = relief_spike(
                &contour.points[k],
                dirs[prev],
                dirs[k],
                contour.points[prev].distance_to(&contour.points[k]),
                contour.points[k].distance_to(&contour.points[(k + 1) % n]),
                &normal,
                winding * material_sign,
                radius,
                params,
            ) {
                out.push(corner);
                out.push(corner + spike);
            }
        }
        out.push(corner);
    }
    Some(Polyline::new(out))
}

/// Intersection of two offset edge lines, falling back to the second
/// line's base point when the edges are parallel.
fn miter(a: Point3d, da: Vec3, b: Point3d, db: Vec3, normal: &Vec3) -> Point3d {
    let denom = da.cross(&db).dot(normal);
    if denom.abs() < 1e-12 {
        return b;
    }
    let t = (b - a).cross(&db).dot(normal) / denom;
    a + da * t
}

/// Relief vector at a concave material corner, or `None` when the
/// corner needs no relief.
#[allow(clippy::too_many_arguments)]
fn relief_spike(
    _corner: &Point3d,
    d_in: Vec3,
    d_out: Vec3,
    len_in: f64,
    len_out: f64,
    normal: &Vec3,
    waste_sign: f64,
    radius: f64,
    params: &FabricationParams,
) -> Option<Vec3> {
    // Concave for the material: the path turns toward the waste side.
    let turn = d_in.cross(&d_out).dot(normal) * waste_sign;
    if turn >= -1e-12 {
        return None;
    }
    // Corner angle between the two walls.
    let angle = (-d_in).dot(&d_out).clamp(-1.0, 1.0).acos();
    if angle <= params.limit_angle
        || angle >= std::f64::consts::PI - params.limit_angle
    {
        return None;
    }
    let dir = match params.style {
        NotchStyle::Dogbone => {
            // Inward bisector, pointing into the material.
            ((-d_in) + d_out).normalized_or(d_in * -1.0) * -1.0
        }
        NotchStyle::TBone => {
            if len_in >= len_out {
                d_in
            } else {
                -d_out
            }
        }
    };
    Some(dir * radius)
}
