//! Structural-analysis export bookkeeping.
//!
//! Tenon-family generators record, per joint, a knot on each plate's
//! simplified mid-contour plus a straight connector segment between the
//! two knots. The resulting `fem_plates` / `fem_joints` lists are the
//! whole contract surface toward the external structural solver.

use plate_model::PlateModel;
use plate_types::{Point3d, Polyline};

/// Insert a knot vertex at the closest point of `contour` to `p`.
/// Returns the knot. Existing vertices within `tol` are reused.
pub(crate) fn insert_knot(contour: &mut Polyline, p: &Point3d, tol: f64) -> Point3d {
    let Some((closest, param)) = contour.closest_point(p) else {
        return *p;
    };
    let seg = param.floor() as usize;
    let t = param - seg as f64;
    // Landing on an existing vertex: nothing to insert.
    if t < 1e-9 || t > 1.0 - 1e-9 {
        return closest;
    }
    if contour
        .points
        .iter()
        .any(|q| q.distance_to(&closest) < tol)
    {
        return closest;
    }
    contour.points.insert(seg + 1, closest);
    closest
}

/// Record one joint between plates `i` and `j` anchored near `anchor`.
pub(crate) fn record_fem_joint(model: &mut PlateModel, i: usize, j: usize, anchor: &Point3d) {
    model.ensure_fem_plates();
    let tol = model.tol.coincidence;
    let ki = {
        let contour = &mut model.fem_plates[i];
        insert_knot(contour, anchor, tol)
    };
    let kj = {
        let contour = &mut model.fem_plates[j];
        insert_knot(contour, anchor, tol)
    };
    model.fem_joints.push((ki, kj));
}
