//! Structural invariants every scenario keeps true.

use plate_model::PlateModel;

use crate::helpers::HarnessError;

fn fail(detail: String) -> Result<(), HarnessError> {
    Err(HarnessError::Check { detail })
}

/// Top and bottom contours of every plate carry matching vertex counts,
/// and face holes arrive in matched pairs lying inside the face outline.
pub fn check_contour_parity(model: &PlateModel) -> Result<(), HarnessError> {
    for plate in &model.plates {
        if plate.top_contour.len() != plate.bottom_contour.len() {
            return fail(format!(
                "plate {}: top contour has {} vertices, bottom has {}",
                plate.id,
                plate.top_contour.len(),
                plate.bottom_contour.len()
            ));
        }
        if plate.top_holes.len() != plate.bottom_holes.len() {
            return fail(format!(
                "plate {}: {} top holes vs {} bottom holes",
                plate.id,
                plate.top_holes.len(),
                plate.bottom_holes.len()
            ));
        }
        for (k, (t, b)) in plate
            .top_holes
            .iter()
            .zip(plate.bottom_holes.iter())
            .enumerate()
        {
            if t.len() != b.len() {
                return fail(format!(
                    "plate {}: hole {k} has {} vs {} vertices",
                    plate.id,
                    t.len(),
                    b.len()
                ));
            }
            if !plate.top_contour.contains(&t.centroid()) {
                return fail(format!(
                    "plate {}: hole {k} escapes the top face outline",
                    plate.id
                ));
            }
        }
    }
    Ok(())
}

/// Every resolved contact appears in both plates' adjacency arrays with
/// mirrored type, opposite normal and a shared center.
pub fn check_contact_symmetry(model: &PlateModel) -> Result<(), HarnessError> {
    let tol = model.tol.coincidence;
    for i in 0..model.plate_count() {
        for (entry, &j) in model.neighbors[i].iter().enumerate() {
            let back = match model.neighbor_index(j, i) {
                Some(b) => b,
                None => {
                    return fail(format!("contact {i}->{j} has no mirrored entry"));
                }
            };
            let here = model.contact_types[i][entry];
            let there = model.contact_types[j][back];
            if there != here.mirror() {
                return fail(format!(
                    "contact {i}->{j}: {here:?} mirrored as {there:?}"
                ));
            }
            let n_sum = model.contact_normals[i][entry] + model.contact_normals[j][back];
            if n_sum.length() > tol {
                return fail(format!("contact {i}->{j}: normals are not opposite"));
            }
            let c = model.contact_centers[i][entry];
            if c.distance_to(&model.contact_centers[j][back]) > tol {
                return fail(format!("contact {i}->{j}: centers disagree"));
            }
        }
    }
    Ok(())
}
