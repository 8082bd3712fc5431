//! Seam matching: bring two contours of a plate into the index-paired form
//! every joint generator relies on (equal vertex counts, corresponding
//! indices geometrically aligned, matching traversal direction and start).

use plate_types::{Polyline, Vec3};

use crate::types::ModelError;

/// Align `bottom` to `top` in place: same winding, matched start seam.
/// Both contours must already be simplified; mismatched vertex counts are
/// an error (the caller names the plate).
pub fn match_seams(
    top: &Polyline,
    bottom: &Polyline,
    top_normal: Vec3,
) -> Result<Polyline, ModelError> {
    if top.len() != bottom.len() {
        return Err(ModelError::SpliceFailed {
            reason: format!(
                "cannot seam-match contours of {} and {} vertices",
                top.len(),
                bottom.len()
            ),
        });
    }
    if top.len() < 3 {
        return Err(ModelError::SpliceFailed {
            reason: "contour with fewer than 3 vertices".into(),
        });
    }

    // Same traversal direction around the prism axis: both Newell normals
    // must agree with the top face normal.
    let mut aligned = match bottom.newell_normal() {
        Some(n) if n.dot(&top_normal) < 0.0 => bottom.reversed(),
        Some(_) => bottom.clone(),
        None => {
            return Err(ModelError::SpliceFailed {
                reason: "degenerate bottom contour".into(),
            })
        }
    };

    // Start the bottom seam at the vertex nearest the top seam.
    if let Some((k, _)) = aligned.closest_vertex(&top.points[0]) {
        aligned = aligned.rotate_seam(k);
    }
    Ok(aligned)
}
