//! Pairwise contact detection and classification.
//!
//! `resolve` walks every unordered plate pair, probes the kernel for a
//! coplanar surface patch or a volumetric overlap, classifies the contact
//! and records a mirrored entry on each side so plate i's view of neighbor
//! j and plate j's view of neighbor i always describe the same physical
//! contact.

use plate_kernel::PlateKernel;
use plate_model::{ContactEntry, Plate, PlateModel};
use plate_types::{ContactType, Plane, Point3d, Polyline, Vec3};
use tracing::debug;

use crate::types::TopologyError;

const PARALLEL_TOL: f64 = 1e-6;

/// Resolve the complete contact graph of `model` against `kernel`.
///
/// Existing contact arrays are cleared first, so re-running on an
/// unmodified model reproduces the same assignments. Pairs listed in
/// `discard_pairs` (in either order) are skipped.
pub fn resolve(
    model: &mut PlateModel,
    kernel: &dyn PlateKernel,
    discard_pairs: &[(usize, usize)],
) -> Result<(), TopologyError> {
    model.clear_contacts();
    let n = model.plate_count();
    for i in 0..n {
        for j in (i + 1)..n {
            if discard_pairs.contains(&(i, j)) || discard_pairs.contains(&(j, i)) {
                continue;
            }
            if let Some(found) = probe_pair(model, kernel, i, j)? {
                debug!(i, j, ctype = %found.ctype, "contact resolved");
                record_pair(model, i, j, found);
            }
        }
    }
    Ok(())
}

/// One resolved unordered contact, expressed from plate i's perspective.
struct ResolvedContact {
    ctype: ContactType,
    zone: Polyline,
    center: Point3d,
    /// Oriented away from plate i's interior.
    normal: Vec3,
}

fn probe_pair(
    model: &PlateModel,
    kernel: &dyn PlateKernel,
    i: usize,
    j: usize,
) -> Result<Option<ResolvedContact>, TopologyError> {
    let tol = model.tol;
    let (pi, pj) = (&model.plates[i], &model.plates[j]);
    let patches = kernel.surface_contacts(pi.solid, pj.solid, tol.coincidence)?;

    if let Some(patch) = patches.first() {
        let zone = patch.polygon.clone();
        let zone_normal = patch.plane.normal;
        let ni = pi.top_plane.normal;
        let nj = pj.top_plane.normal;
        let i_face = zone_normal.cross(&ni).length() < PARALLEL_TOL;
        let j_face = zone_normal.cross(&nj).length() < PARALLEL_TOL;

        let ctype = match (i_face, j_face) {
            (true, true) => ContactType::FF,
            (false, false) => ContactType::SS,
            (true, false) => {
                if plates_share_contour_edge(pi, pj, tol.coincidence) {
                    ContactType::ES
                } else {
                    ContactType::FS
                }
            }
            (false, true) => {
                if plates_share_contour_edge(pi, pj, tol.coincidence) {
                    ContactType::SE
                } else {
                    ContactType::SF
                }
            }
        };
        let center = zone.centroid();
        let normal = away_from(zone_normal, &center, &pi.volumetric_center());
        return Ok(Some(ResolvedContact {
            ctype,
            zone,
            center,
            normal,
        }));
    }

    if !kernel.volumes_overlap(pi.solid, pj.solid, tol.coincidence)? {
        return Ok(None);
    }
    let found = resolve_volumetric(kernel, pi, pj, i, j)?;
    Ok(Some(found))
}

/// Volumetric (IN) contact: reconstruct a planar zone from the convex
/// intersection of the two solids.
///
/// The zone is spanned by the four longest intersection edges parallel to
/// `cross(n_i, n_j)`: their midpoints' centroid is projected back onto
/// each edge and the four projections, ordered around the axis, bound the
/// contact polygon.
fn resolve_volumetric(
    kernel: &dyn PlateKernel,
    pi: &Plate,
    pj: &Plate,
    i: usize,
    j: usize,
) -> Result<ResolvedContact, TopologyError> {
    let inter = kernel.convex_intersection(pi.solid, pj.solid)?;
    let axis = pi
        .top_plane
        .normal
        .cross(&pj.top_plane.normal)
        .normalized()
        .ok_or_else(|| TopologyError::DegenerateZone {
            i,
            j,
            reason: "plate normals are parallel but no surface patch exists".into(),
        })?;

    // Collect distinct intersection edges parallel to the axis. Each edge
    // borders two faces, so deduplicate by midpoint.
    let mut edges: Vec<(Point3d, Vec3, f64)> = Vec::new();
    for face in &inter.faces {
        for (a, b) in face.polygon.segments() {
            let d = b - a;
            let len = d.length();
            if len < 1e-9 || !d.is_parallel_to(&axis, PARALLEL_TOL * len) {
                continue;
            }
            let mid = a.midpoint(&b);
            if edges.iter().all(|(m, _, _)| m.distance_to(&mid) > 1e-9) {
                edges.push((mid, d * (1.0 / len), len));
            }
        }
    }
    edges.sort_by(|a, b| b.2.total_cmp(&a.2));
    if edges.len() < 4 {
        return Err(TopologyError::NoParallelEdges { i, j });
    }
    edges.truncate(4);

    let centroid = Point3d::mean(&edges.iter().map(|(m, _, _)| *m).collect::<Vec<_>>())
        .ok_or(TopologyError::NoParallelEdges { i, j })?;
    let mut corners: Vec<Point3d> = edges
        .iter()
        .map(|(mid, dir, _)| *mid + *dir * (centroid - *mid).dot(dir))
        .collect();

    // Convex ordering of the four corners about the axis.
    let section = Plane::new(centroid, axis);
    corners.sort_by(|a, b| {
        let (ua, va) = section.parameters_of(a);
        let (ub, vb) = section.parameters_of(b);
        va.atan2(ua).total_cmp(&vb.atan2(ub))
    });
    let zone = Polyline::new(corners);
    let center = zone.centroid();
    let normal = away_from(axis, &center, &pi.volumetric_center());
    Ok(ResolvedContact {
        ctype: ContactType::IN,
        zone,
        center,
        normal,
    })
}

/// Push the mirrored contact entries for both plates of a resolved pair.
fn record_pair(model: &mut PlateModel, i: usize, j: usize, found: ResolvedContact) {
    let x_dir = found
        .zone
        .longest_edge()
        .map(|(_, d, _)| d)
        .unwrap_or(Vec3::X);

    // For edge-side pairs the "female" plate is the one whose side face
    // carries the zone: the SE half of the pair.
    let pair = match found.ctype {
        ContactType::ES => Some((j, i)),
        ContactType::SE => Some((i, j)),
        _ => None,
    };
    let plane_i = contact_plane(model, &found, pair, found.normal, x_dir);
    let plane_j = contact_plane(model, &found, pair, -found.normal, x_dir);

    model.push_contact(
        i,
        ContactEntry {
            neighbor: j,
            ctype: found.ctype,
            zone: found.zone.clone(),
            center: found.center,
            normal: found.normal,
            plane: plane_i,
        },
    );
    model.push_contact(
        j,
        ContactEntry {
            neighbor: i,
            ctype: found.ctype.mirror(),
            zone: found.zone,
            center: found.center,
            normal: -found.normal,
            plane: plane_j,
        },
    );
}

/// Contact-local plane for one side of a resolved pair.
///
/// x-axis follows the longest zone boundary edge. For edge-side contacts
/// the y-axis is additionally kept pointing away from the female plate's
/// mid-plane, toward the male plate's material, so downstream joint
/// generators bias features into the solid half of the corner.
fn contact_plane(
    model: &PlateModel,
    found: &ResolvedContact,
    female_male: Option<(usize, usize)>,
    normal: Vec3,
    x_dir: Vec3,
) -> Plane {
    let mut plane = Plane::with_x_axis(found.center, normal, x_dir);
    if let Some((female, male)) = female_male {
        let mid = model.plates[female].mid_plane;
        let anchor = model.plates[male].volumetric_center();
        let lateral = anchor - mid.project_point(&anchor);
        if plane.y_axis.dot(&lateral) < 0.0 {
            plane = plane.x_reversed();
        }
    }
    plane
}

fn away_from(normal: Vec3, center: &Point3d, interior: &Point3d) -> Vec3 {
    if normal.dot(&(*center - *interior)) < 0.0 {
        -normal
    } else {
        normal
    }
}

/// True when any contour segment of `a` is parallel, colinear and
/// overlapping with a contour segment of `b`. Distinguishes flush corner
/// joints (ES/SE) from plain face-side contacts.
fn plates_share_contour_edge(a: &Plate, b: &Plate, tol: f64) -> bool {
    let a_contours = [&a.top_contour, &a.bottom_contour];
    let b_contours = [&b.top_contour, &b.bottom_contour];
    for ca in a_contours {
        for cb in b_contours {
            for (a0, a1) in ca.segments() {
                for (b0, b1) in cb.segments() {
                    if segments_share_span(&a0, &a1, &b0, &b1, tol.max(PARALLEL_TOL)) {
                        return true;
                    }
                }
            }
        }
    }
    false
}

fn segments_share_span(a0: &Point3d, a1: &Point3d, b0: &Point3d, b1: &Point3d, tol: f64) -> bool {
    let da = *a1 - *a0;
    let db = *b1 - *b0;
    let (la, lb) = (da.length(), db.length());
    if la < tol || lb < tol {
        return false;
    }
    let ua = da * (1.0 / la);
    if !da.is_parallel_to(&db, PARALLEL_TOL * la * lb) {
        return false;
    }
    // Colinear: b's endpoints lie on a's carrier line.
    for p in [b0, b1] {
        let off = *p - *a0;
        if off.cross(&ua).length() > tol {
            return false;
        }
    }
    // Overlapping spans along the shared line.
    let (s0, s1) = ((*b0 - *a0).dot(&ua), (*b1 - *a0).dot(&ua));
    let (lo, hi) = (s0.min(s1), s0.max(s1));
    hi > tol && lo < la - tol
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colinear_overlapping_segments_detected() {
        let a0 = Point3d::new(0.0, 0.0, 0.0);
        let a1 = Point3d::new(10.0, 0.0, 0.0);
        let b0 = Point3d::new(4.0, 0.0, 0.0);
        let b1 = Point3d::new(14.0, 0.0, 0.0);
        assert!(segments_share_span(&a0, &a1, &b0, &b1, 1e-6));
        // Reversed direction still overlaps.
        assert!(segments_share_span(&a0, &a1, &b1, &b0, 1e-6));
    }

    #[test]
    fn parallel_but_offset_segments_rejected() {
        let a0 = Point3d::new(0.0, 0.0, 0.0);
        let a1 = Point3d::new(10.0, 0.0, 0.0);
        let b0 = Point3d::new(0.0, 1.0, 0.0);
        let b1 = Point3d::new(10.0, 1.0, 0.0);
        assert!(!segments_share_span(&a0, &a1, &b0, &b1, 1e-6));
    }

    #[test]
    fn colinear_disjoint_segments_rejected() {
        let a0 = Point3d::new(0.0, 0.0, 0.0);
        let a1 = Point3d::new(10.0, 0.0, 0.0);
        let b0 = Point3d::new(11.0, 0.0, 0.0);
        let b1 = Point3d::new(20.0, 0.0, 0.0);
        assert!(!segments_share_span(&a0, &a1, &b0, &b1, 1e-6));
    }
}
