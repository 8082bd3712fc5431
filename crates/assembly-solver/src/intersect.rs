//! Intersection of insertion spaces on the origin-centered unit sphere.

use plate_types::{InsertionSpace, Point3d, Vec3};
use tracing::trace;

use crate::types::SolverError;

/// Membership tolerance for the staged reduction.
pub const INTERSECT_TOL: f64 = 1e-3;

/// Common intersection of a set of origin-centered insertion spaces.
///
/// Staged reduction, most-constraining category first: all point inputs
/// must coincide; arc inputs are reduced by sampled curve membership;
/// patch inputs by membership of their boundary-and-interior sample
/// cloud. Surviving candidates are averaged to a single unit direction.
/// When every input already describes the same region the first space is
/// returned unchanged. Disjoint multi-region overlaps are not separated:
/// their candidates average like any other set.
pub fn intersect_spaces(spaces: &[InsertionSpace]) -> Result<InsertionSpace, SolverError> {
    let first = spaces.first().ok_or(SolverError::NoSpaces)?;
    if spaces[1..].iter().all(|s| s.approx_eq(first, INTERSECT_TOL)) {
        return Ok(first.clone());
    }

    let mut ordered: Vec<&InsertionSpace> = spaces.iter().collect();
    ordered.sort_by_key(|s| s.rank());
    trace!(count = ordered.len(), lead_rank = ordered[0].rank(), "intersecting spaces");

    // Candidate directions come from the most-constrained space; every
    // remaining space filters them.
    let seed = ordered[0];
    if let InsertionSpace::Point { dir, .. } = seed {
        // All other point inputs must coincide with this one.
        for other in &ordered[1..] {
            if let InsertionSpace::Point { dir: d, .. } = other {
                if (*d - *dir).length() > INTERSECT_TOL {
                    return Err(SolverError::NoIntersection);
                }
            }
        }
    }
    let candidates: Vec<Vec3> = seed
        .sample_dirs()
        .into_iter()
        .filter(|d| {
            ordered[1..]
                .iter()
                .all(|s| s.contains_dir(d, INTERSECT_TOL))
        })
        .collect();
    if candidates.is_empty() {
        return Err(SolverError::NoIntersection);
    }

    let sum = candidates
        .iter()
        .fold(Vec3::ZERO, |acc, d| acc + *d);
    let dir = sum.normalized().ok_or(SolverError::NoIntersection)?;
    Ok(InsertionSpace::Point {
        center: Point3d::ORIGIN,
        dir,
    })
}
