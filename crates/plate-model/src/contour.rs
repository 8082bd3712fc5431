//! Contour splice: the single mechanism every joint generator uses to keep
//! contour bookkeeping consistent with the solid geometry.
//!
//! Inserting an open boundary piece into a closed polyline splits the
//! polyline at the parameters closest to the piece's end points, producing
//! two possible trims; whichever yields a valid single closed polyline is
//! kept. With one piece the longer result wins, with several the candidate
//! disturbing fewer vertices wins.

use plate_types::{Point3d, Polyline};

use crate::types::ModelError;

/// Splice `pieces` (open polylines) into a closed contour, returning the
/// single resulting closed polyline. Fails if any insertion cannot produce
/// exactly one closed polyline.
pub fn insert_curves(
    contour: &Polyline,
    pieces: &[Vec<Point3d>],
    tol: f64,
) -> Result<Polyline, ModelError> {
    let prefer_longer = pieces.len() == 1;
    let mut current = contour.clone();
    for piece in pieces {
        current = insert_one(&current, piece, prefer_longer, tol)?;
    }
    Ok(current)
}

fn insert_one(
    contour: &Polyline,
    piece: &[Point3d],
    prefer_longer: bool,
    tol: f64,
) -> Result<Polyline, ModelError> {
    if piece.len() < 2 {
        return Err(ModelError::SpliceFailed {
            reason: "inserted piece has fewer than 2 points".into(),
        });
    }
    let first = piece[0];
    let last = piece[piece.len() - 1];
    let (_, ta) = contour
        .closest_point(&first)
        .ok_or_else(|| splice_err("empty contour"))?;
    let (_, tb) = contour
        .closest_point(&last)
        .ok_or_else(|| splice_err("empty contour"))?;

    if (ta - tb).abs() < 1e-12 {
        return Err(splice_err("piece end points collapse to one split"));
    }

    // Trim A keeps the contour arc from the piece's end back to its start;
    // trim B keeps the complementary arc against the reversed piece.
    let forward: Vec<Point3d> = piece.to_vec();
    let backward: Vec<Point3d> = piece.iter().rev().copied().collect();

    let cand_a = assemble(&forward, &contour.sub_path(tb, ta), tol);
    let cand_b = assemble(&backward, &contour.sub_path(ta, tb), tol);

    match (validate(cand_a, tol), validate(cand_b, tol)) {
        (Some(a), Some(b)) => {
            let pick_a = if prefer_longer {
                a.perimeter() >= b.perimeter()
            } else {
                // Sequential insertion: keep the trim that preserves more of
                // the original contour.
                a.len() >= b.len()
            };
            Ok(if pick_a { a } else { b })
        }
        (Some(a), None) => Ok(a),
        (None, Some(b)) => Ok(b),
        (None, None) => Err(splice_err("no trim produced a single closed polyline")),
    }
}

/// Join piece and arc, dropping coincident junction points.
fn assemble(piece: &[Point3d], arc: &[Point3d], tol: f64) -> Polyline {
    let mut points: Vec<Point3d> = Vec::with_capacity(piece.len() + arc.len());
    for p in piece.iter().chain(arc.iter()) {
        if points.last().map_or(true, |q| q.distance_to(p) > tol) {
            points.push(*p);
        }
    }
    // Closed polyline: drop a duplicated seam point.
    if points.len() > 1 && points[0].distance_to(&points[points.len() - 1]) <= tol {
        points.pop();
    }
    Polyline::new(points)
}

fn validate(p: Polyline, tol: f64) -> Option<Polyline> {
    if p.len() < 3 || p.area() <= tol {
        None
    } else {
        Some(p)
    }
}

fn splice_err(reason: &str) -> ModelError {
    ModelError::SpliceFailed {
        reason: reason.to_string(),
    }
}
