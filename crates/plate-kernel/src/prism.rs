use serde::{Deserialize, Serialize};

use plate_types::{Plane, Point3d, Polyline, Vec3};

use crate::types::{Face, KernelError};

/// A planar-faced solid. The main shell is a closed set of polygonal faces
/// with outward normals; booleans accumulate extra positive shells and
/// negative (void) shells instead of re-meshing, which is exact enough for
/// downstream contour bookkeeping and is drained by the fabrication pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrismSolid {
    pub faces: Vec<Face>,
    pub extra_shells: Vec<Vec<Face>>,
    pub negative_shells: Vec<Vec<Face>>,
}

impl PrismSolid {
    pub fn new(faces: Vec<Face>) -> Self {
        Self {
            faces,
            extra_shells: Vec::new(),
            negative_shells: Vec::new(),
        }
    }

    /// Build a prism from two seam-matched closed contours. Side walls pair
    /// vertices by index; both contours must have the same vertex count.
    pub fn from_contours(top: &Polyline, bottom: &Polyline) -> Result<PrismSolid, KernelError> {
        if top.len() != bottom.len() {
            return Err(KernelError::ContourMismatch {
                top: top.len(),
                bottom: bottom.len(),
            });
        }
        if top.len() < 3 {
            return Err(KernelError::DegenerateFace {
                reason: format!("contour with {} vertices", top.len()),
            });
        }

        let top_centroid = top.centroid();
        let bottom_centroid = bottom.centroid();
        let up = (top_centroid - bottom_centroid)
            .normalized()
            .ok_or_else(|| KernelError::DegenerateFace {
                reason: "coincident top and bottom contours".into(),
            })?;

        let top_normal = top
            .newell_normal()
            .ok_or_else(|| KernelError::DegenerateFace {
                reason: "degenerate top contour".into(),
            })?;
        let top_normal = if top_normal.dot(&up) >= 0.0 {
            top_normal
        } else {
            -top_normal
        };
        let bottom_normal = -top_normal;

        let interior = top_centroid.midpoint(&bottom_centroid);
        let mut faces = Vec::with_capacity(top.len() + 2);
        faces.push(Face::new(
            top.clone(),
            Plane::new(top_centroid, top_normal),
        ));
        faces.push(Face::new(
            bottom.clone(),
            Plane::new(bottom_centroid, bottom_normal),
        ));

        for i in 0..top.len() {
            let j = (i + 1) % top.len();
            let quad = Polyline::new(vec![
                top.points[i],
                top.points[j],
                bottom.points[j],
                bottom.points[i],
            ]);
            let n = quad
                .newell_normal()
                .ok_or_else(|| KernelError::DegenerateFace {
                    reason: format!("degenerate side wall at vertex {i}"),
                })?;
            let c = quad.centroid();
            let n = if n.dot(&(c - interior)) >= 0.0 { n } else { -n };
            faces.push(Face::new(quad, Plane::new(c, n)));
        }

        Ok(PrismSolid::new(faces))
    }

    /// Axis-aligned box solid (a convenience used by tests and joinery).
    pub fn axis_box(min: Point3d, max: Point3d) -> Result<PrismSolid, KernelError> {
        let bottom = Polyline::new(vec![
            Point3d::new(min.x, min.y, min.z),
            Point3d::new(max.x, min.y, min.z),
            Point3d::new(max.x, max.y, min.z),
            Point3d::new(min.x, max.y, min.z),
        ]);
        let top = bottom.translated(Vec3::new(0.0, 0.0, max.z - min.z));
        PrismSolid::from_contours(&top, &bottom)
    }

    /// Distinct vertices of the main shell.
    pub fn vertices(&self) -> Vec<Point3d> {
        let mut out: Vec<Point3d> = Vec::new();
        for f in &self.faces {
            for p in &f.polygon.points {
                if !out.iter().any(|q| q.distance_to(p) < 1e-9) {
                    out.push(*p);
                }
            }
        }
        out
    }

    /// Outward face planes of the main shell.
    pub fn planes(&self) -> Vec<Plane> {
        self.faces.iter().map(|f| f.plane).collect()
    }

    /// Signed volume of the main shell by the divergence theorem.
    /// Positive when face normals point outward.
    pub fn volume(&self) -> f64 {
        shell_volume(&self.faces)
    }

    /// Mean of the main-shell vertices, a cheap interior reference point.
    pub fn center(&self) -> Point3d {
        Point3d::mean(&self.vertices()).unwrap_or(Point3d::ORIGIN)
    }

    pub fn bounding_box(&self) -> (Point3d, Point3d) {
        let mut min = Point3d::new(f64::INFINITY, f64::INFINITY, f64::INFINITY);
        let mut max = Point3d::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY);
        let mut extend = |p: &Point3d| {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            min.z = min.z.min(p.z);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
            max.z = max.z.max(p.z);
        };
        for f in &self.faces {
            for p in &f.polygon.points {
                extend(p);
            }
        }
        for shell in &self.extra_shells {
            for f in shell {
                for p in &f.polygon.points {
                    extend(p);
                }
            }
        }
        (min, max)
    }

    /// Flip the whole main shell outward if its signed volume is negative.
    pub fn oriented_outward(mut self) -> PrismSolid {
        if self.volume() < 0.0 {
            self.faces = self.faces.iter().map(Face::flipped).collect();
        }
        self
    }
}

/// Signed shell volume via `V = (1/3) * sum(centroid . n * area)`.
pub fn shell_volume(faces: &[Face]) -> f64 {
    let mut acc = 0.0;
    for f in faces {
        let c = f.polygon.centroid();
        acc += c.to_vec().dot(&f.plane.normal) * f.polygon.area();
    }
    acc / 3.0
}

/// Intersection of two convex polyhedra given by their outward face planes.
/// Vertex enumeration over plane triples; returns None when the volume is
/// below `tol`.
pub fn convex_intersection(planes: &[Plane], tol: f64) -> Option<PrismSolid> {
    // Both operands may contribute the same oriented plane (slabs sharing a
    // top or bottom surface); keep one representative or the face-building
    // loop emits the shared face twice.
    let mut planes_dedup: Vec<Plane> = Vec::with_capacity(planes.len());
    for pl in planes {
        let dup = planes_dedup.iter().any(|k| {
            k.normal.dot(&pl.normal) > 1.0 - 1e-9 && k.signed_distance(&pl.origin).abs() < 1e-7
        });
        if !dup {
            planes_dedup.push(*pl);
        }
    }
    let planes = planes_dedup;

    let n = planes.len();
    let mut verts: Vec<Point3d> = Vec::new();

    for i in 0..n {
        for j in (i + 1)..n {
            for k in (j + 1)..n {
                if let Some(p) = three_plane_point(&planes[i], &planes[j], &planes[k]) {
                    let inside = planes.iter().all(|pl| pl.signed_distance(&p) <= 1e-7);
                    if inside && !verts.iter().any(|q| q.distance_to(&p) < 1e-7) {
                        verts.push(p);
                    }
                }
            }
        }
    }

    if verts.len() < 4 {
        return None;
    }

    let mut faces = Vec::new();
    for pl in &planes {
        let on_plane: Vec<Point3d> = verts
            .iter()
            .copied()
            .filter(|p| pl.signed_distance(p).abs() < 1e-6)
            .collect();
        if on_plane.len() < 3 {
            continue;
        }
        let center = Point3d::mean(&on_plane).unwrap_or(Point3d::ORIGIN);
        let mut ordered = on_plane;
        ordered.sort_by(|a, b| {
            let (ua, va) = pl.parameters_of(a);
            let (ub, vb) = pl.parameters_of(b);
            let (cu, cv) = pl.parameters_of(&center);
            let aa = (va - cv).atan2(ua - cu);
            let ab = (vb - cv).atan2(ub - cu);
            aa.total_cmp(&ab)
        });
        let polygon = Polyline::new(ordered);
        // Order by angle may run against the outward normal; fix winding.
        let polygon = match polygon.newell_normal() {
            Some(nrm) if nrm.dot(&pl.normal) < 0.0 => polygon.reversed(),
            Some(_) => polygon,
            None => continue,
        };
        faces.push(Face::new(polygon, pl.translated_to(center)));
    }

    let solid = PrismSolid::new(faces);
    if solid.volume() > tol {
        Some(solid)
    } else {
        None
    }
}

fn three_plane_point(a: &Plane, b: &Plane, c: &Plane) -> Option<Point3d> {
    let n1 = a.normal;
    let n2 = b.normal;
    let n3 = c.normal;
    let det = n1.dot(&n2.cross(&n3));
    if det.abs() < 1e-10 {
        return None;
    }
    let d1 = n1.dot(&a.origin.to_vec());
    let d2 = n2.dot(&b.origin.to_vec());
    let d3 = n3.dot(&c.origin.to_vec());
    let p = (n2.cross(&n3) * d1 + n3.cross(&n1) * d2 + n1.cross(&n2) * d3) / det;
    Some(Point3d::from_vec(p))
}

/// Sutherland-Hodgman clip of a subject polygon against a convex clip
/// polygon, both in 2D (u, v) coordinates. The clip polygon must be convex;
/// winding is normalized internally.
pub fn clip_polygon_2d(subject: &[(f64, f64)], clip: &[(f64, f64)]) -> Vec<(f64, f64)> {
    if subject.len() < 3 || clip.len() < 3 {
        return Vec::new();
    }
    let clip = if signed_area_2d(clip) < 0.0 {
        clip.iter().rev().copied().collect::<Vec<_>>()
    } else {
        clip.to_vec()
    };

    let mut output = subject.to_vec();
    for i in 0..clip.len() {
        let a = clip[i];
        let b = clip[(i + 1) % clip.len()];
        let input = std::mem::take(&mut output);
        if input.is_empty() {
            return Vec::new();
        }
        for j in 0..input.len() {
            let p = input[j];
            let q = input[(j + 1) % input.len()];
            let p_in = edge_side(a, b, p) >= -1e-12;
            let q_in = edge_side(a, b, q) >= -1e-12;
            if p_in {
                output.push(p);
                if !q_in {
                    if let Some(x) = edge_intersect(a, b, p, q) {
                        output.push(x);
                    }
                }
            } else if q_in {
                if let Some(x) = edge_intersect(a, b, p, q) {
                    output.push(x);
                }
            }
        }
    }
    dedup_2d(output)
}

fn signed_area_2d(poly: &[(f64, f64)]) -> f64 {
    let mut acc = 0.0;
    for i in 0..poly.len() {
        let (x1, y1) = poly[i];
        let (x2, y2) = poly[(i + 1) % poly.len()];
        acc += x1 * y2 - x2 * y1;
    }
    acc * 0.5
}

fn edge_side(a: (f64, f64), b: (f64, f64), p: (f64, f64)) -> f64 {
    (b.0 - a.0) * (p.1 - a.1) - (b.1 - a.1) * (p.0 - a.0)
}

fn edge_intersect(
    a: (f64, f64),
    b: (f64, f64),
    p: (f64, f64),
    q: (f64, f64),
) -> Option<(f64, f64)> {
    let r = (b.0 - a.0, b.1 - a.1);
    let s = (q.0 - p.0, q.1 - p.1);
    let denom = r.0 * s.1 - r.1 * s.0;
    if denom.abs() < 1e-15 {
        return None;
    }
    let t = ((p.0 - a.0) * s.1 - (p.1 - a.1) * s.0) / denom;
    Some((a.0 + t * r.0, a.1 + t * r.1))
}

fn dedup_2d(poly: Vec<(f64, f64)>) -> Vec<(f64, f64)> {
    let mut out: Vec<(f64, f64)> = Vec::with_capacity(poly.len());
    for p in poly {
        let dup = out
            .last()
            .map_or(false, |q| (q.0 - p.0).abs() < 1e-9 && (q.1 - p.1).abs() < 1e-9);
        if !dup {
            out.push(p);
        }
    }
    if out.len() > 1 {
        let first = out[0];
        let last = out[out.len() - 1];
        if (first.0 - last.0).abs() < 1e-9 && (first.1 - last.1).abs() < 1e-9 {
            out.pop();
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn box_volume_and_faces() {
        let b = PrismSolid::axis_box(Point3d::ORIGIN, Point3d::new(2.0, 3.0, 4.0)).unwrap();
        assert_eq!(b.faces.len(), 6);
        assert_relative_eq!(b.volume(), 24.0, epsilon = 1e-9);
    }

    #[test]
    fn convex_intersection_of_overlapping_boxes() {
        let a = PrismSolid::axis_box(Point3d::ORIGIN, Point3d::new(4.0, 4.0, 4.0)).unwrap();
        let b =
            PrismSolid::axis_box(Point3d::new(2.0, 2.0, 2.0), Point3d::new(6.0, 6.0, 6.0)).unwrap();
        let mut planes = a.planes();
        planes.extend(b.planes());
        let inter = convex_intersection(&planes, 1e-9).unwrap();
        assert_relative_eq!(inter.volume(), 8.0, epsilon = 1e-6);
    }

    #[test]
    fn crossing_slabs_with_shared_planes_keep_six_faces() {
        // Both slabs contribute z=0 and z=5; the lap must not double them.
        let a = PrismSolid::axis_box(Point3d::new(0.0, 4.0, 0.0), Point3d::new(10.0, 6.0, 5.0))
            .unwrap();
        let b = PrismSolid::axis_box(Point3d::new(4.0, 0.0, 0.0), Point3d::new(6.0, 10.0, 5.0))
            .unwrap();
        let mut planes = a.planes();
        planes.extend(b.planes());
        let inter = convex_intersection(&planes, 1e-9).unwrap();
        assert_eq!(inter.faces.len(), 6);
        assert_relative_eq!(inter.volume(), 20.0, epsilon = 1e-6);
    }

    #[test]
    fn convex_intersection_of_disjoint_boxes_is_none() {
        let a = PrismSolid::axis_box(Point3d::ORIGIN, Point3d::new(1.0, 1.0, 1.0)).unwrap();
        let b =
            PrismSolid::axis_box(Point3d::new(5.0, 5.0, 5.0), Point3d::new(6.0, 6.0, 6.0)).unwrap();
        let mut planes = a.planes();
        planes.extend(b.planes());
        assert!(convex_intersection(&planes, 1e-9).is_none());
    }

    #[test]
    fn clip_overlapping_squares() {
        let subject = [(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)];
        let clip = [(1.0, 1.0), (3.0, 1.0), (3.0, 3.0), (1.0, 3.0)];
        let out = clip_polygon_2d(&subject, &clip);
        assert_relative_eq!(signed_area_2d(&out).abs(), 1.0, epsilon = 1e-9);
    }
}
