use serde::{Deserialize, Serialize};

use super::plane::Plane;
use super::point::Point3d;
use super::transform::Transform;
use super::vector::Vec3;

/// A closed polyline. The segment from the last vertex back to the first is
/// implicit; vertices are never duplicated at the seam.
///
/// Parameters on the polyline are `i + t` where `i` is a segment index and
/// `t in [0,1)` the position along it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    pub points: Vec<Point3d>,
}

impl Polyline {
    pub fn new(points: Vec<Point3d>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn segment(&self, i: usize) -> (Point3d, Point3d) {
        let n = self.points.len();
        (self.points[i % n], self.points[(i + 1) % n])
    }

    pub fn segments(&self) -> impl Iterator<Item = (Point3d, Point3d)> + '_ {
        (0..self.points.len()).map(move |i| self.segment(i))
    }

    pub fn perimeter(&self) -> f64 {
        self.segments().map(|(a, b)| a.distance_to(&b)).sum()
    }

    /// Newell's method normal. None for degenerate polylines.
    pub fn newell_normal(&self) -> Option<Vec3> {
        if self.points.len() < 3 {
            return None;
        }
        let mut n = Vec3::ZERO;
        for (a, b) in self.segments() {
            n.x += (a.y - b.y) * (a.z + b.z);
            n.y += (a.z - b.z) * (a.x + b.x);
            n.z += (a.x - b.x) * (a.y + b.y);
        }
        n.normalized()
    }

    /// Enclosed area, valid for planar polylines.
    pub fn area(&self) -> f64 {
        if self.points.len() < 3 {
            return 0.0;
        }
        let mut n = Vec3::ZERO;
        let p0 = self.points[0];
        for (a, b) in self.segments() {
            n = n + (a - p0).cross(&(b - p0));
        }
        n.length() * 0.5
    }

    /// Area centroid for planar polylines; falls back to the vertex mean
    /// when the area is degenerate.
    pub fn centroid(&self) -> Point3d {
        let n = self.points.len();
        if n == 0 {
            return Point3d::ORIGIN;
        }
        let vertex_mean = Point3d::mean(&self.points).unwrap_or(Point3d::ORIGIN);
        if n < 3 {
            return vertex_mean;
        }
        let p0 = self.points[0];
        let mut area2 = Vec3::ZERO;
        for (a, b) in self.segments() {
            area2 = area2 + (a - p0).cross(&(b - p0));
        }
        if area2.length() < 1e-12 {
            return vertex_mean;
        }
        let ref_n = area2.normalized_or(Vec3::Z);
        let mut signed_sum = 0.0;
        let mut m = Vec3::ZERO;
        for (a, b) in self.segments() {
            let c = (a - p0).cross(&(b - p0));
            let s = c.dot(&ref_n) * 0.5;
            signed_sum += s;
            m = m + (a.to_vec() + b.to_vec() + p0.to_vec()) * (s / 3.0);
        }
        if signed_sum.abs() < 1e-12 {
            return vertex_mean;
        }
        Point3d::from_vec(m / signed_sum)
    }

    /// Best-fit plane: origin at the centroid, normal by Newell, x-axis
    /// along the longest edge.
    pub fn plane(&self) -> Option<Plane> {
        let normal = self.newell_normal()?;
        let (_, dir, _) = self.longest_edge()?;
        Some(Plane::with_x_axis(self.centroid(), normal, dir))
    }

    /// Index, unit direction and length of the longest edge.
    pub fn longest_edge(&self) -> Option<(usize, Vec3, f64)> {
        let mut best: Option<(usize, Vec3, f64)> = None;
        for i in 0..self.points.len() {
            let (a, b) = self.segment(i);
            let v = b - a;
            let len = v.length();
            if best.map_or(true, |(_, _, l)| len > l) {
                if let Some(dir) = v.normalized() {
                    best = Some((i, dir, len));
                }
            }
        }
        best
    }

    pub fn closest_vertex(&self, p: &Point3d) -> Option<(usize, f64)> {
        self.points
            .iter()
            .enumerate()
            .map(|(i, q)| (i, p.distance_to(q)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }

    /// Closest point on the polyline boundary and its parameter.
    pub fn closest_point(&self, p: &Point3d) -> Option<(Point3d, f64)> {
        let mut best: Option<(Point3d, f64, f64)> = None;
        for i in 0..self.points.len() {
            let (a, b) = self.segment(i);
            let v = b - a;
            let len2 = v.length_squared();
            let t = if len2 < 1e-18 {
                0.0
            } else {
                ((*p - a).dot(&v) / len2).clamp(0.0, 1.0)
            };
            let q = a + v * t;
            let d = p.distance_to(&q);
            if best.map_or(true, |(_, _, bd)| d < bd) {
                best = Some((q, i as f64 + t, d));
            }
        }
        best.map(|(q, t, _)| (q, t))
    }

    pub fn point_at(&self, param: f64) -> Point3d {
        let n = self.points.len() as f64;
        let param = param.rem_euclid(n);
        let i = param.floor() as usize;
        let t = param - i as f64;
        let (a, b) = self.segment(i);
        a + (b - a) * t
    }

    /// Vertices strictly between two parameters, walking forward (wrapping),
    /// bracketed by the evaluated end points.
    pub fn sub_path(&self, from: f64, to: f64) -> Vec<Point3d> {
        let n = self.points.len();
        let nf = n as f64;
        let from = from.rem_euclid(nf);
        let mut to = to.rem_euclid(nf);
        if to <= from + 1e-12 {
            to += nf;
        }
        let mut out = vec![self.point_at(from)];
        let mut idx = from.floor() as usize + 1;
        while (idx as f64) < to {
            out.push(self.points[idx % n]);
            idx += 1;
        }
        out.push(self.point_at(to));
        out
    }

    /// The same polyline re-started at vertex `k`.
    pub fn rotate_seam(&self, k: usize) -> Polyline {
        let n = self.points.len();
        if n == 0 {
            return self.clone();
        }
        let k = k % n;
        let mut points = Vec::with_capacity(n);
        points.extend_from_slice(&self.points[k..]);
        points.extend_from_slice(&self.points[..k]);
        Polyline::new(points)
    }

    pub fn reversed(&self) -> Polyline {
        let mut points = self.points.clone();
        points.reverse();
        Polyline::new(points)
    }

    /// Remove duplicate and collinear vertices within `tol`.
    pub fn simplified(&self, tol: f64) -> Polyline {
        let n = self.points.len();
        if n < 4 {
            return self.clone();
        }
        let mut kept = Vec::with_capacity(n);
        for i in 0..n {
            let prev = self.points[(i + n - 1) % n];
            let cur = self.points[i];
            let next = self.points[(i + 1) % n];
            if prev.distance_to(&cur) < tol {
                continue;
            }
            let a = (cur - prev).normalized();
            let b = (next - cur).normalized();
            match (a, b) {
                (Some(a), Some(b)) if a.cross(&b).length() < tol => continue,
                _ => kept.push(cur),
            }
        }
        if kept.len() < 3 {
            self.clone()
        } else {
            Polyline::new(kept)
        }
    }

    /// 2D point-in-polygon test in the polyline's own plane (ray cast).
    pub fn contains(&self, p: &Point3d) -> bool {
        let plane = match self.plane() {
            Some(pl) => pl,
            None => return false,
        };
        let (pu, pv) = plane.parameters_of(p);
        let mut inside = false;
        for (a, b) in self.segments() {
            let (au, av) = plane.parameters_of(&a);
            let (bu, bv) = plane.parameters_of(&b);
            if (av > pv) != (bv > pv) {
                let x = au + (pv - av) / (bv - av) * (bu - au);
                if x > pu {
                    inside = !inside;
                }
            }
        }
        inside
    }

    /// Extents of the projected vertices along the plane's x and y axes.
    pub fn extents_in(&self, plane: &Plane) -> (f64, f64) {
        let mut umin = f64::INFINITY;
        let mut umax = f64::NEG_INFINITY;
        let mut vmin = f64::INFINITY;
        let mut vmax = f64::NEG_INFINITY;
        for p in &self.points {
            let (u, v) = plane.parameters_of(p);
            umin = umin.min(u);
            umax = umax.max(u);
            vmin = vmin.min(v);
            vmax = vmax.max(v);
        }
        if self.points.is_empty() {
            (0.0, 0.0)
        } else {
            (umax - umin, vmax - vmin)
        }
    }

    pub fn translated(&self, v: Vec3) -> Polyline {
        Polyline::new(self.points.iter().map(|p| *p + v).collect())
    }

    pub fn transformed(&self, t: &Transform) -> Polyline {
        Polyline::new(self.points.iter().map(|p| t.apply_point(p)).collect())
    }
}
