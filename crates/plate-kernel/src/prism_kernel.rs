//! PrismKernel — deterministic geometry kernel for planar-faced solids.
//!
//! Booleans accumulate shells instead of re-meshing: union appends positive
//! shells, difference appends negative shells. Contact probes (coplanar
//! overlap, convex volumetric intersection) are computed analytically.

use slotmap::SlotMap;

use plate_types::Polyline;

use crate::prism::{clip_polygon_2d, convex_intersection, shell_volume, PrismSolid};
use crate::traits::PlateKernel;
use crate::types::{Face, KernelError, SolidHandle, SurfacePatch};

#[derive(Default)]
pub struct PrismKernel {
    solids: SlotMap<SolidHandle, PrismSolid>,
}

impl PrismKernel {
    pub fn new() -> Self {
        Self {
            solids: SlotMap::with_key(),
        }
    }

    fn get(&self, h: SolidHandle) -> Result<&PrismSolid, KernelError> {
        self.solids.get(h).ok_or(KernelError::SolidNotFound)
    }

    fn boxes_touch(&self, a: SolidHandle, b: SolidHandle, slack: f64) -> Result<bool, KernelError> {
        let (amin, amax) = self.get(a)?.bounding_box();
        let (bmin, bmax) = self.get(b)?.bounding_box();
        Ok(amin.x <= bmax.x + slack
            && bmin.x <= amax.x + slack
            && amin.y <= bmax.y + slack
            && bmin.y <= amax.y + slack
            && amin.z <= bmax.z + slack
            && bmin.z <= amax.z + slack)
    }
}

impl PlateKernel for PrismKernel {
    fn add_solid(&mut self, solid: PrismSolid) -> SolidHandle {
        self.solids.insert(solid)
    }

    fn solid(&self, h: SolidHandle) -> Result<&PrismSolid, KernelError> {
        self.get(h)
    }

    fn remove_solid(&mut self, h: SolidHandle) -> Result<(), KernelError> {
        self.solids.remove(h).map(|_| ()).ok_or(KernelError::SolidNotFound)
    }

    fn boolean_union(
        &mut self,
        target: SolidHandle,
        tool: SolidHandle,
    ) -> Result<(), KernelError> {
        if !self.boxes_touch(target, tool, 1e-6)? {
            return Err(KernelError::BooleanFailed {
                reason: "operands do not touch".into(),
            });
        }
        self.join_union(target, tool)
    }

    fn join_union(&mut self, target: SolidHandle, tool: SolidHandle) -> Result<(), KernelError> {
        let tool_solid = self.get(tool)?.clone();
        let t = self
            .solids
            .get_mut(target)
            .ok_or(KernelError::SolidNotFound)?;
        let shell = oriented_shell(tool_solid.faces);
        t.extra_shells.push(shell);
        for extra in tool_solid.extra_shells {
            t.extra_shells.push(extra);
        }
        Ok(())
    }

    fn boolean_difference(
        &mut self,
        target: SolidHandle,
        tool: SolidHandle,
    ) -> Result<(), KernelError> {
        if !self.boxes_touch(target, tool, 1e-6)? {
            return Err(KernelError::BooleanFailed {
                reason: "operands do not intersect".into(),
            });
        }
        let tool_solid = self.get(tool)?.clone();
        let t = self
            .solids
            .get_mut(target)
            .ok_or(KernelError::SolidNotFound)?;
        t.negative_shells.push(oriented_shell(tool_solid.faces));
        Ok(())
    }

    fn convex_intersection(
        &self,
        a: SolidHandle,
        b: SolidHandle,
    ) -> Result<PrismSolid, KernelError> {
        let mut planes = self.get(a)?.planes();
        planes.extend(self.get(b)?.planes());
        convex_intersection(&planes, 1e-9).ok_or(KernelError::EmptyIntersection)
    }

    fn surface_contacts(
        &self,
        a: SolidHandle,
        b: SolidHandle,
        tol: f64,
    ) -> Result<Vec<SurfacePatch>, KernelError> {
        let sa = self.get(a)?;
        let sb = self.get(b)?;
        let mut patches = Vec::new();

        for fa in &sa.faces {
            for fb in &sb.faces {
                // Touching exteriors have anti-parallel normals and
                // coincident carrier planes.
                if fa.plane.normal.dot(&fb.plane.normal) > -1.0 + 1e-6 {
                    continue;
                }
                if fa.plane.signed_distance(&fb.plane.origin).abs() > tol {
                    continue;
                }
                let subject: Vec<(f64, f64)> = fa
                    .polygon
                    .points
                    .iter()
                    .map(|p| fa.plane.parameters_of(p))
                    .collect();
                let clip: Vec<(f64, f64)> = fb
                    .polygon
                    .points
                    .iter()
                    .map(|p| fa.plane.parameters_of(p))
                    .collect();
                let overlap = clip_polygon_2d(&subject, &clip);
                if overlap.len() < 3 {
                    continue;
                }
                let polygon = Polyline::new(
                    overlap
                        .iter()
                        .map(|&(u, v)| fa.plane.point_at(u, v))
                        .collect(),
                );
                if polygon.area() > tol {
                    patches.push(SurfacePatch {
                        plane: fa.plane.translated_to(polygon.centroid()),
                        polygon,
                    });
                }
            }
        }

        patches.sort_by(|x, y| y.polygon.area().total_cmp(&x.polygon.area()));
        Ok(patches)
    }

    fn volumes_overlap(
        &self,
        a: SolidHandle,
        b: SolidHandle,
        tol: f64,
    ) -> Result<bool, KernelError> {
        let mut planes = self.get(a)?.planes();
        planes.extend(self.get(b)?.planes());
        Ok(convex_intersection(&planes, tol).is_some())
    }
}

/// Flip a shell outward if its signed volume is negative.
fn oriented_shell(faces: Vec<Face>) -> Vec<Face> {
    if shell_volume(&faces) < 0.0 {
        faces.iter().map(Face::flipped).collect()
    } else {
        faces
    }
}
