use crate::prism::PrismSolid;
use crate::types::{KernelError, SolidHandle, SurfacePatch};

/// The geometry-kernel contract consumed by the rest of the pipeline.
///
/// Implemented by `PrismKernel`, the deterministic in-process kernel for
/// planar-faced solids. A CAD-backed implementation would satisfy the same
/// trait; callers never assume more than what is promised here, and catch
/// `KernelError` per operation.
pub trait PlateKernel {
    /// Register a solid and return its session handle.
    fn add_solid(&mut self, solid: PrismSolid) -> SolidHandle;

    /// Read access to a registered solid.
    fn solid(&self, h: SolidHandle) -> Result<&PrismSolid, KernelError>;

    /// Discard a scratch solid. Handles are never reused within a session.
    fn remove_solid(&mut self, h: SolidHandle) -> Result<(), KernelError>;

    /// Union `tool` into `target` in place. Fails when the operands do not
    /// touch, the strict behavior of a coplanar-merging union.
    fn boolean_union(&mut self, target: SolidHandle, tool: SolidHandle)
        -> Result<(), KernelError>;

    /// Secondary union without coplanar-face merging: joins the shells
    /// unconditionally. The fallback path when `boolean_union` fails.
    fn join_union(&mut self, target: SolidHandle, tool: SolidHandle) -> Result<(), KernelError>;

    /// Subtract `tool` from `target` in place, flipping inward-oriented
    /// operands first. Fails when the operands do not intersect.
    fn boolean_difference(
        &mut self,
        target: SolidHandle,
        tool: SolidHandle,
    ) -> Result<(), KernelError>;

    /// Intersection volume of two convex solids.
    fn convex_intersection(
        &self,
        a: SolidHandle,
        b: SolidHandle,
    ) -> Result<PrismSolid, KernelError>;

    /// Coplanar overlap regions between the faces of two solids, largest
    /// area first.
    fn surface_contacts(
        &self,
        a: SolidHandle,
        b: SolidHandle,
        tol: f64,
    ) -> Result<Vec<SurfacePatch>, KernelError>;

    /// True when the two solids share interior volume beyond `tol`.
    fn volumes_overlap(&self, a: SolidHandle, b: SolidHandle, tol: f64)
        -> Result<bool, KernelError>;
}
