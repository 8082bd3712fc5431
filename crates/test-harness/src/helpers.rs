//! Scenario bench: a kernel plus a model, with the pipeline stages as
//! methods.

use assembly_solver::{
    attach_spaces, derive_vectors, no_overrides, seq_to_tree, AssemblyPlan, SolverError,
};
use contact_topology::TopologyError;
use joinery_ops::JoineryError;
use plate_kernel::{KernelError, PlateKernel, PrismKernel, PrismSolid, SolidHandle};
use plate_model::{ModelError, Plate, PlateModel};
use plate_types::{Plane, Point3d, Polyline, Tolerance};

#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error(transparent)]
    Kernel(#[from] KernelError),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Topology(#[from] TopologyError),
    #[error(transparent)]
    Solver(#[from] SolverError),
    #[error(transparent)]
    Joinery(#[from] JoineryError),
    #[error("serialization failed: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("check failed: {detail}")]
    Check { detail: String },
}

/// Round-trip the plates through JSON, the way a UI host persists them.
pub fn roundtrip_plates(model: &PlateModel) -> Result<Vec<Plate>, HarnessError> {
    let text = serde_json::to_string(&model.plates)?;
    Ok(serde_json::from_str(&text)?)
}

/// A kernel and the model built on it, kept together so scenarios can
/// run every stage without ceremony.
pub struct Bench {
    pub kernel: PrismKernel,
    pub model: PlateModel,
}

impl Bench {
    pub fn from_solids(solids: Vec<PrismSolid>) -> Result<Self, HarnessError> {
        let mut kernel = PrismKernel::new();
        let handles: Vec<SolidHandle> =
            solids.into_iter().map(|s| kernel.add_solid(s)).collect();
        let model = PlateModel::from_solids(&kernel, &handles, Tolerance::default())?;
        Ok(Bench { kernel, model })
    }

    pub fn from_boxes(boxes: &[(Point3d, Point3d)]) -> Result<Self, HarnessError> {
        let mut solids = Vec::with_capacity(boxes.len());
        for &(min, max) in boxes {
            solids.push(PrismSolid::axis_box(min, max)?);
        }
        Self::from_solids(solids)
    }

    /// Run the contact-topology resolver over all pairs.
    pub fn resolve(&mut self) -> Result<(), HarnessError> {
        contact_topology::resolve(&mut self.model, &self.kernel, &[])?;
        Ok(())
    }

    /// Fill every resolved contact with its canonical insertion space.
    pub fn attach_canonical_spaces(&mut self) {
        attach_spaces(&mut self.model, &no_overrides());
    }

    /// Parse an assembly sequence and derive per-module insertion
    /// vectors from the attached spaces.
    pub fn plan(&mut self, sequence: &str) -> Result<AssemblyPlan, HarnessError> {
        let tree = seq_to_tree(sequence, self.model.plate_count())
            .map_err(SolverError::from)?;
        Ok(derive_vectors(&self.model, &tree)?)
    }
}

/// Rectangular plate centered on `frame`, `width` along the frame
/// x-axis, `height` along y, extruded symmetrically along the normal.
pub fn rect_plate(
    frame: &Plane,
    width: f64,
    height: f64,
    thickness: f64,
) -> Result<PrismSolid, HarnessError> {
    let (hw, hh, ht) = (width * 0.5, height * 0.5, thickness * 0.5);
    let corner = |u: f64, v: f64, h: f64| frame.point_at(u, v) + frame.normal * h;
    let top = Polyline::new(vec![
        corner(-hw, -hh, ht),
        corner(hw, -hh, ht),
        corner(hw, hh, ht),
        corner(-hw, hh, ht),
    ]);
    let bottom = Polyline::new(vec![
        corner(-hw, -hh, -ht),
        corner(hw, -hh, -ht),
        corner(hw, hh, -ht),
        corner(-hw, hh, -ht),
    ]);
    Ok(PrismSolid::from_contours(&top, &bottom)?)
}
