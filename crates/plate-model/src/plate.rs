use serde::{Deserialize, Serialize};

use plate_kernel::{PlateKernel, SolidHandle};
use plate_types::{Plane, Polyline, Tolerance};

use crate::seam::match_seams;
use crate::types::ModelError;

/// One timber plate: an input solid plus everything derived from it.
///
/// Invariant: `top_contour` and `bottom_contour` always have equal vertex
/// counts with corresponding indices geometrically aligned. Every joint
/// generator relies on this to build side walls by indexed pairing, and
/// every contour mutation must re-establish it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plate {
    pub id: usize,
    pub solid: SolidHandle,

    pub top_contour: Polyline,
    pub bottom_contour: Polyline,
    pub top_holes: Vec<Polyline>,
    pub bottom_holes: Vec<Polyline>,

    pub top_plane: Plane,
    pub bottom_plane: Plane,
    pub mid_plane: Plane,
    pub thickness: f64,

    /// Solids to be unioned into the plate by the boolean finisher.
    pub joints_positives: Vec<SolidHandle>,
    /// Solids to be subtracted from the plate by the boolean finisher.
    pub joints_negatives: Vec<SolidHandle>,
    /// Loose key pieces (dowels, splines) retained alongside the plate.
    pub joints_keys: Vec<SolidHandle>,

    /// Milling derivatives, populated only by the fabrication pass.
    pub top_milling_contour: Option<Polyline>,
    pub bottom_milling_contour: Option<Polyline>,
    /// One (top path, bottom path) pair per hole pair.
    pub milling_holes: Vec<(Polyline, Polyline)>,
}

impl Plate {
    /// Derive a plate from a closed planar-faced solid.
    ///
    /// Fails unless the solid exposes exactly two dominant-area parallel
    /// planar faces and contour simplification yields matching top/bottom
    /// vertex counts.
    pub fn from_solid(
        kernel: &dyn PlateKernel,
        handle: SolidHandle,
        id: usize,
        tol: &Tolerance,
    ) -> Result<Plate, ModelError> {
        let solid = kernel.solid(handle)?;
        let mut faces: Vec<_> = solid.faces.iter().collect();
        if faces.len() < 2 {
            return Err(ModelError::NotPlanarPair { id });
        }
        faces.sort_by(|a, b| b.area().total_cmp(&a.area()));

        let f0 = faces[0];
        let f1 = faces[1];
        if !f0
            .plane
            .normal
            .is_parallel_to(&f1.plane.normal, 1e-6)
        {
            return Err(ModelError::NotPlanarPair { id });
        }
        if let Some(f2) = faces.get(2) {
            if f1.area() <= f2.area() + tol.coincidence {
                return Err(ModelError::NotPlanarPair { id });
            }
        }

        // Top is the face whose outward normal points higher.
        let (top_face, bottom_face) = if f0.plane.normal.z >= f1.plane.normal.z {
            (f0, f1)
        } else {
            (f1, f0)
        };

        let top_contour = top_face.polygon.simplified(tol.coincidence);
        let bottom_raw = bottom_face.polygon.simplified(tol.coincidence);
        if top_contour.len() != bottom_raw.len() {
            return Err(ModelError::ContourMismatch {
                id,
                top: top_contour.len(),
                bottom: bottom_raw.len(),
            });
        }
        let bottom_contour = match_seams(&top_contour, &bottom_raw, top_face.plane.normal)?;

        let top_centroid = top_contour.centroid();
        let bottom_centroid = bottom_contour.centroid();
        let (_, top_x, _) = top_contour
            .longest_edge()
            .ok_or(ModelError::DegenerateContour { id })?;
        let (_, bottom_x, _) = bottom_contour
            .longest_edge()
            .ok_or(ModelError::DegenerateContour { id })?;

        let top_plane = Plane::with_x_axis(top_centroid, top_face.plane.normal, top_x);
        let bottom_plane = Plane::with_x_axis(bottom_centroid, bottom_face.plane.normal, bottom_x);
        let mid_plane = Plane::with_x_axis(
            top_centroid.midpoint(&bottom_centroid),
            top_face.plane.normal,
            top_x,
        );
        let thickness = bottom_plane.signed_distance(&top_centroid).abs();

        Ok(Plate {
            id,
            solid: handle,
            top_contour,
            bottom_contour,
            top_holes: Vec::new(),
            bottom_holes: Vec::new(),
            top_plane,
            bottom_plane,
            mid_plane,
            thickness,
            joints_positives: Vec::new(),
            joints_negatives: Vec::new(),
            joints_keys: Vec::new(),
            top_milling_contour: None,
            bottom_milling_contour: None,
            milling_holes: Vec::new(),
        })
    }

    /// Swap every top/bottom-tagged attribute pair in place. Used to
    /// normalize orientation before certain joint types.
    pub fn switch_top_bottom(&mut self) {
        std::mem::swap(&mut self.top_contour, &mut self.bottom_contour);
        std::mem::swap(&mut self.top_holes, &mut self.bottom_holes);
        std::mem::swap(&mut self.top_plane, &mut self.bottom_plane);
        std::mem::swap(&mut self.top_milling_contour, &mut self.bottom_milling_contour);
        for (t, b) in &mut self.milling_holes {
            std::mem::swap(t, b);
        }
    }

    /// Mid contour: indexed average of the two seam-matched contours.
    pub fn mid_contour(&self) -> Polyline {
        let points = self
            .top_contour
            .points
            .iter()
            .zip(self.bottom_contour.points.iter())
            .map(|(t, b)| t.midpoint(b))
            .collect();
        Polyline::new(points)
    }

    /// Interior reference point of the plate's volume.
    pub fn volumetric_center(&self) -> plate_types::Point3d {
        self.top_contour.centroid().midpoint(&self.bottom_contour.centroid())
    }
}
