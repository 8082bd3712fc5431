use plate_kernel::{PlateKernel, SolidHandle};
use plate_types::{ContactType, InsertionSpace, Plane, Point3d, Polyline, Tolerance, Vec3};

use crate::plate::Plate;
use crate::types::ModelError;

/// One plate's view of a resolved contact, stored in the model's parallel
/// adjacency arrays.
#[derive(Debug, Clone)]
pub struct ContactEntry {
    pub neighbor: usize,
    pub ctype: ContactType,
    pub zone: Polyline,
    pub center: Point3d,
    pub normal: Vec3,
    pub plane: Plane,
}

/// The whole assembly model: plates plus per-plate contact adjacency
/// arrays, FEM export curves and a warning log.
///
/// Contact arrays are parallel per plate: index `k` of `neighbors[i]`,
/// `contact_types[i]`, `contact_zones[i]`, ... describe the same contact.
pub struct PlateModel {
    pub plates: Vec<Plate>,

    pub neighbors: Vec<Vec<usize>>,
    pub contact_types: Vec<Vec<ContactType>>,
    pub contact_zones: Vec<Vec<Polyline>>,
    pub contact_centers: Vec<Vec<Point3d>>,
    pub contact_normals: Vec<Vec<Vec3>>,
    pub contact_planes: Vec<Vec<Plane>>,
    pub contact_spaces: Vec<Vec<Option<InsertionSpace>>>,

    /// FEM export: one simplified mid contour per plate, knots inserted at
    /// joint locations. Lazily initialized by the first FEM-updating
    /// generator.
    pub fem_plates: Vec<Polyline>,
    /// FEM export: connector segments linking knot points on two plates.
    pub fem_joints: Vec<(Point3d, Point3d)>,

    /// Recovered warnings (boolean fallbacks, skipped subtractions).
    pub log: Vec<String>,
    pub tol: Tolerance,
}

impl PlateModel {
    /// Build the model from input solids. Contact arrays start empty and
    /// are filled by the contact-topology resolver.
    pub fn from_solids(
        kernel: &dyn PlateKernel,
        handles: &[SolidHandle],
        tol: Tolerance,
    ) -> Result<PlateModel, ModelError> {
        let mut plates = Vec::with_capacity(handles.len());
        for (id, &h) in handles.iter().enumerate() {
            plates.push(Plate::from_solid(kernel, h, id, &tol)?);
        }
        let n = plates.len();
        Ok(PlateModel {
            plates,
            neighbors: vec![Vec::new(); n],
            contact_types: vec![Vec::new(); n],
            contact_zones: vec![Vec::new(); n],
            contact_centers: vec![Vec::new(); n],
            contact_normals: vec![Vec::new(); n],
            contact_planes: vec![Vec::new(); n],
            contact_spaces: vec![Vec::new(); n],
            fem_plates: Vec::new(),
            fem_joints: Vec::new(),
            log: Vec::new(),
            tol,
        })
    }

    pub fn plate_count(&self) -> usize {
        self.plates.len()
    }

    /// Index into plate i's adjacency arrays for neighbor j.
    pub fn neighbor_index(&self, i: usize, j: usize) -> Option<usize> {
        self.neighbors.get(i)?.iter().position(|&nb| nb == j)
    }

    pub fn clear_contacts(&mut self) {
        let n = self.plates.len();
        self.neighbors = vec![Vec::new(); n];
        self.contact_types = vec![Vec::new(); n];
        self.contact_zones = vec![Vec::new(); n];
        self.contact_centers = vec![Vec::new(); n];
        self.contact_normals = vec![Vec::new(); n];
        self.contact_planes = vec![Vec::new(); n];
        self.contact_spaces = vec![Vec::new(); n];
    }

    pub fn push_contact(&mut self, i: usize, entry: ContactEntry) {
        self.neighbors[i].push(entry.neighbor);
        self.contact_types[i].push(entry.ctype);
        self.contact_zones[i].push(entry.zone);
        self.contact_centers[i].push(entry.center);
        self.contact_normals[i].push(entry.normal);
        self.contact_planes[i].push(entry.plane);
        self.contact_spaces[i].push(None);
    }

    /// Swap the top/bottom-tagged attributes of the named plates.
    pub fn switch_top_bottom(&mut self, plate_ids: &[usize]) -> Result<(), ModelError> {
        for &id in plate_ids {
            let plate = self
                .plates
                .get_mut(id)
                .ok_or(ModelError::PlateNotFound { id })?;
            plate.switch_top_bottom();
        }
        Ok(())
    }

    /// Ensure the FEM mid-contour list is populated.
    pub fn ensure_fem_plates(&mut self) {
        if self.fem_plates.is_empty() {
            self.fem_plates = self
                .plates
                .iter()
                .map(|p| p.mid_contour().simplified(self.tol.coincidence))
                .collect();
        }
    }

    pub fn warn(&mut self, message: String) {
        tracing::warn!(target: "plate_model", "{message}");
        self.log.push(message);
    }
}
