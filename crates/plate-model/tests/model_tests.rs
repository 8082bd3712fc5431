use approx::assert_relative_eq;

use plate_kernel::{PlateKernel, PrismKernel, PrismSolid, SolidHandle};
use plate_model::{Plate, PlateModel};
use plate_types::{Point3d, Tolerance, Vec3};

fn slab(kernel: &mut PrismKernel, min: Point3d, max: Point3d) -> SolidHandle {
    kernel.add_solid(PrismSolid::axis_box(min, max).unwrap())
}

#[test]
fn plate_derivation_from_slab() {
    let mut kernel = PrismKernel::new();
    let h = slab(&mut kernel, Point3d::ORIGIN, Point3d::new(10.0, 5.0, 1.0));
    let plate = Plate::from_solid(&kernel, h, 3, &Tolerance::default()).unwrap();

    assert_eq!(plate.id, 3);
    assert_relative_eq!(plate.thickness, 1.0, epsilon = 1e-9);
    assert_eq!(plate.top_contour.len(), plate.bottom_contour.len());
    assert_relative_eq!(plate.top_plane.normal.z, 1.0, epsilon = 1e-9);
    assert_relative_eq!(plate.bottom_plane.normal.z, -1.0, epsilon = 1e-9);
    assert_relative_eq!(plate.mid_plane.origin.z, 0.5, epsilon = 1e-9);
    // x-axis follows the longest contour edge.
    assert_relative_eq!(plate.top_plane.x_axis.x.abs(), 1.0, epsilon = 1e-9);

    // Indexed pairing: corresponding vertices sit directly above each other.
    for (t, b) in plate
        .top_contour
        .points
        .iter()
        .zip(plate.bottom_contour.points.iter())
    {
        assert_relative_eq!(t.x, b.x, epsilon = 1e-9);
        assert_relative_eq!(t.y, b.y, epsilon = 1e-9);
    }
}

#[test]
fn cube_has_no_dominant_face_pair() {
    let mut kernel = PrismKernel::new();
    let h = slab(&mut kernel, Point3d::ORIGIN, Point3d::new(1.0, 1.0, 1.0));
    let err = Plate::from_solid(&kernel, h, 0, &Tolerance::default()).unwrap_err();
    assert!(matches!(
        err,
        plate_model::ModelError::NotPlanarPair { id: 0 }
    ));
}

#[test]
fn vertical_plate_derivation() {
    let mut kernel = PrismKernel::new();
    // Dominant faces have normals +-y.
    let h = slab(&mut kernel, Point3d::ORIGIN, Point3d::new(10.0, 1.0, 5.0));
    let plate = Plate::from_solid(&kernel, h, 0, &Tolerance::default()).unwrap();
    assert_relative_eq!(plate.thickness, 1.0, epsilon = 1e-9);
    assert_relative_eq!(plate.top_plane.normal.y.abs(), 1.0, epsilon = 1e-9);
}

#[test]
fn switch_top_bottom_swaps_tagged_pairs() {
    let mut kernel = PrismKernel::new();
    let h = slab(&mut kernel, Point3d::ORIGIN, Point3d::new(10.0, 5.0, 1.0));
    let model = &mut PlateModel::from_solids(&kernel, &[h], Tolerance::default()).unwrap();

    let before_top = model.plates[0].top_plane;
    model.switch_top_bottom(&[0]).unwrap();
    let after = &model.plates[0];
    assert_relative_eq!(after.bottom_plane.normal.z, before_top.normal.z, epsilon = 1e-12);
    assert_relative_eq!(after.top_plane.normal.z, -1.0, epsilon = 1e-9);

    assert!(matches!(
        model.switch_top_bottom(&[9]),
        Err(plate_model::ModelError::PlateNotFound { id: 9 })
    ));
}

#[test]
fn mid_contour_averages_paired_vertices() {
    let mut kernel = PrismKernel::new();
    let h = slab(&mut kernel, Point3d::ORIGIN, Point3d::new(10.0, 5.0, 2.0));
    let plate = Plate::from_solid(&kernel, h, 0, &Tolerance::default()).unwrap();
    let mid = plate.mid_contour();
    for p in &mid.points {
        assert_relative_eq!(p.z, 1.0, epsilon = 1e-9);
    }
}

#[test]
fn model_adjacency_bookkeeping() {
    let mut kernel = PrismKernel::new();
    let a = slab(&mut kernel, Point3d::ORIGIN, Point3d::new(10.0, 5.0, 1.0));
    let b = slab(
        &mut kernel,
        Point3d::new(0.0, 0.0, 1.0),
        Point3d::new(10.0, 5.0, 2.0),
    );
    let mut model = PlateModel::from_solids(&kernel, &[a, b], Tolerance::default()).unwrap();
    assert_eq!(model.plate_count(), 2);
    assert!(model.neighbor_index(0, 1).is_none());

    model.push_contact(
        0,
        plate_model::ContactEntry {
            neighbor: 1,
            ctype: plate_types::ContactType::FF,
            zone: model.plates[0].top_contour.clone(),
            center: Point3d::new(5.0, 2.5, 1.0),
            normal: Vec3::Z,
            plane: model.plates[0].top_plane,
        },
    );
    assert_eq!(model.neighbor_index(0, 1), Some(0));
    assert_eq!(model.contact_spaces[0].len(), 1);

    model.clear_contacts();
    assert!(model.neighbors[0].is_empty());
}
