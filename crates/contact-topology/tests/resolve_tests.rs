use approx::assert_relative_eq;

use contact_topology::{resolve, TopologyError};
use plate_kernel::{PlateKernel, PrismKernel, PrismSolid, SolidHandle};
use plate_model::PlateModel;
use plate_types::{ContactType, Point3d, Tolerance};

fn slab(kernel: &mut PrismKernel, min: Point3d, max: Point3d) -> SolidHandle {
    kernel.add_solid(PrismSolid::axis_box(min, max).unwrap())
}

fn build_model(kernel: &PrismKernel, handles: &[SolidHandle]) -> PlateModel {
    PlateModel::from_solids(kernel, handles, Tolerance::default()).unwrap()
}

fn ctype(model: &PlateModel, i: usize, j: usize) -> ContactType {
    let idx = model.neighbor_index(i, j).unwrap();
    model.contact_types[i][idx]
}

#[test]
fn stacked_slabs_classify_face_face() {
    let mut kernel = PrismKernel::new();
    let a = slab(&mut kernel, Point3d::ORIGIN, Point3d::new(10.0, 5.0, 1.0));
    let b = slab(
        &mut kernel,
        Point3d::new(0.0, 0.0, 1.0),
        Point3d::new(10.0, 5.0, 2.0),
    );
    let mut model = build_model(&kernel, &[a, b]);
    resolve(&mut model, &kernel, &[]).unwrap();

    assert_eq!(ctype(&model, 0, 1), ContactType::FF);
    assert_eq!(ctype(&model, 1, 0), ContactType::FF);

    let idx = model.neighbor_index(0, 1).unwrap();
    let center = model.contact_centers[0][idx];
    assert_relative_eq!(center.x, 5.0, epsilon = 1e-9);
    assert_relative_eq!(center.y, 2.5, epsilon = 1e-9);
    assert_relative_eq!(center.z, 1.0, epsilon = 1e-9);
    // Normal points away from plate 0's interior, i.e. up.
    assert_relative_eq!(model.contact_normals[0][idx].z, 1.0, epsilon = 1e-9);
    let jdx = model.neighbor_index(1, 0).unwrap();
    assert_relative_eq!(model.contact_normals[1][jdx].z, -1.0, epsilon = 1e-9);
}

#[test]
fn face_face_is_order_independent() {
    let mut ka = PrismKernel::new();
    let a = slab(&mut ka, Point3d::ORIGIN, Point3d::new(10.0, 5.0, 1.0));
    let b = slab(
        &mut ka,
        Point3d::new(0.0, 0.0, 1.0),
        Point3d::new(10.0, 5.0, 2.0),
    );
    let mut fwd = build_model(&ka, &[a, b]);
    let mut rev = build_model(&ka, &[b, a]);
    resolve(&mut fwd, &ka, &[]).unwrap();
    resolve(&mut rev, &ka, &[]).unwrap();
    assert_eq!(ctype(&fwd, 0, 1), ContactType::FF);
    assert_eq!(ctype(&rev, 0, 1), ContactType::FF);
}

#[test]
fn upright_plate_on_face_classifies_face_side() {
    let mut kernel = PrismKernel::new();
    let a = slab(&mut kernel, Point3d::ORIGIN, Point3d::new(10.0, 10.0, 1.0));
    // Upright plate standing mid-face, dominant faces normal to x.
    let b = slab(
        &mut kernel,
        Point3d::new(4.0, 0.0, 1.0),
        Point3d::new(5.0, 10.0, 6.0),
    );
    let mut model = build_model(&kernel, &[a, b]);
    resolve(&mut model, &kernel, &[]).unwrap();

    assert_eq!(ctype(&model, 0, 1), ContactType::FS);
    assert_eq!(ctype(&model, 1, 0), ContactType::SF);

    // Zone is the upright plate's footprint strip.
    let idx = model.neighbor_index(0, 1).unwrap();
    assert_relative_eq!(model.contact_zones[0][idx].area(), 10.0, epsilon = 1e-6);
    // Local x-axis follows the strip's long direction.
    assert_relative_eq!(
        model.contact_planes[0][idx].x_axis.y.abs(),
        1.0,
        epsilon = 1e-9
    );
}

#[test]
fn flush_corner_classifies_edge_side() {
    let mut kernel = PrismKernel::new();
    let a = slab(&mut kernel, Point3d::ORIGIN, Point3d::new(10.0, 10.0, 1.0));
    // Upright plate flush with plate a's x = 0 boundary edge.
    let b = slab(
        &mut kernel,
        Point3d::new(0.0, 0.0, 1.0),
        Point3d::new(1.0, 10.0, 6.0),
    );
    let mut model = build_model(&kernel, &[a, b]);
    resolve(&mut model, &kernel, &[]).unwrap();

    assert_eq!(ctype(&model, 0, 1), ContactType::ES);
    assert_eq!(ctype(&model, 1, 0), ContactType::SE);

    // y-axis points off the female (upright) plate's mid-plane toward the
    // horizontal plate's material, here +x.
    let idx = model.neighbor_index(0, 1).unwrap();
    let plane = model.contact_planes[0][idx];
    assert_relative_eq!(plane.y_axis.x, 1.0, epsilon = 1e-9);
}

#[test]
fn coplanar_abutting_slabs_classify_side_side() {
    let mut kernel = PrismKernel::new();
    let a = slab(&mut kernel, Point3d::ORIGIN, Point3d::new(10.0, 5.0, 1.0));
    let b = slab(
        &mut kernel,
        Point3d::new(10.0, 0.0, 0.0),
        Point3d::new(20.0, 5.0, 1.0),
    );
    let mut model = build_model(&kernel, &[a, b]);
    resolve(&mut model, &kernel, &[]).unwrap();

    assert_eq!(ctype(&model, 0, 1), ContactType::SS);
    assert_eq!(ctype(&model, 1, 0), ContactType::SS);

    let idx = model.neighbor_index(0, 1).unwrap();
    // Normal away from plate 0 points along +x.
    assert_relative_eq!(model.contact_normals[0][idx].x, 1.0, epsilon = 1e-9);
    assert_relative_eq!(model.contact_centers[0][idx].x, 10.0, epsilon = 1e-9);
}

#[test]
fn crossing_slabs_classify_volumetric() {
    let mut kernel = PrismKernel::new();
    let a = slab(&mut kernel, Point3d::ORIGIN, Point3d::new(10.0, 10.0, 1.0));
    // Upright slab passing clean through the horizontal one.
    let b = slab(
        &mut kernel,
        Point3d::new(4.0, -1.0, -1.0),
        Point3d::new(6.0, 11.0, 2.0),
    );
    let mut model = build_model(&kernel, &[a, b]);
    resolve(&mut model, &kernel, &[]).unwrap();

    assert_eq!(ctype(&model, 0, 1), ContactType::IN);
    assert_eq!(ctype(&model, 1, 0), ContactType::IN);

    // Zone is the mid cross-section of the shared box, normal along the
    // cross of the plate normals (y).
    let idx = model.neighbor_index(0, 1).unwrap();
    let zone = &model.contact_zones[0][idx];
    assert_eq!(zone.len(), 4);
    assert_relative_eq!(zone.area(), 2.0, epsilon = 1e-6);
    assert_relative_eq!(model.contact_normals[0][idx].y.abs(), 1.0, epsilon = 1e-9);
    let center = model.contact_centers[0][idx];
    assert_relative_eq!(center.x, 5.0, epsilon = 1e-9);
    assert_relative_eq!(center.z, 0.5, epsilon = 1e-9);
}

#[test]
fn disjoint_plates_record_no_contact() {
    let mut kernel = PrismKernel::new();
    let a = slab(&mut kernel, Point3d::ORIGIN, Point3d::new(10.0, 5.0, 1.0));
    let b = slab(
        &mut kernel,
        Point3d::new(0.0, 0.0, 5.0),
        Point3d::new(10.0, 5.0, 6.0),
    );
    let mut model = build_model(&kernel, &[a, b]);
    resolve(&mut model, &kernel, &[]).unwrap();
    assert!(model.neighbors[0].is_empty());
    assert!(model.neighbors[1].is_empty());
}

#[test]
fn discarded_pairs_are_skipped() {
    let mut kernel = PrismKernel::new();
    let a = slab(&mut kernel, Point3d::ORIGIN, Point3d::new(10.0, 5.0, 1.0));
    let b = slab(
        &mut kernel,
        Point3d::new(0.0, 0.0, 1.0),
        Point3d::new(10.0, 5.0, 2.0),
    );
    let mut model = build_model(&kernel, &[a, b]);
    resolve(&mut model, &kernel, &[(1, 0)]).unwrap();
    assert!(model.neighbors[0].is_empty());
    assert!(model.neighbors[1].is_empty());
}

#[test]
fn resolution_is_idempotent() {
    let mut kernel = PrismKernel::new();
    let a = slab(&mut kernel, Point3d::ORIGIN, Point3d::new(10.0, 10.0, 1.0));
    let b = slab(
        &mut kernel,
        Point3d::new(0.0, 0.0, 1.0),
        Point3d::new(1.0, 10.0, 6.0),
    );
    let c = slab(
        &mut kernel,
        Point3d::new(4.0, -1.0, -1.0),
        Point3d::new(6.0, 11.0, 2.0),
    );
    let mut model = build_model(&kernel, &[a, b, c]);
    resolve(&mut model, &kernel, &[]).unwrap();
    let types: Vec<_> = model.contact_types.clone();
    let centers: Vec<_> = model.contact_centers.clone();
    let normals: Vec<_> = model.contact_normals.clone();

    resolve(&mut model, &kernel, &[]).unwrap();
    assert_eq!(model.contact_types, types);
    for (row_a, row_b) in model.contact_centers.iter().zip(&centers) {
        for (pa, pb) in row_a.iter().zip(row_b) {
            assert!(pa.distance_to(pb) < 1e-6);
        }
    }
    for (row_a, row_b) in model.contact_normals.iter().zip(&normals) {
        for (va, vb) in row_a.iter().zip(row_b) {
            assert!((*va - *vb).length() < 1e-6);
        }
    }
}

#[test]
fn contact_symmetry_holds_across_mixed_assembly() {
    let mut kernel = PrismKernel::new();
    let a = slab(&mut kernel, Point3d::ORIGIN, Point3d::new(10.0, 10.0, 1.0));
    let b = slab(
        &mut kernel,
        Point3d::new(0.0, 0.0, 1.0),
        Point3d::new(10.0, 10.0, 2.0),
    );
    let c = slab(
        &mut kernel,
        Point3d::new(4.0, 0.0, 2.0),
        Point3d::new(5.0, 10.0, 7.0),
    );
    let mut model = build_model(&kernel, &[a, b, c]);
    resolve(&mut model, &kernel, &[]).unwrap();

    for i in 0..model.plate_count() {
        for (k, &j) in model.neighbors[i].iter().enumerate() {
            let back = model.neighbor_index(j, i).unwrap();
            assert_eq!(model.contact_types[i][k].mirror(), model.contact_types[j][back]);
            let n_sum = model.contact_normals[i][k] + model.contact_normals[j][back];
            assert!(n_sum.length() < 1e-9);
        }
    }
}

#[test]
fn parallel_overlap_without_patch_is_reported() {
    let mut kernel = PrismKernel::new();
    // Same orientation, volumes interpenetrating: no anti-parallel face
    // pair and no axis to build a zone from.
    let a = slab(&mut kernel, Point3d::ORIGIN, Point3d::new(10.0, 5.0, 1.0));
    let b = slab(
        &mut kernel,
        Point3d::new(5.0, 0.0, 0.5),
        Point3d::new(15.0, 5.0, 1.5),
    );
    let mut model = build_model(&kernel, &[a, b]);
    let err = resolve(&mut model, &kernel, &[]).unwrap_err();
    assert!(matches!(err, TopologyError::DegenerateZone { i: 0, j: 1, .. }));
}
