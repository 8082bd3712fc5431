use contact_topology::resolve;
use joinery_ops::{
    add_custom, add_dowels, add_fingers, add_halflaps, add_sunrise, add_tenons,
    get_fabrication_lines, perform_boolean_operations, CustomParams, DowelParams,
    FabricationParams, FingerParams, HalflapParams, JoineryError, NotchStyle, SunriseParams,
    TenonParams,
};
use joinery_ops::halflap::ChamferParams;
use plate_kernel::{PlateKernel, PrismKernel, PrismSolid, SolidHandle};
use plate_model::PlateModel;
use plate_types::{Point3d, Polyline, Tolerance};

fn slab(kernel: &mut PrismKernel, min: Point3d, max: Point3d) -> SolidHandle {
    kernel.add_solid(PrismSolid::axis_box(min, max).unwrap())
}

fn resolved_model(kernel: &PrismKernel, handles: &[SolidHandle]) -> PlateModel {
    let mut model = PlateModel::from_solids(kernel, handles, Tolerance::default()).unwrap();
    resolve(&mut model, kernel, &[]).unwrap();
    model
}

/// Horizontal slab with an upright wall standing mid-face: one FS/SF pair.
fn wall_on_slab(kernel: &mut PrismKernel) -> PlateModel {
    let a = slab(kernel, Point3d::ORIGIN, Point3d::new(10.0, 10.0, 1.0));
    let b = slab(
        kernel,
        Point3d::new(4.0, 0.0, 1.0),
        Point3d::new(6.0, 10.0, 9.0),
    );
    resolved_model(kernel, &[a, b])
}

/// Two coplanar slabs butted side to side: one SS pair.
fn butted_slabs(kernel: &mut PrismKernel) -> PlateModel {
    let a = slab(kernel, Point3d::ORIGIN, Point3d::new(10.0, 10.0, 1.0));
    let b = slab(
        kernel,
        Point3d::new(10.0, 0.0, 0.0),
        Point3d::new(20.0, 10.0, 1.0),
    );
    resolved_model(kernel, &[a, b])
}

/// Stacked slabs: one FF pair.
fn stacked_slabs(kernel: &mut PrismKernel) -> PlateModel {
    let a = slab(kernel, Point3d::ORIGIN, Point3d::new(10.0, 5.0, 1.0));
    let b = slab(
        kernel,
        Point3d::new(0.0, 0.0, 1.0),
        Point3d::new(10.0, 5.0, 2.0),
    );
    resolved_model(kernel, &[a, b])
}

/// Two upright slabs crossing through each other: one IN pair.
fn crossing_walls(kernel: &mut PrismKernel) -> PlateModel {
    let a = slab(
        kernel,
        Point3d::new(0.0, 4.0, 0.0),
        Point3d::new(10.0, 6.0, 10.0),
    );
    let b = slab(
        kernel,
        Point3d::new(4.0, 0.0, 0.0),
        Point3d::new(6.0, 10.0, 10.0),
    );
    resolved_model(kernel, &[a, b])
}

fn tenon_params() -> TenonParams {
    TenonParams {
        count: 2,
        width: 2.0,
        spacing: 2.0,
        shift: 0.0,
        retreat: 0.0,
        fit: 0.1,
    }
}

#[test]
fn tenons_build_male_positives_and_receiver_mortises() {
    let mut kernel = PrismKernel::new();
    let mut model = wall_on_slab(&mut kernel);
    let made = add_tenons(&mut model, &mut kernel, None, &tenon_params()).unwrap();
    assert_eq!(made, 2);

    // The wall carries the tenons, the slab the mortises.
    assert_eq!(model.plates[1].joints_positives.len(), 2);
    assert_eq!(model.plates[1].joints_negatives.len(), 0);
    assert_eq!(model.plates[0].joints_negatives.len(), 2);
    assert_eq!(model.plates[0].joints_positives.len(), 0);

    // Each tenon splices four vertices into both wall contours.
    assert_eq!(model.plates[1].top_contour.len(), 12);
    assert_eq!(model.plates[1].bottom_contour.len(), 12);
    // The slab outline is untouched; the mortises arrive as hole pairs.
    assert_eq!(model.plates[0].top_contour.len(), 4);
    assert_eq!(model.plates[0].top_holes.len(), 2);
    assert_eq!(model.plates[0].bottom_holes.len(), 2);

    // One mid-surface knot per tenon.
    assert_eq!(model.fem_joints.len(), 2);
    assert!(!model.fem_plates.is_empty());
}

#[test]
fn tenon_retreat_beyond_receiver_thickness_is_rejected() {
    let mut kernel = PrismKernel::new();
    let mut model = wall_on_slab(&mut kernel);
    let params = TenonParams {
        retreat: 5.0,
        ..tenon_params()
    };
    let err = add_tenons(&mut model, &mut kernel, None, &params).unwrap_err();
    assert!(matches!(err, JoineryError::BadParameter { name: "retreat", .. }));

    // Nothing was committed.
    assert_eq!(model.plates[1].top_contour.len(), 4);
    assert!(model.plates[1].joints_positives.is_empty());
    assert!(model.plates[0].joints_negatives.is_empty());
    assert!(model.plates[0].top_holes.is_empty());
}

#[test]
fn oversized_fingers_leave_the_model_untouched() {
    let mut kernel = PrismKernel::new();
    let mut model = butted_slabs(&mut kernel);
    let params = FingerParams {
        number_1: 2,
        number_2: 2,
        width: 3.0,
        depth: 2.0,
        spacing: 1.0,
        shift: 0.0,
        fit: 0.0,
    };
    let err = add_fingers(&mut model, &mut kernel, None, &params).unwrap_err();
    match err {
        JoineryError::JointTooLarge { i, j, overage_pct } => {
            assert_eq!((i, j), (0, 1));
            assert!(overage_pct > 0.0);
        }
        other => panic!("unexpected error: {other}"),
    }
    for plate in &model.plates {
        assert_eq!(plate.top_contour.len(), 4);
        assert!(plate.joints_positives.is_empty());
        assert!(plate.joints_negatives.is_empty());
    }
}

#[test]
fn fingers_alternate_between_both_plates() {
    let mut kernel = PrismKernel::new();
    let mut model = butted_slabs(&mut kernel);
    let params = FingerParams {
        number_1: 2,
        number_2: 2,
        width: 1.0,
        depth: 2.0,
        spacing: 1.0,
        shift: 0.0,
        fit: 0.05,
    };
    let made = add_fingers(&mut model, &mut kernel, None, &params).unwrap();
    assert_eq!(made, 4);

    // Two fingers protrude from each plate, each cutting a notch in the
    // other.
    for plate in &model.plates {
        assert_eq!(plate.joints_positives.len(), 2);
        assert_eq!(plate.joints_negatives.len(), 2);
        // Two bump splices and two notch splices of four points each.
        assert_eq!(plate.top_contour.len(), 20);
        assert_eq!(plate.bottom_contour.len(), 20);
    }
    // Connector export is reserved for tenon, sunrise and half-lap joints.
    assert!(model.fem_joints.is_empty());
}

#[test]
fn dowels_become_keys_with_drills_on_both_plates() {
    let mut kernel = PrismKernel::new();
    let mut model = stacked_slabs(&mut kernel);
    let params = DowelParams {
        count: 2,
        radius: 0.5,
        spacing: 2.0,
        shift: 0.0,
        cross_angle: 0.0,
        retreat: 0.2,
        fit: 0.05,
    };
    let made = add_dowels(&mut model, &mut kernel, None, &params).unwrap();
    assert_eq!(made, 2);

    // Loose keys live on the lower-index plate.
    assert_eq!(model.plates[0].joints_keys.len(), 2);
    assert!(model.plates[1].joints_keys.is_empty());
    for plate in &model.plates {
        assert_eq!(plate.joints_negatives.len(), 2);
        assert_eq!(plate.top_holes.len(), 2);
        assert_eq!(plate.bottom_holes.len(), 2);
        // Drilling never touches the outline.
        assert_eq!(plate.top_contour.len(), 4);
    }
    // Dowels carry no mid-surface knots.
    assert!(model.fem_joints.is_empty());
}

#[test]
fn steep_dowel_cross_angle_is_rejected() {
    let mut kernel = PrismKernel::new();
    let mut model = stacked_slabs(&mut kernel);
    let params = DowelParams {
        count: 1,
        radius: 0.5,
        spacing: 0.0,
        shift: 0.0,
        cross_angle: 1.0,
        retreat: 0.0,
        fit: 0.0,
    };
    let err = add_dowels(&mut model, &mut kernel, None, &params).unwrap_err();
    assert!(matches!(err, JoineryError::BadParameter { name: "cross_angle", .. }));
}

#[test]
fn sunrise_tails_flare_into_the_edge_plate() {
    let mut kernel = PrismKernel::new();
    // Upright plate standing flush with the slab's x = 0 boundary.
    let a = slab(&mut kernel, Point3d::ORIGIN, Point3d::new(10.0, 10.0, 1.0));
    let b = slab(
        &mut kernel,
        Point3d::new(0.0, 0.0, 1.0),
        Point3d::new(1.0, 10.0, 6.0),
    );
    let mut model = resolved_model(&kernel, &[a, b]);
    let params = SunriseParams {
        count: 2,
        width: 1.0,
        spacing: 3.0,
        shift: 0.0,
        flare: 0.2,
        retreat: 0.0,
        fit: 0.0,
    };
    let made = add_sunrise(&mut model, &mut kernel, None, &params).unwrap();
    assert_eq!(made, 2);

    // Tails protrude from the upright, sockets open in the slab.
    assert_eq!(model.plates[1].joints_positives.len(), 2);
    assert_eq!(model.plates[0].joints_negatives.len(), 2);
    assert_eq!(model.plates[1].top_contour.len(), 12);
    assert_eq!(model.plates[1].bottom_contour.len(), 12);
    assert_eq!(model.plates[0].top_holes.len(), 2);
    assert_eq!(model.plates[0].bottom_holes.len(), 2);
    assert_eq!(model.fem_joints.len(), 2);

    // Every tail solid widens with depth.
    for &h in &model.plates[1].joints_positives {
        let (min, max) = kernel.solid(h).unwrap().bounding_box();
        assert!(max.y - min.y > params.width);
    }
}

#[test]
fn custom_profile_stamps_plugs_and_holes() {
    let mut kernel = PrismKernel::new();
    let mut model = stacked_slabs(&mut kernel);
    let profile = Polyline::new(vec![
        Point3d::new(-1.0, -0.5, 0.0),
        Point3d::new(1.0, -0.5, 0.0),
        Point3d::new(0.0, 0.5, 0.0),
    ]);
    let params = CustomParams {
        count: 2,
        spacing: 2.0,
        shift: 0.0,
        retreat: 0.5,
    };
    let made = add_custom(&mut model, &mut kernel, None, &profile, &params).unwrap();
    assert_eq!(made, 2);

    assert_eq!(model.plates[0].joints_positives.len(), 2);
    assert_eq!(model.plates[1].joints_negatives.len(), 2);
    assert_eq!(model.plates[1].top_holes.len(), 2);
    assert_eq!(model.plates[1].bottom_holes.len(), 2);
    assert!(model.fem_joints.is_empty());
}

#[test]
fn degenerate_custom_profile_is_rejected() {
    let mut kernel = PrismKernel::new();
    let mut model = stacked_slabs(&mut kernel);
    let profile = Polyline::new(vec![
        Point3d::ORIGIN,
        Point3d::new(1.0, 0.0, 0.0),
    ]);
    let params = CustomParams {
        count: 1,
        spacing: 0.0,
        shift: 0.0,
        retreat: 0.0,
    };
    let err = add_custom(&mut model, &mut kernel, None, &profile, &params).unwrap_err();
    assert!(matches!(err, JoineryError::BadParameter { name: "profile", .. }));
}

#[test]
fn halflap_splits_the_shared_volume_complementarily() {
    let mut kernel = PrismKernel::new();
    let mut model = crossing_walls(&mut kernel);
    let params = HalflapParams {
        proportion: 0.5,
        chamfer: None,
    };
    let made = add_halflaps(&mut model, &mut kernel, None, &params).unwrap();
    assert_eq!(made, 1);

    assert_eq!(model.plates[0].joints_negatives.len(), 1);
    assert_eq!(model.plates[1].joints_negatives.len(), 1);
    assert_eq!(model.fem_joints.len(), 1);

    // One plate loses the upper half of the shared box, the other the
    // lower half, and together they cover it.
    let upper = kernel.solid(model.plates[0].joints_negatives[0]).unwrap();
    let lower = kernel.solid(model.plates[1].joints_negatives[0]).unwrap();
    // Each half of the 2x2x10 shared volume.
    assert!((upper.volume() - 20.0).abs() < 1e-6);
    assert!((lower.volume() - 20.0).abs() < 1e-6);
    let (amin, amax) = upper.bounding_box();
    let (bmin, bmax) = lower.bounding_box();
    let mut cuts = [(amin.z, amax.z), (bmin.z, bmax.z)];
    cuts.sort_by(|x, y| x.0.total_cmp(&y.0));
    assert!((cuts[0].0 - 0.0).abs() < 1e-6);
    assert!((cuts[0].1 - 5.0).abs() < 1e-6);
    assert!((cuts[1].0 - 5.0).abs() < 1e-6);
    assert!((cuts[1].1 - 10.0).abs() < 1e-6);
}

#[test]
fn halflap_chamfer_deeper_than_the_lap_is_rejected() {
    let mut kernel = PrismKernel::new();
    let mut model = crossing_walls(&mut kernel);
    let params = HalflapParams {
        proportion: 0.5,
        chamfer: Some(ChamferParams {
            amount: 1.0,
            angle: 0.15,
        }),
    };
    let err = add_halflaps(&mut model, &mut kernel, None, &params).unwrap_err();
    assert!(matches!(err, JoineryError::ChamferTooDeep { i: 0, j: 1 }));
    assert!(model.plates[0].joints_negatives.is_empty());
    assert!(model.plates[1].joints_negatives.is_empty());
}

#[test]
fn fabrication_offsets_outlines_and_relieves_mortise_corners() {
    let mut kernel = PrismKernel::new();
    let mut model = wall_on_slab(&mut kernel);
    add_tenons(&mut model, &mut kernel, None, &tenon_params()).unwrap();

    let params = FabricationParams {
        tool_radius: 0.1,
        notch: true,
        style: NotchStyle::Dogbone,
        limit_angle: 10.0_f64.to_radians(),
    };
    get_fabrication_lines(&mut model, &params).unwrap();

    // Slab outline is all convex: offset only.
    let slab_mill = model.plates[0].top_milling_contour.as_ref().unwrap();
    assert_eq!(slab_mill.len(), 4);
    // Each rectangular mortise gains a dogbone at all four corners, on
    // both faces of the plate.
    assert_eq!(model.plates[0].milling_holes.len(), 2);
    for (top, bottom) in &model.plates[0].milling_holes {
        assert_eq!(top.len(), 12);
        assert_eq!(bottom.len(), 12);
        let dz = model.plates[0].thickness;
        assert!(((top.points[0].z - bottom.points[0].z).abs() - dz).abs() < 1e-6);
    }
    // The wall outline has two concave corners per tenon root.
    let wall_mill = model.plates[1].top_milling_contour.as_ref().unwrap();
    assert_eq!(wall_mill.len(), 20);
    assert_eq!(
        model.plates[1].bottom_milling_contour.as_ref().unwrap().len(),
        20
    );
}

#[test]
fn boolean_pass_drains_joint_lists_and_keeps_keys() {
    let mut kernel = PrismKernel::new();
    let mut model = stacked_slabs(&mut kernel);
    let params = DowelParams {
        count: 2,
        radius: 0.5,
        spacing: 2.0,
        shift: 0.0,
        cross_angle: 0.0,
        retreat: 0.2,
        fit: 0.05,
    };
    add_dowels(&mut model, &mut kernel, None, &params).unwrap();

    let skipped = perform_boolean_operations(&mut model, &mut kernel).unwrap();
    assert_eq!(skipped, 0);
    for plate in &model.plates {
        assert!(plate.joints_positives.is_empty());
        assert!(plate.joints_negatives.is_empty());
    }
    assert_eq!(model.plates[0].joints_keys.len(), 2);
    // Both drills were carved into the lower slab's solid.
    let solid = kernel.solid(model.plates[0].solid).unwrap();
    assert_eq!(solid.negative_shells.len(), 2);
    assert!(model.log.is_empty());
}

#[test]
fn boolean_failures_are_logged_and_skipped() {
    let mut kernel = PrismKernel::new();
    let mut model = stacked_slabs(&mut kernel);
    // A joint solid far away from its plate: the strict union falls back
    // to a shell join, the difference is skipped outright.
    let stray_pos = slab(
        &mut kernel,
        Point3d::new(100.0, 100.0, 100.0),
        Point3d::new(101.0, 101.0, 101.0),
    );
    let stray_neg = slab(
        &mut kernel,
        Point3d::new(200.0, 200.0, 200.0),
        Point3d::new(201.0, 201.0, 201.0),
    );
    model.plates[0].joints_positives.push(stray_pos);
    model.plates[0].joints_negatives.push(stray_neg);

    let skipped = perform_boolean_operations(&mut model, &mut kernel).unwrap();
    assert_eq!(skipped, 1);
    assert_eq!(model.log.len(), 2);
    assert!(model.plates[0].joints_positives.is_empty());
    assert!(model.plates[0].joints_negatives.is_empty());
}
