//! Scenario tooling for the plate pipeline.
//!
//! [`Bench`] wires a kernel and a model together and runs the pipeline
//! stages in order; [`assertions`] holds the structural checks every
//! scenario is expected to keep true (contour parity, contact symmetry).

pub mod assertions;
pub mod helpers;

pub use assertions::{check_contact_symmetry, check_contour_parity};
pub use helpers::{rect_plate, roundtrip_plates, Bench, HarnessError};
