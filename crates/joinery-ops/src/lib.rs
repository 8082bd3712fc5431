//! Joint generators and the fabrication finisher.
//!
//! Each generator walks the resolved contacts of a model, validates its
//! parameters against every qualifying pair, and only then commits:
//! contour splices and face holes onto the plates, positive/negative/key
//! solids onto their joint lists, and knots into the mid-surface export.
//! The boolean pass and tool-path derivation run last.

pub mod boolean_finish;
mod common;
pub mod custom;
pub mod dowels;
pub mod fabrication;
mod fem;
pub mod fingers;
pub mod halflap;
pub mod sunrise;
pub mod tenons;
pub mod types;

pub use boolean_finish::perform_boolean_operations;
pub use custom::{add_custom, CustomParams};
pub use dowels::{add_dowels, DowelParams};
pub use fabrication::{get_fabrication_lines, FabricationParams, NotchStyle};
pub use fingers::{add_fingers, FingerParams};
pub use halflap::{add_halflaps, ChamferParams, HalflapParams};
pub use sunrise::{add_sunrise, SunriseParams};
pub use tenons::{add_chamfered_tenons, add_tenons, TenonParams};
pub use types::JoineryError;
