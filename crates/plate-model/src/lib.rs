pub mod attributes;
pub mod contour;
pub mod model;
pub mod plate;
pub mod seam;
pub mod types;

pub use attributes::AttrValue;
pub use contour::insert_curves;
pub use model::{ContactEntry, PlateModel};
pub use plate::Plate;
pub use types::ModelError;
