//! Contact graph resolution between plates.

pub mod resolve;
pub mod types;

pub use resolve::resolve;
pub use types::TopologyError;
