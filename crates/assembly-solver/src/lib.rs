//! Assembly sequencing and insertion-direction solving.

pub mod intersect;
pub mod sequence;
pub mod sequencer;
pub mod spaces;
pub mod types;

pub use intersect::{intersect_spaces, INTERSECT_TOL};
pub use sequence::{seq_to_tree, tree_to_seq, SeqNode};
pub use sequencer::{derive_vectors, AssemblyPlan, ModulePlan, GRAVITY};
pub use spaces::{attach_spaces, no_overrides, SpaceOverrides};
pub use types::{SequenceError, SolverError};
