use thiserror::Error;

/// Failures raised while parsing or validating assembly-sequence text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SequenceError {
    #[error("unbalanced brackets in sequence text")]
    UnbalancedBrackets,

    #[error("unexpected token `{token}` in sequence text")]
    UnexpectedToken { token: String },

    #[error("missing separator before `{at}`")]
    MissingSeparator { at: String },

    #[error("plate id {id} appears more than once")]
    DuplicateId { id: usize },

    #[error("plate id {id} is out of range for {count} plates")]
    OutOfRange { id: usize, count: usize },

    #[error("sequence covers {got} of {count} plate ids")]
    IncompleteCoverage { got: usize, count: usize },

    #[error("sequence text is empty")]
    Empty,
}

/// Failures raised while solving insertion directions.
#[derive(Debug, Error)]
pub enum SolverError {
    /// The staged reduction emptied out: the given spaces admit no common
    /// insertion direction.
    #[error("insertion spaces have no common direction")]
    NoIntersection,

    #[error("no insertion spaces to intersect")]
    NoSpaces,

    /// A contact entry consulted by the sequencer has no attached space.
    #[error("contact between plates {i} and {j} carries no insertion space")]
    MissingSpace { i: usize, j: usize },

    #[error(transparent)]
    Sequence(#[from] SequenceError),
}
