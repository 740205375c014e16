//! Error types for knobforge

use thiserror::Error;

/// Recoverable errors raised while building layouts or handling instances.
///
/// Caller-contract violations (out-of-range indices, comparing instances of
/// different sizes) are not represented here; those panic.
#[derive(Debug, Error, PartialEq)]
pub enum KnobError {
    /// A discrete spec was declared with no legal values.
    #[error("Discrete knob must have at least one legal value")]
    ZeroMultiplicity,

    /// A term tree is too wide to be encoded in a single packed word.
    #[error("Term tree branching {branching} needs {width} bits per position")]
    TermTooWide { branching: usize, width: usize },

    /// An instance does not have the shape a layout expects.
    #[error(
        "Instance shape mismatch: expected {expected_words} words / {expected_contin} contin values, \
         got {actual_words} / {actual_contin}"
    )]
    ShapeMismatch {
        expected_words: usize,
        expected_contin: usize,
        actual_words: usize,
        actual_contin: usize,
    },
}

/// Result type alias for knobforge operations
pub type Result<T> = std::result::Result<T, KnobError>;
