//! knobforge Core - Bit-packed knob representation
//!
//! This crate provides the representation layer for knob-based candidate
//! solutions:
//! - Instances: packed discrete words plus a continuous-value sequence
//! - Specs describing discrete, continuous and term-algebra knobs
//! - [`FieldLayout`], the codec between packed words and typed knob views
//! - Cursors for walking (and editing) the knobs of one instance

pub mod cursor;
pub mod error;
pub mod instance;
pub mod layout;
pub mod spec;
pub mod term;

#[cfg(test)]
mod test_utils;

pub use cursor::{
    BitCursor, BitCursorMut, BitRef, ContinCursor, ContinCursorMut, DiscCursor, DiscCursorMut,
    KnobCursor, KnobCursorMut, TermCursor, TermCursorMut,
};
pub use error::{KnobError, Result};
pub use instance::{Contin, Disc, Instance, PackedWord, BITS_PER_WORD};
pub use layout::{Field, FieldLayout};
pub use spec::{ContinSpec, DiscSpec, Multiplicity, Spec, TermSpec};
pub use term::TermAlgebra;
