//! Term-algebra collaborator.
//!
//! A term knob takes its value from a labelled tree. The tree type lives
//! outside this crate; the layout only needs its shape (to size the raw
//! fields) and a way to turn a sequence of child choices into a label.

use std::fmt::Debug;

use crate::instance::Disc;

/// A labelled tree that term knobs select values from.
///
/// A term value is encoded as a path of raw choices, one per depth level.
/// Choice `0` stops at the current node; choice `k > 0` descends into child
/// `k - 1` (see [`TermSpec`](crate::TermSpec)).
pub trait TermAlgebra: Debug + Send + Sync {
    /// Depth of the deepest node, counting the root as depth 1.
    fn max_depth(&self) -> usize;

    /// Largest number of children of any node.
    fn max_branching(&self) -> usize;

    /// Returns the label reached by following `path` from the root, or
    /// `None` if the path leaves the tree.
    fn decode(&self, path: &[Disc]) -> Option<&str>;
}
