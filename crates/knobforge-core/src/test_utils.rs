//! Test utilities for knobforge-core
//!
//! Provides common fixtures used across the crate's test modules.

use std::sync::Arc;

use crate::instance::Disc;
use crate::spec::{Spec, TermSpec};
use crate::term::TermAlgebra;

/// A labelled tree used as a term algebra in tests.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelTree {
    pub label: String,
    pub children: Vec<LabelTree>,
}

impl LabelTree {
    /// Creates a leaf.
    pub fn leaf(label: &str) -> Self {
        Self {
            label: label.to_string(),
            children: Vec::new(),
        }
    }

    /// Creates an inner node.
    pub fn node(label: &str, children: Vec<LabelTree>) -> Self {
        Self {
            label: label.to_string(),
            children,
        }
    }

    /// `and(x, or(y, z))`: depth 3, branching 2.
    pub fn sample() -> Self {
        Self::node(
            "and",
            vec![
                Self::leaf("x"),
                Self::node("or", vec![Self::leaf("y"), Self::leaf("z")]),
            ],
        )
    }

    /// Wraps the tree as a term spec.
    pub fn spec(self) -> Spec {
        Spec::Term(TermSpec::new(Arc::new(self)))
    }
}

impl TermAlgebra for LabelTree {
    fn max_depth(&self) -> usize {
        1 + self.children.iter().map(|c| c.max_depth()).max().unwrap_or(0)
    }

    fn max_branching(&self) -> usize {
        self.children
            .iter()
            .map(|c| c.max_branching())
            .max()
            .unwrap_or(0)
            .max(self.children.len())
    }

    fn decode(&self, path: &[Disc]) -> Option<&str> {
        let mut node = self;
        for &choice in path {
            if choice == TermSpec::STOP {
                break;
            }
            node = node.children.get(TermSpec::to_child_idx(choice) as usize)?;
        }
        Some(&node.label)
    }
}
