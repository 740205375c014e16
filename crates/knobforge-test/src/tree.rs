//! Labelled trees as a term algebra.

use std::sync::Arc;

use knobforge_core::{Disc, Spec, TermAlgebra, TermSpec};

/// A tree whose nodes carry string labels.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelTree {
    pub label: String,
    pub children: Vec<LabelTree>,
}

impl LabelTree {
    pub fn leaf(label: &str) -> Self {
        Self {
            label: label.to_string(),
            children: Vec::new(),
        }
    }

    pub fn node(label: &str, children: Vec<LabelTree>) -> Self {
        Self {
            label: label.to_string(),
            children,
        }
    }

    /// `and(x, or(y, z))`: depth 3, two children per inner node.
    pub fn sample() -> Self {
        Self::node(
            "and",
            vec![
                Self::leaf("x"),
                Self::node("or", vec![Self::leaf("y"), Self::leaf("z")]),
            ],
        )
    }

    /// Wraps the tree in a term spec with its own handle.
    pub fn spec(self) -> Spec {
        Spec::Term(TermSpec::new(Arc::new(self)))
    }
}

impl TermAlgebra for LabelTree {
    fn max_depth(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(TermAlgebra::max_depth)
            .max()
            .unwrap_or(0)
    }

    fn max_branching(&self) -> usize {
        self.children
            .iter()
            .map(TermAlgebra::max_branching)
            .fold(self.children.len(), usize::max)
    }

    fn decode(&self, path: &[Disc]) -> Option<&str> {
        let mut node = self;
        for &choice in path.iter().take_while(|&&c| c != TermSpec::STOP) {
            node = node.children.get(TermSpec::to_child_idx(choice) as usize)?;
        }
        Some(&node.label)
    }
}
