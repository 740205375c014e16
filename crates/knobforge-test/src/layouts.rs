//! Field layout fixtures.

use knobforge_core::{FieldLayout, Spec};

use crate::tree::LabelTree;

/// Builds a layout from `specs`.
///
/// # Panics
/// Panics if any spec is invalid.
pub fn layout_of(specs: &[Spec]) -> FieldLayout {
    FieldLayout::from_specs(specs.iter().cloned()).expect("fixture specs are valid")
}

/// Three booleans and one four-valued disc.
pub fn bits_and_quad() -> FieldLayout {
    layout_of(&[Spec::bit(), Spec::bit(), Spec::bit(), Spec::disc(4)])
}

/// One knob of every kind: a term, a continuous knob, a three-valued disc,
/// a single-valued disc and two booleans.
pub fn mixed_layout() -> FieldLayout {
    layout_of(&[
        Spec::bit(),
        Spec::disc(3),
        LabelTree::sample().spec(),
        Spec::contin(1.0, 3),
        Spec::disc(1),
        Spec::bit(),
    ])
}
