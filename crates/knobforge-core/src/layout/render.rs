//! Human-readable rendering of layouts and instances.

use std::fmt;

use crate::instance::Instance;
use crate::spec::Spec;

use super::FieldLayout;

impl fmt::Display for FieldLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let specs = self
            .term
            .iter()
            .map(|t| Spec::Term(t.clone()))
            .chain(self.contin.iter().map(|c| Spec::Contin(c.clone())))
            .chain(self.disc.iter().map(|d| Spec::Disc(*d)));
        write!(f, "{{")?;
        for (i, spec) in specs.enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{spec}")?;
        }
        write!(f, "}}")
    }
}

impl FieldLayout {
    /// Renders the knob values of `inst`: decoded terms, continuous values,
    /// discrete values, then all bits as one `0`/`1` run.
    ///
    /// A term whose path leaves its tree is rendered as `?`.
    ///
    /// ```
    /// use knobforge_core::{FieldLayout, Spec};
    ///
    /// let layout =
    ///     FieldLayout::from_specs(vec![Spec::disc(3), Spec::bit(), Spec::bit()]).unwrap();
    /// let mut inst = layout.new_instance();
    /// layout.set_raw(inst.packed_mut(), 0, 2);
    /// layout.set_raw(inst.packed_mut(), 2, 1);
    /// assert_eq!(layout.instance_to_string(&inst), "[2 01]");
    /// ```
    pub fn instance_to_string(&self, inst: &Instance) -> String {
        let mut parts: Vec<String> = Vec::with_capacity(self.dim_size());
        parts.extend(self.begin_term(inst).map(|label| label.unwrap_or("?").to_string()));
        parts.extend(self.begin_contin(inst).map(|v| v.to_string()));
        parts.extend(self.begin_disc(inst).map(|v| v.to_string()));
        if self.n_bits() > 0 {
            parts.push(self.begin_bit(inst).map(|b| if b { '1' } else { '0' }).collect());
        }
        format!("[{}]", parts.join(" "))
    }

    /// Renders every raw field of `inst`, separated by spaces.
    pub fn instance_to_string_raw(&self, inst: &Instance) -> String {
        let values: Vec<String> = self.begin_raw(inst).map(|v| v.to_string()).collect();
        format!("[{}]", values.join(" "))
    }
}
