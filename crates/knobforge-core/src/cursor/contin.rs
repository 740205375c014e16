//! Cursors over continuous knobs.
//!
//! Continuous values are not bit packed; these cursors index straight into
//! the instance's continuous sequence and expose the backing spec.

use std::fmt;

use super::KnobCursorMut;
use crate::instance::{Contin, Instance};
use crate::layout::FieldLayout;
use crate::spec::ContinSpec;

/// Read-only cursor over continuous knobs.
#[derive(Clone, Copy)]
pub struct ContinCursor<'a> {
    layout: &'a FieldLayout,
    values: &'a [Contin],
    idx: usize,
    end: usize,
}

impl<'a> ContinCursor<'a> {
    fn value(&self) -> Contin {
        self.values[self.idx]
    }

    /// Spec of the knob under the cursor.
    pub fn spec(&self) -> &'a ContinSpec {
        &self.layout.contin()[self.idx]
    }
}

impl fmt::Debug for ContinCursor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContinCursor")
            .field("idx", &self.idx)
            .field("end", &self.end)
            .finish()
    }
}

read_cursor!(ContinCursor, Contin);

/// Mutable cursor over continuous knobs.
pub struct ContinCursorMut<'a> {
    layout: &'a FieldLayout,
    values: &'a mut [Contin],
    idx: usize,
    end: usize,
}

impl<'a> ContinCursorMut<'a> {
    fn value(&self) -> Contin {
        self.values[self.idx]
    }

    /// Spec of the knob under the cursor.
    pub fn spec(&self) -> &'a ContinSpec {
        &self.layout.contin()[self.idx]
    }

    /// Read-only view at the same position.
    pub fn as_const(&self) -> ContinCursor<'_> {
        ContinCursor {
            layout: self.layout,
            values: self.values,
            idx: self.idx,
            end: self.end,
        }
    }
}

impl fmt::Debug for ContinCursorMut<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContinCursorMut")
            .field("idx", &self.idx)
            .field("end", &self.end)
            .finish()
    }
}

write_cursor!(ContinCursorMut, Contin);

impl KnobCursorMut for ContinCursorMut<'_> {
    fn set(&mut self, value: Contin) {
        self.values[self.idx] = value;
    }
}

impl FieldLayout {
    /// Cursor at the first continuous knob of `inst`.
    pub fn begin_contin<'a>(&'a self, inst: &'a Instance) -> ContinCursor<'a> {
        ContinCursor {
            layout: self,
            values: inst.contin(),
            idx: 0,
            end: self.n_contin_fields(),
        }
    }

    /// Cursor one past the last continuous knob of `inst`.
    pub fn end_contin<'a>(&'a self, inst: &'a Instance) -> ContinCursor<'a> {
        let end = self.n_contin_fields();
        ContinCursor {
            layout: self,
            values: inst.contin(),
            idx: end,
            end,
        }
    }

    /// Mutable cursor at the first continuous knob of `inst`.
    pub fn begin_contin_mut<'a>(&'a self, inst: &'a mut Instance) -> ContinCursorMut<'a> {
        ContinCursorMut {
            layout: self,
            values: inst.contin_mut(),
            idx: 0,
            end: self.n_contin_fields(),
        }
    }
}
