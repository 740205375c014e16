//! Cursors over discrete raw fields.
//!
//! The same types walk the multi-valued disc zone (`begin_disc`) and the
//! whole raw field table (`begin_raw`), where term positions and booleans
//! are treated as plain discrete values.

use std::fmt;

use rand::Rng;

use super::KnobCursorMut;
use crate::instance::{Disc, Instance, PackedWord};
use crate::layout::{Field, FieldLayout};
use crate::spec::Multiplicity;

/// Read-only cursor over discrete raw fields.
#[derive(Clone, Copy)]
pub struct DiscCursor<'a> {
    layout: &'a FieldLayout,
    words: &'a [PackedWord],
    idx: usize,
    end: usize,
}

impl<'a> DiscCursor<'a> {
    fn value(&self) -> Disc {
        self.layout.get_raw(self.words, self.idx)
    }

    /// Number of legal values of the knob under the cursor.
    ///
    /// # Panics
    /// Panics if the cursor is on a term field.
    pub fn multy(&self) -> Multiplicity {
        self.layout.multiplicity(self.idx)
    }

    /// Packed location of the field under the cursor.
    pub fn field(&self) -> &'a Field {
        &self.layout.fields()[self.idx]
    }
}

impl fmt::Debug for DiscCursor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscCursor")
            .field("idx", &self.idx)
            .field("end", &self.end)
            .finish()
    }
}

read_cursor!(DiscCursor, Disc);

/// Mutable cursor over discrete raw fields.
pub struct DiscCursorMut<'a> {
    layout: &'a FieldLayout,
    words: &'a mut [PackedWord],
    idx: usize,
    end: usize,
}

impl<'a> DiscCursorMut<'a> {
    fn value(&self) -> Disc {
        self.layout.get_raw(self.words, self.idx)
    }

    /// Number of legal values of the knob under the cursor.
    ///
    /// # Panics
    /// Panics if the cursor is on a term field.
    pub fn multy(&self) -> Multiplicity {
        self.layout.multiplicity(self.idx)
    }

    /// Sets the knob under the cursor to a uniformly drawn legal value.
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let value = rng.random_range(0..self.multy());
        self.set(value);
    }

    /// Read-only view at the same position.
    pub fn as_const(&self) -> DiscCursor<'_> {
        DiscCursor {
            layout: self.layout,
            words: self.words,
            idx: self.idx,
            end: self.end,
        }
    }
}

impl fmt::Debug for DiscCursorMut<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscCursorMut")
            .field("idx", &self.idx)
            .field("end", &self.end)
            .finish()
    }
}

write_cursor!(DiscCursorMut, Disc);

impl KnobCursorMut for DiscCursorMut<'_> {
    fn set(&mut self, value: Disc) {
        self.layout.set_raw(self.words, self.idx, value);
    }
}

impl FieldLayout {
    fn disc_cursor<'a>(&'a self, inst: &'a Instance, idx: usize, end: usize) -> DiscCursor<'a> {
        DiscCursor {
            layout: self,
            words: inst.packed(),
            idx,
            end,
        }
    }

    /// Cursor at the first multi-valued discrete knob of `inst`.
    pub fn begin_disc<'a>(&'a self, inst: &'a Instance) -> DiscCursor<'a> {
        self.disc_cursor(inst, self.begin_disc_raw_idx(), self.end_disc_raw_idx())
    }

    /// Cursor one past the last multi-valued discrete knob of `inst`.
    pub fn end_disc<'a>(&'a self, inst: &'a Instance) -> DiscCursor<'a> {
        self.disc_cursor(inst, self.end_disc_raw_idx(), self.end_disc_raw_idx())
    }

    /// Mutable cursor at the first multi-valued discrete knob of `inst`.
    pub fn begin_disc_mut<'a>(&'a self, inst: &'a mut Instance) -> DiscCursorMut<'a> {
        DiscCursorMut {
            layout: self,
            words: inst.packed_mut(),
            idx: self.begin_disc_raw_idx(),
            end: self.end_disc_raw_idx(),
        }
    }

    /// Cursor at the first raw field of `inst`.
    pub fn begin_raw<'a>(&'a self, inst: &'a Instance) -> DiscCursor<'a> {
        self.disc_cursor(inst, 0, self.raw_size())
    }

    /// Cursor one past the last raw field of `inst`.
    pub fn end_raw<'a>(&'a self, inst: &'a Instance) -> DiscCursor<'a> {
        self.disc_cursor(inst, self.raw_size(), self.raw_size())
    }

    /// Mutable cursor at the first raw field of `inst`.
    pub fn begin_raw_mut<'a>(&'a self, inst: &'a mut Instance) -> DiscCursorMut<'a> {
        DiscCursorMut {
            layout: self,
            words: inst.packed_mut(),
            idx: 0,
            end: self.raw_size(),
        }
    }
}
