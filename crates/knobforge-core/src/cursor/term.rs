//! Cursors over term-algebra knobs.

use std::fmt;

use smallvec::SmallVec;

use crate::instance::{Disc, Instance, PackedWord};
use crate::layout::FieldLayout;
use crate::spec::TermSpec;

/// Read-only cursor over term knobs, yielding decoded labels.
#[derive(Clone, Copy)]
pub struct TermCursor<'a> {
    layout: &'a FieldLayout,
    words: &'a [PackedWord],
    idx: usize,
    end: usize,
}

impl<'a> TermCursor<'a> {
    fn value(&self) -> Option<&'a str> {
        self.layout.get_term(self.words, self.idx)
    }

    /// Raw choices of the term under the cursor.
    pub fn path(&self) -> SmallVec<[Disc; 8]> {
        self.layout.term_path(self.words, self.idx)
    }

    pub fn spec(&self) -> &'a TermSpec {
        &self.layout.term()[self.idx]
    }
}

impl fmt::Debug for TermCursor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TermCursor")
            .field("idx", &self.idx)
            .field("end", &self.end)
            .finish()
    }
}

read_cursor!(TermCursor, Option<&'a str>);

/// Mutable cursor over term knobs.
///
/// Terms are written as raw choice paths with
/// [`set_path`](TermCursorMut::set_path); there is no encoder from labels.
pub struct TermCursorMut<'a> {
    layout: &'a FieldLayout,
    words: &'a mut [PackedWord],
    idx: usize,
    end: usize,
}

impl<'a> TermCursorMut<'a> {
    fn value(&self) -> Option<&'a str> {
        self.layout.get_term(self.words, self.idx)
    }

    pub fn path(&self) -> SmallVec<[Disc; 8]> {
        self.layout.term_path(self.words, self.idx)
    }

    /// Overwrites the term's raw choices; positions past the end of `path`
    /// are set to [`TermSpec::STOP`].
    pub fn set_path(&mut self, path: &[Disc]) {
        self.layout.set_term_path(self.words, self.idx, path);
    }

    pub fn spec(&self) -> &'a TermSpec {
        &self.layout.term()[self.idx]
    }
}

impl fmt::Debug for TermCursorMut<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TermCursorMut")
            .field("idx", &self.idx)
            .field("end", &self.end)
            .finish()
    }
}

write_cursor!(TermCursorMut, Option<&'a str>);

impl FieldLayout {
    /// Cursor at the first term knob of `inst`.
    pub fn begin_term<'a>(&'a self, inst: &'a Instance) -> TermCursor<'a> {
        TermCursor {
            layout: self,
            words: inst.packed(),
            idx: 0,
            end: self.term().len(),
        }
    }

    /// Cursor one past the last term knob of `inst`.
    pub fn end_term<'a>(&'a self, inst: &'a Instance) -> TermCursor<'a> {
        let end = self.term().len();
        TermCursor {
            layout: self,
            words: inst.packed(),
            idx: end,
            end,
        }
    }

    /// Mutable cursor at the first term knob of `inst`.
    pub fn begin_term_mut<'a>(&'a self, inst: &'a mut Instance) -> TermCursorMut<'a> {
        TermCursorMut {
            layout: self,
            words: inst.packed_mut(),
            idx: 0,
            end: self.term().len(),
        }
    }
}
