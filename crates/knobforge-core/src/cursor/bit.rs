//! Cursors over the trailing boolean zone.
//!
//! Boolean fields are one bit wide and packed back to back, so these
//! cursors address single bits: position `p` is bit `p % 64` of word
//! `p / 64`.

use std::fmt;
use std::ops::{BitAndAssign, BitOrAssign, BitXorAssign};

use super::KnobCursorMut;
use crate::instance::{Instance, PackedWord, BITS_PER_WORD};
use crate::layout::FieldLayout;

#[inline]
fn locate(bit: usize) -> (usize, PackedWord) {
    (bit / BITS_PER_WORD, 1 << (bit % BITS_PER_WORD))
}

/// Read-only cursor over boolean knobs.
#[derive(Clone, Copy)]
pub struct BitCursor<'a> {
    words: &'a [PackedWord],
    idx: usize,
    end: usize,
}

impl<'a> BitCursor<'a> {
    fn value(&self) -> bool {
        let (word, mask) = locate(self.idx);
        self.words[word] & mask != 0
    }

    /// Single-bit mask over the word under the cursor.
    pub fn mask(&self) -> PackedWord {
        locate(self.idx).1
    }
}

impl fmt::Debug for BitCursor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BitCursor")
            .field("bit", &self.idx)
            .field("end", &self.end)
            .finish()
    }
}

read_cursor!(BitCursor, bool);

/// Mutable cursor over boolean knobs.
pub struct BitCursorMut<'a> {
    words: &'a mut [PackedWord],
    idx: usize,
    end: usize,
}

impl<'a> BitCursorMut<'a> {
    fn value(&self) -> bool {
        let (word, mask) = locate(self.idx);
        self.words[word] & mask != 0
    }

    /// Settable view of the bit under the cursor.
    pub fn bit(&mut self) -> BitRef<'_> {
        let (word, mask) = locate(self.idx);
        BitRef {
            word: &mut self.words[word],
            mask,
        }
    }

    /// Inverts the bit under the cursor.
    pub fn flip(&mut self) {
        self.bit().flip();
    }

    /// Read-only view at the same position.
    pub fn as_const(&self) -> BitCursor<'_> {
        BitCursor {
            words: self.words,
            idx: self.idx,
            end: self.end,
        }
    }
}

impl fmt::Debug for BitCursorMut<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BitCursorMut")
            .field("bit", &self.idx)
            .field("end", &self.end)
            .finish()
    }
}

write_cursor!(BitCursorMut, bool);

impl KnobCursorMut for BitCursorMut<'_> {
    fn set(&mut self, value: bool) {
        self.bit().set(value);
    }
}

/// A boolean view over one masked bit of a packed word.
#[derive(Debug)]
pub struct BitRef<'b> {
    word: &'b mut PackedWord,
    mask: PackedWord,
}

impl BitRef<'_> {
    pub fn get(&self) -> bool {
        *self.word & self.mask != 0
    }

    pub fn set(&mut self, value: bool) {
        if value {
            *self.word |= self.mask;
        } else {
            self.reset();
        }
    }

    pub fn reset(&mut self) {
        *self.word &= !self.mask;
    }

    pub fn flip(&mut self) {
        *self.word ^= self.mask;
    }
}

impl BitOrAssign<bool> for BitRef<'_> {
    fn bitor_assign(&mut self, rhs: bool) {
        if rhs {
            *self.word |= self.mask;
        }
    }
}

impl BitAndAssign<bool> for BitRef<'_> {
    fn bitand_assign(&mut self, rhs: bool) {
        if !rhs {
            self.reset();
        }
    }
}

impl BitXorAssign<bool> for BitRef<'_> {
    fn bitxor_assign(&mut self, rhs: bool) {
        if rhs {
            self.flip();
        }
    }
}

impl FieldLayout {
    // Bit positions spanned by the boolean zone.
    fn bit_zone(&self) -> (usize, usize) {
        match (self.bit_fields().first(), self.bit_fields().last()) {
            (Some(first), Some(last)) => (
                first.word * BITS_PER_WORD + first.offset,
                last.word * BITS_PER_WORD + last.offset + 1,
            ),
            _ => (0, 0),
        }
    }

    /// Cursor at the first boolean knob of `inst`.
    pub fn begin_bit<'a>(&self, inst: &'a Instance) -> BitCursor<'a> {
        let (idx, end) = self.bit_zone();
        BitCursor {
            words: inst.packed(),
            idx,
            end,
        }
    }

    /// Cursor one past the last boolean knob of `inst`.
    pub fn end_bit<'a>(&self, inst: &'a Instance) -> BitCursor<'a> {
        let (_, end) = self.bit_zone();
        BitCursor {
            words: inst.packed(),
            idx: end,
            end,
        }
    }

    /// Mutable cursor at the first boolean knob of `inst`.
    pub fn begin_bit_mut<'a>(&self, inst: &'a mut Instance) -> BitCursorMut<'a> {
        let (idx, end) = self.bit_zone();
        BitCursorMut {
            words: inst.packed_mut(),
            idx,
            end,
        }
    }
}
