//! Cursors over the knobs of one instance.
//!
//! There is one cursor type per knob kind and mutability:
//!
//! | kind   | read-only        | mutable             | value          |
//! |--------|------------------|---------------------|----------------|
//! | bit    | [`BitCursor`]    | [`BitCursorMut`]    | `bool`         |
//! | disc   | [`DiscCursor`]   | [`DiscCursorMut`]   | [`Disc`]       |
//! | contin | [`ContinCursor`] | [`ContinCursorMut`] | [`Contin`]     |
//! | term   | [`TermCursor`]   | [`TermCursorMut`]   | `Option<&str>` |
//!
//! Cursors borrow the layout and the instance storage; they never own
//! either. Read-only cursors are `Copy`, compare by position and iterate
//! up to the end of their zone. The raw cursors returned by
//! [`FieldLayout::begin_raw`](crate::FieldLayout::begin_raw) are disc
//! cursors spanning every term, disc and bit field.
//!
//! [`Disc`]: crate::Disc
//! [`Contin`]: crate::Contin

/// Random-access position over one kind of knob.
pub trait KnobCursor {
    type Value;

    /// Position in the cursor's own units (bits for bit cursors, raw
    /// fields for disc cursors, knobs otherwise).
    fn index(&self) -> usize;

    /// Moves the cursor by `n` positions.
    ///
    /// # Panics
    /// Panics if the cursor would move before position zero.
    fn advance(&mut self, n: isize);

    /// Reads the value under the cursor.
    ///
    /// # Panics
    /// Panics if the cursor is outside its storage.
    fn get(&self) -> Self::Value;

    /// Signed number of positions from `self` to `other`.
    fn distance_to(&self, other: &Self) -> isize
    where
        Self: Sized,
    {
        other.index() as isize - self.index() as isize
    }
}

/// A cursor that can write the value under it.
pub trait KnobCursorMut: KnobCursor {
    fn set(&mut self, value: Self::Value);
}

#[inline]
pub(crate) fn offset_index(idx: usize, n: isize) -> usize {
    match idx.checked_add_signed(n) {
        Some(idx) => idx,
        None => panic!("cursor at {idx} cannot move by {n}"),
    }
}

/// Implements the position bookkeeping shared by read-only cursors.
///
/// The cursor must have `idx` and `end` fields and an inherent `value()`.
macro_rules! read_cursor {
    ($name:ident, $value:ty) => {
        impl<'a> $crate::cursor::KnobCursor for $name<'a> {
            type Value = $value;

            fn index(&self) -> usize {
                self.idx
            }

            fn advance(&mut self, n: isize) {
                self.idx = $crate::cursor::offset_index(self.idx, n);
            }

            fn get(&self) -> $value {
                self.value()
            }
        }

        impl PartialEq for $name<'_> {
            fn eq(&self, other: &Self) -> bool {
                self.idx == other.idx
            }
        }

        impl Eq for $name<'_> {}

        impl PartialOrd for $name<'_> {
            fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for $name<'_> {
            fn cmp(&self, other: &Self) -> std::cmp::Ordering {
                self.idx.cmp(&other.idx)
            }
        }

        impl<'a> Iterator for $name<'a> {
            type Item = $value;

            fn next(&mut self) -> Option<$value> {
                if self.idx >= self.end {
                    return None;
                }
                let value = self.value();
                self.idx += 1;
                Some(value)
            }

            fn size_hint(&self) -> (usize, Option<usize>) {
                let n = self.end.saturating_sub(self.idx);
                (n, Some(n))
            }
        }

        impl ExactSizeIterator for $name<'_> {}
    };
}

/// Implements the position bookkeeping shared by mutable cursors.
macro_rules! write_cursor {
    ($name:ident, $value:ty) => {
        impl<'a> $crate::cursor::KnobCursor for $name<'a> {
            type Value = $value;

            fn index(&self) -> usize {
                self.idx
            }

            fn advance(&mut self, n: isize) {
                self.idx = $crate::cursor::offset_index(self.idx, n);
            }

            fn get(&self) -> $value {
                self.value()
            }
        }

        impl $name<'_> {
            /// Whether the cursor has reached the end of its zone.
            pub fn is_end(&self) -> bool {
                self.idx >= self.end
            }

            /// Positions left before the end of the zone.
            pub fn remaining(&self) -> usize {
                self.end.saturating_sub(self.idx)
            }
        }
    };
}

mod bit;
mod contin;
mod disc;
mod term;


pub use bit::{BitCursor, BitCursorMut, BitRef};
pub use contin::{ContinCursor, ContinCursorMut};
pub use disc::{DiscCursor, DiscCursorMut};
pub use term::{TermCursor, TermCursorMut};
