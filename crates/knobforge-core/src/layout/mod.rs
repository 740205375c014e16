//! Field layouts: the codec between packed words and typed knobs.
//!
//! A [`FieldLayout`] describes how the knobs of a spec collection are packed
//! into an [`Instance`]. It does not hold any knob values itself; it provides
//! the primitives and cursors to read and write them.
//!
//! # Raw fields
//!
//! Every discrete knob occupies exactly one raw field. A term knob occupies
//! `depth` raw fields. Continuous knobs have no raw fields; they live in the
//! instance's separate continuous sequence. Raw fields are ordered in zones:
//!
//! ```text
//! [ term fields | multi-valued disc fields | boolean fields ]
//! ```
//!
//! A raw field never crosses a word boundary, and each term knob's span is
//! padded to a whole number of words.

mod build;
mod render;

#[cfg(test)]
mod tests;

use smallvec::SmallVec;

use crate::error::{KnobError, Result};
use crate::instance::{low_mask, Contin, Disc, Instance, PackedWord};
use crate::spec::{ContinSpec, DiscSpec, Multiplicity, TermSpec};

/// Location of one raw field inside the packed words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Field {
    /// Width in bits.
    pub width: usize,
    /// Index of the word holding the field.
    pub word: usize,
    /// Bit offset of the field inside its word.
    pub offset: usize,
}

impl Field {
    pub fn new(width: usize, word: usize, offset: usize) -> Self {
        Self {
            width,
            word,
            offset,
        }
    }

    #[inline]
    fn mask(&self) -> PackedWord {
        low_mask(self.width) << self.offset
    }
}

/// Describes the packing of term, continuous and discrete knobs.
///
/// Built once from a spec collection with [`FieldLayout::repeated`] or
/// [`FieldLayout::from_specs`]; the field table and zone caches never change
/// afterwards. The continuous specs keep mutable search state, reachable
/// through [`contin_spec_mut`](Self::contin_spec_mut).
///
/// # Example
///
/// ```
/// use knobforge_core::{FieldLayout, Instance, Spec};
///
/// let layout = FieldLayout::from_specs(vec![
///     Spec::bit(),
///     Spec::disc(4),
///     Spec::bit(),
///     Spec::bit(),
/// ]).unwrap();
///
/// assert_eq!(layout.raw_size(), 4);
/// assert_eq!(layout.n_bits(), 3);
/// assert_eq!(layout.n_disc_fields(), 1);
///
/// let mut inst = layout.new_instance();
/// layout.set_raw(inst.packed_mut(), 0, 3);
/// assert_eq!(layout.get_raw(inst.packed(), 0), 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FieldLayout {
    fields: Vec<Field>,
    term: Vec<TermSpec>,
    contin: Vec<ContinSpec>,
    // Includes the booleans, which sit at the end.
    disc: Vec<DiscSpec>,
    n_bool: usize,

    // Zone caches, rebuilt by `compute_starts`.
    end_term_raw_idx: usize,
    begin_disc_raw_idx: usize,
    end_disc_raw_idx: usize,
    begin_bit_raw_idx: usize,
    end_bit_raw_idx: usize,
    n_disc_fields: usize,
    n_term_fields: usize,
    term_raw_starts: Vec<usize>,
}

impl FieldLayout {
    /// Number of words an instance of this layout needs.
    pub fn packed_width(&self) -> usize {
        self.fields.last().map_or(0, |f| f.word + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of raw fields.
    pub fn raw_size(&self) -> usize {
        self.fields.len()
    }

    /// Approximate memory footprint in bytes.
    pub fn byte_size(&self) -> usize {
        std::mem::size_of::<Self>()
            + self.fields.len() * std::mem::size_of::<Field>()
            + self.term.len() * std::mem::size_of::<TermSpec>()
            + self.disc.len() * std::mem::size_of::<DiscSpec>()
            + self.contin.len() * std::mem::size_of::<Contin>()
            + self.term_raw_starts.len() * std::mem::size_of::<usize>()
    }

    /// Number of knobs, counting a term or contin knob once regardless of
    /// how many raw fields it spans.
    pub fn dim_size(&self) -> usize {
        self.n_bits() + self.n_disc_fields() + self.contin.len() + self.term.len()
    }

    /// Number of non-zero raw settings in `inst`.
    pub fn count(&self, inst: &Instance) -> usize {
        self.begin_raw(inst).filter(|&v| v != 0).count()
    }

    /// Creates a zero-valued instance of this layout's shape.
    pub fn new_instance(&self) -> Instance {
        Instance::new(self.packed_width(), self.contin.len())
    }

    /// Checks that `inst` has this layout's shape.
    pub fn check_instance(&self, inst: &Instance) -> Result<()> {
        if inst.size() == self.packed_width() && inst.contin_len() == self.contin.len() {
            Ok(())
        } else {
            Err(KnobError::ShapeMismatch {
                expected_words: self.packed_width(),
                expected_contin: self.contin.len(),
                actual_words: inst.size(),
                actual_contin: inst.contin_len(),
            })
        }
    }

    // ------------------------------------------------------------------
    // Spec tables

    /// Discrete specs, booleans last.
    pub fn disc_and_bit(&self) -> &[DiscSpec] {
        &self.disc
    }

    pub fn term(&self) -> &[TermSpec] {
        &self.term
    }

    pub fn contin(&self) -> &[ContinSpec] {
        &self.contin
    }

    pub fn contin_mut(&mut self) -> &mut [ContinSpec] {
        &mut self.contin
    }

    /// Mutable search state of the `idx`th continuous knob.
    ///
    /// # Panics
    /// Panics if `idx` is out of range.
    pub fn contin_spec_mut(&mut self, idx: usize) -> &mut ContinSpec {
        &mut self.contin[idx]
    }

    /// Multiplicity of the discrete knob stored at raw index `raw_idx`.
    ///
    /// # Panics
    /// Panics if `raw_idx` is not a disc or bit field.
    pub fn multiplicity(&self, raw_idx: usize) -> Multiplicity {
        self.disc[self.raw_to_disc_idx(raw_idx)].multiplicity
    }

    // ------------------------------------------------------------------
    // Field tables and zone boundaries

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn term_fields(&self) -> &[Field] {
        &self.fields[..self.end_term_raw_idx]
    }

    pub fn disc_fields(&self) -> &[Field] {
        &self.fields[self.begin_disc_raw_idx..self.end_disc_raw_idx]
    }

    pub fn bit_fields(&self) -> &[Field] {
        &self.fields[self.begin_bit_raw_idx..self.end_bit_raw_idx]
    }

    pub fn begin_term_raw_idx(&self) -> usize {
        0
    }

    pub fn end_term_raw_idx(&self) -> usize {
        self.end_term_raw_idx
    }

    pub fn begin_disc_raw_idx(&self) -> usize {
        self.begin_disc_raw_idx
    }

    pub fn end_disc_raw_idx(&self) -> usize {
        self.end_disc_raw_idx
    }

    pub fn begin_bit_raw_idx(&self) -> usize {
        self.begin_bit_raw_idx
    }

    pub fn end_bit_raw_idx(&self) -> usize {
        self.end_bit_raw_idx
    }

    /// Number of boolean fields.
    pub fn n_bits(&self) -> usize {
        self.n_bool
    }

    /// Number of discrete fields, not counting booleans.
    pub fn n_disc_fields(&self) -> usize {
        self.n_disc_fields
    }

    /// Number of continuous knobs.
    pub fn n_contin_fields(&self) -> usize {
        self.contin.len()
    }

    /// Number of raw fields used by term knobs.
    pub fn n_term_fields(&self) -> usize {
        self.n_term_fields
    }

    /// Raw index of the first field of the `idx`th term knob.
    ///
    /// # Panics
    /// Panics if `idx > term().len()`.
    pub fn term_to_raw_idx(&self, idx: usize) -> usize {
        self.term_raw_starts[idx]
    }

    /// Index into [`disc_and_bit`](Self::disc_and_bit) of the field at
    /// `raw_idx`.
    ///
    /// # Panics
    /// Panics if `raw_idx` is not a disc or bit field.
    pub fn raw_to_disc_idx(&self, raw_idx: usize) -> usize {
        assert!(
            (self.begin_disc_raw_idx..self.end_bit_raw_idx).contains(&raw_idx),
            "raw index {raw_idx} is not a discrete field"
        );
        raw_idx - self.begin_disc_raw_idx
    }

    // ------------------------------------------------------------------
    // Raw access

    /// Reads raw field `idx` from `words`.
    #[inline]
    pub fn get_raw(&self, words: &[PackedWord], idx: usize) -> Disc {
        let f = &self.fields[idx];
        if f.width == 0 {
            return 0;
        }
        ((words[f.word] >> f.offset) & low_mask(f.width)) as Disc
    }

    /// Writes `value` into raw field `idx` of `words`.
    ///
    /// Bits of `value` beyond the field width are discarded.
    #[inline]
    pub fn set_raw(&self, words: &mut [PackedWord], idx: usize, value: Disc) {
        let f = &self.fields[idx];
        if f.width == 0 {
            return;
        }
        let mask = f.mask();
        let word = &mut words[f.word];
        *word = (*word & !mask) | ((PackedWord::from(value) << f.offset) & mask);
    }

    /// Reads raw field `idx` of `inst`.
    pub fn get_disc_raw(&self, inst: &Instance, idx: usize) -> Disc {
        self.get_raw(inst.packed(), idx)
    }

    /// Raw choices of the `idx`th term knob.
    pub fn term_path(&self, words: &[PackedWord], idx: usize) -> SmallVec<[Disc; 8]> {
        let start = self.term_to_raw_idx(idx);
        (start..start + self.term[idx].depth)
            .map(|raw| self.get_raw(words, raw))
            .collect()
    }

    /// Writes the raw choices of the `idx`th term knob.
    ///
    /// # Panics
    /// Panics if `path` is longer than the term's depth.
    pub fn set_term_path(&self, words: &mut [PackedWord], idx: usize, path: &[Disc]) {
        let depth = self.term[idx].depth;
        assert!(path.len() <= depth, "term path longer than depth {depth}");
        let start = self.term_to_raw_idx(idx);
        for pos in 0..depth {
            let choice = path.get(pos).copied().unwrap_or(TermSpec::STOP);
            self.set_raw(words, start + pos, choice);
        }
    }

    /// Decoded value of the `idx`th term knob.
    pub fn get_term(&self, words: &[PackedWord], idx: usize) -> Option<&str> {
        let path = self.term_path(words, idx);
        self.term[idx].tree().decode(&path)
    }

    /// Value of the `idx`th continuous knob.
    pub fn get_contin(&self, inst: &Instance, idx: usize) -> Contin {
        inst.contin()[idx]
    }

    pub fn set_contin(&self, inst: &mut Instance, idx: usize, value: Contin) {
        inst.contin_mut()[idx] = value;
    }

    /// Packs a flat sequence of raw values (term positions first, then
    /// disc and bit values) into `out`.
    ///
    /// Returns the one-past-the-end word position, which equals
    /// [`packed_width`](Self::packed_width).
    ///
    /// # Panics
    /// Panics if `values` yields fewer than [`raw_size`](Self::raw_size)
    /// items or `out` is shorter than the packed width.
    pub fn pack<I>(&self, values: I, out: &mut [PackedWord]) -> usize
    where
        I: IntoIterator<Item = Disc>,
    {
        assert!(
            out.len() >= self.packed_width(),
            "pack target holds {} words, layout needs {}",
            out.len(),
            self.packed_width()
        );
        let mut values = values.into_iter();
        for idx in 0..self.fields.len() {
            let Some(value) = values.next() else {
                panic!("pack expected {} values, got {idx}", self.fields.len());
            };
            self.set_raw(out, idx, value);
        }
        self.packed_width()
    }

    // ------------------------------------------------------------------
    // Instance comparison

    /// Number of raw fields that differ between `a` and `b`.
    ///
    /// # Panics
    /// Panics if the instances have different sizes.
    pub fn hamming_distance(&self, a: &Instance, b: &Instance) -> usize {
        assert_eq!(a.size(), b.size(), "hamming distance of differently sized instances");
        self.begin_raw(a)
            .zip(self.begin_raw(b))
            .filter(|(x, y)| x != y)
            .count()
    }

    /// Copies into `target` every raw field where `base` and `reference`
    /// differ, taking the value from `reference`. Continuous values are
    /// copied from `reference` as a whole.
    ///
    /// Used to merge two high scorers: the fields that turned `base` into
    /// `reference` are transplanted into `target`.
    ///
    /// # Panics
    /// Panics unless all three instances have the same size.
    pub fn merge_instance(&self, target: &mut Instance, base: &Instance, reference: &Instance) {
        assert!(
            base.size() == reference.size() && base.size() == target.size(),
            "merge of differently sized instances"
        );
        for idx in 0..self.fields.len() {
            let value = self.get_raw(reference.packed(), idx);
            if self.get_raw(base.packed(), idx) != value {
                self.set_raw(target.packed_mut(), idx, value);
            }
        }
        target.set_contin_from(reference);
    }
}
