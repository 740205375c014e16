//! Layout construction.

use crate::error::Result;
use crate::instance::BITS_PER_WORD;
use crate::spec::{ContinSpec, DiscSpec, Spec, TermSpec};

use super::{Field, FieldLayout};

impl FieldLayout {
    /// Creates an empty layout.
    pub fn new() -> Self {
        let mut layout = Self::blank();
        layout.compute_starts();
        layout
    }

    // Tables without zone caches; callers finish with `compute_starts`.
    fn blank() -> Self {
        Self {
            fields: Vec::new(),
            term: Vec::new(),
            contin: Vec::new(),
            disc: Vec::new(),
            n_bool: 0,
            end_term_raw_idx: 0,
            begin_disc_raw_idx: 0,
            end_disc_raw_idx: 0,
            begin_bit_raw_idx: 0,
            end_bit_raw_idx: 0,
            n_disc_fields: 0,
            n_term_fields: 0,
            term_raw_starts: Vec::new(),
        }
    }

    /// Creates a layout holding `n` copies of `spec`.
    ///
    /// # Errors
    /// Returns an error if `spec` is invalid (see [`Spec::validate`]).
    pub fn repeated(spec: Spec, n: usize) -> Result<Self> {
        spec.validate()?;
        let mut layout = Self::blank();
        layout.build_spec(&spec, n);
        layout.compute_starts();
        Ok(layout)
    }

    /// Creates a layout from a collection of specs.
    ///
    /// Identical specs are merged and counted. Specs are laid out terms
    /// first, then contins, then discs; within discs larger multiplicities
    /// come first and booleans last.
    ///
    /// # Errors
    /// Returns an error if any spec is invalid (see [`Spec::validate`]).
    pub fn from_specs<I>(specs: I) -> Result<Self>
    where
        I: IntoIterator<Item = Spec>,
    {
        let mut counted: Vec<(Spec, usize)> = Vec::new();
        for spec in specs {
            spec.validate()?;
            match counted.iter_mut().find(|(s, _)| *s == spec) {
                Some((_, n)) => *n += 1,
                None => counted.push((spec, 1)),
            }
        }
        counted.sort_by(|(a, _), (b, _)| a.layout_order(b));

        let mut layout = Self::blank();
        for (spec, n) in &counted {
            layout.build_spec(spec, *n);
        }
        layout.compute_starts();
        Ok(layout)
    }

    fn build_spec(&mut self, spec: &Spec, n: usize) {
        match spec {
            Spec::Term(t) => self.build_term_spec(t, n),
            Spec::Contin(c) => self.build_contin_spec(c, n),
            Spec::Disc(d) => self.build_disc_spec(d, n),
        }
    }

    fn build_term_spec(&mut self, spec: &TermSpec, n: usize) {
        debug_assert!(self.disc.is_empty(), "term specs must precede disc specs");
        let width = spec.width();
        for _ in 0..n {
            let mut bit = align_to_word(self.back_offset());
            for _ in 0..spec.depth {
                let field = place(bit, width);
                bit = field.word * BITS_PER_WORD + field.offset + width;
                self.fields.push(field);
            }
            self.term.push(spec.clone());
        }
    }

    fn build_contin_spec(&mut self, spec: &ContinSpec, n: usize) {
        self.contin.extend(std::iter::repeat(spec.clone()).take(n));
    }

    fn build_disc_spec(&mut self, spec: &DiscSpec, n: usize) {
        let width = spec.width();
        let mut bit = if self.disc.is_empty() && !self.term.is_empty() {
            align_to_word(self.back_offset())
        } else {
            self.back_offset()
        };
        for _ in 0..n {
            let field = place(bit, width);
            bit = field.word * BITS_PER_WORD + field.offset + width;
            self.fields.push(field);
        }
        self.disc.extend(std::iter::repeat(*spec).take(n));
        if spec.is_bool() {
            self.n_bool += n;
        }
    }

    // One past the last used bit.
    fn back_offset(&self) -> usize {
        self.fields
            .last()
            .map_or(0, |f| f.word * BITS_PER_WORD + f.offset + f.width)
    }

    /// Recomputes the zone caches from the field and spec tables.
    pub(super) fn compute_starts(&mut self) {
        self.term_raw_starts.clear();
        let mut raw = 0;
        for t in &self.term {
            self.term_raw_starts.push(raw);
            raw += t.depth;
        }
        self.term_raw_starts.push(raw);

        self.n_term_fields = raw;
        self.end_term_raw_idx = raw;
        self.begin_disc_raw_idx = raw;
        self.end_disc_raw_idx = self.fields.len() - self.n_bool;
        self.begin_bit_raw_idx = self.end_disc_raw_idx;
        self.end_bit_raw_idx = self.fields.len();
        self.n_disc_fields = self.end_disc_raw_idx - self.begin_disc_raw_idx;
    }
}

impl Default for FieldLayout {
    fn default() -> Self {
        Self::new()
    }
}

fn align_to_word(bit: usize) -> usize {
    bit.div_ceil(BITS_PER_WORD) * BITS_PER_WORD
}

// Places a field at `bit`, moving it to the next word if it would straddle.
// A zero-width field on a word boundary stays at the end of the previous word.
fn place(bit: usize, width: usize) -> Field {
    let offset = bit % BITS_PER_WORD;
    if width == 0 && offset == 0 && bit > 0 {
        Field::new(0, bit / BITS_PER_WORD - 1, BITS_PER_WORD)
    } else if offset + width > BITS_PER_WORD {
        Field::new(width, bit / BITS_PER_WORD + 1, 0)
    } else {
        Field::new(width, bit / BITS_PER_WORD, offset)
    }
}
