//! Candidate solution storage.
//!
//! An [`Instance`] is plain storage: a vector of packed words holding every
//! term, discrete and boolean knob, and a vector of continuous values. It has
//! no meaning on its own; a [`FieldLayout`](crate::FieldLayout) interprets it.

/// Storage word for packed discrete fields.
pub type PackedWord = u64;

/// Value of one discrete raw field.
pub type Disc = u32;

/// Value of one continuous knob.
pub type Contin = f64;

/// Number of bits in one [`PackedWord`].
pub const BITS_PER_WORD: usize = PackedWord::BITS as usize;

/// Number of bits needed to store `multiplicity` distinct values,
/// i.e. `ceil(log2(multiplicity))`.
///
/// A multiplicity of one (or zero) needs no bits at all.
///
/// ```
/// use knobforge_core::instance::nbits_to_pack;
///
/// assert_eq!(nbits_to_pack(1), 0);
/// assert_eq!(nbits_to_pack(2), 1);
/// assert_eq!(nbits_to_pack(4), 2);
/// assert_eq!(nbits_to_pack(5), 3);
/// ```
pub fn nbits_to_pack(multiplicity: usize) -> usize {
    if multiplicity <= 1 {
        0
    } else {
        (usize::BITS - (multiplicity - 1).leading_zeros()) as usize
    }
}

/// Mask covering the low `width` bits of a word.
#[inline]
pub(crate) fn low_mask(width: usize) -> PackedWord {
    if width >= BITS_PER_WORD {
        PackedWord::MAX
    } else {
        (1 << width) - 1
    }
}

/// One candidate solution's knob assignment.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Instance {
    packed: Vec<PackedWord>,
    contin: Vec<Contin>,
}

impl Instance {
    /// Creates a zeroed instance with `packed_width` words and
    /// `contin_count` continuous values.
    pub fn new(packed_width: usize, contin_count: usize) -> Self {
        Self {
            packed: vec![0; packed_width],
            contin: vec![0.0; contin_count],
        }
    }

    /// Creates an instance from existing storage.
    pub fn from_parts(packed: Vec<PackedWord>, contin: Vec<Contin>) -> Self {
        Self { packed, contin }
    }

    /// Number of packed words.
    pub fn size(&self) -> usize {
        self.packed.len()
    }

    /// Number of continuous values.
    pub fn contin_len(&self) -> usize {
        self.contin.len()
    }

    /// Resizes both storage vectors, zero-filling new slots.
    pub fn resize(&mut self, packed_width: usize, contin_count: usize) {
        self.packed.resize(packed_width, 0);
        self.contin.resize(contin_count, 0.0);
    }

    pub fn packed(&self) -> &[PackedWord] {
        &self.packed
    }

    pub fn packed_mut(&mut self) -> &mut [PackedWord] {
        &mut self.packed
    }

    pub fn contin(&self) -> &[Contin] {
        &self.contin
    }

    pub fn contin_mut(&mut self) -> &mut [Contin] {
        &mut self.contin
    }

    /// Borrows packed words and continuous values at the same time.
    pub fn split_mut(&mut self) -> (&mut [PackedWord], &mut [Contin]) {
        (&mut self.packed, &mut self.contin)
    }

    pub(crate) fn set_contin_from(&mut self, other: &Instance) {
        self.contin.clone_from(&other.contin);
    }
}
