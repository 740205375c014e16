//! Knob specifications.
//!
//! A [`Spec`] describes one knob kind. Specs are turned into raw fields once,
//! when a [`FieldLayout`](crate::FieldLayout) is built; nothing dispatches on
//! the spec kind per access afterwards.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use rand::Rng;

use crate::error::{KnobError, Result};
use crate::instance::{nbits_to_pack, Contin, Disc, BITS_PER_WORD};
use crate::term::TermAlgebra;

/// Number of legal values of a discrete knob.
pub type Multiplicity = u32;

/// A knob specification: one of the three knob kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum Spec {
    Term(TermSpec),
    Contin(ContinSpec),
    Disc(DiscSpec),
}

impl Spec {
    /// Builds a discrete spec with `multiplicity` legal values.
    pub fn disc(multiplicity: Multiplicity) -> Self {
        Spec::Disc(DiscSpec::new(multiplicity))
    }

    /// Builds a boolean (multiplicity 2) discrete spec.
    pub fn bit() -> Self {
        Spec::Disc(DiscSpec::new(2))
    }

    /// Builds a continuous spec.
    pub fn contin(start_value: Contin, depth: u32) -> Self {
        Spec::Contin(ContinSpec::new(start_value, depth))
    }

    /// Builds a term spec over `tree`.
    pub fn term(tree: Arc<dyn TermAlgebra>) -> Self {
        Spec::Term(TermSpec::new(tree))
    }

    /// Validates the spec before it is laid out.
    pub fn validate(&self) -> Result<()> {
        match self {
            Spec::Disc(d) if d.multiplicity == 0 => Err(KnobError::ZeroMultiplicity),
            Spec::Term(t) if t.width() > BITS_PER_WORD => Err(KnobError::TermTooWide {
                branching: t.branching,
                width: t.width(),
            }),
            _ => Ok(()),
        }
    }

    fn kind_rank(&self) -> u8 {
        match self {
            Spec::Term(_) => 0,
            Spec::Contin(_) => 1,
            Spec::Disc(_) => 2,
        }
    }

    /// Layout order: terms, then contins, then discs. Within a kind, larger
    /// knobs come first and booleans always come last.
    pub(crate) fn layout_order(&self, other: &Spec) -> Ordering {
        match (self, other) {
            (Spec::Term(a), Spec::Term(b)) => b.size().cmp(&a.size()),
            (Spec::Contin(a), Spec::Contin(b)) => b.space.total_cmp(&a.space),
            (Spec::Disc(a), Spec::Disc(b)) => a
                .is_bool()
                .cmp(&b.is_bool())
                .then(b.multiplicity.cmp(&a.multiplicity)),
            _ => self.kind_rank().cmp(&other.kind_rank()),
        }
    }
}

impl fmt::Display for Spec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Spec::Term(t) => write!(f, "term(depth={}, branching={})", t.depth, t.branching),
            Spec::Contin(c) => write!(f, "contin(space={}, total={})", c.space, c.total_space),
            Spec::Disc(d) if d.is_bool() => write!(f, "bit"),
            Spec::Disc(d) => write!(f, "disc({})", d.multiplicity),
        }
    }
}

/// Specification of a discrete knob.
///
/// Discrete specs are in one-to-one correspondence with raw fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiscSpec {
    pub multiplicity: Multiplicity,
}

impl DiscSpec {
    pub fn new(multiplicity: Multiplicity) -> Self {
        Self { multiplicity }
    }

    /// Whether this knob is a boolean, stored in the trailing bit zone.
    pub fn is_bool(&self) -> bool {
        self.multiplicity == 2
    }

    /// Bits needed to store one value.
    pub fn width(&self) -> usize {
        nbits_to_pack(self.multiplicity as usize)
    }
}

/// Specification of a continuous knob.
///
/// The value itself is stored in the instance's continuous sequence. The
/// spec carries the search state shared by every instance using it: the
/// current search radius and a queue of "likely" values to replay.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContinSpec {
    space: Contin,
    total_space: Contin,
    likely: Vec<Contin>,
}

impl ContinSpec {
    /// Creates a spec whose search radius starts at `start_value` and whose
    /// total search space is `2^depth`.
    pub fn new(start_value: Contin, depth: u32) -> Self {
        Self {
            space: start_value,
            total_space: 2f64.powi(depth as i32),
            likely: Vec::new(),
        }
    }

    /// Current search radius.
    pub fn space(&self) -> Contin {
        self.space
    }

    /// Total search space.
    pub fn total_space(&self) -> Contin {
        self.total_space
    }

    /// Values queued for replay, most recent last.
    pub fn likely(&self) -> &[Contin] {
        &self.likely
    }

    /// Returns the current radius and widens the search to the total space.
    pub fn get_start(&mut self) -> Contin {
        std::mem::replace(&mut self.space, self.total_space)
    }

    /// Produces a replacement value for a knob at distance `dist`.
    ///
    /// Replays the most recently queued likely value if there is one;
    /// otherwise draws uniformly from `(-space * dist, space * dist)`.
    pub fn get_new<R: Rng + ?Sized>(
        &mut self,
        _current: Contin,
        dist: usize,
        rng: &mut R,
    ) -> Contin {
        match self.likely.pop() {
            Some(value) => value,
            None => Self::rand_at_space(self.space * dist as Contin, rng),
        }
    }

    /// Uniform draw from the symmetric interval `(-space, space)`.
    pub fn rand_at_space<R: Rng + ?Sized>(space: Contin, rng: &mut R) -> Contin {
        let sign = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
        rng.random::<Contin>() * sign * space
    }

    /// Narrows the search: forgets replay values and halves the radius.
    pub fn compress(&mut self) {
        self.likely.clear();
        self.space /= 2.0;
    }

    /// Queues a value to replay on the next [`get_new`](Self::get_new).
    pub fn set_likely(&mut self, value: Contin) {
        self.likely.push(value);
    }
}

// Identity of a contin spec is its current radius.
impl PartialEq for ContinSpec {
    fn eq(&self, other: &Self) -> bool {
        self.space == other.space
    }
}

/// Specification of a term-algebra knob.
///
/// A term knob occupies `depth` raw fields, each wide enough for
/// `branching` choices.
#[derive(Debug, Clone)]
pub struct TermSpec {
    tree: Arc<dyn TermAlgebra>,
    pub depth: usize,
    pub branching: usize,
}

impl TermSpec {
    /// Raw choice that stops descending.
    pub const STOP: Disc = 0;

    pub fn new(tree: Arc<dyn TermAlgebra>) -> Self {
        let depth = tree.max_depth();
        let branching = (1 + tree.max_branching()).next_power_of_two();
        Self {
            tree,
            depth,
            branching,
        }
    }

    pub fn tree(&self) -> &dyn TermAlgebra {
        self.tree.as_ref()
    }

    /// Bits per raw position.
    pub fn width(&self) -> usize {
        nbits_to_pack(self.branching)
    }

    pub fn to_child_idx(d: Disc) -> Disc {
        d - 1
    }

    pub fn from_child_idx(d: Disc) -> Disc {
        d + 1
    }

    fn size(&self) -> usize {
        self.depth * self.branching
    }
}

impl PartialEq for TermSpec {
    fn eq(&self, other: &Self) -> bool {
        self.depth == other.depth
            && self.branching == other.branching
            && std::ptr::addr_eq(Arc::as_ptr(&self.tree), Arc::as_ptr(&other.tree))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[derive(Debug)]
    struct Shape(usize, usize);

    impl TermAlgebra for Shape {
        fn max_depth(&self) -> usize {
            self.0
        }
        fn max_branching(&self) -> usize {
            self.1
        }
        fn decode(&self, _path: &[Disc]) -> Option<&str> {
            None
        }
    }

    #[test]
    fn test_disc_width() {
        assert_eq!(DiscSpec::new(2).width(), 1);
        assert_eq!(DiscSpec::new(3).width(), 2);
        assert_eq!(DiscSpec::new(17).width(), 5);
        assert!(DiscSpec::new(2).is_bool());
        assert!(!DiscSpec::new(3).is_bool());
    }

    #[test]
    fn test_term_branching_is_power_of_two() {
        let spec = TermSpec::new(Arc::new(Shape(3, 2)));
        assert_eq!(spec.depth, 3);
        assert_eq!(spec.branching, 4);
        assert_eq!(spec.width(), 2);

        let spec = TermSpec::new(Arc::new(Shape(2, 3)));
        assert_eq!(spec.branching, 4);
    }

    #[test]
    fn test_term_equality_is_by_tree_identity() {
        let tree: Arc<dyn TermAlgebra> = Arc::new(Shape(2, 1));
        let a = TermSpec::new(tree.clone());
        let b = TermSpec::new(tree);
        let c = TermSpec::new(Arc::new(Shape(2, 1)));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_validate() {
        assert_eq!(Spec::disc(0).validate(), Err(KnobError::ZeroMultiplicity));
        assert!(Spec::disc(5).validate().is_ok());
        assert!(Spec::contin(1.0, 3).validate().is_ok());
    }

    #[test]
    fn test_layout_order() {
        let mut specs = [
            Spec::bit(),
            Spec::disc(1),
            Spec::contin(0.5, 2),
            Spec::disc(3),
            Spec::contin(2.0, 2),
            Spec::disc(7),
        ];
        specs.sort_by(|a, b| a.layout_order(b));
        let rendered: Vec<String> = specs.iter().map(|s| s.to_string()).collect();
        assert_eq!(
            rendered,
            vec![
                "contin(space=2, total=4)",
                "contin(space=0.5, total=4)",
                "disc(7)",
                "disc(3)",
                "disc(1)",
                "bit",
            ]
        );
    }

    #[test]
    fn test_contin_get_start_widens() {
        let mut spec = ContinSpec::new(0.25, 3);
        assert_eq!(spec.total_space(), 8.0);
        assert_eq!(spec.get_start(), 0.25);
        assert_eq!(spec.space(), 8.0);
    }

    #[test]
    fn test_contin_get_new_replays_likely_first() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut spec = ContinSpec::new(1.0, 2);
        spec.set_likely(3.5);
        spec.set_likely(-1.25);
        assert_eq!(spec.get_new(0.0, 1, &mut rng), -1.25);
        assert_eq!(spec.get_new(0.0, 1, &mut rng), 3.5);
        assert!(spec.likely().is_empty());
    }

    #[test]
    fn test_contin_get_new_stays_in_scaled_interval() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut spec = ContinSpec::new(0.5, 2);
        for _ in 0..200 {
            let v = spec.get_new(0.0, 3, &mut rng);
            assert!(v.abs() < 1.5);
        }
    }

    #[test]
    fn test_contin_compress() {
        let mut spec = ContinSpec::new(4.0, 2);
        spec.set_likely(1.0);
        spec.compress();
        assert_eq!(spec.space(), 2.0);
        assert!(spec.likely().is_empty());
    }
}
