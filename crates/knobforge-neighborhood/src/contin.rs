//! Continuous knob mutation.

use knobforge_core::{Contin, ContinSpec, FieldLayout, Instance};
use rand::Rng;

/// Moves one continuous knob to a neighbor at distance `dist`.
///
/// Distance 0 leaves `value` untouched. Otherwise the new value comes from
/// the spec: its most recently queued likely value if there is one, else a
/// uniform draw from `(-space * dist, space * dist)`.
pub fn generate_contin_neighbor<R: Rng + ?Sized>(
    spec: &mut ContinSpec,
    value: &mut Contin,
    dist: usize,
    rng: &mut R,
) {
    if dist == 0 {
        return;
    }
    *value = spec.get_new(*value, dist, rng);
}

/// Applies [`generate_contin_neighbor`] to every continuous knob of `inst`.
pub fn redraw_contins<R: Rng + ?Sized>(
    layout: &mut FieldLayout,
    inst: &mut Instance,
    dist: usize,
    rng: &mut R,
) {
    for (idx, value) in inst.contin_mut().iter_mut().enumerate() {
        generate_contin_neighbor(layout.contin_spec_mut(idx), value, dist, rng);
    }
}

/// Like [`redraw_contins`], also setting `changed[i]` to whether the `i`th
/// continuous knob ended up with a different value.
///
/// # Panics
/// Panics if `changed` is not one flag per continuous knob of `inst`.
pub fn redraw_contins_marked<R: Rng + ?Sized>(
    layout: &mut FieldLayout,
    inst: &mut Instance,
    dist: usize,
    changed: &mut [bool],
    rng: &mut R,
) {
    assert_eq!(
        changed.len(),
        inst.contin_len(),
        "one changed flag per continuous knob"
    );
    for (idx, (value, mark)) in inst.contin_mut().iter_mut().zip(changed).enumerate() {
        let before = *value;
        generate_contin_neighbor(layout.contin_spec_mut(idx), value, dist, rng);
        *mark = *value != before;
    }
}

/// Which continuous knobs changed in each generated instance.
///
/// Holds one row per instance, in generation order, with one flag per
/// continuous knob. Callers use it to feed successful moves back into
/// [`ContinSpec::set_likely`].
///
/// # Example
///
/// ```
/// use knobforge_core::{FieldLayout, Spec};
/// use knobforge_neighborhood::{sample_new_instances_marked, ChangedContin, Deme};
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
///
/// let layout = FieldLayout::from_specs(vec![Spec::bit(), Spec::contin(1.0, 3)]).unwrap();
/// let center = layout.new_instance();
/// let mut deme = Deme::new(layout);
/// let mut changed = ChangedContin::new();
/// let mut rng = ChaCha8Rng::seed_from_u64(0);
///
/// let n = sample_new_instances_marked(
///     &mut deme, &center, 1, 5, None, 2, &mut changed, &mut rng,
/// );
/// assert_eq!(changed.len(), n);
/// assert_eq!(changed.row(0).len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangedContin {
    width: usize,
    rows: usize,
    marks: Vec<bool>,
}

impl ChangedContin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded instances.
    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Flags of the `idx`th recorded instance.
    ///
    /// # Panics
    /// Panics if `idx >= len()`.
    pub fn row(&self, idx: usize) -> &[bool] {
        assert!(idx < self.rows, "row {idx} of {} recorded", self.rows);
        &self.marks[idx * self.width..(idx + 1) * self.width]
    }

    /// Flags of every recorded instance, in order.
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> + '_ {
        (0..self.rows).map(move |idx| self.row(idx))
    }

    /// Whether the `idx`th recorded instance changed any continuous knob.
    pub fn any(&self, idx: usize) -> bool {
        self.row(idx).iter().any(|&m| m)
    }

    pub fn clear(&mut self) {
        self.rows = 0;
        self.marks.clear();
    }

    /// Appends the flags of one instance.
    ///
    /// # Panics
    /// Panics if `row` is not as wide as the rows already recorded.
    pub fn push_row(&mut self, row: &[bool]) {
        if self.rows == 0 {
            self.width = row.len();
        }
        assert_eq!(row.len(), self.width, "changed-contin rows differ in width");
        self.marks.extend_from_slice(row);
        self.rows += 1;
    }
}
