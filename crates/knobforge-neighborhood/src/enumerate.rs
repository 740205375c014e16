//! Exhaustive enumeration of a neighborhood.

use knobforge_core::{Disc, FieldLayout, Instance, Multiplicity};
use rand::Rng;
use smallvec::SmallVec;
use tracing::trace;

use crate::contin::{redraw_contins_marked, ChangedContin};

/// Raw indices a neighbor may change: every disc and bit field with more
/// than one legal value. Term fields are never changed.
pub(crate) fn mutable_positions(layout: &FieldLayout) -> Vec<usize> {
    (layout.begin_disc_raw_idx()..layout.end_bit_raw_idx())
        .filter(|&idx| layout.multiplicity(idx) > 1)
        .collect()
}

/// The value `step` places after `value` in a cycle of `multy` values.
#[inline]
pub(crate) fn step_value(value: Disc, step: Disc, multy: Multiplicity) -> Disc {
    ((u64::from(value) + u64::from(step)) % u64::from(multy)) as Disc
}

/// Iterator over every discrete neighbor of a center at one distance.
///
/// Yields each instance that differs from the center in exactly `dist` of
/// the [mutable positions](mutable_positions), once. Changed position sets
/// are visited in lexicographic order; within a set, the replacement values
/// cycle like an odometer, last position fastest. Continuous values are
/// copied from the center.
#[derive(Debug, Clone)]
pub struct Neighbors<'a> {
    layout: &'a FieldLayout,
    center: &'a Instance,
    positions: Vec<usize>,
    // Indices into `positions`, strictly increasing.
    chosen: SmallVec<[usize; 8]>,
    // Per chosen position, the step from the center's value, in 1..multiplicity.
    steps: SmallVec<[Disc; 8]>,
    done: bool,
}

impl<'a> Neighbors<'a> {
    pub fn new(layout: &'a FieldLayout, center: &'a Instance, dist: usize) -> Self {
        let positions = mutable_positions(layout);
        let done = dist > positions.len();
        Self {
            layout,
            center,
            positions,
            chosen: (0..dist).collect(),
            steps: SmallVec::from_elem(1, dist),
            done,
        }
    }

    fn current(&self) -> Instance {
        let mut inst = self.center.clone();
        for (&pos, &step) in self.chosen.iter().zip(&self.steps) {
            let raw = self.positions[pos];
            let multy = self.layout.multiplicity(raw);
            let value = step_value(self.layout.get_raw(self.center.packed(), raw), step, multy);
            self.layout.set_raw(inst.packed_mut(), raw, value);
        }
        inst
    }

    // Moves to the next value assignment, then to the next position set.
    fn step(&mut self) {
        for i in (0..self.steps.len()).rev() {
            let multy = self.layout.multiplicity(self.positions[self.chosen[i]]);
            self.steps[i] += 1;
            if self.steps[i] < multy {
                return;
            }
            self.steps[i] = 1;
        }

        let k = self.chosen.len();
        let n = self.positions.len();
        let Some(i) = (0..k).rev().find(|&i| self.chosen[i] < n - k + i) else {
            self.done = true;
            return;
        };
        self.chosen[i] += 1;
        for j in i + 1..k {
            self.chosen[j] = self.chosen[j - 1] + 1;
        }
    }
}

impl Iterator for Neighbors<'_> {
    type Item = Instance;

    fn next(&mut self) -> Option<Instance> {
        if self.done {
            return None;
        }
        let inst = self.current();
        self.step();
        Some(inst)
    }
}

/// Fills `out` with neighbors of `center` at distance `dist`, in
/// [`Neighbors`] order, and returns how many slots were written.
///
/// Without continuous knobs, stops early when the neighborhood runs out.
/// With continuous knobs every slot is written: discrete neighbors are
/// reused cyclically, and every continuous knob of every written instance
/// is redrawn with [`generate_contin_neighbor`](crate::generate_contin_neighbor).
///
/// # Example
///
/// ```
/// use knobforge_core::{FieldLayout, Instance, Spec};
/// use knobforge_neighborhood::generate_all_in_neighborhood;
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
///
/// let mut layout = FieldLayout::repeated(Spec::bit(), 3).unwrap();
/// let center = layout.new_instance();
/// let mut out = vec![Instance::default(); 3];
/// let mut rng = ChaCha8Rng::seed_from_u64(0);
///
/// let written = generate_all_in_neighborhood(&mut layout, &center, 1, &mut out, &mut rng);
/// assert_eq!(written, 3);
/// assert!(out.iter().all(|n| layout.hamming_distance(&center, n) == 1));
/// ```
pub fn generate_all_in_neighborhood<R: Rng + ?Sized>(
    layout: &mut FieldLayout,
    center: &Instance,
    dist: usize,
    out: &mut [Instance],
    rng: &mut R,
) -> usize {
    fill_neighborhood(layout, center, dist, out, None, rng)
}

/// Like [`generate_all_in_neighborhood`], also appending one row per written
/// instance to `changed`.
pub fn generate_all_in_neighborhood_marked<R: Rng + ?Sized>(
    layout: &mut FieldLayout,
    center: &Instance,
    dist: usize,
    out: &mut [Instance],
    changed: &mut ChangedContin,
    rng: &mut R,
) -> usize {
    fill_neighborhood(layout, center, dist, out, Some(changed), rng)
}

pub(crate) fn fill_neighborhood<R: Rng + ?Sized>(
    layout: &mut FieldLayout,
    center: &Instance,
    dist: usize,
    out: &mut [Instance],
    mut changed: Option<&mut ChangedContin>,
    rng: &mut R,
) -> usize {
    let mut written = 0;
    for (slot, neighbor) in out.iter_mut().zip(Neighbors::new(layout, center, dist)) {
        *slot = neighbor;
        written += 1;
    }

    if layout.n_contin_fields() > 0 && written > 0 {
        let shapes = written;
        let (head, tail) = out.split_at_mut(shapes);
        for (i, slot) in tail.iter_mut().enumerate() {
            slot.clone_from(&head[i % shapes]);
        }
        written = out.len();
    }

    let mut marks: SmallVec<[bool; 8]> = SmallVec::from_elem(false, layout.n_contin_fields());
    for inst in &mut out[..written] {
        redraw_contins_marked(layout, inst, dist, &mut marks, rng);
        if let Some(changed) = changed.as_deref_mut() {
            changed.push_row(&marks);
        }
    }

    trace!(
        event = "neighborhood_enumerated",
        distance = dist,
        requested = out.len(),
        written = written,
    );
    written
}
