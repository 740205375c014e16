//! Random sampling of a neighborhood without duplicates.

use std::collections::HashSet;

use knobforge_core::{FieldLayout, Instance, PackedWord};
use rand::Rng;
use smallvec::SmallVec;
use tracing::trace;

use crate::contin::{redraw_contins_marked, ChangedContin};
use crate::enumerate::{mutable_positions, step_value};

// Identity of a sampled instance: packed words plus the bit patterns of its
// continuous values.
type SampleKey = (Vec<PackedWord>, Vec<u64>);

fn sample_key(inst: &Instance) -> SampleKey {
    (
        inst.packed().to_vec(),
        inst.contin().iter().map(|c| c.to_bits()).collect(),
    )
}

/// Fills every slot of `out` with a distinct random neighbor of `center` at
/// distance `dist` and returns `out.len()`.
///
/// Each draw picks `dist` distinct mutable positions uniformly (partial
/// Fisher-Yates) and moves each to a uniformly drawn different legal value;
/// continuous knobs are then redrawn with
/// [`generate_contin_neighbor`](crate::generate_contin_neighbor). Draws
/// that repeat an earlier sample are rejected.
///
/// The caller must ask for fewer samples than the neighborhood holds (see
/// [`count_neighborhood_size`](crate::count_neighborhood_size)); otherwise
/// this does not terminate.
///
/// # Panics
/// Panics if `dist` exceeds the number of positions that can change and
/// `out` is not empty.
pub fn sample_from_neighborhood<R: Rng + ?Sized>(
    layout: &mut FieldLayout,
    center: &Instance,
    dist: usize,
    out: &mut [Instance],
    rng: &mut R,
) -> usize {
    draw_neighbors(layout, center, dist, out, None, rng)
}

/// Like [`sample_from_neighborhood`], also appending one row per sampled
/// instance to `changed`.
pub fn sample_from_neighborhood_marked<R: Rng + ?Sized>(
    layout: &mut FieldLayout,
    center: &Instance,
    dist: usize,
    out: &mut [Instance],
    changed: &mut ChangedContin,
    rng: &mut R,
) -> usize {
    draw_neighbors(layout, center, dist, out, Some(changed), rng)
}

pub(crate) fn draw_neighbors<R: Rng + ?Sized>(
    layout: &mut FieldLayout,
    center: &Instance,
    dist: usize,
    out: &mut [Instance],
    mut changed: Option<&mut ChangedContin>,
    rng: &mut R,
) -> usize {
    if out.is_empty() {
        return 0;
    }
    let mut positions = mutable_positions(layout);
    assert!(
        dist <= positions.len(),
        "cannot change {dist} of {} mutable positions",
        positions.len()
    );

    let mut seen: HashSet<SampleKey> = HashSet::with_capacity(out.len());
    let mut marks: SmallVec<[bool; 8]> = SmallVec::from_elem(false, layout.n_contin_fields());
    let mut rejected = 0usize;
    for slot in out.iter_mut() {
        loop {
            let mut candidate = center.clone();
            for i in 0..dist {
                let j = rng.random_range(i..positions.len());
                positions.swap(i, j);
                let raw = positions[i];
                let multy = layout.multiplicity(raw);
                let value = layout.get_raw(center.packed(), raw);
                let moved = step_value(value, rng.random_range(1..multy), multy);
                layout.set_raw(candidate.packed_mut(), raw, moved);
            }
            redraw_contins_marked(layout, &mut candidate, dist, &mut marks, rng);

            if seen.insert(sample_key(&candidate)) {
                *slot = candidate;
                if let Some(changed) = changed.as_deref_mut() {
                    changed.push_row(&marks);
                }
                break;
            }
            rejected += 1;
        }
    }

    trace!(
        event = "neighborhood_sampled",
        distance = dist,
        sampled = out.len(),
        rejected = rejected,
    );
    out.len()
}
