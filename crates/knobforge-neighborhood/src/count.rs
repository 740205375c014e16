//! Overflow-safe neighborhood counting.
//!
//! Counts how many instances lie at exactly distance `d` from a center
//! without materializing them. Every count takes a `max_count` budget: the
//! result is either exact or some value greater than `max_count`, which only
//! certifies that the neighborhood is larger than the budget.
//!
//! The distance is measured over the disc and bit zones. Term knobs are
//! skipped: their neighbors are not counted.

use knobforge_core::{FieldLayout, Instance};
use num_traits::ToPrimitive;

/// Binomial coefficient `C(n, k)`, computed in floating point.
///
/// Never panics: a result too large for `usize` saturates to `usize::MAX`,
/// and `k > n` yields 0.
///
/// ```
/// use knobforge_neighborhood::safe_binomial_coefficient;
///
/// assert_eq!(safe_binomial_coefficient(5, 2), 10);
/// assert_eq!(safe_binomial_coefficient(2, 5), 0);
/// assert_eq!(safe_binomial_coefficient(1000, 500), usize::MAX);
/// ```
pub fn safe_binomial_coefficient(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut result = 1.0f64;
    for i in 0..k {
        result = result * (n - i) as f64 / (i + 1) as f64;
    }
    result.round().to_usize().unwrap_or(usize::MAX)
}

/// Counts the discrete neighbors of an instance at distance `dist`,
/// considering only raw fields from `start` onwards.
///
/// At each disc field the count is the neighbors that leave it unchanged plus
/// `multiplicity - 1` times the neighbors that change it; the trailing
/// booleans contribute `C(remaining, d)`. The fields are folded from the end
/// of the disc zone backwards, keeping one partial count per distance, so
/// the work is `O(fields * dist)` with no recursion.
///
/// Stops early once the total exceeds `max_count`. Continuous knobs are not
/// included; see [`count_contin_neighborhood`].
pub fn count_neighborhood_size_from_index(
    layout: &FieldLayout,
    _inst: &Instance,
    dist: usize,
    start: usize,
    max_count: usize,
) -> usize {
    if dist == 0 {
        return 1;
    }

    // TODO: count term-algebra neighbors once terms can be mutated.
    let start = start.max(layout.end_term_raw_idx());
    let end_disc = layout.end_disc_raw_idx();
    let end_bit = layout.end_bit_raw_idx();
    if start >= end_bit || dist > end_bit - start {
        return 0;
    }

    let n_bits = end_bit - start.max(end_disc);
    if start >= end_disc {
        return safe_binomial_coefficient(n_bits, dist);
    }

    // by_dist[k]: neighbors at distance k over the fields folded so far.
    let mut by_dist: Vec<usize> = (0..=dist)
        .map(|k| safe_binomial_coefficient(n_bits, k))
        .collect();
    for raw in (start..end_disc).rev() {
        let others = (layout.multiplicity(raw) as usize).saturating_sub(1);
        if others > 0 {
            for k in (1..=dist).rev() {
                by_dist[k] = by_dist[k].saturating_add(others.saturating_mul(by_dist[k - 1]));
            }
        }
        if by_dist[dist] > max_count {
            break;
        }
    }
    by_dist[dist]
}

/// Scales a discrete neighbor count by the continuous knobs.
///
/// Each continuous knob at distance `dist` contributes a factor of
/// `2^dist`. If the product would exceed `max_count`, returns
/// `max_count + 1` (saturating) instead.
pub fn count_contin_neighborhood(
    layout: &FieldLayout,
    dist: usize,
    base_count: usize,
    max_count: usize,
) -> usize {
    let length_bits = layout.n_contin_fields().saturating_mul(dist);
    if length_bits == 0 || base_count == 0 {
        return base_count;
    }

    let headroom = (max_count as f64).log2() - (base_count as f64).log2();
    if length_bits as f64 > headroom {
        return max_count.saturating_add(1);
    }
    u32::try_from(length_bits)
        .ok()
        .and_then(|shift| 1usize.checked_shl(shift))
        .and_then(|factor| base_count.checked_mul(factor))
        .unwrap_or_else(|| max_count.saturating_add(1))
}

/// Number of instances at distance `dist` from `inst`.
///
/// Returns the exact size, or a value greater than `max_count` meaning "at
/// least this many". Only the shape of `inst` matters.
///
/// # Example
///
/// ```
/// use knobforge_core::{FieldLayout, Spec};
/// use knobforge_neighborhood::count_neighborhood_size;
///
/// let layout = FieldLayout::from_specs(vec![
///     Spec::bit(), Spec::bit(), Spec::bit(), Spec::disc(4),
/// ]).unwrap();
/// let center = layout.new_instance();
///
/// // Three single-bit flips plus three other values for the disc.
/// assert_eq!(count_neighborhood_size(&layout, &center, 1, 100), 6);
/// ```
pub fn count_neighborhood_size(
    layout: &FieldLayout,
    inst: &Instance,
    dist: usize,
    max_count: usize,
) -> usize {
    debug_assert!(layout.check_instance(inst).is_ok());
    let discrete = count_neighborhood_size_from_index(layout, inst, dist, 0, max_count);
    if discrete > max_count {
        return discrete;
    }
    count_contin_neighborhood(layout, dist, discrete, max_count)
}

/// Like [`count_neighborhood_size`], for a zero-valued instance of the
/// layout's shape.
pub fn count_neighborhood_size_of_shape(
    layout: &FieldLayout,
    dist: usize,
    max_count: usize,
) -> usize {
    count_neighborhood_size(layout, &layout.new_instance(), dist, max_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use knobforge_core::Spec;
    use knobforge_test::{layout_of, LabelTree};

    #[test]
    fn test_binomial_coefficient() {
        assert_eq!(safe_binomial_coefficient(0, 0), 1);
        assert_eq!(safe_binomial_coefficient(7, 0), 1);
        assert_eq!(safe_binomial_coefficient(7, 7), 1);
        assert_eq!(safe_binomial_coefficient(7, 3), 35);
        assert_eq!(safe_binomial_coefficient(10, 5), 252);
        assert_eq!(safe_binomial_coefficient(52, 5), 2_598_960);
        assert_eq!(safe_binomial_coefficient(3, 4), 0);
    }

    #[test]
    fn test_binomial_coefficient_saturates() {
        assert_eq!(safe_binomial_coefficient(1000, 500), usize::MAX);
        assert_eq!(safe_binomial_coefficient(5000, 2500), usize::MAX);
    }

    #[test]
    fn test_distance_zero_is_the_center() {
        let layout = layout_of(&[Spec::disc(5), Spec::bit(), Spec::contin(1.0, 3)]);
        assert_eq!(count_neighborhood_size_of_shape(&layout, 0, 10), 1);
        assert_eq!(count_neighborhood_size_of_shape(&FieldLayout::new(), 0, 10), 1);
    }

    #[test]
    fn test_booleans_only() {
        let layout = FieldLayout::repeated(Spec::bit(), 6).unwrap();
        for d in 0..=6 {
            assert_eq!(
                count_neighborhood_size_of_shape(&layout, d, usize::MAX),
                safe_binomial_coefficient(6, d)
            );
        }
        assert_eq!(count_neighborhood_size_of_shape(&layout, 7, usize::MAX), 0);
    }

    #[test]
    fn test_discs_and_booleans() {
        let layout = layout_of(&[Spec::bit(), Spec::bit(), Spec::bit(), Spec::disc(4)]);
        let center = layout.new_instance();
        assert_eq!(count_neighborhood_size(&layout, &center, 1, 100), 6);
        // 3 bit pairs, plus 3 disc values times 3 single flips.
        assert_eq!(count_neighborhood_size(&layout, &center, 2, 100), 12);
        // 1 bit triple, plus 3 disc values times 3 bit pairs.
        assert_eq!(count_neighborhood_size(&layout, &center, 3, 100), 10);
        assert_eq!(count_neighborhood_size(&layout, &center, 4, 100), 3);
        assert_eq!(count_neighborhood_size(&layout, &center, 5, 100), 0);
    }

    #[test]
    fn test_empty_layout_has_no_neighbors() {
        assert_eq!(count_neighborhood_size_of_shape(&FieldLayout::new(), 1, 100), 0);
        assert_eq!(count_neighborhood_size_of_shape(&FieldLayout::new(), 3, 100), 0);
    }

    #[test]
    fn test_terms_are_skipped() {
        let layout = layout_of(&[LabelTree::sample().spec(), Spec::bit(), Spec::bit()]);
        assert_eq!(count_neighborhood_size_of_shape(&layout, 1, 100), 2);
        assert_eq!(count_neighborhood_size_of_shape(&layout, 2, 100), 1);
    }

    #[test]
    fn test_single_valued_discs_never_change() {
        let layout = layout_of(&[Spec::disc(1), Spec::disc(1), Spec::bit(), Spec::bit()]);
        assert_eq!(count_neighborhood_size_of_shape(&layout, 1, 100), 2);
        assert_eq!(count_neighborhood_size_of_shape(&layout, 3, 100), 0);
    }

    #[test]
    fn test_budget_stops_counting() {
        let layout = FieldLayout::repeated(Spec::disc(10), 20).unwrap();
        let exact = count_neighborhood_size_of_shape(&layout, 2, usize::MAX);
        assert_eq!(exact, safe_binomial_coefficient(20, 2) * 81);
        assert!(count_neighborhood_size_of_shape(&layout, 2, 100) > 100);
        assert!(count_neighborhood_size_of_shape(&layout, 8, 1000) > 1000);
    }

    #[test]
    fn test_large_neighborhoods_saturate() {
        let layout = FieldLayout::repeated(Spec::disc(1000), 20).unwrap();
        let count = count_neighborhood_size_of_shape(&layout, 7, usize::MAX);
        assert_eq!(count, usize::MAX);
    }

    #[test]
    fn test_many_discs_count_without_deep_recursion() {
        let layout = FieldLayout::repeated(Spec::disc(3), 50_000).unwrap();
        assert_eq!(count_neighborhood_size_of_shape(&layout, 1, usize::MAX), 100_000);
        assert_eq!(
            count_neighborhood_size_of_shape(&layout, 2, usize::MAX),
            safe_binomial_coefficient(50_000, 2) * 4
        );
        assert!(count_neighborhood_size_of_shape(&layout, 3, 1_000) > 1_000);
    }

    #[test]
    fn test_counting_from_a_later_field() {
        let layout = layout_of(&[Spec::disc(4), Spec::disc(3), Spec::bit(), Spec::bit()]);
        let center = layout.new_instance();
        // disc(3) and both bits remain: 2 + 1 + 1 at distance 1.
        assert_eq!(count_neighborhood_size_from_index(&layout, &center, 1, 1, 100), 4);
        // Only the bits remain.
        assert_eq!(count_neighborhood_size_from_index(&layout, &center, 2, 2, 100), 1);
        assert_eq!(count_neighborhood_size_from_index(&layout, &center, 3, 2, 100), 0);
        assert_eq!(count_neighborhood_size_from_index(&layout, &center, 1, 4, 100), 0);
    }

    #[test]
    fn test_contin_factor() {
        let one = layout_of(&[Spec::bit(), Spec::bit(), Spec::contin(1.0, 3)]);
        assert_eq!(count_neighborhood_size_of_shape(&one, 1, 1000), 4);
        assert_eq!(count_neighborhood_size_of_shape(&one, 2, 1000), 4);

        let two = layout_of(&[
            Spec::bit(),
            Spec::bit(),
            Spec::contin(1.0, 3),
            Spec::contin(2.0, 3),
        ]);
        assert_eq!(count_neighborhood_size_of_shape(&two, 1, 1000), 8);
    }

    #[test]
    fn test_contin_factor_over_budget() {
        let mut specs = vec![Spec::bit(), Spec::bit()];
        specs.extend((1..=10).map(|i| Spec::contin(i as f64, 3)));
        let layout = layout_of(&specs);
        assert_eq!(count_neighborhood_size_of_shape(&layout, 1, 100), 101);
        assert_eq!(count_contin_neighborhood(&layout, 1, 2, usize::MAX), 2048);
        assert_eq!(count_contin_neighborhood(&layout, 7, 2, usize::MAX), usize::MAX);
    }

    #[test]
    fn test_contin_factor_edge_cases() {
        let layout = layout_of(&[Spec::contin(1.0, 3)]);
        assert_eq!(count_contin_neighborhood(&layout, 0, 5, 100), 5);
        assert_eq!(count_contin_neighborhood(&layout, 3, 0, 100), 0);
        assert_eq!(count_contin_neighborhood(&FieldLayout::new(), 3, 5, 100), 5);
        assert_eq!(count_neighborhood_size_of_shape(&layout, 1, 100), 0);
    }
}
