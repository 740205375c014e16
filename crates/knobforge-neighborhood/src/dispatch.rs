//! Choosing between exhaustive enumeration and random sampling.

use std::fmt;

use knobforge_config::{KnobforgeConfig, SamplingConfig};
use knobforge_core::{FieldLayout, Instance};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::contin::ChangedContin;
use crate::count::count_neighborhood_size;
use crate::deme::Population;
use crate::enumerate::fill_neighborhood;
use crate::sample::draw_neighbors;

/// How many times larger than the request a size estimate must be before it
/// is used without recounting.
pub const DEFAULT_TRUST_FACTOR: usize = 2;

/// Appends up to `requested` neighbors of `center` at distance `dist` to
/// `population`, using [`DEFAULT_TRUST_FACTOR`].
///
/// See [`sample_new_instances_with`].
pub fn sample_new_instances<P, R>(
    population: &mut P,
    center: &Instance,
    dist: usize,
    requested: usize,
    estimate: Option<usize>,
    rng: &mut R,
) -> usize
where
    P: Population + ?Sized,
    R: Rng + ?Sized,
{
    sample_new_instances_with(
        population,
        center,
        dist,
        requested,
        estimate,
        DEFAULT_TRUST_FACTOR,
        rng,
    )
}

/// Appends up to `requested` neighbors of `center` at distance `dist` to
/// `population` and returns how many were appended.
///
/// The neighborhood size is `estimate` when one is given and it is at least
/// `trust_factor * requested`; otherwise it is counted with budget
/// `requested`. If the neighborhood is larger than the request, exactly
/// `requested` distinct random neighbors are sampled. Otherwise the whole
/// neighborhood is counted, enumerated, and its size is returned.
///
/// Existing instances are never modified; the population only grows, by
/// exactly the returned count.
///
/// # Example
///
/// ```
/// use knobforge_core::{FieldLayout, Spec};
/// use knobforge_neighborhood::{sample_new_instances, Deme, Population};
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
///
/// let layout = FieldLayout::from_specs(vec![
///     Spec::bit(), Spec::bit(), Spec::bit(), Spec::disc(4),
/// ]).unwrap();
/// let center = layout.new_instance();
/// let mut deme = Deme::new(layout);
/// let mut rng = ChaCha8Rng::seed_from_u64(42);
///
/// // Only 6 neighbors exist at distance 1.
/// assert_eq!(sample_new_instances(&mut deme, &center, 1, 100, None, &mut rng), 6);
/// assert_eq!(deme.len(), 6);
///
/// // Fewer requested than exist: sampled.
/// assert_eq!(sample_new_instances(&mut deme, &center, 1, 4, None, &mut rng), 4);
/// assert_eq!(deme.len(), 10);
/// ```
pub fn sample_new_instances_with<P, R>(
    population: &mut P,
    center: &Instance,
    dist: usize,
    requested: usize,
    estimate: Option<usize>,
    trust_factor: usize,
    rng: &mut R,
) -> usize
where
    P: Population + ?Sized,
    R: Rng + ?Sized,
{
    dispatch(population, center, dist, requested, estimate, trust_factor, None, rng)
}

/// Like [`sample_new_instances_with`], also appending to `changed` one row
/// per appended instance, flagging the continuous knobs it changed.
///
/// After the call, the last `n` rows of `changed` describe the last `n`
/// instances of `population`, where `n` is the returned count.
#[allow(clippy::too_many_arguments)]
pub fn sample_new_instances_marked<P, R>(
    population: &mut P,
    center: &Instance,
    dist: usize,
    requested: usize,
    estimate: Option<usize>,
    trust_factor: usize,
    changed: &mut ChangedContin,
    rng: &mut R,
) -> usize
where
    P: Population + ?Sized,
    R: Rng + ?Sized,
{
    dispatch(
        population,
        center,
        dist,
        requested,
        estimate,
        trust_factor,
        Some(changed),
        rng,
    )
}

#[allow(clippy::too_many_arguments)]
fn dispatch<P, R>(
    population: &mut P,
    center: &Instance,
    dist: usize,
    requested: usize,
    estimate: Option<usize>,
    trust_factor: usize,
    changed: Option<&mut ChangedContin>,
    rng: &mut R,
) -> usize
where
    P: Population + ?Sized,
    R: Rng + ?Sized,
{
    let trusted = estimate.filter(|&e| trust_factor.saturating_mul(requested) <= e);
    let mut total = match trusted {
        Some(estimate) => estimate,
        None => count_logged(population.layout(), center, dist, requested, estimate),
    };
    // A trusted estimate only selects sampling; an enumerated size is counted.
    if trusted.is_some() && requested >= total {
        total = count_logged(population.layout(), center, dist, requested, estimate);
    }

    let current = population.len();
    if requested < total {
        population.resize(current + requested);
        let (layout, instances) = population.split_mut();
        draw_neighbors(layout, center, dist, &mut instances[current..], changed, rng);
        debug!(
            event = "neighborhood_sample",
            distance = dist,
            appended = requested,
            total = total,
        );
        requested
    } else {
        population.resize(current + total);
        let (layout, instances) = population.split_mut();
        let written =
            fill_neighborhood(layout, center, dist, &mut instances[current..], changed, rng);
        debug_assert_eq!(written, total, "neighborhood count disagrees with enumeration");
        population.resize(current + written);
        debug!(
            event = "neighborhood_enumerate",
            distance = dist,
            appended = written,
            requested = requested,
        );
        written
    }
}

fn count_logged(
    layout: &FieldLayout,
    center: &Instance,
    dist: usize,
    budget: usize,
    estimate: Option<usize>,
) -> usize {
    let counted = count_neighborhood_size(layout, center, dist, budget);
    debug!(
        event = "neighborhood_count",
        distance = dist,
        budget = budget,
        estimate = ?estimate,
        count = counted,
    );
    counted
}

/// Neighborhood sampling with its own seeded generator and settings.
///
/// # Example
///
/// ```
/// use knobforge_config::KnobforgeConfig;
/// use knobforge_core::{FieldLayout, Spec};
/// use knobforge_neighborhood::{Deme, NeighborhoodSampler, Population};
///
/// let config = KnobforgeConfig::new().with_random_seed(7);
/// let mut sampler = NeighborhoodSampler::from_config(&config);
///
/// let layout = FieldLayout::repeated(Spec::bit(), 10).unwrap();
/// let center = layout.new_instance();
/// let mut deme = Deme::new(layout);
///
/// assert_eq!(sampler.sample_new_instances(&mut deme, &center, 2, 5, None), 5);
/// assert_eq!(deme.len(), 5);
/// ```
pub struct NeighborhoodSampler {
    rng: ChaCha8Rng,
    trust_factor: usize,
}

impl fmt::Debug for NeighborhoodSampler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NeighborhoodSampler")
            .field("trust_factor", &self.trust_factor)
            .finish()
    }
}

impl NeighborhoodSampler {
    /// Creates a sampler seeded from the OS, with default settings.
    pub fn new() -> Self {
        Self::with_rng(ChaCha8Rng::from_os_rng(), &SamplingConfig::default())
    }

    /// Creates a sampler seeded with `seed`, with default settings.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(ChaCha8Rng::seed_from_u64(seed), &SamplingConfig::default())
    }

    /// Creates a sampler from configuration. Without a configured seed the
    /// generator is seeded from the OS.
    pub fn from_config(config: &KnobforgeConfig) -> Self {
        let rng = match config.random_seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_os_rng(),
        };
        Self::with_rng(rng, &config.sampling)
    }

    fn with_rng(rng: ChaCha8Rng, sampling: &SamplingConfig) -> Self {
        Self {
            rng,
            trust_factor: sampling.estimate_trust_factor,
        }
    }

    pub fn trust_factor(&self) -> usize {
        self.trust_factor
    }

    /// The generator, for callers that draw alongside the sampler.
    pub fn rng_mut(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    /// Budgeted neighborhood size; see [`count_neighborhood_size`].
    pub fn count(
        &self,
        layout: &FieldLayout,
        center: &Instance,
        dist: usize,
        max_count: usize,
    ) -> usize {
        count_neighborhood_size(layout, center, dist, max_count)
    }

    /// Appends up to `requested` neighbors; see [`sample_new_instances_with`].
    pub fn sample_new_instances<P>(
        &mut self,
        population: &mut P,
        center: &Instance,
        dist: usize,
        requested: usize,
        estimate: Option<usize>,
    ) -> usize
    where
        P: Population + ?Sized,
    {
        sample_new_instances_with(
            population,
            center,
            dist,
            requested,
            estimate,
            self.trust_factor,
            &mut self.rng,
        )
    }

    /// Appends up to `requested` neighbors and records their changed
    /// continuous knobs; see [`sample_new_instances_marked`].
    pub fn sample_new_instances_marked<P>(
        &mut self,
        population: &mut P,
        center: &Instance,
        dist: usize,
        requested: usize,
        estimate: Option<usize>,
        changed: &mut ChangedContin,
    ) -> usize
    where
        P: Population + ?Sized,
    {
        sample_new_instances_marked(
            population,
            center,
            dist,
            requested,
            estimate,
            self.trust_factor,
            changed,
            &mut self.rng,
        )
    }
}

impl Default for NeighborhoodSampler {
    fn default() -> Self {
        Self::new()
    }
}
