//! knobforge - Bit-packed knob instances and neighborhood sampling in Rust
//!
//! Describe a candidate's knobs with specs, pack them through a
//! [`FieldLayout`], and grow a population with neighbors of a center.
//!
//! # Example
//!
//! ```rust
//! use knobforge::prelude::*;
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let layout = FieldLayout::from_specs(vec![
//!     Spec::bit(), Spec::bit(), Spec::bit(), Spec::disc(4),
//! ]).unwrap();
//! assert_eq!(layout.to_string(), "{disc(4) bit bit bit}");
//!
//! let center = layout.new_instance();
//! assert_eq!(count_neighborhood_size(&layout, &center, 1, 100), 6);
//!
//! let mut deme = Deme::new(layout);
//! let mut rng = ChaCha8Rng::seed_from_u64(1);
//! assert_eq!(sample_new_instances(&mut deme, &center, 1, 100, None, &mut rng), 6);
//! ```

// Representation
pub use knobforge_core::{
    BitCursor, BitCursorMut, BitRef, Contin, ContinCursor, ContinCursorMut, ContinSpec, Disc,
    DiscCursor, DiscCursorMut, DiscSpec, Field, FieldLayout, Instance, KnobCursor, KnobCursorMut,
    KnobError, Multiplicity, PackedWord, Spec, TermAlgebra, TermCursor, TermCursorMut, TermSpec,
    BITS_PER_WORD,
};

// Configuration
pub use knobforge_config::{ConfigError, ContinConfig, KnobforgeConfig, SamplingConfig};

// Neighborhoods
pub use knobforge_neighborhood::{
    count_contin_neighborhood, count_neighborhood_size, count_neighborhood_size_from_index,
    count_neighborhood_size_of_shape, generate_all_in_neighborhood,
    generate_all_in_neighborhood_marked, generate_contin_neighbor, redraw_contins,
    redraw_contins_marked, safe_binomial_coefficient, sample_from_neighborhood,
    sample_from_neighborhood_marked, sample_new_instances, sample_new_instances_marked,
    sample_new_instances_with, ChangedContin, Deme, NeighborhoodSampler, Neighbors, Population,
    DEFAULT_TRUST_FACTOR,
};

#[cfg(feature = "console")]
pub mod console;

pub mod prelude {
    pub use super::{
        ContinSpec, DiscSpec, FieldLayout, Instance, KnobCursor, KnobCursorMut, Spec, TermAlgebra,
        TermSpec,
    };
    pub use super::{
        count_neighborhood_size, sample_new_instances, ChangedContin, Deme, NeighborhoodSampler,
        Population,
    };
    pub use super::KnobforgeConfig;
}
