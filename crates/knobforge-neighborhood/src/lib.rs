//! knobforge Neighborhood - Counting and sampling neighbors of an instance
//!
//! Given a center instance and a distance `d`, this crate:
//! - counts the instances at distance `d` against a budget, without
//!   materializing them ([`count_neighborhood_size`])
//! - enumerates the whole neighborhood ([`generate_all_in_neighborhood`])
//! - draws distinct random neighbors ([`sample_from_neighborhood`])
//! - decides between the two and grows a [`Population`] accordingly
//!   ([`sample_new_instances`], [`NeighborhoodSampler`])
//!
//! Distance is the number of changed disc and bit fields. Term knobs are
//! left unchanged; continuous knobs are redrawn on every neighbor, and the
//! `_marked` variants report which of them changed ([`ChangedContin`]).

pub mod contin;
pub mod count;
pub mod deme;
pub mod dispatch;
pub mod enumerate;
pub mod sample;


pub use contin::{generate_contin_neighbor, redraw_contins, redraw_contins_marked, ChangedContin};
pub use count::{
    count_contin_neighborhood, count_neighborhood_size, count_neighborhood_size_from_index,
    count_neighborhood_size_of_shape, safe_binomial_coefficient,
};
pub use deme::{Deme, Population};
pub use dispatch::{
    sample_new_instances, sample_new_instances_marked, sample_new_instances_with,
    NeighborhoodSampler, DEFAULT_TRUST_FACTOR,
};
pub use enumerate::{generate_all_in_neighborhood, generate_all_in_neighborhood_marked, Neighbors};
pub use sample::{sample_from_neighborhood, sample_from_neighborhood_marked};
