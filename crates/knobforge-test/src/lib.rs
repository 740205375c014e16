//! Shared test fixtures for knobforge crates.
//!
//! - [`tree`] - A labelled tree usable as a term algebra
//! - [`layouts`] - Field layouts exercising every zone
//!
//! # Usage
//!
//! Add as a dev-dependency in your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! knobforge-test = { workspace = true }
//! ```
//!
//! Then import the fixtures you need:
//!
//! ```ignore
//! use knobforge_test::{layout_of, mixed_layout, LabelTree};
//! ```

pub mod layouts;
pub mod tree;

pub use layouts::{bits_and_quad, layout_of, mixed_layout};
pub use tree::LabelTree;
