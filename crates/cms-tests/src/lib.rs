//! # cms-tests
//!
//! Cross-CMS testing for ycbcr-icc profiles.
//!
//! This crate provides:
//! - Sample generators over YCbCr lattices and in-gamut RGB
//! - Error statistics for triples
//! - lcms2 wrappers that reload encoded profiles and run them
//!
//! ## Test Categories
//!
//! 1. **Reload**: encoded profiles open in lcms2 with the expected header
//! 2. **Parity**: lcms2 evaluates the tags to what the pipelines compute
//! 3. **Properties**: white point, primaries and round-trip bounds

pub mod accuracy;
pub mod patterns;
pub mod reference;

pub use accuracy::{ErrorStats, compare_triples};
pub use patterns::{in_gamut_lattice, random_in_gamut, rgb_to_encoded};
