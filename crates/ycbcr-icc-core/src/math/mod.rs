//! Mathematical building blocks
//!
//! - 3x3 matrix operations for primaries, YCbCr and adaptation transforms
//! - Bradford chromatic adaptation
//! - Interpolation for tabulated curves and lookup tables

pub mod chromatic_adaptation;
pub mod interpolation;
pub mod matrix;

pub use chromatic_adaptation::bradford_adaptation;
pub use interpolation::{interp_table, lerp, trilinear, trilinear_lattice};
pub use matrix::Matrix3x3;
