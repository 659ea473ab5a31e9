//! Colorimetric constants and conversions
//!
//! - CIE XYZ tristimulus values
//! - White points (D50 PCS illuminant, D65 broadcast white)
//! - RGB primaries and the normalized primary matrix
//! - Luma/chroma (YCbCr) matrices

pub mod primaries;
pub mod white_point;
pub mod xyz;
pub mod ycbcr;

pub use primaries::{Chromaticity, Primaries};
pub use white_point::{D50, D65, WhitePoint};
pub use xyz::Xyz;
pub use ycbcr::LumaCoefficients;
