//! RGB primaries and the RGB → XYZ matrix they imply
//!
//! # Normalized primary matrix
//!
//! With the primaries' XYZ (at Y = 1) as the columns of `P`, the channel
//! gains `S = P⁻¹ · W` make `P · diag(S)` map RGB (1, 1, 1) onto the white
//! point `W` (SMPTE RP 177).

use serde::{Deserialize, Serialize};

use crate::color::{WhitePoint, Xyz};
use crate::error::ConstructionError;
use crate::math::Matrix3x3;

/// CIE xy chromaticity coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Chromaticity {
    pub x: f64,
    pub y: f64,
}

impl Chromaticity {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// XYZ at unit luminance
    pub const fn to_xyz(&self) -> Xyz {
        Xyz::from_xyy(self.x, self.y, 1.0)
    }
}

/// Red, green and blue primaries of an RGB encoding
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Primaries {
    pub red: Chromaticity,
    pub green: Chromaticity,
    pub blue: Chromaticity,
}

impl Primaries {
    pub const fn new(red: Chromaticity, green: Chromaticity, blue: Chromaticity) -> Self {
        Self { red, green, blue }
    }

    /// ITU-R BT.709 primaries, pre-quantized so that their s15Fixed16
    /// colorants round-trip exactly (Elle Stone's sRGB set)
    pub const BT709: Self = Self::new(
        Chromaticity::new(0.639998686, 0.330010138),
        Chromaticity::new(0.300003784, 0.600003357),
        Chromaticity::new(0.150002046, 0.059997204),
    );

    /// ITU-R BT.601-7, 625-line systems
    pub const BT601_625: Self = Self::new(
        Chromaticity::new(0.640, 0.330),
        Chromaticity::new(0.290, 0.600),
        Chromaticity::new(0.150, 0.060),
    );

    /// ITU-R BT.601-7, 525-line systems
    pub const BT601_525: Self = Self::new(
        Chromaticity::new(0.630, 0.340),
        Chromaticity::new(0.310, 0.595),
        Chromaticity::new(0.155, 0.070),
    );

    /// Linear RGB → XYZ relative to `white` (no chromatic adaptation)
    pub fn rgb_to_xyz(&self, white: &WhitePoint) -> Result<Matrix3x3, ConstructionError> {
        let p = Matrix3x3::from_columns(
            self.red.to_xyz().to_array(),
            self.green.to_xyz().to_array(),
            self.blue.to_xyz().to_array(),
        );
        if !p.is_finite() {
            return Err(ConstructionError::SingularMatrix("primaries"));
        }
        let p_inv = p
            .inverse()
            .ok_or(ConstructionError::SingularMatrix("primaries"))?;
        let [sr, sg, sb] = p_inv.multiply_vec(white.xyz.to_array());
        Ok(p * Matrix3x3::diagonal(sr, sg, sb))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::D65;

    #[test]
    fn test_bt709_matrix() {
        let m = Primaries::BT709.rgb_to_xyz(&D65).unwrap();
        let expected = Matrix3x3::new([
            [0.41239, 0.35758, 0.18048],
            [0.21264, 0.71517, 0.07219],
            [0.01933, 0.11919, 0.95053],
        ]);
        assert!(m.approx_eq(&expected, 1e-4), "{m:?}");
    }

    #[test]
    fn test_white_maps_to_white() {
        for primaries in [Primaries::BT709, Primaries::BT601_625, Primaries::BT601_525] {
            let m = primaries.rgb_to_xyz(&D65).unwrap();
            let white = Xyz::from(m.multiply_vec([1.0, 1.0, 1.0]));
            assert!(white.approx_eq(&D65.xyz, 1e-12), "{primaries:?}: {white:?}");
        }
    }

    #[test]
    fn test_red_column_has_red_chromaticity() {
        let m = Primaries::BT709.rgb_to_xyz(&D65).unwrap();
        let (x, y) = Xyz::from(m.column(0)).chromaticity();
        let red = Primaries::BT709.red;
        assert!((x - red.x).abs() < 1e-9, "x = {x}");
        assert!((y - red.y).abs() < 1e-9, "y = {y}");
        // The preset is the quantized sRGB set, close to the nominal (0.64, 0.33)
        assert!((x - 0.64).abs() < 1e-4 && (y - 0.33).abs() < 1e-4);
    }

    #[test]
    fn test_collinear_primaries_rejected() {
        let degenerate = Primaries::new(
            Chromaticity::new(0.2, 0.2),
            Chromaticity::new(0.3, 0.3),
            Chromaticity::new(0.4, 0.4),
        );
        assert!(matches!(
            degenerate.rgb_to_xyz(&D65),
            Err(ConstructionError::SingularMatrix(_))
        ));
    }
}
