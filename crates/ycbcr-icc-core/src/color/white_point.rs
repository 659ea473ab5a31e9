//! White points
//!
//! The broadcast standards define their white by chromaticity; the ICC
//! profile connection space fixes its illuminant directly in XYZ.

use crate::color::Xyz;

/// A named white point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WhitePoint {
    pub name: &'static str,
    /// CIE XYZ coordinates, Y normalized to 1.0
    pub xyz: Xyz,
}

impl WhitePoint {
    pub const fn new(name: &'static str, x: f64, y: f64, z: f64) -> Self {
        Self {
            name,
            xyz: Xyz::new(x, y, z),
        }
    }

    /// White point from its chromaticity at unit luminance
    pub const fn from_chromaticity(name: &'static str, x: f64, y: f64) -> Self {
        Self {
            name,
            xyz: Xyz::from_xyy(x, y, 1.0),
        }
    }

    pub fn chromaticity(&self) -> (f64, f64) {
        self.xyz.chromaticity()
    }
}

/// ICC profile connection space illuminant (ICC.1:2022 7.2.16)
pub const D50: WhitePoint = WhitePoint::new("D50", 0.9642, 1.0, 0.8249);

/// CIE D65 as specified by ITU-R BT.709-6 and BT.601-7: x = 0.3127, y = 0.3290
pub const D65: WhitePoint = WhitePoint::from_chromaticity("D65", 0.3127, 0.3290);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_d65_from_chromaticity() {
        let (x, y) = D65.chromaticity();
        assert!((x - 0.3127).abs() < 1e-12);
        assert!((y - 0.3290).abs() < 1e-12);
        assert_eq!(D65.xyz.y, 1.0);
    }

    #[test]
    fn test_d50_is_pcs_illuminant() {
        assert_eq!(D50.xyz.to_array(), [0.9642, 1.0, 0.8249]);
    }
}
