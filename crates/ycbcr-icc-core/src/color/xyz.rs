//! CIE XYZ tristimulus values
//!
//! XYZ is the reference (profile connection) space every pipeline ends or
//! starts in.

/// CIE 1931 XYZ color coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Xyz {
    pub x: f64,
    /// Luminance
    pub y: f64,
    pub z: f64,
}

impl Xyz {
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub const fn from_array(arr: [f64; 3]) -> Self {
        Self::new(arr[0], arr[1], arr[2])
    }

    #[inline]
    pub const fn to_array(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// XYZ of chromaticity (x, y) at luminance `luminance`
    pub const fn from_xyy(x: f64, y: f64, luminance: f64) -> Self {
        Self::new(x * luminance / y, luminance, (1.0 - x - y) * luminance / y)
    }

    /// Chromaticity coordinates (x, y); black maps to (0, 0)
    pub fn chromaticity(&self) -> (f64, f64) {
        let sum = self.x + self.y + self.z;
        if sum > 0.0 {
            (self.x / sum, self.y / sum)
        } else {
            (0.0, 0.0)
        }
    }

    /// Largest per-component absolute difference
    pub fn max_abs_diff(&self, other: &Self) -> f64 {
        (self.x - other.x)
            .abs()
            .max((self.y - other.y).abs())
            .max((self.z - other.z).abs())
    }

    pub fn approx_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.max_abs_diff(other) <= epsilon
    }
}

impl From<[f64; 3]> for Xyz {
    fn from(arr: [f64; 3]) -> Self {
        Self::from_array(arr)
    }
}
