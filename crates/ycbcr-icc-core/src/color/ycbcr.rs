//! Luma/chroma matrices
//!
//! `Y = Kr·R' + Kg·G' + Kb·B'`, `Cb = (B' − Y) / (2(1 − Kb))`,
//! `Cr = (R' − Y) / (2(1 − Kr))` with `Kg = 1 − Kr − Kb`. Chroma is signed in
//! [-0.5, 0.5]; the encoded signal carries it offset by +0.5. Channel order is
//! always Y, Cb, Cr.

use crate::math::Matrix3x3;

/// Luma weights of the red and blue channels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LumaCoefficients {
    pub kr: f64,
    pub kb: f64,
}

impl LumaCoefficients {
    /// ITU-R BT.709-6 item 3.2
    pub const BT709: Self = Self::new(0.2126, 0.0722);
    /// ITU-R BT.601-7 item 2.5.1
    pub const BT601: Self = Self::new(0.299, 0.114);

    pub const fn new(kr: f64, kb: f64) -> Self {
        Self { kr, kb }
    }

    pub fn kg(&self) -> f64 {
        1.0 - self.kr - self.kb
    }

    /// R'G'B' → Y Cb Cr (signed chroma)
    pub fn rgb_to_ycbcr(&self) -> Matrix3x3 {
        let (kr, kg, kb) = (self.kr, self.kg(), self.kb);
        let cb = 2.0 * (1.0 - kb);
        let cr = 2.0 * (1.0 - kr);
        Matrix3x3::new([
            [kr, kg, kb],
            [-kr / cb, -kg / cb, 0.5],
            [0.5, -kg / cr, -kb / cr],
        ])
    }

    /// Y Cb Cr (signed chroma) → R'G'B'
    pub fn ycbcr_to_rgb(&self) -> Matrix3x3 {
        let (kr, kg, kb) = (self.kr, self.kg(), self.kb);
        let cr = 2.0 * (1.0 - kr);
        let cb = 2.0 * (1.0 - kb);
        Matrix3x3::new([
            [1.0, 0.0, cr],
            [1.0, -cb * kb / kg, -cr * kr / kg],
            [1.0, cb, 0.0],
        ])
    }
}
