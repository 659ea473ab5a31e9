//! Base RGB profile
//!
//! The RGB description the YCbCr profile is derived from. Its decoding curve
//! and its chromatic adaptation matrix are the two values every pipeline
//! reuses; they are computed here exactly once.

use crate::color::{D50, Primaries, WhitePoint, Xyz};
use crate::config::{BuildConfig, TransferFunction};
use crate::context::BuildContext;
use crate::curve::ToneCurve;
use crate::error::ConstructionError;
use crate::math::{Matrix3x3, bradford_adaptation};

/// Builds an [`RgbProfile`] from white point, primaries and transfer function
#[derive(Debug, Clone, PartialEq)]
pub struct PrimaryProfileBuilder {
    white: WhitePoint,
    primaries: Primaries,
    transfer: TransferFunction,
}

impl PrimaryProfileBuilder {
    pub fn new(white: WhitePoint, primaries: Primaries, transfer: TransferFunction) -> Self {
        Self {
            white,
            primaries,
            transfer,
        }
    }

    /// Builder for the configured primaries and transfer function under D65
    pub fn from_config(config: &BuildConfig) -> Self {
        Self::new(crate::color::D65, config.primaries.primaries(), config.transfer)
    }

    pub fn build(&self, ctx: &BuildContext) -> Result<RgbProfile, ConstructionError> {
        let tone_curve = ctx.check(ToneCurve::parametric(self.transfer.decoding_curve()))?;
        let rgb_to_xyz = ctx.check(self.primaries.rgb_to_xyz(&self.white))?;
        let adaptation = ctx.check(bradford_adaptation(&self.white.xyz, &D50.xyz))?;
        let colorants = adaptation * rgb_to_xyz;

        tracing::debug!(
            white = self.white.name,
            curve = %tone_curve.family(),
            "built base RGB profile"
        );
        Ok(RgbProfile {
            white_point: self.white,
            primaries: self.primaries,
            tone_curve,
            adaptation,
            rgb_to_xyz,
            colorants,
        })
    }
}

/// Matrix/TRC RGB profile
#[derive(Debug, Clone, PartialEq)]
pub struct RgbProfile {
    white_point: WhitePoint,
    primaries: Primaries,
    tone_curve: ToneCurve,
    adaptation: Matrix3x3,
    rgb_to_xyz: Matrix3x3,
    colorants: Matrix3x3,
}

impl RgbProfile {
    pub fn white_point(&self) -> &WhitePoint {
        &self.white_point
    }

    pub fn primaries(&self) -> &Primaries {
        &self.primaries
    }

    /// Canonical decoding curve R'G'B' → linear RGB, shared by all three channels
    pub fn tone_curve(&self) -> &ToneCurve {
        &self.tone_curve
    }

    /// Bradford matrix from the source white to D50
    pub fn adaptation(&self) -> &Matrix3x3 {
        &self.adaptation
    }

    /// Linear RGB → XYZ relative to the source white
    pub fn rgb_to_xyz(&self) -> &Matrix3x3 {
        &self.rgb_to_xyz
    }

    pub fn xyz_to_rgb(&self) -> Result<Matrix3x3, ConstructionError> {
        self.rgb_to_xyz
            .inverse()
            .ok_or(ConstructionError::SingularMatrix("RGB to XYZ"))
    }

    /// D50-adapted colorants; column `i` is primary `i`
    pub fn colorants(&self) -> &Matrix3x3 {
        &self.colorants
    }

    /// Media white as written to the container: the adapted source white
    pub fn adapted_white(&self) -> Xyz {
        Xyz::from(self.adaptation.multiply_vec(self.white_point.xyz.to_array()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::D65;
    use crate::config::PrimariesPreset;
    use crate::context::tests::RecordingSink;
    use crate::curve::ParametricCurve;

    fn bt709() -> RgbProfile {
        PrimaryProfileBuilder::from_config(&BuildConfig::default())
            .build(&BuildContext::default())
            .unwrap()
    }

    #[test]
    fn test_broadcast_curve_is_inverse_oetf() {
        let base = bt709();
        assert_eq!(
            base.tone_curve(),
            &ToneCurve::Parametric(ParametricCurve::BT709_INVERSE_OETF)
        );
        assert_eq!(base.white_point(), &D65);
    }

    #[test]
    fn test_power_curve() {
        let config = BuildConfig {
            transfer: TransferFunction::BT1886,
            ..Default::default()
        };
        let base = PrimaryProfileBuilder::from_config(&config)
            .build(&BuildContext::default())
            .unwrap();
        assert_eq!(
            base.tone_curve(),
            &ToneCurve::Parametric(ParametricCurve::Gamma { gamma: 2.4 })
        );
    }

    #[test]
    fn test_adaptation_maps_white_to_d50() {
        let base = bt709();
        assert!(base.adapted_white().approx_eq(&D50.xyz, 1e-4));

        // Colorants sum to the PCS white
        let sum = Xyz::from(base.colorants().multiply_vec([1.0, 1.0, 1.0]));
        assert!(sum.approx_eq(&D50.xyz, 1e-4), "{sum:?}");
    }

    #[test]
    fn test_xyz_to_rgb_inverts() {
        let base = bt709();
        let m = base.xyz_to_rgb().unwrap() * *base.rgb_to_xyz();
        assert!(m.approx_eq(&Matrix3x3::identity(), 1e-12));
    }

    #[test]
    fn test_bt601_primaries() {
        let config = BuildConfig {
            primaries: PrimariesPreset::Bt601_625,
            ..Default::default()
        };
        let base = PrimaryProfileBuilder::from_config(&config)
            .build(&BuildContext::default())
            .unwrap();
        let (x, y) = Xyz::from(base.rgb_to_xyz().column(0)).chromaticity();
        assert!((x - 0.64).abs() < 1e-9 && (y - 0.33).abs() < 1e-9);
        let (x, y) = Xyz::from(base.rgb_to_xyz().column(1)).chromaticity();
        assert!((x - 0.29).abs() < 1e-9 && (y - 0.60).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_gamma_is_reported() {
        let sink = RecordingSink::default();
        let ctx = BuildContext::with_sink(7, sink.clone());
        let builder =
            PrimaryProfileBuilder::new(D65, Primaries::BT709, TransferFunction::Power { gamma: 0.0 });
        let err = builder.build(&ctx).unwrap_err();
        assert!(matches!(err, ConstructionError::InvalidCurveParameters { .. }));
        let logged = sink.0.lock().unwrap();
        assert_eq!(logged.len(), 1);
        assert_eq!((logged[0].0, logged[0].1), (7, 1));
    }
}
