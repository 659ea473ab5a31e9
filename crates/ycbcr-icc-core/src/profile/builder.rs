//! Dual-direction pipeline construction
//!
//! # Layouts
//!
//! ICC v4 `lutAToB` carries `A curves → CLUT → M curves → matrix → B curves`,
//! one more matrix than the forward chain has room for. The chroma offset and
//! YCbCr→R'G'B' matrix are therefore sampled into the CLUT:
//!
//! ```text
//! forward: identity | CLUT(offset, YCbCr→R'G'B') | decode curve | RGB→XYZ | identity
//! inverse: identity | XYZ→RGB | encode curve | CLUT(R'G'B'→YCbCr, offset) | identity
//! ```
//!
//! ICC v2 `lut16` only frames a CLUT with curves, so the whole chain is
//! sampled and the CLUT's XYZ side uses the 16-bit PCS range:
//!
//! ```text
//! forward: identity | CLUT(offset, YCbCr→R'G'B', decode curve, RGB→XYZ) | identity
//! inverse: identity | CLUT(XYZ→RGB, encode curve, R'G'B'→YCbCr, offset) | identity
//! ```
//!
//! The extended tier adds CLUT-free float pipelines with one stage per step.

use crate::config::{BuildConfig, ContainerTier, IccVersion};
use crate::context::BuildContext;
use crate::curve::ToneCurve;
use crate::error::{ConstructionError, Error, Result};
use crate::math::Matrix3x3;
use crate::pipeline::{ChannelRange, CurveStage, LinearStage, Lut3d, Pipeline, PipelineStage};
use crate::profile::{ColorProfile, ExtendedPipelines, PrimaryProfileBuilder, ProfileMetadata, RgbProfile};

const TO_SIGNED_CHROMA: [f64; 3] = [0.0, -0.5, -0.5];
const TO_OFFSET_CHROMA: [f64; 3] = [0.0, 0.5, 0.5];

/// Builds matched forward/inverse pipelines from a [`BuildConfig`]
#[derive(Debug, Clone)]
pub struct DualDirectionBuilder {
    config: BuildConfig,
    metadata: ProfileMetadata,
}

/// Per-build values every pipeline draws from
struct Ingredients {
    decode_matrix: Matrix3x3,
    encode_matrix: Matrix3x3,
    rgb_to_xyz: Matrix3x3,
    xyz_to_rgb: Matrix3x3,
    decode_curve: ToneCurve,
    encode_curve: ToneCurve,
}

impl DualDirectionBuilder {
    pub fn new(config: BuildConfig) -> Self {
        let metadata = ProfileMetadata::for_config(&config);
        Self { config, metadata }
    }

    pub fn with_metadata(mut self, metadata: ProfileMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Validate the configuration, build the base RGB profile, then the YCbCr profile
    pub fn build(&self, ctx: &BuildContext) -> Result<ColorProfile> {
        if let Err(err) = self.config.validate() {
            if let Error::Construction(construction) = &err {
                ctx.report(construction);
            }
            return Err(err);
        }
        let base = PrimaryProfileBuilder::from_config(&self.config).build(ctx)?;
        Ok(self.build_from_base(&base, ctx)?)
    }

    /// Build the YCbCr profile around an existing base profile
    ///
    /// The base profile's decoding curve and adaptation matrix are carried
    /// over as-is; nothing here derives them again.
    pub fn build_from_base(
        &self,
        base: &RgbProfile,
        ctx: &BuildContext,
    ) -> std::result::Result<ColorProfile, ConstructionError> {
        if !(2..=crate::pipeline::MAX_RESOLUTION).contains(&self.config.resolution) {
            return ctx.check(Err(ConstructionError::InvalidResolution(self.config.resolution)));
        }

        let luma = self.config.standard.luma();
        let decode_curve = base.tone_curve().clone();
        let ingredients = Ingredients {
            decode_matrix: luma.ycbcr_to_rgb(),
            encode_matrix: luma.rgb_to_ycbcr(),
            rgb_to_xyz: *base.rgb_to_xyz(),
            xyz_to_rgb: ctx.check(base.xyz_to_rgb())?,
            encode_curve: ctx.check(decode_curve.inverse())?,
            decode_curve,
        };

        let (forward, inverse) = match self.config.version {
            IccVersion::V4 => (
                self.limited_v4_forward(&ingredients, ctx)?,
                self.limited_v4_inverse(&ingredients, ctx)?,
            ),
            IccVersion::V2 => (
                self.limited_v2_forward(&ingredients, ctx)?,
                self.limited_v2_inverse(&ingredients, ctx)?,
            ),
        };
        tracing::info!(
            version = self.config.version.tag(),
            forward_stages = forward.len(),
            inverse_stages = inverse.len(),
            "built limited pipelines"
        );

        let extended = match self.config.tier {
            ContainerTier::Limited => None,
            ContainerTier::Extended => {
                let pipelines = self.extended_pipelines(&ingredients, ctx)?;
                tracing::info!(
                    forward_stages = pipelines.forward.len(),
                    inverse_stages = pipelines.inverse.len(),
                    "built extended pipelines"
                );
                Some(pipelines)
            }
        };

        Ok(ColorProfile {
            config: self.config.clone(),
            white_point: *base.white_point(),
            primaries: *base.primaries(),
            tone_curve: base.tone_curve().clone(),
            adaptation: *base.adaptation(),
            forward,
            inverse,
            extended,
            metadata: self.metadata.clone(),
        })
    }

    fn limited_v4_forward(
        &self,
        ing: &Ingredients,
        ctx: &BuildContext,
    ) -> std::result::Result<Pipeline, ConstructionError> {
        let to_rgb = assemble(
            ctx,
            vec![
                LinearStage::offset(TO_SIGNED_CHROMA).into(),
                LinearStage::new(ing.decode_matrix).into(),
            ],
        )?;
        let lut = self.sample(ctx, &to_rgb, ChannelRange::UNIT, ChannelRange::UNIT)?;
        let curve = ctx.check(ContainerTier::Limited.express(&ing.decode_curve))?;

        assemble(
            ctx,
            vec![
                CurveStage::identity(3).into(),
                lut.into(),
                ctx.check(CurveStage::uniform(&curve, 3))?.into(),
                LinearStage::new(ing.rgb_to_xyz).into(),
                CurveStage::identity(3).into(),
            ],
        )
    }

    fn limited_v4_inverse(
        &self,
        ing: &Ingredients,
        ctx: &BuildContext,
    ) -> std::result::Result<Pipeline, ConstructionError> {
        let to_ycbcr = assemble(
            ctx,
            vec![
                LinearStage::new(ing.encode_matrix).into(),
                LinearStage::offset(TO_OFFSET_CHROMA).into(),
            ],
        )?;
        let lut = self.sample(ctx, &to_ycbcr, ChannelRange::UNIT, ChannelRange::UNIT)?;
        let curve = ctx.check(ContainerTier::Limited.express(&ing.encode_curve))?;

        assemble(
            ctx,
            vec![
                CurveStage::identity(3).into(),
                LinearStage::new(ing.xyz_to_rgb).into(),
                ctx.check(CurveStage::uniform(&curve, 3))?.into(),
                lut.into(),
                CurveStage::identity(3).into(),
            ],
        )
    }

    fn limited_v2_forward(
        &self,
        ing: &Ingredients,
        ctx: &BuildContext,
    ) -> std::result::Result<Pipeline, ConstructionError> {
        let chain = assemble(
            ctx,
            vec![
                LinearStage::offset(TO_SIGNED_CHROMA).into(),
                LinearStage::new(ing.decode_matrix).into(),
                ctx.check(CurveStage::uniform(&ing.decode_curve, 3))?.into(),
                LinearStage::new(ing.rgb_to_xyz).into(),
            ],
        )?;
        let lut = self.sample(ctx, &chain, ChannelRange::UNIT, ChannelRange::PCS_XYZ)?;
        assemble(
            ctx,
            vec![
                CurveStage::identity(3).into(),
                lut.into(),
                CurveStage::identity(3).into(),
            ],
        )
    }

    fn limited_v2_inverse(
        &self,
        ing: &Ingredients,
        ctx: &BuildContext,
    ) -> std::result::Result<Pipeline, ConstructionError> {
        let chain = assemble(
            ctx,
            vec![
                LinearStage::new(ing.xyz_to_rgb).into(),
                ctx.check(CurveStage::uniform(&ing.encode_curve, 3))?.into(),
                LinearStage::new(ing.encode_matrix).into(),
                LinearStage::offset(TO_OFFSET_CHROMA).into(),
            ],
        )?;
        let lut = self.sample(ctx, &chain, ChannelRange::PCS_XYZ, ChannelRange::UNIT)?;
        assemble(
            ctx,
            vec![
                CurveStage::identity(3).into(),
                lut.into(),
                CurveStage::identity(3).into(),
            ],
        )
    }

    fn extended_pipelines(
        &self,
        ing: &Ingredients,
        ctx: &BuildContext,
    ) -> std::result::Result<ExtendedPipelines, ConstructionError> {
        let decode = ctx.check(ContainerTier::Extended.express(&ing.decode_curve))?;
        let encode = ctx.check(ContainerTier::Extended.express(&ing.encode_curve))?;

        let forward = assemble(
            ctx,
            vec![
                LinearStage::offset(TO_SIGNED_CHROMA).into(),
                LinearStage::new(ing.decode_matrix).into(),
                ctx.check(CurveStage::uniform(&decode, 3))?.into(),
                LinearStage::new(ing.rgb_to_xyz).into(),
            ],
        )?;
        let inverse = assemble(
            ctx,
            vec![
                LinearStage::new(ing.xyz_to_rgb).into(),
                ctx.check(CurveStage::uniform(&encode, 3))?.into(),
                LinearStage::new(ing.encode_matrix).into(),
                LinearStage::offset(TO_OFFSET_CHROMA).into(),
            ],
        )?;
        Ok(ExtendedPipelines { forward, inverse })
    }

    fn sample(
        &self,
        ctx: &BuildContext,
        sub: &Pipeline,
        input: ChannelRange,
        output: ChannelRange,
    ) -> std::result::Result<Lut3d, ConstructionError> {
        ctx.check(Lut3d::sample(sub, self.config.resolution, [input; 3], [output; 3]))
    }
}

fn assemble(
    ctx: &BuildContext,
    stages: Vec<PipelineStage>,
) -> std::result::Result<Pipeline, ConstructionError> {
    for stage in &stages {
        tracing::trace!(kind = stage.kind(), "stage");
    }
    ctx.check(Pipeline::assemble(3, 3, stages))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{D65, Xyz};
    use crate::config::{PrimariesPreset, Standard, TransferFunction};
    use crate::context::tests::RecordingSink;
    use crate::curve::{CurveFamily, ParametricCurve};

    fn build(config: BuildConfig) -> ColorProfile {
        DualDirectionBuilder::new(config)
            .build(&BuildContext::default())
            .unwrap()
    }

    fn lattice_bound(resolution: usize) -> f64 {
        1.0 / (resolution - 1) as f64
    }

    fn max_diff(a: [f64; 3], b: [f64; 3]) -> f64 {
        (0..3).map(|i| (a[i] - b[i]).abs()).fold(0.0, f64::max)
    }

    #[test]
    fn test_v4_layout() {
        let profile = build(BuildConfig::default());
        let kinds: Vec<_> = profile.forward().stages().iter().map(|s| s.kind()).collect();
        assert_eq!(kinds, ["curves", "clut", "curves", "matrix", "curves"]);
        let kinds: Vec<_> = profile.inverse().stages().iter().map(|s| s.kind()).collect();
        assert_eq!(kinds, ["curves", "matrix", "curves", "clut", "curves"]);
        assert!(profile.extended().is_none());

        // Both broadcast curves stay parametric in the limited grammar
        let PipelineStage::Curves(m) = &profile.inverse().stages()[2] else {
            panic!("expected curves");
        };
        assert_eq!(m.curves()[0], ToneCurve::Parametric(ParametricCurve::BT709_OETF));
        let PipelineStage::Curves(m) = &profile.forward().stages()[2] else {
            panic!("expected curves");
        };
        assert_eq!(m.curves()[0].family(), CurveFamily::LinearPower);
    }

    #[test]
    fn test_v2_layout() {
        let profile = build(BuildConfig {
            version: IccVersion::V2,
            ..Default::default()
        });
        for pipeline in [profile.forward(), profile.inverse()] {
            let kinds: Vec<_> = pipeline.stages().iter().map(|s| s.kind()).collect();
            assert_eq!(kinds, ["curves", "clut", "curves"]);
        }
        let PipelineStage::Lookup(lut) = &profile.forward().stages()[1] else {
            panic!("expected clut");
        };
        assert_eq!(lut.output_range()[0], ChannelRange::PCS_XYZ);
    }

    #[test]
    fn test_extended_layout() {
        let profile = build(BuildConfig {
            tier: ContainerTier::Extended,
            ..Default::default()
        });
        let ext = profile.extended().unwrap();
        assert_eq!(ext.forward.len(), 4);
        assert_eq!(ext.inverse.len(), 4);
        assert_eq!(ext.forward.lookup_count(), 0);
        assert_eq!(ext.inverse.lookup_count(), 0);
        for stage in ext.forward.stages().iter().chain(ext.inverse.stages()) {
            if let PipelineStage::Curves(c) = stage {
                assert_eq!(c.curves()[0].family(), CurveFamily::Tabulated);
            }
        }

        // BT.1886 stays parametric in both directions
        let profile = build(BuildConfig {
            tier: ContainerTier::Extended,
            transfer: TransferFunction::BT1886,
            ..Default::default()
        });
        let PipelineStage::Curves(c) = &profile.extended().unwrap().inverse.stages()[1] else {
            panic!("expected curves");
        };
        assert_eq!(
            c.curves()[0],
            ToneCurve::Parametric(ParametricCurve::Gamma { gamma: 1.0 / 2.4 })
        );
    }

    #[test]
    fn test_white_maps_to_reference_white() {
        for version in [IccVersion::V2, IccVersion::V4] {
            for transfer in [TransferFunction::Broadcast, TransferFunction::BT1886] {
                let profile = build(BuildConfig {
                    version,
                    transfer,
                    ..Default::default()
                });
                let white = Xyz::from(profile.to_reference([1.0, 0.5, 0.5]));
                let err = white.max_abs_diff(&D65.xyz);
                assert!(
                    err < 1.5 * lattice_bound(24),
                    "{version:?} {transfer:?}: {white:?} ({err})"
                );
            }
        }
    }

    #[test]
    fn test_white_exact_on_lattice() {
        // With R = 25 chroma 0.5 is a lattice node
        let profile = build(BuildConfig {
            resolution: 25,
            ..Default::default()
        });
        let white = Xyz::from(profile.to_reference([1.0, 0.5, 0.5]));
        assert!(white.approx_eq(&D65.xyz, 1e-3), "{white:?}");

        let profile = build(BuildConfig {
            tier: ContainerTier::Extended,
            ..Default::default()
        });
        let white = Xyz::from(profile.extended().unwrap().forward.evaluate([1.0, 0.5, 0.5]));
        assert!(white.approx_eq(&D65.xyz, 1e-9), "{white:?}");
    }

    #[test]
    fn test_red_primary_chromaticity() {
        let profile = build(BuildConfig::default());
        let luma = Standard::Bt709.luma();
        let red = luma.rgb_to_ycbcr().multiply_vec([1.0, 0.0, 0.0]);
        let encoded = [red[0], red[1] + 0.5, red[2] + 0.5];
        let (x, y) = Xyz::from(profile.to_reference(encoded)).chromaticity();
        assert!((x - 0.64).abs() < 0.01 && (y - 0.33).abs() < 0.01, "({x}, {y})");
    }

    #[test]
    fn test_round_trip_within_lattice_bound() {
        for config in [
            BuildConfig::default(),
            BuildConfig {
                standard: Standard::Bt601,
                primaries: PrimariesPreset::Bt601_625,
                ..Default::default()
            },
            BuildConfig {
                transfer: TransferFunction::BT1886,
                ..Default::default()
            },
        ] {
            let profile = build(config.clone());
            let encode = config.standard.luma().rgb_to_ycbcr();
            let bound = lattice_bound(config.resolution);
            for r in 0..=4 {
                for g in 0..=4 {
                    for b in 0..=4 {
                        let rgb = [r as f64 / 4.0, g as f64 / 4.0, b as f64 / 4.0];
                        let ycc = encode.multiply_vec(rgb);
                        let x = [ycc[0], ycc[1] + 0.5, ycc[2] + 0.5];
                        let back = profile.to_encoded(profile.to_reference(x));
                        let err = max_diff(back, x);
                        assert!(err <= bound, "{config:?} {x:?} -> {back:?} ({err})");
                    }
                }
            }
        }
    }

    #[test]
    fn test_reference_round_trip() {
        // v2 samples the OETF into the CLUT, so dark and saturated colours
        // carry more interpolation error than v4
        for (version, factor) in [(IccVersion::V4, 1.0), (IccVersion::V2, 3.0)] {
            let config = BuildConfig {
                version,
                ..Default::default()
            };
            let ctx = BuildContext::default();
            let base = PrimaryProfileBuilder::from_config(&config).build(&ctx).unwrap();
            let profile = DualDirectionBuilder::new(config.clone())
                .build_from_base(&base, &ctx)
                .unwrap();
            let bound = factor * lattice_bound(config.resolution);

            let mut worst = (0.0, [0.0; 3]);
            for r in 0..=8 {
                for g in 0..=8 {
                    for b in 0..=8 {
                        let rgb = [r as f64 / 8.0, g as f64 / 8.0, b as f64 / 8.0];
                        let xyz = base.rgb_to_xyz().multiply_vec(rgb);
                        let back = profile.to_reference(profile.to_encoded(xyz));
                        let err = max_diff(back, xyz);
                        if err > worst.0 {
                            worst = (err, rgb);
                        }
                    }
                }
            }
            assert!(
                worst.0 <= bound,
                "{version:?}: {:.5} at rgb {:?} (bound {bound:.5})",
                worst.0,
                worst.1
            );
        }
    }

    #[test]
    fn test_shared_values_are_copied_from_base() {
        let config = BuildConfig::default();
        let ctx = BuildContext::default();
        let base = PrimaryProfileBuilder::from_config(&config).build(&ctx).unwrap();
        let profile = DualDirectionBuilder::new(config)
            .build_from_base(&base, &ctx)
            .unwrap();
        assert_eq!(profile.adaptation(), base.adaptation());
        assert_eq!(profile.tone_curve(), base.tone_curve());
        assert_eq!(profile.white_point(), base.white_point());

        let PipelineStage::Linear(m) = &profile.forward().stages()[3] else {
            panic!("expected matrix");
        };
        assert_eq!(m.matrix(), base.rgb_to_xyz());
    }

    #[test]
    fn test_deterministic() {
        let config = BuildConfig {
            tier: ContainerTier::Extended,
            ..Default::default()
        };
        assert_eq!(build(config.clone()), build(config));
    }

    #[test]
    fn test_invalid_configuration_produces_no_profile() {
        let result = DualDirectionBuilder::new(BuildConfig {
            transfer: TransferFunction::Power { gamma: f64::NAN },
            ..Default::default()
        })
        .build(&BuildContext::default());
        assert!(matches!(
            result,
            Err(Error::Construction(ConstructionError::InvalidCurveParameters { .. }))
        ));

        let result = DualDirectionBuilder::new(BuildConfig {
            tier: ContainerTier::Extended,
            version: IccVersion::V2,
            ..Default::default()
        })
        .build(&BuildContext::default());
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_invalid_gamma_is_reported() {
        let sink = RecordingSink::default();
        let ctx = BuildContext::with_sink(9, sink.clone());
        let err = DualDirectionBuilder::new(BuildConfig {
            transfer: TransferFunction::Power { gamma: -1.0 },
            ..Default::default()
        })
        .build(&ctx)
        .unwrap_err();
        assert!(matches!(err, Error::Construction(_)), "{err}");

        let logged = sink.0.lock().unwrap();
        assert_eq!(logged.len(), 1);
        assert_eq!((logged[0].0, logged[0].1), (9, 1));
        assert!(logged[0].2.contains("gamma"), "{}", logged[0].2);
    }

    #[test]
    fn test_config_errors_are_not_reported() {
        let sink = RecordingSink::default();
        let ctx = BuildContext::with_sink(9, sink.clone());
        let err = DualDirectionBuilder::new(BuildConfig {
            tier: ContainerTier::Extended,
            version: IccVersion::V2,
            ..Default::default()
        })
        .build(&ctx)
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(sink.0.lock().unwrap().is_empty());
    }

    #[test]
    fn test_bad_resolution_is_reported() {
        let sink = RecordingSink::default();
        let ctx = BuildContext::with_sink(3, sink.clone());
        let config = BuildConfig {
            resolution: 1,
            ..Default::default()
        };
        let base = PrimaryProfileBuilder::from_config(&config).build(&ctx).unwrap();
        let err = DualDirectionBuilder::new(config)
            .build_from_base(&base, &ctx)
            .unwrap_err();
        assert_eq!(err, ConstructionError::InvalidResolution(1));
        assert_eq!(sink.0.lock().unwrap()[0].1, 3);
    }
}
