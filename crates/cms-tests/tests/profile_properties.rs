//! Properties of built profiles checked through the public API

use cms_tests::accuracy::max_abs_diff;
use cms_tests::patterns::random_in_gamut;
use ycbcr_icc_core::icc::compute_profile_id;
use ycbcr_icc_core::pipeline::{ChannelRange, CurveStage, LinearStage};
use ycbcr_icc_core::{
    BuildConfig, BuildContext, ContainerTier, D65, DualDirectionBuilder, Error, IccSerializer,
    Lut3d, ParametricCurve, Pipeline, PipelineStage, PrimaryProfileBuilder, ProfileSerializer,
    Standard, ToneCurve, TransferFunction, Xyz,
};

fn full_chain(config: &BuildConfig) -> Pipeline {
    let base = PrimaryProfileBuilder::from_config(config)
        .build(&BuildContext::default())
        .unwrap();
    Pipeline::assemble(
        3,
        3,
        vec![
            PipelineStage::Linear(LinearStage::offset([0.0, -0.5, -0.5])),
            PipelineStage::Linear(LinearStage::new(config.standard.luma().ycbcr_to_rgb())),
            PipelineStage::Curves(CurveStage::uniform(base.tone_curve(), 3).unwrap()),
            PipelineStage::Linear(LinearStage::new(*base.rgb_to_xyz())),
        ],
    )
    .unwrap()
}

#[test]
fn test_lattice_corners_hit_domain_endpoints() {
    let config = BuildConfig::default();
    let chain = full_chain(&config);
    let r = config.resolution;
    let lut = Lut3d::sample(&chain, r, [ChannelRange::UNIT; 3], [ChannelRange::PCS_XYZ; 3]).unwrap();
    let step = ChannelRange::PCS_XYZ.max / 65535.0;

    for i in [0, r - 1] {
        for j in [0, r - 1] {
            for k in [0, r - 1] {
                let corner = [i, j, k].map(|n| if n == 0 { 0.0 } else { 1.0 });
                let exact = chain.evaluate(corner);
                let node = lut.node(i, j, k);
                assert!(
                    max_abs_diff(exact, node) <= step,
                    "{corner:?}: {node:?} vs {exact:?}"
                );
            }
        }
    }
}

#[test]
fn test_tabulated_curve_fidelity() {
    let analytic = ToneCurve::parametric(ParametricCurve::BT709_OETF).unwrap();
    let table = analytic.tabulate(1024).unwrap();
    // Midpoints between nodes are the worst case for linear interpolation
    for n in 0..1023 {
        let x = (n as f64 + 0.5) / 1023.0;
        let err = (table.evaluate(x) - analytic.evaluate(x)).abs();
        assert!(err < 1e-3, "x={x}: {err}");
    }
}

#[test]
fn test_identical_builds_share_checksum() {
    let config = BuildConfig {
        tier: ContainerTier::Extended,
        transfer: TransferFunction::BT1886,
        ..Default::default()
    };
    let build = || {
        DualDirectionBuilder::new(config.clone())
            .build(&BuildContext::default())
            .unwrap()
    };
    let (a, b) = (build(), build());
    assert_eq!(a, b);

    let serializer = IccSerializer;
    let id = serializer.fingerprint(&a).unwrap();
    assert_eq!(id, serializer.fingerprint(&b).unwrap());

    let bytes = serializer.to_bytes(&a).unwrap();
    assert_eq!(bytes, serializer.to_bytes(&b).unwrap());
    assert_eq!(compute_profile_id(&bytes), id);
}

#[test]
fn test_bt601_white_and_round_trip() {
    let config = BuildConfig {
        standard: Standard::Bt601,
        ..Default::default()
    };
    let profile = DualDirectionBuilder::new(config.clone())
        .build(&BuildContext::default())
        .unwrap();
    let bound = 1.0 / (config.resolution - 1) as f64;

    let white = Xyz::from(profile.to_reference([1.0, 0.5, 0.5]));
    assert!(white.max_abs_diff(&D65.xyz) < 1.5 * bound, "{white:?}");

    for x in random_in_gamut(Standard::Bt601, 3, 500) {
        let back = profile.to_encoded(profile.to_reference(x));
        assert!(max_abs_diff(back, x) <= bound, "{x:?} -> {back:?}");
    }
}

#[test]
fn test_rejected_configuration_builds_nothing() {
    let config = BuildConfig::from_json_str(r#"{ "resolution": 300 }"#).unwrap();
    let err = DualDirectionBuilder::new(config)
        .build(&BuildContext::default())
        .unwrap_err();
    assert!(matches!(err, Error::Construction(_)), "{err}");

    assert!(BuildConfig::from_json_str(r#"{ "tier": "unlimited" }"#).is_err());
}
