//! `curv` and `para` tags

use crate::curve::{ParametricCurve, ToneCurve};
use crate::icc::error::EncodeError;
use crate::icc::types::TypeSignature;
use crate::icc::writer::{ByteWriter, to_u32};

/// Encode `curve` as curveType or parametricCurveType
///
/// Identity becomes a zero-entry `curv`, tables a `curv` with u16 entries.
/// `Gamma`, `LinearPower` and `ScaledPower` map to `para` functions 0, 3 and 4.
pub fn encode_curve(curve: &ToneCurve) -> Result<Vec<u8>, EncodeError> {
    match curve {
        ToneCurve::Identity => {
            let mut w = ByteWriter::type_header(TypeSignature::CURVE);
            w.u32(0);
            Ok(w.into_inner())
        }
        ToneCurve::Tabulated(samples) => {
            let mut w = ByteWriter::type_header(TypeSignature::CURVE);
            w.u32(to_u32(samples.len())?);
            for &v in samples {
                w.u16(quantize_unit(v));
            }
            Ok(w.into_inner())
        }
        ToneCurve::Parametric(p) => encode_parametric(p),
    }
}

fn encode_parametric(curve: &ParametricCurve) -> Result<Vec<u8>, EncodeError> {
    let (function, params): (u16, Vec<f64>) = match *curve {
        ParametricCurve::Gamma { gamma } => (0, vec![gamma]),
        ParametricCurve::LinearPower { gamma, a, b, c, d } => (3, vec![gamma, a, b, c, d]),
        // scale·x^γ = (scale^(1/γ)·x)^γ
        ParametricCurve::ScaledPower {
            gamma,
            scale,
            offset,
            slope,
            breakpoint,
        } => (
            4,
            vec![gamma, scale.powf(gamma.recip()), 0.0, slope, breakpoint, offset, 0.0],
        ),
    };
    let mut w = ByteWriter::type_header(TypeSignature::PARA);
    w.u16(function);
    w.u16(0);
    for v in params {
        w.s15(v)?;
    }
    Ok(w.into_inner())
}

/// [0, 1] → u16, clamped
pub(crate) fn quantize_unit(v: f64) -> u16 {
    if v.is_nan() {
        return 0;
    }
    (v.clamp(0.0, 1.0) * 65535.0).round() as u16
}
