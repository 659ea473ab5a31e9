//! `mpet` tags (multiProcessElementsType)
//!
//! Float pipelines for `D2B0`/`B2D0`. Values are plain XYZ on the PCS side,
//! with no 16-bit scaling. Matrix stages become `matf` elements and curve
//! stages `cvst` sets of segmented curves:
//!
//! - a parametric curve is one `parf` segment over the whole real line
//! - a table is a constant `parf` segment up to 0, a `samf` segment over
//!   (0, 1] and a constant `parf` segment beyond 1

use crate::curve::{ParametricCurve, ToneCurve};
use crate::icc::error::EncodeError;
use crate::icc::types::TypeSignature;
use crate::icc::writer::{ByteWriter, to_u32};
use crate::pipeline::{CurveStage, LinearStage, Pipeline, PipelineStage};

const TAG: &str = "mpet";

/// Encode a CLUT-free pipeline
pub fn encode_mpet(pipeline: &Pipeline) -> Result<Vec<u8>, EncodeError> {
    let elements = pipeline
        .stages()
        .iter()
        .enumerate()
        .map(|(index, stage)| match stage {
            PipelineStage::Linear(m) => encode_matrix_element(m),
            PipelineStage::Curves(c) => encode_curve_set(c),
            PipelineStage::Lookup(_) => Err(EncodeError::UnsupportedLayout {
                tag: TAG,
                reason: format!("stage {index} is a CLUT"),
            }),
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut w = ByteWriter::type_header(TypeSignature::MPET);
    w.u16(pipeline.input_channels() as u16);
    w.u16(pipeline.output_channels() as u16);
    w.u32(to_u32(elements.len())?);
    let mut offset = w.len() + 8 * elements.len();
    for element in &elements {
        w.u32(to_u32(offset)?);
        w.u32(to_u32(element.len())?);
        offset += element.len();
    }
    for element in elements {
        w.bytes(&element);
    }
    Ok(w.into_inner())
}

/// `matf`: 3x3 matrix, then offsets
fn encode_matrix_element(stage: &LinearStage) -> Result<Vec<u8>, EncodeError> {
    let mut w = ByteWriter::type_header(TypeSignature::MATRIX_ELEM);
    w.u16(3);
    w.u16(3);
    for v in stage.matrix().to_row_major() {
        w.f32(v)?;
    }
    for v in stage.offset_vector() {
        w.f32(v)?;
    }
    Ok(w.into_inner())
}

/// `cvst`: one segmented curve per channel
fn encode_curve_set(stage: &CurveStage) -> Result<Vec<u8>, EncodeError> {
    let channels = stage.channels() as u16;
    let curves = stage
        .curves()
        .iter()
        .map(encode_segmented_curve)
        .collect::<Result<Vec<_>, _>>()?;

    let mut w = ByteWriter::type_header(TypeSignature::CURVE_SET);
    w.u16(channels);
    w.u16(channels);
    let mut offset = w.len() + 8 * curves.len();
    for curve in &curves {
        w.u32(to_u32(offset)?);
        w.u32(to_u32(curve.len())?);
        offset += curve.len();
    }
    for curve in curves {
        w.bytes(&curve);
    }
    Ok(w.into_inner())
}

/// `curf`
fn encode_segmented_curve(curve: &ToneCurve) -> Result<Vec<u8>, EncodeError> {
    let mut w = ByteWriter::type_header(TypeSignature::SEGMENTED_CURVE);
    match curve {
        ToneCurve::Identity => {
            w.u16(1);
            w.u16(0);
            write_formula(&mut w, 1.0, 1.0, 0.0, 0.0)?;
        }
        ToneCurve::Parametric(ParametricCurve::Gamma { gamma }) => {
            w.u16(1);
            w.u16(0);
            write_formula(&mut w, *gamma, 1.0, 0.0, 0.0)?;
        }
        ToneCurve::Parametric(p) => {
            return Err(EncodeError::UnsupportedCurve {
                tag: TAG,
                family: p.family().name(),
            });
        }
        ToneCurve::Tabulated(samples) => {
            let (Some(&first), Some(&last)) = (samples.first(), samples.last()) else {
                return Err(EncodeError::UnsupportedLayout {
                    tag: TAG,
                    reason: "empty curve table".into(),
                });
            };
            w.u16(3);
            w.u16(0);
            w.f32(0.0)?;
            w.f32(1.0)?;
            write_formula(&mut w, 1.0, 0.0, 0.0, first)?;
            // First sample is implied by the previous segment's end value
            let mut seg = ByteWriter::type_header(TypeSignature::SAMPLED_SEGMENT);
            seg.u32(to_u32(samples.len() - 1)?);
            for &v in &samples[1..] {
                seg.f32(v)?;
            }
            w.bytes(&seg.into_inner());
            write_formula(&mut w, 1.0, 0.0, 0.0, last)?;
        }
    }
    Ok(w.into_inner())
}

/// `parf` function type 0: y = (a·x + b)^γ + c
fn write_formula(w: &mut ByteWriter, gamma: f64, a: f64, b: f64, c: f64) -> Result<(), EncodeError> {
    w.u32(TypeSignature::FORMULA_SEGMENT.0);
    w.u32(0);
    w.u16(0);
    w.u16(0);
    for v in [gamma, a, b, c] {
        w.f32(v)?;
    }
    Ok(())
}
