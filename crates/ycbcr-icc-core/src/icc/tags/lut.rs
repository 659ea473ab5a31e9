//! `mft2`, `mAB ` and `mBA ` tags
//!
//! # PCS encoding
//!
//! 16-bit XYZ PCS values are `X · 32768`, so the normalized [0, 1] value a
//! LUT tag reads or writes on its PCS side is `X · 32768 / 65535`. Pipelines
//! work in plain XYZ; the conversion is folded into the matrix next to the
//! PCS when the tag is written. CLUTs sampled with
//! [`ChannelRange::PCS_XYZ`] already use this encoding.

use crate::icc::error::EncodeError;
use crate::icc::tags::curves::{encode_curve, quantize_unit};
use crate::icc::types::TypeSignature;
use crate::icc::writer::{ByteWriter, to_u32};
use crate::pipeline::{ChannelRange, CurveStage, LinearStage, Lut3d, Pipeline, PipelineStage};

/// Plain XYZ → normalized 16-bit PCS
pub const PCS_XYZ_ENCODE: f64 = 32768.0 / 65535.0;
/// Normalized 16-bit PCS → plain XYZ
pub const PCS_XYZ_DECODE: f64 = 65535.0 / 32768.0;

/// Entries per curve table in `mft2` when a curve is not the identity
const LUT16_TABLE_SIZE: usize = 1024;

/// Which side of a LUT tag faces the PCS
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// AToB: device values in, PCS out
    DeviceToPcs,
    /// BToA: PCS in, device values out
    PcsToDevice,
}

/// lut16Type: input curves, CLUT, output curves
pub fn encode_lut16(pipeline: &Pipeline, direction: Direction) -> Result<Vec<u8>, EncodeError> {
    const TAG: &str = "mft2";
    let [input, clut, output] = pipeline.stages() else {
        return Err(layout(TAG, format!("expected 3 stages, got {}", pipeline.len())));
    };
    let input = curves(TAG, input, 0)?;
    let lut = lookup(TAG, clut, 1)?;
    let output = curves(TAG, output, 2)?;

    let (domain, range) = match direction {
        Direction::DeviceToPcs => (ChannelRange::UNIT, ChannelRange::PCS_XYZ),
        Direction::PcsToDevice => (ChannelRange::PCS_XYZ, ChannelRange::UNIT),
    };
    if lut.input_domain() != &[domain; 3] || lut.output_range() != &[range; 3] {
        return Err(layout(TAG, "CLUT ranges do not match the tag's PCS side".into()));
    }

    let in_entries = table_size(input);
    let out_entries = table_size(output);

    let mut w = ByteWriter::type_header(TypeSignature::LUT16);
    w.u8(3);
    w.u8(3);
    w.u8(grid_points(lut)?);
    w.u8(0);
    // Matrix, only applied by readers when the input is XYZ; always identity here
    for i in 0..9 {
        w.s15(if i % 4 == 0 { 1.0 } else { 0.0 })?;
    }
    w.u16(in_entries as u16);
    w.u16(out_entries as u16);
    write_tables(&mut w, input, in_entries);
    for node in lut.samples() {
        for &v in node {
            w.u16(v);
        }
    }
    write_tables(&mut w, output, out_entries);
    Ok(w.into_inner())
}

/// lutAToBType from `A curves | CLUT | M curves | matrix | B curves`
pub fn encode_lut_atob(pipeline: &Pipeline) -> Result<Vec<u8>, EncodeError> {
    const TAG: &str = "mAB ";
    let [a, clut, m, matrix, b] = pipeline.stages() else {
        return Err(layout(TAG, format!("expected 5 stages, got {}", pipeline.len())));
    };
    let a = curves(TAG, a, 0)?;
    let lut = unit_lookup(TAG, clut, 1)?;
    let m = curves(TAG, m, 2)?;
    let matrix = linear(TAG, matrix, 3)?;
    let b = curves(TAG, b, 4)?;

    let scaled = LinearStage::with_offset(
        matrix.matrix().scale(PCS_XYZ_ENCODE),
        matrix.offset_vector().map(|o| o * PCS_XYZ_ENCODE),
    );
    encode_multi_stage(TypeSignature::LUTA2B, b, &scaled, m, lut, a)
}

/// lutBToAType from `B curves | matrix | M curves | CLUT | A curves`
pub fn encode_lut_btoa(pipeline: &Pipeline) -> Result<Vec<u8>, EncodeError> {
    const TAG: &str = "mBA ";
    let [b, matrix, m, clut, a] = pipeline.stages() else {
        return Err(layout(TAG, format!("expected 5 stages, got {}", pipeline.len())));
    };
    let b = curves(TAG, b, 0)?;
    let matrix = linear(TAG, matrix, 1)?;
    let m = curves(TAG, m, 2)?;
    let lut = unit_lookup(TAG, clut, 3)?;
    let a = curves(TAG, a, 4)?;

    let scaled = LinearStage::with_offset(
        matrix.matrix().scale(PCS_XYZ_DECODE),
        matrix.offset_vector(),
    );
    encode_multi_stage(TypeSignature::LUTB2A, b, &scaled, m, lut, a)
}

/// Shared body of `mAB ` and `mBA `; elements are written B, matrix, M, CLUT, A
fn encode_multi_stage(
    sig: TypeSignature,
    b: &CurveStage,
    matrix: &LinearStage,
    m: &CurveStage,
    lut: &Lut3d,
    a: &CurveStage,
) -> Result<Vec<u8>, EncodeError> {
    let mut w = ByteWriter::type_header(sig);
    w.u8(3);
    w.u8(3);
    w.u16(0);
    let offsets_at = w.len();
    w.zeros(20);

    let mut offsets = [0u32; 5];

    offsets[0] = to_u32(w.len())?;
    write_curve_set(&mut w, b)?;

    offsets[1] = to_u32(w.len())?;
    for v in matrix.matrix().to_row_major() {
        w.s15(v)?;
    }
    for v in matrix.offset_vector() {
        w.s15(v)?;
    }

    offsets[2] = to_u32(w.len())?;
    write_curve_set(&mut w, m)?;

    offsets[3] = to_u32(w.len())?;
    let mut grid = [0u8; 16];
    grid[..3].fill(grid_points(lut)?);
    w.bytes(&grid);
    w.u8(2);
    w.zeros(3);
    for node in lut.samples() {
        for &v in node {
            w.u16(v);
        }
    }
    w.pad_to_4();

    offsets[4] = to_u32(w.len())?;
    write_curve_set(&mut w, a)?;

    for (i, offset) in offsets.into_iter().enumerate() {
        w.patch_u32(offsets_at + 4 * i, offset);
    }
    Ok(w.into_inner())
}

fn write_curve_set(w: &mut ByteWriter, stage: &CurveStage) -> Result<(), EncodeError> {
    for curve in stage.curves() {
        w.bytes(&encode_curve(curve)?);
        w.pad_to_4();
    }
    Ok(())
}

fn table_size(stage: &CurveStage) -> usize {
    if stage.is_identity() { 2 } else { LUT16_TABLE_SIZE }
}

fn write_tables(w: &mut ByteWriter, stage: &CurveStage, entries: usize) {
    let max_idx = (entries - 1) as f64;
    for curve in stage.curves() {
        for i in 0..entries {
            w.u16(quantize_unit(curve.evaluate(i as f64 / max_idx)));
        }
    }
}

fn grid_points(lut: &Lut3d) -> Result<u8, EncodeError> {
    u8::try_from(lut.resolution()).map_err(|_| EncodeError::ValueOutOfRange {
        what: "CLUT grid points",
        value: lut.resolution() as f64,
    })
}

fn layout(tag: &'static str, reason: String) -> EncodeError {
    EncodeError::UnsupportedLayout { tag, reason }
}

fn curves<'a>(
    tag: &'static str,
    stage: &'a PipelineStage,
    index: usize,
) -> Result<&'a CurveStage, EncodeError> {
    match stage {
        PipelineStage::Curves(c) if c.channels() == 3 => Ok(c),
        other => Err(layout(tag, format!("stage {index} must be 3 curves, got {}", other.kind()))),
    }
}

fn linear<'a>(
    tag: &'static str,
    stage: &'a PipelineStage,
    index: usize,
) -> Result<&'a LinearStage, EncodeError> {
    match stage {
        PipelineStage::Linear(m) => Ok(m),
        other => Err(layout(tag, format!("stage {index} must be a matrix, got {}", other.kind()))),
    }
}

fn lookup<'a>(
    tag: &'static str,
    stage: &'a PipelineStage,
    index: usize,
) -> Result<&'a Lut3d, EncodeError> {
    match stage {
        PipelineStage::Lookup(lut) => Ok(lut),
        other => Err(layout(tag, format!("stage {index} must be a CLUT, got {}", other.kind()))),
    }
}

fn unit_lookup<'a>(
    tag: &'static str,
    stage: &'a PipelineStage,
    index: usize,
) -> Result<&'a Lut3d, EncodeError> {
    let lut = lookup(tag, stage, index)?;
    if lut.input_domain() != &[ChannelRange::UNIT; 3]
        || lut.output_range() != &[ChannelRange::UNIT; 3]
    {
        return Err(layout(tag, "CLUT must map [0, 1] onto [0, 1]".into()));
    }
    Ok(lut)
}
