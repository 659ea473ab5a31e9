//! Pipeline Stages
//!
//! Individual components of a transform pipeline. Each stage keeps one
//! physical conversion step; neighbouring linear stages are never fused.

use crate::curve::ToneCurve;
use crate::error::ConstructionError;
use crate::math::Matrix3x3;
use crate::pipeline::Lut3d;

/// A pipeline stage
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineStage {
    /// One tone curve per channel
    Curves(CurveStage),
    /// 3x3 matrix plus optional offset
    Linear(LinearStage),
    /// Sampled 3D lookup table
    Lookup(Lut3d),
}

impl PipelineStage {
    pub fn input_channels(&self) -> usize {
        match self {
            Self::Curves(c) => c.channels(),
            Self::Linear(_) | Self::Lookup(_) => 3,
        }
    }

    pub fn output_channels(&self) -> usize {
        self.input_channels()
    }

    /// Short label for diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Curves(_) => "curves",
            Self::Linear(_) => "matrix",
            Self::Lookup(_) => "clut",
        }
    }

    #[inline]
    pub fn apply(&self, x: [f64; 3]) -> [f64; 3] {
        match self {
            Self::Curves(c) => c.apply(x),
            Self::Linear(m) => m.apply(x),
            Self::Lookup(lut) => lut.evaluate(x),
        }
    }
}

impl From<CurveStage> for PipelineStage {
    fn from(stage: CurveStage) -> Self {
        Self::Curves(stage)
    }
}

impl From<LinearStage> for PipelineStage {
    fn from(stage: LinearStage) -> Self {
        Self::Linear(stage)
    }
}

impl From<Lut3d> for PipelineStage {
    fn from(lut: Lut3d) -> Self {
        Self::Lookup(lut)
    }
}

/// Per-channel tone curves
#[derive(Debug, Clone, PartialEq)]
pub struct CurveStage {
    curves: Vec<ToneCurve>,
}

impl CurveStage {
    /// Stage from explicit curves; every curve is validated
    pub fn new(curves: Vec<ToneCurve>) -> Result<Self, ConstructionError> {
        for curve in &curves {
            curve.validate()?;
        }
        Ok(Self { curves })
    }

    /// The same curve on each of `channels` channels
    pub fn uniform(curve: &ToneCurve, channels: usize) -> Result<Self, ConstructionError> {
        Self::new(vec![curve.clone(); channels])
    }

    /// Passthrough curves
    pub fn identity(channels: usize) -> Self {
        Self {
            curves: vec![ToneCurve::Identity; channels],
        }
    }

    pub fn channels(&self) -> usize {
        self.curves.len()
    }

    pub fn curves(&self) -> &[ToneCurve] {
        &self.curves
    }

    pub fn is_identity(&self) -> bool {
        self.curves.iter().all(ToneCurve::is_identity)
    }

    /// Apply curve `i` to channel `i`; channels without a curve pass through
    #[inline]
    pub fn apply(&self, x: [f64; 3]) -> [f64; 3] {
        std::array::from_fn(|i| match self.curves.get(i) {
            Some(curve) => curve.evaluate(x[i]),
            None => x[i],
        })
    }
}

/// `y = M·x + offset`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearStage {
    matrix: Matrix3x3,
    offset: Option<[f64; 3]>,
}

impl LinearStage {
    pub fn new(matrix: Matrix3x3) -> Self {
        Self {
            matrix,
            offset: None,
        }
    }

    pub fn with_offset(matrix: Matrix3x3, offset: [f64; 3]) -> Self {
        Self {
            matrix,
            offset: Some(offset),
        }
    }

    /// Identity matrix with an offset, e.g. the chroma shift
    pub fn offset(offset: [f64; 3]) -> Self {
        Self::with_offset(Matrix3x3::identity(), offset)
    }

    pub fn matrix(&self) -> &Matrix3x3 {
        &self.matrix
    }

    /// Offset vector, zero when absent
    pub fn offset_vector(&self) -> [f64; 3] {
        self.offset.unwrap_or([0.0; 3])
    }

    pub fn has_offset(&self) -> bool {
        self.offset.is_some()
    }

    #[inline]
    pub fn apply(&self, x: [f64; 3]) -> [f64; 3] {
        let y = self.matrix.multiply_vec(x);
        match self.offset {
            Some(o) => [y[0] + o[0], y[1] + o[1], y[2] + o[2]],
            None => y,
        }
    }
}
