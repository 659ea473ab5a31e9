//! Transform pipelines
//!
//! A [`Pipeline`] is an ordered list of curve, matrix and lookup stages with
//! declared input and output channel counts. Assembly checks that every
//! stage boundary agrees on channel count; evaluation applies the stages in
//! order.
//!
//! # Canonical pipelines
//!
//! Forward (encoded → reference):
//! chroma offset → YCbCr→R'G'B' → inverse OETF → RGB→XYZ
//!
//! Inverse (reference → encoded):
//! XYZ→RGB → OETF → R'G'B'→YCbCr → chroma offset
//!
//! Containers with a limited grammar receive these with part of the chain
//! collapsed into a [`Lut3d`]; see [`crate::profile::DualDirectionBuilder`].

mod clut;
mod stages;

pub use clut::{ChannelRange, DEFAULT_RESOLUTION, Lut3d, MAX_RESOLUTION};
pub use stages::{CurveStage, LinearStage, PipelineStage};

use crate::error::ConstructionError;

/// An evaluable chain of stages
#[derive(Debug, Clone, PartialEq)]
pub struct Pipeline {
    input_channels: usize,
    output_channels: usize,
    stages: Vec<PipelineStage>,
}

impl Pipeline {
    /// Chain `stages`, checking channel counts at every boundary
    pub fn assemble(
        input_channels: usize,
        output_channels: usize,
        stages: Vec<PipelineStage>,
    ) -> Result<Self, ConstructionError> {
        if stages.is_empty() {
            return Err(ConstructionError::EmptyPipeline);
        }

        let mut expected = input_channels;
        for (index, stage) in stages.iter().enumerate() {
            if stage.input_channels() != expected {
                return Err(ConstructionError::ChannelMismatch {
                    stage: index,
                    expected,
                    actual: stage.input_channels(),
                });
            }
            expected = stage.output_channels();
        }
        if expected != output_channels {
            return Err(ConstructionError::ChannelMismatch {
                stage: stages.len(),
                expected: output_channels,
                actual: expected,
            });
        }

        Ok(Self {
            input_channels,
            output_channels,
            stages,
        })
    }

    pub fn input_channels(&self) -> usize {
        self.input_channels
    }

    pub fn output_channels(&self) -> usize {
        self.output_channels
    }

    pub fn stages(&self) -> &[PipelineStage] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Always false for an assembled pipeline
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Number of CLUT stages
    pub fn lookup_count(&self) -> usize {
        self.stages
            .iter()
            .filter(|s| matches!(s, PipelineStage::Lookup(_)))
            .count()
    }

    /// Apply every stage in order
    pub fn evaluate(&self, input: [f64; 3]) -> [f64; 3] {
        self.stages.iter().fold(input, |x, stage| stage.apply(x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::{ParametricCurve, ToneCurve};
    use crate::math::Matrix3x3;

    #[test]
    fn test_evaluates_in_order() {
        let p = Pipeline::assemble(
            3,
            3,
            vec![
                LinearStage::offset([0.5, 0.0, 0.0]).into(),
                CurveStage::uniform(&ToneCurve::Parametric(ParametricCurve::Gamma { gamma: 2.0 }), 3)
                    .unwrap()
                    .into(),
                LinearStage::new(Matrix3x3::diagonal(2.0, 2.0, 2.0)).into(),
            ],
        )
        .unwrap();
        assert_eq!(p.len(), 3);
        assert_eq!(p.lookup_count(), 0);
        // (0 + 0.5)² · 2 = 0.5 ; 0.5² · 2 = 0.5 ; 1² · 2 = 2
        assert_eq!(p.evaluate([0.0, 0.5, 1.0]), [0.5, 0.5, 2.0]);
    }

    #[test]
    fn test_empty_pipeline_rejected() {
        assert_eq!(
            Pipeline::assemble(3, 3, Vec::new()).unwrap_err(),
            ConstructionError::EmptyPipeline
        );
    }

    #[test]
    fn test_channel_mismatch_between_stages() {
        let err = Pipeline::assemble(
            3,
            3,
            vec![
                CurveStage::identity(3).into(),
                CurveStage::identity(4).into(),
                CurveStage::identity(3).into(),
            ],
        )
        .unwrap_err();
        assert_eq!(
            err,
            ConstructionError::ChannelMismatch {
                stage: 1,
                expected: 3,
                actual: 4
            }
        );
    }

    #[test]
    fn test_declared_counts_enforced() {
        let err = Pipeline::assemble(4, 3, vec![CurveStage::identity(3).into()]).unwrap_err();
        assert_eq!(
            err,
            ConstructionError::ChannelMismatch {
                stage: 0,
                expected: 4,
                actual: 3
            }
        );

        let err = Pipeline::assemble(3, 1, vec![CurveStage::identity(3).into()]).unwrap_err();
        assert_eq!(
            err,
            ConstructionError::ChannelMismatch {
                stage: 1,
                expected: 1,
                actual: 3
            }
        );
    }
}
