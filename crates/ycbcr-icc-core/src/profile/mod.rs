//! YCbCr color profiles
//!
//! A [`ColorProfile`] is the finished product of one build pass: the matched
//! forward (YCbCr → XYZ) and inverse (XYZ → YCbCr) pipelines, optional
//! float pipelines for containers with the richer grammar, and the values
//! shared with the base RGB profile they were derived from.
//!
//! # Example
//!
//! ```
//! use ycbcr_icc_core::{BuildConfig, BuildContext, DualDirectionBuilder};
//!
//! let profile = DualDirectionBuilder::new(BuildConfig::default())
//!     .build(&BuildContext::default())
//!     .unwrap();
//! let white = profile.to_reference([1.0, 0.5, 0.5]);
//! assert!((white[1] - 1.0).abs() < 0.05);
//! ```

mod base;
mod builder;

pub use base::{PrimaryProfileBuilder, RgbProfile};
pub use builder::DualDirectionBuilder;

use crate::color::{Primaries, WhitePoint};
use crate::config::{BuildConfig, RenderingIntent};
use crate::curve::ToneCurve;
use crate::icc::DateTimeNumber;
use crate::math::Matrix3x3;
use crate::pipeline::Pipeline;

/// Descriptive data carried into the container untouched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileMetadata {
    pub description: String,
    pub copyright: String,
    /// Device manufacturer description (`dmnd`)
    pub manufacturer: String,
    /// Device model description (`dmdd`)
    pub model: String,
    /// Header manufacturer signature, 0 when unset
    pub manufacturer_signature: u32,
    /// Header model signature, 0 when unset
    pub model_signature: u32,
    /// All-zero unless stamped by the caller, keeping builds reproducible
    pub creation_date: DateTimeNumber,
}

impl ProfileMetadata {
    /// Description derived from `config`, generic remaining fields
    pub fn for_config(config: &BuildConfig) -> Self {
        Self {
            description: config.description(),
            copyright: "No copyright, use freely".to_string(),
            manufacturer: "ycbcr-icc".to_string(),
            model: env!("CARGO_PKG_VERSION").to_string(),
            manufacturer_signature: 0,
            model_signature: 0,
            creation_date: DateTimeNumber::default(),
        }
    }
}

/// Float pipelines without a CLUT, carried by `D2B0`/`B2D0`
#[derive(Debug, Clone, PartialEq)]
pub struct ExtendedPipelines {
    pub forward: Pipeline,
    pub inverse: Pipeline,
}

/// A finished YCbCr profile
#[derive(Debug, Clone, PartialEq)]
pub struct ColorProfile {
    pub(crate) config: BuildConfig,
    pub(crate) white_point: WhitePoint,
    pub(crate) primaries: Primaries,
    pub(crate) tone_curve: ToneCurve,
    pub(crate) adaptation: Matrix3x3,
    pub(crate) forward: Pipeline,
    pub(crate) inverse: Pipeline,
    pub(crate) extended: Option<ExtendedPipelines>,
    pub(crate) metadata: ProfileMetadata,
}

impl ColorProfile {
    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Source white the reference XYZ values are relative to
    pub fn white_point(&self) -> &WhitePoint {
        &self.white_point
    }

    pub fn primaries(&self) -> &Primaries {
        &self.primaries
    }

    /// Canonical decoding curve, identical to the base profile's
    pub fn tone_curve(&self) -> &ToneCurve {
        &self.tone_curve
    }

    /// Source white → D50 adaptation, identical to the base profile's
    pub fn adaptation(&self) -> &Matrix3x3 {
        &self.adaptation
    }

    /// YCbCr → XYZ in the limited grammar
    pub fn forward(&self) -> &Pipeline {
        &self.forward
    }

    /// XYZ → YCbCr in the limited grammar
    pub fn inverse(&self) -> &Pipeline {
        &self.inverse
    }

    pub fn extended(&self) -> Option<&ExtendedPipelines> {
        self.extended.as_ref()
    }

    pub fn intent(&self) -> RenderingIntent {
        self.config.intent
    }

    pub fn metadata(&self) -> &ProfileMetadata {
        &self.metadata
    }

    /// Replace the descriptive metadata; pipelines are untouched
    pub fn with_metadata(mut self, metadata: ProfileMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Encoded Y Cb Cr (chroma offset by 0.5) → XYZ through the forward pipeline
    pub fn to_reference(&self, ycbcr: [f64; 3]) -> [f64; 3] {
        self.forward.evaluate(ycbcr)
    }

    /// XYZ → encoded Y Cb Cr through the inverse pipeline
    pub fn to_encoded(&self, xyz: [f64; 3]) -> [f64; 3] {
        self.inverse.evaluate(xyz)
    }
}
