//! # ycbcr-icc - YCbCr ICC profile construction
//!
//! Builds matched YCbCr → XYZ and XYZ → YCbCr transform pipelines for the
//! ITU-R BT.709 and BT.601 video standards and serializes them as ICC v2 or
//! v4 profiles.
//!
//! ## Components
//!
//! - **Tone curves**: parametric transfer functions with analytic inverses,
//!   tabulated when a container cannot express them
//! - **Pipelines**: curve, matrix and 3D lookup stages with checked channel counts
//! - **Builder**: derives both directions from one base RGB profile
//! - **Encoder**: ICC tags (`mft2`, `mAB `/`mBA `, `mpet`) and the MD5 profile ID
//!
//! ## Quick Start
//!
//! ```no_run
//! use ycbcr_icc_core::{
//!     BuildConfig, BuildContext, DualDirectionBuilder, IccSerializer, ProfileSerializer,
//! };
//!
//! let config = BuildConfig::default();
//! let profile = DualDirectionBuilder::new(config.clone())
//!     .build(&BuildContext::default())?;
//!
//! let serializer = IccSerializer;
//! let id = serializer.fingerprint(&profile)?;
//! serializer.persist(&profile, &id, config.default_file_name().as_ref())?;
//! # Ok::<(), ycbcr_icc_core::Error>(())
//! ```

pub mod color;
pub mod config;
pub mod context;
pub mod curve;
pub mod error;
pub mod icc;
pub mod math;
pub mod pipeline;
pub mod profile;

pub use color::{Chromaticity, D50, D65, LumaCoefficients, Primaries, WhitePoint, Xyz};
pub use config::{
    BuildConfig, ContainerTier, IccVersion, PrimariesPreset, RenderingIntent, Standard,
    TransferFunction,
};
pub use context::{BuildContext, LogSink, TracingSink};
pub use curve::{CurveFamily, ParametricCurve, ToneCurve};
pub use error::{ConstructionError, Error, Result};
pub use icc::{IccSerializer, ProfileId, ProfileSerializer};
pub use math::Matrix3x3;
pub use pipeline::{Lut3d, Pipeline, PipelineStage};
pub use profile::{
    ColorProfile, DualDirectionBuilder, ExtendedPipelines, PrimaryProfileBuilder,
    ProfileMetadata, RgbProfile,
};

/// Version of ycbcr-icc
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build a profile for `config` and return its encoded bytes, profile ID included
pub fn build_icc(config: &BuildConfig, ctx: &BuildContext) -> Result<Vec<u8>> {
    let profile = DualDirectionBuilder::new(config.clone()).build(ctx)?;
    IccSerializer.to_bytes(&profile)
}
