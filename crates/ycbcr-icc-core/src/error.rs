//! Error types for ycbcr-icc

use std::path::PathBuf;

use thiserror::Error;

/// Result type for ycbcr-icc operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or writing a profile
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A pipeline, curve or table could not be constructed; the build is aborted
    #[error("Construction error: {0}")]
    Construction(#[from] ConstructionError),

    /// The finished profile could not be fingerprinted
    #[error("Checksum error: {0}")]
    Checksum(String),

    /// The finished profile could not be written
    #[error("Cannot write profile to {}: {source}", path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid build configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Invariant violations detected while assembling curves, tables and pipelines
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ConstructionError {
    /// A tone curve was given parameters outside its family's valid domain
    #[error("invalid {family} curve parameters: {reason}")]
    InvalidCurveParameters { family: &'static str, reason: String },

    /// Adjacent pipeline stages disagree on channel count
    #[error("channel mismatch at stage {stage}: expected {expected} channels, got {actual}")]
    ChannelMismatch {
        stage: usize,
        expected: usize,
        actual: usize,
    },

    /// CLUT resolution outside 2..=255
    #[error("invalid CLUT resolution {0}: must be between 2 and 255")]
    InvalidResolution(usize),

    /// A matrix that must be inverted is singular
    #[error("singular matrix: {0}")]
    SingularMatrix(&'static str),

    /// A pipeline was assembled without stages
    #[error("pipeline has no stages")]
    EmptyPipeline,
}

impl ConstructionError {
    /// Numeric code reported to the build context's log sink
    pub fn code(&self) -> u32 {
        match self {
            Self::InvalidCurveParameters { .. } => 1,
            Self::ChannelMismatch { .. } => 2,
            Self::InvalidResolution(_) => 3,
            Self::SingularMatrix(_) => 4,
            Self::EmptyPipeline => 5,
        }
    }

    pub(crate) fn curve(family: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidCurveParameters {
            family,
            reason: reason.into(),
        }
    }
}
