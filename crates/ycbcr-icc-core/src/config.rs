//! Build configuration
//!
//! Every choice that shapes a profile is resolved here once, before the
//! build starts: broadcast standard, primaries, transfer function, container
//! grammar and version, CLUT resolution and rendering intent.
//!
//! # JSON
//!
//! ```json
//! {
//!   "standard": "bt709",
//!   "primaries": "bt709",
//!   "transfer": { "kind": "power", "gamma": 2.4 },
//!   "tier": "limited",
//!   "version": "v2",
//!   "resolution": 24,
//!   "intent": "perceptual"
//! }
//! ```
//!
//! Every field is optional and defaults as in [`BuildConfig::default`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::color::{LumaCoefficients, Primaries};
use crate::curve::{CurveFamily, ParametricCurve, TABULATION_SIZE, ToneCurve};
use crate::error::{ConstructionError, Error, Result};
use crate::pipeline::{DEFAULT_RESOLUTION, MAX_RESOLUTION};

/// Broadcast standard supplying the luma coefficients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Standard {
    /// ITU-R BT.709-6
    #[default]
    Bt709,
    /// ITU-R BT.601-7
    Bt601,
}

impl Standard {
    pub fn luma(&self) -> LumaCoefficients {
        match self {
            Self::Bt709 => LumaCoefficients::BT709,
            Self::Bt601 => LumaCoefficients::BT601,
        }
    }

    /// Short tag used in file names
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Bt709 => "bt709-6",
            Self::Bt601 => "bt601-7",
        }
    }

    /// Recommendation title used in descriptions
    pub fn title(&self) -> &'static str {
        match self {
            Self::Bt709 => "ITU-R BT.709-6",
            Self::Bt601 => "ITU-R BT.601-7",
        }
    }
}

/// Named primaries set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PrimariesPreset {
    #[default]
    #[serde(rename = "bt709")]
    Bt709,
    #[serde(rename = "bt601-625")]
    Bt601_625,
    #[serde(rename = "bt601-525")]
    Bt601_525,
}

impl PrimariesPreset {
    pub fn primaries(&self) -> Primaries {
        match self {
            Self::Bt709 => Primaries::BT709,
            Self::Bt601_625 => Primaries::BT601_625,
            Self::Bt601_525 => Primaries::BT601_525,
        }
    }
}

/// Transfer function of the R'G'B' signal
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TransferFunction {
    /// BT.709 / BT.601 piecewise OETF
    #[default]
    Broadcast,
    /// Pure power-law display EOTF, L = V^γ
    Power { gamma: f64 },
}

impl TransferFunction {
    /// ITU-R BT.1886 reference display, γ = 2.4
    pub const BT1886: Self = Self::Power { gamma: 2.4 };

    /// Canonical decoding curve R'G'B' → linear RGB
    pub fn decoding_curve(&self) -> ParametricCurve {
        match *self {
            Self::Broadcast => ParametricCurve::BT709_INVERSE_OETF,
            Self::Power { gamma } => ParametricCurve::Gamma { gamma },
        }
    }

    /// Display-referred curves produce `mntr` profiles, scene-referred `spac`
    pub fn is_display_referred(&self) -> bool {
        matches!(self, Self::Power { .. })
    }

    fn file_suffix(&self) -> String {
        match *self {
            Self::Broadcast => String::new(),
            Self::Power { gamma } if gamma == 2.4 => "_bt1886".to_string(),
            Self::Power { gamma } => format!("_gamma{gamma}"),
        }
    }

    fn title_suffix(&self) -> String {
        match *self {
            Self::Broadcast => String::new(),
            Self::Power { gamma } if gamma == 2.4 => " + BT.1886".to_string(),
            Self::Power { gamma } => format!(" + gamma {gamma}"),
        }
    }
}

/// What the target container's stage grammar can express
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerTier {
    /// Curves, matrices and one CLUT per direction (lut16 / lutAToB / lutBToA)
    #[default]
    Limited,
    /// Adds float curve + matrix pipelines without a CLUT (DToB0 / BToD0)
    Extended,
}

impl ContainerTier {
    /// Curve families this tier stores without tabulation
    ///
    /// Tables are the fallback representation and are accepted everywhere.
    pub fn natively_expresses(&self, family: CurveFamily) -> bool {
        use CurveFamily::*;
        match self {
            Self::Limited => {
                matches!(family, Identity | Gamma | LinearPower | ScaledPower | Tabulated)
            }
            Self::Extended => matches!(family, Identity | Gamma | Tabulated),
        }
    }

    /// `curve` as stored by this tier: unchanged if native, tabulated otherwise
    pub fn express(&self, curve: &ToneCurve) -> std::result::Result<ToneCurve, ConstructionError> {
        if self.natively_expresses(curve.family()) {
            Ok(curve.clone())
        } else {
            tracing::debug!(family = %curve.family(), tier = ?self, "tabulating curve");
            curve.tabulate(TABULATION_SIZE)
        }
    }
}

/// ICC container major version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IccVersion {
    V2,
    #[default]
    V4,
}

impl IccVersion {
    pub fn tag(&self) -> &'static str {
        match self {
            Self::V2 => "v2",
            Self::V4 => "v4",
        }
    }
}

/// ICC rendering intent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenderingIntent {
    #[default]
    Perceptual,
    RelativeColorimetric,
    Saturation,
    AbsoluteColorimetric,
}

impl RenderingIntent {
    /// Header field value (ICC.1:2022 7.2.15)
    pub fn to_icc(&self) -> u32 {
        match self {
            Self::Perceptual => 0,
            Self::RelativeColorimetric => 1,
            Self::Saturation => 2,
            Self::AbsoluteColorimetric => 3,
        }
    }
}

/// Everything a build needs besides metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    pub standard: Standard,
    pub primaries: PrimariesPreset,
    pub transfer: TransferFunction,
    pub tier: ContainerTier,
    pub version: IccVersion,
    /// CLUT lattice points per axis
    pub resolution: usize,
    pub intent: RenderingIntent,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            standard: Standard::default(),
            primaries: PrimariesPreset::default(),
            transfer: TransferFunction::default(),
            tier: ContainerTier::default(),
            version: IccVersion::default(),
            resolution: DEFAULT_RESOLUTION,
            intent: RenderingIntent::default(),
        }
    }
}

impl BuildConfig {
    /// Reject combinations no container can carry
    pub fn validate(&self) -> Result<()> {
        if !(2..=MAX_RESOLUTION).contains(&self.resolution) {
            return Err(ConstructionError::InvalidResolution(self.resolution).into());
        }
        if self.tier == ContainerTier::Extended && self.version == IccVersion::V2 {
            return Err(Error::Config(
                "the extended tier needs DToB0/BToD0 tags, which only exist in ICC v4".into(),
            ));
        }
        if let TransferFunction::Power { gamma } = self.transfer {
            if !gamma.is_finite() || gamma <= 0.0 {
                return Err(ConstructionError::InvalidCurveParameters {
                    family: CurveFamily::Gamma.name(),
                    reason: format!("gamma must be positive and finite, got {gamma}"),
                }
                .into());
            }
        }
        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Config(format!("invalid configuration: {e}")))
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_json_str(&text)
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
    }

    /// e.g. `bt709-6_ycbcr_v2.icc`, `bt709-6_bt1886_ycbcr_v2.icc`, `bt601-7_ycbcr_v4.icc`
    pub fn default_file_name(&self) -> String {
        format!(
            "{}{}_ycbcr_{}.icc",
            self.standard.tag(),
            self.transfer.file_suffix(),
            self.version.tag()
        )
    }

    /// e.g. `ITU-R BT.709-6 + BT.1886 YCbCr ICC V2 profile`
    pub fn description(&self) -> String {
        format!(
            "{}{} YCbCr ICC {} profile",
            self.standard.title(),
            self.transfer.title_suffix(),
            self.version.tag().to_uppercase()
        )
    }
}
