//! Command-line arguments and their mapping onto [`BuildConfig`]

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use ycbcr_icc_core::{
    BuildConfig, ContainerTier, IccVersion, PrimariesPreset, RenderingIntent, Standard,
    TransferFunction,
};

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq)]
pub enum StandardArg {
    /// ITU-R BT.709-6 luma coefficients
    Bt709,
    /// ITU-R BT.601-7 luma coefficients
    Bt601,
}

impl StandardArg {
    pub fn to_standard(self) -> Standard {
        match self {
            StandardArg::Bt709 => Standard::Bt709,
            StandardArg::Bt601 => Standard::Bt601,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq)]
pub enum PrimariesArg {
    /// BT.709 / sRGB primaries
    Bt709,
    /// BT.601 625-line (EBU) primaries
    #[value(name = "bt601-625")]
    Bt601_625,
    /// BT.601 525-line (SMPTE C) primaries
    #[value(name = "bt601-525")]
    Bt601_525,
}

impl PrimariesArg {
    pub fn to_preset(self) -> PrimariesPreset {
        match self {
            PrimariesArg::Bt709 => PrimariesPreset::Bt709,
            PrimariesArg::Bt601_625 => PrimariesPreset::Bt601_625,
            PrimariesArg::Bt601_525 => PrimariesPreset::Bt601_525,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq)]
pub enum TransferArg {
    /// Piecewise broadcast OETF (scene-referred)
    Broadcast,
    /// BT.1886 reference display, gamma 2.4
    Bt1886,
    /// Pure power law; set the exponent with --gamma
    Power,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq)]
pub enum TierArg {
    /// lut16 / lutAToB / lutBToA only
    Limited,
    /// Also write float D2B0/B2D0 pipelines (v4 only)
    Extended,
}

impl TierArg {
    pub fn to_tier(self) -> ContainerTier {
        match self {
            TierArg::Limited => ContainerTier::Limited,
            TierArg::Extended => ContainerTier::Extended,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq)]
pub enum VersionArg {
    V2,
    V4,
}

impl VersionArg {
    pub fn to_version(self) -> IccVersion {
        match self {
            VersionArg::V2 => IccVersion::V2,
            VersionArg::V4 => IccVersion::V4,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq)]
pub enum IntentArg {
    Perceptual,
    RelativeColorimetric,
    Saturation,
    AbsoluteColorimetric,
}

impl IntentArg {
    pub fn to_intent(self) -> RenderingIntent {
        match self {
            IntentArg::Perceptual => RenderingIntent::Perceptual,
            IntentArg::RelativeColorimetric => RenderingIntent::RelativeColorimetric,
            IntentArg::Saturation => RenderingIntent::Saturation,
            IntentArg::AbsoluteColorimetric => RenderingIntent::AbsoluteColorimetric,
        }
    }
}

/// Generate a YCbCr ICC profile
#[derive(Parser, Debug)]
#[command(name = "ycbcr-icc", about)]
pub struct Args {
    /// JSON build configuration; flags below override its fields
    #[arg(long, value_name = "JSON")]
    pub config: Option<PathBuf>,

    /// Luma/chroma matrix standard
    #[arg(long, value_enum)]
    pub standard: Option<StandardArg>,

    /// RGB primaries
    #[arg(long, value_enum)]
    pub primaries: Option<PrimariesArg>,

    /// Transfer function
    #[arg(long, value_enum)]
    pub transfer: Option<TransferArg>,

    /// Exponent for --transfer power
    #[arg(long, requires = "transfer")]
    pub gamma: Option<f64>,

    /// Container capability tier
    #[arg(long, value_enum)]
    pub tier: Option<TierArg>,

    /// ICC container version
    #[arg(long = "version", value_enum, value_name = "VERSION")]
    pub icc_version: Option<VersionArg>,

    /// CLUT grid points per axis
    #[arg(long)]
    pub resolution: Option<usize>,

    /// Rendering intent recorded in the header
    #[arg(long, value_enum)]
    pub intent: Option<IntentArg>,

    /// Output file (default derived from the configuration, e.g. bt709-6_ycbcr_v4.icc)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also write the base RGB matrix/TRC profile to this path
    #[arg(long, value_name = "PATH")]
    pub emit_base: Option<PathBuf>,

    /// Print the resolved configuration as JSON and exit
    #[arg(long)]
    pub print_config: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Overlay the flags that were given onto `config`
    pub fn apply(&self, config: &mut BuildConfig) -> anyhow::Result<()> {
        if let Some(standard) = self.standard {
            config.standard = standard.to_standard();
        }
        if let Some(primaries) = self.primaries {
            config.primaries = primaries.to_preset();
        }
        match (self.transfer, self.gamma) {
            (Some(TransferArg::Broadcast), None) => config.transfer = TransferFunction::Broadcast,
            (Some(TransferArg::Bt1886), None) => config.transfer = TransferFunction::BT1886,
            (Some(TransferArg::Power), Some(gamma)) => {
                config.transfer = TransferFunction::Power { gamma }
            }
            (Some(TransferArg::Power), None) => anyhow::bail!("--transfer power needs --gamma"),
            (Some(_), Some(_)) => anyhow::bail!("--gamma only applies to --transfer power"),
            (None, _) => {}
        }
        if let Some(tier) = self.tier {
            config.tier = tier.to_tier();
        }
        if let Some(version) = self.icc_version {
            config.version = version.to_version();
        }
        if let Some(resolution) = self.resolution {
            config.resolution = resolution;
        }
        if let Some(intent) = self.intent {
            config.intent = intent.to_intent();
        }
        Ok(())
    }
}
