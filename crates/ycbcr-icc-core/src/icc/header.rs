//! ICC Profile Header
//!
//! The ICC profile header is exactly 128 bytes and contains basic profile information.
//! See ICC.1:2022 Section 7.2.

use super::error::EncodeError;
use super::types::{DateTimeNumber, S15Fixed16};
use crate::color::D50;
use crate::config::IccVersion;

/// Profile file signature - must be 'acsp' (0x61637370)
pub const PROFILE_SIGNATURE: u32 = 0x61637370;

pub const HEADER_SIZE: usize = 128;

/// Byte ranges zeroed before computing the profile ID (ICC.1:2022 7.2.18)
pub const FLAGS_RANGE: std::ops::Range<usize> = 44..48;
pub const INTENT_RANGE: std::ops::Range<usize> = 64..68;
pub const PROFILE_ID_RANGE: std::ops::Range<usize> = 84..100;

/// Profile/Device class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileClass {
    /// 'mntr'
    Display,
    /// 'spac'
    ColorSpace,
}

impl ProfileClass {
    pub fn to_u32(self) -> u32 {
        match self {
            Self::Display => 0x6D6E7472,
            Self::ColorSpace => 0x73706163,
        }
    }
}

/// Data color spaces this crate writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    /// 'XYZ '
    Xyz,
    /// 'YCbr'
    YCbCr,
    /// 'RGB '
    Rgb,
}

impl ColorSpace {
    pub fn to_u32(self) -> u32 {
        match self {
            Self::Xyz => 0x58595A20,
            Self::YCbCr => 0x59436272,
            Self::Rgb => 0x52474220,
        }
    }
}

/// Version field: major byte, then minor and bugfix nibbles
pub fn version_field(version: IccVersion) -> u32 {
    match version {
        IccVersion::V2 => 0x0210_0000,
        IccVersion::V4 => 0x0430_0000,
    }
}

/// Fields of the 128-byte header this crate sets
#[derive(Debug, Clone, PartialEq)]
pub struct IccHeader {
    pub version: u32,
    pub device_class: ProfileClass,
    pub color_space: ColorSpace,
    pub pcs: ColorSpace,
    pub creation_date: DateTimeNumber,
    pub manufacturer: u32,
    pub model: u32,
    pub rendering_intent: u32,
    pub creator: u32,
}

impl IccHeader {
    /// Header with XYZ PCS, perceptual intent and empty identification fields
    pub fn new(device_class: ProfileClass, color_space: ColorSpace, version: IccVersion) -> Self {
        Self {
            version: version_field(version),
            device_class,
            color_space,
            pcs: ColorSpace::Xyz,
            creation_date: DateTimeNumber::default(),
            manufacturer: 0,
            model: 0,
            rendering_intent: 0,
            creator: 0,
        }
    }

    /// Serialize with the given total profile size; the profile ID is left zero
    pub fn encode(&self, size: u32) -> Result<[u8; HEADER_SIZE], EncodeError> {
        let mut out = [0u8; HEADER_SIZE];
        let mut put = |at: usize, v: u32| out[at..at + 4].copy_from_slice(&v.to_be_bytes());

        put(0, size);
        put(8, self.version);
        put(12, self.device_class.to_u32());
        put(16, self.color_space.to_u32());
        put(20, self.pcs.to_u32());
        put(36, PROFILE_SIGNATURE);
        put(48, self.manufacturer);
        put(52, self.model);
        put(64, self.rendering_intent);
        put(68, S15Fixed16::from_f64(D50.xyz.x)?.0 as u32);
        put(72, S15Fixed16::from_f64(D50.xyz.y)?.0 as u32);
        put(76, S15Fixed16::from_f64(D50.xyz.z)?.0 as u32);
        put(80, self.creator);
        out[24..36].copy_from_slice(&self.creation_date.to_bytes());
        Ok(out)
    }
}
