//! ICC Profile Encoding
//!
//! Serializes a finished [`ColorProfile`] (and the base [`RgbProfile`]) into
//! ICC.1 bytes.
//!
//! # Structure
//!
//! An ICC profile consists of:
//! 1. A 128-byte header
//! 2. A tag table listing all tags
//! 3. Tag data, 4-byte aligned
//!
//! # Tags written for a YCbCr profile
//!
//! | tag            | v2        | v4                |
//! |----------------|-----------|-------------------|
//! | `desc`         | `desc`    | `mluc`            |
//! | `cprt`         | `text`    | `mluc`            |
//! | `dmnd`, `dmdd` | `desc`    | `mluc`            |
//! | `wtpt`         | source white | D50            |
//! | `chad`         | `sf32`    | `sf32`            |
//! | `A2B0`         | `mft2`    | `mAB `            |
//! | `B2A0`         | `mft2`    | `mBA `            |
//! | `D2B0`, `B2D0` | -         | `mpet` (extended) |
//!
//! # Profile ID
//!
//! MD5 over the whole profile with the flags, rendering intent and profile ID
//! header fields zeroed (ICC.1:2022 7.2.18).

pub mod header;
pub mod tags;

mod error;
mod types;
mod writer;

pub use error::EncodeError;
pub use header::{ColorSpace, IccHeader, ProfileClass};
pub use types::{DateTimeNumber, S15Fixed16, TagSignature, TypeSignature};

use std::fmt;
use std::path::Path;

use crate::color::D50;
use crate::config::IccVersion;
use crate::error::{Error, Result};
use crate::profile::{ColorProfile, ProfileMetadata, RgbProfile};
use header::{FLAGS_RANGE, INTENT_RANGE, PROFILE_ID_RANGE};
use tags::curves::encode_curve;
use tags::lut::{Direction, encode_lut_atob, encode_lut_btoa, encode_lut16};
use tags::mpe::encode_mpet;
use tags::text::{encode_description, encode_plain};
use tags::xyz::{encode_sf32_matrix, encode_xyz};
use writer::ProfileWriter;

/// MD5 profile identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProfileId(pub [u8; 16]);

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.0 {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

/// Fingerprints and writes finished profiles
pub trait ProfileSerializer {
    /// Compute the content checksum of `profile`
    fn fingerprint(&self, profile: &ColorProfile) -> Result<ProfileId>;

    /// Write `profile`, stamped with `id`, to `path`
    fn persist(&self, profile: &ColorProfile, id: &ProfileId, path: &Path) -> Result<()>;
}

/// [`ProfileSerializer`] producing ICC.1 files
#[derive(Debug, Clone, Copy, Default)]
pub struct IccSerializer;

impl IccSerializer {
    /// Encoded bytes with the profile ID filled in
    pub fn to_bytes(&self, profile: &ColorProfile) -> Result<Vec<u8>> {
        let mut data = encode_profile(profile).map_err(|e| Error::Checksum(e.to_string()))?;
        let id = compute_profile_id(&data);
        data[PROFILE_ID_RANGE].copy_from_slice(&id.0);
        Ok(data)
    }
}

impl ProfileSerializer for IccSerializer {
    fn fingerprint(&self, profile: &ColorProfile) -> Result<ProfileId> {
        let data = encode_profile(profile).map_err(|e| Error::Checksum(e.to_string()))?;
        Ok(compute_profile_id(&data))
    }

    fn persist(&self, profile: &ColorProfile, id: &ProfileId, path: &Path) -> Result<()> {
        let persistence = |source| Error::Persistence {
            path: path.to_path_buf(),
            source,
        };
        let mut data = encode_profile(profile)
            .map_err(|e| persistence(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;
        data[PROFILE_ID_RANGE].copy_from_slice(&id.0);
        std::fs::write(path, &data).map_err(persistence)?;
        tracing::info!(path = %path.display(), bytes = data.len(), id = %id, "wrote profile");
        Ok(())
    }
}

/// MD5 of `data` with flags, rendering intent and profile ID zeroed
pub fn compute_profile_id(data: &[u8]) -> ProfileId {
    let mut copy = data.to_vec();
    for range in [FLAGS_RANGE, INTENT_RANGE, PROFILE_ID_RANGE] {
        if let Some(bytes) = copy.get_mut(range) {
            bytes.fill(0);
        }
    }
    ProfileId(md5::compute(&copy).0)
}

/// Encode a YCbCr profile without its profile ID
pub fn encode_profile(profile: &ColorProfile) -> std::result::Result<Vec<u8>, EncodeError> {
    let config = profile.config();
    let version = config.version;
    let class = if config.transfer.is_display_referred() {
        ProfileClass::Display
    } else {
        ProfileClass::ColorSpace
    };

    let mut header = IccHeader::new(class, ColorSpace::YCbCr, version);
    header.rendering_intent = profile.intent().to_icc();
    apply_metadata(&mut header, profile.metadata());

    let mut writer = ProfileWriter::new(header);
    add_text_tags(&mut writer, profile.metadata(), version)?;

    // v4 media white is the PCS illuminant; v2 records the source white
    let media_white = match version {
        IccVersion::V2 => profile.white_point().xyz,
        IccVersion::V4 => D50.xyz,
    };
    writer.add(TagSignature::MEDIA_WHITE, encode_xyz(&media_white)?);
    writer.add(TagSignature::CHAD, encode_sf32_matrix(profile.adaptation())?);

    match version {
        IccVersion::V2 => {
            writer.add(
                TagSignature::A2B0,
                encode_lut16(profile.forward(), Direction::DeviceToPcs)?,
            );
            writer.add(
                TagSignature::B2A0,
                encode_lut16(profile.inverse(), Direction::PcsToDevice)?,
            );
        }
        IccVersion::V4 => {
            writer.add(TagSignature::A2B0, encode_lut_atob(profile.forward())?);
            writer.add(TagSignature::B2A0, encode_lut_btoa(profile.inverse())?);
        }
    }

    if let Some(extended) = profile.extended() {
        writer.add(TagSignature::D2B0, encode_mpet(&extended.forward)?);
        writer.add(TagSignature::B2D0, encode_mpet(&extended.inverse)?);
    }

    let data = writer.finish()?;
    tracing::debug!(bytes = data.len(), version = version.tag(), "encoded YCbCr profile");
    Ok(data)
}

/// Encode the base RGB profile as a v4 matrix/TRC display profile with its ID
pub fn encode_rgb_profile(
    base: &RgbProfile,
    metadata: &ProfileMetadata,
) -> std::result::Result<Vec<u8>, EncodeError> {
    let version = IccVersion::V4;
    let mut header = IccHeader::new(ProfileClass::Display, ColorSpace::Rgb, version);
    apply_metadata(&mut header, metadata);

    let mut writer = ProfileWriter::new(header);
    add_text_tags(&mut writer, metadata, version)?;
    writer.add(TagSignature::MEDIA_WHITE, encode_xyz(&D50.xyz)?);
    writer.add(TagSignature::CHAD, encode_sf32_matrix(base.adaptation())?);

    let colorants = base.colorants();
    for (i, sig) in [
        TagSignature::RED_COLORANT,
        TagSignature::GREEN_COLORANT,
        TagSignature::BLUE_COLORANT,
    ]
    .into_iter()
    .enumerate()
    {
        writer.add(sig, encode_xyz(&colorants.column(i).into())?);
    }

    let trc = encode_curve(base.tone_curve())?;
    for sig in [TagSignature::RED_TRC, TagSignature::GREEN_TRC, TagSignature::BLUE_TRC] {
        writer.add(sig, trc.clone());
    }

    let mut data = writer.finish()?;
    let id = compute_profile_id(&data);
    data[PROFILE_ID_RANGE].copy_from_slice(&id.0);
    Ok(data)
}

fn apply_metadata(header: &mut IccHeader, metadata: &ProfileMetadata) {
    header.manufacturer = metadata.manufacturer_signature;
    header.model = metadata.model_signature;
    header.creation_date = metadata.creation_date;
}

fn add_text_tags(
    writer: &mut ProfileWriter,
    metadata: &ProfileMetadata,
    version: IccVersion,
) -> std::result::Result<(), EncodeError> {
    writer.add(
        TagSignature::PROFILE_DESC,
        encode_description(&metadata.description, version)?,
    );
    writer.add(TagSignature::COPYRIGHT, encode_plain(&metadata.copyright, version)?);
    writer.add(TagSignature::DMND, encode_description(&metadata.manufacturer, version)?);
    writer.add(TagSignature::DMDD, encode_description(&metadata.model, version)?);
    Ok(())
}
