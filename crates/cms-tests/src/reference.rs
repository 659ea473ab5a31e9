//! lcms2 wrappers
//!
//! Encoded profiles are reloaded from bytes and run against the built-in
//! XYZ identity profile. The device side is 16-bit YCbCr, the XYZ side
//! float, which keeps lcms2 on its unoptimized float path.

use anyhow::{Context, Result};
use lcms2::{Intent, PixelFormat, Profile, Transform};

use crate::patterns::{from_u16, to_u16};

/// Open an encoded profile
pub fn load(icc: &[u8]) -> Result<Profile> {
    Profile::new_icc(icc).context("lcms2 rejected the profile")
}

/// Quantize encoded samples the way they are handed to lcms2
pub fn quantize(samples: &[[f64; 3]]) -> Vec<[u16; 3]> {
    samples.iter().map(|s| s.map(to_u16)).collect()
}

/// The unit values lcms2 actually sees for `samples`
pub fn quantized_inputs(samples: &[[f64; 3]]) -> Vec<[f64; 3]> {
    quantize(samples)
        .into_iter()
        .map(|q| q.map(from_u16))
        .collect()
}

/// Device → PCS through the profile's input tags
pub fn lcms2_to_xyz(icc: &[u8], samples: &[[f64; 3]], intent: Intent) -> Result<Vec<[f64; 3]>> {
    let profile = load(icc)?;
    let xyz = Profile::new_xyz();

    let transform = Transform::<[u16; 3], [f32; 3]>::new(
        &profile,
        PixelFormat::YCbCr_16,
        &xyz,
        PixelFormat::XYZ_FLT,
        intent,
    )
    .context("lcms2 forward transform")?;

    let src = quantize(samples);
    let mut dst = vec![[0.0f32; 3]; src.len()];
    transform.transform_pixels(&src, &mut dst);

    Ok(dst.into_iter().map(|p| p.map(f64::from)).collect())
}

/// PCS → device through the profile's output tags
pub fn lcms2_from_xyz(icc: &[u8], xyz: &[[f64; 3]], intent: Intent) -> Result<Vec<[f64; 3]>> {
    let profile = load(icc)?;
    let pcs = Profile::new_xyz();

    let transform = Transform::<[f32; 3], [u16; 3]>::new(
        &pcs,
        PixelFormat::XYZ_FLT,
        &profile,
        PixelFormat::YCbCr_16,
        intent,
    )
    .context("lcms2 inverse transform")?;

    let src: Vec<[f32; 3]> = xyz.iter().map(|p| p.map(|v| v as f32)).collect();
    let mut dst = vec![[0u16; 3]; src.len()];
    transform.transform_pixels(&src, &mut dst);

    Ok(dst.into_iter().map(|p| p.map(from_u16)).collect())
}
