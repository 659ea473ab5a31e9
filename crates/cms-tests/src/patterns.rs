//! Sample generation
//!
//! Encoded samples are Y, Cb, Cr in [0, 1] with the chroma channels offset
//! by 0.5, the layout the profiles' device side uses.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use ycbcr_icc_core::Standard;

const CHROMA_OFFSET: [f64; 3] = [0.0, 0.5, 0.5];

/// Encode non-linear R'G'B' as offset Y Cb Cr
pub fn rgb_to_encoded(standard: Standard, rgb: [f64; 3]) -> [f64; 3] {
    let ycc = standard.luma().rgb_to_ycbcr().multiply_vec(rgb);
    [
        ycc[0] + CHROMA_OFFSET[0],
        ycc[1] + CHROMA_OFFSET[1],
        ycc[2] + CHROMA_OFFSET[2],
    ]
}

/// Decode offset Y Cb Cr to non-linear R'G'B'
pub fn encoded_to_rgb(standard: Standard, ycc: [f64; 3]) -> [f64; 3] {
    standard.luma().ycbcr_to_rgb().multiply_vec([
        ycc[0] - CHROMA_OFFSET[0],
        ycc[1] - CHROMA_OFFSET[1],
        ycc[2] - CHROMA_OFFSET[2],
    ])
}

/// Every node of an `R³` lattice over the unit cube, last axis fastest
pub fn lattice(resolution: usize) -> Vec<[f64; 3]> {
    let step = 1.0 / (resolution - 1) as f64;
    let mut out = Vec::with_capacity(resolution.pow(3));
    for i in 0..resolution {
        for j in 0..resolution {
            for k in 0..resolution {
                out.push([i as f64 * step, j as f64 * step, k as f64 * step]);
            }
        }
    }
    out
}

/// Lattice nodes of the encoded cube whose R'G'B' lies inside [0, 1]³
pub fn in_gamut_lattice(standard: Standard, resolution: usize) -> Vec<[f64; 3]> {
    const EPS: f64 = 1e-9;
    lattice(resolution)
        .into_iter()
        .filter(|&ycc| {
            encoded_to_rgb(standard, ycc)
                .iter()
                .all(|&c| (-EPS..=1.0 + EPS).contains(&c))
        })
        .collect()
}

/// Seeded uniform R'G'B' samples, returned encoded
pub fn random_in_gamut(standard: Standard, seed: u64, count: usize) -> Vec<[f64; 3]> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let rgb: [f64; 3] = std::array::from_fn(|_| rng.gen_range(0.0..=1.0));
            rgb_to_encoded(standard, rgb)
        })
        .collect()
}

/// Full-range 16-bit code for a unit value
pub fn to_u16(v: f64) -> u16 {
    (v.clamp(0.0, 1.0) * 65535.0).round() as u16
}

pub fn from_u16(q: u16) -> f64 {
    q as f64 / 65535.0
}
