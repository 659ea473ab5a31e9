//! 3D lookup tables sampled from a sub-pipeline
//!
//! # Layout
//!
//! A [`Lut3d`] of resolution `R` holds `R³` output triples, first input axis
//! varying slowest: node (i, j, k) lives at `(i·R + j)·R + k`. This is the
//! order ICC `mft2` and `mAB ` CLUTs use, so serialization is a straight copy.
//!
//! # Quantization
//!
//! Outputs are stored as u16 over each channel's [`ChannelRange`]. Inputs are
//! described by a per-axis range too; the lattice spans it end to end, so
//! indices `0` and `R − 1` hit the domain endpoints exactly.

use rayon::prelude::*;

use crate::error::ConstructionError;
use crate::math::trilinear_lattice;
use crate::pipeline::Pipeline;

/// Default CLUT resolution per axis
pub const DEFAULT_RESOLUTION: usize = 24;

/// Largest resolution the 8-bit grid-point fields of ICC LUT tags can hold
pub const MAX_RESOLUTION: usize = 255;

/// Closed interval a channel's values are normalized over
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelRange {
    pub min: f64,
    pub max: f64,
}

impl ChannelRange {
    /// [0, 1]
    pub const UNIT: Self = Self::new(0.0, 1.0);

    /// Span of the ICC 16-bit XYZ encoding: 0x0000 → 0.0, 0xFFFF → 1 + 32767/32768
    pub const PCS_XYZ: Self = Self::new(0.0, 65535.0 / 32768.0);

    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Map a value into [0, 1] (unclamped)
    #[inline]
    pub fn normalize(&self, v: f64) -> f64 {
        (v - self.min) / (self.max - self.min)
    }

    /// Point at normalized position `t`; `t = 1` returns `max` exactly
    #[inline]
    pub fn denormalize(&self, t: f64) -> f64 {
        if t >= 1.0 {
            self.max
        } else {
            self.min + t * (self.max - self.min)
        }
    }

    #[inline]
    pub fn quantize(&self, v: f64) -> u16 {
        let t = self.normalize(v);
        if t.is_nan() {
            return 0;
        }
        (t.clamp(0.0, 1.0) * 65535.0).round() as u16
    }

    #[inline]
    pub fn dequantize(&self, q: u16) -> f64 {
        self.denormalize(q as f64 / 65535.0)
    }
}

/// Cube of quantized output triples
#[derive(Debug, Clone, PartialEq)]
pub struct Lut3d {
    resolution: usize,
    input: [ChannelRange; 3],
    output: [ChannelRange; 3],
    samples: Vec<[u16; 3]>,
}

impl Lut3d {
    /// Evaluate `sub` at every lattice point of an `R³` grid spanning `input`
    ///
    /// Cells are independent and evaluated in parallel; results are collected
    /// in lattice order.
    pub fn sample(
        sub: &Pipeline,
        resolution: usize,
        input: [ChannelRange; 3],
        output: [ChannelRange; 3],
    ) -> Result<Self, ConstructionError> {
        if !(2..=MAX_RESOLUTION).contains(&resolution) {
            return Err(ConstructionError::InvalidResolution(resolution));
        }
        if sub.input_channels() != 3 {
            return Err(ConstructionError::ChannelMismatch {
                stage: 0,
                expected: 3,
                actual: sub.input_channels(),
            });
        }
        if sub.output_channels() != 3 {
            return Err(ConstructionError::ChannelMismatch {
                stage: sub.len(),
                expected: 3,
                actual: sub.output_channels(),
            });
        }

        let r = resolution;
        let samples = (0..r * r * r)
            .into_par_iter()
            .map(|n| {
                let x = lattice_point(&input, r, n / (r * r), (n / r) % r, n % r);
                let y = sub.evaluate(x);
                [
                    output[0].quantize(y[0]),
                    output[1].quantize(y[1]),
                    output[2].quantize(y[2]),
                ]
            })
            .collect();

        tracing::debug!(resolution, nodes = r * r * r, "sampled CLUT");
        Ok(Self {
            resolution,
            input,
            output,
            samples,
        })
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn input_domain(&self) -> &[ChannelRange; 3] {
        &self.input
    }

    pub fn output_range(&self) -> &[ChannelRange; 3] {
        &self.output
    }

    /// Raw quantized nodes in lattice order
    pub fn samples(&self) -> &[[u16; 3]] {
        &self.samples
    }

    /// Input value at lattice position (i, j, k)
    pub fn lattice_input(&self, i: usize, j: usize, k: usize) -> [f64; 3] {
        lattice_point(&self.input, self.resolution, i, j, k)
    }

    /// Dequantized output at lattice position (i, j, k)
    pub fn node(&self, i: usize, j: usize, k: usize) -> [f64; 3] {
        let r = self.resolution;
        let q = self.samples[(i * r + j) * r + k];
        [
            self.output[0].dequantize(q[0]),
            self.output[1].dequantize(q[1]),
            self.output[2].dequantize(q[2]),
        ]
    }

    /// Trilinear interpolation between nodes; input is clamped to the domain
    pub fn evaluate(&self, x: [f64; 3]) -> [f64; 3] {
        let t = [
            self.input[0].normalize(x[0]),
            self.input[1].normalize(x[1]),
            self.input[2].normalize(x[2]),
        ];
        trilinear_lattice(self.resolution, t, |i, j, k| self.node(i, j, k))
    }
}

fn lattice_point(input: &[ChannelRange; 3], r: usize, i: usize, j: usize, k: usize) -> [f64; 3] {
    let max_idx = (r - 1) as f64;
    [
        input[0].denormalize(i as f64 / max_idx),
        input[1].denormalize(j as f64 / max_idx),
        input[2].denormalize(k as f64 / max_idx),
    ]
}
