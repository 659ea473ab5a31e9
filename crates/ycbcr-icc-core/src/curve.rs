//! Tone curves
//!
//! One-dimensional transfer functions over the normalized domain [0, 1].
//!
//! # Families
//!
//! | family         | shape                                                   | ICC form      |
//! |----------------|---------------------------------------------------------|---------------|
//! | `Identity`     | y = x                                                   | `curv`, n = 0 |
//! | `Gamma`        | y = x^γ                                                 | `para` type 0 |
//! | `LinearPower`  | y = (a·x + b)^γ for x ≥ d, else c·x                     | `para` type 3 |
//! | `ScaledPower`  | y = scale·x^γ + offset for x ≥ breakpoint, else slope·x | `para` type 4 |
//! | `Tabulated`    | piecewise linear through samples at i / (n − 1)         | `curv`        |
//!
//! The broadcast decoding curve (BT.709/BT.601 inverse OETF) is a
//! `LinearPower`; the OETF itself is a `ScaledPower`. Each parametric family
//! has a closed-form inverse in the other.
//!
//! # Tabulation
//!
//! When a container cannot carry a family, the curve is replaced by
//! [`ToneCurve::tabulate`] with [`TABULATION_SIZE`] nodes. For curves with a
//! linear toe (every curve that needs tabulation) the tabulated and analytic
//! curves agree to within [`TABULATION_TOLERANCE`] everywhere.

use crate::error::ConstructionError;
use crate::math::interp_table;

/// Number of nodes used when a curve has to be tabulated
pub const TABULATION_SIZE: usize = 1024;

/// Maximum |tabulated(x) − analytic(x)| callers may rely on
pub const TABULATION_TOLERANCE: f64 = 1e-3;

/// Slack allowed on endpoints and breakpoint continuity during validation
const SHAPE_TOLERANCE: f64 = 1e-3;

/// Curve family, used for container capability checks and diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CurveFamily {
    Identity,
    Gamma,
    LinearPower,
    ScaledPower,
    Tabulated,
}

impl CurveFamily {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::Gamma => "gamma",
            Self::LinearPower => "linear-power",
            Self::ScaledPower => "scaled-power",
            Self::Tabulated => "tabulated",
        }
    }
}

impl std::fmt::Display for CurveFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Analytic transfer function
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParametricCurve {
    /// y = x^γ
    Gamma { gamma: f64 },
    /// y = (a·x + b)^γ if x ≥ d, else c·x
    LinearPower {
        gamma: f64,
        a: f64,
        b: f64,
        c: f64,
        d: f64,
    },
    /// y = scale·x^γ + offset if x ≥ breakpoint, else slope·x
    ScaledPower {
        gamma: f64,
        scale: f64,
        offset: f64,
        slope: f64,
        breakpoint: f64,
    },
}

impl ParametricCurve {
    /// BT.709-6 / BT.601-7 inverse OETF: R'G'B' → linear RGB
    pub const BT709_INVERSE_OETF: Self = Self::LinearPower {
        gamma: 1.0 / 0.45,
        a: 1.0 / 1.099,
        b: 0.099 / 1.099,
        c: 1.0 / 4.5,
        d: 0.081,
    };

    /// BT.709-6 / BT.601-7 OETF: V = 1.099·L^0.45 − 0.099 for L ≥ 0.018, else 4.5·L
    pub const BT709_OETF: Self = Self::ScaledPower {
        gamma: 0.45,
        scale: 1.099,
        offset: -0.099,
        slope: 4.5,
        breakpoint: 0.018,
    };

    pub fn family(&self) -> CurveFamily {
        match self {
            Self::Gamma { .. } => CurveFamily::Gamma,
            Self::LinearPower { .. } => CurveFamily::LinearPower,
            Self::ScaledPower { .. } => CurveFamily::ScaledPower,
        }
    }

    /// Evaluate at `x`, clamped to [0, 1]
    #[inline]
    pub fn evaluate(&self, x: f64) -> f64 {
        let x = x.clamp(0.0, 1.0);
        match *self {
            Self::Gamma { gamma } => x.powf(gamma),
            Self::LinearPower { gamma, a, b, c, d } => {
                if x >= d {
                    (a * x + b).max(0.0).powf(gamma)
                } else {
                    c * x
                }
            }
            Self::ScaledPower {
                gamma,
                scale,
                offset,
                slope,
                breakpoint,
            } => {
                if x >= breakpoint {
                    scale * x.powf(gamma) + offset
                } else {
                    slope * x
                }
            }
        }
    }

    /// Closed-form inverse
    ///
    /// `Gamma(γ) ↔ Gamma(1/γ)` and `LinearPower ↔ ScaledPower`. The result of
    /// inverting a valid curve is valid.
    pub fn inverse(&self) -> Self {
        match *self {
            Self::Gamma { gamma } => Self::Gamma { gamma: 1.0 / gamma },
            Self::LinearPower { gamma, a, b, c, d } => Self::ScaledPower {
                gamma: 1.0 / gamma,
                scale: 1.0 / a,
                offset: -b / a,
                slope: 1.0 / c,
                breakpoint: c * d,
            },
            Self::ScaledPower {
                gamma,
                scale,
                offset,
                slope,
                breakpoint,
            } => Self::LinearPower {
                gamma: 1.0 / gamma,
                a: 1.0 / scale,
                b: -offset / scale,
                c: 1.0 / slope,
                d: slope * breakpoint,
            },
        }
    }

    /// Check the parameters describe a curve from [0, 1] onto [0, 1]
    pub fn validate(&self) -> Result<(), ConstructionError> {
        let family = self.family().name();
        let fail = |reason: String| Err(ConstructionError::curve(family, reason));

        let (gamma, linear, power_at, threshold) = match *self {
            Self::Gamma { gamma } => (gamma, None, None, 0.0),
            Self::LinearPower { gamma, a, b, c, d } => {
                if ![a, b, c, d].iter().all(|v| v.is_finite()) {
                    return fail("parameters must be finite".into());
                }
                if a <= 0.0 {
                    return fail(format!("a must be positive, got {a}"));
                }
                if c <= 0.0 {
                    return fail(format!("linear slope c must be positive, got {c}"));
                }
                (gamma, Some(c * d), Some((a * d + b).max(0.0).powf(gamma)), d)
            }
            Self::ScaledPower {
                gamma,
                scale,
                offset,
                slope,
                breakpoint,
            } => {
                if ![scale, offset, slope, breakpoint].iter().all(|v| v.is_finite()) {
                    return fail("parameters must be finite".into());
                }
                if scale <= 0.0 {
                    return fail(format!("scale must be positive, got {scale}"));
                }
                if slope <= 0.0 {
                    return fail(format!("linear slope must be positive, got {slope}"));
                }
                let power = scale * breakpoint.max(0.0).powf(gamma) + offset;
                (gamma, Some(slope * breakpoint), Some(power), breakpoint)
            }
        };

        if !gamma.is_finite() || gamma <= 0.0 {
            return fail(format!("gamma must be positive and finite, got {gamma}"));
        }
        if !(0.0..=1.0).contains(&threshold) {
            return fail(format!("breakpoint {threshold} outside [0, 1]"));
        }
        if let (Some(linear), Some(power)) = (linear, power_at) {
            if threshold > 0.0 && (linear - power).abs() > SHAPE_TOLERANCE {
                return fail(format!(
                    "discontinuous at breakpoint {threshold}: {linear} vs {power}"
                ));
            }
        }
        check_endpoints(family, self.evaluate(0.0), self.evaluate(1.0))
    }
}

fn check_endpoints(family: &'static str, y0: f64, y1: f64) -> Result<(), ConstructionError> {
    if !y0.is_finite() || y0.abs() > SHAPE_TOLERANCE {
        return Err(ConstructionError::curve(family, format!("f(0) = {y0}, expected 0")));
    }
    if !y1.is_finite() || (y1 - 1.0).abs() > SHAPE_TOLERANCE {
        return Err(ConstructionError::curve(family, format!("f(1) = {y1}, expected 1")));
    }
    Ok(())
}

/// A per-channel tone curve
#[derive(Debug, Clone, PartialEq)]
pub enum ToneCurve {
    /// Passthrough; the container-mandated dummy curve
    Identity,
    Parametric(ParametricCurve),
    /// Samples at x = i / (n − 1), linearly interpolated
    Tabulated(Vec<f64>),
}

impl ToneCurve {
    /// Validated parametric curve
    pub fn parametric(curve: ParametricCurve) -> Result<Self, ConstructionError> {
        curve.validate()?;
        Ok(Self::Parametric(curve))
    }

    /// Validated tabulated curve
    pub fn tabulated(samples: Vec<f64>) -> Result<Self, ConstructionError> {
        let curve = Self::Tabulated(samples);
        curve.validate()?;
        Ok(curve)
    }

    pub fn family(&self) -> CurveFamily {
        match self {
            Self::Identity => CurveFamily::Identity,
            Self::Parametric(p) => p.family(),
            Self::Tabulated(_) => CurveFamily::Tabulated,
        }
    }

    pub fn is_identity(&self) -> bool {
        matches!(self, Self::Identity)
    }

    pub fn validate(&self) -> Result<(), ConstructionError> {
        match self {
            Self::Identity => Ok(()),
            Self::Parametric(p) => p.validate(),
            Self::Tabulated(samples) => {
                let family = CurveFamily::Tabulated.name();
                if samples.len() < 2 {
                    return Err(ConstructionError::curve(
                        family,
                        format!("needs at least 2 samples, got {}", samples.len()),
                    ));
                }
                if samples.iter().any(|v| !v.is_finite()) {
                    return Err(ConstructionError::curve(family, "samples must be finite"));
                }
                check_endpoints(family, samples[0], samples[samples.len() - 1])
            }
        }
    }

    /// Evaluate at `x`
    ///
    /// Parametric and tabulated curves clamp `x` to [0, 1]; `Identity` passes
    /// any value through, including PCS values above 1.
    #[inline]
    pub fn evaluate(&self, x: f64) -> f64 {
        match self {
            Self::Identity => x,
            Self::Parametric(p) => p.evaluate(x),
            Self::Tabulated(samples) => interp_table(samples, x),
        }
    }

    /// Sample this curve at `n` evenly spaced nodes over the closed interval [0, 1]
    pub fn tabulate(&self, n: usize) -> Result<Self, ConstructionError> {
        if n < 2 {
            return Err(ConstructionError::curve(
                CurveFamily::Tabulated.name(),
                format!("needs at least 2 samples, got {n}"),
            ));
        }
        let max_idx = (n - 1) as f64;
        let samples = (0..n).map(|i| self.evaluate(i as f64 / max_idx)).collect();
        Ok(Self::Tabulated(samples))
    }

    /// Inverse curve
    ///
    /// Parametric curves invert in closed form. Tabulated curves must be
    /// non-decreasing and are inverted onto the same number of nodes.
    pub fn inverse(&self) -> Result<Self, ConstructionError> {
        match self {
            Self::Identity => Ok(Self::Identity),
            Self::Parametric(p) => Self::parametric(p.inverse()),
            Self::Tabulated(samples) => invert_table(samples).map(Self::Tabulated),
        }
    }
}

fn invert_table(table: &[f64]) -> Result<Vec<f64>, ConstructionError> {
    let family = CurveFamily::Tabulated.name();
    let n = table.len();
    if n < 2 {
        return Err(ConstructionError::curve(family, "cannot invert fewer than 2 samples"));
    }
    if table.windows(2).any(|w| w[1] < w[0]) || table[n - 1] <= table[0] {
        return Err(ConstructionError::curve(family, "cannot invert a non-increasing table"));
    }

    let max_idx = (n - 1) as f64;
    let inverse = (0..n)
        .map(|j| {
            let y = j as f64 / max_idx;
            let hi = table.partition_point(|&v| v < y);
            if hi == 0 {
                0.0
            } else if hi == n {
                1.0
            } else {
                let lo = hi - 1;
                let t = (y - table[lo]) / (table[hi] - table[lo]);
                (lo as f64 + t) / max_idx
            }
        })
        .collect();
    Ok(inverse)
}
