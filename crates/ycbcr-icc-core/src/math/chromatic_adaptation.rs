//! Bradford chromatic adaptation
//!
//! Produces the matrix stored in the `chad` tag: it maps XYZ relative to a
//! source white onto XYZ relative to a destination white.
//!
//! References:
//! - ICC.1:2022 Annex E
//! - Lindbloom: http://www.brucelindbloom.com/index.html?Eqn_ChromAdapt.html

use crate::color::Xyz;
use crate::error::ConstructionError;
use crate::math::Matrix3x3;

/// Bradford cone response matrix: XYZ → LMS
pub const BRADFORD: Matrix3x3 = Matrix3x3::new([
    [0.8951, 0.2664, -0.1614],
    [-0.7502, 1.7135, 0.0367],
    [0.0389, -0.0685, 1.0296],
]);

/// Bradford adaptation matrix from `src` white to `dst` white
///
/// `M = B⁻¹ · diag(LMS_dst / LMS_src) · B`, so that `M · src = dst`.
pub fn bradford_adaptation(src: &Xyz, dst: &Xyz) -> Result<Matrix3x3, ConstructionError> {
    let lms_src = BRADFORD.multiply_vec(src.to_array());
    let lms_dst = BRADFORD.multiply_vec(dst.to_array());
    if lms_src.iter().any(|v| v.abs() < 1e-10 || !v.is_finite()) {
        return Err(ConstructionError::SingularMatrix("source white cone response"));
    }

    let gain = Matrix3x3::diagonal(
        lms_dst[0] / lms_src[0],
        lms_dst[1] / lms_src[1],
        lms_dst[2] / lms_src[2],
    );
    let inverse = BRADFORD
        .inverse()
        .ok_or(ConstructionError::SingularMatrix("Bradford cone response"))?;
    Ok(inverse * gain * BRADFORD)
}
