//! `XYZ ` and `sf32` tags

use crate::color::Xyz;
use crate::icc::error::EncodeError;
use crate::icc::types::TypeSignature;
use crate::icc::writer::ByteWriter;
use crate::math::Matrix3x3;

/// XYZType with a single value
pub fn encode_xyz(xyz: &Xyz) -> Result<Vec<u8>, EncodeError> {
    let mut w = ByteWriter::type_header(TypeSignature::XYZ);
    for v in xyz.to_array() {
        w.s15(v)?;
    }
    Ok(w.into_inner())
}

/// s15Fixed16ArrayType holding a 3x3 matrix row by row, as `chad` expects
pub fn encode_sf32_matrix(m: &Matrix3x3) -> Result<Vec<u8>, EncodeError> {
    let mut w = ByteWriter::type_header(TypeSignature::SF32);
    for v in m.to_row_major() {
        w.s15(v)?;
    }
    Ok(w.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::D50;

    #[test]
    fn test_xyz_tag() {
        let data = encode_xyz(&D50.xyz).unwrap();
        assert_eq!(data.len(), 20);
        assert_eq!(&data[0..4], b"XYZ ");
        assert_eq!(&data[8..20], &[0, 0, 0xF6, 0xD6, 0, 1, 0, 0, 0, 0, 0xD3, 0x2D]);
    }

    #[test]
    fn test_sf32_row_order() {
        let m = Matrix3x3::new([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]]);
        let data = encode_sf32_matrix(&m).unwrap();
        assert_eq!(data.len(), 8 + 36);
        // Second entry is row 0, column 1
        assert_eq!(&data[12..16], &[0, 2, 0, 0]);
        assert_eq!(&data[20..24], &[0, 4, 0, 0]);
    }
}
