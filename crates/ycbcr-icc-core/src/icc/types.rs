//! ICC Profile Basic Types
//!
//! Signatures and number encodings from ICC.1:2022 section 4.

use std::fmt;

use super::error::EncodeError;

/// ICC Tag Signature (4-byte ASCII code)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TagSignature(pub u32);

impl TagSignature {
    pub const fn from_bytes(b: [u8; 4]) -> Self {
        Self(u32::from_be_bytes(b))
    }

    pub const A2B0: Self = Self::from_bytes(*b"A2B0");
    pub const B2A0: Self = Self::from_bytes(*b"B2A0");
    pub const D2B0: Self = Self::from_bytes(*b"D2B0");
    pub const B2D0: Self = Self::from_bytes(*b"B2D0");
    pub const BLUE_COLORANT: Self = Self::from_bytes(*b"bXYZ");
    pub const BLUE_TRC: Self = Self::from_bytes(*b"bTRC");
    pub const CHAD: Self = Self::from_bytes(*b"chad");
    pub const COPYRIGHT: Self = Self::from_bytes(*b"cprt");
    pub const DMDD: Self = Self::from_bytes(*b"dmdd");
    pub const DMND: Self = Self::from_bytes(*b"dmnd");
    pub const GREEN_COLORANT: Self = Self::from_bytes(*b"gXYZ");
    pub const GREEN_TRC: Self = Self::from_bytes(*b"gTRC");
    pub const MEDIA_WHITE: Self = Self::from_bytes(*b"wtpt");
    pub const PROFILE_DESC: Self = Self::from_bytes(*b"desc");
    pub const RED_COLORANT: Self = Self::from_bytes(*b"rXYZ");
    pub const RED_TRC: Self = Self::from_bytes(*b"rTRC");
}

impl fmt::Display for TagSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0.to_be_bytes()))
    }
}

/// Type signatures for ICC tag data and processing elements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeSignature(pub u32);

impl TypeSignature {
    pub const fn from_bytes(b: [u8; 4]) -> Self {
        Self(u32::from_be_bytes(b))
    }

    pub const XYZ: Self = Self::from_bytes(*b"XYZ ");
    pub const CURVE: Self = Self::from_bytes(*b"curv");
    pub const PARA: Self = Self::from_bytes(*b"para");
    pub const TEXT: Self = Self::from_bytes(*b"text");
    pub const DESC: Self = Self::from_bytes(*b"desc");
    pub const MLUC: Self = Self::from_bytes(*b"mluc");
    pub const LUT16: Self = Self::from_bytes(*b"mft2");
    pub const LUTA2B: Self = Self::from_bytes(*b"mAB ");
    pub const LUTB2A: Self = Self::from_bytes(*b"mBA ");
    pub const SF32: Self = Self::from_bytes(*b"sf32");
    pub const MPET: Self = Self::from_bytes(*b"mpet");
    // Processing elements
    pub const CURVE_SET: Self = Self::from_bytes(*b"cvst");
    pub const MATRIX_ELEM: Self = Self::from_bytes(*b"matf");
    pub const SEGMENTED_CURVE: Self = Self::from_bytes(*b"curf");
    pub const FORMULA_SEGMENT: Self = Self::from_bytes(*b"parf");
    pub const SAMPLED_SEGMENT: Self = Self::from_bytes(*b"samf");
}

/// s15Fixed16Number - 16.16 fixed point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct S15Fixed16(pub i32);

impl S15Fixed16 {
    const MIN: f64 = -32768.0;
    const MAX: f64 = 32767.0 + 65535.0 / 65536.0;

    pub const fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    /// Round `val` to the nearest representable value
    pub fn from_f64(val: f64) -> Result<Self, EncodeError> {
        if !val.is_finite() || !(Self::MIN..=Self::MAX).contains(&val) {
            return Err(EncodeError::ValueOutOfRange {
                what: "s15Fixed16Number",
                value: val,
            });
        }
        Ok(Self((val * 65536.0).round() as i32))
    }

    pub fn to_f64(self) -> f64 {
        self.0 as f64 / 65536.0
    }

    pub fn to_be_bytes(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }
}

/// dateTimeNumber - ICC date/time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DateTimeNumber {
    pub year: u16,
    pub month: u16,
    pub day: u16,
    pub hour: u16,
    pub minute: u16,
    pub second: u16,
}

impl DateTimeNumber {
    pub fn new(year: u16, month: u16, day: u16, hour: u16, minute: u16, second: u16) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    pub fn to_bytes(&self) -> [u8; 12] {
        let mut out = [0u8; 12];
        for (i, v) in [
            self.year,
            self.month,
            self.day,
            self.hour,
            self.minute,
            self.second,
        ]
        .into_iter()
        .enumerate()
        {
            out[i * 2..i * 2 + 2].copy_from_slice(&v.to_be_bytes());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_s15fixed16() {
        let one = S15Fixed16::from_f64(1.0).unwrap();
        assert_eq!(one.0, 0x0001_0000);

        let neg = S15Fixed16::from_f64(-1.5).unwrap();
        assert!((neg.to_f64() - (-1.5)).abs() < 1e-6);

        // D50 X and Z as every ICC writer encodes them
        assert_eq!(S15Fixed16::from_f64(0.9642).unwrap().0, 0xF6D6);
        assert_eq!(S15Fixed16::from_f64(0.8249).unwrap().0, 0xD32D);
    }

    #[test]
    fn test_s15fixed16_range() {
        for bad in [40000.0, -40000.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                S15Fixed16::from_f64(bad),
                Err(EncodeError::ValueOutOfRange { .. })
            ));
        }
    }

    #[test]
    fn test_date_bytes() {
        let date = DateTimeNumber::new(2024, 3, 9, 17, 5, 59);
        assert_eq!(
            date.to_bytes(),
            [0x07, 0xE8, 0, 3, 0, 9, 0, 17, 0, 5, 0, 59]
        );
        assert_eq!(DateTimeNumber::default().to_bytes(), [0u8; 12]);
    }

    #[test]
    fn test_tag_signature_display() {
        assert_eq!(TagSignature::PROFILE_DESC.to_string(), "desc");
        assert_eq!(TagSignature::D2B0.to_string(), "D2B0");
    }
}
