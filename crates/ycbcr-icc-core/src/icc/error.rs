//! ICC Encoding Error Types

use std::fmt;

/// Errors that can occur when encoding a profile into ICC bytes
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum EncodeError {
    /// A number does not fit its fixed-point or integer field
    ValueOutOfRange { what: &'static str, value: f64 },
    /// A tone curve family has no encoding in the target tag type
    UnsupportedCurve { tag: &'static str, family: &'static str },
    /// A pipeline's stage sequence does not fit the target tag type
    UnsupportedLayout { tag: &'static str, reason: String },
    /// A tag or the whole profile exceeds the 32-bit size fields
    TooLarge(usize),
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValueOutOfRange { what, value } => {
                write!(f, "Value {} does not fit a {}", value, what)
            }
            Self::UnsupportedCurve { tag, family } => {
                write!(f, "Cannot encode a {} curve in '{}'", family, tag)
            }
            Self::UnsupportedLayout { tag, reason } => {
                write!(f, "Pipeline does not fit '{}': {}", tag, reason)
            }
            Self::TooLarge(size) => {
                write!(f, "Encoded data too large: {} bytes", size)
            }
        }
    }
}

impl std::error::Error for EncodeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = EncodeError::UnsupportedCurve {
            tag: "para",
            family: "scaled-power",
        };
        assert_eq!(err.to_string(), "Cannot encode a scaled-power curve in 'para'");
        assert_eq!(
            EncodeError::TooLarge(5_000_000_000).to_string(),
            "Encoded data too large: 5000000000 bytes"
        );
    }
}
