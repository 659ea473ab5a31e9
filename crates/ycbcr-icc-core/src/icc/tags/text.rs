//! Text tags
//!
//! ICC v2 stores descriptions as `desc` (textDescriptionType) and other text
//! as `text`; v4 uses `mluc` for both. Only an en-US record is written.

use crate::config::IccVersion;
use crate::icc::error::EncodeError;
use crate::icc::types::TypeSignature;
use crate::icc::writer::{ByteWriter, to_u32};

/// Size of the unused ScriptCode string in textDescriptionType
const SCRIPTCODE_FILLER: usize = 67;

/// Description-like text (`desc`, `dmnd`, `dmdd`) for `version`
pub fn encode_description(text: &str, version: IccVersion) -> Result<Vec<u8>, EncodeError> {
    match version {
        IccVersion::V2 => encode_text_description(text),
        IccVersion::V4 => encode_mluc(text),
    }
}

/// Free text (`cprt`) for `version`
pub fn encode_plain(text: &str, version: IccVersion) -> Result<Vec<u8>, EncodeError> {
    match version {
        IccVersion::V2 => Ok(encode_text(text)),
        IccVersion::V4 => encode_mluc(text),
    }
}

/// textType: NUL-terminated 7-bit ASCII
pub fn encode_text(text: &str) -> Vec<u8> {
    let mut w = ByteWriter::type_header(TypeSignature::TEXT);
    w.bytes(&ascii(text));
    w.u8(0);
    w.into_inner()
}

/// textDescriptionType with empty Unicode and ScriptCode parts
pub fn encode_text_description(text: &str) -> Result<Vec<u8>, EncodeError> {
    let ascii = ascii(text);
    let mut w = ByteWriter::type_header(TypeSignature::DESC);
    w.u32(to_u32(ascii.len() + 1)?);
    w.bytes(&ascii);
    w.u8(0);
    // Unicode language code and count
    w.u32(0);
    w.u32(0);
    // ScriptCode code and count
    w.u16(0);
    w.u8(0);
    w.zeros(SCRIPTCODE_FILLER);
    Ok(w.into_inner())
}

/// multiLocalizedUnicodeType with a single en-US record
pub fn encode_mluc(text: &str) -> Result<Vec<u8>, EncodeError> {
    let utf16: Vec<u16> = text.encode_utf16().collect();
    let mut w = ByteWriter::type_header(TypeSignature::MLUC);
    w.u32(1);
    w.u32(12);
    w.bytes(b"en");
    w.bytes(b"US");
    w.u32(to_u32(utf16.len() * 2)?);
    w.u32(28);
    for unit in utf16 {
        w.u16(unit);
    }
    Ok(w.into_inner())
}

fn ascii(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| if c.is_ascii() && c != '\0' { c as u8 } else { b'?' })
        .collect()
}
