//! Tag type encoders
//!
//! Each function returns the complete tag element, starting with its type
//! signature, ready to be placed in the tag table.

pub mod curves;
pub mod lut;
pub mod mpe;
pub mod text;
pub mod xyz;
