//! Big-endian byte writer and profile assembly

use super::error::EncodeError;
use super::header::{HEADER_SIZE, IccHeader};
use super::types::{S15Fixed16, TagSignature, TypeSignature};

/// Growable big-endian buffer
#[derive(Debug, Default)]
pub(crate) struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Type signature followed by the 4 reserved bytes every tag type starts with
    pub fn type_header(sig: TypeSignature) -> Self {
        let mut w = Self::new();
        w.u32(sig.0);
        w.u32(0);
        w
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    pub fn u16(&mut self, v: u16) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    pub fn u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    pub fn f32(&mut self, v: f64) -> Result<(), EncodeError> {
        let single = v as f32;
        if !single.is_finite() {
            return Err(EncodeError::ValueOutOfRange {
                what: "float32Number",
                value: v,
            });
        }
        self.buf.extend_from_slice(&single.to_be_bytes());
        Ok(())
    }

    pub fn s15(&mut self, v: f64) -> Result<(), EncodeError> {
        self.buf.extend_from_slice(&S15Fixed16::from_f64(v)?.to_be_bytes());
        Ok(())
    }

    pub fn bytes(&mut self, data: &[u8]) {
        self.buf.extend_from_slice(data);
    }

    pub fn zeros(&mut self, n: usize) {
        self.buf.resize(self.buf.len() + n, 0);
    }

    pub fn pad_to_4(&mut self) {
        while self.buf.len() % 4 != 0 {
            self.buf.push(0);
        }
    }

    /// Overwrite a previously reserved u32
    pub fn patch_u32(&mut self, at: usize, v: u32) {
        self.buf[at..at + 4].copy_from_slice(&v.to_be_bytes());
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }
}

/// Convert a length or offset into a 32-bit field
pub(crate) fn to_u32(n: usize) -> Result<u32, EncodeError> {
    u32::try_from(n).map_err(|_| EncodeError::TooLarge(n))
}

/// Header plus tags, laid out as header | tag table | 4-aligned tag data
#[derive(Debug)]
pub(crate) struct ProfileWriter {
    header: IccHeader,
    tags: Vec<(TagSignature, Vec<u8>)>,
}

impl ProfileWriter {
    pub fn new(header: IccHeader) -> Self {
        Self {
            header,
            tags: Vec::new(),
        }
    }

    pub fn add(&mut self, sig: TagSignature, data: Vec<u8>) {
        self.tags.push((sig, data));
    }

    pub fn finish(self) -> Result<Vec<u8>, EncodeError> {
        let table_size = 4 + 12 * self.tags.len();
        let mut entries = Vec::with_capacity(self.tags.len());
        let mut offset = HEADER_SIZE + table_size;
        for (sig, data) in &self.tags {
            offset = offset.next_multiple_of(4);
            entries.push((*sig, to_u32(offset)?, to_u32(data.len())?));
            offset += data.len();
        }
        let total = offset.next_multiple_of(4);

        let mut w = ByteWriter::new();
        w.bytes(&self.header.encode(to_u32(total)?)?);
        w.u32(to_u32(self.tags.len())?);
        for (sig, offset, size) in &entries {
            w.u32(sig.0);
            w.u32(*offset);
            w.u32(*size);
        }
        for (_, data) in &self.tags {
            w.pad_to_4();
            w.bytes(data);
        }
        w.pad_to_4();
        debug_assert_eq!(w.len(), total);
        Ok(w.into_inner())
    }
}
