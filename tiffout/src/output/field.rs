use tiffout_common::byte_order::ByteOrder;
use tiffout_common::math::*;
use tiffout_common::tag::Tag;

use crate::field_type::FieldType;

/// Directory entry with its encoded payload
///
/// Payloads of up to four bytes are stored inline in the entry table. Larger
/// payloads become a separate [`OutputItem`](super::OutputItem).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputField {
    pub tag: Tag,
    pub field_type: FieldType,
    pub count: u32,
    bytes: Vec<u8>,
    preserved_offset: Option<u64>,
}

impl OutputField {
    pub fn new(tag: Tag, field_type: FieldType, count: u32, bytes: Vec<u8>) -> Self {
        Self {
            tag,
            field_type,
            count,
            bytes,
            preserved_offset: None,
        }
    }

    /// NULL terminated ASCII string
    pub fn ascii(tag: Tag, value: &str) -> Self {
        let mut bytes = value.as_bytes().to_vec();
        bytes.push(0);
        let count = bytes.len().u32().unwrap_or(u32::MAX);
        Self::new(tag, FieldType::Ascii, count, bytes)
    }

    pub fn short(tag: Tag, value: u16, byte_order: ByteOrder) -> Self {
        Self::new(tag, FieldType::Short, 1, byte_order.u16_bytes(value).to_vec())
    }

    pub fn long(tag: Tag, value: u32, byte_order: ByteOrder) -> Self {
        Self::new(tag, FieldType::Long, 1, byte_order.u32_bytes(value).to_vec())
    }

    pub fn undefined(tag: Tag, bytes: Vec<u8>) -> Self {
        let count = bytes.len().u32().unwrap_or(u32::MAX);
        Self::new(tag, FieldType::Undefined, count, bytes)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Replaces the payload and its number of values
    ///
    /// A changed payload can't keep a preserved offset.
    pub fn set_bytes(&mut self, count: u32, bytes: Vec<u8>) {
        if bytes != self.bytes {
            self.preserved_offset = None;
        }
        self.count = count;
        self.bytes = bytes;
    }

    pub fn length(&self) -> Result<u32, MathError> {
        self.bytes.len().u32()
    }

    /// Value does not fit into the entry table
    pub fn is_out_of_line(&self) -> bool {
        self.bytes.len() > 4
    }

    pub fn bytes_equal(&self, other: &[u8]) -> bool {
        self.bytes == other
    }

    /// Offset in the old segment that the value keeps
    pub fn preserved_offset(&self) -> Option<u64> {
        self.preserved_offset
    }

    pub(crate) fn preserve_offset(&mut self, offset: u64) {
        self.preserved_offset = Some(offset);
    }

    pub(crate) fn clear_preserved_offset(&mut self) {
        self.preserved_offset = None;
    }
}
