//! Byte ranges occupied by an existing segment
//!
//! Elements are derived from a parsed segment for the duration of a single
//! write. [`merge`] coalesces them into the ranges that a rewrite is allowed
//! to clear and reuse.

use tiffout_common::math::*;

/// Maximum distance between two elements that still counts as contiguous
///
/// Covers the alignment padding between items.
pub const OFFSET_TOLERANCE: u64 = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    /// Range with the bytes that were read from it
    Data {
        offset: u64,
        length: u32,
        bytes: Vec<u8>,
    },
    /// Range without payload
    Stub { offset: u64, length: u32 },
}

impl Element {
    pub fn data(offset: impl Into<u64>, bytes: Vec<u8>) -> Result<Self, MathError> {
        Ok(Self::Data {
            offset: offset.into(),
            length: bytes.len().u32()?,
            bytes,
        })
    }

    pub fn stub(offset: u64, length: u32) -> Self {
        Self::Stub { offset, length }
    }

    pub fn offset(&self) -> u64 {
        match self {
            Self::Data { offset, .. } | Self::Stub { offset, .. } => *offset,
        }
    }

    pub fn length(&self) -> u32 {
        match self {
            Self::Data { length, .. } | Self::Stub { length, .. } => *length,
        }
    }

    /// First byte after the element
    pub fn end(&self) -> Result<u64, MathError> {
        self.offset().safe_add(self.length().into())
    }

    pub fn bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Data { bytes, .. } => Some(bytes),
            Self::Stub { .. } => None,
        }
    }
}

/// Coalesces elements into stubs
///
/// Elements closer than [`OFFSET_TOLERANCE`] are joined into a single stub.
/// The result is ordered by offset.
pub fn merge(mut elements: Vec<Element>) -> Result<Vec<Element>, MathError> {
    elements.sort_by_key(Element::offset);

    let mut merged = Vec::new();
    let mut run: Option<(u64, u64)> = None;

    for element in &elements {
        let end = element.end()?;

        run = Some(match run {
            None => (element.offset(), end),
            Some((start, run_end)) => {
                if element.offset() > run_end.safe_add(OFFSET_TOLERANCE)? {
                    merged.push(Element::stub(start, run_end.safe_sub(start)?.u32()?));
                    (element.offset(), end)
                } else {
                    (start, run_end.max(end))
                }
            }
        });
    }

    if let Some((start, run_end)) = run {
        merged.push(Element::stub(start, run_end.safe_sub(start)?.u32()?));
    }

    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_within_tolerance() {
        let elements = vec![
            Element::data(28_u32, vec![1; 12]).unwrap(),
            Element::stub(8, 18),
        ];

        assert_eq!(merge(elements).unwrap(), vec![Element::stub(8, 32)]);
    }

    #[test]
    fn merge_splits_at_gap() {
        let elements = vec![
            Element::stub(8, 18),
            Element::stub(30, 4),
            Element::stub(36, 10),
            Element::stub(100, 2),
        ];

        assert_eq!(
            merge(elements).unwrap(),
            vec![
                Element::stub(8, 18),
                Element::stub(30, 16),
                Element::stub(100, 2)
            ]
        );
    }

    #[test]
    fn merge_empty() {
        assert!(merge(Vec::new()).unwrap().is_empty());
    }
}
