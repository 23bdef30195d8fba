use tiffout_common::math::*;

use crate::error::{Error, Result};

/// What an item serializes
///
/// Indices refer to the directories of the [`OutputSet`](super::OutputSet)
/// and the fields within a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    /// Entry table of a directory
    Directory { directory: usize },
    /// Out-of-line value of a field
    Value { directory: usize, field: usize },
    /// Embedded JPEG thumbnail
    Thumbnail { directory: usize },
}

/// Pending write of a byte range
///
/// The length is fixed when the item is created. The offset is assigned
/// exactly once during placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputItem {
    kind: ItemKind,
    length: u32,
    offset: Option<u64>,
}

impl OutputItem {
    pub(crate) fn new(kind: ItemKind, length: u32) -> Self {
        Self {
            kind,
            length,
            offset: None,
        }
    }

    /// Item that keeps an offset from the old segment
    pub(crate) fn preplaced(kind: ItemKind, length: u32, offset: u64) -> Self {
        Self {
            kind,
            length,
            offset: Some(offset),
        }
    }

    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    pub fn length(&self) -> u32 {
        self.length
    }

    pub fn is_placed(&self) -> bool {
        self.offset.is_some()
    }

    pub fn offset(&self) -> Result<u64> {
        self.offset.ok_or(Error::ItemNotPlaced)
    }

    /// First byte after the item
    pub fn end(&self) -> Result<u64> {
        Ok(self.offset()?.safe_add(self.length.into())?)
    }

    /// Assigns the offset
    ///
    /// Offsets have to be a multiple of 2.
    pub fn place(&mut self, offset: u64) -> Result<()> {
        if self.offset.is_some() {
            return Err(Error::ItemAlreadyPlaced);
        }
        if offset.is_odd() {
            return Err(Error::UnalignedOffset(offset));
        }

        self.offset = Some(offset);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn place_once() {
        let mut item = OutputItem::new(ItemKind::Directory { directory: 0 }, 18);
        assert!(matches!(item.offset(), Err(Error::ItemNotPlaced)));

        item.place(8).unwrap();
        assert_eq!(item.offset().unwrap(), 8);
        assert_eq!(item.end().unwrap(), 26);

        assert!(matches!(item.place(30), Err(Error::ItemAlreadyPlaced)));
    }

    #[test]
    fn place_unaligned() {
        let mut item = OutputItem::new(ItemKind::Thumbnail { directory: 1 }, 3);
        assert!(matches!(item.place(51), Err(Error::UnalignedOffset(51))));
        assert!(!item.is_placed());
    }
}
