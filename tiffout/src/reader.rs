//! Structural reader for existing segments
//!
//! Reads just enough of a segment to know which byte ranges it occupies and
//! what the raw payload of every entry is. Values are not interpreted.

mod debug;

use std::collections::BTreeSet;

use tiffout_common::byte_order::ByteOrder;
use tiffout_common::math::*;
use tiffout_common::tag::{DirectoryType, Tag};

use crate::element::Element;
use crate::error::{ReadError, ResultExt};
use crate::field_type::FieldType;
use crate::raw::Raw;
use crate::{ENTRY_SIZE, HEADER_SIZE, MAGIC};

/// This can either be the value itself or an offset where to find the value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueOffset {
    Value([u8; 4]),
    Offset(u32),
}

#[derive(Debug, Clone)]
pub struct Entry {
    pub tag: Tag,
    pub field_type: FieldType,
    pub count: u32,
    /// Position of the entry inside its directory's entry table
    pub position: u32,
    pub value_offset: ValueOffset,
    /// Raw payload, without the padding of inline values
    pub value: Vec<u8>,
}

impl Entry {
    pub fn data_len(&self) -> Result<u32, MathError> {
        self.count.safe_mul(self.field_type.size())
    }

    /// Element for values that are stored outside of the entry table
    pub fn out_of_line_element(&self) -> Result<Option<Element>, MathError> {
        match self.value_offset {
            ValueOffset::Offset(offset) => Ok(Some(Element::data(offset, self.value.clone())?)),
            ValueOffset::Value(_) => Ok(None),
        }
    }

    /// Single inline SHORT or LONG value
    pub fn u32(&self, byte_order: ByteOrder) -> Option<u32> {
        let ValueOffset::Value(bytes) = self.value_offset else {
            return None;
        };

        match (self.field_type, self.count) {
            (FieldType::Short, 1) => Some(byte_order.u16([bytes[0], bytes[1]]).into()),
            (FieldType::Long, 1) => Some(byte_order.u32(bytes)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Directory {
    pub directory_type: DirectoryType,
    pub offset: u32,
    pub entries: Vec<Entry>,
    pub next_directory_offset: u32,
    /// Embedded JPEG thumbnail
    pub thumbnail: Option<Element>,
    table: Vec<u8>,
}

impl Directory {
    /// Length of the entry table including entry count and next offset
    pub fn length(&self) -> Result<u32, MathError> {
        table_length(self.entries.len().u32()?)
    }

    /// Element spanning the entry table
    pub fn element(&self) -> Result<Element, MathError> {
        Element::data(self.offset, self.table.clone())
    }

    pub fn entry(&self, tag: Tag) -> Option<&Entry> {
        self.entries.iter().find(|x| x.tag == tag)
    }
}

fn table_length(n_entries: u32) -> Result<u32, MathError> {
    n_entries.safe_mul(ENTRY_SIZE)?.safe_add(2)?.safe_add(4)
}

/// Parsed structure of a segment
#[derive(Debug, Clone)]
pub struct TiffContents {
    pub byte_order: ByteOrder,
    pub directories: Vec<Directory>,
}

impl TiffContents {
    pub fn directory(&self, directory_type: DirectoryType) -> Option<&Directory> {
        self.directories
            .iter()
            .find(|x| x.directory_type == directory_type)
    }
}

pub struct TiffReader<'a> {
    raw: Raw<&'a [u8]>,
    visited: BTreeSet<u32>,
}

impl<'a> TiffReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            raw: Raw::new(data, ByteOrder::default()),
            visited: BTreeSet::new(),
        }
    }

    /// Reads root, Exif, GPS, Interoperability, and thumbnail directories
    ///
    /// Only a broken root directory is fatal. Other directories that can't be
    /// read are skipped.
    pub fn read(mut self) -> Result<TiffContents, ReadError> {
        let root_offset = self.read_header()?;

        let mut directories = Vec::new();
        let root = self.read_directory(DirectoryType::Root, root_offset)?;
        let next_directory_offset = root.next_directory_offset;
        self.push_with_linked(root, &mut directories);

        if next_directory_offset != 0 {
            self.read_linked(DirectoryType::Thumbnail, next_directory_offset, &mut directories);
        }

        Ok(TiffContents {
            byte_order: self.raw.byte_order,
            directories,
        })
    }

    fn read_header(&mut self) -> Result<u32, ReadError> {
        self.raw.seek_start(0_u32)?;

        let marker = self.raw.read_exact()?;
        self.raw.byte_order =
            ByteOrder::from_marker(marker).e(ReadError::UnknownByteOrder(marker))?;

        match self.raw.read_u16()? {
            MAGIC => {}
            magic => return Err(ReadError::MagicBytesWrong(magic)),
        }

        Ok(self.raw.read_u32()?)
    }

    fn push_with_linked(&mut self, directory: Directory, directories: &mut Vec<Directory>) {
        let byte_order = self.raw.byte_order;
        let parent = directory.directory_type;

        let links = directory
            .entries
            .iter()
            .filter_map(|entry| {
                let linked = entry.tag.linked_directory()?;
                if linked.parent() != Some(parent) {
                    tracing::info!("Ignoring pointer to {linked:?} inside {parent:?}");
                    return None;
                }
                match entry.u32(byte_order) {
                    Some(offset) => Some((linked, offset)),
                    None => {
                        tracing::info!("Pointer to {linked:?} is not a single offset");
                        None
                    }
                }
            })
            .collect::<Vec<_>>();

        directories.push(directory);

        for (linked, offset) in links {
            self.read_linked(linked, offset, directories);
        }
    }

    /// Sometimes, not all directory locations are actually valid
    fn read_linked(
        &mut self,
        directory_type: DirectoryType,
        offset: u32,
        directories: &mut Vec<Directory>,
    ) {
        if directories
            .iter()
            .any(|x| x.directory_type == directory_type)
        {
            tracing::info!("Ignoring duplicate {directory_type:?} directory");
            return;
        }

        match self.read_directory(directory_type, offset) {
            Ok(directory) => self.push_with_linked(directory, directories),
            Err(err) => tracing::info!("Failed to load {directory_type:?} directory: {err}"),
        }
    }

    fn read_directory(
        &mut self,
        directory_type: DirectoryType,
        offset: u32,
    ) -> Result<Directory, ReadError> {
        if offset < HEADER_SIZE || offset.usize()? >= self.raw.len() {
            return Err(ReadError::DirectoryOffsetInvalid(offset));
        }
        if !self.visited.insert(offset) {
            tracing::info!("Directory at {offset} referenced twice");
            return Err(ReadError::DirectoryOffsetInvalid(offset));
        }

        self.raw.seek_start(offset)?;
        let n_entries = self.raw.read_u16()?;
        tracing::debug!("Reading {directory_type:?} directory with {n_entries} entries at byte {offset}");

        let mut entries = Vec::with_capacity(n_entries.into());
        for _ in 0..n_entries {
            entries.push(self.read_entry()?);
        }

        let next_directory_offset = self.raw.read_u32()?;

        let length = table_length(n_entries.into())?;
        let table = self
            .raw
            .slice(offset, length)
            .e(ReadError::DirectoryOffsetInvalid(offset))?
            .to_vec();

        let mut directory = Directory {
            directory_type,
            offset,
            entries,
            next_directory_offset,
            thumbnail: None,
            table,
        };

        directory.thumbnail = self.read_thumbnail(&directory)?;

        Ok(directory)
    }

    /// Read a single entry from the entry table
    fn read_entry(&mut self) -> Result<Entry, ReadError> {
        let position = self.raw.position()?;
        let tag = Tag(self.raw.read_u16()?);
        let field_type = FieldType::from(self.raw.read_u16()?);
        let count = self.raw.read_u32()?;
        let bytes: [u8; 4] = self.raw.read_exact()?;

        let length = count.safe_mul(field_type.size())?;

        let (value_offset, value) = if length <= 4 {
            (ValueOffset::Value(bytes), bytes[..length.usize()?].to_vec())
        } else {
            let offset = self.raw.byte_order.u32(bytes);
            let value = self
                .raw
                .slice(offset, length)
                .filter(|_| offset >= HEADER_SIZE)
                .e(ReadError::ValueOutOfBounds {
                    tag,
                    offset,
                    length,
                })?;
            (ValueOffset::Offset(offset), value.to_vec())
        };

        Ok(Entry {
            tag,
            field_type,
            count,
            position,
            value_offset,
            value,
        })
    }

    fn read_thumbnail(&self, directory: &Directory) -> Result<Option<Element>, ReadError> {
        let byte_order = self.raw.byte_order;

        let Some(offset) = directory
            .entry(Tag::JPEG_INTERCHANGE_FORMAT)
            .and_then(|x| x.u32(byte_order))
        else {
            return Ok(None);
        };
        let Some(length) = directory
            .entry(Tag::JPEG_INTERCHANGE_FORMAT_LENGTH)
            .and_then(|x| x.u32(byte_order))
        else {
            return Ok(None);
        };

        if length == 0 {
            return Ok(None);
        }

        match self.raw.slice(offset, length).filter(|_| offset >= HEADER_SIZE) {
            Some(bytes) => Ok(Some(Element::data(offset, bytes.to_vec())?)),
            None => {
                tracing::info!("Thumbnail at {offset} with length {length} exceeds the segment");
                Ok(None)
            }
        }
    }
}
