use std::collections::BTreeMap;

use tiffout_common::byte_order::ByteOrder;
use tiffout_common::math::*;
use tiffout_common::tag::{DirectoryType, Tag};

use super::{ItemKind, OutputDirectory, OutputField, OutputItem, OutputSet};
use crate::error::{Error, Result, ResultExt};
use crate::raw::Raw;
use crate::ENTRY_SIZE;

/// Index into [`OutputSummary::items`]
pub type ItemId = usize;

/// Field whose value is the offset of an item
#[derive(Debug, Clone, Copy)]
struct Pointer {
    directory: usize,
    tag: Tag,
    target: ItemId,
}

/// Items of an output set and the references between them
///
/// Creating the summary synthesizes all pointer fields. After placement,
/// [`Self::update_offsets`] writes the final offsets into these fields.
#[derive(Debug)]
pub struct OutputSummary {
    byte_order: ByteOrder,
    items: Vec<OutputItem>,
    pointers: Vec<Pointer>,
    /// Entry table item for every directory
    directory_items: Vec<ItemId>,
    value_items: BTreeMap<(usize, usize), ItemId>,
    /// Directory linked via the next directory offset
    next_directory: Vec<Option<usize>>,
    root: usize,
}

impl OutputSummary {
    pub fn new(set: &mut OutputSet) -> Result<Self> {
        let byte_order = set.byte_order();
        let root = set
            .position(DirectoryType::Root)
            .e(Error::MissingRootDirectory)?;

        for directory in set.directories() {
            let directory_type = directory.directory_type();
            if let Some(parent) = directory_type.parent() {
                if set.find_directory(parent).is_none() {
                    return Err(Error::MissingParentDirectory(directory_type));
                }
            }
        }

        let present = set
            .directories()
            .iter()
            .map(OutputDirectory::directory_type)
            .collect::<Vec<_>>();

        for directory in set.directories_mut() {
            Self::synthesize_fields(directory, &present, byte_order)?;
            directory.sort_fields();
        }

        let mut summary = Self {
            byte_order,
            items: Vec::new(),
            pointers: Vec::new(),
            directory_items: Vec::new(),
            value_items: BTreeMap::new(),
            next_directory: vec![None; set.directories().len()],
            root,
        };

        for (d, directory) in set.directories().iter().enumerate() {
            summary.add_directory_items(d, directory)?;
        }

        for (d, directory) in set.directories().iter().enumerate() {
            let directory_type = directory.directory_type();
            let Some(parent) = directory_type.parent() else {
                continue;
            };
            let parent = set
                .position(parent)
                .e(Error::MissingParentDirectory(directory_type))?;

            match directory_type.pointer_tag() {
                Some(tag) => summary.pointers.push(Pointer {
                    directory: parent,
                    tag,
                    target: summary.directory_items[d],
                }),
                None => summary.next_directory[parent] = Some(d),
            }
        }

        tracing::debug!(
            "Output set has {} items in {} directories",
            summary.items.len(),
            summary.directory_items.len()
        );

        Ok(summary)
    }

    /// Replaces pointer fields with placeholders for the present directories
    fn synthesize_fields(
        directory: &mut OutputDirectory,
        present: &[DirectoryType],
        byte_order: ByteOrder,
    ) -> Result<()> {
        for tag in [
            Tag::EXIF_IFD_POINTER,
            Tag::GPS_INFO_IFD_POINTER,
            Tag::INTEROPERABILITY_IFD_POINTER,
            Tag::JPEG_INTERCHANGE_FORMAT,
            Tag::JPEG_INTERCHANGE_FORMAT_LENGTH,
        ] {
            directory.remove_field(tag);
        }

        for child in present {
            if child.parent() != Some(directory.directory_type()) {
                continue;
            }
            if let Some(tag) = child.pointer_tag() {
                directory.add_field(OutputField::long(tag, 0, byte_order))?;
            }
        }

        if let Some(thumbnail) = directory.thumbnail() {
            let length = thumbnail.len().u32()?;
            directory.add_field(OutputField::long(
                Tag::JPEG_INTERCHANGE_FORMAT,
                0,
                byte_order,
            ))?;
            directory.add_field(OutputField::long(
                Tag::JPEG_INTERCHANGE_FORMAT_LENGTH,
                length,
                byte_order,
            ))?;
        }

        Ok(())
    }

    fn add_directory_items(&mut self, d: usize, directory: &OutputDirectory) -> Result<()> {
        let n_entries = directory.fields().len().u32()?;
        let table_length = n_entries.safe_mul(ENTRY_SIZE)?.safe_add(2)?.safe_add(4)?;
        let id = self.push(OutputItem::new(ItemKind::Directory { directory: d }, table_length));
        self.directory_items.push(id);

        for (f, field) in directory.fields().iter().enumerate() {
            if !field.is_out_of_line() {
                continue;
            }

            let kind = ItemKind::Value {
                directory: d,
                field: f,
            };
            let item = match field.preserved_offset() {
                Some(offset) => OutputItem::preplaced(kind, field.length()?, offset),
                None => OutputItem::new(kind, field.length()?),
            };

            let id = self.push(item);
            self.value_items.insert((d, f), id);
        }

        if let Some(thumbnail) = directory.thumbnail() {
            let id = self.push(OutputItem::new(
                ItemKind::Thumbnail { directory: d },
                thumbnail.len().u32()?,
            ));
            self.pointers.push(Pointer {
                directory: d,
                tag: Tag::JPEG_INTERCHANGE_FORMAT,
                target: id,
            });
        }

        Ok(())
    }

    fn push(&mut self, item: OutputItem) -> ItemId {
        self.items.push(item);
        self.items.len().saturating_sub(1)
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// All items in generation order
    ///
    /// Per directory: entry table, out-of-line values, thumbnail.
    pub fn items(&self) -> &[OutputItem] {
        &self.items
    }

    pub fn item_mut(&mut self, id: ItemId) -> Option<&mut OutputItem> {
        self.items.get_mut(id)
    }

    pub fn items_mut(&mut self) -> &mut [OutputItem] {
        &mut self.items
    }

    pub fn root_offset(&self) -> Result<u64> {
        self.directory_offset(self.root)
    }

    fn directory_offset(&self, d: usize) -> Result<u64> {
        let id = self.directory_items.get(d).e(Error::ItemNotPlaced)?;
        self.item_offset(*id)
    }

    fn item_offset(&self, id: ItemId) -> Result<u64> {
        self.items.get(id).e(Error::ItemNotPlaced)?.offset()
    }

    /// Writes the final offsets into the pointer fields
    pub fn update_offsets(&self, set: &mut OutputSet) -> Result<()> {
        for pointer in &self.pointers {
            let offset = self.item_offset(pointer.target)?.u32()?;

            let field = set
                .directories_mut()
                .get_mut(pointer.directory)
                .and_then(|x| x.find_field_mut(pointer.tag))
                .e(Error::UnresolvedReference(pointer.tag))?;

            field.set_bytes(1, self.byte_order.u32_bytes(offset).to_vec());
        }

        Ok(())
    }

    /// Serializes an item at its offset
    pub fn write_item(&self, id: ItemId, set: &OutputSet, buffer: &mut [u8]) -> Result<()> {
        let item = self.items.get(id).e(Error::ItemNotPlaced)?;

        let mut raw = Raw::new(buffer, self.byte_order);
        raw.seek_start(item.offset()?)?;

        match item.kind() {
            ItemKind::Directory { directory } => {
                let output_directory = set
                    .directories()
                    .get(directory)
                    .e(Error::ItemNotPlaced)?;
                self.write_directory(directory, output_directory, &mut raw)?;
            }
            ItemKind::Value { directory, field } => {
                let output_field = set
                    .directories()
                    .get(directory)
                    .and_then(|x| x.fields().get(field))
                    .e(Error::ItemNotPlaced)?;
                raw.write_all(output_field.bytes())?;
            }
            ItemKind::Thumbnail { directory } => {
                let thumbnail = set
                    .directories()
                    .get(directory)
                    .and_then(OutputDirectory::thumbnail)
                    .e(Error::ItemNotPlaced)?;
                raw.write_all(thumbnail)?;
            }
        }

        Ok(())
    }

    fn write_directory(
        &self,
        d: usize,
        directory: &OutputDirectory,
        raw: &mut Raw<&mut [u8]>,
    ) -> Result<()> {
        raw.write_u16(directory.fields().len().u16()?)?;

        for (f, field) in directory.fields().iter().enumerate() {
            raw.write_u16(field.tag.0)?;
            raw.write_u16(field.field_type.u16())?;
            raw.write_u32(field.count)?;

            if field.is_out_of_line() {
                let id = self
                    .value_items
                    .get(&(d, f))
                    .e(Error::UnresolvedReference(field.tag))?;
                raw.write_u32(self.item_offset(*id)?.u32()?)?;
            } else {
                let mut slot = [0; 4];
                for (target, byte) in slot.iter_mut().zip(field.bytes()) {
                    *target = *byte;
                }
                raw.write_all(&slot)?;
            }
        }

        let next_offset = match self.next_directory.get(d).copied().flatten() {
            Some(next) => self.directory_offset(next)?.u32()?,
            None => 0,
        };
        raw.write_u32(next_offset)?;

        Ok(())
    }
}
