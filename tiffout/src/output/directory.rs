use tiffout_common::byte_order::ByteOrder;
use tiffout_common::tag::{DirectoryType, Tag};

use super::OutputField;
use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct OutputDirectory {
    directory_type: DirectoryType,
    byte_order: ByteOrder,
    fields: Vec<OutputField>,
    thumbnail: Option<Vec<u8>>,
}

impl OutputDirectory {
    pub fn new(directory_type: DirectoryType, byte_order: ByteOrder) -> Self {
        Self {
            directory_type,
            byte_order,
            fields: Vec::new(),
            thumbnail: None,
        }
    }

    pub fn directory_type(&self) -> DirectoryType {
        self.directory_type
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    pub fn fields(&self) -> &[OutputField] {
        &self.fields
    }

    /// Adds a field
    ///
    /// Every tag can only exist once per directory. Use
    /// [`Self::remove_field`] first to replace a field.
    pub fn add_field(&mut self, field: OutputField) -> Result<()> {
        if self.find_field(field.tag).is_some() {
            return Err(Error::DuplicateField(field.tag, self.directory_type));
        }

        self.fields.push(field);

        Ok(())
    }

    pub fn find_field(&self, tag: Tag) -> Option<&OutputField> {
        self.fields.iter().find(|x| x.tag == tag)
    }

    pub fn find_field_mut(&mut self, tag: Tag) -> Option<&mut OutputField> {
        self.fields.iter_mut().find(|x| x.tag == tag)
    }

    pub fn remove_field(&mut self, tag: Tag) -> Option<OutputField> {
        let index = self.fields.iter().position(|x| x.tag == tag)?;
        Some(self.fields.remove(index))
    }

    /// Embedded JPEG thumbnail
    pub fn thumbnail(&self) -> Option<&[u8]> {
        self.thumbnail.as_deref()
    }

    pub fn set_thumbnail(&mut self, thumbnail: Option<Vec<u8>>) {
        self.thumbnail = thumbnail.filter(|x| !x.is_empty());
    }

    pub(crate) fn fields_mut(&mut self) -> &mut [OutputField] {
        &mut self.fields
    }

    pub(crate) fn sort_fields(&mut self) {
        self.fields.sort_by_key(|x| x.tag);
    }
}
