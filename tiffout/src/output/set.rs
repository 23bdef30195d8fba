use std::collections::BTreeSet;

use tiffout_common::byte_order::ByteOrder;
use tiffout_common::tag::{DirectoryType, Tag};

use super::{OutputDirectory, OutputField};
use crate::error::{Error, Result};
use crate::reader::TiffContents;

/// All directories of an edit
///
/// Holds at most one directory per [`DirectoryType`]. Directories are kept
/// ordered by their type.
#[derive(Debug, Clone)]
pub struct OutputSet {
    byte_order: ByteOrder,
    directories: Vec<OutputDirectory>,
}

impl OutputSet {
    pub fn new(byte_order: ByteOrder) -> Self {
        Self {
            byte_order,
            directories: Vec::new(),
        }
    }

    /// Edit set that reproduces an existing segment
    ///
    /// Pointer and thumbnail offset fields are left out since they are
    /// synthesized when writing.
    pub fn from_contents(contents: &TiffContents) -> Result<Self> {
        let mut set = Self::new(contents.byte_order);

        for directory in &contents.directories {
            let mut output_directory =
                OutputDirectory::new(directory.directory_type, contents.byte_order);

            for entry in &directory.entries {
                if entry.tag.is_structural() {
                    continue;
                }

                let field = OutputField::new(
                    entry.tag,
                    entry.field_type,
                    entry.count,
                    entry.value.clone(),
                );

                if let Err(err) = output_directory.add_field(field) {
                    tracing::info!("Skipping entry: {err}");
                }
            }

            output_directory.set_thumbnail(
                directory
                    .thumbnail
                    .as_ref()
                    .and_then(|x| x.bytes())
                    .map(<[u8]>::to_vec),
            );

            set.add_directory(output_directory)?;
        }

        Ok(set)
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    pub fn directories(&self) -> &[OutputDirectory] {
        &self.directories
    }

    /// Adds a directory
    ///
    /// Fails if a directory of the same type already exists.
    pub fn add_directory(&mut self, directory: OutputDirectory) -> Result<&mut OutputDirectory> {
        let directory_type = directory.directory_type();

        if self.find_directory(directory_type).is_some() {
            return Err(Error::DirectoryExists(directory_type));
        }

        if directory.byte_order() != self.byte_order {
            return Err(Error::ByteOrderMismatch {
                expected: self.byte_order,
                actual: directory.byte_order(),
            });
        }

        let index = self
            .directories
            .partition_point(|x| x.directory_type() < directory_type);
        self.directories.insert(index, directory);

        Ok(&mut self.directories[index])
    }

    pub fn find_directory(&self, directory_type: DirectoryType) -> Option<&OutputDirectory> {
        self.directories
            .iter()
            .find(|x| x.directory_type() == directory_type)
    }

    pub fn find_directory_mut(
        &mut self,
        directory_type: DirectoryType,
    ) -> Option<&mut OutputDirectory> {
        self.directories
            .iter_mut()
            .find(|x| x.directory_type() == directory_type)
    }

    /// Returns the directory, creating it and all directories it depends on
    pub fn get_or_create_directory(&mut self, directory_type: DirectoryType) -> &mut OutputDirectory {
        if let Some(parent) = directory_type.parent() {
            self.get_or_create_directory(parent);
        }

        let index = match self.position(directory_type) {
            Some(index) => index,
            None => {
                let index = self
                    .directories
                    .partition_point(|x| x.directory_type() < directory_type);
                self.directories
                    .insert(index, OutputDirectory::new(directory_type, self.byte_order));
                index
            }
        };

        &mut self.directories[index]
    }

    pub fn get_or_create_root_directory(&mut self) -> &mut OutputDirectory {
        self.get_or_create_directory(DirectoryType::Root)
    }

    /// The Exif directory requires the root directory
    pub fn get_or_create_exif_directory(&mut self) -> &mut OutputDirectory {
        self.get_or_create_directory(DirectoryType::Exif)
    }

    /// Creates the Exif directory first if absent
    ///
    /// The GPS directory itself is linked from the root directory.
    pub fn get_or_create_gps_directory(&mut self) -> &mut OutputDirectory {
        self.get_or_create_directory(DirectoryType::Exif);
        self.get_or_create_directory(DirectoryType::Gps)
    }

    /// The Interoperability directory requires the Exif directory
    pub fn get_or_create_interoperability_directory(&mut self) -> &mut OutputDirectory {
        self.get_or_create_directory(DirectoryType::Interoperability)
    }

    /// First field with `tag` in any directory
    pub fn find_field(&self, tag: Tag) -> Option<&OutputField> {
        self.directories.iter().find_map(|x| x.find_field(tag))
    }

    /// Removes `tag` from all directories
    pub fn remove_field(&mut self, tag: Tag) -> Vec<OutputField> {
        self.directories
            .iter_mut()
            .filter_map(|x| x.remove_field(tag))
            .collect()
    }

    pub(crate) fn position(&self, directory_type: DirectoryType) -> Option<usize> {
        self.directories
            .iter()
            .position(|x| x.directory_type() == directory_type)
    }

    pub(crate) fn directories_mut(&mut self) -> &mut [OutputDirectory] {
        &mut self.directories
    }

    /// Keeps the old offset of an unchanged out-of-line value
    ///
    /// Returns `true` if a field with `tag` and identical content was found.
    pub(crate) fn preserve_offset(&mut self, tag: Tag, old_value: &[u8], offset: u64) -> bool {
        let field = self
            .directories
            .iter_mut()
            .find_map(|x| x.find_field_mut(tag));

        match field {
            Some(field)
                if field.is_out_of_line()
                    && field.preserved_offset().is_none()
                    && field.bytes_equal(old_value) =>
            {
                field.preserve_offset(offset);
                true
            }
            _ => false,
        }
    }

    pub(crate) fn preserved_offsets(&self) -> BTreeSet<u64> {
        self.directories
            .iter()
            .flat_map(|x| x.fields())
            .filter_map(OutputField::preserved_offset)
            .collect()
    }

    pub(crate) fn clear_preserved_offsets(&mut self) {
        for field in self
            .directories
            .iter_mut()
            .flat_map(|x| x.fields_mut().iter_mut())
        {
            field.clear_preserved_offset();
        }
    }
}
