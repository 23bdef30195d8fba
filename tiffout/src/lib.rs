//! Layout engine for rewriting TIFF/Exif metadata segments
//!
//! An edit is collected in an [`OutputSet`] and then serialized by one of two
//! writers:
//!
//! - [`SequentialWriter`] regenerates the segment compactly.
//! - [`GapReusingWriter`] keeps the physical layout of the old segment where
//!   possible. Offset sensitive values like maker notes keep their position
//!   if their content is unchanged.
//!
//! ```
//! use tiffout::{write_segment, ByteOrder, OutputField, OutputSet, Tag};
//!
//! let mut set = OutputSet::new(ByteOrder::LittleEndian);
//! set.get_or_create_root_directory()
//!     .add_field(OutputField::ascii(Tag(0x10F), "Camera"))
//!     .unwrap();
//!
//! let segment = write_segment(None, set, ByteOrder::LittleEndian).unwrap();
//! assert_eq!(&segment[..4], b"II*\0");
//! ```

pub mod element;
pub mod error;
pub mod field_type;
pub mod output;
mod raw;
pub mod reader;
pub mod writer;

pub use element::Element;
pub use error::{Error, ReadError, Result};
pub use field_type::FieldType;
pub use output::{OutputDirectory, OutputField, OutputItem, OutputSet, OutputSummary};
pub use reader::{TiffContents, TiffReader};
pub use tiffout_common::byte_order::ByteOrder;
pub use tiffout_common::tag::{DirectoryType, Tag};
pub use writer::{write_segment, GapReusingWriter, SequentialWriter};

/// Byte order marker, magic number, and offset of the root directory
pub const HEADER_SIZE: u32 = 8;

/// Magic number following the byte order marker
pub const MAGIC: u16 = 42;

/// Size of one entry in a directory's entry table
pub const ENTRY_SIZE: u32 = 12;
