/// Numeric id of a directory entry
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, PartialOrd, Ord)]
pub struct Tag(pub u16);

impl Tag {
    pub const JPEG_INTERCHANGE_FORMAT: Self = Self(0x201);
    pub const JPEG_INTERCHANGE_FORMAT_LENGTH: Self = Self(0x202);

    pub const EXIF_IFD_POINTER: Self = Self(0x8769);
    pub const GPS_INFO_IFD_POINTER: Self = Self(0x8825);
    pub const INTEROPERABILITY_IFD_POINTER: Self = Self(0xA005);

    pub const MAKER_NOTE: Self = Self(0x927C);

    /// Directory a pointer tag links to
    ///
    /// See 4.6.3 in v3.0 standard
    pub fn linked_directory(&self) -> Option<DirectoryType> {
        match *self {
            Self::EXIF_IFD_POINTER => Some(DirectoryType::Exif),
            Self::GPS_INFO_IFD_POINTER => Some(DirectoryType::Gps),
            Self::INTEROPERABILITY_IFD_POINTER => Some(DirectoryType::Interoperability),
            _ => None,
        }
    }

    /// Tags whose value is an offset inside the segment
    ///
    /// These are never copied verbatim into a rewritten segment.
    pub fn is_structural(&self) -> bool {
        self.linked_directory().is_some()
            || *self == Self::JPEG_INTERCHANGE_FORMAT
            || *self == Self::JPEG_INTERCHANGE_FORMAT_LENGTH
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{:04X}", self.0)
    }
}

/// Logical type of an image file directory
///
/// The order of the variants is the order in which directories are laid out
/// when a segment is regenerated.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum DirectoryType {
    /// IFD0
    Root,
    Exif,
    Gps,
    Interoperability,
    /// IFD1, chained from the root directory
    Thumbnail,
}

impl DirectoryType {
    /// Directory that has to exist for this directory to be reachable
    pub fn parent(self) -> Option<Self> {
        match self {
            Self::Root => None,
            Self::Exif | Self::Gps | Self::Thumbnail => Some(Self::Root),
            Self::Interoperability => Some(Self::Exif),
        }
    }

    /// Tag in the parent directory that stores the offset of this directory
    ///
    /// The thumbnail directory is linked via the next directory offset instead.
    pub fn pointer_tag(self) -> Option<Tag> {
        match self {
            Self::Exif => Some(Tag::EXIF_IFD_POINTER),
            Self::Gps => Some(Tag::GPS_INFO_IFD_POINTER),
            Self::Interoperability => Some(Tag::INTEROPERABILITY_IFD_POINTER),
            Self::Root | Self::Thumbnail => None,
        }
    }
}
