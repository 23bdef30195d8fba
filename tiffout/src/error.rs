use tiffout_common::byte_order::ByteOrder;
use tiffout_common::math::MathError;
use tiffout_common::tag::{DirectoryType, Tag};

pub type Result<T> = std::result::Result<T, Error>;

/// Errors while writing or editing a segment
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Couldn't analyze old segment: {0}")]
    Analysis(#[source] ReadError),
    #[error("Analysis of old segment found no elements")]
    EmptyAnalysis,
    #[error("Output set already contains a directory of type {0:?}")]
    DirectoryExists(DirectoryType),
    #[error("Directory {1:?} already contains field {0}")]
    DuplicateField(Tag, DirectoryType),
    #[error("Output set has no root directory")]
    MissingRootDirectory,
    #[error("Directory {0:?} requires its parent directory")]
    MissingParentDirectory(DirectoryType),
    #[error("Output item has not been placed")]
    ItemNotPlaced,
    #[error("Output item has already been placed")]
    ItemAlreadyPlaced,
    #[error("Reference {0} points to an item that doesn't exist")]
    UnresolvedReference(Tag),
    #[error("Output item offset {0} is not word aligned")]
    UnalignedOffset(u64),
    #[error("Byte order mismatch: expected {expected:?}, got {actual:?}")]
    ByteOrderMismatch {
        expected: ByteOrder,
        actual: ByteOrder,
    },
    #[error("Math: {0}")]
    Math(#[from] MathError),
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors while reading the structure of a segment
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("Unknown byte order marker: {0:x?}")]
    UnknownByteOrder([u8; 2]),
    #[error("Magic bytes wrong: {0}")]
    MagicBytesWrong(u16),
    #[error("Directory offset invalid: {0}")]
    DirectoryOffsetInvalid(u32),
    #[error("Value of {tag} at offset {offset} with length {length} exceeds the segment")]
    ValueOutOfBounds { tag: Tag, offset: u32, length: u32 },
    #[error("Math: {0}")]
    Math(#[from] MathError),
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ReadError> for Error {
    fn from(value: ReadError) -> Self {
        Self::Analysis(value)
    }
}

pub(crate) trait ResultExt<T> {
    fn e<E>(self, err: E) -> std::result::Result<T, E>;
}

impl<T, F> ResultExt<T> for std::result::Result<T, F> {
    fn e<E>(self, err: E) -> std::result::Result<T, E> {
        self.map_err(|_| err)
    }
}

impl<T> ResultExt<T> for Option<T> {
    fn e<E>(self, err: E) -> std::result::Result<T, E> {
        match self {
            Some(v) => Ok(v),
            None => Err(err),
        }
    }
}
