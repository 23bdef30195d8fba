//! Edit-time tree of directories and fields
//!
//! An [`OutputSet`] is built by the caller, consumed by a writer, and
//! discarded. The writer turns it into [`OutputItem`]s via an
//! [`OutputSummary`].

mod directory;
mod field;
mod item;
mod set;
mod summary;

pub use directory::OutputDirectory;
pub use field::OutputField;
pub use item::{ItemKind, OutputItem};
pub use set::OutputSet;
pub use summary::{ItemId, OutputSummary};
