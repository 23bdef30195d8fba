//! Serialization of an [`OutputSet`] into a segment

mod analysis;
mod gap_reusing;
mod sequential;

use tiffout_common::byte_order::ByteOrder;
use tiffout_common::math::*;

pub use gap_reusing::GapReusingWriter;
pub use sequential::SequentialWriter;

use crate::error::{Error, Result};
use crate::output::{ItemId, OutputSet, OutputSummary};
use crate::raw::Raw;
use crate::MAGIC;

/// Writes `output_set` as a new segment
///
/// If the bytes of the old segment are given, its layout is reused via
/// [`GapReusingWriter`]. Otherwise the segment is regenerated by
/// [`SequentialWriter`].
pub fn write_segment(
    old_segment: Option<&[u8]>,
    output_set: OutputSet,
    byte_order: ByteOrder,
) -> Result<Vec<u8>> {
    match old_segment {
        Some(old_segment) => GapReusingWriter::new(byte_order, old_segment).write(output_set),
        None => SequentialWriter::new(byte_order).write(output_set),
    }
}

fn check_byte_order(expected: ByteOrder, actual: ByteOrder) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(Error::ByteOrderMismatch { expected, actual })
    }
}

/// Byte order marker, magic number, and root directory offset
fn write_header(buffer: &mut [u8], byte_order: ByteOrder, root_offset: u64) -> Result<()> {
    let mut raw = Raw::new(buffer, byte_order);
    raw.seek_start(0_u32)?;

    raw.write_all(&byte_order.marker())?;
    raw.write_u16(MAGIC)?;
    raw.write_u32(root_offset.u32()?)?;

    Ok(())
}

fn write_items(
    summary: &OutputSummary,
    set: &OutputSet,
    items: impl IntoIterator<Item = ItemId>,
    buffer: &mut [u8],
) -> Result<()> {
    for id in items {
        summary.write_item(id, set, buffer)?;
    }

    Ok(())
}
