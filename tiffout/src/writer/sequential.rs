use tiffout_common::byte_order::ByteOrder;
use tiffout_common::math::*;

use crate::error::Result;
use crate::output::{OutputSet, OutputSummary};
use crate::HEADER_SIZE;

/// Regenerates a segment compactly
///
/// Items are laid out back-to-back after the header, each padded to an even
/// length. Nothing of an old segment's layout is preserved.
#[derive(Debug, Clone, Copy)]
pub struct SequentialWriter {
    byte_order: ByteOrder,
}

impl SequentialWriter {
    pub fn new(byte_order: ByteOrder) -> Self {
        Self { byte_order }
    }

    pub fn write(&self, mut output_set: OutputSet) -> Result<Vec<u8>> {
        super::check_byte_order(self.byte_order, output_set.byte_order())?;

        let mut summary = OutputSummary::new(&mut output_set)?;

        let length = Self::update_offsets_step(&mut summary)?;

        summary.update_offsets(&mut output_set)?;

        let mut buffer = vec![0; length.usize()?];
        super::write_header(&mut buffer, self.byte_order, summary.root_offset()?)?;
        super::write_items(
            &summary,
            &output_set,
            0..summary.items().len(),
            &mut buffer,
        )?;

        tracing::debug!("Sequentially wrote {length} bytes");

        Ok(buffer)
    }

    /// Assigns offsets and returns the total length
    fn update_offsets_step(summary: &mut OutputSummary) -> Result<u64> {
        let mut offset = u64::from(HEADER_SIZE);

        for item in summary.items_mut() {
            item.place(offset)?;

            let length = u64::from(item.length());
            offset = offset
                .safe_add(length)?
                .safe_add(length.padding_to_even())?;
        }

        Ok(offset)
    }
}
