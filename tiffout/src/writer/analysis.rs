use tiffout_common::byte_order::ByteOrder;
use tiffout_common::tag::Tag;

use crate::element::{self, Element};
use crate::error::Result;
use crate::output::OutputSet;
use crate::reader::TiffReader;

/// Byte ranges of the old segment that may be cleared and reused
///
/// Out-of-line values of `frozen_tags` that are unchanged in `output_set`
/// are excluded. Their old offset is recorded on the output field instead.
pub(super) fn analyze(
    old_segment: &[u8],
    byte_order: ByteOrder,
    output_set: &mut OutputSet,
    frozen_tags: &[Tag],
) -> Result<Vec<Element>> {
    let contents = TiffReader::new(old_segment).read()?;
    super::check_byte_order(byte_order, contents.byte_order)?;

    let mut elements = Vec::new();

    for directory in &contents.directories {
        elements.push(directory.element()?);

        for entry in &directory.entries {
            let Some(value) = entry.out_of_line_element()? else {
                continue;
            };

            if frozen_tags.contains(&entry.tag)
                && output_set.preserve_offset(entry.tag, &entry.value, value.offset())
            {
                tracing::debug!(
                    "Keeping {} at offset {} with {} bytes",
                    entry.tag,
                    value.offset(),
                    value.length()
                );
                continue;
            }

            elements.push(value);
        }

        if let Some(thumbnail) = &directory.thumbnail {
            elements.push(thumbnail.clone());
        }
    }

    Ok(element::merge(elements)?)
}
