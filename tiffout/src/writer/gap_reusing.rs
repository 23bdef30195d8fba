use std::cmp::Reverse;

use tiffout_common::byte_order::ByteOrder;
use tiffout_common::math::*;
use tiffout_common::tag::Tag;

use super::sequential::SequentialWriter;
use crate::element::Element;
use crate::error::{Error, Result, ResultExt};
use crate::output::{ItemId, OutputSet, OutputSummary};
use crate::HEADER_SIZE;

/// Rewrites a segment while keeping as much of the old layout as possible
///
/// There are some fields whose address in the segment must not change,
/// unless their value is changed. Maker notes, for example, often contain
/// absolute offsets and break if they are moved.
///
/// New items are placed into the ranges the old structure occupied. Items
/// that don't fit anywhere are appended at the end.
#[derive(Debug, Clone)]
pub struct GapReusingWriter<'a> {
    byte_order: ByteOrder,
    old_segment: &'a [u8],
    frozen_tags: Vec<Tag>,
}

impl<'a> GapReusingWriter<'a> {
    pub fn new(byte_order: ByteOrder, old_segment: &'a [u8]) -> Self {
        Self {
            byte_order,
            old_segment,
            frozen_tags: vec![Tag::MAKER_NOTE],
        }
    }

    /// Tags whose values keep their offset if unchanged
    ///
    /// Defaults to the maker note.
    pub fn with_frozen_tags(mut self, tags: impl IntoIterator<Item = Tag>) -> Self {
        self.frozen_tags = tags.into_iter().collect();
        self
    }

    pub fn write(&self, mut output_set: OutputSet) -> Result<Vec<u8>> {
        super::check_byte_order(self.byte_order, output_set.byte_order())?;

        let analysis = super::analysis::analyze(
            self.old_segment,
            self.byte_order,
            &mut output_set,
            &self.frozen_tags,
        )?;

        let old_length = self.old_segment.len().u64()?;

        let [first, ..] = analysis.as_slice() else {
            return Err(Error::EmptyAnalysis);
        };

        // No gaps in the old data, so it's safe to overwrite completely
        if analysis.len() == 1
            && first.offset() == u64::from(HEADER_SIZE)
            && first.end()? == old_length
        {
            tracing::debug!("Old segment has no gaps, writing sequentially");
            output_set.clear_preserved_offsets();
            return SequentialWriter::new(self.byte_order).write(output_set);
        }

        let frozen_offsets = output_set.preserved_offsets();

        let mut summary = OutputSummary::new(&mut output_set)?;

        let items = summary
            .items()
            .iter()
            .enumerate()
            .filter(|(_, item)| {
                item.offset()
                    .map_or(true, |offset| !frozen_offsets.contains(&offset))
            })
            .map(|(id, _)| id)
            .collect::<Vec<ItemId>>();

        let length = self.update_offsets_step(&analysis, &mut summary, &items)?;

        summary.update_offsets(&mut output_set)?;

        let buffer = self.write_step(&analysis, &summary, &output_set, &items, length)?;

        tracing::debug!(
            "Wrote {} bytes, old segment had {} bytes",
            buffer.len(),
            self.old_segment.len()
        );

        Ok(buffer)
    }

    /// Assigns offsets to `items` and returns the total length
    fn update_offsets_step(
        &self,
        analysis: &[Element],
        summary: &mut OutputSummary,
        items: &[ItemId],
    ) -> Result<u64> {
        // Items that don't fit into a gap are appended here
        let mut overflow_index = self.old_segment.len().u64()?;

        let mut unused_elements = analysis.to_vec();
        unused_elements.sort_by_key(Element::offset);
        unused_elements.reverse();

        // Elements at the end of the segment become part of the tail
        while let Some(element) = unused_elements.first() {
            if element.end()? != overflow_index {
                break;
            }

            overflow_index = overflow_index.safe_sub(element.length().into())?;
            tracing::debug!("Discarding tail element, tail now starts at {overflow_index}");
            unused_elements.remove(0);
        }

        // Equal gaps stay in descending offset order
        unused_elements.sort_by_key(|x| Reverse(x.length()));

        let mut unplaced_items = items
            .iter()
            .map(|id| Ok((*id, item_length(summary, *id)?)))
            .collect::<Result<Vec<_>>>()?;
        unplaced_items.sort_by_key(|(_, length)| *length);
        unplaced_items.reverse();

        for (id, length) in unplaced_items {
            // Smallest element that is still large enough
            let mut best_fit = None;
            for (i, element) in unused_elements.iter().enumerate() {
                if element.length() < length {
                    break;
                }
                if aligned(element)?.1 >= length {
                    best_fit = Some(i);
                }
            }

            let item = summary.item_mut(id).e(Error::ItemNotPlaced)?;

            match best_fit {
                None => {
                    overflow_index = overflow_index.align_even()?;
                    item.place(overflow_index)?;
                    overflow_index = overflow_index.safe_add(length.into())?;
                }
                Some(i) => {
                    let element = unused_elements.remove(i);
                    let (offset, available) = aligned(&element)?;

                    item.place(offset)?;

                    if available > length {
                        let excess_offset = offset.safe_add(length.into())?;
                        let excess_length = available.safe_sub(length)?;
                        unused_elements.push(Element::stub(excess_offset, excess_length));

                        unused_elements.sort_by_key(Element::length);
                        unused_elements.reverse();
                    }
                }
            }
        }

        Ok(overflow_index.max(HEADER_SIZE.into()))
    }

    fn write_step(
        &self,
        analysis: &[Element],
        summary: &OutputSummary,
        output_set: &OutputSet,
        items: &[ItemId],
        length: u64,
    ) -> Result<Vec<u8>> {
        let mut buffer = vec![0; length.usize()?];

        // Copy old data that includes maker notes and unknown data
        let prefix = self.old_segment.len().min(buffer.len());
        buffer[..prefix].copy_from_slice(&self.old_segment[..prefix]);

        // Clear the old structure in case it isn't overwritten
        for element in analysis {
            let start = element.offset().usize()?.min(buffer.len());
            let end = element.end()?.usize()?.min(buffer.len());
            buffer[start..end].fill(0);
        }

        super::write_header(&mut buffer, self.byte_order, summary.root_offset()?)?;
        super::write_items(summary, output_set, items.iter().copied(), &mut buffer)?;

        Ok(buffer)
    }
}

fn item_length(summary: &OutputSummary, id: ItemId) -> Result<u32> {
    Ok(summary.items().get(id).e(Error::ItemNotPlaced)?.length())
}

/// Start and usable length of an element once its start is word aligned
fn aligned(element: &Element) -> Result<(u64, u32)> {
    if element.offset().is_odd() {
        Ok((
            element.offset().safe_add(1)?,
            element.length().saturating_sub(1),
        ))
    } else {
        Ok((element.offset(), element.length()))
    }
}
