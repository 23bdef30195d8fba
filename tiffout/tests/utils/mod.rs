#![allow(dead_code)]

pub use tiffout::reader::{Entry, ValueOffset};
pub use tiffout::*;

/// Raw entry for hand-built segments
pub struct RawEntry {
    pub tag: u16,
    pub field_type: FieldType,
    pub count: u32,
    pub value: [u8; 4],
}

/// Entry with inline value
pub fn inline(tag: u16, field_type: FieldType, count: u32, value: [u8; 4]) -> RawEntry {
    RawEntry {
        tag,
        field_type,
        count,
        value,
    }
}

/// Entry pointing to a value at `offset`
pub fn at(tag: u16, field_type: FieldType, count: u32, offset: u32, order: ByteOrder) -> RawEntry {
    RawEntry {
        tag,
        field_type,
        count,
        value: order.u32_bytes(offset),
    }
}

/// Hand-built segment
pub struct Segment {
    pub data: Vec<u8>,
    pub byte_order: ByteOrder,
}

impl Segment {
    pub fn new(byte_order: ByteOrder, root_offset: u32) -> Self {
        let mut data = Vec::new();
        data.extend_from_slice(&byte_order.marker());
        data.extend_from_slice(&byte_order.u16_bytes(42));
        data.extend_from_slice(&byte_order.u32_bytes(root_offset));

        Self { data, byte_order }
    }

    /// Puts bytes at `offset`, growing the segment with zeros
    pub fn put(&mut self, offset: u32, bytes: &[u8]) -> &mut Self {
        let start = offset as usize;
        let end = start + bytes.len();
        if self.data.len() < end {
            self.data.resize(end, 0);
        }
        self.data[start..end].copy_from_slice(bytes);
        self
    }

    pub fn directory(&mut self, offset: u32, entries: &[RawEntry], next: u32) -> &mut Self {
        let order = self.byte_order;
        let mut table = Vec::new();

        table.extend_from_slice(&order.u16_bytes(entries.len() as u16));
        for entry in entries {
            table.extend_from_slice(&order.u16_bytes(entry.tag));
            table.extend_from_slice(&order.u16_bytes(entry.field_type.u16()));
            table.extend_from_slice(&order.u32_bytes(entry.count));
            table.extend_from_slice(&entry.value);
        }
        table.extend_from_slice(&order.u32_bytes(next));

        self.put(offset, &table)
    }

    pub fn build(&self) -> Vec<u8> {
        self.data.clone()
    }
}

pub fn read(segment: &[u8]) -> TiffContents {
    TiffReader::new(segment).read().unwrap()
}

pub fn entry(contents: &TiffContents, directory_type: DirectoryType, tag: Tag) -> Entry {
    contents
        .directory(directory_type)
        .unwrap()
        .entry(tag)
        .unwrap()
        .clone()
}

pub fn value_offset(entry: &Entry) -> u32 {
    match entry.value_offset {
        ValueOffset::Offset(offset) => offset,
        ValueOffset::Value(_) => panic!("Value of {} is inline", entry.tag),
    }
}

/// Checks that all parts of a segment are aligned, disjoint, and in bounds
pub fn check_layout(segment: &[u8]) {
    let contents = read(segment);

    let mut elements = Vec::new();
    for directory in &contents.directories {
        elements.push(directory.element().unwrap());
        for entry in &directory.entries {
            if let Some(element) = entry.out_of_line_element().unwrap() {
                elements.push(element);
            }
        }
        if let Some(thumbnail) = &directory.thumbnail {
            elements.push(thumbnail.clone());
        }
    }

    elements.sort_by_key(Element::offset);

    for element in &elements {
        assert!(element.offset() >= u64::from(HEADER_SIZE));
        assert_eq!(element.offset() % 2, 0, "{element:?} is not aligned");
        assert!(element.end().unwrap() <= segment.len() as u64);
    }

    for pair in elements.windows(2) {
        assert!(
            pair[0].end().unwrap() <= pair[1].offset(),
            "{:?} overlaps {:?}",
            pair[0],
            pair[1]
        );
    }
}
