mod utils;

use utils::*;

const LE: ByteOrder = ByteOrder::LittleEndian;

fn maker_note() -> Vec<u8> {
    (0..500_u32).map(|x| (x % 251) as u8).collect()
}

/// Maker note at 200 with unknown data in front of it
fn with_maker_note(byte_order: ByteOrder) -> Vec<u8> {
    let mut segment = Segment::new(byte_order, 8);
    segment
        .directory(
            8,
            &[
                at(0x10F, FieldType::Ascii, 12, 38, byte_order),
                inline(0x8769, FieldType::Long, 1, byte_order.u32_bytes(50)),
            ],
            0,
        )
        .put(38, b"Camera 1234\0")
        .directory(
            50,
            &[at(0x927C, FieldType::Undefined, 500, 200, byte_order)],
            0,
        )
        .put(68, &[0xAA; 132])
        .put(200, &maker_note());

    segment.build()
}

/// Ten byte value at 50 and a value at the very end
fn with_gaps(value_offset: u32) -> Vec<u8> {
    let mut segment = Segment::new(LE, 8);
    segment
        .directory(
            8,
            &[
                at(0x10E, FieldType::Undefined, 10, value_offset, LE),
                at(0x131, FieldType::Undefined, 8, 100, LE),
            ],
            0,
        )
        .put(value_offset, &[1; 10]);

    let filler_start = value_offset + 10;
    segment
        .put(filler_start, &vec![0xBB; (100 - filler_start) as usize])
        .put(100, &[2; 8]);

    segment.build()
}

fn replace_make(set: &mut OutputSet, make: &str) {
    let root = set.find_directory_mut(DirectoryType::Root).unwrap();
    root.remove_field(Tag(0x10F)).unwrap();
    root.add_field(OutputField::ascii(Tag(0x10F), make)).unwrap();
}

#[test]
fn contiguous_written_sequentially() {
    let mut segment = Segment::new(LE, 8);
    segment
        .directory(8, &[at(0x10F, FieldType::Ascii, 12, 28, LE)], 0)
        .put(28, b"Camera 1234\0");
    let old = segment.build();
    assert_eq!(old.len(), 40);

    let mut set = OutputSet::from_contents(&read(&old)).unwrap();
    replace_make(&mut set, "Camera 5678");

    let reused = write_segment(Some(old.as_slice()), set.clone(), LE).unwrap();
    let sequential = SequentialWriter::new(LE).write(set).unwrap();

    assert_eq!(reused, sequential);

    // Padding after the directory is gone
    assert_eq!(reused.len(), 38);
    assert!(reused.len() < old.len());
    assert_eq!(&reused[26..38], b"Camera 5678\0");
}

#[test]
fn unchanged_segment() {
    let mut set = OutputSet::new(LE);
    set.get_or_create_exif_directory()
        .add_field(OutputField::undefined(Tag(0x9000), b"0232".to_vec()))
        .unwrap();
    set.get_or_create_root_directory()
        .add_field(OutputField::short(Tag(0x112), 1, LE))
        .unwrap();
    let old = SequentialWriter::new(LE).write(set).unwrap();

    let set = OutputSet::from_contents(&read(&old)).unwrap();
    let new = GapReusingWriter::new(LE, &old).write(set).unwrap();

    assert_eq!(old, new);
}

#[test]
fn maker_note_keeps_offset() {
    let old = with_maker_note(LE);
    assert_eq!(old.len(), 700);

    let mut set = OutputSet::from_contents(&read(&old)).unwrap();
    replace_make(&mut set, "Other camera model");

    let new = GapReusingWriter::new(LE, &old).write(set).unwrap();
    check_layout(&new);

    // Exif directory doesn't fit into the old structure anymore
    assert_eq!(new.len(), 718);

    assert_eq!(&new[200..700], maker_note().as_slice());
    assert_eq!(&new[68..200], &[0xAA; 132]);

    let contents = read(&new);
    let make = entry(&contents, DirectoryType::Root, Tag(0x10F));
    assert_eq!(value_offset(&make), 38);
    assert_eq!(make.value, b"Other camera model\0");

    let exif_pointer = entry(&contents, DirectoryType::Root, Tag::EXIF_IFD_POINTER);
    assert_eq!(exif_pointer.u32(LE), Some(700));

    let maker_note_entry = entry(&contents, DirectoryType::Exif, Tag::MAKER_NOTE);
    assert_eq!(value_offset(&maker_note_entry), 200);
    assert_eq!(maker_note_entry.value, maker_note());
}

#[test]
fn maker_note_big_endian() {
    let byte_order = ByteOrder::BigEndian;
    let old = with_maker_note(byte_order);

    let mut set = OutputSet::from_contents(&read(&old)).unwrap();
    assert_eq!(set.byte_order(), byte_order);
    replace_make(&mut set, "Other camera model");

    let new = GapReusingWriter::new(byte_order, &old).write(set).unwrap();
    check_layout(&new);

    assert_eq!(new.len(), 718);
    assert_eq!(&new[..8], b"MM\0\x2a\0\0\0\x08");
    assert_eq!(&new[200..700], maker_note().as_slice());

    let contents = read(&new);
    assert_eq!(contents.byte_order, byte_order);

    let make = entry(&contents, DirectoryType::Root, Tag(0x10F));
    assert_eq!(value_offset(&make), 38);
    assert_eq!(make.value, b"Other camera model\0");

    let exif_pointer = entry(&contents, DirectoryType::Root, Tag::EXIF_IFD_POINTER);
    assert_eq!(exif_pointer.u32(byte_order), Some(700));

    let maker_note_entry = entry(&contents, DirectoryType::Exif, Tag::MAKER_NOTE);
    assert_eq!(value_offset(&maker_note_entry), 200);
}

/// Second pass reproduces this layout, which doesn't hold for every edit
#[test]
fn rewrite_stable() {
    let old = with_maker_note(LE);

    let mut set = OutputSet::from_contents(&read(&old)).unwrap();
    replace_make(&mut set, "Other camera model");
    let first = GapReusingWriter::new(LE, &old).write(set).unwrap();

    let set = OutputSet::from_contents(&read(&first)).unwrap();
    let second = GapReusingWriter::new(LE, &first).write(set).unwrap();

    assert_eq!(first, second);
}

#[test]
fn changed_maker_note_moves() {
    let old = with_maker_note(LE);

    let mut set = OutputSet::from_contents(&read(&old)).unwrap();
    let new_maker_note = vec![7; 500];
    set.find_directory_mut(DirectoryType::Exif)
        .unwrap()
        .find_field_mut(Tag::MAKER_NOTE)
        .unwrap()
        .set_bytes(500, new_maker_note.clone());

    let new = GapReusingWriter::new(LE, &old).write(set).unwrap();
    check_layout(&new);
    assert_eq!(new.len(), 700);

    let contents = read(&new);
    let maker_note_entry = entry(&contents, DirectoryType::Exif, Tag::MAKER_NOTE);
    assert_eq!(maker_note_entry.value, new_maker_note);

    // Directories and the make value now share the old structure
    assert_eq!(contents.directory(DirectoryType::Root).unwrap().offset, 8);
    assert_eq!(contents.directory(DirectoryType::Exif).unwrap().offset, 38);
    let make = entry(&contents, DirectoryType::Root, Tag(0x10F));
    assert_eq!(value_offset(&make), 56);
}

#[test]
fn no_frozen_tags() {
    let old = with_maker_note(LE);

    let set = OutputSet::from_contents(&read(&old)).unwrap();
    let new = GapReusingWriter::new(LE, &old)
        .with_frozen_tags([])
        .write(set)
        .unwrap();
    check_layout(&new);

    let contents = read(&new);
    let maker_note_entry = entry(&contents, DirectoryType::Exif, Tag::MAKER_NOTE);
    assert_eq!(maker_note_entry.value, maker_note());
}

#[test]
fn gap_reused() {
    let old = with_gaps(50);
    assert_eq!(old.len(), 108);

    let mut set = OutputSet::from_contents(&read(&old)).unwrap();
    let root = set.find_directory_mut(DirectoryType::Root).unwrap();
    root.remove_field(Tag(0x131)).unwrap();
    root.find_field_mut(Tag(0x10E))
        .unwrap()
        .set_bytes(10, vec![3; 10]);

    let new = GapReusingWriter::new(LE, &old).write(set).unwrap();
    check_layout(&new);

    // Value at the end was dropped
    assert_eq!(new.len(), 100);

    let contents = read(&new);
    let description = entry(&contents, DirectoryType::Root, Tag(0x10E));
    assert_eq!(value_offset(&description), 50);
    assert_eq!(&new[50..60], &[3; 10]);

    // Unknown data stays in place
    assert_eq!(&new[60..100], &[0xBB; 40]);
    // Unused parts of the old directory are cleared
    assert_eq!(&new[26..50], &[0; 24]);
}

#[test]
fn equal_gaps_lowest_offset_first() {
    let mut segment = Segment::new(LE, 8);
    segment
        .directory(
            8,
            &[
                at(0x10E, FieldType::Undefined, 10, 100, LE),
                at(0x10F, FieldType::Undefined, 10, 80, LE),
                at(0x110, FieldType::Undefined, 10, 60, LE),
            ],
            0,
        )
        .put(50, &[0xBB; 10])
        .put(60, &[1; 10])
        .put(70, &[0xBB; 10])
        .put(80, &[2; 10])
        .put(90, &[0xBB; 10])
        .put(100, &[3; 10]);
    let old = segment.build();
    assert_eq!(old.len(), 110);

    let set = OutputSet::from_contents(&read(&old)).unwrap();
    let new = GapReusingWriter::new(LE, &old).write(set).unwrap();
    check_layout(&new);
    assert_eq!(new.len(), 110);

    // Largest item takes the old directory, then equal values go low to high
    let contents = read(&new);
    assert_eq!(contents.directory(DirectoryType::Root).unwrap().offset, 8);
    let offsets = [0x110, 0x10F, 0x10E]
        .map(|tag| value_offset(&entry(&contents, DirectoryType::Root, Tag(tag))));
    assert_eq!(offsets, [60, 80, 100]);

    assert_eq!(&new[60..70], &[1; 10]);
    assert_eq!(&new[80..90], &[2; 10]);
    assert_eq!(&new[100..110], &[3; 10]);
    assert_eq!(&new[50..60], &[0xBB; 10]);
    assert_eq!(&new[70..80], &[0xBB; 10]);
    assert_eq!(&new[90..100], &[0xBB; 10]);
}

#[test]
fn odd_gap_skipped() {
    let old = with_gaps(51);

    let mut set = OutputSet::from_contents(&read(&old)).unwrap();
    let root = set.find_directory_mut(DirectoryType::Root).unwrap();
    root.remove_field(Tag(0x131)).unwrap();
    root.find_field_mut(Tag(0x10E))
        .unwrap()
        .set_bytes(10, vec![3; 10]);

    let new = GapReusingWriter::new(LE, &old).write(set).unwrap();
    check_layout(&new);
    assert_eq!(new.len(), 100);

    let contents = read(&new);
    let description = entry(&contents, DirectoryType::Root, Tag(0x10E));
    assert_eq!(value_offset(&description), 26);
    assert_eq!(&new[26..36], &[3; 10]);

    assert_eq!(&new[51..61], &[0; 10]);
    assert_eq!(&new[61..100], &[0xBB; 39]);
}

#[test]
fn thumbnail_added() {
    let old = with_maker_note(LE);
    let thumbnail = vec![0xFF, 0xD8, 0xFF, 0xD9];

    let mut set = OutputSet::from_contents(&read(&old)).unwrap();
    set.get_or_create_directory(DirectoryType::Thumbnail)
        .set_thumbnail(Some(thumbnail.clone()));

    let new = write_segment(Some(old.as_slice()), set, LE).unwrap();
    check_layout(&new);
    assert_eq!(&new[200..700], maker_note().as_slice());

    let contents = read(&new);
    let ifd1 = contents.directory(DirectoryType::Thumbnail).unwrap();
    assert_eq!(ifd1.thumbnail.as_ref().unwrap().bytes(), Some(thumbnail.as_slice()));
}

#[test]
fn analysis_failed() {
    let mut set = OutputSet::new(LE);
    set.get_or_create_root_directory();

    let err = write_segment(Some(b"not a segment".as_slice()), set, LE).unwrap_err();
    assert!(matches!(
        err,
        Error::Analysis(ReadError::UnknownByteOrder([b'n', b'o']))
    ));
}

#[test]
fn byte_order_mismatch() {
    let old = with_maker_note(LE);

    let mut set = OutputSet::new(ByteOrder::BigEndian);
    set.get_or_create_root_directory();

    let err = GapReusingWriter::new(ByteOrder::BigEndian, &old)
        .write(set)
        .unwrap_err();
    assert!(matches!(
        err,
        Error::ByteOrderMismatch {
            expected: ByteOrder::BigEndian,
            actual: ByteOrder::LittleEndian
        }
    ));
}
