use super::{TiffContents, ValueOffset};

impl TiffContents {
    pub fn debug_dump(&self) -> String {
        let mut out = String::new();

        out.push_str(&format!("Byte order {:?}\n", self.byte_order));

        for directory in &self.directories {
            out.push_str(&format!(
                "\n{:?} - Defined at {} - Next {}\n",
                directory.directory_type, directory.offset, directory.next_directory_offset
            ));
            out.push_str("------------------------------\n");

            for entry in &directory.entries {
                let location = match entry.value_offset {
                    ValueOffset::Value(_) => String::from("inline"),
                    ValueOffset::Offset(offset) => format!("at {offset}"),
                };

                out.push_str(&format!(
                    "{} {:?}({}) {location}: {}\n",
                    entry.tag,
                    entry.field_type,
                    entry.count,
                    preview(&entry.value)
                ));
            }

            if let Some(thumbnail) = &directory.thumbnail {
                out.push_str(&format!(
                    "Thumbnail at {} with {} bytes\n",
                    thumbnail.offset(),
                    thumbnail.length()
                ));
            }
        }

        out
    }
}

fn preview(value: &[u8]) -> String {
    const MAX: usize = 16;

    if value.len() > MAX {
        format!("{:02X?}…", &value[..MAX])
    } else {
        format!("{value:02X?}")
    }
}
