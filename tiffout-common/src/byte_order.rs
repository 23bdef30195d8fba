/// Byte order of all multi-byte integers in a segment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    /// Marked by `II`
    #[default]
    LittleEndian,
    /// Marked by `MM`
    BigEndian,
}

impl ByteOrder {
    /// Detects byte order from the first two bytes of a segment
    pub fn from_marker(marker: [u8; 2]) -> Option<Self> {
        match &marker {
            b"II" => Some(Self::LittleEndian),
            b"MM" => Some(Self::BigEndian),
            _ => None,
        }
    }

    pub fn marker(self) -> [u8; 2] {
        match self {
            Self::LittleEndian => *b"II",
            Self::BigEndian => *b"MM",
        }
    }

    pub fn u16_bytes(self, value: u16) -> [u8; 2] {
        match self {
            Self::LittleEndian => value.to_le_bytes(),
            Self::BigEndian => value.to_be_bytes(),
        }
    }

    pub fn u32_bytes(self, value: u32) -> [u8; 4] {
        match self {
            Self::LittleEndian => value.to_le_bytes(),
            Self::BigEndian => value.to_be_bytes(),
        }
    }

    pub fn u16(self, bytes: [u8; 2]) -> u16 {
        match self {
            Self::LittleEndian => u16::from_le_bytes(bytes),
            Self::BigEndian => u16::from_be_bytes(bytes),
        }
    }

    pub fn u32(self, bytes: [u8; 4]) -> u32 {
        match self {
            Self::LittleEndian => u32::from_le_bytes(bytes),
            Self::BigEndian => u32::from_be_bytes(bytes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markers() {
        assert_eq!(ByteOrder::from_marker(*b"II"), Some(ByteOrder::LittleEndian));
        assert_eq!(ByteOrder::from_marker(*b"MM"), Some(ByteOrder::BigEndian));
        assert_eq!(ByteOrder::from_marker(*b"XX"), None);
        assert_eq!(ByteOrder::BigEndian.marker(), *b"MM");
    }

    #[test]
    fn integers() {
        assert_eq!(ByteOrder::BigEndian.u32_bytes(0x0102_0304), [1, 2, 3, 4]);
        assert_eq!(ByteOrder::LittleEndian.u16_bytes(42), [42, 0]);
        assert_eq!(ByteOrder::BigEndian.u16([0, 42]), 42);
        assert_eq!(ByteOrder::LittleEndian.u32([8, 0, 0, 0]), 8);
    }
}
