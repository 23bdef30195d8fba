tiffout_common::utils::convertible_enum!(
    #[repr(u16)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum FieldType {
        Byte = 1,
        Ascii = 2,
        Short = 3,
        Long = 4,
        Rational = 5,
        SByte = 6,
        Undefined = 7,
        SShort = 8,
        SLong = 9,
        SRational = 10,
        Float = 11,
        Double = 12,
        Utf8 = 129,
    }
);

impl FieldType {
    /// Size of a single value in bytes
    ///
    /// Unknown types are treated as opaque bytes.
    pub fn size(self) -> u32 {
        match self {
            Self::Byte
            | Self::Ascii
            | Self::SByte
            | Self::Undefined
            | Self::Utf8
            | Self::Unknown(_) => 1,
            Self::Short | Self::SShort => 2,
            Self::Long | Self::SLong | Self::Float => 4,
            Self::Rational | Self::SRational | Self::Double => 8,
        }
    }

    pub fn u16(self) -> u16 {
        self.into()
    }
}
