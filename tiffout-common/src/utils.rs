/// Adds conversions from and to the on-disk integer representation of enums
///
/// Takes an enum that must have a `#[repr()]` as first meta field and assigns a
/// value to all enum variants. Values without a variant are kept in an
/// `Unknown` variant such that they survive a rewrite unchanged.
///
/// ```
/// # use tiffout_common::utils::convertible_enum;
/// convertible_enum!(
///     #[repr(u16)]
///     #[derive(Debug, PartialEq)]
///     pub enum Compression {
///         Uncompressed = 1,
///         Jpeg = 6,
///     }
/// );
/// let int: u16 = Compression::Jpeg.into();
/// assert_eq!(int, 6);
/// assert_eq!(Compression::from(1), Compression::Uncompressed);
/// assert_eq!(Compression::from(7), Compression::Unknown(7));
/// assert_eq!(u16::from(Compression::Unknown(7)), 7);
/// ```
#[macro_export]
macro_rules! convertible_enum {
    (#[repr($type:ty)]$(#[$meta:meta])* $visibility:vis enum $enum_name:ident {
        $($(#[$variant_meta:meta])* $variant_name:ident = $variant_value:expr,)*
    }) => {
        $(#[$meta])*
        $visibility enum $enum_name {
            $($(#[$variant_meta])* $variant_name,)*
            Unknown($type)
        }

        impl std::convert::From<$type> for $enum_name {
            fn from(v: $type) -> Self {
                match v {
                    $($variant_value => Self::$variant_name,)*
                    other => Self::Unknown(other),
                }
            }
        }

        impl std::convert::From<$enum_name> for $type {
            fn from(v: $enum_name) -> $type {
                match v {
                    $($enum_name::$variant_name => $variant_value,)*
                    $enum_name::Unknown(other) => other,
                }
            }
        }
    }
}

pub use convertible_enum;
