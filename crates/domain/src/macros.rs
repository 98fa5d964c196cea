//! Macro for implementing Display and FromStr for domain enums
//!
//! Generates a single implementation of both traits from one variant table,
//! so the rendered name and the accepted input can never drift apart.
//! Parsing is case-insensitive.
//!
//! # Example
//!
//! ```rust
//! use peoplebridge_domain::impl_domain_enum_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Region {
//!     North,
//!     South,
//! }
//!
//! impl_domain_enum_conversions!(Region, String => String::from {
//!     North => "NORTH",
//!     South => "SOUTH",
//! });
//!
//! assert_eq!(Region::North.to_string(), "NORTH");
//! assert_eq!("south".parse::<Region>(), Ok(Region::South));
//! ```

/// Implements Display and FromStr traits for domain enums
///
/// # Arguments
///
/// * `$enum_name` - The name of the enum type
/// * `$err_ty` - The `FromStr::Err` type
/// * `$err` - Constructor taking the rejected input as a `String`, producing
///   the `FromStr::Err` value
/// * `$variant => $str` - Mapping of enum variants to their canonical names
#[macro_export]
macro_rules! impl_domain_enum_conversions {
    ($enum_name:ident, $err_ty:ty => $err:path { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = $err_ty;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                $(
                    if trimmed.eq_ignore_ascii_case($str) {
                        return Ok(Self::$variant);
                    }
                )+
                Err($err(s.to_string()))
            }
        }
    };
}
