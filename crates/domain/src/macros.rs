//! Macro for implementing Display and FromStr for single-letter staging codes
//!
//! The staging store keeps document state as a short code (`N`, `Y`, ...).
//! This macro maps enum variants to those codes in both directions.
//!
//! # Example
//!
//! ```rust
//! use einvoice_domain::impl_status_code_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Flag {
//!     On,
//!     Off,
//! }
//!
//! impl_status_code_conversions!(Flag {
//!     On => "Y",
//!     Off => "N",
//! });
//!
//! assert_eq!(Flag::On.to_string(), "Y");
//! assert_eq!("n".parse::<Flag>(), Ok(Flag::Off));
//! ```

/// Implements Display, FromStr and `code()` for status-code enums
///
/// - `Display` writes the code exactly as declared
/// - `FromStr` accepts the code case-insensitively, ignoring surrounding
///   whitespace
#[macro_export]
macro_rules! impl_status_code_conversions {
    ($enum_name:ident { $($variant:ident => $code:expr),+ $(,)? }) => {
        impl $enum_name {
            /// Code persisted in the staging store.
            pub const fn code(self) -> &'static str {
                match self {
                    $(Self::$variant => $code,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.code())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                $(
                    if trimmed.eq_ignore_ascii_case($code) {
                        return Ok(Self::$variant);
                    }
                )+
                Err(format!("Invalid {}: {}", stringify!($enum_name), s))
            }
        }
    };
}
