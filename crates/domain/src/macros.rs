//! Macro for enums that travel as fixed lowercase names on the wire
//!
//! Message kinds and media types are both closed sets of names the remote API
//! spells exactly one way. The macro gives such an enum `as_str`, `Display` and
//! a case-insensitive `FromStr` from one mapping table.
//!
//! # Example
//!
//! ```rust
//! use wxwork_domain::impl_wire_name_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Channel {
//!     Mail,
//!     Chat,
//! }
//!
//! impl_wire_name_conversions!(Channel {
//!     Mail => "mail",
//!     Chat => "chat",
//! });
//!
//! assert_eq!(Channel::Chat.as_str(), "chat");
//! assert_eq!("MAIL".parse::<Channel>().unwrap(), Channel::Mail);
//! ```

/// Implements `as_str`, `Display` and `FromStr` for wire-name enums
///
/// * `$enum_name` - The enum type
/// * `$variant => $str` - Variant to wire name mapping; names must be lowercase
#[macro_export]
macro_rules! impl_wire_name_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl $enum_name {
            /// Name used for this value on the wire
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $str,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = $crate::errors::WxWorkError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err($crate::errors::WxWorkError::InvalidInput(format!(
                        "unknown {}: {}",
                        stringify!($enum_name),
                        s
                    ))),
                }
            }
        }
    };
}
