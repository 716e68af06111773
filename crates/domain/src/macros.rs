//! Macro for implementing Display and FromStr for status enums
//!
//! Every status-like enum in the domain (moderation status, roles, report
//! status, notification kind) is persisted as lowercase text, so one macro
//! provides both directions. Parsing is case-insensitive.
//!
//! # Example
//!
//! ```rust
//! use fanevent_domain::impl_domain_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum TicketState {
//!     Open,
//!     Closed,
//! }
//!
//! impl_domain_status_conversions!(TicketState {
//!     Open => "open",
//!     Closed => "closed",
//! });
//!
//! assert_eq!(TicketState::Open.to_string(), "open");
//! assert_eq!("CLOSED".parse::<TicketState>().unwrap(), TicketState::Closed);
//! ```

/// Implements Display and FromStr traits for status enums
///
/// * `$enum_name` - The name of the enum type
/// * `$variant => $str` - Mapping of enum variants to their stored string
#[macro_export]
macro_rules! impl_domain_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl $enum_name {
            /// Stored string representation.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $str,)+
                }
            }
        }

        impl ::std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
