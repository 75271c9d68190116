//! Macro for implementing Display and FromStr for closed string enums
//!
//! Remote API fields that only admit a fixed set of lowercase values (such as
//! the ruleset kind) are modelled as enums; this macro gives them a matching
//! string form in both directions.
//!
//! # Example
//!
//! ```rust
//! use rulegate_domain::impl_domain_enum_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Scope {
//!     Zone,
//!     Account,
//! }
//!
//! impl_domain_enum_conversions!(Scope {
//!     Zone => "zone",
//!     Account => "account",
//! });
//!
//! assert_eq!(Scope::Account.to_string(), "account");
//! ```

/// Implements Display and FromStr traits for closed string enums
///
/// This macro generates:
/// - Display trait: converts enum variants to lowercase strings
/// - FromStr trait: parses case-insensitive strings to enum variants
///
/// # Arguments
///
/// * `$enum_name` - The name of the enum type
/// * `$variant => $str` - Mapping of enum variants to their string
///   representations
///
/// # Features
///
/// - Case-insensitive parsing (e.g., "ZONE", "zone", "Zone" all work)
/// - Consistent lowercase string output
/// - Descriptive error messages with enum name
#[macro_export]
macro_rules! impl_domain_enum_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => write!(f, $str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
