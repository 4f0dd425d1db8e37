//! Newtype IDs for type-safe record references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different record types.
//!
//! IDs are opaque strings: records imported from older data files carry
//! short ids like `"1"` or `"p1"`, while records created by this system get
//! a fresh UUID v4.

use core::fmt::{Debug, Display};
use core::hash::Hash;

/// Behaviour shared by every record identifier.
pub trait RecordId:
    Clone + Eq + Hash + Ord + Debug + Display + Default + Send + Sync + 'static
{
    /// Allocate a fresh, globally unique identifier.
    fn generate() -> Self;

    /// Get the underlying string.
    fn as_str(&self) -> &str;

    /// Whether the identifier is empty or whitespace.
    fn is_blank(&self) -> bool {
        self.as_str().trim().is_empty()
    }
}

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Default`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - `new()` for existing ids, [`RecordId::generate()`] for fresh UUID-based ids
/// - `From<&str>`, `From<String>` and `Display`
///
/// # Example
///
/// ```rust
/// # use clear_hearing_core::{RecordId, define_id};
/// define_id!(WidgetId);
/// define_id!(GadgetId);
///
/// let widget = WidgetId::new("w1");
/// let fresh = GadgetId::generate();
///
/// assert_eq!(widget.as_str(), "w1");
/// assert_ne!(fresh, GadgetId::generate());
/// // These are different types, so this won't compile:
/// // let _: WidgetId = fresh;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Default,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap an existing identifier.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl $crate::types::id::RecordId for $name {
            fn generate() -> Self {
                Self(::uuid::Uuid::new_v4().to_string())
            }

            fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(CategoryId);
define_id!(ProductId);
define_id!(ServiceId);
define_id!(AboutItemId);
define_id!(ArticleId);
define_id!(AdvantageId);
define_id!(PartnerId);
define_id!(OrderId);
