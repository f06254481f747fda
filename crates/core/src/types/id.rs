//! Newtype IDs for type-safe entity references.
//!
//! Catalog identifiers are opaque strings (e.g. `cust-001`, `prod-004`).
//! The `define_id!` macro wraps them so a product id can never be passed
//! where a customer id is expected.

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`
/// - `From<&str>`, `From<String>` and `Borrow<str>` implementations
///
/// # Example
///
/// ```rust
/// # use style_mingle_core::define_id;
/// define_id!(StoreId);
/// define_id!(ShelfId);
///
/// let store = StoreId::new("store-1");
/// let shelf = ShelfId::new("store-1");
/// assert_eq!(store.as_str(), shelf.as_str());
///
/// // These are different types, so this won't compile:
/// // let _: StoreId = shelf;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
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
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
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

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl ::std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(CustomerId);
define_id!(ProductId);
define_id!(PurchaseId);
define_id!(PurchaseItemId);
define_id!(AssociateId);

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_display_is_raw_string() {
        let id = ProductId::new("prod-001");
        assert_eq!(id.to_string(), "prod-001");
    }

    #[test]
    fn test_borrow_allows_str_lookup() {
        let mut ids = HashSet::new();
        ids.insert(CustomerId::from("cust-001"));
        assert!(ids.contains("cust-001"));
        assert!(!ids.contains("cust-002"));
    }

    #[test]
    fn test_serde_is_transparent() {
        let id = AssociateId::new("sa-001");
        let json = serde_json::to_string(&id).unwrap_or_default();
        assert_eq!(json, "\"sa-001\"");
    }
}
