//! Newtype IDs for type-safe entity references.
//!
//! Shopify identifies storefront objects with opaque string IDs, usually in
//! the namespaced global ID form (`gid://shopify/Cart/...`). The admin REST
//! API returns bare numeric IDs instead. Use the `define_gid!` macro to create
//! wrappers that prevent accidentally mixing IDs from different entity types.

/// Namespace prefix for product variant global IDs.
pub const VARIANT_GID_PREFIX: &str = "gid://shopify/ProductVariant/";

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`, `is_empty()`
/// - `From<String>`, `From<&str>` and `AsRef<str>` implementations
///
/// # Example
///
/// ```rust
/// # use shopcart_core::define_gid;
/// define_gid!(OrderGid);
/// define_gid!(CustomerGid);
///
/// let order = OrderGid::new("gid://shopify/Order/1");
/// let customer = CustomerGid::new("gid://shopify/Customer/1");
///
/// // These are different types, so this won't compile:
/// // let _: OrderGid = customer;
/// ```
#[macro_export]
macro_rules! define_gid {
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

            /// Consume the ID and return the underlying string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }

            /// Whether the ID is the empty string.
            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_gid!(CartId);
define_gid!(LineItemId);
define_gid!(ProductId);
define_gid!(VariantId);
define_gid!(CheckoutId);

impl VariantId {
    /// Whether the ID already carries the `ProductVariant` namespace.
    #[must_use]
    pub fn is_global(&self) -> bool {
        self.0.starts_with(VARIANT_GID_PREFIX)
    }

    /// Return the ID in namespaced global form.
    ///
    /// Admin REST IDs such as `"123"` become
    /// `"gid://shopify/ProductVariant/123"`. IDs that already carry the
    /// prefix are returned unchanged. Cart mutations only accept the
    /// namespaced form.
    #[must_use]
    pub fn normalized(&self) -> Self {
        if self.is_global() {
            self.clone()
        } else {
            Self(format!("{VARIANT_GID_PREFIX}{}", self.0))
        }
    }
}
