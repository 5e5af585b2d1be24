//! Response parsing.
//!
//! Every function here is pure: it takes a response body and returns a
//! typed value or a [`ResponseError`]. Bodies decode into typed response
//! structs whose fields are [`Lenient`], so a single field of the wrong
//! shape is treated as absent instead of failing the whole response.

mod cart;
mod products;

pub use cart::{
    CartLinesPage, LineItemAccumulator, UNKNOWN_PRODUCT, UNKNOWN_VARIANT, parse_cart_create,
    parse_cart_lines, parse_checkout_create, parse_checkout_lines, parse_lines_mutation,
    reconcile_cart_lines,
};
pub use products::parse_products;

use graphql_client::{PathFragment, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{GraphQlError, GraphQlErrorLocation, ResponseError};

/// A field that decodes to `None` when absent, null, or of the wrong shape.
#[derive(Debug)]
pub(crate) struct Lenient<T>(Option<T>);

impl<T> Default for Lenient<T> {
    fn default() -> Self {
        Self(None)
    }
}

impl<T> Lenient<T> {
    pub(crate) fn into_inner(self) -> Option<T> {
        self.0
    }

    pub(crate) const fn get(&self) -> Option<&T> {
        self.0.as_ref()
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Lenient<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self(T::deserialize(value).ok()))
    }
}

impl Lenient<String> {
    /// The string if present and non-empty.
    pub(crate) fn non_empty(&self) -> Option<&str> {
        self.get().map(String::as_str).filter(|s| !s.is_empty())
    }
}

/// A scalar the API may send as a JSON string or number, kept as written.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Text {
    String(String),
    Number(serde_json::Number),
}

impl Lenient<Text> {
    /// The text if present and non-empty.
    pub(crate) fn non_empty(&self) -> Option<String> {
        match self.get()? {
            Text::String(s) if !s.is_empty() => Some(s.clone()),
            Text::String(_) => None,
            Text::Number(n) => Some(n.to_string()),
        }
    }
}

/// A mutation `userErrors` or `checkoutUserErrors` entry.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct UserError {
    field: Lenient<Vec<String>>,
    message: Lenient<String>,
}

pub(crate) type UserErrors = Lenient<Vec<Lenient<UserError>>>;

/// Unwrap a GraphQL response envelope into `T`.
///
/// Fails on invalid JSON, on a non-empty top-level `errors` list, and on a
/// missing `data` object.
pub(crate) fn graphql_data<T: DeserializeOwned>(body: &str) -> Result<T, ResponseError> {
    let response: Response<T> =
        serde_json::from_str(body).map_err(|e| ResponseError::Malformed(e.to_string()))?;

    if let Some(errors) = response.errors
        && !errors.is_empty()
    {
        return Err(ResponseError::GraphQl(
            errors
                .into_iter()
                .map(|e| GraphQlError {
                    message: e.message,
                    locations: e.locations.map_or_else(Vec::new, |locs| {
                        locs.into_iter()
                            .map(|l| GraphQlErrorLocation {
                                line: i64::from(l.line),
                                column: i64::from(l.column),
                            })
                            .collect()
                    }),
                    path: e.path.map_or_else(Vec::new, |p| {
                        p.into_iter()
                            .map(|fragment| match fragment {
                                PathFragment::Key(s) => s,
                                PathFragment::Index(i) => i.to_string(),
                            })
                            .collect()
                    }),
                })
                .collect(),
        ));
    }

    response.data.ok_or_else(|| ResponseError::missing("data"))
}

/// Fail if a mutation reported any user errors.
pub(crate) fn check_user_errors(errors: UserErrors) -> Result<(), ResponseError> {
    let errors = errors.into_inner().unwrap_or_default();
    if errors.is_empty() {
        return Ok(());
    }

    Err(ResponseError::GraphQl(
        errors
            .into_iter()
            .map(|e| {
                let e = e.into_inner().unwrap_or_default();
                GraphQlError {
                    message: e.message.into_inner().unwrap_or_default(),
                    locations: vec![],
                    path: e.field.into_inner().unwrap_or_default(),
                }
            })
            .collect(),
    ))
}
