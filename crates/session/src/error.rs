//! Error types for session operations.
//!
//! Every remote operation fails with a [`SessionError`]. Errors never escape
//! the operation that produced them: the operation logs the failure with its
//! context and hands the error to its caller as the operation's result.

use std::time::Duration;

use thiserror::Error;

/// The HTTP request never produced a response.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct TransportError(pub String);

/// A response body that could not be interpreted.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ResponseError {
    /// Invalid JSON, or a required field missing or of the wrong type.
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// GraphQL `errors` or mutation `userErrors` were returned.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQl(Vec<GraphQlError>),
}

impl ResponseError {
    /// A required field was absent at `path`.
    #[must_use]
    pub fn missing(path: &str) -> Self {
        Self::Malformed(format!("missing '{path}'"))
    }
}

/// An operation was called with arguments or state that rule it out.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PreconditionViolation {
    #[error("cart ID is empty")]
    EmptyCartId,
    #[error("variant ID is empty")]
    EmptyVariantId,
    #[error("line item ID is empty")]
    EmptyLineItemId,
    #[error("cart has no line items")]
    EmptyCart,
    #[error("{0} is not configured")]
    MissingConfig(&'static str),
}

/// Errors that can occur during a cart or catalog operation.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SessionError {
    /// The request never completed.
    #[error("Transport failure: {0}")]
    Transport(#[from] TransportError),

    /// The API answered with a status other than 200.
    #[error("Unexpected status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// JSON parse failure or a missing required field.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// The API reported errors for the request.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQl(Vec<GraphQlError>),

    /// The operation refused to run.
    #[error("Precondition violated: {0}")]
    Precondition(#[from] PreconditionViolation),

    /// No response arrived before the deadline.
    #[error("Timed out after {0:?}")]
    Timeout(Duration),
}

impl From<ResponseError> for SessionError {
    fn from(err: ResponseError) -> Self {
        match err {
            ResponseError::Malformed(reason) => Self::MalformedResponse(reason),
            ResponseError::GraphQl(errors) => Self::GraphQl(errors),
        }
    }
}

/// A GraphQL error returned by the Shopify API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphQlError {
    /// Error message.
    pub message: String,
    /// Source locations in the query.
    pub locations: Vec<GraphQlErrorLocation>,
    /// Path to the error in the response (or the input field for user errors).
    pub path: Vec<String>,
}

impl GraphQlError {
    /// An error with only a message.
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            locations: vec![],
            path: vec![],
        }
    }
}

/// Location in a GraphQL query where an error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphQlErrorLocation {
    /// Line number (1-indexed).
    pub line: i64,
    /// Column number (1-indexed).
    pub column: i64,
}

fn format_graphql_errors(errors: &[GraphQlError]) -> String {
    if errors.is_empty() {
        return "(no error details provided)".to_string();
    }

    errors
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let mut parts = Vec::new();

            if !e.message.is_empty() {
                parts.push(e.message.clone());
            }

            if !e.path.is_empty() {
                parts.push(format!("path: {}", e.path.join(".")));
            }

            if let Some(loc) = e.locations.first() {
                parts.push(format!("at line {}:{}", loc.line, loc.column));
            }

            if parts.is_empty() {
                format!("[error {}]: (no details)", i + 1)
            } else {
                parts.join(" ")
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graphql_error_formatting() {
        let err = SessionError::GraphQl(vec![
            GraphQlError::message("Field not found"),
            GraphQlError::message("Invalid ID"),
        ]);
        assert_eq!(
            err.to_string(),
            "GraphQL errors: Field not found; Invalid ID"
        );
    }

    #[test]
    fn test_graphql_error_with_path_and_location() {
        let errors = vec![GraphQlError {
            message: "Variable $cartId is invalid".to_string(),
            locations: vec![GraphQlErrorLocation { line: 1, column: 18 }],
            path: vec!["cartLinesAdd".to_string(), "cartId".to_string()],
        }];
        assert_eq!(
            format_graphql_errors(&errors),
            "Variable $cartId is invalid path: cartLinesAdd.cartId at line 1:18"
        );
    }

    #[test]
    fn test_graphql_error_without_details() {
        let errors = vec![GraphQlError::message("")];
        assert_eq!(format_graphql_errors(&errors), "[error 1]: (no details)");
        assert_eq!(format_graphql_errors(&[]), "(no error details provided)");
    }

    #[test]
    fn test_response_error_converts() {
        let err: SessionError = ResponseError::missing("data.cart").into();
        assert_eq!(
            err,
            SessionError::MalformedResponse("missing 'data.cart'".to_string())
        );
    }

    #[test]
    fn test_precondition_display() {
        let err = SessionError::from(PreconditionViolation::EmptyCartId);
        assert_eq!(err.to_string(), "Precondition violated: cart ID is empty");
    }
}
