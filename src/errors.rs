//! # Error Handling for Search Requests
//!
//! Every failure the search decorator can produce is a [`SearchError`]:
//! - Caller mistakes (malformed keys, bad operands, invalid paging) map to 400
//! - Collaborator failures (database errors) map to 500 and are logged, never echoed
//!
//! Unknown operators and out-of-range pages are deliberately *not* errors.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use searchcrate::{EntityQuery, SearchError, SearchParams, SearchQuery};
//!
//! async fn list_people(
//!     params: SearchParams,
//!     State(db): State<DatabaseConnection>,
//! ) -> Result<Html<String>, SearchError> {
//!     let search = SearchQuery::new(EntityQuery::new(person::Entity::find(), &db), params).await?;
//!     let page = search.fetch().await?;
//!     // render rows and page.state().pagination_links(&route)
//! }
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::Serialize;
use std::fmt;

/// Search error type with sanitized responses and logging of internal details
#[derive(Debug)]
pub enum SearchError {
    /// A search key without the `field:operator` delimiter, or with an empty part
    MalformedSearchKey {
        /// The offending key as supplied
        key: String,
    },

    /// A field name that is not a plain identifier
    InvalidField {
        /// The offending field name
        field: String,
    },

    /// An operand whose shape does not fit the operator
    InvalidOperand {
        /// Field the operand was supplied for
        field: String,
        /// Operator name as supplied
        operator: String,
        /// Human readable description of what was expected
        expected: &'static str,
    },

    /// Negative items per page (zero disables pagination)
    InvalidItemsPerPage {
        /// The rejected value
        value: i64,
    },

    /// Page number below 1
    InvalidPage {
        /// The rejected value
        value: i64,
    },

    /// The parameter bundle could not be decoded
    InvalidParameters {
        /// User-facing description
        message: String,
    },

    /// 500 Internal Server Error - collaborator failure (details logged, not exposed)
    Database {
        /// User-facing generic message
        message: String,
        /// Internal error (logged, not sent to user)
        internal: DbErr,
    },
}

impl SearchError {
    /// Create a malformed key error
    pub fn malformed_key(key: impl Into<String>) -> Self {
        Self::MalformedSearchKey { key: key.into() }
    }

    /// Create an invalid field error
    pub fn invalid_field(field: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
        }
    }

    /// Create an invalid operand error
    pub fn invalid_operand(
        field: impl Into<String>,
        operator: impl Into<String>,
        expected: &'static str,
    ) -> Self {
        Self::InvalidOperand {
            field: field.into(),
            operator: operator.into(),
            expected,
        }
    }

    /// Create an invalid parameters error
    pub fn invalid_parameters(message: impl Into<String>) -> Self {
        Self::InvalidParameters {
            message: message.into(),
        }
    }

    /// Wrap a collaborator error
    ///
    /// # Example
    /// ```rust,ignore
    /// let total = query.count().await.map_err(SearchError::database)?;
    /// ```
    #[must_use]
    pub fn database(err: DbErr) -> Self {
        Self::Database {
            message: "A database error occurred".to_string(),
            internal: err,
        }
    }

    /// HTTP status code for this error
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MalformedSearchKey { .. }
            | Self::InvalidField { .. }
            | Self::InvalidOperand { .. }
            | Self::InvalidItemsPerPage { .. }
            | Self::InvalidPage { .. }
            | Self::InvalidParameters { .. } => StatusCode::BAD_REQUEST,
            Self::Database { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// User-facing error message (sanitized)
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::MalformedSearchKey { key } => {
                format!("Malformed search key '{key}': expected 'field:operator'")
            }
            Self::InvalidField { field } => format!("Invalid field name '{field}'"),
            Self::InvalidOperand {
                field,
                operator,
                expected,
            } => format!("Invalid operand type for '{field}:{operator}': {expected}"),
            Self::InvalidItemsPerPage { value } => {
                format!("Items per page must not be negative (got {value})")
            }
            Self::InvalidPage { value } => format!("Page must be at least 1 (got {value})"),
            Self::InvalidParameters { message } | Self::Database { message, .. } => {
                message.clone()
            }
        }
    }

    /// Log internal error details (not sent to user)
    fn log_internal(&self) {
        match self {
            Self::Database { internal, .. } => {
                tracing::error!(error = ?internal, "Database error during search");
            }
            _ => {
                tracing::debug!(
                    error = %self.user_message(),
                    status = %self.status_code(),
                    "Rejected search request"
                );
            }
        }
    }
}

/// Error response sent to users (sanitized)
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for SearchError {
    fn into_response(self) -> Response {
        self.log_internal();
        let status = self.status_code();
        let body = ErrorResponse {
            error: self.user_message(),
        };
        (status, Json(body)).into_response()
    }
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

impl std::error::Error for SearchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Database { internal, .. } => Some(internal),
            _ => None,
        }
    }
}

impl From<DbErr> for SearchError {
    fn from(err: DbErr) -> Self {
        Self::database(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_key_is_bad_request() {
        let err = SearchError::malformed_key("age");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            err.user_message(),
            "Malformed search key 'age': expected 'field:operator'"
        );
    }

    #[test]
    fn test_invalid_operand_message() {
        let err = SearchError::invalid_operand("id", "in", "a sequence of values");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(err.user_message().contains("id:in"));
        assert!(err.user_message().contains("a sequence of values"));
    }

    #[test]
    fn test_paging_errors() {
        let err = SearchError::InvalidItemsPerPage { value: -5 };
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(err.user_message().contains("-5"));

        let err = SearchError::InvalidPage { value: 0 };
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_database_error_is_sanitized() {
        let err = SearchError::from(DbErr::Custom("connection refused on 10.0.0.3".into()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.user_message(), "A database error occurred");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_into_response_status() {
        let response = SearchError::invalid_field("name;drop").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = SearchError::from(DbErr::Custom("boom".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
