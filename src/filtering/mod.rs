//! # Search Filtering
//!
//! Translates the `search` section of [`SearchParams`](crate::SearchParams)
//! into predicates on a query. Every key has the form `field:operator`:
//!
//! ```rust,ignore
//! // Equality and its negation
//! GET /people?search[status:eq]=active
//! GET /people?search[status:does_not_equal]=archived
//!
//! // Null checks (the value only has to be non-empty)
//! GET /people?search[deleted_at:is_null]=1
//!
//! // LIKE patterns
//! GET /people?search[name:contains]=ann
//! GET /people?search[email:ends_with]=@example.org
//!
//! // Numeric comparisons
//! GET /people?search[age:gteq]=18&search[age:lt]=65
//!
//! // Set membership
//! GET /people?search[id:in][]=1&search[id:in][]=2
//! ```
//!
//! Entries with an empty value (`null`, `""`, `[]`) are skipped. Operator
//! names that are neither builtin nor registered in an [`OperatorRegistry`]
//! are ignored; a malformed key or an unsafe field name is an error.
//!
//! ## Main Components
//!
//! - **[`OperatorKind`]**: builtin operators and their aliases
//! - **[`Predicate`]**: one bound `field <op> value` fragment
//! - **[`Translator`]**: applies entries and tracks the filtered flag
//! - **[`OperatorRegistry`]**: caller-supplied operators

pub mod operators;
pub mod predicate;
pub mod translator;

pub use operators::{Arity, OperatorKind, Wildcard};
pub(crate) use predicate::column_ref;
pub use predicate::{Operand, Predicate, ScalarValue, is_valid_field_name};
pub use translator::{
    OperatorFn, OperatorRegistry, Translator, build_operand, is_empty_value, split_search_key,
};
