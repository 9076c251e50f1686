pub mod config;
pub mod errors;
pub mod extract;
pub mod filtering;
pub mod form;
pub mod links;
pub mod models;
pub mod pagination;
pub mod query;
pub mod search;
pub mod sort;

pub use config::SearchConfig;
pub use errors::SearchError;
pub use filtering::{OperatorKind, OperatorRegistry, Predicate};
pub use form::SearchForm;
pub use links::{QueryStringRoute, Route, encode_query, merge_deep};
pub use models::{OrderParams, PaginationParams, SearchParams};
pub use pagination::{Pagination, PaginationState, paginate};
pub use query::{EntityQuery, QueryHandle};
pub use search::{SearchPage, SearchQuery, SearchState};
pub use sort::{Direction, OrderState};

pub use async_trait::async_trait;
pub use serde_with;
