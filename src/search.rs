//! # Search Decorator
//!
//! [`SearchQuery`] wraps a [`QueryHandle`] and applies, in order:
//!
//! 1. every `search` entry, through the operator translator
//! 2. the `order` clause
//! 3. a row count (only when pagination is enabled)
//! 4. the page window
//!
//! The decorated query is then fetched once with [`SearchQuery::fetch`]; the
//! resulting [`SearchPage`] iterates the rows and still carries the
//! [`SearchState`] needed to render sort and pagination links.
//!
//! ```rust,ignore
//! let registry = OperatorRegistry::new().with("near", |query: EntityQuery<'_, person::Entity>, field, value| {
//!     query.filter(Expr::cust_with_values(format!("distance({field}, ?) < 10"), [value.to_string()]))
//! });
//! let search = SearchQuery::with_options(
//!     EntityQuery::new(person::Entity::find(), &db),
//!     params,
//!     &registry,
//!     &SearchConfig::default(),
//! )
//! .await?;
//!
//! let page = search.fetch().await?;
//! let links = page.state().pagination_links(&QueryStringRoute::new("/people"));
//! for person in page { /* ... */ }
//! ```

use crate::config::SearchConfig;
use crate::errors::SearchError;
use crate::filtering::{OperatorRegistry, Predicate, Translator};
use crate::models::SearchParams;
use crate::pagination::{PaginationState, paginate, validate_items_per_page, validate_page};
use crate::query::QueryHandle;
use crate::sort::{OrderState, apply_order};

/// Everything a constructed search knows, independent of the query itself.
#[derive(Debug, Clone)]
pub struct SearchState {
    pub(crate) params: SearchParams,
    pub(crate) pagination: PaginationState,
    pub(crate) order: OrderState,
    pub(crate) filtered: bool,
    pub(crate) predicates: Vec<Predicate>,
    pub(crate) link_window: u64,
}

impl SearchState {
    /// The parameters the search was built from, unchanged.
    #[must_use]
    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    #[must_use]
    pub fn pagination(&self) -> &PaginationState {
        &self.pagination
    }

    #[must_use]
    pub fn order(&self) -> &OrderState {
        &self.order
    }

    /// Whether at least one search entry produced a predicate. Distinguishes
    /// "nothing matched" from "nothing was asked".
    #[must_use]
    pub fn is_filtered(&self) -> bool {
        self.filtered
    }

    /// Builtin predicates, in the order they were applied.
    #[must_use]
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    #[must_use]
    pub fn page(&self) -> u64 {
        self.pagination.page
    }

    #[must_use]
    pub fn items_per_page(&self) -> u64 {
        self.pagination.items_per_page
    }

    #[must_use]
    pub fn total_count(&self) -> Option<u64> {
        self.pagination.total_count
    }

    #[must_use]
    pub fn total_pages(&self) -> u64 {
        self.pagination.total_pages
    }
}

/// A query with search, order and pagination applied.
pub struct SearchQuery<Q> {
    query: Q,
    state: SearchState,
}

impl<Q: QueryHandle> SearchQuery<Q> {
    /// Build with no custom operators and the default [`SearchConfig`].
    ///
    /// # Errors
    ///
    /// See [`SearchQuery::with_options`].
    pub async fn new(query: Q, params: SearchParams) -> Result<Self, SearchError> {
        Self::with_options(query, params, &OperatorRegistry::new(), &SearchConfig::default()).await
    }

    /// Build the decorated query.
    ///
    /// # Errors
    ///
    /// Returns a `SearchError` for a malformed search key, an invalid field or
    /// operand, a negative page size, a page below 1, or when the count fails.
    pub async fn with_options(
        query: Q,
        params: SearchParams,
        registry: &OperatorRegistry<Q>,
        config: &SearchConfig,
    ) -> Result<Self, SearchError> {
        let pagination_params = params.pagination.as_ref();
        let page = pagination_params
            .and_then(|p| p.page)
            .map(validate_page)
            .transpose()?
            .unwrap_or(1);
        let items_per_page = pagination_params
            .and_then(|p| p.items_per_page)
            .map(validate_items_per_page)
            .transpose()?
            .unwrap_or(config.default_items_per_page);
        let order = OrderState::from_params(params.order.as_ref())?;

        let mut query = query;
        let mut translator = Translator::new(registry);
        if let Some(search) = &params.search {
            for (key, value) in search {
                query = translator.apply(query, key, value)?;
            }
        }
        let filtered = translator.filtered();
        let predicates = translator.into_predicates();

        let query = apply_order(query, &order);

        let (query, pagination) = if items_per_page > 0 {
            let total_count = query.count().await?;
            let computed = paginate(total_count, page, items_per_page);
            let query = match computed.window {
                Some(window) => query.limit(window.offset, window.limit),
                None => query,
            };
            let state = PaginationState {
                page,
                items_per_page,
                total_count: Some(total_count),
                total_pages: computed.total_pages,
            };
            (query, state)
        } else {
            let state = PaginationState {
                page,
                items_per_page: 0,
                total_count: None,
                total_pages: 1,
            };
            (query, state)
        };

        tracing::debug!(
            filtered,
            predicates = predicates.len(),
            page,
            items_per_page,
            total_count = ?pagination.total_count,
            total_pages = pagination.total_pages,
            "Built search query"
        );

        Ok(Self {
            query,
            state: SearchState {
                params,
                pagination,
                order,
                filtered,
                predicates,
                link_window: config.link_window,
            },
        })
    }

    #[must_use]
    pub fn state(&self) -> &SearchState {
        &self.state
    }

    /// The decorated collaborator, for operations outside [`QueryHandle`].
    #[must_use]
    pub fn query(&self) -> &Q {
        &self.query
    }

    #[must_use]
    pub fn into_query(self) -> Q {
        self.query
    }

    #[must_use]
    pub fn into_parts(self) -> (Q, SearchState) {
        (self.query, self.state)
    }

    /// Run the query. The returned page yields each row once.
    ///
    /// # Errors
    ///
    /// `SearchError::Database` when the collaborator fails.
    pub async fn fetch(self) -> Result<SearchPage<Q::Rows>, SearchError> {
        let rows = self.query.fetch().await?;
        Ok(SearchPage {
            rows,
            state: self.state,
        })
    }
}

/// Fetched rows plus the state needed for links and form echo.
pub struct SearchPage<I> {
    rows: I,
    state: SearchState,
}

impl<I> SearchPage<I> {
    #[must_use]
    pub fn state(&self) -> &SearchState {
        &self.state
    }

    #[must_use]
    pub fn into_state(self) -> SearchState {
        self.state
    }
}

impl<I: Iterator> Iterator for SearchPage<I> {
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        self.rows.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.rows.size_hint()
    }
}
