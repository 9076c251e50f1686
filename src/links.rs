//! Sort and pagination links.
//!
//! Links are built from the search's own parameters, deep-merged with
//! per-link overrides, and rendered by a [`Route`].

use serde_json::{Map, Value, json};
use std::fmt::Write as _;

use crate::search::SearchState;
use crate::sort::Direction;

/// Renders a parameter map into a path or URL.
pub trait Route {
    fn path(&self, params: &Value) -> String;
}

impl<F> Route for F
where
    F: Fn(&Value) -> String,
{
    fn path(&self, params: &Value) -> String {
        self(params)
    }
}

/// Route that appends the parameters to a fixed base path as a bracketed
/// query string, e.g. `/people?order%5Bfield%5D=name&pagination%5Bpage%5D=2`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryStringRoute {
    base: String,
}

impl QueryStringRoute {
    #[must_use]
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }
}

impl Route for QueryStringRoute {
    fn path(&self, params: &Value) -> String {
        let query = encode_query(params);
        if query.is_empty() {
            return self.base.clone();
        }
        let separator = if self.base.contains('?') { '&' } else { '?' };
        format!("{}{separator}{query}", self.base)
    }
}

/// Encode nested parameters as `a[b][c]=v` pairs; sequences become `a[]=v`.
#[must_use]
pub fn encode_query(params: &Value) -> String {
    let mut pairs = Vec::new();
    flatten("", params, &mut pairs);
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}

fn flatten(prefix: &str, value: &Value, pairs: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (key, nested) in map {
                let name = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}[{key}]")
                };
                flatten(&name, nested, pairs);
            }
        }
        Value::Array(items) => {
            let name = format!("{prefix}[]");
            for item in items {
                flatten(&name, item, pairs);
            }
        }
        Value::Null => {}
        Value::String(s) => pairs.push((prefix.to_string(), s.clone())),
        Value::Number(n) => pairs.push((prefix.to_string(), n.to_string())),
        Value::Bool(b) => pairs.push((prefix.to_string(), b.to_string())),
    }
}

/// Recursively merge `overrides` into `base`. Objects combine key-wise;
/// anything else in `overrides` replaces what `base` had.
#[must_use]
pub fn merge_deep(base: Value, overrides: Value) -> Value {
    match (base, overrides) {
        (Value::Object(mut base), Value::Object(overrides)) => {
            for (key, value) in overrides {
                let merged = match base.remove(&key) {
                    Some(existing) => merge_deep(existing, value),
                    None => value,
                };
                base.insert(key, merged);
            }
            Value::Object(base)
        }
        (_, overrides) => overrides,
    }
}

impl SearchState {
    /// Current parameters deep-merged with `overrides`.
    #[must_use]
    pub fn link_params(&self, overrides: Value) -> Value {
        let overrides = match overrides {
            Value::Null => Value::Object(Map::new()),
            other => other,
        };
        merge_deep(self.params.to_value(), overrides)
    }

    #[must_use]
    pub fn link<R: Route + ?Sized>(&self, route: &R, overrides: Value) -> String {
        route.path(&self.link_params(overrides))
    }

    /// Direction an [`SearchState::order_link`] for `field` would request.
    #[must_use]
    pub fn next_direction(&self, field: &str) -> Direction {
        self.order.next_direction(field)
    }

    /// Sort link for `field`: flips direction on the active field, otherwise ascending.
    #[must_use]
    pub fn order_link<R: Route + ?Sized>(&self, route: &R, field: &str) -> String {
        self.order_link_with(route, field, self.next_direction(field))
    }

    #[must_use]
    pub fn order_link_with<R: Route + ?Sized>(
        &self,
        route: &R,
        field: &str,
        direction: Direction,
    ) -> String {
        self.link(
            route,
            json!({"order": {"field": field, "direction": direction.as_str()}}),
        )
    }

    /// Link to `page`, clamped to the last page. There is no lower clamp.
    #[must_use]
    pub fn page_link<R: Route + ?Sized>(&self, route: &R, page: u64) -> String {
        let page = self.pagination.clamp_page(page);
        self.link(route, json!({"pagination": {"page": page}}))
    }

    /// HTML strip of page links around the current page, empty when there is
    /// at most one page.
    #[must_use]
    pub fn pagination_links<R: Route + ?Sized>(&self, route: &R) -> String {
        let total_pages = self.pagination.total_pages;
        if total_pages <= 1 {
            return String::new();
        }

        let current = self.pagination.page;
        let (first, last) = self.pagination.link_window(self.link_window);
        tracing::debug!(current, first, last, total_pages, "Rendering pagination links");

        let mut html = String::new();
        if first > 1 {
            let _ = write!(
                html,
                r#"<span class="page_link"><a href="{}">1</a> ...</span>"#,
                self.escaped_page_link(route, 1)
            );
        }
        for page in first..=last {
            if page == current {
                let _ = write!(html, r#"<span class="page_link">{page}</span>"#);
            } else {
                let _ = write!(
                    html,
                    r#"<span class="page_link"><a href="{}">{page}</a></span>"#,
                    self.escaped_page_link(route, page)
                );
            }
        }
        if last < total_pages {
            let _ = write!(
                html,
                r#"<span class="page_link">... <a href="{}">{total_pages}</a></span>"#,
                self.escaped_page_link(route, total_pages)
            );
        }
        html
    }

    fn escaped_page_link<R: Route + ?Sized>(&self, route: &R, page: u64) -> String {
        html_escape::encode_double_quoted_attribute(&self.page_link(route, page)).into_owned()
    }
}
