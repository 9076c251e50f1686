//! Bracketed query-string decoding and the axum extractor for [`SearchParams`].
//!
//! ```text
//! ?search[age:gt]=18&search[id:in][]=1&search[id:in][]=2&pagination[page]=2&order[field]=name
//! ```
//!
//! decodes to
//!
//! ```json
//! {"search": {"age:gt": "18", "id:in": ["1", "2"]}, "pagination": {"page": "2"}, "order": {"field": "name"}}
//! ```

use axum::{extract::FromRequestParts, http::request::Parts};
use serde_json::{Map, Value};

use crate::errors::SearchError;
use crate::models::SearchParams;

/// Decode `a[b][c]=v` pairs into nested JSON. `a[]=v` appends to a sequence;
/// a repeated plain key keeps the last value.
#[must_use]
pub fn decode_query(query: &str) -> Value {
    let mut root = Map::new();
    for (name, value) in url::form_urlencoded::parse(query.as_bytes()) {
        let (head, path) = split_name(&name);
        if head.is_empty() {
            continue;
        }
        insert(&mut root, head, &path, value.into_owned());
    }
    Value::Object(root)
}

/// `search[age:gt][]` -> (`search`, [`age:gt`, ``]). Names with unbalanced
/// brackets are taken literally.
fn split_name(name: &str) -> (&str, Vec<&str>) {
    let Some(open) = name.find('[') else {
        return (name, Vec::new());
    };
    let head = &name[..open];
    let mut path = Vec::new();
    let mut rest = &name[open..];
    while let Some(stripped) = rest.strip_prefix('[') {
        let Some(close) = stripped.find(']') else {
            return (name, Vec::new());
        };
        path.push(&stripped[..close]);
        rest = &stripped[close + 1..];
    }
    if !rest.is_empty() {
        return (name, Vec::new());
    }
    (head, path)
}

fn insert(map: &mut Map<String, Value>, key: &str, path: &[&str], value: String) {
    match path.split_first() {
        None => {
            map.insert(key.to_string(), Value::String(value));
        }
        Some((&"", _)) => {
            let entry = map
                .entry(key.to_string())
                .or_insert_with(|| Value::Array(Vec::new()));
            if !entry.is_array() {
                *entry = Value::Array(Vec::new());
            }
            if let Value::Array(items) = entry {
                items.push(Value::String(value));
            }
        }
        Some((next, rest)) => {
            let entry = map
                .entry(key.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            if let Value::Object(nested) = entry {
                insert(nested, next, rest, value);
            }
        }
    }
}

impl SearchParams {
    /// Parse a raw (still percent-encoded) query string.
    ///
    /// # Errors
    ///
    /// `InvalidParameters` when a section has the wrong shape, e.g. a
    /// non-numeric page.
    pub fn from_query(query: &str) -> Result<Self, SearchError> {
        serde_json::from_value(decode_query(query))
            .map_err(|e| SearchError::invalid_parameters(format!("Invalid search parameters: {e}")))
    }
}

impl<S> FromRequestParts<S> for SearchParams
where
    S: Send + Sync,
{
    type Rejection = SearchError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Self::from_query(parts.uri.query().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_split_name() {
        assert_eq!(split_name("page"), ("page", vec![]));
        assert_eq!(split_name("search[age:gt]"), ("search", vec!["age:gt"]));
        assert_eq!(split_name("search[id:in][]"), ("search", vec!["id:in", ""]));
        assert_eq!(split_name("search[age"), ("search[age", vec![]));
        assert_eq!(split_name("search[age]x"), ("search[age]x", vec![]));
    }

    #[test]
    fn test_decode_nested_and_sequences() {
        let decoded = decode_query(
            "search%5Bage%3Agt%5D=18&search[id:in][]=1&search[id:in][]=2&pagination[page]=2&order[field]=name&tab=all",
        );
        assert_eq!(
            decoded,
            json!({
                "search": {"age:gt": "18", "id:in": ["1", "2"]},
                "pagination": {"page": "2"},
                "order": {"field": "name"},
                "tab": "all"
            })
        );
    }

    #[test]
    fn test_decode_plus_and_percent() {
        let decoded = decode_query("search[name:contains]=ann+lee%21");
        assert_eq!(decoded, json!({"search": {"name:contains": "ann lee!"}}));
    }

    #[test]
    fn test_from_query() {
        let params =
            SearchParams::from_query("pagination[page]=3&pagination[items_per_page]=0&search[age:gt]=18")
                .unwrap();
        let pagination = params.pagination.unwrap();
        assert_eq!(pagination.page, Some(3));
        assert_eq!(pagination.items_per_page, Some(0));
        assert_eq!(params.search.unwrap()["age:gt"], json!("18"));

        assert_eq!(SearchParams::from_query("").unwrap(), SearchParams::default());
    }

    #[test]
    fn test_from_query_rejects_bad_page() {
        assert!(matches!(
            SearchParams::from_query("pagination[page]=two"),
            Err(SearchError::InvalidParameters { .. })
        ));
        assert!(matches!(
            SearchParams::from_query("pagination=5"),
            Err(SearchError::InvalidParameters { .. })
        ));
    }
}
