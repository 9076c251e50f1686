use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use serde_with::{DisplayFromStr, PickFirst, serde_as};
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// Search, ordering and pagination parameters for one request.
///
/// # Search
/// The `search` section maps `"field:operator"` keys to values:
/// ```json
/// {"age:gt": 18, "name:contains": "ann", "id:in": [1, 2, 3]}
/// ```
/// Empty values (`""`, `null`, `[]`) are ignored.
///
/// # Pagination
/// `page` is 1-based; `items_per_page` of `0` disables pagination:
/// ```json
/// {"page": 2, "items_per_page": 20}
/// ```
///
/// # Ordering
/// A single field and a direction, `ASC` (default) or `DESC`:
/// ```json
/// {"field": "name", "direction": "DESC"}
/// ```
///
/// In a query string the same structure is written with brackets, e.g.
/// `?search[age:gt]=18&pagination[page]=2&order[field]=name`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SearchParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationParams>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>, example = json!({"age:gt": 18, "name:contains": "ann"}))]
    pub search: Option<BTreeMap<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<OrderParams>,
}

/// Page selection. Numbers may also arrive as numeric strings.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaginationParams {
    /// 1-based page number.
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<i64>, example = 1)]
    pub page: Option<i64>,
    /// Rows per page; `0` disables pagination.
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<i64>, example = 20)]
    pub items_per_page: Option<i64>,
}

/// Ordering selection. Unknown directions fall back to `ASC`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct OrderParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "name")]
    pub field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "ASC")]
    pub direction: Option<String>,
}

impl SearchParams {
    /// Parameters as a JSON object, the base that link overrides merge into.
    #[must_use]
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| Value::Object(Map::new()))
    }

    /// True when a search section with at least one entry was supplied.
    #[must_use]
    pub fn has_search(&self) -> bool {
        self.search.as_ref().is_some_and(|search| !search.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_full_bundle() {
        let params: SearchParams = serde_json::from_value(json!({
            "pagination": {"page": 2, "items_per_page": 10},
            "search": {"age:gt": 18, "name:contains": "ann"},
            "order": {"field": "name", "direction": "DESC"}
        }))
        .unwrap();

        let pagination = params.pagination.unwrap();
        assert_eq!(pagination.page, Some(2));
        assert_eq!(pagination.items_per_page, Some(10));
        assert_eq!(params.search.unwrap().get("age:gt"), Some(&json!(18)));
        assert_eq!(params.order.unwrap().direction.as_deref(), Some("DESC"));
    }

    #[test]
    fn test_numeric_strings_are_accepted() {
        let params: PaginationParams =
            serde_json::from_value(json!({"page": "3", "items_per_page": "0"})).unwrap();
        assert_eq!(params.page, Some(3));
        assert_eq!(params.items_per_page, Some(0));

        assert!(serde_json::from_value::<PaginationParams>(json!({"page": "three"})).is_err());
    }

    #[test]
    fn test_empty_bundle() {
        let params: SearchParams = serde_json::from_value(json!({})).unwrap();
        assert_eq!(params, SearchParams::default());
        assert!(!params.has_search());
        assert_eq!(params.to_value(), json!({}));
    }

    #[test]
    fn test_to_value_skips_absent_sections() {
        let params = SearchParams {
            pagination: Some(PaginationParams {
                page: Some(4),
                items_per_page: None,
            }),
            ..Default::default()
        };
        assert_eq!(params.to_value(), json!({"pagination": {"page": 4}}));
    }
}
