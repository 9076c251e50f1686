use serde_json::Value;
use std::collections::BTreeMap;

use crate::search::SearchState;

/// Read-only view of the raw search values, for re-populating a search form.
#[derive(Debug, Clone, Copy)]
pub struct SearchForm<'a> {
    search: Option<&'a BTreeMap<String, Value>>,
}

impl<'a> SearchForm<'a> {
    /// Raw value for a `field:operator` key.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<&'a Value> {
        self.search.and_then(|search| search.get(key))
    }

    /// Value as form text; `""` when absent, null, or a sequence/object.
    #[must_use]
    pub fn value(&self, key: &str) -> String {
        self.raw(key).map(display_value).unwrap_or_default()
    }

    /// Every entry of a sequence value (multi-selects); a scalar yields one entry.
    #[must_use]
    pub fn values(&self, key: &str) -> Vec<String> {
        match self.raw(key) {
            Some(Value::Array(items)) => items.iter().map(display_value).collect(),
            Some(Value::Null) | None => Vec::new(),
            Some(other) => vec![display_value(other)],
        }
    }

    /// True when no search section was supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.search.is_none_or(BTreeMap::is_empty)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a Value)> + use<'a> {
        self.search
            .into_iter()
            .flat_map(|search| search.iter().map(|(key, value)| (key.as_str(), value)))
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}

impl SearchState {
    /// Raw search values for echoing back into a form.
    #[must_use]
    pub fn form(&self) -> SearchForm<'_> {
        SearchForm {
            search: self.params.search.as_ref(),
        }
    }
}
