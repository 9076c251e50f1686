use serde::Deserialize;

const DEFAULT_ITEMS_PER_PAGE: u64 = 20;
const DEFAULT_LINK_WINDOW: u64 = 10;

/// Application-wide search settings.
///
/// Every field has a default, so a partial config section deserializes:
///
/// ```json
/// {"default_items_per_page": 50}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Page size when the request does not name one. `0` disables pagination.
    pub default_items_per_page: u64,
    /// Pages shown on each side of the current page in pagination links.
    pub link_window: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_items_per_page: DEFAULT_ITEMS_PER_PAGE,
            link_window: DEFAULT_LINK_WINDOW,
        }
    }
}
