use sea_orm::sea_query::Order;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::SearchError;
use crate::filtering::is_valid_field_name;
use crate::models::OrderParams;
use crate::query::QueryHandle;

const ASCENDING_TOKEN: &str = "ASC";
const DESCENDING_TOKEN: &str = "DESC";

/// Sort direction. Serialized as `ASC` / `DESC`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    #[serde(rename = "ASC")]
    Ascending,
    #[serde(rename = "DESC")]
    Descending,
}

impl Direction {
    /// Exactly `ASC` or `DESC`; anything else (including `asc`) is ascending.
    #[must_use]
    pub fn parse(token: Option<&str>) -> Self {
        match token {
            Some(DESCENDING_TOKEN) => Self::Descending,
            _ => Self::Ascending,
        }
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => ASCENDING_TOKEN,
            Self::Descending => DESCENDING_TOKEN,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Direction> for Order {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Ascending => Order::Asc,
            Direction::Descending => Order::Desc,
        }
    }
}

/// The active ordering of a search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderState {
    pub field: Option<String>,
    pub direction: Direction,
}

impl OrderState {
    /// Build from the `order` section of the parameters.
    ///
    /// # Errors
    ///
    /// `InvalidField` when the order field is not a plain identifier.
    pub fn from_params(params: Option<&OrderParams>) -> Result<Self, SearchError> {
        let Some(params) = params else {
            return Ok(Self::default());
        };
        let field = match params.field.as_deref() {
            None | Some("") => None,
            Some(field) if is_valid_field_name(field) => Some(field.to_string()),
            Some(field) => return Err(SearchError::invalid_field(field)),
        };
        Ok(Self {
            field,
            direction: Direction::parse(params.direction.as_deref()),
        })
    }

    #[must_use]
    pub fn is_active(&self, field: &str) -> bool {
        self.field.as_deref() == Some(field)
    }

    /// Direction a sort link for `field` should request: flip the active
    /// field, start every other field ascending.
    #[must_use]
    pub fn next_direction(&self, field: &str) -> Direction {
        if self.is_active(field) {
            self.direction.toggled()
        } else {
            Direction::Ascending
        }
    }
}

/// Apply the ordering, leaving the query untouched when no field is set.
pub fn apply_order<Q: QueryHandle>(query: Q, order: &OrderState) -> Q {
    match &order.field {
        Some(field) => {
            tracing::debug!(field = %field, direction = %order.direction, "Applying search order");
            query.order_by(field, order.direction)
        }
        None => query,
    }
}
