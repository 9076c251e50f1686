//! Search entry to predicate translation.
//!
//! Each `field:operator` entry with a non-empty value becomes exactly one
//! predicate on the query. Builtin operators are resolved first, then the
//! [`OperatorRegistry`]; names found in neither are skipped without error.

use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::operators::{Arity, OperatorKind};
use super::predicate::{Operand, Predicate, ScalarValue, is_valid_field_name};
use crate::errors::SearchError;
use crate::query::QueryHandle;

/// Handler for a custom operator: `(query, field, value) -> query`.
pub type OperatorFn<Q> = dyn Fn(Q, &str, &Value) -> Q + Send + Sync;

/// Custom operators by name, built at startup and shared read-only.
pub struct OperatorRegistry<Q> {
    operators: HashMap<String, Arc<OperatorFn<Q>>>,
}

impl<Q> OperatorRegistry<Q> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            operators: HashMap::new(),
        }
    }

    /// Register `handler` under `name`, replacing any earlier handler.
    ///
    /// Builtin names always win over registered ones.
    #[must_use]
    pub fn with<F>(mut self, name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(Q, &str, &Value) -> Q + Send + Sync + 'static,
    {
        self.register(name, handler);
        self
    }

    pub fn register<F>(&mut self, name: impl Into<String>, handler: F)
    where
        F: Fn(Q, &str, &Value) -> Q + Send + Sync + 'static,
    {
        self.operators.insert(name.into(), Arc::new(handler));
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<OperatorFn<Q>>> {
        self.operators.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.operators.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.operators.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }
}

impl<Q> Default for OperatorRegistry<Q> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Q> Clone for OperatorRegistry<Q> {
    fn clone(&self) -> Self {
        Self {
            operators: self.operators.clone(),
        }
    }
}

impl<Q> fmt::Debug for OperatorRegistry<Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.operators.keys().collect();
        names.sort();
        f.debug_struct("OperatorRegistry")
            .field("operators", &names)
            .finish()
    }
}

/// Split `field:operator`, validating both halves.
///
/// # Errors
///
/// `MalformedSearchKey` without a delimiter or with an empty half,
/// `InvalidField` when the field is not a plain identifier.
pub fn split_search_key(key: &str) -> Result<(&str, &str), SearchError> {
    let (field, operator) = key
        .split_once(':')
        .ok_or_else(|| SearchError::malformed_key(key))?;
    if field.is_empty() || operator.is_empty() {
        return Err(SearchError::malformed_key(key));
    }
    if !is_valid_field_name(field) {
        return Err(SearchError::invalid_field(field));
    }
    Ok((field, operator))
}

/// `null`, `""` and `[]` count as "not provided".
#[must_use]
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Build the operand for a builtin operator from a non-empty JSON value.
///
/// # Errors
///
/// `InvalidOperand` when the value shape does not fit the operator.
pub fn build_operand(
    field: &str,
    operator: &str,
    kind: OperatorKind,
    value: &Value,
) -> Result<Operand, SearchError> {
    match kind.arity() {
        Arity::Nullary => Ok(Operand::None),
        Arity::Scalar => {
            let scalar = ScalarValue::from_json(value).ok_or_else(|| {
                SearchError::invalid_operand(field, operator, "a single scalar value")
            })?;
            let scalar = if kind.wildcard().is_some() {
                scalar
            } else {
                scalar.typed()
            };
            Ok(Operand::Scalar(scalar))
        }
        Arity::Set => {
            let Value::Array(items) = value else {
                return Err(SearchError::invalid_operand(
                    field,
                    operator,
                    "set operator expects a sequence of values",
                ));
            };
            let values = items
                .iter()
                .map(|item| ScalarValue::from_json(item).map(ScalarValue::typed))
                .collect::<Option<Vec<_>>>()
                .ok_or_else(|| {
                    SearchError::invalid_operand(field, operator, "a sequence of scalar values")
                })?;
            Ok(Operand::List(values))
        }
    }
}

/// Applies search entries to a query and tracks whether any of them took effect.
pub struct Translator<'r, Q> {
    registry: &'r OperatorRegistry<Q>,
    filtered: bool,
    predicates: Vec<Predicate>,
}

impl<'r, Q: QueryHandle> Translator<'r, Q> {
    #[must_use]
    pub fn new(registry: &'r OperatorRegistry<Q>) -> Self {
        Self {
            registry,
            filtered: false,
            predicates: Vec::new(),
        }
    }

    /// Apply one raw search entry (`"field:operator"` key plus value).
    ///
    /// # Errors
    ///
    /// See [`split_search_key`] and [`build_operand`].
    pub fn apply(&mut self, query: Q, key: &str, value: &Value) -> Result<Q, SearchError> {
        let (field, operator) = split_search_key(key)?;
        self.translate(query, field, operator, value)
    }

    /// Apply an already split entry.
    ///
    /// # Errors
    ///
    /// `InvalidField` for a bad field name, `InvalidOperand` for a value that
    /// does not fit a builtin operator.
    pub fn translate(
        &mut self,
        query: Q,
        field: &str,
        operator: &str,
        value: &Value,
    ) -> Result<Q, SearchError> {
        if !is_valid_field_name(field) {
            return Err(SearchError::invalid_field(field));
        }
        if is_empty_value(value) {
            return Ok(query);
        }

        if let Some(kind) = OperatorKind::from_name(operator) {
            let operand = build_operand(field, operator, kind, value)?;
            let predicate = Predicate::new(field, kind, operand);
            tracing::debug!(predicate = %predicate, "Applying search predicate");
            let query = query.add_predicate(&predicate);
            self.predicates.push(predicate);
            self.filtered = true;
            return Ok(query);
        }

        if let Some(handler) = self.registry.get(operator) {
            tracing::debug!(field, operator, "Applying custom search operator");
            self.filtered = true;
            return Ok(handler(query, field, value));
        }

        tracing::debug!(field, operator, "Ignoring unknown search operator");
        Ok(query)
    }

    /// True once at least one builtin or custom operator was applied.
    #[must_use]
    pub fn filtered(&self) -> bool {
        self.filtered
    }

    /// Builtin predicates applied so far, in application order.
    #[must_use]
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    #[must_use]
    pub fn into_predicates(self) -> Vec<Predicate> {
        self.predicates
    }
}
