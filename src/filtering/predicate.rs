use sea_orm::sea_query::{Alias, ColumnRef, Expr, IntoColumnRef, SimpleExpr};
use std::fmt;
use uuid::Uuid;

use super::operators::{Arity, OperatorKind};

const MAX_FIELD_NAME_LENGTH: usize = 100;

/// Plain identifier check: `column` or `table.column`, ASCII word characters only.
#[must_use]
pub fn is_valid_field_name(field_name: &str) -> bool {
    if field_name.is_empty() || field_name.len() > MAX_FIELD_NAME_LENGTH {
        return false;
    }
    let segments: Vec<&str> = field_name.split('.').collect();
    segments.len() <= 2
        && segments.iter().all(|segment| {
            !segment.is_empty()
                && segment
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_')
        })
}

/// Column reference for a validated field name, qualified when it contains a dot.
pub(crate) fn column_ref(field_name: &str) -> ColumnRef {
    match field_name.split_once('.') {
        Some((table, column)) => (Alias::new(table), Alias::new(column)).into_column_ref(),
        None => Alias::new(field_name).into_column_ref(),
    }
}

/// A single bound value.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Uuid(Uuid),
}

impl ScalarValue {
    /// Convert a JSON scalar; `None` for null, arrays and objects.
    #[must_use]
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::String(s) => Some(Self::Text(s.clone())),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map(Self::Int)
                .or_else(|| n.as_f64().map(Self::Float)),
            serde_json::Value::Bool(b) => Some(Self::Bool(*b)),
            _ => None,
        }
    }

    /// Strings holding a UUID are compared as UUIDs.
    #[must_use]
    pub fn typed(self) -> Self {
        match self {
            Self::Text(s) => match Uuid::parse_str(s.trim()) {
                Ok(uuid) => Self::Uuid(uuid),
                Err(_) => Self::Text(s),
            },
            other => other,
        }
    }

    fn to_value(&self) -> sea_orm::Value {
        match self {
            Self::Text(s) => sea_orm::Value::from(s.clone()),
            Self::Int(i) => sea_orm::Value::from(*i),
            Self::Float(f) => sea_orm::Value::from(*f),
            Self::Bool(b) => sea_orm::Value::from(*b),
            Self::Uuid(u) => sea_orm::Value::from(*u),
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{s}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Uuid(u) => write!(f, "{u}"),
        }
    }
}

/// The value side of a predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    None,
    Scalar(ScalarValue),
    List(Vec<ScalarValue>),
}

/// One filter fragment: `field <operator> operand`.
///
/// The operand is always kept apart from the SQL text; [`Predicate::template`]
/// renders `?` placeholders and [`Predicate::bound_values`] yields what binds to them.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    field: String,
    kind: OperatorKind,
    operand: Operand,
}

impl Predicate {
    /// Callers guarantee `field` passed [`is_valid_field_name`] and that
    /// `operand` matches the operator's arity.
    pub(crate) fn new(field: impl Into<String>, kind: OperatorKind, operand: Operand) -> Self {
        debug_assert!(match kind.arity() {
            Arity::Nullary => operand == Operand::None,
            Arity::Scalar => matches!(operand, Operand::Scalar(_)),
            Arity::Set => matches!(&operand, Operand::List(values) if !values.is_empty()),
        });
        Self {
            field: field.into(),
            kind,
            operand,
        }
    }

    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    #[must_use]
    pub fn kind(&self) -> OperatorKind {
        self.kind
    }

    #[must_use]
    pub fn operand(&self) -> &Operand {
        &self.operand
    }

    /// Parameterized SQL text, e.g. `age > ?` or `NOT (name LIKE ?)`.
    #[must_use]
    pub fn template(&self) -> String {
        let field = &self.field;
        let op = self.kind.sql_operator();
        match (&self.operand, self.kind.wildcard()) {
            (Operand::None, _) => format!("{field} {op}"),
            (Operand::List(values), _) => {
                let placeholders = vec!["?"; values.len()].join(", ");
                format!("{field} {op} ({placeholders})")
            }
            (Operand::Scalar(_), Some(_)) if self.kind.is_negated_pattern() => {
                format!("NOT ({field} {op} ?)")
            }
            (Operand::Scalar(_), _) => format!("{field} {op} ?"),
        }
    }

    /// Values bound to the placeholders of [`Predicate::template`], in order.
    #[must_use]
    pub fn bound_values(&self) -> Vec<ScalarValue> {
        match &self.operand {
            Operand::None => Vec::new(),
            Operand::List(values) => values.clone(),
            Operand::Scalar(value) => match self.kind.wildcard() {
                Some(wildcard) => vec![ScalarValue::Text(wildcard.pattern(&value.to_string()))],
                None => vec![value.clone()],
            },
        }
    }

    /// Sea-query expression with the operand bound as values.
    #[must_use]
    pub fn to_expr(&self) -> SimpleExpr {
        let column = Expr::col(column_ref(&self.field));
        match &self.operand {
            Operand::None => match self.kind {
                OperatorKind::IsNotNull => column.is_not_null(),
                _ => column.is_null(),
            },
            Operand::List(values) => {
                let values: Vec<sea_orm::Value> = values.iter().map(ScalarValue::to_value).collect();
                match self.kind {
                    OperatorKind::NotIn => column.is_not_in(values),
                    _ => column.is_in(values),
                }
            }
            Operand::Scalar(value) => {
                if let Some(wildcard) = self.kind.wildcard() {
                    let like = column.like(wildcard.pattern(&value.to_string()));
                    return if self.kind.is_negated_pattern() {
                        like.not()
                    } else {
                        like
                    };
                }
                let value = value.to_value();
                match self.kind {
                    OperatorKind::NotEquals => column.ne(value),
                    OperatorKind::GreaterThan => column.gt(value),
                    OperatorKind::GreaterOrEqual => column.gte(value),
                    OperatorKind::LessThan => column.lt(value),
                    OperatorKind::LessOrEqual => column.lte(value),
                    _ => column.eq(value),
                }
            }
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template())
    }
}
