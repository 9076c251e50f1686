//! Builtin search operators and their accepted names.

/// Comparison operators understood without registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorKind {
    /// `field = ?`
    Equals,
    /// `field <> ?`
    NotEquals,
    /// `field IS NULL`
    IsNull,
    /// `field IS NOT NULL`
    IsNotNull,
    /// `field LIKE '%v%'`
    Contains,
    /// `NOT (field LIKE '%v%')`
    NotContains,
    /// `field LIKE 'v%'`
    StartsWith,
    /// `NOT (field LIKE 'v%')`
    NotStartsWith,
    /// `field LIKE '%v'`
    EndsWith,
    /// `NOT (field LIKE '%v')`
    NotEndsWith,
    /// `field > ?`
    GreaterThan,
    /// `field >= ?`
    GreaterOrEqual,
    /// `field < ?`
    LessThan,
    /// `field <= ?`
    LessOrEqual,
    /// `field IN (?, ...)`
    In,
    /// `field NOT IN (?, ...)`
    NotIn,
}

/// Operator names as they appear after the `:` in a search key.
const OPERATOR_NAMES: &[(&str, OperatorKind)] = &[
    ("equals", OperatorKind::Equals),
    ("eq", OperatorKind::Equals),
    ("does_not_equal", OperatorKind::NotEquals),
    ("noteq", OperatorKind::NotEquals),
    ("neq", OperatorKind::NotEquals),
    ("is_null", OperatorKind::IsNull),
    ("is_not_null", OperatorKind::IsNotNull),
    ("contains", OperatorKind::Contains),
    ("like", OperatorKind::Contains),
    ("does_not_contain", OperatorKind::NotContains),
    ("not_like", OperatorKind::NotContains),
    ("starts_with", OperatorKind::StartsWith),
    ("does_not_start_with", OperatorKind::NotStartsWith),
    ("ends_with", OperatorKind::EndsWith),
    ("does_not_end_with", OperatorKind::NotEndsWith),
    ("greater_than", OperatorKind::GreaterThan),
    ("gt", OperatorKind::GreaterThan),
    ("greater_than_or_equal_to", OperatorKind::GreaterOrEqual),
    ("gteq", OperatorKind::GreaterOrEqual),
    ("gte", OperatorKind::GreaterOrEqual),
    ("less_than", OperatorKind::LessThan),
    ("lt", OperatorKind::LessThan),
    ("less_than_or_equal_to", OperatorKind::LessOrEqual),
    ("lteq", OperatorKind::LessOrEqual),
    ("lte", OperatorKind::LessOrEqual),
    ("in", OperatorKind::In),
    ("not_in", OperatorKind::NotIn),
];

/// What kind of operand an operator binds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// No bound value (null checks)
    Nullary,
    /// A single scalar
    Scalar,
    /// A non-empty sequence of scalars
    Set,
}

/// Shape of a LIKE pattern built around the operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wildcard {
    Both,
    Trailing,
    Leading,
}

impl Wildcard {
    #[must_use]
    pub fn pattern(self, value: &str) -> String {
        match self {
            Self::Both => format!("%{value}%"),
            Self::Trailing => format!("{value}%"),
            Self::Leading => format!("%{value}"),
        }
    }
}

impl OperatorKind {
    /// Resolve a builtin operator from its name or alias.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        OPERATOR_NAMES
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, kind)| *kind)
    }

    /// Canonical name used when re-encoding a search key
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Equals => "equals",
            Self::NotEquals => "does_not_equal",
            Self::IsNull => "is_null",
            Self::IsNotNull => "is_not_null",
            Self::Contains => "contains",
            Self::NotContains => "does_not_contain",
            Self::StartsWith => "starts_with",
            Self::NotStartsWith => "does_not_start_with",
            Self::EndsWith => "ends_with",
            Self::NotEndsWith => "does_not_end_with",
            Self::GreaterThan => "greater_than",
            Self::GreaterOrEqual => "greater_than_or_equal_to",
            Self::LessThan => "less_than",
            Self::LessOrEqual => "less_than_or_equal_to",
            Self::In => "in",
            Self::NotIn => "not_in",
        }
    }

    #[must_use]
    pub fn arity(self) -> Arity {
        match self {
            Self::IsNull | Self::IsNotNull => Arity::Nullary,
            Self::In | Self::NotIn => Arity::Set,
            _ => Arity::Scalar,
        }
    }

    /// LIKE wildcard placement, `None` for non-pattern operators.
    #[must_use]
    pub fn wildcard(self) -> Option<Wildcard> {
        match self {
            Self::Contains | Self::NotContains => Some(Wildcard::Both),
            Self::StartsWith | Self::NotStartsWith => Some(Wildcard::Trailing),
            Self::EndsWith | Self::NotEndsWith => Some(Wildcard::Leading),
            _ => None,
        }
    }

    /// Whether the predicate is wrapped in `NOT (...)`.
    #[must_use]
    pub fn is_negated_pattern(self) -> bool {
        matches!(
            self,
            Self::NotContains | Self::NotStartsWith | Self::NotEndsWith
        )
    }

    /// SQL comparison token for scalar and set operators.
    #[must_use]
    pub fn sql_operator(self) -> &'static str {
        match self {
            Self::Equals => "=",
            Self::NotEquals => "<>",
            Self::IsNull => "IS NULL",
            Self::IsNotNull => "IS NOT NULL",
            Self::Contains
            | Self::NotContains
            | Self::StartsWith
            | Self::NotStartsWith
            | Self::EndsWith
            | Self::NotEndsWith => "LIKE",
            Self::GreaterThan => ">",
            Self::GreaterOrEqual => ">=",
            Self::LessThan => "<",
            Self::LessOrEqual => "<=",
            Self::In => "IN",
            Self::NotIn => "NOT IN",
        }
    }
}
