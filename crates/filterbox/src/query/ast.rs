//! Expression tree for filter queries.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The logical connective of a [`Expression::Branch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConditionType {
    /// All children must hold.
    And,
    /// At least one child must hold.
    Or,
}

impl ConditionType {
    /// Returns the canonical keyword for this connective.
    pub fn keyword(self) -> &'static str {
        match self {
            ConditionType::And => "AND",
            ConditionType::Or => "OR",
        }
    }

    /// Matches a conjunction keyword, ignoring case.
    pub fn from_keyword(word: &str) -> Option<Self> {
        if word.eq_ignore_ascii_case("AND") {
            Some(ConditionType::And)
        } else if word.eq_ignore_ascii_case("OR") {
            Some(ConditionType::Or)
        } else {
            None
        }
    }
}

impl fmt::Display for ConditionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A parsed filter expression.
///
/// A query is a tree of predicates (`Leaf`) joined by logical groups
/// (`Branch`). Branches produced by the parser always hold at least two
/// children; hand-built trees may contain smaller groups and every consumer
/// in this crate accepts them.
///
/// The serde representation is untagged and matches the JSON shape used by
/// filter-box front ends:
///
/// ```json
/// {"conditionType": "OR", "expressions": [
///     {"category": "column1", "operator": "==", "value": "A"},
///     {"category": "column2", "operator": "contains", "value": "B"}
/// ]}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Expression {
    /// A single predicate: `category operator value`.
    Leaf {
        /// The filterable field name.
        category: String,
        /// The comparison keyword.
        operator: String,
        /// The right-hand side. Always present in parsed trees.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<String>,
    },

    /// A logical group of sub-expressions.
    Branch {
        /// How the children combine.
        #[serde(rename = "conditionType")]
        condition_type: ConditionType,
        /// Children in source order.
        expressions: Vec<Expression>,
    },
}

impl Expression {
    /// Creates a leaf predicate.
    ///
    /// # Example
    ///
    /// ```
    /// use filterbox::query::Expression;
    ///
    /// let expr = Expression::leaf("column1", "==", Some("ABC"));
    /// assert!(expr.is_leaf());
    /// ```
    pub fn leaf(
        category: impl Into<String>,
        operator: impl Into<String>,
        value: Option<impl Into<String>>,
    ) -> Self {
        Expression::Leaf {
            category: category.into(),
            operator: operator.into(),
            value: value.map(Into::into),
        }
    }

    /// Creates an AND group.
    ///
    /// # Example
    ///
    /// ```
    /// use filterbox::query::{ConditionType, Expression};
    ///
    /// let expr = Expression::and(vec![
    ///     Expression::leaf("column1", "==", Some("A")),
    ///     Expression::leaf("column2", "==", Some("B")),
    /// ]);
    /// assert_eq!(expr.condition_type(), Some(ConditionType::And));
    /// ```
    pub fn and(expressions: Vec<Expression>) -> Self {
        Expression::Branch {
            condition_type: ConditionType::And,
            expressions,
        }
    }

    /// Creates an OR group.
    pub fn or(expressions: Vec<Expression>) -> Self {
        Expression::Branch {
            condition_type: ConditionType::Or,
            expressions,
        }
    }

    /// Wraps `expressions` in a group, or returns the sole expression unwrapped.
    pub(crate) fn group(condition_type: ConditionType, mut expressions: Vec<Expression>) -> Self {
        if expressions.len() == 1 {
            if let Some(only) = expressions.pop() {
                return only;
            }
        }
        Expression::Branch {
            condition_type,
            expressions,
        }
    }

    /// Returns true for a single predicate.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Expression::Leaf { .. })
    }

    /// Returns the connective of a branch, `None` for a leaf.
    pub fn condition_type(&self) -> Option<ConditionType> {
        match self {
            Expression::Leaf { .. } => None,
            Expression::Branch { condition_type, .. } => Some(*condition_type),
        }
    }

    /// Returns the children of a branch; a leaf has none.
    pub fn children(&self) -> &[Expression] {
        match self {
            Expression::Leaf { .. } => &[],
            Expression::Branch { expressions, .. } => expressions,
        }
    }

    /// Counts the predicates in this tree.
    pub fn leaf_count(&self) -> usize {
        match self {
            Expression::Leaf { .. } => 1,
            Expression::Branch { expressions, .. } => {
                expressions.iter().map(Expression::leaf_count).sum()
            }
        }
    }
}
