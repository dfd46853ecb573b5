//! Semantic validation of parsed queries against a schema.
//!
//! Validation is fail-fast: the forest is walked depth-first, left to right,
//! and the first illegal predicate decides the result. Later problems are not
//! reported.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::query::{Expression, FilterQueryParser};
use crate::schema::AutoCompleteHandler;

/// Message reported by [`validate_text`] when the text does not parse.
pub const PARSE_FAILURE_MESSAGE: &str = "Error parsing query string";

/// Outcome of validating a query against a schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// True when every predicate is legal.
    pub is_valid: bool,
    /// Describes the first failure. `None` when valid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ValidationResult {
    /// A passing result.
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            message: None,
        }
    }

    /// A failing result with a message.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            message: Some(message.into()),
        }
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::valid()
    }
}

/// Renders a predicate the way validation messages quote it.
fn describe(category: &str, operator: &str, value: Option<&str>) -> String {
    match value {
        Some(value) => format!("{category} {operator} {value}"),
        None => format!("{category} {operator}"),
    }
}

/// Returns the first leaf `handler` rejects, walking the forest depth-first,
/// left to right.
///
/// This is the leaf [`validate`] reports on.
///
/// # Example
///
/// ```
/// use filterbox::query::parse;
/// use filterbox::schema::{ColumnOption, GridSchema};
/// use filterbox::validate::first_invalid;
///
/// let schema = GridSchema::from_columns(vec![ColumnOption::new("column1")]).unwrap();
/// let forest = parse("column1 == A OR (column1 like B AND column9 == C)").unwrap();
///
/// let leaf = first_invalid(&forest, &schema).unwrap();
/// assert_eq!(leaf.to_string(), "column1 like B");
/// ```
pub fn first_invalid<'a>(
    forest: &'a [Expression],
    handler: &dyn AutoCompleteHandler,
) -> Option<&'a Expression> {
    forest
        .iter()
        .find_map(|expression| first_invalid_in(expression, handler))
}

fn first_invalid_in<'a>(
    expression: &'a Expression,
    handler: &dyn AutoCompleteHandler,
) -> Option<&'a Expression> {
    match expression {
        Expression::Leaf {
            category, operator, ..
        } => (!handler.has_category(category) || !handler.has_operator(category, operator))
            .then_some(expression),
        Expression::Branch { expressions, .. } => expressions
            .iter()
            .find_map(|child| first_invalid_in(child, handler)),
    }
}

/// Explains why `handler` rejects the leaf `expression`.
fn failure_message(expression: &Expression, handler: &dyn AutoCompleteHandler) -> Option<String> {
    let Expression::Leaf {
        category,
        operator,
        value,
    } = expression
    else {
        return None;
    };
    let predicate = describe(category, operator, value.as_deref());
    if !handler.has_category(category) {
        Some(format!(
            "Invalid category '{category}' in expression {predicate}"
        ))
    } else if !handler.has_operator(category, operator) {
        Some(format!(
            "Invalid operator '{operator}' in expression {predicate}"
        ))
    } else {
        None
    }
}

/// Validates a parsed forest against `handler`.
///
/// An empty forest is valid.
///
/// # Example
///
/// ```
/// use filterbox::query::Expression;
/// use filterbox::schema::{ColumnOption, GridSchema};
/// use filterbox::validate::validate;
///
/// let schema = GridSchema::from_columns(vec![ColumnOption::new("column1")]).unwrap();
/// let forest = vec![Expression::leaf("column9", "==", Some("A"))];
///
/// let result = validate(&forest, &schema);
/// assert!(!result.is_valid);
/// assert_eq!(
///     result.message.as_deref(),
///     Some("Invalid category 'column9' in expression column9 == A")
/// );
/// ```
pub fn validate(forest: &[Expression], handler: &dyn AutoCompleteHandler) -> ValidationResult {
    match first_invalid(forest, handler).and_then(|leaf| failure_message(leaf, handler)) {
        Some(message) => {
            debug!(%message, "query failed validation");
            ValidationResult::invalid(message)
        }
        None => ValidationResult::valid(),
    }
}

/// Parses and validates `text` in one step.
///
/// Empty text is valid. Text that does not parse is invalid with
/// [`PARSE_FAILURE_MESSAGE`]; use the parser directly for positioned syntax
/// errors.
pub fn validate_text(text: &str, handler: &dyn AutoCompleteHandler) -> ValidationResult {
    match FilterQueryParser::for_schema(handler).parse(text) {
        Ok(forest) => validate(&forest, handler),
        Err(_) => ValidationResult::invalid(PARSE_FAILURE_MESSAGE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ColumnOption, GridSchema};

    fn leaf(category: &str, operator: &str) -> Expression {
        Expression::leaf(category, operator, None::<String>)
    }

    fn schema() -> GridSchema {
        GridSchema::from_columns(vec![
            ColumnOption::new("column1").display_text("Column1"),
            ColumnOption::new("column2"),
        ])
        .unwrap()
    }

    #[test]
    fn test_validate_empty_forest() {
        assert_eq!(validate(&[], &schema()), ValidationResult::valid());
    }

    #[test]
    fn test_validate_message_without_value() {
        let result = validate(&[leaf("nope", "==")], &schema());
        assert_eq!(
            result.message.as_deref(),
            Some("Invalid category 'nope' in expression nope ==")
        );
    }

    #[test]
    fn test_validate_operator_message() {
        let forest = vec![Expression::leaf("column1", "=", Some("ABC"))];
        let result = validate(&forest, &schema());
        assert_eq!(
            result.message.as_deref(),
            Some("Invalid operator '=' in expression column1 = ABC")
        );
    }

    #[test]
    fn test_validate_category_checked_before_operator() {
        let result = validate(&[leaf("nope", "=")], &schema());
        assert!(result.message.unwrap().starts_with("Invalid category"));
    }

    #[test]
    fn test_validate_tolerates_degenerate_branches() {
        let forest = vec![
            Expression::and(vec![]),
            Expression::or(vec![leaf("column2", "==")]),
        ];
        assert!(validate(&forest, &schema()).is_valid);

        let forest = vec![Expression::or(vec![leaf("column9", "==")])];
        assert!(!validate(&forest, &schema()).is_valid);
    }

    #[test]
    fn test_validate_checks_every_root() {
        let forest = vec![leaf("column1", "=="), leaf("column2", "like")];
        let result = validate(&forest, &schema());
        assert_eq!(
            result.message.as_deref(),
            Some("Invalid operator 'like' in expression column2 like")
        );
    }

    #[test]
    fn test_first_invalid_matches_reported_leaf() {
        let forest = vec![Expression::or(vec![
            leaf("column1", "=="),
            Expression::and(vec![leaf("column2", "like"), leaf("column9", "==")]),
        ])];
        let found = first_invalid(&forest, &schema());
        assert_eq!(found, Some(&leaf("column2", "like")));
        assert_eq!(
            validate(&forest, &schema()).message.as_deref(),
            Some("Invalid operator 'like' in expression column2 like")
        );
    }

    #[test]
    fn test_first_invalid_none_for_valid_forest() {
        let forest = vec![leaf("column1", "=="), leaf("Column1", "in")];
        assert_eq!(first_invalid(&forest, &schema()), None);
        assert_eq!(first_invalid(&[], &schema()), None);
    }

    #[test]
    fn test_validate_text_parse_failure_uses_fixed_message() {
        let result = validate_text("column1 == (", &schema());
        assert_eq!(result, ValidationResult::invalid(PARSE_FAILURE_MESSAGE));
    }

    #[test]
    fn test_validate_text_whitespace_is_valid() {
        assert!(validate_text("   ", &schema()).is_valid);
    }

    #[test]
    fn test_validation_result_json() {
        let json = serde_json::to_value(ValidationResult::invalid("bad")).unwrap();
        assert_eq!(json, serde_json::json!({"isValid": false, "message": "bad"}));

        let json = serde_json::to_value(ValidationResult::valid()).unwrap();
        assert_eq!(json, serde_json::json!({"isValid": true}));
    }
}
