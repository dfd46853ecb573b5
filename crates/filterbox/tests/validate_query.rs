//! Integration tests for validating parsed and textual queries against a
//! grid schema.
//!
//! Run with: cargo test --package filterbox --test validate_query

use filterbox::query::{ConditionType, Expression};
use filterbox::schema::{ColumnOption, ColumnType, GridSchema};
use filterbox::validate::{validate, validate_text, ValidationResult, PARSE_FAILURE_MESSAGE};

fn fixture() -> GridSchema {
    GridSchema::from_columns(vec![
        ColumnOption::new("column1")
            .display_text("Column1")
            .column_type(ColumnType::Text),
        ColumnOption::new("column2").column_type(ColumnType::Text),
        ColumnOption::new("column3")
            .display_text("Column3")
            .column_type(ColumnType::Text)
            .custom_operators(|_| vec!["**".to_string(), "in".to_string()]),
    ])
    .expect("fixture schema is valid")
}

/// A predicate without a value, the way callers build trees by hand.
fn leaf(category: &str, operator: &str) -> Expression {
    Expression::leaf(category, operator, None::<String>)
}

fn branch(condition_type: ConditionType, expressions: Vec<Expression>) -> Expression {
    match condition_type {
        ConditionType::And => Expression::and(expressions),
        ConditionType::Or => Expression::or(expressions),
    }
}

fn assert_message_starts_with(result: &ValidationResult, prefix: &str) {
    assert!(!result.is_valid, "expected an invalid result");
    let message = result.message.as_deref().unwrap_or_default();
    assert!(
        message.starts_with(prefix),
        "message {message:?} should start with {prefix:?}"
    );
}

// ============================================================================
// Category validation
// ============================================================================

#[test]
fn test_category_matching_field_is_valid() {
    let result = validate(&[leaf("column2", "==")], &fixture());
    assert!(result.is_valid);
    assert_eq!(result.message, None);
}

#[test]
fn test_category_matching_display_text_is_valid() {
    assert!(validate(&[leaf("Column1", "==")], &fixture()).is_valid);
}

#[test]
fn test_unknown_category_is_invalid() {
    let result = validate(&[leaf("FakeColumn1", "==")], &fixture());
    assert_message_starts_with(&result, "Invalid category");
}

// ============================================================================
// Operator validation
// ============================================================================

#[test]
fn test_default_operator_is_valid() {
    assert!(validate(&[leaf("Column1", "==")], &fixture()).is_valid);
}

#[test]
fn test_custom_operator_is_valid() {
    assert!(validate(&[leaf("Column3", "**")], &fixture()).is_valid);
}

#[test]
fn test_unknown_operator_is_invalid() {
    let result = validate(&[leaf("column1", "=")], &fixture());
    assert_message_starts_with(&result, "Invalid operator");
}

#[test]
fn test_default_operator_outside_custom_set_is_invalid() {
    let result = validate(&[leaf("column3", "==")], &fixture());
    assert_message_starts_with(&result, "Invalid operator");
}

// ============================================================================
// Compound expressions
// ============================================================================

#[test]
fn test_two_valid_conditions() {
    let forest = vec![branch(
        ConditionType::Or,
        vec![leaf("column2", "=="), leaf("column3", "**")],
    )];
    assert!(validate(&forest, &fixture()).is_valid);
}

#[test]
fn test_first_failure_wins() {
    let forest = vec![branch(
        ConditionType::Or,
        vec![leaf("column4", "=="), leaf("column3", "<>")],
    )];
    let result = validate(&forest, &fixture());
    assert_message_starts_with(&result, "Invalid category");
    assert_eq!(
        result.message.as_deref(),
        Some("Invalid category 'column4' in expression column4 ==")
    );
}

#[test]
fn test_valid_nested_conditions() {
    let forest = vec![branch(
        ConditionType::Or,
        vec![
            leaf("column1", "=="),
            branch(
                ConditionType::And,
                vec![leaf("column2", "contains"), leaf("column3", "in")],
            ),
        ],
    )];
    assert!(validate(&forest, &fixture()).is_valid);
}

#[test]
fn test_invalid_nested_condition() {
    let forest = vec![branch(
        ConditionType::Or,
        vec![
            leaf("column1", "=="),
            branch(
                ConditionType::And,
                vec![leaf("column2", "contains"), leaf("column3", "==")],
            ),
        ],
    )];
    let result = validate(&forest, &fixture());
    assert_message_starts_with(&result, "Invalid operator");
}

// ============================================================================
// Validating query text
// ============================================================================

#[test]
fn test_text_empty_is_valid() {
    assert_eq!(validate_text("", &fixture()), ValidationResult::valid());
}

#[test]
fn test_text_unparseable_is_invalid() {
    let result = validate_text("column1 ==", &fixture());
    assert!(!result.is_valid);
    assert_eq!(result.message.as_deref(), Some(PARSE_FAILURE_MESSAGE));
}

#[test]
fn test_text_valid_query() {
    assert!(validate_text("column1 == ABC", &fixture()).is_valid);
}

#[test]
fn test_text_invalid_category() {
    let result = validate_text("columnX == ABC", &fixture());
    assert_eq!(
        result.message.as_deref(),
        Some("Invalid category 'columnX' in expression columnX == ABC")
    );
}

#[test]
fn test_text_invalid_operator() {
    let result = validate_text("column1 !== ABC", &fixture());
    assert_eq!(
        result.message.as_deref(),
        Some("Invalid operator '!==' in expression column1 !== ABC")
    );
}

#[test]
fn test_text_custom_word_operator() {
    assert!(validate_text("Column3 in ABC OR column1 contains \"x y\"", &fixture()).is_valid);
    let result = validate_text("column2 == A AND (column1 != B OR Column3 contains C)", &fixture());
    assert_eq!(
        result.message.as_deref(),
        Some("Invalid operator 'contains' in expression Column3 contains C")
    );
}

#[test]
fn test_text_categories_are_case_sensitive() {
    let result = validate_text("COLUMN1 == ABC", &fixture());
    assert_message_starts_with(&result, "Invalid category");
}

#[test]
fn test_text_symbolic_custom_operators() {
    let schema = GridSchema::from_columns(vec![
        ColumnOption::new("name").operators(["=~", "!~", "^=", "=="]),
        ColumnOption::new("column2"),
    ])
    .expect("schema is valid");

    for operator in ["=~", "!~", "^=", "=="] {
        let query = format!("name {operator} Jo");
        assert!(
            validate_text(&query, &schema).is_valid,
            "{query} should be valid"
        );
    }
    assert!(validate_text("name=~Jo AND column2 contains x", &schema).is_valid);

    let result = validate_text("column2 =~ Jo", &schema);
    assert_eq!(
        result.message.as_deref(),
        Some("Invalid operator '=~' in expression column2 =~ Jo")
    );
}
