//! Schema over tabular column metadata.
//!
//! [`GridSchema`] answers schema questions from an ordered list of
//! [`ColumnOption`]s. Rows passed at construction are only used to harvest
//! the distinct values offered as value suggestions; they are read once and
//! never kept.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strsim::levenshtein;
use thiserror::Error;
use tracing::debug;

use super::{AutoCompleteHandler, Suggestion, SuggestionKind};
use crate::query::{category_literal, value_literal, DEFAULT_OPERATORS};

/// Maximum Levenshtein distance to consider a category name as a suggestion.
const MAX_SUGGESTION_DISTANCE: usize = 3;

/// Returns the operators legal for the category it is called with.
pub type CustomOperatorFn = Arc<dyn Fn(&str) -> Vec<String> + Send + Sync>;

/// The data type of a column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// Free text.
    #[default]
    Text,
    /// Numeric values.
    Number,
    /// `true` / `false`. Always offers both as values.
    Boolean,
    /// Dates.
    Date,
    /// A closed set of values, typically harvested from rows.
    Selection,
}

/// Describes one filterable column.
#[derive(Clone)]
pub struct ColumnOption {
    /// Field name of the column in row objects.
    pub field: String,
    /// Label shown to users. Queries may use either name.
    pub display_text: Option<String>,
    /// Data type of the column.
    pub column_type: ColumnType,
    custom_operators: Option<CustomOperatorFn>,
}

impl fmt::Debug for ColumnOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnOption")
            .field("field", &self.field)
            .field("display_text", &self.display_text)
            .field("column_type", &self.column_type)
            .field("custom_operators", &self.custom_operators.is_some())
            .finish()
    }
}

impl ColumnOption {
    /// Creates a text column with the default operator set.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            display_text: None,
            column_type: ColumnType::default(),
            custom_operators: None,
        }
    }

    /// Sets the user-facing label.
    pub fn display_text(mut self, display_text: impl Into<String>) -> Self {
        self.display_text = Some(display_text.into());
        self
    }

    /// Sets the column type.
    pub fn column_type(mut self, column_type: ColumnType) -> Self {
        self.column_type = column_type;
        self
    }

    /// Replaces the default operator set with whatever `operators` returns
    /// for the category name used in the query.
    pub fn custom_operators<F>(mut self, operators: F) -> Self
    where
        F: Fn(&str) -> Vec<String> + Send + Sync + 'static,
    {
        self.custom_operators = Some(Arc::new(operators));
        self
    }

    /// Replaces the default operator set with a fixed list.
    pub fn operators<I, S>(self, operators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let operators: Vec<String> = operators.into_iter().map(Into::into).collect();
        self.custom_operators(move |_| operators.clone())
    }

    /// Returns true if the column declares its own operator set.
    pub fn has_custom_operators(&self) -> bool {
        self.custom_operators.is_some()
    }

    /// The name shown to users: the display text if set, else the field.
    pub fn name(&self) -> &str {
        self.display_text.as_deref().unwrap_or(&self.field)
    }

    /// Returns true if `name` selects this column, by field or display text.
    pub fn answers_to(&self, name: &str) -> bool {
        self.field == name || self.display_text.as_deref() == Some(name)
    }

    /// Operators legal for this column when referred to as `category`.
    pub fn operator_names(&self, category: &str) -> Vec<String> {
        match &self.custom_operators {
            Some(custom) => custom(category),
            None => DEFAULT_OPERATORS.iter().map(|op| op.to_string()).collect(),
        }
    }

    /// Field and display text, without duplicates.
    fn surface_names(&self) -> impl Iterator<Item = &str> {
        let display = self
            .display_text
            .as_deref()
            .filter(|display| *display != self.field);
        std::iter::once(self.field.as_str()).chain(display)
    }
}

/// Errors raised while building a [`GridSchema`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SchemaError {
    /// The schema declares no columns.
    #[error("schema has no columns")]
    NoColumns,

    /// A column has an empty field name.
    #[error("column {index} has an empty field name")]
    EmptyField {
        /// Zero-based column index.
        index: usize,
    },

    /// Two columns share a field or display name.
    #[error("category name '{name}' is used by more than one column")]
    DuplicateName {
        /// The ambiguous name.
        name: String,
    },

    /// A row is not a JSON object.
    #[error("row {index} is not an object")]
    InvalidRow {
        /// Zero-based row index.
        index: usize,
    },
}

/// The stock [`AutoCompleteHandler`] over column descriptors and row data.
///
/// # Example
///
/// ```
/// use filterbox::schema::{AutoCompleteHandler, ColumnOption, GridSchema};
/// use serde_json::json;
///
/// let schema = GridSchema::new(
///     vec![
///         ColumnOption::new("column1").display_text("Column1"),
///         ColumnOption::new("column3").operators(["**", "in"]),
///     ],
///     &[json!({"column1": "ABC"}), json!({"column1": "XYZ"})],
/// )
/// .unwrap();
///
/// assert!(schema.has_category("column1"));
/// assert!(schema.has_category("Column1"));
/// assert!(schema.has_operator("column3", "**"));
/// assert!(!schema.has_operator("column3", "=="));
/// assert_eq!(schema.values("Column1").len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct GridSchema {
    columns: Vec<ColumnOption>,
    /// Distinct values per column, parallel to `columns`.
    values: Vec<Vec<String>>,
}

impl GridSchema {
    /// Builds a schema, harvesting distinct values from `rows`.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] for an empty column list, an empty field
    /// name, a name claimed by two columns, or a row that is not an object.
    pub fn new(columns: Vec<ColumnOption>, rows: &[Value]) -> Result<Self, SchemaError> {
        if columns.is_empty() {
            return Err(SchemaError::NoColumns);
        }

        let mut seen: HashSet<&str> = HashSet::new();
        for (index, column) in columns.iter().enumerate() {
            if column.field.is_empty() {
                return Err(SchemaError::EmptyField { index });
            }
            for name in column.surface_names() {
                if !seen.insert(name) {
                    return Err(SchemaError::DuplicateName {
                        name: name.to_string(),
                    });
                }
            }
        }

        let values = harvest_values(&columns, rows)?;
        debug!(
            columns = columns.len(),
            rows = rows.len(),
            "built grid schema"
        );

        Ok(Self { columns, values })
    }

    /// Builds a schema without row data.
    pub fn from_columns(columns: Vec<ColumnOption>) -> Result<Self, SchemaError> {
        Self::new(columns, &[])
    }

    /// The columns, in declared order.
    pub fn columns(&self) -> &[ColumnOption] {
        &self.columns
    }

    /// Finds the column selected by `name`.
    pub fn column(&self, name: &str) -> Option<&ColumnOption> {
        self.column_index(name).map(|index| &self.columns[index])
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column.answers_to(name))
    }

    /// Finds the closest known category name to `name` for "did you mean"
    /// hints.
    ///
    /// Returns `None` for exact matches and for names more than a few edits
    /// away from every category.
    pub fn find_similar_category(&self, name: &str) -> Option<String> {
        if self.column_index(name).is_some() {
            return None;
        }
        let query_lower = name.to_lowercase();

        let (best_match, best_distance) = self
            .columns
            .iter()
            .flat_map(ColumnOption::surface_names)
            .map(|candidate| {
                let distance = levenshtein(&query_lower, &candidate.to_lowercase());
                (candidate, distance)
            })
            .min_by_key(|(_, distance)| *distance)?;

        (best_distance <= MAX_SUGGESTION_DISTANCE).then(|| best_match.to_string())
    }
}

/// Collects distinct stringified values per column in first-seen order.
fn harvest_values(
    columns: &[ColumnOption],
    rows: &[Value],
) -> Result<Vec<Vec<String>>, SchemaError> {
    let mut values: Vec<Vec<String>> = columns
        .iter()
        .map(|column| match column.column_type {
            ColumnType::Boolean => vec!["true".to_string(), "false".to_string()],
            _ => Vec::new(),
        })
        .collect();
    let mut seen: Vec<HashSet<String>> = values
        .iter()
        .map(|known| known.iter().cloned().collect())
        .collect();

    for (index, row) in rows.iter().enumerate() {
        let Some(object) = row.as_object() else {
            return Err(SchemaError::InvalidRow { index });
        };
        for (column_index, column) in columns.iter().enumerate() {
            let text = match object.get(&column.field) {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Number(n)) => n.to_string(),
                Some(Value::Bool(b)) => b.to_string(),
                _ => continue,
            };
            if seen[column_index].insert(text.clone()) {
                values[column_index].push(text);
            }
        }
    }

    Ok(values)
}

impl AutoCompleteHandler for GridSchema {
    fn has_category(&self, category: &str) -> bool {
        self.column_index(category).is_some()
    }

    fn has_operator(&self, category: &str, operator: &str) -> bool {
        match self.column(category) {
            Some(column) => column
                .operator_names(category)
                .iter()
                .any(|op| op == operator),
            None => DEFAULT_OPERATORS.contains(&operator),
        }
    }

    fn categories(&self) -> Vec<Suggestion> {
        let vocabulary = self.operator_vocabulary();
        self.columns
            .iter()
            .map(|column| {
                Suggestion::new(
                    column.name(),
                    category_literal(column.name(), &vocabulary),
                    SuggestionKind::Category,
                )
            })
            .collect()
    }

    fn operators(&self, category: &str) -> Vec<Suggestion> {
        let names = match self.column(category) {
            Some(column) => column.operator_names(category),
            None => DEFAULT_OPERATORS.iter().map(|op| op.to_string()).collect(),
        };
        let vocabulary = self.operator_vocabulary();
        names
            .into_iter()
            .map(|op| {
                let literal = value_literal(&op, &vocabulary);
                Suggestion::new(op, literal, SuggestionKind::Operator)
            })
            .collect()
    }

    fn values(&self, category: &str) -> Vec<Suggestion> {
        let Some(index) = self.column_index(category) else {
            return Vec::new();
        };
        let vocabulary = self.operator_vocabulary();
        self.values[index]
            .iter()
            .map(|value| {
                Suggestion::new(
                    value.clone(),
                    value_literal(value, &vocabulary),
                    SuggestionKind::Value,
                )
            })
            .collect()
    }

    fn operator_vocabulary(&self) -> Vec<String> {
        let mut vocabulary: Vec<String> = Vec::new();
        for column in &self.columns {
            for operator in column.operator_names(column.name()) {
                if !vocabulary.contains(&operator) {
                    vocabulary.push(operator);
                }
            }
        }
        vocabulary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{Expression, FilterQueryParser};
    use serde_json::json;

    fn fixture() -> GridSchema {
        GridSchema::new(
            vec![
                ColumnOption::new("column1").display_text("Column1"),
                ColumnOption::new("column2"),
                ColumnOption::new("column3")
                    .display_text("Column3")
                    .custom_operators(|_| vec!["**".to_string(), "in".to_string()]),
            ],
            &[
                json!({"column1": "ABC", "column2": 1, "column3": true}),
                json!({"column1": "XYZ", "column2": 2.5}),
                json!({"column1": "ABC", "column2": null, "column3": ["nested"]}),
            ],
        )
        .unwrap()
    }

    fn values_of(schema: &GridSchema, category: &str) -> Vec<String> {
        schema
            .values(category)
            .into_iter()
            .map(|s| s.display_text)
            .collect()
    }

    #[test]
    fn test_has_category_by_field_or_display_text() {
        let schema = fixture();
        assert!(schema.has_category("column1"));
        assert!(schema.has_category("Column1"));
        assert!(schema.has_category("column2"));
        assert!(schema.has_category("Column3"));
        assert!(!schema.has_category("FakeColumn1"));
    }

    #[test]
    fn test_has_category_is_case_sensitive() {
        let schema = fixture();
        assert!(!schema.has_category("COLUMN1"));
        assert!(!schema.has_category("Column2"));
    }

    #[test]
    fn test_has_operator_default_set() {
        let schema = fixture();
        for op in DEFAULT_OPERATORS {
            assert!(schema.has_operator("column1", op), "{op} should be legal");
        }
        assert!(!schema.has_operator("column1", "="));
        assert!(!schema.has_operator("column1", "**"));
    }

    #[test]
    fn test_has_operator_custom_set_replaces_default() {
        let schema = fixture();
        assert!(schema.has_operator("column3", "**"));
        assert!(schema.has_operator("Column3", "in"));
        assert!(!schema.has_operator("column3", "=="));
        assert!(!schema.has_operator("column3", "<>"));
    }

    #[test]
    fn test_custom_operators_receive_category_name() {
        let schema = GridSchema::from_columns(vec![ColumnOption::new("price")
            .display_text("Price")
            .custom_operators(|category| {
                if category == "Price" {
                    vec![">".to_string()]
                } else {
                    vec!["==".to_string()]
                }
            })])
        .unwrap();

        assert!(schema.has_operator("Price", ">"));
        assert!(!schema.has_operator("price", ">"));
        assert!(schema.has_operator("price", "=="));
    }

    #[test]
    fn test_has_operator_unknown_category_uses_default() {
        let schema = fixture();
        assert!(schema.has_operator("nope", "=="));
        assert!(!schema.has_operator("nope", "**"));
    }

    #[test]
    fn test_categories_in_declared_order() {
        let schema = fixture();
        let names: Vec<String> = schema
            .categories()
            .into_iter()
            .map(|s| s.value)
            .collect();
        assert_eq!(names, vec!["Column1", "column2", "Column3"]);
        assert!(schema
            .categories()
            .iter()
            .all(|s| s.kind == SuggestionKind::Category));
    }

    #[test]
    fn test_categories_quote_names_with_spaces() {
        let schema =
            GridSchema::from_columns(vec![ColumnOption::new("name").display_text("Full Name")])
                .unwrap();
        let categories = schema.categories();
        assert_eq!(categories[0].display_text, "Full Name");
        assert_eq!(categories[0].value, "\"Full Name\"");
    }

    #[test]
    fn test_categories_quote_names_that_are_schema_operators() {
        let schema = GridSchema::from_columns(vec![
            ColumnOption::new("has"),
            ColumnOption::new("tags").operators(["has", "!has", "=~"]),
        ])
        .unwrap();

        let categories = schema.categories();
        assert_eq!(categories[0].display_text, "has");
        assert_eq!(categories[0].value, "\"has\"");
        assert_eq!(categories[1].value, "tags");

        let query = format!("{} == x", categories[0].value);
        let forest = FilterQueryParser::for_schema(&schema).parse(&query).unwrap();
        assert_eq!(forest, vec![Expression::leaf("has", "==", Some("x"))]);
    }

    #[test]
    fn test_symbolic_custom_operator_suggested_bare() {
        let schema =
            GridSchema::from_columns(vec![ColumnOption::new("name").operators(["=~", "^="])])
                .unwrap();
        let operators: Vec<String> = schema
            .operators("name")
            .into_iter()
            .map(|s| s.value)
            .collect();
        assert_eq!(operators, vec!["=~", "^="]);
    }

    #[test]
    fn test_operators_custom_and_default() {
        let schema = fixture();
        let custom: Vec<String> = schema
            .operators("column3")
            .into_iter()
            .map(|s| s.value)
            .collect();
        assert_eq!(custom, vec!["**", "in"]);

        let default: Vec<String> = schema
            .operators("column1")
            .into_iter()
            .map(|s| s.value)
            .collect();
        assert_eq!(default, DEFAULT_OPERATORS);
    }

    #[test]
    fn test_values_harvested_distinct_in_order() {
        let schema = fixture();
        assert_eq!(values_of(&schema, "column1"), vec!["ABC", "XYZ"]);
        assert_eq!(values_of(&schema, "Column1"), vec!["ABC", "XYZ"]);
        assert_eq!(values_of(&schema, "column2"), vec!["1", "2.5"]);
        assert_eq!(values_of(&schema, "column3"), vec!["true"]);
        assert!(values_of(&schema, "unknown").is_empty());
    }

    #[test]
    fn test_boolean_column_always_offers_true_false() {
        let schema = GridSchema::new(
            vec![ColumnOption::new("active").column_type(ColumnType::Boolean)],
            &[json!({"active": false}), json!({"active": true})],
        )
        .unwrap();
        assert_eq!(values_of(&schema, "active"), vec!["true", "false"]);
    }

    #[test]
    fn test_value_suggestions_are_quoted_when_needed() {
        let schema = GridSchema::new(
            vec![ColumnOption::new("city")],
            &[json!({"city": "New York"})],
        )
        .unwrap();
        let values = schema.values("city");
        assert_eq!(values[0].display_text, "New York");
        assert_eq!(values[0].value, "\"New York\"");
    }

    #[test]
    fn test_operator_vocabulary() {
        let schema = fixture();
        assert_eq!(
            schema.operator_vocabulary(),
            vec!["==", "!=", "<>", "contains", "!contains", "in", "**"]
        );
    }

    #[test]
    fn test_new_rejects_no_columns() {
        assert_eq!(
            GridSchema::from_columns(vec![]).unwrap_err(),
            SchemaError::NoColumns
        );
    }

    #[test]
    fn test_new_rejects_empty_field() {
        let err = GridSchema::from_columns(vec![ColumnOption::new("a"), ColumnOption::new("")])
            .unwrap_err();
        assert_eq!(err, SchemaError::EmptyField { index: 1 });
    }

    #[test]
    fn test_new_rejects_duplicate_names() {
        let err = GridSchema::from_columns(vec![ColumnOption::new("a"), ColumnOption::new("a")])
            .unwrap_err();
        assert_eq!(
            err,
            SchemaError::DuplicateName {
                name: "a".to_string()
            }
        );

        let err = GridSchema::from_columns(vec![
            ColumnOption::new("a").display_text("Label"),
            ColumnOption::new("b").display_text("Label"),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            SchemaError::DuplicateName {
                name: "Label".to_string()
            }
        );
    }

    #[test]
    fn test_new_allows_display_text_equal_to_own_field() {
        assert!(GridSchema::from_columns(vec![ColumnOption::new("a").display_text("a")]).is_ok());
    }

    #[test]
    fn test_new_rejects_non_object_rows() {
        let err = GridSchema::new(vec![ColumnOption::new("a")], &[json!({"a": 1}), json!([1, 2])])
            .unwrap_err();
        assert_eq!(err, SchemaError::InvalidRow { index: 1 });
    }

    #[test]
    fn test_find_similar_category() {
        let schema = fixture();
        assert_eq!(
            schema.find_similar_category("colum1"),
            Some("column1".to_string())
        );
        assert_eq!(
            schema.find_similar_category("COLUMN2"),
            Some("column2".to_string())
        );
        assert_eq!(schema.find_similar_category("column2"), None);
        assert_eq!(schema.find_similar_category("completely different"), None);
    }

    #[test]
    fn test_column_debug_hides_closure() {
        let column = ColumnOption::new("a").operators(["=="]);
        let debug = format!("{column:?}");
        assert!(debug.contains("custom_operators: true"));
        assert!(column.has_custom_operators());
    }

    #[test]
    fn test_schema_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<GridSchema>();
    }
}
