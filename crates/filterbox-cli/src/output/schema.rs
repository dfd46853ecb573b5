//! Schema output formatting.

use std::path::Path;

use filterbox::schema::{AutoCompleteHandler, ColumnType, GridSchema};
use owo_colors::OwoColorize;
use serde::Serialize;

use super::helpers::{dim, header, truncate_str};

/// Widest operator list shown in tables before truncating.
const MAX_OPERATORS_WIDTH: usize = 40;

/// JSON output structure for the categories command.
#[derive(Serialize)]
pub struct CategoriesOutput {
    pub categories: Vec<CategoryOutput>,
}

/// JSON output structure for a single category.
#[derive(Serialize)]
pub struct CategoryOutput {
    pub name: String,
    pub operators: Vec<String>,
}

/// JSON output structure for the schema show command.
#[derive(Serialize)]
pub struct SchemaOutput<'a> {
    pub path: String,
    pub columns: Vec<ColumnOutput<'a>>,
}

/// JSON output structure for a single column.
#[derive(Serialize)]
pub struct ColumnOutput<'a> {
    pub field: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_text: Option<&'a str>,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    pub custom_operators: bool,
    pub operators: Vec<String>,
    pub value_count: usize,
}

fn operator_names(grid: &GridSchema, category: &str) -> Vec<String> {
    grid.operators(category)
        .into_iter()
        .map(|s| s.display_text)
        .collect()
}

fn type_name(column_type: ColumnType) -> &'static str {
    match column_type {
        ColumnType::Text => "text",
        ColumnType::Number => "number",
        ColumnType::Boolean => "boolean",
        ColumnType::Date => "date",
        ColumnType::Selection => "selection",
    }
}

/// Formats categories as JSON.
pub fn format_categories_json(grid: &GridSchema) -> Result<String, serde_json::Error> {
    let categories = grid
        .categories()
        .into_iter()
        .map(|category| CategoryOutput {
            operators: operator_names(grid, &category.display_text),
            name: category.display_text,
        })
        .collect();

    serde_json::to_string_pretty(&CategoriesOutput { categories })
}

/// Formats categories as a table.
pub fn format_categories_table(grid: &GridSchema, use_colors: bool) -> String {
    let mut output = String::new();

    let heading = format!("{:<24} {}", "Category", "Operators");
    output.push_str(&dim(&heading, use_colors));
    output.push('\n');

    for category in grid.categories() {
        let operators = operator_names(grid, &category.display_text).join(" ");
        let name = format!("{:<24}", category.display_text);
        let name = if use_colors {
            name.bold().to_string()
        } else {
            name
        };
        output.push_str(&format!(
            "{name} {}\n",
            truncate_str(&operators, MAX_OPERATORS_WIDTH)
        ));
    }
    output
}

/// Formats schema columns as JSON.
pub fn format_columns_json(path: &Path, grid: &GridSchema) -> Result<String, serde_json::Error> {
    let columns = grid
        .columns()
        .iter()
        .map(|column| ColumnOutput {
            field: &column.field,
            display_text: column.display_text.as_deref(),
            column_type: column.column_type,
            custom_operators: column.has_custom_operators(),
            operators: operator_names(grid, column.name()),
            value_count: grid.values(&column.field).len(),
        })
        .collect();

    let output = SchemaOutput {
        path: path.display().to_string(),
        columns,
    };
    serde_json::to_string_pretty(&output)
}

/// Formats schema columns as a table.
pub fn format_columns_table(path: &Path, grid: &GridSchema, use_colors: bool) -> String {
    let mut output = String::new();

    output.push_str(&format!("{}\n\n", header("Schema", use_colors)));
    output.push_str(&format!("File: {}\n\n", path.display()));

    let heading = format!(
        "{:<16} {:<16} {:<10} {:<7} {}",
        "Field", "Display", "Type", "Values", "Operators"
    );
    output.push_str(&dim(&heading, use_colors));
    output.push('\n');

    for column in grid.columns() {
        let operators = if column.has_custom_operators() {
            operator_names(grid, column.name()).join(" ")
        } else {
            "(default)".to_string()
        };
        output.push_str(&format!(
            "{:<16} {:<16} {:<10} {:<7} {}\n",
            truncate_str(&column.field, 16),
            truncate_str(column.display_text.as_deref().unwrap_or("-"), 16),
            type_name(column.column_type),
            grid.values(&column.field).len(),
            truncate_str(&operators, MAX_OPERATORS_WIDTH)
        ));
    }
    output
}
