//! Output formatting utilities for the fbx CLI.
//!
//! This module provides functions for formatting results as tables or JSON.
//! It is organized into submodules by what is being shown:
//!
//! - [`query`] - Parse trees, canonical text and token dumps
//! - [`suggestions`] - Autocomplete slots and candidates
//! - [`schema`] - Categories and schema columns
//! - [`helpers`] - Common formatting utilities (headers, error carets)

pub mod helpers;
mod query;
mod schema;
mod suggestions;

// Queries
pub use query::{
    format_parse_json, format_parse_table, format_tokens_json, format_tokens_table,
    format_valid, format_validation_json,
};

// Suggestions
pub use suggestions::{format_completion_json, format_completion_table};

// Schema
pub use schema::{
    format_categories_json, format_categories_table, format_columns_json, format_columns_table,
};
