//! Prelude module for convenient imports.
//!
//! ```
//! use filterbox::prelude::*;
//!
//! // Parsing: parse, tokenize, format_query, FilterQueryParser, Expression
//! // Schemas: AutoCompleteHandler, GridSchema, ColumnOption, Suggestion
//! // Checks: validate, validate_text, suggest, complete, FilterBox
//! ```

// Query language
pub use crate::query::{
    format_query, parse, tokenize, ConditionType, Expression, FilterQueryParser, ParseResult,
    ParsedError, Token,
};

// Schemas
pub use crate::schema::{
    AutoCompleteHandler, ColumnOption, ColumnType, GridSchema, SchemaError, Suggestion,
    SuggestionKind,
};

// Validation and autocomplete
pub use crate::suggest::{complete, suggest, Completion, Slot};
pub use crate::validate::{first_invalid, validate, validate_text, ValidationResult};

// Sessions
pub use crate::filter_box::{FilterBox, QueryOutcome, Rejection};
