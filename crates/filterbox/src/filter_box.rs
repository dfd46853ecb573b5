//! A filter input session bound to one schema.
//!
//! [`FilterBox`] is what an editor widget drives: [`FilterBox::check`] on
//! every edit to decide whether to show the error indicator,
//! [`FilterBox::submit`] when the user commits the query, and
//! [`FilterBox::suggest`] for the completion popup.

use thiserror::Error;
use tracing::debug;

use crate::query::{Expression, FilterQueryParser, ParseResult, ParsedError};
use crate::schema::{AutoCompleteHandler, Suggestion};
use crate::suggest::{complete, Completion};
use crate::validate::{validate, ValidationResult};

/// Why a submitted query was turned down.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Rejection {
    /// The query does not parse.
    #[error(transparent)]
    Syntax(#[from] ParsedError),

    /// The query parses but fails validation. Only raised in strict mode.
    #[error("{}", .validation.message.as_deref().unwrap_or("invalid query"))]
    Invalid {
        /// The parsed forest.
        expressions: Vec<Expression>,
        /// The failed validation.
        validation: ValidationResult,
    },
}

/// Result of checking a query while it is being edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOutcome {
    /// The parse result.
    pub result: ParseResult<Vec<Expression>>,
    /// Validation of the parsed forest. Always valid outside strict mode or
    /// when the query does not parse.
    pub validation: ValidationResult,
}

impl QueryOutcome {
    /// True when the editor should show its error state.
    pub fn is_error(&self) -> bool {
        self.result.is_err() || !self.validation.is_valid
    }
}

/// Parser, schema and strictness bundled for an input widget.
///
/// # Example
///
/// ```
/// use filterbox::schema::{ColumnOption, GridSchema};
/// use filterbox::FilterBox;
///
/// let schema = GridSchema::from_columns(vec![ColumnOption::new("column1")]).unwrap();
/// let filter_box = FilterBox::new(schema).strict_mode(true);
///
/// assert!(filter_box.submit("column1 == A").is_ok());
/// assert!(filter_box.submit("column9 == A").is_err());
/// assert!(filter_box.check("column1 ==").is_error());
/// ```
#[derive(Debug)]
pub struct FilterBox<H: AutoCompleteHandler> {
    parser: FilterQueryParser,
    handler: H,
    strict: bool,
}

impl<H: AutoCompleteHandler> FilterBox<H> {
    /// Creates a non-strict session over `handler`.
    pub fn new(handler: H) -> Self {
        Self {
            parser: FilterQueryParser::for_schema(&handler),
            handler,
            strict: false,
        }
    }

    /// Enables or disables strict mode, in which parsed queries must also
    /// validate.
    pub fn strict_mode(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Returns true in strict mode.
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// The schema this session answers from.
    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// The schema-aware parser.
    pub fn parser(&self) -> &FilterQueryParser {
        &self.parser
    }

    fn validate_if_strict(&self, expressions: &[Expression]) -> ValidationResult {
        if self.strict {
            validate(expressions, &self.handler)
        } else {
            ValidationResult::valid()
        }
    }

    /// Parses `query` and, in strict mode, validates it.
    pub fn check(&self, query: &str) -> QueryOutcome {
        let result = self.parser.parse(query);
        let validation = match &result {
            Ok(expressions) => self.validate_if_strict(expressions),
            Err(_) => ValidationResult::valid(),
        };
        QueryOutcome { result, validation }
    }

    /// Parses `query` for use, rejecting syntax errors and, in strict mode,
    /// invalid queries.
    ///
    /// # Errors
    ///
    /// Returns [`Rejection::Syntax`] when the query does not parse and
    /// [`Rejection::Invalid`] when strict validation fails.
    pub fn submit(&self, query: &str) -> Result<Vec<Expression>, Rejection> {
        let expressions = self.parser.parse(query)?;
        let validation = self.validate_if_strict(&expressions);
        if !validation.is_valid {
            debug!(query, "rejected invalid query");
            return Err(Rejection::Invalid {
                expressions,
                validation,
            });
        }
        Ok(expressions)
    }

    /// Whether an initial query should start in the error state.
    ///
    /// Only strict sessions check initial queries; empty text never errors.
    pub fn initial_error(&self, query: &str) -> bool {
        if !self.strict || query.is_empty() {
            return false;
        }
        self.check(query).is_error()
    }

    /// Suggestions for the word at `cursor`.
    pub fn suggest(&self, text: &str, cursor: usize) -> Vec<Suggestion> {
        self.complete(text, cursor).suggestions
    }

    /// Slot, replace range and suggestions for the word at `cursor`.
    pub fn complete(&self, text: &str, cursor: usize) -> Completion {
        complete(text, cursor, &self.handler)
    }
}
