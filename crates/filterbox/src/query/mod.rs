//! Filter query language: lexer, parser and expression tree.
//!
//! # Supported Syntax
//!
//! ## Predicates
//! - `category operator value` - e.g. `column1 == ABC`
//! - Values containing spaces or keywords are quoted: `name == "John Smith"`
//!
//! ## Operators
//! - `==`, `!=`, `<>`, `contains`, `!contains`, `in` by default
//! - Any other word in operator position is accepted by the parser and checked
//!   against the schema during validation
//!
//! ## Boolean Operators
//! - `AND` - binds tighter than `OR`
//! - `OR`
//! - `()` - grouping
//!
//! Conjunctions match case-insensitively; categories, operators and values are
//! case-sensitive.
//!
//! # Example
//!
//! ```
//! use filterbox::query::{parse, Expression};
//!
//! let forest = parse("column1 == A OR (column2 contains B AND column3 in C)").unwrap();
//! let Expression::Branch { expressions, .. } = &forest[0] else {
//!     panic!("expected a group");
//! };
//! assert_eq!(expressions.len(), 2);
//! assert!(!expressions[1].is_leaf());
//! ```

mod ast;
mod error;
mod format;
mod lexer;
mod parser;

pub use ast::{ConditionType, Expression};
pub use error::{ParseResult, ParsedError};
pub use format::format_query;
pub(crate) use format::{category_literal, value_literal};
pub use lexer::{tokenize, Lexer, PositionedToken, Token, DEFAULT_OPERATORS};
pub use parser::{parse, FilterQueryParser, MAX_NESTING_DEPTH};
