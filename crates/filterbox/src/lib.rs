//! Boolean filter queries over a schema of categories.
//!
//! Queries look like `column1 == ABC AND (column2 contains x OR column3 in y)`.
//! This crate parses them into [`Expression`] trees, validates trees against
//! a schema, and computes autocomplete suggestions for partially typed text.
//!
//! # Quick Start
//!
//! ```
//! use filterbox::prelude::*;
//!
//! let schema = GridSchema::from_columns(vec![
//!     ColumnOption::new("column1").display_text("Column1"),
//!     ColumnOption::new("column3").operators(["**", "in"]),
//! ])
//! .unwrap();
//!
//! let forest = parse("Column1 == ABC AND column3 ** x").unwrap();
//! assert!(validate(&forest, &schema).is_valid);
//!
//! let next = suggest("column3 ", 8, &schema);
//! assert_eq!(next[0].value, "**");
//! ```
//!
//! For convenient imports, use the [`prelude`].

pub mod filter_box;
pub mod prelude;
pub mod query;
pub mod schema;
pub mod suggest;
pub mod validate;

pub use filter_box::{FilterBox, QueryOutcome, Rejection};
pub use query::{Expression, ParsedError};
pub use schema::{AutoCompleteHandler, GridSchema};
