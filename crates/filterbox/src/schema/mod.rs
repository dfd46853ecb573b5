//! Schemas describe which categories, operators and values a query may use.
//!
//! The [`AutoCompleteHandler`] trait is the only thing the validator and the
//! suggestion engine know about a schema. [`GridSchema`] is the stock
//! implementation over tabular column metadata.

mod grid;
mod suggestion;

use std::rc::Rc;
use std::sync::Arc;

pub use grid::{ColumnOption, ColumnType, CustomOperatorFn, GridSchema, SchemaError};
pub use suggestion::{Suggestion, SuggestionKind};

/// Answers schema questions for validation and autocomplete.
///
/// Implementations must be side-effect free: every method may be called many
/// times per keystroke.
pub trait AutoCompleteHandler {
    /// Returns true if `category` names a known category.
    fn has_category(&self, category: &str) -> bool;

    /// Returns true if `operator` is legal for `category`.
    fn has_operator(&self, category: &str, operator: &str) -> bool;

    /// All categories, in declared order.
    fn categories(&self) -> Vec<Suggestion>;

    /// Operators legal for `category`.
    fn operators(&self, category: &str) -> Vec<Suggestion>;

    /// Known values for `category`.
    fn values(&self, category: &str) -> Vec<Suggestion>;

    /// Every operator any category accepts, deduplicated, in first-seen order.
    ///
    /// The parser feeds these to the lexer so custom operator words lex as
    /// operators.
    fn operator_vocabulary(&self) -> Vec<String> {
        let mut vocabulary: Vec<String> = Vec::new();
        for category in self.categories() {
            for operator in self.operators(&category.display_text) {
                if !vocabulary.contains(&operator.display_text) {
                    vocabulary.push(operator.display_text);
                }
            }
        }
        vocabulary
    }
}

macro_rules! forward_handler {
    ($($wrapper:ty),*) => {$(
        impl<T: AutoCompleteHandler + ?Sized> AutoCompleteHandler for $wrapper {
            fn has_category(&self, category: &str) -> bool {
                (**self).has_category(category)
            }

            fn has_operator(&self, category: &str, operator: &str) -> bool {
                (**self).has_operator(category, operator)
            }

            fn categories(&self) -> Vec<Suggestion> {
                (**self).categories()
            }

            fn operators(&self, category: &str) -> Vec<Suggestion> {
                (**self).operators(category)
            }

            fn values(&self, category: &str) -> Vec<Suggestion> {
                (**self).values(category)
            }

            fn operator_vocabulary(&self) -> Vec<String> {
                (**self).operator_vocabulary()
            }
        }
    )*};
}

forward_handler!(&T, Box<T>, Rc<T>, Arc<T>);
