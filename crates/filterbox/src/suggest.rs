//! Autocomplete for partially typed queries.
//!
//! The engine only looks at the text before the cursor. It replays the
//! tokens there through a small state machine to find the slot the user is
//! typing into, then asks the schema for candidates and keeps the ones that
//! contain the partially typed word. Unlike the parser it never fails:
//! input that fits no slot simply yields no suggestions.

use std::ops::Range;

use serde::Serialize;
use tracing::trace;

use crate::query::{ConditionType, Lexer, PositionedToken, Token};
use crate::schema::{AutoCompleteHandler, Suggestion, SuggestionKind};

/// The grammatical position at the cursor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "slot", rename_all = "snake_case")]
pub enum Slot {
    /// A predicate or group may start here.
    Category,
    /// An operator for `category` is expected.
    Operator {
        /// The category typed before the cursor.
        category: String,
    },
    /// A value for `category` is expected.
    Value {
        /// The category typed before the cursor.
        category: String,
    },
    /// A complete predicate precedes the cursor.
    Conjunction,
    /// The text before the cursor fits no slot.
    Unknown,
}

/// Everything an editor needs to offer and apply completions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Completion {
    /// Where the cursor sits in the grammar.
    #[serde(flatten)]
    pub slot: Slot,
    /// The partially typed word the suggestions were filtered by.
    pub partial: String,
    /// Byte range a picked suggestion replaces.
    pub replace: Range<usize>,
    /// Matching candidates in schema order.
    pub suggestions: Vec<Suggestion>,
}

/// Replays context tokens and returns the slot after them plus the number of
/// groups still open.
fn detect_slot(context: &[PositionedToken]) -> (Slot, usize) {
    let mut slot = Slot::Category;
    let mut depth = 0usize;

    for positioned in context {
        slot = match (slot, &positioned.token) {
            (Slot::Category, Token::OpenParen) => {
                depth += 1;
                Slot::Category
            }
            (Slot::Category, Token::Identifier(word) | Token::Operator(word)) => Slot::Operator {
                category: word.clone(),
            },
            (Slot::Operator { category }, Token::Identifier(_) | Token::Operator(_)) => {
                Slot::Value { category }
            }
            (Slot::Value { .. }, Token::Identifier(_) | Token::Operator(_)) => Slot::Conjunction,
            (Slot::Conjunction, Token::Conjunction(_)) => Slot::Category,
            (Slot::Conjunction, Token::CloseParen) if depth > 0 => {
                depth -= 1;
                Slot::Conjunction
            }
            _ => return (Slot::Unknown, depth),
        };
    }

    (slot, depth)
}

/// Candidates for `slot` before filtering.
fn candidates(slot: &Slot, depth: usize, handler: &dyn AutoCompleteHandler) -> Vec<Suggestion> {
    match slot {
        Slot::Category => {
            let mut list = handler.categories();
            list.push(Suggestion::plain("(", SuggestionKind::OpenParen));
            list
        }
        Slot::Operator { category } => handler.operators(category),
        Slot::Value { category } => handler.values(category),
        Slot::Conjunction => {
            let mut list = vec![
                Suggestion::plain(ConditionType::And.keyword(), SuggestionKind::Conjunction),
                Suggestion::plain(ConditionType::Or.keyword(), SuggestionKind::Conjunction),
            ];
            if depth > 0 {
                list.push(Suggestion::plain(")", SuggestionKind::CloseParen));
            }
            list
        }
        Slot::Unknown => Vec::new(),
    }
}

/// Returns true if `source` starts a quoted string that is never closed.
fn is_open_quote(source: &str) -> bool {
    let mut chars = source.chars();
    let Some(quote) = chars.next().filter(|c| matches!(c, '"' | '\'')) else {
        return false;
    };
    let mut escaped = false;
    for c in chars {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == quote {
            return false;
        }
    }
    true
}

/// Clamps `cursor` into `text` and back to a char boundary.
fn clamp_cursor(text: &str, cursor: usize) -> usize {
    let mut cursor = cursor.min(text.len());
    while !text.is_char_boundary(cursor) {
        cursor -= 1;
    }
    cursor
}

/// Works out the slot at `cursor` and the matching suggestions.
///
/// # Example
///
/// ```
/// use filterbox::schema::{ColumnOption, GridSchema};
/// use filterbox::suggest::{complete, Slot};
///
/// let schema = GridSchema::from_columns(vec![ColumnOption::new("column1")]).unwrap();
/// let completion = complete("column1 con", 11, &schema);
///
/// assert_eq!(completion.slot, Slot::Operator { category: "column1".to_string() });
/// assert_eq!(completion.partial, "con");
/// assert_eq!(completion.replace, 8..11);
/// assert_eq!(completion.suggestions[0].value, "contains");
/// ```
pub fn complete(text: &str, cursor: usize, handler: &dyn AutoCompleteHandler) -> Completion {
    let cursor = clamp_cursor(text, cursor);
    let before = &text[..cursor];

    let vocabulary = handler.operator_vocabulary();
    let mut tokens = Lexer::new(before).with_operators(&vocabulary).tokenize();
    tokens.pop(); // EOF

    let typing_word = before.chars().last().is_some_and(|c| !c.is_whitespace());
    let partial_token = match tokens.last() {
        Some(last)
            if last.end == cursor
                && !matches!(last.token, Token::OpenParen | Token::CloseParen)
                && (typing_word || is_open_quote(&before[last.position..last.end])) =>
        {
            tokens.pop()
        }
        _ => None,
    };

    let (partial, replace) = match &partial_token {
        Some(positioned) => {
            let text = match &positioned.token {
                Token::Identifier(word) => word.clone(),
                _ => before[positioned.position..positioned.end].to_string(),
            };
            (text, positioned.position..cursor)
        }
        None => (String::new(), cursor..cursor),
    };

    let (slot, depth) = detect_slot(&tokens);
    let suggestions: Vec<Suggestion> = candidates(&slot, depth, handler)
        .into_iter()
        .filter(|suggestion| suggestion.matches(&partial))
        .collect();

    trace!(
        slot = ?slot,
        partial = %partial,
        count = suggestions.len(),
        "computed suggestions"
    );

    Completion {
        slot,
        partial,
        replace,
        suggestions,
    }
}

/// Returns the suggestions for the word at `cursor`.
pub fn suggest(text: &str, cursor: usize, handler: &dyn AutoCompleteHandler) -> Vec<Suggestion> {
    complete(text, cursor, handler).suggestions
}
