//! Completion candidates offered to a query editor.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The grammatical role of a suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    /// A category name.
    Category,
    /// An operator for the preceding category.
    Operator,
    /// A value for the preceding category.
    Value,
    /// `AND` or `OR`.
    Conjunction,
    /// `(`
    OpenParen,
    /// `)`
    CloseParen,
}

impl SuggestionKind {
    /// Lowercase name, as used in JSON.
    pub fn as_str(self) -> &'static str {
        match self {
            SuggestionKind::Category => "category",
            SuggestionKind::Operator => "operator",
            SuggestionKind::Value => "value",
            SuggestionKind::Conjunction => "conjunction",
            SuggestionKind::OpenParen => "open_paren",
            SuggestionKind::CloseParen => "close_paren",
        }
    }
}

impl fmt::Display for SuggestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single completion candidate.
///
/// `display_text` is the raw name. `value` is the literal to insert, quoted
/// when the raw name would not lex back as a single word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    /// Text shown in the completion list.
    pub display_text: String,
    /// Text inserted into the query when picked.
    pub value: String,
    /// Which slot this suggestion fills.
    pub kind: SuggestionKind,
}

impl Suggestion {
    /// Creates a suggestion whose display text differs from the inserted value.
    pub fn new(
        display_text: impl Into<String>,
        value: impl Into<String>,
        kind: SuggestionKind,
    ) -> Self {
        Self {
            display_text: display_text.into(),
            value: value.into(),
            kind,
        }
    }

    /// Creates a suggestion that displays exactly what it inserts.
    pub fn plain(text: impl Into<String>, kind: SuggestionKind) -> Self {
        let text = text.into();
        Self {
            display_text: text.clone(),
            value: text,
            kind,
        }
    }

    /// Case-insensitive substring match against value or display text.
    pub fn matches(&self, partial: &str) -> bool {
        if partial.is_empty() {
            return true;
        }
        let needle = partial.to_lowercase();
        self.value.to_lowercase().contains(&needle)
            || self.display_text.to_lowercase().contains(&needle)
    }
}
