//! Lexer (tokenizer) for filter queries.

use std::fmt;

use super::ast::ConditionType;

/// Operator keywords every category accepts unless it declares its own set.
pub const DEFAULT_OPERATORS: &[&str] = &["==", "!=", "<>", "contains", "!contains", "in"];

/// Characters that form comparison operators and split words apart.
const COMPARISON_CHARS: &[char] = &['=', '!', '<', '>'];

/// A token with its byte span in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionedToken {
    /// The token.
    pub token: Token,
    /// The byte position where the token starts (0-indexed).
    pub position: usize,
    /// The byte position just past the token.
    pub end: usize,
}

/// A token in a filter query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A category name or a bare value. Quoted strings always lex as identifiers.
    Identifier(String),

    /// A comparison keyword such as `==` or `contains`.
    Operator(String),

    /// Opening parenthesis `(`.
    OpenParen,

    /// Closing parenthesis `)`.
    CloseParen,

    /// `AND` or `OR`, in any letter case.
    Conjunction(ConditionType),

    /// End of input. Always the last token.
    Eof,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Identifier(text) | Token::Operator(text) => f.write_str(text),
            Token::OpenParen => f.write_str("("),
            Token::CloseParen => f.write_str(")"),
            Token::Conjunction(kind) => f.write_str(kind.keyword()),
            Token::Eof => f.write_str("end of input"),
        }
    }
}

/// Lexer for tokenizing filter queries.
///
/// Lexing never fails: characters the grammar has no use for end up inside
/// an identifier or operator token and the parser rejects them later.
pub struct Lexer<'a> {
    input: &'a str,
    /// Current byte position in the input string.
    position: usize,
    /// Operator words beyond [`DEFAULT_OPERATORS`].
    extra_operators: &'a [String],
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input string.
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            position: 0,
            extra_operators: &[],
        }
    }

    /// Adds operator words (typically a schema's custom operators) that
    /// should lex as [`Token::Operator`] rather than [`Token::Identifier`].
    pub fn with_operators(mut self, operators: &'a [String]) -> Self {
        self.extra_operators = operators;
        self
    }

    /// Peeks at the next character without consuming it.
    fn peek(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    /// Peeks at the character after the next one.
    fn peek_second(&self) -> Option<char> {
        self.input[self.position..].chars().nth(1)
    }

    /// Consumes and returns the next character, updating position.
    fn next_char(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.position += c.len_utf8();
        Some(c)
    }

    /// Skips whitespace characters.
    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.next_char();
            } else {
                break;
            }
        }
    }

    /// Reads a quoted string (single or double quotes), unescaping it.
    ///
    /// An unterminated string runs to the end of input.
    fn read_quoted_string(&mut self, quote_char: char) -> String {
        // Consume the opening quote
        self.next_char();

        let mut result = String::new();
        while let Some(c) = self.next_char() {
            if c == quote_char {
                break;
            }
            if c == '\\' {
                if let Some(escaped) = self.next_char() {
                    result.push(escaped);
                }
            } else {
                result.push(c);
            }
        }
        result
    }

    /// Returns true for characters that end a word.
    fn is_delimiter(c: char) -> bool {
        c.is_whitespace() || matches!(c, '(' | ')' | '"' | '\'')
    }

    /// Byte length of the longest known operator starting at the current
    /// position, if it ends on a word boundary.
    ///
    /// A symbolic operator such as `=~` may also be glued to the word after
    /// it (`name=~Jo`); a word operator such as `in` may not (`inx`).
    fn operator_at_position(&self) -> Option<usize> {
        let rest = &self.input[self.position..];
        DEFAULT_OPERATORS
            .iter()
            .copied()
            .chain(self.extra_operators.iter().map(String::as_str))
            .filter(|op| !op.is_empty() && rest.starts_with(op))
            .filter(|op| match rest[op.len()..].chars().next() {
                None => true,
                Some(c) if Self::is_delimiter(c) => true,
                Some(c) => c.is_alphanumeric() && !op.chars().any(char::is_alphanumeric),
            })
            .map(str::len)
            .max()
    }

    /// Reads a bare word. Known operators are taken whole. Otherwise runs of
    /// comparison characters split from their neighbours, except a `!` glued
    /// to a following letter (`!contains`).
    fn read_word(&mut self) -> &'a str {
        let start = self.position;
        let input = self.input;

        if let Some(len) = self.operator_at_position() {
            self.position += len;
            return &input[start..self.position];
        }

        let first = self.peek();
        let negated_word =
            first == Some('!') && self.peek_second().is_some_and(char::is_alphabetic);

        if first.is_some_and(|c| COMPARISON_CHARS.contains(&c)) && !negated_word {
            while let Some(c) = self.peek() {
                if !COMPARISON_CHARS.contains(&c) {
                    break;
                }
                self.next_char();
            }
        } else {
            if negated_word {
                self.next_char();
            }
            while let Some(c) = self.peek() {
                if Self::is_delimiter(c) || COMPARISON_CHARS.contains(&c) {
                    break;
                }
                // A symbolic operator glued to the end of a word (`name^=Jo`)
                if self.position > start
                    && !c.is_alphanumeric()
                    && self.operator_at_position().is_some()
                {
                    break;
                }
                self.next_char();
            }
        }

        &input[start..self.position]
    }

    /// Classifies a bare word.
    fn classify(&self, word: &str) -> Token {
        if let Some(kind) = ConditionType::from_keyword(word) {
            return Token::Conjunction(kind);
        }
        let is_keyword = DEFAULT_OPERATORS.contains(&word)
            || self.extra_operators.iter().any(|op| op == word);
        if is_keyword || !word.chars().any(char::is_alphanumeric) {
            Token::Operator(word.to_string())
        } else {
            Token::Identifier(word.to_string())
        }
    }

    /// Returns the next token with its span, or None at end of input.
    pub fn next_token(&mut self) -> Option<PositionedToken> {
        self.skip_whitespace();

        let c = self.peek()?;
        let token_start = self.position;

        let token = match c {
            '(' => {
                self.next_char();
                Token::OpenParen
            }
            ')' => {
                self.next_char();
                Token::CloseParen
            }
            '"' | '\'' => Token::Identifier(self.read_quoted_string(c)),
            _ => {
                let word = self.read_word();
                self.classify(word)
            }
        };

        Some(PositionedToken {
            token,
            position: token_start,
            end: self.position,
        })
    }

    /// Collects all tokens, terminated by [`Token::Eof`].
    pub fn tokenize(mut self) -> Vec<PositionedToken> {
        let mut tokens = Vec::new();
        while let Some(positioned_token) = self.next_token() {
            tokens.push(positioned_token);
        }
        tokens.push(PositionedToken {
            token: Token::Eof,
            position: self.input.len(),
            end: self.input.len(),
        });
        tokens
    }
}

/// Tokenizes `input` with the default operator vocabulary.
///
/// # Example
///
/// ```
/// use filterbox::query::{tokenize, Token};
///
/// let tokens = tokenize("column1 == ABC");
/// assert_eq!(tokens[1].token, Token::Operator("==".to_string()));
/// assert_eq!(tokens.last().map(|t| &t.token), Some(&Token::Eof));
/// ```
pub fn tokenize(input: &str) -> Vec<PositionedToken> {
    Lexer::new(input).tokenize()
}
