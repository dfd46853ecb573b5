//! Recursive descent parser for filter queries.

use tracing::{debug, trace};

use super::ast::{ConditionType, Expression};
use super::error::{ParseResult, ParsedError};
use super::lexer::{Lexer, PositionedToken, Token};
use crate::schema::AutoCompleteHandler;

/// Maximum parenthesis depth before the parser gives up.
pub const MAX_NESTING_DEPTH: usize = 64;

/// Parser for filter queries.
///
/// # Grammar
///
/// ```text
/// query     ::= or_expr EOF
/// or_expr   ::= and_expr ("OR" and_expr)*
/// and_expr  ::= predicate ("AND" predicate)*
/// predicate ::= "(" or_expr ")" | category operator value
/// category  ::= IDENTIFIER
/// operator  ::= OPERATOR | IDENTIFIER
/// value     ::= IDENTIFIER | OPERATOR
/// ```
///
/// # Operator Precedence (highest to lowest)
///
/// 1. `()` - grouping
/// 2. `AND` - n-ary
/// 3. `OR` - n-ary
///
/// The operator slot is positional: whatever follows a category is taken as
/// its operator. Whether the schema allows that operator is a validation
/// question, see [`crate::validate`].
///
/// # Example
///
/// ```
/// use filterbox::query::{ConditionType, FilterQueryParser};
///
/// let parsed = FilterQueryParser::new()
///     .parse("column1 == A OR (column2 contains B AND column3 in C)")
///     .unwrap();
/// assert_eq!(parsed.len(), 1);
/// assert_eq!(parsed[0].condition_type(), Some(ConditionType::Or));
/// ```
#[derive(Debug, Clone, Default)]
pub struct FilterQueryParser {
    /// Operator words beyond the default vocabulary.
    operators: Vec<String>,
}

impl FilterQueryParser {
    /// Creates a parser with the default operator vocabulary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a parser that lexes every operator `handler` knows as an operator.
    pub fn for_schema<H: AutoCompleteHandler + ?Sized>(handler: &H) -> Self {
        Self::new().with_operators(handler.operator_vocabulary())
    }

    /// Adds operator words to the lexer vocabulary.
    pub fn with_operators<I, S>(mut self, operators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for operator in operators {
            let operator = operator.into();
            if !self.operators.contains(&operator) {
                self.operators.push(operator);
            }
        }
        self
    }

    /// Returns the extra operator words this parser recognizes.
    pub fn operators(&self) -> &[String] {
        &self.operators
    }

    /// Tokenizes `input` with this parser's vocabulary.
    pub fn tokenize(&self, input: &str) -> Vec<PositionedToken> {
        Lexer::new(input).with_operators(&self.operators).tokenize()
    }

    /// Parses a filter query into an expression forest.
    ///
    /// Empty or whitespace-only input yields an empty forest. Any other input
    /// yields exactly one root expression.
    ///
    /// # Errors
    ///
    /// Returns the first [`ParsedError`] encountered; there is no recovery.
    pub fn parse(&self, input: &str) -> ParseResult<Vec<Expression>> {
        if input.trim().is_empty() {
            return Ok(Vec::new());
        }

        let tokens = self.tokenize(input);
        trace!(tokens = tokens.len(), "tokenized filter query");

        let mut cursor = TokenCursor::new(tokens);
        let result = cursor
            .parse_or_expr()
            .and_then(|expression| cursor.expect_end().map(|()| expression));

        match result {
            Ok(expression) => {
                debug!(leaves = expression.leaf_count(), "parsed filter query");
                Ok(vec![expression])
            }
            Err(e) => {
                debug!(position = e.position(), error = %e, "filter query failed to parse");
                Err(e)
            }
        }
    }
}

/// Parses `input` with the default operator vocabulary.
///
/// # Example
///
/// ```
/// use filterbox::query::parse;
///
/// assert!(parse("").unwrap().is_empty());
/// assert!(parse("column1 ==").is_err());
/// ```
pub fn parse(input: &str) -> ParseResult<Vec<Expression>> {
    FilterQueryParser::new().parse(input)
}

/// Single-pass cursor over a token stream.
struct TokenCursor {
    tokens: Vec<PositionedToken>,
    position: usize,
    depth: usize,
}

impl TokenCursor {
    /// `tokens` must end with [`Token::Eof`].
    fn new(tokens: Vec<PositionedToken>) -> Self {
        Self {
            tokens,
            position: 0,
            depth: 0,
        }
    }

    /// Returns the current token without consuming it. Sticks at EOF.
    fn peek(&self) -> &PositionedToken {
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[self.position.min(last)]
    }

    /// Consumes and returns the current token.
    fn advance(&mut self) -> PositionedToken {
        let token = self.peek().clone();
        if self.position < self.tokens.len() {
            self.position += 1;
        }
        token
    }

    /// Checks if the current token is the given conjunction.
    fn check_conjunction(&self, kind: ConditionType) -> bool {
        self.peek().token == Token::Conjunction(kind)
    }

    /// Fails unless every token has been consumed.
    fn expect_end(&self) -> ParseResult<()> {
        let current = self.peek();
        match &current.token {
            Token::Eof => Ok(()),
            Token::CloseParen => Err(ParsedError::UnmatchedParenthesis {
                position: current.position,
            }),
            other => Err(ParsedError::unexpected_token(
                other.to_string(),
                current.position,
            )),
        }
    }

    /// Parses OR expressions: `and_expr ("OR" and_expr)*`
    fn parse_or_expr(&mut self) -> ParseResult<Expression> {
        let mut operands = vec![self.parse_and_expr()?];

        while self.check_conjunction(ConditionType::Or) {
            self.advance(); // consume OR
            operands.push(self.parse_and_expr()?);
        }

        Ok(Expression::group(ConditionType::Or, operands))
    }

    /// Parses AND expressions: `predicate ("AND" predicate)*`
    fn parse_and_expr(&mut self) -> ParseResult<Expression> {
        let mut operands = vec![self.parse_predicate()?];

        while self.check_conjunction(ConditionType::And) {
            self.advance(); // consume AND
            operands.push(self.parse_predicate()?);
        }

        Ok(Expression::group(ConditionType::And, operands))
    }

    /// Parses `"(" or_expr ")" | category operator value`
    fn parse_predicate(&mut self) -> ParseResult<Expression> {
        let current = self.advance();

        match current.token {
            Token::OpenParen => self.parse_group(current.position),
            Token::Identifier(category) => {
                let operator = self.parse_operand("operator")?;
                let value = self.parse_operand("value")?;
                Ok(Expression::Leaf {
                    category,
                    operator,
                    value: Some(value),
                })
            }
            Token::Eof => Err(ParsedError::unexpected_end("category", current.position)),
            Token::CloseParen if self.depth == 0 => Err(ParsedError::UnmatchedParenthesis {
                position: current.position,
            }),
            other => Err(ParsedError::unexpected_token(
                other.to_string(),
                current.position,
            )),
        }
    }

    /// Parses the body of a parenthesized group whose `(` is at `open`.
    fn parse_group(&mut self, open: usize) -> ParseResult<Expression> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(ParsedError::NestingTooDeep {
                max_depth: MAX_NESTING_DEPTH,
                position: open,
            });
        }

        self.depth += 1;
        let inner = self.parse_or_expr()?;
        self.depth -= 1;

        let closing = self.advance();
        match closing.token {
            Token::CloseParen => Ok(inner),
            Token::Eof => Err(ParsedError::UnclosedParenthesis { position: open }),
            other => Err(ParsedError::unexpected_token(
                other.to_string(),
                closing.position,
            )),
        }
    }

    /// Parses an operator or value slot. Both accept any word token.
    fn parse_operand(&mut self, expected: &'static str) -> ParseResult<String> {
        let current = self.advance();
        match current.token {
            Token::Identifier(text) | Token::Operator(text) => Ok(text),
            Token::Eof => Err(ParsedError::unexpected_end(expected, current.position)),
            other => Err(ParsedError::unexpected_token(
                other.to_string(),
                current.position,
            )),
        }
    }
}
