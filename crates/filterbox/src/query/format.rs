//! Canonical text form of expression trees.
//!
//! The output re-parses to an equal tree for anything the parser produced:
//! nested groups are always parenthesized, and names or values that would not
//! lex back as a single word are double-quoted.

use std::fmt;

use super::ast::{ConditionType, Expression};
use super::lexer::{Lexer, Token};

/// Which slot of a predicate a word is printed in.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Slot {
    Category,
    Operator,
    Value,
}

/// Returns true if `text` lexes back as one bare word valid in `slot`, given
/// the extra operator words the reading parser knows.
fn is_bare_word(text: &str, slot: Slot, operators: &[String]) -> bool {
    let tokens = Lexer::new(text).with_operators(operators).tokenize();
    let [first, eof] = tokens.as_slice() else {
        return false;
    };
    if first.position != 0 || first.end != text.len() || eof.token != Token::Eof {
        return false;
    }
    match &first.token {
        Token::Identifier(word) => word == text,
        Token::Operator(word) => slot != Slot::Category && word == text,
        _ => false,
    }
}

fn write_word(
    f: &mut fmt::Formatter<'_>,
    text: &str,
    slot: Slot,
    operators: &[String],
) -> fmt::Result {
    if is_bare_word(text, slot, operators) {
        return f.write_str(text);
    }
    f.write_str("\"")?;
    for c in text.chars() {
        if c == '"' || c == '\\' {
            f.write_str("\\")?;
        }
        write!(f, "{c}")?;
    }
    f.write_str("\"")
}

/// Adapter so a single word can be rendered through [`write_word`].
struct Word<'a>(&'a str, Slot, &'a [String]);

impl fmt::Display for Word<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_word(f, self.0, self.1, self.2)
    }
}

/// Returns `name` as it must be typed in category position for a parser
/// that knows `operators`.
pub(crate) fn category_literal(name: &str, operators: &[String]) -> String {
    Word(name, Slot::Category, operators).to_string()
}

/// Returns `text` as it must be typed in operator or value position for a
/// parser that knows `operators`.
pub(crate) fn value_literal(text: &str, operators: &[String]) -> String {
    Word(text, Slot::Value, operators).to_string()
}

fn write_group(
    f: &mut fmt::Formatter<'_>,
    condition_type: ConditionType,
    expressions: &[Expression],
) -> fmt::Result {
    for (index, child) in expressions.iter().enumerate() {
        if index > 0 {
            write!(f, " {condition_type} ")?;
        }
        if child.is_leaf() {
            write!(f, "{child}")?;
        } else {
            write!(f, "({child})")?;
        }
    }
    Ok(())
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Leaf {
                category,
                operator,
                value,
            } => {
                write_word(f, category, Slot::Category, &[])?;
                f.write_str(" ")?;
                write_word(f, operator, Slot::Operator, &[])?;
                if let Some(value) = value {
                    f.write_str(" ")?;
                    write_word(f, value, Slot::Value, &[])?;
                }
                Ok(())
            }
            Expression::Branch {
                condition_type,
                expressions,
            } => write_group(f, *condition_type, expressions),
        }
    }
}

/// Formats an expression forest as a single query string.
///
/// Parsed forests hold at most one root. Longer hand-built forests are joined
/// with `AND`, the same way the validator treats them as a list of
/// independent requirements.
///
/// # Example
///
/// ```
/// use filterbox::query::{format_query, parse};
///
/// let forest = parse("a==1 or (b contains \"x y\" and c in z)").unwrap();
/// assert_eq!(format_query(&forest), "a == 1 OR (b contains \"x y\" AND c in z)");
/// ```
pub fn format_query(forest: &[Expression]) -> String {
    match forest {
        [] => String::new(),
        [only] => only.to_string(),
        _ => {
            let mut out = String::new();
            for (index, expression) in forest.iter().enumerate() {
                if index > 0 {
                    out.push_str(" AND ");
                }
                if expression.is_leaf() {
                    out.push_str(&expression.to_string());
                } else {
                    out.push('(');
                    out.push_str(&expression.to_string());
                    out.push(')');
                }
            }
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_leaf() {
        let expr = Expression::leaf("column1", "==", Some("ABC"));
        assert_eq!(expr.to_string(), "column1 == ABC");
    }

    #[test]
    fn test_format_leaf_without_value() {
        let expr = Expression::leaf("column1", "==", None::<String>);
        assert_eq!(expr.to_string(), "column1 ==");
    }

    #[test]
    fn test_format_quotes_values_with_spaces() {
        let expr = Expression::leaf("name", "==", Some("John Smith"));
        assert_eq!(expr.to_string(), "name == \"John Smith\"");
    }

    #[test]
    fn test_format_quotes_keywords() {
        let expr = Expression::leaf("and", "==", Some("OR"));
        assert_eq!(expr.to_string(), "\"and\" == \"OR\"");
    }

    #[test]
    fn test_format_quotes_operator_like_category() {
        let expr = Expression::leaf("in", "==", Some("x"));
        assert_eq!(expr.to_string(), "\"in\" == x");
    }

    #[test]
    fn test_format_operator_like_value_stays_bare() {
        let expr = Expression::leaf("a", "==", Some("**"));
        assert_eq!(expr.to_string(), "a == **");
    }

    #[test]
    fn test_format_escapes_quotes() {
        let expr = Expression::leaf("a", "==", Some("say \"hi\""));
        assert_eq!(expr.to_string(), r#"a == "say \"hi\"""#);
    }

    #[test]
    fn test_format_empty_value_is_quoted() {
        let expr = Expression::leaf("a", "==", Some(""));
        assert_eq!(expr.to_string(), "a == \"\"");
    }

    #[test]
    fn test_format_nested_groups_parenthesized() {
        let expr = Expression::and(vec![
            Expression::or(vec![
                Expression::leaf("a", "==", Some("1")),
                Expression::leaf("b", "==", Some("2")),
            ]),
            Expression::leaf("c", "==", Some("3")),
        ]);
        assert_eq!(expr.to_string(), "(a == 1 OR b == 2) AND c == 3");
    }

    #[test]
    fn test_format_empty_branch() {
        assert_eq!(Expression::or(vec![]).to_string(), "");
    }

    #[test]
    fn test_format_query_empty_forest() {
        assert_eq!(format_query(&[]), "");
    }

    #[test]
    fn test_format_query_joins_forest_with_and() {
        let forest = vec![
            Expression::leaf("a", "==", Some("1")),
            Expression::or(vec![
                Expression::leaf("b", "==", Some("2")),
                Expression::leaf("c", "==", Some("3")),
            ]),
        ];
        assert_eq!(format_query(&forest), "a == 1 AND (b == 2 OR c == 3)");
    }
}
