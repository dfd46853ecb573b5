//! Query output formatting.

use filterbox::query::{format_query, Expression, PositionedToken, Token};
use filterbox::validate::ValidationResult;
use owo_colors::OwoColorize;
use serde::Serialize;

use super::helpers::{dim, header};

/// JSON output structure for the parse command.
#[derive(Serialize)]
pub struct ParseOutput<'a> {
    pub canonical: String,
    pub expressions: &'a [Expression],
}

/// JSON output structure for a single token.
#[derive(Serialize)]
pub struct TokenOutput {
    pub kind: &'static str,
    pub text: String,
    pub start: usize,
    pub end: usize,
}

/// JSON output structure for the validate command.
#[derive(Serialize)]
pub struct ValidationOutput<'a> {
    pub query: &'a str,
    #[serde(flatten)]
    pub result: &'a ValidationResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<&'a str>,
}

fn token_kind(token: &Token) -> &'static str {
    match token {
        Token::Identifier(_) => "identifier",
        Token::Operator(_) => "operator",
        Token::OpenParen => "open_paren",
        Token::CloseParen => "close_paren",
        Token::Conjunction(_) => "conjunction",
        Token::Eof => "eof",
    }
}

/// Formats a parsed forest as JSON.
pub fn format_parse_json(forest: &[Expression]) -> Result<String, serde_json::Error> {
    let output = ParseOutput {
        canonical: format_query(forest),
        expressions: forest,
    };
    serde_json::to_string_pretty(&output)
}

/// Formats a parsed forest as canonical text followed by an indented tree.
pub fn format_parse_table(forest: &[Expression], use_colors: bool) -> String {
    if forest.is_empty() {
        return "Empty query.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format_query(forest));
    output.push_str("\n\n");

    for root in forest {
        write_node(&mut output, root, "", None, use_colors);
    }
    output
}

/// Writes one tree node. `last` is None for roots, else whether the node is
/// the last child of its parent.
fn write_node(
    output: &mut String,
    expression: &Expression,
    prefix: &str,
    last: Option<bool>,
    use_colors: bool,
) {
    let (branch, child_prefix) = match last {
        None => (String::new(), String::new()),
        Some(true) => (format!("{prefix}└── "), format!("{prefix}    ")),
        Some(false) => (format!("{prefix}├── "), format!("{prefix}│   ")),
    };

    match expression {
        Expression::Leaf { .. } => {
            output.push_str(&format!("{}{expression}\n", dim(&branch, use_colors)));
        }
        Expression::Branch {
            condition_type,
            expressions,
        } => {
            let keyword = condition_type.keyword();
            let keyword = if use_colors {
                keyword.cyan().bold().to_string()
            } else {
                keyword.to_string()
            };
            output.push_str(&format!("{}{keyword}\n", dim(&branch, use_colors)));

            for (index, child) in expressions.iter().enumerate() {
                let is_last = index + 1 == expressions.len();
                write_node(output, child, &child_prefix, Some(is_last), use_colors);
            }
        }
    }
}

/// Formats tokens as JSON.
pub fn format_tokens_json(tokens: &[PositionedToken]) -> Result<String, serde_json::Error> {
    let output: Vec<TokenOutput> = tokens
        .iter()
        .map(|t| TokenOutput {
            kind: token_kind(&t.token),
            text: t.token.to_string(),
            start: t.position,
            end: t.end,
        })
        .collect();
    serde_json::to_string_pretty(&output)
}

/// Formats tokens as a table.
pub fn format_tokens_table(tokens: &[PositionedToken], use_colors: bool) -> String {
    let mut output = String::new();

    let heading = format!("{:<8} {:<12} {}", "Span", "Kind", "Text");
    output.push_str(&dim(&heading, use_colors));
    output.push('\n');

    for token in tokens {
        let span = format!("{}..{}", token.position, token.end);
        output.push_str(&format!(
            "{:<8} {:<12} {}\n",
            span,
            token_kind(&token.token),
            token.token
        ));
    }
    output
}

/// Formats a validation result as JSON.
pub fn format_validation_json(
    query: &str,
    result: &ValidationResult,
    hint: Option<&str>,
) -> Result<String, serde_json::Error> {
    let output = ValidationOutput {
        query,
        result,
        hint,
    };
    serde_json::to_string_pretty(&output)
}

/// Formats a passing validation.
pub fn format_valid(use_colors: bool) -> String {
    format!("{}\n", header("✓ valid", use_colors))
}
