//! Validate command implementation.
//!
//! Checks a query against the schema and fails with a non-zero exit code when
//! it is invalid. Unknown categories get a "did you mean" hint.

use filterbox::query::{Expression, FilterQueryParser};
use filterbox::schema::GridSchema;
use filterbox::validate::{first_invalid, validate_text, PARSE_FAILURE_MESSAGE};

use super::schema::load_grid;
use super::{CommandContext, CommandError, Result};
use crate::output::{self, helpers::format_error_caret};

/// Executes the validate command.
///
/// # Errors
///
/// Returns [`CommandError::Invalid`] when the query does not parse or fails
/// validation.
pub fn execute(ctx: &CommandContext, query: &str) -> Result<()> {
    let grid = load_grid(ctx)?;
    let parser = FilterQueryParser::for_schema(&grid);
    let result = validate_text(query, &grid);

    if result.is_valid {
        if ctx.json_output {
            println!("{}", output::format_validation_json(query, &result, None)?);
        } else if !ctx.quiet {
            print!("{}", output::format_valid(ctx.use_colors));
        }
        return Ok(());
    }

    let forest = parser.parse(query);
    let hint = forest
        .as_ref()
        .ok()
        .and_then(|forest| similar_category(forest, &grid));

    if ctx.json_output {
        println!(
            "{}",
            output::format_validation_json(query, &result, hint.as_deref())?
        );
    } else if !ctx.quiet {
        if let Err(e) = &forest {
            eprint!("{}", format_error_caret(query, e.position(), ctx.use_colors));
        }
    }

    let message = result
        .message
        .unwrap_or_else(|| PARSE_FAILURE_MESSAGE.to_string());
    Err(CommandError::Invalid(match hint {
        Some(hint) => format!("{message} (did you mean '{hint}'?)"),
        None => message,
    }))
}

/// Suggests a known category when validation fails on an unknown one.
fn similar_category(forest: &[Expression], grid: &GridSchema) -> Option<String> {
    match first_invalid(forest, grid)? {
        Expression::Leaf { category, .. } => grid.find_similar_category(category),
        Expression::Branch { .. } => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filterbox::query::parse;
    use filterbox::schema::ColumnOption;

    fn grid() -> GridSchema {
        GridSchema::from_columns(vec![
            ColumnOption::new("column1").display_text("Column1"),
            ColumnOption::new("status"),
        ])
        .unwrap()
    }

    #[test]
    fn test_hint_for_misspelled_category() {
        let forest = parse("status == open AND colum1 == A").unwrap();
        assert_eq!(
            similar_category(&forest, &grid()),
            Some("column1".to_string())
        );
    }

    #[test]
    fn test_no_hint_when_operator_fails_first() {
        let forest = parse("status like open AND colum1 == A").unwrap();
        assert_eq!(similar_category(&forest, &grid()), None);
    }

    #[test]
    fn test_no_hint_for_distant_name() {
        let forest = parse("completely_unrelated == A").unwrap();
        assert_eq!(similar_category(&forest, &grid()), None);
    }

    #[test]
    fn test_no_hint_for_valid_query() {
        let forest = parse("(Column1 == A OR status != b)").unwrap();
        assert_eq!(similar_category(&forest, &grid()), None);
    }
}
