//! Suggestion output formatting.

use filterbox::suggest::{Completion, Slot};
use owo_colors::OwoColorize;

use super::helpers::{dim, header};

fn describe_slot(slot: &Slot) -> String {
    match slot {
        Slot::Category => "category".to_string(),
        Slot::Operator { category } => format!("operator for '{category}'"),
        Slot::Value { category } => format!("value for '{category}'"),
        Slot::Conjunction => "conjunction".to_string(),
        Slot::Unknown => "none (text does not fit the grammar)".to_string(),
    }
}

/// Formats a completion as JSON.
pub fn format_completion_json(completion: &Completion) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(completion)
}

/// Formats a completion as a table.
pub fn format_completion_table(completion: &Completion, use_colors: bool) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{} {}\n",
        header("Expecting:", use_colors),
        describe_slot(&completion.slot)
    ));
    if !completion.partial.is_empty() {
        output.push_str(&format!(
            "{} {:?} at {}..{}\n",
            header("Typed:", use_colors),
            completion.partial,
            completion.replace.start,
            completion.replace.end
        ));
    }
    output.push('\n');

    if completion.suggestions.is_empty() {
        output.push_str("No suggestions.\n");
        return output;
    }

    let heading = format!("{:<24} {:<12} {}", "Suggestion", "Kind", "Inserts");
    output.push_str(&dim(&heading, use_colors));
    output.push('\n');

    for suggestion in &completion.suggestions {
        let kind = suggestion.kind.as_str();
        let display = format!("{:<24}", suggestion.display_text);
        let display = if use_colors {
            display.bold().to_string()
        } else {
            display
        };
        output.push_str(&format!("{display} {kind:<12} {}\n", suggestion.value));
    }
    output
}
