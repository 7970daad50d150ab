use crate::SpellError;
use anyhow::Result;
use colored::*;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Select;

/// What the user decided for one misspelling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choice {
    Replace(String),
    Skip,
    /// Ignore the word for the rest of this run.
    Ignore,
    AddToDictionary,
    Quit,
}

/// Ask how to handle `error`. Escape counts as skipping.
pub fn ask(error: &SpellError, colored: bool) -> Result<Choice> {
    if colored {
        println!(
            "\n{} {}:{}",
            "Misspelling found:".yellow().bold(),
            error.line.to_string().blue(),
            error.column.to_string().blue()
        );
        println!(
            "  {}",
            error
                .context
                .replacen(&error.word, &error.word.red().bold().to_string(), 1)
        );
    } else {
        println!("\nMisspelling found: {}:{}", error.line, error.column);
        println!("  {}", error.context);
    }

    let items = menu_items(&error.suggestions);
    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(format!("Replace \"{}\" with", error.word))
        .items(&items)
        .default(0)
        .interact_opt()?;

    Ok(selection.map_or(Choice::Skip, |idx| choice_for(&error.suggestions, idx)))
}

fn menu_items(suggestions: &[String]) -> Vec<String> {
    let mut items: Vec<String> = suggestions.to_vec();
    items.extend(
        ["Skip", "Ignore everywhere", "Add to dictionary", "Quit"]
            .iter()
            .map(|s| s.to_string()),
    );
    items
}

fn choice_for(suggestions: &[String], idx: usize) -> Choice {
    if let Some(suggestion) = suggestions.get(idx) {
        return Choice::Replace(suggestion.clone());
    }
    match idx - suggestions.len() {
        0 => Choice::Skip,
        1 => Choice::Ignore,
        2 => Choice::AddToDictionary,
        _ => Choice::Quit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_maps_to_choices() {
        let suggestions = vec!["quick".to_string(), "quack".to_string()];
        assert_eq!(menu_items(&suggestions).len(), 6);
        assert_eq!(choice_for(&suggestions, 1), Choice::Replace("quack".to_string()));
        assert_eq!(choice_for(&suggestions, 2), Choice::Skip);
        assert_eq!(choice_for(&suggestions, 3), Choice::Ignore);
        assert_eq!(choice_for(&suggestions, 4), Choice::AddToDictionary);
        assert_eq!(choice_for(&suggestions, 5), Choice::Quit);
    }
}
