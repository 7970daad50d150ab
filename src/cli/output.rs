use crate::diff::{DiffSegment, PhraseChunk, SegmentKind};
use crate::{CheckResult, SpellError};
use anyhow::Result;
use colored::*;
use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Serialize)]
struct JsonError<'a> {
    file: String,
    line: usize,
    column: usize,
    word: &'a str,
    suggestions: &'a [String],
    context: &'a str,
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    files_checked: usize,
    total_errors: usize,
    errors: Vec<JsonError<'a>>,
}

/// Print the misspellings of one file as an indented block under its path.
pub fn print_errors(file_path: &Path, result: &CheckResult, colored_output: bool) {
    if result.errors.is_empty() {
        return;
    }

    let file_name = file_path.display().to_string();
    if colored_output {
        println!("\n{}", file_name.bold().underline());
    } else {
        println!("\n{}", file_name);
    }

    for error in &result.errors {
        println!("  {}", error_line(error, colored_output));
        if !error.suggestions.is_empty() {
            println!("    {}", suggestion_line(&error.suggestions, colored_output));
        }
    }
}

fn error_line(error: &SpellError, colored_output: bool) -> String {
    let location = format!("{}:{}", error.line, error.column);
    if !colored_output {
        return format!("{} {} {}", location, error.word, error.context);
    }

    let marked = error.word.red().bold().to_string();
    format!(
        "{} {} {}",
        location.blue().bold(),
        marked,
        error.context.replacen(&error.word, &marked, 1)
    )
}

fn suggestion_line(suggestions: &[String], colored_output: bool) -> String {
    if !colored_output {
        return format!("→ {}", suggestions.join(", "));
    }

    let listed = suggestions
        .iter()
        .map(|s| s.green().to_string())
        .collect::<Vec<_>>()
        .join(&", ".dimmed().to_string());
    format!("{} {}", "→".dimmed(), listed)
}

/// Print every file's misspellings as one JSON document.
pub fn print_json_report(reports: &[(&Path, &CheckResult)]) -> Result<()> {
    let errors = reports
        .iter()
        .flat_map(|(path, result)| {
            result.errors.iter().map(move |e| JsonError {
                file: path.display().to_string(),
                line: e.line,
                column: e.column,
                word: &e.word,
                suggestions: &e.suggestions,
                context: &e.context,
            })
        })
        .collect();

    let report = JsonReport {
        files_checked: reports.len(),
        total_errors: reports.iter().map(|(_, r)| r.error_count).sum(),
        errors,
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn plural(count: usize, singular: &'static str, plural: &'static str) -> &'static str {
    if count == 1 {
        singular
    } else {
        plural
    }
}

fn summary_line(files: usize, counted: usize, noun: &str, verb: &str, failed: bool) -> String {
    let mark = if failed { "✗" } else { "✓" };
    format!(
        "{} {} {} {} {} {}",
        mark,
        counted,
        noun,
        verb,
        files,
        plural(files, "file", "files")
    )
}

pub fn print_check_summary(total_errors: usize, files: &[impl AsRef<Path>], colored: bool) {
    println!();
    let line = if total_errors == 0 {
        "✓ No spelling errors found!".to_string()
    } else {
        summary_line(
            files.len(),
            total_errors,
            plural(total_errors, "error", "errors"),
            "found in",
            true,
        )
    };

    match (colored, total_errors) {
        (false, _) => println!("{}", line),
        (true, 0) => println!("{}", line.green().bold()),
        (true, _) => println!("{}", line.red().bold()),
    }
}

pub fn print_fix_summary(total_fixed: usize, files: &[impl AsRef<Path>], colored: bool) {
    println!();
    let line = if total_fixed == 0 {
        "No corrections needed!".to_string()
    } else {
        summary_line(
            files.len(),
            total_fixed,
            plural(total_fixed, "correction", "corrections"),
            "applied to",
            false,
        )
    };

    if colored {
        println!("{}", line.green().bold());
    } else {
        println!("{}", line);
    }
}

/// Render phrase chunks inline, marking changes as `[-old-]{+new+}` when
/// color is off.
pub fn print_chunks(chunks: &[PhraseChunk], colored_output: bool, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(chunks)?);
        return Ok(());
    }

    let mut out = String::new();
    for chunk in chunks {
        match chunk {
            PhraseChunk::Equal { text } => out.push_str(text),
            PhraseChunk::Change { deleted, inserted } => {
                out.push_str(&render_deleted(deleted, colored_output));
                out.push_str(&render_inserted(inserted, colored_output));
            }
        }
    }
    println!("{}", out);

    let changes = chunks.iter().filter(|c| c.is_change()).count();
    let change_word = if changes == 1 { "change" } else { "changes" };
    if colored_output {
        println!("\n{} {}", changes.to_string().cyan().bold(), change_word);
    } else {
        println!("\n{} {}", changes, change_word);
    }
    Ok(())
}

pub fn print_segments(segments: &[DiffSegment], colored_output: bool, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(segments)?);
        return Ok(());
    }

    let out: String = segments
        .iter()
        .map(|segment| match segment.kind {
            SegmentKind::Equal => segment.text.clone(),
            SegmentKind::Delete => render_deleted(&segment.text, colored_output),
            SegmentKind::Insert => render_inserted(&segment.text, colored_output),
        })
        .collect();
    println!("{}", out);
    Ok(())
}

fn render_deleted(text: &str, colored_output: bool) -> String {
    match (text.is_empty(), colored_output) {
        (true, _) => String::new(),
        (false, true) => text.red().strikethrough().to_string(),
        (false, false) => format!("[-{}-]", text),
    }
}

fn render_inserted(text: &str, colored_output: bool) -> String {
    match (text.is_empty(), colored_output) {
        (true, _) => String::new(),
        (false, true) => text.green().underline().to_string(),
        (false, false) => format!("{{+{}+}}", text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!("text".parse::<OutputFormat>(), Ok(OutputFormat::Text));
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_plain_error_lines() {
        let error = SpellError {
            word: "qick".to_string(),
            line: 3,
            column: 5,
            context: "The qick fox".to_string(),
            suggestions: vec!["quick".to_string(), "quack".to_string()],
        };
        assert_eq!(error_line(&error, false), "3:5 qick The qick fox");
        assert_eq!(suggestion_line(&error.suggestions, false), "→ quick, quack");
    }

    #[test]
    fn test_summary_lines() {
        assert_eq!(
            summary_line(1, 1, "error", "found in", true),
            "✗ 1 error found in 1 file"
        );
        assert_eq!(
            summary_line(3, 2, "corrections", "applied to", false),
            "✓ 2 corrections applied to 3 files"
        );
    }

    #[test]
    fn test_plain_markers() {
        assert_eq!(render_deleted("cat", false), "[-cat-]");
        assert_eq!(render_inserted("dog", false), "{+dog+}");
        assert_eq!(render_inserted("", false), "");
    }
}
