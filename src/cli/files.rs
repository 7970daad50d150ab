use crate::checker::{self, SpellChecker};
use crate::cli::prompt::{self, Choice};
use crate::{CheckResult, Config, SpellError};
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

const TEXT_EXTENSIONS: &[&str] = &["txt", "text", "md", "markdown", "rst", "adoc"];

/// Expand directories into the text files beneath them. Paths given
/// explicitly are kept whatever their extension.
pub fn collect_files(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for path in paths {
        if !path.is_dir() {
            files.push(path.clone());
            continue;
        }

        for entry in WalkDir::new(path)
            .follow_links(false)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let is_text = entry
                .path()
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| TEXT_EXTENSIONS.contains(&ext.to_lowercase().as_str()));
            if is_text {
                files.push(entry.into_path());
            }
        }
    }

    files
}

fn read(file_path: &Path) -> Result<String> {
    fs::read_to_string(file_path)
        .with_context(|| format!("Failed to read file: {}", file_path.display()))
}

pub fn check_file(checker: &SpellChecker, file_path: &Path) -> Result<CheckResult> {
    let content = read(file_path)?;

    let errors: Vec<SpellError> = checker
        .check_text(&content)
        .iter()
        .map(|result| SpellError::locate(&content, result))
        .collect();
    debug!(file = %file_path.display(), errors = errors.len(), "file checked");

    Ok(CheckResult {
        error_count: errors.len(),
        fixed_count: 0,
        errors,
    })
}

/// Replace every misspelling with its top suggestion.
pub fn fix_auto(checker: &SpellChecker, file_path: &Path) -> Result<CheckResult> {
    let mut content = read(file_path)?;
    let mut fixed_count = 0;

    // Back to front, so earlier offsets stay valid.
    for result in checker.check_text(&content).iter().rev() {
        if let Some(top_suggestion) = result.suggestions.first() {
            content = checker::apply_correction(&content, result, top_suggestion)?;
            fixed_count += 1;
        }
    }

    if fixed_count > 0 {
        fs::write(file_path, &content)
            .with_context(|| format!("Failed to write file: {}", file_path.display()))?;
    }

    Ok(CheckResult {
        error_count: 0,
        fixed_count,
        errors: Vec::new(),
    })
}

/// Prompt for each misspelling in turn, then write the chosen corrections.
pub fn fix_interactive(
    checker: &SpellChecker,
    file_path: &Path,
    config: &Config,
    colored: bool,
) -> Result<CheckResult> {
    let content = read(file_path)?;
    let results = checker.check_text(&content);

    let mut replacements = Vec::new();
    let mut dismissed: HashSet<String> = HashSet::new();

    for result in &results {
        let lower = result.word.to_lowercase();
        if dismissed.contains(&lower) {
            continue;
        }

        match prompt::ask(&SpellError::locate(&content, result), colored)? {
            Choice::Replace(replacement) => replacements.push((result, replacement)),
            Choice::Skip => {}
            Choice::Ignore => {
                dismissed.insert(lower);
            }
            Choice::AddToDictionary => {
                if let Some(personal_dict_path) = &config.personal_dictionary {
                    checker::add_to_personal_dictionary(personal_dict_path, &result.word)?;
                }
                dismissed.insert(lower);
            }
            Choice::Quit => break,
        }
    }

    let mut new_content = content;
    for (result, replacement) in replacements.iter().rev() {
        new_content = checker::apply_correction(&new_content, result, replacement)?;
    }

    let fixed_count = replacements.len();
    if fixed_count > 0 {
        fs::write(file_path, new_content)
            .with_context(|| format!("Failed to write file: {}", file_path.display()))?;
    }

    Ok(CheckResult {
        error_count: 0,
        fixed_count,
        errors: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn checker() -> SpellChecker {
        let mut checker = SpellChecker::new();
        checker
            .load_dictionary(["the", "quick", "brown", "fox"])
            .unwrap();
        checker
    }

    #[test]
    fn test_check_file_locates_errors() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "the fox\nthe qick brwn fox\n").unwrap();

        let result = check_file(&checker(), &path).unwrap();
        assert_eq!(result.error_count, 2);
        assert_eq!(result.errors[0].line, 2);
        assert_eq!(result.errors[0].column, 5);
        assert_eq!(result.errors[1].word, "brwn");
    }

    #[test]
    fn test_fix_auto_rewrites_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "The qick brwn fox").unwrap();

        let result = fix_auto(&checker(), &path).unwrap();
        assert_eq!(result.fixed_count, 2);
        assert_eq!(fs::read_to_string(&path).unwrap(), "The quick brown fox");
    }

    #[test]
    fn test_collect_files_walks_directories() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        fs::write(dir.path().join("sub").join("b.md"), "b").unwrap();
        fs::write(dir.path().join("sub").join("c.bin"), "c").unwrap();

        let mut files = collect_files(&[dir.path().to_path_buf()]);
        files.sort();
        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("a.txt"));
        assert!(files[1].ends_with("sub/b.md"));
    }
}
