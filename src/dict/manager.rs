use crate::checker::dictionary::{Dictionary, FrequencyTable};
use anyhow::{Context, Result};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub struct DictionaryInfo {
    pub language: String,
    pub path: PathBuf,
    pub word_count: usize,
    pub size_bytes: u64,
}

impl DictionaryInfo {
    pub fn read(language: &str, path: &Path) -> Result<Self> {
        let metadata = fs::metadata(path)
            .with_context(|| format!("Failed to stat dictionary: {}", path.display()))?;
        let dictionary = Dictionary::load_compiled(path)?;

        Ok(Self {
            language: language.to_string(),
            path: path.to_path_buf(),
            word_count: dictionary.len(),
            size_bytes: metadata.len(),
        })
    }
}

/// Compiled dictionaries found in `data_dir`, sorted by language.
pub fn installed(data_dir: &Path) -> Result<Vec<DictionaryInfo>> {
    let mut found = Vec::new();
    if !data_dir.exists() {
        return Ok(found);
    }

    for entry in fs::read_dir(data_dir)? {
        let path = entry?.path();
        if path.extension().and_then(|s| s.to_str()) != Some("dict") {
            continue;
        }
        let language = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown")
            .to_string();
        found.push(DictionaryInfo::read(&language, &path)?);
    }

    found.sort_by(|a, b| a.language.cmp(&b.language));
    Ok(found)
}

pub fn list_dictionaries() -> Result<()> {
    let data_dir = crate::config::Config::data_dir().context("Failed to get data directory")?;
    let dictionaries = installed(&data_dir)?;

    if dictionaries.is_empty() {
        println!("{}", "No dictionaries installed.".yellow());
        println!(
            "Run {} to compile one from a word list.",
            "redraft dict build en_US --words words.txt".cyan()
        );
        return Ok(());
    }

    println!("{}", "Installed dictionaries:".bold());
    println!();

    for info in &dictionaries {
        println!(
            "  {} {} ({} words, {})",
            "✓".green(),
            info.language.cyan().bold(),
            info.word_count,
            format!("{}KB", info.size_bytes / 1024).dimmed()
        );
    }

    println!();
    println!(
        "Data directory: {}",
        data_dir.display().to_string().dimmed()
    );

    Ok(())
}

/// Compile a word list (and optional frequency table) into `output`.
pub fn build_dictionary_at(
    words: &Path,
    frequencies: Option<&Path>,
    output: &Path,
) -> Result<DictionaryInfo> {
    let table = frequencies.map(FrequencyTable::from_path).transpose()?;
    let dictionary = Dictionary::load_word_list(words, table.as_ref())?;
    dictionary.save(output)?;

    let language = output
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown");
    DictionaryInfo::read(language, output)
}

pub fn build_dictionary(language: &str, words: &Path, frequencies: Option<&Path>) -> Result<()> {
    println!(
        "{} dictionary for {} from {}...",
        "Building".cyan().bold(),
        language.yellow(),
        words.display().to_string().dimmed()
    );

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message("Compiling...");

    let output = Dictionary::compiled_path(language)?;
    let info = build_dictionary_at(words, frequencies, &output);
    pb.finish_and_clear();
    let info = info?;

    println!("Found {} words", info.word_count.to_string().yellow());
    println!(
        "{} Dictionary installed: {}",
        "✓".green().bold(),
        info.path.display().to_string().cyan()
    );

    Ok(())
}

pub fn show_info(language: &str) -> Result<()> {
    let dict_path = Dictionary::compiled_path(language)?;

    if !dict_path.exists() {
        println!(
            "{} Dictionary for {} not found.",
            "✗".red().bold(),
            language.yellow()
        );
        println!(
            "Run {} to build it.",
            format!("redraft dict build {} --words <FILE>", language).cyan()
        );
        return Ok(());
    }

    let info = DictionaryInfo::read(language, &dict_path)?;

    println!("{}", format!("Dictionary: {}", info.language).bold());
    println!("  Path: {}", info.path.display());
    println!("  Size: {} KB", info.size_bytes / 1024);
    println!("  Words: {}", info.word_count);
    println!("  Format: FST map (word -> frequency)");

    Ok(())
}
