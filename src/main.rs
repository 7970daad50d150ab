use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::{generate, Shell};
use rayon::prelude::*;
use redraft::checker::{self, SpellChecker};
use redraft::cli::files;
use redraft::cli::output::{self, OutputFormat};
use redraft::config::Overrides;
use redraft::{diff, dict, Config};
use std::fs;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "redraft")]
#[command(version, about = "Spell checking and word-level diffs for documents", long_about = None)]
struct Cli {
    /// Files or directories to check
    #[arg(value_name = "FILES")]
    files: Vec<PathBuf>,

    /// Fix misspellings in place (auto-apply top suggestion)
    #[arg(short, long)]
    fix: bool,

    /// Interactive mode for selecting corrections
    #[arg(short, long, requires = "fix")]
    interactive: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Exit with code 0 even if errors are found
    #[arg(long)]
    no_fail: bool,

    /// Language of the compiled dictionary to use (e.g., en_US, en_GB)
    #[arg(short, long)]
    language: Option<String>,

    /// Output format (text, json)
    #[arg(short = 'o', long, default_value = "text")]
    format: OutputFormat,

    /// Word list to build the dictionary from (one word per line)
    #[arg(long, value_name = "FILE")]
    word_list: Option<PathBuf>,

    /// Tab-separated word frequency table
    #[arg(long, value_name = "FILE")]
    frequencies: Option<PathBuf>,

    /// Add words to personal dictionary
    #[arg(long)]
    add_to_dict: Vec<String>,

    /// Pattern to ignore (regex)
    #[arg(long)]
    ignore_pattern: Vec<String>,

    /// Personal dictionary file
    #[arg(long)]
    personal_dict: Option<PathBuf>,

    /// Maximum suggestions per misspelling
    #[arg(long)]
    max_suggestions: Option<usize>,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Generate shell completion script
    #[arg(long, value_name = "SHELL")]
    completion: Option<Shell>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Parser, Debug)]
enum Commands {
    /// Show a phrase-level diff between two files
    Diff {
        original: PathBuf,
        revised: PathBuf,

        /// Print raw word segments instead of phrase chunks
        #[arg(long)]
        segments: bool,

        /// Output format (text, json)
        #[arg(short = 'o', long, default_value = "text")]
        format: OutputFormat,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },
    /// Dictionary management
    Dict {
        #[command(subcommand)]
        action: DictCommands,
    },
}

#[derive(Parser, Debug)]
enum DictCommands {
    /// List installed dictionaries
    List,
    /// Compile a word list into a dictionary
    Build {
        /// Language code (e.g., en_US, en_GB, fr_FR)
        language: String,
        /// Word list, one word per line
        #[arg(long, value_name = "FILE")]
        words: PathBuf,
        /// Tab-separated word frequency table
        #[arg(long, value_name = "FILE")]
        frequencies: Option<PathBuf>,
    },
    /// Show dictionary info
    Info {
        /// Language code
        language: String,
    },
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "redraft=debug" } else { "redraft=warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Handle shell completion generation
    if let Some(shell) = cli.completion {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "redraft", &mut io::stdout());
        return Ok(());
    }

    let config = Config::load(Overrides {
        language: cli.language.clone(),
        personal_dictionary: cli.personal_dict.clone(),
        word_list: cli.word_list.clone(),
        frequency_table: cli.frequencies.clone(),
        ignore_patterns: cli.ignore_pattern.clone(),
        max_suggestions: cli.max_suggestions,
    })?;

    if let Some(command) = cli.command {
        return handle_command(command, &config);
    }

    if !cli.add_to_dict.is_empty() {
        let path = config
            .personal_dictionary
            .as_ref()
            .context("No personal dictionary location available")?;
        for word in &cli.add_to_dict {
            checker::add_to_personal_dictionary(path, word)?;
        }
        println!(
            "Added {} word(s) to {}",
            cli.add_to_dict.len(),
            path.display()
        );
        if cli.files.is_empty() {
            return Ok(());
        }
    }

    if cli.files.is_empty() {
        anyhow::bail!("No files specified. Use --help for usage information.");
    }

    let checker = SpellChecker::from_config(&config)?;
    let colored = !cli.no_color;

    let mut targets = Vec::new();
    for path in files::collect_files(&cli.files) {
        if path.exists() {
            targets.push(path);
        } else {
            eprintln!("Error: File not found: {}", path.display());
        }
    }

    let mut total_errors = 0;
    let mut total_fixed = 0;

    if cli.fix && cli.interactive {
        for path in &targets {
            total_fixed += files::fix_interactive(&checker, path, &config, colored)?.fixed_count;
        }
    } else if cli.fix {
        let results = targets
            .par_iter()
            .map(|path| files::fix_auto(&checker, path))
            .collect::<Result<Vec<_>>>()?;
        total_fixed = results.iter().map(|r| r.fixed_count).sum();
    } else {
        let results = targets
            .par_iter()
            .map(|path| files::check_file(&checker, path))
            .collect::<Result<Vec<_>>>()?;
        total_errors = results.iter().map(|r| r.error_count).sum();
        match cli.format {
            OutputFormat::Json => {
                let reports: Vec<_> = targets
                    .iter()
                    .map(|path| path.as_path())
                    .zip(&results)
                    .collect();
                output::print_json_report(&reports)?;
            }
            OutputFormat::Text => {
                for (path, result) in targets.iter().zip(&results) {
                    output::print_errors(path, result, colored);
                }
            }
        }
    }

    if cli.format == OutputFormat::Text {
        if cli.fix {
            output::print_fix_summary(total_fixed, &targets, colored);
        } else {
            output::print_check_summary(total_errors, &targets, colored);
        }
    }

    if total_errors > 0 && !cli.no_fail && !cli.fix {
        std::process::exit(1);
    }

    Ok(())
}

fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Diff {
            original,
            revised,
            segments,
            format,
            no_color,
        } => {
            let original = fs::read_to_string(&original)
                .with_context(|| format!("Failed to read file: {}", original.display()))?;
            let revised = fs::read_to_string(&revised)
                .with_context(|| format!("Failed to read file: {}", revised.display()))?;

            let word_diff = diff::compute_word_diff_with(&original, &revised, &config.diff);
            if segments {
                output::print_segments(&word_diff, !no_color, format)?;
            } else {
                let chunks = diff::group_into_phrase_chunks(&word_diff);
                output::print_chunks(&chunks, !no_color, format)?;
            }
        }
        Commands::Dict { action } => match action {
            DictCommands::List => {
                dict::manager::list_dictionaries()?;
            }
            DictCommands::Build {
                language,
                words,
                frequencies,
            } => {
                dict::manager::build_dictionary(&language, &words, frequencies.as_deref())?;
            }
            DictCommands::Info { language } => {
                dict::manager::show_info(&language)?;
            }
        },
    }
    Ok(())
}
