//! sectioner - split a manuscript into numbered book sections

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{debug, info};
use sectioner::{BookMeta, BookUpload, BreakPatterns, OutputFormat, SectionerConfig};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "sectioner")]
#[command(about = "Split a manuscript into word-bounded book sections", long_about = None)]
#[command(version)]
struct Args {
    /// Enable debug output
    #[arg(short, long, default_value_t = false, global = true)]
    debug: bool,

    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Segment a manuscript and print its sections
    Split(SplitArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(clap::Args, Debug)]
struct SplitArgs {
    /// Path to the manuscript (UTF-8 text)
    file: PathBuf,

    /// Comma-separated break markers (overrides the configured ones)
    #[arg(short, long)]
    breaks: Option<String>,

    /// Match break markers verbatim instead of as regex
    #[arg(long)]
    literal: bool,

    /// Book title (default: file name)
    #[arg(long)]
    title: Option<String>,

    /// Book author
    #[arg(long)]
    author: Option<String>,

    /// Book description
    #[arg(long)]
    description: Option<String>,

    /// Additional book info
    #[arg(long)]
    info: Option<String>,

    /// Output format (default: from config)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Write output here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[command(flatten)]
    limits: LimitArgs,
}

#[derive(clap::Args, Debug)]
struct LimitArgs {
    /// Maximum words per section
    #[arg(long)]
    max_words: Option<usize>,

    /// Flush a running section above this many words
    #[arg(long)]
    flush_floor: Option<usize>,

    /// Merge trailing remainders at or below this many words
    #[arg(long)]
    min_tail_words: Option<usize>,
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Print the configuration file path
    Path,
    /// Set default break markers (comma-separated)
    SetBreaks {
        /// Markers, e.g. "CHAPTER,PART"
        list: String,
        /// Match the markers verbatim instead of as regex
        #[arg(long)]
        literal: bool,
    },
    /// Set default section limits
    SetLimits {
        #[command(flatten)]
        limits: LimitArgs,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(SectionerConfig::config_path);

    match &args.command {
        Commands::Split(split) => handle_split(split, &config_path),
        Commands::Config { action } => handle_config_command(action, &config_path),
    }
}

fn load_config(path: &Path) -> Result<SectionerConfig> {
    SectionerConfig::load_from(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))
}

fn handle_split(split: &SplitArgs, config_path: &Path) -> Result<()> {
    let mut config = load_config(config_path)?;
    split.limits.apply(&mut config);

    let patterns = resolve_break_patterns(split, &config)?;

    debug!("Break patterns: {:?}", patterns.patterns());
    debug!("Limits: {:?}", config.limits);

    let meta = BookMeta {
        title: split.title.clone(),
        author: split.author.clone(),
        description: split.description.clone(),
        info: split.info.clone(),
    };

    let book = BookUpload::from_file(&split.file, meta, &patterns, &config.limits)
        .with_context(|| format!("Failed to segment {}", split.file.display()))?;

    let rendered = match split.format.unwrap_or(config.format) {
        OutputFormat::Text => render_text(&book),
        OutputFormat::Json => {
            serde_json::to_string_pretty(&book).context("Failed to serialize sections")?
        }
    };

    match &split.output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {} sections to {}", book.sections.len(), path.display());
        }
        None => println!("{}", rendered),
    }

    Ok(())
}

/// Pick the markers to split on: `--breaks` wins over the configured ones,
/// and `--literal` applies to whichever set is used.
fn resolve_break_patterns(split: &SplitArgs, config: &SectionerConfig) -> Result<BreakPatterns> {
    let literal = split.literal || config.literal_breaks;
    let patterns = match &split.breaks {
        Some(list) => BreakPatterns::from_comma_list(list, literal),
        None if split.literal => BreakPatterns::literal(config.break_patterns.as_slice()),
        None => config.break_patterns(),
    };
    patterns.context("Invalid break markers")
}

impl LimitArgs {
    /// Override configured limits with any flags given.
    fn apply(&self, config: &mut SectionerConfig) {
        if let Some(max_words) = self.max_words {
            config.limits.max_words = max_words;
        }
        if let Some(flush_floor) = self.flush_floor {
            config.limits.flush_floor = flush_floor;
        }
        if let Some(min_tail_words) = self.min_tail_words {
            config.limits.min_tail_words = min_tail_words;
        }
    }
}

/// Render a book as a plain-text section listing.
fn render_text(book: &BookUpload) -> String {
    let mut out = format!(
        "{} by {} ({} sections, ~{} words)\n",
        book.title,
        book.author,
        book.sections.len(),
        book.total_words()
    );

    for section in &book.sections {
        out.push_str(&format!(
            "\n=== Section {} ({} words) ===\n{}\n",
            section.section_number, section.word_count, section.content
        ));
    }

    out
}

fn handle_config_command(action: &ConfigAction, config_path: &Path) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = load_config(config_path)?;
            println!("Configuration file: {}", config_path.display());
            println!();
            if config.break_patterns.is_empty() {
                println!("break_patterns = (none)");
            } else {
                println!("break_patterns = {:?}", config.break_patterns);
            }
            println!("literal_breaks = {}", config.literal_breaks);
            println!("format = {:?}", config.format);
            println!("max_words = {}", config.limits.max_words);
            println!("flush_floor = {}", config.limits.flush_floor);
            println!("min_tail_words = {}", config.limits.min_tail_words);
        }
        ConfigAction::Path => {
            println!("{}", config_path.display());
        }
        ConfigAction::SetBreaks { list, literal } => {
            // Validate before saving so a bad regex never reaches the file.
            let patterns =
                BreakPatterns::from_comma_list(list, *literal).context("Invalid break markers")?;

            let mut config = load_config(config_path)?;
            config.break_patterns = list
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            config.literal_breaks = *literal;
            config.save_to(config_path)?;
            println!("Default break markers set to: {:?}", patterns.patterns());
        }
        ConfigAction::SetLimits { limits } => {
            let mut config = load_config(config_path)?;
            limits.apply(&mut config);
            config.save_to(config_path)?;
            println!(
                "Default limits set to: max_words = {}, flush_floor = {}, min_tail_words = {}",
                config.limits.max_words, config.limits.flush_floor, config.limits.min_tail_words
            );
        }
    }
    Ok(())
}
