//! CLI argument definitions for quoterace.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `quote` | Race every source and print one record |
//! | `sources` | List registered sources |
//! | `rate` | Rate a record by id |
//! | `ratings` | List or remove ratings |
//! | `cache` | Inspect or clear the record cache |
//! | `slideshow` | Show, change, or play the slideshow |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `json` | Output format (json, text) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--data-dir` | `QUOTERACE_DATA_DIR` or `.quoterace` | Directory for persisted state |
//! | `--timeout-ms` | `QUOTERACE_TIMEOUT_MS` or `5000` | Race deadline in ms |
//!
//! # Examples
//!
//! ```bash
//! quoterace quote --format text
//! quoterace quote --timeout-ms 800 --pretty
//! quoterace rate 420 5
//! quoterace slideshow set --interval 10
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Quoterace - race quote sources, keep the fastest answer
#[derive(Debug, Parser)]
#[command(
    name = "quoterace",
    author,
    version,
    about = "Race several quote sources and print the fastest valid answer",
    long_about = "Quoterace asks every configured quote source at once and prints the first \
valid answer. When every source fails or the deadline passes it answers from the local \
cache, and then from a small bundled set of quotes, so a quote is always printed."
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Directory holding the cache, ratings and slideshow settings.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Race deadline in milliseconds.
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_ms: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Single JSON document.
    Json,
    /// Human-readable lines.
    Text,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Acquire one record: fastest live source, else cache, else offline corpus.
    ///
    /// # Examples
    ///
    ///   quoterace quote
    ///   quoterace quote --timeout-ms 500 --format text
    Quote,

    /// List registered sources with their addresses and labels.
    Sources,

    /// Rate a record from 1 to 5 stars.
    Rate(RateArgs),

    /// List ratings, or remove one.
    Ratings(RatingsArgs),

    /// Record cache commands.
    Cache(CacheArgs),

    /// Slideshow settings and playback.
    Slideshow(SlideshowArgs),
}

/// Arguments for the `rate` command.
#[derive(Debug, Args)]
pub struct RateArgs {
    /// Record id as printed by `quote`.
    pub id: String,

    /// Number of stars.
    #[arg(allow_negative_numbers = true)]
    pub stars: i64,
}

/// Arguments for the `ratings` command.
#[derive(Debug, Args)]
pub struct RatingsArgs {
    /// Remove the rating for this record id instead of listing.
    #[arg(long)]
    pub remove: Option<String>,
}

#[derive(Debug, Args)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub command: CacheCommand,
}

#[derive(Debug, Subcommand)]
pub enum CacheCommand {
    /// List cached records, newest first.
    List,
    /// Remove every cached record.
    Clear,
}

#[derive(Debug, Args)]
pub struct SlideshowArgs {
    #[command(subcommand)]
    pub command: SlideshowCommand,
}

#[derive(Debug, Subcommand)]
pub enum SlideshowCommand {
    /// Print the persisted settings.
    Show,
    /// Change one or both settings.
    Set(SlideshowSetArgs),
    /// Acquire a record every interval.
    Play(SlideshowPlayArgs),
}

#[derive(Debug, Args)]
pub struct SlideshowSetArgs {
    #[arg(long)]
    pub enabled: Option<bool>,

    /// Seconds between records.
    #[arg(long)]
    pub interval: Option<u64>,
}

#[derive(Debug, Args)]
pub struct SlideshowPlayArgs {
    /// Number of records to show; runs until interrupted when omitted.
    #[arg(long)]
    pub count: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from([
            "quoterace",
            "quote",
            "--timeout-ms",
            "250",
            "--format",
            "text",
        ])
        .expect("valid arguments");

        assert_eq!(cli.timeout_ms, Some(250));
        assert_eq!(cli.format, OutputFormat::Text);
        assert!(matches!(cli.command, Command::Quote));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        assert!(Cli::try_parse_from(["quoterace", "quote", "--timeout-ms", "0"]).is_err());
    }

    #[test]
    fn slideshow_set_parses_optional_fields() {
        let cli = Cli::try_parse_from(["quoterace", "slideshow", "set", "--interval", "3"])
            .expect("valid arguments");

        match cli.command {
            Command::Slideshow(SlideshowArgs {
                command: SlideshowCommand::Set(args),
            }) => {
                assert_eq!(args.interval, Some(3));
                assert_eq!(args.enabled, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
