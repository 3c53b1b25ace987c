//! Command line argument parsing for the genre-rank CLI using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

/// genre-rank - classify text into genres by n-gram rank correlation
#[derive(Parser, Debug, Clone)]
#[command(name = "genre-rank")]
#[command(about = "Classify text into genres by n-gram rank correlation")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct GenreRankArgs {
    /// Verbosity level (repeat for more detail)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl GenreRankArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n + 1,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Train one category per corpus file, then finalize
    Train(TrainArgs),

    /// Rebuild the rank tables
    Finalize(FinalizeArgs),

    /// Classify a text file or standard input
    Classify(ClassifyArgs),

    /// List trained categories
    Categories(CategoriesArgs),

    /// Measure accuracy on held-out corpus text
    Evaluate(EvaluateArgs),
}

/// Classifier settings shared by commands that open a classifier.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Classifier configuration file (JSON)
    #[arg(long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// N-gram orders (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub orders: Option<Vec<usize>>,

    /// Stem words with the Snowball English stemmer
    #[arg(long)]
    pub stem: bool,

    /// Stoplist file, one word per line
    #[arg(long, value_name = "STOPLIST_FILE")]
    pub stoplist: Option<PathBuf>,

    /// Fail instead of finalizing implicitly when rank tables are stale
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for training
#[derive(Parser, Debug, Clone)]
pub struct TrainArgs {
    /// Classifier data directory
    #[arg(value_name = "DATA_DIR")]
    pub data_dir: PathBuf,

    /// Directory with one text file per category
    #[arg(value_name = "CORPUS_DIR")]
    pub corpus_dir: PathBuf,

    /// Leading fraction of each file's characters used for training
    #[arg(long, default_value = "0.8")]
    pub fraction: f64,

    /// Don't finalize after training
    #[arg(long)]
    pub no_finalize: bool,

    #[command(flatten)]
    pub config: ConfigArgs,
}

/// Arguments for finalizing
#[derive(Parser, Debug, Clone)]
pub struct FinalizeArgs {
    /// Classifier data directory
    #[arg(value_name = "DATA_DIR")]
    pub data_dir: PathBuf,
}

/// Arguments for classification
#[derive(Parser, Debug, Clone)]
pub struct ClassifyArgs {
    /// Classifier data directory
    #[arg(value_name = "DATA_DIR")]
    pub data_dir: PathBuf,

    /// Text file to classify ("-" or omitted for standard input)
    #[arg(value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Ignore n-grams whose rank is not above this value
    #[arg(short, long, default_value = "0")]
    pub threshold: f64,

    /// Show every category's score
    #[arg(long)]
    pub scores: bool,

    /// Fail instead of finalizing implicitly when rank tables are stale
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for listing categories
#[derive(Parser, Debug, Clone)]
pub struct CategoriesArgs {
    /// Classifier data directory
    #[arg(value_name = "DATA_DIR")]
    pub data_dir: PathBuf,
}

/// Arguments for evaluation
#[derive(Parser, Debug, Clone)]
pub struct EvaluateArgs {
    /// Classifier data directory
    #[arg(value_name = "DATA_DIR")]
    pub data_dir: PathBuf,

    /// Directory with one text file per category
    #[arg(value_name = "CORPUS_DIR")]
    pub corpus_dir: PathBuf,

    /// Leading fraction of each file that was used for training
    #[arg(long, default_value = "0.8")]
    pub fraction: f64,

    /// Words per sampled window
    #[arg(long, default_value = "2000")]
    pub sample_words: usize,

    /// Samples drawn per category
    #[arg(long, default_value = "5")]
    pub repeats: usize,

    /// Random seed for reproducible samples
    #[arg(long)]
    pub seed: Option<u64>,

    /// Ignore n-grams whose rank is not above this value
    #[arg(short, long, default_value = "0")]
    pub threshold: f64,
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
