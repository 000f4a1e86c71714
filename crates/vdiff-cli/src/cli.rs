use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "vdiff",
    about = "Structural diff for JSON-like documents",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Compare two JSON documents
    Compare(CompareArgs),
    /// Print a document with list elements in canonical order
    Canonicalize(FileArgs),
    /// Print the content fingerprint of a document
    Fingerprint(FileArgs),
}

#[derive(Args)]
pub struct CompareArgs {
    pub a: PathBuf,
    pub b: PathBuf,
    /// Ignore the order of list elements
    #[arg(short = 'u', long)]
    pub ignore_array_sorting: bool,
    /// Maximum nesting depth accepted in either document
    #[arg(long)]
    pub max_depth: Option<usize>,
    /// Also print the combination tree
    #[arg(short, long)]
    pub combination: bool,
    /// TOML file with comparator settings
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct FileArgs {
    pub path: PathBuf,
}
