use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use grove_types::Hash;

#[derive(Parser)]
#[command(
    name = "grove",
    about = "Inspect trees, blobs, and commits through a grove backing store",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Backend configuration file (TOML)
    #[arg(short, long, global = true, conflicts_with = "repo")]
    pub config: Option<PathBuf>,

    /// Git repository to read; shorthand for a git backend config
    #[arg(short, long, global = true)]
    pub repo: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the entries of a tree
    Tree(HashArgs),
    /// Print the contents of a blob
    Blob(HashArgs),
    /// List the root tree of a commit
    CommitTree(HashArgs),
}

#[derive(Args)]
pub struct HashArgs {
    /// Full 40-character hex object id
    pub hash: Hash,
}
