//! CLI commands and argument parsing

use crate::decode::DecoderFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Solidafy DocSchema CLI
#[derive(Parser, Debug)]
#[command(name = "docschema")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Input file (stdin when absent)
    #[arg(short, long, global = true)]
    pub input: Option<PathBuf>,

    /// Input format, overrides the config file
    #[arg(short, long, global = true)]
    pub format: Option<DecoderFormat>,

    /// Dot path to the document array inside a JSON envelope
    #[arg(long, global = true)]
    pub record_path: Option<String>,

    /// Configuration file (YAML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub output: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Infer the aggregate schema of the input documents
    Infer {
        /// Maximum documents to merge
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        limit: Option<u64>,
    },

    /// List property names at a field path, identifier field first
    Fields {
        /// Dot-separated field path (root when absent)
        #[arg(long)]
        path: Option<String>,
    },

    /// Show the schema node at a field path
    Show {
        /// Dot-separated field path (root when absent)
        #[arg(long)]
        path: Option<String>,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Compact JSON on one line
    Json,
    /// Indented JSON
    Pretty,
}
