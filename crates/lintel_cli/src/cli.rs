//! CLI argument definitions

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// lintel - Pluggable C-family linter with conflict-aware fix-its
#[derive(Parser)]
#[command(name = "lintel")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run checks over files and directories
    Check {
        /// Files or directories to check
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Check filter appended after the configured patterns (e.g. "-*,llvm-*")
        #[arg(long, value_name = "LIST", allow_hyphen_values = true)]
        checks: Option<String>,

        /// Apply suggested fixes
        #[arg(long)]
        fix: bool,

        /// Write suggested fixes to a replacement document
        #[arg(long, value_name = "FILE")]
        export_fixes: Option<PathBuf>,

        /// Treat warnings as errors
        #[arg(long)]
        warnings_as_errors: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// List the checks that would run
    ListChecks {
        /// Check filter appended after the configured patterns
        #[arg(long, value_name = "LIST", allow_hyphen_values = true)]
        checks: Option<String>,
    },

    /// Apply replacement documents exported with --export-fixes
    ApplyReplacements {
        /// Directory containing replacement documents
        dir: PathBuf,

        /// Delete the documents after applying them
        #[arg(long)]
        remove_change_desc_files: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
