//! CLI argument definitions using clap
//!
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Shiwake - Turn Amazon orders and card statements into freee ledger CSV
#[derive(Parser)]
#[command(name = "shiwake")]
#[command(about = "Convert Amazon and card statement exports into freee ledger CSV", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Session file (defaults to the user data dir)
    #[arg(long, global = true)]
    pub session: Option<PathBuf>,

    /// Settings file (defaults to ~/.config/shiwake/settings.toml, then built-in)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse export files and start a new session
    Import {
        /// Files to import (several statements may be combined)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Source format: amazon, amazon_digital, jcb, orico (auto-detected if not specified)
        #[arg(short, long)]
        source: Option<String>,
    },

    /// List records of the current session
    List {
        /// Only show this year ("all" for every year)
        #[arg(short, long)]
        year: Option<String>,

        /// Only show records containing this text (width and case insensitive)
        #[arg(short, long)]
        search: Option<String>,

        /// Maximum rows to show
        #[arg(short, long, default_value = "50")]
        limit: usize,
    },

    /// Toggle selection of records
    Select {
        /// Record ids (or unique id prefixes)
        ids: Vec<String>,

        /// Toggle every visible record instead
        #[arg(long, conflicts_with = "ids")]
        all: bool,

        /// Year filter used with --all
        #[arg(short, long)]
        year: Option<String>,

        /// Search filter used with --all
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Set the account title or tax category of one record
    Override {
        /// Record id (or unique id prefix)
        id: String,

        /// Account title (empty string clears it)
        #[arg(short, long)]
        account: Option<String>,

        /// Tax category (empty string clears it)
        #[arg(short, long)]
        tax: Option<String>,
    },

    /// Search freee account titles
    Accounts {
        /// Text to match against account titles and categories
        query: Option<String>,
    },

    /// Write selected records as a freee ledger CSV
    Export {
        /// Output directory
        #[arg(short, long, default_value = ".")]
        out: PathBuf,

        /// Ledger date: order or ship (defaults to settings)
        #[arg(long)]
        settlement: Option<String>,

        /// Tax category for every row without an override (defaults to settings)
        #[arg(long)]
        tax: Option<String>,
    },

    /// Discard the current session
    Clear,
}
