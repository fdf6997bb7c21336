//! Shiwake CLI - freee ledger converter
//!
//! Usage:
//!   shiwake import orders.csv          Parse an export (format auto-detected)
//!   shiwake list --year 2025           Show records and selection
//!   shiwake select --all               Select every visible record
//!   shiwake export --out ~/Downloads   Write the ledger CSV

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use shiwake_core::Settings;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let store = commands::open_store(cli.session.as_deref())?;

    match cli.command {
        Commands::Import { files, source } => {
            commands::cmd_import(&store, &files, source.as_deref())
        }
        Commands::List {
            year,
            search,
            limit,
        } => {
            let settings = Settings::load(cli.config.as_deref())?;
            commands::cmd_list(&store, &settings, year.as_deref(), search.as_deref(), limit)
        }
        Commands::Select {
            ids,
            all,
            year,
            search,
        } => {
            if all {
                commands::cmd_select_all(&store, year.as_deref(), search.as_deref())
            } else {
                commands::cmd_select(&store, &ids)
            }
        }
        Commands::Override { id, account, tax } => {
            commands::cmd_override(&store, &id, account.as_deref(), tax.as_deref())
        }
        Commands::Accounts { query } => commands::cmd_accounts(query.as_deref()),
        Commands::Export {
            out,
            settlement,
            tax,
        } => {
            let settings = Settings::load(cli.config.as_deref())?;
            commands::cmd_export(&store, &settings, &out, settlement.as_deref(), tax.as_deref())
                .map(|_| ())
        }
        Commands::Clear => commands::cmd_clear(&store),
    }
}
