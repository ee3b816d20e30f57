//! schemasync CLI
//!
//! Reads two schema files and prints the statements that transform the
//! first into the second. The pipeline itself never touches a database;
//! this binary only supplies text and prints the result.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

use schemasync_core::prelude::*;

/// Generate the DDL that turns one table schema into another.
#[derive(Parser)]
#[command(name = "schemasync")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// File with the source schema (the one to transform).
    source: PathBuf,

    /// File with the destination schema (the one to reach).
    destination: PathBuf,

    /// Action kinds to emit (create, drop, add, modify, remove).
    /// All kinds when not given.
    #[arg(short, long, value_delimiter = ',')]
    allow: Vec<ActionKind>,

    /// Omit AUTO_INCREMENT from rendered column definitions.
    #[arg(long)]
    suppress_auto_increment: bool,

    /// IF NOT EXISTS policy for CREATE TABLE statements.
    #[arg(long, value_enum, default_value_t = GuardArg::Inherit)]
    if_not_exists: GuardArg,

    /// Do not treat an auto-increment difference alone as a column change.
    #[arg(long)]
    ignore_auto_increment: bool,

    /// Print one statement per line without terminators instead of a
    /// ready-to-run script.
    #[arg(short, long)]
    list: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum GuardArg {
    /// Keep whatever the destination schema text says.
    Inherit,
    /// Always emit the guard.
    On,
    /// Never emit the guard.
    Off,
}

impl From<GuardArg> for CreateGuard {
    fn from(arg: GuardArg) -> Self {
        match arg {
            GuardArg::Inherit => Self::Inherit,
            GuardArg::On => Self::ForceOn,
            GuardArg::Off => Self::ForceOff,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let source = fs::read_to_string(&cli.source)
        .with_context(|| format!("failed to read {}", cli.source.display()))?;
    let destination = fs::read_to_string(&cli.destination)
        .with_context(|| format!("failed to read {}", cli.destination.display()))?;

    let options = SyncOptions {
        allowed_actions: if cli.allow.is_empty() {
            AllowedActions::all()
        } else {
            AllowedActions::only(cli.allow.iter().copied())
        },
        suppress_auto_increment: cli.suppress_auto_increment,
        create_guard: cli.if_not_exists.into(),
        ignore_auto_increment_in_diff: cli.ignore_auto_increment,
    };

    if cli.list {
        let statements = sync_statements(&source, &destination, &options)?;
        debug!(count = statements.len(), "generated statements");
        for statement in statements {
            println!("{statement}");
        }
    } else {
        let script = sync(&source, &destination, &options)?;
        if !script.is_empty() {
            println!("{script}");
        }
    }

    Ok(())
}
