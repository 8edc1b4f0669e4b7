//! PatternKit command line.
//!
//! ```bash
//! # Walk through one pattern
//! patternkit demo builder
//!
//! # Small CRUD session against a SQLite file
//! patternkit employees ./staff.db hire 1 Pranaya Male IT --salary 40000
//! patternkit employees ./staff.db list
//! ```

mod demo;
mod employees;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use patternkit_core::CoreConfig;
use std::path::PathBuf;

/// PatternKit - repository, unit of work and object pattern demonstrations.
#[derive(Parser)]
#[command(name = "patternkit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// JSON configuration file; `PATTERNKIT_*` environment variables are used otherwise.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version information.
    Version,

    /// Run the console demonstration of one pattern.
    Demo {
        #[arg(value_enum)]
        pattern: demo::Pattern,
    },

    /// Manage employees stored in a SQLite file.
    Employees {
        /// Path to the database file (created on first use).
        db: PathBuf,

        #[command(subcommand)]
        action: employees::Action,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    patternkit_core::init_from_config(&config).context("failed to start logging")?;

    match cli.command {
        Commands::Version => {
            println!("patternkit {}", patternkit_core::core_version());
            Ok(())
        }
        Commands::Demo { pattern } => demo::run(pattern),
        Commands::Employees { db, action } => employees::run(&db, action),
    }
}

fn load_config(path: Option<&std::path::Path>) -> Result<CoreConfig> {
    match path {
        Some(path) => Ok(CoreConfig::from_json_file(path)?),
        None => Ok(CoreConfig::from_env()),
    }
}
