//! sqlshift CLI - render a call tree as SQL for one database product
//!
//! Usage:
//!   sqlshift render <tree.json> [--dialect <name>] [--version <X.Y>] [--config <file.toml>]
//!   sqlshift dialects
//!
//! The tree is a JSON-encoded `Node`; a whole query is `{"query": {...}}`.
//!
//! Examples:
//!   sqlshift render tree.json --dialect mssql --version 11
//!   RUST_LOG=sqlshift=trace sqlshift render tree.json --dialect mysql
//!   sqlshift dialects

use clap::{Parser, Subcommand};
use sqlshift::config::Settings;
use sqlshift::sql::dialect::{Dialect, DialectProfile, Feature};
use sqlshift::sql::node::Node;
use sqlshift::unparse;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sqlshift")]
#[command(about = "sqlshift - render canonical SQL call trees for many database products")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a JSON call tree as SQL
    Render {
        /// Path to the JSON tree
        file: PathBuf,

        /// Target product (postgres, mssql, oracle ...); overrides the config file
        #[arg(short, long)]
        dialect: Option<String>,

        /// Product version as MAJOR[.MINOR]
        #[arg(long = "version")]
        db_version: Option<String>,

        /// TOML settings file (default: $SQLSHIFT_CONFIG, then ./sqlshift.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// List products and their capability flags
    Dialects,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            file,
            dialect,
            db_version,
            config,
        } => cmd_render(file, dialect, db_version, config),
        Commands::Dialects => cmd_dialects(),
    }
}

fn cmd_render(
    file: PathBuf,
    dialect: Option<String>,
    db_version: Option<String>,
    config: Option<PathBuf>,
) -> ExitCode {
    let settings = match config {
        Some(path) => Settings::from_file(path),
        None => Settings::load(),
    };
    let mut settings = match settings {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Some(product) = dialect {
        settings.dialect.product = product;
        settings.dialect.version = db_version;
    } else if db_version.is_some() {
        settings.dialect.version = db_version;
    }

    let profile = match settings.profile() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let source = match fs::read_to_string(&file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", file.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let tree: Node = match serde_json::from_str(&source) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Invalid call tree in '{}': {}", file.display(), e);
            return ExitCode::FAILURE;
        }
    };

    match unparse(&profile, &tree) {
        Ok(sql) => {
            println!("{}", sql);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Unparse error ({}): {}", e.category(), e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_dialects() -> ExitCode {
    for dialect in Dialect::ALL {
        let profile = match DialectProfile::new(*dialect, None) {
            Ok(p) => p,
            Err(e) => {
                eprintln!("Configuration error: {}", e);
                return ExitCode::FAILURE;
            }
        };
        let features: Vec<_> = Feature::ALL
            .iter()
            .filter(|f| profile.supports(**f))
            .map(Feature::as_str)
            .collect();
        println!(
            "{:<10} quote={:<2} nulls={:<5} features: {}",
            profile.name(),
            profile.identifier_quote().as_str(),
            profile.null_collation().as_str(),
            features.join(", ")
        );
    }
    ExitCode::SUCCESS
}
