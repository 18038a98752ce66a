//! enumfield - enum field inspector
//!
//! Loads enum definitions and checks choices, labels and transitions from
//! the command line.

mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use config::Config;
use enumfield_core::{CatalogTranslator, EnumRegistry, NoopTranslator, Translator};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "enumfield")]
#[command(about = "Inspect enum definitions used as database-backed model fields")]
#[command(version)]
struct Cli {
    /// YAML config file
    #[arg(short, long, env = "ENUMFIELD_CONFIG")]
    config: Option<PathBuf>,

    /// Enum definition files (overrides the config file)
    #[arg(short, long, value_delimiter = ',')]
    definitions: Vec<PathBuf>,

    /// Translation catalog used for labels
    #[arg(short, long)]
    translations: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List all loaded enums
    List,

    /// Show the members and transitions of an enum
    Show {
        /// Enum name
        name: String,

        /// Print the definition as JSON
        #[arg(long)]
        json: bool,
    },

    /// Look up a member by value or name
    Get {
        /// Enum name
        name: String,

        /// Member value or name (case-insensitive)
        member: String,
    },

    /// Print the label of a member
    Label {
        /// Enum name
        name: String,

        /// Member value or name
        member: String,
    },

    /// Check whether a transition is allowed
    Check {
        /// Enum name
        name: String,

        /// Current member
        from: String,

        /// Proposed member
        to: String,
    },

    /// List the members allowed to transition into a member
    Origins {
        /// Enum name
        name: String,

        /// Target member
        to: String,
    },

    /// Print the field configuration for an enum as JSON
    Field {
        /// Enum name
        name: String,

        /// Allow NULL in storage
        #[arg(long)]
        null: bool,

        /// Allow blank input
        #[arg(long)]
        blank: bool,

        /// Index the column
        #[arg(long)]
        db_index: bool,

        /// Default member, overriding the enum default
        #[arg(long)]
        default: Option<String>,

        /// Extra field option as key=value (value parsed as JSON if possible)
        #[arg(short, long = "option", value_name = "KEY=VALUE")]
        options: Vec<String>,
    },

    /// Load every definition and report checksums
    Validate,
}

/// Loaded state shared by all commands.
pub struct Context {
    pub registry: EnumRegistry,
    pub translator: Box<dyn Translator>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if !cli.definitions.is_empty() {
        config.definitions = cli.definitions.clone();
    }
    if let Some(path) = cli.translations.clone() {
        config.translations = Some(path);
    }

    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    if let Err(e) = config.validate() {
        eprintln!("{}: {}", "Error".red(), e);
        std::process::exit(2);
    }

    let mut registry = EnumRegistry::new();
    for path in &config.definitions {
        if let Err(e) = registry.load_file(path) {
            eprintln!("{}: {}: {}", "Error".red(), path.display(), e);
            std::process::exit(2);
        }
    }

    let translator: Box<dyn Translator> = match &config.translations {
        Some(path) => {
            let catalog = match CatalogTranslator::from_file(path) {
                Ok(catalog) => catalog,
                Err(e) => {
                    eprintln!("{}: {}: {}", "Error".red(), path.display(), e);
                    std::process::exit(2);
                }
            };
            tracing::info!(
                "Loaded {} translation(s) from {}",
                catalog.len(),
                path.display()
            );
            Box::new(catalog)
        }
        None => Box::new(NoopTranslator),
    };

    let ctx = Context {
        registry,
        translator,
    };

    match commands::execute(&ctx, cli.command) {
        Ok(output) => {
            println!("{}", output);
            Ok(())
        }
        Err(e) => {
            eprintln!("{}: {}", "Error".red(), e);
            std::process::exit(1);
        }
    }
}
