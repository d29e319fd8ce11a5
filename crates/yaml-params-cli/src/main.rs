//! yaml-params CLI - Main entry point

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "yaml-params")]
#[command(version)]
#[command(about = "Inspect and edit YamlParams parameter files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default parameter file
    Init {
        /// Name of the parameter set (the file is NAME.yaml)
        name: String,

        /// Directory holding the parameter file (defaults to the current directory)
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print a parameter file as it would be saved
    Show {
        /// Name of the parameter set
        name: String,

        /// Directory holding the parameter file
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// Print one parameter
    Get {
        /// Name of the parameter set
        name: String,

        /// Dotted path of the parameter (e.g. mydict.myint)
        key: String,

        /// Directory holding the parameter file
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Print as JSON instead of YAML
        #[arg(long)]
        json: bool,
    },

    /// Set one parameter and save the file
    Set {
        /// Name of the parameter set
        name: String,

        /// Dotted path of the parameter; missing parent maps are created
        key: String,

        /// New value, read as YAML (`42`, `true`, `[1, 2]`, `{a: 1}`, text)
        value: String,

        /// Directory holding the parameter file
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// Load and save a parameter file, applying the standard layout
    Normalize {
        /// Name of the parameter set
        name: String,

        /// Directory holding the parameter file
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "yaml_params=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { name, dir, force } => commands::init::execute(&name, dir, force),
        Commands::Show { name, dir } => commands::show::execute(&name, dir),
        Commands::Get {
            name,
            key,
            dir,
            json,
        } => commands::get::execute(&name, &key, dir, json),
        Commands::Set {
            name,
            key,
            value,
            dir,
        } => commands::set::execute(&name, &key, &value, dir),
        Commands::Normalize { name, dir } => commands::normalize::execute(&name, dir),
    }
}
