//! quill CLI - extension registry and workspace index from the command line.

mod commands;
mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use quill_core::FileCategory;
use quill_fs::HostConfig;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "quill")]
#[command(author, version, about = "Editor extension registry and workspace index")]
#[command(propagate_version = true)]
struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "human")]
    format: output::OutputFormat,

    /// Host configuration file (YAML)
    #[arg(long, global = true, env = "QUILL_CONFIG")]
    config: Option<PathBuf>,

    /// Extensions directory (overrides the config file)
    #[arg(long, global = true, env = "QUILL_EXTENSIONS_DIR")]
    extensions_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage installed extensions
    #[command(subcommand, alias = "ext")]
    Extension(ExtensionCommands),

    /// Index a workspace directory and list its files
    Files {
        /// Workspace directory
        path: PathBuf,

        /// Only list files in this category (code, config, document, image, other)
        #[arg(long, short = 'c')]
        category: Option<FileCategory>,
    },
}

#[derive(Subcommand)]
enum ExtensionCommands {
    /// List installed extensions
    #[command(alias = "ls")]
    List,

    /// Show one installed extension
    Show {
        /// Extension id (e.g., ms-python.python)
        id: String,
    },

    /// Install an extension
    Install {
        /// Extension id (e.g., ms-python.python)
        id: String,

        /// Version to record (defaults to the configured default)
        version: Option<String>,
    },

    /// Uninstall an extension and delete its directory
    #[command(alias = "rm")]
    Uninstall {
        /// Extension id
        id: String,
    },

    /// Search installed extensions by id or publisher
    Search {
        /// Case-insensitive search text
        query: String,
    },

    /// Import extensions from a VS Code data directory (e.g., ~/.vscode)
    Import {
        /// VS Code data directory containing `extensions/`
        vscode_dir: PathBuf,

        /// Only import extensions that contribute color themes
        #[arg(long)]
        themes_only: bool,
    },
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => HostConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => HostConfig::default(),
    };
    if let Some(dir) = cli.extensions_dir {
        config = config.with_extensions_dir(dir);
    }
    let extensions_dir = config.extensions_dir();
    debug!(extensions_dir = %extensions_dir.display(), "Resolved host config");

    match cli.command {
        Commands::Extension(command) => match command {
            ExtensionCommands::List => commands::list(&config, cli.format),
            ExtensionCommands::Show { id } => commands::show(&config, &id, cli.format),
            ExtensionCommands::Install { id, version } => {
                commands::install(&config, &id, version.as_deref(), cli.format)
            }
            ExtensionCommands::Uninstall { id } => commands::uninstall(&config, &id, cli.format),
            ExtensionCommands::Search { query } => commands::search(&config, &query, cli.format),
            ExtensionCommands::Import {
                vscode_dir,
                themes_only,
            } => commands::import(&config, &vscode_dir, themes_only, cli.format),
        },
        Commands::Files { path, category } => commands::files(&path, category, cli.format),
    }
}
