//! argdesigner CLI tool
//!
//! Command-line interface for checking and converting argumentation framework descriptions.
//!
//! ## Commands
//!
//! - `check <file>`: Parse a description and print diagnostics or its classification
//! - `format <file>`: Print the canonical form of a description
//! - `export <file>`: Write a `.json` (or `.apx`) project file for a description
//!
//! `.apx` inputs are read as plain descriptions, `.json` inputs as project exports.

use argdesigner_core::{
    codec::serialize_framework,
    config::DesignerConfig,
    export::{export_destination, export_file, import_file},
    sync::Session,
    DesignerError,
};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "argdesigner")]
#[command(author, version, about = "A tool for checking and converting argumentation frameworks", long_about = None)]
struct Cli {
    /// Configuration file path (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a description and display diagnostics or its classification
    Check {
        /// Path to the .apx or .json file
        path: PathBuf,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print the canonical text of a description
    Format {
        /// Path to the .apx or .json file
        path: PathBuf,
    },

    /// Export a description as a project file
    Export {
        /// Path to the .apx or .json file
        path: PathBuf,

        /// Project name (default: the input file stem)
        #[arg(long)]
        project_name: Option<String>,

        /// Layout name stored in the export
        #[arg(long)]
        layout: Option<String>,

        /// Output file; the extension picks the format (default: <project>.json, never the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn load_session(config: Option<&Path>, path: &Path) -> Result<Session, DesignerError> {
    let config = match config {
        Some(config) => DesignerConfig::load(config)?,
        None => DesignerConfig::default(),
    };
    let mut session = Session::new(config);
    import_file(&mut session, path)?;
    Ok(session)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check { path, verbose } => {
            match load_session(cli.config.as_deref(), &path) {
                Ok(session) => {
                    let graph = session.graph();
                    println!("\n=== Check Results ===");
                    println!("Arguments: {}", graph.argument_count());
                    println!("Relations: {}", graph.relation_count());
                    println!("Classification: {}", session.classification());
                    if verbose {
                        for argument in graph.arguments() {
                            println!("  {} {:?}", argument.id, argument.weight);
                        }
                        for relation in graph.relations() {
                            println!("  {} {}", relation.id, relation.key());
                        }
                    }
                    Ok(())
                }
                Err(DesignerError::Description(errors)) => {
                    eprintln!("{errors}");
                    std::process::exit(1);
                }
                Err(err) => Err(err.into()),
            }
        }

        Commands::Format { path } => {
            let session = load_session(cli.config.as_deref(), &path)?;
            let framework = session.check_description(session.description())?;
            println!("{}", serialize_framework(&framework)?);
            Ok(())
        }

        Commands::Export {
            path,
            project_name,
            layout,
            output,
        } => {
            let mut session = load_session(cli.config.as_deref(), &path)?;
            if let Some(name) = project_name {
                session.set_project_name(&name);
            }
            if let Some(layout) = layout {
                session.set_layout(&layout);
            }
            let output = export_destination(&session, &path, output)?;
            export_file(&session, &output)?;
            println!("Exported to {}", output.display());
            Ok(())
        }
    }
}
