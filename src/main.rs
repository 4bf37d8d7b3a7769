//! Diagnostics CLI for PyFarm configuration resolution.
//!
//! Answers the two questions that come up when a farm host picks up the
//! wrong settings: where did resolution look, and what did it end up with.

use anyhow::Result;
use clap::{Parser, Subcommand};
use pyfarm_config::config::{Configuration, EnvironmentMap};
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pyfarm-config", version, about = "Inspect PyFarm configuration resolution")]
struct Cli {
    /// Service whose configuration to resolve (e.g. "agent").
    service: String,

    /// Dotted version enabling version-scoped search (e.g. "1.2.3").
    #[arg(long)]
    service_version: Option<String>,

    /// Bundled default file consulted before every root.
    #[arg(long)]
    bundled: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the discovered search roots.
    Roots,
    /// Print candidate configuration directories.
    Dirs {
        /// Include candidates that do not exist on disk.
        #[arg(long)]
        all: bool,
    },
    /// Print candidate configuration files.
    Files {
        /// Include candidates that do not exist on disk.
        #[arg(long)]
        all: bool,
    },
    /// Load, merge, and print the configuration as YAML.
    Show,
    /// Load and print a single expanded value.
    Get { key: String },
}

#[derive(Serialize)]
struct RootsReport<'a> {
    system: Option<&'a Path>,
    user: Option<&'a Path>,
    local: Option<&'a Path>,
    environment: Option<&'a Path>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = Configuration::new(&cli.service, cli.service_version.as_deref());
    config.set_bundled_path(cli.bundled);

    match cli.command {
        Command::Roots => {
            let roots = config.roots();
            let report = RootsReport {
                system: roots.system.as_deref(),
                user: roots.user.as_deref(),
                local: roots.local.as_deref(),
                environment: roots.environment.as_deref(),
            };
            print!("{}", serde_yaml::to_string(&report)?);
        }
        Command::Dirs { all } => {
            for dir in config.directories(!all, false) {
                println!("{}", dir.display());
            }
        }
        Command::Files { all } => {
            for file in config.files(!all, false) {
                println!("{}", file.display());
            }
        }
        Command::Show => {
            let mut environment = EnvironmentMap::new();
            config.load(Some(&mut environment))?;
            print!(
                "{}",
                serde_yaml::to_string(&Value::Object(config.as_map().clone()))?
            );
            if !environment.is_empty() {
                eprintln!("# environment overlay");
                eprint!("{}", serde_yaml::to_string(&Value::Object(environment))?);
            }
        }
        Command::Get { key } => {
            config.load(None)?;
            match config.require(&key)? {
                Value::String(text) => println!("{text}"),
                other => println!("{}", serde_json::to_string(&other)?),
            }
        }
    }

    Ok(())
}
