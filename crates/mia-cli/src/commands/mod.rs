//! CLI command definitions and handlers.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mia_core::Config;
use std::path::PathBuf;

pub mod analyze;
pub mod categories;
pub mod serve;

/// Market Intelligence Agent - cited research reports on any company
#[derive(Parser)]
#[command(name = "mia")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a TOML config file (defaults to <config dir>/mia/config.toml)
    #[arg(short, long, global = true, env = "MIA_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server
    Serve(serve::ServeArgs),

    /// Research a company and write a report
    Analyze(analyze::AnalyzeArgs),

    /// List analysis categories and their report sections
    Categories,
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Categories => {
                categories::execute();
                Ok(())
            }
            Commands::Serve(args) => {
                let config = load_config(self.config)?;
                serve::execute(args, config).await
            }
            Commands::Analyze(args) => {
                let config = load_config(self.config)?;
                analyze::execute(args, config).await
            }
        }
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("mia").join("config.toml"))
}

fn load_config(explicit: Option<PathBuf>) -> Result<Config> {
    if let Some(path) = &explicit {
        if !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }
    }
    let path = explicit.or_else(default_config_path);
    Config::load(path.as_deref()).context("Failed to load configuration")
}
