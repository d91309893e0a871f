//! Web server command.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use mia_core::Config;
use std::path::PathBuf;

#[derive(Args)]
pub struct ServeArgs {
    /// Port to listen on (overrides config and PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Host to bind to (overrides config and MIA_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Also write logs to a file
    #[arg(long)]
    pub log: bool,

    /// Log file path (defaults to <data dir>/mia/serve.log)
    #[arg(long, requires = "log")]
    pub log_file: Option<PathBuf>,
}

impl ServeArgs {
    /// Command-line host and port win over config and environment.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_file.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("mia")
                .join("serve.log")
        })
    }
}

pub async fn execute(args: ServeArgs, mut config: Config) -> Result<()> {
    let log_path = args.log.then(|| args.log_path());
    args.apply_overrides(&mut config);
    let host = &config.server.host;
    let port = config.server.port;

    println!();
    println!("  {} {}", "MIA".cyan().bold(), "Market Intelligence API".bold());
    println!();
    println!("  {}      http://{}:{}/api/analyze", "Analyze".green(), host, port);
    println!("  {}       http://{}:{}/api/analyze/stream", "Stream".green(), host, port);
    println!("  {}       http://{}:{}/health", "Health".green(), host, port);
    println!();
    println!(
        "  {} {}   {} {}",
        "Claude".bold(),
        status_mark(config.llm_configured()),
        "Tavily".bold(),
        status_mark(config.search_configured()),
    );
    if let Some(path) = &log_path {
        println!("  {}  {}", "Log file".dimmed(), path.display());
    }
    println!();
    println!("  {}", "Ctrl+C to stop".dimmed());
    println!();

    mia_web::run_server(&config).await?;

    Ok(())
}

fn status_mark(configured: bool) -> colored::ColoredString {
    if configured {
        "configured".green()
    } else {
        "missing key".red()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{Cli, Commands};
    use clap::Parser;

    fn serve_args(argv: &[&str]) -> ServeArgs {
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Serve(args) => args,
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_overrides_and_log_path() {
        let args = serve_args(&[
            "mia", "serve", "--host", "0.0.0.0", "--port", "9000", "--log", "--log-file", "logs/mia.log",
        ]);
        let mut config = Config::default();
        args.apply_overrides(&mut config);

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert_eq!(args.log_path(), PathBuf::from("logs/mia.log"));
    }

    #[test]
    fn test_no_flags_keep_config() {
        let args = serve_args(&["mia", "serve"]);
        let mut config = Config::default();
        args.apply_overrides(&mut config);

        assert_eq!(config, Config::default());
        assert!(!args.log);
        assert!(args.log_path().ends_with("mia/serve.log"));
    }

    #[test]
    fn test_log_file_requires_log() {
        assert!(Cli::try_parse_from(["mia", "serve", "--log-file", "x.log"]).is_err());
    }
}
