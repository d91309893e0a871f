//! Analysis command.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use mia_core::{AnalysisCategory, AnalysisPipeline, AnalysisReport, AnalysisRequest, Config, ProgressEvent};
use std::path::PathBuf;

use crate::output;

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Company to research
    pub company: String,

    /// Analysis category (see `mia categories`)
    #[arg(short = 't', long = "type", default_value = "competition", value_parser = parse_category)]
    pub category: AnalysisCategory,

    /// Print progress as each stage completes
    #[arg(long)]
    pub stream: bool,

    /// Write the report as markdown to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

fn parse_category(s: &str) -> Result<AnalysisCategory, String> {
    AnalysisCategory::try_from(s).map_err(|e| e.to_string())
}

pub async fn execute(args: AnalyzeArgs, config: Config) -> Result<()> {
    if !config.llm_configured() {
        anyhow::bail!("ANTHROPIC_API_KEY is not set");
    }
    if !config.search_configured() {
        println!(
            "{} TAVILY_API_KEY is not set; the report will have no sources",
            "!".yellow().bold()
        );
    }

    let pipeline = AnalysisPipeline::from_config(&config).context("Failed to build pipeline")?;
    let request = AnalysisRequest::new(args.company.as_str(), args.category)?;

    println!(
        "{} {} analysis for {}",
        "→".blue().bold(),
        args.category.display_name(),
        args.company.cyan()
    );

    let report = if args.stream {
        run_streaming(&pipeline, request).await?
    } else {
        pipeline.run(&request).await?
    };

    match args.output {
        Some(path) => {
            let markdown =
                output::render_markdown(&args.company, args.category, &report, chrono::Local::now());
            std::fs::write(&path, markdown)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!(
                "{} Report written to {} ({} sources)",
                "✓".green().bold(),
                path.display(),
                report.sources.len()
            );
        }
        None => output::print_report(&report),
    }

    Ok(())
}

async fn run_streaming(pipeline: &AnalysisPipeline, request: AnalysisRequest) -> Result<AnalysisReport> {
    let mut stream = pipeline.stream(request);

    while let Some(event) = stream.next_event().await {
        output::print_progress(&event);
        match event {
            ProgressEvent::Complete(report) => return Ok(report),
            ProgressEvent::Failed { message } => anyhow::bail!(message),
            _ => {}
        }
    }

    anyhow::bail!("analysis ended without a report")
}
