//! Terminal output formatting.

use chrono::{DateTime, TimeZone};
use colored::Colorize;
use mia_core::template::TemplateRegistry;
use mia_core::{AnalysisCategory, AnalysisReport, ProgressEvent};
use std::fmt::Display;

/// Print every category with its report sections.
pub fn print_categories(registry: &TemplateRegistry) {
    for template in registry.iter() {
        let category = template.category;
        let marker = if category == AnalysisCategory::default() {
            " (default)".dimmed().to_string()
        } else {
            String::new()
        };
        println!("{}{}", category.as_str().cyan().bold(), marker);
        println!("  {}", category.display_name().bold());
        for (i, section) in template.sections.iter().enumerate() {
            println!("  {}. {}", i + 1, section.title);
        }
        println!();
    }
}

/// Print one progress event as a status line.
pub fn print_progress(event: &ProgressEvent) {
    match event {
        ProgressEvent::Complete(_) => println!("{} Done", "✓".green().bold()),
        ProgressEvent::Failed { message } => println!("{} {}", "✗".red().bold(), message),
        other => {
            if let Some(message) = other.message() {
                println!("{} {}", "…".blue(), message.dimmed());
            }
        }
    }
}

/// Print a report and its sources to stdout.
pub fn print_report(report: &AnalysisReport) {
    println!();
    println!("{}", report.report);
    println!();

    if report.sources.is_empty() {
        println!("{}", "No sources found.".dimmed());
        return;
    }

    println!("{}", "Sources".bold());
    for (i, url) in report.sources.iter().enumerate() {
        println!("  [{}] {}", i + 1, url.dimmed());
    }
}

/// Render a report as a standalone markdown document with a numbered
/// sources appendix. Numbering matches the `[Source N]` citations.
pub fn render_markdown<Tz>(
    company: &str,
    category: AnalysisCategory,
    report: &AnalysisReport,
    generated_at: DateTime<Tz>,
) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut doc = format!(
        "# {}: {}\n\n_Generated {}_\n\n{}\n",
        company,
        category.display_name(),
        generated_at.format("%Y-%m-%d %H:%M %Z"),
        report.report.trim_end()
    );

    doc.push_str("\n## Sources\n\n");
    if report.sources.is_empty() {
        doc.push_str("_No sources were found._\n");
    }
    for (i, url) in report.sources.iter().enumerate() {
        doc.push_str(&format!("{}. [Source {}] <{}>\n", i + 1, i + 1, url));
    }

    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn report(sources: &[&str]) -> AnalysisReport {
        AnalysisReport {
            report: "Klarna leads BNPL [Source 1].\n\n".to_string(),
            sources: sources.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_render_markdown_numbers_sources() {
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap();
        let doc = render_markdown(
            "Klarna",
            AnalysisCategory::Competition,
            &report(&["https://a.example", "https://b.example"]),
            at,
        );

        assert!(doc.starts_with("# Klarna: "));
        assert!(doc.contains("_Generated 2026-03-01 09:30 UTC_"));
        assert!(doc.contains("Klarna leads BNPL [Source 1].\n\n## Sources\n\n"));
        assert!(doc.contains("1. [Source 1] <https://a.example>\n"));
        assert!(doc.ends_with("2. [Source 2] <https://b.example>\n"));
    }

    #[test]
    fn test_render_markdown_without_sources() {
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap();
        let doc = render_markdown("Acme", AnalysisCategory::MarketTrends, &report(&[]), at);

        assert!(doc.ends_with("## Sources\n\n_No sources were found._\n"));
    }
}
