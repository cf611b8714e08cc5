//! The `uxstudy report` command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use uxstudy_core::report::StudyReport;
use uxstudy_core::statistics::StudySummary;
use uxstudy_report::html::write_html_report;
use uxstudy_report::markdown::to_markdown;
use uxstudy_storage::CsvStore;

pub fn execute(
    config_path: Option<PathBuf>,
    data_dir: Option<PathBuf>,
    format: String,
    output: PathBuf,
) -> Result<()> {
    let config = super::load_settings(config_path, data_dir)?;
    let store = CsvStore::open(&config.data_dir)
        .with_context(|| format!("failed to open data directory {}", config.data_dir.display()))?;
    let report = StudyReport::from_store(&store)?;

    let formats: Vec<&str> = if format == "all" {
        vec!["text", "json", "html", "markdown"]
    } else {
        format.split(',').map(str::trim).collect()
    };

    let timestamp = report.created_at.format("%Y-%m-%dT%H%M%S");
    for fmt in &formats {
        match *fmt {
            "text" => print_summary(&report.summary),
            "json" => {
                let path = output.join(format!("report-{timestamp}.json"));
                report.save_json(&path)?;
                eprintln!("JSON report saved to: {}", path.display());
            }
            "html" => {
                let path = output.join(format!("report-{timestamp}.html"));
                write_html_report(&report, &path)?;
                eprintln!("HTML report saved to: {}", path.display());
            }
            "markdown" | "md" => {
                let path = output.join(format!("report-{timestamp}.md"));
                write_markdown(&report.summary, &path)?;
                eprintln!("Markdown report saved to: {}", path.display());
            }
            _ => eprintln!("Unknown format: {fmt}"),
        }
    }

    Ok(())
}

fn write_markdown(summary: &StudySummary, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, to_markdown(summary))
        .with_context(|| format!("failed to write {}", path.display()))
}

fn opt(value: Option<f64>, precision: usize) -> String {
    value
        .map(|v| format!("{v:.precision$}"))
        .unwrap_or_else(|| "-".to_string())
}

fn print_summary(summary: &StudySummary) {
    println!("Usability Report - Aggregated Results");
    println!("Consent records: {}", summary.consent_count);

    println!("\nDemographics");
    if summary.demographics.count == 0 {
        println!("No demographic data available yet.");
    } else {
        let mut table = Table::new();
        table.set_header(vec!["Average Age", "Avg Familiarity (1-5)", "Responses"]);
        table.add_row(vec![
            Cell::new(opt(summary.demographics.mean_age, 1)),
            Cell::new(opt(summary.demographics.mean_familiarity, 2)),
            Cell::new(summary.demographics.count),
        ]);
        println!("{table}");
    }

    println!("\nTask Performance");
    if summary.task_success_by_name.is_empty() {
        println!("No task data available yet.");
    } else {
        let mut table = Table::new();
        table.set_header(vec!["Task", "Success Rate", "Trials", "Avg Duration (s)"]);
        for score in &summary.task_success_by_name {
            let duration = summary
                .task_duration_by_name
                .iter()
                .find(|d| d.task_name == score.task_name)
                .map(|d| format!("{:.2}", d.mean_seconds))
                .unwrap_or_else(|| "-".to_string());
            table.add_row(vec![
                Cell::new(&score.task_name),
                Cell::new(format!("{:.1}%", score.success_rate * 100.0)),
                Cell::new(score.trials),
                Cell::new(duration),
            ]);
        }
        println!("{table}");
        if summary.task_duration_by_name.is_empty() {
            println!("No duration data to aggregate yet.");
        }
    }

    println!("\nExit Questionnaire");
    if summary.exit.count == 0 {
        println!("No exit questionnaire data available yet.");
    } else {
        let mut table = Table::new();
        table.set_header(vec!["Metric", "Mean"]);
        for m in &summary.exit.metrics {
            table.add_row(vec![Cell::new(m.metric), Cell::new(format!("{:.2}", m.mean))]);
        }
        table.add_row(vec![
            Cell::new("Average NPS"),
            Cell::new(opt(summary.exit.mean_nps, 1)),
        ]);
        println!("{table}");
        println!("Responses: {}", summary.exit.count);
    }
}
