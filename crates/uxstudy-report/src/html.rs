//! HTML report generator.
//!
//! Produces a self-contained HTML file with all CSS inlined and charts drawn
//! as inline SVG.

use anyhow::Result;
use std::path::Path;

use uxstudy_core::report::{DatasetTable, StudyReport};

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn opt(value: Option<f64>, precision: usize) -> String {
    value
        .map(|v| format!("{v:.precision$}"))
        .unwrap_or_else(|| "-".to_string())
}

/// Generate an HTML report from a study report.
pub fn generate_html(report: &StudyReport) -> String {
    let summary = &report.summary;
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str("<title>Usability Report - Aggregated Results</title>\n");
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str("<h1>Usability Report - Aggregated Results</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">{} consents | {} demographic responses | {} task trials | {} exit responses | {}</p>\n",
        summary.consent_count,
        summary.demographics.count,
        summary.task_success_by_name.iter().map(|t| t.trials).sum::<usize>(),
        summary.exit.count,
        report.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    // Demographics
    html.push_str("<section class=\"dashboard\">\n");
    html.push_str("<h2>Demographics</h2>\n");
    if summary.demographics.count == 0 {
        html.push_str("<p class=\"empty\">No demographic data available yet.</p>\n");
    } else {
        html.push_str("<div class=\"metrics\">\n");
        html.push_str(&metric("Average Age", &opt(summary.demographics.mean_age, 1)));
        html.push_str(&metric(
            "Avg Familiarity (1-5)",
            &opt(summary.demographics.mean_familiarity, 2),
        ));
        html.push_str(&metric("Responses", &summary.demographics.count.to_string()));
        html.push_str("</div>\n");
    }
    html.push_str("</section>\n");

    // Tasks
    html.push_str("<section class=\"dashboard\">\n");
    html.push_str("<h2>Task Performance</h2>\n");
    if summary.task_success_by_name.is_empty() {
        html.push_str("<p class=\"empty\">No task data available yet.</p>\n");
    } else {
        html.push_str("<h3>Success Rate by Task</h3>\n");
        let bars: Vec<(&str, f64)> = summary
            .task_success_by_name
            .iter()
            .map(|t| (t.task_name.as_str(), t.success_rate))
            .collect();
        html.push_str(&generate_bar_chart(&bars, 1.0, |v| format!("{:.1}%", v * 100.0)));

        html.push_str("<h3>Average Duration (seconds) by Task</h3>\n");
        if summary.task_duration_by_name.is_empty() {
            html.push_str("<p class=\"empty\">No duration data to aggregate yet.</p>\n");
        } else {
            let bars: Vec<(&str, f64)> = summary
                .task_duration_by_name
                .iter()
                .map(|t| (t.task_name.as_str(), t.mean_seconds))
                .collect();
            let max = bars.iter().map(|(_, v)| *v).fold(0.0, f64::max);
            html.push_str(&generate_bar_chart(&bars, max, |v| format!("{v:.2}s")));
        }
    }
    html.push_str("</section>\n");

    // Exit questionnaire
    html.push_str("<section class=\"dashboard\">\n");
    html.push_str("<h2>Exit Questionnaire</h2>\n");
    if summary.exit.count == 0 {
        html.push_str("<p class=\"empty\">No exit questionnaire data available yet.</p>\n");
    } else {
        html.push_str("<div class=\"metrics\">\n");
        for m in &summary.exit.metrics {
            html.push_str(&metric(&m.metric.to_string(), &format!("{:.2}", m.mean)));
        }
        html.push_str(&metric("Average NPS", &opt(summary.exit.mean_nps, 1)));
        html.push_str("</div>\n");
    }
    html.push_str("</section>\n");

    // Raw tables
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<h2>Collected Data</h2>\n");
    for table in &report.tables {
        html.push_str(&render_table(table));
    }
    html.push_str("</section>\n");

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(&html_escape(
        &serde_json::to_string_pretty(report).unwrap_or_default(),
    ));
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML report to a file.
pub fn write_html_report(report: &StudyReport, path: &Path) -> Result<()> {
    let html = generate_html(report);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    Ok(())
}

fn metric(label: &str, value: &str) -> String {
    format!(
        "<div class=\"metric\"><span class=\"label\">{}</span><span class=\"value\">{}</span></div>\n",
        html_escape(label),
        html_escape(value)
    )
}

fn render_table(table: &DatasetTable) -> String {
    let mut html = format!(
        "<details>\n<summary>{} data ({} rows)</summary>\n",
        html_escape(&table.dataset.to_string()),
        table.rows.len()
    );
    if table.is_empty() {
        html.push_str("<p class=\"empty\">No rows yet.</p>\n</details>\n");
        return html;
    }

    html.push_str("<table>\n<thead><tr>");
    for column in &table.columns {
        html.push_str(&format!("<th>{}</th>", html_escape(column)));
    }
    html.push_str("</tr></thead>\n<tbody>\n");
    for row in &table.rows {
        html.push_str("<tr>");
        for cell in row {
            html.push_str(&format!("<td>{}</td>", html_escape(cell)));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody></table>\n</details>\n");
    html
}

/// Horizontal bar chart. Bars are scaled against `max`.
fn generate_bar_chart(bars: &[(&str, f64)], max: f64, label: impl Fn(f64) -> String) -> String {
    let bar_height = 30;
    let max_width = 400;
    let padding = 10;
    let label_width = 220;

    let total_height = bars.len() * (bar_height + padding) + padding;

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        label_width + max_width + 80,
        total_height
    );

    for (i, (name, value)) in bars.iter().enumerate() {
        let y = i * (bar_height + padding) + padding;
        let fraction = if max > 0.0 {
            (value / max).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let width = (fraction * max_width as f64) as usize;

        let color = if fraction >= 0.8 {
            "#22c55e"
        } else if fraction >= 0.5 {
            "#eab308"
        } else {
            "#ef4444"
        };

        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"14\" fill=\"currentColor\" text-anchor=\"end\" dominant-baseline=\"middle\">{}</text>\n",
            label_width - 10,
            y + bar_height / 2,
            html_escape(name)
        ));
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" rx=\"4\"/>\n",
            label_width, y, width, bar_height, color
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"currentColor\" dominant-baseline=\"middle\">{}</text>\n",
            label_width + width + 8,
            y + bar_height / 2,
            html_escape(&label(*value))
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --muted: #6b7280; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --muted: #9ca3af; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta, .empty { color: var(--muted); }
.metrics { display: flex; flex-wrap: wrap; gap: 1rem; }
.metric { border: 1px solid var(--border); border-radius: 8px; padding: 0.75rem 1rem; min-width: 10rem; }
.metric .label { display: block; font-size: 0.85rem; color: var(--muted); }
.metric .value { display: block; font-size: 1.5rem; font-weight: bold; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; }
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use uxstudy_core::model::{Dataset, Row};
    use uxstudy_core::statistics::compute_summary;

    fn make_test_report() -> StudyReport {
        let consent = vec![Row::new()
            .with("participant_id", "P-1")
            .with("display_name", "<script>")];
        let tasks = vec![
            Row::new()
                .with("task_name", "Task 1: Find an item")
                .with("success", "Success")
                .with("duration_seconds", "12.5"),
            Row::new()
                .with("task_name", "Task 2: Create an account")
                .with("success", "Partial")
                .with("duration_seconds", ""),
        ];
        StudyReport {
            id: uuid::Uuid::nil(),
            created_at: chrono::Utc::now(),
            summary: compute_summary(&consent, &[], &tasks, &[]),
            tables: vec![
                DatasetTable::from_rows(Dataset::Consent, &consent),
                DatasetTable::from_rows(Dataset::Task, &tasks),
            ],
        }
    }

    #[test]
    fn html_report_contains_required_elements() {
        let html = generate_html(&make_test_report());

        assert!(html.contains("<html"));
        assert!(html.contains("</html>"));
        assert!(html.contains("Success Rate by Task"));
        assert!(html.contains("Task 1: Find an item"));
        assert!(html.contains("100.0%"));
        assert!(html.contains("12.50s"));
        assert!(html.contains("No demographic data available yet."));
    }

    #[test]
    fn html_report_escapes_cells() {
        let html = generate_html(&make_test_report());
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn bar_chart_handles_zero_max() {
        let svg = generate_bar_chart(&[("T", 0.0)], 0.0, |v| format!("{v}"));
        assert!(svg.contains("width=\"0\""));
    }

    #[test]
    fn html_report_write_to_file() {
        let report = make_test_report();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.html");

        write_html_report(&report, &path).unwrap();
        assert!(path.exists());

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("<html"));
    }
}
