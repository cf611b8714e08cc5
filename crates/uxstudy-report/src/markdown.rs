//! Markdown summary of a study report.

use uxstudy_core::statistics::StudySummary;

fn opt(value: Option<f64>, precision: usize) -> String {
    value
        .map(|v| format!("{v:.precision$}"))
        .unwrap_or_else(|| "-".to_string())
}

/// Format the summary as Markdown tables.
pub fn to_markdown(summary: &StudySummary) -> String {
    let mut md = String::new();

    md.push_str("## Usability Report\n\n");
    md.push_str(&format!(
        "**Participants:** {} consents, {} demographic responses, {} exit responses\n\n",
        summary.consent_count, summary.demographics.count, summary.exit.count
    ));

    md.push_str("### Demographics\n\n");
    md.push_str("| Average Age | Avg Familiarity (1-5) | Responses |\n");
    md.push_str("|-------------|-----------------------|-----------|\n");
    md.push_str(&format!(
        "| {} | {} | {} |\n\n",
        opt(summary.demographics.mean_age, 1),
        opt(summary.demographics.mean_familiarity, 2),
        summary.demographics.count
    ));

    if !summary.task_success_by_name.is_empty() {
        md.push_str("### Success Rate by Task\n\n");
        md.push_str("| Task | Success Rate | Trials |\n");
        md.push_str("|------|--------------|--------|\n");
        for t in &summary.task_success_by_name {
            md.push_str(&format!(
                "| {} | {:.1}% | {} |\n",
                escape_cell(&t.task_name),
                t.success_rate * 100.0,
                t.trials
            ));
        }
        md.push('\n');
    }

    if !summary.task_duration_by_name.is_empty() {
        md.push_str("### Average Duration by Task\n\n");
        md.push_str("| Task | Mean (s) | Timed Trials |\n");
        md.push_str("|------|----------|--------------|\n");
        for t in &summary.task_duration_by_name {
            md.push_str(&format!(
                "| {} | {:.2} | {} |\n",
                escape_cell(&t.task_name),
                t.mean_seconds,
                t.samples
            ));
        }
        md.push('\n');
    }

    if summary.exit.count > 0 {
        md.push_str("### Exit Questionnaire\n\n");
        md.push_str("| Metric | Mean |\n");
        md.push_str("|--------|------|\n");
        for m in &summary.exit.metrics {
            md.push_str(&format!("| {} | {:.2} |\n", m.metric, m.mean));
        }
        md.push_str(&format!("| NPS (0-10) | {} |\n", opt(summary.exit.mean_nps, 1)));
    }

    md
}

/// Pipes would split a table cell.
fn escape_cell(s: &str) -> String {
    s.replace('|', "\\|")
}
