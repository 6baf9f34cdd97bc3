pub mod report;

use colored::{ColoredString, Colorize};

use crate::model::{SummaryStats, SyllabusStatus, ValidationResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Html,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "text" | "txt" => Some(Self::Text),
            "json" => Some(Self::Json),
            "html" | "htm" => Some(Self::Html),
            _ => None,
        }
    }
}

pub fn infer_format_from_path(path: &str) -> Option<OutputFormat> {
    let lower = path.trim().to_lowercase();
    if lower.ends_with(".json") {
        return Some(OutputFormat::Json);
    }
    if lower.ends_with(".html") || lower.ends_with(".htm") {
        return Some(OutputFormat::Html);
    }
    if lower.ends_with(".txt") {
        return Some(OutputFormat::Text);
    }
    None
}

fn syllabus_badge(status: &SyllabusStatus) -> ColoredString {
    let label = format!("[{}]", status.label());
    let label = label.as_str();
    match status {
        SyllabusStatus::InSyllabus => label.bold().green(),
        SyllabusStatus::OutOfSyllabus => label.bold().red(),
        _ => label.bold().yellow(),
    }
}

fn indent(text: &str, prefix: &str) -> String {
    let mut out = String::new();
    for line in text.trim().lines() {
        out.push_str(prefix);
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

/// One result as a terminal card. Colors follow `colored`'s global
/// override, so this also serves the plain-text file output.
pub fn render_card(result: &ValidationResult) -> String {
    let mut out = String::new();

    let mut header = result.question_id_label().as_str().bold().cyan().to_string();
    if let Some(status) = result.syllabus_status() {
        header.push(' ');
        header.push_str(&syllabus_badge(status).to_string());
    }
    if let Some(badge) = result.textbook_status().and_then(|s| s.badge()) {
        let badge = format!("[{badge}]");
        let badge = badge.as_str();
        let badge = if result.is_in_textbook() {
            badge.bold().blue()
        } else {
            badge.bold().magenta()
        };
        header.push(' ');
        header.push_str(&badge.to_string());
    }
    out.push_str(&header);
    out.push('\n');

    out.push_str(&indent(result.question_text(), "    "));

    out.push_str(&format!("  {}\n", "Syllabus Analysis".bold().white()));
    out.push_str(&indent(result.syllabus_reasoning(), "    "));

    if let Some(reasoning) = result.textbook_analysis() {
        out.push_str(&format!("  {}\n", "Textbook Analysis".bold().white()));
        out.push_str(&indent(reasoning, "    "));
    }
    out
}

pub fn render_summary(stats: &SummaryStats) -> String {
    format!(
        ":: {:<16}: {}\n:: {:<16}: {}\n:: {:<16}: {}\n:: {:<16}: {}\n",
        "Questions",
        stats.total.to_string().as_str().bold().white(),
        "In Syllabus",
        stats.in_syllabus.to_string().as_str().bold().green(),
        "Out of Syllabus",
        stats.out_of_syllabus.to_string().as_str().bold().red(),
        "In Textbook",
        stats.in_textbook.to_string().as_str().bold().blue(),
    )
}

pub fn render_text(records: &[&ValidationResult], stats: &SummaryStats) -> Vec<u8> {
    let mut out = render_summary(stats);
    for r in records {
        out.push('\n');
        out.push_str(&render_card(r));
    }
    out.into_bytes()
}

pub fn render_json(records: &[ValidationResult]) -> Vec<u8> {
    let mut out = serde_json::to_vec_pretty(records).unwrap_or_else(|_| b"[]".to_vec());
    out.push(b'\n');
    out
}

pub fn render_html(records: &[ValidationResult], stats: &SummaryStats) -> Vec<u8> {
    report::render_html(records, stats)
}
