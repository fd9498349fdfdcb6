use kwait_core::{ResourceStatusRecord, WaitPhase, WaitReport};
use serde::Serialize;

pub use crate::types::OutputFormat;

/// Serializable view of a finished wait.
#[derive(Serialize)]
pub struct ReportView<'a> {
    pub phase: WaitPhase,
    pub ready: bool,
    pub events_processed: usize,
    pub resources: &'a [ResourceStatusRecord],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<'a> From<&'a WaitReport> for ReportView<'a> {
    fn from(report: &'a WaitReport) -> Self {
        Self {
            phase: report.phase,
            ready: report.is_ready(),
            events_processed: report.events_processed,
            resources: &report.records,
            error: report.result.as_ref().err().map(|e| e.to_string()),
        }
    }
}

/// Output formatting interface
pub trait Formatter {
    fn format(&self, view: &ReportView<'_>) -> anyhow::Result<String>;
}

pub struct JsonFormatter;
pub struct TableFormatter;

impl Formatter for JsonFormatter {
    fn format(&self, view: &ReportView<'_>) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(view)?)
    }
}

impl Formatter for TableFormatter {
    fn format(&self, view: &ReportView<'_>) -> anyhow::Result<String> {
        let headers = ["NAMESPACE", "KIND", "NAME", "STATUS", "MESSAGE"];
        let mut table = String::new();
        table.push_str(&format!("{}\n", headers.join(" | ")));
        table.push_str(&format!("{}\n", "-".repeat(headers.join(" | ").len())));
        for r in view.resources {
            let row = [
                r.id.namespace.as_str(),
                r.id.kind(),
                r.id.name.as_str(),
                r.status.as_str(),
                r.message.as_deref().unwrap_or(""),
            ];
            table.push_str(&format!("{}\n", row.join(" | ")));
        }
        table.push('\n');
        match &view.error {
            None => table.push_str("resources are ready"),
            Some(e) => table.push_str(&format!("error waiting for ready: {e}")),
        }
        Ok(table)
    }
}

pub fn get_formatter(format: &OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Table => Box::new(TableFormatter),
    }
}

pub fn format_report(
    report: &WaitReport,
    format: &OutputFormat,
) -> anyhow::Result<String> {
    get_formatter(format).format(&ReportView::from(report))
}

pub fn print_report(
    report: &WaitReport,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    println!("{}", format_report(report, format)?);
    Ok(())
}
