mod json;
mod markdown;
mod terminal;

pub use json::JsonReporter;
pub use markdown::MarkdownReporter;
pub use terminal::TerminalReporter;

use crate::analysis::ScanResult;
use miette::Result;
use std::path::PathBuf;

/// Output format for reports
#[derive(Debug, Clone, Default)]
pub enum ReportFormat {
    #[default]
    Terminal,
    Json,
    Markdown,
}

/// Renders a scan result. The result object is read-only to reporters.
pub struct Reporter {
    format: ReportFormat,
    output_path: Option<PathBuf>,
    show_evidence: bool,
}

impl Reporter {
    pub fn new(format: ReportFormat, output_path: Option<PathBuf>, show_evidence: bool) -> Self {
        Self {
            format,
            output_path,
            show_evidence,
        }
    }

    pub fn report(&self, result: &ScanResult) -> Result<()> {
        match &self.format {
            ReportFormat::Terminal => TerminalReporter::new(self.show_evidence).report(result),
            ReportFormat::Json => JsonReporter::new(self.output_path.clone()).report(result),
            ReportFormat::Markdown => {
                MarkdownReporter::new(self.output_path.clone()).report(result)
            }
        }
    }
}
