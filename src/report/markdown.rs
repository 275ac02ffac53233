use crate::analysis::ScanResult;
use miette::{IntoDiagnostic, Result};
use std::fmt::Write as _;
use std::path::PathBuf;

/// Markdown reporter, suitable for CI artifacts and PR comments
pub struct MarkdownReporter {
    output_path: Option<PathBuf>,
}

impl MarkdownReporter {
    pub fn new(output_path: Option<PathBuf>) -> Self {
        Self { output_path }
    }

    pub fn report(&self, result: &ScanResult) -> Result<()> {
        let markdown = render(result);

        if let Some(path) = &self.output_path {
            std::fs::write(path, &markdown).into_diagnostic()?;
            println!("Report written to: {}", path.display());
        } else {
            println!("{}", markdown);
        }

        Ok(())
    }
}

fn render(result: &ScanResult) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "# Dead file report\n");
    let _ = writeln!(out, "| Metric | Value |");
    let _ = writeln!(out, "| --- | --- |");
    let _ = writeln!(out, "| Files scanned | {} |", result.total_files);
    let _ = writeln!(out, "| Entry points | {} |", result.entry_points.len());
    let _ = writeln!(out, "| Reachable | {} |", result.reachable_count);
    let _ = writeln!(out, "| Dead | {} |", result.dead_files.len());
    let _ = writeln!(out);

    if result.dead_files.is_empty() {
        let _ = writeln!(out, "No dead files found.");
        return out;
    }

    let _ = writeln!(out, "## Findings\n");
    let _ = writeln!(out, "| File | Verdict | Confidence | Lines | Exports |");
    let _ = writeln!(out, "| --- | --- | --- | --- | --- |");
    for dead in &result.dead_files {
        let _ = writeln!(
            out,
            "| `{}` | {} | {:.0}% ({}) | {} | {} |",
            dead.path.display(),
            dead.verdict,
            dead.evidence.confidence * 100.0,
            dead.evidence.label,
            dead.lines,
            dead.exports.len()
        );
    }

    let possibly_live: Vec<_> = result
        .dead_files
        .iter()
        .filter_map(|d| {
            d.evidence
                .dynamic_match
                .as_ref()
                .map(|pattern| (d.path.clone(), pattern.clone()))
        })
        .collect();

    if !possibly_live.is_empty() {
        let _ = writeln!(out, "\n## Dynamic-usage notes\n");
        for (path, pattern) in possibly_live {
            let _ = writeln!(
                out,
                "- `{}` matches dynamic pattern `{}`; verify before removal",
                path.display(),
                pattern
            );
        }
    }

    out
}
