use crate::analysis::{ScanResult, Verdict};
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::path::PathBuf;

/// JSON reporter for programmatic consumption
pub struct JsonReporter {
    output_path: Option<PathBuf>,
}

impl JsonReporter {
    pub fn new(output_path: Option<PathBuf>) -> Self {
        Self { output_path }
    }

    pub fn report(&self, result: &ScanResult) -> Result<()> {
        let report = JsonReport::from_result(result);
        let json = serde_json::to_string_pretty(&report).into_diagnostic()?;

        if let Some(path) = &self.output_path {
            std::fs::write(path, &json).into_diagnostic()?;
            println!("Report written to: {}", path.display());
        } else {
            println!("{}", json);
        }

        Ok(())
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    version: &'static str,
    #[serde(flatten)]
    result: &'a ScanResult,
    summary: JsonSummary,
}

#[derive(Serialize)]
struct JsonSummary {
    dead_count: usize,
    unreachable: usize,
    partially_unreachable: usize,
    possibly_live: usize,
}

impl<'a> JsonReport<'a> {
    fn from_result(result: &'a ScanResult) -> Self {
        let mut unreachable = 0;
        let mut partially_unreachable = 0;
        let mut possibly_live = 0;

        for dead in &result.dead_files {
            match dead.verdict {
                Verdict::Unreachable => unreachable += 1,
                Verdict::PartiallyUnreachable => partially_unreachable += 1,
                Verdict::PossiblyLive => possibly_live += 1,
                Verdict::Reachable => {}
            }
        }

        Self {
            version: "1.0",
            result,
            summary: JsonSummary {
                dead_count: result.dead_files.len(),
                unreachable,
                partially_unreachable,
                possibly_live,
            },
        }
    }
}
