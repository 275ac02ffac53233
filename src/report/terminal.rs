use crate::analysis::{ScanResult, Verdict};
use colored::Colorize;
use miette::Result;

/// Human-readable terminal output
pub struct TerminalReporter {
    show_evidence: bool,
}

impl TerminalReporter {
    pub fn new(show_evidence: bool) -> Self {
        Self { show_evidence }
    }

    pub fn report(&self, result: &ScanResult) -> Result<()> {
        println!();
        println!("{}", "Dead file analysis".bold());
        println!(
            "  {} files scanned, {} entry points, {} reachable",
            result.total_files,
            result.entry_points.len(),
            result.reachable_count
        );
        println!(
            "  cache: {} hits, {} misses",
            result.cache.hits, result.cache.misses
        );
        println!();

        if result.dead_files.is_empty() {
            println!("{}", "No dead files found.".green().bold());
            return Ok(());
        }

        for dead in &result.dead_files {
            let verdict = match dead.verdict {
                Verdict::Unreachable => dead.verdict.as_str().red().bold(),
                Verdict::PartiallyUnreachable => dead.verdict.as_str().yellow().bold(),
                Verdict::PossiblyLive => dead.verdict.as_str().blue().bold(),
                Verdict::Reachable => dead.verdict.as_str().green().bold(),
            };

            println!(
                "{} {} ({} lines, {} exports, confidence {:.0}% {})",
                verdict,
                dead.path.display().to_string().bold(),
                dead.lines,
                dead.exports.len(),
                dead.evidence.confidence * 100.0,
                dead.evidence.label
            );

            if self.show_evidence {
                println!(
                    "    {} of {} entry points reach it, {} incoming imports",
                    dead.evidence.entry_points_reaching,
                    dead.evidence.entry_points_total,
                    dead.evidence.incoming_edges
                );
                if let Some(pattern) = &dead.evidence.dynamic_match {
                    println!("    {} matches dynamic-usage pattern '{}'", "note:".blue(), pattern);
                }
            }
        }

        println!();
        let summary = format!("{} dead file(s)", result.dead_files.len());
        println!("{}", summary.red().bold());

        Ok(())
    }
}
