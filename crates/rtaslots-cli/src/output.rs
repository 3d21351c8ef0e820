//! Report persistence.
//!
//! The report is written once, at the very end of a run, fully overwriting
//! the previous document. A run that fails before this point leaves the old
//! artifact untouched.

use std::fs;
use std::path::Path;

use anyhow::Context;

use rtaslots_core::CrawlReport;

/// Write the report as pretty-printed JSON, creating parent directories as
/// needed.
///
/// # Errors
///
/// Fails if the directory cannot be created or the file cannot be written.
pub fn write_report(path: &Path, report: &CrawlReport) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output directory {}", parent.display()))?;
        }
    }
    let json = serde_json::to_string_pretty(report).context("serializing crawl report")?;
    fs::write(path, json).with_context(|| format!("writing report to {}", path.display()))?;
    Ok(())
}
