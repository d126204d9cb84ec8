use std::path::Path;

use tracing::{debug, info, instrument};

use crate::batch::{BatchOutcome, GroupSource, run_batch};
use crate::config::ReportConfig;
use crate::error::Result;
use crate::io::discover::{DiscoveredSource, discover_sources};
use crate::io::excel_read;
use crate::io::excel_write;
use crate::report::{build_report, log_results};

/// Aggregates the given workbooks and writes the consolidated report.
///
/// Nothing is written unless every workbook was read and summed successfully.
#[instrument(level = "info", skip_all, fields(output = %output.display(), sources = sources.len()))]
pub fn sources_to_report(
    sources: &[DiscoveredSource],
    output: &Path,
    config: &ReportConfig,
) -> Result<BatchOutcome> {
    let tables = sources.iter().map(|discovered| {
        info!(path = %discovered.path.display(), "reading workbook");
        excel_read::read_sheet(&discovered.path, &config.sheet_name)
            .map(|sheet| GroupSource::new(discovered.group.clone(), sheet))
    });
    let outcome = run_batch(tables, config)?;

    info!(groups = outcome.groups.len(), "aggregation finished");
    debug!(summary = ?outcome.periods, "summary totals");
    log_results(&outcome.periods);
    log_results(&outcome.groups);

    let report = build_report(&outcome);
    debug!(sheet_count = report.sheets.len(), "report constructed");
    excel_write::write_workbook(output, &report)?;
    Ok(outcome)
}

/// Discovers every workbook under `input_dir` and writes the consolidated
/// report to `output`.
#[instrument(
    level = "info",
    skip_all,
    fields(input = %input_dir.display(), output = %output.display(), period = %config.period_label)
)]
pub fn directory_to_report(
    input_dir: &Path,
    output: &Path,
    config: &ReportConfig,
) -> Result<BatchOutcome> {
    let sources = discover_sources(input_dir, Some(output))?;
    info!(source_count = sources.len(), "discovered workbooks");
    sources_to_report(&sources, output, config)
}
