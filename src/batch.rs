//! Aggregation across every source table of a run.

use tracing::{info, instrument, warn};

use crate::aggregate::{aggregate, aggregate_into, resolve_column};
use crate::config::{DuplicatePolicy, ReportConfig};
use crate::error::{Result, ToolError};
use crate::model::{CategoryAccumulator, GroupId, GroupResultSet, PeriodResultSet};
use crate::source::TabularSource;

/// A source table together with the group it reports for.
#[derive(Debug, Clone)]
pub struct GroupSource<S> {
    pub group: GroupId,
    pub source: S,
}

impl<S> GroupSource<S> {
    pub fn new(group: impl Into<GroupId>, source: S) -> Self {
        Self {
            group: group.into(),
            source,
        }
    }
}

/// Accumulated results of a successful batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchOutcome {
    /// Summary totals merged across all sources, keyed by period.
    pub periods: PeriodResultSet,
    /// Detail totals per group.
    pub groups: GroupResultSet,
}

/// Aggregates every source in the order given.
///
/// Each source contributes its summary totals to a single shared accumulator
/// and its detail totals to a fresh accumulator stored under its group. The
/// first error from any source (including failing to open it) aborts the
/// whole batch and nothing accumulated so far is returned.
#[instrument(level = "info", skip_all, fields(period = %config.period_label))]
pub fn run_batch<S, I>(sources: I, config: &ReportConfig) -> Result<BatchOutcome>
where
    S: TabularSource,
    I: IntoIterator<Item = Result<GroupSource<S>>>,
    I::IntoIter: ExactSizeIterator,
{
    let sources = sources.into_iter();
    let total = sources.len();

    let mut summary: CategoryAccumulator = config
        .summary
        .categories()
        .iter()
        .map(|category| (category.name.as_str(), 0))
        .collect();
    let mut groups = GroupResultSet::new();

    for (index, entry) in sources.enumerate() {
        let GroupSource { group, source } = entry?;
        info!("({}/{}) Grupo: {}", index + 1, total, group);

        let column = resolve_column(
            &source,
            config.header_row,
            &config.period_label,
            config.max_columns,
        )?;

        aggregate_into(&source, column, &config.summary, &mut summary)?;
        let detail = aggregate(&source, column, &config.detail)?;
        store_group(&mut groups, group, detail, config.duplicate_groups)?;
    }

    let mut periods = PeriodResultSet::new();
    periods.insert(config.period_key(), summary);

    Ok(BatchOutcome { periods, groups })
}

fn store_group(
    groups: &mut GroupResultSet,
    group: GroupId,
    detail: CategoryAccumulator,
    policy: DuplicatePolicy,
) -> Result<()> {
    if !groups.contains_key(&group) {
        groups.insert(group, detail);
        return Ok(());
    }

    match policy {
        DuplicatePolicy::Reject => return Err(ToolError::DuplicateGroup(group)),
        DuplicatePolicy::Merge => {
            warn!(%group, "duplicate group identifier, merging totals");
            if let Some(existing) = groups.get_mut(&group) {
                existing.merge(&detail)?;
            }
        }
        DuplicatePolicy::Overwrite => {
            warn!(%group, "duplicate group identifier, replacing earlier totals");
            groups.insert(group, detail);
        }
    }
    Ok(())
}
