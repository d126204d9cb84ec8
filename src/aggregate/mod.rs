//! Column lookup and per-category summation over a single source table.

use tracing::{debug, trace};

use crate::error::{Result, ToolError};
use crate::model::{CategoryAccumulator, RowInterval, Taxonomy};
use crate::source::TabularSource;

/// Returns the first column of `header_row` whose cell holds exactly `label`.
///
/// Columns `1..max_columns` are inspected; the bound itself is excluded.
pub fn resolve_column<S: TabularSource + ?Sized>(
    source: &S,
    header_row: u32,
    label: &str,
    max_columns: u32,
) -> Result<u32> {
    for column in 1..max_columns {
        let value = source.cell(header_row, column);
        trace!(row = header_row, column, %value, "header cell");
        if value.matches_label(label) {
            debug!(row = header_row, column, label, "resolved period column");
            return Ok(column);
        }
    }

    Err(ToolError::ConfigurationMismatch {
        row: header_row,
        label: label.to_string(),
        max_columns,
    })
}

/// Sums the integer values of `column` over rows `[row_start, row_end)`.
///
/// Empty cells count as zero. Any other value that is not an integer, or a
/// value that pushes the sum past the `i64` range, aborts the sum with
/// [`ToolError::MalformedCell`].
pub fn sum_range<S: TabularSource + ?Sized>(
    source: &S,
    column: u32,
    row_start: u32,
    row_end: u32,
) -> Result<i64> {
    let mut total = 0i64;
    for row in row_start..row_end {
        let value = source.cell(row, column);
        let malformed = || ToolError::MalformedCell {
            row,
            column,
            value: value.to_string(),
        };
        let count = value.as_count().ok_or_else(malformed)?;
        total = total.checked_add(count).ok_or_else(malformed)?;
        debug!("Linha:{row:02} Coluna:{column:02} Valor:{count:03} Total:{total:03}");
    }
    Ok(total)
}

fn sum_intervals<S: TabularSource + ?Sized>(
    source: &S,
    column: u32,
    category: &str,
    intervals: &[RowInterval],
) -> Result<i64> {
    intervals.iter().try_fold(0i64, |total, interval| {
        let sum = sum_range(source, column, interval.start(), interval.end())?;
        total
            .checked_add(sum)
            .ok_or_else(|| ToolError::TotalOverflow(category.to_string()))
    })
}

/// Sums every category of `taxonomy` in `column` and adds the results to
/// `accumulator`.
///
/// Totals are only committed once every category summed successfully, so a
/// failed call leaves the accumulator untouched.
pub fn aggregate_into<S: TabularSource + ?Sized>(
    source: &S,
    column: u32,
    taxonomy: &Taxonomy,
    accumulator: &mut CategoryAccumulator,
) -> Result<()> {
    let totals = taxonomy
        .categories()
        .iter()
        .map(|category| {
            debug!(category = %category.name, intervals = ?category.rows, "summing category");
            sum_intervals(source, column, &category.name, &category.rows)
                .map(|total| (category.name.as_str(), total))
        })
        .collect::<Result<Vec<_>>>()?;

    accumulator.add_all(totals)
}

/// Sums every category of `taxonomy` in `column` into a fresh accumulator.
pub fn aggregate<S: TabularSource + ?Sized>(
    source: &S,
    column: u32,
    taxonomy: &Taxonomy,
) -> Result<CategoryAccumulator> {
    let mut accumulator = CategoryAccumulator::new();
    aggregate_into(source, column, taxonomy, &mut accumulator)?;
    Ok(accumulator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CellValue;
    use crate::source::Grid;

    fn header() -> Grid {
        Grid::new()
            .with_text(5, 1, "Indicador")
            .with_text(5, 2, "2017/2018")
            .with_text(5, 3, "2018/2019")
    }

    #[test]
    fn resolves_exact_label() {
        let grid = header();
        assert_eq!(resolve_column(&grid, 5, "2018/2019", 100).unwrap(), 3);
    }

    #[test]
    fn label_match_is_exact() {
        let grid = header().with_text(5, 4, " 2019/2020");
        let error = resolve_column(&grid, 5, "2019/2020", 100).unwrap_err();
        assert!(matches!(
            error,
            ToolError::ConfigurationMismatch { row: 5, ref label, .. } if label == "2019/2020"
        ));
    }

    #[test]
    fn search_stops_before_bound() {
        let grid = Grid::new().with_text(5, 10, "2018/2019");
        assert!(resolve_column(&grid, 5, "2018/2019", 10).is_err());
        assert_eq!(resolve_column(&grid, 5, "2018/2019", 11).unwrap(), 10);
    }

    #[test]
    fn empty_range_is_zero_regardless_of_contents() {
        let grid = Grid::new().with_text(7, 3, "not a number");
        assert_eq!(sum_range(&grid, 3, 7, 7).unwrap(), 0);
    }

    #[test]
    fn absent_cells_count_as_zero() {
        let grid = Grid::new().with_int(2, 3, 5).with_int(4, 3, 1);
        assert_eq!(sum_range(&grid, 3, 1, 6).unwrap(), 6);
    }

    #[test]
    fn malformed_cell_reports_position_and_value() {
        let grid = Grid::new().with_int(2, 3, 5).with_text(3, 3, "dois");
        let error = sum_range(&grid, 3, 2, 4).unwrap_err();
        match error {
            ToolError::MalformedCell { row, column, value } => {
                assert_eq!((row, column, value.as_str()), (3, 3, "dois"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn huge_float_cell_is_rejected_instead_of_overflowing() {
        let grid = Grid::new()
            .with(2, 1, CellValue::Float(1e30))
            .with_int(3, 1, 5);
        let error = sum_range(&grid, 1, 2, 4).unwrap_err();
        assert!(matches!(error, ToolError::MalformedCell { row: 2, column: 1, .. }));
    }

    #[test]
    fn sum_past_i64_range_is_rejected() {
        let grid = Grid::new()
            .with_int(2, 1, i64::MAX)
            .with_int(3, 1, 1);
        let error = sum_range(&grid, 1, 2, 4).unwrap_err();
        match error {
            ToolError::MalformedCell { row, value, .. } => {
                assert_eq!((row, value.as_str()), (3, "1"));
            }
            other => panic!("unexpected error: {other}"),
        }

        let split = Grid::new()
            .with_int(2, 1, i64::MAX)
            .with_int(5, 1, 1);
        let taxonomy = Taxonomy::new()
            .with_category("big", &[(2, 3), (5, 6)])
            .unwrap();
        let error = aggregate(&split, 1, &taxonomy).unwrap_err();
        assert!(matches!(error, ToolError::TotalOverflow(ref name) if name == "big"));
    }

    #[test]
    fn accumulated_overflow_leaves_accumulator_untouched() {
        let taxonomy = Taxonomy::new().with_category("A", &[(2, 3)]).unwrap();
        let grid = Grid::new().with_int(2, 1, 2);
        let mut accumulator: CategoryAccumulator =
            [("A", i64::MAX - 1)].into_iter().collect();

        assert!(aggregate_into(&grid, 1, &taxonomy, &mut accumulator).is_err());
        assert_eq!(accumulator.get("A"), Some(i64::MAX - 1));
    }

    #[test]
    fn single_interval_scenario() {
        let grid = Grid::new().with_int(2, 1, 5).with_int(3, 1, 7);
        let taxonomy = Taxonomy::new().with_category("A", &[(2, 4)]).unwrap();
        let result = aggregate(&grid, 1, &taxonomy).unwrap();
        assert_eq!(result, [("A", 12)].into_iter().collect::<CategoryAccumulator>());
    }

    #[test]
    fn category_total_is_sum_of_its_intervals() {
        let grid = (1..=10).fold(Grid::new(), |grid, row| grid.with_int(row, 2, i64::from(row)));
        let taxonomy = Taxonomy::new()
            .with_category("split", &[(1, 3), (5, 8)])
            .unwrap();
        let expected = sum_range(&grid, 2, 1, 3).unwrap() + sum_range(&grid, 2, 5, 8).unwrap();
        assert_eq!(aggregate(&grid, 2, &taxonomy).unwrap().get("split"), Some(expected));
    }

    #[test]
    fn every_category_is_present_even_when_zero() {
        let grid = Grid::new();
        let taxonomy = Taxonomy::new()
            .with_category("vazio", &[(8, 15)])
            .unwrap()
            .with_category("sem linhas", &[])
            .unwrap();
        let result = aggregate(&grid, 1, &taxonomy).unwrap();
        assert_eq!(
            result,
            [("vazio", 0), ("sem linhas", 0)]
                .into_iter()
                .collect::<CategoryAccumulator>()
        );
    }

    #[test]
    fn repeated_aggregation_matches_combined_source() {
        let taxonomy = Taxonomy::new()
            .with_category("A", &[(2, 4)])
            .unwrap()
            .with_category("B", &[(4, 6)])
            .unwrap();
        let first = Grid::new().with_int(2, 1, 1).with_int(4, 1, 10);
        let second = Grid::new().with_int(3, 1, 2).with_int(5, 1, 20);
        let union = Grid::new()
            .with_int(2, 1, 1)
            .with_int(3, 1, 2)
            .with_int(4, 1, 10)
            .with_int(5, 1, 20);

        let mut merged = CategoryAccumulator::new();
        aggregate_into(&first, 1, &taxonomy, &mut merged).unwrap();
        aggregate_into(&second, 1, &taxonomy, &mut merged).unwrap();

        assert_eq!(merged, aggregate(&union, 1, &taxonomy).unwrap());
    }

    #[test]
    fn failed_aggregation_leaves_accumulator_untouched() {
        let taxonomy = Taxonomy::new()
            .with_category("ok", &[(2, 3)])
            .unwrap()
            .with_category("broken", &[(3, 4)])
            .unwrap();
        let grid = Grid::new()
            .with_int(2, 1, 4)
            .with(3, 1, CellValue::Text("x".into()));
        let mut accumulator: CategoryAccumulator = [("ok", 1)].into_iter().collect();

        assert!(aggregate_into(&grid, 1, &taxonomy, &mut accumulator).is_err());
        assert_eq!(
            accumulator,
            [("ok", 1)].into_iter().collect::<CategoryAccumulator>()
        );
    }
}
