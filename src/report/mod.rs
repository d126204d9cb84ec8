//! Shapes accumulated totals into the sheets of the consolidated report.

use std::collections::BTreeMap;

use tracing::info;

use crate::batch::BatchOutcome;
use crate::model::ResultSet;

/// Sheet holding the merged summary per period.
pub const SUMMARY_SHEET: &str = "resumo";
/// Sheet holding the per-group detail as label/value blocks.
pub const DETAIL_SHEET: &str = "detalhes";
/// Sheet holding the per-group detail as a single cross-tabulated table.
pub const CROSSTAB_SHEET: &str = "detalhes_unica_tabela";
/// Label of the top-left cell of the cross-tabulated table.
pub const CROSSTAB_CORNER: &str = "Grupo";

/// A value written to the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportCell {
    Text(String),
    Number(i64),
}

/// Destination for rendered cells, addressed by `(row, column)` starting at 1.
pub trait TabularSink {
    fn write_text(&mut self, row: u32, column: u32, value: &str);
    fn write_number(&mut self, row: u32, column: u32, value: i64);
}

/// A named sheet of the report, kept in memory until the whole run succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSheet {
    pub name: String,
    cells: BTreeMap<(u32, u32), ReportCell>,
}

impl ReportSheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cells: BTreeMap::new(),
        }
    }

    pub fn cell(&self, row: u32, column: u32) -> Option<&ReportCell> {
        self.cells.get(&(row, column))
    }

    /// Populated cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = ((u32, u32), &ReportCell)> {
        self.cells.iter().map(|(position, cell)| (*position, cell))
    }

    /// Cells of one row from column 1 up to the last populated column.
    pub fn row(&self, row: u32) -> Vec<Option<ReportCell>> {
        let last = self
            .cells
            .range((row, 0)..=(row, u32::MAX))
            .map(|((_, column), _)| *column)
            .last()
            .unwrap_or(0);
        (1..=last)
            .map(|column| self.cell(row, column).cloned())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl TabularSink for ReportSheet {
    fn write_text(&mut self, row: u32, column: u32, value: &str) {
        self.cells
            .insert((row, column), ReportCell::Text(value.to_string()));
    }

    fn write_number(&mut self, row: u32, column: u32, value: i64) {
        self.cells.insert((row, column), ReportCell::Number(value));
    }
}

/// All sheets of the report in output order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportWorkbook {
    pub sheets: Vec<ReportSheet>,
}

impl ReportWorkbook {
    pub fn sheet(&self, name: &str) -> Option<&ReportSheet> {
        self.sheets.iter().find(|sheet| sheet.name == name)
    }
}

/// Writes each key as a label followed by one `category | total` row per
/// category. The first label lands on row 2 and consecutive blocks are
/// separated by one blank row.
pub fn render_linear<W: TabularSink + ?Sized>(sink: &mut W, results: &ResultSet) {
    let mut row = 0;
    for (key, totals) in results.iter() {
        row += 2;
        sink.write_text(row, 1, key);

        for (category, total) in totals.iter() {
            row += 1;
            sink.write_text(row, 1, category);
            sink.write_number(row, 2, total);
        }
    }
}

/// Writes one header row of category names followed by one row per key.
///
/// Columns follow the categories of the first entry. Values are looked up by
/// category name in each entry's own totals; a category the entry lacks is
/// left blank.
pub fn render_crosstab<W: TabularSink + ?Sized>(sink: &mut W, results: &ResultSet) {
    sink.write_text(1, 1, CROSSTAB_CORNER);

    let columns: Vec<&str> = match results.iter().next() {
        Some((_, first)) => first.categories().collect(),
        None => return,
    };
    for (index, category) in (2u32..).zip(&columns) {
        sink.write_text(1, index, category);
    }

    for (row, (key, totals)) in (2u32..).zip(results.iter()) {
        sink.write_text(row, 1, key);
        for (column, category) in (2u32..).zip(&columns) {
            if let Some(total) = totals.get(category) {
                sink.write_number(row, column, total);
            }
        }
    }
}

/// Builds the three report sheets from a finished batch.
pub fn build_report(outcome: &BatchOutcome) -> ReportWorkbook {
    let mut summary = ReportSheet::new(SUMMARY_SHEET);
    render_linear(&mut summary, &outcome.periods);

    let mut detail = ReportSheet::new(DETAIL_SHEET);
    render_linear(&mut detail, &outcome.groups);

    let mut crosstab = ReportSheet::new(CROSSTAB_SHEET);
    render_crosstab(&mut crosstab, &outcome.groups);

    ReportWorkbook {
        sheets: vec![summary, detail, crosstab],
    }
}

/// Logs every entry as an aligned `category | total` listing.
pub fn log_results(results: &ResultSet) {
    for (key, totals) in results.iter() {
        info!("{key}");
        let width = totals
            .categories()
            .map(|category| category.chars().count())
            .max()
            .unwrap_or(0);
        for (category, total) in totals.iter() {
            info!("{category:<width$} | {total:03}");
        }
        info!("");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CategoryAccumulator;

    fn text(value: &str) -> Option<ReportCell> {
        Some(ReportCell::Text(value.to_string()))
    }

    fn number(value: i64) -> Option<ReportCell> {
        Some(ReportCell::Number(value))
    }

    fn groups(entries: &[(&str, &[(&str, i64)])]) -> ResultSet {
        let mut results = ResultSet::new();
        for (key, totals) in entries {
            results.insert(
                *key,
                totals.iter().copied().collect::<CategoryAccumulator>(),
            );
        }
        results
    }

    #[test]
    fn crosstab_lists_groups_against_categories() {
        let results = groups(&[("g1", &[("X", 3), ("Y", 0)]), ("g2", &[("X", 3), ("Y", 0)])]);
        let mut sheet = ReportSheet::new(CROSSTAB_SHEET);
        render_crosstab(&mut sheet, &results);

        assert_eq!(sheet.row(1), vec![text("Grupo"), text("X"), text("Y")]);
        assert_eq!(sheet.row(2), vec![text("g1"), number(3), number(0)]);
        assert_eq!(sheet.row(3), vec![text("g2"), number(3), number(0)]);
        assert!(sheet.row(4).is_empty());
    }

    #[test]
    fn crosstab_keys_values_by_category_name() {
        let results = groups(&[("g1", &[("X", 1), ("Y", 2)]), ("g2", &[("Y", 20), ("Z", 30)])]);
        let mut sheet = ReportSheet::new(CROSSTAB_SHEET);
        render_crosstab(&mut sheet, &results);

        assert_eq!(sheet.row(1), vec![text("Grupo"), text("X"), text("Y")]);
        assert_eq!(sheet.row(3), vec![text("g2"), None, number(20)]);
    }

    #[test]
    fn crosstab_of_no_groups_is_header_only() {
        let mut sheet = ReportSheet::new(CROSSTAB_SHEET);
        render_crosstab(&mut sheet, &ResultSet::new());
        assert_eq!(sheet.cells().count(), 1);
        assert_eq!(sheet.row(1), vec![text("Grupo")]);
    }

    #[test]
    fn linear_blocks_are_separated_by_one_blank_row() {
        let results = groups(&[("g1", &[("X", 3), ("Y", 4)]), ("g2", &[("X", 5)])]);
        let mut sheet = ReportSheet::new(DETAIL_SHEET);
        render_linear(&mut sheet, &results);

        assert!(sheet.row(1).is_empty());
        assert_eq!(sheet.row(2), vec![text("g1")]);
        assert_eq!(sheet.row(3), vec![text("X"), number(3)]);
        assert_eq!(sheet.row(4), vec![text("Y"), number(4)]);
        assert!(sheet.row(5).is_empty());
        assert_eq!(sheet.row(6), vec![text("g2")]);
        assert_eq!(sheet.row(7), vec![text("X"), number(5)]);
    }

    #[test]
    fn report_has_three_sheets_in_order() {
        let outcome = BatchOutcome {
            periods: groups(&[("Ano: 2018/2019", &[("A", 12)])]),
            groups: groups(&[("g1", &[("X", 3)])]),
        };
        let report = build_report(&outcome);
        let names: Vec<_> = report.sheets.iter().map(|sheet| sheet.name.as_str()).collect();
        assert_eq!(names, [SUMMARY_SHEET, DETAIL_SHEET, CROSSTAB_SHEET]);

        let summary = report.sheet(SUMMARY_SHEET).unwrap();
        assert_eq!(summary.row(2), vec![text("Ano: 2018/2019")]);
        assert_eq!(summary.row(3), vec![text("A"), number(12)]);
    }
}
