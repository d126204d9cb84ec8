use std::path::Path;

use rust_xlsxwriter::Workbook;

use crate::error::{Result, ToolError};
use crate::report::{ReportCell, ReportWorkbook};

/// Writes the rendered report to the given path, one worksheet per sheet.
pub fn write_workbook(path: &Path, report: &ReportWorkbook) -> Result<()> {
    let mut workbook_writer = Workbook::new();

    for sheet in &report.sheets {
        let worksheet = workbook_writer.add_worksheet();
        worksheet.set_name(&sheet.name)?;

        for ((row, column), cell) in sheet.cells() {
            let (row, column) = zero_based(row, column).ok_or_else(|| {
                ToolError::InvalidWorkbook(format!(
                    "cell ({row}, {column}) of sheet '{}' is out of range",
                    sheet.name
                ))
            })?;
            match cell {
                ReportCell::Text(value) => {
                    worksheet.write_string(row, column, value)?;
                }
                ReportCell::Number(value) => {
                    worksheet.write_number(row, column, *value as f64)?;
                }
            }
        }
    }

    workbook_writer.save(path)?;
    Ok(())
}

fn zero_based(row: u32, column: u32) -> Option<(u32, u16)> {
    let row = row.checked_sub(1)?;
    let column = u16::try_from(column.checked_sub(1)?).ok()?;
    Some((row, column))
}
