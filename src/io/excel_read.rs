use std::path::Path;

use calamine::{DataType, Range, Reader, Xlsx, open_workbook};
use tracing::debug;

use crate::error::{Result, ToolError};
use crate::model::CellValue;
use crate::source::TabularSource;

/// One worksheet of a group workbook, loaded in full.
#[derive(Debug, Clone)]
pub struct SheetSource {
    range: Range<DataType>,
}

impl SheetSource {
    pub fn new(range: Range<DataType>) -> Self {
        Self { range }
    }
}

impl TabularSource for SheetSource {
    fn cell(&self, row: u32, column: u32) -> CellValue {
        if row == 0 || column == 0 {
            return CellValue::Empty;
        }
        cell_value(self.range.get_value((row - 1, column - 1)))
    }
}

/// Opens `path` and loads the sheet called `sheet`.
pub fn read_sheet(path: &Path, sheet: &str) -> Result<SheetSource> {
    if !path.exists() {
        return Err(ToolError::MissingInput(path.to_path_buf()));
    }

    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let range = read_required_sheet(&mut workbook, path, sheet)?;
    debug!(
        path = %path.display(),
        sheet,
        start = ?range.start(),
        end = ?range.end(),
        "loaded sheet"
    );
    Ok(SheetSource::new(range))
}

fn read_required_sheet<R: std::io::Read + std::io::Seek>(
    workbook: &mut Xlsx<R>,
    path: &Path,
    name: &str,
) -> Result<Range<DataType>> {
    let range_result = workbook
        .worksheet_range(name)
        .ok_or_else(|| ToolError::MissingSheet {
            path: path.to_path_buf(),
            sheet: name.to_string(),
        })?;
    let range = range_result.map_err(ToolError::from)?;
    Ok(range)
}

fn cell_value(cell: Option<&DataType>) -> CellValue {
    match cell {
        Some(DataType::Empty) | None => CellValue::Empty,
        Some(DataType::Int(value)) => CellValue::Int(*value),
        Some(DataType::Float(value)) => CellValue::Float(*value),
        Some(DataType::Bool(value)) => CellValue::Bool(*value),
        Some(DataType::String(value)) => CellValue::Text(value.clone()),
        Some(other) => CellValue::Other(other.to_string()),
    }
}
