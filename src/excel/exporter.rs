//! Excel exporter implementation - raw grid → Excel (.xlsx) bytes

use crate::error::{PayrollError, PayrollResult};
use crate::types::{CellValue, EmployeeRecord, Grid};
use rust_xlsxwriter::{Workbook, Worksheet};

/// Sheet name used for grid exports
pub const EXPORT_SHEET_NAME: &str = "Exported Data";

/// Header row of the employee register layout
pub const EMPLOYEE_HEADER: [&str; 4] = ["Employee ID", "Name", "Hours Worked", "Hourly Rate"];

/// Writes a grid to a single-sheet workbook, one input row per sheet row.
///
/// No header is synthesized; the sheet mirrors the grid literally.
pub struct GridExporter {
    sheet_name: String,
}

impl Default for GridExporter {
    fn default() -> Self {
        Self::new(EXPORT_SHEET_NAME)
    }
}

impl GridExporter {
    pub fn new(sheet_name: impl Into<String>) -> Self {
        Self {
            sheet_name: sheet_name.into(),
        }
    }

    /// Serialize `grid` to .xlsx bytes
    pub fn encode(&self, grid: &Grid) -> PayrollResult<Vec<u8>> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(&self.sheet_name)
            .map_err(|e| PayrollError::Export(format!("Failed to set worksheet name: {}", e)))?;

        for (row_idx, row) in grid.iter().enumerate() {
            let excel_row = u32::try_from(row_idx)
                .map_err(|_| PayrollError::Export("Too many rows".to_string()))?;
            for (col_idx, cell) in row.iter().enumerate() {
                let excel_col = u16::try_from(col_idx)
                    .map_err(|_| PayrollError::Export("Too many columns".to_string()))?;
                Self::write_cell(worksheet, excel_row, excel_col, cell)?;
            }
        }

        workbook
            .save_to_buffer()
            .map_err(|e| PayrollError::Export(format!("Failed to save Excel file: {}", e)))
    }

    fn write_cell(
        worksheet: &mut Worksheet,
        row: u32,
        col: u16,
        cell: &CellValue,
    ) -> PayrollResult<()> {
        match cell {
            // Leave the cell unwritten
            CellValue::Empty => Ok(()),
            CellValue::Text(s) if s.is_empty() => Ok(()),
            CellValue::Number(n) => worksheet
                .write_number(row, col, *n)
                .map(|_| ())
                .map_err(|e| PayrollError::Export(format!("Failed to write number: {}", e))),
            CellValue::Text(s) => worksheet
                .write_string(row, col, s)
                .map(|_| ())
                .map_err(|e| PayrollError::Export(format!("Failed to write text: {}", e))),
            CellValue::Bool(b) => worksheet
                .write_boolean(row, col, *b)
                .map(|_| ())
                .map_err(|e| PayrollError::Export(format!("Failed to write boolean: {}", e))),
        }
    }
}

/// Lay employee records out as a header row plus one row per record,
/// the same layout the employee importer reads back.
pub fn employees_to_grid(records: &[EmployeeRecord]) -> Grid {
    let mut grid: Grid = Vec::with_capacity(records.len() + 1);
    grid.push(EMPLOYEE_HEADER.iter().map(|h| CellValue::from(*h)).collect());
    for record in records {
        grid.push(vec![
            CellValue::Text(record.id.clone()),
            CellValue::Text(record.name.clone()),
            CellValue::Number(record.hours_worked),
            CellValue::Number(record.hourly_rate),
        ]);
    }
    grid
}
