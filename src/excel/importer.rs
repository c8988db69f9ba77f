//! Excel importer implementation - Excel (.xlsx) bytes → records / raw grid

use crate::error::{PayrollError, PayrollResult};
use crate::types::{CellValue, EmployeeRecord, Grid, GridRow};
use calamine::{open_workbook_from_rs, Data, Range, Reader, Xlsx};
use std::io::Cursor;
use tracing::debug;

/// Decodes spreadsheet bytes into some in-memory form
pub trait SpreadsheetDecoder {
    type Output;

    fn decode(&self, bytes: &[u8]) -> PayrollResult<Self::Output>;
}

/// Why a data row did not become a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowRejection {
    MissingId,
    MissingName,
}

/// Outcome of decoding an employee sheet
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EmployeeImport {
    /// Admitted records, in sheet order
    pub records: Vec<EmployeeRecord>,
    /// 1-based sheet rows that were filtered out
    pub skipped_rows: Vec<u32>,
}

/// Open the first worksheet of an .xlsx document held in memory
fn first_sheet(bytes: &[u8]) -> PayrollResult<Range<Data>> {
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes))
        .map_err(|e| PayrollError::Decode(format!("Failed to open Excel file: {}", e)))?;

    let first = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| PayrollError::Decode("Workbook contains no worksheets".to_string()))?;

    workbook
        .worksheet_range(&first)
        .map_err(|e| PayrollError::Decode(format!("Failed to read sheet '{}': {}", first, e)))
}

/// Importer for the employee register layout.
///
/// Sheet row 1 is a header. Every later row reads columns A..D as
/// `id, name, hours worked, hourly rate`.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmployeeImporter;

impl EmployeeImporter {
    pub fn new() -> Self {
        Self
    }

    /// Turn the four leading cells of a row into a record, or say why not
    pub fn coerce_row(cells: [Option<&Data>; 4]) -> Result<EmployeeRecord, RowRejection> {
        let [id, name, hours, rate] = cells;
        let record = EmployeeRecord {
            id: coerce_text(id),
            name: coerce_text(name),
            hours_worked: coerce_number(hours),
            hourly_rate: coerce_number(rate),
        };

        if record.id.is_empty() {
            Err(RowRejection::MissingId)
        } else if record.name.is_empty() {
            Err(RowRejection::MissingName)
        } else {
            Ok(record)
        }
    }
}

impl SpreadsheetDecoder for EmployeeImporter {
    type Output = EmployeeImport;

    fn decode(&self, bytes: &[u8]) -> PayrollResult<EmployeeImport> {
        let range = first_sheet(bytes)?;
        let mut import = EmployeeImport::default();

        let (Some(_), Some((last_row, _))) = (range.start(), range.end()) else {
            return Ok(import);
        };

        // Absolute positions: the used range may not start at A1
        for row in 1..=last_row {
            let cells = [0u32, 1, 2, 3].map(|col| range.get_value((row, col)));
            if cells.iter().all(|c| c.map_or(true, |d| matches!(d, Data::Empty))) {
                continue;
            }

            match Self::coerce_row(cells) {
                Ok(record) => import.records.push(record),
                Err(reason) => {
                    debug!(row = row + 1, ?reason, "skipping row");
                    import.skipped_rows.push(row + 1);
                }
            }
        }

        Ok(import)
    }
}

/// Cell → text, empty when the cell is missing
fn coerce_text(cell: Option<&Data>) -> String {
    match cell {
        None | Some(Data::Empty) => String::new(),
        Some(Data::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Cell → number, 0 when missing or not numeric
fn coerce_number(cell: Option<&Data>) -> f64 {
    let value = match cell {
        Some(Data::Float(f)) => *f,
        Some(Data::Int(i)) => *i as f64,
        Some(Data::Bool(b)) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Some(Data::String(s)) => parse_numeric_text(s),
        _ => 0.0,
    };

    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Numeric text like " 40 " or "12.5"; anything else is 0
fn parse_numeric_text(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    // Rust accepts "inf"/"nan" spellings that are not numbers in a sheet
    if trimmed
        .chars()
        .any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E')
    {
        return 0.0;
    }
    trimmed.parse::<f64>().unwrap_or(0.0)
}

/// Importer for the raw grid viewer: every non-empty row, no header, no coercion
#[derive(Debug, Default, Clone, Copy)]
pub struct GridImporter;

impl GridImporter {
    pub fn new() -> Self {
        Self
    }
}

impl SpreadsheetDecoder for GridImporter {
    type Output = Grid;

    fn decode(&self, bytes: &[u8]) -> PayrollResult<Grid> {
        let range = first_sheet(bytes)?;
        let mut grid = Grid::new();

        let (Some(_), Some((last_row, last_col))) = (range.start(), range.end()) else {
            return Ok(grid);
        };

        for row in 0..=last_row {
            // Row spans column A through its own last non-empty cell
            let mut cells: GridRow = (0..=last_col)
                .map(|col| range.get_value((row, col)).map_or(CellValue::Empty, to_cell))
                .collect();
            while cells.last().is_some_and(CellValue::is_empty) {
                cells.pop();
            }
            if !cells.is_empty() {
                grid.push(cells);
            }
        }

        Ok(grid)
    }
}

/// Raw cell value as stored in the sheet
fn to_cell(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) if s.is_empty() => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        other => CellValue::Text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Data {
        Data::String(s.to_string())
    }

    #[test]
    fn test_coerce_row_complete() {
        let cells = [
            Some(&text("E1")),
            Some(&text("Alice")),
            Some(&Data::Float(40.0)),
            Some(&Data::Int(20)),
        ];
        assert_eq!(
            EmployeeImporter::coerce_row(cells),
            Ok(EmployeeRecord::new("E1", "Alice", 40.0, 20.0))
        );
    }

    #[test]
    fn test_coerce_row_numeric_id_becomes_text() {
        let cells = [
            Some(&Data::Float(101.0)),
            Some(&text("Bob")),
            None,
            None,
        ];
        let record = EmployeeImporter::coerce_row(cells).unwrap();
        assert_eq!(record.id, "101");
        assert_eq!(record.hours_worked, 0.0);
        assert_eq!(record.hourly_rate, 0.0);
    }

    #[test]
    fn test_coerce_row_missing_identity() {
        let five = Data::Float(5.0);
        assert_eq!(
            EmployeeImporter::coerce_row([Some(&text("")), Some(&text("NoId")), Some(&five), Some(&five)]),
            Err(RowRejection::MissingId)
        );
        assert_eq!(
            EmployeeImporter::coerce_row([Some(&text("E9")), None, Some(&five), Some(&five)]),
            Err(RowRejection::MissingName)
        );
    }

    #[test]
    fn test_coerce_number_fallbacks() {
        assert_eq!(coerce_number(Some(&text(" 12.5 "))), 12.5);
        assert_eq!(coerce_number(Some(&text("forty"))), 0.0);
        assert_eq!(coerce_number(Some(&text("inf"))), 0.0);
        assert_eq!(coerce_number(Some(&text("1e3"))), 1000.0);
        assert_eq!(coerce_number(Some(&text(""))), 0.0);
        assert_eq!(coerce_number(Some(&Data::Bool(true))), 1.0);
        assert_eq!(coerce_number(Some(&Data::Empty)), 0.0);
        assert_eq!(coerce_number(None), 0.0);
    }

    #[test]
    fn test_decode_garbage_is_decode_error() {
        let result = EmployeeImporter::new().decode(b"definitely not a zip archive");
        assert!(matches!(result, Err(PayrollError::Decode(_))));

        let result = GridImporter::new().decode(&[]);
        assert!(matches!(result, Err(PayrollError::Decode(_))));
    }

    #[test]
    fn test_to_cell() {
        assert_eq!(to_cell(&Data::Int(3)), CellValue::Number(3.0));
        assert_eq!(to_cell(&text("x")), CellValue::Text("x".to_string()));
        assert_eq!(to_cell(&Data::Bool(false)), CellValue::Bool(false));
        assert_eq!(to_cell(&Data::Empty), CellValue::Empty);
    }
}
