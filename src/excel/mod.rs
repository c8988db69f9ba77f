//! Excel import/export
//!
//! Two specializations share one decoder contract:
//! - Employee path: header row skipped, columns A..D coerced into records
//! - Grid path: every non-empty row kept verbatim, mirrored back out by the exporter

mod exporter;
mod importer;

pub use exporter::{employees_to_grid, GridExporter, EMPLOYEE_HEADER, EXPORT_SHEET_NAME};
pub use importer::{
    EmployeeImport, EmployeeImporter, GridImporter, RowRejection, SpreadsheetDecoder,
};
