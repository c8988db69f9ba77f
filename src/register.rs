//! Domain facades over the store, codecs and document generator
//!
//! `PayrollRegister` drives the typed employee path and `GridViewer` the raw
//! spreadsheet path. Spreadsheet decoding and document/spreadsheet encoding
//! run on tokio's blocking pool; callers await a result and the store is
//! only touched once that result is a success.

use crate::auth::AccessGrant;
use crate::document::{DocumentGenerator, RenderedDocument};
use crate::error::{PayrollError, PayrollResult};
use crate::excel::{
    employees_to_grid, EmployeeImporter, GridExporter, GridImporter, SpreadsheetDecoder,
};
use crate::store::{EmployeeStore, GridStore, RecordStore, Storage, EMPLOYEES_KEY, GRID_KEY};
use crate::types::{total_expense, EmployeeRecord, Grid, GridRow};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::info;

/// Default file name for grid exports
pub const GRID_EXPORT_FILE_NAME: &str = "exported_data.xlsx";

/// Default file name for register exports
pub const REGISTER_EXPORT_FILE_NAME: &str = "payroll_register.xlsx";

/// Run `work` on the blocking pool and surface panics/cancellation as errors
async fn off_thread<T, F>(work: F) -> PayrollResult<T>
where
    F: FnOnce() -> PayrollResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| PayrollError::Task(e.to_string()))?
}

/// What an import changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    /// Records now in the register
    pub imported: usize,
    /// Data rows dropped for a missing id or name
    pub skipped: usize,
    /// Records the import replaced
    pub replaced: usize,
}

/// Which records a batch of payslips covers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayslipFilter {
    All,
    /// Every record carrying this id (ids are not unique)
    Id(String),
}

/// Employee register: import, manual add, clear, documents
pub struct PayrollRegister<S: Storage> {
    store: EmployeeStore<S>,
    generator: DocumentGenerator,
}

impl<S: Storage> PayrollRegister<S> {
    /// Open the register from durable storage
    pub fn open(storage: S, grant: &AccessGrant) -> Self {
        Self::with_generator(storage, DocumentGenerator::default(), grant)
    }

    pub fn with_generator(
        storage: S,
        generator: DocumentGenerator,
        _grant: &AccessGrant,
    ) -> Self {
        Self {
            store: RecordStore::open(storage, EMPLOYEES_KEY),
            generator,
        }
    }

    /// Current records, in order
    pub fn employees(&self) -> &[EmployeeRecord] {
        self.store.records()
    }

    /// Immutable snapshot for presentation layers
    pub fn snapshot(&self) -> Arc<[EmployeeRecord]> {
        self.store.snapshot()
    }

    pub fn store(&self) -> &EmployeeStore<S> {
        &self.store
    }

    /// Sum of every record's salary
    pub fn total_expense(&self) -> f64 {
        total_expense(self.store.records())
    }

    /// Replace the whole register with the rows of an .xlsx document.
    ///
    /// Never merges. A document that fails to decode leaves the register as
    /// it was.
    pub async fn import_spreadsheet(&mut self, bytes: Vec<u8>) -> PayrollResult<ImportSummary> {
        let import = off_thread(move || EmployeeImporter::new().decode(&bytes)).await?;

        let summary = ImportSummary {
            imported: import.records.len(),
            skipped: import.skipped_rows.len(),
            replaced: self.store.len(),
        };
        self.store.replace_all(import.records)?;

        info!(
            imported = summary.imported,
            skipped = summary.skipped,
            replaced = summary.replaced,
            "register replaced from spreadsheet"
        );
        Ok(summary)
    }

    /// Append one manually entered record
    pub fn add_employee(&mut self, record: EmployeeRecord) -> PayrollResult<()> {
        validate_manual_entry(&record)?;
        self.store.append(record)?;
        info!(count = self.store.len(), "employee added");
        Ok(())
    }

    /// Empty the register and delete its durable copy
    pub fn clear(&mut self) -> PayrollResult<()> {
        self.store.clear()?;
        info!("register cleared");
        Ok(())
    }

    /// Aggregate summary of every record
    pub async fn summary_document(&self) -> PayrollResult<RenderedDocument> {
        let records = self.store.snapshot();
        let generator = self.generator.clone();
        off_thread(move || generator.summary(&records)).await
    }

    /// Payslip for one record
    pub async fn payslip_document(
        &self,
        record: &EmployeeRecord,
        generated_on: NaiveDate,
    ) -> PayrollResult<RenderedDocument> {
        let record = record.clone();
        let generator = self.generator.clone();
        off_thread(move || generator.payslip(&record, generated_on)).await
    }

    /// Payslips for every record matching `filter`, in register order
    pub async fn payslip_documents(
        &self,
        filter: &PayslipFilter,
        generated_on: NaiveDate,
    ) -> PayrollResult<Vec<RenderedDocument>> {
        let selected: Vec<EmployeeRecord> = self
            .store
            .records()
            .iter()
            .filter(|r| match filter {
                PayslipFilter::All => true,
                PayslipFilter::Id(id) => &r.id == id,
            })
            .cloned()
            .collect();

        if let PayslipFilter::Id(id) = filter {
            if selected.is_empty() {
                return Err(PayrollError::Validation(format!(
                    "No employee with id '{}'",
                    id
                )));
            }
        }

        let generator = self.generator.clone();
        off_thread(move || {
            selected
                .iter()
                .map(|record| generator.payslip(record, generated_on))
                .collect()
        })
        .await
    }

    /// The register as an .xlsx document the importer can read back
    pub async fn export_spreadsheet(&self) -> PayrollResult<Vec<u8>> {
        let grid = employees_to_grid(self.store.records());
        off_thread(move || GridExporter::new("Employees").encode(&grid)).await
    }
}

/// Required-field and range checks for hand-entered records
pub fn validate_manual_entry(record: &EmployeeRecord) -> PayrollResult<()> {
    if record.id.trim().is_empty() {
        return Err(PayrollError::Validation(
            "Employee ID is required".to_string(),
        ));
    }
    if record.name.trim().is_empty() {
        return Err(PayrollError::Validation("Name is required".to_string()));
    }
    for (label, value) in [
        ("Hours Worked", record.hours_worked),
        ("Hourly Rate", record.hourly_rate),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(PayrollError::Validation(format!(
                "{} must be a non-negative number, got {}",
                label, value
            )));
        }
    }
    Ok(())
}

/// Raw spreadsheet viewer: import any sheet verbatim, export it back
pub struct GridViewer<S: Storage> {
    store: GridStore<S>,
}

impl<S: Storage> GridViewer<S> {
    pub fn open(storage: S, _grant: &AccessGrant) -> Self {
        Self {
            store: RecordStore::open(storage, GRID_KEY),
        }
    }

    pub fn rows(&self) -> &[GridRow] {
        self.store.records()
    }

    pub fn store(&self) -> &GridStore<S> {
        &self.store
    }

    /// Replace the grid with the first sheet of an .xlsx document
    pub async fn import(&mut self, file_name: &str, bytes: Vec<u8>) -> PayrollResult<usize> {
        if !file_name.to_lowercase().ends_with(".xlsx") {
            return Err(PayrollError::Validation(
                "Please upload a valid .xlsx file".to_string(),
            ));
        }

        let grid = off_thread(move || GridImporter::new().decode(&bytes)).await?;
        let rows = grid.len();
        self.store.replace_all(grid)?;
        info!(rows, "grid replaced from spreadsheet");
        Ok(rows)
    }

    /// Current grid as .xlsx bytes
    pub async fn export(&self) -> PayrollResult<Vec<u8>> {
        let grid: Grid = self.store.records().to_vec();
        off_thread(move || GridExporter::default().encode(&grid)).await
    }

    pub fn clear(&mut self) -> PayrollResult<()> {
        self.store.clear()?;
        info!("grid cleared");
        Ok(())
    }
}
