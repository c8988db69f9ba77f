//! Payroll - employee wage register with Excel and PDF output
//!
//! This library keeps an ordered register of employee wage records, imports
//! it from Excel, persists it across sessions, and renders printable
//! documents from it.
//!
//! # Features
//!
//! - Excel (.xlsx) import with per-row coercion and filtering
//! - Durable JSON store behind an injectable storage port
//! - Salary = hours worked × hourly rate, en-IN currency formatting
//! - PDF summary (auto-paginated, with total) and per-employee payslips
//! - Raw grid viewer: any sheet in, the same sheet back out
//!
//! # Example
//!
//! ```no_run
//! use royalbit_payroll::auth::{AccessGate, Session, SessionGate, PAYROLL_ROLE};
//! use royalbit_payroll::register::PayrollRegister;
//! use royalbit_payroll::store::FileStorage;
//!
//! # async fn run() -> royalbit_payroll::PayrollResult<()> {
//! let session = Session::from_login_json(r#"{"token":"t","user":{"role":"Admin"}}"#)?;
//! let grant = SessionGate::new(Some(session)).authorize(Some("t"), PAYROLL_ROLE)?;
//!
//! let mut register = PayrollRegister::open(FileStorage::new(".payroll"), &grant);
//! let bytes = std::fs::read("payroll.xlsx")?;
//! let summary = register.import_spreadsheet(bytes).await?;
//! println!("Imported {} employees", summary.imported);
//!
//! let pdf = register.summary_document().await?;
//! std::fs::write(&pdf.file_name, &pdf.bytes)?;
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod cli;
pub mod config;
pub mod core;
pub mod document;
pub mod error;
pub mod excel;
pub mod register;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use error::{PayrollError, PayrollResult};
pub use types::{CellValue, EmployeeRecord, Grid, GridRow};
