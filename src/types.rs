use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::salary::{compute_salary, format_plain_number};

//==============================================================================
// Employee Records
//==============================================================================

/// One wage-bearing identity with hours and rate.
///
/// Serialized with camelCase keys so the durable copy reads
/// `{"id": "...", "name": "...", "hoursWorked": 40, "hourlyRate": 20}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRecord {
    pub id: String,
    pub name: String,
    pub hours_worked: f64,
    pub hourly_rate: f64,
}

impl EmployeeRecord {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        hours_worked: f64,
        hourly_rate: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            hours_worked,
            hourly_rate,
        }
    }

    /// Derived wage, never stored
    pub fn salary(&self) -> f64 {
        compute_salary(self.hours_worked, self.hourly_rate)
    }

    /// Both identity fields are present
    pub fn has_identity(&self) -> bool {
        !self.id.is_empty() && !self.name.is_empty()
    }
}

/// Total salary expense across a set of records
pub fn total_expense(records: &[EmployeeRecord]) -> f64 {
    records.iter().map(EmployeeRecord::salary).sum()
}

//==============================================================================
// Generic Grid (raw spreadsheet viewer)
//==============================================================================

/// An untyped spreadsheet cell.
///
/// Untagged so a persisted grid is a plain JSON array of arrays
/// (`[["Name", 40, true, null]]`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Number(n) => write!(f, "{}", format_plain_number(*n)),
            CellValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

/// One row of the raw grid
pub type GridRow = Vec<CellValue>;

/// Ordered rows of ordered cells
pub type Grid = Vec<GridRow>;
