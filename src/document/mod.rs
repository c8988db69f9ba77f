//! Printable payroll documents
//!
//! Two kinds, both an A4 page with a title and a table:
//! - Summary: every record plus a total salary expense line
//! - Payslip: one record as a field/value table with the generation date
//!
//! Generation is a pure read of the records it is given (plus the date
//! passed in); layout is kept separate from PDF encoding so documents can
//! be inspected before they are serialized.

mod layout;
mod metrics;
mod pdf;

pub use layout::{Document, DrawOp, Font, Page, PageSetup, Rgb, Table, TableStyle, MM};
pub use metrics::{text_width, wrap_text};

use crate::core::salary::{format_currency, format_plain_number, CurrencyVariant};
use crate::error::PayrollResult;
use crate::types::{total_expense, EmployeeRecord};
use chrono::NaiveDate;

pub const SUMMARY_TITLE: &str = "Payroll Expenses";
pub const PAYSLIP_TITLE: &str = "Monthly Payslip";
pub const SUMMARY_FILE_NAME: &str = "payroll_dashboard.pdf";

pub const SUMMARY_HEADERS: [&str; 5] = [
    "Employee ID",
    "Name",
    "Hours Worked",
    "Hourly Rate",
    "Salary",
];
pub const PAYSLIP_HEADERS: [&str; 2] = ["Field", "Details"];

/// A generated document, ready to be offered for download
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedDocument {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

/// `Payslip_<name>.pdf`, with path separators in the name replaced
pub fn payslip_file_name(employee_name: &str) -> String {
    let safe: String = employee_name
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    format!("Payslip_{}.pdf", safe)
}

/// Text of the summary's closing line
pub fn total_line(total: f64) -> String {
    format!(
        "Total Salary Expense: {}",
        format_currency(total, CurrencyVariant::Printable)
    )
}

/// Lays out and encodes payroll documents
#[derive(Debug, Clone, Default)]
pub struct DocumentGenerator {
    setup: PageSetup,
    style: TableStyle,
}

impl DocumentGenerator {
    pub fn new(setup: PageSetup, style: TableStyle) -> Self {
        Self { setup, style }
    }

    pub fn setup(&self) -> &PageSetup {
        &self.setup
    }

    /// Layout of the aggregate summary
    pub fn summary_layout(&self, records: &[EmployeeRecord]) -> Document {
        let mut doc = Document::new(SUMMARY_TITLE, self.setup);
        let title_size = 18.0;
        doc.text(14.0 * MM, 22.0 * MM, title_size, Font::Regular, Rgb::BLACK, SUMMARY_TITLE);

        let mut table = Table::new(&SUMMARY_HEADERS);
        for record in records {
            table.push_row(vec![
                record.id.clone(),
                record.name.clone(),
                format_plain_number(record.hours_worked),
                format_currency(record.hourly_rate, CurrencyVariant::Printable),
                format_currency(record.salary(), CurrencyVariant::Printable),
            ]);
        }
        let final_y = layout::draw_table(&mut doc, &table, 30.0 * MM, &self.style);

        let mut y = final_y + 10.0 * MM;
        if y > self.setup.content_bottom() {
            doc.add_page();
            y = self.setup.margin_top + title_size;
        }
        doc.text(
            14.0 * MM,
            y,
            title_size,
            Font::Regular,
            Rgb::BLACK,
            &total_line(total_expense(records)),
        );

        doc
    }

    /// Layout of one employee's payslip
    pub fn payslip_layout(&self, record: &EmployeeRecord, generated_on: NaiveDate) -> Document {
        let mut doc = Document::new(PAYSLIP_TITLE, self.setup);
        doc.text(14.0 * MM, 20.0 * MM, 16.0, Font::Regular, Rgb::BLACK, PAYSLIP_TITLE);

        let mut table = Table::new(&PAYSLIP_HEADERS);
        let fields = [
            ("Employee ID", record.id.clone()),
            ("Name", record.name.clone()),
            ("Hours Worked", format_plain_number(record.hours_worked)),
            (
                "Hourly Rate",
                format_currency(record.hourly_rate, CurrencyVariant::Printable),
            ),
            (
                "Salary",
                format_currency(record.salary(), CurrencyVariant::Printable),
            ),
            ("Generated On", generated_on.format("%Y-%m-%d").to_string()),
        ];
        for (field, value) in fields {
            table.push_row(vec![field.to_string(), value]);
        }
        layout::draw_table(&mut doc, &table, 30.0 * MM, &self.style);

        doc
    }

    /// Summary document as PDF bytes
    pub fn summary(&self, records: &[EmployeeRecord]) -> PayrollResult<RenderedDocument> {
        let doc = self.summary_layout(records);
        Ok(RenderedDocument {
            file_name: SUMMARY_FILE_NAME.to_string(),
            bytes: pdf::encode(&doc)?,
            page_count: doc.page_count(),
        })
    }

    /// Payslip document as PDF bytes
    pub fn payslip(
        &self,
        record: &EmployeeRecord,
        generated_on: NaiveDate,
    ) -> PayrollResult<RenderedDocument> {
        let doc = self.payslip_layout(record, generated_on);
        Ok(RenderedDocument {
            file_name: payslip_file_name(&record.name),
            bytes: pdf::encode(&doc)?,
            page_count: doc.page_count(),
        })
    }
}
