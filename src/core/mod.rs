//! Core payroll arithmetic

pub mod salary;

pub use salary::{compute_salary, format_currency, format_plain_number, CurrencyVariant};
