//! CLI command handlers

pub mod commands;

pub use commands::{
    add, clear, export, grid_clear, grid_export, grid_import, grid_show, import, list, login,
    logout, payslip, summary,
};
