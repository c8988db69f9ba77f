use crate::auth::{AccessGate, AccessGrant, Session, SessionGate, PAYROLL_ROLE, SESSION_KEY};
use crate::config::AppConfig;
use crate::core::salary::{format_currency, format_plain_number, CurrencyVariant};
use crate::document::RenderedDocument;
use crate::error::{PayrollError, PayrollResult};
use crate::register::{
    GridViewer, PayrollRegister, PayslipFilter, GRID_EXPORT_FILE_NAME, REGISTER_EXPORT_FILE_NAME,
};
use crate::store::{FileStorage, Storage};
use crate::types::{EmployeeRecord, GridRow};
use chrono::{Local, NaiveDate};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Read the stored session; a corrupt copy counts as logged out
fn load_session(storage: &FileStorage) -> PayrollResult<Option<Session>> {
    let Some(raw) = storage.read(SESSION_KEY)? else {
        return Ok(None);
    };
    match serde_json::from_str(&raw) {
        Ok(session) => Ok(Some(session)),
        Err(e) => {
            warn!(error = %e, "stored session unparsable, treating as logged out");
            Ok(None)
        }
    }
}

/// Present the stored token to the gate
fn authorize(storage: &FileStorage) -> PayrollResult<AccessGrant> {
    let session = load_session(storage)?;
    let token = session.as_ref().map(|s| s.token.clone());
    SessionGate::new(session).authorize(token.as_deref(), PAYROLL_ROLE)
}

fn open_register(config: &AppConfig) -> PayrollResult<PayrollRegister<FileStorage>> {
    let storage = config.storage();
    let grant = authorize(&storage)?;
    Ok(PayrollRegister::open(storage, &grant))
}

fn open_grid(config: &AppConfig) -> PayrollResult<GridViewer<FileStorage>> {
    let storage = config.storage();
    let grant = authorize(&storage)?;
    Ok(GridViewer::open(storage, &grant))
}

fn require_confirmation(yes: bool, what: &str) -> PayrollResult<()> {
    if yes {
        Ok(())
    } else {
        Err(PayrollError::Validation(format!(
            "Refusing to delete all {} without --yes",
            what
        )))
    }
}

async fn write_output(path: &Path, bytes: &[u8]) -> PayrollResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, bytes).await?;
    Ok(())
}

async fn write_document(out_dir: &Path, document: &RenderedDocument) -> PayrollResult<PathBuf> {
    let path = out_dir.join(&document.file_name);
    write_output(&path, &document.bytes).await?;
    Ok(path)
}

/// Fixed-width text table for terminal output
fn render_rows(header: &[&str], rows: &[Vec<String>]) -> Vec<String> {
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (idx, cell) in row.iter().enumerate() {
            if idx < widths.len() {
                widths[idx] = widths[idx].max(cell.chars().count());
            } else {
                widths.push(cell.chars().count());
            }
        }
    }

    let line = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| {
                let pad = width.saturating_sub(cell.chars().count());
                format!("{}{}", cell, " ".repeat(pad))
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = vec![line(header.to_vec())];
    for row in rows {
        out.push(line(row.iter().map(String::as_str).collect()));
    }
    out
}

fn employee_rows(records: &[EmployeeRecord]) -> Vec<Vec<String>> {
    records
        .iter()
        .map(|r| {
            vec![
                r.id.clone(),
                r.name.clone(),
                format_plain_number(r.hours_worked),
                format_currency(r.hourly_rate, CurrencyVariant::Screen),
                format_currency(r.salary(), CurrencyVariant::Screen),
            ]
        })
        .collect()
}

fn grid_rows(rows: &[GridRow]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect()
}

/// Execute the login command
pub fn login(config: &AppConfig, response_file: PathBuf) -> PayrollResult<()> {
    let json = std::fs::read_to_string(&response_file)?;
    let session = Session::from_login_json(&json)?;

    let mut storage = config.storage();
    storage.write(SESSION_KEY, &serde_json::to_string(&session)?)?;

    println!("{}", "🔐 Logged in".bold().green());
    println!("   Role: {}", session.role.to_string().bright_blue().bold());
    Ok(())
}

/// Execute the logout command
pub fn logout(config: &AppConfig) -> PayrollResult<()> {
    config.storage().remove(SESSION_KEY)?;
    println!("{}", "👋 Logged out".bold().green());
    Ok(())
}

/// Execute the import command
pub async fn import(config: &AppConfig, input: PathBuf) -> PayrollResult<()> {
    let mut register = open_register(config)?;

    println!("{}", "📥 Payroll - Excel Import".bold().green());
    println!("   Input: {}\n", input.display());

    let bytes = tokio::fs::read(&input).await?;
    let summary = register.import_spreadsheet(bytes).await?;

    println!("{}", "✅ Import Complete!".bold().green());
    println!("   Employees imported: {}", summary.imported);
    if summary.skipped > 0 {
        println!(
            "   {}",
            format!("Rows skipped (missing id or name): {}", summary.skipped).yellow()
        );
    }
    if summary.replaced > 0 {
        println!("   Previous records replaced: {}", summary.replaced);
    }
    Ok(())
}

/// Execute the add command
pub fn add(
    config: &AppConfig,
    id: String,
    name: String,
    hours: f64,
    rate: f64,
) -> PayrollResult<()> {
    let mut register = open_register(config)?;
    let record = EmployeeRecord::new(id, name, hours, rate);
    let salary = record.salary();
    register.add_employee(record)?;

    println!("{}", "✅ Employee added".bold().green());
    println!(
        "   Salary: {}",
        format_currency(salary, CurrencyVariant::Screen).bold()
    );
    println!("   Employees in register: {}", register.employees().len());
    Ok(())
}

/// Execute the list command
pub fn list(config: &AppConfig) -> PayrollResult<()> {
    let register = open_register(config)?;

    println!("{}", "💰 Payroll Register".bold().green());
    println!();

    if register.employees().is_empty() {
        println!("   {}", "No employees added yet.".yellow());
        return Ok(());
    }

    let lines = render_rows(
        &crate::document::SUMMARY_HEADERS,
        &employee_rows(register.employees()),
    );
    for (idx, line) in lines.iter().enumerate() {
        if idx == 0 {
            println!("   {}", line.bold().cyan());
        } else {
            println!("   {}", line);
        }
    }

    println!();
    println!(
        "   Total Salary Expense: {}",
        format_currency(register.total_expense(), CurrencyVariant::Screen)
            .bold()
            .green()
    );
    Ok(())
}

/// Execute the clear command
pub fn clear(config: &AppConfig, yes: bool) -> PayrollResult<()> {
    require_confirmation(yes, "employee data")?;
    let mut register = open_register(config)?;
    let count = register.employees().len();
    register.clear()?;

    println!("{}", "🗑️  Register cleared".bold().green());
    println!("   Records removed: {}", count);
    Ok(())
}

/// Execute the summary command
pub async fn summary(config: &AppConfig) -> PayrollResult<()> {
    let register = open_register(config)?;
    let document = register.summary_document().await?;
    let path = write_document(&config.out_dir, &document).await?;

    println!("{}", "📄 Payroll summary generated".bold().green());
    println!("   File:  {}", path.display());
    println!("   Pages: {}", document.page_count);
    Ok(())
}

/// Execute the payslip command
pub async fn payslip(
    config: &AppConfig,
    id: Option<String>,
    date: Option<NaiveDate>,
) -> PayrollResult<()> {
    let register = open_register(config)?;
    let filter = id.map_or(PayslipFilter::All, PayslipFilter::Id);
    let generated_on = date.unwrap_or_else(|| Local::now().date_naive());

    let documents = register.payslip_documents(&filter, generated_on).await?;
    if documents.is_empty() {
        println!("   {}", "No employees added yet.".yellow());
        return Ok(());
    }

    println!("{}", "🧾 Payslips generated".bold().green());
    for document in &documents {
        let path = write_document(&config.out_dir, document).await?;
        println!("   {}", path.display());
    }
    Ok(())
}

/// Execute the export command
pub async fn export(config: &AppConfig, output: Option<PathBuf>) -> PayrollResult<()> {
    let register = open_register(config)?;
    let bytes = register.export_spreadsheet().await?;
    let path = output.unwrap_or_else(|| config.out_dir.join(REGISTER_EXPORT_FILE_NAME));
    write_output(&path, &bytes).await?;

    println!("{}", "✅ Export Complete!".bold().green());
    println!("   Excel file: {}", path.display());
    Ok(())
}

/// Execute the grid import command
pub async fn grid_import(config: &AppConfig, input: PathBuf) -> PayrollResult<()> {
    let mut viewer = open_grid(config)?;
    let file_name = input
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let bytes = tokio::fs::read(&input).await?;
    let rows = viewer.import(&file_name, bytes).await?;

    println!("{}", "✅ Sheet loaded".bold().green());
    println!("   Rows: {}", rows);
    Ok(())
}

/// Execute the grid show command
pub fn grid_show(config: &AppConfig) -> PayrollResult<()> {
    let viewer = open_grid(config)?;
    if viewer.rows().is_empty() {
        println!("   {}", "No sheet data loaded.".yellow());
        return Ok(());
    }

    let rows = grid_rows(viewer.rows());
    for line in render_rows(&[], &rows).iter().skip(1) {
        println!("{}", line);
    }
    Ok(())
}

/// Execute the grid export command
pub async fn grid_export(config: &AppConfig, output: Option<PathBuf>) -> PayrollResult<()> {
    let viewer = open_grid(config)?;
    let bytes = viewer.export().await?;
    let path = output.unwrap_or_else(|| config.out_dir.join(GRID_EXPORT_FILE_NAME));
    write_output(&path, &bytes).await?;

    println!("{}", "✅ Export Complete!".bold().green());
    println!("   Excel file: {}", path.display());
    Ok(())
}

/// Execute the grid clear command
pub fn grid_clear(config: &AppConfig, yes: bool) -> PayrollResult<()> {
    require_confirmation(yes, "sheet data")?;
    let mut viewer = open_grid(config)?;
    viewer.clear()?;

    println!("{}", "🗑️  Sheet data cleared".bold().green());
    Ok(())
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
