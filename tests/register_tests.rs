//! Payroll register tests
//!
//! Import, manual add, clear and document generation through the
//! `PayrollRegister` facade, with both in-memory and file-backed storage.

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use royalbit_payroll::auth::{AccessGate, AccessGrant, Role, Session, SessionGate, PAYROLL_ROLE};
use royalbit_payroll::register::{GridViewer, PayrollRegister, PayslipFilter};
use royalbit_payroll::store::{FileStorage, MemoryStorage, Storage, EMPLOYEES_KEY};
use royalbit_payroll::{CellValue, EmployeeRecord, PayrollError};
use rust_xlsxwriter::Workbook;
use tempfile::TempDir;

fn admin_grant() -> AccessGrant {
    let gate = SessionGate::new(Some(Session {
        token: "tok".to_string(),
        role: Role::Admin,
    }));
    gate.authorize(Some("tok"), PAYROLL_ROLE).unwrap()
}

enum Cell<'a> {
    Text(&'a str),
    Number(f64),
}

fn xlsx(rows: &[Vec<Cell>]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (r, row) in rows.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            match cell {
                Cell::Text(s) => {
                    sheet.write_string(r as u32, c as u16, *s).unwrap();
                }
                Cell::Number(n) => {
                    sheet.write_number(r as u32, c as u16, *n).unwrap();
                }
            }
        }
    }
    workbook.save_to_buffer().unwrap()
}

fn header() -> Vec<Cell<'static>> {
    vec![
        Cell::Text("Employee ID"),
        Cell::Text("Name"),
        Cell::Text("Hours Worked"),
        Cell::Text("Hourly Rate"),
    ]
}

fn scenario_a_sheet() -> Vec<u8> {
    xlsx(&[
        header(),
        vec![
            Cell::Text("E1"),
            Cell::Text("Alice"),
            Cell::Number(40.0),
            Cell::Number(20.0),
        ],
        vec![
            Cell::Text("E2"),
            Cell::Text("Bob"),
            Cell::Number(35.0),
            Cell::Number(25.0),
        ],
    ])
}

fn contains_bytes(haystack: &[u8], needle: &str) -> bool {
    haystack
        .windows(needle.len())
        .any(|w| w == needle.as_bytes())
}

// ═══════════════════════════════════════════════════════════════════════════
// SCENARIOS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_scenario_a_import_replaces_register() {
    let mut register = PayrollRegister::open(MemoryStorage::new(), &admin_grant());
    let summary = register.import_spreadsheet(scenario_a_sheet()).await.unwrap();

    assert_eq!(summary.imported, 2);
    assert_eq!(summary.skipped, 0);
    assert_eq!(
        register.employees(),
        &[
            EmployeeRecord::new("E1", "Alice", 40.0, 20.0),
            EmployeeRecord::new("E2", "Bob", 35.0, 25.0),
        ]
    );
    assert_eq!(register.total_expense(), 1675.0);
}

#[tokio::test]
async fn test_scenario_b_append_after_import() {
    let mut register = PayrollRegister::open(MemoryStorage::new(), &admin_grant());
    register.import_spreadsheet(scenario_a_sheet()).await.unwrap();

    register
        .add_employee(EmployeeRecord::new("E3", "Carol", 10.0, 15.0))
        .unwrap();

    assert_eq!(register.employees().len(), 3);
    assert_eq!(
        &register.employees()[..2],
        &[
            EmployeeRecord::new("E1", "Alice", 40.0, 20.0),
            EmployeeRecord::new("E2", "Bob", 35.0, 25.0),
        ]
    );
    assert_eq!(
        register.employees()[2],
        EmployeeRecord::new("E3", "Carol", 10.0, 15.0)
    );
    assert_eq!(register.employees()[2].salary(), 150.0);
}

#[tokio::test]
async fn test_scenario_c_clear_empties_durable_copy() {
    let dir = TempDir::new().unwrap();
    let mut register = PayrollRegister::open(FileStorage::new(dir.path()), &admin_grant());
    register.import_spreadsheet(scenario_a_sheet()).await.unwrap();
    register
        .add_employee(EmployeeRecord::new("E3", "Carol", 10.0, 15.0))
        .unwrap();

    register.clear().unwrap();
    assert!(register.employees().is_empty());

    let reopened = PayrollRegister::open(FileStorage::new(dir.path()), &admin_grant());
    assert!(reopened.employees().is_empty());
    assert!(reopened.store().load().is_empty());
}

#[tokio::test]
async fn test_scenario_d_row_without_id_is_skipped() {
    let bytes = xlsx(&[
        header(),
        vec![
            Cell::Text(""),
            Cell::Text("NoId"),
            Cell::Number(5.0),
            Cell::Number(5.0),
        ],
        vec![
            Cell::Text("E7"),
            Cell::Text("Dev"),
            Cell::Number(1.0),
            Cell::Number(2.0),
        ],
    ]);

    let mut register = PayrollRegister::open(MemoryStorage::new(), &admin_grant());
    let summary = register.import_spreadsheet(bytes).await.unwrap();

    assert_eq!(summary.imported, 1);
    assert_eq!(summary.skipped, 1);
    assert_eq!(register.employees()[0].id, "E7");
}

#[tokio::test]
async fn test_summary_total_uses_printable_currency() {
    let mut register = PayrollRegister::open(MemoryStorage::new(), &admin_grant());
    register.import_spreadsheet(scenario_a_sheet()).await.unwrap();

    let document = register.summary_document().await.unwrap();
    assert_eq!(document.file_name, "payroll_dashboard.pdf");
    assert_eq!(document.page_count, 1);
    assert!(contains_bytes(
        &document.bytes,
        "Total Salary Expense: Rs. 1,675"
    ));
}

// ═══════════════════════════════════════════════════════════════════════════
// IMPORT EDGE CASES
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_text_numbers_are_coerced() {
    let bytes = xlsx(&[
        header(),
        vec![
            Cell::Text("E1"),
            Cell::Text("Asha"),
            Cell::Text("12.5"),
            Cell::Text("n/a"),
        ],
    ]);

    let mut register = PayrollRegister::open(MemoryStorage::new(), &admin_grant());
    register.import_spreadsheet(bytes).await.unwrap();

    let record = &register.employees()[0];
    assert_eq!(record.hours_worked, 12.5);
    assert_eq!(record.hourly_rate, 0.0);
}

#[tokio::test]
async fn test_numeric_id_becomes_text() {
    let bytes = xlsx(&[
        header(),
        vec![
            Cell::Number(101.0),
            Cell::Text("Asha"),
            Cell::Number(1.0),
            Cell::Number(1.0),
        ],
    ]);

    let mut register = PayrollRegister::open(MemoryStorage::new(), &admin_grant());
    register.import_spreadsheet(bytes).await.unwrap();
    assert_eq!(register.employees()[0].id, "101");
}

#[tokio::test]
async fn test_failed_import_leaves_register_unchanged() {
    let mut register = PayrollRegister::open(MemoryStorage::new(), &admin_grant());
    register.import_spreadsheet(scenario_a_sheet()).await.unwrap();

    let result = register.import_spreadsheet(b"not a zip".to_vec()).await;
    assert!(matches!(result, Err(PayrollError::Decode(_))));
    assert_eq!(register.employees().len(), 2);
}

#[tokio::test]
async fn test_import_never_merges() {
    let mut register = PayrollRegister::open(MemoryStorage::new(), &admin_grant());
    register
        .add_employee(EmployeeRecord::new("E0", "Zed", 1.0, 1.0))
        .unwrap();

    let summary = register.import_spreadsheet(scenario_a_sheet()).await.unwrap();
    assert_eq!(summary.replaced, 1);
    assert!(register.employees().iter().all(|r| r.id != "E0"));
}

// ═══════════════════════════════════════════════════════════════════════════
// PERSISTENCE
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_register_survives_reopen() {
    let dir = TempDir::new().unwrap();
    {
        let mut register = PayrollRegister::open(FileStorage::new(dir.path()), &admin_grant());
        register.import_spreadsheet(scenario_a_sheet()).await.unwrap();
    }

    let register = PayrollRegister::open(FileStorage::new(dir.path()), &admin_grant());
    assert_eq!(register.employees().len(), 2);
    assert_eq!(register.employees()[1].name, "Bob");
}

#[test]
fn test_corrupt_durable_copy_loads_empty() {
    let mut storage = MemoryStorage::new();
    storage.write(EMPLOYEES_KEY, "[{broken").unwrap();

    let register = PayrollRegister::open(storage, &admin_grant());
    assert!(register.employees().is_empty());
}

#[test]
fn test_manual_entry_rejects_negative_rate() {
    let mut register = PayrollRegister::open(MemoryStorage::new(), &admin_grant());
    let result = register.add_employee(EmployeeRecord::new("E1", "Asha", 10.0, -1.0));

    assert!(matches!(result, Err(PayrollError::Validation(_))));
    assert!(register.employees().is_empty());
}

#[test]
fn test_snapshot_is_unaffected_by_later_writes() {
    let mut register = PayrollRegister::open(MemoryStorage::new(), &admin_grant());
    register
        .add_employee(EmployeeRecord::new("E1", "Asha", 1.0, 1.0))
        .unwrap();

    let before = register.snapshot();
    register
        .add_employee(EmployeeRecord::new("E2", "Bo", 1.0, 1.0))
        .unwrap();

    assert_eq!(before.len(), 1);
    assert_eq!(register.snapshot().len(), 2);
}

// ═══════════════════════════════════════════════════════════════════════════
// PAYSLIPS AND EXPORT
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_payslips_cover_duplicate_ids() {
    let mut register = PayrollRegister::open(MemoryStorage::new(), &admin_grant());
    register
        .add_employee(EmployeeRecord::new("E1", "Asha", 1.0, 1.0))
        .unwrap();
    register
        .add_employee(EmployeeRecord::new("E1", "Ravi", 2.0, 2.0))
        .unwrap();
    register
        .add_employee(EmployeeRecord::new("E2", "Bo", 3.0, 3.0))
        .unwrap();

    let date = NaiveDate::from_ymd_opt(2026, 1, 31).unwrap();
    let docs = register
        .payslip_documents(&PayslipFilter::Id("E1".to_string()), date)
        .await
        .unwrap();

    let names: Vec<_> = docs.iter().map(|d| d.file_name.as_str()).collect();
    assert_eq!(names, vec!["Payslip_Asha.pdf", "Payslip_Ravi.pdf"]);
    assert!(contains_bytes(&docs[0].bytes, "2026-01-31"));

    let all = register
        .payslip_documents(&PayslipFilter::All, date)
        .await
        .unwrap();
    assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn test_exported_register_imports_back() {
    let mut register = PayrollRegister::open(MemoryStorage::new(), &admin_grant());
    register.import_spreadsheet(scenario_a_sheet()).await.unwrap();
    let bytes = register.export_spreadsheet().await.unwrap();

    let mut copy = PayrollRegister::open(MemoryStorage::new(), &admin_grant());
    copy.import_spreadsheet(bytes).await.unwrap();
    assert_eq!(copy.employees(), register.employees());
}

// ═══════════════════════════════════════════════════════════════════════════
// GRID VIEWER
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_grid_round_trip() {
    let bytes = xlsx(&[
        vec![Cell::Text("City"), Cell::Text("Pop")],
        vec![Cell::Text("Pune"), Cell::Number(3.1)],
    ]);

    let mut viewer = GridViewer::open(MemoryStorage::new(), &admin_grant());
    assert_eq!(viewer.import("cities.XLSX", bytes).await.unwrap(), 2);
    assert_eq!(viewer.rows()[1], vec![CellValue::from("Pune"), CellValue::from(3.1)]);

    let exported = viewer.export().await.unwrap();
    let mut again = GridViewer::open(MemoryStorage::new(), &admin_grant());
    again.import("exported_data.xlsx", exported).await.unwrap();
    assert_eq!(again.rows(), viewer.rows());
}

#[tokio::test]
async fn test_grid_rejects_other_extensions() {
    let mut viewer = GridViewer::open(MemoryStorage::new(), &admin_grant());
    let result = viewer.import("data.xls", scenario_a_sheet()).await;

    assert!(matches!(result, Err(PayrollError::Validation(_))));
    assert!(viewer.rows().is_empty());
}
