//! Document layout and PDF output tests

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use royalbit_payroll::document::{DocumentGenerator, DrawOp, SUMMARY_HEADERS};
use royalbit_payroll::EmployeeRecord;

fn staff(count: usize) -> Vec<EmployeeRecord> {
    (1..=count)
        .map(|i| EmployeeRecord::new(format!("E{}", i), format!("Employee {}", i), 40.0, 100.0))
        .collect()
}

fn count_occurrences(haystack: &[u8], needle: &str) -> usize {
    haystack
        .windows(needle.len())
        .filter(|w| *w == needle.as_bytes())
        .count()
}

// ═══════════════════════════════════════════════════════════════════════════
// SUMMARY PAGINATION
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_long_summary_spans_pages() {
    let generator = DocumentGenerator::default();
    let doc = generator.summary_layout(&staff(120));

    assert!(doc.page_count() > 1, "120 rows cannot fit on one A4 page");
    for page in &doc.pages {
        assert!(
            page.texts().any(|t| t == SUMMARY_HEADERS[0]),
            "every page repeats the header row"
        );
    }
}

#[test]
fn test_rows_stay_above_bottom_margin() {
    let generator = DocumentGenerator::default();
    let doc = generator.summary_layout(&staff(120));
    let bottom = generator.setup().content_bottom();

    for page in &doc.pages {
        for op in &page.ops {
            if let DrawOp::Rect { y, height, .. } = op {
                assert!(y + height <= bottom + 1e-6);
            }
        }
    }
}

#[test]
fn test_every_record_appears_once() {
    let generator = DocumentGenerator::default();
    let records = staff(75);
    let doc = generator.summary_layout(&records);

    for record in &records {
        let hits = doc
            .pages
            .iter()
            .flat_map(|p| p.texts())
            .filter(|t| *t == record.name)
            .count();
        assert_eq!(hits, 1, "{} should be drawn exactly once", record.name);
    }
}

#[test]
fn test_total_line_is_on_last_page() {
    let generator = DocumentGenerator::default();
    let doc = generator.summary_layout(&staff(120));

    let last = doc.pages.last().unwrap();
    assert!(last
        .texts()
        .any(|t| t == "Total Salary Expense: Rs. 4,80,000"));
}

#[test]
fn test_empty_summary_still_renders() {
    let generator = DocumentGenerator::default();
    let rendered = generator.summary(&[]).unwrap();

    assert_eq!(rendered.page_count, 1);
    assert!(count_occurrences(&rendered.bytes, "Total Salary Expense: Rs. 0") == 1);
}

// ═══════════════════════════════════════════════════════════════════════════
// PDF OUTPUT
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_pdf_page_objects_match_layout() {
    let generator = DocumentGenerator::default();
    let rendered = generator.summary(&staff(120)).unwrap();

    assert!(rendered.bytes.starts_with(b"%PDF-1.4"));
    assert!(rendered.bytes.ends_with(b"%%EOF\n"));
    assert_eq!(
        count_occurrences(&rendered.bytes, "/Type /Page "),
        rendered.page_count
    );
}

#[test]
fn test_payslip_fields_in_order() {
    let generator = DocumentGenerator::default();
    let record = EmployeeRecord::new("E9", "Ravi Kumar", 37.5, 1234.5);
    let date = NaiveDate::from_ymd_opt(2026, 10, 15).unwrap();
    let doc = generator.payslip_layout(&record, date);

    let texts: Vec<&str> = doc.pages[0].texts().collect();
    let expected = [
        "Monthly Payslip",
        "Field",
        "Details",
        "Employee ID",
        "E9",
        "Name",
        "Ravi Kumar",
        "Hours Worked",
        "37.5",
        "Hourly Rate",
        "Rs. 1,234.5",
        "Salary",
        "Rs. 46,293.75",
        "Generated On",
        "2026-10-15",
    ];
    assert_eq!(texts, expected);
}

#[test]
fn test_payslip_file_name_is_keyed_by_name() {
    let generator = DocumentGenerator::default();
    let record = EmployeeRecord::new("E1", "A/B", 1.0, 1.0);
    let date = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();

    let rendered = generator.payslip(&record, date).unwrap();
    assert_eq!(rendered.file_name, "Payslip_A_B.pdf");
}
