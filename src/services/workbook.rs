use rust_xlsxwriter::{Format, Workbook, Worksheet};

use crate::errors::AppResult;
use crate::services::report_service::{GroupRow, IndividualRow, ReportCardSheet};

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";
// Excel caps worksheet names at 31 characters
const MAX_SHEET_NAME: usize = 31;

fn header_format() -> Format {
    Format::new().set_bold()
}

fn percent_format() -> Format {
    Format::new().set_num_format("0.0%")
}

fn write_header(worksheet: &mut Worksheet, row: u32, headers: &[&str]) -> AppResult<()> {
    let bold = header_format();
    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string_with_format(row, col as u16, *header, &bold)?;
    }
    Ok(())
}

fn sheet_name(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .map(|c| match c {
            '[' | ']' | ':' | '*' | '?' | '/' | '\\' => '_',
            other => other,
        })
        .collect();
    cleaned.chars().take(MAX_SHEET_NAME).collect()
}

/// One student's results across quizzes, one row per finalized result.
pub fn render_individual(student_name: &str, rows: &[IndividualRow]) -> AppResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name(&format!("Report - {}", student_name)))?;

    write_header(
        worksheet,
        0,
        &["Quiz", "Attempt Date", "Score", "Maximum", "Status"],
    )?;

    for (idx, report_row) in rows.iter().enumerate() {
        let row = idx as u32 + 1;
        worksheet.write_string(row, 0, &report_row.quiz_title)?;
        worksheet.write_string(row, 1, report_row.attempt_date.format(DATE_FORMAT).to_string())?;
        worksheet.write_number(row, 2, f64::from(report_row.score))?;
        worksheet.write_number(row, 3, f64::from(report_row.maximum))?;
        worksheet.write_string(row, 4, &report_row.status)?;
    }

    autosize(worksheet, 5)?;
    Ok(workbook.save_to_buffer()?)
}

/// One quiz across its roster, one row per student.
pub fn render_group(quiz_title: &str, rows: &[GroupRow]) -> AppResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name(quiz_title))?;

    write_header(
        worksheet,
        0,
        &["Student ID", "Student Name", "Score", "Maximum", "Status"],
    )?;

    for (idx, group_row) in rows.iter().enumerate() {
        let row = idx as u32 + 1;
        worksheet.write_string(row, 0, &group_row.student_id)?;
        worksheet.write_string(row, 1, &group_row.student_name)?;
        worksheet.write_number(row, 2, f64::from(group_row.score))?;
        worksheet.write_number(row, 3, f64::from(group_row.maximum))?;
        worksheet.write_string(row, 4, &group_row.status)?;
    }

    autosize(worksheet, 5)?;
    Ok(workbook.save_to_buffer()?)
}

/// One worksheet per student: per-quiz rows plus an overall summary line.
pub fn render_report_card(sheets: &[ReportCardSheet]) -> AppResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let bold = header_format();
    let percent = percent_format();

    for card in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet_name(&card.student_id))?;

        worksheet.write_string_with_format(0, 0, "Student", &bold)?;
        worksheet.write_string(0, 1, &card.student_name)?;
        worksheet.write_string_with_format(1, 0, "Student ID", &bold)?;
        worksheet.write_string(1, 1, &card.student_id)?;

        write_header(
            worksheet,
            3,
            &["Quiz", "Attempt Date", "Score", "Maximum", "Status"],
        )?;

        let mut row = 4u32;
        for report_row in &card.rows {
            worksheet.write_string(row, 0, &report_row.quiz_title)?;
            worksheet
                .write_string(row, 1, report_row.attempt_date.format(DATE_FORMAT).to_string())?;
            worksheet.write_number(row, 2, f64::from(report_row.score))?;
            worksheet.write_number(row, 3, f64::from(report_row.maximum))?;
            worksheet.write_string(row, 4, &report_row.status)?;
            row += 1;
        }

        worksheet.write_string_with_format(row, 0, "Overall", &bold)?;
        worksheet.write_number(row, 2, f64::from(card.total_score))?;
        worksheet.write_number(row, 3, f64::from(card.total_maximum))?;
        worksheet.write_number_with_format(row, 4, card.overall_ratio(), &percent)?;

        autosize(worksheet, 5)?;
    }

    Ok(workbook.save_to_buffer()?)
}

fn autosize(worksheet: &mut Worksheet, columns: u16) -> AppResult<()> {
    for col in 0..columns {
        worksheet.set_column_width(col, 22)?;
    }
    Ok(())
}
