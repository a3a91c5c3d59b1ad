//! Writes a [`StyledReport`] to an `.xlsx` workbook.

use std::path::Path;

use chrono::NaiveDateTime;
use umya_spreadsheet::{Spreadsheet, Worksheet};

use crate::error::{Error, Result};
use crate::report::{RowStyle, StyledReport, StyledRow, SUMMARY_FILL};

const SHEET_NAME: &str = "Report";
const HEADERS: [&str; 5] = ["Issue", "Text_Type", "Text", "Date", "Author"];
const COLUMNS: [&str; 5] = ["A", "B", "C", "D", "E"];
const DATE_FORMAT_CODE: &str = "yyyy-mm-dd hh:mm:ss";
/// Serial number of 1970-01-01 in the 1900 date system
const UNIX_EPOCH_SERIAL: f64 = 25569.0;
const SECONDS_PER_DAY: f64 = 86400.0;

/// Write `report` to `path`, replacing any existing file
pub fn write(report: &StyledReport, path: &Path) -> Result<()> {
    let book = build_workbook(report)?;
    umya_spreadsheet::writer::xlsx::write(&book, path)
        .map_err(|e| Error::Spreadsheet(format!("cannot write {}: {}", path.display(), e)))
}

fn build_workbook(report: &StyledReport) -> Result<Spreadsheet> {
    let mut book = umya_spreadsheet::new_file_empty_worksheet();
    let sheet = book
        .new_sheet(SHEET_NAME)
        .map_err(|e| Error::Spreadsheet(format!("cannot create sheet: {}", e)))?;

    write_header(sheet);

    for (idx, styled) in report.rows.iter().enumerate() {
        let line = idx + 2;
        write_row(sheet, line, styled);
        apply_row_style(sheet, line, styled.style);

        let issue_cell = format!("A{}", line);
        let font = sheet.get_style_mut(issue_cell.as_str()).get_font_mut();
        font.get_color_mut().set_argb(report.link_style.color);
        if report.link_style.underline {
            font.set_underline("single");
        }
    }

    sheet.get_column_dimension_mut("C").set_width(80.0);
    sheet.get_column_dimension_mut("D").set_width(20.0);
    sheet.get_column_dimension_mut("E").set_width(24.0);

    Ok(book)
}

fn write_header(sheet: &mut Worksheet) {
    for (column, header) in COLUMNS.iter().zip(HEADERS) {
        let coordinate = format!("{}1", column);
        sheet.get_cell_mut(coordinate.as_str()).set_value(header);
        sheet
            .get_style_mut(coordinate.as_str())
            .get_font_mut()
            .set_bold(true);
    }
}

fn write_row(sheet: &mut Worksheet, line: usize, styled: &StyledRow) {
    let issue_cell = format!("A{}", line);
    sheet
        .get_cell_mut(issue_cell.as_str())
        .set_formula(styled.row.link.formula());

    let row = &styled.row;
    for (column, value) in [
        ("B", row.kind.as_str()),
        ("C", row.text.as_str()),
        ("E", row.author.as_str()),
    ] {
        let coordinate = format!("{}{}", column, line);
        sheet.get_cell_mut(coordinate.as_str()).set_value(value);
    }

    let date_cell = format!("D{}", line);
    sheet
        .get_cell_mut(date_cell.as_str())
        .set_value_number(excel_serial(row.date));
    sheet
        .get_style_mut(date_cell.as_str())
        .get_number_format_mut()
        .set_format_code(DATE_FORMAT_CODE);
}

fn apply_row_style(sheet: &mut Worksheet, line: usize, style: RowStyle) {
    if !style.highlight && !style.bold {
        return;
    }

    for column in COLUMNS {
        let coordinate = format!("{}{}", column, line);
        let cell_style = sheet.get_style_mut(coordinate.as_str());
        if style.highlight {
            cell_style.set_background_color(SUMMARY_FILL);
        }
        if style.bold {
            cell_style.get_font_mut().set_bold(true);
        }
    }
}

/// Spreadsheet date serial (days since 1899-12-30, time as the fraction)
pub fn excel_serial(date: NaiveDateTime) -> f64 {
    UNIX_EPOCH_SERIAL + date.and_utc().timestamp() as f64 / SECONDS_PER_DAY
}
