use crate::models::QueryRange;
use crate::table::ResultTable;
use rust_xlsxwriter::{Workbook, XlsxError};
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const SHEET_NAME: &str = "Sheet1";

// Worksheet limits, header row included.
const MAX_ROWS: usize = 1_048_576;
const MAX_COLUMNS: usize = 16_384;
const MAX_CELL_CHARS: usize = 32_767;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("table has {0} rows, more than a worksheet can hold")]
    TooManyRows(usize),
    #[error("table has {0} columns, more than a worksheet can hold")]
    TooManyColumns(usize),
    #[error("failed to build spreadsheet: {0}")]
    Xlsx(#[from] XlsxError),
}

pub fn export_file_name(range: &QueryRange) -> String {
    format!(
        "{}-{}-to-{}.xlsx",
        range.category.label(),
        range.start_date,
        range.end_date
    )
}

pub fn write_xlsx(table: &ResultTable) -> Result<Vec<u8>, ExportError> {
    if table.len() + 1 > MAX_ROWS {
        return Err(ExportError::TooManyRows(table.len()));
    }
    if table.columns().len() > MAX_COLUMNS {
        return Err(ExportError::TooManyColumns(table.columns().len()));
    }

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, name) in table.columns().iter().enumerate() {
        worksheet.write_string(0, col as u16, fit_cell(name, 0, col))?;
    }

    for (index, record) in table.rows().iter().enumerate() {
        let row = (index + 1) as u32;
        for (col, value) in table.cells(record).enumerate() {
            let col = col as u16;
            match value {
                Value::Null => {}
                Value::Bool(flag) => {
                    worksheet.write_boolean(row, col, *flag)?;
                }
                Value::Number(number) => match number.as_f64() {
                    Some(number) => {
                        worksheet.write_number(row, col, number)?;
                    }
                    None => {
                        let text = number.to_string();
                        worksheet.write_string(row, col, fit_cell(&text, index + 1, col.into()))?;
                    }
                },
                Value::String(text) => {
                    worksheet.write_string(row, col, fit_cell(text, index + 1, col.into()))?;
                }
                other => {
                    let text = other.to_string();
                    worksheet.write_string(row, col, fit_cell(&text, index + 1, col.into()))?;
                }
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

fn fit_cell(text: &str, row: usize, col: usize) -> &str {
    match text.char_indices().nth(MAX_CELL_CHARS) {
        Some((cut, _)) => {
            warn!(
                row,
                col,
                chars = text.chars().count(),
                limit = MAX_CELL_CHARS,
                "truncating cell to the worksheet limit"
            );
            &text[..cut]
        }
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use calamine::{open_workbook_from_rs, Data, Reader, Xlsx};
    use chrono::NaiveDate;
    use serde_json::json;
    use std::io::Cursor;

    fn read_back(bytes: Vec<u8>) -> calamine::Range<Data> {
        let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).unwrap();
        workbook.worksheet_range(SHEET_NAME).unwrap()
    }

    #[test]
    fn file_name_uses_label_and_iso_dates() {
        let range = QueryRange {
            category: Category::Individual,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
        };
        assert_eq!(export_file_name(&range), "Individual-2024-01-01-to-2024-01-02.xlsx");
    }

    #[test]
    fn round_trip_keeps_rows_and_columns() {
        let table = ResultTable::from_json(json!([
            {"id": "A1", "status": "pending", "fee": 120},
            {"id": "A2", "status": "granted", "fee": 80.5},
            {"id": "A3", "paid": true}
        ]))
        .unwrap();

        let range = read_back(write_xlsx(&table).unwrap());

        assert_eq!(range.height(), table.len() + 1);
        let header: Vec<String> = range
            .rows()
            .next()
            .unwrap()
            .iter()
            .map(|cell| cell.to_string())
            .collect();
        assert_eq!(header, ["id", "status", "fee", "paid"]);

        assert_eq!(range.get_value((1, 0)), Some(&Data::String("A1".to_string())));
        assert_eq!(range.get_value((2, 2)), Some(&Data::Float(80.5)));
        assert_eq!(range.get_value((3, 3)), Some(&Data::Bool(true)));
    }

    #[test]
    fn long_strings_are_truncated_to_the_cell_limit() {
        let notes = "é".repeat(40_000);
        let table = ResultTable::from_json(json!([{"id": "A1", "notes": notes}])).unwrap();

        let range = read_back(write_xlsx(&table).unwrap());

        let Some(Data::String(cell)) = range.get_value((1, 1)) else {
            panic!("expected a string cell");
        };
        assert_eq!(cell.chars().count(), MAX_CELL_CHARS);
        assert_eq!(range.get_value((1, 0)), Some(&Data::String("A1".to_string())));
    }

    #[test]
    fn empty_columns_still_get_a_header_row() {
        let table = ResultTable::from_json(json!({"id": [], "status": []})).unwrap();

        let range = read_back(write_xlsx(&table).unwrap());

        assert_eq!(range.height(), 1);
        assert_eq!(range.get_value((0, 0)), Some(&Data::String("id".to_string())));
        assert_eq!(range.get_value((0, 1)), Some(&Data::String("status".to_string())));
    }

    #[test]
    fn empty_table_exports_an_empty_sheet() {
        let bytes = write_xlsx(&ResultTable::default()).unwrap();
        let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).unwrap();
        assert_eq!(workbook.sheet_names(), [SHEET_NAME.to_string()]);
        assert!(workbook.worksheet_range(SHEET_NAME).unwrap().is_empty());
    }
}
