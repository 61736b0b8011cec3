//! `returns.xlsx`: one sheet named `returns`, header row plus one row per
//! returned order line

use std::path::Path;

use calamine::{Data, DataType, Range, Reader, Xlsx, XlsxError, open_workbook};
use chrono::{DateTime, TimeZone, Utc};

use super::{file_name, parse_timestamp};
use crate::core::constants::RETURNS_SHEET;
use crate::data::error::DataError;

/// Column order in the sheet
pub const RETURNS_COLUMNS: [&str; 8] = [
    "order_line_id",
    "order_id",
    "customer_id",
    "product_id",
    "order_timestamp",
    "refund_timestamp",
    "refund_amount",
    "reason",
];

#[derive(Debug, Clone)]
pub struct ReturnRow {
    pub order_line_id: i64,
    pub order_id: i64,
    pub customer_id: i64,
    pub product_id: i64,
    pub order_timestamp: DateTime<Utc>,
    pub refund_timestamp: DateTime<Utc>,
    pub refund_amount: f64,
    pub reason: String,
}

/// Read and coerce the returns workbook
pub fn read_returns(path: &Path) -> Result<Vec<ReturnRow>, DataError> {
    let file = file_name(path);

    let mut workbook: Xlsx<_> = open_workbook(path).map_err(|e: XlsxError| DataError::Workbook {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let range: Range<Data> =
        workbook
            .worksheet_range(RETURNS_SHEET)
            .map_err(|e| DataError::Workbook {
                path: path.to_path_buf(),
                message: format!("sheet '{}': {}", RETURNS_SHEET, e),
            })?;

    let mut rows = range.rows();
    let header = rows.next().ok_or_else(|| DataError::Workbook {
        path: path.to_path_buf(),
        message: format!("sheet '{}' is empty", RETURNS_SHEET),
    })?;

    // Resolve each declared column to its position in the sheet
    let mut indexes = [0usize; RETURNS_COLUMNS.len()];
    for (slot, name) in indexes.iter_mut().zip(RETURNS_COLUMNS) {
        *slot = header
            .iter()
            .position(|cell| cell.get_string() == Some(name))
            .ok_or_else(|| DataError::Workbook {
                path: path.to_path_buf(),
                message: format!("missing column '{}'", name),
            })?;
    }
    let [ol, o, c, p, ots, rts, amount, reason] = indexes;

    rows.map(|row| {
        Ok(ReturnRow {
            order_line_id: cell_i64(&file, "order_line_id", &row[ol])?,
            order_id: cell_i64(&file, "order_id", &row[o])?,
            customer_id: cell_i64(&file, "customer_id", &row[c])?,
            product_id: cell_i64(&file, "product_id", &row[p])?,
            order_timestamp: cell_timestamp(&file, "order_timestamp", &row[ots])?,
            refund_timestamp: cell_timestamp(&file, "refund_timestamp", &row[rts])?,
            refund_amount: cell_f64(&file, "refund_amount", &row[amount])?,
            reason: cell_string(&file, "reason", &row[reason])?,
        })
    })
    .collect()
}

fn cell_i64(file: &str, column: &'static str, cell: &Data) -> Result<i64, DataError> {
    match cell {
        Data::Int(v) => Ok(*v),
        Data::Float(v) if v.fract() == 0.0 => Ok(*v as i64),
        Data::String(s) => s
            .trim()
            .parse()
            .map_err(|_| DataError::coercion(file, column, s, "expected an integer")),
        other => Err(DataError::coercion(
            file,
            column,
            other.to_string(),
            "expected an integer cell",
        )),
    }
}

fn cell_f64(file: &str, column: &'static str, cell: &Data) -> Result<f64, DataError> {
    match cell {
        Data::Float(v) => Ok(*v),
        Data::Int(v) => Ok(*v as f64),
        Data::String(s) => s
            .trim()
            .parse()
            .map_err(|_| DataError::coercion(file, column, s, "expected a number")),
        other => Err(DataError::coercion(
            file,
            column,
            other.to_string(),
            "expected a numeric cell",
        )),
    }
}

fn cell_string(file: &str, column: &'static str, cell: &Data) -> Result<String, DataError> {
    match cell {
        Data::String(s) => Ok(s.clone()),
        other => Err(DataError::coercion(
            file,
            column,
            other.to_string(),
            "expected a text cell",
        )),
    }
}

fn cell_timestamp(
    file: &str,
    column: &'static str,
    cell: &Data,
) -> Result<DateTime<Utc>, DataError> {
    match cell {
        Data::String(s) => parse_timestamp(file, column, s),
        Data::DateTimeIso(s) => parse_timestamp(file, column, s),
        // Native Excel datetime cells (e.g. written by spreadsheet tools)
        Data::DateTime(_) => cell
            .as_datetime()
            .map(|naive| Utc.from_utc_datetime(&naive))
            .ok_or_else(|| {
                DataError::coercion(file, column, cell.to_string(), "invalid Excel datetime")
            }),
        other => Err(DataError::coercion(
            file,
            column,
            other.to_string(),
            "expected a timestamp cell",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;

    fn write_sheet(path: &Path, sheet: &str, rows: &[[&str; 8]]) {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet().set_name(sheet).unwrap();
        for (col, name) in RETURNS_COLUMNS.iter().enumerate() {
            worksheet.write_string(0, col as u16, *name).unwrap();
        }
        for (r, row) in rows.iter().enumerate() {
            for (col, value) in row.iter().enumerate() {
                // Numeric columns written as numbers, like the generator does
                if let Ok(n) = value.parse::<f64>() {
                    worksheet.write_number(r as u32 + 1, col as u16, n).unwrap();
                } else {
                    worksheet.write_string(r as u32 + 1, col as u16, *value).unwrap();
                }
            }
        }
        workbook.save(path).unwrap();
    }

    #[test]
    fn test_read_returns_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("returns.xlsx");
        write_sheet(
            &path,
            RETURNS_SHEET,
            &[[
                "17",
                "9",
                "210",
                "42",
                "2025-04-01T09:15:00",
                "2025-04-08T09:15:00",
                "24.95",
                "wrong_size",
            ]],
        );

        let rows = read_returns(&path).unwrap();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.order_line_id, 17);
        assert_eq!(row.product_id, 42);
        assert_eq!(row.reason, "wrong_size");
        assert!(row.refund_timestamp > row.order_timestamp);
        assert!((row.refund_amount - 24.95).abs() < 1e-9);
    }

    #[test]
    fn test_wrong_sheet_name_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("returns.xlsx");
        write_sheet(&path, "refunds", &[]);

        assert!(matches!(
            read_returns(&path).unwrap_err(),
            DataError::Workbook { .. }
        ));
    }

    #[test]
    fn test_bad_refund_amount_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("returns.xlsx");
        write_sheet(
            &path,
            RETURNS_SHEET,
            &[[
                "1",
                "1",
                "1",
                "1",
                "2025-04-01T09:15:00",
                "2025-04-02T09:15:00",
                "full refund",
                "damaged",
            ]],
        );

        let err = read_returns(&path).unwrap_err();
        assert!(matches!(
            err,
            DataError::Coercion { column: "refund_amount", .. }
        ));
    }
}
