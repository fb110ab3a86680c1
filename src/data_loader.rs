use crate::contacts::{ContactSheet, Record};
use crate::error::AppError;
use polars::prelude::*;
use std::path::Path;
use tracing::debug;

/// Loads a contact file into a [`ContactSheet`].
///
/// Headers are trimmed and lowercased; every cell is kept as text.
pub fn load_contacts(path: &Path) -> Result<ContactSheet, AppError> {
    if !path.is_file() {
        return Err(AppError::InputNotFound(path.to_path_buf()));
    }

    let df = load_dataframe(path)?;
    debug!(
        rows = df.height(),
        cols = df.width(),
        "loaded '{}'",
        path.display()
    );
    dataframe_to_sheet(&df)
}

/// Loads a supported file into a Polars DataFrame of string columns.
pub fn load_dataframe(path: &Path) -> Result<DataFrame, AppError> {
    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_lowercase();

    match extension.as_str() {
        "csv" => load_csv_dataframe(path),
        "xlsx" | "xls" | "xlsm" | "ods" => load_excel_dataframe(path),
        _ => Err(AppError::UnsupportedFormat(
            path.to_string_lossy().to_string(),
        )),
    }
}

/// Reads a CSV file, preferring `;` and falling back to `,` when the
/// semicolon read fails or yields a single column.
fn load_csv_dataframe(path: &Path) -> Result<DataFrame, AppError> {
    match read_csv_with_separator(path, b';') {
        Ok(df) if df.width() > 1 => Ok(df),
        Ok(_) => {
            debug!("only one column with ';', retrying with ','");
            read_csv_with_separator(path, b',')
        }
        Err(e) => {
            debug!(error = %e, "reading with ';' failed, retrying with ','");
            read_csv_with_separator(path, b',')
        }
    }
}

fn read_csv_with_separator(path: &Path, separator: u8) -> Result<DataFrame, AppError> {
    // Schema inference is disabled so phone numbers keep their leading zeros.
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .with_parse_options(CsvParseOptions::default().with_separator(separator))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;
    Ok(df)
}

/// Loads an Excel file (first worksheet) into a DataFrame.
fn load_excel_dataframe(path: &Path) -> Result<DataFrame, AppError> {
    use calamine::{open_workbook_auto, DataType as Xl, Reader};

    let mut workbook = open_workbook_auto(path)?;
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| AppError::UnsupportedFormat(path.to_string_lossy().to_string()))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .ok_or_else(|| AppError::UnsupportedFormat(path.to_string_lossy().to_string()))??;

    let rows: Vec<Vec<Xl>> = range.rows().map(|r| r.to_vec()).collect();

    // First non-empty row is the header
    let header_idx = rows
        .iter()
        .position(|r| !r.iter().all(|c| matches!(c, Xl::Empty)))
        .ok_or_else(|| AppError::UnsupportedFormat(path.to_string_lossy().to_string()))?;

    let col_count = rows.iter().map(|r| r.len()).max().unwrap_or(0);

    let headers: Vec<String> = (0..col_count)
        .map(|i| {
            rows[header_idx]
                .get(i)
                .and_then(cell_to_string)
                .unwrap_or_default()
        })
        .collect();

    let mut columns: Vec<Vec<Option<String>>> = vec![Vec::new(); col_count];
    for row in rows.iter().skip(header_idx + 1) {
        for (ci, column) in columns.iter_mut().enumerate() {
            column.push(row.get(ci).and_then(cell_to_string));
        }
    }

    let series_vec: Vec<Series> = headers
        .iter()
        .zip(&columns)
        .enumerate()
        .map(|(i, (name, values))| {
            // Polars rejects empty or duplicate names, so those get positional ones
            let name = if name.is_empty() || headers[..i].contains(name) {
                format!("col_{}", i + 1)
            } else {
                name.clone()
            };
            Series::new(name.as_str(), values)
        })
        .collect();

    Ok(DataFrame::new(series_vec)?)
}

fn cell_to_string(cell: &calamine::DataType) -> Option<String> {
    use calamine::DataType as Xl;

    match cell {
        Xl::Empty | Xl::Error(_) => None,
        Xl::String(s) | Xl::DateTimeIso(s) | Xl::DurationIso(s) => Some(s.trim().to_string()),
        Xl::Float(v) | Xl::DateTime(v) | Xl::Duration(v) => Some(v.to_string()),
        Xl::Int(v) => Some(v.to_string()),
        Xl::Bool(v) => Some(v.to_string()),
    }
}

/// Converts a DataFrame into records, normalizing header names.
pub fn dataframe_to_sheet(df: &DataFrame) -> Result<ContactSheet, AppError> {
    let columns = normalize_headers(&df.get_column_names());

    let mut cells: Vec<Vec<String>> = Vec::with_capacity(df.width());
    for series in df.get_columns() {
        let text = series.cast(&DataType::String)?;
        let values = text
            .str()?
            .into_iter()
            .map(|v| v.map(|s| s.trim().to_string()).unwrap_or_default())
            .collect();
        cells.push(values);
    }

    let records = (0..df.height())
        .map(|row| {
            columns
                .iter()
                .zip(&cells)
                .map(|(name, column)| (name.clone(), column[row].clone()))
                .collect::<Record>()
        })
        .collect();

    Ok(ContactSheet { columns, records })
}

/// Normalizes every header; a name that collides with an earlier one once
/// lowercased (`Club` and `club`) becomes `col_<n>` so both stay reachable.
pub fn normalize_headers(names: &[&str]) -> Vec<String> {
    let mut headers: Vec<String> = Vec::with_capacity(names.len());
    for (i, name) in names.iter().enumerate() {
        let name = normalize_header(name, i);
        if headers.contains(&name) {
            headers.push(format!("col_{}", i + 1));
        } else {
            headers.push(name);
        }
    }
    headers
}

/// Trims and lowercases a header; blank headers become `col_<n>`.
pub fn normalize_header(name: &str, index: usize) -> String {
    let name = name.trim().to_lowercase();
    if name.is_empty() {
        format!("col_{}", index + 1)
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_are_trimmed_and_lowercased() {
        assert_eq!(normalize_header("  Celular ", 0), "celular");
        assert_eq!(normalize_header("REPRESENTANTE", 3), "representante");
        assert_eq!(normalize_header("   ", 2), "col_3");
    }

    #[test]
    fn headers_equal_after_lowercasing_get_positional_names() {
        assert_eq!(
            normalize_headers(&["celular", "dir", "Club", "club"]),
            vec!["celular", "dir", "club", "col_4"]
        );
    }

    #[test]
    fn dataframe_cells_become_trimmed_text() {
        let df = df! {
            "Celular" => &[Some(" 0991234567 "), None],
            "Club" => &[Some("Andes"), Some("Sierra")],
        }
        .unwrap();

        let sheet = dataframe_to_sheet(&df).unwrap();
        assert_eq!(sheet.columns, vec!["celular", "club"]);
        assert_eq!(sheet.records[0].get("celular"), Some("0991234567"));
        assert_eq!(sheet.records[1].get("celular"), Some(""));
        assert_eq!(sheet.records[1].get("club"), Some("Sierra"));
    }

    #[test]
    fn numeric_columns_are_rendered_as_text() {
        let df = df! {
            "celular" => &[991234567i64],
        }
        .unwrap();

        let sheet = dataframe_to_sheet(&df).unwrap();
        assert_eq!(sheet.records[0].get("celular"), Some("991234567"));
    }

    #[test]
    fn unknown_extension_is_unsupported() {
        let err = load_dataframe(Path::new("contacts.txt")).unwrap_err();
        assert!(matches!(err, AppError::UnsupportedFormat(_)));
    }
}
