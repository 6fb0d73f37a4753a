// Excel/ODS worksheet reader (xlsx, xlsm, xls, xlsb, ods)

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader, Sheets};

use crate::error::IoError;

/// Read one worksheet (0-based index) as rows of cell text. Rows keep their
/// absolute column positions even when the used range does not start at A1.
pub fn read_sheet_rows(path: &Path, sheet: usize) -> Result<Vec<Vec<String>>, IoError> {
    let mut workbook: Sheets<_> = open_workbook_auto(path)
        .map_err(|e| IoError::Workbook(format!("failed to open {}: {e}", path.display())))?;

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    let Some(sheet_name) = sheet_names.get(sheet) else {
        return Err(IoError::Workbook(format!(
            "{}: sheet index {sheet} out of range ({} sheet(s))",
            path.display(),
            sheet_names.len()
        )));
    };

    let range = workbook
        .worksheet_range(sheet_name)
        .map_err(|e| IoError::Workbook(format!("failed to read sheet '{sheet_name}': {e}")))?;

    let (start_row, start_col) = range.start().unwrap_or((0, 0));
    let mut rows: Vec<Vec<String>> = vec![Vec::new(); start_row as usize];
    for row in range.rows() {
        let mut cells = vec![String::new(); start_col as usize];
        cells.extend(row.iter().map(cell_text));
        rows.push(cells);
    }

    log::debug!(
        "{} [{sheet_name}]: {} row(s)",
        path.display(),
        rows.len()
    );
    Ok(rows)
}

/// Cell as the text a person would have typed into it.
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(n) => {
            // Integers without decimals: size cells hold 46, not 46.0
            if n.fract() == 0.0 && n.abs() < 1e15 {
                format!("{}", *n as i64)
            } else {
                format!("{n}")
            }
        }
        Data::Int(n) => n.to_string(),
        Data::Bool(b) => (if *b { "TRUE" } else { "FALSE" }).to_string(),
        Data::Error(e) => format!("#{e:?}"),
        Data::DateTime(dt) => format!("{}", dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;

    #[test]
    fn test_cell_text_integral_float() {
        assert_eq!(cell_text(&Data::Float(46.0)), "46");
        assert_eq!(cell_text(&Data::Float(2.5)), "2.5");
        assert_eq!(cell_text(&Data::Int(7)), "7");
        assert_eq!(cell_text(&Data::String("M,-2".into())), "M,-2");
        assert_eq!(cell_text(&Data::Empty), "");
        assert_eq!(cell_text(&Data::Bool(true)), "TRUE");
    }

    #[test]
    fn test_read_second_sheet() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("footwear.xlsx");

        let mut workbook = Workbook::new();
        let first = workbook.add_worksheet();
        first.write_string(0, 0, "Артикул").unwrap();
        let second = workbook.add_worksheet();
        second.write_string(0, 0, "Артикул").unwrap();
        second.write_string(1, 0, "Об-77").unwrap();
        second.write_number(1, 1, 41.0).unwrap();
        second.write_string(1, 2, "42, 43").unwrap();
        workbook.save(&path).unwrap();

        let rows = read_sheet_rows(&path, 1).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], vec!["Об-77", "41", "42, 43"]);
    }

    #[test]
    fn test_offset_range_keeps_columns() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("offset.xlsx");

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(2, 3, "Ко-1").unwrap();
        workbook.save(&path).unwrap();

        let rows = read_sheet_rows(&path, 0).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2][3], "Ко-1");
        assert!(rows[2][..3].iter().all(String::is_empty));
    }

    #[test]
    fn test_sheet_index_out_of_range() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("one.xlsx");
        let mut workbook = Workbook::new();
        workbook.add_worksheet().write_string(0, 0, "x").unwrap();
        workbook.save(&path).unwrap();

        let err = read_sheet_rows(&path, 4).unwrap_err();
        assert!(err.to_string().contains("sheet index 4 out of range"));
    }
}
