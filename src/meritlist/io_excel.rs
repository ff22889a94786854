use calamine::{open_workbook, DataType, Reader, Xlsx};

use crate::meritlist::{io_common::records_from_rows, *};

/// Reads the candidates of an Excel file.
///
/// The first row of the worksheet is the header. Without a worksheet name, the first
/// worksheet of the workbook is used.
pub fn read_excel_candidates(
    path: &str,
    worksheet_name: Option<&str>,
) -> MlResult<Vec<CandidateRecord>> {
    let wrange = get_range(path, worksheet_name)?;

    let mut iter = wrange.rows();
    let header: Vec<Option<String>> = iter
        .next()
        .context(EmptyExcelSnafu { path })?
        .iter()
        .map(read_cell)
        .collect();
    debug!("read_excel_candidates: {}: header: {:?}", path, header);

    let rows: Vec<Vec<Option<String>>> = iter
        .map(|row| row.iter().map(read_cell).collect())
        .collect();
    records_from_rows(&header, rows, path)
}

/// The text of a cell. Numbers are written without a trailing `.0`.
fn read_cell(cell: &DataType) -> Option<String> {
    match cell {
        DataType::String(s) if s.trim().is_empty() => None,
        DataType::String(s) => Some(s.clone()),
        DataType::Float(f) | DataType::DateTime(f) => Some(f.to_string()),
        DataType::Int(i) => Some(i.to_string()),
        DataType::Bool(b) => Some(b.to_string()),
        DataType::Empty => None,
        _ => None,
    }
}

fn get_range(path: &str, worksheet_name_o: Option<&str>) -> MlResult<calamine::Range<DataType>> {
    debug!(
        "read_excel_file: path: {:?} worksheet: {:?}",
        path, worksheet_name_o
    );
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;

    let wrange = match worksheet_name_o {
        Some(worksheet_name) => workbook
            .worksheet_range(worksheet_name)
            .context(MissingWorksheetSnafu {
                path,
                name: worksheet_name,
            })?
            .context(OpeningExcelSnafu { path })?,
        None => workbook
            .worksheet_range_at(0)
            .context(EmptyExcelSnafu { path })?
            .context(OpeningExcelSnafu { path })?,
    };
    Ok(wrange)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells() {
        assert_eq!(read_cell(&DataType::Float(78.0)), Some("78".to_string()));
        assert_eq!(read_cell(&DataType::Float(55.5)), Some("55.5".to_string()));
        assert_eq!(
            read_cell(&DataType::Float(9800000001.0)),
            Some("9800000001".to_string())
        );
        assert_eq!(read_cell(&DataType::Int(62)), Some("62".to_string()));
        assert_eq!(
            read_cell(&DataType::String("OBC - NCL".to_string())),
            Some("OBC - NCL".to_string())
        );
        assert_eq!(read_cell(&DataType::String("  ".to_string())), None);
        assert_eq!(read_cell(&DataType::Empty), None);
    }

    #[test]
    fn missing_workbook() {
        assert!(matches!(
            read_excel_candidates("/nonexistent/meritlist/merged_mtech.xlsx", None),
            Err(MlError::OpeningExcel { .. })
        ));
    }
}
