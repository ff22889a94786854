// Primitives for reading CSV files.

use std::fs::File;

use crate::meritlist::{io_common::records_from_rows, *};

fn to_cell(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// Reads the candidates of a CSV file. The first line is the header.
pub fn read_csv_candidates(path: &str) -> MlResult<Vec<CandidateRecord>> {
    let mut records = get_records(path)?;

    let header: Vec<Option<String>> = match records.next() {
        Some(line_r) => line_r
            .context(CsvLineParseSnafu { path, lineno: 1usize })?
            .iter()
            .map(to_cell)
            .collect(),
        None => return EmptyCsvSnafu { path }.fail(),
    };
    debug!("read_csv_candidates: {}: header: {:?}", path, header);

    let mut rows: Vec<Vec<Option<String>>> = Vec::new();
    for (idx, line_r) in records.enumerate() {
        // The header is line 1
        let lineno = idx + 2;
        let line = line_r.context(CsvLineParseSnafu { path, lineno })?;
        rows.push(line.iter().map(to_cell).collect());
    }
    records_from_rows(&header, rows, path)
}

fn get_records(path: &str) -> MlResult<csv::StringRecordsIntoIter<File>> {
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;
    Ok(rdr.into_records())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_tmp(name: &str, contents: &str) -> String {
        let p = std::env::temp_dir().join(format!("meritlist-io-csv-{}.csv", name));
        fs::write(&p, contents).unwrap();
        p.display().to_string()
    }

    #[test]
    fn reads_candidates() {
        let path = write_tmp(
            "reads_candidates",
            "\u{feff}FORM NUMBER,NAME OF THE APPLICANT,CATEGORY,EMAIL,MOBILE,Final_Attendance,ObtainMarks\n\
             F1,\"Naik, Asha\",OBC - NCL,asha@example.in,9800000001,Present,78\n\
             F2,Rohan,,,,Absent,\n\
             ,,,,,,\n\
             F3,Meera,SC,,,present,AB\n",
        );
        let records = read_csv_candidates(&path).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].name, "Naik, Asha");
        assert_eq!(records[0].category_normalized().as_deref(), Some("OBC-NCL"));
        assert_eq!(records[0].score, Some(78.0));
        assert_eq!(records[1].category_raw, None);
        assert!(!records[1].is_present());
        assert!(records[2].is_present());
        assert_eq!(records[2].score, None);
    }

    #[test]
    fn header_only() {
        let path = write_tmp(
            "header_only",
            "FORM NUMBER,NAME OF THE APPLICANT,CATEGORY,EMAIL,MOBILE,Final_Attendance,ObtainMarks\n",
        );
        assert_eq!(read_csv_candidates(&path).unwrap(), vec![]);
    }

    #[test]
    fn empty_file() {
        let path = write_tmp("empty_file", "");
        assert!(matches!(
            read_csv_candidates(&path),
            Err(MlError::EmptyCsv { .. })
        ));
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            read_csv_candidates("/nonexistent/meritlist/candidates.csv"),
            Err(MlError::CsvOpen { .. })
        ));
    }
}
