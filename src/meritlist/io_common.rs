use std::collections::HashMap;
use std::path::Path;

use crate::meritlist::*;

pub const FORM_NUMBER: &str = "FORM NUMBER";
pub const NAME: &str = "NAME OF THE APPLICANT";
pub const CATEGORY: &str = "CATEGORY";
pub const EMAIL: &str = "EMAIL";
pub const MOBILE: &str = "MOBILE";
pub const OBTAIN_MARKS: &str = "ObtainMarks";
pub const FINAL_ATTENDANCE: &str = "Final_Attendance";
pub const PWD_PERCENTAGE: &str = "PwD (PERCENTAGE OF DISABILITY)";

/// The columns every candidate table must have, in the order used by `records_from_rows`.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    FORM_NUMBER,
    NAME,
    CATEGORY,
    EMAIL,
    MOBILE,
    OBTAIN_MARKS,
    FINAL_ATTENDANCE,
];

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

/// The program name as derived from the name of the input file.
///
/// `merged_m_tech_cyber_security.xlsx` becomes `M TECH CYBER SECURITY`.
pub fn program_name_from_path(path: &str) -> String {
    let stem = Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(path);
    let name = stem.replace('_', " ").to_uppercase().replace("MERGED", "");
    name.trim().to_string()
}

/// The textual form of a score, as written in the outputs.
pub fn format_score(score: f64) -> String {
    score.to_string()
}

/// Given the header of a file (names of each of the columns), and the names of the
/// requested columns, finds the index of each requested column.
pub fn get_col_index_mapping(
    req_col_names: &[&str],
    header: &[Option<String>],
    path: &str,
) -> MlResult<Vec<usize>> {
    let col_names: HashMap<String, usize> = header
        .iter()
        .enumerate()
        .rev()
        .filter_map(|(idx, x)| {
            x.as_ref()
                .map(|s| (s.trim_start_matches('\u{feff}').trim().to_string(), idx))
        })
        .collect();

    debug!("get_col_index_mapping: col_names: {:?}", col_names);

    let mut col_indexes: Vec<usize> = Vec::new();
    for cname in req_col_names {
        let idx = col_names.get(*cname).context(MissingColumnSnafu {
            column: *cname,
            path,
        })?;
        col_indexes.push(*idx);
    }
    Ok(col_indexes)
}

/// Builds the candidate records from the rows of a table.
///
/// Empty cells are `None`. Rows where every cell is empty are dropped.
pub fn records_from_rows(
    header: &[Option<String>],
    rows: Vec<Vec<Option<String>>>,
    path: &str,
) -> MlResult<Vec<CandidateRecord>> {
    let idx = get_col_index_mapping(&REQUIRED_COLUMNS, header, path)?;
    let pwd_idx: Option<usize> = get_col_index_mapping(&[PWD_PERCENTAGE], header, path)
        .ok()
        .map(|v| v[0]);
    if pwd_idx.is_none() {
        info!(
            "records_from_rows: no column {:?} in {}, no candidate is listed as PwD",
            PWD_PERCENTAGE, path
        );
    }

    let mut res: Vec<CandidateRecord> = Vec::new();
    for (lineno, row) in rows.into_iter().enumerate() {
        if row.iter().all(|c| c.is_none()) {
            debug!("records_from_rows: {}: skipping empty row {}", path, lineno + 2);
            continue;
        }
        let cell = |i: usize| -> Option<String> { row.get(i).cloned().flatten() };
        let record = CandidateRecord {
            form_number: cell(idx[0]).unwrap_or_default(),
            name: cell(idx[1]).unwrap_or_default(),
            category_raw: cell(idx[2]),
            email: cell(idx[3]).unwrap_or_default(),
            mobile: cell(idx[4]).unwrap_or_default(),
            score: cell(idx[5]).and_then(|s| parse_score(&s)),
            attendance_status: cell(idx[6]).unwrap_or_default(),
            disability_percentage: pwd_idx.and_then(cell).and_then(|s| parse_score(&s)),
        };
        debug!("records_from_rows: {}: {:?}", lineno + 2, record);
        res.push(record);
    }
    Ok(res)
}
