// Writes the merit lists as CSV files.

use std::io;

use crate::meritlist::{io_common::*, *};

pub const EXPORT_COLUMNS: [&str; 8] = [
    "Merit No.",
    FORM_NUMBER,
    NAME,
    CATEGORY,
    EMAIL,
    MOBILE,
    OBTAIN_MARKS,
    "Counselling Status",
];

/// The name of the file holding a list, for example `MTECH_general_merit_list.csv`.
pub fn list_file_name(program_name: &str, kind: &ListKind) -> String {
    let name = match kind {
        ListKind::General => format!("{}_general_merit_list.csv", program_name),
        ListKind::Category(c) => format!("{}_{}_merit_list.csv", program_name, c),
        ListKind::Pwd => format!("{}_pwd_merit_list.csv", program_name),
    };
    name.replace(['/', '\\'], "_")
}

/// Writes one list in the given directory and returns the name of the file.
pub fn write_merit_list(dir: &Path, program_name: &str, list: &MeritList) -> MlResult<String> {
    let file_name = list_file_name(program_name, &list.kind);
    let path = dir.join(&file_name);
    let path_s = path.display().to_string();
    info!(
        "Writing {} list ({} candidates) to {:?}",
        list.kind.label(),
        list.len(),
        path_s
    );
    let wtr = fs::File::create(&path).context(WritingFileSnafu { path: path_s.clone() })?;
    write_merit_list_to(wtr, list).context(WritingCsvSnafu { path: path_s })?;
    Ok(file_name)
}

pub fn write_merit_list_to<W: io::Write>(w: W, list: &MeritList) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(w);
    wtr.write_record(EXPORT_COLUMNS)?;
    for entry in list.entries.iter() {
        let c = &entry.candidate;
        wtr.write_record(&[
            entry.merit_rank.to_string(),
            c.form_number.clone(),
            c.name.clone(),
            c.category_normalized().unwrap_or_default(),
            c.email.clone(),
            c.mobile.clone(),
            c.score.map(format_score).unwrap_or_default(),
            entry.status.label().to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}
