use crate::meritlist::*;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "programName")]
    pub program_name: Option<String>,
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct FileSource {
    /// csv or xlsx
    pub provider: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
}

/// One row of the seat matrix: the seats of a program on a campus.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct SeatMatrixRow {
    pub school: Option<String>,
    pub program: String,
    pub campus: String,
    #[serde(rename = "approvedIntake")]
    pub approved_intake: Option<u32>,
    pub seats: BTreeMap<String, i64>,
}

impl SeatMatrixRow {
    pub fn label(&self) -> String {
        format!("{} ({})", self.program, self.campus)
    }

    pub fn seat_matrix(&self) -> SeatMatrix {
        self.seats.iter().map(|(c, s)| (c.as_str(), *s)).collect()
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct MeritRules {
    #[serde(rename = "callMultiplier")]
    pub call_multiplier: Option<u32>,
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct MeritConfig {
    #[serde(rename = "outputSettings", default)]
    pub output_settings: OutputSettings,
    #[serde(rename = "candidateFileSources", default)]
    pub candidate_file_sources: Vec<FileSource>,
    #[serde(rename = "seatMatrix", default)]
    pub seat_matrix: Vec<SeatMatrixRow>,
    #[serde(rename = "selectedProgram")]
    pub selected_program: Option<String>,
    #[serde(default)]
    pub rules: MeritRules,
}

pub fn read_config(path: &str) -> MlResult<MeritConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: MeritConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(config)
}

pub fn read_summary(path: &str) -> MlResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}

/// Finds the row of the seat matrix for the given 'Program (Campus)' label.
///
/// Without a label, a matrix with a single row uses that row, and an empty matrix
/// gives no row at all.
pub fn select_seat_row<'a>(
    rows: &'a [SeatMatrixRow],
    label: Option<&str>,
) -> MlResult<Option<&'a SeatMatrixRow>> {
    match (label, rows) {
        (Some(l), _) => {
            let row = rows
                .iter()
                .find(|r| r.label().trim() == l.trim())
                .context(UnknownProgramSnafu { label: l })?;
            Ok(Some(row))
        }
        (None, []) => Ok(None),
        (None, [row]) => Ok(Some(row)),
        (None, _) => AmbiguousProgramSnafu { count: rows.len() }.fail(),
    }
}

/// Reads a `CATEGORY=N` seat count from the command line.
pub fn parse_seat_override(s: &str) -> MlResult<(String, i64)> {
    let (category, seats) = s
        .rsplit_once('=')
        .context(InvalidSeatOverrideSnafu { value: s })?;
    let seats = seats
        .trim()
        .parse::<i64>()
        .ok()
        .context(InvalidSeatOverrideSnafu { value: s })?;
    let category = category.trim();
    ensure!(!category.is_empty(), InvalidSeatOverrideSnafu { value: s });
    Ok((category.to_string(), seats))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(program: &str, campus: &str, seats: &[(&str, i64)]) -> SeatMatrixRow {
        SeatMatrixRow {
            school: None,
            program: program.to_string(),
            campus: campus.to_string(),
            approved_intake: None,
            seats: seats.iter().map(|(c, s)| (c.to_string(), *s)).collect(),
        }
    }

    #[test]
    fn seat_row_selection() {
        let rows = vec![
            row("M.Tech. Cyber Security", "Goa", &[("GENERAL", 10)]),
            row("M.Sc. Cyber Security", "Goa", &[("GENERAL", 12)]),
        ];
        let r = select_seat_row(&rows, Some("M.Sc. Cyber Security (Goa)")).unwrap();
        assert_eq!(r.map(|r| r.seat_matrix().seats("GENERAL")), Some(12));
        assert!(matches!(
            select_seat_row(&rows, Some("M.A. Cyber Law (Goa)")),
            Err(MlError::UnknownProgram { .. })
        ));
        assert!(matches!(
            select_seat_row(&rows, None),
            Err(MlError::AmbiguousProgram { count: 2 })
        ));
        assert_eq!(select_seat_row(&rows[..1], None).unwrap(), Some(&rows[0]));
        assert_eq!(select_seat_row(&[], None).unwrap(), None);
    }

    #[test]
    fn seat_matrix_keys_are_upper_cased() {
        let r = row("P", "C", &[("PwD", 1), ("obc-ncl", 6)]);
        let m = r.seat_matrix();
        assert_eq!(m.seats("PWD"), 1);
        assert_eq!(m.seats("OBC-NCL"), 6);
        assert_eq!(m.seats("SC"), 0);
    }

    #[test]
    fn seat_overrides() {
        assert_eq!(
            parse_seat_override("OBC-NCL=6").unwrap(),
            ("OBC-NCL".to_string(), 6)
        );
        assert_eq!(
            parse_seat_override(" SC = -2 ").unwrap(),
            ("SC".to_string(), -2)
        );
        assert!(parse_seat_override("SC").is_err());
        assert!(parse_seat_override("SC=two").is_err());
        assert!(parse_seat_override("=3").is_err());
    }

    #[test]
    fn parse_minimal_config() {
        let js = r#"{ "rules": { "callMultiplier": 2 } }"#;
        let config: MeritConfig = serde_json::from_str(js).unwrap();
        assert_eq!(config.rules.call_multiplier, Some(2));
        assert!(config.seat_matrix.is_empty());
        assert!(config.candidate_file_sources.is_empty());
        assert_eq!(config.output_settings, OutputSettings::default());
    }
}
