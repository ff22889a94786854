use log::{debug, info, warn};

use merit_engine::*;
use snafu::prelude::*;

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use text_diff::print_diff;

pub mod config_reader;
pub mod export;
pub mod io_common;
pub mod io_csv;
pub mod io_excel;

use crate::meritlist::config_reader::*;
use crate::meritlist::io_common::{format_score, program_name_from_path, simplify_file_name};

#[derive(Debug, Snafu)]
pub enum MlError {
    #[snafu(display("Error opening Excel file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("Excel file {path} has no worksheet or no header row"))]
    EmptyExcel { path: String },
    #[snafu(display("Worksheet {name:?} not found in {path}"))]
    MissingWorksheet { path: String, name: String },
    #[snafu(display("Error opening CSV file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("CSV file {path} has no header line"))]
    EmptyCsv { path: String },
    #[snafu(display("Error reading line {lineno} of CSV file {path}"))]
    CsvLineParse {
        source: csv::Error,
        path: String,
        lineno: usize,
    },
    #[snafu(display("Column {column:?} not found in the header of {path}"))]
    MissingColumn { column: String, path: String },
    #[snafu(display("Unknown input type {provider:?} for {path} (expected csv or xlsx)"))]
    UnknownProvider { provider: String, path: String },
    #[snafu(display("Error opening JSON file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON: {source}"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error writing merit list {path}"))]
    WritingCsv { source: csv::Error, path: String },
    #[snafu(display("Error writing {path}"))]
    WritingFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Program {label:?} not found in the seat matrix"))]
    UnknownProgram { label: String },
    #[snafu(display("The seat matrix has {count} rows, the program must be selected"))]
    AmbiguousProgram { count: usize },
    #[snafu(display("No candidate file: use --input or candidateFileSources in the configuration"))]
    MissingInput {},
    #[snafu(display(
        "No call multiplier: use --call-multiplier or rules.callMultiplier in the configuration"
    ))]
    MissingCallMultiplier {},
    #[snafu(display("Cannot read seat count {value:?}, expected CATEGORY=N"))]
    InvalidSeatOverride { value: String },
    #[snafu(display("Merit list allocation failed: {source}"))]
    Allocation { source: MeritErrors },
    #[snafu(display("Two merit lists would be written to the same file {file:?}"))]
    DuplicateListFile { file: String },
    #[snafu(display("Missing parent directory for {path}"))]
    MissingParentDir { path: String },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type MlResult<T> = Result<T, MlError>;

/// The options of the command line that take precedence over the configuration file.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct RunOverrides {
    pub input: Option<String>,
    pub input_type: Option<String>,
    pub excel_worksheet_name: Option<String>,
    pub program: Option<String>,
    /// CATEGORY=N
    pub seats: Vec<String>,
    pub call_multiplier: Option<u32>,
    pub out: Option<String>,
    pub summary: Option<String>,
}

/// Everything needed for one run, once the configuration and the overrides are merged.
#[derive(Eq, PartialEq, Debug, Clone)]
struct RunSettings {
    program_name: Option<String>,
    seat_matrix_row: Option<String>,
    sources: Vec<(String, FileSource)>,
    rules: AllocationRules,
    output_directory: Option<PathBuf>,
}

fn resolve_path(root: &Path, p: &str) -> String {
    let full: PathBuf = [root, Path::new(p)].iter().collect();
    full.as_path().display().to_string()
}

fn build_settings(config_path: Option<String>, overrides: &RunOverrides) -> MlResult<RunSettings> {
    let (config, root_p): (MeritConfig, PathBuf) = match config_path {
        Some(p) => {
            let config = read_config(&p)?;
            let root_p = Path::new(p.as_str())
                .parent()
                .context(MissingParentDirSnafu { path: p.clone() })?
                .to_path_buf();
            (config, root_p)
        }
        None => (MeritConfig::default(), PathBuf::new()),
    };
    info!("config: {:?}", config);

    let sources: Vec<(String, FileSource)> = if let Some(input) = overrides.input.clone() {
        let provider = match overrides.input_type.clone() {
            Some(x) => x,
            None => provider_from_extension(&input),
        };
        vec![(
            input.clone(),
            FileSource {
                provider,
                file_path: input,
                excel_worksheet_name: overrides.excel_worksheet_name.clone(),
            },
        )]
    } else {
        config
            .candidate_file_sources
            .iter()
            .map(|cfs| (resolve_path(&root_p, &cfs.file_path), cfs.clone()))
            .collect()
    };
    if sources.is_empty() {
        return MissingInputSnafu {}.fail();
    }

    let label = overrides
        .program
        .clone()
        .or_else(|| config.selected_program.clone());
    let row = select_seat_row(&config.seat_matrix, label.as_deref())?;
    let mut seat_matrix = match row {
        Some(r) => {
            info!(
                "Seat matrix row: {} (school: {:?}, approved intake: {:?})",
                r.label(),
                r.school,
                r.approved_intake
            );
            r.seat_matrix()
        }
        None => SeatMatrix::new(),
    };
    for s in overrides.seats.iter() {
        let (category, seats) = parse_seat_override(s)?;
        debug!("build_settings: seat override {} = {}", category, seats);
        seat_matrix.insert(&category, seats);
    }
    if seat_matrix.is_empty() {
        warn!("The seat matrix is empty: every candidate will be waitlisted");
    }

    let call_multiplier = overrides
        .call_multiplier
        .or(config.rules.call_multiplier)
        .context(MissingCallMultiplierSnafu {})?;

    let output_directory: Option<PathBuf> = match overrides.out.clone() {
        Some(out) => Some(PathBuf::from(out)),
        None => config
            .output_settings
            .output_directory
            .as_ref()
            .map(|d| PathBuf::from(resolve_path(&root_p, d))),
    };

    Ok(RunSettings {
        program_name: config.output_settings.program_name.clone(),
        seat_matrix_row: row.map(|r| r.label()),
        sources,
        rules: AllocationRules {
            seat_matrix,
            call_multiplier,
        },
        output_directory,
    })
}

fn provider_from_extension(path: &str) -> String {
    match Path::new(path).extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("csv") => "csv".to_string(),
        _ => "xlsx".to_string(),
    }
}

fn read_candidate_data(path: &str, cfs: &FileSource) -> MlResult<Vec<CandidateRecord>> {
    info!("Attempting to read candidate file {:?}", path);
    match cfs.provider.as_str() {
        "csv" => io_csv::read_csv_candidates(path),
        "xlsx" => io_excel::read_excel_candidates(path, cfs.excel_worksheet_name.as_deref()),
        x => UnknownProviderSnafu {
            provider: x,
            path,
        }
        .fail(),
    }
}

fn list_kind_name(kind: &ListKind) -> &'static str {
    match kind {
        ListKind::General => "general",
        ListKind::Category(_) => "category",
        ListKind::Pwd => "pwd",
    }
}

fn list_to_json(list: &MeritList, file_name: Option<&String>) -> JSValue {
    let ties: Vec<JSValue> = list
        .tie_groups()
        .iter()
        .map(|(score, group)| json!({"score": format_score(*score), "count": group.len()}))
        .collect();
    let entries: Vec<JSValue> = list
        .entries
        .iter()
        .map(|e| {
            json!({
                "formNumber": e.candidate.form_number,
                "meritNo": e.merit_rank,
                "status": e.status.label(),
            })
        })
        .collect();
    json!({
        "list": list_kind_name(&list.kind),
        "category": list.kind.label(),
        "cutoff": list.cutoff,
        "total": list.len(),
        "called": list.count(CounsellingStatus::Called),
        "waitlisted": list.count(CounsellingStatus::Waitlisted),
        "notApplicable": list.count(CounsellingStatus::NotApplicable),
        "ties": ties,
        "file": file_name,
        "entries": entries,
    })
}

fn build_summary_js(
    settings: &RunSettings,
    program_name: &str,
    lists: &MeritLists,
    file_names: &[Option<String>],
) -> JSValue {
    let mut seats: JSMap<String, JSValue> = JSMap::new();
    for (category, count) in settings.rules.seat_matrix.iter() {
        seats.insert(category.clone(), json!(count));
    }
    let stats = &lists.stats;
    let lists_js: Vec<JSValue> = lists
        .all_lists()
        .iter()
        .zip(file_names.iter())
        .map(|(list, file_name)| list_to_json(list, file_name.as_ref()))
        .collect();
    json!({
        "config": {
            "program": program_name,
            "seatMatrixRow": settings.seat_matrix_row,
            "callMultiplier": settings.rules.call_multiplier,
            "seats": seats,
        },
        "stats": {
            "totalRows": stats.total_rows,
            "absentRows": stats.absent_rows,
            "invalidScoreRows": stats.invalid_score_rows,
            "eligibleRows": stats.eligible_rows,
            "categoryCounts": stats.category_counts,
        },
        "lists": lists_js,
    })
}

/// Fails if two lists would share a file. Names are compared without case, for
/// the file systems that ignore it.
fn check_file_names(program_name: &str, lists: &MeritLists) -> MlResult<()> {
    let mut seen: HashSet<String> = HashSet::new();
    for list in lists.all_lists() {
        let file = export::list_file_name(program_name, &list.kind);
        ensure!(
            seen.insert(file.to_lowercase()),
            DuplicateListFileSnafu { file }
        );
    }
    Ok(())
}

/// Loads the candidates, allocates the merit lists, writes them and returns the summary of the run.
fn compute_merit_lists(config_path: Option<String>, overrides: &RunOverrides) -> MlResult<JSValue> {
    let settings = build_settings(config_path, overrides)?;
    info!("settings: {:?}", settings);

    let mut data: Vec<CandidateRecord> = Vec::new();
    for (path, cfs) in settings.sources.iter() {
        let mut file_data = read_candidate_data(path, cfs)?;
        info!("Read {} rows from {}", file_data.len(), simplify_file_name(path));
        data.append(&mut file_data);
    }

    let program_name = match settings.program_name.clone() {
        Some(x) => x,
        None => program_name_from_path(&settings.sources[0].0),
    };
    info!("Program: {}", program_name);

    let lists = generate_merit_lists(&data, &settings.rules).context(AllocationSnafu {})?;

    let file_names: Vec<Option<String>> = match settings.output_directory.as_ref() {
        Some(dir) => {
            check_file_names(&program_name, &lists)?;
            fs::create_dir_all(dir).context(WritingFileSnafu {
                path: dir.display().to_string(),
            })?;
            let mut res = Vec::new();
            for list in lists.all_lists() {
                let name = export::write_merit_list(dir, &program_name, list)?;
                res.push(Some(name));
            }
            res
        }
        None => lists.all_lists().iter().map(|_| None).collect(),
    };

    Ok(build_summary_js(
        &settings,
        &program_name,
        &lists,
        &file_names,
    ))
}

pub fn run_merit_lists(
    config_path: Option<String>,
    overrides: &RunOverrides,
    check_summary_path: Option<String>,
) -> MlResult<()> {
    let result_js = compute_merit_lists(config_path, overrides)?;

    let pretty_js_stats = serde_json::to_string_pretty(&result_js).context(ParsingJsonSnafu {})?;
    match overrides.summary.as_deref() {
        Some("stdout") => println!("{}", pretty_js_stats),
        Some(p) => fs::write(p, pretty_js_stats.as_bytes()).context(WritingFileSnafu { path: p })?,
        None => debug!("summary: {}", pretty_js_stats),
    }

    // The reference summary, if provided for comparison
    if let Some(summary_p) = check_summary_path {
        let summary_ref = read_summary(&summary_p)?;
        let pretty_js_summary_ref =
            serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
        if pretty_js_summary_ref != pretty_js_stats {
            warn!("Found differences with the reference string");
            print_diff(
                pretty_js_summary_ref.as_str(),
                pretty_js_stats.as_ref(),
                "\n",
            );
            whatever!("Difference detected between calculated summary and reference summary")
        }
    }

    Ok(())
}

#[cfg(test)]
fn run_merit_lists_test(test_name: &str, config_lpath: &str, summary_lpath: &str) -> MlResult<()> {
    let test_dir = option_env!("MERITLIST_TEST_DIR")
        .unwrap_or(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data"));
    info!("Running test {}", test_name);
    let out_dir = std::env::temp_dir().join(format!("meritlist-test-{}", test_name));
    let overrides = RunOverrides {
        out: Some(out_dir.display().to_string()),
        ..Default::default()
    };
    run_merit_lists(
        Some(format!("{}/{}/{}", test_dir, test_name, config_lpath)),
        &overrides,
        Some(format!("{}/{}/{}", test_dir, test_name, summary_lpath)),
    )
}

#[cfg(test)]
pub fn test_wrapper(test_name: &str) {
    let _ = env_logger::builder().is_test(true).try_init();
    let res = run_merit_lists_test(
        test_name,
        format!("{}_config.json", test_name).as_str(),
        format!("{}_expected_summary.json", test_name).as_str(),
    );
    if let Err(e) = &res {
        eprintln!("An error occured {}", e);
    }
    assert!(res.is_ok(), "test {} failed: {:?}", test_name, res);
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn goa_mtech_cyber_security() {
        test_wrapper("goa_mtech_cyber_security");
    }

    #[test]
    fn boundary_tie() {
        test_wrapper("boundary_tie");
    }

    #[test]
    fn empty_table() {
        test_wrapper("empty_table");
    }

    fn data_dir(test_name: &str) -> String {
        format!("{}/tests/data/{}", env!("CARGO_MANIFEST_DIR"), test_name)
    }

    #[test]
    fn missing_call_multiplier() {
        let overrides = RunOverrides {
            input: Some(format!(
                "{}/boundary_tie_candidates.csv",
                data_dir("boundary_tie")
            )),
            seats: vec!["GENERAL=1".to_string()],
            ..Default::default()
        };
        let res = compute_merit_lists(None, &overrides);
        assert!(matches!(res, Err(MlError::MissingCallMultiplier {})));
    }

    #[test]
    fn missing_input() {
        let overrides = RunOverrides {
            call_multiplier: Some(3),
            ..Default::default()
        };
        let res = compute_merit_lists(None, &overrides);
        assert!(matches!(res, Err(MlError::MissingInput {})));
    }

    #[test]
    fn command_line_overrides_configuration() {
        let overrides = RunOverrides {
            input: Some(format!(
                "{}/boundary_tie_candidates.csv",
                data_dir("boundary_tie")
            )),
            seats: vec!["GENERAL=2".to_string()],
            call_multiplier: Some(2),
            ..Default::default()
        };
        let summary = compute_merit_lists(None, &overrides).unwrap();
        assert_eq!(summary["config"]["program"], json!("BOUNDARY TIE CANDIDATES"));
        assert_eq!(summary["config"]["seatMatrixRow"], JSValue::Null);
        assert_eq!(summary["lists"][0]["cutoff"], json!(4));
        assert_eq!(summary["lists"][0]["called"], json!(4));
        assert_eq!(summary["lists"][0]["waitlisted"], json!(1));
        assert_eq!(summary["lists"][0]["file"], JSValue::Null);
    }

    #[test]
    fn negative_seats_are_reported() {
        let overrides = RunOverrides {
            input: Some(format!(
                "{}/boundary_tie_candidates.csv",
                data_dir("boundary_tie")
            )),
            seats: vec!["SC=-1".to_string()],
            call_multiplier: Some(2),
            ..Default::default()
        };
        let res = compute_merit_lists(None, &overrides);
        assert!(matches!(res, Err(MlError::Allocation { .. })));
    }

    #[test]
    fn oversized_seat_count_is_reported() {
        let overrides = RunOverrides {
            input: Some(format!(
                "{}/boundary_tie_candidates.csv",
                data_dir("boundary_tie")
            )),
            seats: vec![format!("GENERAL={}", i64::MAX)],
            call_multiplier: Some(3),
            ..Default::default()
        };
        let res = compute_merit_lists(None, &overrides);
        assert!(matches!(res, Err(MlError::Allocation { .. })));
    }

    fn list(kind: ListKind) -> MeritList {
        MeritList {
            kind,
            cutoff: Some(0),
            entries: vec![],
        }
    }

    fn lists_with(categories: &[&str]) -> MeritLists {
        MeritLists {
            general: list(ListKind::General),
            categories: categories
                .iter()
                .map(|c| list(ListKind::Category(c.to_string())))
                .collect(),
            pwd: MeritList {
                kind: ListKind::Pwd,
                cutoff: None,
                entries: vec![],
            },
            stats: SelectionStats::default(),
        }
    }

    #[test]
    fn colliding_file_names() {
        assert!(check_file_names("MTECH", &lists_with(&["OBC-NCL", "SC", "ST"])).is_ok());
        assert!(matches!(
            check_file_names("MTECH", &lists_with(&["SC/ST", "SC\\ST"])),
            Err(MlError::DuplicateListFile { ref file }) if file == "MTECH_SC_ST_merit_list.csv"
        ));
        assert!(matches!(
            check_file_names("MTECH", &lists_with(&["PWD"])),
            Err(MlError::DuplicateListFile { .. })
        ));
    }

    #[test]
    fn colliding_categories_are_not_written() {
        let path = std::env::temp_dir().join("meritlist-colliding-categories.csv");
        fs::write(
            &path,
            "FORM NUMBER,NAME OF THE APPLICANT,CATEGORY,EMAIL,MOBILE,Final_Attendance,ObtainMarks\n\
             F1,Anna,SC/ST,,,Present,70\n\
             F2,Bob,SC\\ST,,,Present,60\n",
        )
        .unwrap();
        let out_dir = std::env::temp_dir().join("meritlist-colliding-categories-out");
        let overrides = RunOverrides {
            input: Some(path.display().to_string()),
            seats: vec!["GENERAL=1".to_string()],
            call_multiplier: Some(1),
            out: Some(out_dir.display().to_string()),
            ..Default::default()
        };
        let res = compute_merit_lists(None, &overrides);
        assert!(matches!(res, Err(MlError::DuplicateListFile { .. })));
    }

    #[test]
    fn reference_mismatch_is_an_error() {
        let dir = data_dir("boundary_tie");
        let overrides = RunOverrides {
            call_multiplier: Some(1),
            ..Default::default()
        };
        let res = run_merit_lists(
            Some(format!("{}/boundary_tie_config.json", dir)),
            &overrides,
            Some(format!("{}/boundary_tie_expected_summary.json", dir)),
        );
        assert!(matches!(res, Err(MlError::Whatever { .. })));
    }

    #[test]
    fn provider_detection() {
        assert_eq!(provider_from_extension("a/b/list.CSV"), "csv");
        assert_eq!(provider_from_extension("merged_mtech.xlsx"), "xlsx");
        assert_eq!(provider_from_extension("no_extension"), "xlsx");
    }
}
