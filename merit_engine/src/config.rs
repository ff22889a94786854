// ********* Input data structures ***********

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::Display;

use crate::category::{normalize_category, normalize_category_opt};

/// One row of the admission table, as produced by the loaders.
///
/// The display fields (`name`, `email`, `mobile`) are opaque to the engine.
/// `form_number` is expected to be unique but this is not enforced: duplicated
/// rows pass through unchanged.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct CandidateRecord {
    pub form_number: String,
    pub name: String,
    pub email: String,
    pub mobile: String,
    /// The reservation category as written in the input.
    pub category_raw: Option<String>,
    pub attendance_status: String,
    /// `None` when the cell could not be read as a number.
    pub score: Option<f64>,
    pub disability_percentage: Option<f64>,
}

impl CandidateRecord {
    /// Only candidates marked as present (case and whitespace insensitive) are ranked.
    pub fn is_present(&self) -> bool {
        self.attendance_status.trim().eq_ignore_ascii_case("present")
    }

    pub fn category_normalized(&self) -> Option<String> {
        normalize_category_opt(self.category_raw.as_deref())
    }

    pub fn is_pwd(&self) -> bool {
        matches!(self.disability_percentage, Some(p) if p > 0.0)
    }
}

/// Reads a numeric cell. Anything that is not a finite decimal number is rejected.
pub fn parse_score(text: &str) -> Option<f64> {
    match text.trim().parse::<f64>() {
        Ok(x) if x.is_finite() => Some(x),
        _ => None,
    }
}

// ******** Output data structures *********

#[derive(PartialEq, Debug, Clone)]
pub struct RankedCandidate {
    pub merit_rank: u32,
    pub candidate: CandidateRecord,
}

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum CounsellingStatus {
    Called,
    Waitlisted,
    /// Informational lists (PwD) are never gated by a cutoff.
    NotApplicable,
}

impl CounsellingStatus {
    pub fn label(&self) -> &'static str {
        match self {
            CounsellingStatus::Called => "Called for Counselling",
            CounsellingStatus::Waitlisted => "Waitlisted",
            CounsellingStatus::NotApplicable => "--",
        }
    }
}

impl Display for CounsellingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A candidate as it appears in one merit list.
///
/// The same candidate usually appears in several lists (general and category),
/// each time with its own rank and status.
#[derive(PartialEq, Debug, Clone)]
pub struct MeritEntry {
    pub merit_rank: u32,
    pub status: CounsellingStatus,
    pub candidate: CandidateRecord,
}

#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub enum ListKind {
    General,
    Category(String),
    Pwd,
}

impl ListKind {
    pub fn label(&self) -> &str {
        match self {
            ListKind::General => GENERAL,
            ListKind::Category(c) => c.as_str(),
            ListKind::Pwd => "PwD",
        }
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct MeritList {
    pub kind: ListKind,
    /// Number of positions called for counselling. `None` for the informational lists.
    pub cutoff: Option<usize>,
    /// Ordered by merit rank, best first.
    pub entries: Vec<MeritEntry>,
}

impl MeritList {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn count(&self, status: CounsellingStatus) -> usize {
        self.entries.iter().filter(|e| e.status == status).count()
    }

    /// The groups of at least two entries sharing the same score, in rank order.
    pub fn tie_groups(&self) -> Vec<(f64, Vec<&MeritEntry>)> {
        let mut groups: Vec<(f64, Vec<&MeritEntry>)> = Vec::new();
        for entry in self.entries.iter() {
            let score = entry.candidate.score.unwrap_or(f64::NAN);
            match groups.last_mut() {
                Some((s, group)) if *s == score => group.push(entry),
                _ => groups.push((score, vec![entry])),
            }
        }
        groups.retain(|(_, group)| group.len() > 1);
        groups
    }
}

/// Counts collected while filtering the input table.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct SelectionStats {
    pub total_rows: usize,
    /// Rows not marked as present.
    pub absent_rows: usize,
    /// Present rows whose score could not be read.
    pub invalid_score_rows: usize,
    pub eligible_rows: usize,
    /// Eligible rows per normalized category. Rows without a category are not counted.
    pub category_counts: BTreeMap<String, usize>,
}

#[derive(PartialEq, Debug, Clone)]
pub struct MeritLists {
    pub general: MeritList,
    /// One list per non-GENERAL category, in order of first appearance in the input.
    pub categories: Vec<MeritList>,
    pub pwd: MeritList,
    pub stats: SelectionStats,
}

impl MeritLists {
    /// All the lists, in export order: general, categories, PwD.
    pub fn all_lists(&self) -> Vec<&MeritList> {
        let mut res = vec![&self.general];
        res.extend(self.categories.iter());
        res.push(&self.pwd);
        res
    }
}

/// Errors that prevent the allocation from completing.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum MeritErrors {
    InvalidConfiguration(String),
}

impl Error for MeritErrors {}

impl Display for MeritErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MeritErrors::InvalidConfiguration(msg) => write!(f, "invalid configuration: {}", msg),
        }
    }
}

// ********* Configuration **********

/// The category that has its own dedicated list. Matched exactly, after normalization.
pub const GENERAL: &str = "GENERAL";

/// The number of seats per reservation category, for one program and campus.
///
/// Category names are normalized like the candidates' categories, so `OBC - NCL`
/// and `OBC-NCL` are the same key. A category that is not in the matrix has zero
/// seats: nobody from it is called.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct SeatMatrix {
    seats: BTreeMap<String, i64>,
}

impl SeatMatrix {
    pub fn new() -> SeatMatrix {
        SeatMatrix::default()
    }

    pub fn with_seats(mut self, category: &str, seats: i64) -> SeatMatrix {
        self.insert(category, seats);
        self
    }

    pub fn insert(&mut self, category: &str, seats: i64) {
        self.seats.insert(normalize_category(category), seats);
    }

    pub fn seats(&self, category: &str) -> i64 {
        self.seats
            .get(&normalize_category(category))
            .cloned()
            .unwrap_or(0)
    }

    pub fn contains(&self, category: &str) -> bool {
        self.seats.contains_key(&normalize_category(category))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &i64)> {
        self.seats.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }
}

impl<'a> FromIterator<(&'a str, i64)> for SeatMatrix {
    fn from_iter<I: IntoIterator<Item = (&'a str, i64)>>(iter: I) -> Self {
        let mut m = SeatMatrix::new();
        for (category, seats) in iter {
            m.insert(category, seats);
        }
        m
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct AllocationRules {
    pub seat_matrix: SeatMatrix,
    /// How many candidates are called per available seat.
    pub call_multiplier: u32,
}

impl AllocationRules {
    pub fn validate(&self) -> Result<(), MeritErrors> {
        if self.call_multiplier == 0 {
            return Err(MeritErrors::InvalidConfiguration(
                "the call multiplier must be at least 1".to_string(),
            ));
        }
        for (category, seats) in self.seat_matrix.iter() {
            if *seats < 0 {
                return Err(MeritErrors::InvalidConfiguration(format!(
                    "negative seat count {} for category {}",
                    seats, category
                )));
            }
        }
        Ok(())
    }
}
