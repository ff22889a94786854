/*!

Ranking and seat-quota allocation for admission merit lists.

Candidates who attended the examination and have a numeric score are ranked by
score. A general list covers every eligible candidate, one list is built per
reservation category (except `GENERAL`, which is the general list), and an
informational list gathers the candidates with a disability. The first
`seats * call_multiplier` positions of a gated list are called for counselling,
the rest is waitlisted.

See the [manual] for the input and configuration formats.

```
use merit_engine::*;

let rules = AllocationRules {
    seat_matrix: SeatMatrix::new().with_seats("GENERAL", 1),
    call_multiplier: 3,
};
let records: Vec<CandidateRecord> = [95.0, 95.0, 90.0, 80.0]
    .iter()
    .enumerate()
    .map(|(idx, score)| CandidateRecord {
        form_number: format!("F{}", idx),
        category_raw: Some("General".to_string()),
        attendance_status: "Present".to_string(),
        score: Some(*score),
        ..Default::default()
    })
    .collect();

let lists = generate_merit_lists(&records, &rules)?;
let ranks: Vec<u32> = lists.general.entries.iter().map(|e| e.merit_rank).collect();
assert_eq!(ranks, vec![1, 1, 3, 4]);
assert_eq!(lists.general.count(CounsellingStatus::Called), 3);
# Ok::<(), MeritErrors>(())
```
*/

pub mod builder;
mod category;
mod config;
pub mod manual;

use log::{debug, info, warn};
use std::cmp::Ordering;

pub use crate::category::{normalize_category, normalize_category_opt};
pub use crate::config::*;

/// Splits the table into the rows that can be ranked, and counts what was dropped.
///
/// A row is eligible when its attendance is `present` and its score is a number.
pub fn select_eligible(records: &[CandidateRecord]) -> (Vec<CandidateRecord>, SelectionStats) {
    let mut stats = SelectionStats {
        total_rows: records.len(),
        ..Default::default()
    };
    let mut eligible: Vec<CandidateRecord> = Vec::new();
    for r in records.iter() {
        if !r.is_present() {
            debug!(
                "select_eligible: form {:?}: skipping, attendance {:?}",
                r.form_number, r.attendance_status
            );
            stats.absent_rows += 1;
            continue;
        }
        if r.score.is_none() {
            debug!(
                "select_eligible: form {:?}: skipping, no valid score",
                r.form_number
            );
            stats.invalid_score_rows += 1;
            continue;
        }
        if let Some(cat) = r.category_normalized().filter(|c| !c.is_empty()) {
            *stats.category_counts.entry(cat).or_insert(0) += 1;
        }
        eligible.push(r.clone());
    }
    stats.eligible_rows = eligible.len();
    (eligible, stats)
}

fn compare_scores(a: &CandidateRecord, b: &CandidateRecord) -> Ordering {
    // Descending. Eligible records always carry a finite score.
    let sa = a.score.unwrap_or(f64::NEG_INFINITY);
    let sb = b.score.unwrap_or(f64::NEG_INFINITY);
    sb.partial_cmp(&sa).unwrap_or(Ordering::Equal)
}

/// Sorts the candidates by decreasing score and assigns competition ranks.
///
/// Tied candidates share the best rank of their group, and the next rank skips
/// accordingly: scores `[90, 90, 80]` get ranks `[1, 1, 3]`. The sort is stable,
/// so tied candidates keep their input order.
pub fn rank_candidates(records: &[CandidateRecord]) -> Vec<RankedCandidate> {
    let mut sorted: Vec<CandidateRecord> = records.to_vec();
    sorted.sort_by(compare_scores);

    let mut res: Vec<RankedCandidate> = Vec::with_capacity(sorted.len());
    let mut current_rank: u32 = 0;
    let mut previous_score: Option<f64> = None;
    for (idx, candidate) in sorted.into_iter().enumerate() {
        if previous_score != candidate.score {
            current_rank = (idx + 1) as u32;
            previous_score = candidate.score;
        }
        res.push(RankedCandidate {
            merit_rank: current_rank,
            candidate,
        });
    }
    res
}

/// The number of candidates called for a category: `seats * call_multiplier`.
pub fn cutoff(seats: i64, call_multiplier: u32) -> Result<usize, MeritErrors> {
    if seats < 0 {
        return Err(MeritErrors::InvalidConfiguration(format!(
            "seat count may not be negative, but it was {}",
            seats
        )));
    }
    if call_multiplier == 0 {
        return Err(MeritErrors::InvalidConfiguration(
            "the call multiplier must be at least 1".to_string(),
        ));
    }
    usize::try_from(seats)
        .ok()
        .and_then(|s| s.checked_mul(call_multiplier as usize))
        .ok_or_else(|| {
            MeritErrors::InvalidConfiguration(format!(
                "{} seats with a call multiplier of {} is too large",
                seats, call_multiplier
            ))
        })
}

/// Assigns the counselling status from the position in the ranked list.
///
/// The boundary is positional: with a cutoff of 2 and ranks `[1, 2, 2]`, the
/// first two entries are called and the third one is waitlisted even though it
/// shares its rank with the second one.
/// Without a cutoff every entry is `NotApplicable`.
pub fn classify(ranked: Vec<RankedCandidate>, cutoff: Option<usize>) -> Vec<MeritEntry> {
    ranked
        .into_iter()
        .enumerate()
        .map(|(idx, rc)| {
            let status = match cutoff {
                Some(c) if idx < c => CounsellingStatus::Called,
                Some(_) => CounsellingStatus::Waitlisted,
                None => CounsellingStatus::NotApplicable,
            };
            MeritEntry {
                merit_rank: rc.merit_rank,
                status,
                candidate: rc.candidate,
            }
        })
        .collect()
}

fn build_list(
    kind: ListKind,
    candidates: &[CandidateRecord],
    cutoff: Option<usize>,
) -> MeritList {
    let entries = classify(rank_candidates(candidates), cutoff);
    let list = MeritList {
        kind,
        cutoff,
        entries,
    };
    info!(
        "Merit list {}: {} candidates, cutoff {:?}, {} called",
        list.kind.label(),
        list.len(),
        list.cutoff,
        list.count(CounsellingStatus::Called)
    );
    list
}

/// Ranks all the eligible candidates against the GENERAL seats.
pub fn general_merit_list(
    eligible: &[CandidateRecord],
    rules: &AllocationRules,
) -> Result<MeritList, MeritErrors> {
    let c = cutoff(rules.seat_matrix.seats(GENERAL), rules.call_multiplier)?;
    Ok(build_list(ListKind::General, eligible, Some(c)))
}

/// One list per category found among the eligible candidates, GENERAL excepted.
///
/// Categories are compared after normalization. Candidates without a category
/// do not appear in any category list. A category absent from the seat matrix
/// has no seats: all its candidates are waitlisted.
pub fn category_merit_lists(
    eligible: &[CandidateRecord],
    rules: &AllocationRules,
) -> Result<Vec<MeritList>, MeritErrors> {
    // Categories in order of first appearance.
    let mut categories: Vec<String> = Vec::new();
    for r in eligible.iter() {
        if let Some(cat) = r.category_normalized() {
            if !cat.is_empty() && !categories.contains(&cat) {
                categories.push(cat);
            }
        }
    }
    debug!("category_merit_lists: categories: {:?}", categories);

    let mut res: Vec<MeritList> = Vec::new();
    for cat in categories.into_iter() {
        if cat == GENERAL {
            continue;
        }
        if !rules.seat_matrix.contains(&cat) {
            warn!(
                "Category {:?} is not in the seat matrix, all its candidates are waitlisted",
                cat
            );
        }
        let members: Vec<CandidateRecord> = eligible
            .iter()
            .filter(|r| r.category_normalized().as_deref() == Some(cat.as_str()))
            .cloned()
            .collect();
        let c = cutoff(rules.seat_matrix.seats(&cat), rules.call_multiplier)?;
        res.push(build_list(ListKind::Category(cat), &members, Some(c)));
    }
    Ok(res)
}

/// The candidates with a disability, ranked for information only.
pub fn pwd_merit_list(eligible: &[CandidateRecord]) -> MeritList {
    let members: Vec<CandidateRecord> = eligible.iter().filter(|r| r.is_pwd()).cloned().collect();
    build_list(ListKind::Pwd, &members, None)
}

/// Runs the whole allocation on a freshly loaded table.
///
/// Arguments:
/// * `records` every row of the input table, eligible or not
/// * `rules` the seat matrix and call multiplier of the admission round
pub fn generate_merit_lists(
    records: &[CandidateRecord],
    rules: &AllocationRules,
) -> Result<MeritLists, MeritErrors> {
    info!(
        "Processing {} candidate records, rules: {:?}",
        records.len(),
        rules
    );
    rules.validate()?;

    let (eligible, stats) = select_eligible(records);
    info!(
        "Eligible candidates: {} (absent: {}, invalid score: {})",
        stats.eligible_rows, stats.absent_rows, stats.invalid_score_rows
    );
    for (cat, count) in stats.category_counts.iter() {
        info!("Category: {}: {}", cat, count);
    }

    let general = general_merit_list(&eligible, rules)?;
    let categories = category_merit_lists(&eligible, rules)?;
    let pwd = pwd_merit_list(&eligible);
    Ok(MeritLists {
        general,
        categories,
        pwd,
        stats,
    })
}
