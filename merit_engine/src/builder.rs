pub use crate::config::*;

/// A builder for collecting candidates one row at a time.
///
/// It is convenient when the rows do not come from a complete table, for
/// instance when they are typed in or streamed from another system.
///
/// ```
/// pub use merit_engine::builder::Builder;
/// pub use merit_engine::{AllocationRules, SeatMatrix};
/// # use merit_engine::MeritErrors;
///
/// let rules = AllocationRules {
///     seat_matrix: SeatMatrix::new().with_seats("GENERAL", 2).with_seats("SC", 1),
///     call_multiplier: 2,
/// };
/// let mut builder = Builder::new(&rules)?;
///
/// builder.add_row("F-001", "Anna", "General", "Present", "78.5");
/// builder.add_row("F-002", "Bob", "Scheduled Caste (SC)", "present", "81");
/// builder.add_row("F-003", "Clara", "SC", "Absent", "");
///
/// let lists = builder.build()?;
/// assert_eq!(lists.general.len(), 2);
/// assert_eq!(lists.categories[0].len(), 1);
///
/// # Ok::<(), MeritErrors>(())
/// ```
pub struct Builder {
    pub(crate) _rules: AllocationRules,
    pub(crate) _candidates: Vec<CandidateRecord>,
}

impl Builder {
    pub fn new(rules: &AllocationRules) -> Result<Builder, MeritErrors> {
        rules.validate()?;
        Ok(Builder {
            _rules: rules.clone(),
            _candidates: Vec::new(),
        })
    }

    /// Adds a row from its textual cells.
    ///
    /// It is the simplest use case for most cases. The score is parsed here: a
    /// score that is not a number is kept as missing and the row will not be ranked.
    pub fn add_row(
        &mut self,
        form_number: &str,
        name: &str,
        category: &str,
        attendance: &str,
        score: &str,
    ) {
        self.add_candidate(CandidateRecord {
            form_number: form_number.to_string(),
            name: name.to_string(),
            category_raw: Some(category.to_string()),
            attendance_status: attendance.to_string(),
            score: parse_score(score),
            ..Default::default()
        });
    }

    pub fn add_candidate(&mut self, candidate: CandidateRecord) {
        self._candidates.push(candidate);
    }

    pub fn len(&self) -> usize {
        self._candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self._candidates.is_empty()
    }

    pub fn build(&self) -> Result<MeritLists, MeritErrors> {
        crate::generate_merit_lists(&self._candidates, &self._rules)
    }
}
