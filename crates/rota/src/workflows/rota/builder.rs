use std::collections::HashSet;

use chrono::{Duration, NaiveDate};
use tracing::{debug, warn};

use super::domain::{normalize_start, DutyType, RotaError, WeekRecord, MIN_PARTICIPANTS};
use super::selector::DutyLedger;

/// Result of one generation run.
///
/// On failure `rows` holds whatever was built before the failing week; callers
/// should treat the run as failed and discard them (see [`RotaOutcome::into_result`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotaOutcome {
    pub rows: Vec<WeekRecord>,
    pub error: Option<RotaError>,
}

impl RotaOutcome {
    fn rejected(error: RotaError) -> Self {
        Self {
            rows: Vec::new(),
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    pub fn into_result(self) -> Result<Vec<WeekRecord>, RotaError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.rows),
        }
    }
}

/// Trim names and drop blanks. Order and duplicates are preserved.
pub fn clean_participants<S: AsRef<str>>(names: &[S]) -> Vec<String> {
    names
        .iter()
        .map(|name| name.as_ref().trim())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

fn validate(participants: &[String], anchor: NaiveDate, weeks: i64) -> Result<usize, RotaError> {
    let distinct: HashSet<&str> = participants.iter().map(String::as_str).collect();
    if distinct.len() < MIN_PARTICIPANTS {
        return Err(RotaError::InsufficientParticipants {
            found: distinct.len(),
        });
    }
    if weeks < 1 {
        return Err(RotaError::InvalidWeekCount(weeks));
    }
    // The last row must still have a representable date.
    Duration::try_weeks(weeks - 1)
        .and_then(|span| anchor.checked_add_signed(span))
        .ok_or(RotaError::InvalidWeekCount(weeks))?;
    usize::try_from(weeks).map_err(|_| RotaError::InvalidWeekCount(weeks))
}

/// Build a rota of `weeks` rows starting on the Friday on or after `start`.
pub fn generate<S: AsRef<str>>(names: &[S], start: NaiveDate, weeks: i64) -> RotaOutcome {
    generate_with_offset(names, start, weeks, 0)
}

/// As [`generate`], with both rotation pointers starting at `offset`.
pub fn generate_with_offset<S: AsRef<str>>(
    names: &[S],
    start: NaiveDate,
    weeks: i64,
    offset: usize,
) -> RotaOutcome {
    let participants = clean_participants(names);
    let anchor = normalize_start(start);
    let weeks = match validate(&participants, anchor, weeks) {
        Ok(weeks) => weeks,
        Err(error) => return RotaOutcome::rejected(error),
    };

    build(DutyLedger::with_offset(participants, offset), anchor, weeks)
}

/// Week-by-week fill loop. Inputs are assumed validated.
pub(crate) fn build(mut ledger: DutyLedger, anchor: NaiveDate, weeks: usize) -> RotaOutcome {
    let mut rows = Vec::new();
    let mut carried: HashSet<String> = HashSet::new();

    for week in 0..weeks {
        let mut excluded = carried;

        let Some(weekend) = ledger.select(DutyType::Weekend, &excluded, week) else {
            return deadlock(rows, DutyType::Weekend, week);
        };
        ledger.commit(&weekend, DutyType::Weekend, week);
        excluded.insert(weekend.clone());

        let Some(week_duty) = ledger.select(DutyType::Week, &excluded, week) else {
            return deadlock(rows, DutyType::Week, week);
        };
        ledger.commit(&week_duty, DutyType::Week, week);

        let week_commencing = anchor + Duration::weeks(week as i64);
        debug!(week, %week_commencing, %weekend, week_duty = %week_duty, "week allocated");

        carried = HashSet::from([weekend.clone(), week_duty.clone()]);
        rows.push(WeekRecord {
            week_commencing,
            weekend: Some(weekend),
            week: Some(week_duty),
        });
    }

    RotaOutcome { rows, error: None }
}

fn deadlock(rows: Vec<WeekRecord>, duty: DutyType, week: usize) -> RotaOutcome {
    warn!(
        week,
        duty = duty.label(),
        built = rows.len(),
        "rota generation stuck"
    );
    RotaOutcome {
        rows,
        error: Some(RotaError::AllocationDeadlock { duty, week }),
    }
}
