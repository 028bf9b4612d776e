use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Weekday every rota week commences on.
pub const REFERENCE_WEEKDAY: Weekday = Weekday::Fri;

/// Smallest roster that can satisfy two duties per week plus the cooldown week.
pub const MIN_PARTICIPANTS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DutyType {
    Weekend,
    Week,
}

impl DutyType {
    /// Fill order within a single week.
    pub const fn ordered() -> [Self; 2] {
        [Self::Weekend, Self::Week]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Weekend => "Weekend",
            Self::Week => "Week",
        }
    }
}

/// One row of a rota: the week it commences and who holds each duty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekRecord {
    pub week_commencing: NaiveDate,
    pub weekend: Option<String>,
    pub week: Option<String>,
}

impl WeekRecord {
    pub fn new(week_commencing: NaiveDate, weekend: &str, week: &str) -> Self {
        Self {
            week_commencing,
            weekend: Some(weekend.to_string()),
            week: Some(week.to_string()),
        }
    }

    pub fn assignee(&self, duty: DutyType) -> Option<&str> {
        match duty {
            DutyType::Weekend => self.weekend.as_deref(),
            DutyType::Week => self.week.as_deref(),
        }
    }

    pub fn assignee_mut(&mut self, duty: DutyType) -> &mut Option<String> {
        match duty {
            DutyType::Weekend => &mut self.weekend,
            DutyType::Week => &mut self.week,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        DutyType::ordered()
            .into_iter()
            .any(|duty| self.assignee(duty) == Some(name))
    }
}

/// Coordinate of a single cell in a rota.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotRef {
    pub week: usize,
    pub duty: DutyType,
}

impl SlotRef {
    pub const fn new(week: usize, duty: DutyType) -> Self {
        Self { week, duty }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RotaError {
    #[error(
        "at least {min} distinct names are needed for the cooldown rule to work (found {found})",
        min = MIN_PARTICIPANTS
    )]
    InsufficientParticipants { found: usize },
    #[error("number of weeks must be at least 1 (got {0})")]
    InvalidWeekCount(i64),
    #[error("number of weeks must not exceed {max} (got {requested})")]
    WeekCountTooLarge { requested: i64, max: u32 },
    #[error(
        "could not allocate {} duty for week {}: everyone is on cooldown or already assigned",
        .duty.label(),
        .week + 1
    )]
    AllocationDeadlock { duty: DutyType, week: usize },
}

/// Same-or-next occurrence of [`REFERENCE_WEEKDAY`].
pub fn normalize_start(date: NaiveDate) -> NaiveDate {
    let target = REFERENCE_WEEKDAY.num_days_from_monday();
    let current = date.weekday().num_days_from_monday();
    let offset = (target + 7 - current) % 7;
    date + Duration::days(i64::from(offset))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_start_moves_forward_to_friday() {
        let monday = NaiveDate::from_ymd_opt(2026, 1, 5).expect("valid date");
        assert_eq!(
            normalize_start(monday),
            NaiveDate::from_ymd_opt(2026, 1, 9).unwrap()
        );

        let saturday = NaiveDate::from_ymd_opt(2026, 1, 3).expect("valid date");
        assert_eq!(
            normalize_start(saturday),
            NaiveDate::from_ymd_opt(2026, 1, 9).unwrap()
        );
    }

    #[test]
    fn normalize_start_keeps_a_friday() {
        let friday = NaiveDate::from_ymd_opt(2026, 1, 2).expect("valid date");
        assert_eq!(normalize_start(friday), friday);
    }

    #[test]
    fn deadlock_message_names_duty_and_week() {
        let err = RotaError::AllocationDeadlock {
            duty: DutyType::Week,
            week: 2,
        };
        let message = err.to_string();
        assert!(message.contains("Week duty"));
        assert!(message.contains("week 3"));
    }

    #[test]
    fn week_record_lookup_by_duty() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 2).unwrap();
        let mut record = WeekRecord::new(date, "Ann", "Bob");
        assert_eq!(record.assignee(DutyType::Weekend), Some("Ann"));
        assert!(record.contains("Bob"));
        assert!(!record.contains("Cara"));

        *record.assignee_mut(DutyType::Week) = None;
        assert_eq!(record.assignee(DutyType::Week), None);
    }
}
