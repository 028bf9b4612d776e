use std::collections::{HashMap, HashSet};

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rota::workflows::rota::{
    generate, generate_smoothed, DutyType, RotaError, WeekRecord, MIN_PARTICIPANTS,
};

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 5).expect("valid start")
}

fn roster(size: usize) -> Vec<String> {
    ["Ann", "Bob", "Cara", "Dan", "Eve", "Fay", "Gus", "Hal", "Ivy"]
        .iter()
        .take(size)
        .map(|name| name.to_string())
        .collect()
}

fn assert_rota_invariants(names: &[String], rows: &[WeekRecord], weeks: usize) {
    let roster: HashSet<&str> = names.iter().map(String::as_str).collect();
    assert_eq!(rows.len(), weeks);

    for (index, row) in rows.iter().enumerate() {
        assert_eq!(row.week_commencing.weekday(), Weekday::Fri);
        assert_eq!(
            row.week_commencing,
            rows[0].week_commencing + Duration::weeks(index as i64)
        );

        let weekend = row.weekend.as_deref().expect("weekend filled");
        let week = row.week.as_deref().expect("week filled");
        assert_ne!(weekend, week, "same person twice in week {}", index + 1);
        assert!(roster.contains(weekend) && roster.contains(week));

        if let Some(next) = rows.get(index + 1) {
            assert!(
                !next.contains(weekend) && !next.contains(week),
                "cooldown broken after week {}",
                index + 1
            );
        }
    }
}

fn spread(rows: &[WeekRecord], duty: Option<DutyType>) -> usize {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for row in rows {
        for candidate in DutyType::ordered() {
            if duty.map_or(true, |duty| duty == candidate) {
                if let Some(name) = row.assignee(candidate) {
                    *counts.entry(name).or_default() += 1;
                }
            }
        }
    }
    let max = counts.values().max().copied().unwrap_or(0);
    let min = counts.values().min().copied().unwrap_or(0);
    max - min
}

#[test]
fn rotas_hold_every_invariant_across_rosters_and_lengths() {
    for size in MIN_PARTICIPANTS..=9 {
        let names = roster(size);
        for weeks in [1_usize, 2, 5, 13, 26, 52, 104] {
            let rows = generate(&names, start(), weeks as i64)
                .into_result()
                .expect("rota builds");
            assert_rota_invariants(&names, &rows, weeks);
        }
    }
}

#[test]
fn shifts_are_shared_evenly() {
    for size in MIN_PARTICIPANTS..=9 {
        let names = roster(size);
        for weeks in [13_i64, 52] {
            let rows = generate(&names, start(), weeks)
                .into_result()
                .expect("rota builds");
            assert!(spread(&rows, None) <= 1, "{size} people over {weeks} weeks");
            assert!(spread(&rows, Some(DutyType::Weekend)) <= 1);
            assert!(spread(&rows, Some(DutyType::Week)) <= 1);
        }
    }
}

#[test]
fn four_people_from_a_monday_start() {
    let names = roster(4);
    let rows = generate(&names, start(), 3)
        .into_result()
        .expect("rota builds");

    let anchor = NaiveDate::from_ymd_opt(2026, 1, 9).expect("valid anchor");
    assert_eq!(
        rows,
        vec![
            WeekRecord::new(anchor, "Ann", "Bob"),
            WeekRecord::new(anchor + Duration::weeks(1), "Cara", "Dan"),
            WeekRecord::new(anchor + Duration::weeks(2), "Bob", "Ann"),
        ]
    );
}

#[test]
fn generation_is_deterministic() {
    let names = roster(7);
    let first = generate(&names, start(), 40);
    let second = generate(&names, start(), 40);
    assert_eq!(first.rows, second.rows);

    let smoothed_first = generate_smoothed(&names, start(), 40);
    let smoothed_second = generate_smoothed(&names, start(), 40);
    assert_eq!(smoothed_first.rows, smoothed_second.rows);
}

#[test]
fn smoothed_rotas_keep_the_same_invariants() {
    let names = roster(6);
    let rows = generate_smoothed(&names, start(), 30)
        .into_result()
        .expect("smoothed rota builds");
    assert_rota_invariants(&names, &rows, 30);
}

#[test]
fn blank_and_repeated_names_are_handled() {
    let names: Vec<String> = ["  Ann ", "", "Bob", "Cara", "   ", "Dan", "Ann"]
        .iter()
        .map(|name| name.to_string())
        .collect();
    let rows = generate(&names, start(), 8)
        .into_result()
        .expect("four distinct names suffice");

    let cleaned = roster(4);
    assert_rota_invariants(&cleaned, &rows, 8);
}

#[test]
fn too_few_people_is_rejected_without_rows() {
    for size in 0..MIN_PARTICIPANTS {
        let outcome = generate(&roster(size), start(), 10);
        assert!(outcome.rows.is_empty());
        assert_eq!(
            outcome.error,
            Some(RotaError::InsufficientParticipants { found: size })
        );
    }
}

#[test]
fn non_positive_week_counts_are_rejected() {
    for weeks in [0_i64, -1, -52] {
        let outcome = generate(&roster(5), start(), weeks);
        assert!(outcome.rows.is_empty());
        assert_eq!(outcome.error, Some(RotaError::InvalidWeekCount(weeks)));
    }
}
