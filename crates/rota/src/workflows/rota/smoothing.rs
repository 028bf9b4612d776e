use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::debug;

use super::builder::{clean_participants, generate_with_offset, RotaOutcome};
use super::domain::{DutyType, RotaError, WeekRecord};

/// Sum, over both duty types and every person holding that duty more than
/// twice, of the population variance of the gaps between their turns.
/// Lower means steadier spacing.
pub fn gap_variance(rows: &[WeekRecord]) -> f64 {
    DutyType::ordered()
        .into_iter()
        .map(|duty| duty_gap_variance(rows, duty))
        .sum()
}

fn duty_gap_variance(rows: &[WeekRecord], duty: DutyType) -> f64 {
    let mut turns: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (index, row) in rows.iter().enumerate() {
        if let Some(name) = row.assignee(duty) {
            turns.entry(name).or_default().push(index);
        }
    }

    turns
        .values()
        .filter(|indices| indices.len() > 2)
        .map(|indices| {
            let gaps: Vec<f64> = indices
                .windows(2)
                .map(|pair| (pair[1] - pair[0]) as f64)
                .collect();
            let mean = gaps.iter().sum::<f64>() / gaps.len() as f64;
            gaps.iter().map(|gap| (gap - mean).powi(2)).sum::<f64>() / gaps.len() as f64
        })
        .sum()
}

/// Run the builder once per starting pointer offset and keep the successful
/// run with the steadiest spacing. The earliest offset wins ties. When every
/// run fails the offset-zero outcome is returned.
pub fn generate_smoothed<S: AsRef<str>>(names: &[S], start: NaiveDate, weeks: i64) -> RotaOutcome {
    let baseline = generate_with_offset(names, start, weeks, 0);
    if matches!(
        baseline.error,
        Some(RotaError::InsufficientParticipants { .. } | RotaError::InvalidWeekCount(_))
    ) {
        return baseline;
    }

    let attempts = clean_participants(names).len();
    let mut best: Option<(f64, usize, RotaOutcome)> = baseline
        .is_success()
        .then(|| (gap_variance(&baseline.rows), 0, baseline.clone()));

    for offset in 1..attempts {
        let outcome = generate_with_offset(names, start, weeks, offset);
        if !outcome.is_success() {
            continue;
        }
        let variance = gap_variance(&outcome.rows);
        if best
            .as_ref()
            .map_or(true, |(best_variance, _, _)| variance < *best_variance)
        {
            best = Some((variance, offset, outcome));
        }
    }

    match best {
        Some((variance, offset, outcome)) => {
            debug!(offset, variance, attempts, "smoothest rota selected");
            outcome
        }
        None => baseline,
    }
}
