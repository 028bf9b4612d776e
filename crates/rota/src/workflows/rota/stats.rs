use std::collections::HashMap;

use serde::Serialize;

use super::domain::{DutyType, WeekRecord};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShiftCount {
    pub name: String,
    pub weekend: usize,
    pub week: usize,
    pub total: usize,
}

/// Per-person duty tallies, busiest first and then by name.
pub fn shift_counts(rows: &[WeekRecord]) -> Vec<ShiftCount> {
    let mut counts: HashMap<&str, ShiftCount> = HashMap::new();

    for row in rows {
        for duty in DutyType::ordered() {
            let Some(name) = row.assignee(duty).map(str::trim) else {
                continue;
            };
            if name.is_empty() {
                continue;
            }

            let entry = counts.entry(name).or_insert_with(|| ShiftCount {
                name: name.to_string(),
                weekend: 0,
                week: 0,
                total: 0,
            });
            match duty {
                DutyType::Weekend => entry.weekend += 1,
                DutyType::Week => entry.week += 1,
            }
            entry.total += 1;
        }
    }

    let mut counts: Vec<ShiftCount> = counts.into_values().collect();
    counts.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.name.cmp(&b.name)));
    counts
}
