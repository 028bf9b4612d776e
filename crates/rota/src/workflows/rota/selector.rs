use std::collections::{HashMap, HashSet};

use super::domain::DutyType;

/// Last-assigned marker for people who have not had a duty yet in this run.
pub(crate) const NEVER_ASSIGNED: i64 = -1_000_000;

/// Per-person bookkeeping kept for the length of one generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DutyCounters {
    pub weekend: u32,
    pub week: u32,
    pub last_assigned: i64,
}

impl Default for DutyCounters {
    fn default() -> Self {
        Self {
            weekend: 0,
            week: 0,
            last_assigned: NEVER_ASSIGNED,
        }
    }
}

impl DutyCounters {
    pub fn count(&self, duty: DutyType) -> u32 {
        match duty {
            DutyType::Weekend => self.weekend,
            DutyType::Week => self.week,
        }
    }

    pub fn total(&self) -> u32 {
        self.weekend + self.week
    }

    pub fn balance(&self) -> u32 {
        self.weekend.abs_diff(self.week)
    }
}

/// Comparison key for one candidate; lower wins at every position.
type CandidateScore = (u32, u32, u32, i64, usize);

/// Working state for a single run: counters per name plus one rotation
/// pointer per duty type. Built fresh for every run and dropped afterwards.
#[derive(Debug, Clone)]
pub struct DutyLedger {
    participants: Vec<String>,
    counters: HashMap<String, DutyCounters>,
    weekend_pointer: usize,
    week_pointer: usize,
}

impl DutyLedger {
    pub fn new(participants: Vec<String>) -> Self {
        Self::with_offset(participants, 0)
    }

    /// Start both rotation pointers at `offset` (wrapped to the roster size).
    pub fn with_offset(participants: Vec<String>, offset: usize) -> Self {
        let counters = participants
            .iter()
            .map(|name| (name.clone(), DutyCounters::default()))
            .collect();
        let start = if participants.is_empty() {
            0
        } else {
            offset % participants.len()
        };

        Self {
            participants,
            counters,
            weekend_pointer: start,
            week_pointer: start,
        }
    }

    pub fn participants(&self) -> &[String] {
        &self.participants
    }

    pub fn counters(&self, name: &str) -> Option<&DutyCounters> {
        self.counters.get(name)
    }

    pub fn pointer(&self, duty: DutyType) -> usize {
        match duty {
            DutyType::Weekend => self.weekend_pointer,
            DutyType::Week => self.week_pointer,
        }
    }

    fn pointer_mut(&mut self, duty: DutyType) -> &mut usize {
        match duty {
            DutyType::Weekend => &mut self.weekend_pointer,
            DutyType::Week => &mut self.week_pointer,
        }
    }

    /// Pick the best eligible person for `duty` in week `week`.
    ///
    /// Participants are scanned from the duty's rotation pointer, wrapping
    /// around. Each candidate outside `excluded` is scored by its count of
    /// this duty, its total count, its weekend/week imbalance, the negated
    /// gap since its last assignment and finally its offset from the pointer.
    /// The first lowest score wins and the pointer moves just past it.
    /// Counters are left untouched; see [`DutyLedger::commit`].
    pub fn select(
        &mut self,
        duty: DutyType,
        excluded: &HashSet<String>,
        week: usize,
    ) -> Option<String> {
        let total = self.participants.len();
        if total == 0 {
            return None;
        }

        let start = self.pointer(duty);
        let week = week as i64;
        let mut best: Option<(CandidateScore, usize)> = None;

        for k in 0..total {
            let index = (start + k) % total;
            let name = &self.participants[index];
            if excluded.contains(name) {
                continue;
            }

            let counters = self.counters.get(name).copied().unwrap_or_default();
            let gap = week - counters.last_assigned;
            let score = (
                counters.count(duty),
                counters.total(),
                counters.balance(),
                -gap,
                k,
            );

            match best {
                Some((best_score, _)) if best_score <= score => {}
                _ => best = Some((score, index)),
            }
        }

        let (_, index) = best?;
        *self.pointer_mut(duty) = (index + 1) % total;
        Some(self.participants[index].clone())
    }

    /// Record that `name` holds `duty` in week `week`.
    pub fn commit(&mut self, name: &str, duty: DutyType, week: usize) {
        let counters = self.counters.entry(name.to_string()).or_default();
        match duty {
            DutyType::Weekend => counters.weekend += 1,
            DutyType::Week => counters.week += 1,
        }
        counters.last_assigned = week as i64;
    }
}
