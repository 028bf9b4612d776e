//! Manual overrides applied to an existing rota.
//!
//! None of these consult the generation rules: a swap or cover can put the
//! same person in both duties of a week or in back-to-back weeks. That is
//! deliberate for hand edits and must be surfaced to users as such.

use serde::{Deserialize, Serialize};

use super::domain::{SlotRef, WeekRecord};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("week {week} is outside the rota ({len} weeks)")]
    SlotOutOfRange { week: usize, len: usize },
}

fn check_slot(rows: &[WeekRecord], slot: SlotRef) -> Result<(), EditError> {
    if slot.week < rows.len() {
        Ok(())
    } else {
        Err(EditError::SlotOutOfRange {
            week: slot.week,
            len: rows.len(),
        })
    }
}

/// Exchange the occupants of two cells.
pub fn swap_cells(rows: &mut [WeekRecord], a: SlotRef, b: SlotRef) -> Result<(), EditError> {
    check_slot(rows, a)?;
    check_slot(rows, b)?;
    if a == b {
        return Ok(());
    }

    let first = rows[a.week].assignee_mut(a.duty).take();
    let second = std::mem::replace(rows[b.week].assignee_mut(b.duty), first);
    *rows[a.week].assignee_mut(a.duty) = second;
    Ok(())
}

/// Exchange every occurrence of `first` and `second` across the whole rota.
/// Returns the number of cells changed.
pub fn swap_people(rows: &mut [WeekRecord], first: &str, second: &str) -> usize {
    if first == second {
        return 0;
    }

    let mut changed = 0;
    for cell in rows.iter_mut().flat_map(cells_mut) {
        let replacement = match cell.as_deref() {
            Some(name) if name == first => second,
            Some(name) if name == second => first,
            _ => continue,
        };
        *cell = Some(replacement.to_string());
        changed += 1;
    }
    changed
}

/// Put `covering` into a single cell, returning whoever held it before.
pub fn cover_shift(
    rows: &mut [WeekRecord],
    slot: SlotRef,
    covering: &str,
) -> Result<Option<String>, EditError> {
    check_slot(rows, slot)?;
    let cell = rows[slot.week].assignee_mut(slot.duty);
    Ok(cell.replace(covering.to_string()))
}

/// Replace every occurrence of `covered` with `covering`.
/// Returns the number of cells changed.
pub fn cover_all(rows: &mut [WeekRecord], covering: &str, covered: &str) -> usize {
    if covering == covered {
        return 0;
    }

    let mut changed = 0;
    for cell in rows.iter_mut().flat_map(cells_mut) {
        if cell.as_deref() == Some(covered) {
            *cell = Some(covering.to_string());
            changed += 1;
        }
    }
    changed
}

fn cells_mut(row: &mut WeekRecord) -> [&mut Option<String>; 2] {
    [&mut row.weekend, &mut row.week]
}

/// A manual edit as submitted by the CLI or HTTP callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ManualEdit {
    SwapCells { first: SlotRef, second: SlotRef },
    SwapPeople { first: String, second: String },
    CoverShift { slot: SlotRef, covering: String },
    CoverAll { covering: String, covered: String },
}

impl ManualEdit {
    /// Apply the edit in place, returning the number of cells touched.
    pub fn apply(&self, rows: &mut [WeekRecord]) -> Result<usize, EditError> {
        match self {
            ManualEdit::SwapCells { first, second } => {
                swap_cells(rows, *first, *second)?;
                Ok(if first == second { 0 } else { 2 })
            }
            ManualEdit::SwapPeople { first, second } => Ok(swap_people(rows, first, second)),
            ManualEdit::CoverShift { slot, covering } => {
                cover_shift(rows, *slot, covering)?;
                Ok(1)
            }
            ManualEdit::CoverAll { covering, covered } => Ok(cover_all(rows, covering, covered)),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            ManualEdit::SwapCells { first, second } => format!(
                "swapped week {} {} with week {} {}",
                first.week + 1,
                first.duty.label(),
                second.week + 1,
                second.duty.label()
            ),
            ManualEdit::SwapPeople { first, second } => {
                format!("swapped all shifts of {first} and {second}")
            }
            ManualEdit::CoverShift { slot, covering } => format!(
                "{covering} covers week {} {}",
                slot.week + 1,
                slot.duty.label()
            ),
            ManualEdit::CoverAll { covering, covered } => {
                format!("{covering} covers all shifts of {covered}")
            }
        }
    }
}
