//! Weekend/week duty rota: generation, manual overrides, and the documents
//! and exports built from a finished rota.

pub mod builder;
pub mod domain;
pub mod edits;
pub mod export;
pub mod planner;
pub mod revision;
mod selector;
pub mod smoothing;
pub mod stats;

pub use builder::{clean_participants, generate, generate_with_offset, RotaOutcome};
pub use domain::{
    normalize_start, DutyType, RotaError, SlotRef, WeekRecord, MIN_PARTICIPANTS,
    REFERENCE_WEEKDAY,
};
pub use edits::{cover_all, cover_shift, swap_cells, swap_people, EditError, ManualEdit};
pub use planner::{RotaPlan, RotaPlanner, RotaRequest};
pub use revision::{
    rota_key, RevisionError, RevisionRepository, RevisionService, RevisionSettings,
    RotaRevision, StoredRevision,
};
pub use selector::{DutyCounters, DutyLedger};
pub use smoothing::{gap_variance, generate_smoothed};
pub use stats::{shift_counts, ShiftCount};
