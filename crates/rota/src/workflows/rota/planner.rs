use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::builder::generate;
use super::domain::{normalize_start, RotaError, WeekRecord};
use super::smoothing::generate_smoothed;
use super::stats::{shift_counts, ShiftCount};
use crate::config::RotaSettings;

/// Caller input for one generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotaRequest {
    pub names: Vec<String>,
    pub start_date: NaiveDate,
    pub weeks: i64,
    /// Overrides the configured spacing optimisation for this request.
    #[serde(default)]
    pub smooth: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RotaPlan {
    pub week_commencing: NaiveDate,
    pub rows: Vec<WeekRecord>,
    pub shift_counts: Vec<ShiftCount>,
}

/// Applies service-level limits around the engine and picks the generator.
#[derive(Debug, Clone)]
pub struct RotaPlanner {
    settings: RotaSettings,
}

impl RotaPlanner {
    pub fn new(settings: RotaSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &RotaSettings {
        &self.settings
    }

    pub fn plan(&self, request: &RotaRequest) -> Result<RotaPlan, RotaError> {
        if request.weeks > i64::from(self.settings.max_weeks) {
            return Err(RotaError::WeekCountTooLarge {
                requested: request.weeks,
                max: self.settings.max_weeks,
            });
        }

        let smooth = request.smooth.unwrap_or(self.settings.smooth_spacing);
        let outcome = if smooth {
            generate_smoothed(&request.names, request.start_date, request.weeks)
        } else {
            generate(&request.names, request.start_date, request.weeks)
        };

        let rows = outcome.into_result().map_err(|err| {
            warn!(error = %err, weeks = request.weeks, "rota generation failed");
            err
        })?;

        let week_commencing = normalize_start(request.start_date);
        info!(%week_commencing, weeks = rows.len(), smooth, "rota generated");

        Ok(RotaPlan {
            week_commencing,
            shift_counts: shift_counts(&rows),
            rows,
        })
    }
}
