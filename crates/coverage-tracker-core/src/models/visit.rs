//! Visit records.

use serde::{Deserialize, Serialize};

use crate::reconcile::ReconciledVisit;

/// One patient's single clinic visit.
///
/// Stored field names match the original document shape: `time_spent` holds
/// the authoritative integer minutes and `duration` the redundant float
/// hours (`time_spent / 60`), kept for backward-compatible display. `clinic`
/// is a soft reference to a [`Clinic`](super::Clinic) by name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Visit {
    /// Identifier assigned at creation.
    pub id: String,
    /// Patient identifier; caller-supplied, not format-validated.
    pub mrn: String,
    /// Clinic name.
    pub clinic: String,
    /// `MM/DD/YYYY` display date, derived from `time_in`.
    pub date: String,
    /// `MM/DD/YYYY HH:MM` time-in endpoint.
    pub time_in: String,
    /// `MM/DD/YYYY HH:MM` time-out endpoint; strictly after `time_in`.
    pub time_out: String,
    /// Visit length in whole minutes; the source of truth.
    pub time_spent: i64,
    /// Visit length in hours, always `time_spent / 60`.
    pub duration: f64,
    /// RFC 3339 creation timestamp; absent on imported rows. Default listing
    /// order is descending (newest first).
    pub created_at: Option<String>,
}

impl Visit {
    /// Create a new visit from reconciled times.
    pub fn new(mrn: String, clinic: String, times: &ReconciledVisit) -> Self {
        let mut visit = Self {
            id: uuid::Uuid::new_v4().to_string(),
            mrn,
            clinic,
            date: String::new(),
            time_in: String::new(),
            time_out: String::new(),
            time_spent: 0,
            duration: 0.0,
            created_at: Some(chrono::Utc::now().to_rfc3339()),
        };
        visit.apply_times(times);
        visit
    }

    /// Overwrite the derived time fields from a reconciliation result.
    ///
    /// `id` and `created_at` are preserved; an edit never changes them.
    pub fn apply_times(&mut self, times: &ReconciledVisit) {
        self.date = times.date.clone();
        self.time_in = times.time_in_str();
        self.time_out = times.time_out_str();
        self.time_spent = times.time_spent;
        self.duration = times.duration;
    }

    /// Duration in hours derived from the authoritative minutes.
    pub fn duration_hours(&self) -> f64 {
        self.time_spent as f64 / 60.0
    }
}
