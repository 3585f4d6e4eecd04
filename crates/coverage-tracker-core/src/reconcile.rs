//! Visit edit reconciliation.
//!
//! A visit edit may touch any subset of time-in, time-out, and duration.
//! Reconciliation turns that partial input into a consistent
//! (time-in, time-out, minutes) triple or rejects the edit outright, leaving
//! the stored record untouched.

use chrono::{Duration, NaiveDateTime};
use thiserror::Error;

use crate::timefmt;

/// Rejection reasons for a visit edit. Surfaced as values, never panics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a Medical Record Number (MRN).")]
    EmptyMrn,

    #[error("Please select a Clinic.")]
    EmptyClinic,

    #[error("Please enter a valid duration in minutes.")]
    InvalidDuration,

    #[error("Time Out must be after Time In.")]
    TimeOutNotAfterTimeIn,

    #[error("Please provide enough information (Time In/Out or Duration) to calculate times.")]
    InsufficientTimeInfo,
}

/// User-edited visit fields, pre-reconciliation.
///
/// `time_in`/`time_out` are `HH:MM` strings and may be empty (unset); `date`
/// is the `YYYY-MM-DD` calendar date the clock times are anchored to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitEdit {
    pub mrn: String,
    pub clinic: String,
    pub date: String,
    pub time_in: String,
    pub time_out: String,
    pub duration_minutes: Option<i64>,
}

impl VisitEdit {
    /// Build the add-entry edit: time-in is "now", time-out derives from the
    /// caller-given duration.
    pub fn from_now(mrn: String, clinic: String, duration_minutes: i64, now: NaiveDateTime) -> Self {
        Self {
            mrn,
            clinic,
            date: timefmt::to_calendar_date(now),
            time_in: timefmt::to_clock_time(now),
            time_out: String::new(),
            duration_minutes: Some(duration_minutes),
        }
    }
}

/// A consistent reconciled visit: both endpoints resolved, minutes and hours
/// in agreement, date recomputed from the final time-in.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconciledVisit {
    pub time_in: NaiveDateTime,
    pub time_out: NaiveDateTime,
    /// Integer minutes; the authoritative duration.
    pub time_spent: i64,
    /// Float hours, always `time_spent / 60`. Kept for display compatibility.
    pub duration: f64,
    /// `MM/DD/YYYY` display date derived from `time_in`.
    pub date: String,
}

impl ReconciledVisit {
    /// Stored `MM/DD/YYYY HH:MM` form of the time-in endpoint.
    pub fn time_in_str(&self) -> String {
        timefmt::to_display_date_time(Some(self.time_in))
    }

    /// Stored `MM/DD/YYYY HH:MM` form of the time-out endpoint.
    pub fn time_out_str(&self) -> String {
        timefmt::to_display_date_time(Some(self.time_out))
    }
}

/// Reconcile an edited visit into a consistent triple, or reject it.
///
/// Field validation runs first: trimmed MRN and clinic must be non-empty and
/// a supplied duration must be strictly positive. Then the first matching
/// case wins:
///
/// 1. both clock times resolve: require `time_out > time_in` strictly and
///    recompute the minutes from the interval;
/// 2. only time-in resolves and a duration was supplied: derive time-out;
/// 3. only time-out resolves and a duration was supplied: derive time-in;
/// 4. otherwise the edit carries too little information and is rejected.
pub fn reconcile(edit: &VisitEdit) -> Result<ReconciledVisit, ValidationError> {
    if edit.mrn.trim().is_empty() {
        return Err(ValidationError::EmptyMrn);
    }
    if edit.clinic.trim().is_empty() {
        return Err(ValidationError::EmptyClinic);
    }
    if let Some(d) = edit.duration_minutes {
        if d <= 0 {
            return Err(ValidationError::InvalidDuration);
        }
    }

    let time_in = timefmt::combine(&edit.date, &edit.time_in);
    let time_out = timefmt::combine(&edit.date, &edit.time_out);

    let (time_in, time_out, time_spent) = match (time_in, time_out) {
        (Some(ti), Some(to)) => {
            if to <= ti {
                return Err(ValidationError::TimeOutNotAfterTimeIn);
            }
            let minutes = interval_minutes(ti, to);
            (ti, to, minutes)
        }
        (Some(ti), None) => {
            let d = edit
                .duration_minutes
                .ok_or(ValidationError::InsufficientTimeInfo)?;
            // checked arithmetic: an absurdly large duration is rejected,
            // not a panic across the FFI boundary
            let to = Duration::try_minutes(d)
                .and_then(|delta| ti.checked_add_signed(delta))
                .ok_or(ValidationError::InvalidDuration)?;
            (ti, to, d)
        }
        (None, Some(to)) => {
            let d = edit
                .duration_minutes
                .ok_or(ValidationError::InsufficientTimeInfo)?;
            let ti = Duration::try_minutes(d)
                .and_then(|delta| to.checked_sub_signed(delta))
                .ok_or(ValidationError::InvalidDuration)?;
            (ti, to, d)
        }
        (None, None) => return Err(ValidationError::InsufficientTimeInfo),
    };

    Ok(ReconciledVisit {
        time_in,
        time_out,
        time_spent,
        duration: time_spent as f64 / 60.0,
        date: timefmt::to_display_date(time_in),
    })
}

/// Rounded whole minutes between two instants.
fn interval_minutes(from: NaiveDateTime, to: NaiveDateTime) -> i64 {
    ((to - from).num_seconds() as f64 / 60.0).round() as i64
}
