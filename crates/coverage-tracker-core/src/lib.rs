//! Coverage Tracker Core Library
//!
//! Clinic patient-visit logging with daily per-clinic coverage summaries.
//!
//! # Architecture
//!
//! ```text
//! MRN input (typed or scanned) ──┐
//!                                ▼
//!                      ┌──────────────────┐
//!                      │  Reconciliation  │  time-in / time-out / duration
//!                      │  (validate+fix)  │  resolved into one consistent triple
//!                      └────────┬─────────┘
//!                               │
//!                      ┌────────▼─────────┐      ┌──────────────────┐
//!                      │   Record Store   │─────▶│    ChangeHub     │
//!                      │ (visits/clinics) │      │  (mpsc events)   │
//!                      └────────┬─────────┘      └────────┬─────────┘
//!                               │                         │ re-read snapshot
//!                               ▼                         ▼
//!                        Search / Listing         Daily Aggregation
//!                                                 (pure recompute)
//! ```
//!
//! # Core Principle
//!
//! **`time_spent` (minutes) is the source of truth.** The float `duration`
//! hours field is derived display data and is never trusted independently.
//!
//! # Modules
//!
//! - [`timefmt`]: date/time string formats and the combine helper
//! - [`reconcile`]: visit edit reconciliation and validation
//! - [`summary`]: pure daily aggregation by clinic
//! - [`models`]: domain types (Visit, Clinic)
//! - [`store`]: SQLite record store with atomic batch writes
//! - [`watch`]: change-event channel feeding summary recomputation
//! - [`export`]: daily report rendering (JSON/CSV)

pub mod export;
pub mod models;
pub mod reconcile;
pub mod store;
pub mod summary;
pub mod timefmt;
pub mod watch;

// Re-export commonly used types
pub use export::DailyReport;
pub use models::{Clinic, Visit, FALLBACK_CLINIC};
pub use reconcile::{reconcile, ReconciledVisit, ValidationError, VisitEdit};
pub use store::{scoped_db_path, Database, DbError, VisitFilter};
pub use summary::{summarize_day, ClinicDaySummary, DailySummary};
pub use watch::{ChangeEvent, ChangeHub};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::path::Path;
use std::sync::mpsc::Receiver;
use std::sync::{Arc, Mutex};

use chrono::Local;

// =========================================================================
// FFI Error Type
// =========================================================================

/// Error taxonomy at the API boundary.
///
/// `Validation` is local and recoverable (nothing was written);
/// `StoreUnavailable` means the store is not initialized yet and the caller
/// should retry after setup; `Collaborator` is an opaque store failure with
/// prior state unchanged (batches are atomic, so no partial writes).
#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum TrackerError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Store operation failed: {0}")]
    Collaborator(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<ValidationError> for TrackerError {
    fn from(e: ValidationError) -> Self {
        TrackerError::Validation(e.to_string())
    }
}

impl From<DbError> for TrackerError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound(what) => TrackerError::NotFound(what),
            other => TrackerError::Collaborator(other.to_string()),
        }
    }
}

impl<T> From<std::sync::PoisonError<T>> for TrackerError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        TrackerError::StoreUnavailable(format!("Store lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open (or create) the tracker for one user scope under the given data
/// directory. The scope string is the identity collaborator's opaque
/// partition key; it selects the per-user store and is never inspected.
/// Seeds the default clinic list when the clinic collection is empty.
#[uniffi::export]
pub fn open_tracker(data_dir: String, user_scope: String) -> Result<Arc<CoverageTracker>, TrackerError> {
    let path = scoped_db_path(Path::new(&data_dir), &user_scope);
    let db = Database::open(&path).map_err(|e| TrackerError::StoreUnavailable(e.to_string()))?;
    CoverageTracker::from_db(db)
}

/// Create an in-memory tracker (for testing).
#[uniffi::export]
pub fn open_tracker_in_memory() -> Result<Arc<CoverageTracker>, TrackerError> {
    let db = Database::open_in_memory().map_err(|e| TrackerError::StoreUnavailable(e.to_string()))?;
    CoverageTracker::from_db(db)
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe tracker handle for FFI.
#[derive(uniffi::Object)]
pub struct CoverageTracker {
    db: Arc<Mutex<Database>>,
    hub: ChangeHub,
}

impl CoverageTracker {
    fn from_db(mut db: Database) -> Result<Arc<Self>, TrackerError> {
        store::seed_default_clinics(&mut db)
            .map_err(|e| TrackerError::StoreUnavailable(e.to_string()))?;
        Ok(Arc::new(Self {
            db: Arc::new(Mutex::new(db)),
            hub: ChangeHub::new(),
        }))
    }

    /// Subscribe to change events (Rust-side consumers only). On each event,
    /// re-read the snapshot and re-run [`summarize_day`].
    pub fn subscribe(&self) -> Receiver<ChangeEvent> {
        self.hub.subscribe()
    }

    fn day_summary(&self, calendar_date: &str) -> Result<DailySummary, TrackerError> {
        let display_date = timefmt::calendar_to_display_date(calendar_date).ok_or_else(|| {
            TrackerError::Validation(format!("Unrecognized date: {calendar_date}"))
        })?;

        let db = self.db.lock()?;
        let visits = db.list_visits_for_date(&display_date)?;
        drop(db);

        Ok(summarize_day(&display_date, &visits))
    }
}

#[uniffi::export]
impl CoverageTracker {
    // =========================================================================
    // Visit Operations
    // =========================================================================

    /// Record a visit starting now; time-out derives from the duration.
    ///
    /// A scanned MRN feeds the same `mrn` parameter as manual entry.
    pub fn add_entry(
        &self,
        mrn: String,
        clinic: String,
        duration_minutes: i64,
    ) -> Result<FfiVisit, TrackerError> {
        let now = Local::now().naive_local();
        let edit = VisitEdit::from_now(mrn, clinic, duration_minutes, now);
        let times = reconcile(&edit)?;
        let visit = Visit::new(
            edit.mrn.trim().to_string(),
            edit.clinic.trim().to_string(),
            &times,
        );

        let db = self.db.lock()?;
        db.insert_visit(&visit)?;
        drop(db);

        self.hub.publish(ChangeEvent::VisitsChanged);
        Ok(visit.into())
    }

    /// List all visits, newest first.
    pub fn recent_entries(&self) -> Result<Vec<FfiVisit>, TrackerError> {
        let db = self.db.lock()?;
        let visits = db.list_visits()?;
        Ok(visits.into_iter().map(Into::into).collect())
    }

    /// Apply an edit to an existing visit after reconciling its times.
    ///
    /// Rejected edits (validation failures) leave the record untouched.
    pub fn update_entry(&self, visit_id: String, edit: FfiVisitEdit) -> Result<FfiVisit, TrackerError> {
        let edit: VisitEdit = edit.into();
        let times = reconcile(&edit)?;

        let db = self.db.lock()?;
        let mut visit = db
            .get_visit(&visit_id)?
            .ok_or_else(|| TrackerError::NotFound(format!("visit {visit_id}")))?;
        visit.mrn = edit.mrn.trim().to_string();
        visit.clinic = edit.clinic.trim().to_string();
        visit.apply_times(&times);
        db.update_visit(&visit)?;
        drop(db);

        self.hub.publish(ChangeEvent::VisitsChanged);
        Ok(visit.into())
    }

    /// Delete a single visit.
    pub fn delete_entry(&self, visit_id: String) -> Result<(), TrackerError> {
        let db = self.db.lock()?;
        if !db.delete_visit(&visit_id)? {
            return Err(TrackerError::NotFound(format!("visit {visit_id}")));
        }
        drop(db);

        self.hub.publish(ChangeEvent::VisitsChanged);
        Ok(())
    }

    /// Unconditionally wipe every visit record. Atomic; returns the count.
    pub fn delete_all_entries(&self) -> Result<u32, TrackerError> {
        let mut db = self.db.lock()?;
        let removed = db.delete_all_visits()?;
        drop(db);

        self.hub.publish(ChangeEvent::VisitsChanged);
        Ok(removed as u32)
    }

    /// Search visits by any combination of MRN, clinic name, and
    /// `YYYY-MM-DD` date, newest first. Blank filters match everything.
    pub fn search(
        &self,
        mrn: Option<String>,
        clinic: Option<String>,
        date: Option<String>,
    ) -> Result<Vec<FfiVisit>, TrackerError> {
        let filter = VisitFilter {
            mrn: non_blank(mrn),
            clinic: non_blank(clinic),
            date: non_blank(date)
                .map(|d| {
                    timefmt::calendar_to_display_date(&d)
                        .ok_or_else(|| TrackerError::Validation(format!("Unrecognized date: {d}")))
                })
                .transpose()?,
        };

        let db = self.db.lock()?;
        let visits = db.search_visits(&filter)?;
        Ok(visits.into_iter().map(Into::into).collect())
    }

    // =========================================================================
    // Daily Summary
    // =========================================================================

    /// Recompute the coverage summary for a `YYYY-MM-DD` date from the full
    /// current snapshot of that day's visits.
    pub fn daily_summary(&self, calendar_date: String) -> Result<FfiDailySummary, TrackerError> {
        Ok(self.day_summary(&calendar_date)?.into())
    }

    /// Render one day's coverage report as pretty-printed JSON.
    pub fn export_day_json(&self, calendar_date: String) -> Result<String, TrackerError> {
        let report = DailyReport::new(self.day_summary(&calendar_date)?);
        report
            .to_json()
            .map_err(|e| TrackerError::Collaborator(e.to_string()))
    }

    /// Render one day's coverage report as CSV, one row per visit.
    pub fn export_day_csv(&self, calendar_date: String) -> Result<String, TrackerError> {
        let report = DailyReport::new(self.day_summary(&calendar_date)?);
        Ok(report.to_csv())
    }

    // =========================================================================
    // Clinic Operations
    // =========================================================================

    /// List clinics, name ascending.
    pub fn list_clinics(&self) -> Result<Vec<FfiClinic>, TrackerError> {
        let db = self.db.lock()?;
        let clinics = db.list_clinics()?;
        Ok(clinics.into_iter().map(Into::into).collect())
    }

    /// Add a clinic.
    pub fn add_clinic(&self, name: String) -> Result<FfiClinic, TrackerError> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(TrackerError::Validation(
                "Clinic name cannot be empty.".into(),
            ));
        }
        let clinic = Clinic::new(name);

        let db = self.db.lock()?;
        db.insert_clinic(&clinic)?;
        drop(db);

        self.hub.publish(ChangeEvent::ClinicsChanged);
        Ok(clinic.into())
    }

    /// Rename a clinic. Existing visits keep the old name (soft reference).
    pub fn rename_clinic(&self, clinic_id: String, name: String) -> Result<(), TrackerError> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(TrackerError::Validation(
                "Clinic name cannot be empty.".into(),
            ));
        }

        let db = self.db.lock()?;
        if !db.rename_clinic(&clinic_id, &name)? {
            return Err(TrackerError::NotFound(format!("clinic {clinic_id}")));
        }
        drop(db);

        self.hub.publish(ChangeEvent::ClinicsChanged);
        Ok(())
    }

    /// Delete a clinic; its visits are rewritten to the `"Other"` sentinel in
    /// the same atomic batch. Returns the number of visits rewritten.
    pub fn delete_clinic(&self, clinic_id: String) -> Result<u32, TrackerError> {
        let mut db = self.db.lock()?;
        let rewritten = db.delete_clinic_cascade(&clinic_id, FALLBACK_CLINIC)?;
        drop(db);

        self.hub.publish(ChangeEvent::ClinicsChanged);
        self.hub.publish(ChangeEvent::VisitsChanged);
        Ok(rewritten as u32)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe visit record.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiVisit {
    pub id: String,
    pub mrn: String,
    pub clinic: String,
    pub date: String,
    pub time_in: String,
    pub time_out: String,
    pub time_spent: i64,
    pub duration: f64,
    pub created_at: Option<String>,
}

impl From<Visit> for FfiVisit {
    fn from(visit: Visit) -> Self {
        Self {
            id: visit.id,
            mrn: visit.mrn,
            clinic: visit.clinic,
            date: visit.date,
            time_in: visit.time_in,
            time_out: visit.time_out,
            time_spent: visit.time_spent,
            duration: visit.duration,
            created_at: visit.created_at,
        }
    }
}

/// FFI-safe visit edit: `HH:MM` clock fields anchored to a `YYYY-MM-DD`
/// date, with empty strings meaning "unset".
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiVisitEdit {
    pub mrn: String,
    pub clinic: String,
    pub date: String,
    pub time_in: String,
    pub time_out: String,
    pub duration_minutes: Option<i64>,
}

impl From<FfiVisitEdit> for VisitEdit {
    fn from(edit: FfiVisitEdit) -> Self {
        VisitEdit {
            mrn: edit.mrn,
            clinic: edit.clinic,
            date: edit.date,
            time_in: edit.time_in,
            time_out: edit.time_out,
            duration_minutes: edit.duration_minutes,
        }
    }
}

/// FFI-safe clinic.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiClinic {
    pub id: String,
    pub name: String,
}

impl From<Clinic> for FfiClinic {
    fn from(clinic: Clinic) -> Self {
        Self {
            id: clinic.id,
            name: clinic.name,
        }
    }
}

/// FFI-safe per-clinic summary slice.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiClinicSummary {
    pub name: String,
    pub patient_count: u32,
    pub total_duration_minutes: i64,
    pub visits: Vec<FfiVisit>,
}

impl From<ClinicDaySummary> for FfiClinicSummary {
    fn from(summary: ClinicDaySummary) -> Self {
        Self {
            name: summary.name,
            patient_count: summary.patient_count,
            total_duration_minutes: summary.total_duration_minutes,
            visits: summary.visits.into_iter().map(Into::into).collect(),
        }
    }
}

/// FFI-safe daily summary.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDailySummary {
    pub date: String,
    pub total_patients: u32,
    pub total_duration_minutes: i64,
    pub clinics: Vec<FfiClinicSummary>,
    /// False for an empty day; callers render "no data" instead of zeros.
    pub has_data: bool,
}

impl From<DailySummary> for FfiDailySummary {
    fn from(summary: DailySummary) -> Self {
        let has_data = summary.has_data();
        Self {
            date: summary.date,
            total_patients: summary.total_patients,
            total_duration_minutes: summary.total_duration_minutes,
            clinics: summary.clinics.into_iter().map(Into::into).collect(),
            has_data,
        }
    }
}
