//! SQLite schema definition.

/// Complete database schema for the coverage tracker.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Visits
-- ============================================================================

CREATE TABLE IF NOT EXISTS visits (
    id TEXT PRIMARY KEY,
    mrn TEXT NOT NULL,
    clinic TEXT NOT NULL,
    date TEXT NOT NULL,                          -- MM/DD/YYYY, derived from time_in
    time_in TEXT NOT NULL DEFAULT '',            -- MM/DD/YYYY HH:MM
    time_out TEXT NOT NULL DEFAULT '',           -- MM/DD/YYYY HH:MM
    time_spent INTEGER NOT NULL,                 -- minutes, authoritative
    duration REAL NOT NULL,                      -- hours, always time_spent / 60
    created_at TEXT                              -- RFC 3339, NULL on imported rows
);

CREATE INDEX IF NOT EXISTS idx_visits_mrn ON visits(mrn);
CREATE INDEX IF NOT EXISTS idx_visits_clinic ON visits(clinic);
CREATE INDEX IF NOT EXISTS idx_visits_date ON visits(date);
CREATE INDEX IF NOT EXISTS idx_visits_created_at ON visits(created_at);

-- ============================================================================
-- Clinics
-- ============================================================================

CREATE TABLE IF NOT EXISTS clinics (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_clinics_name ON clinics(name);
"#;
