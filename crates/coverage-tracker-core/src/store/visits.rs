//! Visit record operations.

use rusqlite::{params, params_from_iter, OptionalExtension, Row};

use super::{Database, DbResult};
use crate::models::Visit;

const VISIT_COLUMNS: &str =
    "id, mrn, clinic, date, time_in, time_out, time_spent, duration, created_at";

/// Equality predicates for visit lookup. Each field filters independently;
/// any combination of the three is supported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisitFilter {
    pub mrn: Option<String>,
    /// Clinic name.
    pub clinic: Option<String>,
    /// `MM/DD/YYYY` display date.
    pub date: Option<String>,
}

impl VisitFilter {
    pub fn is_empty(&self) -> bool {
        self.mrn.is_none() && self.clinic.is_none() && self.date.is_none()
    }
}

fn visit_from_row(row: &Row<'_>) -> rusqlite::Result<Visit> {
    let time_spent: i64 = row.get(6)?;
    Ok(Visit {
        id: row.get(0)?,
        mrn: row.get(1)?,
        clinic: row.get(2)?,
        date: row.get(3)?,
        time_in: row.get(4)?,
        time_out: row.get(5)?,
        time_spent,
        // time_spent is the source of truth; the stored hours column is
        // ignored on read so the two can never disagree.
        duration: time_spent as f64 / 60.0,
        created_at: row.get(8)?,
    })
}

impl Database {
    /// Insert a new visit.
    pub fn insert_visit(&self, visit: &Visit) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO visits (
                id, mrn, clinic, date, time_in, time_out,
                time_spent, duration, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                visit.id,
                visit.mrn,
                visit.clinic,
                visit.date,
                visit.time_in,
                visit.time_out,
                visit.time_spent,
                visit.duration,
                visit.created_at,
            ],
        )?;
        Ok(())
    }

    /// Get a visit by id.
    pub fn get_visit(&self, id: &str) -> DbResult<Option<Visit>> {
        self.conn
            .query_row(
                &format!("SELECT {VISIT_COLUMNS} FROM visits WHERE id = ?"),
                [id],
                visit_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Update an existing visit. Returns false when the id is unknown.
    pub fn update_visit(&self, visit: &Visit) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE visits SET
                mrn = ?2,
                clinic = ?3,
                date = ?4,
                time_in = ?5,
                time_out = ?6,
                time_spent = ?7,
                duration = ?8
            WHERE id = ?1
            "#,
            params![
                visit.id,
                visit.mrn,
                visit.clinic,
                visit.date,
                visit.time_in,
                visit.time_out,
                visit.time_spent,
                visit.duration,
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Delete a visit.
    pub fn delete_visit(&self, id: &str) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM visits WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }

    /// Delete every visit, atomically. Returns the number removed.
    pub fn delete_all_visits(&mut self) -> DbResult<usize> {
        let tx = self.conn.transaction()?;
        let removed = tx.execute("DELETE FROM visits", [])?;
        tx.commit()?;
        log::info!("deleted all {} visit records", removed);
        Ok(removed)
    }

    /// List all visits, newest first.
    pub fn list_visits(&self) -> DbResult<Vec<Visit>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {VISIT_COLUMNS} FROM visits ORDER BY created_at DESC"
        ))?;
        let rows = stmt.query_map([], visit_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// List the visits whose display date matches, unordered beyond the
    /// default; daily aggregation re-sorts by `created_at` itself.
    pub fn list_visits_for_date(&self, date: &str) -> DbResult<Vec<Visit>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {VISIT_COLUMNS} FROM visits WHERE date = ?"))?;
        let rows = stmt.query_map([date], visit_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Search visits by any combination of equality predicates, newest first.
    /// An empty filter returns everything.
    pub fn search_visits(&self, filter: &VisitFilter) -> DbResult<Vec<Visit>> {
        let mut clauses: Vec<&str> = Vec::new();
        let mut values: Vec<String> = Vec::new();

        if let Some(mrn) = &filter.mrn {
            clauses.push("mrn = ?");
            values.push(mrn.clone());
        }
        if let Some(clinic) = &filter.clinic {
            clauses.push("clinic = ?");
            values.push(clinic.clone());
        }
        if let Some(date) = &filter.date {
            clauses.push("date = ?");
            values.push(date.clone());
        }

        let mut sql = format!("SELECT {VISIT_COLUMNS} FROM visits");
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY created_at DESC");

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(values.iter()), visit_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
