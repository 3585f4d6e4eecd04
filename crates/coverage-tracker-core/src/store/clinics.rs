//! Clinic record operations.

use rusqlite::{params, OptionalExtension};

use super::{Database, DbError, DbResult};
use crate::models::Clinic;

impl Database {
    /// Insert a new clinic.
    pub fn insert_clinic(&self, clinic: &Clinic) -> DbResult<()> {
        self.conn.execute(
            "INSERT INTO clinics (id, name) VALUES (?1, ?2)",
            params![clinic.id, clinic.name],
        )?;
        Ok(())
    }

    /// Get a clinic by id.
    pub fn get_clinic(&self, id: &str) -> DbResult<Option<Clinic>> {
        self.conn
            .query_row(
                "SELECT id, name FROM clinics WHERE id = ?",
                [id],
                |row| {
                    Ok(Clinic {
                        id: row.get(0)?,
                        name: row.get(1)?,
                    })
                },
            )
            .optional()
            .map_err(Into::into)
    }

    /// List all clinics, name ascending.
    pub fn list_clinics(&self) -> DbResult<Vec<Clinic>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM clinics ORDER BY name ASC")?;
        let rows = stmt.query_map([], |row| {
            Ok(Clinic {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Count clinics; the seed routine's emptiness check.
    pub fn clinic_count(&self) -> DbResult<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM clinics", [], |row| row.get(0))
            .map_err(Into::into)
    }

    /// Rename a clinic. Returns false when the id is unknown.
    ///
    /// Renaming does not touch existing visits; their `clinic` field is a
    /// soft reference and keeps the old name.
    pub fn rename_clinic(&self, id: &str, name: &str) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "UPDATE clinics SET name = ?2 WHERE id = ?1",
            params![id, name],
        )?;
        Ok(rows_affected > 0)
    }

    /// Delete a clinic and rewrite its visits to `fallback`, all-or-nothing.
    ///
    /// Returns the number of visits rewritten. After commit no visit
    /// references the deleted name; on any failure nothing changes.
    pub fn delete_clinic_cascade(&mut self, id: &str, fallback: &str) -> DbResult<usize> {
        let tx = self.conn.transaction()?;

        let name: Option<String> = tx
            .query_row("SELECT name FROM clinics WHERE id = ?", [id], |row| {
                row.get(0)
            })
            .optional()?;
        let name = name.ok_or_else(|| DbError::NotFound(format!("clinic {id}")))?;

        let rewritten = tx.execute(
            "UPDATE visits SET clinic = ?1 WHERE clinic = ?2",
            params![fallback, name],
        )?;
        tx.execute("DELETE FROM clinics WHERE id = ?", [id])?;
        tx.commit()?;

        log::info!(
            "deleted clinic {:?}; {} visit(s) rewritten to {:?}",
            name,
            rewritten,
            fallback
        );
        Ok(rewritten)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Visit, FALLBACK_CLINIC};
    use crate::reconcile::{reconcile, VisitEdit};

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn make_visit(mrn: &str, clinic: &str) -> Visit {
        let times = reconcile(&VisitEdit {
            mrn: mrn.into(),
            clinic: clinic.into(),
            date: "2025-07-19".into(),
            time_in: "09:00".into(),
            time_out: "10:00".into(),
            duration_minutes: None,
        })
        .unwrap();
        Visit::new(mrn.into(), clinic.into(), &times)
    }

    #[test]
    fn test_insert_list_sorted() {
        let db = setup_db();
        db.insert_clinic(&Clinic::new("ENT".into())).unwrap();
        db.insert_clinic(&Clinic::new("Audiology".into())).unwrap();
        db.insert_clinic(&Clinic::new("Cardiology".into())).unwrap();

        let names: Vec<String> = db.list_clinics().unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, ["Audiology", "Cardiology", "ENT"]);
        assert_eq!(db.clinic_count().unwrap(), 3);
    }

    #[test]
    fn test_rename_clinic() {
        let db = setup_db();
        let clinic = Clinic::new("Cardilogy".into());
        db.insert_clinic(&clinic).unwrap();

        assert!(db.rename_clinic(&clinic.id, "Cardiology").unwrap());
        assert_eq!(db.get_clinic(&clinic.id).unwrap().unwrap().name, "Cardiology");
        assert!(!db.rename_clinic("missing", "X").unwrap());
    }

    #[test]
    fn test_rename_leaves_visits_alone() {
        let db = setup_db();
        let clinic = Clinic::new("ENT".into());
        db.insert_clinic(&clinic).unwrap();
        db.insert_visit(&make_visit("A", "ENT")).unwrap();

        db.rename_clinic(&clinic.id, "Otolaryngology").unwrap();
        let visits = db.list_visits().unwrap();
        assert_eq!(visits[0].clinic, "ENT");
    }

    #[test]
    fn test_delete_cascade_rewrites_visits() {
        let mut db = setup_db();
        let ent = Clinic::new("ENT".into());
        let gi = Clinic::new("GI".into());
        db.insert_clinic(&ent).unwrap();
        db.insert_clinic(&gi).unwrap();

        for mrn in ["A", "B", "C"] {
            db.insert_visit(&make_visit(mrn, "ENT")).unwrap();
        }
        db.insert_visit(&make_visit("D", "GI")).unwrap();

        let rewritten = db.delete_clinic_cascade(&ent.id, FALLBACK_CLINIC).unwrap();
        assert_eq!(rewritten, 3);

        // clinic row is gone and no visit references the old name
        assert!(db.get_clinic(&ent.id).unwrap().is_none());
        let visits = db.list_visits().unwrap();
        assert!(visits.iter().all(|v| v.clinic != "ENT"));
        assert_eq!(visits.iter().filter(|v| v.clinic == FALLBACK_CLINIC).count(), 3);
        // other clinics untouched
        assert_eq!(visits.iter().filter(|v| v.clinic == "GI").count(), 1);
    }

    #[test]
    fn test_delete_cascade_unknown_clinic_changes_nothing() {
        let mut db = setup_db();
        let ent = Clinic::new("ENT".into());
        db.insert_clinic(&ent).unwrap();
        db.insert_visit(&make_visit("A", "ENT")).unwrap();

        let err = db.delete_clinic_cascade("missing", FALLBACK_CLINIC);
        assert!(matches!(err, Err(DbError::NotFound(_))));

        // all-or-nothing: the existing clinic and its visits are untouched
        assert_eq!(db.clinic_count().unwrap(), 1);
        assert_eq!(db.list_visits().unwrap()[0].clinic, "ENT");
    }
}
