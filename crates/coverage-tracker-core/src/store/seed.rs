//! One-shot clinic seeding.

use super::{Database, DbResult};
use crate::models::Clinic;

/// Default clinic list inserted into an empty store on first open.
pub const DEFAULT_CLINICS: &[&str] = &[
    "1A Oncology",
    "1B Interv Cath",
    "1B Peds Endo",
    "3D BC 2",
    "6C Postpartum",
    "6D Postpartum",
    "6E Sleep Lap",
    "7A Ped NDT",
    "Adolescent Medicine",
    "Adult Services",
    "AH Ostetrics",
    "AH Orthotics",
    "Allied Health",
    "Audiology",
    "C-Section Suite",
    "Cardiology",
    "Cardic Preadmission Testing",
    "Case Management",
    "Child & Adolescent Mental Health",
    "Complex care",
    "Clinic Radiology",
    "Dermatology",
    "Developmental Ped",
    "Dietician",
    "Endocrinology and Diabetes Clinic",
    "Diabetes (Educator)",
    "ENT",
    "General Ped",
    "Genetics",
    "GI",
    "HRIF",
    "Immunology Allergy",
    "Infectious Disease",
    "Interventional Labs",
    "IVF clinic",
    "Main OR (DSU)",
    "MRI OPC",
    "Nephrology",
    "Neonatology",
    "Walk-ln",
    "Neonatology Prenatal",
    "Neurodiagnostic Lab",
    "Nuclear Medicine",
    "Neurology",
    "Neurosurgery",
    "NST clinic",
    "OB",
    "OBGYN",
    "OB Diagnostic Lab",
    "Ophthalmology",
    "Orthopedics",
    "OT",
    "OPCPL Clinic Laboratory",
    "PAT",
    "Pediatric Endoscopy Department",
    "General Peds Surgery",
    "Physiotherapy",
    "Procedure out of OR",
    "Plastic & Craniofacial Surgery",
    "Plastics Adults",
    "Psychiatry",
    "Pulmonology",
    "Radiology OBDIAG",
    "Rehab Medicine",
    "Rheumatology",
    "Patient'",
    "Reproductive Medicine",
    "RM Procedure Room",
    "SCAP",
    "Social Workers",
    "Speech Therapy",
    "Spina Befida clinic",
    "Ultrasound OPC",
    "Urology",
    "Urodynamics",
    "WH Preadmission Testing",
    "Women Mental health",
    "Plaza-Radiology",
    "ED",
    "OB Triage",
    "1A- Hooc",
    "1B-DSU",
    "1B-PACU",
    "1B -OPIC",
    "1B - Endoscopy",
    "1C -WDSU",
    "1C -WPACU",
    "1D- PAT",
];

/// Insert the default clinic list if the clinic collection is empty.
///
/// Idempotent bootstrap policy: guarded by an existence check and applied in
/// one transaction, so a re-run (or a racing second open) either sees a
/// populated store and does nothing, or seeds the full list. Returns the
/// number of clinics inserted.
pub fn seed_default_clinics(db: &mut Database) -> DbResult<usize> {
    let tx = db.transaction()?;

    let count: i64 = tx.query_row("SELECT COUNT(*) FROM clinics", [], |row| row.get(0))?;
    if count > 0 {
        return Ok(0);
    }

    for name in DEFAULT_CLINICS {
        let clinic = Clinic::new((*name).to_string());
        tx.execute(
            "INSERT INTO clinics (id, name) VALUES (?1, ?2)",
            rusqlite::params![clinic.id, clinic.name],
        )?;
    }
    tx.commit()?;

    log::info!("seeded {} default clinics", DEFAULT_CLINICS.len());
    Ok(DEFAULT_CLINICS.len())
}
