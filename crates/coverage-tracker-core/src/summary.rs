//! Daily coverage summaries.
//!
//! Aggregation is a pure function over a full snapshot of one day's visits.
//! It is recomputed on every read or change notification; results are never
//! stored or patched incrementally.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::models::Visit;

/// Per-clinic slice of a day's coverage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClinicDaySummary {
    pub name: String,
    /// Distinct MRNs seen at this clinic.
    pub patient_count: u32,
    /// Flat sum of visit minutes at this clinic.
    pub total_duration_minutes: i64,
    /// Member visits ordered by `created_at` ascending.
    pub visits: Vec<Visit>,
}

/// Derived view of one day's visits, grouped by clinic.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailySummary {
    /// `MM/DD/YYYY` display date the summary covers.
    pub date: String,
    /// Count of distinct MRNs across the day; a patient seen many times
    /// counts once.
    pub total_patients: u32,
    /// Flat sum of `time_spent` across all visits, not deduplicated per
    /// patient.
    pub total_duration_minutes: i64,
    /// Groups sorted by clinic name ascending (ordinal comparison).
    pub clinics: Vec<ClinicDaySummary>,
}

impl DailySummary {
    /// Whether the day has any visits. Callers render an empty day as
    /// "no data" rather than a zero-value summary.
    pub fn has_data(&self) -> bool {
        !self.clinics.is_empty()
    }
}

struct ClinicAcc {
    patients: HashSet<String>,
    minutes: i64,
    visits: Vec<Visit>,
}

/// Aggregate one day's visits into a [`DailySummary`].
///
/// Input order does not matter: records are sorted by `created_at` ascending
/// for deterministic member listing. Missing timestamps sort first (the
/// natural `Option` order, a total ordering); the stable sort keeps their
/// input order among themselves.
pub fn summarize_day(date: &str, visits: &[Visit]) -> DailySummary {
    let mut ordered: Vec<Visit> = visits.to_vec();
    ordered.sort_by(|a, b| a.created_at.cmp(&b.created_at));

    let mut all_patients: HashSet<String> = HashSet::new();
    let mut total_minutes = 0i64;
    let mut by_clinic: BTreeMap<String, ClinicAcc> = BTreeMap::new();

    for visit in ordered {
        all_patients.insert(visit.mrn.clone());
        total_minutes += visit.time_spent;

        let acc = by_clinic
            .entry(visit.clinic.clone())
            .or_insert_with(|| ClinicAcc {
                patients: HashSet::new(),
                minutes: 0,
                visits: Vec::new(),
            });
        acc.patients.insert(visit.mrn.clone());
        acc.minutes += visit.time_spent;
        acc.visits.push(visit);
    }

    DailySummary {
        date: date.to_string(),
        total_patients: all_patients.len() as u32,
        total_duration_minutes: total_minutes,
        // BTreeMap iteration yields clinic names in ascending ordinal order.
        clinics: by_clinic
            .into_iter()
            .map(|(name, acc)| ClinicDaySummary {
                name,
                patient_count: acc.patients.len() as u32,
                total_duration_minutes: acc.minutes,
                visits: acc.visits,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visit(mrn: &str, clinic: &str, minutes: i64, created_at: Option<&str>) -> Visit {
        Visit {
            id: uuid::Uuid::new_v4().to_string(),
            mrn: mrn.into(),
            clinic: clinic.into(),
            date: "07/19/2025".into(),
            time_in: "07/19/2025 09:00".into(),
            time_out: "07/19/2025 10:00".into(),
            time_spent: minutes,
            duration: minutes as f64 / 60.0,
            created_at: created_at.map(Into::into),
        }
    }

    #[test]
    fn test_distinct_patients_overall_and_per_clinic() {
        let visits = vec![
            visit("A", "Cardiology", 10, Some("2025-07-19T09:00:00+00:00")),
            visit("A", "Cardiology", 15, Some("2025-07-19T10:00:00+00:00")),
            visit("A", "Cardiology", 20, Some("2025-07-19T11:00:00+00:00")),
            visit("B", "ENT", 30, Some("2025-07-19T12:00:00+00:00")),
            visit("B", "ENT", 30, Some("2025-07-19T13:00:00+00:00")),
        ];
        let summary = summarize_day("07/19/2025", &visits);

        // five visits, two distinct patients
        assert_eq!(summary.total_patients, 2);
        assert_eq!(summary.clinics.len(), 2);
        assert_eq!(summary.clinics[0].name, "Cardiology");
        assert_eq!(summary.clinics[0].patient_count, 1);
        assert_eq!(summary.clinics[0].visits.len(), 3);
        assert_eq!(summary.clinics[1].name, "ENT");
        assert_eq!(summary.clinics[1].patient_count, 1);
    }

    #[test]
    fn test_duration_sum_is_flat() {
        let visits = vec![
            visit("A", "GI", 30, None),
            visit("A", "GI", 45, None),
            visit("B", "GI", 20, None),
        ];
        let summary = summarize_day("07/19/2025", &visits);

        // minutes are summed per visit even when the patient repeats
        assert_eq!(summary.total_duration_minutes, 95);
        assert_eq!(summary.total_patients, 2);
        assert_eq!(summary.clinics[0].total_duration_minutes, 95);
    }

    #[test]
    fn test_empty_day() {
        let summary = summarize_day("07/19/2025", &[]);
        assert_eq!(summary.total_patients, 0);
        assert_eq!(summary.total_duration_minutes, 0);
        assert!(summary.clinics.is_empty());
        assert!(!summary.has_data());
    }

    #[test]
    fn test_member_order_follows_created_at() {
        let visits = vec![
            visit("B", "ENT", 10, Some("2025-07-19T12:00:00+00:00")),
            visit("A", "ENT", 10, Some("2025-07-19T09:00:00+00:00")),
            visit("C", "ENT", 10, Some("2025-07-19T10:30:00+00:00")),
        ];
        let summary = summarize_day("07/19/2025", &visits);
        let mrns: Vec<&str> = summary.clinics[0]
            .visits
            .iter()
            .map(|v| v.mrn.as_str())
            .collect();
        assert_eq!(mrns, ["A", "C", "B"]);
    }

    #[test]
    fn test_missing_created_at_sorts_first_stably() {
        let visits = vec![
            visit("X", "ENT", 10, None),
            visit("Y", "ENT", 10, Some("2025-07-19T09:00:00+00:00")),
            visit("Z", "ENT", 10, None),
        ];
        let summary = summarize_day("07/19/2025", &visits);
        let mrns: Vec<&str> = summary.clinics[0]
            .visits
            .iter()
            .map(|v| v.mrn.as_str())
            .collect();
        assert_eq!(mrns, ["X", "Z", "Y"]);
    }

    #[test]
    fn test_many_interleaved_missing_timestamps() {
        // heavily mixed timestamped and untimestamped rows must sort
        // deterministically, never panic
        let mut visits = Vec::new();
        for i in 0..200 {
            let created = if i % 3 == 0 {
                None
            } else {
                Some(format!("2025-07-19T{:02}:{:02}:00+00:00", i / 60, i % 60))
            };
            visits.push(visit(&format!("M{i}"), "ENT", 10, created.as_deref()));
        }

        let summary = summarize_day("07/19/2025", &visits);
        let members = &summary.clinics[0].visits;
        assert_eq!(members.len(), 200);

        // untimestamped rows come first, in input order
        let untimestamped = members.iter().take_while(|v| v.created_at.is_none());
        let expected: Vec<String> = (0..200).step_by(3).map(|i| format!("M{i}")).collect();
        let actual: Vec<String> = untimestamped.map(|v| v.mrn.clone()).collect();
        assert_eq!(actual, expected);

        // the rest are timestamp-ascending
        let stamps: Vec<&str> = members
            .iter()
            .filter_map(|v| v.created_at.as_deref())
            .collect();
        let mut sorted = stamps.clone();
        sorted.sort_unstable();
        assert_eq!(stamps, sorted);
    }

    #[test]
    fn test_clinic_names_sorted_ordinal() {
        let visits = vec![
            visit("A", "b-clinic", 10, None),
            visit("B", "A-clinic", 10, None),
            visit("C", "Z-clinic", 10, None),
        ];
        let summary = summarize_day("07/19/2025", &visits);
        let names: Vec<&str> = summary.clinics.iter().map(|c| c.name.as_str()).collect();
        // ordinal, case-sensitive: uppercase sorts before lowercase
        assert_eq!(names, ["A-clinic", "Z-clinic", "b-clinic"]);
    }
}
