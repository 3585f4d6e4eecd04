//! Daily report export.
//!
//! Wraps a [`DailySummary`](crate::summary::DailySummary) with an export
//! timestamp and renders it as JSON or CSV for sharing outside the app.

use serde::{Deserialize, Serialize};

use crate::summary::DailySummary;

/// One day's coverage report, ready for export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyReport {
    /// Export timestamp, RFC 3339.
    pub exported_at: String,
    pub summary: DailySummary,
}

impl DailyReport {
    pub fn new(summary: DailySummary) -> Self {
        Self {
            exported_at: chrono::Utc::now().to_rfc3339(),
            summary,
        }
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export to CSV format, one row per visit.
    pub fn to_csv(&self) -> String {
        let mut csv = String::new();

        // Header
        csv.push_str("date,clinic,mrn,time_in,time_out,time_spent_minutes\n");

        for clinic in &self.summary.clinics {
            for visit in &clinic.visits {
                csv.push_str(&format!(
                    "{},{},{},{},{},{}\n",
                    escape_csv(&visit.date),
                    escape_csv(&clinic.name),
                    escape_csv(&visit.mrn),
                    escape_csv(&visit.time_in),
                    escape_csv(&visit.time_out),
                    visit.time_spent,
                ));
            }
        }

        csv
    }
}

/// Escape a string for CSV output.
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Visit;
    use crate::summary::summarize_day;

    fn make_visit(mrn: &str, clinic: &str, minutes: i64) -> Visit {
        Visit {
            id: uuid::Uuid::new_v4().to_string(),
            mrn: mrn.into(),
            clinic: clinic.into(),
            date: "07/19/2025".into(),
            time_in: "07/19/2025 09:00".into(),
            time_out: "07/19/2025 10:00".into(),
            time_spent: minutes,
            duration: minutes as f64 / 60.0,
            created_at: Some("2025-07-19T09:00:00+00:00".into()),
        }
    }

    fn make_report() -> DailyReport {
        let visits = vec![
            make_visit("123456", "Cardiology", 60),
            make_visit("789012", "ENT", 30),
        ];
        DailyReport::new(summarize_day("07/19/2025", &visits))
    }

    #[test]
    fn test_report_json() {
        let report = make_report();
        let json = report.to_json().unwrap();

        assert!(json.contains("Cardiology"));
        assert!(json.contains("123456"));
        assert!(json.contains("\"total_patients\": 2"));
    }

    #[test]
    fn test_report_csv() {
        let report = make_report();
        let csv = report.to_csv();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 3); // Header + 2 visits
        assert!(lines[0].contains("time_spent_minutes"));
        assert!(lines[1].contains("Cardiology"));
        assert!(lines[2].contains("ENT"));
    }

    #[test]
    fn test_csv_escaping() {
        assert_eq!(escape_csv("simple"), "simple");
        assert_eq!(escape_csv("Plastic, Cranio"), "\"Plastic, Cranio\"");
        assert_eq!(escape_csv("with\"quote"), "\"with\"\"quote\"");
    }

    #[test]
    fn test_empty_day_csv_is_header_only() {
        let report = DailyReport::new(summarize_day("07/19/2025", &[]));
        assert_eq!(report.to_csv().lines().count(), 1);
    }
}
