//! Clinic records.

use serde::{Deserialize, Serialize};

/// Sentinel clinic name that visits are rewritten to when their clinic is
/// deleted. No visit may reference a clinic name that no longer exists.
pub const FALLBACK_CLINIC: &str = "Other";

/// A named site of care.
///
/// `name` is treated as a lookup key by the rest of the system; visits
/// reference clinics by name, not id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Clinic {
    pub id: String,
    pub name: String,
}

impl Clinic {
    /// Create a new clinic.
    pub fn new(name: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
        }
    }
}
