use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthcareProvider {
    pub id: Uuid,
    /// Unique business key within the institution.
    pub employee_number: i64,
    pub title: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl HealthcareProvider {
    /// Human-readable label: employee number, title, and name.
    /// Absent name parts are skipped rather than rendered as empty tokens.
    pub fn display_name(&self) -> String {
        let mut label = format!("{} -- {}", self.employee_number, self.title);
        for part in [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
        {
            label.push(' ');
            label.push_str(part);
        }
        label
    }
}
