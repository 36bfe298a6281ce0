use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A condition currently being tracked and treated for a patient.
/// Deleting the referenced condition deletes this record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveCondition {
    pub id: Uuid,
    pub condition_id: Uuid,
    pub diagnosis_date: Option<NaiveDate>,
    pub treatment_start_date: Option<NaiveDate>,
    pub treatment_renewal_date: Option<NaiveDate>,
}
