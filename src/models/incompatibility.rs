use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A recorded conflict: `treatment_id` should not be combined with
/// `conflicting_treatment_id`, or given in the presence of
/// `conflicting_condition_id`. All three references are required and the
/// record is cascade-deleted with any of its referents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Incompatibility {
    pub id: Uuid,
    pub treatment_id: Uuid,
    pub conflicting_treatment_id: Uuid,
    pub conflicting_condition_id: Uuid,
}
