use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Treatment {
    pub id: Uuid,
    pub name: String,
    /// Recently introduced to the formulary; surfaced separately per condition.
    pub is_new: bool,
}
