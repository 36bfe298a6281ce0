use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::FamilyMember;

/// One relative's recorded medical background. Which conditions they had
/// is a relation, accessed through the repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FamilyHistoryEntry {
    pub id: Uuid,
    pub family_member: FamilyMember,
}
