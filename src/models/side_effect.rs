use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SideEffect {
    pub id: Uuid,
    pub effect: String,
}
