use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub provider_id: Option<Uuid>,
    pub patient_id: Uuid,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
}
