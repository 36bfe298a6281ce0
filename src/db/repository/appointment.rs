use chrono::{NaiveDate, NaiveTime};
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::Appointment;

pub fn insert_appointment(conn: &Connection, appt: &Appointment) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO appointments (id, provider_id, patient_id, date, time)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            appt.id.to_string(),
            appt.provider_id.map(|id| id.to_string()),
            appt.patient_id.to_string(),
            appt.date.map(|d| d.to_string()),
            appt.time.map(|t| t.format("%H:%M:%S").to_string()),
        ],
    )?;
    Ok(())
}

pub fn get_appointment(
    conn: &Connection,
    id: &Uuid,
) -> Result<Option<Appointment>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, provider_id, patient_id, date, time FROM appointments WHERE id = ?1",
    )?;

    let result = stmt.query_row(params![id.to_string()], appointment_from_row);

    match result {
        Ok(a) => Ok(Some(a)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn list_appointments_for_patient(
    conn: &Connection,
    patient_id: &Uuid,
) -> Result<Vec<Appointment>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, provider_id, patient_id, date, time FROM appointments
         WHERE patient_id = ?1 ORDER BY date, time",
    )?;

    let rows = stmt.query_map(params![patient_id.to_string()], appointment_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn list_appointments_for_provider(
    conn: &Connection,
    provider_id: &Uuid,
) -> Result<Vec<Appointment>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, provider_id, patient_id, date, time FROM appointments
         WHERE provider_id = ?1 ORDER BY date, time",
    )?;

    let rows = stmt.query_map(params![provider_id.to_string()], appointment_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn delete_appointment(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    conn.execute("DELETE FROM appointments WHERE id = ?1", params![id.to_string()])?;
    Ok(())
}

fn appointment_from_row(row: &rusqlite::Row<'_>) -> Result<Appointment, rusqlite::Error> {
    Ok(Appointment {
        id: Uuid::parse_str(&row.get::<_, String>(0)?).unwrap_or_default(),
        provider_id: row
            .get::<_, Option<String>>(1)?
            .and_then(|s| Uuid::parse_str(&s).ok()),
        patient_id: Uuid::parse_str(&row.get::<_, String>(2)?).unwrap_or_default(),
        date: row
            .get::<_, Option<String>>(3)?
            .and_then(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok()),
        time: row
            .get::<_, Option<String>>(4)?
            .and_then(|t| NaiveTime::parse_from_str(&t, "%H:%M:%S").ok()),
    })
}
