use chrono::NaiveDate;
use rusqlite::{params, Connection};
use uuid::Uuid;

use super::treatment::treatment_from_row;
use crate::db::DatabaseError;
use crate::models::{ActiveCondition, Treatment};

pub fn insert_active_condition(
    conn: &Connection,
    ac: &ActiveCondition,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO active_conditions (id, condition_id, diagnosis_date,
         treatment_start_date, treatment_renewal_date)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            ac.id.to_string(),
            ac.condition_id.to_string(),
            ac.diagnosis_date.map(|d| d.to_string()),
            ac.treatment_start_date.map(|d| d.to_string()),
            ac.treatment_renewal_date.map(|d| d.to_string()),
        ],
    )?;
    Ok(())
}

pub fn get_active_condition(
    conn: &Connection,
    id: &Uuid,
) -> Result<Option<ActiveCondition>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, condition_id, diagnosis_date, treatment_start_date, treatment_renewal_date
         FROM active_conditions WHERE id = ?1",
    )?;

    let result = stmt.query_row(params![id.to_string()], active_condition_from_row);

    match result {
        Ok(ac) => Ok(Some(ac)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn delete_active_condition(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    conn.execute(
        "DELETE FROM active_conditions WHERE id = ?1",
        params![id.to_string()],
    )?;
    Ok(())
}

pub fn add_active_condition_treatment(
    conn: &Connection,
    active_condition_id: &Uuid,
    treatment_id: &Uuid,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT OR IGNORE INTO active_condition_treatments (active_condition_id, treatment_id)
         VALUES (?1, ?2)",
        params![active_condition_id.to_string(), treatment_id.to_string()],
    )?;
    Ok(())
}

pub fn remove_active_condition_treatment(
    conn: &Connection,
    active_condition_id: &Uuid,
    treatment_id: &Uuid,
) -> Result<(), DatabaseError> {
    conn.execute(
        "DELETE FROM active_condition_treatments
         WHERE active_condition_id = ?1 AND treatment_id = ?2",
        params![active_condition_id.to_string(), treatment_id.to_string()],
    )?;
    Ok(())
}

pub fn get_active_condition_treatments(
    conn: &Connection,
    active_condition_id: &Uuid,
) -> Result<Vec<Treatment>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT t.id, t.name, t.is_new FROM treatments t
         JOIN active_condition_treatments at ON at.treatment_id = t.id
         WHERE at.active_condition_id = ?1 ORDER BY t.name",
    )?;

    let rows = stmt.query_map(params![active_condition_id.to_string()], treatment_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

/// The treatment currently on record for this tracked condition, if any.
pub fn first_treatment_for_active_condition(
    conn: &Connection,
    active_condition_id: &Uuid,
) -> Result<Option<Treatment>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT t.id, t.name, t.is_new FROM treatments t
         JOIN active_condition_treatments at ON at.treatment_id = t.id
         WHERE at.active_condition_id = ?1 ORDER BY t.name LIMIT 1",
    )?;

    let result = stmt.query_row(params![active_condition_id.to_string()], treatment_from_row);

    match result {
        Ok(t) => Ok(Some(t)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub(super) fn active_condition_from_row(
    row: &rusqlite::Row<'_>,
) -> Result<ActiveCondition, rusqlite::Error> {
    Ok(ActiveCondition {
        id: Uuid::parse_str(&row.get::<_, String>(0)?).unwrap_or_default(),
        condition_id: Uuid::parse_str(&row.get::<_, String>(1)?).unwrap_or_default(),
        diagnosis_date: row
            .get::<_, Option<String>>(2)?
            .and_then(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok()),
        treatment_start_date: row
            .get::<_, Option<String>>(3)?
            .and_then(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok()),
        treatment_renewal_date: row
            .get::<_, Option<String>>(4)?
            .and_then(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok()),
    })
}
