use rusqlite::{params, Connection};
use uuid::Uuid;

use super::treatment::treatment_from_row;
use crate::db::DatabaseError;
use crate::models::{Incompatibility, Treatment};

pub fn insert_incompatibility(
    conn: &Connection,
    inc: &Incompatibility,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO incompatibilities (id, treatment_id, conflicting_treatment_id,
         conflicting_condition_id)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            inc.id.to_string(),
            inc.treatment_id.to_string(),
            inc.conflicting_treatment_id.to_string(),
            inc.conflicting_condition_id.to_string(),
        ],
    )?;
    Ok(())
}

pub fn get_incompatibility(
    conn: &Connection,
    id: &Uuid,
) -> Result<Option<Incompatibility>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, treatment_id, conflicting_treatment_id, conflicting_condition_id
         FROM incompatibilities WHERE id = ?1",
    )?;

    let result = stmt.query_row(params![id.to_string()], incompatibility_from_row);

    match result {
        Ok(inc) => Ok(Some(inc)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn list_incompatibilities(conn: &Connection) -> Result<Vec<Incompatibility>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, treatment_id, conflicting_treatment_id, conflicting_condition_id
         FROM incompatibilities",
    )?;

    let rows = stmt.query_map([], incompatibility_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn delete_incompatibility(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    conn.execute(
        "DELETE FROM incompatibilities WHERE id = ?1",
        params![id.to_string()],
    )?;
    Ok(())
}

/// Medications on a patient's list that appear on either side of a
/// recorded treatment-treatment incompatibility.
pub fn conflicting_medications(
    conn: &Connection,
    patient_id: &Uuid,
) -> Result<Vec<Treatment>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT DISTINCT t.id, t.name, t.is_new FROM treatments t
         JOIN patient_medications pm ON pm.treatment_id = t.id
         JOIN incompatibilities i
           ON i.treatment_id = t.id OR i.conflicting_treatment_id = t.id
         WHERE pm.patient_id = ?1 ORDER BY t.name",
    )?;

    let rows = stmt.query_map(params![patient_id.to_string()], treatment_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

fn incompatibility_from_row(row: &rusqlite::Row<'_>) -> Result<Incompatibility, rusqlite::Error> {
    Ok(Incompatibility {
        id: Uuid::parse_str(&row.get::<_, String>(0)?).unwrap_or_default(),
        treatment_id: Uuid::parse_str(&row.get::<_, String>(1)?).unwrap_or_default(),
        conflicting_treatment_id: Uuid::parse_str(&row.get::<_, String>(2)?).unwrap_or_default(),
        conflicting_condition_id: Uuid::parse_str(&row.get::<_, String>(3)?).unwrap_or_default(),
    })
}
