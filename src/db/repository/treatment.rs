use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::{SideEffect, Treatment};

pub fn insert_treatment(conn: &Connection, treatment: &Treatment) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO treatments (id, name, is_new) VALUES (?1, ?2, ?3)",
        params![
            treatment.id.to_string(),
            treatment.name,
            treatment.is_new as i32,
        ],
    )?;
    Ok(())
}

pub fn get_treatment(conn: &Connection, id: &Uuid) -> Result<Option<Treatment>, DatabaseError> {
    let mut stmt = conn.prepare("SELECT id, name, is_new FROM treatments WHERE id = ?1")?;

    let result = stmt.query_row(params![id.to_string()], treatment_from_row);

    match result {
        Ok(t) => Ok(Some(t)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn list_treatments(conn: &Connection) -> Result<Vec<Treatment>, DatabaseError> {
    let mut stmt = conn.prepare("SELECT id, name, is_new FROM treatments ORDER BY name")?;
    let rows = stmt.query_map([], treatment_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn delete_treatment(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    conn.execute("DELETE FROM treatments WHERE id = ?1", params![id.to_string()])?;
    Ok(())
}

/// Record a side effect of a treatment. Membership is unique: re-adding
/// an already-linked side effect is a no-op.
pub fn add_treatment_side_effect(
    conn: &Connection,
    treatment_id: &Uuid,
    side_effect_id: &Uuid,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT OR IGNORE INTO treatment_side_effects (treatment_id, side_effect_id)
         VALUES (?1, ?2)",
        params![treatment_id.to_string(), side_effect_id.to_string()],
    )?;
    Ok(())
}

pub fn remove_treatment_side_effect(
    conn: &Connection,
    treatment_id: &Uuid,
    side_effect_id: &Uuid,
) -> Result<(), DatabaseError> {
    conn.execute(
        "DELETE FROM treatment_side_effects WHERE treatment_id = ?1 AND side_effect_id = ?2",
        params![treatment_id.to_string(), side_effect_id.to_string()],
    )?;
    Ok(())
}

pub fn get_treatment_side_effects(
    conn: &Connection,
    treatment_id: &Uuid,
) -> Result<Vec<SideEffect>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT s.id, s.effect FROM side_effects s
         JOIN treatment_side_effects ts ON ts.side_effect_id = s.id
         WHERE ts.treatment_id = ?1",
    )?;

    let rows = stmt.query_map(params![treatment_id.to_string()], |row| {
        Ok(SideEffect {
            id: Uuid::parse_str(&row.get::<_, String>(0)?).unwrap_or_default(),
            effect: row.get(1)?,
        })
    })?;

    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub(super) fn treatment_from_row(row: &rusqlite::Row<'_>) -> Result<Treatment, rusqlite::Error> {
    Ok(Treatment {
        id: Uuid::parse_str(&row.get::<_, String>(0)?).unwrap_or_default(),
        name: row.get(1)?,
        is_new: row.get::<_, i32>(2)? != 0,
    })
}
