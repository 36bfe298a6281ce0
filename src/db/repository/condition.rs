use rusqlite::{params, Connection};
use uuid::Uuid;

use super::treatment::treatment_from_row;
use crate::db::DatabaseError;
use crate::models::{Condition, SideEffect, Treatment};

pub fn insert_condition(conn: &Connection, condition: &Condition) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO conditions (id, name) VALUES (?1, ?2)",
        params![condition.id.to_string(), condition.name],
    )?;
    Ok(())
}

pub fn get_condition(conn: &Connection, id: &Uuid) -> Result<Option<Condition>, DatabaseError> {
    let mut stmt = conn.prepare("SELECT id, name FROM conditions WHERE id = ?1")?;

    let result = stmt.query_row(params![id.to_string()], |row| {
        Ok(Condition {
            id: Uuid::parse_str(&row.get::<_, String>(0)?).unwrap_or_default(),
            name: row.get(1)?,
        })
    });

    match result {
        Ok(c) => Ok(Some(c)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn list_conditions(conn: &Connection) -> Result<Vec<Condition>, DatabaseError> {
    let mut stmt = conn.prepare("SELECT id, name FROM conditions ORDER BY name")?;

    let rows = stmt.query_map([], |row| {
        Ok(Condition {
            id: Uuid::parse_str(&row.get::<_, String>(0)?).unwrap_or_default(),
            name: row.get(1)?,
        })
    })?;

    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn delete_condition(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    conn.execute("DELETE FROM conditions WHERE id = ?1", params![id.to_string()])?;
    Ok(())
}

pub fn add_condition_treatment(
    conn: &Connection,
    condition_id: &Uuid,
    treatment_id: &Uuid,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT OR IGNORE INTO condition_treatments (condition_id, treatment_id)
         VALUES (?1, ?2)",
        params![condition_id.to_string(), treatment_id.to_string()],
    )?;
    Ok(())
}

pub fn remove_condition_treatment(
    conn: &Connection,
    condition_id: &Uuid,
    treatment_id: &Uuid,
) -> Result<(), DatabaseError> {
    conn.execute(
        "DELETE FROM condition_treatments WHERE condition_id = ?1 AND treatment_id = ?2",
        params![condition_id.to_string(), treatment_id.to_string()],
    )?;
    Ok(())
}

pub fn get_condition_treatments(
    conn: &Connection,
    condition_id: &Uuid,
) -> Result<Vec<Treatment>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT t.id, t.name, t.is_new FROM treatments t
         JOIN condition_treatments ct ON ct.treatment_id = t.id
         WHERE ct.condition_id = ?1 ORDER BY t.name",
    )?;

    let rows = stmt.query_map(params![condition_id.to_string()], treatment_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

/// Treatments for a condition that are flagged as newly introduced.
pub fn new_treatments_for_condition(
    conn: &Connection,
    condition_id: &Uuid,
) -> Result<Vec<Treatment>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT t.id, t.name, t.is_new FROM treatments t
         JOIN condition_treatments ct ON ct.treatment_id = t.id
         WHERE ct.condition_id = ?1 AND t.is_new = 1 ORDER BY t.name",
    )?;

    let rows = stmt.query_map(params![condition_id.to_string()], treatment_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn add_condition_side_effect(
    conn: &Connection,
    condition_id: &Uuid,
    side_effect_id: &Uuid,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT OR IGNORE INTO condition_side_effects (condition_id, side_effect_id)
         VALUES (?1, ?2)",
        params![condition_id.to_string(), side_effect_id.to_string()],
    )?;
    Ok(())
}

pub fn remove_condition_side_effect(
    conn: &Connection,
    condition_id: &Uuid,
    side_effect_id: &Uuid,
) -> Result<(), DatabaseError> {
    conn.execute(
        "DELETE FROM condition_side_effects WHERE condition_id = ?1 AND side_effect_id = ?2",
        params![condition_id.to_string(), side_effect_id.to_string()],
    )?;
    Ok(())
}

pub fn get_condition_side_effects(
    conn: &Connection,
    condition_id: &Uuid,
) -> Result<Vec<SideEffect>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT s.id, s.effect FROM side_effects s
         JOIN condition_side_effects cs ON cs.side_effect_id = s.id
         WHERE cs.condition_id = ?1",
    )?;

    let rows = stmt.query_map(params![condition_id.to_string()], |row| {
        Ok(SideEffect {
            id: Uuid::parse_str(&row.get::<_, String>(0)?).unwrap_or_default(),
            effect: row.get(1)?,
        })
    })?;

    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}
