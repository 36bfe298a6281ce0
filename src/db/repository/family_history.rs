use std::str::FromStr;

use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::enums::FamilyMember;
use crate::models::{Condition, FamilyHistoryEntry};

pub fn insert_family_history_entry(
    conn: &Connection,
    entry: &FamilyHistoryEntry,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO family_history (id, family_member) VALUES (?1, ?2)",
        params![entry.id.to_string(), entry.family_member.as_str()],
    )?;
    Ok(())
}

pub fn get_family_history_entry(
    conn: &Connection,
    id: &Uuid,
) -> Result<Option<FamilyHistoryEntry>, DatabaseError> {
    let mut stmt =
        conn.prepare("SELECT id, family_member FROM family_history WHERE id = ?1")?;

    let result = stmt.query_row(params![id.to_string()], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
    });

    match result {
        Ok((id, member)) => Ok(Some(FamilyHistoryEntry {
            id: Uuid::parse_str(&id)
                .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
            family_member: FamilyMember::from_str(&member)?,
        })),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn delete_family_history_entry(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    conn.execute("DELETE FROM family_history WHERE id = ?1", params![id.to_string()])?;
    Ok(())
}

/// Record that the relative had the given condition.
pub fn add_family_history_condition(
    conn: &Connection,
    family_history_id: &Uuid,
    condition_id: &Uuid,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT OR IGNORE INTO family_history_conditions (family_history_id, condition_id)
         VALUES (?1, ?2)",
        params![family_history_id.to_string(), condition_id.to_string()],
    )?;
    Ok(())
}

pub fn remove_family_history_condition(
    conn: &Connection,
    family_history_id: &Uuid,
    condition_id: &Uuid,
) -> Result<(), DatabaseError> {
    conn.execute(
        "DELETE FROM family_history_conditions
         WHERE family_history_id = ?1 AND condition_id = ?2",
        params![family_history_id.to_string(), condition_id.to_string()],
    )?;
    Ok(())
}

pub fn get_family_history_conditions(
    conn: &Connection,
    family_history_id: &Uuid,
) -> Result<Vec<Condition>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT c.id, c.name FROM conditions c
         JOIN family_history_conditions fc ON fc.condition_id = c.id
         WHERE fc.family_history_id = ?1 ORDER BY c.name",
    )?;

    let rows = stmt.query_map(params![family_history_id.to_string()], |row| {
        Ok(Condition {
            id: Uuid::parse_str(&row.get::<_, String>(0)?).unwrap_or_default(),
            name: row.get(1)?,
        })
    })?;

    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}
