use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::SideEffect;

pub fn insert_side_effect(conn: &Connection, se: &SideEffect) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO side_effects (id, effect) VALUES (?1, ?2)",
        params![se.id.to_string(), se.effect],
    )?;
    Ok(())
}

pub fn get_side_effect(conn: &Connection, id: &Uuid) -> Result<Option<SideEffect>, DatabaseError> {
    let mut stmt = conn.prepare("SELECT id, effect FROM side_effects WHERE id = ?1")?;

    let result = stmt.query_row(params![id.to_string()], |row| {
        Ok(SideEffect {
            id: Uuid::parse_str(&row.get::<_, String>(0)?).unwrap_or_default(),
            effect: row.get(1)?,
        })
    });

    match result {
        Ok(se) => Ok(Some(se)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn list_side_effects(conn: &Connection) -> Result<Vec<SideEffect>, DatabaseError> {
    let mut stmt = conn.prepare("SELECT id, effect FROM side_effects ORDER BY effect")?;

    let rows = stmt.query_map([], |row| {
        Ok(SideEffect {
            id: Uuid::parse_str(&row.get::<_, String>(0)?).unwrap_or_default(),
            effect: row.get(1)?,
        })
    })?;

    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn delete_side_effect(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    conn.execute("DELETE FROM side_effects WHERE id = ?1", params![id.to_string()])?;
    Ok(())
}
