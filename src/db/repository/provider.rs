use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::HealthcareProvider;

pub fn insert_provider(
    conn: &Connection,
    provider: &HealthcareProvider,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO healthcare_providers (id, employee_number, title, first_name, last_name)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            provider.id.to_string(),
            provider.employee_number,
            provider.title,
            provider.first_name,
            provider.last_name,
        ],
    )
    .map_err(|e| match e {
        // Only the employee_number UNIQUE constraint gets the business-key
        // message; other constraint failures (e.g. duplicate id) pass through.
        rusqlite::Error::SqliteFailure(err, Some(ref msg))
            if err.code == rusqlite::ErrorCode::ConstraintViolation
                && msg.contains("healthcare_providers.employee_number") =>
        {
            DatabaseError::ConstraintViolation(format!(
                "employee_number {} already registered",
                provider.employee_number
            ))
        }
        other => other.into(),
    })?;
    Ok(())
}

pub fn get_provider(
    conn: &Connection,
    id: &Uuid,
) -> Result<Option<HealthcareProvider>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, employee_number, title, first_name, last_name
         FROM healthcare_providers WHERE id = ?1",
    )?;

    let result = stmt.query_row(params![id.to_string()], provider_from_row);

    match result {
        Ok(p) => Ok(Some(p)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Lookup on the unique business key.
pub fn get_provider_by_employee_number(
    conn: &Connection,
    employee_number: i64,
) -> Result<Option<HealthcareProvider>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, employee_number, title, first_name, last_name
         FROM healthcare_providers WHERE employee_number = ?1",
    )?;

    let result = stmt.query_row(params![employee_number], provider_from_row);

    match result {
        Ok(p) => Ok(Some(p)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn list_providers(conn: &Connection) -> Result<Vec<HealthcareProvider>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, employee_number, title, first_name, last_name
         FROM healthcare_providers ORDER BY employee_number",
    )?;

    let rows = stmt.query_map([], provider_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn delete_provider(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    conn.execute(
        "DELETE FROM healthcare_providers WHERE id = ?1",
        params![id.to_string()],
    )?;
    Ok(())
}

fn provider_from_row(row: &rusqlite::Row<'_>) -> Result<HealthcareProvider, rusqlite::Error> {
    Ok(HealthcareProvider {
        id: Uuid::parse_str(&row.get::<_, String>(0)?).unwrap_or_default(),
        employee_number: row.get(1)?,
        title: row.get(2)?,
        first_name: row.get(3)?,
        last_name: row.get(4)?,
    })
}
