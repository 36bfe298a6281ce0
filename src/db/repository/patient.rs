use std::str::FromStr;

use chrono::NaiveDate;
use rusqlite::{params, Connection};
use uuid::Uuid;

use super::active_condition::active_condition_from_row;
use super::treatment::treatment_from_row;
use crate::db::DatabaseError;
use crate::models::enums::{FamilyMember, Sex};
use crate::models::{ActiveCondition, FamilyHistoryEntry, Patient, Treatment};

pub fn insert_patient(conn: &Connection, patient: &Patient) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO patients (id, first_name, last_name, sex, phone_number, healthcard_number,
         address, city, province, country, postal_code, date_of_birth)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            patient.id.to_string(),
            patient.first_name,
            patient.last_name,
            patient.sex.map(|s| s.as_str()),
            patient.phone_number,
            patient.healthcard_number,
            patient.address,
            patient.city,
            patient.province,
            patient.country,
            patient.postal_code,
            patient.date_of_birth.map(|d| d.to_string()),
        ],
    )?;
    Ok(())
}

pub fn update_patient(conn: &Connection, patient: &Patient) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE patients SET first_name = ?2, last_name = ?3, sex = ?4, phone_number = ?5,
         healthcard_number = ?6, address = ?7, city = ?8, province = ?9, country = ?10,
         postal_code = ?11, date_of_birth = ?12
         WHERE id = ?1",
        params![
            patient.id.to_string(),
            patient.first_name,
            patient.last_name,
            patient.sex.map(|s| s.as_str()),
            patient.phone_number,
            patient.healthcard_number,
            patient.address,
            patient.city,
            patient.province,
            patient.country,
            patient.postal_code,
            patient.date_of_birth.map(|d| d.to_string()),
        ],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Patient".into(),
            id: patient.id.to_string(),
        });
    }
    Ok(())
}

pub fn get_patient(conn: &Connection, id: &Uuid) -> Result<Option<Patient>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, first_name, last_name, sex, phone_number, healthcard_number,
         address, city, province, country, postal_code, date_of_birth
         FROM patients WHERE id = ?1",
    )?;

    let result = stmt.query_row(params![id.to_string()], |row| Ok(patient_row_from_rusqlite(row)));

    match result {
        Ok(row) => Ok(Some(patient_from_row(row?)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn list_patients(conn: &Connection) -> Result<Vec<Patient>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, first_name, last_name, sex, phone_number, healthcard_number,
         address, city, province, country, postal_code, date_of_birth
         FROM patients ORDER BY last_name, first_name",
    )?;

    let rows = stmt.query_map([], |row| Ok(patient_row_from_rusqlite(row)))?;

    let mut patients = Vec::new();
    for row in rows {
        patients.push(patient_from_row(row??)?);
    }
    Ok(patients)
}

pub fn delete_patient(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    conn.execute("DELETE FROM patients WHERE id = ?1", params![id.to_string()])?;
    Ok(())
}

// Medication list (patient-owned)

pub fn add_patient_medication(
    conn: &Connection,
    patient_id: &Uuid,
    treatment_id: &Uuid,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT OR IGNORE INTO patient_medications (patient_id, treatment_id) VALUES (?1, ?2)",
        params![patient_id.to_string(), treatment_id.to_string()],
    )?;
    Ok(())
}

pub fn remove_patient_medication(
    conn: &Connection,
    patient_id: &Uuid,
    treatment_id: &Uuid,
) -> Result<(), DatabaseError> {
    conn.execute(
        "DELETE FROM patient_medications WHERE patient_id = ?1 AND treatment_id = ?2",
        params![patient_id.to_string(), treatment_id.to_string()],
    )?;
    Ok(())
}

pub fn get_patient_medications(
    conn: &Connection,
    patient_id: &Uuid,
) -> Result<Vec<Treatment>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT t.id, t.name, t.is_new FROM treatments t
         JOIN patient_medications pm ON pm.treatment_id = t.id
         WHERE pm.patient_id = ?1 ORDER BY t.name",
    )?;

    let rows = stmt.query_map(params![patient_id.to_string()], treatment_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

/// True cardinality of the medication list.
pub fn count_medications(conn: &Connection, patient_id: &Uuid) -> Result<usize, DatabaseError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM patient_medications WHERE patient_id = ?1",
        params![patient_id.to_string()],
        |row| row.get(0),
    )?;
    Ok(count as usize)
}

// Active-condition list (patient-owned)

pub fn add_patient_active_condition(
    conn: &Connection,
    patient_id: &Uuid,
    active_condition_id: &Uuid,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT OR IGNORE INTO patient_active_conditions (patient_id, active_condition_id)
         VALUES (?1, ?2)",
        params![patient_id.to_string(), active_condition_id.to_string()],
    )?;
    Ok(())
}

pub fn remove_patient_active_condition(
    conn: &Connection,
    patient_id: &Uuid,
    active_condition_id: &Uuid,
) -> Result<(), DatabaseError> {
    conn.execute(
        "DELETE FROM patient_active_conditions WHERE patient_id = ?1 AND active_condition_id = ?2",
        params![patient_id.to_string(), active_condition_id.to_string()],
    )?;
    Ok(())
}

pub fn get_patient_active_conditions(
    conn: &Connection,
    patient_id: &Uuid,
) -> Result<Vec<ActiveCondition>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT a.id, a.condition_id, a.diagnosis_date, a.treatment_start_date,
         a.treatment_renewal_date
         FROM active_conditions a
         JOIN patient_active_conditions pa ON pa.active_condition_id = a.id
         WHERE pa.patient_id = ?1",
    )?;

    let rows = stmt.query_map(params![patient_id.to_string()], active_condition_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

/// True cardinality of the active-condition list.
pub fn count_active_conditions(
    conn: &Connection,
    patient_id: &Uuid,
) -> Result<usize, DatabaseError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM patient_active_conditions WHERE patient_id = ?1",
        params![patient_id.to_string()],
        |row| row.get(0),
    )?;
    Ok(count as usize)
}

// Family history (patient-owned)

pub fn add_patient_family_history(
    conn: &Connection,
    patient_id: &Uuid,
    family_history_id: &Uuid,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT OR IGNORE INTO patient_family_history (patient_id, family_history_id)
         VALUES (?1, ?2)",
        params![patient_id.to_string(), family_history_id.to_string()],
    )?;
    Ok(())
}

pub fn remove_patient_family_history(
    conn: &Connection,
    patient_id: &Uuid,
    family_history_id: &Uuid,
) -> Result<(), DatabaseError> {
    conn.execute(
        "DELETE FROM patient_family_history WHERE patient_id = ?1 AND family_history_id = ?2",
        params![patient_id.to_string(), family_history_id.to_string()],
    )?;
    Ok(())
}

pub fn get_patient_family_history(
    conn: &Connection,
    patient_id: &Uuid,
) -> Result<Vec<FamilyHistoryEntry>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT f.id, f.family_member FROM family_history f
         JOIN patient_family_history pf ON pf.family_history_id = f.id
         WHERE pf.patient_id = ?1",
    )?;

    let rows = stmt.query_map(params![patient_id.to_string()], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
    })?;

    let mut entries = Vec::new();
    for row in rows {
        let (id, member) = row?;
        entries.push(FamilyHistoryEntry {
            id: Uuid::parse_str(&id)
                .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
            family_member: FamilyMember::from_str(&member)?,
        });
    }
    Ok(entries)
}

/// Risk flag derived from the stored record: the patient's own date of
/// birth plus COUNT(*) over the active-condition and medication lists.
pub fn is_patient_at_risk(
    conn: &Connection,
    patient_id: &Uuid,
    as_of: NaiveDate,
) -> Result<bool, DatabaseError> {
    let patient = get_patient(conn, patient_id)?.ok_or_else(|| DatabaseError::NotFound {
        entity_type: "Patient".into(),
        id: patient_id.to_string(),
    })?;
    let active = count_active_conditions(conn, patient_id)?;
    let meds = count_medications(conn, patient_id)?;
    Ok(patient.is_at_risk(as_of, active, meds)?)
}

// Internal row type for Patient mapping
struct PatientRow {
    id: String,
    first_name: Option<String>,
    last_name: Option<String>,
    sex: Option<String>,
    phone_number: Option<String>,
    healthcard_number: Option<String>,
    address: Option<String>,
    city: Option<String>,
    province: Option<String>,
    country: Option<String>,
    postal_code: Option<String>,
    date_of_birth: Option<String>,
}

fn patient_row_from_rusqlite(row: &rusqlite::Row<'_>) -> Result<PatientRow, rusqlite::Error> {
    Ok(PatientRow {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        sex: row.get(3)?,
        phone_number: row.get(4)?,
        healthcard_number: row.get(5)?,
        address: row.get(6)?,
        city: row.get(7)?,
        province: row.get(8)?,
        country: row.get(9)?,
        postal_code: row.get(10)?,
        date_of_birth: row.get(11)?,
    })
}

fn patient_from_row(row: PatientRow) -> Result<Patient, DatabaseError> {
    let sex = match row.sex {
        Some(s) => Some(Sex::from_str(&s)?),
        None => None,
    };
    Ok(Patient {
        id: Uuid::parse_str(&row.id)
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        first_name: row.first_name,
        last_name: row.last_name,
        sex,
        phone_number: row.phone_number,
        healthcard_number: row.healthcard_number,
        address: row.address,
        city: row.city,
        province: row.province,
        country: row.country,
        postal_code: row.postal_code,
        date_of_birth: row
            .date_of_birth
            .and_then(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok()),
    })
}
