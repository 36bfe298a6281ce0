use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::Sex;
use super::DerivedError;

/// Patient demographics. Medication, family history, and active-condition
/// lists are relations owned by the patient, accessed through the
/// repository; the derived computations below operate on loaded data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Patient {
    pub id: Uuid,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub sex: Option<Sex>,
    pub phone_number: Option<String>,
    pub healthcard_number: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
}

impl Patient {
    /// "first last". Errors when either part is absent rather than
    /// splicing a null representation into the string.
    pub fn full_name(&self) -> Result<String, DerivedError> {
        let first = self
            .first_name
            .as_deref()
            .ok_or(DerivedError::MissingField { field: "first_name" })?;
        let last = self
            .last_name
            .as_deref()
            .ok_or(DerivedError::MissingField { field: "last_name" })?;
        Ok(format!("{first} {last}"))
    }

    /// Address, city, province, country, postal code joined by ", ".
    /// Pure formatting: missing fields render as empty tokens.
    pub fn full_address(&self) -> String {
        [
            self.address.as_deref(),
            self.city.as_deref(),
            self.province.as_deref(),
            self.country.as_deref(),
            self.postal_code.as_deref(),
        ]
        .map(|part| part.unwrap_or(""))
        .join(", ")
    }

    /// Whole years between date of birth and `as_of`, one less if the
    /// birthday has not yet occurred in `as_of`'s year.
    pub fn age(&self, as_of: NaiveDate) -> Result<i32, DerivedError> {
        let dob = self
            .date_of_birth
            .ok_or(DerivedError::MissingData { data: "date_of_birth" })?;
        let mut years = as_of.year() - dob.year();
        if (as_of.month(), as_of.day()) < (dob.month(), dob.day()) {
            years -= 1;
        }
        Ok(years)
    }

    /// Clinical risk flag from age and relationship cardinalities. The
    /// counts must be the actual number of related records; the repository
    /// derives them with COUNT(*) over the join tables.
    pub fn is_at_risk(
        &self,
        as_of: NaiveDate,
        active_condition_count: usize,
        medication_count: usize,
    ) -> Result<bool, DerivedError> {
        let age = self.age(as_of)?;
        Ok(at_risk(age, active_condition_count, medication_count))
    }
}

/// Risk decision table, evaluated top to bottom, first match wins.
pub fn at_risk(age: i32, active_conditions: usize, medications: usize) -> bool {
    age > 75
        || (age > 60 && active_conditions > 3)
        || (age > 50 && active_conditions > 2)
        || (age > 40 && (active_conditions > 2 || medications > 2))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn patient_born(dob: NaiveDate) -> Patient {
        Patient {
            id: Uuid::new_v4(),
            date_of_birth: Some(dob),
            ..Patient::default()
        }
    }

    #[test]
    fn full_name_joins_with_single_space() {
        let patient = Patient {
            first_name: Some("Leena".into()),
            last_name: Some("Virtanen".into()),
            ..Patient::default()
        };
        assert_eq!(patient.full_name().unwrap(), "Leena Virtanen");
    }

    #[test]
    fn full_name_missing_part_is_an_error() {
        let patient = Patient {
            first_name: Some("Leena".into()),
            ..Patient::default()
        };
        assert_eq!(
            patient.full_name(),
            Err(DerivedError::MissingField { field: "last_name" })
        );
        assert_eq!(
            Patient::default().full_name(),
            Err(DerivedError::MissingField { field: "first_name" })
        );
    }

    #[test]
    fn full_address_renders_missing_fields_as_empty_tokens() {
        let patient = Patient {
            address: Some("12 Elm St".into()),
            city: Some("Guelph".into()),
            province: Some("Ontario".into()),
            country: Some("Canada".into()),
            postal_code: Some("N1G2W1".into()),
            ..Patient::default()
        };
        assert_eq!(
            patient.full_address(),
            "12 Elm St, Guelph, Ontario, Canada, N1G2W1"
        );

        let partial = Patient {
            province: Some("Ontario".into()),
            country: Some("Canada".into()),
            ..Patient::default()
        };
        assert_eq!(partial.full_address(), ", , Ontario, Canada, ");
    }

    #[test]
    fn age_decrements_before_birthday() {
        let patient = patient_born(ymd(2000, 1, 10));
        assert_eq!(patient.age(ymd(2020, 1, 9)).unwrap(), 19);
        assert_eq!(patient.age(ymd(2020, 1, 10)).unwrap(), 20);
    }

    #[test]
    fn age_without_date_of_birth_is_missing_data() {
        assert_eq!(
            Patient::default().age(ymd(2020, 1, 1)),
            Err(DerivedError::MissingData { data: "date_of_birth" })
        );
    }

    #[test]
    fn patient_serializes_with_iso_dates() {
        let patient = Patient {
            first_name: Some("Leena".into()),
            last_name: Some("Virtanen".into()),
            date_of_birth: Some(ymd(2000, 1, 10)),
            ..Patient::default()
        };
        let json = serde_json::to_value(&patient).unwrap();
        assert_eq!(json["date_of_birth"], "2000-01-10");
        let back: Patient = serde_json::from_value(json).unwrap();
        assert_eq!(back.date_of_birth, patient.date_of_birth);
    }

    #[test]
    fn risk_table_first_match_wins() {
        // age > 75: unconditional
        assert!(at_risk(80, 0, 0));
        // age > 60 needs more than 3 active conditions
        assert!(at_risk(65, 4, 0));
        assert!(!at_risk(65, 2, 0));
        // age > 50 needs more than 2
        assert!(at_risk(55, 3, 0));
        // age > 40: conditions or medications past 2
        assert!(at_risk(45, 0, 3));
        assert!(at_risk(45, 3, 0));
        assert!(!at_risk(45, 2, 2));
        // below 41 never flags
        assert!(!at_risk(30, 10, 10));
    }

    #[test]
    fn is_at_risk_uses_the_patients_own_birth_date() {
        let patient = patient_born(ymd(1940, 6, 1));
        assert!(patient.is_at_risk(ymd(2020, 6, 1), 0, 0).unwrap());

        let young = patient_born(ymd(1995, 6, 1));
        assert!(!young.is_at_risk(ymd(2020, 6, 1), 10, 10).unwrap());

        assert_eq!(
            Patient::default().is_at_risk(ymd(2020, 6, 1), 0, 0),
            Err(DerivedError::MissingData { data: "date_of_birth" })
        );
    }
}
