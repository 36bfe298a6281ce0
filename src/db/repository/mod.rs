//! Repository layer — entity-scoped database operations.
//!
//! Free functions over `&Connection`, one sub-module per entity. All public
//! functions are re-exported here.

mod active_condition;
mod appointment;
mod condition;
mod family_history;
mod incompatibility;
mod patient;
mod provider;
mod side_effect;
mod treatment;

pub use active_condition::*;
pub use appointment::*;
pub use condition::*;
pub use family_history::*;
pub use incompatibility::*;
pub use patient::*;
pub use provider::*;
pub use side_effect::*;
pub use treatment::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;
    use crate::db::DatabaseError;
    use crate::models::enums::{FamilyMember, Sex};
    use crate::models::*;
    use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};
    use rusqlite::Connection;
    use uuid::Uuid;

    fn test_db() -> Connection {
        open_memory_database().unwrap()
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn make_patient(conn: &Connection, dob: Option<NaiveDate>) -> Uuid {
        let id = Uuid::new_v4();
        insert_patient(
            conn,
            &Patient {
                id,
                first_name: Some("Noor".into()),
                last_name: Some("Haddad".into()),
                sex: Some(Sex::Female),
                phone_number: Some("5195551234".into()),
                healthcard_number: Some("1234567890AB".into()),
                address: Some("12 Elm St".into()),
                city: Some("Guelph".into()),
                province: Some("Ontario".into()),
                country: Some("Canada".into()),
                postal_code: Some("N1G2W1".into()),
                date_of_birth: dob,
            },
        )
        .unwrap();
        id
    }

    fn make_treatment(conn: &Connection, name: &str, is_new: bool) -> Uuid {
        let id = Uuid::new_v4();
        insert_treatment(conn, &Treatment { id, name: name.into(), is_new }).unwrap();
        id
    }

    fn make_condition(conn: &Connection, name: &str) -> Uuid {
        let id = Uuid::new_v4();
        insert_condition(conn, &Condition { id, name: name.into() }).unwrap();
        id
    }

    fn make_active_condition(conn: &Connection, condition_id: Uuid) -> Uuid {
        let id = Uuid::new_v4();
        insert_active_condition(
            conn,
            &ActiveCondition {
                id,
                condition_id,
                diagnosis_date: Some(ymd(2019, 3, 1)),
                treatment_start_date: Some(ymd(2019, 3, 15)),
                treatment_renewal_date: None,
            },
        )
        .unwrap();
        id
    }

    #[test]
    fn patient_insert_and_retrieve() {
        let conn = test_db();
        let id = make_patient(&conn, Some(ymd(1980, 5, 20)));

        let patient = get_patient(&conn, &id).unwrap().unwrap();
        assert_eq!(patient.full_name().unwrap(), "Noor Haddad");
        assert_eq!(patient.sex, Some(Sex::Female));
        assert_eq!(patient.date_of_birth, Some(ymd(1980, 5, 20)));
        assert_eq!(
            patient.full_address(),
            "12 Elm St, Guelph, Ontario, Canada, N1G2W1"
        );
    }

    #[test]
    fn patient_update_and_missing_update() {
        let conn = test_db();
        let id = make_patient(&conn, None);

        let mut patient = get_patient(&conn, &id).unwrap().unwrap();
        patient.city = Some("Kitchener".into());
        update_patient(&conn, &patient).unwrap();
        let reloaded = get_patient(&conn, &id).unwrap().unwrap();
        assert_eq!(reloaded.city.as_deref(), Some("Kitchener"));

        patient.id = Uuid::new_v4();
        assert!(matches!(
            update_patient(&conn, &patient),
            Err(DatabaseError::NotFound { .. })
        ));
    }

    #[test]
    fn risk_flag_tracks_active_condition_cardinality() {
        let conn = test_db();
        // 65 years old at the assessment date
        let patient_id = make_patient(&conn, Some(ymd(1955, 1, 1)));
        let as_of = ymd(2020, 6, 1);

        let condition_id = make_condition(&conn, "Hypertension");
        let mut active_ids = Vec::new();
        for _ in 0..3 {
            let ac = make_active_condition(&conn, condition_id);
            add_patient_active_condition(&conn, &patient_id, &ac).unwrap();
            active_ids.push(ac);
        }
        assert!(!is_patient_at_risk(&conn, &patient_id, as_of).unwrap());

        // Fourth active condition crosses the age > 60 threshold
        let fourth = make_active_condition(&conn, condition_id);
        add_patient_active_condition(&conn, &patient_id, &fourth).unwrap();
        assert_eq!(count_active_conditions(&conn, &patient_id).unwrap(), 4);
        assert!(is_patient_at_risk(&conn, &patient_id, as_of).unwrap());

        remove_patient_active_condition(&conn, &patient_id, &fourth).unwrap();
        assert!(!is_patient_at_risk(&conn, &patient_id, as_of).unwrap());
    }

    #[test]
    fn risk_flag_tracks_medication_cardinality() {
        let conn = test_db();
        // 45 years old at the assessment date
        let patient_id = make_patient(&conn, Some(ymd(1975, 1, 1)));
        let as_of = ymd(2020, 6, 1);

        for name in ["Metformin", "Ramipril"] {
            let t = make_treatment(&conn, name, false);
            add_patient_medication(&conn, &patient_id, &t).unwrap();
        }
        assert!(!is_patient_at_risk(&conn, &patient_id, as_of).unwrap());

        let third = make_treatment(&conn, "Atorvastatin", false);
        add_patient_medication(&conn, &patient_id, &third).unwrap();
        assert_eq!(count_medications(&conn, &patient_id).unwrap(), 3);
        assert!(is_patient_at_risk(&conn, &patient_id, as_of).unwrap());
    }

    #[test]
    fn risk_over_75_is_unconditional() {
        let conn = test_db();
        let patient_id = make_patient(&conn, Some(ymd(1940, 1, 1)));
        assert!(is_patient_at_risk(&conn, &patient_id, ymd(2020, 6, 1)).unwrap());
    }

    #[test]
    fn risk_without_birth_date_is_missing_data() {
        let conn = test_db();
        let patient_id = make_patient(&conn, None);
        assert!(matches!(
            is_patient_at_risk(&conn, &patient_id, ymd(2020, 6, 1)),
            Err(DatabaseError::Derived(DerivedError::MissingData { .. }))
        ));
    }

    #[test]
    fn risk_for_unknown_patient_is_not_found() {
        let conn = test_db();
        assert!(matches!(
            is_patient_at_risk(&conn, &Uuid::new_v4(), ymd(2020, 6, 1)),
            Err(DatabaseError::NotFound { .. })
        ));
    }

    #[test]
    fn deleting_condition_cascades_active_conditions() {
        let conn = test_db();
        let patient_id = make_patient(&conn, Some(ymd(1950, 1, 1)));
        let condition_id = make_condition(&conn, "Asthma");
        let ac = make_active_condition(&conn, condition_id);
        add_patient_active_condition(&conn, &patient_id, &ac).unwrap();

        delete_condition(&conn, &condition_id).unwrap();

        assert!(get_active_condition(&conn, &ac).unwrap().is_none());
        assert_eq!(count_active_conditions(&conn, &patient_id).unwrap(), 0);
    }

    #[test]
    fn deleting_patient_cascades_appointments() {
        let conn = test_db();
        let patient_id = make_patient(&conn, None);
        let appt_id = Uuid::new_v4();
        insert_appointment(
            &conn,
            &Appointment {
                id: appt_id,
                provider_id: None,
                patient_id,
                date: Some(ymd(2021, 2, 3)),
                time: NaiveTime::from_hms_opt(9, 30, 0),
            },
        )
        .unwrap();

        delete_patient(&conn, &patient_id).unwrap();
        assert!(get_appointment(&conn, &appt_id).unwrap().is_none());
    }

    #[test]
    fn appointment_requires_existing_patient() {
        let conn = test_db();
        let result = insert_appointment(
            &conn,
            &Appointment {
                id: Uuid::new_v4(),
                provider_id: None,
                patient_id: Uuid::new_v4(),
                date: None,
                time: None,
            },
        );
        assert!(result.is_err());
    }

    #[test]
    fn appointments_listed_in_date_order() {
        let conn = test_db();
        let patient_id = make_patient(&conn, None);
        for (day, hour) in [(20, 14), (5, 9), (5, 8)] {
            insert_appointment(
                &conn,
                &Appointment {
                    id: Uuid::new_v4(),
                    provider_id: None,
                    patient_id,
                    date: Some(ymd(2021, 7, day)),
                    time: NaiveTime::from_hms_opt(hour, 0, 0),
                },
            )
            .unwrap();
        }

        let appts = list_appointments_for_patient(&conn, &patient_id).unwrap();
        let order: Vec<_> = appts
            .iter()
            .map(|a| (a.date.unwrap().day(), a.time.unwrap().hour()))
            .collect();
        assert_eq!(order, vec![(5, 8), (5, 9), (20, 14)]);
    }

    #[test]
    fn employee_number_is_unique() {
        let conn = test_db();
        let provider = HealthcareProvider {
            id: Uuid::new_v4(),
            employee_number: 4211,
            title: "Dr.".into(),
            first_name: Some("Amara".into()),
            last_name: Some("Osei".into()),
        };
        insert_provider(&conn, &provider).unwrap();

        let duplicate = HealthcareProvider {
            id: Uuid::new_v4(),
            ..provider.clone()
        };
        assert!(matches!(
            insert_provider(&conn, &duplicate),
            Err(DatabaseError::ConstraintViolation(_))
        ));

        let found = get_provider_by_employee_number(&conn, 4211).unwrap().unwrap();
        assert_eq!(found.display_name(), "4211 -- Dr. Amara Osei");
        assert!(get_provider_by_employee_number(&conn, 9999).unwrap().is_none());

        // A duplicate primary key is not an employee-number collision
        let same_id = HealthcareProvider {
            employee_number: 8822,
            ..provider
        };
        assert!(matches!(
            insert_provider(&conn, &same_id),
            Err(DatabaseError::Sqlite(_))
        ));
    }

    #[test]
    fn conflicting_medications_checks_both_sides() {
        let conn = test_db();
        let patient_id = make_patient(&conn, None);
        let warfarin = make_treatment(&conn, "Warfarin", false);
        let aspirin = make_treatment(&conn, "Aspirin", false);
        let ibuprofen = make_treatment(&conn, "Ibuprofen", false);
        let ulcer = make_condition(&conn, "Peptic ulcer");

        // Warfarin is the subject; aspirin is the conflicting treatment
        insert_incompatibility(
            &conn,
            &Incompatibility {
                id: Uuid::new_v4(),
                treatment_id: warfarin,
                conflicting_treatment_id: aspirin,
                conflicting_condition_id: ulcer,
            },
        )
        .unwrap();

        // Patient takes aspirin (conflicting side) and ibuprofen (unrelated)
        add_patient_medication(&conn, &patient_id, &aspirin).unwrap();
        add_patient_medication(&conn, &patient_id, &ibuprofen).unwrap();

        let conflicts = conflicting_medications(&conn, &patient_id).unwrap();
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].name, "Aspirin");

        // Now also the subject side
        add_patient_medication(&conn, &patient_id, &warfarin).unwrap();
        let conflicts = conflicting_medications(&conn, &patient_id).unwrap();
        let names: Vec<_> = conflicts.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Aspirin", "Warfarin"]);
    }

    #[test]
    fn incompatibility_cascades_with_its_referents() {
        let conn = test_db();
        let a = make_treatment(&conn, "A", false);
        let b = make_treatment(&conn, "B", false);
        let c = make_condition(&conn, "C");
        let inc_id = Uuid::new_v4();
        insert_incompatibility(
            &conn,
            &Incompatibility {
                id: inc_id,
                treatment_id: a,
                conflicting_treatment_id: b,
                conflicting_condition_id: c,
            },
        )
        .unwrap();

        delete_treatment(&conn, &b).unwrap();
        assert!(get_incompatibility(&conn, &inc_id).unwrap().is_none());
    }

    #[test]
    fn new_treatments_filter_for_condition() {
        let conn = test_db();
        let condition_id = make_condition(&conn, "Migraine");
        let established = make_treatment(&conn, "Sumatriptan", false);
        let novel = make_treatment(&conn, "Rimegepant", true);
        add_condition_treatment(&conn, &condition_id, &established).unwrap();
        add_condition_treatment(&conn, &condition_id, &novel).unwrap();

        assert_eq!(get_condition_treatments(&conn, &condition_id).unwrap().len(), 2);

        let new = new_treatments_for_condition(&conn, &condition_id).unwrap();
        assert_eq!(new.len(), 1);
        assert_eq!(new[0].name, "Rimegepant");

        remove_condition_treatment(&conn, &condition_id, &novel).unwrap();
        assert_eq!(get_condition_treatments(&conn, &condition_id).unwrap().len(), 1);
        assert!(new_treatments_for_condition(&conn, &condition_id).unwrap().is_empty());
    }

    #[test]
    fn condition_side_effects_can_be_unlinked() {
        let conn = test_db();
        let condition_id = make_condition(&conn, "Gout");
        let se_id = Uuid::new_v4();
        insert_side_effect(&conn, &SideEffect { id: se_id, effect: "Flushing".into() }).unwrap();

        add_condition_side_effect(&conn, &condition_id, &se_id).unwrap();
        assert_eq!(get_condition_side_effects(&conn, &condition_id).unwrap().len(), 1);

        remove_condition_side_effect(&conn, &condition_id, &se_id).unwrap();
        assert!(get_condition_side_effects(&conn, &condition_id).unwrap().is_empty());
        // the side effect itself survives the unlink
        assert!(get_side_effect(&conn, &se_id).unwrap().is_some());
    }

    #[test]
    fn first_treatment_for_active_condition_is_optional() {
        let conn = test_db();
        let condition_id = make_condition(&conn, "Eczema");
        let ac = make_active_condition(&conn, condition_id);
        assert!(first_treatment_for_active_condition(&conn, &ac).unwrap().is_none());

        let treatment = make_treatment(&conn, "Hydrocortisone", false);
        add_active_condition_treatment(&conn, &ac, &treatment).unwrap();
        let first = first_treatment_for_active_condition(&conn, &ac).unwrap().unwrap();
        assert_eq!(first.name, "Hydrocortisone");

        remove_active_condition_treatment(&conn, &ac, &treatment).unwrap();
        assert!(first_treatment_for_active_condition(&conn, &ac).unwrap().is_none());
    }

    #[test]
    fn side_effect_membership_is_unique() {
        let conn = test_db();
        let treatment = make_treatment(&conn, "Prednisone", false);
        let se_id = Uuid::new_v4();
        insert_side_effect(&conn, &SideEffect { id: se_id, effect: "Insomnia".into() }).unwrap();

        add_treatment_side_effect(&conn, &treatment, &se_id).unwrap();
        add_treatment_side_effect(&conn, &treatment, &se_id).unwrap();

        let effects = get_treatment_side_effects(&conn, &treatment).unwrap();
        assert_eq!(effects.len(), 1);
        assert_eq!(effects[0].effect, "Insomnia");

        remove_treatment_side_effect(&conn, &treatment, &se_id).unwrap();
        assert!(get_treatment_side_effects(&conn, &treatment).unwrap().is_empty());
    }

    #[test]
    fn family_history_spans_patient_and_conditions() {
        let conn = test_db();
        let patient_id = make_patient(&conn, None);
        let diabetes = make_condition(&conn, "Type 2 diabetes");

        let entry_id = Uuid::new_v4();
        insert_family_history_entry(
            &conn,
            &FamilyHistoryEntry { id: entry_id, family_member: FamilyMember::Mother },
        )
        .unwrap();
        add_family_history_condition(&conn, &entry_id, &diabetes).unwrap();
        add_patient_family_history(&conn, &patient_id, &entry_id).unwrap();

        let history = get_patient_family_history(&conn, &patient_id).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].family_member, FamilyMember::Mother);

        let conditions = get_family_history_conditions(&conn, &entry_id).unwrap();
        assert_eq!(conditions.len(), 1);
        assert_eq!(conditions[0].name, "Type 2 diabetes");

        remove_family_history_condition(&conn, &entry_id, &diabetes).unwrap();
        assert!(get_family_history_conditions(&conn, &entry_id).unwrap().is_empty());

        remove_patient_family_history(&conn, &patient_id, &entry_id).unwrap();
        assert!(get_patient_family_history(&conn, &patient_id).unwrap().is_empty());
        // the entry itself survives the unlink
        assert!(get_family_history_entry(&conn, &entry_id).unwrap().is_some());
    }

    #[test]
    fn active_condition_requires_existing_condition() {
        let conn = test_db();
        let result = insert_active_condition(
            &conn,
            &ActiveCondition {
                id: Uuid::new_v4(),
                condition_id: Uuid::new_v4(),
                diagnosis_date: None,
                treatment_start_date: None,
                treatment_renewal_date: None,
            },
        );
        assert!(result.is_err());
    }
}
