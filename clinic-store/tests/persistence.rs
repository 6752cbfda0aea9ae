mod common;

use chrono::NaiveDate;
use clinic_store::{
    seed, ClinicService, ClinicSnapshot, JsonFileStore, MemoryStore, PatientStatus, StaffRole,
    StaffUpdate, StoreError,
};
use common::*;
use error_common::{codes, Categorized};
use rust_decimal::Decimal;
use secrecy::SecretString;
use std::fs;

fn password(value: &str) -> SecretString {
    SecretString::new(value.to_string())
}

#[test]
fn test_file_store_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clinic.json");

    let saved = {
        let mut clinic =
            ClinicService::open(test_config(true), Box::new(JsonFileStore::new(&path))).unwrap();
        let id = register_patient(&mut clinic, "Nadia Saidi");
        clinic
            .set_care_type(id, scheduling_service::CareType::Crown, Decimal::from(8000), &doctor())
            .unwrap();
        clinic.add_payment(id, Decimal::from(3000), &receptionist()).unwrap();
        clinic.snapshot()
    };
    assert!(path.exists());

    let reopened =
        ClinicService::open(test_config(true), Box::new(JsonFileStore::new(&path))).unwrap();
    assert_eq!(reopened.snapshot(), saved);
    assert_eq!(reopened.patients().len(), 6);
    assert!(reopened.verify_audit_integrity().is_ok());
}

#[test]
fn test_from_config_uses_snapshot_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data").join("clinic.json");

    let mut config = test_config(true);
    config.snapshot_path = Some(path.clone());
    let clinic = ClinicService::from_config(config).unwrap();

    assert_eq!(clinic.doctors().len(), 3);
    assert!(path.exists());
}

#[test]
fn test_corrupt_snapshot_refuses_to_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clinic.json");
    fs::write(&path, "{\"patients\": [").unwrap();

    let err = ClinicService::open(test_config(true), Box::new(JsonFileStore::new(&path)))
        .err()
        .unwrap();
    assert!(matches!(err, StoreError::Corrupt(_)));
    assert_eq!(err.code(), codes::persistence::SNAPSHOT_CORRUPT);
}

#[test]
fn test_tampered_audit_still_opens() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clinic.json");
    drop(ClinicService::open(test_config(true), Box::new(JsonFileStore::new(&path))).unwrap());

    let contents = fs::read_to_string(&path).unwrap();
    assert!(contents.contains("Payment of 20000 DA recorded"));
    fs::write(
        &path,
        contents.replace("Payment of 20000 DA recorded", "Payment of 2000 DA recorded"),
    )
    .unwrap();

    let clinic =
        ClinicService::open(test_config(true), Box::new(JsonFileStore::new(&path))).unwrap();
    assert!(clinic.verify_audit_integrity().is_err());
}

#[test]
fn test_empty_start_without_demo_data() {
    let clinic = ClinicService::open(test_config(false), Box::new(MemoryStore::new())).unwrap();

    assert!(clinic.patients().is_empty());
    assert!(clinic.doctors().is_empty());
    assert!(clinic.appointments().is_empty());
    assert!(clinic.audit_trail().is_empty());
}

#[test]
fn test_every_mutation_is_persisted() {
    let (mut clinic, store) = demo_clinic_with_store();
    assert!(store.contents().is_some());

    let id = register_patient(&mut clinic, "Nadia Saidi");

    let persisted: ClinicSnapshot = serde_json::from_str(&store.contents().unwrap()).unwrap();
    assert!(persisted.patients.iter().any(|p| p.id == id));
    assert_eq!(persisted, clinic.snapshot());
}

#[test]
fn test_demo_credentials() {
    let clinic = demo_clinic();

    let actor = clinic
        .verify_staff_credentials(StaffRole::Doctor, "0551234567", &password(seed::DEMO_PASSWORD))
        .unwrap();
    assert_eq!(actor.id, seed::ids::DOCTOR_BENALI);

    let err = clinic
        .verify_staff_credentials(StaffRole::Doctor, "0551234567", &password("wrong"))
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidCredentials));

    // a receptionist login does not match doctor accounts
    assert!(clinic
        .verify_staff_credentials(StaffRole::Receptionist, "0551234567", &password("123"))
        .is_err());

    for member in clinic.doctors().iter().chain(clinic.receptionists()) {
        assert!(member.password_hash.starts_with("$argon2id$"));
    }
}

#[test]
fn test_doctor_password_change_rehashes() {
    let mut clinic = demo_clinic();
    let id = seed::ids::DOCTOR_ZERHOUNI;
    let phone = "0552345678";

    let err = clinic
        .update_doctor(
            id,
            StaffUpdate {
                password: Some(password("")),
                ..StaffUpdate::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));

    let updated = clinic
        .update_doctor(
            id,
            StaffUpdate {
                password: Some(password("s3cret")),
                ..StaffUpdate::default()
            },
        )
        .unwrap();
    assert!(updated.password_hash.starts_with("$argon2id$"));

    assert!(clinic
        .verify_staff_credentials(StaffRole::Doctor, phone, &password(seed::DEMO_PASSWORD))
        .is_err());
    let actor = clinic
        .verify_staff_credentials(StaffRole::Doctor, phone, &password("s3cret"))
        .unwrap();
    assert_eq!(actor.id, id);
}

#[test]
fn test_reset_to_demo_discards_changes() {
    let mut clinic = demo_clinic();
    let id = register_patient(&mut clinic, "Nadia Saidi");
    clinic
        .update_patient_status(seed::ids::PATIENT_BOUZID, PatientStatus::Cancelled, &receptionist(), None)
        .unwrap();

    clinic.reset_to_demo().unwrap();

    assert!(clinic.patient(id).is_none());
    assert_eq!(clinic.patients().len(), 5);
    assert_eq!(
        clinic.patient(seed::ids::PATIENT_BOUZID).unwrap().status,
        PatientStatus::New
    );
    assert!(clinic.verify_audit_integrity().is_ok());
}

#[test]
fn test_dashboard_on_demo_data() {
    let clinic = demo_clinic();
    let summary = clinic.dashboard_summary_at(NaiveDate::from_ymd_opt(2025, 2, 15).unwrap());

    assert_eq!(summary.active_patients, 5);
    assert_eq!(summary.total_revenue, Decimal::from(70000));
    assert_eq!(summary.outstanding, Decimal::from(55000));
    assert_eq!(summary.average_revenue_per_paying_patient, Decimal::from(17500));

    let best = summary.best_doctor.unwrap();
    assert_eq!(best.doctor_id, seed::ids::DOCTOR_BENALI);
    assert_eq!(best.revenue, Decimal::from(40000));
    assert_eq!(best.doctor_name.as_deref(), Some("Dr. Ahmed Benali"));

    assert_eq!(summary.no_show.count, 1);
    assert_eq!(summary.no_show.estimated_loss, Decimal::from(5000));
    assert_eq!(summary.no_show.rate_percent, Decimal::new(200, 1));
    assert_eq!(summary.appointments_this_month, 2);

    let in_treatment = summary
        .status_distribution
        .iter()
        .find(|s| s.status == PatientStatus::InTreatment)
        .unwrap();
    assert_eq!(in_treatment.count, 2);
}

#[test]
fn test_start_from_env_defaults_to_demo_in_memory() {
    let clinic = ClinicService::start_from_env().unwrap();

    assert!(clinic.config().snapshot_path.is_none());
    assert_eq!(clinic.doctors().len(), 3);
    assert_eq!(clinic.config().logging.log_level, "info");
}
