mod common;

use audit_engine::{AuditActionType, AuditQuery};
use billing_service::PaymentStatus;
use clinic_store::{seed, PatientStatus, PatientUpdate, StoreError};
use common::*;
use error_common::{Categorized, ErrorCategory};
use rust_decimal::Decimal;
use scheduling_service::CareType;

fn dec(value: i64) -> Decimal {
    Decimal::from(value)
}

#[test]
fn test_register_logs_creation_with_doctor_name() {
    let mut clinic = demo_clinic();
    let id = register_patient(&mut clinic, "Lina Haddad");

    let patient = clinic.patient(id).unwrap();
    assert_eq!(patient.status, PatientStatus::New);
    assert!(patient.status_history.is_empty());
    assert!(!patient.care_total_locked);

    let latest = clinic.audit_log()[0];
    assert_eq!(latest.action_type, AuditActionType::PatientCreated);
    assert_eq!(latest.patient_id, Some(id));
    assert!(latest.details.contains("Dr. Ahmed Benali"));
}

#[test]
fn test_register_requires_known_doctor_and_name() {
    let mut clinic = demo_clinic();
    let audit_before = clinic.audit_trail().len();

    let err = clinic
        .add_patient(
            clinic_store::NewPatient {
                name: "  ".to_string(),
                phone: "0550001122".to_string(),
                doctor_id: seed::ids::DOCTOR_BENALI,
                notification_consent: Default::default(),
            },
            &receptionist(),
        )
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Validation);

    let err = clinic
        .add_patient(
            clinic_store::NewPatient {
                name: "Lina Haddad".to_string(),
                phone: "0550001122".to_string(),
                doctor_id: uuid::Uuid::new_v4(),
                notification_consent: Default::default(),
            },
            &receptionist(),
        )
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::NotFound);
    assert_eq!(clinic.audit_trail().len(), audit_before);
}

#[test]
fn test_care_assignment_starts_treatment_and_locks_total() {
    let mut clinic = demo_clinic();
    let id = register_patient(&mut clinic, "Lina Haddad");

    clinic
        .set_care_type(id, CareType::Crown, dec(30000), &doctor())
        .unwrap();

    let patient = clinic.patient(id).unwrap();
    assert_eq!(patient.status, PatientStatus::InTreatment);
    assert_eq!(patient.care_type, Some(CareType::Crown));
    assert!(patient.care_total_locked);
    assert_eq!(patient.status_history.len(), 1);
    assert_eq!(clinic.audit_log()[0].action_type, AuditActionType::CareAssigned);

    let err = clinic
        .set_care_type(id, CareType::Bridge, dec(50000), &doctor())
        .unwrap_err();
    assert!(matches!(err, StoreError::CareAlreadyLocked));
    assert_eq!(clinic.patient(id).unwrap().care_total, dec(30000));
}

#[test]
fn test_care_total_must_be_positive() {
    let mut clinic = demo_clinic();
    let id = register_patient(&mut clinic, "Lina Haddad");

    let err = clinic
        .set_care_type(id, CareType::Crown, Decimal::ZERO, &doctor())
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Validation);
    assert_eq!(clinic.patient(id).unwrap().status, PatientStatus::New);
}

#[test]
fn test_fully_paid_patient_completes_with_single_entry() {
    let mut clinic = demo_clinic();
    let id = register_patient(&mut clinic, "Lina Haddad");
    clinic
        .set_care_type(id, CareType::DentalImplant, dec(80000), &doctor())
        .unwrap();
    clinic.add_payment(id, dec(50000), &receptionist()).unwrap();
    clinic.add_payment(id, dec(30000), &receptionist()).unwrap();

    let audit_before = clinic.audit_trail().len();
    clinic.mark_completed(id, &receptionist(), false).unwrap();

    assert_eq!(clinic.patient(id).unwrap().status, PatientStatus::Completed);
    assert_eq!(clinic.audit_trail().len(), audit_before + 1);
    assert_eq!(clinic.audit_log()[0].action_type, AuditActionType::StatusChanged);
}

#[test]
fn test_outstanding_balance_blocks_completion() {
    let mut clinic = demo_clinic();
    let id = register_patient(&mut clinic, "Lina Haddad");
    clinic
        .set_care_type(id, CareType::DentalImplant, dec(80000), &doctor())
        .unwrap();
    clinic.add_payment(id, dec(60000), &receptionist()).unwrap();

    let audit_before = clinic.audit_trail().len();
    let err = clinic.mark_completed(id, &receptionist(), false).unwrap_err();

    assert!(matches!(err, StoreError::BalanceOutstanding { remaining, .. } if remaining == dec(20000)));
    assert!(err.to_string().contains("20000"));
    assert_eq!(err.category(), ErrorCategory::Precondition);
    assert_eq!(clinic.patient(id).unwrap().status, PatientStatus::InTreatment);
    assert_eq!(clinic.audit_trail().len(), audit_before);
}

#[test]
fn test_owner_override_completes_and_records_waived_balance() {
    let mut clinic = demo_clinic();
    let id = register_patient(&mut clinic, "Lina Haddad");
    clinic
        .set_care_type(id, CareType::DentalImplant, dec(80000), &doctor())
        .unwrap();
    clinic.add_payment(id, dec(60000), &receptionist()).unwrap();

    clinic.mark_completed(id, &owner(), true).unwrap();

    assert_eq!(clinic.patient(id).unwrap().status, PatientStatus::Completed);
    let log = clinic.audit_log();
    assert_eq!(log[0].action_type, AuditActionType::CompletedOverride);
    assert!(log[0].details.contains("20000"));
    assert_eq!(log[1].action_type, AuditActionType::StatusChanged);
}

#[test]
fn test_new_patient_cannot_complete_even_with_override() {
    let mut clinic = demo_clinic();
    let id = register_patient(&mut clinic, "Lina Haddad");

    let err = clinic.mark_completed(id, &owner(), true).unwrap_err();
    assert!(matches!(err, StoreError::NoCareSelected));
    assert_eq!(clinic.patient(id).unwrap().status, PatientStatus::New);
}

#[test]
fn test_payment_validation() {
    let mut clinic = demo_clinic();
    let id = seed::ids::PATIENT_KADI;
    let audit_before = clinic.audit_trail().len();

    assert!(clinic.add_payment(id, Decimal::ZERO, &receptionist()).is_err());
    assert!(clinic.add_payment(id, dec(-100), &receptionist()).is_err());
    // 80000 agreed, 40000 paid
    let err = clinic.add_payment(id, dec(40001), &receptionist()).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Validation);
    assert_eq!(clinic.audit_trail().len(), audit_before);

    let payment = clinic.add_payment(id, dec(40000), &receptionist()).unwrap();
    assert_eq!(payment.recorded_by, seed::ids::RECEPTIONIST_AMRANI);

    let balance = clinic.patient_balance(id).unwrap();
    assert_eq!(balance.remaining, Decimal::ZERO);
    assert_eq!(balance.status, PaymentStatus::Paid);
    assert_eq!(balance.paid_percentage, 100);
    assert_eq!(clinic.audit_log()[0].action_type, AuditActionType::PaymentAdded);
}

#[test]
fn test_ceiling_can_be_disabled() {
    let mut config = test_config(true);
    config.enforce_payment_ceiling = false;
    let mut clinic =
        clinic_store::ClinicService::open(config, Box::new(clinic_store::MemoryStore::new())).unwrap();

    clinic
        .add_payment(seed::ids::PATIENT_HAMIDI, dec(50000), &receptionist())
        .unwrap();
    let balance = clinic.patient_balance(seed::ids::PATIENT_HAMIDI).unwrap();
    assert_eq!(balance.remaining, Decimal::ZERO);
}

#[test]
fn test_uncapped_payments_stop_before_overflow() {
    let mut config = test_config(true);
    config.enforce_payment_ceiling = false;
    let mut clinic =
        clinic_store::ClinicService::open(config, Box::new(clinic_store::MemoryStore::new())).unwrap();
    let id = seed::ids::PATIENT_HAMIDI;

    clinic.add_payment(id, Decimal::MAX, &receptionist()).unwrap();
    let audit_before = clinic.audit_trail().len();

    let err = clinic.add_payment(id, Decimal::MAX, &receptionist()).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Validation);
    assert_eq!(err.code(), error_common::codes::validation::AMOUNT_OUT_OF_RANGE);
    assert_eq!(clinic.audit_trail().len(), audit_before);

    let balance = clinic.patient_balance(id).unwrap();
    assert_eq!(balance.status, PaymentStatus::Paid);
    assert_eq!(balance.remaining, Decimal::ZERO);
    clinic.mark_completed(id, &receptionist(), false).unwrap();
    assert!(clinic.revenue_report().total_revenue > Decimal::ZERO);
}

#[test]
fn test_status_change_appends_history_and_audit() {
    let mut clinic = demo_clinic();
    let id = seed::ids::PATIENT_HAMIDI;
    let history_before = clinic.patient(id).unwrap().status_history.len();

    clinic
        .update_patient_status(
            id,
            PatientStatus::NoShow,
            &receptionist(),
            Some("Did not come".to_string()),
        )
        .unwrap();

    let patient = clinic.patient(id).unwrap();
    assert_eq!(patient.status, PatientStatus::NoShow);
    assert_eq!(patient.status_history.len(), history_before + 1);
    let last = patient.status_history.last().unwrap();
    assert_eq!(last.previous_status, PatientStatus::InTreatment);
    assert_eq!(last.reason.as_deref(), Some("Did not come"));

    let entry = clinic.audit_log()[0];
    assert_eq!(entry.action_type, AuditActionType::StatusChanged);
    assert!(entry.details.contains("Did not come"));
}

#[test]
fn test_soft_delete_and_restore() {
    let mut clinic = demo_clinic();
    let id = seed::ids::PATIENT_BOUZID;

    clinic.soft_delete_patient(id, &receptionist()).unwrap();
    assert!(clinic.active_patients().iter().all(|p| p.id != id));
    assert!(clinic
        .patients_by_doctor(seed::ids::DOCTOR_BENALI)
        .iter()
        .all(|p| p.id != id));
    assert_eq!(clinic.deleted_patients().len(), 1);
    assert!(clinic.patient(id).is_some());

    let err = clinic.soft_delete_patient(id, &receptionist()).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Precondition);

    clinic.restore_patient(id, &owner()).unwrap();
    assert!(clinic.active_patients().iter().any(|p| p.id == id));
    assert_eq!(clinic.audit_log()[0].action_type, AuditActionType::PatientRestored);
}

#[test]
fn test_medical_notes_stay_out_of_the_audit_log() {
    let mut clinic = demo_clinic();
    let id = seed::ids::PATIENT_HAMIDI;

    clinic
        .update_medical_notes(id, "Allergic to penicillin".to_string(), &doctor())
        .unwrap();

    assert_eq!(clinic.patient(id).unwrap().medical_notes, "Allergic to penicillin");
    let hits = AuditQuery::new().text("penicillin").execute(clinic.audit_trail());
    assert!(hits.is_empty());
    assert_eq!(clinic.audit_log()[0].action_type, AuditActionType::PatientUpdated);
}

#[test]
fn test_update_patient_and_doctor_name_resolution() {
    let mut clinic = demo_clinic();
    let id = seed::ids::PATIENT_KADI;
    assert_eq!(clinic.doctor_name_for(id), Some("Dr. Ahmed Benali"));

    let updated = clinic
        .update_patient(
            id,
            PatientUpdate {
                doctor_id: Some(seed::ids::DOCTOR_MANSOURI),
                ..PatientUpdate::default()
            },
            &receptionist(),
        )
        .unwrap();
    assert_eq!(updated.doctor_id, seed::ids::DOCTOR_MANSOURI);
    assert_eq!(clinic.doctor_name_for(id), Some("Dr. Karim Mansouri"));

    clinic.delete_doctor(seed::ids::DOCTOR_MANSOURI).unwrap();
    assert_eq!(clinic.doctor_name_for(id), None);
    assert_eq!(clinic.patient(id).unwrap().doctor_id, seed::ids::DOCTOR_MANSOURI);
}

#[test]
fn test_getters_filter_deleted_patients() {
    let mut clinic = demo_clinic();
    assert_eq!(clinic.patients_by_status(PatientStatus::InTreatment).len(), 2);

    clinic
        .soft_delete_patient(seed::ids::PATIENT_HAMIDI, &owner())
        .unwrap();
    assert_eq!(clinic.patients_by_status(PatientStatus::InTreatment).len(), 1);
    assert_eq!(clinic.active_patients().len(), 4);
    assert_eq!(clinic.patients().len(), 5);
}

#[test]
fn test_remaining_is_never_negative() {
    let clinic = demo_clinic();
    for patient in clinic.patients() {
        let balance = patient.balance();
        assert!(balance.remaining >= Decimal::ZERO);
        assert_eq!(
            balance.remaining,
            (patient.care_total - balance.total_paid).max(Decimal::ZERO)
        );
        if patient.care_type.is_some() {
            assert!(patient.care_total_locked);
        }
    }
}

#[test]
fn test_unknown_patient_is_not_found() {
    let mut clinic = demo_clinic();
    let err = clinic
        .add_payment(uuid::Uuid::new_v4(), dec(100), &receptionist())
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound { .. }));
}
