// Demo data set used on first start and by reset_to_demo
use crate::error::StoreResult;
use crate::models::{NotificationConsent, Patient, PatientStatus, StaffMember, StatusHistoryEntry};
use crate::persistence::ClinicSnapshot;
use crate::staff::CredentialHasher;
use audit_engine::{ActorRole, AppendOnlyLog, AuditActionType, AuditTrail, NewAuditEntry};
use billing_service::Payment;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use scheduling_service::{Appointment, AppointmentConfirmation, CareType};
use secrecy::SecretString;
use uuid::Uuid;

/// Stable identifiers of the demo records
pub mod ids {
    use uuid::Uuid;

    pub const DOCTOR_BENALI: Uuid = Uuid::from_u128(0x0d0c_0000_0000_4000_8000_0000_0000_0001);
    pub const DOCTOR_ZERHOUNI: Uuid = Uuid::from_u128(0x0d0c_0000_0000_4000_8000_0000_0000_0002);
    pub const DOCTOR_MANSOURI: Uuid = Uuid::from_u128(0x0d0c_0000_0000_4000_8000_0000_0000_0003);
    pub const RECEPTIONIST_AMRANI: Uuid = Uuid::from_u128(0x0ec0_0000_0000_4000_8000_0000_0000_0001);

    pub const PATIENT_KADI: Uuid = Uuid::from_u128(0x0a70_0000_0000_4000_8000_0000_0000_0001);
    pub const PATIENT_BELKACEM: Uuid = Uuid::from_u128(0x0a70_0000_0000_4000_8000_0000_0000_0002);
    pub const PATIENT_HAMIDI: Uuid = Uuid::from_u128(0x0a70_0000_0000_4000_8000_0000_0000_0003);
    pub const PATIENT_BOUZID: Uuid = Uuid::from_u128(0x0a70_0000_0000_4000_8000_0000_0000_0004);
    pub const PATIENT_MESSAOUDI: Uuid = Uuid::from_u128(0x0a70_0000_0000_4000_8000_0000_0000_0005);

    pub const APPOINTMENT_KADI: Uuid = Uuid::from_u128(0x0a99_0000_0000_4000_8000_0000_0000_0001);
    pub const APPOINTMENT_HAMIDI: Uuid = Uuid::from_u128(0x0a99_0000_0000_4000_8000_0000_0000_0002);
}

/// Password every demo staff account starts with
pub const DEMO_PASSWORD: &str = "123";

fn utc(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .unwrap_or_default()
}

fn local(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(hour, minute, 0))
        .unwrap_or_default()
}

fn transition(
    previous_status: PatientStatus,
    new_status: PatientStatus,
    changed_at: DateTime<Utc>,
    changed_by: Uuid,
    reason: Option<&str>,
) -> StatusHistoryEntry {
    StatusHistoryEntry {
        id: Uuid::new_v4(),
        previous_status,
        new_status,
        changed_at,
        changed_by,
        reason: reason.map(str::to_string),
    }
}

fn payment(amount: i64, date: DateTime<Utc>) -> Payment {
    Payment {
        id: Uuid::new_v4(),
        amount: Decimal::from(amount),
        date,
        recorded_by: ids::RECEPTIONIST_AMRANI,
    }
}

fn staff(
    hasher: &CredentialHasher,
    password: &SecretString,
    id: Uuid,
    name: &str,
    phone: &str,
) -> StoreResult<StaffMember> {
    Ok(StaffMember {
        id,
        name: name.to_string(),
        phone: phone.to_string(),
        password_hash: hasher.hash(password)?,
        created_at: utc(2024, 1, 1),
    })
}

#[allow(clippy::too_many_arguments)]
fn patient(
    id: Uuid,
    name: &str,
    phone: &str,
    doctor_id: Uuid,
    status: PatientStatus,
    history: Vec<StatusHistoryEntry>,
    care: Option<(CareType, i64)>,
    payments: Vec<Payment>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
) -> Patient {
    Patient {
        id,
        name: name.to_string(),
        phone: phone.to_string(),
        doctor_id,
        status,
        status_history: AppendOnlyLog::from(history),
        care_type: care.map(|(care_type, _)| care_type),
        care_total: care.map(|(_, total)| Decimal::from(total)).unwrap_or_default(),
        care_total_locked: care.is_some(),
        payments,
        next_appointment_id: None,
        notification_consent: NotificationConsent::Unasked,
        is_deleted: false,
        medical_notes: String::new(),
        created_at,
        updated_at,
    }
}

fn demo_patients(now: DateTime<Utc>) -> Vec<Patient> {
    use PatientStatus::{Completed, InTreatment, New, NoShow};

    let mut kadi = patient(
        ids::PATIENT_KADI,
        "Mohamed Kadi",
        "0555678901",
        ids::DOCTOR_BENALI,
        InTreatment,
        vec![transition(New, InTreatment, utc(2025, 1, 16), ids::DOCTOR_BENALI, None)],
        Some((CareType::DentalImplant, 80000)),
        vec![payment(20000, utc(2025, 1, 15)), payment(20000, utc(2025, 2, 1))],
        utc(2025, 1, 15),
        utc(2025, 2, 1),
    );
    kadi.next_appointment_id = Some(ids::APPOINTMENT_KADI);
    kadi.notification_consent = NotificationConsent::Granted;
    kadi.medical_notes = "History of diabetes. Regular follow-up recommended.".to_string();

    let mut belkacem = patient(
        ids::PATIENT_BELKACEM,
        "Yasmine Belkacem",
        "0556789012",
        ids::DOCTOR_ZERHOUNI,
        Completed,
        vec![
            transition(New, InTreatment, utc(2025, 1, 21), ids::DOCTOR_ZERHOUNI, None),
            transition(InTreatment, Completed, utc(2025, 2, 5), ids::DOCTOR_ZERHOUNI, None),
        ],
        Some((CareType::Whitening, 25000)),
        vec![payment(25000, utc(2025, 1, 20))],
        utc(2025, 1, 20),
        utc(2025, 2, 5),
    );
    belkacem.notification_consent = NotificationConsent::Granted;

    let mut hamidi = patient(
        ids::PATIENT_HAMIDI,
        "Omar Hamidi",
        "0557890123",
        ids::DOCTOR_MANSOURI,
        InTreatment,
        vec![transition(New, InTreatment, utc(2025, 2, 2), ids::DOCTOR_MANSOURI, None)],
        Some((CareType::Extraction, 15000)),
        vec![payment(5000, utc(2025, 2, 1))],
        utc(2025, 2, 1),
        utc(2025, 2, 2),
    );
    hamidi.next_appointment_id = Some(ids::APPOINTMENT_HAMIDI);

    let bouzid = patient(
        ids::PATIENT_BOUZID,
        "Amina Bouzid",
        "0558901234",
        ids::DOCTOR_BENALI,
        New,
        Vec::new(),
        None,
        Vec::new(),
        now,
        now,
    );

    let mut messaoudi = patient(
        ids::PATIENT_MESSAOUDI,
        "Karim Messaoudi",
        "0559012345",
        ids::DOCTOR_ZERHOUNI,
        NoShow,
        vec![
            transition(New, InTreatment, utc(2025, 1, 25), ids::DOCTOR_ZERHOUNI, None),
            transition(
                InTreatment,
                NoShow,
                utc(2025, 2, 3),
                ids::RECEPTIONIST_AMRANI,
                Some("Patient missed the appointment"),
            ),
        ],
        Some((CareType::Consultation, 5000)),
        Vec::new(),
        utc(2025, 1, 24),
        utc(2025, 2, 3),
    );
    messaoudi.notification_consent = NotificationConsent::Declined;

    vec![kadi, belkacem, hamidi, bouzid, messaoudi]
}

fn demo_appointments() -> Vec<Appointment> {
    vec![
        Appointment {
            id: ids::APPOINTMENT_KADI,
            patient_id: ids::PATIENT_KADI,
            doctor_id: ids::DOCTOR_BENALI,
            start: local(2025, 2, 10, 10, 0),
            duration_minutes: 60,
            care_type: CareType::DentalImplant,
            confirmation: AppointmentConfirmation::Confirmed,
            completed: false,
            notes: None,
        },
        Appointment {
            id: ids::APPOINTMENT_HAMIDI,
            patient_id: ids::PATIENT_HAMIDI,
            doctor_id: ids::DOCTOR_MANSOURI,
            start: local(2025, 2, 8, 14, 30),
            duration_minutes: 30,
            care_type: CareType::Extraction,
            confirmation: AppointmentConfirmation::Pending,
            completed: false,
            notes: None,
        },
    ]
}

fn demo_audit_trail() -> AuditTrail {
    let mut trail = AuditTrail::new();

    trail.record_at(
        NewAuditEntry::new(
            AuditActionType::PatientCreated,
            ActorRole::Receptionist,
            ids::RECEPTIONIST_AMRANI,
            "Sarah Amrani",
            "Patient created and assigned to Dr. Ahmed Benali",
        )
        .with_patient(ids::PATIENT_KADI, "Mohamed Kadi"),
        utc(2025, 1, 15),
    );
    trail.record_at(
        NewAuditEntry::new(
            AuditActionType::PaymentAdded,
            ActorRole::Receptionist,
            ids::RECEPTIONIST_AMRANI,
            "Sarah Amrani",
            "Payment of 20000 DA recorded",
        )
        .with_patient(ids::PATIENT_KADI, "Mohamed Kadi"),
        utc(2025, 1, 15),
    );
    trail.record_at(
        NewAuditEntry::new(
            AuditActionType::CareAssigned,
            ActorRole::Doctor,
            ids::DOCTOR_BENALI,
            "Dr. Ahmed Benali",
            "Care: Dental implant, total 80000 DA",
        )
        .with_patient(ids::PATIENT_KADI, "Mohamed Kadi"),
        utc(2025, 1, 16),
    );
    trail.record_at(
        NewAuditEntry::new(
            AuditActionType::StatusChanged,
            ActorRole::System,
            Uuid::nil(),
            "System",
            "Status: IN_TREATMENT -> NO_SHOW",
        )
        .with_patient(ids::PATIENT_MESSAOUDI, "Karim Messaoudi"),
        utc(2025, 2, 3),
    );

    trail
}

/// Three doctors, one receptionist, five patients, two appointments and a
/// short audit history. Staff passwords are hashed with `hasher`.
pub fn demo_snapshot(hasher: &CredentialHasher) -> StoreResult<ClinicSnapshot> {
    let password = SecretString::new(DEMO_PASSWORD.to_string());

    let doctors = vec![
        staff(hasher, &password, ids::DOCTOR_BENALI, "Dr. Ahmed Benali", "0551234567")?,
        staff(hasher, &password, ids::DOCTOR_ZERHOUNI, "Dr. Fatima Zerhouni", "0552345678")?,
        staff(hasher, &password, ids::DOCTOR_MANSOURI, "Dr. Karim Mansouri", "0553456789")?,
    ];
    let receptionists = vec![staff(
        hasher,
        &password,
        ids::RECEPTIONIST_AMRANI,
        "Sarah Amrani",
        "0554567890",
    )?];

    Ok(ClinicSnapshot {
        patients: demo_patients(Utc::now()),
        doctors,
        receptionists,
        appointments: demo_appointments(),
        audit_logs: demo_audit_trail(),
    })
}
