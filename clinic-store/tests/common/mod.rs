#![allow(dead_code)]

use audit_engine::ActorRole;
use chrono::{NaiveDate, NaiveDateTime};
use clinic_store::{
    seed, Actor, ClinicConfig, ClinicService, HashingConfig, MemoryStore, NewPatient,
    NotificationConsent,
};
use std::sync::Arc;
use uuid::Uuid;

/// Cheap argon2 parameters so tests do not spend seconds hashing
pub fn test_config(seed_demo_data: bool) -> ClinicConfig {
    ClinicConfig {
        seed_demo_data,
        hashing: HashingConfig {
            memory_kib: 8,
            iterations: 1,
            parallelism: 1,
        },
        ..ClinicConfig::default()
    }
}

pub fn demo_clinic() -> ClinicService {
    ClinicService::open(test_config(true), Box::new(MemoryStore::new())).unwrap()
}

pub fn demo_clinic_with_store() -> (ClinicService, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let clinic = ClinicService::open(test_config(true), Box::new(Arc::clone(&store))).unwrap();
    (clinic, store)
}

pub fn receptionist() -> Actor {
    Actor::new(seed::ids::RECEPTIONIST_AMRANI, "Sarah Amrani", ActorRole::Receptionist)
}

pub fn doctor() -> Actor {
    Actor::new(seed::ids::DOCTOR_BENALI, "Dr. Ahmed Benali", ActorRole::Doctor)
}

pub fn owner() -> Actor {
    Actor::owner(Uuid::from_u128(0x0001), "Clinic Owner")
}

pub fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

pub fn register_patient(clinic: &mut ClinicService, name: &str) -> Uuid {
    clinic
        .add_patient(
            NewPatient {
                name: name.to_string(),
                phone: "0550001122".to_string(),
                doctor_id: seed::ids::DOCTOR_BENALI,
                notification_consent: NotificationConsent::Unasked,
            },
            &receptionist(),
        )
        .unwrap()
        .id
}
