// Doctor and receptionist accounts
use crate::config::HashingConfig;
use crate::error::{EntityKind, StoreError, StoreResult};
use crate::models::{Actor, Doctor, NewStaffMember, Receptionist, StaffMember, StaffRole, StaffUpdate};
use crate::service::{rejected, ClinicService};
use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};
use chrono::Utc;
use logger_redacted::{redacted_info, redacted_warn};
use secrecy::{ExposeSecret, SecretString};
use uuid::Uuid;

/// Argon2id hashing for staff passwords
#[derive(Debug, Clone)]
pub struct CredentialHasher {
    params: Params,
}

impl CredentialHasher {
    pub fn new(config: &HashingConfig) -> StoreResult<Self> {
        let params = Params::new(config.memory_kib, config.iterations, config.parallelism, None)
            .map_err(|e| StoreError::Config(format!("invalid argon2 parameters: {}", e)))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    pub fn hash(&self, password: &SecretString) -> StoreResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = self
            .argon2()
            .hash_password(password.expose_secret().as_bytes(), &salt)
            .map_err(|e| StoreError::Hashing(e.to_string()))?
            .to_string();
        Ok(password_hash)
    }

    /// False for a wrong password and for an unparsable stored hash
    pub fn verify(&self, password: &SecretString, hash: &str) -> bool {
        let Ok(parsed_hash) = PasswordHash::new(hash) else {
            return false;
        };

        self.argon2()
            .verify_password(password.expose_secret().as_bytes(), &parsed_hash)
            .is_ok()
    }
}

fn validate_new_member(member: &NewStaffMember, existing: &[StaffMember]) -> StoreResult<()> {
    if member.name.trim().is_empty() {
        return Err(StoreError::Validation("name is required".to_string()));
    }
    validate_phone(&member.phone, existing, None)?;
    if member.password.expose_secret().is_empty() {
        return Err(StoreError::Validation("password is required".to_string()));
    }
    Ok(())
}

/// Phones double as login names, so they must be unique per role
fn validate_phone(phone: &str, existing: &[StaffMember], skip_id: Option<Uuid>) -> StoreResult<()> {
    let phone = phone.trim();
    if phone.is_empty() {
        return Err(StoreError::Validation("phone is required".to_string()));
    }
    if existing
        .iter()
        .any(|m| Some(m.id) != skip_id && m.phone == phone)
    {
        return Err(StoreError::Validation("phone number already registered".to_string()));
    }
    Ok(())
}

impl ClinicService {
    fn build_member(&self, member: NewStaffMember, existing: &[StaffMember]) -> StoreResult<StaffMember> {
        validate_new_member(&member, existing)?;

        Ok(StaffMember {
            id: Uuid::new_v4(),
            name: member.name.trim().to_string(),
            phone: member.phone.trim().to_string(),
            password_hash: self.hasher.hash(&member.password)?,
            created_at: Utc::now(),
        })
    }

    pub fn add_doctor(&mut self, member: NewStaffMember) -> StoreResult<Doctor> {
        let doctor = self
            .build_member(member, &self.doctors)
            .map_err(|e| rejected("add_doctor", e))?;

        redacted_info!("Doctor {} added with phone {}", doctor.id, doctor.phone);
        self.doctors.push(doctor.clone());
        self.commit();
        Ok(doctor)
    }

    pub fn update_doctor(&mut self, id: Uuid, update: StaffUpdate) -> StoreResult<Doctor> {
        let index = self
            .doctors
            .iter()
            .position(|d| d.id == id)
            .ok_or_else(|| rejected("update_doctor", StoreError::not_found(EntityKind::Doctor, id)))?;

        if let Some(name) = &update.name {
            if name.trim().is_empty() {
                return Err(rejected(
                    "update_doctor",
                    StoreError::Validation("name is required".to_string()),
                ));
            }
        }
        if let Some(phone) = &update.phone {
            validate_phone(phone, &self.doctors, Some(id)).map_err(|e| rejected("update_doctor", e))?;
        }
        let password_hash = match &update.password {
            Some(password) if password.expose_secret().is_empty() => {
                return Err(rejected(
                    "update_doctor",
                    StoreError::Validation("password is required".to_string()),
                ));
            }
            Some(password) => Some(
                self.hasher
                    .hash(password)
                    .map_err(|e| rejected("update_doctor", e))?,
            ),
            None => None,
        };

        let doctor = &mut self.doctors[index];
        if let Some(name) = update.name {
            doctor.name = name.trim().to_string();
        }
        if let Some(phone) = update.phone {
            doctor.phone = phone.trim().to_string();
        }
        if let Some(password_hash) = password_hash {
            doctor.password_hash = password_hash;
        }
        let updated = doctor.clone();

        tracing::info!(doctor_id = %id, "Doctor updated");
        self.commit();
        Ok(updated)
    }

    /// Remove a doctor account. Patients keep the id; their doctor name
    /// resolves to `None` afterwards.
    pub fn delete_doctor(&mut self, id: Uuid) -> StoreResult<()> {
        let before = self.doctors.len();
        self.doctors.retain(|d| d.id != id);
        if self.doctors.len() == before {
            return Err(rejected("delete_doctor", StoreError::not_found(EntityKind::Doctor, id)));
        }

        tracing::info!(doctor_id = %id, "Doctor deleted");
        self.commit();
        Ok(())
    }

    pub fn add_receptionist(&mut self, member: NewStaffMember) -> StoreResult<Receptionist> {
        let receptionist = self
            .build_member(member, &self.receptionists)
            .map_err(|e| rejected("add_receptionist", e))?;

        redacted_info!(
            "Receptionist {} added with phone {}",
            receptionist.id,
            receptionist.phone
        );
        self.receptionists.push(receptionist.clone());
        self.commit();
        Ok(receptionist)
    }

    pub fn delete_receptionist(&mut self, id: Uuid) -> StoreResult<()> {
        let before = self.receptionists.len();
        self.receptionists.retain(|r| r.id != id);
        if self.receptionists.len() == before {
            return Err(rejected(
                "delete_receptionist",
                StoreError::not_found(EntityKind::Receptionist, id),
            ));
        }

        tracing::info!(receptionist_id = %id, "Receptionist deleted");
        self.commit();
        Ok(())
    }

    pub fn doctors(&self) -> &[Doctor] {
        &self.doctors
    }

    pub fn doctor(&self, id: Uuid) -> Option<&Doctor> {
        self.doctors.iter().find(|d| d.id == id)
    }

    pub fn receptionists(&self) -> &[Receptionist] {
        &self.receptionists
    }

    /// Resolve a staff login to an acting identity
    pub fn verify_staff_credentials(
        &self,
        role: StaffRole,
        phone: &str,
        password: &SecretString,
    ) -> StoreResult<Actor> {
        let accounts = match role {
            StaffRole::Doctor => &self.doctors,
            StaffRole::Receptionist => &self.receptionists,
        };

        let phone = phone.trim();
        let member = accounts
            .iter()
            .find(|m| m.phone == phone)
            .filter(|m| self.hasher.verify(password, &m.password_hash));

        match member {
            Some(member) => {
                tracing::info!(staff_id = %member.id, role = ?role, "Staff credentials verified");
                Ok(Actor::new(member.id, member.name.clone(), role.into()))
            }
            None => {
                redacted_warn!("Rejected {:?} login for phone {}", role, phone);
                Err(StoreError::InvalidCredentials)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_hasher() -> CredentialHasher {
        CredentialHasher::new(&HashingConfig {
            memory_kib: 8,
            iterations: 1,
            parallelism: 1,
        })
        .unwrap()
    }

    #[test]
    fn test_hash_is_salted_and_verifiable() {
        let hasher = fast_hasher();
        let password = SecretString::new("123".to_string());

        let first = hasher.hash(&password).unwrap();
        let second = hasher.hash(&password).unwrap();

        assert!(first.starts_with("$argon2id$"));
        assert_ne!(first, second);
        assert!(hasher.verify(&password, &first));
        assert!(!hasher.verify(&SecretString::new("124".to_string()), &first));
    }

    #[test]
    fn test_garbage_hash_never_verifies() {
        let hasher = fast_hasher();
        assert!(!hasher.verify(&SecretString::new("123".to_string()), "plaintext"));
    }
}
