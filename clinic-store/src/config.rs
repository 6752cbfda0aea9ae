// Clinic configuration
use crate::error::{StoreError, StoreResult};
use logger_redacted::LoggerConfig;
use scheduling_service::SchedulingPolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Argon2 cost parameters for staff passwords
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashingConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            memory_kib: argon2::Params::DEFAULT_M_COST,
            iterations: argon2::Params::DEFAULT_T_COST,
            parallelism: argon2::Params::DEFAULT_P_COST,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClinicConfig {
    pub scheduling: SchedulingPolicy,
    /// Label appended to amounts in messages and audit details
    pub currency: String,
    /// Reject payments above the remaining balance
    pub enforce_payment_ceiling: bool,
    /// Populate demo data when no snapshot exists
    pub seed_demo_data: bool,
    /// Default look-ahead for upcoming appointments
    pub upcoming_window_hours: u32,
    /// JSON snapshot location; in-memory only when unset
    pub snapshot_path: Option<PathBuf>,
    pub hashing: HashingConfig,
    pub logging: LoggerConfig,
}

impl Default for ClinicConfig {
    fn default() -> Self {
        Self {
            scheduling: SchedulingPolicy::default(),
            currency: "DA".to_string(),
            enforce_payment_ceiling: true,
            seed_demo_data: true,
            upcoming_window_hours: 24,
            snapshot_path: None,
            hashing: HashingConfig::default(),
            logging: LoggerConfig::default(),
        }
    }
}

impl ClinicConfig {
    /// Read `CLINIC_*` environment variables, falling back to defaults for
    /// anything missing or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let scheduling = SchedulingPolicy {
            open_hour: env_or("CLINIC_OPEN_HOUR", defaults.scheduling.open_hour),
            close_hour: env_or("CLINIC_CLOSE_HOUR", defaults.scheduling.close_hour),
            slot_interval_minutes: env_or(
                "CLINIC_SLOT_INTERVAL_MINUTES",
                defaults.scheduling.slot_interval_minutes,
            ),
        };

        let hashing = HashingConfig {
            memory_kib: env_or("CLINIC_ARGON2_MEMORY_KIB", defaults.hashing.memory_kib),
            iterations: env_or("CLINIC_ARGON2_ITERATIONS", defaults.hashing.iterations),
            parallelism: env_or("CLINIC_ARGON2_PARALLELISM", defaults.hashing.parallelism),
        };

        Self {
            scheduling,
            currency: std::env::var("CLINIC_CURRENCY").unwrap_or(defaults.currency),
            enforce_payment_ceiling: env_or(
                "CLINIC_ENFORCE_PAYMENT_CEILING",
                defaults.enforce_payment_ceiling,
            ),
            seed_demo_data: env_or("CLINIC_SEED_DEMO_DATA", defaults.seed_demo_data),
            upcoming_window_hours: env_or(
                "CLINIC_UPCOMING_WINDOW_HOURS",
                defaults.upcoming_window_hours,
            ),
            snapshot_path: std::env::var("CLINIC_SNAPSHOT_PATH")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
            hashing,
            logging: LoggerConfig::from_env(),
        }
    }

    pub fn validate(&self) -> StoreResult<()> {
        self.scheduling
            .validate()
            .map_err(|e| StoreError::Config(e.to_string()))?;

        if self.currency.trim().is_empty() {
            return Err(StoreError::Config("currency label must not be empty".to_string()));
        }

        argon2::Params::new(
            self.hashing.memory_kib,
            self.hashing.iterations,
            self.hashing.parallelism,
            None,
        )
        .map_err(|e| StoreError::Config(format!("invalid argon2 parameters: {}", e)))?;

        Ok(())
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
