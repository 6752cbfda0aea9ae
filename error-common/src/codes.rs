// Stable error codes surfaced alongside user-facing failure messages

pub mod validation {
    pub const INVALID_INPUT: &str = "VALIDATION_1001";
    pub const NON_POSITIVE_AMOUNT: &str = "VALIDATION_1003";
    pub const AMOUNT_EXCEEDS_REMAINING: &str = "VALIDATION_1004";
    pub const INVALID_DURATION: &str = "VALIDATION_1005";
    pub const AMOUNT_OUT_OF_RANGE: &str = "VALIDATION_1006";
}

pub mod precondition {
    pub const NO_CARE_SELECTED: &str = "PRECONDITION_2001";
    pub const BALANCE_OUTSTANDING: &str = "PRECONDITION_2002";
    pub const CARE_ALREADY_LOCKED: &str = "PRECONDITION_2003";
    pub const INVALID_STATE: &str = "PRECONDITION_2004";
}

pub mod conflict {
    pub const OUTSIDE_CLINIC_HOURS: &str = "CONFLICT_3001";
    pub const DOUBLE_BOOKING: &str = "CONFLICT_3002";
}

pub mod not_found {
    pub const PATIENT: &str = "NOT_FOUND_4001";
    pub const APPOINTMENT: &str = "NOT_FOUND_4002";
    pub const DOCTOR: &str = "NOT_FOUND_4003";
    pub const RECEPTIONIST: &str = "NOT_FOUND_4004";
}

pub mod persistence {
    pub const SNAPSHOT_READ_FAILED: &str = "PERSIST_5001";
    pub const SNAPSHOT_WRITE_FAILED: &str = "PERSIST_5002";
    pub const SNAPSHOT_CORRUPT: &str = "PERSIST_5003";
}

pub mod system {
    pub const CONFIGURATION: &str = "SYSTEM_6001";
    pub const CREDENTIAL_HASHING: &str = "SYSTEM_6002";
    pub const AUDIT_INTEGRITY: &str = "SYSTEM_6003";
}
