// Patient status rules: care assignment and treatment completion
use crate::error::{StoreError, StoreResult};
use crate::models::{Actor, Patient, PatientStatus};
use rust_decimal::Decimal;

/// What a permitted completion has to record besides the status change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionPlan {
    /// Balance waived by an owner override, if any
    pub waived_balance: Option<Decimal>,
}

/// Decide whether `actor` may mark `patient` as completed.
///
/// A patient still in `NEW` has no care assigned and can never be completed.
/// An outstanding balance blocks completion unless the actor is the owner
/// and explicitly asks for an override.
pub fn check_completion(
    patient: &Patient,
    actor: &Actor,
    force_override: bool,
    currency: &str,
) -> StoreResult<CompletionPlan> {
    if patient.status == PatientStatus::New {
        return Err(StoreError::NoCareSelected);
    }

    let remaining = patient.remaining();
    if remaining.is_zero() {
        return Ok(CompletionPlan { waived_balance: None });
    }

    if actor.is_owner() && force_override {
        Ok(CompletionPlan {
            waived_balance: Some(remaining),
        })
    } else {
        Err(StoreError::BalanceOutstanding {
            remaining,
            currency: currency.to_string(),
        })
    }
}

/// Care can be assigned once, with a strictly positive total
pub fn check_care_assignment(patient: &Patient, total: Decimal) -> StoreResult<()> {
    billing_service::validate_care_total(total)?;

    if patient.care_total_locked {
        return Err(StoreError::CareAlreadyLocked);
    }

    Ok(())
}
