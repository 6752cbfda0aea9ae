use crate::models::Payment;
use crate::payment::{remaining, total_paid};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use uuid::Uuid;

/// Billing-relevant slice of one patient account
#[derive(Debug, Clone, Copy)]
pub struct AccountSnapshot<'a> {
    pub doctor_id: Uuid,
    pub care_total: Decimal,
    pub payments: &'a [Payment],
}

/// Clinic-wide revenue figures
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenueReport {
    pub total_revenue: Decimal,
    pub outstanding: Decimal,
    /// Mean collected amount over accounts with a care total, rounded to a whole unit
    pub average_per_paying_patient: Decimal,
    /// One row per doctor, in order of first appearance
    pub by_doctor: Vec<DoctorRevenue>,
    pub best_doctor: Option<Uuid>,
}

/// Doctor-level revenue
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DoctorRevenue {
    pub doctor_id: Uuid,
    pub patient_count: usize,
    pub revenue: Decimal,
}

/// Billing reports
#[derive(Debug, Clone, Copy, Default)]
pub struct BillingReports;

impl BillingReports {
    pub fn new() -> Self {
        Self
    }

    /// Generate revenue report over the given accounts
    pub fn revenue_report(&self, accounts: &[AccountSnapshot<'_>]) -> RevenueReport {
        let mut total_revenue = Decimal::ZERO;
        let mut outstanding = Decimal::ZERO;
        let mut paying_revenue = Decimal::ZERO;
        let mut paying_count: i64 = 0;
        let mut by_doctor: Vec<DoctorRevenue> = Vec::new();

        for account in accounts {
            let paid = total_paid(account.payments);
            total_revenue = total_revenue.saturating_add(paid);
            let owed = remaining(account.care_total, account.payments);
            outstanding = outstanding.saturating_add(owed);

            if account.care_total > Decimal::ZERO {
                paying_revenue = paying_revenue.saturating_add(paid);
                paying_count += 1;
            }

            match by_doctor.iter_mut().find(|row| row.doctor_id == account.doctor_id) {
                Some(row) => {
                    row.revenue = row.revenue.saturating_add(paid);
                    row.patient_count += 1;
                }
                None => by_doctor.push(DoctorRevenue {
                    doctor_id: account.doctor_id,
                    patient_count: 1,
                    revenue: paid,
                }),
            }
        }

        let average_per_paying_patient = if paying_count == 0 {
            Decimal::ZERO
        } else {
            (paying_revenue / Decimal::from(paying_count))
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        };

        // Ties go to the doctor listed first
        let best_doctor = by_doctor
            .iter()
            .fold(None::<&DoctorRevenue>, |best, row| match best {
                Some(current) if row.revenue <= current.revenue => Some(current),
                _ => Some(row),
            })
            .map(|row| row.doctor_id);

        tracing::debug!(
            accounts = accounts.len(),
            total_revenue = %total_revenue,
            outstanding = %outstanding,
            "Revenue report generated"
        );

        RevenueReport {
            total_revenue,
            outstanding,
            average_per_paying_patient,
            by_doctor,
            best_doctor,
        }
    }
}
