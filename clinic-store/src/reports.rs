// Owner dashboard figures
use crate::models::PatientStatus;
use crate::service::ClinicService;
use billing_service::{AccountSnapshot, BillingReports, RevenueReport};
use chrono::{Datelike, Local, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DoctorRevenueLine {
    pub doctor_id: Uuid,
    /// `None` when the doctor account has been deleted
    pub doctor_name: Option<String>,
    pub patient_count: usize,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: PatientStatus,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NoShowStats {
    pub count: usize,
    /// Sum of the care totals of no-show patients
    pub estimated_loss: Decimal,
    /// Share of active patients, in percent with one decimal
    pub rate_percent: Decimal,
}

/// Aggregates over active (not soft-deleted) patients
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub active_patients: usize,
    pub total_revenue: Decimal,
    pub outstanding: Decimal,
    pub average_revenue_per_paying_patient: Decimal,
    pub revenue_by_doctor: Vec<DoctorRevenueLine>,
    pub best_doctor: Option<DoctorRevenueLine>,
    pub status_distribution: Vec<StatusCount>,
    pub no_show: NoShowStats,
    /// Appointments in the calendar month of the reference date
    pub appointments_this_month: usize,
}

impl ClinicService {
    pub fn revenue_report(&self) -> RevenueReport {
        let accounts: Vec<AccountSnapshot<'_>> = self
            .patients
            .iter()
            .filter(|p| p.is_active())
            .map(|p| AccountSnapshot {
                doctor_id: p.doctor_id,
                care_total: p.care_total,
                payments: &p.payments,
            })
            .collect();

        BillingReports::new().revenue_report(&accounts)
    }

    /// Dashboard figures with `today` deciding the current month
    pub fn dashboard_summary_at(&self, today: NaiveDate) -> DashboardSummary {
        let active: Vec<_> = self.patients.iter().filter(|p| p.is_active()).collect();
        let revenue = self.revenue_report();

        let revenue_by_doctor: Vec<DoctorRevenueLine> = revenue
            .by_doctor
            .iter()
            .map(|row| DoctorRevenueLine {
                doctor_id: row.doctor_id,
                doctor_name: self.doctor(row.doctor_id).map(|d| d.name.clone()),
                patient_count: row.patient_count,
                revenue: row.revenue,
            })
            .collect();
        let best_doctor = revenue
            .best_doctor
            .and_then(|id| revenue_by_doctor.iter().find(|line| line.doctor_id == id))
            .cloned();

        let status_distribution = PatientStatus::ALL
            .iter()
            .map(|status| StatusCount {
                status: *status,
                count: active.iter().filter(|p| p.status == *status).count(),
            })
            .collect();

        let no_shows: Vec<_> = active
            .iter()
            .filter(|p| p.status == PatientStatus::NoShow)
            .collect();
        let rate_percent = if active.is_empty() {
            Decimal::ZERO
        } else {
            (Decimal::from(no_shows.len()) * Decimal::ONE_HUNDRED / Decimal::from(active.len()))
                .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
        };
        let no_show = NoShowStats {
            count: no_shows.len(),
            estimated_loss: no_shows
                .iter()
                .fold(Decimal::ZERO, |loss, p| loss.saturating_add(p.care_total)),
            rate_percent,
        };

        let appointments_this_month = self
            .appointments
            .iter()
            .filter(|a| a.start.year() == today.year() && a.start.month() == today.month())
            .count();

        DashboardSummary {
            active_patients: active.len(),
            total_revenue: revenue.total_revenue,
            outstanding: revenue.outstanding,
            average_revenue_per_paying_patient: revenue.average_per_paying_patient,
            revenue_by_doctor,
            best_doctor,
            status_distribution,
            no_show,
            appointments_this_month,
        }
    }

    pub fn dashboard_summary(&self) -> DashboardSummary {
        self.dashboard_summary_at(Local::now().date_naive())
    }
}
