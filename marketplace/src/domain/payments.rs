//! Payments between employers and students.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{JobId, SubjectId};

/// Settlement state of a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentStatus {
    /// Initiated, not yet settled.
    Pending,
    /// Settled.
    Completed,
    /// Settlement failed.
    Failed,
    /// Returned to the payer.
    Refunded,
}

/// One payment record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    /// Payment identifier.
    pub id: String,
    /// Listing the payment is for, when linked.
    #[serde(default)]
    pub job_id: Option<JobId>,
    /// Paying employer.
    pub payer_id: SubjectId,
    /// Paid student.
    pub payee_id: SubjectId,
    /// Amount in whole currency units.
    pub amount: u64,
    /// Settlement state.
    pub status: PaymentStatus,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// Sum of every payment amount.
pub fn total_amount(payments: &[Payment]) -> u64 {
    payments
        .iter()
        .fold(0_u64, |total, payment| total.saturating_add(payment.amount))
}

/// Sum of completed payment amounts only.
pub fn completed_amount(payments: &[Payment]) -> u64 {
    payments
        .iter()
        .filter(|payment| payment.status == PaymentStatus::Completed)
        .fold(0_u64, |total, payment| total.saturating_add(payment.amount))
}
