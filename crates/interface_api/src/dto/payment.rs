//! Payment ledger DTOs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::{Currency, Money};
use domain_payment::reminders::due_soon;
use domain_payment::{
    Installment, InstallmentSchedule, PaymentError, PaymentRecord, PaymentReminder,
    PaymentSummary, PaymentType, PlanInterval,
};

/// Upper bound on generated installment counts
const MAX_SPLIT_COUNT: u32 = 120;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallmentRequest {
    pub amount: Decimal,
    pub due_date: NaiveDate,
    /// Marks the installment as already paid on this date
    #[serde(default)]
    pub paid_date: Option<NaiveDate>,
}

/// Generates evenly split installments instead of listing them
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitRequest {
    pub count: u32,
    pub first_due_date: NaiveDate,
    pub interval: PlanInterval,
}

/// A payment plan as submitted by the add/edit forms
///
/// Either `installments` or `split` describes the plan; `split` wins when
/// both are given.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentPlanRequest {
    pub total_amount: Decimal,
    #[serde(default)]
    pub currency: Currency,
    pub payment_type: PaymentType,
    #[serde(default)]
    pub plan: Option<String>,
    #[serde(default)]
    pub installments: Vec<InstallmentRequest>,
    #[serde(default)]
    pub split: Option<SplitRequest>,
}

impl PaymentPlanRequest {
    pub fn into_record(self) -> Result<PaymentRecord, PaymentError> {
        let total = Money::new(self.total_amount, self.currency);

        if let Some(split) = self.split {
            if split.count > MAX_SPLIT_COUNT {
                return Err(PaymentError::validation(format!(
                    "At most {} installments can be generated",
                    MAX_SPLIT_COUNT
                )));
            }
            let mut record = InstallmentSchedule::equal_split(total, split.count, split.first_due_date, split.interval)?
                .into_record(self.payment_type)?;
            if let Some(plan) = self.plan.filter(|p| !p.trim().is_empty()) {
                record.plan = plan;
            }
            return Ok(record);
        }

        let installments: Vec<Installment> = self
            .installments
            .iter()
            .map(|i| {
                let amount = Money::new(i.amount, self.currency);
                match i.paid_date {
                    Some(paid) => Installment::paid(amount, i.due_date, paid),
                    None => Installment::pending(amount, i.due_date),
                }
            })
            .collect();
        let plan = self
            .plan
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| default_plan_label(installments.len()));

        PaymentRecord::create(total, self.payment_type, plan, installments)
    }
}

fn default_plan_label(count: usize) -> String {
    match count {
        1 => "One-time Payment".to_string(),
        n => format!("{} Installments", n),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallmentInput {
    pub amount: Decimal,
    pub due_date: NaiveDate,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarkPaidRequest {
    /// Defaults to today
    #[serde(default)]
    pub paid_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct InstallmentProofRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 2048))]
    pub file_handle: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProofRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 2048))]
    pub file_handle: String,
    /// Defaults to today
    #[serde(default)]
    pub upload_date: Option<NaiveDate>,
}

/// A payment record as of today, with its derived values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentResponse {
    pub record: PaymentRecord,
    pub summary: PaymentSummary,
    pub reminders: Vec<PaymentReminder>,
}

impl PaymentResponse {
    pub fn new(mut record: PaymentRecord, today: NaiveDate, window_days: u32) -> Self {
        record.refresh_overdue(today);
        let summary = record.summary(today);
        let reminders = due_soon(&record, today, window_days);
        Self {
            record,
            summary,
            reminders,
        }
    }
}
