//! Payment records
//!
//! A `PaymentRecord` is the full payment plan embedded in one subscription or
//! training enrollment: the agreed total, how it is paid, the ordered list of
//! installments and the receipts uploaded against it.
//!
//! Aggregate values (`paid_amount`, `progress`, `status`) are always derived
//! from the installments on demand and never stored.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

use core_kernel::temporal::days_before;
use core_kernel::{Currency, InstallmentId, Money, MoneyError, ProofId};
use crate::error::PaymentError;
use crate::installment::{check_amount, Installment, InstallmentStatus};
use crate::proof::{FileReference, ProofOfPayment};

/// How the customer pays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentType {
    #[default]
    CreditCard,
    BankTransfer,
    #[serde(rename = "paypal")]
    PayPal,
    Cash,
    Check,
}

impl PaymentType {
    pub fn code(&self) -> &'static str {
        match self {
            PaymentType::CreditCard => "credit-card",
            PaymentType::BankTransfer => "bank-transfer",
            PaymentType::PayPal => "paypal",
            PaymentType::Cash => "cash",
            PaymentType::Check => "check",
        }
    }

    /// Human readable label, e.g. "Bank Transfer"
    pub fn label(&self) -> &'static str {
        match self {
            PaymentType::CreditCard => "Credit Card",
            PaymentType::BankTransfer => "Bank Transfer",
            PaymentType::PayPal => "PayPal",
            PaymentType::Cash => "Cash",
            PaymentType::Check => "Check",
        }
    }
}

impl fmt::Display for PaymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for PaymentType {
    type Err = PaymentError;

    /// Accepts both codes ("bank-transfer") and labels ("Bank Transfer")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace([' ', '_'], "-");
        match normalized.as_str() {
            "credit-card" => Ok(PaymentType::CreditCard),
            "bank-transfer" => Ok(PaymentType::BankTransfer),
            "paypal" => Ok(PaymentType::PayPal),
            "cash" => Ok(PaymentType::Cash),
            "check" | "cheque" => Ok(PaymentType::Check),
            _ => Err(PaymentError::validation(format!("Unknown payment type: {}", s))),
        }
    }
}

/// Aggregate payment status of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Every installment is paid
    Paid,
    /// Some, but not all, installments are paid
    Partial,
    /// No installment is paid
    Pending,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PaymentStatus::Paid => "paid",
            PaymentStatus::Partial => "partial",
            PaymentStatus::Pending => "pending",
        };
        f.write_str(s)
    }
}

impl FromStr for PaymentStatus {
    type Err = PaymentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "paid" => Ok(PaymentStatus::Paid),
            "partial" => Ok(PaymentStatus::Partial),
            "pending" => Ok(PaymentStatus::Pending),
            _ => Err(PaymentError::validation(format!("Unknown payment status: {}", s))),
        }
    }
}

/// Rules applied when an installment is marked paid
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentPolicy {
    /// When set, a payment dated more than this many days before the due
    /// date is rejected. `None` accepts any paid date.
    pub early_payment_grace_days: Option<u32>,
}

impl PaymentPolicy {
    pub fn with_grace_days(days: u32) -> Self {
        Self {
            early_payment_grace_days: Some(days),
        }
    }

    fn check_paid_date(&self, installment: &Installment, paid_date: NaiveDate) -> Result<(), PaymentError> {
        let Some(grace) = self.early_payment_grace_days else {
            return Ok(());
        };
        let earliest = days_before(installment.due_date, grace)
            .map_err(|e| PaymentError::validation(e.to_string()))?;
        if paid_date < earliest {
            return Err(PaymentError::validation(format!(
                "Paid date {} is more than {} days before due date {}",
                paid_date, grace, installment.due_date
            )));
        }
        Ok(())
    }
}

/// Snapshot of a record's derived values as of a given day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSummary {
    pub status: PaymentStatus,
    pub total_amount: Money,
    pub paid_amount: Money,
    pub outstanding_amount: Money,
    /// Percentage in `[0, 100]`, rounded to two decimals
    pub progress: Decimal,
    pub paid_count: usize,
    pub pending_count: usize,
    pub overdue_count: usize,
    pub next_due_date: Option<NaiveDate>,
    /// Total minus the sum of installment amounts; zero when they agree
    pub discrepancy: Money,
}

/// The payment plan attached to one subscription or training enrollment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub total_amount: Money,
    pub payment_type: PaymentType,
    pub plan: String,
    /// Ordered by payment sequence: installment 1, 2, ...
    pub installments: Vec<Installment>,
    #[serde(default)]
    pub proofs: Vec<ProofOfPayment>,
}

impl PaymentRecord {
    /// Creates a payment record
    ///
    /// # Errors
    ///
    /// `Validation` if the total is not positive, the plan has no
    /// installments, or any installment is malformed or in another currency.
    pub fn create(
        total_amount: Money,
        payment_type: PaymentType,
        plan: impl Into<String>,
        installments: Vec<Installment>,
    ) -> Result<Self, PaymentError> {
        let record = Self {
            total_amount,
            payment_type,
            plan: plan.into(),
            installments,
            proofs: Vec::new(),
        };
        record.validate()?;

        debug!(
            total = %record.total_amount,
            payment_type = %record.payment_type,
            installments = record.installments.len(),
            "Payment record created"
        );
        Ok(record)
    }

    /// Checks every structural invariant of the record
    ///
    /// Used by `create` and by callers that received a record from outside,
    /// e.g. a deserialized request body.
    pub fn validate(&self) -> Result<(), PaymentError> {
        check_amount("Total amount", &self.total_amount)?;
        if self.installments.is_empty() {
            return Err(PaymentError::validation("A payment plan needs at least one installment"));
        }
        let mut installment_ids = HashSet::with_capacity(self.installments.len());
        for installment in &self.installments {
            self.check_currency(&installment.amount)?;
            installment.validate()?;
            if !installment_ids.insert(installment.id) {
                return Err(PaymentError::validation(format!(
                    "Duplicate installment id {}",
                    installment.id
                )));
            }
        }
        let mut proof_ids = HashSet::with_capacity(self.proofs.len());
        for proof in &self.proofs {
            if !proof_ids.insert(proof.id) {
                return Err(PaymentError::validation(format!("Duplicate proof id {}", proof.id)));
            }
        }
        Ok(())
    }

    pub fn currency(&self) -> Currency {
        self.total_amount.currency()
    }

    pub fn installment(&self, id: InstallmentId) -> Option<&Installment> {
        self.installments.iter().find(|i| i.id == id)
    }

    /// 1-based position of the installment in the payment sequence
    pub fn installment_number(&self, id: InstallmentId) -> Option<usize> {
        self.installments.iter().position(|i| i.id == id).map(|p| p + 1)
    }

    /// Appends a pending installment at the end of the sequence
    ///
    /// Due dates are not required to be increasing.
    pub fn add_installment(&mut self, amount: Money, due_date: NaiveDate) -> Result<InstallmentId, PaymentError> {
        let installment = Installment::pending(amount, due_date);
        self.check_currency(&installment.amount)?;
        installment.validate()?;

        let id = installment.id;
        self.installments.push(installment);
        debug!(installment_id = %id, %due_date, "Installment added");
        Ok(id)
    }

    /// Removes an installment
    ///
    /// # Errors
    ///
    /// `InvariantViolation` if it is the last remaining installment.
    pub fn remove_installment(&mut self, id: InstallmentId) -> Result<Installment, PaymentError> {
        let position = self.position_of(id)?;
        if self.installments.len() == 1 {
            return Err(PaymentError::invariant(
                "Cannot remove the last installment of a payment plan",
            ));
        }
        let removed = self.installments.remove(position);
        debug!(installment_id = %id, "Installment removed");
        Ok(removed)
    }

    /// Edits the amount and due date of an installment
    pub fn update_installment(
        &mut self,
        id: InstallmentId,
        amount: Money,
        due_date: NaiveDate,
    ) -> Result<(), PaymentError> {
        self.check_currency(&amount)?;
        check_amount("Installment amount", &amount)?;
        let position = self.position_of(id)?;
        let installment = &mut self.installments[position];
        installment.amount = amount;
        installment.due_date = due_date;
        debug!(installment_id = %id, amount = %amount, %due_date, "Installment updated");
        Ok(())
    }

    /// Marks an installment paid with the default policy (no early-payment check)
    pub fn mark_installment_paid(&mut self, id: InstallmentId, paid_date: NaiveDate) -> Result<(), PaymentError> {
        self.mark_installment_paid_with(id, paid_date, &PaymentPolicy::default())
    }

    /// Marks an installment paid under `policy`
    ///
    /// # Errors
    ///
    /// `Validation` if the policy rejects `paid_date`; `InvariantViolation`
    /// if the installment is already paid.
    pub fn mark_installment_paid_with(
        &mut self,
        id: InstallmentId,
        paid_date: NaiveDate,
        policy: &PaymentPolicy,
    ) -> Result<(), PaymentError> {
        let position = self.position_of(id)?;
        let installment = &mut self.installments[position];
        if installment.is_paid() {
            return Err(PaymentError::invariant(format!(
                "Installment {} is already paid",
                id
            )));
        }
        policy.check_paid_date(installment, paid_date)?;
        installment.settle(paid_date);

        info!(
            installment_id = %id,
            installment_number = position + 1,
            %paid_date,
            status = %self.compute_status(),
            "Installment marked paid"
        );
        Ok(())
    }

    /// Reverts a paid installment to pending and clears its paid date
    pub fn mark_installment_pending(&mut self, id: InstallmentId) -> Result<(), PaymentError> {
        let position = self.position_of(id)?;
        let installment = &mut self.installments[position];
        if !installment.is_paid() {
            return Err(PaymentError::invariant(format!(
                "Installment {} is not paid",
                id
            )));
        }
        installment.reopen();
        info!(installment_id = %id, "Installment payment reverted");
        Ok(())
    }

    /// Attaches a receipt to the record as a whole
    pub fn attach_proof(
        &mut self,
        name: impl Into<String>,
        file_handle: impl Into<String>,
        upload_date: NaiveDate,
    ) -> Result<ProofId, PaymentError> {
        let proof = ProofOfPayment::new(FileReference::new(name, file_handle)?, upload_date);
        let id = proof.id;
        debug!(proof_id = %id, name = proof.name(), "Proof of payment attached");
        self.proofs.push(proof);
        Ok(id)
    }

    /// Attaches (or replaces) the receipt of a single installment
    pub fn attach_installment_proof(
        &mut self,
        id: InstallmentId,
        name: impl Into<String>,
        file_handle: impl Into<String>,
    ) -> Result<(), PaymentError> {
        let file = FileReference::new(name, file_handle)?;
        let position = self.position_of(id)?;
        self.installments[position].proof = Some(file);
        Ok(())
    }

    /// Rewrites stored statuses of unpaid installments to their status on `today`
    ///
    /// Returns how many installments changed.
    pub fn refresh_overdue(&mut self, today: NaiveDate) -> usize {
        let mut changed = 0;
        for installment in &mut self.installments {
            let effective = installment.status_on(today);
            if effective != installment.status {
                installment.status = effective;
                changed += 1;
            }
        }
        changed
    }

    /// `Paid` iff all installments are paid, `Pending` iff none are
    pub fn compute_status(&self) -> PaymentStatus {
        let paid = self.installments.iter().filter(|i| i.is_paid()).count();
        if paid == 0 {
            PaymentStatus::Pending
        } else if paid == self.installments.len() {
            PaymentStatus::Paid
        } else {
            PaymentStatus::Partial
        }
    }

    /// Sum of the amounts of paid installments
    pub fn compute_paid_amount(&self) -> Money {
        let paid = self
            .installments
            .iter()
            .filter(|i| i.is_paid())
            .fold(Decimal::ZERO, |acc, i| acc.saturating_add(i.amount.amount()));
        Money::new(paid, self.currency())
    }

    /// Paid amount as a percentage of the total, clamped to `[0, 100]`
    ///
    /// Zero when the total is not positive.
    pub fn compute_progress(&self) -> Decimal {
        if !self.total_amount.is_positive() {
            return Decimal::ZERO;
        }
        match self.compute_paid_amount().percentage_of(&self.total_amount) {
            Ok(pct) => pct.clamp(Decimal::ZERO, dec!(100)),
            // Only a paid amount vastly above the total overflows the ratio
            Err(MoneyError::Overflow) => dec!(100),
            Err(_) => Decimal::ZERO,
        }
    }

    /// Total minus paid, never negative
    pub fn outstanding_amount(&self) -> Money {
        let outstanding = self
            .total_amount
            .amount()
            .saturating_sub(self.compute_paid_amount().amount());
        Money::new(outstanding.max(Decimal::ZERO), self.currency())
    }

    /// Sum of all installment amounts, paid or not
    pub fn installment_sum(&self) -> Money {
        let sum = self
            .installments
            .iter()
            .fold(Decimal::ZERO, |acc, i| acc.saturating_add(i.amount.amount()));
        Money::new(sum, self.currency())
    }

    /// Total amount minus installment sum
    ///
    /// The two are allowed to diverge; this only reports by how much.
    pub fn total_discrepancy(&self) -> Money {
        Money::new(
            self.total_amount.amount().saturating_sub(self.installment_sum().amount()),
            self.currency(),
        )
    }

    /// First unpaid installment in sequence order
    pub fn next_due_installment(&self) -> Option<&Installment> {
        self.installments.iter().find(|i| !i.is_paid())
    }

    /// Unpaid installments whose due date is before `today`
    pub fn overdue_installments(&self, today: NaiveDate) -> impl Iterator<Item = &Installment> {
        self.installments.iter().filter(move |i| i.is_overdue_on(today))
    }

    pub fn has_overdue(&self, today: NaiveDate) -> bool {
        self.overdue_installments(today).next().is_some()
    }

    pub fn summary(&self, today: NaiveDate) -> PaymentSummary {
        let mut paid_count = 0;
        let mut pending_count = 0;
        let mut overdue_count = 0;
        for installment in &self.installments {
            match installment.status_on(today) {
                InstallmentStatus::Paid => paid_count += 1,
                InstallmentStatus::Pending => pending_count += 1,
                InstallmentStatus::Overdue => overdue_count += 1,
            }
        }

        PaymentSummary {
            status: self.compute_status(),
            total_amount: self.total_amount,
            paid_amount: self.compute_paid_amount(),
            outstanding_amount: self.outstanding_amount(),
            progress: self.compute_progress().round_dp(2),
            paid_count,
            pending_count,
            overdue_count,
            next_due_date: self.next_due_installment().map(|i| i.due_date),
            discrepancy: self.total_discrepancy(),
        }
    }

    fn position_of(&self, id: InstallmentId) -> Result<usize, PaymentError> {
        self.installments
            .iter()
            .position(|i| i.id == id)
            .ok_or(PaymentError::InstallmentNotFound(id))
    }

    fn check_currency(&self, amount: &Money) -> Result<(), PaymentError> {
        if amount.currency() != self.currency() {
            return Err(PaymentError::validation(format!(
                "Installment currency {} does not match record currency {}",
                amount.currency(),
                self.currency()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::installment::MAX_AMOUNT;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn usd(amount: Decimal) -> Money {
        Money::usd(amount)
    }

    fn cs50_record() -> PaymentRecord {
        PaymentRecord::create(
            usd(dec!(299)),
            PaymentType::CreditCard,
            "3 Monthly Installments",
            vec![
                Installment::paid(usd(dec!(100)), date(2024, 1, 15), date(2024, 1, 14)),
                Installment::paid(usd(dec!(100)), date(2024, 2, 15), date(2024, 2, 14)),
                Installment::pending(usd(dec!(99)), date(2024, 3, 15)),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_create_rejects_non_positive_total() {
        let result = PaymentRecord::create(
            usd(dec!(0)),
            PaymentType::Cash,
            "One-time Payment",
            vec![Installment::pending(usd(dec!(10)), date(2024, 1, 1))],
        );
        assert!(matches!(result, Err(PaymentError::Validation(_))));
    }

    #[test]
    fn test_create_rejects_empty_plan() {
        let result = PaymentRecord::create(usd(dec!(10)), PaymentType::Cash, "Nothing", vec![]);
        assert!(matches!(result, Err(PaymentError::Validation(_))));
    }

    #[test]
    fn test_create_rejects_negative_installment() {
        let result = PaymentRecord::create(
            usd(dec!(10)),
            PaymentType::Cash,
            "Broken",
            vec![Installment::pending(usd(dec!(-5)), date(2024, 1, 1))],
        );
        assert!(matches!(result, Err(PaymentError::Validation(_))));
    }

    #[test]
    fn test_amounts_above_maximum_are_rejected() {
        let huge = usd(dec!(50000000000000000000000000000));
        let result = PaymentRecord::create(
            usd(dec!(100)),
            PaymentType::Cash,
            "2 Installments",
            vec![
                Installment::pending(huge, date(2024, 1, 1)),
                Installment::pending(huge, date(2024, 2, 1)),
            ],
        );
        assert!(matches!(result, Err(PaymentError::Validation(_))));

        let result = PaymentRecord::create(
            usd(MAX_AMOUNT + dec!(1)),
            PaymentType::Cash,
            "One-time Payment",
            vec![Installment::pending(usd(dec!(10)), date(2024, 1, 1))],
        );
        assert!(matches!(result, Err(PaymentError::Validation(_))));

        let mut record = cs50_record();
        let id = record.installments[2].id;
        assert!(record.add_installment(huge, date(2024, 4, 1)).unwrap_err().is_validation());
        assert!(record
            .update_installment(id, huge, date(2024, 3, 15))
            .unwrap_err()
            .is_validation());
        assert_eq!(record.installments[2].amount.amount(), dec!(99));

        let at_limit = PaymentRecord::create(
            usd(MAX_AMOUNT),
            PaymentType::BankTransfer,
            "One-time Payment",
            vec![Installment::paid(usd(MAX_AMOUNT), date(2024, 1, 1), date(2024, 1, 1))],
        )
        .unwrap();
        assert_eq!(at_limit.compute_progress(), dec!(100));
    }

    #[test]
    fn test_derived_values_never_panic_on_extreme_amounts() {
        // Fields are public, so a record can bypass `validate`
        let mut record = PaymentRecord::create(
            usd(dec!(0.0001)),
            PaymentType::Cash,
            "One-time Payment",
            vec![Installment::pending(usd(dec!(0.0001)), date(2024, 1, 1))],
        )
        .unwrap();
        let huge = usd(dec!(70000000000000000000000000000));
        record.installments.push(Installment::paid(huge, date(2024, 1, 1), date(2024, 1, 1)));
        record.installments.push(Installment::paid(huge, date(2024, 2, 1), date(2024, 2, 1)));

        assert!(record.validate().is_err());
        assert_eq!(record.compute_progress(), dec!(100));
        assert_eq!(record.compute_paid_amount().amount(), Decimal::MAX);
        assert!(record.outstanding_amount().is_zero());
        let summary = record.summary(date(2024, 3, 1));
        assert_eq!(summary.paid_count, 2);
    }

    #[test]
    fn test_validate_rejects_duplicate_installment_ids() {
        let first = Installment::pending(usd(dec!(100)), date(2024, 1, 1));
        let result = PaymentRecord::create(
            usd(dec!(200)),
            PaymentType::Cash,
            "2 Installments",
            vec![first.clone(), first],
        );
        assert!(matches!(result, Err(PaymentError::Validation(_))));
    }

    #[test]
    fn test_validate_rejects_duplicate_proof_ids() {
        let mut record = cs50_record();
        record.attach_proof("receipt.pdf", "uploads/receipt.pdf", date(2024, 1, 14)).unwrap();
        assert!(record.validate().is_ok());

        let copy = record.proofs[0].clone();
        record.proofs.push(copy);
        assert!(matches!(record.validate(), Err(PaymentError::Validation(_))));
    }

    #[test]
    fn test_update_installment() {
        let mut record = cs50_record();
        let id = record.installments[2].id;
        record.update_installment(id, usd(dec!(109)), date(2024, 3, 20)).unwrap();
        assert_eq!(record.installments[2].amount.amount(), dec!(109));
        assert_eq!(record.installments[2].due_date, date(2024, 3, 20));
        assert_eq!(record.total_discrepancy().amount(), dec!(-10));

        let unknown = InstallmentId::new();
        assert_eq!(
            record.update_installment(unknown, usd(dec!(10)), date(2024, 3, 20)),
            Err(PaymentError::InstallmentNotFound(unknown))
        );
    }

    #[test]
    fn test_create_rejects_mixed_currency() {
        let result = PaymentRecord::create(
            usd(dec!(10)),
            PaymentType::Cash,
            "Mixed",
            vec![Installment::pending(Money::new(dec!(10), Currency::EUR), date(2024, 1, 1))],
        );
        assert!(matches!(result, Err(PaymentError::Validation(_))));
    }

    #[test]
    fn test_derived_values() {
        let record = cs50_record();
        assert_eq!(record.compute_paid_amount().amount(), dec!(200));
        assert_eq!(record.compute_progress().round_dp(1), dec!(66.9));
        assert_eq!(record.compute_status(), PaymentStatus::Partial);
        assert_eq!(record.outstanding_amount().amount(), dec!(99));
        assert!(record.total_discrepancy().is_zero());
    }

    #[test]
    fn test_progress_is_clamped_when_installments_exceed_total() {
        let record = PaymentRecord::create(
            usd(dec!(100)),
            PaymentType::Cash,
            "Overpaid",
            vec![Installment::paid(usd(dec!(150)), date(2024, 1, 1), date(2024, 1, 1))],
        )
        .unwrap();
        assert_eq!(record.compute_progress(), dec!(100));
        assert!(record.outstanding_amount().is_zero());
        assert_eq!(record.total_discrepancy().amount(), dec!(-50));
    }

    #[test]
    fn test_remove_last_installment_is_invariant_violation() {
        let mut record = PaymentRecord::create(
            usd(dec!(149)),
            PaymentType::BankTransfer,
            "One-time Payment",
            vec![Installment::pending(usd(dec!(149)), date(2024, 1, 1))],
        )
        .unwrap();
        let id = record.installments[0].id;
        assert!(matches!(
            record.remove_installment(id),
            Err(PaymentError::InvariantViolation(_))
        ));
        assert_eq!(record.installments.len(), 1);
    }

    #[test]
    fn test_remove_unknown_installment() {
        let mut record = cs50_record();
        let unknown = InstallmentId::new();
        assert_eq!(
            record.remove_installment(unknown),
            Err(PaymentError::InstallmentNotFound(unknown))
        );
    }

    #[test]
    fn test_mark_paid_twice_is_invariant_violation() {
        let mut record = cs50_record();
        let id = record.installments[0].id;
        assert!(matches!(
            record.mark_installment_paid(id, date(2024, 1, 20)),
            Err(PaymentError::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_grace_policy_rejects_early_payment() {
        let mut record = cs50_record();
        let id = record.installments[2].id;
        let policy = PaymentPolicy::with_grace_days(7);

        let too_early = record.mark_installment_paid_with(id, date(2024, 3, 7), &policy);
        assert!(matches!(too_early, Err(PaymentError::Validation(_))));

        record.mark_installment_paid_with(id, date(2024, 3, 8), &policy).unwrap();
        assert_eq!(record.compute_status(), PaymentStatus::Paid);
    }

    #[test]
    fn test_default_policy_accepts_any_date() {
        let mut record = cs50_record();
        let id = record.installments[2].id;
        record.mark_installment_paid(id, date(2023, 1, 1)).unwrap();
        assert_eq!(record.installments[2].paid_date, Some(date(2023, 1, 1)));
    }

    #[test]
    fn test_mark_pending_reverts() {
        let mut record = cs50_record();
        let id = record.installments[1].id;
        record.mark_installment_pending(id).unwrap();
        assert_eq!(record.compute_paid_amount().amount(), dec!(100));
        assert!(matches!(
            record.mark_installment_pending(id),
            Err(PaymentError::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_refresh_overdue() {
        let mut record = cs50_record();
        assert_eq!(record.refresh_overdue(date(2024, 3, 16)), 1);
        assert_eq!(record.installments[2].status, InstallmentStatus::Overdue);
        assert_eq!(record.refresh_overdue(date(2024, 3, 16)), 0);
        // Overdue is not paid, so the aggregate is unchanged
        assert_eq!(record.compute_status(), PaymentStatus::Partial);
    }

    #[test]
    fn test_summary() {
        let record = cs50_record();
        let summary = record.summary(date(2024, 4, 1));
        assert_eq!(summary.paid_count, 2);
        assert_eq!(summary.pending_count, 0);
        assert_eq!(summary.overdue_count, 1);
        assert_eq!(summary.progress, dec!(66.89));
        assert_eq!(summary.next_due_date, Some(date(2024, 3, 15)));
    }

    #[test]
    fn test_payment_type_parsing() {
        assert_eq!("PayPal".parse::<PaymentType>().unwrap(), PaymentType::PayPal);
        assert_eq!("Bank Transfer".parse::<PaymentType>().unwrap(), PaymentType::BankTransfer);
        assert_eq!("credit-card".parse::<PaymentType>().unwrap(), PaymentType::CreditCard);
        assert!("bitcoin".parse::<PaymentType>().is_err());
    }

    #[test]
    fn test_payment_type_serde() {
        assert_eq!(serde_json::to_string(&PaymentType::PayPal).unwrap(), "\"paypal\"");
        assert_eq!(serde_json::to_string(&PaymentType::CreditCard).unwrap(), "\"credit-card\"");
        let parsed: PaymentType = serde_json::from_str("\"bank-transfer\"").unwrap();
        assert_eq!(parsed, PaymentType::BankTransfer);
    }
}
