//! Payment reminders
//!
//! Reminders are computed, never stored: they are a view of a record's unpaid
//! installments relative to a given day.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use core_kernel::temporal::days_until;
use core_kernel::{InstallmentId, Money};
use crate::record::PaymentRecord;

/// Look-ahead used when no window is configured
pub const DEFAULT_REMINDER_WINDOW_DAYS: u32 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReminderKind {
    /// Due within the window, counted from tomorrow
    DueSoon { days_left: i64 },
    Overdue { days_late: i64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentReminder {
    pub installment_id: InstallmentId,
    /// 1-based position in the plan
    pub installment_number: usize,
    pub amount: Money,
    pub due_date: NaiveDate,
    #[serde(flatten)]
    pub kind: ReminderKind,
}

impl PaymentReminder {
    pub fn is_overdue(&self) -> bool {
        matches!(self.kind, ReminderKind::Overdue { .. })
    }
}

/// Reminders for the unpaid installments of `record` as of `today`
///
/// An installment is due soon when its due date falls in
/// `(today, today + window_days]` and overdue when it is before `today`.
/// Installments due exactly today get no reminder. Results follow plan order.
pub fn due_soon(record: &PaymentRecord, today: NaiveDate, window_days: u32) -> Vec<PaymentReminder> {
    let window = i64::from(window_days);

    record
        .installments
        .iter()
        .enumerate()
        .filter(|(_, inst)| !inst.is_paid())
        .filter_map(|(index, inst)| {
            let days_left = days_until(today, inst.due_date);
            let kind = if days_left < 0 {
                ReminderKind::Overdue { days_late: -days_left }
            } else if days_left > 0 && days_left <= window {
                ReminderKind::DueSoon { days_left }
            } else {
                return None;
            };
            Some(PaymentReminder {
                installment_id: inst.id,
                installment_number: index + 1,
                amount: inst.amount,
                due_date: inst.due_date,
                kind,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::installment::Installment;
    use crate::record::PaymentType;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record() -> PaymentRecord {
        PaymentRecord::create(
            Money::usd(dec!(300)),
            PaymentType::CreditCard,
            "3 Monthly Installments",
            vec![
                Installment::pending(Money::usd(dec!(100)), date(2024, 1, 10)),
                Installment::pending(Money::usd(dec!(100)), date(2024, 1, 20)),
                Installment::pending(Money::usd(dec!(100)), date(2024, 1, 30)),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_window_boundaries() {
        let record = record();

        let reminders = due_soon(&record, date(2024, 1, 13), 7);
        assert_eq!(reminders.len(), 2);
        assert_eq!(reminders[0].kind, ReminderKind::Overdue { days_late: 3 });
        assert_eq!(reminders[1].kind, ReminderKind::DueSoon { days_left: 7 });
        assert_eq!(reminders[1].installment_number, 2);

        // Due today: neither due soon nor overdue
        let reminders = due_soon(&record, date(2024, 1, 10), 7);
        assert!(reminders.is_empty());
    }

    #[test]
    fn test_paid_installments_are_skipped() {
        let mut record = record();
        let first = record.installments[0].id;
        record.mark_installment_paid(first, date(2024, 1, 9)).unwrap();

        let reminders = due_soon(&record, date(2024, 1, 13), DEFAULT_REMINDER_WINDOW_DAYS);
        assert!(reminders.iter().all(|r| !r.is_overdue()));
    }

    #[test]
    fn test_serializes_with_kind_tag() {
        let reminders = due_soon(&record(), date(2024, 1, 12), 7);
        let json = serde_json::to_value(&reminders[0]).unwrap();
        assert_eq!(json["kind"], "overdue");
        assert_eq!(json["days_late"], 2);
    }
}
