//! Payment Domain - Installment Ledger
//!
//! Every subscription and training enrollment carries one `PaymentRecord`:
//! an agreed total, a payment method, and an ordered list of installments.
//! This crate owns the rules for that ledger.
//!
//! # Derived State
//!
//! Nothing aggregate is stored. Paid amount, progress and record status are
//! recomputed from the installments on every read:
//! - `paid` when every installment is paid
//! - `pending` when none is
//! - `partial` otherwise
//!
//! Whether an unpaid installment is overdue depends on the day it is looked
//! at, so it is derived from the due date as well.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_payment::{InstallmentSchedule, PlanInterval, PaymentType};
//!
//! let mut record = InstallmentSchedule::equal_split(total, 3, first_due, PlanInterval::Monthly)?
//!     .into_record(PaymentType::CreditCard)?;
//!
//! let first = record.installments[0].id;
//! record.mark_installment_paid(first, today)?;
//! assert_eq!(record.compute_status(), PaymentStatus::Partial);
//! ```

pub mod installment;
pub mod proof;
pub mod record;
pub mod schedule;
pub mod reminders;
pub mod error;

pub use installment::{Installment, InstallmentStatus};
pub use proof::{FileReference, ProofOfPayment};
pub use record::{PaymentPolicy, PaymentRecord, PaymentStatus, PaymentSummary, PaymentType};
pub use schedule::{InstallmentSchedule, PlanInterval};
pub use reminders::{PaymentReminder, ReminderKind, DEFAULT_REMINDER_WINDOW_DAYS};
pub use error::PaymentError;
