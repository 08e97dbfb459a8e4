//! Instructor-led training enrollments

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

use core_kernel::{DateRange, TrainingId, UserId};
use domain_payment::PaymentRecord;
use crate::error::EnrollmentError;

/// Training lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrainingStatus {
    #[default]
    Upcoming,
    InProgress,
    Completed,
}

impl fmt::Display for TrainingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TrainingStatus::Upcoming => "upcoming",
            TrainingStatus::InProgress => "in-progress",
            TrainingStatus::Completed => "completed",
        };
        f.write_str(s)
    }
}

/// Editable fields of a training enrollment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingDetails {
    pub user_id: UserId,
    pub user_name: String,
    pub program: String,
    pub provider: String,
    pub instructor: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub progress: u8,
    #[serde(default)]
    pub status: TrainingStatus,
}

impl TrainingDetails {
    fn validate(&self) -> Result<(), EnrollmentError> {
        let required = [
            ("user_name", &self.user_name),
            ("program", &self.program),
            ("provider", &self.provider),
            ("instructor", &self.instructor),
        ];
        if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(EnrollmentError::validation(format!("{} must not be empty", field)));
        }
        DateRange::new(self.start_date, self.end_date)?;
        check_progress(self.progress)
    }
}

fn check_progress(progress: u8) -> Result<(), EnrollmentError> {
    if progress > 100 {
        return Err(EnrollmentError::validation(format!(
            "Progress must be between 0 and 100, got {}",
            progress
        )));
    }
    Ok(())
}

/// Full replace of a training's editable fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingUpdate {
    #[serde(flatten)]
    pub details: TrainingDetails,
    #[serde(default)]
    pub payment: Option<PaymentRecord>,
}

/// A user's enrollment in a training program
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingEnrollment {
    pub id: TrainingId,
    pub user_id: UserId,
    pub user_name: String,
    pub program: String,
    pub provider: String,
    pub instructor: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Course completion in percent
    pub progress: u8,
    pub status: TrainingStatus,
    pub payment: PaymentRecord,
}

impl TrainingEnrollment {
    /// Creates an enrollment; a `Completed` status forces progress to 100
    pub fn new(details: TrainingDetails, payment: PaymentRecord) -> Result<Self, EnrollmentError> {
        details.validate()?;
        payment.validate()?;

        let mut training = Self {
            id: TrainingId::new_v7(),
            user_id: details.user_id,
            user_name: String::new(),
            program: String::new(),
            provider: String::new(),
            instructor: String::new(),
            start_date: details.start_date,
            end_date: details.end_date,
            progress: 0,
            status: TrainingStatus::Upcoming,
            payment,
        };
        training.apply(details);
        Ok(training)
    }

    pub fn details(&self) -> TrainingDetails {
        TrainingDetails {
            user_id: self.user_id,
            user_name: self.user_name.clone(),
            program: self.program.clone(),
            provider: self.provider.clone(),
            instructor: self.instructor.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
            progress: self.progress,
            status: self.status,
        }
    }

    /// Replaces the editable fields
    ///
    /// Status is taken as given here; use [`transition_to`](Self::transition_to)
    /// for a checked lifecycle change.
    pub fn update(&mut self, update: TrainingUpdate) -> Result<(), EnrollmentError> {
        update.details.validate()?;
        if let Some(ref payment) = update.payment {
            payment.validate()?;
        }
        self.apply(update.details);
        if let Some(payment) = update.payment {
            self.payment = payment;
        }
        Ok(())
    }

    pub fn period(&self) -> DateRange {
        DateRange {
            start: self.start_date,
            end: self.end_date,
        }
    }

    /// Moves the training along `upcoming -> in-progress -> completed`
    pub fn transition_to(&mut self, status: TrainingStatus) -> Result<(), EnrollmentError> {
        if !self.can_transition_to(status) {
            return Err(EnrollmentError::invalid_transition(self.status, status));
        }
        let from = self.status;
        self.status = status;
        if status == TrainingStatus::Completed {
            self.progress = 100;
        }
        info!(training_id = %self.id, %from, to = %status, "Training status changed");
        Ok(())
    }

    /// Records course completion progress; only meaningful while in progress
    pub fn set_progress(&mut self, progress: u8) -> Result<(), EnrollmentError> {
        check_progress(progress)?;
        if self.status != TrainingStatus::InProgress {
            return Err(EnrollmentError::validation(format!(
                "Progress can only be recorded while in progress, training is {}",
                self.status
            )));
        }
        self.progress = progress;
        Ok(())
    }

    fn can_transition_to(&self, target: TrainingStatus) -> bool {
        use TrainingStatus::*;
        matches!(
            (self.status, target),
            (Upcoming, InProgress) |
            (InProgress, Completed)
        )
    }

    fn apply(&mut self, details: TrainingDetails) {
        self.user_id = details.user_id;
        self.user_name = details.user_name.trim().to_string();
        self.program = details.program.trim().to_string();
        self.provider = details.provider.trim().to_string();
        self.instructor = details.instructor.trim().to_string();
        self.start_date = details.start_date;
        self.end_date = details.end_date;
        self.status = details.status;
        self.progress = match details.status {
            TrainingStatus::Completed => 100,
            _ => details.progress,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::Money;
    use domain_payment::{Installment, PaymentType};
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn details(status: TrainingStatus, progress: u8) -> TrainingDetails {
        TrainingDetails {
            user_id: UserId::new_v7(),
            user_name: "John Doe".to_string(),
            program: "Agile Project Management".to_string(),
            provider: "Protected Consulting".to_string(),
            instructor: "Sami Sahraoui".to_string(),
            start_date: date(2024, 3, 1),
            end_date: date(2024, 5, 30),
            progress,
            status,
        }
    }

    fn payment() -> PaymentRecord {
        PaymentRecord::create(
            Money::usd(dec!(900)),
            PaymentType::CreditCard,
            "One-time Payment",
            vec![Installment::pending(Money::usd(dec!(900)), date(2024, 3, 1))],
        )
        .unwrap()
    }

    #[test]
    fn test_lifecycle() {
        let mut training = TrainingEnrollment::new(details(TrainingStatus::Upcoming, 0), payment()).unwrap();

        training.transition_to(TrainingStatus::InProgress).unwrap();
        training.set_progress(60).unwrap();
        assert_eq!(training.progress, 60);

        training.transition_to(TrainingStatus::Completed).unwrap();
        assert_eq!(training.progress, 100);
    }

    #[test]
    fn test_invalid_transitions() {
        let mut training = TrainingEnrollment::new(details(TrainingStatus::Upcoming, 0), payment()).unwrap();
        assert!(matches!(
            training.transition_to(TrainingStatus::Completed),
            Err(EnrollmentError::InvalidTransition { .. })
        ));

        let mut done = TrainingEnrollment::new(details(TrainingStatus::Completed, 0), payment()).unwrap();
        assert_eq!(done.progress, 100);
        assert!(done.transition_to(TrainingStatus::InProgress).is_err());
    }

    #[test]
    fn test_rejects_end_before_start() {
        let mut d = details(TrainingStatus::Upcoming, 0);
        d.end_date = date(2024, 2, 1);
        assert!(matches!(
            TrainingEnrollment::new(d, payment()),
            Err(EnrollmentError::Validation(_))
        ));
    }

    #[test]
    fn test_rejects_progress_over_100() {
        assert!(TrainingEnrollment::new(details(TrainingStatus::InProgress, 101), payment()).is_err());
    }

    #[test]
    fn test_progress_outside_in_progress() {
        let mut training = TrainingEnrollment::new(details(TrainingStatus::Upcoming, 0), payment()).unwrap();
        assert!(training.set_progress(10).is_err());
    }

    #[test]
    fn test_status_serde() {
        assert_eq!(serde_json::to_string(&TrainingStatus::InProgress).unwrap(), "\"in-progress\"");
    }
}
