//! Tests for core_kernel errors, identifiers and calendar helpers

use chrono::NaiveDate;
use core_kernel::error::CoreError;
use core_kernel::money::MoneyError;
use core_kernel::temporal::{DateRange, TemporalError, Timezone};
use core_kernel::{InstallmentId, ProofId, SubscriptionId, TrainingId, UserId};

#[test]
fn test_core_error_from_money_error() {
    let money_error = MoneyError::CurrencyMismatch("USD".to_string(), "EUR".to_string());
    let core_error: CoreError = money_error.into();

    assert!(matches!(core_error, CoreError::Money(_)));
    assert!(core_error.is_client_error());
    assert!(core_error.to_string().contains("USD"));
}

#[test]
fn test_core_error_from_temporal_error() {
    let core_error: CoreError = TemporalError::OutOfRange.into();
    assert!(matches!(core_error, CoreError::Temporal(TemporalError::OutOfRange)));
}

#[test]
fn test_not_found_is_not_client_error() {
    assert!(!CoreError::not_found("Subscription SUB-1").is_client_error());
    assert!(!CoreError::invalid_state("completed -> upcoming").is_client_error());
}

#[test]
fn test_identifier_prefixes() {
    assert_eq!(UserId::prefix(), "USR");
    assert_eq!(SubscriptionId::prefix(), "SUB");
    assert_eq!(TrainingId::prefix(), "TRN");
    assert_eq!(InstallmentId::prefix(), "INST");
    assert_eq!(ProofId::prefix(), "PRF");
}

#[test]
fn test_identifier_serializes_as_bare_uuid() {
    let id = UserId::new();
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, format!("\"{}\"", id.as_uuid()));
}

#[test]
fn test_identifier_rejects_garbage() {
    assert!("SUB-not-a-uuid".parse::<SubscriptionId>().is_err());
}

#[test]
fn test_date_range_serde() {
    let range = DateRange::new(
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        NaiveDate::from_ymd_opt(2024, 5, 30).unwrap(),
    )
    .unwrap();
    let json = serde_json::to_string(&range).unwrap();
    assert_eq!(json, r#"{"start":"2024-03-01","end":"2024-05-30"}"#);
}

#[test]
fn test_timezone_serde() {
    let tz: Timezone = serde_json::from_str("\"Africa/Tunis\"").unwrap();
    assert_eq!(serde_json::to_string(&tz).unwrap(), "\"Africa/Tunis\"");
    assert!(serde_json::from_str::<Timezone>("\"Nowhere/Else\"").is_err());
}
