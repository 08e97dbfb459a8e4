//! Core Kernel - Foundational types shared by the enrollment admin crates
//!
//! - Money types with precise decimal arithmetic
//! - Calendar helpers for due dates and training periods
//! - Strongly-typed identifiers
//! - Port error and marker types for repository adapters

pub mod money;
pub mod temporal;
pub mod identifiers;
pub mod error;
pub mod ports;

pub use money::{Money, Currency, MoneyError};
pub use temporal::{DateRange, Timezone, TemporalError};
pub use identifiers::{
    UserId, SubscriptionId, TrainingId, InstallmentId, ProofId, NotificationId,
};
pub use error::CoreError;
pub use ports::{
    PortError, DomainPort, AdapterHealth, HealthCheckable, HealthCheckResult,
    OperationMetadata,
};
