//! Proof-of-payment references
//!
//! Only the name and an opaque handle are modeled. The file itself lives in
//! whatever storage the uploader used.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use core_kernel::ProofId;
use crate::error::PaymentError;

/// A named reference to an uploaded file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReference {
    /// Display name, e.g. "Payment Receipt - Jan 2024"
    pub name: String,
    /// Opaque URL or storage handle
    pub handle: String,
}

impl FileReference {
    pub fn new(name: impl Into<String>, handle: impl Into<String>) -> Result<Self, PaymentError> {
        let name = name.into();
        let handle = handle.into();
        if name.trim().is_empty() {
            return Err(PaymentError::validation("Proof name must not be empty"));
        }
        if handle.trim().is_empty() {
            return Err(PaymentError::validation("Proof file handle must not be empty"));
        }
        Ok(Self { name, handle })
    }
}

/// A receipt attached to a payment record as a whole
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofOfPayment {
    pub id: ProofId,
    #[serde(flatten)]
    pub file: FileReference,
    pub upload_date: NaiveDate,
}

impl ProofOfPayment {
    pub fn new(file: FileReference, upload_date: NaiveDate) -> Self {
        Self {
            id: ProofId::new_v7(),
            file,
            upload_date,
        }
    }

    pub fn name(&self) -> &str {
        &self.file.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_reference_requires_name_and_handle() {
        assert!(FileReference::new("", "/receipt.png").is_err());
        assert!(FileReference::new("Receipt", "  ").is_err());
        assert!(FileReference::new("Receipt", "/receipt.png").is_ok());
    }

    #[test]
    fn test_proof_serializes_flat() {
        let proof = ProofOfPayment::new(
            FileReference::new("Bank Transfer Receipt", "/bank-transfer-receipt.png").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
        );
        let json = serde_json::to_value(&proof).unwrap();
        assert_eq!(json["name"], "Bank Transfer Receipt");
        assert_eq!(json["handle"], "/bank-transfer-receipt.png");
        assert_eq!(json["upload_date"], "2024-01-02");
    }
}
