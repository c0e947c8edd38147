//! Serving-boundary payload validation
//!
//! The scoring endpoint accepts a loosely shaped JSON document. It is
//! validated and converted into a strongly typed [`TransactionRecord`]
//! here, before any core logic runs; the core never operates on
//! untyped maps. Unknown extra fields are ignored by serde, and fields
//! the feature set excludes anyway (`velocity`, `failed_attempts`,
//! identifiers) may be omitted freely.

use crate::errors::{FeatureError, Result};
use chrono::NaiveDateTime;
use fraudsim_types::TransactionRecord;
use serde::Deserialize;

/// Raw-ish scoring input as received on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTransaction {
    pub transaction_id: Option<String>,
    pub timestamp: Option<NaiveDateTime>,
    pub amount: Option<u64>,
    pub currency: Option<String>,
    pub transaction_type: Option<String>,
    pub channel: Option<String>,
    pub sender_account: Option<String>,
    pub receiver_account: Option<String>,
    pub ip_address: Option<String>,
    pub location: Option<String>,
    pub velocity: Option<u32>,
    pub failed_attempts: Option<u32>,
    pub status: Option<String>,
}

impl RawTransaction {
    /// Check required fields and produce a typed record. No defaults
    /// are invented for required fields; a missing one rejects the
    /// request outright.
    pub fn validate(self) -> Result<TransactionRecord> {
        let timestamp = self
            .timestamp
            .ok_or(FeatureError::MissingField("timestamp"))?;
        let amount = self.amount.ok_or(FeatureError::MissingField("amount"))?;
        let currency = self.currency.ok_or(FeatureError::MissingField("currency"))?;
        let transaction_type = self
            .transaction_type
            .ok_or(FeatureError::MissingField("transaction_type"))?;
        let channel = self.channel.ok_or(FeatureError::MissingField("channel"))?;

        let mut record =
            TransactionRecord::new(timestamp, amount, currency, transaction_type, channel);
        record.transaction_id = self.transaction_id;
        record.sender_account = self.sender_account;
        record.receiver_account = self.receiver_account;
        record.ip_address = self.ip_address;
        record.location = self.location;
        record.velocity = self.velocity.unwrap_or(0);
        record.failed_attempts = self.failed_attempts.unwrap_or(0);
        record.status = self.status;
        Ok(record)
    }
}
