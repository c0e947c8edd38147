//! Raw bank transaction record
//!
//! The record mirrors what the upstream transaction provider emits.
//! Categorical fields are open strings: a live request may carry a
//! value that was never observed at training time, and the feature
//! layer is responsible for mapping unknown values to no indicator.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Currency values emitted by the upstream provider.
pub const CURRENCIES: &[&str] = &["INR", "USD", "EUR"];

/// Transaction type values emitted by the upstream provider.
pub const TRANSACTION_TYPES: &[&str] = &["PAYMENT", "TRANSFER", "WITHDRAW"];

/// Channel values emitted by the upstream provider.
pub const CHANNELS: &[&str] = &["CARD", "ATM", "NETBANKING", "MOBILE"];

/// Settlement status values emitted by the upstream provider.
pub const STATUSES: &[&str] = &["SUCCESS", "PENDING", "FAILED"];

/// A single raw transaction.
///
/// Identity fields (`transaction_id`, accounts, `ip_address`,
/// `location`) never enter the feature vector; they are carried only
/// so datasets round-trip intact. `is_fraud` is the ground-truth label
/// and is present only on training data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    pub timestamp: NaiveDateTime,
    pub amount: u64,
    pub currency: String,
    pub transaction_type: String,
    pub channel: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_account: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver_account: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub velocity: u32,
    #[serde(default)]
    pub failed_attempts: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_fraud: Option<bool>,
}

impl TransactionRecord {
    /// Minimal record with the fields the feature layer requires.
    pub fn new(
        timestamp: NaiveDateTime,
        amount: u64,
        currency: impl Into<String>,
        transaction_type: impl Into<String>,
        channel: impl Into<String>,
    ) -> Self {
        Self {
            transaction_id: None,
            timestamp,
            amount,
            currency: currency.into(),
            transaction_type: transaction_type.into(),
            channel: channel.into(),
            sender_account: None,
            receiver_account: None,
            ip_address: None,
            location: None,
            velocity: 0,
            failed_attempts: 0,
            status: None,
            is_fraud: None,
        }
    }
}
