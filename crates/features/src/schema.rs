//! Ordered feature schema and leakage exclusion
//!
//! The schema is an explicit, persisted artifact: three fixed numeric
//! columns followed by one indicator column per (field, value) pair
//! observed in the training batch. Values are collected through a
//! `BTreeSet`, so column order is a pure function of the observed
//! category universe.

use fraudsim_types::TransactionRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

/// Numeric columns, always present and always first.
pub const NUMERIC_COLUMNS: &[&str] = &["amount", "hour_of_day", "day_of_week"];

/// Raw fields that are causally entangled with the fraud label and
/// must never reach the trained feature set. `status` strips every
/// derived indicator, not a hand-picked subset.
pub const LEAKY_FIELDS: &[&str] = &["velocity", "failed_attempts", "status"];

/// Categorical fields that are one-hot expanded at fit time.
const CATEGORICAL_FIELDS: &[&str] = &["currency", "transaction_type", "channel", "status"];

/// One indicator column: fires when `field` carries `value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryColumn {
    pub field: String,
    pub value: String,
}

impl CategoryColumn {
    /// Column name as persisted, e.g. `currency_USD`.
    pub fn name(&self) -> String {
        format!("{}_{}", self.field, self.value)
    }
}

/// The ordered column list established at training time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSchema {
    pub categories: Vec<CategoryColumn>,
}

impl FeatureSchema {
    /// Discover the category universe from a training batch and build
    /// the final schema. Leaky fields are removed here, before the
    /// schema is finalized, so no later stage can reintroduce them.
    pub fn fit(records: &[TransactionRecord]) -> Self {
        let mut categories = Vec::new();

        for &field in CATEGORICAL_FIELDS {
            let mut observed = BTreeSet::new();
            for record in records {
                if let Some(value) = field_value(record, field) {
                    observed.insert(value.to_string());
                }
            }
            for value in observed {
                categories.push(CategoryColumn {
                    field: field.to_string(),
                    value,
                });
            }
        }

        let before = categories.len();
        categories.retain(|c| !LEAKY_FIELDS.contains(&c.field.as_str()));
        debug!(
            dropped = before - categories.len(),
            columns = NUMERIC_COLUMNS.len() + categories.len(),
            "feature schema fitted"
        );

        Self { categories }
    }

    /// Total feature-vector length.
    pub fn len(&self) -> usize {
        NUMERIC_COLUMNS.len() + self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        false // numeric columns are always present
    }

    /// Ordered column names, numeric first then indicators.
    pub fn column_names(&self) -> Vec<String> {
        NUMERIC_COLUMNS
            .iter()
            .map(|c| c.to_string())
            .chain(self.categories.iter().map(|c| c.name()))
            .collect()
    }
}

/// Whether a schema column names a categorical field this engine
/// actually encodes.
pub(crate) fn is_known_field(field: &str) -> bool {
    CATEGORICAL_FIELDS.contains(&field)
}

/// Look up a categorical field's value on a record. `status` is the
/// only optional one; the others are required at the boundary.
pub(crate) fn field_value<'a>(record: &'a TransactionRecord, field: &str) -> Option<&'a str> {
    match field {
        "currency" => Some(record.currency.as_str()),
        "transaction_type" => Some(record.transaction_type.as_str()),
        "channel" => Some(record.channel.as_str()),
        "status" => record.status.as_deref(),
        _ => None,
    }
}
