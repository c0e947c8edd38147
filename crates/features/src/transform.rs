//! Record-to-vector mapping
//!
//! Pure function of (record, schema). Serving inputs may carry
//! category values the schema has never seen; those fire no indicator.
//! A schema column with no matching value on the record stays 0.

use crate::errors::{FeatureError, Result};
use crate::schema::{field_value, is_known_field, FeatureSchema};
use chrono::{Datelike, Timelike};
use fraudsim_types::TransactionRecord;

/// Map one record onto the fitted column order.
pub fn transform(record: &TransactionRecord, schema: &FeatureSchema) -> Result<Vec<f64>> {
    for column in &schema.categories {
        if column.value.is_empty() || !is_known_field(&column.field) {
            return Err(FeatureError::SchemaMismatch(format!(
                "malformed schema column {:?}",
                column.name()
            )));
        }
    }

    let mut vector = Vec::with_capacity(schema.len());
    vector.push(record.amount as f64);
    vector.push(f64::from(record.timestamp.hour()));
    vector.push(f64::from(record.timestamp.weekday().num_days_from_monday()));

    for column in &schema.categories {
        let fires = field_value(record, &column.field) == Some(column.value.as_str());
        vector.push(if fires { 1.0 } else { 0.0 });
    }

    Ok(vector)
}

/// Map a training batch onto the fitted column order.
pub fn transform_batch(
    records: &[TransactionRecord],
    schema: &FeatureSchema,
) -> Result<Vec<Vec<f64>>> {
    records.iter().map(|r| transform(r, schema)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn monday_9am() -> chrono::NaiveDateTime {
        // 2024-01-15 is a Monday
        NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    fn training_batch() -> Vec<TransactionRecord> {
        vec![
            TransactionRecord::new(monday_9am(), 500, "USD", "PAYMENT", "CARD"),
            TransactionRecord::new(monday_9am(), 900, "INR", "TRANSFER", "ATM"),
        ]
    }

    #[test]
    fn test_numeric_derivation() {
        let schema = FeatureSchema::fit(&training_batch());
        let record = TransactionRecord::new(monday_9am(), 120_000, "USD", "TRANSFER", "CARD");
        let vector = transform(&record, &schema).unwrap();
        assert_eq!(vector[0], 120_000.0); // amount passes through unscaled
        assert_eq!(vector[1], 9.0); // hour of day
        assert_eq!(vector[2], 0.0); // Monday
    }

    #[test]
    fn test_indicator_fires_for_matching_value() {
        let schema = FeatureSchema::fit(&training_batch());
        let names = schema.column_names();
        let record = TransactionRecord::new(monday_9am(), 500, "USD", "PAYMENT", "CARD");
        let vector = transform(&record, &schema).unwrap();

        let idx = names.iter().position(|n| n == "currency_USD").unwrap();
        assert_eq!(vector[idx], 1.0);
        let idx = names.iter().position(|n| n == "currency_INR").unwrap();
        assert_eq!(vector[idx], 0.0);
    }

    #[test]
    fn test_unseen_value_fires_no_indicator() {
        let schema = FeatureSchema::fit(&training_batch());
        let record = TransactionRecord::new(monday_9am(), 500, "USD", "PAYMENT", "CRYPTO");
        let vector = transform(&record, &schema).unwrap();

        let names = schema.column_names();
        for (i, name) in names.iter().enumerate() {
            if name.starts_with("channel_") {
                assert_eq!(vector[i], 0.0, "unexpected indicator {name}");
            }
        }
    }

    #[test]
    fn test_transform_is_idempotent() {
        let schema = FeatureSchema::fit(&training_batch());
        let record = TransactionRecord::new(monday_9am(), 777, "EUR", "WITHDRAW", "MOBILE");
        let first = transform(&record, &schema).unwrap();
        let second = transform(&record, &schema).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_vector_length_matches_schema() {
        let schema = FeatureSchema::fit(&training_batch());
        let record = TransactionRecord::new(monday_9am(), 500, "USD", "PAYMENT", "CARD");
        assert_eq!(transform(&record, &schema).unwrap().len(), schema.len());
    }

    #[test]
    fn test_malformed_schema_is_rejected() {
        let mut schema = FeatureSchema::fit(&training_batch());
        schema.categories.push(crate::schema::CategoryColumn {
            field: "ip_address".to_string(),
            value: "10.0.0.1".to_string(),
        });
        let record = TransactionRecord::new(monday_9am(), 500, "USD", "PAYMENT", "CARD");
        assert!(matches!(
            transform(&record, &schema),
            Err(FeatureError::SchemaMismatch(_))
        ));
    }

    #[test]
    fn test_batch_matches_single_transform() {
        let batch = training_batch();
        let schema = FeatureSchema::fit(&batch);
        let matrix = transform_batch(&batch, &schema).unwrap();
        assert_eq!(matrix.len(), 2);
        assert_eq!(matrix[0], transform(&batch[0], &schema).unwrap());
    }
}
