//! Labeled transaction datasets
//!
//! CSV loading/writing in the upstream provider's column layout, plus
//! deterministic hash-ordered shuffling and holdout splitting.

use chrono::NaiveDateTime;
use fraudsim_types::TransactionRecord;
use std::path::Path;

use crate::deterministic::xxhash64_i64;
use crate::errors::{Result, TrainError};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const HEADER: &str = "transactionId,timestamp,amount,currency,transactionType,channel,\
senderAccount,receiverAccount,ip_address,location,velocity,failed_attempts,status,is_fraud";

/// A batch of labeled raw transactions.
#[derive(Clone, Debug)]
pub struct Dataset {
    pub records: Vec<TransactionRecord>,
}

impl Dataset {
    pub fn new(records: Vec<TransactionRecord>) -> Self {
        Self { records }
    }

    /// Load a dataset from CSV in the provider's column layout.
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let mut lines = content.lines().enumerate();

        let (_, header) = lines
            .next()
            .ok_or_else(|| TrainError::EmptyDataset("dataset file is empty".into()))?;
        let columns: Vec<&str> = header.split(',').map(str::trim).collect();

        let mut records = Vec::new();
        for (line_idx, line) in lines {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let fields: Vec<&str> = line.split(',').map(str::trim).collect();
            if fields.len() != columns.len() {
                return Err(TrainError::Dataset(format!(
                    "line {}: expected {} columns, got {}",
                    line_idx + 1,
                    columns.len(),
                    fields.len()
                )));
            }

            records.push(parse_record(&columns, &fields, line_idx + 1)?);
        }

        if records.is_empty() {
            return Err(TrainError::EmptyDataset(
                "dataset contains no records".into(),
            ));
        }

        Ok(Self { records })
    }

    /// Write the dataset back out in the same layout.
    pub fn to_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut out = String::with_capacity(self.records.len() * 96);
        out.push_str(HEADER);
        out.push('\n');

        for r in &self.records {
            let row = [
                r.transaction_id.clone().unwrap_or_default(),
                r.timestamp.format(TIMESTAMP_FORMAT).to_string(),
                r.amount.to_string(),
                r.currency.clone(),
                r.transaction_type.clone(),
                r.channel.clone(),
                r.sender_account.clone().unwrap_or_default(),
                r.receiver_account.clone().unwrap_or_default(),
                r.ip_address.clone().unwrap_or_default(),
                r.location.clone().unwrap_or_default(),
                r.velocity.to_string(),
                r.failed_attempts.to_string(),
                r.status.clone().unwrap_or_default(),
                match r.is_fraud {
                    Some(true) => "1".to_string(),
                    Some(false) => "0".to_string(),
                    None => String::new(),
                },
            ];
            out.push_str(&row.join(","));
            out.push('\n');
        }

        std::fs::write(path.as_ref(), out)?;
        Ok(())
    }

    /// Deterministically shuffle records by hash order.
    pub fn shuffle(&mut self, seed: i64) {
        let mut keyed: Vec<(i64, usize)> = self
            .records
            .iter()
            .enumerate()
            .map(|(i, r)| {
                let key = xxhash64_i64(
                    &[
                        r.amount as i64,
                        i64::from(r.velocity),
                        i64::from(r.failed_attempts),
                        i as i64,
                    ],
                    seed,
                );
                (key, i)
            })
            .collect();
        keyed.sort_by_key(|(hash, _)| *hash);

        let mut shuffled = Vec::with_capacity(self.records.len());
        for (_, idx) in keyed {
            shuffled.push(self.records[idx].clone());
        }
        self.records = shuffled;
    }

    /// Split off the trailing fraction as a held-out test set.
    pub fn split(mut self, test_fraction: f64) -> Result<(Dataset, Dataset)> {
        if !(0.0..1.0).contains(&test_fraction) {
            return Err(TrainError::InvalidConfiguration(format!(
                "test fraction must be in [0, 1), got {test_fraction}"
            )));
        }
        let test_len = (self.records.len() as f64 * test_fraction) as usize;
        let cut = self.records.len() - test_len;
        let test = self.records.split_off(cut);
        Ok((Dataset::new(self.records), Dataset::new(test)))
    }

    /// Ground-truth labels; every record must carry one.
    pub fn labels(&self) -> Result<Vec<u8>> {
        self.records
            .iter()
            .enumerate()
            .map(|(i, r)| {
                r.is_fraud.map(u8::from).ok_or_else(|| {
                    TrainError::Dataset(format!("record {i} has no is_fraud label"))
                })
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn parse_record(columns: &[&str], fields: &[&str], line: usize) -> Result<TransactionRecord> {
    let get = |name: &str| -> Option<&str> {
        columns
            .iter()
            .position(|&c| c == name)
            .map(|i| fields[i])
            .filter(|v| !v.is_empty())
    };

    let required = |name: &str| -> Result<&str> {
        get(name).ok_or_else(|| TrainError::Dataset(format!("line {line}: missing {name}")))
    };

    let timestamp = NaiveDateTime::parse_from_str(required("timestamp")?, TIMESTAMP_FORMAT)
        .map_err(|e| TrainError::Dataset(format!("line {line}: bad timestamp: {e}")))?;
    let amount: u64 = required("amount")?
        .parse()
        .map_err(|e| TrainError::Dataset(format!("line {line}: bad amount: {e}")))?;

    let mut record = TransactionRecord::new(
        timestamp,
        amount,
        required("currency")?,
        required("transactionType")?,
        required("channel")?,
    );
    record.transaction_id = get("transactionId").map(str::to_string);
    record.sender_account = get("senderAccount").map(str::to_string);
    record.receiver_account = get("receiverAccount").map(str::to_string);
    record.ip_address = get("ip_address").map(str::to_string);
    record.location = get("location").map(str::to_string);
    record.velocity = get("velocity")
        .map(|v| v.parse())
        .transpose()
        .map_err(|e| TrainError::Dataset(format!("line {line}: bad velocity: {e}")))?
        .unwrap_or(0);
    record.failed_attempts = get("failed_attempts")
        .map(|v| v.parse())
        .transpose()
        .map_err(|e| TrainError::Dataset(format!("line {line}: bad failed_attempts: {e}")))?
        .unwrap_or(0);
    record.status = get("status").map(str::to_string);
    record.is_fraud = match get("is_fraud") {
        Some("1") | Some("true") => Some(true),
        Some("0") | Some("false") => Some(false),
        Some(other) => {
            return Err(TrainError::Dataset(format!(
                "line {line}: bad is_fraud value {other:?}"
            )))
        }
        None => None,
    };

    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{generate, GeneratorConfig};

    fn sample_dataset() -> Dataset {
        Dataset::new(generate(&GeneratorConfig {
            num_records: 50,
            seed: 42,
        }))
    }

    #[test]
    fn test_csv_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transactions.csv");

        let dataset = sample_dataset();
        dataset.to_csv(&path).unwrap();
        let loaded = Dataset::from_csv(&path).unwrap();

        assert_eq!(dataset.records, loaded.records);
    }

    #[test]
    fn test_empty_file_is_empty_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        std::fs::write(&path, format!("{HEADER}\n")).unwrap();
        assert!(matches!(
            Dataset::from_csv(&path),
            Err(TrainError::EmptyDataset(_))
        ));
    }

    #[test]
    fn test_ragged_line_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(&path, format!("{HEADER}\na,b,c\n")).unwrap();
        assert!(matches!(
            Dataset::from_csv(&path),
            Err(TrainError::Dataset(_))
        ));
    }

    #[test]
    fn test_shuffle_is_deterministic() {
        let mut d1 = sample_dataset();
        let mut d2 = sample_dataset();
        d1.shuffle(7);
        d2.shuffle(7);
        assert_eq!(d1.records, d2.records);

        let mut d3 = sample_dataset();
        d3.shuffle(8);
        assert_ne!(d1.records, d3.records);
    }

    #[test]
    fn test_split_sizes() {
        let dataset = sample_dataset();
        let (train, test) = dataset.split(0.2).unwrap();
        assert_eq!(train.len(), 40);
        assert_eq!(test.len(), 10);
    }

    #[test]
    fn test_labels_present_on_generated_data() {
        let dataset = sample_dataset();
        let labels = dataset.labels().unwrap();
        assert_eq!(labels.len(), dataset.len());
        assert!(labels.iter().all(|&l| l <= 1));
    }
}
