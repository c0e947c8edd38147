//! Deterministic synthetic transaction generator
//!
//! Reproduces the upstream simulator's record shape and rule-based
//! ground truth so end-to-end fixtures can be built without a live
//! provider. All randomness flows from the configured seed; the same
//! seed always yields the same batch.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use fraudsim_types::{TransactionRecord, CHANNELS, CURRENCIES, TRANSACTION_TYPES};
use tracing::info;

use crate::deterministic::LcgRng;

const LOCATIONS: &[&str] = &["Hyderabad", "Bangalore", "Mumbai", "Delhi"];

/// Amount bands the simulator draws from; the last band sits above
/// the labeling rule's 50000 cutoff.
const AMOUNT_BANDS: &[(u64, u64)] = &[(10, 5_000), (5_000, 20_000), (50_000, 200_000)];

/// Generator settings
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub num_records: usize,
    pub seed: i64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            num_records: 5_000,
            seed: 42,
        }
    }
}

/// The provider's labeling rule: high amount, high velocity, repeated
/// failures, or an IP inside the private 172.16.0.0–172.31.255.255
/// block.
pub fn ground_truth_label(record: &TransactionRecord) -> bool {
    record.amount > 50_000
        || record.velocity >= 4
        || record.failed_attempts >= 2
        || record
            .ip_address
            .as_deref()
            .is_some_and(is_private_172_block)
}

fn is_private_172_block(ip: &str) -> bool {
    let mut octets = ip.split('.');
    let first = octets.next().and_then(|o| o.parse::<u8>().ok());
    let second = octets.next().and_then(|o| o.parse::<u8>().ok());
    matches!((first, second), (Some(172), Some(16..=31)))
}

/// Generate a labeled batch under the rule-based ground truth.
pub fn generate(config: &GeneratorConfig) -> Vec<TransactionRecord> {
    let mut rng = LcgRng::new(config.seed);
    // Fixed epoch keeps batches reproducible across runs.
    let start: NaiveDateTime = NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();

    let mut records = Vec::with_capacity(config.num_records);
    for i in 0..config.num_records {
        records.push(generate_one(&mut rng, start, i));
    }

    let fraud = records.iter().filter(|r| r.is_fraud == Some(true)).count();
    info!(
        records = records.len(),
        fraud,
        seed = config.seed,
        "synthetic dataset generated"
    );
    records
}

fn generate_one(rng: &mut LcgRng, start: NaiveDateTime, index: usize) -> TransactionRecord {
    let (low, high) = AMOUNT_BANDS[rng.next_index(AMOUNT_BANDS.len())];
    let amount = low + rng.next_range((high - low) as i64) as u64;

    let velocity = rng.next_range(7) as u32;
    let failed_attempts = rng.next_range(5) as u32;
    let suspicious_ip = rng.next_unit() < 0.2;
    let ip_address = if suspicious_ip {
        format!(
            "172.{}.{}.{}",
            16 + rng.next_range(16),
            rng.next_range(256),
            rng.next_range(256)
        )
    } else {
        format!("192.168.{}.{}", rng.next_range(256), rng.next_range(256))
    };

    let timestamp = start + Duration::minutes(rng.next_range(43_200));

    let mut record = TransactionRecord::new(
        timestamp,
        amount,
        CURRENCIES[rng.next_index(CURRENCIES.len())],
        TRANSACTION_TYPES[rng.next_index(TRANSACTION_TYPES.len())],
        CHANNELS[rng.next_index(CHANNELS.len())],
    );
    record.transaction_id = Some(format!("TXN{}", 100_000 + index));
    record.sender_account = Some(format!("AC{}", 10_000_000 + rng.next_range(90_000_000)));
    record.receiver_account = Some(format!("AC{}", 10_000_000 + rng.next_range(90_000_000)));
    record.ip_address = Some(ip_address);
    record.location = Some(LOCATIONS[rng.next_index(LOCATIONS.len())].to_string());
    record.velocity = velocity;
    record.failed_attempts = failed_attempts;

    let is_fraud = ground_truth_label(&record);
    // The simulator settles fraudulent transactions as PENDING; this
    // is exactly why status-derived indicators are leaky.
    record.status = Some(if is_fraud { "PENDING" } else { "SUCCESS" }.to_string());
    record.is_fraud = Some(is_fraud);

    record
}
