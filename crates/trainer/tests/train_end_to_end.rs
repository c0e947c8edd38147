//! End-to-end training pipeline tests: synthetic data through schema
//! fitting, forest training, evaluation, and artifact persistence.

use chrono::NaiveDate;
use fraudsim_features::{transform, transform_batch, FeatureSchema};
use fraudsim_model::{ModelPackage, TrainingParams};
use fraudsim_trainer::{evaluate, generate, Dataset, ForestTrainer, GeneratorConfig};
use fraudsim_types::TransactionRecord;

fn training_params() -> TrainingParams {
    TrainingParams {
        num_trees: 12,
        max_depth: 8,
        min_samples_split: 5,
        seed: 42,
        class_weighting: true,
        feature_subsampling: false,
    }
}

fn trained_package() -> ModelPackage {
    let mut dataset = Dataset::new(generate(&GeneratorConfig {
        num_records: 400,
        seed: 42,
    }));
    dataset.shuffle(42);

    let schema = FeatureSchema::fit(&dataset.records);
    let matrix = transform_batch(&dataset.records, &schema).unwrap();
    let labels = dataset.labels().unwrap();

    let model = ForestTrainer::new(training_params())
        .unwrap()
        .train(&matrix, &labels)
        .unwrap();
    ModelPackage::new(schema, model)
}

#[test]
fn high_amount_transfer_scores_as_likely_fraud() {
    let package = trained_package();

    // 2024-01-15T09:00:00 is a Monday: hour 9, day-of-week 0.
    let probe = TransactionRecord::new(
        NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap(),
        120_000,
        "USD",
        "TRANSFER",
        "CARD",
    );
    let vector = transform(&probe, &package.schema).unwrap();
    let probability = package.model.predict_proba(&vector).unwrap();

    assert!(probability >= 0.5, "got {probability}");
}

#[test]
fn fitted_schema_never_contains_leaky_columns() {
    let package = trained_package();
    for name in package.schema.column_names() {
        assert_ne!(name, "velocity");
        assert_ne!(name, "failed_attempts");
        assert!(!name.starts_with("status_"), "leaked column {name}");
    }
}

#[test]
fn training_twice_with_same_seed_is_identical() {
    let first = trained_package();
    let second = trained_package();

    assert_eq!(first.schema, second.schema);
    assert_eq!(first.model.trees, second.model.trees);

    let probe = transform(
        &TransactionRecord::new(
            NaiveDate::from_ymd_opt(2024, 2, 2)
                .unwrap()
                .and_hms_opt(13, 30, 0)
                .unwrap(),
            4_200,
            "EUR",
            "PAYMENT",
            "MOBILE",
        ),
        &first.schema,
    )
    .unwrap();
    assert_eq!(
        first.model.predict_proba(&probe).unwrap(),
        second.model.predict_proba(&probe).unwrap()
    );
}

#[test]
fn evaluation_on_holdout_beats_chance() {
    let mut dataset = Dataset::new(generate(&GeneratorConfig {
        num_records: 500,
        seed: 7,
    }));
    dataset.shuffle(7);
    let (train_set, test_set) = dataset.split(0.2).unwrap();

    let schema = FeatureSchema::fit(&train_set.records);
    let model = ForestTrainer::new(training_params())
        .unwrap()
        .train(
            &transform_batch(&train_set.records, &schema).unwrap(),
            &train_set.labels().unwrap(),
        )
        .unwrap();

    let report = evaluate(
        &model,
        &transform_batch(&test_set.records, &schema).unwrap(),
        &test_set.labels().unwrap(),
        0.5,
    )
    .unwrap();

    // Only the amount band is visible to the model, so recall on
    // velocity/IP-driven fraud is limited, but high-amount fraud is
    // fully separable and the classifier must do far better than a
    // coin flip on precision.
    assert!(report.precision > 0.6, "precision {}", report.precision);
    assert!(report.recall > 0.2, "recall {}", report.recall);
}

#[test]
fn persisted_package_scores_identically_after_reload() {
    let dir = tempfile::tempdir().unwrap();
    let package = trained_package();
    package.save(dir.path()).unwrap();
    let loaded = ModelPackage::load(dir.path()).unwrap();

    let probe = transform(
        &TransactionRecord::new(
            NaiveDate::from_ymd_opt(2024, 1, 15)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            120_000,
            "USD",
            "TRANSFER",
            "CARD",
        ),
        &loaded.schema,
    )
    .unwrap();

    assert_eq!(
        package.model.predict_proba(&probe).unwrap(),
        loaded.model.predict_proba(&probe).unwrap()
    );
}
