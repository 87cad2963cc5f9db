//! The risk-scoring decision procedure
//!
//! Turns one `InputRecord` into one `ScoringResult` against a loaded model
//! store: validate, encode to the store's declared mode, classify, tier.

pub mod tier;

use crate::encode;
use crate::error::RiskError;
use crate::models::{InputRecord, ScoringResult, TierPolicy};
use crate::store::{InputMode, ModelStore, Prediction};
use tracing::{debug, warn};

/// Scores input records against an injected, read-only model store.
///
/// Each `score` call is a pure function of the record and the loaded model;
/// nothing is mutated and failed calls leave no partial state behind.
pub struct RiskScorer<'a> {
    store: &'a ModelStore,
    policy: TierPolicy,
}

impl<'a> RiskScorer<'a> {
    pub fn new(store: &'a ModelStore, policy: TierPolicy) -> Self {
        Self { store, policy }
    }

    /// Score one record.
    ///
    /// Fails with `InvalidInput` naming the offending field when a value is
    /// outside its domain, or `PredictionFailed` when the store rejects the
    /// encoded record. Both are local to this call.
    pub fn score(&self, record: &InputRecord) -> Result<ScoringResult, RiskError> {
        if let Err(e) = validate(record, self.store.vocabulary()) {
            warn!(error = %e, "Rejected scoring request");
            return Err(e);
        }

        let prediction = self.classify(record)?;

        let risk_tier = tier::derive(self.policy, prediction.label, prediction.positive_probability);
        debug!(
            label = prediction.label,
            probability = ?prediction.positive_probability,
            tier = %risk_tier,
            "Scored record"
        );

        Ok(ScoringResult {
            predicted_class: prediction.label == 1,
            risk_probability: prediction.positive_probability,
            risk_tier,
            model_version: self.store.version().to_string(),
            generated_at: chrono::Utc::now().timestamp(),
        })
    }

    fn classify(&self, record: &InputRecord) -> Result<Prediction, RiskError> {
        match self.store.input_mode() {
            InputMode::RawVector => {
                let features = encode::encode_record(record, self.store.vocabulary())?;
                self.store.run(&features)
            }
            InputMode::Structured => self.store.classify_record(record),
        }
    }
}

/// Domain bounds for the numeric fields
const TEMPERATURE_RANGE: (f32, f32) = (0.0, 60.0);
const HUMIDITY_RANGE: (f32, f32) = (0.0, 100.0);
const RAINFALL_RANGE: (f32, f32) = (0.0, 500.0);
const MOISTURE_RANGE: (f32, f32) = (0.0, 100.0);
const MAX_STORAGE_DAYS: u32 = 365;

/// Check every field against its declared domain.
///
/// The form UI is expected to constrain ranges already; this is the
/// defensive backstop behind it.
fn validate(record: &InputRecord, vocabulary: &[String]) -> Result<(), RiskError> {
    check_range("temperature", record.temperature, TEMPERATURE_RANGE)?;
    check_range("humidity", record.humidity, HUMIDITY_RANGE)?;
    check_range("rainfall", record.rainfall, RAINFALL_RANGE)?;
    check_range("moisture_content", record.moisture_content, MOISTURE_RANGE)?;

    if record.storage_days > MAX_STORAGE_DAYS {
        return Err(RiskError::invalid_input(
            "storage_days",
            format!("must be at most {}, got {}", MAX_STORAGE_DAYS, record.storage_days),
        ));
    }

    let crop = record.crop_type.name();
    if !vocabulary.iter().any(|v| v == crop) {
        return Err(RiskError::invalid_input(
            "crop_type",
            format!(
                "crop `{}` is not in the model vocabulary [{}]",
                crop,
                vocabulary.join(", ")
            ),
        ));
    }

    Ok(())
}

fn check_range(field: &'static str, value: f32, (min, max): (f32, f32)) -> Result<(), RiskError> {
    if !value.is_finite() {
        return Err(RiskError::invalid_input(field, "must be finite"));
    }
    if value < min || value > max {
        return Err(RiskError::invalid_input(
            field,
            format!("must be between {} and {}, got {}", min, max, value),
        ));
    }
    Ok(())
}
