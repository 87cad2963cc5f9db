//! Error taxonomy for model loading and scoring

use thiserror::Error;

/// Errors produced while loading the classifier artifact or scoring input.
///
/// `ModelUnavailable` is fatal at startup and never retried; the other two
/// variants are local to a single scoring request and the caller may retry
/// with different input.
#[derive(Debug, Error)]
pub enum RiskError {
    /// The artifact path is missing or the artifact/metadata failed to
    /// deserialize. No scoring can proceed against an absent model.
    #[error("model unavailable: {reason}")]
    ModelUnavailable { reason: String },

    /// A field was outside its declared domain or the crop category is not
    /// in the model's vocabulary.
    #[error("invalid input: field `{field}` {reason}")]
    InvalidInput {
        field: &'static str,
        reason: String,
    },

    /// The classifier rejected the encoded record or raised during inference.
    #[error("prediction failed: {reason}")]
    PredictionFailed { reason: String },
}

impl RiskError {
    pub fn model_unavailable(reason: impl ToString) -> Self {
        Self::ModelUnavailable {
            reason: reason.to_string(),
        }
    }

    pub fn invalid_input(field: &'static str, reason: impl ToString) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.to_string(),
        }
    }

    pub fn prediction_failed(reason: impl ToString) -> Self {
        Self::PredictionFailed {
            reason: reason.to_string(),
        }
    }

    /// Name of the offending field for `InvalidInput`, if applicable
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::InvalidInput { field, .. } => Some(field),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_names_field() {
        let err = RiskError::invalid_input("crop_type", "unrecognized crop `barley`");
        assert_eq!(err.field(), Some("crop_type"));
        let msg = err.to_string();
        assert!(msg.contains("crop_type"), "message was: {}", msg);
        assert!(msg.contains("barley"), "message was: {}", msg);
    }

    #[test]
    fn test_other_variants_have_no_field() {
        assert!(RiskError::model_unavailable("missing").field().is_none());
        assert!(RiskError::prediction_failed("shape").field().is_none());
    }
}
