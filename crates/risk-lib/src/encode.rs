//! Feature encoding for the classifier input contract
//!
//! The classifier consumes a fixed-order numeric vector: the five numeric
//! measurements followed by one indicator column per non-reference crop in
//! the model's vocabulary (one-hot with the first vocabulary entry dropped).

use crate::error::RiskError;
use crate::models::InputRecord;

/// Number of numeric features preceding the crop indicators
pub const NUM_NUMERIC_FEATURES: usize = 5;

/// Total feature width for a given crop vocabulary
pub fn feature_width(vocabulary: &[String]) -> usize {
    NUM_NUMERIC_FEATURES + vocabulary.len().saturating_sub(1)
}

/// Encode a record into the fixed-order feature vector.
///
/// The first vocabulary entry is the reference category and contributes no
/// column; every other entry contributes one indicator in vocabulary order.
/// A crop outside the vocabulary is rejected, never defaulted to the
/// reference category.
pub fn encode_record(record: &InputRecord, vocabulary: &[String]) -> Result<Vec<f32>, RiskError> {
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

    let mut features = Vec::with_capacity(feature_width(vocabulary));
    features.push(record.temperature);
    features.push(record.humidity);
    features.push(record.rainfall);
    features.push(record.storage_days as f32);
    features.push(record.moisture_content);
    for category in &vocabulary[1..] {
        features.push(if category == crop { 1.0 } else { 0.0 });
    }

    Ok(features)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CropType;

    fn vocabulary() -> Vec<String> {
        ["maize", "rice", "sorghum", "wheat"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn record(crop: CropType) -> InputRecord {
        InputRecord {
            temperature: 25.0,
            humidity: 60.0,
            rainfall: 100.0,
            storage_days: 30,
            moisture_content: 12.0,
            crop_type: crop,
        }
    }

    #[test]
    fn test_feature_width() {
        assert_eq!(feature_width(&vocabulary()), 8);
    }

    #[test]
    fn test_numeric_features_in_declared_order() {
        let features = encode_record(&record(CropType::Maize), &vocabulary()).unwrap();
        assert_eq!(&features[..5], &[25.0, 60.0, 100.0, 30.0, 12.0]);
    }

    #[test]
    fn test_reference_crop_all_zero_indicators() {
        let features = encode_record(&record(CropType::Maize), &vocabulary()).unwrap();
        assert_eq!(&features[5..], &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_non_reference_crop_single_indicator() {
        let features = encode_record(&record(CropType::Sorghum), &vocabulary()).unwrap();
        assert_eq!(&features[5..], &[0.0, 1.0, 0.0]);

        let features = encode_record(&record(CropType::Wheat), &vocabulary()).unwrap();
        assert_eq!(&features[5..], &[0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_crop_outside_vocabulary_rejected() {
        // Deployment vocabulary without wheat
        let vocab: Vec<String> = ["maize", "rice"].iter().map(|s| s.to_string()).collect();
        let err = encode_record(&record(CropType::Wheat), &vocab).unwrap_err();
        assert_eq!(err.field(), Some("crop_type"));
    }
}
