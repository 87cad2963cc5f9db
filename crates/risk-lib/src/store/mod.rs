//! Classifier artifact loading and the inference contract
//!
//! The store deserializes a trained classifier artifact once at startup and
//! holds it read-only for the process lifetime. A sidecar metadata file next
//! to the artifact declares the input contract: which encoding mode the
//! model expects, its crop vocabulary, the class ordering of its probability
//! columns, and optional standard-scaler parameters.

mod onnx;

pub use onnx::OnnxClassifier;

use crate::encode::{self, feature_width};
use crate::error::RiskError;
use crate::models::InputRecord;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Default artifact filename in the working directory
pub const DEFAULT_MODEL_PATH: &str = "model_pipeline.onnx";

/// Which representation the classifier expects at its boundary.
///
/// A deployment commits to exactly one mode at load time; the scorer never
/// guesses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputMode {
    /// The caller pre-encodes the fixed-order numeric vector, crop one-hot
    /// encoded with the reference category dropped
    RawVector,
    /// The caller hands the record through and the store encodes the
    /// categorical field itself
    Structured,
}

/// Standard-scaler parameters applied feature-wise before inference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalerParams {
    pub mean: Vec<f32>,
    pub scale: Vec<f32>,
}

/// Load-time contract declared by the artifact's sidecar metadata file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Model version string
    pub version: String,
    /// Encoding mode the classifier expects
    pub input_mode: InputMode,
    /// Recognized crop names in column order; the first entry is the
    /// reference category
    pub crop_vocabulary: Vec<String>,
    /// Order of the classifier's probability columns, so the positive class
    /// is selected by identity rather than position
    #[serde(default = "default_class_labels")]
    pub class_labels: Vec<u8>,
    /// Whether the graph emits per-class probabilities or a bare label
    #[serde(default)]
    pub probability_output: bool,
    /// Optional scaling applied to the feature vector before inference
    #[serde(default)]
    pub scaler: Option<ScalerParams>,
}

fn default_class_labels() -> Vec<u8> {
    vec![0, 1]
}

impl ModelMetadata {
    /// Column index of the positive (contaminated) class
    pub fn positive_class_index(&self) -> usize {
        // Validated at load time, so the position always exists
        self.class_labels.iter().position(|&c| c == 1).unwrap_or(1)
    }

    fn validate(&self) -> Result<(), RiskError> {
        if self.crop_vocabulary.is_empty() {
            return Err(RiskError::model_unavailable(
                "metadata declares an empty crop vocabulary",
            ));
        }
        if self.class_labels.len() != 2
            || !self.class_labels.contains(&0)
            || !self.class_labels.contains(&1)
        {
            return Err(RiskError::model_unavailable(format!(
                "metadata class_labels must be a permutation of [0, 1], got {:?}",
                self.class_labels
            )));
        }
        if let Some(scaler) = &self.scaler {
            let width = feature_width(&self.crop_vocabulary);
            if scaler.mean.len() != width || scaler.scale.len() != width {
                return Err(RiskError::model_unavailable(format!(
                    "scaler expects {} parameters per array, got mean={} scale={}",
                    width,
                    scaler.mean.len(),
                    scaler.scale.len()
                )));
            }
            if scaler.mean.iter().any(|v| !v.is_finite())
                || scaler.scale.iter().any(|v| !v.is_finite() || *v == 0.0)
            {
                return Err(RiskError::model_unavailable(
                    "scaler parameters must be finite with non-zero scale",
                ));
            }
        }
        Ok(())
    }
}

/// Output of one classification call
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// Predicted class, 1 = contaminated/high-risk
    pub label: u8,
    /// Probability of the positive class, when supported
    pub positive_probability: Option<f32>,
}

/// Inference contract the store exposes to the scorer.
///
/// `classify` is mandatory; probability support is a capability fixed at
/// load time, not probed per call.
pub trait Classifier: Send + Sync {
    /// Classify an encoded feature vector
    fn classify(&self, features: &[f32]) -> Result<Prediction, RiskError>;

    /// Whether `classify` yields a positive-class probability
    fn supports_probability(&self) -> bool;
}

/// Summary of the loaded artifact for display
#[derive(Debug, Clone, Serialize)]
pub struct StoreInfo {
    pub version: String,
    pub checksum: String,
    pub size_bytes: usize,
    pub input_mode: InputMode,
    pub crop_vocabulary: Vec<String>,
    pub supports_probability: bool,
}

/// A loaded classifier artifact, shared read-only for the process lifetime
pub struct ModelStore {
    classifier: Box<dyn Classifier>,
    metadata: ModelMetadata,
    checksum: String,
    size_bytes: usize,
}

impl std::fmt::Debug for ModelStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelStore")
            .field("metadata", &self.metadata)
            .field("checksum", &self.checksum)
            .field("size_bytes", &self.size_bytes)
            .finish_non_exhaustive()
    }
}

impl ModelStore {
    /// Load the artifact and its sidecar metadata from disk.
    ///
    /// Any missing file, unreadable artifact, or invalid metadata fails with
    /// `ModelUnavailable`; the caller must not proceed to scoring.
    pub fn load(path: &Path) -> Result<Self, RiskError> {
        let bytes = fs::read(path).map_err(|e| {
            RiskError::model_unavailable(format!(
                "failed to read artifact {}: {}",
                path.display(),
                e
            ))
        })?;

        let metadata = load_metadata(&metadata_path(path))?;
        metadata.validate()?;

        let checksum = compute_checksum(&bytes);
        let classifier = OnnxClassifier::new(&bytes, &metadata)?;

        info!(
            version = %metadata.version,
            path = %path.display(),
            size = bytes.len(),
            checksum = %checksum,
            mode = ?metadata.input_mode,
            probability = metadata.probability_output,
            "Loaded classifier artifact"
        );

        Ok(Self {
            classifier: Box::new(classifier),
            metadata,
            checksum,
            size_bytes: bytes.len(),
        })
    }

    /// Build a store around an already-constructed classifier.
    ///
    /// Used by tests to inject fakes through the `Classifier` trait.
    pub fn from_classifier(classifier: Box<dyn Classifier>, metadata: ModelMetadata) -> Self {
        Self {
            classifier,
            metadata,
            checksum: String::new(),
            size_bytes: 0,
        }
    }

    pub fn input_mode(&self) -> InputMode {
        self.metadata.input_mode
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.metadata.crop_vocabulary
    }

    /// The category represented by all-zero indicator columns
    pub fn reference_crop(&self) -> &str {
        &self.metadata.crop_vocabulary[0]
    }

    pub fn version(&self) -> &str {
        &self.metadata.version
    }

    pub fn supports_probability(&self) -> bool {
        self.classifier.supports_probability()
    }

    pub fn info(&self) -> StoreInfo {
        StoreInfo {
            version: self.metadata.version.clone(),
            checksum: self.checksum.clone(),
            size_bytes: self.size_bytes,
            input_mode: self.metadata.input_mode,
            crop_vocabulary: self.metadata.crop_vocabulary.clone(),
            supports_probability: self.supports_probability(),
        }
    }

    /// Classify a pre-encoded feature vector (Mode A)
    pub fn run(&self, features: &[f32]) -> Result<Prediction, RiskError> {
        self.classifier.classify(features)
    }

    /// Classify a structured record, encoding the categorical field here
    /// (Mode B)
    pub fn classify_record(&self, record: &InputRecord) -> Result<Prediction, RiskError> {
        let features = encode::encode_record(record, &self.metadata.crop_vocabulary)?;
        self.classifier.classify(&features)
    }
}

/// Sidecar metadata path: the artifact path with a `.json` extension
fn metadata_path(model_path: &Path) -> PathBuf {
    model_path.with_extension("json")
}

fn load_metadata(path: &Path) -> Result<ModelMetadata, RiskError> {
    let content = fs::read_to_string(path).map_err(|e| {
        RiskError::model_unavailable(format!(
            "failed to read model metadata {}: {}",
            path.display(),
            e
        ))
    })?;
    serde_json::from_str(&content).map_err(|e| {
        RiskError::model_unavailable(format!(
            "failed to parse model metadata {}: {}",
            path.display(),
            e
        ))
    })
}

/// Compute SHA256 checksum of the artifact bytes
fn compute_checksum(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn metadata() -> ModelMetadata {
        ModelMetadata {
            version: "v1.0.0".to_string(),
            input_mode: InputMode::RawVector,
            crop_vocabulary: ["maize", "rice", "sorghum", "wheat"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            class_labels: vec![0, 1],
            probability_output: true,
            scaler: None,
        }
    }

    #[test]
    fn test_missing_artifact_is_model_unavailable() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("does_not_exist.onnx");
        let err = ModelStore::load(&path).unwrap_err();
        assert!(matches!(err, RiskError::ModelUnavailable { .. }));
    }

    #[test]
    fn test_missing_metadata_is_model_unavailable() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("model_pipeline.onnx");
        fs::write(&path, b"not a real model").unwrap();

        let err = ModelStore::load(&path).unwrap_err();
        assert!(matches!(err, RiskError::ModelUnavailable { .. }));
        assert!(err.to_string().contains("metadata"), "was: {}", err);
    }

    #[test]
    fn test_corrupt_artifact_is_model_unavailable() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("model_pipeline.onnx");
        fs::write(&path, b"not a real model").unwrap();
        fs::write(
            temp_dir.path().join("model_pipeline.json"),
            serde_json::to_string(&metadata()).unwrap(),
        )
        .unwrap();

        let err = ModelStore::load(&path).unwrap_err();
        assert!(matches!(err, RiskError::ModelUnavailable { .. }));
    }

    #[test]
    fn test_metadata_rejects_empty_vocabulary() {
        let mut md = metadata();
        md.crop_vocabulary.clear();
        assert!(md.validate().is_err());
    }

    #[test]
    fn test_metadata_rejects_bad_class_labels() {
        let mut md = metadata();
        md.class_labels = vec![1, 2];
        assert!(md.validate().is_err());

        md.class_labels = vec![0, 1, 1];
        assert!(md.validate().is_err());
    }

    #[test]
    fn test_metadata_rejects_mismatched_scaler() {
        let mut md = metadata();
        md.scaler = Some(ScalerParams {
            mean: vec![0.0; 3],
            scale: vec![1.0; 3],
        });
        assert!(md.validate().is_err());
    }

    #[test]
    fn test_metadata_rejects_zero_scale() {
        let mut md = metadata();
        md.scaler = Some(ScalerParams {
            mean: vec![0.0; 8],
            scale: vec![0.0; 8],
        });
        assert!(md.validate().is_err());
    }

    #[test]
    fn test_positive_class_index_by_identity() {
        let mut md = metadata();
        assert_eq!(md.positive_class_index(), 1);
        md.class_labels = vec![1, 0];
        assert_eq!(md.positive_class_index(), 0);
    }

    #[test]
    fn test_metadata_parse_with_defaults() {
        let md: ModelMetadata = serde_json::from_str(
            r#"{
                "version": "v2.1.0",
                "input_mode": "structured",
                "crop_vocabulary": ["maize", "rice"]
            }"#,
        )
        .unwrap();
        assert_eq!(md.input_mode, InputMode::Structured);
        assert_eq!(md.class_labels, vec![0, 1]);
        assert!(!md.probability_output);
        assert!(md.scaler.is_none());
    }

    #[test]
    fn test_checksum_consistency() {
        let data = b"model bytes";
        assert_eq!(compute_checksum(data), compute_checksum(data));
        assert_eq!(compute_checksum(data).len(), 64);
    }

    #[test]
    fn test_metadata_path() {
        assert_eq!(
            metadata_path(Path::new("model_pipeline.onnx")),
            PathBuf::from("model_pipeline.json")
        );
    }
}
