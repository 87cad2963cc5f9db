//! ONNX Runtime inference using tract
//!
//! Wraps a trained binary classifier loaded via tract-onnx. The graph takes
//! the encoded feature vector and emits either per-class probabilities or a
//! bare class label, per the artifact metadata.

use super::{Classifier, ModelMetadata, Prediction, ScalerParams};
use crate::encode::feature_width;
use crate::error::RiskError;
use std::time::Instant;
use tract_onnx::prelude::*;
use tracing::debug;

type TractModel = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// Standard-scaler transform: `(x - mean) / scale` per feature
fn apply_scaler(features: &[f32], params: &ScalerParams) -> Vec<f32> {
    features
        .iter()
        .zip(params.mean.iter().zip(params.scale.iter()))
        .map(|(x, (mean, scale))| (x - mean) / scale)
        .collect()
}

/// Classifier backed by a tract-onnx model
pub struct OnnxClassifier {
    model: TractModel,
    feature_width: usize,
    probability_output: bool,
    positive_index: usize,
    scaler: Option<ScalerParams>,
}

impl std::fmt::Debug for OnnxClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxClassifier")
            .field("feature_width", &self.feature_width)
            .field("probability_output", &self.probability_output)
            .field("positive_index", &self.positive_index)
            .field("scaler", &self.scaler)
            .finish_non_exhaustive()
    }
}

impl OnnxClassifier {
    /// Parse and optimize the artifact bytes against the declared contract
    pub fn new(model_bytes: &[u8], metadata: &ModelMetadata) -> Result<Self, RiskError> {
        let width = feature_width(&metadata.crop_vocabulary);
        let model = Self::load_model(model_bytes, width)?;

        Ok(Self {
            model,
            feature_width: width,
            probability_output: metadata.probability_output,
            positive_index: metadata.positive_class_index(),
            scaler: metadata.scaler.clone(),
        })
    }

    fn load_model(model_bytes: &[u8], width: usize) -> Result<TractModel, RiskError> {
        tract_onnx::onnx()
            .model_for_read(&mut std::io::Cursor::new(model_bytes))
            .map_err(|e| RiskError::model_unavailable(format!("failed to parse ONNX model: {}", e)))?
            .with_input_fact(0, f32::fact([1, width]).into())
            .map_err(|e| RiskError::model_unavailable(format!("failed to set input shape: {}", e)))?
            .into_optimized()
            .map_err(|e| RiskError::model_unavailable(format!("failed to optimize model: {}", e)))?
            .into_runnable()
            .map_err(|e| {
                RiskError::model_unavailable(format!("failed to create runnable model: {}", e))
            })
    }

    /// Apply the standard scaler declared by the metadata, if any
    fn scale(&self, features: &[f32]) -> Vec<f32> {
        match &self.scaler {
            Some(params) => apply_scaler(features, params),
            None => features.to_vec(),
        }
    }

    fn features_to_tensor(&self, features: Vec<f32>) -> Result<Tensor, RiskError> {
        let array = tract_ndarray::Array2::from_shape_vec((1, self.feature_width), features)
            .map_err(|e| RiskError::prediction_failed(format!("bad input shape: {}", e)))?;
        Ok(array.into())
    }
}

impl Classifier for OnnxClassifier {
    fn classify(&self, features: &[f32]) -> Result<Prediction, RiskError> {
        if features.len() != self.feature_width {
            return Err(RiskError::prediction_failed(format!(
                "model expects {} features, got {}",
                self.feature_width,
                features.len()
            )));
        }

        let start = Instant::now();
        let input = self.features_to_tensor(self.scale(features))?;

        let result = self
            .model
            .run(tvec!(input.into()))
            .map_err(|e| RiskError::prediction_failed(format!("inference error: {}", e)))?;
        let output = result
            .first()
            .ok_or_else(|| RiskError::prediction_failed("no output from model"))?;
        let output_view = output
            .to_array_view::<f32>()
            .map_err(|e| RiskError::prediction_failed(format!("unreadable model output: {}", e)))?;
        let values: Vec<f32> = output_view.iter().copied().collect();

        debug!(elapsed_us = start.elapsed().as_micros(), "Inference completed");

        if self.probability_output {
            let probability = values.get(self.positive_index).copied().ok_or_else(|| {
                RiskError::prediction_failed(format!(
                    "model output has {} values, positive class column is {}",
                    values.len(),
                    self.positive_index
                ))
            })?;
            let probability = probability.clamp(0.0, 1.0);
            Ok(Prediction {
                label: u8::from(probability > 0.5),
                positive_probability: Some(probability),
            })
        } else {
            let label = values
                .first()
                .copied()
                .ok_or_else(|| RiskError::prediction_failed("empty model output"))?;
            Ok(Prediction {
                label: u8::from(label >= 0.5),
                positive_probability: None,
            })
        }
    }

    fn supports_probability(&self) -> bool {
        self.probability_output
    }
}
