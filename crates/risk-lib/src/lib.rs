//! Risk scoring library for grain storage mycotoxin assessment
//!
//! This crate provides the core functionality for:
//! - Loading a trained classifier artifact from disk
//! - Validating and encoding environmental/storage measurements
//! - Scoring inputs and deriving traffic-light risk tiers

pub mod encode;
pub mod error;
pub mod models;
pub mod scorer;
pub mod store;

pub use error::RiskError;
pub use models::*;
pub use scorer::{tier, RiskScorer};
pub use store::{Classifier, InputMode, ModelMetadata, ModelStore, OnnxClassifier, Prediction};
