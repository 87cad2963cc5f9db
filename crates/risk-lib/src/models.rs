//! Core data models for the risk scorer

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::RiskError;

/// Crop categories the scorer understands.
///
/// `Maize` is the reference category under one-hot encoding with one level
/// dropped: it contributes no indicator column. Which categories a given
/// deployment actually accepts is declared by the model metadata, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CropType {
    Maize,
    Rice,
    Sorghum,
    Wheat,
}

impl CropType {
    pub const ALL: [CropType; 4] = [
        CropType::Maize,
        CropType::Rice,
        CropType::Sorghum,
        CropType::Wheat,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CropType::Maize => "maize",
            CropType::Rice => "rice",
            CropType::Sorghum => "sorghum",
            CropType::Wheat => "wheat",
        }
    }
}

impl fmt::Display for CropType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CropType {
    type Err = RiskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CropType::ALL
            .iter()
            .find(|c| c.name().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| {
                RiskError::invalid_input("crop_type", format!("unrecognized crop `{}`", s))
            })
    }
}

/// One set of environmental and storage measurements to score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputRecord {
    /// Storage temperature in degrees Celsius
    pub temperature: f32,
    /// Relative humidity in percent
    pub humidity: f32,
    /// Rainfall in millimeters
    pub rainfall: f32,
    /// Days in storage
    pub storage_days: u32,
    /// Grain moisture content in percent
    pub moisture_content: f32,
    /// Crop category
    pub crop_type: CropType,
}

/// Discretized, human-facing risk category.
///
/// The probability policy produces `Low`/`Medium`/`High`; the class policy
/// produces `Safe`/`Contaminated`. The derived ordering ranks tiers from
/// least to most severe.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskTier {
    Safe,
    Low,
    Medium,
    High,
    Contaminated,
}

impl RiskTier {
    pub fn label(&self) -> &'static str {
        match self {
            RiskTier::Safe => "SAFE",
            RiskTier::Low => "LOW RISK",
            RiskTier::Medium => "MEDIUM RISK",
            RiskTier::High => "HIGH RISK",
            RiskTier::Contaminated => "CONTAMINATED",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How the risk tier is derived from the classifier output.
///
/// Exactly one policy is in force per deployment; there is no per-call mixing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TierPolicy {
    /// Three tiers from the positive-class probability (falls back to the
    /// class mapping when the model exposes no probability)
    #[default]
    Probability,
    /// Two tiers keyed directly off the predicted class; probability, when
    /// present, is supporting evidence only
    Class,
}

impl FromStr for TierPolicy {
    type Err = RiskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "probability" => Ok(TierPolicy::Probability),
            "class" => Ok(TierPolicy::Class),
            other => Err(RiskError::invalid_input(
                "tier_policy",
                format!("must be `probability` or `class`, got `{}`", other),
            )),
        }
    }
}

/// Scoring output produced per request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringResult {
    /// True when the positive (contaminated) class was predicted
    pub predicted_class: bool,
    /// Probability of the positive class, when the model exposes one
    pub risk_probability: Option<f32>,
    /// Derived risk tier under the policy in force
    pub risk_tier: RiskTier,
    /// Version string of the model that produced this result
    pub model_version: String,
    /// Unix timestamp of when the result was produced
    pub generated_at: i64,
}
