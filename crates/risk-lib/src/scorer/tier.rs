//! Risk tier derivation
//!
//! Maps the classifier output to the human-facing traffic-light category.
//! Two policies exist; a deployment runs exactly one.

use crate::models::{RiskTier, TierPolicy};

/// Probability above which the tier is HIGH (strict greater-than)
pub const HIGH_RISK_PROBABILITY: f32 = 0.60;

/// Probability above which the tier is MEDIUM (strict greater-than)
pub const MEDIUM_RISK_PROBABILITY: f32 = 0.30;

/// Derive the tier under the configured policy.
///
/// The probability policy falls back to the class mapping when the model
/// exposes no probability estimate.
pub fn derive(policy: TierPolicy, label: u8, probability: Option<f32>) -> RiskTier {
    match policy {
        TierPolicy::Probability => match probability {
            Some(p) => from_probability(p),
            None => from_class(label),
        },
        TierPolicy::Class => from_class(label),
    }
}

/// Three-tier mapping from the positive-class probability.
///
/// Thresholds are strict: a probability of exactly 0.60 is MEDIUM and
/// exactly 0.30 is LOW.
pub fn from_probability(probability: f32) -> RiskTier {
    if probability > HIGH_RISK_PROBABILITY {
        RiskTier::High
    } else if probability > MEDIUM_RISK_PROBABILITY {
        RiskTier::Medium
    } else {
        RiskTier::Low
    }
}

/// Two-tier mapping from the predicted class
pub fn from_class(label: u8) -> RiskTier {
    if label == 1 {
        RiskTier::Contaminated
    } else {
        RiskTier::Safe
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probability_tiers() {
        assert_eq!(from_probability(0.18), RiskTier::Low);
        assert_eq!(from_probability(0.45), RiskTier::Medium);
        assert_eq!(from_probability(0.85), RiskTier::High);
    }

    #[test]
    fn test_boundaries_are_strict() {
        assert_eq!(from_probability(HIGH_RISK_PROBABILITY), RiskTier::Medium);
        assert_eq!(from_probability(MEDIUM_RISK_PROBABILITY), RiskTier::Low);
        assert_eq!(from_probability(0.0), RiskTier::Low);
        assert_eq!(from_probability(1.0), RiskTier::High);
    }

    #[test]
    fn test_monotonic_in_probability() {
        let mut last = RiskTier::Low;
        for i in 0..=100 {
            let tier = from_probability(i as f32 / 100.0);
            assert!(tier >= last, "tier dropped at p={}", i as f32 / 100.0);
            last = tier;
        }
    }

    #[test]
    fn test_class_tiers() {
        assert_eq!(from_class(0), RiskTier::Safe);
        assert_eq!(from_class(1), RiskTier::Contaminated);
    }

    #[test]
    fn test_class_policy_ignores_probability() {
        let tier = derive(TierPolicy::Class, 1, Some(0.10));
        assert_eq!(tier, RiskTier::Contaminated);
        let tier = derive(TierPolicy::Class, 0, Some(0.99));
        assert_eq!(tier, RiskTier::Safe);
    }

    #[test]
    fn test_probability_policy_falls_back_to_class() {
        assert_eq!(derive(TierPolicy::Probability, 1, None), RiskTier::Contaminated);
        assert_eq!(derive(TierPolicy::Probability, 0, None), RiskTier::Safe);
    }
}
