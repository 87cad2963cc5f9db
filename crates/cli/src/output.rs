//! Output formatting utilities

use clap::ValueEnum;
use colored::Colorize;
use risk_lib::{RiskTier, ScoringResult};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Colored risk band (default)
    #[default]
    Text,
    /// JSON format
    Json,
}

/// Render a scoring result in the requested format
pub fn render_result(result: &ScoringResult, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(result) {
                println!("{}", json);
            }
        }
        OutputFormat::Text => print_band(result),
    }
}

/// The uncolored message band for a result
pub fn band_text(result: &ScoringResult) -> String {
    match result.risk_probability {
        Some(p) => format!("{} ({})", result.risk_tier.label(), format_probability(p)),
        None => result.risk_tier.label().to_string(),
    }
}

fn print_band(result: &ScoringResult) {
    let text = band_text(result);
    match result.risk_tier {
        RiskTier::High | RiskTier::Contaminated => {
            println!("{} {}", "✗".red().bold(), text.red().bold())
        }
        RiskTier::Medium => println!("{} {}", "⚠".yellow().bold(), text.yellow().bold()),
        RiskTier::Low | RiskTier::Safe => println!("{} {}", "✓".green().bold(), text.green()),
    }
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Format a probability as a percentage
pub fn format_probability(probability: f32) -> String {
    format!("{:.2}%", probability * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(tier: RiskTier, probability: Option<f32>) -> ScoringResult {
        ScoringResult {
            predicted_class: matches!(tier, RiskTier::High | RiskTier::Contaminated),
            risk_probability: probability,
            risk_tier: tier,
            model_version: "v1.0.0".to_string(),
            generated_at: 0,
        }
    }

    #[test]
    fn test_format_probability() {
        assert_eq!(format_probability(0.85), "85.00%");
        assert_eq!(format_probability(0.0), "0.00%");
    }

    #[test]
    fn test_band_text_with_probability() {
        let text = band_text(&result(RiskTier::High, Some(0.85)));
        assert_eq!(text, "HIGH RISK (85.00%)");
    }

    #[test]
    fn test_band_text_without_probability() {
        let text = band_text(&result(RiskTier::Contaminated, None));
        assert_eq!(text, "CONTAMINATED");
    }

    #[test]
    fn test_result_json_surfaces_tier_and_probability() {
        let json = serde_json::to_string(&result(RiskTier::Medium, Some(0.45))).unwrap();
        assert!(json.contains("\"MEDIUM\""), "was: {}", json);
        assert!(json.contains("0.45"), "was: {}", json);
    }
}
