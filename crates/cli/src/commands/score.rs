//! Scoring command

use anyhow::Result;
use risk_lib::{InputRecord, ModelStore, RiskScorer, TierPolicy};

use crate::output::{self, OutputFormat};

/// Score one record and render the risk band
pub fn run(
    store: &ModelStore,
    record: InputRecord,
    policy: TierPolicy,
    format: OutputFormat,
) -> Result<()> {
    let scorer = RiskScorer::new(store, policy);
    let result = scorer.score(&record)?;
    output::render_result(&result, format);
    Ok(())
}
