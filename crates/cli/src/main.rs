//! Grain mycotoxin risk form
//!
//! A command-line front end for the risk scorer: collects the six
//! environmental/storage measurements, loads the trained classifier once,
//! and renders a traffic-light risk message.

mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use risk_lib::{CropType, InputRecord, ModelStore, TierPolicy};
use std::path::Path;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Grain mycotoxin risk scorer
#[derive(Parser)]
#[command(name = "mycorisk")]
#[command(author, version, about = "Grain mycotoxin risk scorer", long_about = None)]
pub struct Cli {
    /// Path to the classifier artifact
    #[arg(long, env = "MYCORISK_MODEL_PATH")]
    pub model: Option<String>,

    /// Output format
    #[arg(long, short, default_value = "text")]
    pub format: output::OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score one set of measurements
    Score {
        /// Storage temperature in degrees Celsius (0-60)
        #[arg(long)]
        temperature: f32,

        /// Relative humidity in percent (0-100)
        #[arg(long)]
        humidity: f32,

        /// Rainfall in millimeters (0-500)
        #[arg(long)]
        rainfall: f32,

        /// Days in storage (0-365)
        #[arg(long)]
        storage_days: u32,

        /// Grain moisture content in percent (0-100)
        #[arg(long)]
        moisture: f32,

        /// Crop type (maize, rice, sorghum, wheat)
        #[arg(long)]
        crop: String,

        /// Tier policy: probability (three-tier) or class (two-tier)
        #[arg(long, env = "MYCORISK_TIER_POLICY")]
        policy: Option<String>,
    },

    /// Show the loaded model artifact
    Model,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();
    let config = config::FormConfig::load()?;

    // The artifact is loaded exactly once; a missing or corrupt model halts
    // here before any scoring is attempted.
    let model_path = cli.model.unwrap_or(config.model_path);
    let store = ModelStore::load(Path::new(&model_path))?;
    debug!(model = %model_path, "Ready to score");

    match cli.command {
        Commands::Score {
            temperature,
            humidity,
            rainfall,
            storage_days,
            moisture,
            crop,
            policy,
        } => {
            let crop_type: CropType = crop.parse()?;
            let policy: TierPolicy = policy.unwrap_or(config.tier_policy).parse()?;
            let record = InputRecord {
                temperature,
                humidity,
                rainfall,
                storage_days,
                moisture_content: moisture,
                crop_type,
            };
            commands::score::run(&store, record, policy, cli.format)?;
        }
        Commands::Model => {
            commands::model::run(&store, cli.format)?;
        }
    }

    Ok(())
}
