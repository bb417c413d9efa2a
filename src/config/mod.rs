pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{validate_file_extensions, validate_path, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "bingo-faces")]
#[command(about = "Generates collision-free bingo ticket faces from a verified face catalog")]
pub struct CliConfig {
    /// Path to the TOML batch plan
    #[arg(short, long, default_value = "batch-plan.toml")]
    pub plan: String,

    /// Seed for a reproducible run (overrides the plan)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Draw from the extended face catalog (overrides the plan)
    #[arg(long)]
    pub extended: bool,

    /// Output file for the generated tickets (overrides the plan)
    #[arg(short, long)]
    pub output: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,

    /// Import the catalog and show the schedule without generating
    #[arg(long)]
    pub dry_run: bool,
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("plan", &self.plan)?;
        validate_file_extensions("plan", std::slice::from_ref(&self.plan), &["toml"])?;
        if let Some(output) = &self.output {
            validate_path("output", output)?;
            validate_file_extensions("output", std::slice::from_ref(output), &["json"])?;
        }
        Ok(())
    }
}
