pub mod toml_config;

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;
#[cfg(feature = "cli")]
use toml_config::DemoConfig;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "evented")]
#[command(about = "Observers, a cancellable race and composable operations", version)]
pub struct CliArgs {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Print the race summary as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Set the Name property to each value in turn
    Property {
        values: Vec<String>,
    },

    /// Apply each operation, then their composition
    Calc {
        #[arg(long, allow_negative_numbers = true)]
        a: Option<f64>,

        #[arg(long, allow_negative_numbers = true)]
        b: Option<f64>,

        /// Operation to apply (repeatable): add, subtract, multiply, divide
        #[arg(long = "op")]
        ops: Vec<String>,
    },

    /// Run the race until every vehicle finishes
    Race {
        #[arg(long)]
        seed: Option<u64>,

        #[arg(long)]
        max_laps: Option<u64>,

        #[arg(long)]
        lap_delay_ms: Option<u64>,
    },

    /// Property, calculator and race demos in sequence
    Demo,
}

#[cfg(feature = "cli")]
impl CliArgs {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Demo)
    }

    /// Loads the config file (or defaults) and applies command-line overrides.
    pub fn load_config(&self) -> Result<DemoConfig> {
        let mut config = DemoConfig::load_or_default(self.config.as_ref())?;
        self.apply_overrides(&mut config);
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut DemoConfig) {
        match &self.command {
            Some(Command::Property { values }) if !values.is_empty() => {
                config.property.values = values.clone();
            }
            Some(Command::Calc { a, b, ops }) => {
                if let Some(a) = a {
                    config.calculator.a = *a;
                }
                if let Some(b) = b {
                    config.calculator.b = *b;
                }
                if !ops.is_empty() {
                    config.calculator.operations = ops.clone();
                    config.calculator.compose = ops.clone();
                }
            }
            Some(Command::Race {
                seed,
                max_laps,
                lap_delay_ms,
            }) => {
                if seed.is_some() {
                    config.race.seed = *seed;
                }
                if let Some(max_laps) = max_laps {
                    config.race.max_laps = *max_laps;
                }
                if let Some(lap_delay_ms) = lap_delay_ms {
                    config.race.lap_delay_ms = *lap_delay_ms;
                }
            }
            _ => {}
        }
    }
}
