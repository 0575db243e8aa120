pub mod cli;
pub mod toml_config;

use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_path, Validate};
use toml_config::TomlConfig;

#[cfg(feature = "cli")]
use clap::Parser;

pub const DEFAULT_INPUT_PATH: &str = "trainers_export.csv";
pub const DEFAULT_OUTPUT_PATH: &str = "trainers_output.json";

/// The two paths a run needs, after flags, config file and defaults are merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub input_path: String,
    pub output_path: String,
}

impl RunConfig {
    pub fn new(input_path: impl Into<String>, output_path: impl Into<String>) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: output_path.into(),
        }
    }

    /// Flags win over the config file, which wins over the defaults.
    pub fn from_sources(
        input_flag: Option<&str>,
        output_flag: Option<&str>,
        file: Option<&TomlConfig>,
    ) -> Self {
        let input_path = input_flag
            .or_else(|| file.and_then(TomlConfig::input_path))
            .unwrap_or(DEFAULT_INPUT_PATH);
        let output_path = output_flag
            .or_else(|| file.and_then(TomlConfig::output_path))
            .unwrap_or(DEFAULT_OUTPUT_PATH);

        Self::new(input_path, output_path)
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::new(DEFAULT_INPUT_PATH, DEFAULT_OUTPUT_PATH)
    }
}

impl ConfigProvider for RunConfig {
    fn input_path(&self) -> &str {
        &self.input_path
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }
}

impl Validate for RunConfig {
    fn validate(&self) -> Result<()> {
        validate_path("input", &self.input_path)?;
        validate_path("output", &self.output_path)?;
        Ok(())
    }
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "trainer-etl", version)]
#[command(about = "Convert a trainer CSV export into addTrainer JSON")]
pub struct CliConfig {
    #[arg(short, long, help = "Trainer CSV export [default: trainers_export.csv]")]
    pub input: Option<String>,

    #[arg(short, long, help = "JSON file to write [default: trainers_output.json]")]
    pub output: Option<String>,

    #[arg(short, long, help = "TOML file providing input/output paths")]
    pub config: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn resolve(&self) -> Result<RunConfig> {
        let file = self
            .config
            .as_deref()
            .map(TomlConfig::from_file)
            .transpose()?;

        Ok(RunConfig::from_sources(
            self.input.as_deref(),
            self.output.as_deref(),
            file.as_ref(),
        ))
    }
}
