pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, toml_config::TomlConfig, RunConfig};

pub use crate::core::{etl::EtlEngine, pipeline::TrainerPipeline};
pub use domain::model::Record;
pub use utils::error::{EtlError, Result};
