//! CLI command implementations.

mod build;
mod check;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use mdc_config::{CliSettings, Config};
use mdc_site::{ContentLoader, ProcessingResult};
use mdc_storage::Storage;
use mdc_storage_fs::FsStorage;

use crate::error::CliError;
use crate::output::Output;

pub(crate) use build::BuildArgs;
pub(crate) use check::CheckArgs;

/// Arguments shared by every command.
#[derive(Args)]
pub(crate) struct CommonArgs {
    /// Path to configuration file (default: auto-discover mdc.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Rules source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Base URL for resolved cross-references (overrides config).
    #[arg(long, env = "MDC_CROSS_REFERENCE_BASE")]
    pub base: Option<String>,

    /// Enable verbose output (show timing logs).
    #[arg(short, long)]
    pub verbose: bool,
}

impl CommonArgs {
    /// Load configuration with these arguments as overrides.
    fn load_config(&self, manifest: Option<PathBuf>) -> Result<Config, CliError> {
        let cli_settings = CliSettings {
            source_dir: self.source_dir.clone(),
            cross_reference_base: self.base.clone(),
            manifest,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        tracing::debug!(config_path = ?config.config_path, "Configuration loaded");
        Ok(config)
    }
}

/// Run one load pass over the configured rules directory.
fn load_rules(config: &Config, output: &Output) -> Result<ProcessingResult, CliError> {
    let rules = &config.rules_resolved;
    output.info(&format!("Source: {}", rules.source_dir.display()));

    let storage: Arc<dyn Storage> = Arc::new(FsStorage::with_extension(
        rules.source_dir.clone(),
        &rules.extension,
    ));
    let result = ContentLoader::new(storage, rules.clone()).load()?;

    for warning in &result.warnings {
        output.warning(warning);
    }
    for error in &result.errors {
        output.error(error);
    }

    Ok(result)
}
