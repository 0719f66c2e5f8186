//! `mdc build` command implementation.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Args;
use mdc_site::SiteManifest;

use super::{CommonArgs, load_rules};
use crate::error::CliError;
use crate::output::Output;

/// Output path that writes the manifest to stdout.
const STDOUT: &str = "-";

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Manifest output path, `-` for stdout (default: .mdc/manifest.json).
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl BuildArgs {
    /// Execute the build command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, the rules directory cannot be
    /// scanned, or the manifest cannot be written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let to_stdout = self.output.as_deref() == Some(Path::new(STDOUT));
        let manifest_override = self.output.filter(|_| !to_stdout);
        let config = self.common.load_config(manifest_override)?;

        let result = load_rules(&config, &output)?;
        let manifest = SiteManifest::new(&result, &config.rules_resolved);
        let json = manifest.to_json()?;

        if to_stdout {
            writeln!(std::io::stdout().lock(), "{json}")?;
        } else {
            let path = &config.output_resolved.manifest;
            ensure_output_dir(path)?;
            std::fs::write(path, json)?;
            output.info(&format!("Manifest: {}", path.display()));
        }

        output.success(&format!(
            "Built {} rules ({} cross-references, {} broken, {} errors)",
            manifest.total_rules,
            manifest.stats.total,
            manifest.stats.broken,
            result.errors.len()
        ));
        Ok(())
    }
}

/// Ensure the manifest's parent directory exists.
///
/// The default `.mdc/` directory gets a `.gitignore` so build output stays
/// out of version control.
fn ensure_output_dir(manifest: &Path) -> Result<(), CliError> {
    let Some(dir) = manifest.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };
    std::fs::create_dir_all(dir)?;

    let gitignore_path = dir.join(".gitignore");
    if dir.file_name().is_some_and(|name| name == ".mdc") && !gitignore_path.exists() {
        let _ = std::fs::write(&gitignore_path, "# Automatically created by mdc\n*\n");
    }

    Ok(())
}
