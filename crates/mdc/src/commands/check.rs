//! `mdc check` command implementation.

use clap::Args;

use super::{CommonArgs, load_rules};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Fail if any cross-reference is broken.
    #[arg(long)]
    pub strict: bool,
}

impl CheckArgs {
    /// Execute the check command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, the rules directory cannot be
    /// scanned, or `--strict` is set and a cross-reference is broken.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.common.load_config(None)?;

        let result = load_rules(&config, &output)?;
        let stats = result.stats();

        output.heading("Cross-reference report");
        output.row("Rules", result.documents.len());
        output.row("Errors", result.errors.len());
        output.row("References", stats.total);
        output.row("Valid", stats.valid);
        output.row("Broken", stats.broken);
        output.row("Success rate", format!("{:.2}%", stats.success_rate));

        if stats.broken == 0 {
            output.success("All cross-references resolve");
        } else if self.strict {
            return Err(CliError::BrokenLinks(stats.broken));
        }
        Ok(())
    }
}
