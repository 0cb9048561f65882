use std::io::{self, Write};
use std::path::Path;

use acnet_cli::cli::OutputFormat;
use acnet_cli::config::AcnetConfig;
use acnet_cli::render;
use anyhow::{bail, Result};
use tracing::warn;

use super::load_circuit;

/// Print the diagnostics; fails when any of them is an error.
pub fn handle(netlist: &Path, format: Option<OutputFormat>, config: &AcnetConfig) -> Result<()> {
    let circuit = load_circuit(netlist, None, config)?;
    let diag = circuit.validate();
    let mut stdout = io::stdout().lock();
    match format.unwrap_or(config.display.format) {
        OutputFormat::Text => render::write_diagnostics_text(&diag, &mut stdout)?,
        OutputFormat::Json => render::write_diagnostics_json(&diag, &mut stdout)?,
    }
    stdout.flush()?;
    if diag.has_errors() {
        warn!("{} failed validation", netlist.display());
        bail!("validation found {} error(s)", diag.error_count());
    }
    Ok(())
}
