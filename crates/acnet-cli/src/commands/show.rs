use std::io::{self, Write};
use std::path::Path;

use acnet_cli::cli::OutputFormat;
use acnet_cli::config::AcnetConfig;
use acnet_cli::render;
use anyhow::Result;

use super::load_circuit;

pub fn handle(
    netlist: &Path,
    frequency: Option<f64>,
    format: Option<OutputFormat>,
    config: &AcnetConfig,
) -> Result<()> {
    let circuit = load_circuit(netlist, frequency, config)?;
    let mut stdout = io::stdout().lock();
    match format.unwrap_or(config.display.format) {
        OutputFormat::Text => render::write_text(&circuit, &mut stdout)?,
        OutputFormat::Json => render::write_json(&circuit, &mut stdout)?,
    }
    stdout.flush()?;
    Ok(())
}
