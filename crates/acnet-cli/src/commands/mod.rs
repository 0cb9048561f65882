pub mod graph;
pub mod scale;
pub mod show;
pub mod validate;

use acnet_cli::config::AcnetConfig;
use acnet_cli::netlist::Netlist;
use acnet_core::Circuit;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

/// Read a netlist and apply the frequency precedence: flag, netlist, config.
pub fn load_circuit(
    path: &Path,
    frequency: Option<f64>,
    config: &AcnetConfig,
) -> Result<Circuit> {
    info!("Loading netlist {}", path.display());
    let mut circuit = Netlist::load(path)?.build(config.analysis.frequency_hz)?;
    if let Some(hz) = frequency {
        circuit
            .set_frequency(hz)
            .with_context(|| format!("applying --frequency {hz}"))?;
    }
    Ok(circuit)
}
