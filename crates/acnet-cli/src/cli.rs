use acnet_core::units::{
    UnitTable, CAPACITANCE, CURRENT, FREQUENCY, IMPEDANCE, INDUCTANCE, VOLTAGE,
};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum, ValueHint};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "acnet", author, version, about, long_about = None)]
pub struct Cli {
    /// Set the logging level (overrides the config file)
    #[arg(long)]
    pub log_level: Option<tracing::Level>,

    /// Configuration file (defaults to <config dir>/acnet/config.toml)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the quantities of every node, branch and component
    Show {
        /// Netlist file (TOML)
        #[arg(value_hint = ValueHint::FilePath)]
        netlist: PathBuf,
        /// Analysis frequency in hertz (overrides netlist and config)
        #[arg(long)]
        frequency: Option<f64>,
        /// Output format
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },
    /// Check a netlist for unset values, control loops and islands
    Validate {
        /// Netlist file (TOML)
        #[arg(value_hint = ValueHint::FilePath)]
        netlist: PathBuf,
        /// Output format
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },
    /// Graph utilities
    Graph {
        #[command(subcommand)]
        command: GraphCommands,
    },
    /// Express a value in the best-fitting engineering unit
    Scale {
        /// Value in the base unit (V, A, Ω, F, H, Hz)
        #[arg(allow_hyphen_values = true)]
        value: f64,
        /// Quantity the value measures
        #[arg(long, value_enum)]
        quantity: Quantity,
    },
}

#[derive(Subcommand, Debug)]
pub enum GraphCommands {
    /// Graph stats summary
    Stats {
        /// Netlist file (TOML)
        netlist: PathBuf,
    },
    /// Find islands in the circuit
    Islands {
        /// Netlist file (TOML)
        netlist: PathBuf,
        /// Emit the island of every node
        #[arg(long)]
        emit: bool,
    },
    /// Export the topology
    Export {
        /// Netlist file (TOML)
        netlist: PathBuf,
        /// Export format (only "dot" is supported)
        #[arg(long, default_value = "dot")]
        format: String,
        /// Write output to a file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Quantity {
    Voltage,
    Current,
    Impedance,
    Capacitance,
    Inductance,
    Frequency,
}

impl Quantity {
    pub fn table(self) -> UnitTable<'static> {
        match self {
            Quantity::Voltage => VOLTAGE,
            Quantity::Current => CURRENT,
            Quantity::Impedance => IMPEDANCE,
            Quantity::Capacitance => CAPACITANCE,
            Quantity::Inductance => INDUCTANCE,
            Quantity::Frequency => FREQUENCY,
        }
    }
}

pub fn build_cli_command() -> clap::Command {
    Cli::command()
}
