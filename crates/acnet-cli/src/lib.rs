pub mod cli;
pub mod config;
pub mod netlist;
pub mod render;

pub use cli::{build_cli_command, Cli, Commands, GraphCommands, OutputFormat, Quantity};
