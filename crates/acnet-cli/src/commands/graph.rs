use std::fs;

use acnet_cli::cli::GraphCommands;
use acnet_cli::config::AcnetConfig;
use acnet_core::graph_utils;
use anyhow::Result;

use super::load_circuit;

pub fn handle(command: &GraphCommands, config: &AcnetConfig) -> Result<()> {
    match command {
        GraphCommands::Stats { netlist } => {
            let circuit = load_circuit(netlist, None, config)?;
            let stats = graph_utils::graph_stats(&circuit);
            println!("Graph statistics for {}:", netlist.display());
            println!("  Nodes         : {}", stats.node_count);
            println!("  Branches      : {}", stats.branch_count);
            println!("  Islands       : {}", stats.connected_components);
            println!(
                "  Degree [min/avg/max]: {}/{:.2}/{}",
                stats.min_degree, stats.avg_degree, stats.max_degree
            );
            println!("  Density       : {:.4}", stats.density);
            println!("  Elements      : {}", circuit.stats());
            Ok(())
        }
        GraphCommands::Islands { netlist, emit } => {
            let circuit = load_circuit(netlist, None, config)?;
            let analysis = graph_utils::find_islands(&circuit);
            for summary in &analysis.islands {
                println!(
                    "Island {}: {} node(s)",
                    summary.island_id, summary.node_count
                );
            }
            if *emit {
                println!("\nNode → Island assignments:");
                for assignment in &analysis.assignments {
                    println!(
                        "  idx {:>3}: {:<10} -> island {}",
                        assignment.node_index, assignment.label, assignment.island_id
                    );
                }
            }
            Ok(())
        }
        GraphCommands::Export {
            netlist,
            format,
            out,
        } => {
            let circuit = load_circuit(netlist, None, config)?;
            let dot = graph_utils::export_graph(&circuit, format)?;
            if let Some(path) = out {
                fs::write(path, &dot)?;
                println!("Graph exported to {}", path.display());
            } else {
                println!("{dot}");
            }
            Ok(())
        }
    }
}
