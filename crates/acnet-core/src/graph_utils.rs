use crate::error::{CircuitError, CircuitResult};
use crate::Circuit;
use petgraph::algo::connected_components;
use petgraph::visit::EdgeRef;
use serde::Serialize;
use std::collections::{HashSet, VecDeque};

/// Topology summary (density, degree distribution, connected components).
#[derive(Debug, Clone, Serialize)]
pub struct GraphStats {
    pub node_count: usize,
    pub branch_count: usize,
    pub connected_components: usize,
    pub min_degree: usize,
    pub avg_degree: f64,
    pub max_degree: usize,
    pub density: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct IslandSummary {
    pub island_id: usize,
    pub node_count: usize,
}

/// Which island a node ended up in.
#[derive(Debug, Clone, Serialize)]
pub struct NodeAssignment {
    pub node_index: usize,
    pub label: String,
    pub island_id: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct IslandAnalysis {
    pub islands: Vec<IslandSummary>,
    pub assignments: Vec<NodeAssignment>,
}

/// Degree counts each branch end, so parallel branches and self-loops add up.
pub fn graph_stats(circuit: &Circuit) -> GraphStats {
    let graph = circuit.graph();
    let node_count = graph.node_count();
    let branch_count = graph.edge_count();
    let degrees: Vec<usize> = graph
        .node_indices()
        .map(|node| graph.edges(node).count())
        .collect();
    let min_degree = degrees.iter().copied().min().unwrap_or(0);
    let max_degree = degrees.iter().copied().max().unwrap_or(0);
    let avg_degree = if node_count == 0 {
        0.0
    } else {
        degrees.iter().sum::<usize>() as f64 / node_count as f64
    };
    let density = if node_count < 2 {
        0.0
    } else {
        2.0 * branch_count as f64 / (node_count as f64 * (node_count as f64 - 1.0))
    };
    GraphStats {
        node_count,
        branch_count,
        connected_components: connected_components(graph),
        min_degree,
        avg_degree,
        max_degree,
        density,
    }
}

/// Breadth-first labelling of connected node sets.
pub fn find_islands(circuit: &Circuit) -> IslandAnalysis {
    let graph = circuit.graph();
    let mut visited = HashSet::new();
    let mut islands = Vec::new();
    let mut assignments = Vec::new();
    for start in graph.node_indices() {
        if visited.contains(&start) {
            continue;
        }
        let island_id = islands.len();
        let mut queue = VecDeque::from([start]);
        let mut node_count = 0;
        while let Some(node) = queue.pop_front() {
            if !visited.insert(node) {
                continue;
            }
            node_count += 1;
            assignments.push(NodeAssignment {
                node_index: node.index(),
                label: graph[node].label(),
                island_id,
            });
            queue.extend(graph.neighbors(node).filter(|n| !visited.contains(n)));
        }
        islands.push(IslandSummary {
            island_id,
            node_count,
        });
    }
    assignments.sort_by_key(|assignment| assignment.node_index);
    IslandAnalysis {
        islands,
        assignments,
    }
}

/// Render the topology for external tools. Only Graphviz DOT is supported.
pub fn export_graph(circuit: &Circuit, format: &str) -> CircuitResult<String> {
    match format.to_ascii_lowercase().as_str() {
        "graphviz" | "dot" => Ok(render_dot(circuit)),
        other => Err(CircuitError::Validation(format!(
            "unsupported graph export format '{other}'"
        ))),
    }
}

fn render_dot(circuit: &Circuit) -> String {
    let graph = circuit.graph();
    let mut buffer = String::from("graph circuit {\n");
    for node in graph.node_indices() {
        buffer.push_str(&format!(
            "  n{} [label=\"{}\"];\n",
            node.index(),
            sanitize_label(&graph[node].label())
        ));
    }
    for edge in graph.edge_references() {
        let keys: Vec<String> = edge
            .weight()
            .components()
            .iter()
            .filter_map(|id| circuit.component(*id).ok())
            .map(|component| component.key())
            .collect();
        buffer.push_str(&format!(
            "  n{} -- n{} [label=\"{}\"];\n",
            edge.source().index(),
            edge.target().index(),
            sanitize_label(&keys.join(" "))
        ));
    }
    buffer.push('}');
    buffer
}

fn sanitize_label(label: &str) -> String {
    label.replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Circuit, Ohms};
    use num_complex::Complex64;

    fn ladder() -> Circuit {
        // 0 -- 1 -- 2, plus an isolated node 3
        let mut circuit = Circuit::new();
        let nodes: Vec<_> = (0..4).map(|_| circuit.add_node()).collect();
        let b0 = circuit.add_branch(nodes[0], nodes[1]).unwrap();
        circuit
            .add_voltage_source(b0, Complex64::new(10.0, 0.0))
            .unwrap();
        circuit.add_resistor(b0, Ohms(1.0)).unwrap();
        let b1 = circuit.add_branch(nodes[1], nodes[2]).unwrap();
        circuit.add_resistor(b1, Ohms(2.0)).unwrap();
        circuit
    }

    #[test]
    fn test_graph_stats() {
        let stats = graph_stats(&ladder());
        assert_eq!(stats.node_count, 4);
        assert_eq!(stats.branch_count, 2);
        assert_eq!(stats.connected_components, 2);
        assert_eq!(stats.min_degree, 0);
        assert_eq!(stats.max_degree, 2);
        assert!((stats.avg_degree - 1.0).abs() < 1e-12);
        assert!((stats.density - 2.0 * 2.0 / 12.0).abs() < 1e-12);
    }

    #[test]
    fn test_find_islands() {
        let analysis = find_islands(&ladder());
        assert_eq!(analysis.islands.len(), 2);
        assert_eq!(analysis.islands[0].node_count, 3);
        assert_eq!(analysis.islands[1].node_count, 1);
        assert_eq!(analysis.assignments[3].label, "Node3");
        assert_eq!(analysis.assignments[3].island_id, 1);
    }

    #[test]
    fn test_export_dot() {
        let dot = export_graph(&ladder(), "dot").unwrap();
        assert!(dot.starts_with("graph circuit {"));
        assert!(dot.contains("n0 [label=\"Node0\"];"));
        assert!(dot.contains("n0 -- n1 [label=\"U1 R1\"];"));
        assert!(dot.contains("n1 -- n2 [label=\"R2\"];"));
        assert!(export_graph(&ladder(), "svg").is_err());
    }
}
