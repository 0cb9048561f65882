//! # acnet-core: Phasor-Domain Circuit Model
//!
//! Stores and derives the electrical quantities of a linear AC circuit at a
//! single angular frequency. Solving the circuit (KCL/KVL assembly and the
//! linear solve) is someone else's job: a solver reads impedances from this
//! model and writes node voltages and branch/component currents back.
//!
//! ## Design Philosophy
//!
//! A circuit is an **undirected multigraph**:
//! - **Nodes**: points of common potential, carrying an optional voltage
//! - **Edges**: branches, each an ordered series of two-terminal components
//!
//! Components live in an arena owned by the [`Circuit`] and are referenced by
//! [`ComponentId`]. A branch lists the ids of its components in series order;
//! a dependent source refers to its controller by id without owning it.
//!
//! Every optional quantity means "not known yet", never zero. Derived values
//! (branch impedance, reactive impedance, dependent-source output) are
//! recomputed on every read, so they always reflect the current frequency and
//! the latest solver results.
//!
//! ## Quick Start
//!
//! ```
//! use acnet_core::*;
//! use num_complex::Complex64;
//!
//! let mut circuit = Circuit::new();
//! let n0 = circuit.add_node();
//! let n1 = circuit.add_node();
//! let branch = circuit.add_branch(n0, n1).unwrap();
//!
//! let r1 = circuit.add_resistor(branch, Ohms(1.0)).unwrap();
//! let u1 = circuit.add_voltage_source(branch, Complex64::new(100.0, 0.0)).unwrap();
//!
//! assert_eq!(circuit.branch_impedance(branch).unwrap(), Some(Complex64::new(1.0, 0.0)));
//! assert_eq!(circuit.lookup("U1").unwrap().id(), u1);
//! assert_eq!(circuit.display_component(r1).unwrap().to_string(), "R1 R=1.00Ω");
//! ```
//!
//! ## Modules
//!
//! - [`component`] - element variants and their impedance rules
//! - [`diagnostics`] - validation reporting
//! - [`display`] - human-readable quantity strings
//! - [`frequency`] - the shared analysis frequency
//! - [`graph_utils`] - topology statistics, islands, DOT export
//! - [`phasor`] - magnitude/phase decomposition
//! - [`registry`] - `"R1"`-style component names
//! - [`report`] - serializable snapshot of a circuit
//! - [`units`] - unit newtypes and engineering-unit scaling

use num_complex::Complex64;
use petgraph::graph::{EdgeIndex, NodeIndex, UnGraph};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

pub mod component;
pub mod diagnostics;
pub mod display;
pub mod error;
pub mod frequency;
pub mod graph_utils;
pub mod phasor;
pub mod registry;
pub mod report;
pub mod units;

pub use component::{
    Component, ComponentKind, Control, ControlVariable, ImpedanceElement, PowerSource,
};
pub use diagnostics::{DiagnosticIssue, Diagnostics, Severity};
pub use display::ComponentDisplay;
pub use error::{CircuitError, CircuitResult};
pub use frequency::{FrequencyContext, DEFAULT_FREQUENCY};
pub use phasor::{decompose, Phasor};
pub use registry::ComponentRegistry;
pub use report::CircuitReport;
pub use units::{Farads, Henries, Hertz, Ohms, RadiansPerSecond, UnitTable};

// Newtype wrappers for IDs for type safety
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(usize);
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BranchId(usize);
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentId(usize);

impl NodeId {
    #[inline]
    pub fn new(value: usize) -> Self {
        NodeId(value)
    }
    #[inline]
    pub fn value(&self) -> usize {
        self.0
    }
}

impl BranchId {
    #[inline]
    pub fn new(value: usize) -> Self {
        BranchId(value)
    }
    #[inline]
    pub fn value(&self) -> usize {
        self.0
    }
}

impl ComponentId {
    #[inline]
    pub fn new(value: usize) -> Self {
        ComponentId(value)
    }
    #[inline]
    pub fn value(&self) -> usize {
        self.0
    }
}

/// A point of common potential.
#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,
    /// Node voltage phasor, `None` until a solver resolves it
    pub voltage: Option<Complex64>,
}

impl Node {
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// `"Node3"`
    pub fn label(&self) -> String {
        format!("Node{}", self.id.0)
    }
}

/// Series connection of components between two nodes.
///
/// The endpoints are stored as `(left, right)`; component reference
/// directions are relative to that order.
#[derive(Debug, Clone)]
pub struct Branch {
    id: BranchId,
    left: NodeId,
    right: NodeId,
    elements: Vec<ComponentId>,
    /// Branch current, left to right
    pub current: Option<Complex64>,
    /// Potential at the left end
    pub v1: Option<Complex64>,
    /// Potential at the right end
    pub v2: Option<Complex64>,
}

impl Branch {
    pub fn id(&self) -> BranchId {
        self.id
    }

    pub fn left(&self) -> NodeId {
        self.left
    }

    pub fn right(&self) -> NodeId {
        self.right
    }

    pub fn endpoints(&self) -> (NodeId, NodeId) {
        (self.left, self.right)
    }

    /// Components in series order
    pub fn components(&self) -> &[ComponentId] {
        &self.elements
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn is_self_loop(&self) -> bool {
        self.left == self.right
    }

    /// `"Branch(Node0 --- Node1)"`
    pub fn label(&self) -> String {
        format!("Branch(Node{} --- Node{})", self.left.0, self.right.0)
    }
}

/// How a new component is named.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Designation {
    /// Number under the kind's default prefix (`R`, `C`, `U`, ...)
    #[default]
    Default,
    /// Number under a caller-chosen prefix
    Prefix(String),
    /// No number, not registered, cannot be looked up
    Anonymous,
}

/// A circuit: topology graph, component arena, frequency and name registry.
#[derive(Debug, Default)]
pub struct Circuit {
    graph: UnGraph<Node, Branch>,
    components: Vec<Component>,
    frequency: FrequencyContext,
    registry: ComponentRegistry,
}

impl Circuit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty circuit analysed at `hz` instead of the 1 kHz default.
    pub fn with_frequency(hz: f64) -> CircuitResult<Self> {
        Ok(Self {
            frequency: FrequencyContext::with_frequency(hz)?,
            ..Self::default()
        })
    }

    pub fn graph(&self) -> &UnGraph<Node, Branch> {
        &self.graph
    }

    pub fn frequency(&self) -> &FrequencyContext {
        &self.frequency
    }

    /// Change the analysis frequency. Reactive impedances pick up the new
    /// value on their next read.
    pub fn set_frequency(&mut self, hz: f64) -> CircuitResult<()> {
        self.frequency.set_frequency(hz)
    }

    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    // =========================================================================
    // Construction
    // =========================================================================

    /// Add a node; ids are handed out in order starting at 0.
    pub fn add_node(&mut self) -> NodeId {
        let id = NodeId(self.graph.node_count());
        self.graph.add_node(Node { id, voltage: None });
        id
    }

    pub fn add_branch(&mut self, left: NodeId, right: NodeId) -> CircuitResult<BranchId> {
        self.node(left)?;
        self.node(right)?;
        let id = BranchId(self.graph.edge_count());
        self.graph.add_edge(
            NodeIndex::new(left.0),
            NodeIndex::new(right.0),
            Branch {
                id,
                left,
                right,
                elements: Vec::new(),
                current: None,
                v1: None,
                v2: None,
            },
        );
        Ok(id)
    }

    /// Append a component to the end of `branch`, numbered under its default
    /// prefix.
    pub fn add_component(
        &mut self,
        branch: BranchId,
        kind: ComponentKind,
    ) -> CircuitResult<ComponentId> {
        self.add_component_as(branch, kind, Designation::Default)
    }

    pub fn add_component_as(
        &mut self,
        branch: BranchId,
        kind: ComponentKind,
        designation: Designation,
    ) -> CircuitResult<ComponentId> {
        self.branch(branch)?;
        if let Some(controller) = kind.control().and_then(|c| c.controller) {
            self.component(controller)?;
        }

        let id = ComponentId(self.components.len());
        let (prefix, number) = match designation {
            Designation::Default => {
                let prefix = kind.default_prefix();
                (prefix.to_string(), Some(self.registry.register(prefix, id)?))
            }
            Designation::Prefix(prefix) => {
                let number = self.registry.register(&prefix, id)?;
                (prefix, Some(number))
            }
            Designation::Anonymous => (kind.default_prefix().to_string(), None),
        };

        let component = Component::new(id, branch, kind, prefix, number);
        debug!(key = %component.key(), kind = kind.name(), branch = branch.0, "added component");
        self.components.push(component);
        self.branch_mut(branch)?.elements.push(id);
        Ok(id)
    }

    pub fn add_resistor(&mut self, branch: BranchId, r: Ohms) -> CircuitResult<ComponentId> {
        self.add_component(branch, ComponentKind::resistor(Some(r)))
    }

    pub fn add_capacitor(&mut self, branch: BranchId, c: Farads) -> CircuitResult<ComponentId> {
        self.add_component(branch, ComponentKind::capacitor(Some(c)))
    }

    pub fn add_inductor(&mut self, branch: BranchId, l: Henries) -> CircuitResult<ComponentId> {
        self.add_component(branch, ComponentKind::inductor(Some(l)))
    }

    pub fn add_impedance(&mut self, branch: BranchId, z: Complex64) -> CircuitResult<ComponentId> {
        self.add_component(branch, ComponentKind::impedance(Some(z)))
    }

    pub fn add_voltage_source(
        &mut self,
        branch: BranchId,
        voltage: Complex64,
    ) -> CircuitResult<ComponentId> {
        let id = self.add_component(branch, ComponentKind::voltage_source())?;
        self.component_mut(id)?.set_voltage(voltage)?;
        Ok(id)
    }

    pub fn add_current_source(
        &mut self,
        branch: BranchId,
        current: Complex64,
    ) -> CircuitResult<ComponentId> {
        let id = self.add_component(branch, ComponentKind::current_source())?;
        self.component_mut(id)?.set_current(current)?;
        Ok(id)
    }

    pub fn add_dependent_voltage_source(
        &mut self,
        branch: BranchId,
        control: Control,
    ) -> CircuitResult<ComponentId> {
        self.add_component(branch, ComponentKind::dependent_voltage_source(control))
    }

    pub fn add_dependent_current_source(
        &mut self,
        branch: BranchId,
        control: Control,
    ) -> CircuitResult<ComponentId> {
        self.add_component(branch, ComponentKind::dependent_current_source(control))
    }

    /// Point dependent source `dependent` at `controller`.
    ///
    /// Loops are accepted here and reported when the value is read.
    pub fn bind_controller(
        &mut self,
        dependent: ComponentId,
        controller: ComponentId,
    ) -> CircuitResult<()> {
        self.component(controller)?;
        self.component_mut(dependent)?.set_controller(controller)
    }

    // =========================================================================
    // Access
    // =========================================================================

    pub fn node(&self, id: NodeId) -> CircuitResult<&Node> {
        self.graph
            .node_weight(NodeIndex::new(id.0))
            .ok_or_else(|| CircuitError::NotFound(format!("node {}", id.0)))
    }

    pub fn node_mut(&mut self, id: NodeId) -> CircuitResult<&mut Node> {
        self.graph
            .node_weight_mut(NodeIndex::new(id.0))
            .ok_or_else(|| CircuitError::NotFound(format!("node {}", id.0)))
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.graph.node_weights()
    }

    pub fn branch(&self, id: BranchId) -> CircuitResult<&Branch> {
        self.graph
            .edge_weight(EdgeIndex::new(id.0))
            .ok_or_else(|| CircuitError::NotFound(format!("branch {}", id.0)))
    }

    pub fn branch_mut(&mut self, id: BranchId) -> CircuitResult<&mut Branch> {
        self.graph
            .edge_weight_mut(EdgeIndex::new(id.0))
            .ok_or_else(|| CircuitError::NotFound(format!("branch {}", id.0)))
    }

    pub fn branches(&self) -> impl Iterator<Item = &Branch> {
        self.graph.edge_weights()
    }

    pub fn component(&self, id: ComponentId) -> CircuitResult<&Component> {
        self.components
            .get(id.0)
            .ok_or_else(|| CircuitError::NotFound(format!("component #{}", id.0)))
    }

    pub fn component_mut(&mut self, id: ComponentId) -> CircuitResult<&mut Component> {
        self.components
            .get_mut(id.0)
            .ok_or_else(|| CircuitError::NotFound(format!("component #{}", id.0)))
    }

    /// All components in creation order
    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.components.iter()
    }

    /// Find a numbered component by registry key (`"R2"`).
    pub fn lookup(&self, key: &str) -> CircuitResult<&Component> {
        let id = self.registry.lookup(key)?;
        self.component(id)
    }

    // =========================================================================
    // Derived quantities
    // =========================================================================

    pub fn impedance_of(&self, id: ComponentId) -> CircuitResult<Option<Complex64>> {
        self.component(id)?.impedance(&self.frequency)
    }

    pub fn admittance_of(&self, id: ComponentId) -> CircuitResult<Complex64> {
        self.component(id)?.admittance(&self.frequency)
    }

    /// Element voltage; derived through the control chain for dependent
    /// voltage sources.
    pub fn voltage_of(&self, id: ComponentId) -> CircuitResult<Option<Complex64>> {
        self.resolve(id, ControlVariable::Voltage)
    }

    /// Element current; derived through the control chain for dependent
    /// current sources.
    pub fn current_of(&self, id: ComponentId) -> CircuitResult<Option<Complex64>> {
        self.resolve(id, ControlVariable::Current)
    }

    /// Follow dependent sources until a stored value is reached, then apply
    /// the gains from the innermost outward.
    fn resolve(
        &self,
        id: ComponentId,
        variable: ControlVariable,
    ) -> CircuitResult<Option<Complex64>> {
        let mut gains = Vec::new();
        let mut visited = HashSet::new();
        let mut current = (id, variable);

        let base = loop {
            let (id, variable) = current;
            let component = self.component(id)?;
            let Some(control) = component.kind().derives(variable) else {
                break component.stored(variable);
            };
            if !visited.insert(id) {
                debug!(key = %component.key(), "control cycle detected");
                return Err(CircuitError::ControlCycle(component.key()));
            }
            let Some(controller) = control.controller else {
                return Ok(None);
            };
            gains.push(control.gain);
            current = (controller, control.variable);
        };

        Ok(base.map(|value| gains.iter().rev().fold(value, |acc, gain| acc * *gain)))
    }

    /// Series impedance of a branch.
    ///
    /// Any component with unknown impedance makes the total unknown; a
    /// component whose impedance cannot be evaluated fails the whole read.
    pub fn branch_impedance(&self, id: BranchId) -> CircuitResult<Option<Complex64>> {
        let mut total = Complex64::new(0.0, 0.0);
        for &element in self.branch(id)?.components() {
            match self.impedance_of(element)? {
                Some(z) => total += z,
                None => return Ok(None),
            }
        }
        Ok(Some(total))
    }

    /// Branch admittance, 1 / impedance.
    ///
    /// Exactly zero impedance gives admittance 0, not infinity. This
    /// substitution is branch-level only; [`Circuit::admittance_of`] fails on
    /// a zero-impedance component instead.
    pub fn branch_admittance(&self, id: BranchId) -> CircuitResult<Option<Complex64>> {
        let zero = Complex64::new(0.0, 0.0);
        Ok(self
            .branch_impedance(id)?
            .map(|z| if z == zero { zero } else { z.inv() }))
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn branch_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    // =========================================================================
    // Statistics and validation
    // =========================================================================

    pub fn stats(&self) -> CircuitStats {
        let mut stats = CircuitStats {
            num_nodes: self.node_count(),
            num_branches: self.branch_count(),
            ..CircuitStats::default()
        };
        for component in &self.components {
            match component.kind() {
                ComponentKind::Source(PowerSource::DependentVoltage(_))
                | ComponentKind::Source(PowerSource::DependentCurrent(_)) => {
                    stats.num_dependent_sources += 1
                }
                ComponentKind::Source(_) => stats.num_sources += 1,
                ComponentKind::Element(_) => stats.num_elements += 1,
            }
            if component.is_anonymous() {
                stats.num_anonymous += 1;
            }
        }
        stats
    }

    /// Check the circuit for data that will trip a solver or a display.
    pub fn validate_into(&self, diag: &mut Diagnostics) {
        if self.node_count() == 0 {
            diag.add_error("structure", "Circuit has no nodes");
            return;
        }

        for branch in self.branches() {
            let entity = branch.label();
            if branch.is_empty() {
                diag.add_warning_with_entity("structure", "Branch has no components", &entity);
            }
            if branch.is_self_loop() {
                diag.add_warning_with_entity(
                    "structure",
                    "Branch connects a node to itself",
                    &entity,
                );
            }
        }

        for component in &self.components {
            let key = component.key();
            match component.kind() {
                ComponentKind::Element(element) => {
                    if !element.is_parameterized() {
                        diag.add_validation_warning(&key, "Element value is not set");
                    } else if let Err(err) = component.impedance(&self.frequency) {
                        diag.add_error_with_entity("physical", &err.to_string(), &key);
                    }
                }
                ComponentKind::Source(_) => {
                    if let Some(control) = component.kind().control() {
                        if control.controller.is_none() {
                            diag.add_warning_with_entity(
                                "control",
                                "Dependent source has no controller",
                                &key,
                            );
                        } else if let Err(err) =
                            self.resolve(component.id(), control_output(component))
                        {
                            diag.add_error_with_entity("control", &err.to_string(), &key);
                        }
                    }
                }
            }
        }

        let islands = graph_utils::find_islands(self);
        if islands.islands.len() > 1 {
            diag.add_warning(
                "topology",
                &format!("Circuit splits into {} islands", islands.islands.len()),
            );
        }
    }

    /// Build a [`Diagnostics`] report for the circuit.
    pub fn validate(&self) -> Diagnostics {
        let mut diag = Diagnostics::new();
        self.validate_into(&mut diag);
        diag
    }
}

/// The quantity a dependent source produces.
fn control_output(component: &Component) -> ControlVariable {
    if component.kind().derives(ControlVariable::Voltage).is_some() {
        ControlVariable::Voltage
    } else {
        ControlVariable::Current
    }
}

/// Element counts for a circuit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CircuitStats {
    pub num_nodes: usize,
    pub num_branches: usize,
    pub num_sources: usize,
    pub num_dependent_sources: usize,
    pub num_elements: usize,
    pub num_anonymous: usize,
}

impl std::fmt::Display for CircuitStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} nodes, {} branches, {} sources ({} dependent), {} passive elements",
            self.num_nodes,
            self.num_branches,
            self.num_sources + self.num_dependent_sources,
            self.num_dependent_sources,
            self.num_elements
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    fn two_node_branch() -> (Circuit, BranchId) {
        let mut circuit = Circuit::new();
        let n0 = circuit.add_node();
        let n1 = circuit.add_node();
        let branch = circuit.add_branch(n0, n1).unwrap();
        (circuit, branch)
    }

    #[test]
    fn test_node_ids_are_sequential() {
        let mut circuit = Circuit::new();
        let ids: Vec<_> = (0..3).map(|_| circuit.add_node()).collect();
        assert_eq!(ids, vec![NodeId(0), NodeId(1), NodeId(2)]);
        assert_eq!(circuit.node(NodeId(2)).unwrap().label(), "Node2");
        assert!(circuit.node(NodeId(3)).is_err());
    }

    #[test]
    fn test_branch_requires_existing_nodes() {
        let mut circuit = Circuit::new();
        let n0 = circuit.add_node();
        assert!(matches!(
            circuit.add_branch(n0, NodeId(7)),
            Err(CircuitError::NotFound(_))
        ));
    }

    #[test]
    fn test_branch_keeps_series_order() {
        let (mut circuit, branch) = two_node_branch();
        let r = circuit.add_resistor(branch, Ohms(1.0)).unwrap();
        let u = circuit.add_voltage_source(branch, c(100.0, 0.0)).unwrap();
        let l = circuit.add_inductor(branch, Henries(1e-3)).unwrap();
        assert_eq!(circuit.branch(branch).unwrap().components(), &[r, u, l]);
        assert_eq!(circuit.component(u).unwrap().branch(), branch);
    }

    #[test]
    fn test_source_contributes_nothing_to_branch_impedance() {
        let (mut circuit, branch) = two_node_branch();
        circuit.add_resistor(branch, Ohms(1.0)).unwrap();
        circuit.add_voltage_source(branch, c(100.0, 0.0)).unwrap();

        assert_eq!(circuit.branch_impedance(branch).unwrap(), Some(c(1.0, 0.0)));
        assert_eq!(circuit.branch_admittance(branch).unwrap(), Some(c(1.0, 0.0)));
    }

    #[test]
    fn test_zero_impedance_branch_has_zero_admittance() {
        // Branch-level policy: a short reports admittance 0, not infinity.
        let (mut circuit, branch) = two_node_branch();
        circuit.add_voltage_source(branch, c(5.0, 0.0)).unwrap();
        assert_eq!(circuit.branch_impedance(branch).unwrap(), Some(c(0.0, 0.0)));
        assert_eq!(circuit.branch_admittance(branch).unwrap(), Some(c(0.0, 0.0)));
    }

    #[test]
    fn test_empty_branch_is_zero_impedance() {
        let (circuit, branch) = two_node_branch();
        assert_eq!(circuit.branch_impedance(branch).unwrap(), Some(c(0.0, 0.0)));
        assert_eq!(circuit.branch_admittance(branch).unwrap(), Some(c(0.0, 0.0)));
    }

    #[test]
    fn test_unknown_component_impedance_makes_branch_unknown() {
        let (mut circuit, branch) = two_node_branch();
        circuit.add_resistor(branch, Ohms(2.0)).unwrap();
        circuit
            .add_component(branch, ComponentKind::impedance(None))
            .unwrap();
        assert_eq!(circuit.branch_impedance(branch).unwrap(), None);
        assert_eq!(circuit.branch_admittance(branch).unwrap(), None);
    }

    #[test]
    fn test_unset_capacitor_fails_branch_impedance() {
        let (mut circuit, branch) = two_node_branch();
        circuit
            .add_component(branch, ComponentKind::capacitor(None))
            .unwrap();
        assert!(matches!(
            circuit.branch_impedance(branch),
            Err(CircuitError::Domain(_))
        ));
    }

    #[test]
    fn test_branch_impedance_tracks_frequency() {
        let (mut circuit, branch) = two_node_branch();
        circuit.add_resistor(branch, Ohms(10.0)).unwrap();
        circuit.add_inductor(branch, Henries(1e-3)).unwrap();

        let before = circuit.branch_impedance(branch).unwrap().unwrap();
        circuit.set_frequency(2000.0).unwrap();
        let after = circuit.branch_impedance(branch).unwrap().unwrap();

        assert_eq!(before.re, 10.0);
        assert!((after.im - 2.0 * before.im).abs() < 1e-9);
    }

    #[test]
    fn test_dependent_source_follows_controller() {
        let (mut circuit, branch) = two_node_branch();
        let r1 = circuit.add_resistor(branch, Ohms(1.0)).unwrap();
        let u2 = circuit
            .add_dependent_voltage_source(branch, Control::new(r1, ControlVariable::Current, 2.0))
            .unwrap();

        assert_eq!(circuit.voltage_of(u2).unwrap(), None);
        circuit.component_mut(r1).unwrap().set_current(c(3.0, 0.0)).unwrap();
        assert_eq!(circuit.voltage_of(u2).unwrap(), Some(c(6.0, 0.0)));
        circuit.component_mut(r1).unwrap().set_current(None).unwrap();
        assert_eq!(circuit.voltage_of(u2).unwrap(), None);
    }

    #[test]
    fn test_dependent_chain_multiplies_gains() {
        let (mut circuit, branch) = two_node_branch();
        let u1 = circuit.add_voltage_source(branch, c(1.0, 1.0)).unwrap();
        let i1 = circuit
            .add_dependent_current_source(branch, Control::new(u1, ControlVariable::Voltage, 0.5))
            .unwrap();
        let u2 = circuit
            .add_dependent_voltage_source(branch, Control::new(i1, ControlVariable::Current, 4.0))
            .unwrap();
        assert_eq!(circuit.current_of(i1).unwrap(), Some(c(0.5, 0.5)));
        assert_eq!(circuit.voltage_of(u2).unwrap(), Some(c(2.0, 2.0)));
    }

    #[test]
    fn test_control_cycle_is_reported() {
        let (mut circuit, branch) = two_node_branch();
        let a = circuit
            .add_dependent_voltage_source(branch, Control::unbound(ControlVariable::Voltage, 1.0))
            .unwrap();
        let b = circuit
            .add_dependent_voltage_source(branch, Control::new(a, ControlVariable::Voltage, 1.0))
            .unwrap();
        circuit.bind_controller(a, b).unwrap();
        assert!(matches!(
            circuit.voltage_of(a),
            Err(CircuitError::ControlCycle(_))
        ));
        // a's current is not derived, so no loop is followed
        assert_eq!(circuit.current_of(a).unwrap(), None);
    }

    #[test]
    fn test_unbound_control_is_unresolved() {
        let (mut circuit, branch) = two_node_branch();
        let i1 = circuit
            .add_dependent_current_source(branch, Control::unbound(ControlVariable::Voltage, 3.0))
            .unwrap();
        assert_eq!(circuit.current_of(i1).unwrap(), None);
    }

    #[test]
    fn test_bind_controller_rejects_independent_source() {
        let (mut circuit, branch) = two_node_branch();
        let u1 = circuit.add_voltage_source(branch, c(1.0, 0.0)).unwrap();
        let r1 = circuit.add_resistor(branch, Ohms(1.0)).unwrap();
        assert!(matches!(
            circuit.bind_controller(u1, r1),
            Err(CircuitError::WrongKind { .. })
        ));
        assert!(matches!(
            circuit.bind_controller(u1, ComponentId(42)),
            Err(CircuitError::NotFound(_))
        ));
    }

    #[test]
    fn test_registry_keys_in_registration_order() {
        let (mut circuit, branch) = two_node_branch();
        let ids: Vec<_> = (1..=3)
            .map(|i| circuit.add_resistor(branch, Ohms(i as f64)).unwrap())
            .collect();
        let keys: Vec<_> = ids
            .iter()
            .map(|id| circuit.component(*id).unwrap().key())
            .collect();
        assert_eq!(keys, vec!["R1", "R2", "R3"]);
        assert_eq!(circuit.lookup("R2").unwrap().id(), ids[1]);
        assert!(matches!(circuit.lookup("R4"), Err(CircuitError::NotFound(_))));
    }

    #[test]
    fn test_anonymous_and_custom_prefix() {
        let (mut circuit, branch) = two_node_branch();
        let anon = circuit
            .add_component_as(branch, ComponentKind::resistor(None), Designation::Anonymous)
            .unwrap();
        let named = circuit.add_resistor(branch, Ohms(1.0)).unwrap();
        let custom = circuit
            .add_component_as(
                branch,
                ComponentKind::impedance(None),
                Designation::Prefix("Zload".into()),
            )
            .unwrap();

        assert!(circuit.component(anon).unwrap().is_anonymous());
        assert_eq!(circuit.component(named).unwrap().key(), "R1");
        assert_eq!(circuit.lookup("Zload1").unwrap().id(), custom);
        assert_eq!(circuit.registry().len(), 2);
    }

    #[test]
    fn test_component_admittance_has_no_zero_substitution() {
        let (mut circuit, branch) = two_node_branch();
        let u1 = circuit.add_voltage_source(branch, c(1.0, 0.0)).unwrap();
        let r1 = circuit.add_resistor(branch, Ohms(4.0)).unwrap();
        assert!(matches!(
            circuit.admittance_of(u1),
            Err(CircuitError::Domain(_))
        ));
        assert_eq!(circuit.admittance_of(r1).unwrap(), c(0.25, 0.0));
    }

    #[test]
    fn test_stats() {
        let (mut circuit, branch) = two_node_branch();
        let r1 = circuit.add_resistor(branch, Ohms(1.0)).unwrap();
        circuit.add_voltage_source(branch, c(1.0, 0.0)).unwrap();
        circuit
            .add_dependent_current_source(branch, Control::new(r1, ControlVariable::Voltage, 1.0))
            .unwrap();
        circuit
            .add_component_as(branch, ComponentKind::capacitor(None), Designation::Anonymous)
            .unwrap();

        let stats = circuit.stats();
        assert_eq!(stats.num_nodes, 2);
        assert_eq!(stats.num_branches, 1);
        assert_eq!(stats.num_sources, 1);
        assert_eq!(stats.num_dependent_sources, 1);
        assert_eq!(stats.num_elements, 2);
        assert_eq!(stats.num_anonymous, 1);
        assert_eq!(
            stats.to_string(),
            "2 nodes, 1 branches, 2 sources (1 dependent), 2 passive elements"
        );
    }

    #[test]
    fn test_validation_empty_circuit() {
        let diag = Circuit::new().validate();
        assert!(diag.has_errors());
    }

    #[test]
    fn test_validation_findings() {
        let mut circuit = Circuit::with_frequency(0.0).unwrap();
        let n0 = circuit.add_node();
        let n1 = circuit.add_node();
        let n2 = circuit.add_node();
        let n3 = circuit.add_node();
        let b0 = circuit.add_branch(n0, n1).unwrap();
        circuit.add_branch(n1, n1).unwrap();
        let b2 = circuit.add_branch(n2, n3).unwrap();

        circuit.add_component(b0, ComponentKind::resistor(None)).unwrap();
        circuit.add_capacitor(b0, Farads(1e-6)).unwrap();
        circuit
            .add_dependent_voltage_source(b2, Control::unbound(ControlVariable::Current, 1.0))
            .unwrap();

        let diag = circuit.validate();
        // empty + self-loop branch, unset R1, no controller on U1, two islands
        assert_eq!(diag.warning_count(), 5);
        // C1 at 0 Hz
        assert_eq!(diag.error_count(), 1);
        assert_eq!(diag.issues_by_category("topology").count(), 1);
    }

    #[test]
    fn test_validation_reports_cycles() {
        let (mut circuit, branch) = two_node_branch();
        let a = circuit
            .add_dependent_current_source(branch, Control::unbound(ControlVariable::Current, 1.0))
            .unwrap();
        circuit.bind_controller(a, a).unwrap();
        let diag = circuit.validate();
        assert_eq!(diag.error_count(), 1);
        assert_eq!(diag.errors().next().unwrap().entity.as_deref(), Some("I1"));
    }
}
