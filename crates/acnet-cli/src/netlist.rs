//! TOML netlist format.
//!
//! ```toml
//! frequency_hz = 50.0
//!
//! [[node]]
//! id = 0
//! voltage = 0.0
//!
//! [[branch]]
//! left = 0
//! right = 1
//!
//! [[branch.component]]
//! kind = "resistor"
//! value = 1.0
//!
//! [[branch.component]]
//! kind = "dependent_voltage_source"
//! controller = "R1"
//! variable = "current"
//! gain = 2.0
//! ```
//!
//! Complex values are a plain number or `[re, im]`. Nodes not listed are
//! created implicitly up to the largest id a branch mentions. Ids must stay
//! below the count of listed nodes plus branch endpoints. Dependent sources
//! need a `variable` and a `gain`. Controllers are bound after every
//! component exists, so they may refer forward.

use acnet_core::{
    Circuit, ComponentId, ComponentKind, Control, ControlVariable, Designation, Farads, Henries,
    NodeId, Ohms,
};
use anyhow::{bail, Context, Result};
use num_complex::Complex64;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Netlist {
    pub frequency_hz: Option<f64>,
    #[serde(default, rename = "node")]
    pub nodes: Vec<NodeEntry>,
    #[serde(default, rename = "branch")]
    pub branches: Vec<BranchEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeEntry {
    pub id: usize,
    pub voltage: Option<ComplexValue>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BranchEntry {
    pub left: usize,
    pub right: usize,
    pub current: Option<ComplexValue>,
    pub v1: Option<ComplexValue>,
    pub v2: Option<ComplexValue>,
    #[serde(default, rename = "component")]
    pub components: Vec<ComponentEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComponentEntry {
    pub kind: ComponentType,
    pub prefix: Option<String>,
    #[serde(default)]
    pub anonymous: bool,
    /// Element parameter, or the set value of an independent source
    pub value: Option<ComplexValue>,
    pub voltage: Option<ComplexValue>,
    pub current: Option<ComplexValue>,
    /// Registry key of the controlling component
    pub controller: Option<String>,
    pub variable: Option<ControlVariable>,
    pub gain: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentType {
    Resistor,
    Capacitor,
    Inductor,
    Impedance,
    VoltageSource,
    CurrentSource,
    DependentVoltageSource,
    DependentCurrentSource,
}

impl ComponentType {
    fn is_dependent(self) -> bool {
        matches!(
            self,
            ComponentType::DependentVoltageSource | ComponentType::DependentCurrentSource
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ComplexValue {
    Real(f64),
    Pair([f64; 2]),
}

impl ComplexValue {
    pub fn to_complex(self) -> Complex64 {
        match self {
            ComplexValue::Real(re) => Complex64::new(re, 0.0),
            ComplexValue::Pair([re, im]) => Complex64::new(re, im),
        }
    }

    fn to_real(self, what: &str) -> Result<f64> {
        match self {
            ComplexValue::Real(re) => Ok(re),
            ComplexValue::Pair([re, im]) if im == 0.0 => Ok(re),
            ComplexValue::Pair(_) => bail!("{what} must be a real number"),
        }
    }
}

impl Netlist {
    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading netlist {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("parsing netlist {}", path.display()))
    }

    /// Build a circuit; `frequency_hz` applies when the netlist has none.
    pub fn build(&self, frequency_hz: f64) -> Result<Circuit> {
        let hz = self.frequency_hz.unwrap_or(frequency_hz);
        let mut circuit = Circuit::with_frequency(hz)?;

        // Every node is either listed or a branch endpoint, so ids are dense
        // below this limit.
        let limit = self.nodes.len() + 2 * self.branches.len();
        let ids = || {
            self.nodes
                .iter()
                .map(|node| node.id)
                .chain(self.branches.iter().flat_map(|b| [b.left, b.right]))
        };
        if let Some(id) = ids().find(|id| *id >= limit) {
            bail!("node id {id} out of range");
        }
        let node_count = ids().max().map_or(0, |id| id + 1);
        for _ in 0..node_count {
            circuit.add_node();
        }
        let mut seen = vec![false; node_count];
        for entry in &self.nodes {
            if std::mem::replace(&mut seen[entry.id], true) {
                bail!("node {} is listed twice", entry.id);
            }
            let node = circuit.node_mut(NodeId::new(entry.id))?;
            node.voltage = entry.voltage.map(|v| v.to_complex());
        }

        let mut pending = Vec::new();
        for (index, entry) in self.branches.iter().enumerate() {
            let id = circuit.add_branch(NodeId::new(entry.left), NodeId::new(entry.right))?;
            let branch = circuit.branch_mut(id)?;
            branch.current = entry.current.map(|v| v.to_complex());
            branch.v1 = entry.v1.map(|v| v.to_complex());
            branch.v2 = entry.v2.map(|v| v.to_complex());

            for (position, component) in entry.components.iter().enumerate() {
                let added = add_component(&mut circuit, id, component).with_context(|| {
                    format!("branch {index}, component {position} ({:?})", component.kind)
                })?;
                if let Some(key) = &component.controller {
                    pending.push((added, key.as_str()));
                }
            }
        }

        for (dependent, key) in pending {
            let controller = circuit
                .lookup(key)
                .with_context(|| format!("unknown controller '{key}'"))?
                .id();
            circuit.bind_controller(dependent, controller)?;
            debug!(controller = key, "bound controller");
        }

        info!(
            nodes = circuit.node_count(),
            branches = circuit.branch_count(),
            components = circuit.component_count(),
            "built circuit"
        );
        Ok(circuit)
    }
}

fn add_component(
    circuit: &mut Circuit,
    branch: acnet_core::BranchId,
    entry: &ComponentEntry,
) -> Result<ComponentId> {
    if entry.controller.is_some() && !entry.kind.is_dependent() {
        bail!("only dependent sources take a controller");
    }
    let designation = match (&entry.prefix, entry.anonymous) {
        (Some(_), true) => bail!("a component cannot have a prefix and be anonymous"),
        (Some(prefix), false) => Designation::Prefix(prefix.clone()),
        (None, true) => Designation::Anonymous,
        (None, false) => Designation::Default,
    };

    let real = |what: &str| entry.value.map(|v| v.to_real(what)).transpose();
    let control = || -> Result<Control> {
        let variable = entry
            .variable
            .context("dependent sources need a control variable")?;
        let gain = entry.gain.context("dependent sources need a gain")?;
        Ok(Control::unbound(variable, gain))
    };
    let kind = match entry.kind {
        ComponentType::Resistor => ComponentKind::resistor(real("resistance")?.map(Ohms)),
        ComponentType::Capacitor => ComponentKind::capacitor(real("capacitance")?.map(Farads)),
        ComponentType::Inductor => ComponentKind::inductor(real("inductance")?.map(Henries)),
        ComponentType::Impedance => ComponentKind::impedance(entry.value.map(|v| v.to_complex())),
        ComponentType::VoltageSource => ComponentKind::voltage_source(),
        ComponentType::CurrentSource => ComponentKind::current_source(),
        ComponentType::DependentVoltageSource => {
            ComponentKind::dependent_voltage_source(control()?)
        }
        ComponentType::DependentCurrentSource => {
            ComponentKind::dependent_current_source(control()?)
        }
    };

    let id = circuit.add_component_as(branch, kind, designation)?;
    let component = circuit.component_mut(id)?;
    match entry.kind {
        ComponentType::VoltageSource => {
            if entry.value.is_some() && entry.voltage.is_some() {
                bail!("give the source voltage as either value or voltage");
            }
            if let Some(u) = entry.value.or(entry.voltage) {
                component.set_voltage(u.to_complex())?;
            }
        }
        ComponentType::CurrentSource => {
            if entry.value.is_some() && entry.current.is_some() {
                bail!("give the source current as either value or current");
            }
            if let Some(i) = entry.value.or(entry.current) {
                component.set_current(i.to_complex())?;
            }
        }
        _ => {
            if entry.kind.is_dependent() && entry.value.is_some() {
                bail!("dependent sources take gain, not value");
            }
        }
    }
    if !matches!(entry.kind, ComponentType::VoltageSource) {
        if let Some(u) = entry.voltage {
            component.set_voltage(u.to_complex())?;
        }
    }
    if !matches!(entry.kind, ComponentType::CurrentSource) {
        if let Some(i) = entry.current {
            component.set_current(i.to_complex())?;
        }
    }
    Ok(id)
}
