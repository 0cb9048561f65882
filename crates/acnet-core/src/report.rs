//! Serializable snapshot of everything a circuit can tell about itself.
//!
//! The report is built from fresh reads; values that cannot be evaluated are
//! left out and the reason is recorded next to them.

use crate::phasor::Phasor;
use crate::{Circuit, CircuitResult, Component};
use num_complex::Complex64;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct CircuitReport {
    pub frequency_hz: f64,
    pub angular_frequency: f64,
    pub nodes: Vec<NodeReport>,
    pub branches: Vec<BranchReport>,
    pub components: Vec<ComponentReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeReport {
    pub id: usize,
    pub display: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voltage: Option<Phasor>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BranchReport {
    pub id: usize,
    pub left: usize,
    pub right: usize,
    pub display: String,
    /// Registry keys in series order
    pub components: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impedance: Option<Phasor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admittance: Option<Phasor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<Phasor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComponentReport {
    pub key: String,
    pub kind: &'static str,
    pub branch: usize,
    pub display: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub control: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impedance: Option<Phasor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voltage: Option<Phasor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<Phasor>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

fn phasor(value: Option<Complex64>) -> Option<Phasor> {
    value.map(Phasor::from)
}

/// Split a fallible optional read into the value and an error message.
fn capture(
    result: CircuitResult<Option<Complex64>>,
    errors: &mut Vec<String>,
) -> Option<Phasor> {
    match result {
        Ok(value) => phasor(value),
        Err(err) => {
            errors.push(err.to_string());
            None
        }
    }
}

impl Circuit {
    pub fn report(&self) -> CircuitReport {
        let nodes = self
            .nodes()
            .map(|node| NodeReport {
                id: node.id().value(),
                display: node.to_string(),
                voltage: phasor(node.voltage),
            })
            .collect();

        let branches = self
            .branches()
            .map(|branch| {
                let mut errors = Vec::new();
                let impedance = capture(self.branch_impedance(branch.id()), &mut errors);
                let admittance = capture(self.branch_admittance(branch.id()), &mut errors);
                errors.dedup();
                BranchReport {
                    id: branch.id().value(),
                    left: branch.left().value(),
                    right: branch.right().value(),
                    display: branch.to_string(),
                    components: branch
                        .components()
                        .iter()
                        .filter_map(|id| self.component(*id).ok())
                        .map(Component::key)
                        .collect(),
                    impedance,
                    admittance,
                    current: phasor(branch.current),
                    error: errors.into_iter().next(),
                }
            })
            .collect();

        let components = self
            .components()
            .map(|component| self.component_report(component))
            .collect();

        CircuitReport {
            frequency_hz: self.frequency().frequency().value(),
            angular_frequency: self.frequency().angular().value(),
            nodes,
            branches,
            components,
        }
    }

    fn component_report(&self, component: &Component) -> ComponentReport {
        let id = component.id();
        let mut errors = Vec::new();
        let impedance = capture(component.impedance(self.frequency()), &mut errors);
        let voltage = capture(self.voltage_of(id), &mut errors);
        let current = capture(self.current_of(id), &mut errors);
        errors.dedup();

        ComponentReport {
            key: component.key(),
            kind: component.kind().name(),
            branch: component.branch().value(),
            display: self
                .display_component(id)
                .map(|d| d.to_string())
                .unwrap_or_else(|_| component.key()),
            control: self.describe_control(id).ok().flatten(),
            impedance,
            voltage,
            current,
            errors,
        }
    }
}
