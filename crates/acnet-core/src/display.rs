//! Human-readable quantity strings.
//!
//! Phasor quantities render as `"U1 U=100.00∠0.00° V"`: the magnitude is
//! scaled to an engineering unit, the phase is in degrees. Element parameters
//! that are plain real numbers render without a phase, `"C1 C=4.70nF"`.
//! Anything not resolved yet renders as the bare name.

use crate::component::{Component, ComponentKind, ImpedanceElement, PowerSource};
use crate::phasor::decompose;
use crate::units::{UnitTable, CAPACITANCE, CURRENT, IMPEDANCE, INDUCTANCE, VOLTAGE};
use crate::{Branch, Circuit, CircuitResult, ComponentId, Node};
use num_complex::Complex64;
use std::fmt;

fn write_phasor(
    f: &mut fmt::Formatter<'_>,
    name: &str,
    symbol: &str,
    z: Complex64,
    table: UnitTable<'_>,
) -> fmt::Result {
    let (magnitude, phase) = decompose(z);
    let (value, unit) = table.scale(magnitude);
    write!(f, "{name} {symbol}={value:.2}∠{phase:.2}° {unit}")
}

fn write_real(
    f: &mut fmt::Formatter<'_>,
    name: &str,
    symbol: &str,
    x: f64,
    table: UnitTable<'_>,
) -> fmt::Result {
    let (value, unit) = table.scale(x);
    write!(f, "{name} {symbol}={value:.2}{unit}")
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.voltage {
            Some(v) => write_phasor(f, &self.label(), "V", v, VOLTAGE),
            None => write!(f, "{}", self.label()),
        }
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.current {
            Some(i) => write_phasor(f, &self.label(), "I", i, CURRENT),
            None => write!(f, "{}", self.label()),
        }
    }
}

/// Display adapter for a component; dependent sources need the circuit to
/// resolve their controller.
pub struct ComponentDisplay<'a> {
    circuit: &'a Circuit,
    component: &'a Component,
}

impl fmt::Display for ComponentDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let component = self.component;
        let name = component.key();
        // Control cycles display as unresolved
        let voltage = || self.circuit.voltage_of(component.id()).ok().flatten();
        let current = || self.circuit.current_of(component.id()).ok().flatten();

        match component.kind() {
            ComponentKind::Source(PowerSource::IndependentVoltage)
            | ComponentKind::Source(PowerSource::DependentVoltage(_)) => match voltage() {
                Some(u) => write_phasor(f, &name, "U", u, VOLTAGE),
                None => f.write_str(&name),
            },
            ComponentKind::Source(PowerSource::IndependentCurrent)
            | ComponentKind::Source(PowerSource::DependentCurrent(_)) => match current() {
                Some(i) => write_phasor(f, &name, "I", i, CURRENT),
                None => f.write_str(&name),
            },
            ComponentKind::Element(ImpedanceElement::Generic(Some(z))) => {
                write_phasor(f, &name, "Z", *z, IMPEDANCE)
            }
            ComponentKind::Element(ImpedanceElement::Resistor(Some(r))) => {
                write_real(f, &name, "R", r.value(), IMPEDANCE)
            }
            ComponentKind::Element(ImpedanceElement::Capacitor(Some(c))) => {
                write_real(f, &name, "C", c.value(), CAPACITANCE)
            }
            ComponentKind::Element(ImpedanceElement::Inductor(Some(l))) => {
                write_real(f, &name, "L", l.value(), INDUCTANCE)
            }
            ComponentKind::Element(_) => f.write_str(&name),
        }
    }
}

impl Circuit {
    pub fn display_component(&self, id: ComponentId) -> CircuitResult<ComponentDisplay<'_>> {
        Ok(ComponentDisplay {
            circuit: self,
            component: self.component(id)?,
        })
    }

    /// Control law of a dependent source, e.g. `"U2 U=2I(R1)"`.
    ///
    /// Returns `None` for components that are not dependent sources.
    pub fn describe_control(&self, id: ComponentId) -> CircuitResult<Option<String>> {
        let component = self.component(id)?;
        let Some(control) = component.kind().control() else {
            return Ok(None);
        };
        let output = match component.kind() {
            ComponentKind::Source(PowerSource::DependentVoltage(_)) => "U",
            _ => "I",
        };
        let controller = match control.controller {
            Some(controller) => self.component(controller)?.key(),
            None => "?".to_string(),
        };
        Ok(Some(format!(
            "{} {}={}{}({})",
            component.key(),
            output,
            control.gain,
            control.variable.symbol(),
            controller
        )))
    }
}
