//! Two-terminal circuit elements.
//!
//! Every element is a [`Component`] whose behaviour is selected by a closed
//! [`ComponentKind`]: power sources (independent or dependent) and impedance
//! elements (generic, resistor, capacitor, inductor). All of them expose an
//! impedance; sources have zero impedance by definition.
//!
//! Quantities that a solver has not produced yet are `None`. Reading a value
//! that can be derived (a capacitor's impedance, a dependent source's output)
//! recomputes it on every call; nothing is cached.

use crate::error::{CircuitError, CircuitResult};
use crate::frequency::FrequencyContext;
use crate::units::{Farads, Henries, Ohms, RadiansPerSecond};
use crate::{BranchId, ComponentId};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

/// Which quantity of the controlling element a dependent source follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlVariable {
    Voltage,
    Current,
}

impl ControlVariable {
    /// Quantity symbol used in display strings
    pub fn symbol(self) -> &'static str {
        match self {
            ControlVariable::Voltage => "U",
            ControlVariable::Current => "I",
        }
    }
}

/// Link from a dependent source to the element it follows.
///
/// The controller is referenced by id only; it is owned by its own branch.
/// An unbound control (`controller == None`) makes the source unresolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Control {
    pub controller: Option<ComponentId>,
    pub variable: ControlVariable,
    pub gain: f64,
}

impl Control {
    pub fn new(controller: ComponentId, variable: ControlVariable, gain: f64) -> Self {
        Self {
            controller: Some(controller),
            variable,
            gain,
        }
    }

    /// Control whose controller is bound later with `Circuit::bind_controller`.
    pub fn unbound(variable: ControlVariable, gain: f64) -> Self {
        Self {
            controller: None,
            variable,
            gain,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PowerSource {
    /// Voltage is set externally, current is left to the solver
    IndependentVoltage,
    /// Current is set externally, voltage is left to the solver
    IndependentCurrent,
    /// Voltage = gain × controller quantity
    DependentVoltage(Control),
    /// Current = gain × controller quantity
    DependentCurrent(Control),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ImpedanceElement {
    /// Arbitrary linear passive two-terminal network
    Generic(Option<Complex64>),
    Resistor(Option<Ohms>),
    Capacitor(Option<Farads>),
    Inductor(Option<Henries>),
}

impl ImpedanceElement {
    /// Impedance at angular frequency `omega`.
    ///
    /// Resistors and generic impedances without a value are unknown (`None`).
    /// Capacitors and inductors without a value cannot be evaluated at all.
    pub fn impedance(&self, omega: RadiansPerSecond) -> CircuitResult<Option<Complex64>> {
        match *self {
            ImpedanceElement::Generic(z) => Ok(z),
            ImpedanceElement::Resistor(r) => Ok(r.map(|r| Complex64::new(r.value(), 0.0))),
            ImpedanceElement::Capacitor(c) => {
                let c = c.ok_or_else(|| CircuitError::Domain("capacitance not set".into()))?;
                let susceptance = omega.value() * c.value();
                if susceptance == 0.0 {
                    return Err(CircuitError::division_by_zero());
                }
                // 1 / (jωC) = -j / (ωC)
                Ok(Some(Complex64::new(0.0, -1.0 / susceptance)))
            }
            ImpedanceElement::Inductor(l) => {
                let l = l.ok_or_else(|| CircuitError::Domain("inductance not set".into()))?;
                Ok(Some(Complex64::new(0.0, omega.value() * l.value())))
            }
        }
    }

    /// True once the element's defining parameter has a value.
    pub fn is_parameterized(&self) -> bool {
        match self {
            ImpedanceElement::Generic(z) => z.is_some(),
            ImpedanceElement::Resistor(r) => r.is_some(),
            ImpedanceElement::Capacitor(c) => c.is_some(),
            ImpedanceElement::Inductor(l) => l.is_some(),
        }
    }
}

/// Closed set of element variants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ComponentKind {
    Source(PowerSource),
    Element(ImpedanceElement),
}

impl ComponentKind {
    pub fn voltage_source() -> Self {
        ComponentKind::Source(PowerSource::IndependentVoltage)
    }

    pub fn current_source() -> Self {
        ComponentKind::Source(PowerSource::IndependentCurrent)
    }

    pub fn dependent_voltage_source(control: Control) -> Self {
        ComponentKind::Source(PowerSource::DependentVoltage(control))
    }

    pub fn dependent_current_source(control: Control) -> Self {
        ComponentKind::Source(PowerSource::DependentCurrent(control))
    }

    pub fn impedance(z: Option<Complex64>) -> Self {
        ComponentKind::Element(ImpedanceElement::Generic(z))
    }

    pub fn resistor(r: Option<Ohms>) -> Self {
        ComponentKind::Element(ImpedanceElement::Resistor(r))
    }

    pub fn capacitor(c: Option<Farads>) -> Self {
        ComponentKind::Element(ImpedanceElement::Capacitor(c))
    }

    pub fn inductor(l: Option<Henries>) -> Self {
        ComponentKind::Element(ImpedanceElement::Inductor(l))
    }

    /// Prefix used for registry numbering unless the caller picks another.
    pub fn default_prefix(&self) -> &'static str {
        match self {
            ComponentKind::Source(PowerSource::IndependentVoltage)
            | ComponentKind::Source(PowerSource::DependentVoltage(_)) => "U",
            ComponentKind::Source(PowerSource::IndependentCurrent)
            | ComponentKind::Source(PowerSource::DependentCurrent(_)) => "I",
            ComponentKind::Element(ImpedanceElement::Generic(_)) => "Z",
            ComponentKind::Element(ImpedanceElement::Resistor(_)) => "R",
            ComponentKind::Element(ImpedanceElement::Capacitor(_)) => "C",
            ComponentKind::Element(ImpedanceElement::Inductor(_)) => "L",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ComponentKind::Source(PowerSource::IndependentVoltage) => "independent voltage source",
            ComponentKind::Source(PowerSource::IndependentCurrent) => "independent current source",
            ComponentKind::Source(PowerSource::DependentVoltage(_)) => "dependent voltage source",
            ComponentKind::Source(PowerSource::DependentCurrent(_)) => "dependent current source",
            ComponentKind::Element(ImpedanceElement::Generic(_)) => "impedance",
            ComponentKind::Element(ImpedanceElement::Resistor(_)) => "resistor",
            ComponentKind::Element(ImpedanceElement::Capacitor(_)) => "capacitor",
            ComponentKind::Element(ImpedanceElement::Inductor(_)) => "inductor",
        }
    }

    pub fn is_source(&self) -> bool {
        matches!(self, ComponentKind::Source(_))
    }

    pub fn control(&self) -> Option<&Control> {
        match self {
            ComponentKind::Source(PowerSource::DependentVoltage(control))
            | ComponentKind::Source(PowerSource::DependentCurrent(control)) => Some(control),
            _ => None,
        }
    }

    fn control_mut(&mut self) -> Option<&mut Control> {
        match self {
            ComponentKind::Source(PowerSource::DependentVoltage(control))
            | ComponentKind::Source(PowerSource::DependentCurrent(control)) => Some(control),
            _ => None,
        }
    }

    /// The control that derives `variable`, if this kind derives it.
    pub fn derives(&self, variable: ControlVariable) -> Option<&Control> {
        match (self, variable) {
            (ComponentKind::Source(PowerSource::DependentVoltage(c)), ControlVariable::Voltage)
            | (ComponentKind::Source(PowerSource::DependentCurrent(c)), ControlVariable::Current) => {
                Some(c)
            }
            _ => None,
        }
    }
}

/// A two-terminal element placed in exactly one branch.
#[derive(Debug, Clone)]
pub struct Component {
    id: ComponentId,
    branch: BranchId,
    kind: ComponentKind,
    prefix: String,
    number: Option<u32>,
    current: Option<Complex64>,
    voltage: Option<Complex64>,
    /// Potential of the left terminal
    pub v1: Option<Complex64>,
    /// Potential of the right terminal
    pub v2: Option<Complex64>,
    /// Voltage reference: `true` when the left terminal is positive
    pub voltage_reference_left_positive: bool,
    /// Current reference: `true` when current flows in at the left terminal
    pub current_reference_left_to_right: bool,
}

impl Component {
    pub(crate) fn new(
        id: ComponentId,
        branch: BranchId,
        kind: ComponentKind,
        prefix: String,
        number: Option<u32>,
    ) -> Self {
        Self {
            id,
            branch,
            kind,
            prefix,
            number,
            current: None,
            voltage: None,
            v1: None,
            v2: None,
            voltage_reference_left_positive: true,
            current_reference_left_to_right: true,
        }
    }

    pub fn id(&self) -> ComponentId {
        self.id
    }

    /// Branch this component belongs to
    pub fn branch(&self) -> BranchId {
        self.branch
    }

    pub fn kind(&self) -> &ComponentKind {
        &self.kind
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Sequence number within the prefix; `None` for anonymous components.
    pub fn number(&self) -> Option<u32> {
        self.number
    }

    pub fn is_anonymous(&self) -> bool {
        self.number.is_none()
    }

    /// Registry key (`"R2"`), or the bare prefix for anonymous components.
    pub fn key(&self) -> String {
        match self.number {
            Some(n) => format!("{}{}", self.prefix, n),
            None => self.prefix.clone(),
        }
    }

    /// Stored voltage, ignoring any dependent-source derivation.
    pub fn stored_voltage(&self) -> Option<Complex64> {
        self.voltage
    }

    /// Stored current, ignoring any dependent-source derivation.
    pub fn stored_current(&self) -> Option<Complex64> {
        self.current
    }

    pub(crate) fn stored(&self, variable: ControlVariable) -> Option<Complex64> {
        match variable {
            ControlVariable::Voltage => self.voltage,
            ControlVariable::Current => self.current,
        }
    }

    /// Write the element voltage. Fails on a dependent voltage source, whose
    /// voltage is derived from its controller.
    pub fn set_voltage(&mut self, voltage: impl Into<Option<Complex64>>) -> CircuitResult<()> {
        if self.kind.derives(ControlVariable::Voltage).is_some() {
            return Err(CircuitError::ReadOnly(format!("voltage of {}", self.key())));
        }
        self.voltage = voltage.into();
        Ok(())
    }

    /// Write the element current. Fails on a dependent current source.
    pub fn set_current(&mut self, current: impl Into<Option<Complex64>>) -> CircuitResult<()> {
        if self.kind.derives(ControlVariable::Current).is_some() {
            return Err(CircuitError::ReadOnly(format!("current of {}", self.key())));
        }
        self.current = current.into();
        Ok(())
    }

    fn wrong_kind(&self, expected: &'static str) -> CircuitError {
        CircuitError::WrongKind {
            key: self.key(),
            kind: self.kind.name(),
            expected,
        }
    }

    pub fn set_impedance(&mut self, z: impl Into<Option<Complex64>>) -> CircuitResult<()> {
        match &mut self.kind {
            ComponentKind::Element(ImpedanceElement::Generic(slot)) => {
                *slot = z.into();
                Ok(())
            }
            _ => Err(self.wrong_kind("generic impedance")),
        }
    }

    pub fn set_resistance(&mut self, r: impl Into<Option<Ohms>>) -> CircuitResult<()> {
        match &mut self.kind {
            ComponentKind::Element(ImpedanceElement::Resistor(slot)) => {
                *slot = r.into();
                Ok(())
            }
            _ => Err(self.wrong_kind("resistor")),
        }
    }

    pub fn set_capacitance(&mut self, c: impl Into<Option<Farads>>) -> CircuitResult<()> {
        match &mut self.kind {
            ComponentKind::Element(ImpedanceElement::Capacitor(slot)) => {
                *slot = c.into();
                Ok(())
            }
            _ => Err(self.wrong_kind("capacitor")),
        }
    }

    pub fn set_inductance(&mut self, l: impl Into<Option<Henries>>) -> CircuitResult<()> {
        match &mut self.kind {
            ComponentKind::Element(ImpedanceElement::Inductor(slot)) => {
                *slot = l.into();
                Ok(())
            }
            _ => Err(self.wrong_kind("inductor")),
        }
    }

    pub fn set_gain(&mut self, gain: f64) -> CircuitResult<()> {
        match self.kind.control_mut() {
            Some(control) => {
                control.gain = gain;
                Ok(())
            }
            None => Err(self.wrong_kind("dependent source")),
        }
    }

    pub fn set_control_variable(&mut self, variable: ControlVariable) -> CircuitResult<()> {
        match self.kind.control_mut() {
            Some(control) => {
                control.variable = variable;
                Ok(())
            }
            None => Err(self.wrong_kind("dependent source")),
        }
    }

    /// Point a dependent source at `controller`. The circuit checks that the
    /// controller exists; see `Circuit::bind_controller`.
    pub(crate) fn set_controller(&mut self, controller: ComponentId) -> CircuitResult<()> {
        match self.kind.control_mut() {
            Some(control) => {
                control.controller = Some(controller);
                Ok(())
            }
            None => Err(self.wrong_kind("dependent source")),
        }
    }

    /// Impedance at the context's current frequency. Sources are 0.
    pub fn impedance(&self, frequency: &FrequencyContext) -> CircuitResult<Option<Complex64>> {
        match &self.kind {
            ComponentKind::Source(_) => Ok(Some(Complex64::new(0.0, 0.0))),
            ComponentKind::Element(element) => element.impedance(frequency.angular()),
        }
    }

    /// 1 / impedance. Unlike a branch, there is no zero substitution here:
    /// an unknown or zero impedance is an error.
    pub fn admittance(&self, frequency: &FrequencyContext) -> CircuitResult<Complex64> {
        let z = self
            .impedance(frequency)?
            .ok_or_else(CircuitError::impedance_not_set)?;
        if z == Complex64::new(0.0, 0.0) {
            return Err(CircuitError::division_by_zero());
        }
        Ok(z.inv())
    }
}
